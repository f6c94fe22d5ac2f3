//! In-memory triple graph used by the message pipeline.
//!
//! A [`TripleGraph`] is a plain, queryable collection of RDF triples owned by
//! one pipeline invocation. Duplicates may occur (the rules union re-asserts
//! facts) and are harmless; consumers that care deduplicate at projection.

pub mod normalize;

use oxrdf::{NamedNodeRef, Subject, SubjectRef, Term, TermRef, Triple, TripleRef};

/// An append-only collection of (subject, predicate, object) triples with
/// wildcard pattern matching.
#[derive(Debug, Clone, Default)]
pub struct TripleGraph {
    triples: Vec<Triple>,
}

impl TripleGraph {
    pub fn new() -> Self {
        Self { triples: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { triples: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn insert(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: TripleRef<'_>) -> bool {
        self.triples.iter().any(|t| t.as_ref() == triple)
    }

    /// Appends all triples of `other` to this graph.
    pub fn union(&mut self, other: TripleGraph) {
        self.triples.extend(other.triples);
    }

    /// Finds all triples matching the pattern; `None` positions are wildcards.
    pub fn matching<'a>(
        &'a self,
        subject: Option<SubjectRef<'a>>,
        predicate: Option<NamedNodeRef<'a>>,
        object: Option<TermRef<'a>>,
    ) -> impl Iterator<Item = &'a Triple> {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| t.subject.as_ref() == s)
                && predicate.map_or(true, |p| t.predicate.as_ref() == p)
                && object.map_or(true, |o| t.object.as_ref() == o)
        })
    }

    /// True if any triple touches an anonymous node on either side.
    pub fn has_anonymous_nodes(&self) -> bool {
        self.triples.iter().any(|t| {
            matches!(t.subject, Subject::BlankNode(_)) || matches!(t.object, Term::BlankNode(_))
        })
    }
}

impl FromIterator<Triple> for TripleGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self { triples: iter.into_iter().collect() }
    }
}

impl IntoIterator for TripleGraph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    #[test]
    fn test_matching_wildcards() {
        let mut graph = TripleGraph::new();
        let alice = node("http://example.org/alice");
        let bob = node("http://example.org/bob");
        let knows = node("http://example.org/knows");
        let name = node("http://example.org/name");

        graph.insert(Triple::new(alice.clone(), knows.clone(), bob.clone()));
        graph.insert(Triple::new(alice.clone(), name.clone(), Literal::new_simple_literal("Alice")));
        graph.insert(Triple::new(bob.clone(), name.clone(), Literal::new_simple_literal("Bob")));

        assert_eq!(graph.matching(None, None, None).count(), 3);
        assert_eq!(graph.matching(Some(alice.as_ref().into()), None, None).count(), 2);
        assert_eq!(graph.matching(None, Some(name.as_ref()), None).count(), 2);
        assert_eq!(
            graph
                .matching(None, Some(knows.as_ref()), Some(bob.as_ref().into()))
                .count(),
            1
        );
        assert_eq!(graph.matching(Some(bob.as_ref().into()), Some(knows.as_ref()), None).count(), 0);
    }

    #[test]
    fn test_has_anonymous_nodes() {
        let mut graph = TripleGraph::new();
        let p = node("http://example.org/p");
        graph.insert(Triple::new(
            node("http://example.org/s"),
            p.clone(),
            Literal::new_simple_literal("v"),
        ));
        assert!(!graph.has_anonymous_nodes());

        graph.insert(Triple::new(BlankNode::default(), p, Literal::new_simple_literal("v")));
        assert!(graph.has_anonymous_nodes());
    }

    #[test]
    fn test_union_keeps_duplicates() {
        let mut a = TripleGraph::new();
        let t = Triple::new(
            node("http://example.org/s"),
            node("http://example.org/p"),
            node("http://example.org/o"),
        );
        a.insert(t.clone());

        let mut b = TripleGraph::new();
        b.insert(t);

        a.union(b);
        assert_eq!(a.len(), 2);
    }
}
