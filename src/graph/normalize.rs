//! Anonymous-node materialization and message root inference.
//!
//! Message documents arrive with anonymous nodes for every concept instance
//! the producer did not name. Normalization replaces each of them with a
//! stable generated IRI and identifies the message root: the one materialized
//! node never referenced as an object of another triple.

use std::collections::HashMap;

use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use tracing::debug;
use uuid::Uuid;

use crate::core::MessageContent;
use crate::error::{MessageError, Result};
use crate::graph::TripleGraph;
use crate::vocab;

/// Outcome of a normalization pass.
#[derive(Debug)]
pub struct NormalizedGraph {
    /// The rewritten graph, free of anonymous nodes.
    pub graph: TripleGraph,
    /// The inferred message root, when any node was materialized. A graph
    /// that arrived without anonymous nodes keeps its caller-supplied root
    /// typing and this stays `None`.
    pub root: Option<NamedNode>,
    /// Content classification decided during the pass.
    pub content: MessageContent,
}

/// Materializes every anonymous node of `graph` into a generated IRI and
/// infers the message root.
///
/// A single forward pass produces a brand-new output graph: triples without
/// anonymous nodes are carried over untouched, the rest are re-added with
/// the materialized IRI in place of each anonymous node. Materialization is
/// memoized per anonymous-node identity so reference counting stays
/// consistent. The same pass watches for the query-type predicate, which
/// flips the content classification from its Explicit default.
///
/// # Errors
///
/// [`MessageError::RootNotFound`] when nodes were materialized but none has a
/// zero object-reference count, and [`MessageError::AmbiguousRoot`] when more
/// than one does. Normalization never guesses a root.
pub fn normalize(graph: &TripleGraph) -> Result<NormalizedGraph> {
    let mut replacements: HashMap<BlankNode, NamedNode> = HashMap::new();
    let mut object_refs: HashMap<NamedNode, usize> = HashMap::new();
    let mut out = TripleGraph::with_capacity(graph.len() + 2);
    let mut content = MessageContent::Explicit;

    for triple in graph.iter() {
        if triple.predicate.as_ref() == vocab::QUERY_TYPE_PROP {
            content = MessageContent::Query;
        }

        let subject: Subject = match &triple.subject {
            Subject::BlankNode(anon) => {
                let iri = match replacements.get(anon) {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh = replacement_iri();
                        replacements.insert(anon.clone(), fresh.clone());
                        object_refs.insert(fresh.clone(), 0);
                        fresh
                    }
                };
                iri.into()
            }
            other => other.clone(),
        };

        let object: Term = match &triple.object {
            Term::BlankNode(anon) => {
                let iri = match replacements.get(anon) {
                    Some(existing) => {
                        debug!(node = %anon, "anonymous object seen before");
                        existing.clone()
                    }
                    None => {
                        let fresh = replacement_iri();
                        replacements.insert(anon.clone(), fresh.clone());
                        fresh
                    }
                };
                *object_refs.entry(iri.clone()).or_insert(0) += 1;
                iri.into()
            }
            other => other.clone(),
        };

        out.insert(Triple::new(subject, triple.predicate.clone(), object));
    }

    // Nothing materialized: the caller is responsible for explicit root
    // typing, and projection's root lookup is the failure path otherwise.
    if replacements.is_empty() {
        return Ok(NormalizedGraph { graph: out, root: None, content });
    }

    let mut candidates: Vec<NamedNode> = object_refs
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| node.clone())
        .collect();

    let root = match candidates.len() {
        0 => return Err(MessageError::RootNotFound),
        1 => candidates.remove(0),
        _ => {
            candidates.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
            return Err(MessageError::AmbiguousRoot(
                candidates.into_iter().map(|n| n.into_string()).collect(),
            ));
        }
    };

    debug!(root = %root, %content, "identified message root");
    out.insert(Triple::new(
        root.clone(),
        vocab::RDF_TYPE_PROP.into_owned(),
        vocab::PROVEN_MESSAGE_RES.into_owned(),
    ));
    out.insert(Triple::new(
        root.clone(),
        vocab::MESSAGE_CONTENT_PROP.into_owned(),
        Literal::new_simple_literal(content.to_string()),
    ));

    Ok(NormalizedGraph { graph: out, root: Some(root), content })
}

/// Generates a globally-unique IRI under the reserved namespace for one
/// materialized node.
fn replacement_iri() -> NamedNode {
    NamedNode::new_unchecked(format!("{}{}", vocab::PROVEN_MESSAGE_NS, Uuid::new_v4()))
}
