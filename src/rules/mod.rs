//! External rules engine boundary.
//!
//! Rule evaluation (SHACL or otherwise) lives outside this crate. The builder
//! talks to it through [`RulesEngine`] and unions whatever the engine infers
//! with the message data.

use crate::error::Result;
use crate::graph::TripleGraph;

/// An inference engine run against the normalized message graph.
pub trait RulesEngine {
    /// Evaluates `shapes` against `data` and returns the inferred triples
    /// only. The caller performs the union.
    fn apply_rules(&self, data: &TripleGraph, shapes: &TripleGraph) -> Result<TripleGraph>;
}

/// Engine that infers nothing. Used when no rule evaluation is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInference;

impl RulesEngine for NoInference {
    fn apply_rules(&self, _data: &TripleGraph, _shapes: &TripleGraph) -> Result<TripleGraph> {
        Ok(TripleGraph::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{NamedNode, Triple};

    #[test]
    fn test_no_inference_returns_empty_graph() {
        let mut data = TripleGraph::new();
        data.insert(Triple::new(
            NamedNode::new("http://example.org/s").unwrap(),
            NamedNode::new("http://example.org/p").unwrap(),
            NamedNode::new("http://example.org/o").unwrap(),
        ));
        let inferred = NoInference.apply_rules(&data, &TripleGraph::new()).unwrap();
        assert!(inferred.is_empty());
    }
}
