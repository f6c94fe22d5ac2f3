//! Error types for message construction.

use thiserror::Error;

/// Result type alias for message operations.
pub type Result<T> = std::result::Result<T, MessageError>;

/// Main error type for message construction and projection.
///
/// Configuration errors (the model bundle variants) are fatal at startup;
/// everything else is fatal for the single build that raised it. None of
/// these conditions is transient, so no caller should retry.
#[derive(Error, Debug)]
pub enum MessageError {
    /// The model registry lists no context file.
    #[error("message model has no context file")]
    MissingModelContext,

    /// The model registry lists more than one context file.
    #[error("message model has multiple context files")]
    MultipleModelContext,

    /// The model registry lists no ontology file.
    #[error("message model has no ontology file")]
    MissingModelOntology,

    /// The model registry lists no shapes file.
    #[error("message model has no shapes file")]
    MissingModelShapes,

    /// A model resource could not be read.
    #[error("failed to load model resource '{resource}': {source}")]
    ModelLoad {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// The message document could not be parsed into a triple graph.
    #[error("failed to parse message document: {0}")]
    Parse(String),

    /// A node identifier is not a valid IRI.
    #[error("invalid IRI: {0}")]
    InvalidIri(#[from] oxrdf::IriParseError),

    /// Normalization materialized nodes but none qualified as the root.
    #[error("message root object not found")]
    RootNotFound,

    /// More than one node qualified as the message root.
    #[error("ambiguous message root, candidates: {0:?}")]
    AmbiguousRoot(Vec<String>),

    /// The graph carries no root-type triple to project from.
    #[error("missing ProvenMessage concept in message graph")]
    MissingRootConcept,

    /// Statement projection failed.
    #[error("failed to convert graph to statements: {0}")]
    Statements(String),

    /// Measurement projection failed.
    #[error("failed to convert measurements: {0}")]
    Measurements(String),

    /// Time-series query projection failed.
    #[error("failed to convert time-series query: {0}")]
    Query(String),

    /// A query message produced no filters.
    #[error("unfiltered time-series queries are not supported")]
    UnfilteredQuery,

    /// The external rules engine reported a failure.
    #[error("rules engine failed: {0}")]
    Rules(String),

    /// Build-level wrapper: one of the pipeline stages failed.
    #[error("failed to build message")]
    Build(#[source] Box<MessageError>),

    /// IO error outside of model loading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MessageError::Parse("unexpected token".to_string());
        assert_eq!(err.to_string(), "failed to parse message document: unexpected token");
    }

    #[test]
    fn test_build_error_keeps_cause() {
        use std::error::Error;

        let err = MessageError::Build(Box::new(MessageError::RootNotFound));
        assert_eq!(err.to_string(), "failed to build message");
        let source = err.source().expect("build error must carry its cause");
        assert_eq!(source.to_string(), "message root object not found");
    }
}
