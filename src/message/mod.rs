//! Message assembly.
//!
//! [`ProvenMessage::message`] starts a staged builder over the raw document
//! text; [`ProvenMessageBuilder::build`] runs the full pipeline — context
//! prepending, JSON-LD expansion, normalization, rule application, and
//! projection — and assembles the immutable message value. The first stage
//! failure aborts the build and is wrapped in a single build-level error.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{Measurement, MessageContent, Statement, TimeSeriesQuery};
use crate::error::{MessageError, Result};
use crate::graph::normalize;
use crate::model::MessageModel;
use crate::parsing;
use crate::projection;
use crate::rules::RulesEngine;
use crate::vocab;

/// Order of the parts of a message key, delimiter-joined by
/// [`ProvenMessage::message_key`]. Missing parts join as empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKeyPartOrder {
    Id = 0,
    Domain = 1,
    Name = 2,
    Source = 3,
    Created = 4,
}

/// A fully built message: the typed projections of one semantic document.
///
/// Exactly one of `measurements` and `ts_query` carries data, selected by the
/// content classification: explicit messages get measurements, query messages
/// get a time-series query descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenMessage {
    /// Unique id assigned at build time.
    pub message_id: Uuid,
    /// The original document text, as submitted.
    pub message: String,
    /// Content classification decided during normalization.
    pub content: MessageContent,
    /// Message name.
    pub name: Option<String>,
    /// Domain the message belongs to.
    pub domain: Option<String>,
    /// Originating source.
    pub source: Option<String>,
    /// Transient messages are not persisted long-term by downstream stores.
    pub is_transient: bool,
    /// Static messages describe reference data rather than observations.
    pub is_static: bool,
    /// Free-form keywords.
    pub keywords: Vec<String>,
    /// Build time, epoch milliseconds.
    pub created: i64,
    /// Flat statement view of the enriched graph.
    pub statements: Vec<Statement>,
    /// Measurement view; empty unless the content is explicit.
    pub measurements: Vec<Measurement>,
    /// Query view; present only for query content.
    pub ts_query: Option<TimeSeriesQuery>,
}

impl ProvenMessage {
    /// Starts a builder over the raw message document text.
    pub fn message(text: impl Into<String>) -> ProvenMessageBuilder {
        ProvenMessageBuilder {
            message: text.into(),
            name: None,
            domain: None,
            source: None,
            is_transient: false,
            is_static: false,
            keywords: Vec::new(),
        }
    }

    /// Grid key of this message, parts joined in [`MessageKeyPartOrder`]
    /// order with the reserved delimiter. Missing parts join as empty
    /// strings.
    pub fn message_key(&self) -> String {
        [
            self.message_id.to_string(),
            self.domain.clone().unwrap_or_default(),
            self.name.clone().unwrap_or_default(),
            self.source.clone().unwrap_or_default(),
            self.created.to_string(),
        ]
        .join(vocab::MESSAGE_KEY_DELIMITER)
    }
}

/// Staged builder for [`ProvenMessage`]. Setters stage descriptive fields;
/// [`build`](Self::build) runs the pipeline.
#[derive(Debug, Clone)]
pub struct ProvenMessageBuilder {
    message: String,
    name: Option<String>,
    domain: Option<String>,
    source: Option<String>,
    is_transient: bool,
    is_static: bool,
    keywords: Vec<String>,
}

impl ProvenMessageBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_transient(mut self, is_transient: bool) -> Self {
        self.is_transient = is_transient;
        self
    }

    pub fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Runs the build pipeline against the injected model and rules engine.
    ///
    /// # Errors
    ///
    /// The first stage failure aborts the build; the cause is wrapped in
    /// [`MessageError::Build`].
    pub fn build(self, model: &MessageModel, rules: &dyn RulesEngine) -> Result<ProvenMessage> {
        self.run(model, rules).map_err(|cause| MessageError::Build(Box::new(cause)))
    }

    fn run(self, model: &MessageModel, rules: &dyn RulesEngine) -> Result<ProvenMessage> {
        let combined = parsing::prepend_context(model.context(), &self.message);
        let parsed = parsing::parse_json_ld(&combined)?;
        debug!(triples = parsed.len(), "expanded message document");

        let normalized = normalize::normalize(&parsed)?;
        let content = normalized.content;

        let mut enriched = normalized.graph;
        let inferred = rules.apply_rules(&enriched, model.shapes())?;
        debug!(inferred = inferred.len(), "applied rules");
        enriched.union(inferred);

        let root = projection::message_root(&enriched)?;
        let statements = projection::statements(&enriched)?;
        let (measurements, ts_query) = match content {
            MessageContent::Explicit => (projection::measurements(&enriched, &root)?, None),
            MessageContent::Query => {
                (Vec::new(), Some(projection::time_series_query(&enriched, &root)?))
            }
        };

        let built = ProvenMessage {
            message_id: Uuid::new_v4(),
            message: self.message,
            content,
            name: self.name,
            domain: self.domain,
            source: self.source,
            is_transient: self.is_transient,
            is_static: self.is_static,
            keywords: self.keywords,
            created: Utc::now().timestamp_millis(),
            statements,
            measurements,
            ts_query,
        };
        info!(
            message_id = %built.message_id,
            content = %built.content,
            statements = built.statements.len(),
            measurements = built.measurements.len(),
            "built message"
        );
        Ok(built)
    }
}
