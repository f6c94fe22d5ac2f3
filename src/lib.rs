//! # Proven Message
//!
//! Semantic message normalization and typed extraction.
//!
//! A message arrives as a JSON-LD document describing one logical message.
//! The pipeline splices in the model context, expands the document into a
//! triple graph, materializes every anonymous node while inferring the
//! message root, applies external rules, and projects the enriched graph
//! into strongly-typed views: a flat statement list, timestamped
//! measurements with metrics, or a time-series query descriptor.
//!
//! ## Example
//!
//! ```rust,no_run
//! use proven_message::{MessageModel, NoInference, ProvenMessage, Result};
//!
//! fn example() -> Result<()> {
//!     let model = MessageModel::load("model")?;
//!     let message = ProvenMessage::message(r#"{"hasName": "demo"}"#)
//!         .domain("grid")
//!         .build(&model, &NoInference)?;
//!     println!("{}", message.message_key());
//!     Ok(())
//! }
//! ```

/// Metric encoding carried in literal datatype IRIs
pub mod codec;
/// Core message value types
pub mod core;
/// Error types
pub mod error;
/// Triple graph and normalization
pub mod graph;
/// Message assembly and the build pipeline
pub mod message;
/// Message model bundle
pub mod model;
/// Document parsing
pub mod parsing;
/// Typed graph projections
pub mod projection;
/// External rules engine boundary
pub mod rules;
/// Reserved vocabulary
pub mod vocab;

pub use crate::core::{
    Measurement, MessageContent, Metric, MetricValueType, ObjectValueType, QueryFilter,
    Statement, TimeSeriesQuery,
};
pub use crate::error::{MessageError, Result};
pub use crate::graph::normalize::{normalize, NormalizedGraph};
pub use crate::graph::TripleGraph;
pub use crate::message::{MessageKeyPartOrder, ProvenMessage, ProvenMessageBuilder};
pub use crate::model::{MessageModel, ModelFileKind};
pub use crate::rules::{NoInference, RulesEngine};
