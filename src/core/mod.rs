//! Core message value types shared across the pipeline.
//!
//! These are the wire-record shapes handed to transport and storage layers.
//! All of them are immutable once a build returns and serialize with serde.

use std::collections::HashSet;
use std::fmt;

use oxrdf::NamedNode;
use serde::{Deserialize, Serialize};

use crate::vocab;

/// Serde adapter for IRI-typed fields: IRIs travel as plain strings.
pub(crate) mod iri_serde {
    use oxrdf::NamedNode;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(node: &NamedNode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(node.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NamedNode, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NamedNode::new(raw).map_err(D::Error::custom)
    }
}

/// Content classification of a message. Mutually exclusive per message:
/// explicit content carries measurements, query content carries a
/// time-series query descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Message discloses data (the default).
    #[default]
    Explicit,
    /// Message describes a time-series query.
    Query,
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageContent::Explicit => write!(f, "Explicit"),
            MessageContent::Query => write!(f, "Query"),
        }
    }
}

/// Kind of a statement's object value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectValueType {
    /// Object is a literal lexical value.
    Literal,
    /// Object is an addressable resource IRI.
    Uri,
}

/// A single (subject, predicate, object) fact of the final message graph.
/// Assumes no anonymous nodes remain; normalization guarantees that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Subject resource IRI.
    #[serde(with = "iri_serde")]
    pub subject: NamedNode,
    /// Predicate IRI.
    #[serde(with = "iri_serde")]
    pub predicate: NamedNode,
    /// Object value: a literal lexical form or a resource IRI.
    pub object: String,
    /// Discriminates the two object value encodings.
    pub object_value_type: ObjectValueType,
}

impl Statement {
    pub fn new(
        subject: NamedNode,
        predicate: NamedNode,
        object: impl Into<String>,
        object_value_type: ObjectValueType,
    ) -> Self {
        Self { subject, predicate, object: object.into(), object_value_type }
    }
}

/// Possible types for a metric value. Based on XSD typing, these can be
/// simple types (string, integer, boolean, ...) or types specific to values
/// originating from the API (host name, process id, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricValueType {
    String,
    Integer,
    Long,
    Boolean,
    DateTime,
    Timestamp,
    HostName,
    HostFqdn,
    ApplicationName,
    ApplicationVersion,
    ProcessId,
    Float,
    Double,
}

impl MetricValueType {
    /// XSD type name backing this value type.
    pub fn xsd_type(self) -> &'static str {
        match self {
            MetricValueType::String
            | MetricValueType::HostName
            | MetricValueType::HostFqdn
            | MetricValueType::ApplicationName
            | MetricValueType::ApplicationVersion => "xsd:string",
            MetricValueType::Integer | MetricValueType::ProcessId => "xsd:integer",
            MetricValueType::Long | MetricValueType::Timestamp => "xsd:long",
            MetricValueType::Boolean => "xsd:boolean",
            MetricValueType::DateTime => "xsd:dateTime",
            MetricValueType::Float => "xsd:float",
            MetricValueType::Double => "xsd:double",
        }
    }

    /// Looks up a value type by fragment name, tolerating case and
    /// underscore variations ("Integer", "INTEGER", "HOST_NAME", "HostName").
    pub fn from_name(name: &str) -> Option<Self> {
        let folded: String =
            name.chars().filter(|c| *c != '_').map(|c| c.to_ascii_lowercase()).collect();
        match folded.as_str() {
            "string" => Some(MetricValueType::String),
            "integer" => Some(MetricValueType::Integer),
            "long" => Some(MetricValueType::Long),
            "boolean" => Some(MetricValueType::Boolean),
            "datetime" => Some(MetricValueType::DateTime),
            "timestamp" => Some(MetricValueType::Timestamp),
            "hostname" => Some(MetricValueType::HostName),
            "hostfqdn" => Some(MetricValueType::HostFqdn),
            "applicationname" => Some(MetricValueType::ApplicationName),
            "applicationversion" => Some(MetricValueType::ApplicationVersion),
            "processid" => Some(MetricValueType::ProcessId),
            "float" => Some(MetricValueType::Float),
            "double" => Some(MetricValueType::Double),
            _ => None,
        }
    }
}

/// A single time-series metric value: one measurement is composed of one or
/// more metrics. Deduplicated by value equality inside a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Metric label, either the fragment override or the predicate local name.
    pub label: String,
    /// Lexical value of the metric.
    pub value: String,
    /// True for tag (metadata) metrics, false for field metrics.
    pub is_metadata: bool,
    /// Value type, explicit or derived from the lexical value.
    pub value_type: MetricValueType,
}

/// A single time-series measurement data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Name of the measurement container. Defaults when the message
    /// provides none; storage resolves the default.
    pub measurement_name: String,
    /// Measurement time in epoch milliseconds, when provided.
    pub timestamp: Option<i64>,
    /// Semantic link to the message root concept instance.
    #[serde(with = "iri_serde")]
    pub message: NamedNode,
    /// Semantic link to this measurement's concept instance.
    #[serde(with = "iri_serde")]
    pub measurement: NamedNode,
    /// The set of metric values and metadata contained in the measurement.
    pub metrics: HashSet<Metric>,
}

impl Measurement {
    pub fn new(message: NamedNode, measurement: NamedNode) -> Self {
        Self {
            measurement_name: vocab::DEFAULT_MEASUREMENT.to_string(),
            timestamp: None,
            message,
            measurement,
            metrics: HashSet::new(),
        }
    }

    pub fn add_metric(&mut self, metric: Metric) {
        self.metrics.insert(metric);
    }
}

/// One filter constraint of a time-series query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    /// Field name, taken from the filter property's local name.
    pub field: String,
    /// Filter value.
    pub value: String,
    /// Datatype name derived from the literal's datatype IRI.
    pub datatype: String,
}

/// A time-series query descriptor. Only present on query-content messages;
/// unfiltered queries are rejected at projection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQuery {
    /// Semantic link to the message root concept instance.
    #[serde(with = "iri_serde")]
    pub message: NamedNode,
    /// Name of the measurement container to query.
    pub measurement_name: String,
    /// Filters to apply to the measurement, never empty on a built message.
    pub filters: Vec<QueryFilter>,
}

impl TimeSeriesQuery {
    pub fn new(message: NamedNode) -> Self {
        Self {
            message,
            measurement_name: vocab::DEFAULT_MEASUREMENT.to_string(),
            filters: Vec::new(),
        }
    }

    pub fn add_filter(&mut self, filter: QueryFilter) {
        self.filters.push(filter);
    }
}
