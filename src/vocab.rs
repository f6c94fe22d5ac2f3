//! Reserved message vocabulary.
//!
//! Every IRI here is part of the wire contract between message producers and
//! the downstream stores; the values must not change.

use oxrdf::vocab::rdf;
use oxrdf::NamedNodeRef;

/// Namespace under which all message concepts and materialized nodes live.
pub const PROVEN_MESSAGE_NS: &str = "http://proven.pnnl.gov/proven-message#";

/// Type resource identifying the message root node.
pub const PROVEN_MESSAGE_RES: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#ProvenMessage");

/// Type resource identifying a time-series measurement node.
pub const PROVEN_MEASUREMENT_RES: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#Measurement");

/// Type resource identifying the query filter node of a query message.
pub const PROVEN_QUERY_FILTER_RES: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#QueryFilter");

/// `rdf:type`.
pub const RDF_TYPE_PROP: NamedNodeRef<'static> = rdf::TYPE;

/// Presence of this predicate classifies a message as query content.
pub const QUERY_TYPE_PROP: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#hasQueryType");

/// Content classification literal attached to the message root.
pub const MESSAGE_CONTENT_PROP: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#hasMessageContent");

/// Measurement name property.
pub const NAME_PROP: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#hasName");

/// Measurement timestamp property.
pub const TIMESTAMP_PROP: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#hasTimestamp");

/// Measurement name of a time-series query.
pub const QUERY_MEASUREMENT_PROP: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://proven.pnnl.gov/proven-message#hasQueryMeasurement");

/// Datatype IRI prefix marking a literal as a time-series field metric.
pub const TIME_SERIES_FIELD_DT: &str = "http://proven.pnnl.gov/proven-message#TimeSeriesField";

/// Datatype IRI prefix marking a literal as a time-series tag (metadata) metric.
pub const TIME_SERIES_TAG_DT: &str = "http://proven.pnnl.gov/proven-message#TimeSeriesTag";

/// First accepted timestamp format: ISO-8601 with milliseconds and 'Z'.
pub const DATE_FORMAT_1: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Second accepted timestamp format: space-separated date/time with microseconds.
pub const DATE_FORMAT_2: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Default measurement container name, used when the message provides none.
pub const DEFAULT_MEASUREMENT: &str = "PROVEN_MEASUREMENT";

/// Delimiter between the parts of a message grid key.
pub const MESSAGE_KEY_DELIMITER: &str = "^||^";
