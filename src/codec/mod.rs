//! Metric encoding carried in literal datatype IRIs.
//!
//! A producer marks a literal as a time-series metric by giving it a
//! datatype IRI whose fragment starts with the reserved field or tag kind.
//! The fragment is a colon-separated descriptor:
//!
//! ```text
//! #TimeSeriesField                     field metric, String type
//! #TimeSeriesTag:region                tag metric labelled "region"
//! #TimeSeriesField:val::Integer        field "val" typed Integer
//! #TimeSeriesField:count::Derive       field "count", type probed from value
//! ```
//!
//! Position 0 is the kind, position 1 (when non-empty) overrides the metric
//! label, and the final position (when more than two are present) names the
//! value type. A missing label falls back to the predicate local name; a
//! missing value type falls back to String; the `Derive` sentinel probes the
//! lexical value instead.

use oxrdf::{LiteralRef, NamedNodeRef};
use tracing::trace;

use crate::core::{Metric, MetricValueType};
use crate::vocab;

/// Sentinel value-type name requesting lexical derivation.
const DERIVE: &str = "Derive";

/// Decodes a (predicate, literal) pair into a metric, when the literal's
/// datatype marks it as one. Returns `None` for ordinary literals.
pub fn decode_metric(predicate: NamedNodeRef<'_>, literal: LiteralRef<'_>) -> Option<Metric> {
    let datatype = literal.datatype();
    let is_metadata = if datatype.as_str().starts_with(vocab::TIME_SERIES_FIELD_DT) {
        false
    } else if datatype.as_str().starts_with(vocab::TIME_SERIES_TAG_DT) {
        true
    } else {
        return None;
    };

    let fragment = datatype.as_str().rsplit_once('#').map_or("", |(_, f)| f);
    let parts: Vec<&str> = fragment.split(':').collect();

    let label = match parts.get(1) {
        Some(override_label) if !override_label.is_empty() => (*override_label).to_string(),
        _ => local_name(predicate.as_str()).to_string(),
    };

    let value = literal.value();
    let value_type = match parts.last().filter(|name| parts.len() > 2 && !name.is_empty()) {
        Some(name) if *name == DERIVE => derive_value_type(value),
        Some(name) => MetricValueType::from_name(name).unwrap_or(MetricValueType::String),
        None => MetricValueType::String,
    };

    trace!(%label, %value, ?value_type, is_metadata, "decoded metric");
    Some(Metric { label, value: value.to_string(), is_metadata, value_type })
}

/// Derives a value type from a lexical value by probing progressively wider
/// representations. The probe order decides which type a value lands on, so
/// it must not be reordered.
pub fn derive_value_type(value: &str) -> MetricValueType {
    if value.parse::<i32>().is_ok() {
        MetricValueType::Integer
    } else if value.parse::<i64>().is_ok() {
        MetricValueType::Long
    } else if value.parse::<f32>().is_ok() {
        MetricValueType::Float
    } else if value.parse::<f64>().is_ok() {
        MetricValueType::Double
    } else if value.parse::<bool>().is_ok() {
        MetricValueType::Boolean
    } else {
        MetricValueType::String
    }
}

/// Local name of an IRI: the fragment when one exists, the final path
/// segment otherwise.
pub(crate) fn local_name(iri: &str) -> &str {
    match iri.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => iri.rsplit_once('/').map_or(iri, |(_, segment)| segment),
    }
}

/// Datatype name for query filters: the segment after a `::` separator when
/// present, the IRI fragment otherwise. `None` when the IRI carries neither.
pub(crate) fn filter_datatype_name(datatype_iri: &str) -> Option<&str> {
    match datatype_iri.split_once("::") {
        Some((_, name)) => Some(name),
        None => datatype_iri.rsplit_once('#').map(|(_, fragment)| fragment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode};

    fn metric_literal(value: &str, descriptor: &str) -> Literal {
        Literal::new_typed_literal(
            value,
            NamedNode::new(format!("{}{}", vocab::PROVEN_MESSAGE_NS, descriptor)).unwrap(),
        )
    }

    fn pred() -> NamedNode {
        NamedNode::new("http://example.org/sensor#temperature").unwrap()
    }

    #[test]
    fn test_plain_literal_is_not_a_metric() {
        let lit = Literal::new_simple_literal("hello");
        assert!(decode_metric(pred().as_ref(), lit.as_ref()).is_none());
    }

    #[test]
    fn test_field_with_label_and_type() {
        let lit = metric_literal("42", "TimeSeriesField:val::Integer");
        let metric = decode_metric(pred().as_ref(), lit.as_ref()).unwrap();
        assert_eq!(metric.label, "val");
        assert_eq!(metric.value, "42");
        assert!(!metric.is_metadata);
        assert_eq!(metric.value_type, MetricValueType::Integer);
    }

    #[test]
    fn test_bare_field_kind_uses_all_defaults() {
        let lit = metric_literal("12.5", "TimeSeriesField");
        let metric = decode_metric(pred().as_ref(), lit.as_ref()).unwrap();
        assert!(!metric.is_metadata);
        assert_eq!(metric.label, "temperature");
        assert_eq!(metric.value, "12.5");
        assert_eq!(metric.value_type, MetricValueType::String);
    }

    #[test]
    fn test_tag_label_defaults_to_predicate_local_name() {
        let lit = metric_literal("north", "TimeSeriesTag");
        let metric = decode_metric(pred().as_ref(), lit.as_ref()).unwrap();
        assert_eq!(metric.label, "temperature");
        assert!(metric.is_metadata);
        assert_eq!(metric.value_type, MetricValueType::String);
    }

    #[test]
    fn test_derive_sentinel_probes_the_value() {
        let lit = metric_literal("8589934592", "TimeSeriesField:count::Derive");
        let metric = decode_metric(pred().as_ref(), lit.as_ref()).unwrap();
        assert_eq!(metric.value_type, MetricValueType::Long);
    }

    #[test]
    fn test_derivation_order() {
        assert_eq!(derive_value_type("7"), MetricValueType::Integer);
        assert_eq!(derive_value_type("8589934592"), MetricValueType::Long);
        assert_eq!(derive_value_type("1.25"), MetricValueType::Float);
        assert_eq!(derive_value_type("true"), MetricValueType::Boolean);
        assert_eq!(derive_value_type("not a number"), MetricValueType::String);
    }

    #[test]
    fn test_local_name_forms() {
        assert_eq!(local_name("http://example.org/ns#temp"), "temp");
        assert_eq!(local_name("http://example.org/ns/temp"), "temp");
        assert_eq!(local_name("temp"), "temp");
    }

    #[test]
    fn test_filter_datatype_name() {
        assert_eq!(
            filter_datatype_name("http://example.org/ns#QueryFilter::Integer"),
            Some("Integer")
        );
        assert_eq!(
            filter_datatype_name("http://www.w3.org/2001/XMLSchema#string"),
            Some("string")
        );
        assert_eq!(filter_datatype_name("http://example.org/plain"), None);
    }
}
