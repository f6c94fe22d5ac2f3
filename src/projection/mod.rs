//! Typed views over the enriched message graph.
//!
//! Projection runs after normalization and rule application, so every
//! function here assumes a graph without anonymous nodes. Each view walks
//! the graph independently: a flat statement list, the measurement set of an
//! explicit message, or the time-series query descriptor of a query message.

use chrono::NaiveDateTime;
use oxrdf::{NamedNode, Subject, Term};
use tracing::{debug, warn};

use crate::codec;
use crate::core::{Measurement, ObjectValueType, QueryFilter, Statement, TimeSeriesQuery};
use crate::error::{MessageError, Result};
use crate::graph::TripleGraph;
use crate::vocab;

/// Finds the message root: the single distinct subject typed as the message
/// resource. Duplicate identical type triples (the rules union re-asserts
/// facts) collapse to one candidate.
pub fn message_root(graph: &TripleGraph) -> Result<NamedNode> {
    let mut candidates: Vec<NamedNode> = Vec::new();
    for triple in graph.matching(
        None,
        Some(vocab::RDF_TYPE_PROP),
        Some(vocab::PROVEN_MESSAGE_RES.into()),
    ) {
        if let Subject::NamedNode(node) = &triple.subject {
            if !candidates.contains(node) {
                candidates.push(node.clone());
            }
        }
    }
    match candidates.len() {
        0 => Err(MessageError::MissingRootConcept),
        1 => Ok(candidates.remove(0)),
        _ => Err(MessageError::AmbiguousRoot(
            candidates.into_iter().map(|n| n.into_string()).collect(),
        )),
    }
}

/// Projects every triple into a flat statement. Anonymous nodes must already
/// have been materialized.
pub fn statements(graph: &TripleGraph) -> Result<Vec<Statement>> {
    let mut out = Vec::with_capacity(graph.len());
    for triple in graph.iter() {
        let subject = match &triple.subject {
            Subject::NamedNode(node) => node.clone(),
            Subject::BlankNode(anon) => {
                return Err(MessageError::Statements(format!(
                    "unexpected anonymous subject {anon}"
                )));
            }
        };
        let (object, object_value_type) = match &triple.object {
            Term::NamedNode(node) => (node.as_str().to_string(), ObjectValueType::Uri),
            Term::Literal(lit) => (lit.value().to_string(), ObjectValueType::Literal),
            Term::BlankNode(anon) => {
                return Err(MessageError::Statements(format!(
                    "unexpected anonymous object {anon}"
                )));
            }
        };
        out.push(Statement::new(subject, triple.predicate.clone(), object, object_value_type));
    }
    Ok(out)
}

/// Projects the measurement set of an explicit message. Every distinct
/// subject typed as a measurement yields one record; its direct literal
/// properties feed the metric codec.
pub fn measurements(graph: &TripleGraph, root: &NamedNode) -> Result<Vec<Measurement>> {
    let mut subjects: Vec<NamedNode> = Vec::new();
    for triple in graph.matching(
        None,
        Some(vocab::RDF_TYPE_PROP),
        Some(vocab::PROVEN_MEASUREMENT_RES.into()),
    ) {
        match &triple.subject {
            Subject::NamedNode(node) => {
                if !subjects.contains(node) {
                    subjects.push(node.clone());
                }
            }
            Subject::BlankNode(anon) => {
                return Err(MessageError::Measurements(format!(
                    "unexpected anonymous measurement subject {anon}"
                )));
            }
        }
    }

    let mut out = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let mut measurement = Measurement::new(root.clone(), subject.clone());
        for triple in graph.matching(Some(subject.as_ref().into()), None, None) {
            let Term::Literal(lit) = &triple.object else { continue };
            let predicate = triple.predicate.as_ref();
            if predicate == vocab::NAME_PROP {
                measurement.measurement_name = lit.value().to_string();
            } else if predicate == vocab::TIMESTAMP_PROP {
                measurement.timestamp = parse_timestamp(lit.value());
            } else if let Some(metric) = codec::decode_metric(predicate, lit.as_ref()) {
                measurement.add_metric(metric);
            }
        }
        debug!(measurement = %subject, metrics = measurement.metrics.len(), "projected measurement");
        out.push(measurement);
    }
    Ok(out)
}

/// Parses a measurement timestamp into epoch milliseconds: an integral
/// epoch-millis value first, then the two accepted date formats in order.
/// Unparseable timestamps are dropped with a warning.
pub(crate) fn parse_timestamp(value: &str) -> Option<i64> {
    if let Ok(millis) = value.parse::<i64>() {
        return Some(millis);
    }
    for format in [vocab::DATE_FORMAT_1, vocab::DATE_FORMAT_2] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    warn!(value, "unparseable measurement timestamp, dropping");
    None
}

/// Projects the time-series query descriptor of a query message.
pub fn time_series_query(graph: &TripleGraph, root: &NamedNode) -> Result<TimeSeriesQuery> {
    let mut query = TimeSeriesQuery::new(root.clone());

    // Last match wins when a message repeats the measurement name.
    for triple in graph.matching(None, Some(vocab::QUERY_MEASUREMENT_PROP), None) {
        if let Term::Literal(lit) = &triple.object {
            query.measurement_name = lit.value().to_string();
        }
    }

    let filter_node = graph
        .matching(
            None,
            Some(vocab::RDF_TYPE_PROP),
            Some(vocab::PROVEN_QUERY_FILTER_RES.into()),
        )
        .find_map(|triple| match &triple.subject {
            Subject::NamedNode(node) => Some(node.clone()),
            Subject::BlankNode(_) => None,
        });

    if let Some(filter_node) = filter_node {
        for triple in graph.matching(Some(filter_node.as_ref().into()), None, None) {
            let Term::Literal(lit) = &triple.object else { continue };
            let datatype = lit.datatype();
            let datatype_name =
                codec::filter_datatype_name(datatype.as_str()).ok_or_else(|| {
                    MessageError::Query(format!(
                        "cannot derive a datatype name from '{datatype}'"
                    ))
                })?;
            query.add_filter(QueryFilter {
                field: codec::local_name(triple.predicate.as_str()).to_string(),
                value: lit.value().to_string(),
                datatype: datatype_name.to_string(),
            });
        }
    }

    if query.filters.is_empty() {
        return Err(MessageError::UnfilteredQuery);
    }
    Ok(query)
}
