//! Message document parsing.
//!
//! Messages arrive as JSON-LD text without their context; the model context
//! is spliced in before expansion. Expansion covers the subset of JSON-LD the
//! message dialect uses: term and prefix definitions, `@vocab`, datatype and
//! IRI coercion, `@id`, `@type`, `@value` objects, arrays, and a top-level
//! `@graph`. Unmapped keys are skipped.

use std::collections::HashMap;

use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MessageError, Result};
use crate::graph::TripleGraph;
use crate::vocab;

/// Splices the model context into a raw message document, immediately after
/// the document's first opening brace.
pub fn prepend_context(context: &str, message: &str) -> String {
    message.replacen('{', &format!("{{{context}"), 1)
}

/// Expands a JSON-LD document into a triple graph.
pub fn parse_json_ld(text: &str) -> Result<TripleGraph> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| MessageError::Parse(e.to_string()))?;
    let Value::Object(root) = doc else {
        return Err(MessageError::Parse("document is not a JSON object".to_string()));
    };

    let context = Context::from_value(root.get("@context"))?;
    let mut graph = TripleGraph::new();

    match root.get("@graph") {
        Some(Value::Array(nodes)) => {
            for node in nodes {
                let Value::Object(obj) = node else {
                    return Err(MessageError::Parse(
                        "@graph entries must be objects".to_string(),
                    ));
                };
                expand_node(obj, &context, &mut graph)?;
            }
        }
        Some(other) => {
            return Err(MessageError::Parse(format!("@graph must be an array, got {other}")));
        }
        None => {
            expand_node(&root, &context, &mut graph)?;
        }
    }

    Ok(graph)
}

/// One term of the active context.
#[derive(Debug, Clone)]
struct TermDefinition {
    iri: String,
    coercion: Option<Coercion>,
}

/// Value coercion requested by a term's `@type` entry.
#[derive(Debug, Clone)]
enum Coercion {
    /// `"@type": "@id"` — string values are IRIs.
    Id,
    /// Any other `@type` — string values are literals of this datatype.
    Datatype(String),
}

/// The active `@context`: term definitions plus an optional default vocabulary.
#[derive(Debug, Default)]
struct Context {
    vocab: Option<String>,
    terms: HashMap<String, TermDefinition>,
}

impl Context {
    fn from_value(value: Option<&Value>) -> Result<Self> {
        let mut ctx = Context::default();
        let Some(value) = value else { return Ok(ctx) };
        let Value::Object(entries) = value else {
            return Err(MessageError::Parse("@context must be an object".to_string()));
        };

        for (key, entry) in entries {
            if key == "@vocab" {
                match entry.as_str() {
                    Some(v) => ctx.vocab = Some(v.to_string()),
                    None => {
                        return Err(MessageError::Parse("@vocab must be a string".to_string()))
                    }
                }
                continue;
            }
            match entry {
                Value::String(iri) => {
                    ctx.terms.insert(
                        key.clone(),
                        TermDefinition { iri: iri.clone(), coercion: None },
                    );
                }
                Value::Object(def) => {
                    let iri = def
                        .get("@id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            MessageError::Parse(format!("term '{key}' has no @id"))
                        })?
                        .to_string();
                    let coercion = match def.get("@type").and_then(Value::as_str) {
                        Some("@id") => Some(Coercion::Id),
                        Some(dt) => Some(Coercion::Datatype(dt.to_string())),
                        None => None,
                    };
                    ctx.terms.insert(key.clone(), TermDefinition { iri, coercion });
                }
                other => {
                    return Err(MessageError::Parse(format!(
                        "unsupported @context entry for '{key}': {other}"
                    )));
                }
            }
        }
        Ok(ctx)
    }

    /// Expands a document token (key, `@id` value, or `@type` value) into a
    /// full IRI. `None` means the token has no mapping.
    fn expand_iri(&self, token: &str) -> Option<String> {
        if token.starts_with('@') {
            return None;
        }
        if token.contains("://") || token.starts_with("urn:") {
            return Some(token.to_string());
        }
        if let Some((prefix, suffix)) = token.split_once(':') {
            if let Some(def) = self.terms.get(prefix) {
                return Some(format!("{}{}", self.resolve(&def.iri), suffix));
            }
        }
        if let Some(def) = self.terms.get(token) {
            return Some(self.resolve(&def.iri));
        }
        self.vocab.as_ref().map(|v| format!("{v}{token}"))
    }

    /// Resolves a term's mapping, which may itself be compact.
    fn resolve(&self, mapping: &str) -> String {
        if mapping.contains("://") || mapping.starts_with("urn:") {
            return mapping.to_string();
        }
        if let Some((prefix, suffix)) = mapping.split_once(':') {
            if let Some(def) = self.terms.get(prefix) {
                if def.iri.contains("://") {
                    return format!("{}{}", def.iri, suffix);
                }
            }
        }
        match &self.vocab {
            Some(v) => format!("{v}{mapping}"),
            None => mapping.to_string(),
        }
    }

    fn coercion_for(&self, key: &str) -> Option<&Coercion> {
        self.terms.get(key).and_then(|def| def.coercion.as_ref())
    }
}

/// Expands one node object into triples, returning the node's subject so
/// parents can reference it.
fn expand_node(
    obj: &Map<String, Value>,
    ctx: &Context,
    graph: &mut TripleGraph,
) -> Result<Subject> {
    let subject: Subject = match obj.get("@id").and_then(Value::as_str) {
        Some(id) => {
            let iri = ctx
                .expand_iri(id)
                .ok_or_else(|| MessageError::Parse(format!("cannot expand @id '{id}'")))?;
            NamedNode::new(iri)?.into()
        }
        None => BlankNode::default().into(),
    };

    for (key, value) in obj {
        match key.as_str() {
            "@context" | "@id" => {}
            "@type" => {
                for token in string_values(value) {
                    let iri = ctx.expand_iri(token).ok_or_else(|| {
                        MessageError::Parse(format!("cannot expand @type '{token}'"))
                    })?;
                    graph.insert(Triple::new(
                        subject.clone(),
                        vocab::RDF_TYPE_PROP.into_owned(),
                        NamedNode::new(iri)?,
                    ));
                }
            }
            _ => {
                let Some(pred_iri) = ctx.expand_iri(key) else {
                    debug!(%key, "skipping unmapped key");
                    continue;
                };
                let predicate = NamedNode::new(pred_iri)?;
                expand_value(&subject, &predicate, value, ctx.coercion_for(key), ctx, graph)?;
            }
        }
    }
    Ok(subject)
}

/// Expands one property value into triples under `(subject, predicate, _)`.
fn expand_value(
    subject: &Subject,
    predicate: &NamedNode,
    value: &Value,
    coercion: Option<&Coercion>,
    ctx: &Context,
    graph: &mut TripleGraph,
) -> Result<()> {
    let object: Term = match value {
        Value::Null => return Ok(()),
        Value::Array(items) => {
            for item in items {
                expand_value(subject, predicate, item, coercion, ctx, graph)?;
            }
            return Ok(());
        }
        Value::Object(obj) => {
            if let Some(lexical) = obj.get("@value") {
                value_literal(lexical, obj.get("@type").and_then(Value::as_str), ctx)?.into()
            } else {
                match expand_node(obj, ctx, graph)? {
                    Subject::NamedNode(n) => n.into(),
                    Subject::BlankNode(b) => b.into(),
                }
            }
        }
        Value::String(s) => match coercion {
            Some(Coercion::Id) => {
                let iri = ctx
                    .expand_iri(s)
                    .ok_or_else(|| MessageError::Parse(format!("cannot expand IRI '{s}'")))?;
                NamedNode::new(iri)?.into()
            }
            Some(Coercion::Datatype(dt)) => {
                let dt_iri = ctx
                    .expand_iri(dt)
                    .ok_or_else(|| MessageError::Parse(format!("cannot expand datatype '{dt}'")))?;
                Literal::new_typed_literal(s.as_str(), NamedNode::new(dt_iri)?).into()
            }
            None => Literal::new_simple_literal(s.as_str()).into(),
        },
        Value::Number(n) => {
            let datatype = if n.is_i64() || n.is_u64() { xsd::INTEGER } else { xsd::DOUBLE };
            Literal::new_typed_literal(n.to_string(), datatype).into()
        }
        Value::Bool(b) => Literal::new_typed_literal(b.to_string(), xsd::BOOLEAN).into(),
    };

    graph.insert(Triple::new(subject.clone(), predicate.clone(), object));
    Ok(())
}

/// Builds a literal from an `@value` object.
fn value_literal(lexical: &Value, datatype: Option<&str>, ctx: &Context) -> Result<Literal> {
    let text = match lexical {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(MessageError::Parse(format!("unsupported @value: {other}")));
        }
    };
    match datatype {
        Some(dt) => {
            let dt_iri = ctx
                .expand_iri(dt)
                .ok_or_else(|| MessageError::Parse(format!("cannot expand datatype '{dt}'")))?;
            Ok(Literal::new_typed_literal(text, NamedNode::new(dt_iri)?))
        }
        None => Ok(Literal::new_simple_literal(text)),
    }
}

/// Yields the string members of a scalar-or-array value.
fn string_values(value: &Value) -> impl Iterator<Item = &str> {
    let slice = match value {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    slice.iter().filter_map(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::TermRef;

    const NS: &str = "http://proven.pnnl.gov/proven-message#";

    fn named(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    #[test]
    fn test_prepend_context_splices_after_first_brace() {
        let context = r#""@context": {"@vocab": "http://x/"},"#;
        let message = r#"{"a": {"b": 1}}"#;
        let combined = prepend_context(context, message);
        assert_eq!(combined, r#"{"@context": {"@vocab": "http://x/"},"a": {"b": 1}}"#);
    }

    #[test]
    fn test_vocab_and_term_expansion() {
        let doc = format!(
            r#"{{
                "@context": {{
                    "@vocab": "{NS}",
                    "prov": "{NS}",
                    "name": "prov:hasName"
                }},
                "@id": "prov:m1",
                "@type": "Measurement",
                "name": "m1"
            }}"#
        );
        let graph = parse_json_ld(&doc).unwrap();
        assert_eq!(graph.len(), 2);

        let subject = named(&format!("{NS}m1"));
        assert_eq!(
            graph
                .matching(
                    Some(subject.as_ref().into()),
                    Some(crate::vocab::RDF_TYPE_PROP),
                    Some(named(&format!("{NS}Measurement")).as_ref().into()),
                )
                .count(),
            1
        );
        let has_name = named(&format!("{NS}hasName"));
        let names: Vec<_> = graph.matching(None, Some(has_name.as_ref()), None).collect();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].object.as_ref(), TermRef::from(Literal::new_simple_literal("m1").as_ref()));
    }

    #[test]
    fn test_anonymous_nodes_and_nesting() {
        let doc = format!(
            r#"{{
                "@context": {{"@vocab": "{NS}"}},
                "hasMeasurement": {{"hasName": "inner"}}
            }}"#
        );
        let graph = parse_json_ld(&doc).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.has_anonymous_nodes());
    }

    #[test]
    fn test_datatype_and_id_coercion() {
        let doc = format!(
            r#"{{
                "@context": {{
                    "@vocab": "{NS}",
                    "val": {{"@id": "{NS}hasValue", "@type": "{NS}TimeSeriesField:val::Integer"}},
                    "ref": {{"@id": "{NS}hasRef", "@type": "@id"}}
                }},
                "@id": "{NS}n1",
                "val": "7",
                "ref": "{NS}n2"
            }}"#
        );
        let graph = parse_json_ld(&doc).unwrap();

        let has_value = named(&format!("{NS}hasValue"));
        let vals: Vec<_> = graph.matching(None, Some(has_value.as_ref()), None).collect();
        assert_eq!(vals.len(), 1);
        match &vals[0].object {
            Term::Literal(lit) => {
                assert_eq!(lit.value(), "7");
                assert_eq!(lit.datatype().as_str(), format!("{NS}TimeSeriesField:val::Integer"));
            }
            other => panic!("expected typed literal, got {other}"),
        }

        let has_ref = named(&format!("{NS}hasRef"));
        let refs: Vec<_> = graph.matching(None, Some(has_ref.as_ref()), None).collect();
        assert_eq!(refs.len(), 1);
        assert!(matches!(refs[0].object, Term::NamedNode(_)));
    }

    #[test]
    fn test_scalar_datatypes_and_arrays() {
        let doc = format!(
            r#"{{
                "@context": {{"@vocab": "{NS}"}},
                "@id": "{NS}n1",
                "count": 3,
                "ratio": 0.5,
                "active": true,
                "tags": ["a", "b"],
                "absent": null
            }}"#
        );
        let graph = parse_json_ld(&doc).unwrap();
        assert_eq!(graph.len(), 5);

        let count_pred = named(&format!("{NS}count"));
        let count: Vec<_> = graph.matching(None, Some(count_pred.as_ref()), None).collect();
        match &count[0].object {
            Term::Literal(lit) => assert_eq!(lit.datatype(), xsd::INTEGER),
            other => panic!("expected integer literal, got {other}"),
        }
        assert_eq!(
            graph.matching(None, Some(named(&format!("{NS}tags")).as_ref()), None).count(),
            2
        );
    }

    #[test]
    fn test_top_level_graph_array() {
        let doc = format!(
            r#"{{
                "@context": {{"@vocab": "{NS}"}},
                "@graph": [
                    {{"@id": "{NS}a", "p": "1"}},
                    {{"@id": "{NS}b", "p": "2"}}
                ]
            }}"#
        );
        let graph = parse_json_ld(&doc).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_unmapped_key_is_skipped() {
        let doc = r#"{"@id": "http://example.org/n", "unmapped": "x"}"#;
        let graph = parse_json_ld(doc).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        match parse_json_ld("{not json") {
            Err(MessageError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
