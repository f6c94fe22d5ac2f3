//! Message model bundle.
//!
//! A model directory carries a registry file listing the model resources: one
//! JSON-LD context, one or more ontology files, and one or more shapes files.
//! The bundle is loaded once at process start and injected, read-only, into
//! every build.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{MessageError, Result};
use crate::graph::TripleGraph;
use crate::parsing;

/// Name of the registry file inside a model directory.
pub const MODEL_REGISTRY_FILE: &str = "model-files";

/// Classification of one registry entry by resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFileKind {
    /// JSON-LD context file (`*.context`).
    Context,
    /// Ontology file (`*.jsonld`, not shapes).
    Ontology,
    /// SHACL shapes file (`*.shapes.jsonld`).
    Shapes,
}

impl ModelFileKind {
    /// Classifies a resource name, `None` for unrecognized names.
    pub fn classify(name: &str) -> Option<Self> {
        if name.ends_with(".context") {
            Some(ModelFileKind::Context)
        } else if name.ends_with(".shapes.jsonld") {
            Some(ModelFileKind::Shapes)
        } else if name.ends_with(".jsonld") {
            Some(ModelFileKind::Ontology)
        } else {
            None
        }
    }
}

impl fmt::Display for ModelFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFileKind::Context => write!(f, "context"),
            ModelFileKind::Ontology => write!(f, "ontology"),
            ModelFileKind::Shapes => write!(f, "shapes"),
        }
    }
}

/// The loaded, immutable model bundle.
#[derive(Debug, Clone)]
pub struct MessageModel {
    context: String,
    ontology: TripleGraph,
    shapes: TripleGraph,
}

impl MessageModel {
    /// Loads a model bundle from a directory containing the registry file
    /// and the resources it lists.
    ///
    /// # Errors
    ///
    /// Cardinality violations map to distinct variants: no context, multiple
    /// contexts, no ontology, no shapes. Unreadable resources map to
    /// [`MessageError::ModelLoad`] naming the resource.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let registry = read_resource(dir, MODEL_REGISTRY_FILE)?;

        let mut context: Option<String> = None;
        let mut context_count = 0usize;
        let mut ontology_sources: Vec<String> = Vec::new();
        let mut shapes_sources: Vec<String> = Vec::new();

        for name in registry.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some(kind) = ModelFileKind::classify(name) else {
                debug!(resource = name, "ignoring unrecognized model resource");
                continue;
            };
            let content = read_resource(dir, name)?;
            debug!(resource = name, %kind, "loaded model resource");
            match kind {
                ModelFileKind::Context => {
                    context_count += 1;
                    context = Some(content);
                }
                ModelFileKind::Ontology => ontology_sources.push(content),
                ModelFileKind::Shapes => shapes_sources.push(content),
            }
        }

        let context = match context_count {
            0 => return Err(MessageError::MissingModelContext),
            1 => context.unwrap_or_default(),
            _ => return Err(MessageError::MultipleModelContext),
        };
        if ontology_sources.is_empty() {
            return Err(MessageError::MissingModelOntology);
        }
        if shapes_sources.is_empty() {
            return Err(MessageError::MissingModelShapes);
        }

        let mut ontology = TripleGraph::new();
        for source in &ontology_sources {
            ontology.union(parsing::parse_json_ld(source)?);
        }
        // Shapes evaluation sees the ontology facts as well.
        let mut shapes = ontology.clone();
        for source in &shapes_sources {
            shapes.union(parsing::parse_json_ld(source)?);
        }

        Ok(Self { context, ontology, shapes })
    }

    /// Assembles a bundle directly from its parts. Intended for tests and
    /// embedders that do not load from a directory.
    pub fn from_parts(
        context: impl Into<String>,
        ontology: TripleGraph,
        shapes: TripleGraph,
    ) -> Self {
        Self { context: context.into(), ontology, shapes }
    }

    /// Raw JSON-LD context text, spliced into each message before parsing.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Ontology triples.
    pub fn ontology(&self) -> &TripleGraph {
        &self.ontology
    }

    /// Shapes triples, including the ontology union.
    pub fn shapes(&self) -> &TripleGraph {
        &self.shapes
    }
}

fn read_resource(dir: &Path, name: &str) -> Result<String> {
    fs::read_to_string(dir.join(name)).map_err(|source| MessageError::ModelLoad {
        resource: name.to_string(),
        source,
    })
}
