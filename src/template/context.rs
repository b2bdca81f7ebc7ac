//! Render context
//!
//! The context mapping handed to the template engine. One root context is
//! built per run from the [`NormalizedFacet`]; each artifact renders with a
//! child that adds only artifact-specific keys (output name, template name,
//! and for representation headers the `repr` entry).

use crate::error::RenderError;
use crate::normalize::{NormalizedFacet, NormalizedRepr};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tera::Context;

/// Name recorded as the code generator in artifact headers.
pub const GENERATOR_NAME: &str = "genfacet";

/// Where a run's inputs came from, recorded in every artifact header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Generator identification, e.g. `genfacet 0.3.0`
    pub generator: String,
    /// IDL path as given on the command line
    pub idl_path: String,
}

impl Provenance {
    pub fn new(idl_path: impl Into<String>) -> Self {
        Self {
            generator: format!("{} {}", GENERATOR_NAME, env!("CARGO_PKG_VERSION")),
            idl_path: idl_path.into(),
        }
    }
}

/// Variables visible to a template.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    context: Context,
    variables: BTreeMap<String, JsonValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root context for a normalized facet.
    pub fn for_facet(facet: &NormalizedFacet, provenance: &Provenance) -> Result<Self, RenderError> {
        let mut ctx = Self::new();
        ctx.insert("generator", &provenance.generator)?;
        ctx.insert("idl_path", &provenance.idl_path)?;
        ctx.insert("names", &facet.names)?;
        ctx.insert("facet", &facet.names.facet)?;
        ctx.insert("namespace1", &facet.namespaces.outer)?;
        ctx.insert("namespace2", &facet.namespaces.inner)?;
        ctx.insert("brief", &facet.brief)?;
        ctx.insert("doc", &facet.doc)?;
        ctx.insert("includes", &facet.includes)?;
        ctx.insert("using_doxygen", &facet.embed_doc_markup)?;
        ctx.insert("types", &facet.types)?;
        ctx.insert("const_methods", &facet.const_methods)?;
        ctx.insert("nonconst_methods", &facet.nonconst_methods)?;
        ctx.insert("reprs", &facet.reprs)?;
        Ok(ctx)
    }

    /// Child context for one artifact.
    pub fn for_artifact(
        &self,
        template_name: &str,
        output_name: &str,
        repr: Option<&NormalizedRepr>,
    ) -> Result<Self, RenderError> {
        let mut child = self.clone();
        child.insert("template_name", &template_name)?;
        child.insert("output_name", &output_name)?;
        if let Some(repr) = repr {
            child.insert("repr", repr)?;
        }
        Ok(child)
    }

    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), RenderError> {
        let json_value = serde_json::to_value(value).map_err(|e| RenderError::Context {
            message: format!("failed to serialize value for key '{key}': {e}"),
        })?;
        self.context.insert(key, &json_value);
        self.variables.insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn tera_context(&self) -> &Context {
        &self.context
    }
}
