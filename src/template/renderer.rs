//! Template Renderer
//!
//! [`TemplateRenderer`] is the boundary the emitter depends on: a template
//! identifier plus a [`RenderContext`] in, text out. [`TeraRenderer`] is the
//! implementation; it exposes a [`SignatureFormatter`] to templates as the
//! functions `qualifiers`, `arglist`, `arglist_drop_first`,
//! `argnames_forward` and `argnames_route`, plus the `doc_continue` filter
//! that carries a comment prefix onto every line of a multi-line doc block.
//!
//! Undefined variables and bad function arguments fail the render.

use super::builtin::BUILTIN_TEMPLATES;
use super::context::RenderContext;
use crate::error::RenderError;
use crate::format::SignatureFormatter;
use crate::idl::schema::{Param, Qualifiers};
use std::collections::HashMap;
use std::error::Error as _;
use std::path::Path;
use std::sync::Arc;
use tera::{Tera, Value};

/// Produces text for a template identifier and a context.
pub trait TemplateRenderer {
    fn render(&self, template_name: &str, context: &RenderContext) -> Result<String, RenderError>;

    fn has_template(&self, template_name: &str) -> bool;
}

/// Tera-backed renderer.
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Renderer over the built-in template set.
    pub fn builtin(formatter: Arc<dyn SignatureFormatter>) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .map_err(|e| RenderError::TemplateLoad {
                dir: "<builtin>".into(),
                message: describe(&e),
            })?;
        register_formatter(&mut tera, formatter);
        register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Renderer over `dir/**/*.tera`; built-in templates fill in any
    /// identifier the directory does not provide.
    pub fn from_directory(
        dir: &Path,
        formatter: Arc<dyn SignatureFormatter>,
    ) -> Result<Self, RenderError> {
        if !dir.is_dir() {
            return Err(RenderError::TemplateLoad {
                dir: dir.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }
        let pattern = dir.join("**").join("*.tera");
        let pattern = pattern.to_str().ok_or_else(|| RenderError::TemplateLoad {
            dir: dir.to_path_buf(),
            message: "path is not valid UTF-8".to_string(),
        })?;
        let mut tera = Tera::new(pattern).map_err(|e| RenderError::TemplateLoad {
            dir: dir.to_path_buf(),
            message: describe(&e),
        })?;
        let overridden = tera.get_template_names().count();

        let builtin = Self::builtin(formatter.clone())?;
        tera.extend(&builtin.tera).map_err(|e| RenderError::TemplateLoad {
            dir: dir.to_path_buf(),
            message: describe(&e),
        })?;
        register_formatter(&mut tera, formatter);
        register_filters(&mut tera);

        tracing::info!(dir = %dir.display(), overridden, "loaded template directory");
        Ok(Self { tera })
    }

    /// Add or replace a template from source text.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), RenderError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| RenderError::Render {
                name: name.to_string(),
                message: describe(&e),
            })
    }

    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(str::to_string).collect();
        names.sort();
        names
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template_name: &str, context: &RenderContext) -> Result<String, RenderError> {
        if !self.has_template(template_name) {
            return Err(RenderError::TemplateNotFound {
                name: template_name.to_string(),
            });
        }
        self.tera
            .render(template_name, context.tera_context())
            .map_err(|e| RenderError::Render {
                name: template_name.to_string(),
                message: describe(&e),
            })
    }

    fn has_template(&self, template_name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == template_name)
    }
}

// =============================================================================
// Formatter functions
// =============================================================================

fn register_formatter(tera: &mut Tera, formatter: Arc<dyn SignatureFormatter>) {
    let f = formatter.clone();
    tera.register_function("qualifiers", move |args: &HashMap<String, Value>| {
        let q: Qualifiers = typed_arg(args, "qualifiers", "q")?;
        Ok(Value::String(f.qualifiers(&q)))
    });

    let f = formatter.clone();
    tera.register_function("arglist", move |args: &HashMap<String, Value>| {
        let params: Vec<Param> = typed_arg(args, "arglist", "params")?;
        let with_names = bool_arg(args, "arglist", "with_names")?;
        Ok(Value::String(f.arglist(&params, with_names)))
    });

    let f = formatter.clone();
    tera.register_function("arglist_drop_first", move |args: &HashMap<String, Value>| {
        let params: Vec<Param> = typed_arg(args, "arglist_drop_first", "params")?;
        let with_names = bool_arg(args, "arglist_drop_first", "with_names")?;
        Ok(Value::String(f.arglist_drop_first(&params, with_names)))
    });

    let f = formatter.clone();
    tera.register_function("argnames_forward", move |args: &HashMap<String, Value>| {
        let params: Vec<Param> = typed_arg(args, "argnames_forward", "params")?;
        let cast_receiver = bool_arg(args, "argnames_forward", "cast_receiver")?;
        Ok(Value::String(f.argnames_forward(&params, cast_receiver)))
    });

    let f = formatter;
    tera.register_function("argnames_route", move |args: &HashMap<String, Value>| {
        let params: Vec<Param> = typed_arg(args, "argnames_route", "params")?;
        Ok(Value::String(f.argnames_route(&params)))
    });
}

// =============================================================================
// Filters
// =============================================================================

fn register_filters(tera: &mut Tera) {
    tera.register_filter("doc_continue", doc_continue);
}

/// `{{ doc | doc_continue(prefix="     *  ") }}`: every line after the first
/// starts with `prefix`.
fn doc_continue(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("filter `doc_continue` expects a string"))?;
    let prefix = required(args, "doc_continue", "prefix")?
        .as_str()
        .ok_or_else(|| tera::Error::msg("filter `doc_continue`: argument `prefix` must be a string"))?;
    let separator = format!("\n{prefix}");
    Ok(Value::String(text.lines().collect::<Vec<_>>().join(&separator)))
}

fn required<'a>(args: &'a HashMap<String, Value>, function: &str, name: &str) -> tera::Result<&'a Value> {
    args.get(name)
        .ok_or_else(|| tera::Error::msg(format!("function `{function}` requires argument `{name}`")))
}

fn typed_arg<T: serde::de::DeserializeOwned>(
    args: &HashMap<String, Value>,
    function: &str,
    name: &str,
) -> tera::Result<T> {
    let value = required(args, function, name)?;
    serde_json::from_value(value.clone()).map_err(|e| {
        tera::Error::msg(format!("function `{function}`: argument `{name}` is malformed: {e}"))
    })
}

fn bool_arg(args: &HashMap<String, Value>, function: &str, name: &str) -> tera::Result<bool> {
    required(args, function, name)?.as_bool().ok_or_else(|| {
        tera::Error::msg(format!("function `{function}`: argument `{name}` must be a boolean"))
    })
}

/// Tera keeps the useful part of a failure in the source chain.
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
