//! Template rendering: context construction, the renderer boundary, and the
//! built-in template set.

pub mod builtin;
pub mod context;
pub mod renderer;

pub use context::{GENERATOR_NAME, Provenance, RenderContext};
pub use renderer::{TemplateRenderer, TeraRenderer};
