//! Code Generation Module
//!
//! Maps a normalized facet to output files.
//!
//! ## Workflow
//!
//! ```text
//! NormalizedFacet → ArtifactPlan → render (all) → stage (all) → rename (all)
//! ```
//!
//! ## Modules
//!
//! - **artifact**: artifact kinds, profiles, output layout and the per-run plan
//! - **emitter**: renders a plan and hands it to the writer
//! - **writer**: `SafeCodeWriter`, two-phase atomic batch writes
//! - **manifest**: digest record of a run
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use facetgen::codegen::{ArtifactEmitter, ArtifactPlan, ArtifactProfile, OutputLayout};
//! use facetgen::format::CxxSignatureFormatter;
//! use facetgen::idl::load_schema;
//! use facetgen::normalize::normalize;
//! use facetgen::template::{Provenance, RenderContext, TeraRenderer};
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let facet = normalize(&load_schema(Path::new("idl/Sequence.json5"))?);
//! let plan = ArtifactPlan::new(
//!     &facet,
//!     ArtifactProfile::Full,
//!     OutputLayout::Single { dir: PathBuf::from("gen") },
//! );
//! let ctx = RenderContext::for_facet(&facet, &Provenance::new("idl/Sequence.json5"))?;
//! let renderer = TeraRenderer::builtin(Arc::new(CxxSignatureFormatter::default()))?;
//! let report = ArtifactEmitter::new(&renderer).emit(&plan, &ctx)?;
//! println!("wrote {} files", report.artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod emitter;
pub mod manifest;
pub mod writer;

pub use artifact::{ArtifactKind, ArtifactPlan, ArtifactProfile, OutputLayout, PlannedArtifact};
pub use emitter::{ArtifactEmitter, EmitReport, EmittedArtifact, RenderedArtifact};
pub use manifest::{GenerationManifest, ManifestEntry, compute_file_hash, compute_string_hash};
pub use writer::{PendingFile, SafeCodeWriter};
