pub mod codegen;
pub mod config;
pub mod error;
pub mod format;
pub mod idl;
pub mod logging;
pub mod normalize;
pub mod template;

pub use codegen::{ArtifactKind, ArtifactProfile, EmitReport, GenerationManifest, OutputLayout};
pub use config::{CliArgs, GeneratorConfig};
pub use error::{ErrorCode, GenerateError, LoadError, OutputError, RenderError, SchemaError, exit_code_for};
pub use format::{CxxSignatureFormatter, SignatureFormatter};
pub use logging::{LoggingConfig, init_logging};

use codegen::{ArtifactEmitter, ArtifactPlan, compute_file_hash};
use std::path::PathBuf;
use std::sync::Arc;
use template::{Provenance, RenderContext, TeraRenderer};

/// Outcome of a successful [`generate`] run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub facet: String,
    pub emit: EmitReport,
    /// Manifest location, when one was requested and written
    pub manifest: Option<PathBuf>,
}

/// Run the whole pipeline: load, normalize, render, write.
///
/// Every artifact is rendered before the first file is touched, so a failing
/// run before the write phase leaves the output directories unchanged.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport, GenerateError> {
    let span = tracing::info_span!("generate", input = %config.input.display(), profile = %config.profile);
    let _enter = span.enter();

    let schema = idl::load_schema(&config.input)?;
    tracing::info!(facet = %schema.facet, methods = schema.methods().count(), "loaded IDL");

    let facet = normalize::normalize(&schema);

    let formatter: Arc<dyn SignatureFormatter> = Arc::new(CxxSignatureFormatter::default());
    let renderer = match config.template_dir.as_deref() {
        Some(dir) => TeraRenderer::from_directory(dir, formatter)?,
        None => TeraRenderer::builtin(formatter)?,
    };

    let provenance = Provenance::new(config.input_display());
    let root = RenderContext::for_facet(&facet, &provenance)?;
    let plan = ArtifactPlan::new(&facet, config.profile, config.layout.clone());
    tracing::info!(artifacts = plan.len(), "planned artifacts");

    let emit = ArtifactEmitter::new(&renderer)
        .dry_run(config.dry_run)
        .emit(&plan, &root)?;

    let manifest = match config.manifest.as_ref() {
        Some(path) if !config.dry_run => {
            let idl_sha256 = compute_file_hash(&config.input).map_err(|source| LoadError::Unreadable {
                path: config.input.clone(),
                source,
            })?;
            GenerationManifest::new(
                &provenance.generator,
                &provenance.idl_path,
                idl_sha256,
                config.profile,
                &emit,
            )
            .save(path)?;
            Some(path.clone())
        }
        _ => None,
    };

    Ok(GenerationReport {
        facet: facet.names.facet,
        emit,
        manifest,
    })
}
