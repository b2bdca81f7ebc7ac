//! Artifact Emitter
//!
//! Renders every planned artifact in memory, then hands the whole batch to
//! [`SafeCodeWriter`]. A render failure therefore writes nothing.

use super::artifact::{ArtifactKind, ArtifactPlan, PlannedArtifact};
use super::manifest::compute_string_hash;
use super::writer::{PendingFile, SafeCodeWriter};
use crate::error::{GenerateError, RenderError};
use crate::template::{RenderContext, TemplateRenderer};
use serde::Serialize;
use std::path::PathBuf;

/// A planned artifact with its rendered text.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub planned: PlannedArtifact,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub template: &'static str,
    pub sha256: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitReport {
    /// Nothing was written
    pub dry_run: bool,
    pub artifacts: Vec<EmittedArtifact>,
}

impl EmitReport {
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.artifacts.iter().map(|a| &a.path)
    }
}

pub struct ArtifactEmitter<'r, R: TemplateRenderer + ?Sized> {
    renderer: &'r R,
    writer: SafeCodeWriter,
    dry_run: bool,
}

impl<'r, R: TemplateRenderer + ?Sized> ArtifactEmitter<'r, R> {
    pub fn new(renderer: &'r R) -> Self {
        Self {
            renderer,
            writer: SafeCodeWriter::new(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_writer(mut self, writer: SafeCodeWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Render one artifact against the root context.
    pub fn render(
        &self,
        artifact: &PlannedArtifact,
        root: &RenderContext,
    ) -> Result<RenderedArtifact, RenderError> {
        let ctx = root.for_artifact(artifact.template, &artifact.file_name, artifact.repr.as_ref())?;
        let content = self.renderer.render(artifact.template, &ctx)?;
        tracing::debug!(
            kind = %artifact.kind,
            template = artifact.template,
            bytes = content.len(),
            "rendered artifact"
        );
        Ok(RenderedArtifact {
            planned: artifact.clone(),
            content,
        })
    }

    pub fn render_all(
        &self,
        plan: &ArtifactPlan,
        root: &RenderContext,
    ) -> Result<Vec<RenderedArtifact>, RenderError> {
        plan.artifacts
            .iter()
            .map(|artifact| self.render(artifact, root))
            .collect()
    }

    /// Render the plan and, unless in dry-run mode, write it.
    pub fn emit(&self, plan: &ArtifactPlan, root: &RenderContext) -> Result<EmitReport, GenerateError> {
        let rendered = self.render_all(plan, root)?;

        let artifacts: Vec<EmittedArtifact> = rendered
            .iter()
            .map(|r| EmittedArtifact {
                kind: r.planned.kind,
                path: r.planned.path.clone(),
                template: r.planned.template,
                sha256: compute_string_hash(&r.content),
                bytes: r.content.len(),
            })
            .collect();

        if self.dry_run {
            for artifact in &artifacts {
                tracing::info!(path = %artifact.path.display(), "dry run: would write");
            }
            return Ok(EmitReport {
                dry_run: true,
                artifacts,
            });
        }

        for dir in plan.layout.directories() {
            self.writer.prepare_dir(dir)?;
        }
        let files: Vec<PendingFile> = rendered
            .into_iter()
            .map(|r| PendingFile::new(r.planned.path, r.content))
            .collect();
        self.writer.write_all(&files)?;

        tracing::info!(count = artifacts.len(), "emitted artifacts");
        Ok(EmitReport {
            dry_run: false,
            artifacts,
        })
    }
}
