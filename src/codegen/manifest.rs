//! Generation manifest
//!
//! Records what a run produced: the IDL digest and, per artifact, its path,
//! template and content digest. No timestamps, so identical inputs give a
//! byte-identical manifest.

use super::artifact::{ArtifactKind, ArtifactProfile};
use super::emitter::EmitReport;
use super::writer::SafeCodeWriter;
use crate::error::OutputError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub template: String,
    pub sha256: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationManifest {
    pub generator: String,
    pub idl_path: String,
    pub idl_sha256: String,
    pub profile: ArtifactProfile,
    pub artifacts: Vec<ManifestEntry>,
}

impl GenerationManifest {
    pub fn new(
        generator: impl Into<String>,
        idl_path: impl Into<String>,
        idl_sha256: impl Into<String>,
        profile: ArtifactProfile,
        report: &EmitReport,
    ) -> Self {
        let artifacts = report
            .artifacts
            .iter()
            .map(|a| ManifestEntry {
                kind: a.kind,
                path: a.path.clone(),
                template: a.template.to_string(),
                sha256: a.sha256.clone(),
                bytes: a.bytes,
            })
            .collect();

        Self {
            generator: generator.into(),
            idl_path: idl_path.into(),
            idl_sha256: idl_sha256.into(),
            profile,
            artifacts,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        let json = self.to_json().map_err(|e| OutputError::Write {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        SafeCodeWriter::new().write(path, &json)?;
        tracing::info!(path = %path.display(), artifacts = self.artifacts.len(), "wrote manifest");
        Ok(())
    }

    /// Entries whose file on disk no longer matches the recorded digest.
    pub fn verify(&self) -> Vec<&ManifestEntry> {
        self.artifacts
            .iter()
            .filter(|entry| match compute_file_hash(&entry.path) {
                Ok(hash) => hash != entry.sha256,
                Err(_) => true,
            })
            .collect()
    }
}

/// SHA-256 of a file's contents, lowercase hex.
pub fn compute_file_hash(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(compute_bytes_hash(&content))
}

/// SHA-256 of a string, lowercase hex.
pub fn compute_string_hash(content: &str) -> String {
    compute_bytes_hash(content.as_bytes())
}

fn compute_bytes_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
