//! Artifact planning
//!
//! Resolves every logical artifact of a run to its template identifier,
//! output filename and output directory before anything is rendered.

use crate::normalize::{DerivedNames, NormalizedFacet, NormalizedRepr};
use crate::template::builtin;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Logical artifacts the generator knows how to produce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// `A{F}.hpp`
    AbstractHeader,
    /// `I{F}_Any.hpp`
    AnyHeader,
    /// `I{F}_Any.cpp`
    AnyBody,
    /// `I{F}_Xfer.hpp`
    XferHeader,
    /// `I{F}_Xfer.cpp`
    XferBody,
    /// `R{F}.hpp`
    RouterHeader,
    /// `I{F}_{Repr}.hpp`, one per declared representation
    ReprHeader,
}

impl ArtifactKind {
    pub fn template(&self) -> &'static str {
        match self {
            ArtifactKind::AbstractHeader => builtin::ABSTRACT_FACET_HPP,
            ArtifactKind::AnyHeader => builtin::FACET_ANY_HPP,
            ArtifactKind::AnyBody => builtin::FACET_ANY_CPP,
            ArtifactKind::XferHeader => builtin::FACET_XFER_HPP,
            ArtifactKind::XferBody => builtin::FACET_XFER_CPP,
            ArtifactKind::RouterHeader => builtin::FACET_ROUTER_HPP,
            ArtifactKind::ReprHeader => builtin::FACET_REPR_HPP,
        }
    }

    /// Bodies go to the `.cpp` directory in a split layout.
    pub fn is_body(&self) -> bool {
        matches!(self, ArtifactKind::AnyBody | ArtifactKind::XferBody)
    }

    /// Output filename for a facet-level artifact; `None` for per-repr headers.
    pub fn file_name(&self, names: &DerivedNames) -> Option<String> {
        let name = match self {
            ArtifactKind::AbstractHeader => &names.abstract_header,
            ArtifactKind::AnyHeader => &names.any_header,
            ArtifactKind::AnyBody => &names.any_body,
            ArtifactKind::XferHeader => &names.xfer_header,
            ArtifactKind::XferBody => &names.xfer_body,
            ArtifactKind::RouterHeader => &names.router_header,
            ArtifactKind::ReprHeader => return None,
        };
        Some(name.clone())
    }
}

/// Which facet-level artifacts a run produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactProfile {
    /// Abstract interface and transfer header
    Minimal,
    /// Adds the any-adapter header and the router
    Routed,
    /// Adds the any-adapter and transfer bodies
    #[default]
    Full,
}

impl ArtifactProfile {
    pub fn includes(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::AbstractHeader | ArtifactKind::XferHeader => true,
            ArtifactKind::AnyHeader | ArtifactKind::RouterHeader => {
                matches!(self, ArtifactProfile::Routed | ArtifactProfile::Full)
            }
            ArtifactKind::AnyBody | ArtifactKind::XferBody => *self == ArtifactProfile::Full,
            ArtifactKind::ReprHeader => true,
        }
    }

    /// Facet-level artifacts in emission order.
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        ArtifactKind::iter()
            .filter(|kind| *kind != ArtifactKind::ReprHeader && self.includes(*kind))
            .collect()
    }
}

/// Where artifacts land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum OutputLayout {
    /// Every artifact in one directory
    Single { dir: PathBuf },
    /// Headers and bodies in separate directories
    Split { hpp_dir: PathBuf, cpp_dir: PathBuf },
}

impl OutputLayout {
    pub fn dir_for(&self, kind: ArtifactKind) -> &Path {
        match self {
            OutputLayout::Single { dir } => dir,
            OutputLayout::Split { hpp_dir, cpp_dir } => {
                if kind.is_body() {
                    cpp_dir
                } else {
                    hpp_dir
                }
            }
        }
    }

    /// Distinct target directories, in first-use order.
    pub fn directories(&self) -> Vec<&Path> {
        match self {
            OutputLayout::Single { dir } => vec![dir.as_path()],
            OutputLayout::Split { hpp_dir, cpp_dir } if hpp_dir == cpp_dir => {
                vec![hpp_dir.as_path()]
            }
            OutputLayout::Split { hpp_dir, cpp_dir } => vec![hpp_dir.as_path(), cpp_dir.as_path()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedArtifact {
    pub kind: ArtifactKind,
    pub template: &'static str,
    pub file_name: String,
    pub path: PathBuf,
    /// Set for per-representation headers only
    pub repr: Option<NormalizedRepr>,
}

/// The full, ordered set of artifacts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPlan {
    pub profile: ArtifactProfile,
    pub layout: OutputLayout,
    pub artifacts: Vec<PlannedArtifact>,
}

impl ArtifactPlan {
    pub fn new(facet: &NormalizedFacet, profile: ArtifactProfile, layout: OutputLayout) -> Self {
        let mut artifacts = Vec::new();

        for kind in profile.kinds() {
            let Some(file_name) = kind.file_name(&facet.names) else {
                continue;
            };
            artifacts.push(PlannedArtifact {
                kind,
                template: kind.template(),
                path: layout.dir_for(kind).join(&file_name),
                file_name,
                repr: None,
            });
        }

        for repr in &facet.reprs {
            let kind = ArtifactKind::ReprHeader;
            artifacts.push(PlannedArtifact {
                kind,
                template: kind.template(),
                path: layout.dir_for(kind).join(&repr.header),
                file_name: repr.header.clone(),
                repr: Some(repr.clone()),
            });
        }

        Self {
            profile,
            layout,
            artifacts,
        }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.path.as_path())
    }
}
