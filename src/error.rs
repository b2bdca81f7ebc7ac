//! Error taxonomy for the facet generator
//!
//! This module provides:
//! - One error enum per pipeline layer (load, schema, render, output)
//! - `GenerateError`, the aggregate surfaced at the invocation boundary
//! - `ErrorCode`, mapping every failure to a stable process exit code
//!
//! No error is recovered internally; every variant aborts the run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// EXIT CODES
// =============================================================================

/// Stable classification of a failed run, used for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// IDL source missing, unreadable or syntactically invalid
    LoadError = 2,
    /// Required field absent or malformed
    SchemaError = 3,
    /// Template missing, broken, or referencing an absent context key
    RenderError = 4,
    /// Destination could not be created or written
    OutputError = 5,
    /// Command line or config file rejected
    ConfigError = 64,
}

impl ErrorCode {
    /// Get the integer exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get the error category label used in diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::LoadError => "load",
            ErrorCode::SchemaError => "schema",
            ErrorCode::RenderError => "render",
            ErrorCode::OutputError => "output",
            ErrorCode::ConfigError => "config",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

// =============================================================================
// LAYER ERRORS
// =============================================================================

/// Failure reading or parsing the IDL source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IDL source {path:?} does not exist")]
    NotFound { path: PathBuf },

    #[error("failed to read IDL source {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} IDL source {path:?}: {message}")]
    Syntax {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// A required field is absent or malformed.
///
/// `field` is a location path into the IDL document, e.g.
/// `nonconst_methods[0].args[1].type`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' is malformed: {reason}")]
    Malformed { field: String, reason: String },

    #[error("field '{field}' value '{value}' is not a valid identifier")]
    InvalidIdentifier { field: String, value: String },

    #[error("field '{field}' declares parameter 'data', which is reserved for the receiver")]
    ReservedParameter { field: String },

    #[error("field '{field}' value '{value}' collides with a generated name")]
    ReservedName { field: String, value: String },

    #[error("field '{field}' value '{value}' is declared more than once")]
    DuplicateName { field: String, value: String },
}

impl SchemaError {
    /// Location path of the offending field
    pub fn field(&self) -> &str {
        match self {
            SchemaError::MissingField { field }
            | SchemaError::Malformed { field, .. }
            | SchemaError::InvalidIdentifier { field, .. }
            | SchemaError::ReservedParameter { field }
            | SchemaError::ReservedName { field, .. }
            | SchemaError::DuplicateName { field, .. } => field,
        }
    }
}

/// Failure inside the template renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{name}' not found")]
    TemplateNotFound { name: String },

    #[error("failed to load templates from {dir:?}: {message}")]
    TemplateLoad { dir: PathBuf, message: String },

    #[error("failed to render template '{name}': {message}")]
    Render { name: String, message: String },

    #[error("failed to build render context: {message}")]
    Context { message: String },
}

/// Failure writing generated artifacts.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output path {path:?} exists and is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("failed to create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output file {path:?} is read-only")]
    ReadOnly { path: PathBuf },

    #[error("two artifacts resolve to the same output path {path:?}")]
    DuplicatePath { path: PathBuf },
}

// =============================================================================
// AGGREGATE
// =============================================================================

/// Any failure of a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl GenerateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GenerateError::Load(_) => ErrorCode::LoadError,
            GenerateError::Schema(_) => ErrorCode::SchemaError,
            GenerateError::Render(_) => ErrorCode::RenderError,
            GenerateError::Output(_) => ErrorCode::OutputError,
        }
    }
}

/// Exit code for an error chain produced anywhere in the binary.
///
/// Errors that did not originate in the pipeline are configuration errors.
pub fn exit_code_for(error: &anyhow::Error) -> ErrorCode {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<GenerateError>())
        .map(GenerateError::code)
        .unwrap_or(ErrorCode::ConfigError)
}
