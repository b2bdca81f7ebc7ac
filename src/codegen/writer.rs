//! Safe file writing
//!
//! The only component that writes to the filesystem. A batch is written in
//! two phases: every file is first staged to a temporary file inside its
//! target directory, and only when all staging writes succeeded is each
//! temporary file renamed over its destination. A failure while staging
//! leaves existing files untouched; temporaries are removed on drop.

use crate::error::OutputError;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub content: String,
}

impl PendingFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

struct StagedFile {
    path: PathBuf,
    temp: NamedTempFile,
}

#[derive(Debug, Clone)]
pub struct SafeCodeWriter {
    /// Refuse to replace files without write permission
    pub respect_readonly: bool,
}

impl SafeCodeWriter {
    pub fn new() -> Self {
        Self {
            respect_readonly: true,
        }
    }

    /// Create `dir` (and parents) if absent.
    pub fn prepare_dir(&self, dir: &Path) -> Result<(), OutputError> {
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        if dir.exists() && !dir.is_dir() {
            return Err(OutputError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Write a single file atomically.
    pub fn write(&self, path: &Path, content: &str) -> Result<(), OutputError> {
        self.write_all(&[PendingFile::new(path, content)]).map(|_| ())
    }

    /// Write a batch of files; nothing is renamed into place unless every
    /// file staged successfully.
    pub fn write_all(&self, files: &[PendingFile]) -> Result<Vec<PathBuf>, OutputError> {
        let mut seen = HashSet::new();
        for file in files {
            if !seen.insert(file.path.as_path()) {
                return Err(OutputError::DuplicatePath {
                    path: file.path.clone(),
                });
            }
        }

        for file in files {
            self.prepare_dir(parent_dir(&file.path))?;
            self.check_permissions(&file.path)?;
        }

        let mut staged = Vec::with_capacity(files.len());
        for file in files {
            staged.push(self.stage(file)?);
        }

        let mut written = Vec::with_capacity(staged.len());
        for StagedFile { path, temp } in staged {
            temp.persist(&path).map_err(|e| OutputError::Write {
                path: path.clone(),
                source: e.error,
            })?;
            tracing::debug!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }

    fn check_permissions(&self, path: &Path) -> Result<(), OutputError> {
        if path.is_dir() {
            return Err(OutputError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "a directory exists at the output file path",
                ),
            });
        }
        if !self.respect_readonly {
            return Ok(());
        }
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.permissions().readonly() {
                return Err(OutputError::ReadOnly {
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    fn stage(&self, file: &PendingFile) -> Result<StagedFile, OutputError> {
        let write_err = |source| OutputError::Write {
            path: file.path.clone(),
            source,
        };
        let dir = match parent_dir(&file.path) {
            d if d.as_os_str().is_empty() => Path::new("."),
            d => d,
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(file.content.as_bytes()).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        Ok(StagedFile {
            path: file.path.clone(),
            temp,
        })
    }
}

impl Default for SafeCodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("X.hpp");
        SafeCodeWriter::new().write(&path, "x").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("X.hpp");
        fs::write(&path, "old").unwrap();
        SafeCodeWriter::new().write(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_directory_that_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("out");
        fs::write(&blocker, "").unwrap();
        let err = SafeCodeWriter::new()
            .write(&blocker.join("X.hpp"), "x")
            .unwrap_err();
        assert_matches!(err, OutputError::NotADirectory { .. });
    }

    #[test]
    fn test_duplicate_paths_rejected_before_writing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("X.hpp");
        let err = SafeCodeWriter::new()
            .write_all(&[PendingFile::new(&path, "a"), PendingFile::new(&path, "b")])
            .unwrap_err();
        assert_matches!(err, OutputError::DuplicatePath { .. });
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_batch_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("ok").join("A.hpp");
        let blocker = tmp.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let bad = blocker.join("B.cpp");
        let result = SafeCodeWriter::new()
            .write_all(&[PendingFile::new(&good, "a"), PendingFile::new(&bad, "b")]);
        assert!(result.is_err());
        assert!(!good.exists());
    }

    fn make_readonly(path: &Path) {
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn test_readonly_target_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("X.hpp");
        fs::write(&path, "pinned").unwrap();
        make_readonly(&path);

        let err = SafeCodeWriter::new().write(&path, "new").unwrap_err();
        assert_matches!(err, OutputError::ReadOnly { path: p } if p == path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "pinned");
    }

    #[test]
    fn test_readonly_target_replaced_when_not_respected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("X.hpp");
        fs::write(&path, "pinned").unwrap();
        make_readonly(&path);

        let writer = SafeCodeWriter {
            respect_readonly: false,
        };
        writer.write(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_no_temporaries_left_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("X.hpp");
        SafeCodeWriter::new().write(&path, "x").unwrap();
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
