//! Registered template paths
//!
//! The store is a flat text file, one path per line. Blank lines are skipped
//! on read and a missing file reads as an empty list. Paths are kept in
//! registration order and never duplicated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot read template list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write template list {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered, deduplicated list of template paths backed by a file
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        TemplateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registered paths in registration order
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Append `entry` unless it is already registered. Returns the updated list.
    pub fn add(&self, entry: &str) -> Result<Vec<String>, StoreError> {
        let mut paths = self.list()?;
        if paths.iter().any(|p| p == entry) {
            debug!(entry, "template already registered");
            return Ok(paths);
        }
        paths.push(entry.to_string());
        self.write(&paths)?;
        debug!(entry, count = paths.len(), "template registered");
        Ok(paths)
    }

    /// Forget every registered path. Returns the (empty) list.
    pub fn reset(&self) -> Result<Vec<String>, StoreError> {
        self.write(&[])?;
        debug!(path = %self.path.display(), "template list reset");
        Ok(Vec::new())
    }

    fn write(&self, paths: &[String]) -> Result<(), StoreError> {
        let mut content = paths.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
