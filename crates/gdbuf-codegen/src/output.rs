//! In-memory staging of generated files
//!
//! Every file is rendered before anything touches the disk, so a failed
//! generation run never leaves a partial binding tree behind.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Rendered files keyed by path relative to the output directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    files: BTreeMap<String, String>,
}

impl GeneratedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file; a later call for the same path replaces the contents
    pub fn add(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Staged paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every staged file under `dir`, creating directories as needed
    ///
    /// Returns the number of files written.
    pub fn write_to(&self, dir: &Path) -> Result<usize> {
        for (relative, contents) in &self.files {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {parent:?}"))?;
            }
            std::fs::write(&path, contents)
                .with_context(|| format!("Failed to write {path:?}"))?;
            tracing::debug!("Wrote {}", path.display());
        }
        tracing::info!("Wrote {} files to {}", self.files.len(), dir.display());
        Ok(self.files.len())
    }
}
