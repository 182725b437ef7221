//! Schema directory discovery and import loading

use crate::descriptor::decode_descriptor_set;
use crate::parser::parse_proto;
use anyhow::{Context, Result, bail};
use gdbuf_core::prelude::*;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

const WELL_KNOWN_PREFIX: &str = "google/protobuf/";

/// Loads every schema file under a root directory plus everything it imports
///
/// Files are identified by their path relative to the directory they were
/// found in, always with `/` separators, so `import` statements and
/// diagnostics agree regardless of platform.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    root: PathBuf,
    include_dirs: Vec<PathBuf>,
}

impl SchemaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_dirs: Vec::new(),
        }
    }

    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn with_include_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every `*.proto` file under the root, sorted, relative to the root
    pub fn discover(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            bail!("schema directory not found: {}", self.root.display());
        }

        let mut found = Vec::new();
        collect_protos(&self.root, &self.root, &mut found)?;
        found.sort();
        tracing::debug!(
            "Discovered {} schema files under {}",
            found.len(),
            self.root.display()
        );
        Ok(found)
    }

    /// Parse the discovered files and, transitively, their imports
    pub fn load(&self) -> Result<Vec<FileDef>> {
        let mut queue: VecDeque<String> = self.discover()?.into();
        let mut seen: HashSet<String> = queue.iter().cloned().collect();
        let mut files = Vec::with_capacity(queue.len());

        while let Some(relative) = queue.pop_front() {
            let full_path = self.locate(&relative)?;
            let source = std::fs::read_to_string(&full_path)
                .with_context(|| format!("Failed to read {}", full_path.display()))?;
            let file = parse_proto(&relative, &source)?;

            for import in &file.imports {
                if import.starts_with(WELL_KNOWN_PREFIX) {
                    continue;
                }
                if seen.insert(import.clone()) {
                    tracing::debug!("{} imports {}", relative, import);
                    queue.push_back(import.clone());
                }
            }

            tracing::info!("Processed schema file {}", relative);
            files.push(file);
        }

        Ok(files)
    }

    /// Load and resolve into a validated [`Schema`]
    pub fn load_schema(&self) -> Result<Schema> {
        let mut builder = SchemaBuilder::new();
        for file in self.load()? {
            builder.add_file(file);
        }
        Ok(builder.build()?)
    }

    /// Find a relative schema path in the root, then in each include directory
    fn locate(&self, relative: &str) -> Result<PathBuf> {
        std::iter::once(&self.root)
            .chain(&self.include_dirs)
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
            .with_context(|| {
                format!(
                    "import `{relative}` not found in {} or any include directory",
                    self.root.display()
                )
            })
    }
}

/// Read a binary descriptor set written by `protoc --descriptor_set_out`
pub fn load_descriptor_set(path: impl AsRef<Path>) -> Result<Vec<FileDef>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read descriptor set {}", path.display()))?;
    let files = decode_descriptor_set(&path.display().to_string(), &bytes)?;
    tracing::info!(
        "Read {} schema files from descriptor set {}",
        files.len(),
        path.display()
    );
    Ok(files)
}

fn collect_protos(root: &Path, dir: &Path, found: &mut Vec<String>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_protos(root, &path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "proto") {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            found.push(relative);
        }
    }
    Ok(())
}
