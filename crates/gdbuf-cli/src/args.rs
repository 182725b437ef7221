//! Schema source and configuration flags shared by every command

use anyhow::{Context, Result, bail};
use clap::Args;
use gdbuf_core::{GeneratorConfig, InitializationLevel, Schema, SchemaBuilder};
use gdbuf_parser::{SchemaLoader, load_descriptor_set};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given and it exists
pub const DEFAULT_CONFIG_FILE: &str = "gdbuf.toml";

#[derive(Debug, Clone, Default, Args)]
pub struct SchemaArgs {
    /// Directory of .proto files to generate bindings for
    #[arg(long, required_unless_present = "descriptor_set")]
    pub proto: Option<PathBuf>,

    /// Additional directory searched for imports (repeatable)
    #[arg(long = "include")]
    pub include: Vec<PathBuf>,

    /// Binary descriptor set written by protoc --descriptor_set_out
    #[arg(long)]
    pub descriptor_set: Option<PathBuf>,

    /// Extension name (overrides extension_name from the config)
    #[arg(long)]
    pub name: Option<String>,

    /// Initialization level (overrides initialization_level from the config)
    #[arg(long)]
    pub level: Option<InitializationLevel>,

    /// Path to gdbuf.toml (default: ./gdbuf.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SchemaArgs {
    /// Config file, then command-line overrides, then validation
    pub fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                GeneratorConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => GeneratorConfig::default(),
        };

        if let Some(name) = &self.name {
            config.extension_name = name.clone();
        }
        if let Some(level) = self.level {
            config.initialization_level = level;
        }
        config.include_dirs.extend(self.include.iter().cloned());

        config.validate()?;
        Ok(config)
    }

    /// Ingest every schema source and resolve them together
    pub fn load_schema(&self, config: &GeneratorConfig) -> Result<Schema> {
        let mut files = Vec::new();

        if let Some(path) = &self.descriptor_set {
            files.extend(load_descriptor_set(path)?);
        }
        if let Some(dir) = &self.proto {
            let loader =
                SchemaLoader::new(dir).with_include_dirs(config.include_dirs.iter().cloned());
            files.extend(loader.load()?);
        }
        if files.is_empty() {
            bail!("no schema files found");
        }

        let mut builder = SchemaBuilder::new();
        for file in files {
            builder.add_file(file);
        }
        Ok(builder.build()?)
    }
}
