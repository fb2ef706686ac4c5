//! CLI command implementations

pub mod registry;
pub mod request;
pub mod validate;

use anyhow::{bail, Result};
use kiln_asset_gen::{AssetPipeline, KilnConfig};
use kiln_registry::Registry;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => bail!("Unknown format '{}'. Use: text, json", s),
        }
    }
}

/// Resolved config and output settings shared by every command
pub struct Context {
    pub config: KilnConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config_path: Option<&str>, registry: Option<&str>, format: &str) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => KilnConfig::load_from_file(Path::new(path))?,
            None => KilnConfig::load()?,
        };
        if let Some(root) = registry {
            config = config.with_registry_root(root);
        }
        tracing::debug!(registry = %config.registry.root.display(), "Configuration loaded");
        Ok(Self {
            config,
            format: OutputFormat::parse(format)?,
        })
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::new(Registry::open(&self.config.registry.root))
    }

    pub fn pipeline(&self) -> AssetPipeline {
        AssetPipeline::with_registry(self.config.clone(), self.registry())
    }

    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|l| {
        l.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
