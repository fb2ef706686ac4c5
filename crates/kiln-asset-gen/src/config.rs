//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `KILN_REGISTRY_ROOT`, `KILN_REUSE_THRESHOLD`
//! 2. Project-local: `.kiln/config.toml`
//! 3. Global: `~/.kiln/config.toml`

use kiln_core::{KilnError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_REGISTRY_ROOT: &str = "KILN_REGISTRY_ROOT";
pub const ENV_REUSE_THRESHOLD: &str = "KILN_REUSE_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory holding `catalog.toml` and the `assets/` tree
    pub root: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".kiln/registry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// A candidate is reused only when its score is strictly greater
    pub reuse_threshold: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            reuse_threshold: 0.7,
        }
    }
}

/// Accepted range for requested edge lengths, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub min_dimension: u32,
    pub max_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_dimension: 8,
            max_dimension: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub min_payload_bytes: u64,
    /// Fraction of a family's ceiling above which a warning is raised
    pub warn_ratio: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_payload_bytes: 64,
            warn_ratio: 0.75,
        }
    }
}

/// One config file as written; every key is optional so layers can overlay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KilnConfigFile {
    #[serde(default)]
    pub registry: PartialRegistry,
    #[serde(default)]
    pub decision: PartialDecision,
    #[serde(default)]
    pub limits: PartialLimits,
    #[serde(default)]
    pub validation: PartialValidation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialRegistry {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialDecision {
    pub reuse_threshold: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialLimits {
    pub min_dimension: Option<u32>,
    pub max_dimension: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialValidation {
    pub min_payload_bytes: Option<u64>,
    pub warn_ratio: Option<f32>,
}

/// Resolved configuration with all layers applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KilnConfig {
    pub registry: RegistryConfig,
    pub decision: DecisionConfig,
    pub limits: LimitsConfig,
    pub validation: ValidationConfig,
}

impl KilnConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let global = Self::global_config_path();
        let local = PathBuf::from(".kiln/config.toml");
        Self::load_layers(global.as_deref(), Some(&local))
    }

    /// Load config from a specific file path only, plus env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::load_file(path)?);
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    /// Overlay the given files in order; missing files are skipped
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        // Layer 1: Global config (~/.kiln/config.toml)
        if let Some(path) = global.filter(|p| p.exists()) {
            config.merge(Self::load_file(path)?);
        }

        // Layer 2: Project-local config (.kiln/config.toml)
        if let Some(path) = local.filter(|p| p.exists()) {
            config.merge(Self::load_file(path)?);
        }

        // Layer 3: Environment variable overrides
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    pub fn with_registry_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.registry.root = root.into();
        self
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".kiln").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<KilnConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: KilnConfigFile = toml::from_str(&content).map_err(|e| {
            KilnError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge(&mut self, overlay: KilnConfigFile) {
        if let Some(root) = overlay.registry.root {
            self.registry.root = root;
        }
        if let Some(threshold) = overlay.decision.reuse_threshold {
            self.decision.reuse_threshold = threshold;
        }
        if let Some(min) = overlay.limits.min_dimension {
            self.limits.min_dimension = min;
        }
        if let Some(max) = overlay.limits.max_dimension {
            self.limits.max_dimension = max;
        }
        if let Some(bytes) = overlay.validation.min_payload_bytes {
            self.validation.min_payload_bytes = bytes;
        }
        if let Some(ratio) = overlay.validation.warn_ratio {
            self.validation.warn_ratio = ratio;
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_REGISTRY_ROOT).filter(|v| !v.is_empty()) {
            self.registry.root = PathBuf::from(root);
        }
        if let Some(raw) = lookup(ENV_REUSE_THRESHOLD) {
            self.decision.reuse_threshold = raw.trim().parse().map_err(|_| {
                KilnError::ConfigError(format!("{} is not a number: {}", ENV_REUSE_THRESHOLD, raw))
            })?;
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        let mut problems = Vec::new();
        if !(0.0..=1.0).contains(&self.decision.reuse_threshold) {
            problems.push(format!(
                "decision.reuse_threshold must be within 0..=1, got {}",
                self.decision.reuse_threshold
            ));
        }
        if self.limits.min_dimension == 0 || self.limits.min_dimension > self.limits.max_dimension
        {
            problems.push(format!(
                "limits must satisfy 0 < min_dimension <= max_dimension, got {}..{}",
                self.limits.min_dimension, self.limits.max_dimension
            ));
        }
        if !(0.0..=1.0).contains(&self.validation.warn_ratio) {
            problems.push(format!(
                "validation.warn_ratio must be within 0..=1, got {}",
                self.validation.warn_ratio
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(KilnError::ConfigError(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kiln_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_defaults() {
        let config = KilnConfig::default();
        assert_eq!(config.registry.root, PathBuf::from(".kiln/registry"));
        assert_eq!(config.decision.reuse_threshold, 0.7);
        assert_eq!(config.limits.min_dimension, 8);
        assert_eq!(config.limits.max_dimension, 2048);
        assert_eq!(config.validation.min_payload_bytes, 64);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_layers_overlay_in_order() {
        let global = temp_config(
            r#"
[registry]
root = "/global/registry"

[decision]
reuse_threshold = 0.9
"#,
        );
        let local = temp_config(
            r#"
[decision]
reuse_threshold = 0.8

[limits]
max_dimension = 1024
"#,
        );

        let mut config = KilnConfig::default();
        config.merge(KilnConfig::load_file(&global).unwrap());
        config.merge(KilnConfig::load_file(&local).unwrap());

        assert_eq!(config.registry.root, PathBuf::from("/global/registry"));
        assert_eq!(config.decision.reuse_threshold, 0.8);
        assert_eq!(config.limits.max_dimension, 1024);
        assert_eq!(config.limits.min_dimension, 8);

        cleanup(&global);
        cleanup(&local);
    }

    #[test]
    fn test_env_override() {
        let mut config = KilnConfig::default();
        config
            .apply_env_overrides(|key| match key {
                ENV_REGISTRY_ROOT => Some("/env/registry".to_string()),
                ENV_REUSE_THRESHOLD => Some("0.85".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.registry.root, PathBuf::from("/env/registry"));
        assert_eq!(config.decision.reuse_threshold, 0.85);
    }

    #[test]
    fn test_bad_env_threshold() {
        let mut config = KilnConfig::default();
        let err = config
            .apply_env_overrides(|key| (key == ENV_REUSE_THRESHOLD).then(|| "high".to_string()))
            .unwrap_err();
        assert!(matches!(err, KilnError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = KilnConfig::default();
        config.limits.min_dimension = 4096;
        config.decision.reuse_threshold = 1.5;
        let err = config.check().unwrap_err().to_string();
        assert!(err.contains("reuse_threshold"));
        assert!(err.contains("min_dimension"));
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_config("[decision\nreuse_threshold = ");
        assert!(matches!(
            KilnConfig::load_file(&path),
            Err(KilnError::ConfigError(_))
        ));
        cleanup(&path);
    }

    #[test]
    fn test_missing_layers_are_skipped() {
        let missing =
            std::env::temp_dir().join(format!("kiln_missing_{}.toml", uuid::Uuid::new_v4()));
        let config = KilnConfig::load_layers(Some(&missing), None).unwrap();
        assert_eq!(config.limits, LimitsConfig::default());
        assert_eq!(config.validation, ValidationConfig::default());
    }
}
