//! The persisted catalog document

use crate::types::{Deprecation, RegistryEntry, RegistryQuery};
use serde::{Deserialize, Serialize};

/// Current catalog format version
pub const CATALOG_VERSION: u32 = 1;

/// Every entry and deprecation marker in one registry, as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub version: u32,
    #[serde(default, rename = "entry")]
    pub entries: Vec<RegistryEntry>,
    #[serde(default, rename = "deprecation")]
    pub deprecations: Vec<Deprecation>,
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            entries: Vec::new(),
            deprecations: Vec::new(),
        }
    }
}

impl CatalogDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_deprecated(&self, id: &str) -> bool {
        self.deprecations.iter().any(|d| d.id == id)
    }

    pub fn deprecation(&self, id: &str) -> Option<&Deprecation> {
        self.deprecations.iter().find(|d| d.id == id)
    }

    /// Entries matching `query`, in registration order
    pub fn search(&self, query: &RegistryQuery) -> Vec<RegistryEntry> {
        self.entries
            .iter()
            .filter(|e| query.include_deprecated || !self.is_deprecated(&e.id))
            .filter(|e| query.matches(e))
            .cloned()
            .collect()
    }

    pub fn to_toml(&self) -> kiln_core::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(text: &str) -> kiln_core::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
