//! Registry record and request types

use kiln_core::{AssetFamily, Dimensions, GenerationMethod};
use serde::{Deserialize, Serialize};

/// The durable record of one registered asset.
///
/// Entries are never mutated once written; retirement is recorded as a
/// separate [`Deprecation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Derived identifier, see [`crate::derive_identifier`]
    pub id: String,
    pub family: AssetFamily,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    /// Sanitized file-safe name
    pub name: String,
    /// Display name for code references (e.g. `GlossyBluePrimaryButton`)
    pub symbol_name: String,
    /// Payload path relative to the registry root
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    pub method: GenerationMethod,
    pub seed: u32,
    /// ISO 8601 UTC timestamp
    pub created_at: String,
    pub byte_size: u64,
    /// `sha256:` prefixed payload hash
    pub content_hash: String,
    /// Paths of auxiliary files (sheets, frame metadata)
    #[serde(default)]
    pub auxiliary: Vec<String>,
    pub dimensions: Dimensions,
}

impl RegistryEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Marker retiring an entry from search and reuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deprecation {
    pub id: String,
    pub reason: String,
    pub deprecated_at: String,
}

/// An extra file stored next to the primary payload
#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliaryPayload {
    /// Appended to the asset name, e.g. `sheet.png` or `frames.json`
    pub suffix: String,
    pub bytes: Vec<u8>,
}

/// Everything needed to persist a new asset
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub family: AssetFamily,
    pub category: Option<String>,
    pub project: Option<String>,
    pub name: String,
    pub symbol_name: String,
    pub dimensions: Dimensions,
    pub tags: Vec<String>,
    pub description: String,
    pub method: GenerationMethod,
    pub seed: u32,
    /// File extension of the primary payload, without the dot
    pub extension: String,
    pub payload: Vec<u8>,
    pub auxiliary: Vec<AuxiliaryPayload>,
}

/// Filter for [`crate::Registry::search`].
///
/// Every populated field must match exactly; `tags` must all be present on
/// the entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryQuery {
    pub family: Option<AssetFamily>,
    pub category: Option<String>,
    pub project: Option<String>,
    pub tags: Vec<String>,
    pub dimensions: Option<Dimensions>,
    pub include_deprecated: bool,
}

impl RegistryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(mut self, family: AssetFamily) -> Self {
        self.family = Some(family);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn include_deprecated(mut self) -> Self {
        self.include_deprecated = true;
        self
    }

    pub fn matches(&self, entry: &RegistryEntry) -> bool {
        if let Some(family) = self.family {
            if entry.family != family {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if !entry
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
            {
                return false;
            }
        }
        if let Some(ref project) = self.project {
            if entry.project.as_deref() != Some(project.as_str()) {
                return false;
            }
        }
        if let Some(dims) = self.dimensions {
            if entry.dimensions != dims {
                return false;
            }
        }
        self.tags.iter().all(|t| entry.has_tag(t))
    }
}
