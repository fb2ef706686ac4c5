//! Storage backends for the catalog and asset payloads

use crate::catalog::CatalogDocument;
use kiln_core::{KilnError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Catalog file name under the registry root
pub const CATALOG_FILE: &str = "catalog.toml";

/// Where a registry keeps its catalog and payload bytes.
///
/// Paths are relative to the backend's root and always use `/`.
pub trait RegistryBackend: Send + Sync {
    /// Load the catalog; a missing catalog is an empty one
    fn load_catalog(&self) -> Result<CatalogDocument>;

    /// Replace the stored catalog
    fn save_catalog(&self, catalog: &CatalogDocument) -> Result<()>;

    fn write_payload(&self, relative: &str, bytes: &[u8]) -> Result<()>;

    fn read_payload(&self, relative: &str) -> Result<Vec<u8>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Directory-backed storage.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash never leaves a half-written catalog or payload behind.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        if relative.split('/').any(|seg| seg == "..") || relative.starts_with('/') {
            return Err(KilnError::RegistryError(format!(
                "Path escapes registry root: {}",
                relative
            )));
        }
        Ok(self.root.join(relative))
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("payload");
        let tmp = path.with_file_name(format!(".{}.tmp", file_name));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl RegistryBackend for FsBackend {
    fn load_catalog(&self) -> Result<CatalogDocument> {
        let path = self.root.join(CATALOG_FILE);
        if !path.exists() {
            return Ok(CatalogDocument::new());
        }
        let content = fs::read_to_string(&path)?;
        CatalogDocument::from_toml(&content).map_err(|e| {
            KilnError::RegistryError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn save_catalog(&self, catalog: &CatalogDocument) -> Result<()> {
        let content = catalog.to_toml()?;
        Self::write_atomic(&self.root.join(CATALOG_FILE), content.as_bytes())
    }

    fn write_payload(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(relative)?;
        Self::write_atomic(&path, bytes)
    }

    fn read_payload(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative)?;
        if !path.exists() {
            return Err(KilnError::AssetNotFound(relative.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Process-local storage, used by tests and dry runs
#[derive(Default)]
pub struct MemoryBackend {
    catalog: Mutex<Option<CatalogDocument>>,
    payloads: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn lock_poisoned<T>(_: T) -> KilnError {
    KilnError::RegistryError("Registry lock poisoned".to_string())
}

impl RegistryBackend for MemoryBackend {
    fn load_catalog(&self) -> Result<CatalogDocument> {
        let catalog = self.catalog.lock().map_err(lock_poisoned)?;
        Ok(catalog.clone().unwrap_or_default())
    }

    fn save_catalog(&self, catalog: &CatalogDocument) -> Result<()> {
        *self.catalog.lock().map_err(lock_poisoned)? = Some(catalog.clone());
        Ok(())
    }

    fn write_payload(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        self.payloads
            .lock()
            .map_err(lock_poisoned)?
            .insert(relative.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_payload(&self, relative: &str) -> Result<Vec<u8>> {
        self.payloads
            .lock()
            .map_err(lock_poisoned)?
            .get(relative)
            .cloned()
            .ok_or_else(|| KilnError::AssetNotFound(relative.to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
