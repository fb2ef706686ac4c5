//! The shared asset registry

use crate::ident::{derive_identifier, sanitize_name, storage_path};
use crate::store::{lock_poisoned, FsBackend, MemoryBackend, RegistryBackend};
use crate::timestamp::now_iso8601;
use crate::types::{Deprecation, RegistrationRequest, RegistryEntry, RegistryQuery};
use kiln_core::{ContentHash, KilnError, Result};
use std::path::Path;
use std::sync::Mutex;

/// Outcome of [`Registry::register`]
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub entry: RegistryEntry,
    /// False when the identifier was already present and nothing was written
    pub created: bool,
}

/// Durable catalog plus payload storage.
///
/// All catalog mutations are read-modify-write cycles serialized through one
/// writer lock, so concurrent registrations through the same handle never
/// lose entries. Share a `Registry` between threads with `Arc`.
pub struct Registry {
    backend: Box<dyn RegistryBackend>,
    write_lock: Mutex<()>,
}

impl Registry {
    pub fn new(backend: Box<dyn RegistryBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Registry rooted at a directory on disk
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        Self::new(Box::new(FsBackend::new(root)))
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    pub fn location(&self) -> String {
        self.backend.describe()
    }

    /// Persist an asset, or return the existing entry with the same identifier
    pub fn register(&self, request: RegistrationRequest) -> Result<Registration> {
        let name = sanitize_name(&request.name);
        let id = derive_identifier(
            request.family,
            request.category.as_deref(),
            &name,
            request.dimensions,
        );

        let _guard = self.write_lock.lock().map_err(lock_poisoned)?;
        let mut catalog = self.backend.load_catalog()?;

        if let Some(existing) = catalog.get(&id) {
            tracing::debug!(id = %id, "Asset already registered, skipping write");
            return Ok(Registration {
                entry: existing.clone(),
                created: false,
            });
        }

        if request.payload.is_empty() {
            return Err(KilnError::RegistryError(format!(
                "Refusing to register empty payload for {}",
                id
            )));
        }

        let path = storage_path(
            request.family,
            request.category.as_deref(),
            request.project.as_deref(),
            &name,
            request.dimensions,
            &request.extension,
        );
        if let Some(owner) = catalog
            .entries
            .iter()
            .find(|e| e.path == path || e.auxiliary.contains(&path))
        {
            return Err(KilnError::RegistryError(format!(
                "Refusing to register {}: {} is already owned by {}",
                id, path, owner.id
            )));
        }
        self.backend.write_payload(&path, &request.payload)?;

        let mut auxiliary = Vec::with_capacity(request.auxiliary.len());
        for aux in &request.auxiliary {
            let aux_path = auxiliary_path(&path, &request.extension, &aux.suffix);
            self.backend.write_payload(&aux_path, &aux.bytes)?;
            auxiliary.push(aux_path);
        }

        let mut tags = Vec::new();
        for tag in request.tags.iter().map(|t| t.trim().to_lowercase()) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let entry = RegistryEntry {
            id: id.clone(),
            family: request.family,
            category: request.category,
            project: request.project,
            name,
            symbol_name: request.symbol_name,
            path,
            tags,
            description: request.description,
            method: request.method,
            seed: request.seed,
            created_at: now_iso8601(),
            byte_size: request.payload.len() as u64,
            content_hash: ContentHash::from_bytes(&request.payload).to_prefixed_hex(),
            auxiliary,
            dimensions: request.dimensions,
        };

        catalog.entries.push(entry.clone());
        self.backend.save_catalog(&catalog)?;

        tracing::info!(
            id = %entry.id,
            path = %entry.path,
            bytes = entry.byte_size,
            "Registered asset"
        );

        Ok(Registration {
            entry,
            created: true,
        })
    }

    /// Entries matching `query`; deprecated entries are excluded unless asked for
    pub fn search(&self, query: &RegistryQuery) -> Result<Vec<RegistryEntry>> {
        Ok(self.backend.load_catalog()?.search(query))
    }

    pub fn get(&self, id: &str) -> Result<Option<RegistryEntry>> {
        Ok(self.backend.load_catalog()?.get(id).cloned())
    }

    pub fn entries(&self) -> Result<Vec<RegistryEntry>> {
        Ok(self.backend.load_catalog()?.entries)
    }

    pub fn deprecations(&self) -> Result<Vec<Deprecation>> {
        Ok(self.backend.load_catalog()?.deprecations)
    }

    pub fn is_deprecated(&self, id: &str) -> Result<bool> {
        Ok(self.backend.load_catalog()?.is_deprecated(id))
    }

    /// Retire an entry from search and reuse.
    ///
    /// Returns false if it was already deprecated.
    pub fn deprecate(&self, id: &str, reason: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().map_err(lock_poisoned)?;
        let mut catalog = self.backend.load_catalog()?;

        if !catalog.contains(id) {
            return Err(KilnError::AssetNotFound(id.to_string()));
        }
        if catalog.is_deprecated(id) {
            return Ok(false);
        }

        catalog.deprecations.push(Deprecation {
            id: id.to_string(),
            reason: reason.to_string(),
            deprecated_at: now_iso8601(),
        });
        self.backend.save_catalog(&catalog)?;
        tracing::info!(id = %id, reason = %reason, "Deprecated asset");
        Ok(true)
    }

    /// Read the primary payload of a registered entry
    pub fn read_payload(&self, entry: &RegistryEntry) -> Result<Vec<u8>> {
        self.backend.read_payload(&entry.path)
    }
}

/// `dir/name.png` + `sheet.png` becomes `dir/name.sheet.png`
fn auxiliary_path(primary: &str, extension: &str, suffix: &str) -> String {
    let ext = format!(".{}", extension.trim_start_matches('.'));
    let stem = primary.strip_suffix(&ext).unwrap_or(primary);
    format!("{}.{}", stem, suffix.trim_start_matches('.'))
}
