//! Auto-registrar: persists validated assets into the registry

use crate::generators::GeneratedAsset;
use crate::need::AssetNeed;
use kiln_core::{GenerationMethod, Result};
use kiln_registry::{Registration, RegistrationRequest, Registry};
use std::sync::Arc;

/// Turns a validated asset plus its need into a registry entry
pub struct AutoRegistrar {
    registry: Arc<Registry>,
}

impl AutoRegistrar {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Register `asset`; an already-present identifier is returned untouched
    pub fn register(
        &self,
        need: &AssetNeed,
        asset: &GeneratedAsset,
        method: GenerationMethod,
        seed: u32,
    ) -> Result<Registration> {
        let registration = self
            .registry
            .register(registration_request(need, asset, method, seed))?;
        if !registration.created {
            tracing::info!(id = %registration.entry.id, "Asset already registered, skipping write");
        }
        Ok(registration)
    }
}

/// Build the registry request for a generated asset
pub fn registration_request(
    need: &AssetNeed,
    asset: &GeneratedAsset,
    method: GenerationMethod,
    seed: u32,
) -> RegistrationRequest {
    RegistrationRequest {
        family: need.family,
        category: need.category.clone(),
        project: need.project.clone(),
        name: asset.name.clone(),
        symbol_name: asset.symbol_name.clone(),
        dimensions: asset.artifact.dimensions,
        tags: need.entry_tags(),
        description: need.description.clone(),
        method,
        seed,
        extension: asset.artifact.extension.to_string(),
        payload: asset.artifact.payload.clone(),
        auxiliary: asset.artifact.auxiliary.clone(),
    }
}
