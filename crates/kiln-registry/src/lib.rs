//! Kiln Registry - Durable catalog of produced assets
//!
//! This crate provides the append-only asset catalog, deterministic
//! identifiers, a pluggable storage backend (filesystem or in-memory), and a
//! `Registry` handle that serializes writers so concurrent registrations
//! cannot lose entries.

mod catalog;
mod ident;
mod registry;
mod store;
mod timestamp;
mod types;

pub use catalog::CatalogDocument;
pub use ident::{derive_identifier, sanitize_name, storage_path, CATEGORY_PLACEHOLDER, PROJECT_PLACEHOLDER};
pub use registry::{Registration, Registry};
pub use store::{FsBackend, MemoryBackend, RegistryBackend, CATALOG_FILE};
pub use timestamp::now_iso8601;
pub use types::{AuxiliaryPayload, Deprecation, RegistrationRequest, RegistryEntry, RegistryQuery};
