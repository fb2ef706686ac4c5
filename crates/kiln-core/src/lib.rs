//! Kiln Core - Foundational types for the Kiln asset pipeline
//!
//! This crate provides the core types that all other Kiln crates depend on:
//! - `AssetFamily`, `GenerationMethod` - Request and provenance tags
//! - `Dimensions`, `Color` - Raster geometry and color values
//! - `ContentHash` - SHA-256 based content hashing and seed derivation
//! - Error types and Result alias

mod error;
mod hash;
mod types;

pub use error::{KilnError, Result};
pub use hash::{derive_seed, ContentHash};
pub use types::{AssetFamily, Color, Dimensions, GenerationMethod};
