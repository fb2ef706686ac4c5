//! Deterministic generators, one per specification shape
//!
//! Every generator is a pure function of its specification: identical specs
//! produce byte-identical payloads. Seeded generators read the seed from the
//! spec itself and never from ambient state.

mod animation;
mod character;
mod control;
mod emblem;
mod gauge;
mod geometry;
mod icon;
mod item;
mod panel;
mod sheet;
mod surface;
mod tile;

pub use sheet::{Clip, FrameRect, SheetMetadata};

use crate::spec::GenerationSpec;
use kiln_core::{Dimensions, Result};
use kiln_registry::AuxiliaryPayload;

/// Raw generator output before it is bound to a request
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub payload: Vec<u8>,
    /// File extension of `payload`, without the dot
    pub extension: &'static str,
    pub dimensions: Dimensions,
    pub auxiliary: Vec<AuxiliaryPayload>,
}

impl Artifact {
    pub fn new(payload: Vec<u8>, extension: &'static str, dimensions: Dimensions) -> Self {
        Self {
            payload,
            extension,
            dimensions,
            auxiliary: Vec::new(),
        }
    }

    pub fn with_auxiliary(mut self, suffix: &str, bytes: Vec<u8>) -> Self {
        self.auxiliary.push(AuxiliaryPayload {
            suffix: suffix.to_string(),
            bytes,
        });
        self
    }
}

/// A generated asset named for the request it answers
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAsset {
    pub name: String,
    pub symbol_name: String,
    pub artifact: Artifact,
}

/// Run the generator matching `spec`
pub fn render(spec: &GenerationSpec) -> Result<Artifact> {
    match spec {
        GenerationSpec::Control(s) => control::render(s),
        GenerationSpec::Panel(s) => panel::render(s),
        GenerationSpec::Gauge(s) => gauge::render(s),
        GenerationSpec::Icon(s) => icon::render(s),
        GenerationSpec::Character(s) => character::render(s),
        GenerationSpec::Tile(s) => tile::render(s),
        GenerationSpec::Item(s) => item::render(s),
        GenerationSpec::Animation(s) => animation::render(s),
        GenerationSpec::Emblem(s) => emblem::render(s),
    }
}
