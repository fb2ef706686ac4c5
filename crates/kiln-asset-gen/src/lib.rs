//! Kiln Asset Gen - Deterministic procedural asset pipeline
//!
//! Turns loosely described asset needs into validated, registered assets:
//! the decision engine reuses registry entries when they match well enough,
//! otherwise a specification is built, rendered by a generator backend,
//! gated by the quality validator and recorded by the auto-registrar.

pub mod backend;
pub mod builder;
pub mod config;
pub mod decision;
pub mod generators;
mod keywords;
pub mod need;
pub mod pipeline;
pub mod presets;
pub mod registration;
pub mod spec;
pub mod validate;

pub use backend::{available_backends, create_backend, GeneratorBackend, ProceduralBackend};
pub use builder::{ExplicitInference, KeywordInference, SpecBuilder, SpecHints, SpecInference};
pub use config::KilnConfig;
pub use decision::{AssetDecision, DecisionAction, DecisionEngine, MatchScore};
pub use generators::{Artifact, GeneratedAsset, SheetMetadata};
pub use need::{AssetNeed, NeedDocument};
pub use pipeline::{AssetPipeline, AssetReference, AssetResult, BatchSummary, PipelineStage};
pub use presets::ProjectPreset;
pub use registration::AutoRegistrar;
pub use spec::GenerationSpec;
pub use validate::{size_ceiling, CheckStatus, QualityValidator, ValidationCheck, ValidationResult};
