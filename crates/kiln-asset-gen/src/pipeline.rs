//! Orchestrator: need -> decision -> spec -> generation -> validation -> registry
//!
//! Every request runs the stages strictly in order. A stage either hands a
//! fully valid value to the next one or stops the run; failures come back as
//! an [`AssetResult`] naming the stage, never as a panic.

use crate::backend::{GeneratorBackend, ProceduralBackend};
use crate::builder::SpecBuilder;
use crate::config::KilnConfig;
use crate::decision::{AssetDecision, DecisionAction, DecisionEngine};
use crate::generators::GeneratedAsset;
use crate::need::AssetNeed;
use crate::presets::ProjectPreset;
use crate::registration::AutoRegistrar;
use crate::spec::GenerationSpec;
use crate::validate::{QualityValidator, ValidationResult};
use kiln_core::{Dimensions, GenerationMethod, KilnError};
use kiln_registry::{Registry, RegistryEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pipeline stage a request stopped at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Need,
    Decision,
    Specification,
    Generation,
    Validation,
    Registration,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Need => "need",
            PipelineStage::Decision => "decision",
            PipelineStage::Specification => "specification",
            PipelineStage::Generation => "generation",
            PipelineStage::Validation => "validation",
            PipelineStage::Registration => "registration",
        };
        f.write_str(name)
    }
}

/// Where a caller finds a produced or reused asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReference {
    pub id: String,
    pub symbol_name: String,
    pub path: String,
    pub dimensions: Dimensions,
    pub tags: Vec<String>,
}

impl From<&RegistryEntry> for AssetReference {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            symbol_name: entry.symbol_name.clone(),
            path: entry.path.clone(),
            dimensions: entry.dimensions,
            tags: entry.tags.clone(),
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<AssetReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<AssetDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<GenerationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// True when an existing registry entry answered the need
    #[serde(default)]
    pub reused: bool,
}

impl AssetResult {
    fn failed(stage: PipelineStage, error: &KilnError) -> Self {
        Self {
            success: false,
            reference: None,
            decision: None,
            specification: None,
            validation: None,
            error: Some(format!("{} stage failed: {}", stage, error)),
            stage: Some(stage),
            warnings: Vec::new(),
            reused: false,
        }
    }

    fn with_decision(mut self, decision: AssetDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    fn with_specification(mut self, spec: GenerationSpec) -> Self {
        self.specification = Some(spec);
        self
    }
}

/// Counts logged at the end of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub reused: usize,
    pub generated: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn tally(results: &[AssetResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match (result.success, result.reused) {
                (false, _) => summary.failed += 1,
                (true, true) => summary.reused += 1,
                (true, false) => summary.generated += 1,
            }
        }
        summary
    }
}

/// The asset pipeline with its collaborators wired together
pub struct AssetPipeline {
    config: KilnConfig,
    registry: Arc<Registry>,
    decision: DecisionEngine,
    builder: SpecBuilder,
    backend: Box<dyn GeneratorBackend>,
    validator: QualityValidator,
    registrar: AutoRegistrar,
}

impl AssetPipeline {
    /// Pipeline over the filesystem registry named in `config`
    pub fn new(config: KilnConfig) -> Self {
        let registry = Arc::new(Registry::open(&config.registry.root));
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: KilnConfig, registry: Arc<Registry>) -> Self {
        Self {
            decision: DecisionEngine::new(config.decision.reuse_threshold),
            builder: SpecBuilder::default(),
            backend: Box::new(ProceduralBackend::new()),
            validator: QualityValidator::new(config.validation),
            registrar: AutoRegistrar::new(Arc::clone(&registry)),
            registry,
            config,
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn GeneratorBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_builder(mut self, builder: SpecBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn config(&self) -> &KilnConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn validator(&self) -> &QualityValidator {
        &self.validator
    }

    /// Answer one need with a reused or freshly generated asset
    pub fn request(&self, need: &AssetNeed) -> AssetResult {
        let result = self.run(need);
        match (&result.stage, &result.error) {
            (Some(stage), Some(error)) => {
                tracing::warn!(stage = %stage, description = %need.description, "{}", error)
            }
            _ => {
                if let Some(reference) = &result.reference {
                    tracing::info!(
                        id = %reference.id,
                        reused = result.reused,
                        "Asset ready"
                    );
                }
            }
        }
        result
    }

    /// Run each need in order; one failure does not stop the rest
    pub fn request_batch(&self, needs: &[AssetNeed]) -> Vec<AssetResult> {
        let results: Vec<AssetResult> = needs.iter().map(|need| self.request(need)).collect();
        let summary = BatchSummary::tally(&results);
        tracing::info!(
            total = results.len(),
            reused = summary.reused,
            generated = summary.generated,
            failed = summary.failed,
            "Batch complete"
        );
        results
    }

    /// Expand a project preset and run it as a batch
    pub fn request_preset(&self, preset: ProjectPreset, project: &str) -> Vec<AssetResult> {
        let needs = preset.needs(project);
        tracing::info!(preset = %preset, project, needs = needs.len(), "Expanding preset");
        self.request_batch(&needs)
    }

    fn run(&self, need: &AssetNeed) -> AssetResult {
        if let Err(e) = need.validate(&self.config.limits) {
            return AssetResult::failed(PipelineStage::Need, &e);
        }

        let decision = match self.decision.decide(need, &self.registry) {
            Ok(decision) => decision,
            Err(e) => return AssetResult::failed(PipelineStage::Decision, &e),
        };
        tracing::info!(
            reuse = decision.is_reuse(),
            confidence = decision.confidence,
            "{}",
            decision.rationale
        );

        let method = match &decision.action {
            DecisionAction::Reuse { existing } => {
                return AssetResult {
                    success: true,
                    reference: Some(AssetReference::from(existing.as_ref())),
                    decision: Some(decision.clone()),
                    specification: None,
                    validation: None,
                    error: None,
                    stage: None,
                    warnings: Vec::new(),
                    reused: true,
                };
            }
            DecisionAction::Generate { method } => *method,
        };

        self.generate(need, method, decision)
    }

    fn generate(
        &self,
        need: &AssetNeed,
        method: GenerationMethod,
        decision: AssetDecision,
    ) -> AssetResult {
        let seed = need.seed();
        let spec = match self.builder.build(need, method, seed) {
            Ok(spec) => spec,
            Err(e) => {
                return AssetResult::failed(PipelineStage::Specification, &e)
                    .with_decision(decision)
            }
        };
        tracing::debug!(kind = spec.kind(), spec = ?spec, "Built specification");

        if !self.backend.supports(&spec) {
            let e = KilnError::GenerationError(format!(
                "backend '{}' does not support {}",
                self.backend.name(),
                spec.method()
            ));
            return failure(PipelineStage::Generation, &e, &decision, &spec);
        }
        let artifact = match self.backend.generate(&spec) {
            Ok(artifact) => artifact,
            Err(e) => return failure(PipelineStage::Generation, &e, &decision, &spec),
        };

        let validation = self.validator.validate(&artifact, need, &spec);
        if !validation.passed {
            let e = KilnError::ValidationFailed(validation.errors.clone());
            let mut result = failure(PipelineStage::Validation, &e, &decision, &spec);
            result.warnings = validation.warnings.clone();
            result.validation = Some(validation);
            return result;
        }

        let asset = GeneratedAsset {
            name: need.asset_name(),
            symbol_name: need.symbol_name(),
            artifact,
        };
        let recorded_seed = spec.seed().unwrap_or(seed);
        match self.registrar.register(need, &asset, method, recorded_seed) {
            Ok(registration) => AssetResult {
                success: true,
                reference: Some(AssetReference::from(&registration.entry)),
                decision: Some(decision),
                specification: Some(spec),
                warnings: validation.warnings.clone(),
                validation: Some(validation),
                error: None,
                stage: None,
                reused: false,
            },
            Err(e) => {
                let mut result = failure(PipelineStage::Registration, &e, &decision, &spec);
                result.validation = Some(validation);
                result
            }
        }
    }
}

fn failure(
    stage: PipelineStage,
    error: &KilnError,
    decision: &AssetDecision,
    spec: &GenerationSpec,
) -> AssetResult {
    AssetResult::failed(stage, error)
        .with_decision(decision.clone())
        .with_specification(spec.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Artifact;
    use crate::spec::SurfaceStyle;
    use kiln_core::{AssetFamily, Color, Result};
    use kiln_procgen::encode_png;
    use kiln_registry::RegistryQuery;

    fn pipeline() -> AssetPipeline {
        AssetPipeline::with_registry(KilnConfig::default(), Arc::new(Registry::in_memory()))
    }

    fn button() -> AssetNeed {
        AssetNeed::new(AssetFamily::Ui, "glossy blue primary button")
            .category("button")
            .dimensions(120, 40)
    }

    struct FailingBackend;

    impl GeneratorBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn supported_methods(&self) -> Vec<GenerationMethod> {
            GenerationMethod::ALL.to_vec()
        }

        fn generate(&self, _spec: &GenerationSpec) -> Result<Artifact> {
            Err(KilnError::GenerationError("renderer crashed".to_string()))
        }
    }

    /// Ignores the requested size and always emits a 10x10 PNG
    struct MisSizedBackend;

    impl GeneratorBackend for MisSizedBackend {
        fn name(&self) -> &str {
            "mis-sized"
        }

        fn supported_methods(&self) -> Vec<GenerationMethod> {
            GenerationMethod::ALL.to_vec()
        }

        fn generate(&self, spec: &GenerationSpec) -> Result<Artifact> {
            let image = image::RgbaImage::from_pixel(10, 10, image::Rgba([200, 40, 40, 255]));
            Ok(Artifact::new(encode_png(&image)?, "png", spec.output_dimensions()))
        }
    }

    #[test]
    fn test_glossy_blue_button_is_generated_and_registered() {
        let pipeline = pipeline();
        let result = pipeline.request(&button());

        assert!(result.success, "{:?}", result.error);
        assert!(!result.reused);
        let decision = result.decision.as_ref().unwrap();
        assert_eq!(decision.method(), Some(GenerationMethod::ParametricDrawing));
        match result.specification.as_ref().unwrap() {
            GenerationSpec::Control(control) => {
                assert_eq!(control.style, Some(SurfaceStyle::Glossy));
                assert_eq!(control.color, Color::BLUE);
            }
            other => panic!("expected a control spec, got {}", other.kind()),
        }
        let validation = result.validation.as_ref().unwrap();
        assert!(validation.passed);
        assert!(validation.errors.is_empty());

        let reference = result.reference.unwrap();
        assert_eq!(reference.id, "ui-button-glossy-blue-primary-button-120x40");
        assert_eq!(reference.symbol_name, "GlossyBluePrimaryButton");
        assert_eq!(reference.dimensions, Dimensions::new(120, 40));
        assert_eq!(pipeline.registry().entries().unwrap().len(), 1);
    }

    #[test]
    fn test_identical_request_is_reused() {
        let pipeline = pipeline();
        let first = pipeline.request(&button());
        let second = pipeline.request(&button());

        assert!(first.success && second.success);
        assert!(second.reused);
        assert!(second.decision.as_ref().unwrap().is_reuse());
        assert!(second.specification.is_none());
        assert_eq!(first.reference, second.reference);
        assert_eq!(pipeline.registry().entries().unwrap().len(), 1);
    }

    #[test]
    fn test_oversized_character_rejected_before_generation() {
        let pipeline = pipeline().with_backend(Box::new(FailingBackend));
        let need = AssetNeed::new(AssetFamily::Sprite, "giant dragon boss")
            .category("character")
            .dimensions(4096, 4096);
        let result = pipeline.request(&need);

        assert!(!result.success);
        assert_eq!(result.stage, Some(PipelineStage::Need));
        assert!(result.decision.is_none());
        assert!(result.error.unwrap().contains("4096"));
    }

    #[test]
    fn test_backend_failure_registers_nothing() {
        let pipeline = pipeline().with_backend(Box::new(FailingBackend));
        let result = pipeline.request(&button());

        assert!(!result.success);
        assert_eq!(result.stage, Some(PipelineStage::Generation));
        assert!(result.error.unwrap().contains("renderer crashed"));
        assert!(result.decision.is_some());
        assert!(pipeline.registry().entries().unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch_never_reaches_registry() {
        let pipeline = pipeline().with_backend(Box::new(MisSizedBackend));
        let result = pipeline.request(&button());

        assert!(!result.success);
        assert_eq!(result.stage, Some(PipelineStage::Validation));
        let validation = result.validation.unwrap();
        assert!(!validation.passed);
        assert!(!validation.check("dimensions").unwrap().passed());
        assert!(pipeline.registry().entries().unwrap().is_empty());
    }

    #[test]
    fn test_bad_attribute_fails_at_specification() {
        let pipeline = pipeline();
        let need = button().attribute("style", "chrome");
        let result = pipeline.request(&need);

        assert!(!result.success);
        assert_eq!(result.stage, Some(PipelineStage::Specification));
        assert!(pipeline.registry().entries().unwrap().is_empty());
    }

    #[test]
    fn test_batch_keeps_order_and_continues_after_failure() {
        let pipeline = pipeline();
        let needs = vec![
            button(),
            AssetNeed::new(AssetFamily::Icon, "   "),
            button(),
            AssetNeed::new(AssetFamily::Tileset, "stone dungeon floor")
                .category("terrain")
                .dimensions(32, 32),
        ];
        let results = pipeline.request_batch(&needs);

        assert_eq!(results.len(), 4);
        assert!(results[0].success && !results[0].reused);
        assert_eq!(results[1].stage, Some(PipelineStage::Need));
        assert!(results[2].reused);
        assert!(results[3].success);
        assert_eq!(
            BatchSummary::tally(&results),
            BatchSummary {
                reused: 1,
                generated: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_preset_scopes_entries_to_project() {
        let pipeline = pipeline();
        let results = pipeline.request_preset(ProjectPreset::LineOfBusiness, "backoffice");

        assert_eq!(results.len(), ProjectPreset::LineOfBusiness.needs("x").len());
        for result in &results {
            assert!(result.success, "{:?}", result.error);
        }
        let scoped = pipeline
            .registry()
            .search(&RegistryQuery::new().project("backoffice"))
            .unwrap();
        assert_eq!(scoped.len(), results.len());
    }

    #[test]
    fn test_generation_is_deterministic_across_registries() {
        let need = AssetNeed::new(AssetFamily::Sprite, "armored knight hero")
            .category("character")
            .dimensions(64, 64);
        let (a, b) = (pipeline(), pipeline());
        assert!(a.request(&need).success);
        assert!(b.request(&need).success);
        let entry_a = &a.registry().entries().unwrap()[0];
        let entry_b = &b.registry().entries().unwrap()[0];
        assert_eq!(entry_a.content_hash, entry_b.content_hash);
        assert_eq!(
            a.registry().read_payload(entry_a).unwrap(),
            b.registry().read_payload(entry_b).unwrap()
        );
    }

    #[test]
    fn test_result_serializes_stage_lowercase() {
        let pipeline = pipeline().with_backend(Box::new(FailingBackend));
        let json = serde_json::to_value(pipeline.request(&button())).unwrap();
        assert_eq!(json["stage"], "generation");
        assert_eq!(json["success"], false);
        assert_eq!(json["decision"]["action"], "generate");
    }
}
