//! Generator backend trait and the local procedural backend

use crate::generators::{self, Artifact};
use crate::spec::GenerationSpec;
use kiln_core::{GenerationMethod, KilnError, Result};

/// Trait implemented by each generator backend
pub trait GeneratorBackend: Send + Sync {
    /// Backend name (e.g. "procedural")
    fn name(&self) -> &str;

    /// Generation methods this backend can execute
    fn supported_methods(&self) -> Vec<GenerationMethod>;

    fn supports(&self, spec: &GenerationSpec) -> bool {
        self.supported_methods().contains(&spec.method())
    }

    /// Produce the payload for `spec`
    fn generate(&self, spec: &GenerationSpec) -> Result<Artifact>;
}

/// Renders every specification locally with the procedural generators
#[derive(Debug, Default)]
pub struct ProceduralBackend;

impl ProceduralBackend {
    pub fn new() -> Self {
        Self
    }
}

impl GeneratorBackend for ProceduralBackend {
    fn name(&self) -> &str {
        "procedural"
    }

    fn supported_methods(&self) -> Vec<GenerationMethod> {
        GenerationMethod::ALL.to_vec()
    }

    fn generate(&self, spec: &GenerationSpec) -> Result<Artifact> {
        let start = std::time::Instant::now();
        let artifact = generators::render(spec)?;

        // Primary payload must match the requested output size
        let expected = spec.output_dimensions();
        if artifact.dimensions != expected {
            return Err(KilnError::GenerationError(format!(
                "{} generator produced {} but the specification requires {}",
                spec.kind(),
                artifact.dimensions,
                expected
            )));
        }

        tracing::debug!(
            kind = spec.kind(),
            bytes = artifact.payload.len(),
            auxiliary = artifact.auxiliary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generated payload"
        );
        Ok(artifact)
    }
}

/// Create a backend by name
pub fn create_backend(name: &str) -> Result<Box<dyn GeneratorBackend>> {
    match name {
        "procedural" => Ok(Box::new(ProceduralBackend::new())),
        _ => Err(KilnError::GenerationError(format!(
            "Unknown backend '{}'. Available: {}",
            name,
            available_backends().join(", ")
        ))),
    }
}

/// List all available backend names
pub fn available_backends() -> Vec<&'static str> {
    vec!["procedural"]
}
