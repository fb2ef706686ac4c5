//! Quality gate between generation and registration
//!
//! Every check runs regardless of earlier failures so a single report lists
//! every violation. Any failing check blocks registration; warnings are
//! reported but do not.

use crate::config::ValidationConfig;
use crate::generators::Artifact;
use crate::need::AssetNeed;
use crate::spec::GenerationSpec;
use image::{ColorType, ImageFormat};
use kiln_core::{AssetFamily, Dimensions};
use kiln_procgen::declared_dimensions;
use serde::{Deserialize, Serialize};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Ceiling applied to each auxiliary file (sheets, metadata)
pub const AUXILIARY_CEILING: u64 = 1024 * 1024;

/// Maximum payload size in bytes for a family
pub fn size_ceiling(family: AssetFamily) -> u64 {
    match family {
        AssetFamily::Ui | AssetFamily::Sprite => 100 * 1024,
        AssetFamily::Icon => 20 * 1024,
        AssetFamily::Texture | AssetFamily::Tileset => 500 * 1024,
        AssetFamily::Animation => 1024 * 1024,
    }
}

/// A single validation check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl ValidationCheck {
    fn new(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            detail: detail.into(),
        }
    }

    /// Warnings count as passing
    pub fn passed(&self) -> bool {
        self.status != CheckStatus::Fail
    }
}

/// Status of a validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Full validation report for one payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub checks: Vec<ValidationCheck>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_checks(checks: Vec<ValidationCheck>) -> Self {
        let describe = |c: &ValidationCheck| format!("{}: {}", c.name, c.detail);
        let errors: Vec<String> = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .map(describe)
            .collect();
        let warnings = checks
            .iter()
            .filter(|c| c.status == CheckStatus::Warn)
            .map(describe)
            .collect();
        Self {
            passed: errors.is_empty(),
            checks,
            errors,
            warnings,
        }
    }

    /// Count checks by status
    pub fn count_by_status(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Print a formatted summary
    pub fn print_summary(&self) {
        for check in &self.checks {
            let icon = match check.status {
                CheckStatus::Pass => "OK",
                CheckStatus::Warn => "WARN",
                CheckStatus::Fail => "FAIL",
            };
            println!("  {}: {}  {}", check.name, check.detail, icon);
        }
        if self.passed {
            println!("  Result: PASSED");
        } else {
            println!(
                "  Result: FAILED ({} issues)",
                self.count_by_status(CheckStatus::Fail)
            );
        }
    }
}

/// What the payload turned out to be
enum Probe {
    Raster { dimensions: Dimensions, color: ColorType },
    Vector { dimensions: Option<Dimensions> },
    Unreadable(String),
}

impl Probe {
    fn inspect(payload: &[u8], extension: &str) -> Self {
        match extension {
            "svg" => match std::str::from_utf8(payload) {
                Ok(text) if text.contains("<svg") => Probe::Vector {
                    dimensions: declared_dimensions(text).map(|(w, h)| Dimensions::new(w, h)),
                },
                Ok(_) => Probe::Unreadable("no <svg> root element".to_string()),
                Err(_) => Probe::Unreadable("vector payload is not UTF-8".to_string()),
            },
            _ => {
                if !payload.starts_with(&PNG_SIGNATURE) {
                    return Probe::Unreadable("PNG signature bytes missing".to_string());
                }
                match image::load_from_memory_with_format(payload, ImageFormat::Png) {
                    Ok(img) => Probe::Raster {
                        dimensions: Dimensions::new(img.width(), img.height()),
                        color: img.color(),
                    },
                    Err(e) => Probe::Unreadable(format!("PNG does not decode: {}", e)),
                }
            }
        }
    }

    fn dimensions(&self) -> Option<Dimensions> {
        match self {
            Probe::Raster { dimensions, .. } => Some(*dimensions),
            Probe::Vector { dimensions } => *dimensions,
            Probe::Unreadable(_) => None,
        }
    }
}

/// Validates generated payloads before they reach the registry
#[derive(Debug, Clone, Default)]
pub struct QualityValidator {
    config: ValidationConfig,
}

impl QualityValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Run every check for a generated artifact against its need and spec
    pub fn validate(
        &self,
        artifact: &Artifact,
        need: &AssetNeed,
        spec: &GenerationSpec,
    ) -> ValidationResult {
        let mut checks = self.technical_checks(
            &artifact.payload,
            spec.extension(),
            need.family,
            spec.output_dimensions(),
        );

        if !artifact.auxiliary.is_empty() {
            let oversized: Vec<String> = artifact
                .auxiliary
                .iter()
                .filter(|aux| aux.bytes.len() as u64 > AUXILIARY_CEILING)
                .map(|aux| format!("{} is {} bytes", aux.suffix, aux.bytes.len()))
                .collect();
            checks.push(if oversized.is_empty() {
                ValidationCheck::new(
                    "auxiliary_ceiling",
                    CheckStatus::Pass,
                    format!("{} file(s) within {} bytes", artifact.auxiliary.len(), AUXILIARY_CEILING),
                )
            } else {
                ValidationCheck::new("auxiliary_ceiling", CheckStatus::Fail, oversized.join(", "))
            });
        }

        checks.extend(compliance_checks(need, spec));
        self.finish(checks)
    }

    /// Technical checks only, for payloads that did not come from a spec
    pub fn validate_file(
        &self,
        payload: &[u8],
        extension: &str,
        family: AssetFamily,
        dimensions: Dimensions,
    ) -> ValidationResult {
        let checks = self.technical_checks(payload, extension, family, dimensions);
        self.finish(checks)
    }

    fn technical_checks(
        &self,
        payload: &[u8],
        extension: &str,
        family: AssetFamily,
        expected: Dimensions,
    ) -> Vec<ValidationCheck> {
        let mut checks = Vec::with_capacity(5);
        let size = payload.len() as u64;

        // 1. Sanity floor
        checks.push(if payload.is_empty() {
            ValidationCheck::new("payload_floor", CheckStatus::Fail, "payload is empty")
        } else if size < self.config.min_payload_bytes {
            ValidationCheck::new(
                "payload_floor",
                CheckStatus::Fail,
                format!(
                    "{} bytes is below the {}-byte floor",
                    size, self.config.min_payload_bytes
                ),
            )
        } else {
            ValidationCheck::new("payload_floor", CheckStatus::Pass, format!("{} bytes", size))
        });

        // 2. Format signature and exact dimensions
        let probe = Probe::inspect(payload, extension);
        checks.push(match &probe {
            Probe::Raster { .. } => ValidationCheck::new("signature", CheckStatus::Pass, "png"),
            Probe::Vector { .. } => ValidationCheck::new("signature", CheckStatus::Pass, "svg"),
            Probe::Unreadable(why) => ValidationCheck::new("signature", CheckStatus::Fail, why),
        });
        checks.push(match probe.dimensions() {
            Some(actual) if actual == expected => {
                ValidationCheck::new("dimensions", CheckStatus::Pass, actual.to_string())
            }
            Some(actual) => ValidationCheck::new(
                "dimensions",
                CheckStatus::Fail,
                format!("payload is {} but {} was specified", actual, expected),
            ),
            None => ValidationCheck::new(
                "dimensions",
                CheckStatus::Fail,
                format!("could not read dimensions, {} was specified", expected),
            ),
        });

        // 3. Per-family ceiling
        let ceiling = size_ceiling(family);
        let warn_at = (ceiling as f64 * self.config.warn_ratio as f64) as u64;
        checks.push(if size > ceiling {
            ValidationCheck::new(
                "size_ceiling",
                CheckStatus::Fail,
                format!("{} bytes exceeds the {} ceiling of {} bytes", size, family, ceiling),
            )
        } else if size > warn_at {
            ValidationCheck::new(
                "size_ceiling",
                CheckStatus::Warn,
                format!("{} bytes is above {} of the {} byte ceiling", size, warn_at, ceiling),
            )
        } else {
            ValidationCheck::new(
                "size_ceiling",
                CheckStatus::Pass,
                format!("{} of {} bytes", size, ceiling),
            )
        });

        // 4. Encoding mode
        checks.push(match &probe {
            Probe::Raster { color, .. } => match color {
                ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
                    ValidationCheck::new("encoding", CheckStatus::Pass, format!("{:?}", color))
                }
                other => ValidationCheck::new(
                    "encoding",
                    CheckStatus::Fail,
                    format!("{:?} is not an accepted raster encoding", other),
                ),
            },
            Probe::Vector { .. } => ValidationCheck::new("encoding", CheckStatus::Pass, "vector"),
            Probe::Unreadable(_) => {
                ValidationCheck::new("encoding", CheckStatus::Fail, "unreadable payload")
            }
        });

        checks
    }

    fn finish(&self, checks: Vec<ValidationCheck>) -> ValidationResult {
        for check in &checks {
            tracing::debug!(check = %check.name, status = ?check.status, detail = %check.detail);
        }
        let result = ValidationResult::from_checks(checks);
        for warning in &result.warnings {
            tracing::warn!("Validation warning: {}", warning);
        }
        if !result.passed {
            tracing::warn!(errors = result.errors.len(), "Validation failed");
        }
        result
    }
}

/// 5. The spec must answer the need it was built for
fn compliance_checks(need: &AssetNeed, spec: &GenerationSpec) -> Vec<ValidationCheck> {
    let mut checks = Vec::with_capacity(3);
    let requested = spec.requested_dimensions();

    checks.push(match need.dimensions {
        Some(dims) if dims != requested => ValidationCheck::new(
            "requested_dimensions",
            CheckStatus::Fail,
            format!("need asked for {} but the specification has {}", dims, requested),
        ),
        Some(dims) => ValidationCheck::new("requested_dimensions", CheckStatus::Pass, dims.to_string()),
        None => ValidationCheck::new(
            "requested_dimensions",
            CheckStatus::Pass,
            format!("defaulted to {}", requested),
        ),
    });

    checks.push(if spec.compatible_with(need.family) {
        ValidationCheck::new(
            "family",
            CheckStatus::Pass,
            format!("{} spec serves {}", spec.kind(), need.family),
        )
    } else {
        ValidationCheck::new(
            "family",
            CheckStatus::Fail,
            format!("{} spec cannot serve a {} need", spec.kind(), need.family),
        )
    });

    let mut missing = Vec::new();
    if spec.requires_style() && spec.surface_style().is_none() {
        missing.push("surface style");
    }
    if spec.requires_seed() && spec.seed().is_none() {
        missing.push("seed");
    }
    checks.push(if missing.is_empty() {
        ValidationCheck::new("required_fields", CheckStatus::Pass, "present")
    } else {
        ValidationCheck::new(
            "required_fields",
            CheckStatus::Fail,
            format!("{} spec is missing {}", spec.kind(), missing.join(" and ")),
        )
    });

    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators;
    use crate::spec::*;
    use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
    use kiln_core::Color;
    use kiln_procgen::{encode_png, SeededRng};

    fn button_need() -> AssetNeed {
        AssetNeed::new(AssetFamily::Ui, "glossy blue primary button")
            .category("button")
            .dimensions(120, 40)
    }

    fn button_spec(width: u32, style: Option<SurfaceStyle>) -> GenerationSpec {
        GenerationSpec::Control(ControlSpec {
            width,
            height: 40,
            color: Color::BLUE,
            state: ControlState::Normal,
            style,
            label: None,
        })
    }

    fn raw(payload: Vec<u8>, width: u32, height: u32) -> Artifact {
        Artifact::new(payload, "png", Dimensions::new(width, height))
    }

    #[test]
    fn test_generated_button_passes() {
        let spec = button_spec(120, Some(SurfaceStyle::Glossy));
        let artifact = generators::render(&spec).unwrap();
        let result = QualityValidator::default().validate(&artifact, &button_need(), &spec);
        assert!(result.passed, "{:?}", result.errors);
        assert!(result.errors.is_empty());
        let names: Vec<_> = result.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "payload_floor",
                "signature",
                "dimensions",
                "size_ceiling",
                "encoding",
                "auxiliary_ceiling",
                "requested_dimensions",
                "family",
                "required_fields"
            ]
        );
    }

    #[test]
    fn test_every_violation_is_listed() {
        let spec = button_spec(120, Some(SurfaceStyle::Flat));
        let result = QualityValidator::default().validate(
            &raw(vec![1, 2, 3], 120, 40),
            &button_need(),
            &spec,
        );
        assert!(!result.passed);
        for name in ["payload_floor", "signature", "dimensions", "encoding"] {
            assert!(!result.check(name).unwrap().passed(), "{} should fail", name);
        }
        assert!(result.check("size_ceiling").unwrap().passed());
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        // Spec says 120x40; payload is 100x40
        let spec = button_spec(120, Some(SurfaceStyle::Flat));
        let wrong = generators::render(&button_spec(100, Some(SurfaceStyle::Flat))).unwrap();
        let result = QualityValidator::default().validate(&wrong, &button_need(), &spec);
        assert!(!result.passed);
        assert_eq!(result.check("dimensions").unwrap().status, CheckStatus::Fail);
        assert!(result.errors[0].contains("100x40"));
    }

    #[test]
    fn test_size_ceiling_enforced() {
        // Incompressible noise comfortably above the 100 KB ui ceiling
        let mut rng = SeededRng::new(1);
        let img: RgbaImage = ImageBuffer::from_fn(256, 256, |_, _| {
            Rgba([
                rng.below(256) as u8,
                rng.below(256) as u8,
                rng.below(256) as u8,
                255,
            ])
        });
        let payload = encode_png(&img).unwrap();
        assert!(payload.len() > 100 * 1024);

        let spec = GenerationSpec::Control(ControlSpec {
            width: 256,
            height: 256,
            color: Color::BLUE,
            state: ControlState::Normal,
            style: Some(SurfaceStyle::Flat),
            label: None,
        });
        let need = AssetNeed::new(AssetFamily::Ui, "noisy button")
            .category("button")
            .dimensions(256, 256);
        let result = QualityValidator::default().validate(&raw(payload, 256, 256), &need, &spec);
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("size_ceiling"));
    }

    #[test]
    fn test_warning_does_not_block() {
        let spec = button_spec(120, Some(SurfaceStyle::Flat));
        let artifact = generators::render(&spec).unwrap();
        let validator = QualityValidator::new(ValidationConfig {
            min_payload_bytes: 64,
            warn_ratio: 0.0,
        });
        let result = validator.validate(&artifact, &button_need(), &spec);
        assert!(result.passed);
        assert_eq!(result.count_by_status(CheckStatus::Warn), 1);
        assert!(result.warnings[0].starts_with("size_ceiling"));
    }

    #[test]
    fn test_sixteen_bit_png_rejected() {
        let img = DynamicImage::ImageRgba16(ImageBuffer::from_pixel(16, 16, Rgba([0u16, 0, 0, 65535])));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        let result = QualityValidator::default().validate_file(
            bytes.get_ref(),
            "png",
            AssetFamily::Sprite,
            Dimensions::new(16, 16),
        );
        assert_eq!(result.check("encoding").unwrap().status, CheckStatus::Fail);
        assert_eq!(result.check("dimensions").unwrap().status, CheckStatus::Pass);
    }

    #[test]
    fn test_svg_dimensions_checked() {
        let spec = GenerationSpec::Icon(IconSpec {
            width: 32,
            height: 32,
            shape: IconShape::Heart,
            color: Color::RED,
            outlined: false,
        });
        let artifact = generators::render(&spec).unwrap();
        let ok = QualityValidator::default().validate_file(
            &artifact.payload,
            "svg",
            AssetFamily::Icon,
            Dimensions::new(32, 32),
        );
        assert!(ok.passed, "{:?}", ok.errors);
        assert_eq!(ok.check("encoding").unwrap().detail, "vector");

        let wrong = QualityValidator::default().validate_file(
            &artifact.payload,
            "svg",
            AssetFamily::Icon,
            Dimensions::new(48, 48),
        );
        assert!(!wrong.passed);
    }

    #[test]
    fn test_missing_required_fields() {
        let spec = button_spec(120, None);
        let artifact = generators::render(&spec).unwrap();
        let result = QualityValidator::default().validate(&artifact, &button_need(), &spec);
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("surface style"));
    }

    #[test]
    fn test_family_and_need_dimensions_compliance() {
        let spec = button_spec(120, Some(SurfaceStyle::Flat));
        let artifact = generators::render(&spec).unwrap();
        let need = AssetNeed::new(AssetFamily::Icon, "button").dimensions(64, 64);
        let result = QualityValidator::default().validate(&artifact, &need, &spec);
        assert_eq!(result.check("family").unwrap().status, CheckStatus::Fail);
        assert_eq!(
            result.check("requested_dimensions").unwrap().status,
            CheckStatus::Fail
        );
    }

    #[test]
    fn test_oversized_auxiliary_fails() {
        let spec = button_spec(120, Some(SurfaceStyle::Flat));
        let artifact = generators::render(&spec)
            .unwrap()
            .with_auxiliary("sheet.png", vec![0; AUXILIARY_CEILING as usize + 1]);
        let result = QualityValidator::default().validate(&artifact, &button_need(), &spec);
        assert_eq!(
            result.check("auxiliary_ceiling").unwrap().status,
            CheckStatus::Fail
        );
    }

    #[test]
    fn test_ceilings() {
        assert_eq!(size_ceiling(AssetFamily::Icon), 20 * 1024);
        assert_eq!(size_ceiling(AssetFamily::Tileset), 500 * 1024);
        assert_eq!(size_ceiling(AssetFamily::Animation), AUXILIARY_CEILING);
    }
}
