//! Decision engine: reuse an existing asset or pick a generation method

use crate::keywords::{first_match, has_any, tokenize, ARCHETYPE, TERRAIN_CATEGORIES};
use crate::need::AssetNeed;
use crate::spec::Archetype;
use kiln_core::{AssetFamily, GenerationMethod, Result};
use kiln_registry::{Registry, RegistryEntry, RegistryQuery};
use serde::{Deserialize, Serialize};

// Weights in thousandths
const TAG_WEIGHT: u64 = 500;
const DIMENSION_WEIGHT: u64 = 300;
const NAME_WEIGHT: u64 = 200;

const BASE_CONFIDENCE: f32 = 0.8;
const DIMENSIONS_BONUS: f32 = 0.1;
const ATTRIBUTES_BONUS: f32 = 0.05;
const SHORT_DESCRIPTION_PENALTY: f32 = 0.15;
const SHORT_DESCRIPTION_WORDS: usize = 3;

/// What the pipeline should do with a need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum DecisionAction {
    Reuse { existing: Box<RegistryEntry> },
    Generate { method: GenerationMethod },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDecision {
    #[serde(flatten)]
    pub action: DecisionAction,
    pub rationale: String,
    /// Advisory only, in [0, 1]
    pub confidence: f32,
}

impl AssetDecision {
    pub fn is_reuse(&self) -> bool {
        matches!(self.action, DecisionAction::Reuse { .. })
    }

    pub fn method(&self) -> Option<GenerationMethod> {
        match &self.action {
            DecisionAction::Generate { method } => Some(*method),
            DecisionAction::Reuse { .. } => None,
        }
    }
}

/// Similarity of a registry entry to a need, as an exact fraction of
/// thousandths
#[derive(Debug, Clone, Copy)]
pub struct MatchScore {
    numerator: u64,
    denominator: u64,
}

impl MatchScore {
    /// Score from tag hits, a dimension match and name word hits
    pub fn new(
        tag_hits: usize,
        tags: usize,
        dims_match: bool,
        name_hits: usize,
        words: usize,
    ) -> Self {
        let tags = tags.max(1) as u64;
        let words = words.max(1) as u64;
        let dims = u64::from(dims_match);
        Self {
            numerator: TAG_WEIGHT * tag_hits as u64 * words
                + DIMENSION_WEIGHT * dims * tags * words
                + NAME_WEIGHT * name_hits as u64 * tags,
            denominator: tags * words * 1000,
        }
    }

    /// Approximate value in [0, 1], for display
    pub fn value(&self) -> f32 {
        (self.numerator as f64 / self.denominator as f64) as f32
    }

    /// Strictly greater than `threshold`, taken to three decimal places
    pub fn exceeds(&self, threshold: f32) -> bool {
        let millis = (f64::from(threshold) * 1000.0).round().max(0.0) as u64;
        self.numerator * 1000 > millis * self.denominator
    }
}

impl PartialEq for MatchScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for MatchScore {}

impl PartialOrd for MatchScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.numerator * other.denominator).cmp(&(other.numerator * self.denominator))
    }
}

/// A scored registry candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub entry: RegistryEntry,
    pub score: MatchScore,
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    reuse_threshold: f32,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl DecisionEngine {
    pub fn new(reuse_threshold: f32) -> Self {
        Self { reuse_threshold }
    }

    pub fn reuse_threshold(&self) -> f32 {
        self.reuse_threshold
    }

    pub fn decide(&self, need: &AssetNeed, registry: &Registry) -> Result<AssetDecision> {
        let candidates = self.candidates(need, registry)?;

        if let Some(best) = candidates.first() {
            if best.score.exceeds(self.reuse_threshold) {
                return Ok(AssetDecision {
                    rationale: format!(
                        "Reusing '{}' (score {:.3} > {:.3})",
                        best.entry.id,
                        best.score.value(),
                        self.reuse_threshold
                    ),
                    confidence: best.score.value().clamp(0.0, 1.0),
                    action: DecisionAction::Reuse {
                        existing: Box::new(best.entry.clone()),
                    },
                });
            }
        }

        let (method, reason) = select_method(need);
        let best_note = match candidates.first() {
            Some(best) => format!(
                "; best candidate '{}' scored {:.3}",
                best.entry.id,
                best.score.value()
            ),
            None => "; no registry candidates".to_string(),
        };
        Ok(AssetDecision {
            action: DecisionAction::Generate { method },
            rationale: format!("{} -> {}{}", reason, method, best_note),
            confidence: generate_confidence(need),
        })
    }

    /// Registry entries worth scoring, best first
    pub fn candidates(&self, need: &AssetNeed, registry: &Registry) -> Result<Vec<Candidate>> {
        let entries = registry.search(&RegistryQuery::new().family(need.family))?;
        let tags = need.requested_tags();
        let dims = need.resolved_dimensions();
        let words = need.words();

        let mut candidates: Vec<Candidate> = entries
            .into_iter()
            .filter(|entry| {
                tags.iter().any(|t| entry.has_tag(t))
                    || entry.dimensions == dims
                    || name_hits(&words, &entry.name) > 0
            })
            .map(|entry| Candidate {
                score: score(need, &entry),
                entry,
            })
            .collect();

        // Stable sort keeps registration order among equal scores
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(candidates)
    }
}

/// Weighted match of a registry entry against a need
pub fn score(need: &AssetNeed, entry: &RegistryEntry) -> MatchScore {
    let tags = need.requested_tags();
    let words = need.words();
    MatchScore::new(
        tags.iter().filter(|t| entry.has_tag(t)).count(),
        tags.len(),
        entry.dimensions == need.resolved_dimensions(),
        name_hits(&words, &entry.name),
        words.len(),
    )
}

/// Description words that appear in the entry name
fn name_hits(words: &[String], name: &str) -> usize {
    let name_words = tokenize(name);
    words.iter().filter(|w| name_words.contains(w)).count()
}

/// Fixed routing table from family and category to a method
pub fn select_method(need: &AssetNeed) -> (GenerationMethod, &'static str) {
    let category = need.category_tokens();
    match need.family {
        AssetFamily::Ui => (GenerationMethod::ParametricDrawing, "ui family"),
        AssetFamily::Icon => (GenerationMethod::VectorCodeGeneration, "icon family"),
        AssetFamily::Animation => (GenerationMethod::FrameInterpolation, "animation family"),
        AssetFamily::Texture | AssetFamily::Tileset => {
            (GenerationMethod::CoherentNoiseTexture, "texture family")
        }
        AssetFamily::Sprite if has_any(&category, TERRAIN_CATEGORIES) => {
            (GenerationMethod::CoherentNoiseTexture, "terrain category")
        }
        AssetFamily::Sprite if need.is_character_like() => {
            let archetype = need
                .attributes
                .get("archetype")
                .and_then(|a| a.parse().ok())
                .or_else(|| first_match(&need.tokens(), ARCHETYPE));
            match archetype {
                Some(Archetype::Humanoid) | Some(Archetype::Mechanical) => (
                    GenerationMethod::SymmetryPixelSynthesis,
                    "character category with a designed body plan",
                ),
                _ => (
                    GenerationMethod::CellularAutomataSynthesis,
                    "character category with an organic body plan",
                ),
            }
        }
        AssetFamily::Sprite if need.is_item_like() => {
            (GenerationMethod::SymmetryPixelSynthesis, "item category")
        }
        AssetFamily::Sprite => (GenerationMethod::ParametricDrawing, "default route"),
    }
}

/// Advisory confidence for a generate decision
pub fn generate_confidence(need: &AssetNeed) -> f32 {
    let mut confidence = BASE_CONFIDENCE;
    if need.dimensions.is_some() {
        confidence += DIMENSIONS_BONUS;
    }
    if !need.attributes.is_empty() {
        confidence += ATTRIBUTES_BONUS;
    }
    if need.words().len() < SHORT_DESCRIPTION_WORDS {
        confidence -= SHORT_DESCRIPTION_PENALTY;
    }
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::Dimensions;
    use kiln_registry::RegistrationRequest;

    fn register(registry: &Registry, need: &AssetNeed) -> RegistryEntry {
        registry
            .register(RegistrationRequest {
                family: need.family,
                category: need.category.clone(),
                project: None,
                name: need.asset_name(),
                symbol_name: need.symbol_name(),
                dimensions: need.resolved_dimensions(),
                tags: need.entry_tags(),
                description: need.description.clone(),
                method: GenerationMethod::ParametricDrawing,
                seed: need.seed(),
                extension: "png".to_string(),
                payload: vec![1; 100],
                auxiliary: vec![],
            })
            .unwrap()
            .entry
    }

    fn button() -> AssetNeed {
        AssetNeed::new(AssetFamily::Ui, "glossy blue primary button")
            .category("button")
            .dimensions(120, 40)
    }

    #[test]
    fn test_empty_registry_generates() {
        let registry = Registry::in_memory();
        let decision = DecisionEngine::default().decide(&button(), &registry).unwrap();
        assert_eq!(decision.method(), Some(GenerationMethod::ParametricDrawing));
        assert!(decision.rationale.contains("no registry candidates"));
        // 0.8 + 0.1 for dimensions
        assert!((decision.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_identical_need_is_reused() {
        let registry = Registry::in_memory();
        let entry = register(&registry, &button());
        assert!((score(&button(), &entry).value() - 1.0).abs() < 1e-6);

        let decision = DecisionEngine::default().decide(&button(), &registry).unwrap();
        assert!(decision.is_reuse());
        match decision.action {
            DecisionAction::Reuse { existing } => assert_eq!(existing.id, entry.id),
            other => panic!("expected reuse, got {:?}", other),
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let registry = Registry::in_memory();
        // Tags fully match (0.5) and one of two words in the name (0.1),
        // dimensions differ, total 0.6
        let entry = register(
            &registry,
            &AssetNeed::new(AssetFamily::Ui, "blue").category("button").dimensions(100, 40),
        );
        let need = AssetNeed::new(AssetFamily::Ui, "blue square")
            .category("button")
            .dimensions(120, 40);
        let s = score(&need, &entry);
        assert!((s.value() - 0.6).abs() < 1e-6);
        assert_eq!(s, MatchScore::new(2, 2, false, 1, 2));

        assert!(!DecisionEngine::new(0.6).decide(&need, &registry).unwrap().is_reuse());
        assert!(DecisionEngine::new(0.59).decide(&need, &registry).unwrap().is_reuse());
    }

    #[test]
    fn test_exactly_threshold_is_not_reused() {
        let registry = Registry::in_memory();
        // Tags 0.5 + dimensions 0.3 = 0.8, no name words in common
        register(
            &registry,
            &AssetNeed::new(AssetFamily::Ui, "alpha").category("button").dimensions(120, 40),
        );
        let need = AssetNeed::new(AssetFamily::Ui, "omega").category("button").dimensions(120, 40);
        assert!(!DecisionEngine::new(0.8).decide(&need, &registry).unwrap().is_reuse());
    }

    #[test]
    fn test_default_threshold_score_of_exactly_seven_tenths_is_not_reused() {
        let registry = Registry::in_memory();
        let tagged = |need: AssetNeed, tags: &[&str]| {
            tags.iter().fold(need, |need, t| need.tag(*t))
        };
        // Four of five tags (0.4) plus dimensions (0.3), no name words in common
        let entry = register(
            &registry,
            &tagged(
                AssetNeed::new(AssetFamily::Ui, "alpha").dimensions(64, 64),
                &["a", "b", "c", "d"],
            ),
        );
        let need = tagged(
            AssetNeed::new(AssetFamily::Ui, "omega").dimensions(64, 64),
            &["a", "b", "c", "d", "e"],
        );
        let s = score(&need, &entry);
        assert_eq!(s, MatchScore::new(4, 5, true, 0, 1));
        assert!((s.value() - 0.7).abs() < 1e-6);
        assert!(!s.exceeds(0.7));
        assert!(s.exceeds(0.699));

        let decision = DecisionEngine::default().decide(&need, &registry).unwrap();
        assert!(!decision.is_reuse());
        assert!(decision.rationale.contains("scored 0.700"));
    }

    #[test]
    fn test_match_score_is_exact() {
        // 2/3 tags + dims + 1/3 name words is 0.3333 + 0.3 + 0.0667 = 0.7
        let s = MatchScore::new(2, 3, true, 1, 3);
        assert!(!s.exceeds(0.7));
        assert_eq!(s, MatchScore::new(4, 5, true, 0, 1));
        assert!(MatchScore::new(3, 3, true, 1, 1) > s);
        assert!(MatchScore::new(0, 0, false, 0, 0) < s);
        assert!(MatchScore::new(1, 1, true, 1, 1).exceeds(0.99));
    }

    #[test]
    fn test_deprecated_entries_are_never_reused() {
        let registry = Registry::in_memory();
        let entry = register(&registry, &button());
        registry.deprecate(&entry.id, "retired").unwrap();
        let decision = DecisionEngine::default().decide(&button(), &registry).unwrap();
        assert!(!decision.is_reuse());
    }

    #[test]
    fn test_other_family_is_not_a_candidate() {
        let registry = Registry::in_memory();
        register(&registry, &button());
        let need = AssetNeed::new(AssetFamily::Icon, "glossy blue primary button");
        assert!(DecisionEngine::default()
            .candidates(&need, &registry)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_need_without_dimensions_uses_defaults() {
        let registry = Registry::in_memory();
        let entry = register(&registry, &button());
        let need = AssetNeed::new(AssetFamily::Ui, "glossy blue primary button").category("button");
        assert_eq!(need.resolved_dimensions(), Dimensions::new(120, 40));
        assert!((score(&need, &entry).value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_method_table() {
        let m = |need: AssetNeed| select_method(&need).0;
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Ui, "x")),
            GenerationMethod::ParametricDrawing
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Icon, "x")),
            GenerationMethod::VectorCodeGeneration
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Tileset, "x")),
            GenerationMethod::CoherentNoiseTexture
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Sprite, "x").category("terrain")),
            GenerationMethod::CoherentNoiseTexture
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Animation, "x")),
            GenerationMethod::FrameInterpolation
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Sprite, "elf knight").category("character")),
            GenerationMethod::SymmetryPixelSynthesis
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Sprite, "slime blob").category("creature")),
            GenerationMethod::CellularAutomataSynthesis
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Sprite, "slime")
                .category("creature")
                .attribute("archetype", "humanoid")),
            GenerationMethod::SymmetryPixelSynthesis
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Sprite, "potion").category("consumable")),
            GenerationMethod::SymmetryPixelSynthesis
        );
        assert_eq!(
            m(AssetNeed::new(AssetFamily::Sprite, "banner")),
            GenerationMethod::ParametricDrawing
        );
    }

    #[test]
    fn test_generate_confidence() {
        let short = AssetNeed::new(AssetFamily::Icon, "heart");
        assert!((generate_confidence(&short) - 0.65).abs() < 1e-6);
        let full = AssetNeed::new(AssetFamily::Icon, "big red heart icon")
            .dimensions(32, 32)
            .attribute("color", "red");
        assert!((generate_confidence(&full) - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_decision_serializes() {
        let decision = AssetDecision {
            action: DecisionAction::Generate {
                method: GenerationMethod::CoherentNoiseTexture,
            },
            rationale: "texture family".to_string(),
            confidence: 0.8,
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains(r#""action":"generate""#));
        assert!(json.contains(r#""method":"coherent-noise-texture""#));
    }
}
