//! Specification builder
//!
//! Turns a need plus the decided method and seed into a concrete
//! [`GenerationSpec`]. Explicit attributes win over anything inferred, and
//! inference itself is a pluggable [`SpecInference`] strategy.

use crate::keywords::{
    first_match, has_any, ARCHETYPE, COLOR, GAUGE_CATEGORIES, GAUGE_COLOR, ITEM, MATERIAL, MOTION,
    PANEL_CATEGORIES, RARITY, SHAPE, STATE, STYLE,
};
use crate::need::AssetNeed;
use crate::spec::*;
use kiln_core::{AssetFamily, Color, GenerationMethod, KilnError, Result};
use std::collections::BTreeMap;

const DEFAULT_TILESET_VARIANTS: u32 = 4;
const DEFAULT_FRAMES: u32 = 8;
const DEFAULT_GAUGE_FILL: f32 = 0.75;

/// Attribute keys the builder understands
pub const ATTRIBUTE_KEYS: &[&str] = &[
    "style",
    "color",
    "state",
    "label",
    "material",
    "archetype",
    "size",
    "animated",
    "fill",
    "orientation",
    "shape",
    "item",
    "rarity",
    "variants",
    "frames",
    "motion",
    "seed",
];

/// Values read from a need's free text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecHints {
    pub style: Option<SurfaceStyle>,
    pub color: Option<Color>,
    pub gauge_color: Option<Color>,
    pub state: Option<ControlState>,
    pub archetype: Option<Archetype>,
    pub material: Option<Material>,
    pub shape: Option<IconShape>,
    pub item: Option<ItemKind>,
    pub rarity: Option<Rarity>,
    pub motion: Option<Motion>,
    pub animated: Option<bool>,
}

/// Strategy for filling specification fields the need leaves open
pub trait SpecInference: Send + Sync {
    fn name(&self) -> &'static str;

    fn infer(&self, need: &AssetNeed) -> SpecHints;

    /// Whether required fields (surface style, seed) get defaults when the
    /// need's attributes do not set them
    fn fills_required(&self) -> bool;
}

/// Ordered keyword tables over category and description words
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordInference;

impl SpecInference for KeywordInference {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn infer(&self, need: &AssetNeed) -> SpecHints {
        let tokens = need.tokens();
        SpecHints {
            style: first_match(&tokens, STYLE),
            color: first_match(&tokens, COLOR),
            gauge_color: first_match(&tokens, GAUGE_COLOR),
            state: first_match(&tokens, STATE),
            archetype: first_match(&tokens, ARCHETYPE),
            material: first_match(&tokens, MATERIAL),
            shape: first_match(&tokens, SHAPE),
            item: first_match(&tokens, ITEM),
            rarity: first_match(&tokens, RARITY),
            motion: first_match(&tokens, MOTION),
            animated: has_any(&tokens, &["animated", "walking", "walk", "animation"])
                .then_some(true),
        }
    }

    fn fills_required(&self) -> bool {
        true
    }
}

/// No inference at all; only explicit attributes and fixed defaults apply
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitInference;

impl SpecInference for ExplicitInference {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn infer(&self, _need: &AssetNeed) -> SpecHints {
        SpecHints::default()
    }

    fn fills_required(&self) -> bool {
        false
    }
}

/// Typed view of a need's attribute map
#[derive(Debug, Clone, Default, PartialEq)]
struct Attributes {
    style: Option<SurfaceStyle>,
    color: Option<Color>,
    state: Option<ControlState>,
    label: Option<String>,
    material: Option<Material>,
    archetype: Option<Archetype>,
    size: Option<SizeClass>,
    animated: Option<bool>,
    fill: Option<f32>,
    orientation: Option<Orientation>,
    shape: Option<IconShape>,
    item: Option<ItemKind>,
    rarity: Option<Rarity>,
    variants: Option<u32>,
    frames: Option<u32>,
    motion: Option<Motion>,
    seed: Option<u32>,
}

impl Attributes {
    fn parse(raw: &BTreeMap<String, String>) -> Result<Self> {
        let mut attrs = Attributes::default();
        for (key, value) in raw {
            let value = value.trim();
            match key.to_ascii_lowercase().as_str() {
                "style" => attrs.style = Some(value.parse()?),
                "color" | "colour" => {
                    attrs.color = Some(Color::parse(value).ok_or_else(|| {
                        KilnError::SpecificationError(format!("Unknown color '{}'", value))
                    })?)
                }
                "state" => attrs.state = Some(value.parse()?),
                "label" | "title" => {
                    attrs.label = Some(value.to_string()).filter(|l| !l.is_empty())
                }
                "material" => attrs.material = Some(value.parse()?),
                "archetype" => attrs.archetype = Some(value.parse()?),
                "size" => attrs.size = Some(value.parse()?),
                "animated" => attrs.animated = Some(parse_bool(key, value)?),
                "fill" => attrs.fill = Some(parse_fill(value)?),
                "orientation" => attrs.orientation = Some(value.parse()?),
                "shape" => attrs.shape = Some(value.parse()?),
                "item" => attrs.item = Some(value.parse()?),
                "rarity" => attrs.rarity = Some(value.parse()?),
                "variants" => attrs.variants = Some(parse_count(key, value, 1, 16)?),
                "frames" => attrs.frames = Some(parse_count(key, value, 2, 32)?),
                "motion" => attrs.motion = Some(value.parse()?),
                "seed" => {
                    attrs.seed = Some(value.parse().map_err(|_| {
                        KilnError::SpecificationError(format!("seed '{}' is not a u32", value))
                    })?)
                }
                other => tracing::debug!(key = other, "Ignoring unknown attribute"),
            }
        }
        Ok(attrs)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(KilnError::SpecificationError(format!(
            "{} must be a boolean, got '{}'",
            key, value
        ))),
    }
}

/// `0.4`, `40` and `40%` all mean forty percent
fn parse_fill(value: &str) -> Result<f32> {
    let trimmed = value.trim_end_matches('%');
    let mut fill: f32 = trimmed
        .parse()
        .map_err(|_| KilnError::SpecificationError(format!("fill '{}' is not a number", value)))?;
    if value.ends_with('%') || fill > 1.0 {
        fill /= 100.0;
    }
    if !(0.0..=1.0).contains(&fill) {
        return Err(KilnError::SpecificationError(format!(
            "fill '{}' outside 0..=100%",
            value
        )));
    }
    Ok(fill)
}

fn parse_count(key: &str, value: &str, min: u32, max: u32) -> Result<u32> {
    let n: u32 = value.parse().map_err(|_| {
        KilnError::SpecificationError(format!("{} '{}' is not a whole number", key, value))
    })?;
    if n < min || n > max {
        return Err(KilnError::SpecificationError(format!(
            "{} must be within {}..={}, got {}",
            key, min, max, n
        )));
    }
    Ok(n)
}

/// Builds specifications with a chosen inference strategy
pub struct SpecBuilder {
    inference: Box<dyn SpecInference>,
}

impl Default for SpecBuilder {
    fn default() -> Self {
        Self::new(Box::new(KeywordInference))
    }
}

impl SpecBuilder {
    pub fn new(inference: Box<dyn SpecInference>) -> Self {
        Self { inference }
    }

    pub fn explicit() -> Self {
        Self::new(Box::new(ExplicitInference))
    }

    /// Resolve every field of the specification for `method`
    pub fn build(
        &self,
        need: &AssetNeed,
        method: GenerationMethod,
        seed: u32,
    ) -> Result<GenerationSpec> {
        let attrs = Attributes::parse(&need.attributes)?;
        let hints = self.inference.infer(need);
        let fills = self.inference.fills_required();

        let dims = need.resolved_dimensions();
        let (width, height) = (dim_or_err(dims.width)?, dim_or_err(dims.height)?);
        let style = attrs
            .style
            .or(hints.style)
            .or(fills.then_some(SurfaceStyle::Flat));
        let seed = attrs.seed.or(fills.then_some(seed));
        let color = attrs.color.or(hints.color);
        let shape = attrs.shape.or(hints.shape).unwrap_or(IconShape::Circle);

        let spec = match method {
            GenerationMethod::ParametricDrawing if need.family == AssetFamily::Ui => {
                let category = need.category_tokens();
                if has_any(&category, PANEL_CATEGORIES) {
                    GenerationSpec::Panel(PanelSpec {
                        width,
                        height,
                        color: color.unwrap_or(Color::SLATE),
                        style,
                        title: attrs.label,
                    })
                } else if has_any(&category, GAUGE_CATEGORIES) {
                    GenerationSpec::Gauge(GaugeSpec {
                        width,
                        height,
                        color: color.or(hints.gauge_color).unwrap_or(Color::SLATE),
                        fill: attrs.fill.unwrap_or(DEFAULT_GAUGE_FILL),
                        orientation: attrs.orientation.unwrap_or(if height > width {
                            Orientation::Vertical
                        } else {
                            Orientation::Horizontal
                        }),
                        style,
                    })
                } else {
                    GenerationSpec::Control(ControlSpec {
                        width,
                        height,
                        color: color.unwrap_or(Color::SLATE),
                        state: attrs.state.or(hints.state).unwrap_or(ControlState::Normal),
                        style,
                        label: attrs.label,
                    })
                }
            }
            GenerationMethod::ParametricDrawing => GenerationSpec::Emblem(EmblemSpec {
                width,
                height,
                shape,
                color: color.unwrap_or(Color::SLATE),
                style,
            }),
            GenerationMethod::VectorCodeGeneration => GenerationSpec::Icon(IconSpec {
                width,
                height,
                shape,
                color: color.unwrap_or(Color::SLATE),
                outlined: style == Some(SurfaceStyle::Outline),
            }),
            GenerationMethod::CoherentNoiseTexture => GenerationSpec::Tile(TileSpec {
                width,
                height,
                material: attrs
                    .material
                    .or(hints.material)
                    .unwrap_or(Material::Stone),
                seed,
                variants: attrs.variants.unwrap_or(if need.family == AssetFamily::Tileset {
                    DEFAULT_TILESET_VARIANTS
                } else {
                    1
                }),
            }),
            GenerationMethod::FrameInterpolation => GenerationSpec::Animation(AnimationSpec {
                frame_width: width,
                frame_height: height,
                frames: attrs.frames.unwrap_or(DEFAULT_FRAMES),
                motion: attrs.motion.or(hints.motion).unwrap_or(Motion::Pulse),
                shape,
                color: color.unwrap_or(Color::SLATE),
                seed,
            }),
            GenerationMethod::SymmetryPixelSynthesis if need.is_item_like() => {
                let kind = attrs.item.or(hints.item).unwrap_or(ItemKind::Gem);
                GenerationSpec::Item(ItemSpec {
                    width,
                    height,
                    kind,
                    rarity: attrs.rarity.or(hints.rarity).unwrap_or(Rarity::Common),
                    color: color.unwrap_or_else(|| kind.base_color()),
                    seed,
                })
            }
            GenerationMethod::SymmetryPixelSynthesis
            | GenerationMethod::CellularAutomataSynthesis => {
                let archetype = attrs
                    .archetype
                    .or(hints.archetype)
                    .unwrap_or(Archetype::Creature);
                GenerationSpec::Character(CharacterSpec {
                    width,
                    height,
                    archetype,
                    size: attrs.size.unwrap_or_else(|| need.size_class()),
                    synthesis: if method == GenerationMethod::CellularAutomataSynthesis {
                        Synthesis::Cellular
                    } else {
                        Synthesis::Symmetry
                    },
                    color: color.unwrap_or_else(|| archetype.base_color()),
                    seed,
                    animated: attrs.animated.or(hints.animated).unwrap_or(false),
                })
            }
        };

        tracing::debug!(
            kind = spec.kind(),
            inference = self.inference.name(),
            dims = %spec.requested_dimensions(),
            "Built specification"
        );
        Ok(spec)
    }
}

fn dim_or_err(value: u32) -> Result<u32> {
    if value == 0 {
        Err(KilnError::SpecificationError(
            "dimensions must be non-zero".to_string(),
        ))
    } else {
        Ok(value)
    }
}

impl Archetype {
    /// Body color used when the need names none
    pub fn base_color(&self) -> Color {
        match self {
            Archetype::Humanoid => Color::BLUE,
            Archetype::Mechanical => Color::GRAY,
            Archetype::Creature => Color::GREEN,
        }
    }
}

impl ItemKind {
    /// Dominant material color used when the need names none
    pub fn base_color(&self) -> Color {
        match self {
            ItemKind::Sword | ItemKind::Shield | ItemKind::Helmet | ItemKind::Armor => {
                Color::rgb(0xB8, 0xC0, 0xCC)
            }
            ItemKind::Potion => Color::RED,
            ItemKind::Gem => Color::PURPLE,
            ItemKind::Coin | ItemKind::Key | ItemKind::Ring => Color::GOLD,
            ItemKind::Scroll => Color::rgb(0xE8, 0xD8, 0xB0),
            ItemKind::Bow | ItemKind::Staff => Color::BROWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::Dimensions;

    fn build(need: &AssetNeed, method: GenerationMethod) -> GenerationSpec {
        SpecBuilder::default().build(need, method, 42).unwrap()
    }

    #[test]
    fn test_glossy_blue_button() {
        let need = AssetNeed::new(AssetFamily::Ui, "glossy blue primary button")
            .category("button")
            .dimensions(120, 40);
        match build(&need, GenerationMethod::ParametricDrawing) {
            GenerationSpec::Control(c) => {
                assert_eq!(c.style, Some(SurfaceStyle::Glossy));
                assert_eq!(c.color, Color::BLUE);
                assert_eq!(c.state, ControlState::Normal);
                assert_eq!((c.width, c.height), (120, 40));
            }
            other => panic!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn test_attributes_override_keywords() {
        let need = AssetNeed::new(AssetFamily::Ui, "glossy blue button")
            .category("button")
            .attribute("style", "glass")
            .attribute("color", "#FF0000")
            .attribute("label", "OK");
        match build(&need, GenerationMethod::ParametricDrawing) {
            GenerationSpec::Control(c) => {
                assert_eq!(c.style, Some(SurfaceStyle::Glass));
                assert_eq!(c.color, Color::rgb(255, 0, 0));
                assert_eq!(c.label.as_deref(), Some("OK"));
            }
            other => panic!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_when_nothing_matches() {
        let need = AssetNeed::new(AssetFamily::Ui, "submit").category("button");
        match build(&need, GenerationMethod::ParametricDrawing) {
            GenerationSpec::Control(c) => {
                assert_eq!(c.style, Some(SurfaceStyle::Flat));
                assert_eq!(c.color, Color::SLATE);
                assert_eq!((c.width, c.height), (120, 40));
            }
            other => panic!("expected control, got {:?}", other),
        }
    }

    #[test]
    fn test_gauge_resource_color() {
        let need = AssetNeed::new(AssetFamily::Ui, "player mana bar").category("bar");
        match build(&need, GenerationMethod::ParametricDrawing) {
            GenerationSpec::Gauge(g) => {
                assert_eq!(g.color, Color::BLUE);
                assert_eq!(g.orientation, Orientation::Horizontal);
                assert_eq!(g.fill, DEFAULT_GAUGE_FILL);
            }
            other => panic!("expected gauge, got {:?}", other),
        }
        // An explicit color word beats the resource tie-in
        let need = AssetNeed::new(AssetFamily::Ui, "purple health bar").category("gauge");
        match build(&need, GenerationMethod::ParametricDrawing) {
            GenerationSpec::Gauge(g) => assert_eq!(g.color, Color::PURPLE),
            other => panic!("expected gauge, got {:?}", other),
        }
    }

    #[test]
    fn test_panel_and_fill_attribute() {
        let need = AssetNeed::new(AssetFamily::Ui, "inventory window").category("window");
        assert!(matches!(
            build(&need, GenerationMethod::ParametricDrawing),
            GenerationSpec::Panel(_)
        ));
        let need = AssetNeed::new(AssetFamily::Ui, "loading").category("progress")
            .attribute("fill", "40%");
        match build(&need, GenerationMethod::ParametricDrawing) {
            GenerationSpec::Gauge(g) => assert!((g.fill - 0.4).abs() < 1e-6),
            other => panic!("expected gauge, got {:?}", other),
        }
    }

    #[test]
    fn test_character_spec() {
        let need = AssetNeed::new(AssetFamily::Sprite, "small animated elf archer")
            .category("character");
        match build(&need, GenerationMethod::SymmetryPixelSynthesis) {
            GenerationSpec::Character(c) => {
                assert_eq!(c.archetype, Archetype::Humanoid);
                assert_eq!(c.size, SizeClass::Small);
                assert_eq!(c.synthesis, Synthesis::Symmetry);
                assert_eq!(c.seed, Some(42));
                assert!(c.animated);
                assert_eq!((c.width, c.height), (32, 32));
            }
            other => panic!("expected character, got {:?}", other),
        }
    }

    #[test]
    fn test_item_spec() {
        let need = AssetNeed::new(AssetFamily::Sprite, "legendary fire sword").category("weapon");
        match build(&need, GenerationMethod::SymmetryPixelSynthesis) {
            GenerationSpec::Item(i) => {
                assert_eq!(i.kind, ItemKind::Sword);
                assert_eq!(i.rarity, Rarity::Legendary);
                assert_eq!(i.color, ItemKind::Sword.base_color());
            }
            other => panic!("expected item, got {:?}", other),
        }
    }

    #[test]
    fn test_tile_and_tileset_variants() {
        let texture = AssetNeed::new(AssetFamily::Texture, "molten lava floor");
        match build(&texture, GenerationMethod::CoherentNoiseTexture) {
            GenerationSpec::Tile(t) => {
                assert_eq!(t.material, Material::Lava);
                assert_eq!(t.variants, 1);
            }
            other => panic!("expected tile, got {:?}", other),
        }
        let tileset = AssetNeed::new(AssetFamily::Tileset, "grass").attribute("variants", "6");
        match build(&tileset, GenerationMethod::CoherentNoiseTexture) {
            GenerationSpec::Tile(t) => assert_eq!(t.variants, 6),
            other => panic!("expected tile, got {:?}", other),
        }
    }

    #[test]
    fn test_icon_and_animation() {
        let icon = AssetNeed::new(AssetFamily::Icon, "outline settings gear");
        match build(&icon, GenerationMethod::VectorCodeGeneration) {
            GenerationSpec::Icon(i) => {
                assert_eq!(i.shape, IconShape::Gear);
                assert!(i.outlined);
                assert_eq!((i.width, i.height), (32, 32));
            }
            other => panic!("expected icon, got {:?}", other),
        }
        let anim = AssetNeed::new(AssetFamily::Animation, "spinning gold coin star")
            .attribute("frames", "4");
        let spec = build(&anim, GenerationMethod::FrameInterpolation);
        assert_eq!(spec.output_dimensions(), Dimensions::new(256, 64));
        match spec {
            GenerationSpec::Animation(a) => {
                // "spinning" is not the keyword "spin"
                assert_eq!(a.motion, Motion::Pulse);
                assert_eq!(a.shape, IconShape::Star);
                assert_eq!(a.frames, 4);
            }
            other => panic!("expected animation, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_inference_leaves_required_fields_open() {
        let builder = SpecBuilder::explicit();
        let need = AssetNeed::new(AssetFamily::Ui, "glossy red button").category("button");
        let spec = builder
            .build(&need, GenerationMethod::ParametricDrawing, 9)
            .unwrap();
        assert_eq!(spec.surface_style(), None);
        match &spec {
            GenerationSpec::Control(c) => assert_eq!(c.color, Color::SLATE),
            other => panic!("expected control, got {:?}", other),
        }

        let need = AssetNeed::new(AssetFamily::Sprite, "golem").category("creature");
        let spec = builder
            .build(&need, GenerationMethod::CellularAutomataSynthesis, 9)
            .unwrap();
        assert_eq!(spec.seed(), None);

        let need = need.attribute("seed", "77");
        let spec = builder
            .build(&need, GenerationMethod::CellularAutomataSynthesis, 9)
            .unwrap();
        assert_eq!(spec.seed(), Some(77));
    }

    #[test]
    fn test_bad_attribute_is_specification_error() {
        let need = AssetNeed::new(AssetFamily::Ui, "button")
            .category("button")
            .attribute("style", "chrome");
        let err = SpecBuilder::default()
            .build(&need, GenerationMethod::ParametricDrawing, 1)
            .unwrap_err();
        assert!(matches!(err, KilnError::SpecificationError(_)));

        let need = AssetNeed::new(AssetFamily::Animation, "x").attribute("frames", "100");
        assert!(SpecBuilder::default()
            .build(&need, GenerationMethod::FrameInterpolation, 1)
            .is_err());
    }

    #[test]
    fn test_build_is_deterministic() {
        let need = AssetNeed::new(AssetFamily::Sprite, "boss robot").category("enemy");
        let a = build(&need, GenerationMethod::SymmetryPixelSynthesis);
        let b = build(&need, GenerationMethod::SymmetryPixelSynthesis);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_fill() {
        assert_eq!(parse_fill("0.5").unwrap(), 0.5);
        assert_eq!(parse_fill("50").unwrap(), 0.5);
        assert_eq!(parse_fill("25%").unwrap(), 0.25);
        assert!(parse_fill("150").is_err());
        assert!(parse_fill("lots").is_err());
    }
}
