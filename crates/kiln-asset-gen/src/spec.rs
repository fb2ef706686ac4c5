//! Generation specifications
//!
//! One concrete parameter shape per generator. A specification together with
//! its seed fully determines the generator's output bytes.

use kiln_core::{AssetFamily, Color, Dimensions, GenerationMethod, KilnError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed keyword enum with string conversions.
///
/// The first listed name of each variant is canonical; the rest are accepted
/// aliases when parsing.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => [$canonical:literal $(, $alias:literal)*]),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = KilnError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($canonical $(| $alias)* => Ok($name::$variant),)+
                    other => Err(KilnError::SpecificationError(format!(
                        "Unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

keyword_enum! {
    /// Surface treatment for drawn UI elements
    pub enum SurfaceStyle {
        Flat => ["flat"],
        Glossy => ["glossy", "shiny"],
        Glass => ["glass"],
        Outline => ["outline", "outlined"],
        Pixel => ["pixel", "retro"],
    }
}

keyword_enum! {
    pub enum ControlState {
        Normal => ["normal", "default"],
        Hover => ["hover"],
        Pressed => ["pressed", "active"],
        Disabled => ["disabled"],
    }
}

keyword_enum! {
    pub enum Orientation {
        Horizontal => ["horizontal"],
        Vertical => ["vertical"],
    }
}

keyword_enum! {
    pub enum Archetype {
        Humanoid => ["humanoid"],
        Mechanical => ["mechanical", "robot"],
        Creature => ["creature", "monster"],
    }
}

keyword_enum! {
    pub enum SizeClass {
        Small => ["small", "tiny"],
        Medium => ["medium"],
        Large => ["large", "big"],
    }
}

keyword_enum! {
    /// Which primitive shapes a character's silhouette
    pub enum Synthesis {
        Symmetry => ["symmetry"],
        Cellular => ["cellular"],
    }
}

keyword_enum! {
    pub enum Material {
        Lava => ["lava"],
        Water => ["water"],
        Snow => ["snow"],
        Sand => ["sand"],
        Grass => ["grass"],
        Dirt => ["dirt"],
        Stone => ["stone"],
        Wood => ["wood"],
    }
}

keyword_enum! {
    pub enum IconShape {
        Heart => ["heart"],
        Star => ["star"],
        Plus => ["plus", "add"],
        Cross => ["cross", "close"],
        Check => ["check"],
        Arrow => ["arrow"],
        Gear => ["gear", "settings"],
        Diamond => ["diamond"],
        Triangle => ["triangle"],
        Square => ["square"],
        Circle => ["circle"],
    }
}

keyword_enum! {
    pub enum ItemKind {
        Sword => ["sword"],
        Shield => ["shield"],
        Potion => ["potion"],
        Gem => ["gem"],
        Coin => ["coin"],
        Key => ["key"],
        Ring => ["ring"],
        Scroll => ["scroll"],
        Bow => ["bow"],
        Staff => ["staff"],
        Helmet => ["helmet"],
        Armor => ["armor"],
    }
}

keyword_enum! {
    pub enum Rarity {
        Common => ["common"],
        Rare => ["rare"],
        Epic => ["epic"],
        Legendary => ["legendary"],
    }
}

keyword_enum! {
    pub enum Motion {
        Spin => ["spin", "rotate"],
        Bounce => ["bounce"],
        Fade => ["fade"],
        Pulse => ["pulse"],
    }
}

impl Rarity {
    /// Accent color applied to item outlines
    pub fn accent(&self) -> Color {
        match self {
            Rarity::Common => Color::GRAY,
            Rarity::Rare => Color::BLUE,
            Rarity::Epic => Color::PURPLE,
            Rarity::Legendary => Color::ORANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub width: u32,
    pub height: u32,
    pub color: Color,
    pub state: ControlState,
    pub style: Option<SurfaceStyle>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub width: u32,
    pub height: u32,
    pub color: Color,
    pub style: Option<SurfaceStyle>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeSpec {
    pub width: u32,
    pub height: u32,
    pub color: Color,
    /// Filled fraction, 0..=1
    pub fill: f32,
    pub orientation: Orientation,
    pub style: Option<SurfaceStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
    pub width: u32,
    pub height: u32,
    pub shape: IconShape,
    pub color: Color,
    pub outlined: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub width: u32,
    pub height: u32,
    pub archetype: Archetype,
    pub size: SizeClass,
    pub synthesis: Synthesis,
    pub color: Color,
    pub seed: Option<u32>,
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub width: u32,
    pub height: u32,
    pub material: Material,
    pub seed: Option<u32>,
    /// Extra variants packed into a sheet; 1 means a single tile
    pub variants: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub width: u32,
    pub height: u32,
    pub kind: ItemKind,
    pub rarity: Rarity,
    pub color: Color,
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub frame_width: u32,
    pub frame_height: u32,
    pub frames: u32,
    pub motion: Motion,
    pub shape: IconShape,
    pub color: Color,
    pub seed: Option<u32>,
}

/// A parametric badge for sprite requests no other generator claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmblemSpec {
    pub width: u32,
    pub height: u32,
    pub shape: IconShape,
    pub color: Color,
    pub style: Option<SurfaceStyle>,
}

/// The fully resolved parameter set for one generation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GenerationSpec {
    Control(ControlSpec),
    Panel(PanelSpec),
    Gauge(GaugeSpec),
    Icon(IconSpec),
    Character(CharacterSpec),
    Tile(TileSpec),
    Item(ItemSpec),
    Animation(AnimationSpec),
    Emblem(EmblemSpec),
}

impl GenerationSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationSpec::Control(_) => "control",
            GenerationSpec::Panel(_) => "panel",
            GenerationSpec::Gauge(_) => "gauge",
            GenerationSpec::Icon(_) => "icon",
            GenerationSpec::Character(_) => "character",
            GenerationSpec::Tile(_) => "tile",
            GenerationSpec::Item(_) => "item",
            GenerationSpec::Animation(_) => "animation",
            GenerationSpec::Emblem(_) => "emblem",
        }
    }

    pub fn method(&self) -> GenerationMethod {
        match self {
            GenerationSpec::Control(_)
            | GenerationSpec::Panel(_)
            | GenerationSpec::Gauge(_)
            | GenerationSpec::Emblem(_) => GenerationMethod::ParametricDrawing,
            GenerationSpec::Icon(_) => GenerationMethod::VectorCodeGeneration,
            GenerationSpec::Character(c) => match c.synthesis {
                Synthesis::Symmetry => GenerationMethod::SymmetryPixelSynthesis,
                Synthesis::Cellular => GenerationMethod::CellularAutomataSynthesis,
            },
            GenerationSpec::Tile(_) => GenerationMethod::CoherentNoiseTexture,
            GenerationSpec::Item(_) => GenerationMethod::SymmetryPixelSynthesis,
            GenerationSpec::Animation(_) => GenerationMethod::FrameInterpolation,
        }
    }

    /// The width and height the request asked for.
    ///
    /// For animations this is one frame.
    pub fn requested_dimensions(&self) -> Dimensions {
        match self {
            GenerationSpec::Control(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Panel(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Gauge(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Icon(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Character(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Tile(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Item(s) => Dimensions::new(s.width, s.height),
            GenerationSpec::Animation(s) => Dimensions::new(s.frame_width, s.frame_height),
            GenerationSpec::Emblem(s) => Dimensions::new(s.width, s.height),
        }
    }

    /// Dimensions of the primary payload the generator emits
    pub fn output_dimensions(&self) -> Dimensions {
        match self {
            GenerationSpec::Animation(s) => {
                Dimensions::new(s.frame_width * s.frames.max(1), s.frame_height)
            }
            other => other.requested_dimensions(),
        }
    }

    pub fn seed(&self) -> Option<u32> {
        match self {
            GenerationSpec::Character(s) => s.seed,
            GenerationSpec::Tile(s) => s.seed,
            GenerationSpec::Item(s) => s.seed,
            GenerationSpec::Animation(s) => s.seed,
            _ => None,
        }
    }

    pub fn surface_style(&self) -> Option<SurfaceStyle> {
        match self {
            GenerationSpec::Control(s) => s.style,
            GenerationSpec::Panel(s) => s.style,
            GenerationSpec::Gauge(s) => s.style,
            GenerationSpec::Emblem(s) => s.style,
            _ => None,
        }
    }

    /// UI specs must declare a surface style
    pub fn requires_style(&self) -> bool {
        matches!(
            self,
            GenerationSpec::Control(_) | GenerationSpec::Panel(_) | GenerationSpec::Gauge(_)
        )
    }

    /// Seeded sprite and tile specs must declare a seed
    pub fn requires_seed(&self) -> bool {
        matches!(
            self,
            GenerationSpec::Character(_)
                | GenerationSpec::Item(_)
                | GenerationSpec::Tile(_)
                | GenerationSpec::Animation(_)
        )
    }

    /// Whether this specification shape can satisfy a request of `family`
    pub fn compatible_with(&self, family: AssetFamily) -> bool {
        match self {
            GenerationSpec::Control(_) | GenerationSpec::Panel(_) | GenerationSpec::Gauge(_) => {
                family == AssetFamily::Ui
            }
            GenerationSpec::Icon(_) => family == AssetFamily::Icon,
            GenerationSpec::Character(_) | GenerationSpec::Item(_) | GenerationSpec::Emblem(_) => {
                family == AssetFamily::Sprite
            }
            GenerationSpec::Tile(_) => matches!(
                family,
                AssetFamily::Texture | AssetFamily::Tileset | AssetFamily::Sprite
            ),
            GenerationSpec::Animation(_) => family == AssetFamily::Animation,
        }
    }

    /// File extension of the primary payload
    pub fn extension(&self) -> &'static str {
        match self {
            GenerationSpec::Icon(_) => "svg",
            _ => "png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> GenerationSpec {
        GenerationSpec::Control(ControlSpec {
            width: 120,
            height: 40,
            color: Color::BLUE,
            state: ControlState::Normal,
            style: Some(SurfaceStyle::Glossy),
            label: None,
        })
    }

    #[test]
    fn test_keyword_enum_parse() {
        assert_eq!("Glossy".parse::<SurfaceStyle>().unwrap(), SurfaceStyle::Glossy);
        assert_eq!("add".parse::<IconShape>().unwrap(), IconShape::Plus);
        assert_eq!("rotate".parse::<Motion>().unwrap(), Motion::Spin);
        assert!("chrome".parse::<SurfaceStyle>().is_err());
        assert_eq!(IconShape::Gear.to_string(), "gear");
        assert_eq!(ItemKind::ALL.len(), 12);
    }

    #[test]
    fn test_method_per_variant() {
        assert_eq!(control().method(), GenerationMethod::ParametricDrawing);
        let character = GenerationSpec::Character(CharacterSpec {
            width: 64,
            height: 64,
            archetype: Archetype::Creature,
            size: SizeClass::Medium,
            synthesis: Synthesis::Cellular,
            color: Color::GREEN,
            seed: Some(1),
            animated: false,
        });
        assert_eq!(
            character.method(),
            GenerationMethod::CellularAutomataSynthesis
        );
    }

    #[test]
    fn test_animation_dimensions() {
        let spec = GenerationSpec::Animation(AnimationSpec {
            frame_width: 64,
            frame_height: 48,
            frames: 6,
            motion: Motion::Bounce,
            shape: IconShape::Star,
            color: Color::GOLD,
            seed: Some(3),
        });
        assert_eq!(spec.requested_dimensions(), Dimensions::new(64, 48));
        assert_eq!(spec.output_dimensions(), Dimensions::new(384, 48));
    }

    #[test]
    fn test_family_compatibility() {
        assert!(control().compatible_with(AssetFamily::Ui));
        assert!(!control().compatible_with(AssetFamily::Sprite));
        let tile = GenerationSpec::Tile(TileSpec {
            width: 32,
            height: 32,
            material: Material::Grass,
            seed: Some(5),
            variants: 1,
        });
        assert!(tile.compatible_with(AssetFamily::Tileset));
        assert!(!tile.compatible_with(AssetFamily::Icon));
    }

    #[test]
    fn test_required_fields() {
        assert!(control().requires_style());
        assert!(!control().requires_seed());
        assert_eq!(control().surface_style(), Some(SurfaceStyle::Glossy));
        assert_eq!(control().seed(), None);
    }

    #[test]
    fn test_spec_serializes_with_kind_tag() {
        let json = serde_json::to_string(&control()).unwrap();
        assert!(json.contains(r#""kind":"control""#));
        assert!(json.contains(r#""style":"glossy""#));
        let back: GenerationSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, control());
    }
}
