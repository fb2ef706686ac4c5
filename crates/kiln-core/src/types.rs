//! Request tags and raster value types

use crate::error::KilnError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad family an asset request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFamily {
    Sprite,
    #[serde(alias = "ui-control", alias = "control")]
    Ui,
    Texture,
    Icon,
    #[serde(alias = "tiles")]
    Tileset,
    Animation,
}

impl AssetFamily {
    pub const ALL: [AssetFamily; 6] = [
        AssetFamily::Sprite,
        AssetFamily::Ui,
        AssetFamily::Texture,
        AssetFamily::Icon,
        AssetFamily::Tileset,
        AssetFamily::Animation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFamily::Sprite => "sprite",
            AssetFamily::Ui => "ui",
            AssetFamily::Texture => "texture",
            AssetFamily::Icon => "icon",
            AssetFamily::Tileset => "tileset",
            AssetFamily::Animation => "animation",
        }
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetFamily {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sprite" => Ok(AssetFamily::Sprite),
            "ui" | "ui-control" | "control" => Ok(AssetFamily::Ui),
            "texture" => Ok(AssetFamily::Texture),
            "icon" => Ok(AssetFamily::Icon),
            "tileset" | "tiles" => Ok(AssetFamily::Tileset),
            "animation" => Ok(AssetFamily::Animation),
            other => Err(KilnError::UnsupportedFamily(other.to_string())),
        }
    }
}

/// Procedural strategy chosen by the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMethod {
    ParametricDrawing,
    SymmetryPixelSynthesis,
    CellularAutomataSynthesis,
    CoherentNoiseTexture,
    VectorCodeGeneration,
    FrameInterpolation,
}

impl GenerationMethod {
    pub const ALL: [GenerationMethod; 6] = [
        GenerationMethod::ParametricDrawing,
        GenerationMethod::SymmetryPixelSynthesis,
        GenerationMethod::CellularAutomataSynthesis,
        GenerationMethod::CoherentNoiseTexture,
        GenerationMethod::VectorCodeGeneration,
        GenerationMethod::FrameInterpolation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::ParametricDrawing => "parametric-drawing",
            GenerationMethod::SymmetryPixelSynthesis => "symmetry-pixel-synthesis",
            GenerationMethod::CellularAutomataSynthesis => "cellular-automata-synthesis",
            GenerationMethod::CoherentNoiseTexture => "coherent-noise-texture",
            GenerationMethod::VectorCodeGeneration => "vector-code-generation",
            GenerationMethod::FrameInterpolation => "frame-interpolation",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMethod {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parametric-drawing" => Ok(GenerationMethod::ParametricDrawing),
            "symmetry-pixel-synthesis" => Ok(GenerationMethod::SymmetryPixelSynthesis),
            "cellular-automata-synthesis" => Ok(GenerationMethod::CellularAutomataSynthesis),
            "coherent-noise-texture" => Ok(GenerationMethod::CoherentNoiseTexture),
            "vector-code-generation" => Ok(GenerationMethod::VectorCodeGeneration),
            "frame-interpolation" => Ok(GenerationMethod::FrameInterpolation),
            other => Err(KilnError::UnknownMethod(other.to_string())),
        }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = KilnError;

    /// Parse a `WxH` string such as `120x40`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .to_ascii_lowercase()
            .split_once('x')
            .map(|(w, h)| (w.trim().to_string(), h.trim().to_string()))
            .ok_or_else(|| KilnError::SpecificationError(format!("expected WxH, got '{}'", s)))?;
        let width = w
            .parse()
            .map_err(|e| KilnError::SpecificationError(format!("invalid width '{}': {}", w, e)))?;
        let height = h
            .parse()
            .map_err(|e| KilnError::SpecificationError(format!("invalid height '{}': {}", h, e)))?;
        Ok(Self { width, height })
    }
}

/// An 8-bit RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(0xD6, 0x3C, 0x3C);
    pub const GREEN: Self = Self::rgb(0x3C, 0xA5, 0x4A);
    pub const BLUE: Self = Self::rgb(0x2F, 0x6F, 0xDB);
    pub const GOLD: Self = Self::rgb(0xE8, 0xB9, 0x2E);
    pub const PURPLE: Self = Self::rgb(0x8A, 0x4F, 0xD1);
    pub const ORANGE: Self = Self::rgb(0xEE, 0x84, 0x2B);
    pub const GRAY: Self = Self::rgb(0x8C, 0x8C, 0x8C);
    pub const BROWN: Self = Self::rgb(0x8B, 0x5A, 0x2B);
    pub const SLATE: Self = Self::rgb(0x4A, 0x55, 0x68);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Look up one of the named palette colors
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "gold" | "yellow" => Some(Self::GOLD),
            "purple" => Some(Self::PURPLE),
            "orange" => Some(Self::ORANGE),
            "gray" | "grey" => Some(Self::GRAY),
            "black" => Some(Self::rgb(0x22, 0x22, 0x26)),
            "white" => Some(Self::rgb(0xF2, 0xF2, 0xF2)),
            "brown" => Some(Self::BROWN),
            "slate" => Some(Self::SLATE),
            _ => None,
        }
    }

    /// Parse a named color or a hex string
    pub fn parse(s: &str) -> Option<Self> {
        Self::named(s).or_else(|| Self::parse_hex(s))
    }

    pub fn to_hex_string(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Move toward white by `amount` in [0, 1]
    pub fn lighten(self, amount: f32) -> Self {
        self.lerp(Self::WHITE.with_alpha(self.a), amount)
    }

    /// Move toward black by `amount` in [0, 1]
    pub fn darken(self, amount: f32) -> Self {
        self.lerp(Self::BLACK.with_alpha(self.a), amount)
    }

    /// Desaturate toward the color's own luminance
    pub fn grayscale(self, amount: f32) -> Self {
        let luma =
            (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32).round() as u8;
        self.lerp(Self::rgba(luma, luma, luma, self.a), amount)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::SLATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse_and_aliases() {
        assert_eq!("ui".parse::<AssetFamily>().unwrap(), AssetFamily::Ui);
        assert_eq!("UI-Control".parse::<AssetFamily>().unwrap(), AssetFamily::Ui);
        assert_eq!("tiles".parse::<AssetFamily>().unwrap(), AssetFamily::Tileset);
        assert!(matches!(
            "hologram".parse::<AssetFamily>(),
            Err(KilnError::UnsupportedFamily(_))
        ));
    }

    #[test]
    fn test_method_string_form() {
        for method in [
            GenerationMethod::ParametricDrawing,
            GenerationMethod::SymmetryPixelSynthesis,
            GenerationMethod::CellularAutomataSynthesis,
            GenerationMethod::CoherentNoiseTexture,
            GenerationMethod::VectorCodeGeneration,
            GenerationMethod::FrameInterpolation,
        ] {
            assert_eq!(method.as_str().parse::<GenerationMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_dimensions_display_and_parse() {
        let dims = Dimensions::new(120, 40);
        assert_eq!(dims.to_string(), "120x40");
        assert_eq!("120x40".parse::<Dimensions>().unwrap(), dims);
        assert_eq!(" 64 X 32 ".parse::<Dimensions>().unwrap(), Dimensions::new(64, 32));
        assert!("120".parse::<Dimensions>().is_err());
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("blue"), Some(Color::BLUE));
        assert_eq!(Color::parse("#FF0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("#00ff0080"), Some(Color::rgba(0, 255, 0, 128)));
        assert_eq!(Color::parse("#abc"), None);
        assert_eq!(Color::parse("chartreuse"), None);
    }

    #[test]
    fn test_color_lerp_endpoints() {
        let a = Color::BLACK;
        let b = Color::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(Color::rgb(0x2F, 0x6F, 0xDB).to_hex_string(), "#2F6FDB");
    }
}
