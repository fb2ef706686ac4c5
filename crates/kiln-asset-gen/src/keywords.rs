//! Keyword tables for free-text inference
//!
//! Each table is scanned in order and the first entry whose keyword appears
//! among the request's word tokens wins. Word order in the description never
//! matters, only table order.

use crate::spec::{
    Archetype, ControlState, IconShape, ItemKind, Material, Motion, Rarity, SizeClass,
    SurfaceStyle,
};
use kiln_core::Color;

/// Lowercase alphanumeric word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect()
}

/// First table entry whose keyword occurs in `tokens`
pub fn first_match<T: Copy>(tokens: &[String], table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(keyword, _)| tokens.iter().any(|t| t == keyword))
        .map(|(_, value)| *value)
}

pub fn has_any(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(&t.as_str()))
}

pub const STYLE: &[(&str, SurfaceStyle)] = &[
    ("glossy", SurfaceStyle::Glossy),
    ("glass", SurfaceStyle::Glass),
    ("outline", SurfaceStyle::Outline),
    ("pixel", SurfaceStyle::Pixel),
    ("flat", SurfaceStyle::Flat),
];

pub const COLOR: &[(&str, Color)] = &[
    ("red", Color::RED),
    ("green", Color::GREEN),
    ("blue", Color::BLUE),
    ("gold", Color::GOLD),
    ("yellow", Color::GOLD),
    ("purple", Color::PURPLE),
    ("orange", Color::ORANGE),
    ("gray", Color::GRAY),
    ("grey", Color::GRAY),
    ("black", Color::rgb(0x22, 0x22, 0x26)),
    ("white", Color::rgb(0xF2, 0xF2, 0xF2)),
    ("brown", Color::BROWN),
];

pub const STATE: &[(&str, ControlState)] = &[
    ("disabled", ControlState::Disabled),
    ("pressed", ControlState::Pressed),
    ("hover", ControlState::Hover),
];

/// Resource gauges pick a color when no color word is present
pub const GAUGE_COLOR: &[(&str, Color)] = &[
    ("health", Color::RED),
    ("mana", Color::BLUE),
    ("stamina", Color::GREEN),
    ("xp", Color::GOLD),
    ("experience", Color::GOLD),
];

pub const ARCHETYPE: &[(&str, Archetype)] = &[
    ("robot", Archetype::Mechanical),
    ("mech", Archetype::Mechanical),
    ("golem", Archetype::Mechanical),
    ("android", Archetype::Mechanical),
    ("automaton", Archetype::Mechanical),
    ("knight", Archetype::Humanoid),
    ("warrior", Archetype::Humanoid),
    ("mage", Archetype::Humanoid),
    ("wizard", Archetype::Humanoid),
    ("human", Archetype::Humanoid),
    ("elf", Archetype::Humanoid),
    ("dwarf", Archetype::Humanoid),
    ("villager", Archetype::Humanoid),
    ("soldier", Archetype::Humanoid),
    ("archer", Archetype::Humanoid),
    ("hero", Archetype::Humanoid),
    ("player", Archetype::Humanoid),
    ("npc", Archetype::Humanoid),
    ("rogue", Archetype::Humanoid),
    ("orc", Archetype::Humanoid),
];

pub const SIZE: &[(&str, SizeClass)] = &[
    ("tiny", SizeClass::Small),
    ("small", SizeClass::Small),
    ("large", SizeClass::Large),
    ("big", SizeClass::Large),
    ("huge", SizeClass::Large),
    ("boss", SizeClass::Large),
];

pub const MATERIAL: &[(&str, Material)] = &[
    ("lava", Material::Lava),
    ("water", Material::Water),
    ("snow", Material::Snow),
    ("sand", Material::Sand),
    ("grass", Material::Grass),
    ("dirt", Material::Dirt),
    ("stone", Material::Stone),
    ("wood", Material::Wood),
];

pub const SHAPE: &[(&str, IconShape)] = &[
    ("heart", IconShape::Heart),
    ("star", IconShape::Star),
    ("plus", IconShape::Plus),
    ("add", IconShape::Plus),
    ("cross", IconShape::Cross),
    ("close", IconShape::Cross),
    ("check", IconShape::Check),
    ("arrow", IconShape::Arrow),
    ("gear", IconShape::Gear),
    ("settings", IconShape::Gear),
    ("diamond", IconShape::Diamond),
    ("triangle", IconShape::Triangle),
    ("square", IconShape::Square),
    ("circle", IconShape::Circle),
];

pub const ITEM: &[(&str, ItemKind)] = &[
    ("sword", ItemKind::Sword),
    ("shield", ItemKind::Shield),
    ("potion", ItemKind::Potion),
    ("gem", ItemKind::Gem),
    ("coin", ItemKind::Coin),
    ("key", ItemKind::Key),
    ("ring", ItemKind::Ring),
    ("scroll", ItemKind::Scroll),
    ("bow", ItemKind::Bow),
    ("staff", ItemKind::Staff),
    ("helmet", ItemKind::Helmet),
    ("armor", ItemKind::Armor),
];

pub const RARITY: &[(&str, Rarity)] = &[
    ("legendary", Rarity::Legendary),
    ("epic", Rarity::Epic),
    ("rare", Rarity::Rare),
    ("common", Rarity::Common),
];

pub const MOTION: &[(&str, Motion)] = &[
    ("spin", Motion::Spin),
    ("rotate", Motion::Spin),
    ("bounce", Motion::Bounce),
    ("fade", Motion::Fade),
    ("pulse", Motion::Pulse),
];

/// Categories routed to character synthesis
pub const CHARACTER_CATEGORIES: &[&str] = &[
    "character", "creature", "npc", "monster", "enemy", "hero", "player", "mob", "boss",
];

/// Categories routed to item synthesis
pub const ITEM_CATEGORIES: &[&str] = &[
    "item",
    "equipment",
    "consumable",
    "collectible",
    "weapon",
    "armor",
    "pickup",
    "loot",
];

pub const TERRAIN_CATEGORIES: &[&str] = &["terrain", "ground", "floor"];

pub const PANEL_CATEGORIES: &[&str] = &["panel", "frame", "window", "dialog"];

pub const GAUGE_CATEGORIES: &[&str] = &["bar", "gauge", "meter", "progress"];

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Glossy-blue  PRIMARY_button!"),
            vec!["glossy", "blue", "primary", "button"]
        );
        assert!(tokenize("  --  ").is_empty());
    }

    #[test]
    fn test_table_order_beats_word_order() {
        // "outline" appears first in the text but "glossy" ranks higher
        assert_eq!(
            first_match(&tokens("outline glossy button"), STYLE),
            Some(SurfaceStyle::Glossy)
        );
        assert_eq!(
            first_match(&tokens("blue and red"), COLOR),
            Some(Color::RED)
        );
        assert_eq!(
            first_match(&tokens("hover disabled"), STATE),
            Some(ControlState::Disabled)
        );
    }

    #[test]
    fn test_whole_word_matching() {
        // "reddish" and "bluebird" are not color words
        assert_eq!(first_match(&tokens("reddish bluebird"), COLOR), None);
        assert_eq!(first_match(&tokens("a keyring"), ITEM), None);
    }

    #[test]
    fn test_archetype_priority() {
        assert_eq!(
            first_match(&tokens("knight riding a mech"), ARCHETYPE),
            Some(Archetype::Mechanical)
        );
        assert_eq!(first_match(&tokens("slime blob"), ARCHETYPE), None);
    }

    #[test]
    fn test_rarity_and_motion() {
        assert_eq!(
            first_match(&tokens("rare epic sword"), RARITY),
            Some(Rarity::Epic)
        );
        assert_eq!(
            first_match(&tokens("fading rotate"), MOTION),
            Some(Motion::Spin)
        );
    }

    #[test]
    fn test_has_any() {
        assert!(has_any(&tokens("Boss monster"), CHARACTER_CATEGORIES));
        assert!(!has_any(&tokens("button"), ITEM_CATEGORIES));
    }
}
