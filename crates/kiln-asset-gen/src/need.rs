//! Asset needs: what a caller asks the pipeline for

use crate::config::LimitsConfig;
use crate::keywords::{
    first_match, has_any, tokenize, CHARACTER_CATEGORIES, GAUGE_CATEGORIES, ITEM_CATEGORIES,
    PANEL_CATEGORIES, SIZE,
};
use crate::spec::SizeClass;
use kiln_core::{derive_seed, AssetFamily, Dimensions, KilnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Words kept when deriving a display name
const NAME_WORDS: usize = 5;

/// A caller's abstract request for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetNeed {
    pub family: AssetFamily,
    #[serde(default)]
    pub category: Option<String>,
    pub description: String,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Explicit parameter overrides, e.g. `style = "glass"`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub project: Option<String>,
}

impl AssetNeed {
    pub fn new(family: AssetFamily, description: impl Into<String>) -> Self {
        Self {
            family,
            category: None,
            description: description.into(),
            dimensions: None,
            attributes: BTreeMap::new(),
            tags: Vec::new(),
            project: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(Dimensions::new(width, height));
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Reject needs the pipeline must not attempt, listing every reason
    pub fn validate(&self, limits: &LimitsConfig) -> Result<()> {
        let mut reasons = Vec::new();

        if self.description.trim().is_empty() {
            reasons.push("description is empty".to_string());
        } else if tokenize(&self.description).is_empty() {
            reasons.push("description has no words".to_string());
        }

        if let Some(category) = &self.category {
            if tokenize(category).is_empty() {
                reasons.push(format!("category '{}' has no words", category));
            }
        }

        if let Some(dims) = self.dimensions {
            for (axis, value) in [("width", dims.width), ("height", dims.height)] {
                if value < limits.min_dimension || value > limits.max_dimension {
                    reasons.push(format!(
                        "{} {} outside {}..={}",
                        axis, value, limits.min_dimension, limits.max_dimension
                    ));
                }
            }
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(KilnError::MalformedNeed(reasons))
        }
    }

    /// Word tokens of the description
    pub fn words(&self) -> Vec<String> {
        tokenize(&self.description)
    }

    /// Word tokens of the category and description together
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = self
            .category
            .as_deref()
            .map(tokenize)
            .unwrap_or_default();
        tokens.extend(self.words());
        tokens
    }

    pub fn category_tokens(&self) -> Vec<String> {
        self.category.as_deref().map(tokenize).unwrap_or_default()
    }

    pub fn is_character_like(&self) -> bool {
        has_any(&self.category_tokens(), CHARACTER_CATEGORIES)
    }

    pub fn is_item_like(&self) -> bool {
        has_any(&self.category_tokens(), ITEM_CATEGORIES)
    }

    pub fn seed(&self) -> u32 {
        derive_seed(
            self.family,
            self.category.as_deref(),
            &self.description,
            self.dimensions,
        )
    }

    /// Declared dimensions, or the family default
    pub fn resolved_dimensions(&self) -> Dimensions {
        self.dimensions.unwrap_or_else(|| self.default_dimensions())
    }

    pub fn default_dimensions(&self) -> Dimensions {
        let category = self.category_tokens();
        match self.family {
            AssetFamily::Ui if has_any(&category, PANEL_CATEGORIES) => Dimensions::new(320, 240),
            AssetFamily::Ui if has_any(&category, GAUGE_CATEGORIES) => Dimensions::new(200, 24),
            AssetFamily::Ui => Dimensions::new(120, 40),
            AssetFamily::Icon => Dimensions::square(32),
            AssetFamily::Sprite if self.is_item_like() => Dimensions::square(32),
            AssetFamily::Sprite => Dimensions::square(self.size_class().sprite_edge()),
            AssetFamily::Texture => Dimensions::square(128),
            AssetFamily::Tileset => Dimensions::square(32),
            AssetFamily::Animation => Dimensions::square(64),
        }
    }

    /// Size class from the `size` attribute, else from keywords
    pub fn size_class(&self) -> SizeClass {
        self.attributes
            .get("size")
            .and_then(|s| s.parse().ok())
            .or_else(|| first_match(&self.tokens(), SIZE))
            .unwrap_or(SizeClass::Medium)
    }

    /// Tags the decision engine looks for: explicit tags, else family and category
    pub fn requested_tags(&self) -> Vec<String> {
        let explicit = normalize_tags(&self.tags);
        if !explicit.is_empty() {
            return explicit;
        }
        let mut tags = vec![self.family.to_string()];
        if let Some(category) = &self.category {
            tags.push(category.trim().to_lowercase());
        }
        normalize_tags(&tags)
    }

    /// Tags written onto the registry entry
    pub fn entry_tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        tags.push(self.family.to_string());
        if let Some(category) = &self.category {
            tags.push(category.clone());
        }
        normalize_tags(&tags)
    }

    /// File-safe name from the leading description words
    pub fn asset_name(&self) -> String {
        let words = self.words();
        let name: Vec<&str> = words.iter().take(NAME_WORDS).map(String::as_str).collect();
        if name.is_empty() {
            "asset".to_string()
        } else {
            name.join("-")
        }
    }

    /// PascalCase display name, e.g. `GlossyBluePrimaryButton`
    pub fn symbol_name(&self) -> String {
        let symbol: String = self
            .words()
            .iter()
            .take(NAME_WORDS)
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect();
        match symbol.chars().next() {
            None => "Asset".to_string(),
            Some(c) if c.is_ascii_digit() => format!("Asset{}", symbol),
            Some(_) => symbol,
        }
    }
}

impl SizeClass {
    /// Default square edge for character sprites of this class
    pub fn sprite_edge(&self) -> u32 {
        match self {
            SizeClass::Small => 32,
            SizeClass::Medium => 64,
            SizeClass::Large => 96,
        }
    }
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags.iter().map(|t| t.trim().to_lowercase()) {
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// A TOML file of needs, one `[[need]]` table each
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeedDocument {
    #[serde(default)]
    pub need: Vec<AssetNeed>,
}

impl NeedDocument {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| KilnError::MalformedNeed(vec![e.to_string()]))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> AssetNeed {
        AssetNeed::new(AssetFamily::Ui, "glossy blue primary button")
            .category("button")
            .dimensions(120, 40)
    }

    #[test]
    fn test_valid_need() {
        assert!(button().validate(&LimitsConfig::default()).is_ok());
    }

    #[test]
    fn test_malformed_need_lists_every_reason() {
        let need = AssetNeed::new(AssetFamily::Sprite, "   ")
            .category("character")
            .dimensions(4096, 4);
        match need.validate(&LimitsConfig::default()) {
            Err(KilnError::MalformedNeed(reasons)) => {
                assert_eq!(reasons.len(), 3);
                assert!(reasons[0].contains("description"));
                assert!(reasons[1].contains("width 4096"));
                assert!(reasons[2].contains("height 4"));
            }
            other => panic!("expected malformed need, got {:?}", other),
        }
    }

    #[test]
    fn test_dimension_bounds_are_inclusive() {
        let limits = LimitsConfig::default();
        assert!(AssetNeed::new(AssetFamily::Icon, "x")
            .dimensions(8, 2048)
            .validate(&limits)
            .is_ok());
        assert!(AssetNeed::new(AssetFamily::Icon, "x")
            .dimensions(7, 8)
            .validate(&limits)
            .is_err());
    }

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(button().seed(), button().seed());
        let other = button().dimensions(121, 40);
        assert_ne!(button().seed(), other.seed());
    }

    #[test]
    fn test_default_dimensions() {
        let ui = |cat: &str| AssetNeed::new(AssetFamily::Ui, "thing").category(cat);
        assert_eq!(ui("button").resolved_dimensions(), Dimensions::new(120, 40));
        assert_eq!(ui("panel").resolved_dimensions(), Dimensions::new(320, 240));
        assert_eq!(ui("health bar").resolved_dimensions(), Dimensions::new(200, 24));
        assert_eq!(
            AssetNeed::new(AssetFamily::Sprite, "huge dragon")
                .category("creature")
                .resolved_dimensions(),
            Dimensions::square(96)
        );
        assert_eq!(
            AssetNeed::new(AssetFamily::Sprite, "steel sword")
                .category("weapon")
                .resolved_dimensions(),
            Dimensions::square(32)
        );
        assert_eq!(
            AssetNeed::new(AssetFamily::Texture, "lava")
                .resolved_dimensions(),
            Dimensions::square(128)
        );
        assert_eq!(button().resolved_dimensions(), Dimensions::new(120, 40));
    }

    #[test]
    fn test_size_attribute_overrides_keywords() {
        let need = AssetNeed::new(AssetFamily::Sprite, "tiny slime")
            .category("creature")
            .attribute("size", "large");
        assert_eq!(need.size_class(), SizeClass::Large);
    }

    #[test]
    fn test_tags() {
        assert_eq!(button().requested_tags(), vec!["ui", "button"]);
        let tagged = button().tag("Primary").tag("confirm").tag("primary");
        assert_eq!(tagged.requested_tags(), vec!["primary", "confirm"]);
        assert_eq!(
            tagged.entry_tags(),
            vec!["primary", "confirm", "ui", "button"]
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(button().asset_name(), "glossy-blue-primary-button");
        assert_eq!(button().symbol_name(), "GlossyBluePrimaryButton");
        let long = AssetNeed::new(AssetFamily::Icon, "a b c d e f g");
        assert_eq!(long.asset_name(), "a-b-c-d-e");
        assert_eq!(
            AssetNeed::new(AssetFamily::Icon, "3d cube").symbol_name(),
            "Asset3dCube"
        );
    }

    #[test]
    fn test_need_document() {
        let doc = NeedDocument::from_toml(
            r#"
[[need]]
family = "ui"
category = "button"
description = "red cancel button"
dimensions = { width = 100, height = 32 }
tags = ["cancel"]

[[need]]
family = "tiles"
description = "grass tiles"

[need.attributes]
variants = "6"
"#,
        )
        .unwrap();
        assert_eq!(doc.need.len(), 2);
        assert_eq!(doc.need[0].dimensions, Some(Dimensions::new(100, 32)));
        assert_eq!(doc.need[1].family, AssetFamily::Tileset);
        assert_eq!(doc.need[1].attributes["variants"], "6");
    }

    #[test]
    fn test_need_document_unknown_family() {
        let err = NeedDocument::from_toml(
            r#"
[[need]]
family = "hologram"
description = "x"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, KilnError::MalformedNeed(_)));
    }
}
