//! Project presets: curated starter asset lists per kind of project

use crate::need::AssetNeed;
use kiln_core::{AssetFamily, KilnError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectPreset {
    RolePlaying,
    Platformer,
    Puzzle,
    LineOfBusiness,
}

impl ProjectPreset {
    pub const ALL: [ProjectPreset; 4] = [
        ProjectPreset::RolePlaying,
        ProjectPreset::Platformer,
        ProjectPreset::Puzzle,
        ProjectPreset::LineOfBusiness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPreset::RolePlaying => "role-playing",
            ProjectPreset::Platformer => "platformer",
            ProjectPreset::Puzzle => "puzzle",
            ProjectPreset::LineOfBusiness => "line-of-business",
        }
    }

    /// Expand into needs scoped to `project`
    pub fn needs(&self, project: &str) -> Vec<AssetNeed> {
        let needs = match self {
            ProjectPreset::RolePlaying => role_playing(),
            ProjectPreset::Platformer => platformer(),
            ProjectPreset::Puzzle => puzzle(),
            ProjectPreset::LineOfBusiness => line_of_business(),
        };
        let project = project.trim();
        needs
            .into_iter()
            .map(|need| {
                let need = need.tag(self.as_str());
                if project.is_empty() {
                    need
                } else {
                    need.project(project)
                }
            })
            .collect()
    }
}

impl fmt::Display for ProjectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectPreset {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "role-playing" | "rpg" | "roleplaying" => Ok(ProjectPreset::RolePlaying),
            "platformer" | "platform" => Ok(ProjectPreset::Platformer),
            "puzzle" => Ok(ProjectPreset::Puzzle),
            "line-of-business" | "lob" | "business" | "app" => Ok(ProjectPreset::LineOfBusiness),
            other => Err(KilnError::SpecificationError(format!(
                "Unknown project preset '{}'. Available: {}",
                other,
                ProjectPreset::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

fn sprite(category: &str, description: &str, edge: u32) -> AssetNeed {
    AssetNeed::new(AssetFamily::Sprite, description)
        .category(category)
        .dimensions(edge, edge)
}

fn ui(category: &str, description: &str, width: u32, height: u32) -> AssetNeed {
    AssetNeed::new(AssetFamily::Ui, description)
        .category(category)
        .dimensions(width, height)
}

fn icon(description: &str) -> AssetNeed {
    AssetNeed::new(AssetFamily::Icon, description)
        .category("icon")
        .dimensions(32, 32)
}

fn role_playing() -> Vec<AssetNeed> {
    vec![
        sprite("character", "armored knight hero", 64)
            .attribute("animated", "true")
            .tag("hero"),
        sprite("creature", "green slime monster", 32).tag("enemy"),
        sprite("character", "village elder npc", 64).tag("npc"),
        sprite("weapon", "iron sword", 32).tag("weapon"),
        sprite("consumable", "red health potion", 32).tag("potion"),
        sprite("collectible", "gold coin", 16).tag("currency"),
        AssetNeed::new(AssetFamily::Tileset, "grass meadow ground")
            .category("terrain")
            .dimensions(32, 32)
            .attribute("variants", "4")
            .tag("ground"),
        AssetNeed::new(AssetFamily::Tileset, "stone dungeon floor")
            .category("terrain")
            .dimensions(32, 32)
            .tag("dungeon"),
        ui("panel", "inventory panel", 256, 192).tag("inventory"),
        ui("bar", "red health bar", 160, 16).tag("health"),
        ui("bar", "blue mana bar", 160, 16).tag("mana"),
        icon("gear settings icon").tag("settings"),
    ]
}

fn platformer() -> Vec<AssetNeed> {
    vec![
        sprite("character", "small hero player", 32)
            .attribute("animated", "true")
            .tag("player"),
        sprite("enemy", "purple blob enemy", 32).tag("enemy"),
        sprite("collectible", "gold coin pickup", 16).tag("coin"),
        sprite("collectible", "blue gem", 16).tag("gem"),
        AssetNeed::new(AssetFamily::Tileset, "grass platform top")
            .category("terrain")
            .dimensions(16, 16)
            .tag("platform"),
        AssetNeed::new(AssetFamily::Tileset, "dirt ground fill")
            .category("terrain")
            .dimensions(16, 16)
            .tag("fill"),
        AssetNeed::new(AssetFamily::Texture, "blue water surface")
            .category("background")
            .dimensions(128, 128)
            .tag("water"),
        AssetNeed::new(AssetFamily::Animation, "gold star spin")
            .category("effect")
            .dimensions(32, 32)
            .attribute("frames", "8")
            .tag("powerup"),
        ui("button", "glossy green start button", 120, 40).tag("start"),
        icon("red heart life icon").tag("lives"),
    ]
}

fn puzzle() -> Vec<AssetNeed> {
    vec![
        sprite("piece", "red diamond gem piece", 48).tag("red-piece"),
        sprite("piece", "blue circle gem piece", 48).tag("blue-piece"),
        sprite("piece", "green triangle gem piece", 48).tag("green-piece"),
        AssetNeed::new(AssetFamily::Tileset, "stone board cell")
            .category("board")
            .dimensions(48, 48)
            .tag("board"),
        AssetNeed::new(AssetFamily::Animation, "gold star pulse")
            .category("effect")
            .dimensions(48, 48)
            .tag("match"),
        ui("panel", "glass score panel", 200, 80).tag("score"),
        ui("button", "orange restart button", 120, 40).tag("restart"),
        icon("arrow hint icon").tag("hint"),
    ]
}

fn line_of_business() -> Vec<AssetNeed> {
    vec![
        ui("button", "flat blue primary button", 120, 40).tag("primary"),
        ui("button", "outline gray secondary button", 120, 40).tag("secondary"),
        ui("button", "disabled gray button", 120, 40).tag("disabled"),
        ui("panel", "white dialog panel", 320, 200).tag("dialog"),
        ui("progress", "green upload progress bar", 240, 12).tag("progress"),
        icon("plus add icon").tag("add"),
        icon("cross close icon").tag("close"),
        icon("check confirm icon").tag("confirm"),
        icon("gear settings icon").tag("settings"),
    ]
}
