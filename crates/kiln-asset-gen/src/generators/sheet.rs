//! JSON metadata written next to sprite sheets

use kiln_core::{KilnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Location of one named frame inside a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A named run of frames played in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Indices into [`SheetMetadata::frames`]
    pub frames: Vec<usize>,
    pub fps: u32,
    #[serde(rename = "loop")]
    pub looping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub frame_width: u32,
    pub frame_height: u32,
    pub frames: Vec<FrameRect>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub clips: BTreeMap<String, Clip>,
}

impl SheetMetadata {
    /// Build frame rects from packed origins, naming each with `name_of`
    pub fn from_origins<F>(
        frame_width: u32,
        frame_height: u32,
        origins: &[(u32, u32)],
        name_of: F,
    ) -> Self
    where
        F: Fn(usize) -> String,
    {
        let frames = origins
            .iter()
            .enumerate()
            .map(|(i, (x, y))| FrameRect {
                name: name_of(i),
                x: *x,
                y: *y,
                width: frame_width,
                height: frame_height,
            })
            .collect();
        Self {
            frame_width,
            frame_height,
            frames,
            clips: BTreeMap::new(),
        }
    }

    pub fn with_clip(mut self, name: &str, frames: Vec<usize>, fps: u32, looping: bool) -> Self {
        self.clips.insert(
            name.to_string(),
            Clip {
                frames,
                fps,
                looping,
            },
        );
        self
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            KilnError::EncodingError(format!("Failed to encode sheet metadata: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_json_shape() {
        let meta = SheetMetadata::from_origins(16, 16, &[(0, 0), (16, 0)], |i| format!("f{}", i))
            .with_clip("idle", vec![0, 1], 4, true);
        let value: serde_json::Value = serde_json::from_slice(&meta.to_json().unwrap()).unwrap();
        assert_eq!(value["frames"][1]["x"], 16);
        assert_eq!(value["frames"][1]["name"], "f1");
        assert_eq!(value["clips"]["idle"]["loop"], true);
        assert_eq!(value["clips"]["idle"]["frames"][1], 1);
    }

    #[test]
    fn test_clips_omitted_when_empty() {
        let meta = SheetMetadata::from_origins(8, 8, &[(0, 0)], |_| "normal".into());
        let json = String::from_utf8(meta.to_json().unwrap()).unwrap();
        assert!(!json.contains("clips"));
    }
}
