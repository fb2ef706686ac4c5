//! Item sprites
//!
//! Each kind has a mirrored silhouette template. Symmetry synthesis shades the
//! silhouette from the item palette and the outline takes the rarity color.

use super::Artifact;
use crate::spec::{ItemKind, ItemSpec};
use kiln_core::{Dimensions, Result};
use kiln_procgen::{
    encode_png, scale_nearest, Cell, PixelGrid, SymmetryMode, SymmetryParams, WeightedColor,
};

pub fn render(spec: &ItemSpec) -> Result<Artifact> {
    let seed = spec.seed.unwrap_or(0);
    let gw = (spec.width / 2).clamp(8, 32).min(spec.width.max(1));
    let gh = (spec.height / 2).clamp(8, 32).min(spec.height.max(1));

    let palette = [
        spec.color,
        spec.color.lighten(0.35),
        spec.color.darken(0.25),
        spec.rarity.accent(),
    ];
    let weights = [
        WeightedColor::new(palette[0], 5.0),
        WeightedColor::new(palette[1], 1.5),
        WeightedColor::new(palette[2], 2.0),
    ];
    let params = SymmetryParams {
        mode: SymmetryMode::Vertical,
        fill_probability: 1.0,
        center_bias: 0.0,
    };
    let mut grid = PixelGrid::synthesize(gw, gh, seed, &weights, &params);

    for y in 0..gh {
        for x in 0..gw {
            let on_frame = x == 0 || y == 0 || x + 1 == gw || y + 1 == gh;
            let u = (x as f32 + 0.5 - gw as f32 / 2.0).abs() / gw as f32;
            let v = (y as f32 + 0.5) / gh as f32;
            match silhouette(spec.kind, u, v) {
                _ if on_frame => grid.set(x, y, Cell::Empty),
                Mask::Empty => grid.set(x, y, Cell::Empty),
                Mask::Trim => grid.set(x, y, Cell::Fill(3)),
                Mask::Body => {}
            }
        }
    }

    let outline = spec.rarity.accent().darken(0.35);
    let sprite = grid.with_outline().to_image(&palette, outline);
    let frame = scale_nearest(&sprite, spec.width, spec.height);
    Ok(Artifact::new(
        encode_png(&frame)?,
        "png",
        Dimensions::new(spec.width, spec.height),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mask {
    Empty,
    /// Shaded from the item palette
    Body,
    /// Drawn in the rarity accent
    Trim,
}

/// Template for `kind` at normalized `(u, v)`; `u` is distance from the
/// center column, `v` runs top to bottom
fn silhouette(kind: ItemKind, u: f32, v: f32) -> Mask {
    let within = |lo: f32, hi: f32| (lo..hi).contains(&v);
    let disc = |cy: f32, r: f32| u * u + (v - cy) * (v - cy) <= r * r;
    let hit = match kind {
        ItemKind::Sword => {
            if within(0.66, 0.73) && u < 0.3 {
                return Mask::Trim;
            }
            (within(0.05, 0.66) && u < 0.07)
                || (within(0.73, 0.88) && u < 0.05)
                || (within(0.88, 0.95) && u < 0.09)
        }
        ItemKind::Shield => {
            if within(0.08, 0.92) && u < 0.06 {
                return Mask::Trim;
            }
            let half = if v < 0.5 {
                0.4
            } else {
                0.4 * (1.0 - (v - 0.5) / 0.42)
            };
            within(0.08, 0.92) && u < half
        }
        ItemKind::Potion => {
            if within(0.06, 0.14) && u < 0.1 {
                return Mask::Trim;
            }
            (within(0.14, 0.36) && u < 0.08) || disc(0.62, 0.3)
        }
        ItemKind::Gem => v >= 0.2 && u / 0.38 + (v - 0.5).abs() / 0.42 <= 1.0,
        ItemKind::Coin => {
            if disc(0.5, 0.4) && !disc(0.5, 0.3) {
                return Mask::Trim;
            }
            disc(0.5, 0.4)
        }
        ItemKind::Key => {
            if (within(0.72, 0.78) || within(0.84, 0.9)) && u < 0.16 {
                return Mask::Trim;
            }
            (disc(0.25, 0.18) && !disc(0.25, 0.08)) || (within(0.4, 0.9) && u < 0.05)
        }
        ItemKind::Ring => {
            if disc(0.2, 0.1) {
                return Mask::Trim;
            }
            disc(0.58, 0.34) && !disc(0.58, 0.22)
        }
        ItemKind::Scroll => {
            if (within(0.1, 0.2) || within(0.8, 0.9)) && u < 0.38 {
                return Mask::Trim;
            }
            within(0.15, 0.85) && u < 0.32
        }
        ItemKind::Bow => {
            let dy = v - 0.85;
            let r = (u * u + dy * dy).sqrt();
            if within(0.83, 0.87) && u < 0.42 {
                return Mask::Trim;
            }
            v < 0.85 && (0.5..0.6).contains(&r)
        }
        ItemKind::Staff => {
            if disc(0.18, 0.14) {
                return Mask::Trim;
            }
            within(0.25, 0.95) && u < 0.05
        }
        ItemKind::Helmet => {
            if within(0.5, 0.56) && u < 0.25 {
                return Mask::Empty;
            }
            if within(0.7, 0.78) && u < 0.4 {
                return Mask::Trim;
            }
            disc(0.55, 0.38) && v < 0.78
        }
        ItemKind::Armor => {
            if within(0.2, 0.3) && u < 0.1 {
                return Mask::Empty;
            }
            if within(0.2, 0.38) && u >= 0.32 && u < 0.42 {
                return Mask::Trim;
            }
            within(0.2, 0.9) && u < 0.32
        }
    };
    if hit {
        Mask::Body
    } else {
        Mask::Empty
    }
}
