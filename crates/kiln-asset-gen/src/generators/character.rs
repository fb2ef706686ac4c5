//! Character sprites
//!
//! Bodies are synthesized on a small logical grid and scaled up with
//! nearest-neighbor sampling so the result stays crisp pixel art.
//!
//! - Symmetry synthesis fills a mirrored grid from the palette and carves it
//!   to a seed-varied body plan for the archetype.
//! - Cellular synthesis grows an organic blob and shades its rim.
//!
//! Animated characters additionally emit a sheet of idle, walk and attack
//! frames plus JSON frame metadata.

use super::sheet::SheetMetadata;
use super::Artifact;
use crate::spec::{Archetype, CharacterSpec, SizeClass, Synthesis};
use image::RgbaImage;
use kiln_core::{Color, Dimensions, Result};
use kiln_procgen::{
    encode_png, offset, pack_grid, scale_nearest, Cell, CellGrid, CellularRule, PixelGrid,
    SeededRng, SymmetryMode, SymmetryParams, WeightedColor,
};

const BASE: u8 = 0;
const SHADE: u8 = 1;
const HIGHLIGHT: u8 = 2;
const ACCENT: u8 = 3;
const EYE: u8 = 4;

pub fn render(spec: &CharacterSpec) -> Result<Artifact> {
    let seed = spec.seed.unwrap_or(0);
    let sprite = match spec.synthesis {
        Synthesis::Symmetry => symmetric_body(spec, seed),
        Synthesis::Cellular => grown_body(spec, seed),
    };
    let frame = scale_nearest(&sprite, spec.width, spec.height);

    let mut artifact = Artifact::new(
        encode_png(&frame)?,
        "png",
        Dimensions::new(spec.width, spec.height),
    );
    if spec.animated {
        let (sheet, metadata) = animate(&frame);
        artifact = artifact
            .with_auxiliary("sheet.png", encode_png(&sheet)?)
            .with_auxiliary("sheet.json", metadata.to_json()?);
    }
    Ok(artifact)
}

/// Logical grid edge for an output edge
fn logical(edge: u32) -> u32 {
    (edge / 4).clamp(8, 24).min(edge.max(1))
}

fn palette(spec: &CharacterSpec) -> Vec<Color> {
    let (accent, eye) = match spec.archetype {
        Archetype::Humanoid => (Color::rgb(0xF1, 0xC2, 0x7D), Color::rgb(0x1E, 0x1E, 0x24)),
        Archetype::Mechanical => (Color::GRAY.lighten(0.25), Color::rgb(0x4F, 0xE3, 0xF0)),
        Archetype::Creature => (spec.color.lerp(Color::GOLD, 0.5), Color::WHITE),
    };
    vec![
        spec.color,
        spec.color.darken(0.3),
        spec.color.lighten(0.3),
        accent,
        eye,
    ]
}

fn outline_color(spec: &CharacterSpec) -> Color {
    spec.color.darken(0.75)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Head,
    Body,
    Limb,
}

/// Seed-varied proportions, as fractions of the grid
#[derive(Debug, Clone, Copy)]
struct BodyPlan {
    archetype: Archetype,
    /// Fraction of the grid height the figure occupies, anchored at the feet
    stature: f32,
    head: f32,
    torso: f32,
    limb: f32,
}

impl BodyPlan {
    fn new(archetype: Archetype, size: SizeClass, seed: u32) -> Self {
        let mut rng = SeededRng::new(seed).fork(0x0B0D);
        Self {
            archetype,
            stature: match size {
                SizeClass::Small => 0.78,
                SizeClass::Medium => 0.9,
                SizeClass::Large => 1.0,
            },
            head: rng.range(0.13, 0.2),
            torso: rng.range(0.18, 0.27),
            limb: rng.range(0.07, 0.12),
        }
    }

    /// Region at normalized `(u, v)`: `u` is distance from the center
    /// column, `v` runs top to bottom
    fn region(&self, u: f32, v: f32) -> Option<Region> {
        // Anchor the figure at the feet
        let v = 1.0 - (1.0 - v) / self.stature;
        if !(0.0..=1.0).contains(&v) {
            return None;
        }
        let within = |lo: f32, hi: f32| (lo..hi).contains(&v);
        match self.archetype {
            Archetype::Humanoid => {
                if within(0.08, 0.32) && u < self.head {
                    Some(Region::Head)
                } else if within(0.32, 0.66) && u < self.torso {
                    Some(Region::Body)
                } else if within(0.34, 0.58) && u < self.torso + self.limb {
                    Some(Region::Limb)
                } else if within(0.66, 0.95) && u >= 0.04 && u < 0.04 + self.limb * 1.4 {
                    Some(Region::Limb)
                } else {
                    None
                }
            }
            Archetype::Mechanical => {
                if within(0.02, 0.08) && u < 0.05 {
                    Some(Region::Limb)
                } else if within(0.08, 0.3) && u < self.head + 0.04 {
                    Some(Region::Head)
                } else if within(0.3, 0.72) && u < self.torso + 0.06 {
                    Some(Region::Body)
                } else if within(0.72, 0.95) && u >= 0.06 && u < 0.06 + self.limb * 1.8 {
                    Some(Region::Limb)
                } else {
                    None
                }
            }
            Archetype::Creature => {
                let rx = self.torso + 0.15;
                let ry = 0.36;
                let dy = (v - 0.58) / ry;
                if (u / rx).powi(2) + dy * dy <= 1.0 {
                    Some(Region::Body)
                } else if within(0.14, 0.3) && u >= 0.12 && u < 0.12 + self.limb {
                    Some(Region::Head)
                } else if within(0.88, 0.96) && u >= 0.1 && u < 0.1 + self.limb * 2.0 {
                    Some(Region::Limb)
                } else {
                    None
                }
            }
        }
    }

    /// Normalized row the eyes sit on
    fn eye_row(&self) -> f32 {
        let local = match self.archetype {
            Archetype::Humanoid => 0.2,
            Archetype::Mechanical => 0.17,
            Archetype::Creature => 0.42,
        };
        1.0 - (1.0 - local) * self.stature
    }
}

fn normalized(x: u32, y: u32, w: u32, h: u32) -> (f32, f32) {
    let u = (x as f32 + 0.5 - w as f32 / 2.0).abs() / w as f32;
    let v = (y as f32 + 0.5) / h as f32;
    (u, v)
}

fn symmetric_body(spec: &CharacterSpec, seed: u32) -> RgbaImage {
    let gw = logical(spec.width);
    let gh = logical(spec.height);
    let colors = palette(spec);
    let weights = [
        WeightedColor::new(colors[BASE as usize], 6.0),
        WeightedColor::new(colors[SHADE as usize], 2.0),
        WeightedColor::new(colors[HIGHLIGHT as usize], 1.0),
    ];
    let params = SymmetryParams {
        mode: SymmetryMode::Vertical,
        fill_probability: 1.0,
        center_bias: 0.0,
    };
    let mut grid = PixelGrid::synthesize(gw, gh, seed, &weights, &params);
    let plan = BodyPlan::new(spec.archetype, spec.size, seed);

    for y in 0..gh {
        for x in 0..gw {
            let on_frame = x == 0 || y == 0 || x + 1 == gw || y + 1 == gh;
            let (u, v) = normalized(x, y, gw, gh);
            match plan.region(u, v) {
                _ if on_frame => grid.set(x, y, Cell::Empty),
                None => grid.set(x, y, Cell::Empty),
                Some(Region::Head) if spec.archetype == Archetype::Humanoid => {
                    grid.set(x, y, Cell::Fill(ACCENT))
                }
                Some(Region::Limb) if spec.archetype == Archetype::Mechanical => {
                    grid.set(x, y, Cell::Fill(ACCENT))
                }
                Some(_) => {}
            }
        }
    }

    let eye_y = ((plan.eye_row() * gh as f32) as u32).min(gh - 1);
    let eye_x = (gw / 2).saturating_sub(1 + gw / 10);
    if matches!(grid.get(eye_x, eye_y), Cell::Fill(_)) {
        grid.set_mirrored(eye_x, eye_y, Cell::Fill(EYE));
    }

    grid.with_outline().to_image(&colors, outline_color(spec))
}

fn grown_body(spec: &CharacterSpec, seed: u32) -> RgbaImage {
    let gw = logical(spec.width);
    let gh = logical(spec.height);
    let colors = palette(spec);
    let rule = CellularRule {
        initial_fill: match spec.size {
            SizeClass::Small => 0.44,
            SizeClass::Medium => 0.48,
            SizeClass::Large => 0.53,
        },
        ..CellularRule::default()
    };
    let cells = CellGrid::grow(gw, gh, seed, &rule);
    let mut rng = SeededRng::new(seed).fork(0x5EED);

    let mut grid = PixelGrid::new(gw, gh);
    for y in 0..gh {
        for x in 0..gw {
            if !cells.get(x, y) {
                continue;
            }
            let index = if cells.is_edge(x, y) {
                SHADE
            } else if rng.chance(0.12) {
                HIGHLIGHT
            } else {
                BASE
            };
            grid.set(x, y, Cell::Fill(index));
        }
    }

    // Eyes go a little above the body's widest row
    if let Some(row) = cells.densest_row() {
        let eye_y = row.saturating_sub(gh / 6);
        let spread = (gw / 8).max(1);
        let left = (gw / 2).saturating_sub(spread + 1);
        let right = gw / 2 + spread;
        for x in [left, right] {
            if cells.get(x, eye_y) && !cells.is_edge(x, eye_y) {
                grid.set(x, eye_y, Cell::Fill(EYE));
            }
        }
    }

    grid.with_outline().to_image(&colors, outline_color(spec))
}

/// Idle, walk and attack frames packed four to a row
fn animate(frame: &RgbaImage) -> (RgbaImage, SheetMetadata) {
    let unit = (frame.height() as i64 / 32).max(1);
    let mut frames = Vec::with_capacity(9);
    let mut names = Vec::with_capacity(9);

    for (i, dy) in [0, -unit].iter().enumerate() {
        frames.push(offset(frame, 0, *dy));
        names.push(format!("idle_{}", i));
    }
    for (i, (dx, dy)) in [(0, 0), (unit, -unit), (0, 0), (-unit, -unit)]
        .iter()
        .enumerate()
    {
        frames.push(offset(frame, *dx, *dy));
        names.push(format!("walk_{}", i));
    }
    for (i, dx) in [0, unit * 2, unit * 4].iter().enumerate() {
        let mut lunge = offset(frame, *dx, 0);
        if i == 2 {
            flash(&mut lunge);
        }
        frames.push(lunge);
        names.push(format!("attack_{}", i));
    }

    let (sheet, origins) = pack_grid(&frames, 4);
    let metadata = SheetMetadata::from_origins(frame.width(), frame.height(), &origins, |i| {
        names[i].clone()
    })
    .with_clip("idle", vec![0, 1], 4, true)
    .with_clip("walk", vec![2, 3, 4, 5], 8, true)
    .with_clip("attack", vec![6, 7, 8], 10, false);
    (sheet, metadata)
}

/// Brighten every opaque pixel toward white
fn flash(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        if pixel.0[3] == 0 {
            continue;
        }
        let c = Color::rgba(pixel.0[0], pixel.0[1], pixel.0[2], pixel.0[3]).lighten(0.35);
        pixel.0 = c.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(archetype: Archetype, synthesis: Synthesis, seed: u32) -> CharacterSpec {
        CharacterSpec {
            width: 64,
            height: 64,
            archetype,
            size: SizeClass::Medium,
            synthesis,
            color: Color::BLUE,
            seed: Some(seed),
            animated: false,
        }
    }

    fn opaque(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[3] > 0).count()
    }

    #[test]
    fn test_symmetric_bodies_are_mirrored() {
        for archetype in Archetype::ALL {
            for seed in 0..6 {
                let img = symmetric_body(&spec(*archetype, Synthesis::Symmetry, seed), seed);
                let w = img.width();
                for y in 0..img.height() {
                    for x in 0..w / 2 {
                        assert_eq!(
                            img.get_pixel(x, y),
                            img.get_pixel(w - 1 - x, y),
                            "{} seed {} at ({}, {})",
                            archetype,
                            seed,
                            x,
                            y
                        );
                    }
                }
                assert!(opaque(&img) > 0);
            }
        }
    }

    #[test]
    fn test_seed_changes_sprite() {
        let a = render(&spec(Archetype::Humanoid, Synthesis::Symmetry, 1)).unwrap();
        let b = render(&spec(Archetype::Humanoid, Synthesis::Symmetry, 2)).unwrap();
        assert_ne!(a.payload, b.payload);
    }

    #[test]
    fn test_grown_body_keeps_frame_clear() {
        let s = spec(Archetype::Creature, Synthesis::Cellular, 9);
        let img = grown_body(&s, 9);
        assert!(opaque(&img) > 0);
        // Outline may touch the ring just inside the frame, never the corners
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(img.width() - 1, img.height() - 1).0[3], 0);
    }

    #[test]
    fn test_small_size_leaves_headroom() {
        let mut small = spec(Archetype::Humanoid, Synthesis::Symmetry, 4);
        small.size = SizeClass::Small;
        let img = symmetric_body(&small, 4);
        let top_rows_empty = (0..3).all(|y| (0..img.width()).all(|x| img.get_pixel(x, y).0[3] == 0));
        assert!(top_rows_empty);
    }

    #[test]
    fn test_animated_sheet_layout() {
        let mut s = spec(Archetype::Mechanical, Synthesis::Symmetry, 3);
        s.animated = true;
        let artifact = render(&s).unwrap();
        let sheet = image::load_from_memory(&artifact.auxiliary[0].bytes).unwrap();
        assert_eq!((sheet.width(), sheet.height()), (256, 192));

        let meta: SheetMetadata = serde_json::from_slice(&artifact.auxiliary[1].bytes).unwrap();
        assert_eq!(meta.frames.len(), 9);
        assert_eq!(meta.clips["walk"].frames, vec![2, 3, 4, 5]);
        assert!(!meta.clips["attack"].looping);
        assert_eq!(meta.frames[4].name, "walk_2");
        assert_eq!((meta.frames[4].x, meta.frames[4].y), (0, 64));
    }
}
