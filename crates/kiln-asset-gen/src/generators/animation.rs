//! Looping effect animations
//!
//! A shape is stamped once per frame with the motion's transform at
//! `t = i / frames`, so the last frame leads back into the first. Frames are
//! packed into a horizontal strip with JSON frame metadata alongside.

use super::geometry::{self, Part};
use super::sheet::SheetMetadata;
use super::surface;
use super::Artifact;
use crate::spec::{AnimationSpec, Motion};
use image::RgbaImage;
use kiln_core::{Color, Dimensions, Result};
use kiln_procgen::{encode_png, pack_grid, Canvas, Paint, SeededRng};
use std::f32::consts::{PI, TAU};

const FPS: u32 = 12;

pub fn render(spec: &AnimationSpec) -> Result<Artifact> {
    let frames = spec.frames.max(1);
    let mut rng = SeededRng::new(spec.seed.unwrap_or(0));
    // Small seed-driven tint so sibling effects are distinguishable
    let tint = rng.range(-0.08, 0.08);
    let color = if tint >= 0.0 {
        spec.color.lighten(tint)
    } else {
        spec.color.darken(-tint)
    };
    let phase = rng.next_f32();

    let images: Vec<RgbaImage> = (0..frames)
        .map(|i| frame(spec, color, i as f32 / frames as f32, phase))
        .collect();
    let (strip, origins) = pack_grid(&images, frames);
    let metadata = SheetMetadata::from_origins(spec.frame_width, spec.frame_height, &origins, |i| {
        format!("{}_{}", spec.motion, i)
    })
    .with_clip(spec.motion.as_str(), (0..frames as usize).collect(), FPS, true);

    Ok(Artifact::new(
        encode_png(&strip)?,
        "png",
        Dimensions::new(spec.frame_width * frames, spec.frame_height),
    )
    .with_auxiliary("frames.json", metadata.to_json()?))
}

fn frame(spec: &AnimationSpec, color: Color, t: f32, phase: f32) -> RgbaImage {
    let w = spec.frame_width as f32;
    let h = spec.frame_height as f32;
    // Leave room for bounce travel and pulse growth
    let edge = w.min(h) * 0.7;
    let ox = (w - edge) / 2.0;
    let mut oy = (h - edge) / 2.0;
    let mut alpha = 255u8;

    let parts: Vec<Part> = geometry::parts(spec.shape)
        .into_iter()
        .map(|part| match spec.motion {
            Motion::Spin => part.rotated(t * TAU),
            Motion::Pulse => part.scaled(1.0 + 0.15 * ((t + phase) * TAU).sin()),
            Motion::Bounce | Motion::Fade => part,
        })
        .collect();

    match spec.motion {
        Motion::Bounce => oy -= (t * PI).sin() * (h - edge) / 2.0,
        Motion::Fade => alpha = (255.0 * (0.6 + 0.4 * (t * TAU).cos())).round() as u8,
        Motion::Spin | Motion::Pulse => {}
    }

    let mut canvas = Canvas::new(spec.frame_width, spec.frame_height);
    for (i, part) in parts.iter().enumerate() {
        let fitted = part.fit(ox, oy, edge, edge).to_shape();
        let tone = if i == 0 { color } else { color.lighten(0.55) };
        canvas.fill(&fitted, &Paint::Solid(tone.with_alpha(alpha)));
        if i == 0 {
            surface::border(&mut canvas, &fitted, 1.0, color.darken(0.4).with_alpha(alpha));
        }
    }
    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::IconShape;

    fn spec(motion: Motion, frames: u32) -> AnimationSpec {
        AnimationSpec {
            frame_width: 32,
            frame_height: 32,
            frames,
            motion,
            shape: IconShape::Star,
            color: Color::GOLD,
            seed: Some(9),
        }
    }

    #[test]
    fn test_strip_is_horizontal() {
        let artifact = render(&spec(Motion::Bounce, 6)).unwrap();
        let strip = image::load_from_memory(&artifact.payload).unwrap();
        assert_eq!((strip.width(), strip.height()), (192, 32));
        assert_eq!(artifact.dimensions, Dimensions::new(192, 32));
    }

    #[test]
    fn test_frames_json_lists_every_frame() {
        let artifact = render(&spec(Motion::Spin, 8)).unwrap();
        let meta: SheetMetadata = serde_json::from_slice(&artifact.auxiliary[0].bytes).unwrap();
        assert_eq!(meta.frames.len(), 8);
        assert_eq!(meta.frames[7].x, 224);
        assert_eq!(meta.clips["spin"].frames.len(), 8);
        assert!(meta.clips["spin"].looping);
    }

    #[test]
    fn test_motion_changes_frames() {
        for motion in Motion::ALL {
            let s = spec(*motion, 4);
            let first = frame(&s, s.color, 0.0, 0.0);
            let second = frame(&s, s.color, 0.25, 0.0);
            assert_ne!(first.as_raw(), second.as_raw(), "{} is static", motion);
        }
    }

    #[test]
    fn test_seed_tints_output() {
        let mut other = spec(Motion::Pulse, 4);
        other.seed = Some(10);
        assert_ne!(
            render(&spec(Motion::Pulse, 4)).unwrap().payload,
            render(&other).unwrap().payload
        );
    }
}
