//! Interactive controls: buttons, toggles, tabs
//!
//! The primary payload shows the requested state. Every control also carries
//! a vertical sheet of all four states plus a JSON map of where each sits.

use super::sheet::SheetMetadata;
use super::surface::{self, contrast_ink};
use super::Artifact;
use crate::spec::{ControlSpec, ControlState, SurfaceStyle};
use kiln_core::{Color, Dimensions, Result};
use kiln_procgen::{draw_text_centered, encode_png, fit_scale, pack_grid, Canvas, Paint, Shape};

pub fn render(spec: &ControlSpec) -> Result<Artifact> {
    let primary = draw(spec, spec.state);
    let frames: Vec<_> = ControlState::ALL.iter().map(|s| draw(spec, *s)).collect();
    let (sheet, origins) = pack_grid(&frames, 1);
    let metadata = SheetMetadata::from_origins(spec.width, spec.height, &origins, |i| {
        ControlState::ALL[i].as_str().to_string()
    });

    Ok(Artifact::new(
        encode_png(&primary)?,
        "png",
        Dimensions::new(spec.width, spec.height),
    )
    .with_auxiliary("states.png", encode_png(&sheet)?)
    .with_auxiliary("states.json", metadata.to_json()?))
}

fn draw(spec: &ControlSpec, state: ControlState) -> image::RgbaImage {
    let style = spec.style.unwrap_or(SurfaceStyle::Flat);
    let w = spec.width as f32;
    let h = spec.height as f32;
    let radius = match style {
        SurfaceStyle::Pixel => 0.0,
        _ => (h * 0.25).min(12.0),
    };
    let color = match state {
        ControlState::Normal => spec.color,
        ControlState::Hover => spec.color.lighten(0.12),
        ControlState::Pressed => spec.color.darken(0.15),
        ControlState::Disabled => spec.color.grayscale(0.85).lighten(0.2),
    };
    // Raised states sit above a drop shadow; pressed sinks onto it
    let lift = match state {
        ControlState::Pressed => 0.0,
        _ => (h * 0.06).clamp(1.0, 3.0).round(),
    };

    let mut canvas = Canvas::new(spec.width, spec.height);
    if lift > 0.0 && style != SurfaceStyle::Outline {
        canvas.fill(
            &Shape::rounded(0.0, lift, w, h - lift, radius),
            &Paint::Solid(Color::BLACK.with_alpha(70)),
        );
    }
    let top = if lift > 0.0 { 0.0 } else { 1.0 };
    let body = Shape::rounded(0.0, top, w, h - lift - top, radius);
    surface::paint(&mut canvas, &body, top, h - lift, color, style);

    if let Some(label) = spec.label.as_deref().filter(|l| !l.is_empty()) {
        let text = label.to_ascii_uppercase();
        let scale = fit_scale(&text, spec.width.saturating_sub(8), spec.height.saturating_sub(6))
            .min(4);
        if scale > 0 {
            let ink = match (style, state) {
                (_, ControlState::Disabled) => Color::WHITE.with_alpha(150),
                (SurfaceStyle::Outline, _) => color,
                _ => contrast_ink(color),
            };
            draw_text_centered(&mut canvas, &text, w / 2.0, (h - lift + top) / 2.0, scale, ink);
        }
    }
    canvas.into_image()
}
