//! Progress bars and resource meters

use super::surface;
use super::Artifact;
use crate::spec::{GaugeSpec, Orientation, SurfaceStyle};
use kiln_core::{Color, Dimensions, Result};
use kiln_procgen::{encode_png, Canvas, Paint, Shape};

pub fn render(spec: &GaugeSpec) -> Result<Artifact> {
    let style = spec.style.unwrap_or(SurfaceStyle::Flat);
    let w = spec.width as f32;
    let h = spec.height as f32;
    let radius = match style {
        SurfaceStyle::Pixel => 0.0,
        _ => w.min(h) * 0.5,
    };
    let fill = spec.fill.clamp(0.0, 1.0);

    let mut canvas = Canvas::new(spec.width, spec.height);

    // Track
    let track = Shape::rounded(0.0, 0.0, w, h, radius);
    canvas.fill(
        &track,
        &Paint::Solid(spec.color.grayscale(0.9).darken(0.55).with_alpha(220)),
    );

    // Filled portion
    let pad = (w.min(h) * 0.15).clamp(1.0, 3.0).round();
    let inner_w = (w - pad * 2.0).max(0.0);
    let inner_h = (h - pad * 2.0).max(0.0);
    let (fx, fy, fw, fh) = match spec.orientation {
        Orientation::Horizontal => (pad, pad, inner_w * fill, inner_h),
        Orientation::Vertical => {
            let fh = inner_h * fill;
            (pad, pad + inner_h - fh, inner_w, fh)
        }
    };
    if fw >= 1.0 && fh >= 1.0 {
        let inner_radius = (radius - pad).max(0.0).min(fw.min(fh) / 2.0);
        let bar = Shape::rounded(fx, fy, fw, fh, inner_radius);
        surface::paint(&mut canvas, &bar, fy, fy + fh, spec.color, style);
    }

    // Quarter ticks over the track
    let tick = Color::WHITE.with_alpha(60);
    for q in 1..4 {
        let t = q as f32 / 4.0;
        let mark = match spec.orientation {
            Orientation::Horizontal => Shape::rect((pad + inner_w * t).round(), pad, 1.0, inner_h),
            Orientation::Vertical => Shape::rect(pad, (pad + inner_h * t).round(), inner_w, 1.0),
        };
        canvas.fill(&mark, &Paint::Solid(tick));
    }

    surface::border(&mut canvas, &track, 1.0, spec.color.darken(0.6));

    Ok(Artifact::new(
        encode_png(&canvas.into_image())?,
        "png",
        Dimensions::new(spec.width, spec.height),
    ))
}
