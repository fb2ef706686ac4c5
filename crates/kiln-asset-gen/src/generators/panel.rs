//! Panels and dialog frames

use super::surface::{self, contrast_ink};
use super::Artifact;
use crate::spec::{PanelSpec, SurfaceStyle};
use kiln_core::{Dimensions, Result};
use kiln_procgen::{draw_text_centered, encode_png, fit_scale, Canvas, Paint, Shape};

pub fn render(spec: &PanelSpec) -> Result<Artifact> {
    let style = spec.style.unwrap_or(SurfaceStyle::Flat);
    let w = spec.width as f32;
    let h = spec.height as f32;
    let radius = match style {
        SurfaceStyle::Pixel => 0.0,
        _ => (w.min(h) * 0.08).min(10.0),
    };

    let mut canvas = Canvas::new(spec.width, spec.height);
    let body = Shape::rounded(0.0, 0.0, w, h, radius);
    surface::paint(&mut canvas, &body, 0.0, h, spec.color, style);

    // Title band across the top
    let band = (h / 6.0).clamp(6.0, 24.0).round();
    if spec.title.is_some() && h >= band * 2.0 {
        let inset = if style == SurfaceStyle::Outline { 2.0 } else { 1.0 };
        let bar = Shape::rounded(inset, inset, w - inset * 2.0, band, (radius - inset).max(0.0));
        let bar_color = spec.color.darken(0.3);
        canvas.fill(&bar, &Paint::Solid(bar_color));

        if let Some(title) = spec.title.as_deref() {
            let text = title.to_ascii_uppercase();
            let scale = fit_scale(&text, spec.width.saturating_sub(12), band as u32 - 2).min(3);
            if scale > 0 {
                draw_text_centered(
                    &mut canvas,
                    &text,
                    w / 2.0,
                    inset + band / 2.0,
                    scale,
                    contrast_ink(bar_color),
                );
            }
        }
    }

    Ok(Artifact::new(
        encode_png(&canvas.into_image())?,
        "png",
        Dimensions::new(spec.width, spec.height),
    ))
}
