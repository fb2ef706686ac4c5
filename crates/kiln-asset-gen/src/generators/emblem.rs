//! Parametric badges for sprite requests with no more specific generator

use super::geometry;
use super::surface;
use super::Artifact;
use crate::spec::{EmblemSpec, SurfaceStyle};
use kiln_core::{Dimensions, Result};
use kiln_procgen::{encode_png, Canvas, Paint};

pub fn render(spec: &EmblemSpec) -> Result<Artifact> {
    let style = spec.style.unwrap_or(SurfaceStyle::Flat);
    let w = spec.width as f32;
    let h = spec.height as f32;
    let edge = w.min(h) * 0.9;
    let ox = (w - edge) / 2.0;
    let oy = (h - edge) / 2.0;

    let mut canvas = Canvas::new(spec.width, spec.height);
    for (i, part) in geometry::parts(spec.shape).iter().enumerate() {
        let shape = part.fit(ox, oy, edge, edge).to_shape();
        if i == 0 {
            surface::paint(&mut canvas, &shape, oy, oy + edge, spec.color, style);
        } else {
            canvas.fill(&shape, &Paint::Solid(spec.color.lighten(0.5)));
        }
    }

    Ok(Artifact::new(
        encode_png(&canvas.into_image())?,
        "png",
        Dimensions::new(spec.width, spec.height),
    ))
}
