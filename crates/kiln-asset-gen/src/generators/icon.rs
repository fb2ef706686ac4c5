//! Vector icons

use super::geometry::{self, Part, GRID};
use super::Artifact;
use crate::spec::IconSpec;
use kiln_core::{Dimensions, Result};
use kiln_procgen::{PathBuilder, SvgDocument, SvgElement, SvgStyle};

pub fn render(spec: &IconSpec) -> Result<Artifact> {
    let mut doc = SvgDocument::new(spec.width, spec.height, (GRID, GRID));
    let edge = spec.color.darken(0.35);

    for (i, part) in geometry::parts(spec.shape).iter().enumerate() {
        let style = match (spec.outlined, i) {
            (true, 0) => SvgStyle::stroked(spec.color, 2.0),
            (true, _) => SvgStyle::stroked(spec.color, 1.5),
            (false, 0) => SvgStyle::filled(spec.color).with_stroke(edge, 1.0),
            (false, _) => SvgStyle::filled(spec.color.lighten(0.55)),
        };
        doc.push(element(part, style));
    }

    Ok(Artifact::new(
        doc.to_bytes(),
        "svg",
        Dimensions::new(spec.width, spec.height),
    ))
}

fn element(part: &Part, style: SvgStyle) -> SvgElement {
    match part {
        Part::Polygon(points) => SvgElement::Path {
            d: PathBuilder::polygon(points).build(),
            style,
        },
        Part::Circle { cx, cy, r } => SvgElement::Circle {
            cx: *cx,
            cy: *cy,
            r: *r,
            style,
        },
    }
}
