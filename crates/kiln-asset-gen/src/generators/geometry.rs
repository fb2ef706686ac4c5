//! Icon shape outlines authored on a 24x24 grid
//!
//! Shared by the vector icon generator and the raster generators that stamp
//! the same silhouettes (emblems, animations).

use crate::spec::IconShape;
use kiln_procgen::Shape;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Side length of the authoring grid
pub const GRID: f32 = 24.0;

const CENTER: (f32, f32) = (12.0, 12.0);

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Polygon(Vec<(f32, f32)>),
    Circle { cx: f32, cy: f32, r: f32 },
}

impl Part {
    /// Map from grid space into a `width` x `height` box at `(ox, oy)`
    pub fn fit(&self, ox: f32, oy: f32, width: f32, height: f32) -> Part {
        let sx = width / GRID;
        let sy = height / GRID;
        match self {
            Part::Polygon(points) => Part::Polygon(
                points
                    .iter()
                    .map(|(x, y)| (ox + x * sx, oy + y * sy))
                    .collect(),
            ),
            Part::Circle { cx, cy, r } => Part::Circle {
                cx: ox + cx * sx,
                cy: oy + cy * sy,
                r: r * sx.min(sy),
            },
        }
    }

    /// Rotate by `angle` radians around the grid center
    pub fn rotated(&self, angle: f32) -> Part {
        let (sin, cos) = angle.sin_cos();
        let turn = |(x, y): (f32, f32)| {
            let dx = x - CENTER.0;
            let dy = y - CENTER.1;
            (CENTER.0 + dx * cos - dy * sin, CENTER.1 + dx * sin + dy * cos)
        };
        match self {
            Part::Polygon(points) => Part::Polygon(points.iter().copied().map(turn).collect()),
            Part::Circle { cx, cy, r } => {
                let (cx, cy) = turn((*cx, *cy));
                Part::Circle { cx, cy, r: *r }
            }
        }
    }

    /// Scale by `factor` around the grid center
    pub fn scaled(&self, factor: f32) -> Part {
        let grow = |(x, y): (f32, f32)| {
            (
                CENTER.0 + (x - CENTER.0) * factor,
                CENTER.1 + (y - CENTER.1) * factor,
            )
        };
        match self {
            Part::Polygon(points) => Part::Polygon(points.iter().copied().map(grow).collect()),
            Part::Circle { cx, cy, r } => {
                let (cx, cy) = grow((*cx, *cy));
                Part::Circle {
                    cx,
                    cy,
                    r: r * factor,
                }
            }
        }
    }

    pub fn to_shape(&self) -> Shape {
        match self {
            Part::Polygon(points) => Shape::Polygon(points.clone()),
            Part::Circle { cx, cy, r } => Shape::circle(*cx, *cy, *r),
        }
    }
}

/// The outline parts for `shape`.
///
/// The first part is the silhouette; any later parts are details drawn on top
/// in a contrasting tone.
pub fn parts(shape: IconShape) -> Vec<Part> {
    match shape {
        IconShape::Heart => vec![Part::Polygon(heart())],
        IconShape::Star => vec![Part::Polygon(star(5, 10.0, 4.2))],
        IconShape::Plus => vec![Part::Polygon(plus())],
        IconShape::Cross => vec![Part::Polygon(plus()).rotated(FRAC_PI_4)],
        IconShape::Check => vec![Part::Polygon(vec![
            (3.0, 13.0),
            (6.0, 10.0),
            (10.0, 14.0),
            (18.0, 5.0),
            (21.0, 8.0),
            (10.0, 20.0),
        ])],
        IconShape::Arrow => vec![Part::Polygon(vec![
            (3.0, 9.0),
            (13.0, 9.0),
            (13.0, 4.0),
            (21.0, 12.0),
            (13.0, 20.0),
            (13.0, 15.0),
            (3.0, 15.0),
        ])],
        IconShape::Gear => vec![
            Part::Polygon(gear(8, 10.0, 7.5)),
            Part::Circle {
                cx: 12.0,
                cy: 12.0,
                r: 3.5,
            },
        ],
        IconShape::Diamond => vec![Part::Polygon(vec![
            (12.0, 2.0),
            (21.0, 12.0),
            (12.0, 22.0),
            (3.0, 12.0),
        ])],
        IconShape::Triangle => vec![Part::Polygon(vec![(12.0, 3.0), (22.0, 20.0), (2.0, 20.0)])],
        IconShape::Square => vec![Part::Polygon(vec![
            (4.0, 4.0),
            (20.0, 4.0),
            (20.0, 20.0),
            (4.0, 20.0),
        ])],
        IconShape::Circle => vec![Part::Circle {
            cx: 12.0,
            cy: 12.0,
            r: 9.0,
        }],
    }
}

fn heart() -> Vec<(f32, f32)> {
    const SAMPLES: usize = 36;
    (0..SAMPLES)
        .map(|i| {
            let t = i as f32 / SAMPLES as f32 * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            (12.0 + x * 0.62, 11.5 - y * 0.62)
        })
        .collect()
}

fn star(points: u32, outer: f32, inner: f32) -> Vec<(f32, f32)> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = -FRAC_PI_2 + i as f32 * PI / points as f32;
            (12.0 + r * angle.cos(), 12.5 + r * angle.sin())
        })
        .collect()
}

fn plus() -> Vec<(f32, f32)> {
    vec![
        (9.0, 3.0),
        (15.0, 3.0),
        (15.0, 9.0),
        (21.0, 9.0),
        (21.0, 15.0),
        (15.0, 15.0),
        (15.0, 21.0),
        (9.0, 21.0),
        (9.0, 15.0),
        (3.0, 15.0),
        (3.0, 9.0),
        (9.0, 9.0),
    ]
}

fn gear(teeth: u32, outer: f32, inner: f32) -> Vec<(f32, f32)> {
    let step = TAU / teeth as f32;
    let mut points = Vec::with_capacity(teeth as usize * 4);
    for i in 0..teeth {
        let base = i as f32 * step;
        for (offset, r) in [
            (0.0, inner),
            (0.2, outer),
            (0.5, outer),
            (0.7, inner),
        ] {
            let angle = base + offset * step;
            points.push((12.0 + r * angle.cos(), 12.0 + r * angle.sin()));
        }
    }
    points
}
