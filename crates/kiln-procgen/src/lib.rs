//! Kiln Procgen - Seed-driven procedural primitives
//!
//! Pure functions from a seed and parameters to raw visual structure. Nothing
//! here knows what a button or a knight is; generators in `kiln-asset-gen`
//! compose these pieces into assets.
//!
//! - [`noise`]: multi-octave gradient noise fields
//! - [`cellular`]: cellular-automata growth for organic silhouettes
//! - [`symmetry`]: mirrored pixel synthesis from a weighted palette
//! - [`draw`]: parametric shapes and gradients on an RGBA canvas
//! - [`svg`]: vector documents for icon output
//! - [`font`]: a tiny bitmap font for captions
//! - [`raster`]: PNG encoding and scaling helpers

pub mod cellular;
pub mod draw;
pub mod font;
pub mod noise;
pub mod raster;
pub mod rng;
pub mod svg;
pub mod symmetry;

pub use cellular::{CellGrid, CellularRule};
pub use draw::{Canvas, GradientStop, Paint, Shape};
pub use font::{draw_text, draw_text_centered, fit_scale, text_width};
pub use noise::{color_ramp, NoiseField, NoiseParams};
pub use raster::{encode_png, offset, pack_grid, scale_nearest, to_rgba};
pub use rng::SeededRng;
pub use svg::{declared_dimensions, PathBuilder, SvgDocument, SvgElement, SvgStyle};
pub use symmetry::{Cell, PixelGrid, SymmetryMode, SymmetryParams, WeightedColor};
