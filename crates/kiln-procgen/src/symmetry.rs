//! Mirrored pixel synthesis
//!
//! One half (or quadrant) of a small grid is filled by weighted random choice
//! from a palette, then reflected so the result is always symmetric.

use crate::raster::to_rgba;
use crate::rng::SeededRng;
use image::RgbaImage;
use kiln_core::Color;

/// A palette entry with its relative selection weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedColor {
    pub color: Color,
    pub weight: f32,
}

impl WeightedColor {
    pub const fn new(color: Color, weight: f32) -> Self {
        Self { color, weight }
    }
}

/// Axes the generated region is reflected across
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryMode {
    /// Left half mirrored onto the right
    Vertical,
    /// Top-left quadrant mirrored onto all four quadrants
    Quad,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryParams {
    pub mode: SymmetryMode,
    /// Base chance a cell is filled at the center of the grid
    pub fill_probability: f32,
    /// How strongly fill chance falls off toward the edges, 0..1
    pub center_bias: f32,
}

impl Default for SymmetryParams {
    fn default() -> Self {
        Self {
            mode: SymmetryMode::Vertical,
            fill_probability: 0.7,
            center_bias: 0.8,
        }
    }
}

/// One cell of a synthesized grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Index into the palette the grid was synthesized from
    Fill(u8),
    Outline,
}

/// A small palette-indexed grid, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    cells: Vec<Cell>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; (width * height) as usize],
        }
    }

    /// Fill the generated region from `palette` and mirror it
    pub fn synthesize(
        width: u32,
        height: u32,
        seed: u32,
        palette: &[WeightedColor],
        params: &SymmetryParams,
    ) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut grid = Self::new(width, height);
        let weights: Vec<f32> = palette.iter().map(|p| p.weight).collect();

        let half_w = width.div_ceil(2);
        let gen_h = match params.mode {
            SymmetryMode::Vertical => height,
            SymmetryMode::Quad => height.div_ceil(2),
        };
        let cx = (width as f32 - 1.0) / 2.0;
        let cy = (height as f32 - 1.0) / 2.0;

        for y in 0..gen_h {
            for x in 0..half_w {
                let dx = (x as f32 - cx).abs() / cx.max(1.0);
                let dy = (y as f32 - cy).abs() / cy.max(1.0);
                let dist = (dx * dx + dy * dy).sqrt().min(1.0);
                let p = params.fill_probability * (1.0 - params.center_bias * dist);
                if rng.chance(p) {
                    if let Some(idx) = rng.weighted_index(&weights) {
                        grid.set(x, y, Cell::Fill(idx as u8));
                    }
                }
            }
        }

        grid.mirror(params.mode);
        grid
    }

    /// Copy the generated region onto the reflected side(s)
    pub fn mirror(&mut self, mode: SymmetryMode) {
        let w = self.width;
        let h = self.height;
        for y in 0..h {
            for x in 0..w / 2 {
                let cell = self.get(x, y);
                self.set(w - 1 - x, y, cell);
            }
        }
        if mode == SymmetryMode::Quad {
            for y in 0..h / 2 {
                for x in 0..w {
                    let cell = self.get(x, y);
                    self.set(x, h - 1 - y, cell);
                }
            }
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Cell {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize]
        } else {
            Cell::Empty
        }
    }

    pub fn set(&mut self, x: u32, y: u32, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = cell;
        }
    }

    /// Set a cell and its mirror image across the vertical axis
    pub fn set_mirrored(&mut self, x: u32, y: u32, cell: Cell) {
        self.set(x, y, cell);
        if x < self.width {
            self.set(self.width - 1 - x, y, cell);
        }
    }

    /// Mark empty cells that border a filled cell as outline
    pub fn with_outline(&self) -> Self {
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) != Cell::Empty {
                    continue;
                }
                let touches = [(0i32, -1i32), (0, 1), (-1, 0), (1, 0)]
                    .iter()
                    .any(|(dx, dy)| {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        nx >= 0
                            && ny >= 0
                            && matches!(self.get(nx as u32, ny as u32), Cell::Fill(_))
                    });
                if touches {
                    out.set(x, y, Cell::Outline);
                }
            }
        }
        out
    }

    /// True if every row reads the same left-to-right and right-to-left
    pub fn is_mirror_symmetric(&self) -> bool {
        (0..self.height).all(|y| {
            (0..self.width / 2).all(|x| self.get(x, y) == self.get(self.width - 1 - x, y))
        })
    }

    /// One pixel per cell; empty cells are transparent
    pub fn to_image(&self, palette: &[Color], outline: Color) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let color = match self.get(x, y) {
                Cell::Empty => Color::TRANSPARENT,
                Cell::Fill(i) => palette.get(i as usize).copied().unwrap_or(Color::TRANSPARENT),
                Cell::Outline => outline,
            };
            to_rgba(color)
        })
    }
}
