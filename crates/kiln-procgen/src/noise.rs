//! Coherent gradient noise fields

use crate::raster::to_rgba;
use crate::rng::SeededRng;
use image::RgbaImage;
use kiln_core::Color;

/// Parameters for a multi-octave noise field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    /// Size in pixels of one lattice cell at the base octave
    pub scale: f32,
    pub octaves: u32,
    /// Amplitude multiplier applied per octave
    pub persistence: f32,
    /// Frequency multiplier applied per octave
    pub lacunarity: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 32.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Seeded 2D gradient noise with a shuffled permutation table
struct Gradient2d {
    perm: [u8; 512],
}

impl Gradient2d {
    fn new(rng: &mut SeededRng) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        rng.shuffle(&mut table);
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// Sample at a point; result lies in [-1, 1]
    fn sample(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i32 & 255) as usize;
        let yi = (y0 as i32 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v).clamp(-1.0, 1.0)
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn grad(hash: u8, x: f32, y: f32) -> f32 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// A grid of noise values in [0, 1], row-major
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    pub width: u32,
    pub height: u32,
    values: Vec<f32>,
}

impl NoiseField {
    /// Sum `octaves` frequencies of gradient noise into a normalized field.
    ///
    /// Identical arguments always produce an identical field.
    pub fn generate(width: u32, height: u32, seed: u32, params: &NoiseParams) -> Self {
        let mut rng = SeededRng::new(seed);
        let gradient = Gradient2d::new(&mut rng);
        let octaves = params.octaves.max(1);
        let scale = params.scale.max(1.0);

        // Per-octave offsets keep integer lattice points from lining up
        let offsets: Vec<(f32, f32)> = (0..octaves)
            .map(|_| (rng.range(0.0, 256.0), rng.range(0.0, 256.0)))
            .collect();

        let mut max_amplitude = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..octaves {
            max_amplitude += amplitude;
            amplitude *= params.persistence;
        }

        let mut values = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let mut total = 0.0;
                let mut frequency = 1.0 / scale;
                let mut amplitude = 1.0;
                for (ox, oy) in &offsets {
                    let sx = x as f32 * frequency + ox;
                    let sy = y as f32 * frequency + oy;
                    total += gradient.sample(sx, sy) * amplitude;
                    frequency *= params.lacunarity;
                    amplitude *= params.persistence;
                }
                let normalized = if max_amplitude > 0.0 {
                    total / max_amplitude
                } else {
                    0.0
                };
                values.push((normalized * 0.5 + 0.5).clamp(0.0, 1.0));
            }
        }

        Self {
            width,
            height,
            values,
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y * self.width + x) as usize]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Map every value through `color_of` to build a raster
    pub fn to_image<F>(&self, color_of: F) -> RgbaImage
    where
        F: Fn(f32) -> Color,
    {
        RgbaImage::from_fn(self.width, self.height, |x, y| to_rgba(color_of(self.get(x, y))))
    }
}

/// Piecewise-linear color ramp over sorted `(position, color)` stops
pub fn color_ramp(stops: &[(f32, Color)], t: f32) -> Color {
    match stops {
        [] => Color::TRANSPARENT,
        [(_, only)] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0);
            if t <= stops[0].0 {
                return stops[0].1;
            }
            for pair in stops.windows(2) {
                let (p0, c0) = pair[0];
                let (p1, c1) = pair[1];
                if t <= p1 {
                    let span = (p1 - p0).max(f32::EPSILON);
                    return c0.lerp(c1, (t - p0) / span);
                }
            }
            stops[stops.len() - 1].1
        }
    }
}
