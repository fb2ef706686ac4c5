//! Terrain tiles and textures from coherent noise

use super::sheet::SheetMetadata;
use super::Artifact;
use crate::spec::{Material, TileSpec};
use image::RgbaImage;
use kiln_core::{Color, Dimensions, Result};
use kiln_procgen::{color_ramp, encode_png, pack_grid, NoiseField, NoiseParams};

const LAVA: &[(f32, Color)] = &[
    (0.0, Color::rgb(0x3A, 0x08, 0x05)),
    (0.45, Color::rgb(0xA3, 0x1C, 0x0B)),
    (0.7, Color::rgb(0xF0, 0x6A, 0x12)),
    (1.0, Color::rgb(0xFF, 0xD8, 0x4A)),
];

const WATER: &[(f32, Color)] = &[
    (0.0, Color::rgb(0x0C, 0x2A, 0x5C)),
    (0.55, Color::rgb(0x1F, 0x5F, 0xB0)),
    (1.0, Color::rgb(0x7F, 0xD0, 0xF0)),
];

const SNOW: &[(f32, Color)] = &[
    (0.0, Color::rgb(0xB8, 0xC8, 0xDC)),
    (0.6, Color::rgb(0xE4, 0xEC, 0xF4)),
    (1.0, Color::rgb(0xFF, 0xFF, 0xFF)),
];

const SAND: &[(f32, Color)] = &[
    (0.0, Color::rgb(0xC2, 0x9A, 0x5B)),
    (0.5, Color::rgb(0xDB, 0xBC, 0x7F)),
    (1.0, Color::rgb(0xF0, 0xDC, 0xA8)),
];

const GRASS: &[(f32, Color)] = &[
    (0.0, Color::rgb(0x1F, 0x4D, 0x1A)),
    (0.5, Color::rgb(0x3C, 0x8A, 0x2E)),
    (1.0, Color::rgb(0x86, 0xC9, 0x4E)),
];

const DIRT: &[(f32, Color)] = &[
    (0.0, Color::rgb(0x3E, 0x26, 0x14)),
    (0.5, Color::rgb(0x6B, 0x45, 0x26)),
    (1.0, Color::rgb(0x9C, 0x6F, 0x45)),
];

const STONE: &[(f32, Color)] = &[
    (0.0, Color::rgb(0x3C, 0x3F, 0x45)),
    (0.5, Color::rgb(0x74, 0x78, 0x80)),
    (1.0, Color::rgb(0xAE, 0xB2, 0xB8)),
];

const WOOD: &[(f32, Color)] = &[
    (0.0, Color::rgb(0x5A, 0x34, 0x18)),
    (0.6, Color::rgb(0x8B, 0x5A, 0x2B)),
    (1.0, Color::rgb(0xB0, 0x7D, 0x48)),
];

/// Noise character and color ramp for one material
struct Recipe {
    params: NoiseParams,
    ramp: &'static [(f32, Color)],
    /// Banding applied before the ramp, for ringed materials like wood
    bands: Option<f32>,
}

fn recipe(material: Material) -> Recipe {
    let params = |scale: f32, octaves: u32, persistence: f32| NoiseParams {
        scale,
        octaves,
        persistence,
        lacunarity: 2.0,
    };
    match material {
        Material::Lava => Recipe {
            params: params(20.0, 4, 0.55),
            ramp: LAVA,
            bands: None,
        },
        Material::Water => Recipe {
            params: params(28.0, 3, 0.5),
            ramp: WATER,
            bands: None,
        },
        Material::Snow => Recipe {
            params: params(24.0, 3, 0.45),
            ramp: SNOW,
            bands: None,
        },
        Material::Sand => Recipe {
            params: params(12.0, 3, 0.4),
            ramp: SAND,
            bands: None,
        },
        Material::Grass => Recipe {
            params: params(10.0, 4, 0.55),
            ramp: GRASS,
            bands: None,
        },
        Material::Dirt => Recipe {
            params: params(14.0, 4, 0.5),
            ramp: DIRT,
            bands: None,
        },
        Material::Stone => Recipe {
            params: params(16.0, 5, 0.6),
            ramp: STONE,
            bands: None,
        },
        Material::Wood => Recipe {
            params: params(40.0, 2, 0.4),
            ramp: WOOD,
            bands: Some(6.0),
        },
    }
}

fn tile(spec: &TileSpec, seed: u32) -> RgbaImage {
    let recipe = recipe(spec.material);
    let field = NoiseField::generate(spec.width, spec.height, seed, &recipe.params);
    field.to_image(|v| {
        let t = match recipe.bands {
            Some(n) => (v * n).fract(),
            None => v,
        };
        color_ramp(recipe.ramp, t)
    })
}

/// Seed for variant `i`; variant 0 keeps the tile seed
fn variant_seed(seed: u32, i: u32) -> u32 {
    seed.wrapping_add(i.wrapping_mul(0x9E37_79B9))
}

pub fn render(spec: &TileSpec) -> Result<Artifact> {
    let seed = spec.seed.unwrap_or(0);
    let variants: Vec<RgbaImage> = (0..spec.variants.max(1))
        .map(|i| tile(spec, variant_seed(seed, i)))
        .collect();

    let mut artifact = Artifact::new(
        encode_png(&variants[0])?,
        "png",
        Dimensions::new(spec.width, spec.height),
    );
    if variants.len() > 1 {
        let columns = (variants.len() as f32).sqrt().ceil() as u32;
        let (sheet, origins) = pack_grid(&variants, columns);
        let metadata = SheetMetadata::from_origins(spec.width, spec.height, &origins, |i| {
            format!("{}_{}", spec.material, i)
        });
        artifact = artifact
            .with_auxiliary("variants.png", encode_png(&sheet)?)
            .with_auxiliary("variants.json", metadata.to_json()?);
    }
    Ok(artifact)
}
