use noise::{NoiseFn, Perlin};
use terrane_core::addressing::pack;
use terrane_core::block::ids;
use terrane_core::constants::*;
use terrane_core::math::smoothstep;
use terrane_core::types::{Block, ChunkCoords};
use terrane_core::BlockTable;

/// Shape of one fractal noise layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    /// World units per base noise period.
    pub scale: f32,
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Whether the layer follows the world seed or a fixed one.
    pub seeded: bool,
}

/// Source of 2D terrain noise in roughly [-1, 1].
pub trait TerrainNoise {
    fn sample(&self, x: f32, y: f32, params: &NoiseParams) -> f32;
}

/// Fractal Perlin noise.
pub struct FbmNoise {
    seeded: Perlin,
    fixed: Perlin,
}

impl FbmNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seeded: Perlin::new(seed),
            fixed: Perlin::new(0),
        }
    }
}

impl TerrainNoise for FbmNoise {
    fn sample(&self, x: f32, y: f32, params: &NoiseParams) -> f32 {
        let source = if params.seeded {
            &self.seeded
        } else {
            &self.fixed
        };
        let mut frequency = 1.0 / params.scale as f64;
        let mut amplitude = 1.0f64;
        let mut total = 0.0f64;
        let mut norm = 0.0f64;
        for _ in 0..params.octaves.max(1) {
            total += source.get([x as f64 * frequency, y as f64 * frequency]) * amplitude;
            norm += amplitude;
            amplitude *= params.persistence as f64;
            frequency *= params.lacunarity as f64;
        }
        (total / norm) as f32
    }
}

pub(crate) const BASE_PARAMS: NoiseParams = NoiseParams {
    scale: 96.0,
    octaves: 5,
    persistence: 0.5,
    lacunarity: 2.0,
    seeded: true,
};

pub(crate) const BIOME_PARAMS: NoiseParams = NoiseParams {
    scale: 384.0,
    octaves: 2,
    persistence: 0.5,
    lacunarity: 2.0,
    seeded: true,
};

pub(crate) const RIDGE_PARAMS: NoiseParams = NoiseParams {
    scale: 64.0,
    octaves: 3,
    persistence: 0.5,
    lacunarity: 2.0,
    seeded: false,
};

/// Surface sits this far above sea level where all noise is zero.
const BASE_OFFSET: f32 = 4.0;
const BASE_AMPLITUDE: f32 = 18.0;
const MESA_LIFT: f32 = 22.0;
const MESA_TERRACE: f32 = 4.0;
const CANYON_DEPTH: f32 = 26.0;
/// Biome noise range over which mesas (positive) or canyons (negative) fade in.
const BIOME_EDGE: (f32, f32) = (0.15, 0.45);
const RIDGE_EDGE: (f32, f32) = (0.75, 1.0);
/// Dirt (or beach sand) layers between stone and the surface block.
const SOIL_DEPTH: u32 = 3;

/// Deterministic heightmap terrain: strata below the surface, water up to sea
/// level, and sand along shorelines.
pub struct TerrainGenerator {
    noise: Box<dyn TerrainNoise>,
    sea_level: u32,
}

impl TerrainGenerator {
    pub fn new(seed: u32, sea_level: u32) -> Self {
        Self::with_noise(Box::new(FbmNoise::new(seed)), sea_level)
    }

    pub fn with_noise(noise: Box<dyn TerrainNoise>, sea_level: u32) -> Self {
        Self { noise, sea_level }
    }

    pub fn sea_level(&self) -> u32 {
        self.sea_level
    }

    /// Z of the topmost solid block in the world column (wx, wy).
    pub fn surface_height(&self, wx: i32, wy: i32) -> u32 {
        let (x, y) = (wx as f32, wy as f32);
        let base = self.sea_level as f32
            + BASE_OFFSET
            + self.noise.sample(x, y, &BASE_PARAMS) * BASE_AMPLITUDE;
        let biome = self.noise.sample(x, y, &BIOME_PARAMS);

        let mut height = base;
        let mesa = smoothstep(BIOME_EDGE.0, BIOME_EDGE.1, biome);
        if mesa > 0.0 {
            let terraced = ((base + MESA_LIFT) / MESA_TERRACE).floor() * MESA_TERRACE;
            height += (terraced - base) * mesa;
        }
        let canyon = smoothstep(BIOME_EDGE.0, BIOME_EDGE.1, -biome);
        if canyon > 0.0 {
            let ridge = 1.0 - self.noise.sample(x, y, &RIDGE_PARAMS).abs();
            height -= smoothstep(RIDGE_EDGE.0, RIDGE_EDGE.1, ridge) * CANYON_DEPTH * canyon;
        }

        height.round().clamp(1.0, (CHUNK_HEIGHT - 2) as f32) as u32
    }

    /// Generate the blocks of one chunk with default flags from `table`.
    /// Light, sky and dirty bits are left clear for the lighting engine.
    pub fn generate(&self, coords: ChunkCoords, table: &BlockTable) -> Vec<Block> {
        let mut types = vec![ids::AIR; BLOCKS_PER_CHUNK];
        let base_x = coords.x * CHUNK_WIDTH as i32;
        let base_y = coords.y * CHUNK_DEPTH as i32;

        for ly in 0..CHUNK_DEPTH {
            for lx in 0..CHUNK_WIDTH {
                let height = self.surface_height(base_x + lx as i32, base_y + ly as i32);
                for lz in 0..CHUNK_HEIGHT {
                    types[pack(lx, ly, lz)] = self.column_type(lz, height);
                }
            }
        }

        sand_shorelines(&mut types);
        types.into_iter().map(|id| table.block(id)).collect()
    }

    fn column_type(&self, z: u32, height: u32) -> u8 {
        let beach = height < self.sea_level;
        if z + SOIL_DEPTH < height {
            ids::STONE
        } else if z < height {
            if beach {
                ids::SAND
            } else {
                ids::DIRT
            }
        } else if z == height {
            if beach {
                ids::SAND
            } else {
                ids::GRASS
            }
        } else if z <= self.sea_level {
            ids::WATER
        } else {
            ids::AIR
        }
    }
}

/// Turn dirt and grass touching water (laterally or from above) into sand.
/// Reads from a snapshot so new sand does not spread further.
fn sand_shorelines(types: &mut [u8]) {
    let snapshot = types.to_vec();
    let is_water = |x: i64, y: i64, z: u32| {
        x >= 0
            && y >= 0
            && x <= X_MASK as i64
            && y <= Y_MASK as i64
            && z <= Z_MASK
            && snapshot[pack(x as u32, y as u32, z)] == ids::WATER
    };

    for z in 0..CHUNK_HEIGHT {
        for y in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                let idx = pack(x, y, z);
                if snapshot[idx] != ids::DIRT && snapshot[idx] != ids::GRASS {
                    continue;
                }
                let (xi, yi) = (x as i64, y as i64);
                if is_water(xi + 1, yi, z)
                    || is_water(xi - 1, yi, z)
                    || is_water(xi, yi + 1, z)
                    || is_water(xi, yi - 1, z)
                    || is_water(xi, yi, z + 1)
                {
                    types[idx] = ids::SAND;
                }
            }
        }
    }
}
