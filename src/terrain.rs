//! Elevation synthesis and terrain classification.
//!
//! Builds the base elevation field from multi-octave value noise shaped by an
//! island falloff mask, then classifies each cell into a terrain band. All
//! later stages (erosion, climate, civilization) read this field.

use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

// =============================================================================
// TERRAIN PARAMETERS
// =============================================================================

/// Parameters for elevation synthesis
#[derive(Clone, Copy, Debug)]
pub struct TerrainParams {
    /// Base frequency for noise (lower = larger features)
    pub frequency: f32,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Island falloff curve steepness
    pub falloff_a: f32,
    /// Island falloff curve midpoint shaping
    pub falloff_b: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            frequency: 0.005,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            falloff_a: 3.0,
            falloff_b: 2.2,
        }
    }
}

/// Island shaping mode for the falloff mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IslandMode {
    /// One central landmass with a plateau near the map center
    #[default]
    Single,
    /// Several discrete landmasses from weighted radial centers
    Archipelago,
}

impl std::fmt::Display for IslandMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Archipelago => write!(f, "archipelago"),
        }
    }
}

// =============================================================================
// TERRAIN CLASSIFICATION
// =============================================================================

/// Terrain band assigned to a cell from its elevation alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    DeepWater,
    ShallowWater,
    Sand,
    Grass,
    Forest,
    Rock,
    Snow,
}

impl TerrainType {
    /// Display color (RGB) for map export
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TerrainType::DeepWater => (0, 50, 120),
            TerrainType::ShallowWater => (20, 100, 180),
            TerrainType::Sand => (238, 203, 173),
            TerrainType::Grass => (86, 152, 23),
            TerrainType::Forest => (34, 100, 34),
            TerrainType::Rock => (130, 130, 130),
            TerrainType::Snow => (255, 255, 255),
        }
    }
}

/// Elevation threshold below which a cell counts as shallow water.
/// Erosion skips particle starts below this level.
pub const SHALLOW_WATER_LEVEL: f32 = -0.1;

/// Sea level: cells below this are water for climate and civilization.
pub const SEA_LEVEL: f32 = 0.0;

/// Ordered classification bands: a cell gets the first band whose upper
/// elevation bound it falls below. Bands never overlap, so classification is
/// monotonic in elevation.
const TERRAIN_BANDS: [(f32, TerrainType); 6] = [
    (-0.5, TerrainType::DeepWater),
    (SHALLOW_WATER_LEVEL, TerrainType::ShallowWater),
    (SEA_LEVEL, TerrainType::Sand),
    (0.15, TerrainType::Grass),
    (0.35, TerrainType::Forest),
    (0.6, TerrainType::Rock),
];

/// Classify a single elevation value into its terrain band.
pub fn classify(elevation: f32) -> TerrainType {
    for &(upper, terrain) in TERRAIN_BANDS.iter() {
        if elevation < upper {
            return terrain;
        }
    }
    TerrainType::Snow
}

/// Recompute the full terrain classification grid from an elevation field.
pub fn assign_terrain_types(elevation: &Tilemap<f32>) -> Tilemap<TerrainType> {
    let mut terrain = Tilemap::new_with(elevation.width, elevation.height, TerrainType::DeepWater);
    for (x, y, &e) in elevation.iter() {
        terrain.set(x, y, classify(e));
    }
    terrain
}

// =============================================================================
// VALUE NOISE
// =============================================================================

/// Integer hash driving the value noise lattice. Wrapping arithmetic keeps
/// the result identical across platforms for a given (x, y, seed).
fn lattice_hash(x: i32, y: i32, seed: i32) -> f32 {
    let mut n = x.wrapping_add(y.wrapping_mul(57)).wrapping_add(seed.wrapping_mul(131));
    n = (n.wrapping_shl(13)) ^ n;
    let m = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589);
    1.0 - (m & 0x7fff_ffff) as f32 / 1_073_741_824.0
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Smoothed 2D value noise: bilinear blend of the four lattice corners with a
/// smoothstep fade.
fn value_noise(x: f32, y: f32, seed: i32) -> f32 {
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let xf = x - xi as f32;
    let yf = y - yi as f32;

    let v00 = lattice_hash(xi, yi, seed);
    let v10 = lattice_hash(xi + 1, yi, seed);
    let v01 = lattice_hash(xi, yi + 1, seed);
    let v11 = lattice_hash(xi + 1, yi + 1, seed);

    let sx = smoothstep(xf);
    let sy = smoothstep(yf);

    let a = v00 * (1.0 - sx) + v10 * sx;
    let b = v01 * (1.0 - sx) + v11 * sx;
    a * (1.0 - sy) + b * sy
}

/// Multi-octave value noise normalized by the octave amplitude sum, so the
/// result stays within [-1, 1]. Each octave salts the seed to decorrelate.
fn octave_noise(x: f32, y: f32, seed: i32, params: &TerrainParams) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = params.frequency;
    let mut max_value = 0.0;

    for i in 0..params.octaves {
        total += value_noise(x * frequency, y * frequency, seed.wrapping_add(i as i32)) * amplitude;
        max_value += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    total / max_value
}

// =============================================================================
// ISLAND FALLOFF
// =============================================================================

/// Falloff curve: keeps a plateau near value=1 and pulls the rest toward 0.
fn falloff_curve(value: f32, a: f32, b: f32) -> f32 {
    value.powf(a) / (value.powf(a) + (b - b * value).powf(a))
}

/// Single-island mask: Chebyshev distance from center gives a square-ish
/// island that fills the map, edges pulled down to water.
fn single_island_falloff(x: usize, y: usize, width: usize, height: usize, params: &TerrainParams) -> f32 {
    let nx = (x as f32 / width as f32) * 2.0 - 1.0;
    let ny = (y as f32 / height as f32) * 2.0 - 1.0;

    let distance = nx.abs().max(ny.abs());
    let value = (1.0 - distance).max(0.0);
    falloff_curve(value, params.falloff_a, params.falloff_b)
}

/// Archipelago mask: five weighted radial island centers, combined by taking
/// the strongest contribution at each cell.
fn archipelago_falloff(x: usize, y: usize, width: usize, height: usize, params: &TerrainParams) -> f32 {
    let nx = (x as f32 / width as f32) * 2.0 - 1.0;
    let ny = (y as f32 / height as f32) * 2.0 - 1.0;

    // (center_x, center_y, distance scale, weight) per island; the first is
    // the main landmass, the rest shrink progressively.
    const ISLANDS: [(f32, f32, f32, f32); 5] = [
        (0.3, 0.2, 1.2, 0.9),
        (-0.4, -0.3, 1.5, 0.7),
        (0.1, 0.5, 1.8, 0.6),
        (-0.6, 0.4, 2.5, 0.5),
        (0.7, -0.5, 3.0, 0.4),
    ];

    let mut value = 0.0f32;
    for &(cx, cy, scale, weight) in ISLANDS.iter() {
        let dist = ((nx - cx) * (nx - cx) + (ny - cy) * (ny - cy)).sqrt();
        value = value.max((1.0 - dist * scale) * weight);
    }

    falloff_curve(value, params.falloff_a, params.falloff_b)
}

// =============================================================================
// ELEVATION GENERATION
// =============================================================================

/// Generate the elevation field: octave noise blended with the island mask,
/// clamped to [-1, 1]. Identical seed and parameters always produce an
/// identical field.
pub fn generate_elevation(
    width: usize,
    height: usize,
    seed: u64,
    mode: IslandMode,
    params: &TerrainParams,
) -> Tilemap<f32> {
    let noise_seed = seed as i32;
    let mut elevation = Tilemap::new_with(width, height, 0.0f32);

    for y in 0..height {
        for x in 0..width {
            let noise = octave_noise(x as f32, y as f32, noise_seed, params);
            let falloff = match mode {
                IslandMode::Single => single_island_falloff(x, y, width, height, params),
                IslandMode::Archipelago => archipelago_falloff(x, y, width, height, params),
            };

            // Shift by half the falloff range so map edges end up underwater
            // while the island interior stays land.
            let value = (noise + falloff - 0.5).clamp(-1.0, 1.0);
            elevation.set(x, y, value);
        }
    }

    elevation
}

/// Read elevation with signed coordinates; out-of-range queries return deep
/// water.
pub fn elevation_at(elevation: &Tilemap<f32>, x: i32, y: i32) -> f32 {
    elevation.get_checked(x, y).copied().unwrap_or(-1.0)
}

/// Nudge a single cell, keeping the field inside [-1, 1]. Out-of-range
/// coordinates are ignored.
pub fn modify_elevation(elevation: &mut Tilemap<f32>, x: i32, y: i32, delta: f32) {
    if elevation.in_bounds(x, y) {
        let cell = elevation.get_mut(x as usize, y as usize);
        *cell = (*cell + delta).clamp(-1.0, 1.0);
    }
}

/// Re-range an elevation field to span the full [-1, 1] interval. Useful after
/// heavy erosion has compressed the dynamic range.
pub fn normalize_elevation(elevation: &mut Tilemap<f32>) {
    let mut min_e = f32::MAX;
    let mut max_e = f32::MIN;
    for (_, _, &e) in elevation.iter() {
        min_e = min_e.min(e);
        max_e = max_e.max(e);
    }

    let range = max_e - min_e;
    if range <= 0.0 {
        return;
    }

    for (_, _, e) in elevation.iter_mut() {
        *e = ((*e - min_e) / range) * 2.0 - 1.0;
    }
}
