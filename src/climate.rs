//! Climate fields and biome classification.
//!
//! Temperature falls off toward the poles and with altitude; moisture comes
//! from proximity to water, smoothed to remove blocky noise boundaries. Both
//! fields feed a fixed decision table that assigns a biome to every cell.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::terrain::SHALLOW_WATER_LEVEL;
use crate::tilemap::Tilemap;

// =============================================================================
// CLIMATE PARAMETERS
// =============================================================================

/// Sea-level temperature at the map's mid-latitude line (Celsius)
const BASE_TEMPERATURE: f32 = 20.0;

/// Total temperature drop from mid-latitude to either map edge (Celsius)
const LATITUDE_TEMPERATURE_RANGE: f32 = 30.0;

/// Temperature drop per 1000m of altitude (lapse rate)
const ELEVATION_LAPSE_RATE: f32 = 6.5;

/// Meters of altitude represented by the full [0, 1] land elevation range
const ELEVATION_SCALE_METERS: f32 = 2000.0;

/// Square search radius (in cells) when looking for the nearest water cell
const MOISTURE_SEARCH_RADIUS: i32 = 20;

/// Number of 3x3 box-average passes applied to the raw moisture field
const MOISTURE_SMOOTHING_PASSES: usize = 2;

// =============================================================================
// BIOMES
// =============================================================================

/// Biome assigned to a cell from elevation, temperature, and moisture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Beach,
    Ice,
    Tundra,
    Taiga,
    TemperateForest,
    TemperateGrassland,
    Desert,
    Savanna,
    TropicalForest,
}

impl Biome {
    pub fn name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Beach => "Beach",
            Biome::Ice => "Ice",
            Biome::Tundra => "Tundra",
            Biome::Taiga => "Taiga",
            Biome::TemperateForest => "Temperate Forest",
            Biome::TemperateGrassland => "Temperate Grassland",
            Biome::Desert => "Desert",
            Biome::Savanna => "Savanna",
            Biome::TropicalForest => "Tropical Forest",
        }
    }

    /// Display color (RGB) for map export
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Biome::Ocean => (0, 50, 120),
            Biome::Beach => (238, 214, 175),
            Biome::Ice => (240, 248, 255),
            Biome::Tundra => (196, 204, 187),
            Biome::Taiga => (0, 100, 0),
            Biome::TemperateForest => (34, 139, 34),
            Biome::TemperateGrassland => (154, 205, 50),
            Biome::Desert => (238, 203, 173),
            Biome::Savanna => (209, 186, 116),
            Biome::TropicalForest => (0, 128, 0),
        }
    }
}

/// One temperature band of the biome table. Moisture splits are checked in
/// order; the first `moisture > threshold` match wins, otherwise `fallback`.
struct BiomeBand {
    max_temperature: f32,
    by_moisture: &'static [(f32, Biome)],
    fallback: Biome,
}

/// The biome decision table, ordered by rising temperature band. Land cells
/// take the first band whose upper temperature bound exceeds theirs.
const BIOME_TABLE: [BiomeBand; 5] = [
    BiomeBand {
        max_temperature: -5.0,
        by_moisture: &[],
        fallback: Biome::Ice,
    },
    BiomeBand {
        max_temperature: 0.0,
        by_moisture: &[],
        fallback: Biome::Tundra,
    },
    BiomeBand {
        max_temperature: 10.0,
        by_moisture: &[(0.5, Biome::Taiga)],
        fallback: Biome::Tundra,
    },
    BiomeBand {
        max_temperature: 20.0,
        by_moisture: &[(0.6, Biome::TemperateForest), (0.3, Biome::TemperateGrassland)],
        fallback: Biome::Desert,
    },
    BiomeBand {
        max_temperature: f32::INFINITY,
        by_moisture: &[(0.7, Biome::TropicalForest), (0.3, Biome::Savanna)],
        fallback: Biome::Desert,
    },
];

/// Classify one cell. Water overrides the table: anything below the shallow
/// water level is ocean, anything below sea level is beach.
pub fn determine_biome(elevation: f32, temperature: f32, moisture: f32) -> Biome {
    if elevation < SHALLOW_WATER_LEVEL {
        return Biome::Ocean;
    }
    if elevation < 0.0 {
        return Biome::Beach;
    }

    for band in BIOME_TABLE.iter() {
        if temperature < band.max_temperature {
            for &(threshold, biome) in band.by_moisture {
                if moisture > threshold {
                    return biome;
                }
            }
            return band.fallback;
        }
    }

    // Unreachable: the last band has an infinite upper bound.
    Biome::Desert
}

// =============================================================================
// CLIMATE DATA
// =============================================================================

/// The climate stage output: temperature, moisture, and the biome grid.
pub struct ClimateData {
    pub temperature: Tilemap<f32>,
    pub moisture: Tilemap<f32>,
    pub biomes: Tilemap<Biome>,
}

impl ClimateData {
    /// Temperature with signed coordinates; 0.0 out of range.
    pub fn temperature_at(&self, x: i32, y: i32) -> f32 {
        self.temperature.get_checked(x, y).copied().unwrap_or(0.0)
    }

    /// Moisture with signed coordinates; 0.0 out of range.
    pub fn moisture_at(&self, x: i32, y: i32) -> f32 {
        self.moisture.get_checked(x, y).copied().unwrap_or(0.0)
    }

    /// Biome with signed coordinates; ocean out of range.
    pub fn biome_at(&self, x: i32, y: i32) -> Biome {
        self.biomes.get_checked(x, y).copied().unwrap_or(Biome::Ocean)
    }
}

/// Generate the full climate from an elevation field. The per-cell field
/// passes are data-parallel; every cell's output depends only on the
/// elevation field, so the result is identical to a sequential pass.
pub fn generate(elevation: &Tilemap<f32>) -> ClimateData {
    let width = elevation.width;
    let height = elevation.height;

    let temperature_cells: Vec<f32> = (0..width * height)
        .into_par_iter()
        .map(|idx| {
            let x = idx % width;
            let y = idx / width;
            let latitude = y as f32 / height as f32;
            calculate_temperature(*elevation.get(x, y), latitude)
        })
        .collect();
    let temperature = Tilemap::from_vec(width, height, temperature_cells);

    let moisture_cells: Vec<f32> = (0..width * height)
        .into_par_iter()
        .map(|idx| {
            let x = idx % width;
            let y = idx / width;
            calculate_moisture(elevation, x, y)
        })
        .collect();
    let mut moisture = Tilemap::from_vec(width, height, moisture_cells);

    for _ in 0..MOISTURE_SMOOTHING_PASSES {
        moisture = smooth_moisture(&moisture);
    }

    let mut biomes = Tilemap::new_with(width, height, Biome::Ocean);
    for (x, y, &e) in elevation.iter() {
        let biome = determine_biome(e, *temperature.get(x, y), *moisture.get(x, y));
        biomes.set(x, y, biome);
    }

    ClimateData {
        temperature,
        moisture,
        biomes,
    }
}

/// Colder toward both map edges (poles) and with altitude. Latitude is the
/// cell's normalized row position.
fn calculate_temperature(elevation: f32, latitude: f32) -> f32 {
    let latitude_effect = (latitude - 0.5).abs() * 2.0;
    let base = BASE_TEMPERATURE - LATITUDE_TEMPERATURE_RANGE * latitude_effect;

    let elevation_meters = (elevation * ELEVATION_SCALE_METERS).max(0.0);
    let altitude_drop = elevation_meters / 1000.0 * ELEVATION_LAPSE_RATE;

    base - altitude_drop
}

/// Moisture is the inverse of the normalized distance to the nearest water
/// cell within the search radius, reduced at high altitude.
fn calculate_moisture(elevation: &Tilemap<f32>, x: usize, y: usize) -> f32 {
    let mut min_distance = MOISTURE_SEARCH_RADIUS as f32;

    for dy in -MOISTURE_SEARCH_RADIUS..=MOISTURE_SEARCH_RADIUS {
        for dx in -MOISTURE_SEARCH_RADIUS..=MOISTURE_SEARCH_RADIUS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;

            if let Some(&e) = elevation.get_checked(nx, ny) {
                if e < 0.0 {
                    let distance = ((dx * dx + dy * dy) as f32).sqrt();
                    min_distance = min_distance.min(distance);
                }
            }
        }
    }

    let mut moisture = 1.0 - min_distance / MOISTURE_SEARCH_RADIUS as f32;

    let cell_elevation = *elevation.get(x, y);
    if cell_elevation > 0.5 {
        moisture *= 1.0 - (cell_elevation - 0.5);
    }

    moisture.clamp(0.0, 1.0)
}

/// One 3x3 box-average pass over the interior, double-buffered so every read
/// sees the previous pass's values. Border cells keep their value.
fn smooth_moisture(moisture: &Tilemap<f32>) -> Tilemap<f32> {
    let mut smoothed = moisture.clone();

    for y in 1..moisture.height - 1 {
        for x in 1..moisture.width - 1 {
            let mut sum = 0.0;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    sum += *moisture.get((x as i32 + dx) as usize, (y as i32 + dy) as usize);
                }
            }
            smoothed.set(x, y, sum / 9.0);
        }
    }

    smoothed
}
