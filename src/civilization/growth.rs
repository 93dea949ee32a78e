//! Yearly city growth, territorial expansion, and development diffusion.
//!
//! The yearly step applies these in a fixed order: every city grows, then
//! every city expands its claim, then the development field is recomputed.
//! Reordering changes outcomes.

use crate::civilization::types::{City, CityId, Road};
use crate::climate::{Biome, ClimateData};
use crate::tilemap::Tilemap;

/// Development lost per year on every cell
const DEVELOPMENT_DECAY: f32 = 0.99;

/// Flat development bonus along road paths
const ROAD_DEVELOPMENT_BONUS: f32 = 0.05;

/// Advance one city by a year: population, resources, and the growth-rate
/// tier step-down as the settlement crosses size thresholds.
pub fn grow_city(city: &mut City, climate: &ClimateData) {
    let mut modifier = 1.0;

    // Favorable biomes accelerate growth, harsh ones suppress it.
    modifier *= match *climate.biomes.get(city.x, city.y) {
        Biome::TemperateGrassland | Biome::TemperateForest => 1.2,
        Biome::Desert | Biome::Tundra | Biome::Ice => 0.7,
        _ => 1.0,
    };

    // Every trade connection adds a small bonus.
    modifier *= 1.0 + city.connected.len() as f32 * 0.1;

    city.population = (city.population as f32 * city.growth_rate * modifier) as u32;
    city.resources += city.population as f32 * 0.01;

    // Larger settlements grow relatively slower.
    if city.population > 1_000 {
        city.growth_rate = 1.015;
    }
    if city.population > 5_000 {
        city.growth_rate = 1.01;
    }
    if city.population > 10_000 {
        city.growth_rate = 1.005;
    }
}

/// Claim every unclaimed, above-sea-level cell within the city's current
/// radius. Existing claims are never overwritten: first claim wins, claims
/// only grow outward.
pub fn expand_territory(
    territory: &mut Tilemap<CityId>,
    elevation: &Tilemap<f32>,
    city: &City,
    id: CityId,
) {
    let radius = 5 + (city.population / 1000).min(1_000_000) as i32;
    // Cells beyond the map edge can never be claimed, so the scan stops at
    // map scale even when the claim radius outgrows it.
    let reach = radius.min(territory.width.max(territory.height) as i32);

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let x = city.x as i32 + dx;
            let y = city.y as i32 + dy;
            if !territory.in_bounds(x, y) {
                continue;
            }

            let distance = ((dx * dx + dy * dy) as f32).sqrt();
            if distance <= radius as f32 && *elevation.get(x as usize, y as usize) > 0.0 {
                let cell = territory.get_mut(x as usize, y as usize);
                if cell.is_none() {
                    *cell = id;
                }
            }
        }
    }
}

/// Recompute the development field: decay everything, then add
/// distance-attenuated city influence and a flat bonus along roads, all
/// capped at 1.0.
pub fn update_development(
    development: &mut Tilemap<f32>,
    cities: &[City],
    roads: &[Road],
) {
    for (_, _, cell) in development.iter_mut() {
        *cell *= DEVELOPMENT_DECAY;
    }

    for city in cities {
        let dev_radius = 3.0 + city.population as f32 / 2000.0;
        let dev_strength = (city.population as f32 / 10_000.0).min(1.0);
        let reach = (dev_radius as i32).min(development.width.max(development.height) as i32);

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let x = city.x as i32 + dx;
                let y = city.y as i32 + dy;
                if !development.in_bounds(x, y) {
                    continue;
                }

                let distance = ((dx * dx + dy * dy) as f32).sqrt();
                if distance <= dev_radius {
                    let influence = dev_strength * (1.0 - distance / dev_radius);
                    let cell = development.get_mut(x as usize, y as usize);
                    *cell = (*cell + influence * 0.1).min(1.0);
                }
            }
        }
    }

    for road in roads {
        for &(x, y) in &road.path {
            let cell = development.get_mut(x, y);
            *cell = (*cell + ROAD_DEVELOPMENT_BONUS).min(1.0);
        }
    }
}
