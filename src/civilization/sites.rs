//! Settlement site scoring and selection.
//!
//! A weighted heuristic ranks candidate cells by slope, biome, freshwater
//! proximity, and temperature comfort. Placement samples a coarse sub-grid
//! and enforces a minimum spacing between cities.

use crate::civilization::types::City;
use crate::climate::{Biome, ClimateData};
use crate::terrain::elevation_at;
use crate::tilemap::Tilemap;

/// Square radius searched for freshwater around a candidate site
const WATER_SEARCH_RADIUS: i32 = 5;

/// Margin kept clear of the map edge when scanning for sites
const SCAN_MARGIN: usize = 10;

/// Score a candidate settlement site. Higher is better; negative totals clamp
/// to zero, and water cells are unusable.
pub fn site_suitability(elevation: &Tilemap<f32>, climate: &ClimateData, x: usize, y: usize) -> f32 {
    let cell_elevation = *elevation.get(x, y);
    if cell_elevation < 0.05 {
        return 0.0;
    }

    let mut suitability = 0.0;

    // Flat to gently sloped land is easiest to build on.
    if cell_elevation < 0.3 {
        suitability += 10.0;
    } else if cell_elevation < 0.5 {
        suitability += 5.0;
    }

    suitability += match *climate.biomes.get(x, y) {
        Biome::TemperateGrassland | Biome::TemperateForest => 15.0,
        Biome::Savanna | Biome::TropicalForest => 10.0,
        Biome::Taiga => 5.0,
        Biome::Desert | Biome::Tundra | Biome::Ice => -5.0,
        _ => 0.0,
    };

    // Freshwater access dominates the score.
    let mut water_distance = i32::MAX;
    for dy in -WATER_SEARCH_RADIUS..=WATER_SEARCH_RADIUS {
        for dx in -WATER_SEARCH_RADIUS..=WATER_SEARCH_RADIUS {
            if elevation_at(elevation, x as i32 + dx, y as i32 + dy) < 0.0 {
                water_distance = water_distance.min(dx.abs() + dy.abs());
            }
        }
    }
    if water_distance < i32::MAX {
        suitability += 20.0 * (1.0 - water_distance as f32 / 10.0);
    } else {
        suitability -= 10.0;
    }

    // Temperature comfort band.
    let temperature = *climate.temperature.get(x, y);
    if temperature > 5.0 && temperature < 25.0 {
        suitability += 10.0;
    }

    suitability.max(0.0)
}

/// True when (x, y) keeps at least `min_distance` from every existing city.
pub fn can_place_city(cities: &[City], x: usize, y: usize, min_distance: f32) -> bool {
    cities.iter().all(|city| {
        let dx = city.x as f32 - x as f32;
        let dy = city.y as f32 - y as f32;
        (dx * dx + dy * dy).sqrt() >= min_distance
    })
}

/// Sample suitability on a coarse sub-grid and return candidate sites sorted
/// best-first. Only sites with a positive score are kept.
pub fn scan_candidate_sites(
    elevation: &Tilemap<f32>,
    climate: &ClimateData,
    step: usize,
) -> Vec<(f32, usize, usize)> {
    let width = elevation.width;
    let height = elevation.height;

    let mut sites = Vec::new();
    let mut y = SCAN_MARGIN;
    while y < height.saturating_sub(SCAN_MARGIN) {
        let mut x = SCAN_MARGIN;
        while x < width.saturating_sub(SCAN_MARGIN) {
            let suitability = site_suitability(elevation, climate, x, y);
            if suitability > 0.0 {
                sites.push((suitability, x, y));
            }
            x += step;
        }
        y += step;
    }

    sites.sort_by(|a, b| b.0.total_cmp(&a.0));
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate;

    /// Flat grassland with a lake in the middle.
    fn lakeside_world() -> (Tilemap<f32>, ClimateData) {
        let mut elevation = Tilemap::new_with(40, 40, 0.1f32);
        for y in 18..22 {
            for x in 18..22 {
                elevation.set(x, y, -0.5);
            }
        }
        let climate = climate::generate(&elevation);
        (elevation, climate)
    }

    #[test]
    fn test_water_cells_score_zero() {
        let (elevation, climate) = lakeside_world();
        assert_eq!(site_suitability(&elevation, &climate, 19, 19), 0.0);
    }

    #[test]
    fn test_lakeside_beats_inland() {
        let (elevation, climate) = lakeside_world();
        let lakeside = site_suitability(&elevation, &climate, 23, 20);
        let inland = site_suitability(&elevation, &climate, 36, 36);
        assert!(lakeside > inland);
        assert!(lakeside > 0.0);
    }

    #[test]
    fn test_min_distance_enforced() {
        let cities = vec![City::new(20, 20, "Old ford".to_string(), 0)];
        assert!(!can_place_city(&cities, 25, 20, 20.0));
        assert!(can_place_city(&cities, 45, 20, 20.0));
    }

    #[test]
    fn test_scan_returns_sorted_candidates() {
        let (elevation, climate) = lakeside_world();
        let sites = scan_candidate_sites(&elevation, &climate, 2);
        assert!(!sites.is_empty());
        for pair in sites.windows(2) {
            assert!(pair[0].0 >= pair[1].0);
        }
    }
}
