//! Movement cost derivation for road building.
//!
//! Computed once at civilization initialization from elevation and biome.
//! Water gets a cost far above the impassable cutoff used by pathfinding, so
//! roads never cross it.

use crate::climate::{Biome, ClimateData};
use crate::tilemap::Tilemap;

/// Cost assigned to water cells; well above the impassable cutoff
pub const WATER_COST: f32 = 999.0;

/// Cells costing more than this are treated as impassable by pathfinding
pub const IMPASSABLE_COST: f32 = 100.0;

/// Per-cell road building cost: base 1.0 plus elevation and biome penalties.
pub fn calculate_movement_costs(
    elevation: &Tilemap<f32>,
    climate: &ClimateData,
) -> Tilemap<f32> {
    let mut costs = Tilemap::new_with(elevation.width, elevation.height, 1.0f32);

    for (x, y, &e) in elevation.iter() {
        let cost = if e < 0.0 {
            WATER_COST
        } else {
            let biome_penalty = match *climate.biomes.get(x, y) {
                Biome::Desert | Biome::Ice | Biome::Tundra => 2.0,
                Biome::TropicalForest | Biome::TemperateForest | Biome::Taiga => 1.5,
                Biome::TemperateGrassland | Biome::Savanna => 0.5,
                _ => 0.0,
            };
            1.0 + e * 3.0 + biome_penalty
        };
        costs.set(x, y, cost);
    }

    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate;

    #[test]
    fn test_water_is_effectively_impassable() {
        let mut elevation = Tilemap::new_with(10, 10, 0.1f32);
        elevation.set(3, 3, -0.5);
        let climate = climate::generate(&elevation);

        let costs = calculate_movement_costs(&elevation, &climate);
        assert_eq!(*costs.get(3, 3), WATER_COST);
        assert!(*costs.get(3, 3) > IMPASSABLE_COST);
    }

    #[test]
    fn test_land_cost_at_least_one() {
        let elevation = Tilemap::new_with(10, 10, 0.05f32);
        let climate = climate::generate(&elevation);

        let costs = calculate_movement_costs(&elevation, &climate);
        for (_, _, &c) in costs.iter() {
            assert!(c >= 1.0);
        }
    }

    #[test]
    fn test_harsh_biomes_cost_more_than_grassland() {
        // Same elevation, different biome: compare the penalty directly.
        let elevation = Tilemap::new_with(4, 4, 0.1f32);
        let mut climate = climate::generate(&elevation);
        climate.biomes.set(0, 0, Biome::TemperateGrassland);
        climate.biomes.set(1, 0, Biome::Desert);

        let costs = calculate_movement_costs(&elevation, &climate);
        assert!(*costs.get(1, 0) > *costs.get(0, 0));
    }
}
