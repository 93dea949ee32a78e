//! World engine facade.
//!
//! Owns the shared grid state and exposes the two surfaces external
//! collaborators use: discrete triggers that run pipeline stages, and
//! read-only queries over the resulting fields. Stage ordering is enforced
//! here: triggers whose prerequisites are missing report a diagnostic and
//! no-op instead of failing.

use crate::civilization::{City, CivilizationSim, Road};
use crate::climate::{self, Biome, ClimateData};
use crate::erosion::{self, ErosionParams, ErosionStats};
use crate::seeds::WorldSeeds;
use crate::terrain::{self, IslandMode, TerrainParams, TerrainType};
use crate::tilemap::Tilemap;

pub struct WorldEngine {
    width: usize,
    height: usize,
    seeds: WorldSeeds,
    island_mode: IslandMode,
    terrain_params: TerrainParams,
    elevation: Tilemap<f32>,
    terrain_types: Tilemap<TerrainType>,
    terrain_generated: bool,
    erosion_passes: u64,
    climate: Option<ClimateData>,
    civilization: Option<CivilizationSim>,
}

impl WorldEngine {
    /// Create an engine for a world of the given size. The world starts as
    /// open ocean until `generate_terrain` runs. Zero dimensions are a
    /// programmer error and fail fast.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "world dimensions must be non-zero");
        Self {
            width,
            height,
            seeds: WorldSeeds::from_master(0),
            island_mode: IslandMode::Single,
            terrain_params: TerrainParams::default(),
            elevation: Tilemap::new_with(width, height, -1.0),
            terrain_types: Tilemap::new_with(width, height, TerrainType::DeepWater),
            terrain_generated: false,
            erosion_passes: 0,
            climate: None,
            civilization: None,
        }
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Generate (or regenerate) the elevation field. Climate and
    /// civilization state is discarded, since it was derived from the
    /// previous terrain.
    pub fn generate_terrain(&mut self, seed: u64, mode: IslandMode) {
        self.seeds = WorldSeeds::from_master(seed);
        self.island_mode = mode;
        self.elevation = terrain::generate_elevation(
            self.width,
            self.height,
            self.seeds.terrain,
            mode,
            &self.terrain_params,
        );
        self.terrain_types = terrain::assign_terrain_types(&self.elevation);
        self.terrain_generated = true;
        self.erosion_passes = 0;
        self.climate = None;
        self.civilization = None;
    }

    /// Run a hydraulic erosion pass over the current terrain and recompute
    /// the terrain classification. Each pass salts the erosion seed so
    /// repeated passes keep carving rather than retracing the same particles.
    pub fn apply_erosion(&mut self, num_particles: usize, params: &ErosionParams) -> Option<ErosionStats> {
        if !self.terrain_generated {
            println!("Cannot erode: generate terrain first");
            return None;
        }

        let seed = self.seeds.erosion.wrapping_add(self.erosion_passes);
        self.erosion_passes += 1;

        let stats = erosion::erode(&mut self.elevation, num_particles, seed, params);
        self.terrain_types = terrain::assign_terrain_types(&self.elevation);
        Some(stats)
    }

    /// Derive temperature, moisture, and biomes from the current terrain.
    pub fn generate_climate(&mut self) -> bool {
        if !self.terrain_generated {
            println!("Cannot generate climate: generate terrain first");
            return false;
        }

        self.climate = Some(climate::generate(&self.elevation));
        true
    }

    /// Place the initial cities and road network. Requires a completed
    /// climate pass. Calling again restarts the civilization from scratch.
    pub fn initialize_civilization(&mut self) -> bool {
        let Some(climate) = self.climate.as_ref() else {
            println!("Cannot initialize civilization: generate climate first");
            return false;
        };

        let mut sim = CivilizationSim::new(self.width, self.height, self.seeds.civilization);
        sim.initialize(&self.elevation, climate);
        self.civilization = Some(sim);
        true
    }

    /// Advance the civilization by one simulated year.
    pub fn advance_year(&mut self) -> bool {
        let (Some(sim), Some(climate)) = (self.civilization.as_mut(), self.climate.as_ref()) else {
            println!("Cannot advance year: initialize civilization first");
            return false;
        };

        sim.simulate(&self.elevation, climate);
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn seeds(&self) -> &WorldSeeds {
        &self.seeds
    }

    pub fn island_mode(&self) -> IslandMode {
        self.island_mode
    }

    /// Elevation at signed coordinates; deep water out of range.
    pub fn elevation(&self, x: i32, y: i32) -> f32 {
        terrain::elevation_at(&self.elevation, x, y)
    }

    /// Terrain class at signed coordinates; deep water out of range.
    pub fn terrain(&self, x: i32, y: i32) -> TerrainType {
        self.terrain_types
            .get_checked(x, y)
            .copied()
            .unwrap_or(TerrainType::DeepWater)
    }

    /// Temperature; 0.0 out of range or before a climate pass.
    pub fn temperature(&self, x: i32, y: i32) -> f32 {
        self.climate.as_ref().map_or(0.0, |c| c.temperature_at(x, y))
    }

    /// Moisture; 0.0 out of range or before a climate pass.
    pub fn moisture(&self, x: i32, y: i32) -> f32 {
        self.climate.as_ref().map_or(0.0, |c| c.moisture_at(x, y))
    }

    /// Biome; ocean out of range or before a climate pass.
    pub fn biome(&self, x: i32, y: i32) -> Biome {
        self.climate.as_ref().map_or(Biome::Ocean, |c| c.biome_at(x, y))
    }

    /// Territory owner (city index); None when unclaimed, out of range, or
    /// before civilization initialization.
    pub fn territory_owner(&self, x: i32, y: i32) -> Option<usize> {
        self.civilization.as_ref().and_then(|c| c.territory_owner(x, y))
    }

    /// Development level; 0.0 when out of range or before initialization.
    pub fn development(&self, x: i32, y: i32) -> f32 {
        self.civilization.as_ref().map_or(0.0, |c| c.development_at(x, y))
    }

    pub fn cities(&self) -> &[City] {
        self.civilization.as_ref().map_or(&[], |c| c.cities())
    }

    pub fn roads(&self) -> &[Road] {
        self.civilization.as_ref().map_or(&[], |c| c.roads())
    }

    pub fn year(&self) -> u32 {
        self.civilization.as_ref().map_or(0, |c| c.year())
    }

    pub fn total_population(&self) -> u64 {
        self.civilization.as_ref().map_or(0, |c| c.total_population())
    }

    // Full-grid access for the export module.

    pub fn elevation_map(&self) -> &Tilemap<f32> {
        &self.elevation
    }

    pub fn terrain_map(&self) -> &Tilemap<TerrainType> {
        &self.terrain_types
    }

    pub fn climate_data(&self) -> Option<&ClimateData> {
        self.climate.as_ref()
    }

    pub fn civilization(&self) -> Option<&CivilizationSim> {
        self.civilization.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_preconditions_are_soft() {
        let mut engine = WorldEngine::new(32, 32);

        assert!(engine.apply_erosion(100, &ErosionParams::default()).is_none());
        assert!(!engine.generate_climate());
        assert!(!engine.initialize_civilization());
        assert!(!engine.advance_year());

        engine.generate_terrain(7, IslandMode::Single);
        assert!(engine.generate_climate());
        assert!(!engine.advance_year()); // Still no civilization
    }

    #[test]
    fn test_terrain_regeneration_resets_downstream_state() {
        let mut engine = WorldEngine::new(50, 50);
        engine.generate_terrain(42, IslandMode::Single);
        engine.generate_climate();
        engine.initialize_civilization();
        assert!(!engine.cities().is_empty());

        engine.generate_terrain(43, IslandMode::Archipelago);
        assert!(engine.cities().is_empty());
        assert_eq!(engine.year(), 0);
        assert_eq!(engine.biome(25, 25), Biome::Ocean); // Climate cleared
        assert!(!engine.advance_year());
    }

    #[test]
    fn test_seed_determinism_across_engines() {
        let mut a = WorldEngine::new(40, 40);
        let mut b = WorldEngine::new(40, 40);
        a.generate_terrain(99, IslandMode::Archipelago);
        b.generate_terrain(99, IslandMode::Archipelago);
        a.apply_erosion(2_000, &ErosionParams::default());
        b.apply_erosion(2_000, &ErosionParams::default());

        for y in 0..40 {
            for x in 0..40 {
                assert_eq!(a.elevation(x, y), b.elevation(x, y));
            }
        }
    }

    #[test]
    fn test_out_of_range_sentinels() {
        let mut engine = WorldEngine::new(16, 16);
        engine.generate_terrain(1, IslandMode::Single);
        engine.generate_climate();

        assert_eq!(engine.elevation(-1, 0), -1.0);
        assert_eq!(engine.terrain(99, 99), TerrainType::DeepWater);
        assert_eq!(engine.temperature(-5, -5), 0.0);
        assert_eq!(engine.moisture(16, 0), 0.0);
        assert_eq!(engine.biome(0, 16), Biome::Ocean);
        assert_eq!(engine.territory_owner(0, 0), None);
        assert_eq!(engine.development(-2, 3), 0.0);
    }

    #[test]
    fn test_end_to_end_seed_42_places_capital() {
        let mut engine = WorldEngine::new(50, 50);
        engine.generate_terrain(42, IslandMode::Single);
        engine.generate_climate();
        assert!(engine.initialize_civilization());

        assert!(!engine.cities().is_empty());
        let capital = &engine.cities()[0];
        assert!(capital.name.starts_with("Capital "));
        assert_eq!(capital.population, 500);
        assert!(engine.total_population() >= 500);
    }

    #[test]
    fn test_erosion_keeps_elevation_in_range() {
        let mut engine = WorldEngine::new(48, 48);
        engine.generate_terrain(3, IslandMode::Single);
        let stats = engine
            .apply_erosion(10_000, &ErosionParams::dramatic())
            .expect("terrain exists");
        assert!(stats.particles_traced > 0);

        for y in 0..48 {
            for x in 0..48 {
                let e = engine.elevation(x, y);
                assert!((-1.0..=1.0).contains(&e));
            }
        }
    }
}
