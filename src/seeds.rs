//! Seed management for world generation
//!
//! Provides separate seeds for each simulation stage, derived from a single
//! master seed, so individual stages can be varied or held constant.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for all simulation stages.
#[derive(Clone, Copy, Debug)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Elevation synthesis (noise octaves, island shaping)
    pub terrain: u64,
    /// Hydraulic erosion (particle starts)
    pub erosion: u64,
    /// Climate fields and biome assignment
    pub climate: u64,
    /// Civilization simulation (city names, site search)
    pub civilization: u64,
}

impl WorldSeeds {
    /// Derive all stage seeds deterministically from a master seed.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            terrain: derive_seed(master, "terrain"),
            erosion: derive_seed(master, "erosion"),
            climate: derive_seed(master, "climate"),
            civilization: derive_seed(master, "civilization"),
        }
    }
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, terrain: {}, erosion: {}, climate: {}, civilization: {} }}",
            self.master, self.terrain, self.erosion, self.climate, self.civilization,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let a = WorldSeeds::from_master(42);
        let b = WorldSeeds::from_master(42);
        assert_eq!(a.terrain, b.terrain);
        assert_eq!(a.erosion, b.erosion);
        assert_eq!(a.civilization, b.civilization);
    }

    #[test]
    fn test_stages_get_different_seeds() {
        let seeds = WorldSeeds::from_master(42);
        assert_ne!(seeds.terrain, seeds.erosion);
        assert_ne!(seeds.erosion, seeds.climate);
        assert_ne!(seeds.climate, seeds.civilization);
    }
}
