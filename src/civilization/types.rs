//! Core entity types for the civilization simulation.
//!
//! Cities and roads live in dense append-only lists and refer to each other
//! by index, never by pointer, so there are no ownership cycles to manage.

use serde::{Deserialize, Serialize};

/// Owner of a territory cell: an index into the city list, or NONE.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityId(pub u32);

impl CityId {
    pub const NONE: CityId = CityId(u32::MAX);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A settlement. Created at initial placement or a periodic founding; never
/// removed. Population and growth rate change every simulated year.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City {
    pub x: usize,
    pub y: usize,
    pub name: String,
    pub population: u32,
    pub founding_year: u32,
    pub resources: f32,
    pub growth_rate: f32,
    /// Indices of cities this one has a road to
    pub connected: Vec<usize>,
}

impl City {
    pub fn new(x: usize, y: usize, name: String, founding_year: u32) -> Self {
        Self {
            x,
            y,
            name,
            population: 100,
            founding_year,
            resources: 50.0,
            growth_rate: 1.02,
            connected: Vec::new(),
        }
    }
}

/// A road between two cities: the full cell path plus the endpoint indices.
/// Immutable once recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Road {
    pub city_a: usize,
    pub city_b: usize,
    pub path: Vec<(usize, usize)>,
}
