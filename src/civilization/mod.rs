//! Civilization simulation: city placement, road networks, and the yearly
//! growth/territory/development loop.
//!
//! The simulation owns all settlement state. It reads the elevation field and
//! climate data but never mutates them.

pub mod growth;
pub mod movement;
pub mod naming;
pub mod pathfinding;
pub mod sites;
pub mod types;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::climate::ClimateData;
use crate::tilemap::Tilemap;

pub use types::{City, CityId, Road};

/// Cities placed during initialization
const INITIAL_CITY_COUNT: usize = 5;

/// Minimum spacing between initially placed cities
const INITIAL_MIN_DISTANCE: f32 = 20.0;

/// Sub-grid step when scanning initial sites
const INITIAL_SCAN_STEP: usize = 2;

/// Hard cap on the number of cities
const MAX_CITIES: usize = 20;

/// A founding attempt happens every this many years
const FOUNDING_INTERVAL: u32 = 50;

/// Minimum spacing for newly founded cities
const FOUNDING_MIN_DISTANCE: f32 = 15.0;

/// Suitability a site must exceed to justify a new city
const FOUNDING_MIN_SUITABILITY: f32 = 20.0;

/// Sub-grid step when scanning for a founding site
const FOUNDING_SCAN_STEP: usize = 5;

/// Each city connects to at most this many nearest neighbors
const MAX_CONNECTIONS: usize = 3;

/// The civilization stage state: entities, derived grids, and the year
/// counter. Cities and roads are append-only; territory is first-claim-wins.
pub struct CivilizationSim {
    width: usize,
    height: usize,
    year: u32,
    cities: Vec<City>,
    roads: Vec<Road>,
    territory: Tilemap<CityId>,
    development: Tilemap<f32>,
    movement_cost: Tilemap<f32>,
    rng: ChaCha8Rng,
}

impl CivilizationSim {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            year: 0,
            cities: Vec::new(),
            roads: Vec::new(),
            territory: Tilemap::new_with(width, height, CityId::NONE),
            development: Tilemap::new_with(width, height, 0.0),
            movement_cost: Tilemap::new_with(width, height, 1.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derive the movement cost grid, place the initial cities, and connect
    /// them with roads.
    pub fn initialize(&mut self, elevation: &Tilemap<f32>, climate: &ClimateData) {
        self.movement_cost = movement::calculate_movement_costs(elevation, climate);
        self.place_initial_cities(elevation, climate);
        self.connect_cities();
    }

    /// Advance the simulation by one year. Growth, territory expansion,
    /// development, and the periodic founding check run in that order.
    pub fn simulate(&mut self, elevation: &Tilemap<f32>, climate: &ClimateData) {
        self.year += 1;

        for city in self.cities.iter_mut() {
            growth::grow_city(city, climate);
        }

        for index in 0..self.cities.len() {
            growth::expand_territory(
                &mut self.territory,
                elevation,
                &self.cities[index],
                CityId(index as u32),
            );
        }

        growth::update_development(&mut self.development, &self.cities, &self.roads);

        if self.year % FOUNDING_INTERVAL == 0 && self.cities.len() < MAX_CITIES {
            self.try_found_city(elevation, climate);
        }
    }

    fn place_initial_cities(&mut self, elevation: &Tilemap<f32>, climate: &ClimateData) {
        let candidates = sites::scan_candidate_sites(elevation, climate, INITIAL_SCAN_STEP);

        for (_, x, y) in candidates {
            if !sites::can_place_city(&self.cities, x, y, INITIAL_MIN_DISTANCE) {
                continue;
            }

            let mut city = City::new(x, y, naming::generate_city_name(&mut self.rng), self.year);

            // The first settlement is the capital and starts ahead.
            if self.cities.is_empty() {
                city.population = 500;
                city.resources = 200.0;
                city.name = format!("Capital {}", city.name);
            }

            self.cities.push(city);
            let id = CityId(self.cities.len() as u32 - 1);
            growth::expand_territory(&mut self.territory, elevation, &self.cities[id.index()], id);

            if self.cities.len() >= INITIAL_CITY_COUNT {
                break;
            }
        }
    }

    /// Connect every city to its nearest few neighbors with A* roads. Pairs
    /// with no land route simply stay unconnected.
    fn connect_cities(&mut self) {
        for i in 0..self.cities.len() {
            let mut distances: Vec<(f32, usize)> = (0..self.cities.len())
                .filter(|&j| j != i)
                .map(|j| {
                    let dx = self.cities[i].x as f32 - self.cities[j].x as f32;
                    let dy = self.cities[i].y as f32 - self.cities[j].y as f32;
                    ((dx * dx + dy * dy).sqrt(), j)
                })
                .collect();
            distances.sort_by(|a, b| a.0.total_cmp(&b.0));

            for &(_, j) in distances.iter().take(MAX_CONNECTIONS) {
                if self.cities[i].connected.contains(&j) {
                    continue;
                }

                let path = pathfinding::find_path(
                    &self.movement_cost,
                    (self.cities[i].x, self.cities[i].y),
                    (self.cities[j].x, self.cities[j].y),
                );

                if !path.is_empty() {
                    self.roads.push(Road { city_a: i, city_b: j, path });
                    self.cities[i].connected.push(j);
                    self.cities[j].connected.push(i);
                }
            }
        }
    }

    /// Found a city at the best unclaimed site, if one clears the suitability
    /// bar, then rebuild the whole road network from scratch.
    fn try_found_city(&mut self, elevation: &Tilemap<f32>, climate: &ClimateData) {
        let candidates = sites::scan_candidate_sites(elevation, climate, FOUNDING_SCAN_STEP);

        let best = candidates.into_iter().find(|&(_, x, y)| {
            self.territory.get(x, y).is_none()
                && sites::can_place_city(&self.cities, x, y, FOUNDING_MIN_DISTANCE)
        });

        if let Some((suitability, x, y)) = best {
            if suitability > FOUNDING_MIN_SUITABILITY {
                let city = City::new(x, y, naming::generate_city_name(&mut self.rng), self.year);
                self.cities.push(city);
                let id = CityId(self.cities.len() as u32 - 1);
                growth::expand_territory(
                    &mut self.territory,
                    elevation,
                    &self.cities[id.index()],
                    id,
                );
                self.rebuild_roads();
            }
        }
    }

    /// Full road network recompute: drop every road and connection, then
    /// reconnect all cities.
    fn rebuild_roads(&mut self) {
        self.roads.clear();
        for city in self.cities.iter_mut() {
            city.connected.clear();
        }
        self.connect_cities();
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn total_population(&self) -> u64 {
        self.cities.iter().map(|c| c.population as u64).sum()
    }

    /// Territory owner with signed coordinates; None when unclaimed or out of
    /// range.
    pub fn territory_owner(&self, x: i32, y: i32) -> Option<usize> {
        self.territory
            .get_checked(x, y)
            .and_then(|id| if id.is_none() { None } else { Some(id.index()) })
    }

    /// Development with signed coordinates; 0.0 out of range.
    pub fn development_at(&self, x: i32, y: i32) -> f32 {
        self.development.get_checked(x, y).copied().unwrap_or(0.0)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate;
    use crate::terrain::{generate_elevation, IslandMode, TerrainParams};

    fn island_world(seed: u64) -> (Tilemap<f32>, ClimateData) {
        let elevation =
            generate_elevation(50, 50, seed, IslandMode::Single, &TerrainParams::default());
        let climate = climate::generate(&elevation);
        (elevation, climate)
    }

    #[test]
    fn test_initialization_places_capital() {
        let (elevation, climate) = island_world(42);
        let mut sim = CivilizationSim::new(50, 50, 42);
        sim.initialize(&elevation, &climate);

        assert!(!sim.cities().is_empty());
        let capital = &sim.cities()[0];
        assert!(capital.name.starts_with("Capital "));
        assert_eq!(capital.population, 500);
        assert_eq!(capital.resources, 200.0);

        // The capital claims its surroundings immediately.
        assert_eq!(
            sim.territory_owner(capital.x as i32, capital.y as i32),
            Some(0)
        );
    }

    #[test]
    fn test_roads_link_known_cities() {
        let (elevation, climate) = island_world(42);
        let mut sim = CivilizationSim::new(50, 50, 42);
        sim.initialize(&elevation, &climate);

        for road in sim.roads() {
            assert!(road.city_a < sim.cities().len());
            assert!(road.city_b < sim.cities().len());
            assert!(!road.path.is_empty());

            let a = &sim.cities()[road.city_a];
            let b = &sim.cities()[road.city_b];
            assert_eq!(road.path.first(), Some(&(a.x, a.y)));
            assert_eq!(road.path.last(), Some(&(b.x, b.y)));
            assert!(a.connected.contains(&road.city_b));
            assert!(b.connected.contains(&road.city_a));
        }
    }

    #[test]
    fn test_territory_claims_are_stable_over_years() {
        let (elevation, climate) = island_world(42);
        let mut sim = CivilizationSim::new(50, 50, 42);
        sim.initialize(&elevation, &climate);

        let snapshot: Vec<(i32, i32, usize)> = (0..50)
            .flat_map(|y| (0..50).map(move |x| (x, y)))
            .filter_map(|(x, y)| sim.territory_owner(x, y).map(|o| (x, y, o)))
            .collect();
        assert!(!snapshot.is_empty());

        for _ in 0..60 {
            sim.simulate(&elevation, &climate);
        }

        for (x, y, owner) in snapshot {
            assert_eq!(sim.territory_owner(x, y), Some(owner));
        }
    }

    #[test]
    fn test_years_advance_and_grassland_cities_grow() {
        // Uniform grassland beside a lake: every city sits on a favorable
        // biome, so population growth is monotonic.
        let mut elevation = Tilemap::new_with(50, 50, 0.1f32);
        for y in 23..27 {
            for x in 23..27 {
                elevation.set(x, y, -0.5);
            }
        }
        let mut climate = climate::generate(&elevation);
        for (_, _, cell) in climate.biomes.iter_mut() {
            if *cell != climate::Biome::Ocean && *cell != climate::Biome::Beach {
                *cell = climate::Biome::TemperateGrassland;
            }
        }

        let mut sim = CivilizationSim::new(50, 50, 42);
        sim.initialize(&elevation, &climate);
        assert!(!sim.cities().is_empty());

        let before = sim.total_population();
        for _ in 0..10 {
            sim.simulate(&elevation, &climate);
        }

        assert_eq!(sim.year(), 10);
        assert!(sim.total_population() > before);
    }

    #[test]
    fn test_development_stays_in_unit_range() {
        let (elevation, climate) = island_world(42);
        let mut sim = CivilizationSim::new(50, 50, 42);
        sim.initialize(&elevation, &climate);

        for _ in 0..120 {
            sim.simulate(&elevation, &climate);
        }

        for y in 0..50 {
            for x in 0..50 {
                let d = sim.development_at(x, y);
                assert!((0.0..=1.0).contains(&d));
            }
        }
    }

    #[test]
    fn test_periodic_founding_adds_city() {
        // Rocky highlands with one habitable strip and two ponds. The strip
        // supports exactly one initial city (everything else is within the
        // initial spacing limit), leaving the far pond as a suitable
        // unclaimed site for the year-50 founding check.
        let mut elevation = Tilemap::new_with(50, 50, 0.6f32);
        for y in 11..16 {
            for x in 10..32 {
                elevation.set(x, y, 0.1);
            }
        }
        elevation.set(13, 13, -0.5);
        elevation.set(29, 13, -0.5);
        let climate = climate::generate(&elevation);

        let mut sim = CivilizationSim::new(50, 50, 7);
        sim.initialize(&elevation, &climate);
        assert_eq!(sim.cities().len(), 1);

        for _ in 0..49 {
            sim.simulate(&elevation, &climate);
        }
        assert_eq!(sim.cities().len(), 1);

        sim.simulate(&elevation, &climate);
        assert_eq!(sim.cities().len(), 2);

        // The founding rebuilt the road network; both cities sit on passable
        // land, so they end up connected.
        assert!(!sim.roads().is_empty());
        assert!(sim.cities()[0].connected.contains(&1));
    }

    #[test]
    fn test_cities_are_never_removed() {
        let (elevation, climate) = island_world(42);
        let mut sim = CivilizationSim::new(50, 50, 42);
        sim.initialize(&elevation, &climate);

        let mut count = sim.cities().len();
        for _ in 0..150 {
            sim.simulate(&elevation, &climate);
            assert!(sim.cities().len() >= count);
            count = sim.cities().len();
        }
    }
}
