//! Particle-based hydraulic erosion.
//!
//! Each particle starts at a random land position and rolls downhill for a
//! bounded number of steps, picking up sediment on steep descents and
//! dropping it when climbing or over capacity. There is no explicit flow
//! graph: enough independent stochastic traces approximate global hydraulic
//! redistribution and leave drainage-consistent valleys behind.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::erosion::params::ErosionParams;
use crate::erosion::utils::height_and_gradient;
use crate::erosion::ErosionStats;
use crate::terrain::{modify_elevation, SHALLOW_WATER_LEVEL};
use crate::tilemap::Tilemap;

/// A single erosion particle
struct Particle {
    x: f32,
    y: f32,
    dir_x: f32,
    dir_y: f32,
    velocity: f32,
    water: f32,
    sediment: f32,
}

impl Particle {
    fn new(x: f32, y: f32, params: &ErosionParams) -> Self {
        Self {
            x,
            y,
            dir_x: 0.0,
            dir_y: 0.0,
            velocity: params.initial_velocity,
            water: params.initial_water,
            sediment: 0.0,
        }
    }
}

/// Water volume below which a particle is considered evaporated
const MIN_WATER: f32 = 0.001;

/// Run the erosion pass: trace `num_particles` particles over the elevation
/// field, mutating it in place. Particles whose start cell is already below
/// the shallow-water level are skipped. The trace order is fixed by the seed,
/// so a given (field, particle count, seed, params) tuple always produces the
/// same result.
pub fn erode(
    elevation: &mut Tilemap<f32>,
    num_particles: usize,
    seed: u64,
    params: &ErosionParams,
) -> ErosionStats {
    let width = elevation.width;
    let height = elevation.height;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stats = ErosionStats::default();

    for _ in 0..num_particles {
        let start_x = rng.gen::<f32>() * (width - 1) as f32;
        let start_y = rng.gen::<f32>() * (height - 1) as f32;

        // Rain that lands on water does nothing.
        if *elevation.get(start_x as usize, start_y as usize) < SHALLOW_WATER_LEVEL {
            continue;
        }

        stats.particles_traced += 1;
        let mut particle = Particle::new(start_x, start_y, params);
        trace_particle(elevation, &mut particle, params, &mut stats);
    }

    stats
}

/// Advance one particle until it dies, leaves the grid, or runs out of steps.
fn trace_particle(
    elevation: &mut Tilemap<f32>,
    particle: &mut Particle,
    params: &ErosionParams,
    stats: &mut ErosionStats,
) {
    let width = elevation.width;
    let height = elevation.height;

    for _ in 0..params.max_lifetime {
        let node_x = particle.x as i32;
        let node_y = particle.y as i32;

        // The bilinear stencil needs the cell to the right and below.
        if node_x < 0 || node_x >= width as i32 - 1 || node_y < 0 || node_y >= height as i32 - 1 {
            break;
        }

        let (old_height, grad_x, grad_y) = height_and_gradient(elevation, particle.x, particle.y);

        // Blend direction with the downhill gradient, then normalize.
        particle.dir_x = particle.dir_x * params.inertia - grad_x * (1.0 - params.inertia);
        particle.dir_y = particle.dir_y * params.inertia - grad_y * (1.0 - params.inertia);

        let len = (particle.dir_x * particle.dir_x + particle.dir_y * particle.dir_y).sqrt();
        if len != 0.0 {
            particle.dir_x /= len;
            particle.dir_y /= len;
        }

        let old_x = particle.x;
        let old_y = particle.y;
        particle.x += particle.dir_x;
        particle.y += particle.dir_y;

        let stalled = particle.dir_x == 0.0 && particle.dir_y == 0.0;
        if stalled
            || particle.x < 0.0
            || particle.x >= (width - 1) as f32
            || particle.y < 0.0
            || particle.y >= (height - 1) as f32
        {
            break;
        }

        let (new_height, _, _) = height_and_gradient(elevation, particle.x, particle.y);
        let delta_height = new_height - old_height;

        let slope = (-delta_height).max(params.min_slope);
        let capacity = slope * particle.velocity * particle.water * params.capacity_factor;

        if particle.sediment > capacity || delta_height > 0.0 {
            // Climbing fills the gap it just ascended; otherwise drop a
            // fraction of the excess load.
            let amount = if delta_height > 0.0 {
                delta_height.min(particle.sediment)
            } else {
                (particle.sediment - capacity) * params.deposit_rate
            };
            particle.sediment -= amount;

            deposit_bilinear(elevation, node_x, node_y, old_x, old_y, amount);
            stats.total_deposited += amount as f64;
        } else {
            // Erode a 3x3 neighborhood, never digging deeper than the height
            // difference just descended.
            let amount = ((capacity - particle.sediment) * params.erosion_rate).min(-delta_height);
            let picked_up = erode_brush(elevation, node_x, node_y, amount);
            particle.sediment += picked_up;
            stats.total_eroded += picked_up as f64;
        }

        particle.velocity =
            (particle.velocity * particle.velocity + delta_height * params.gravity).max(0.0).sqrt();
        particle.water *= 1.0 - params.evaporation;

        if particle.water < MIN_WATER {
            break;
        }
    }
}

/// Distribute a deposit over the four cells surrounding the particle's prior
/// position, weighted bilinearly by its offset within the cell.
fn deposit_bilinear(
    elevation: &mut Tilemap<f32>,
    node_x: i32,
    node_y: i32,
    old_x: f32,
    old_y: f32,
    amount: f32,
) {
    let off_x = old_x - node_x as f32;
    let off_y = old_y - node_y as f32;

    modify_elevation(elevation, node_x, node_y, amount * (1.0 - off_x) * (1.0 - off_y));
    modify_elevation(elevation, node_x + 1, node_y, amount * off_x * (1.0 - off_y));
    modify_elevation(elevation, node_x, node_y + 1, amount * (1.0 - off_x) * off_y);
    modify_elevation(elevation, node_x + 1, node_y + 1, amount * off_x * off_y);
}

/// Remove material from a 3x3 neighborhood weighted by inverse distance from
/// the center. Returns the sediment picked up.
fn erode_brush(elevation: &mut Tilemap<f32>, node_x: i32, node_y: i32, amount: f32) -> f32 {
    let mut picked_up = 0.0;

    for brush_y in -1..=1 {
        for brush_x in -1..=1 {
            let ex = node_x + brush_x;
            let ey = node_y + brush_y;
            if !elevation.in_bounds(ex, ey) {
                continue;
            }

            let distance = ((brush_x * brush_x + brush_y * brush_y) as f32).sqrt();
            let weight = (1.0 - distance).max(0.0);
            let weighted = amount * weight * 0.25;

            modify_elevation(elevation, ex, ey, -weighted);
            picked_up += weighted;
        }
    }

    picked_up
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{generate_elevation, IslandMode, TerrainParams};

    fn test_field() -> Tilemap<f32> {
        generate_elevation(64, 64, 9, IslandMode::Single, &TerrainParams::default())
    }

    #[test]
    fn test_erosion_is_deterministic() {
        let params = ErosionParams::default();
        let mut a = test_field();
        let mut b = test_field();

        erode(&mut a, 5_000, 123, &params);
        erode(&mut b, 5_000, 123, &params);

        for (x, y, &e) in a.iter() {
            assert_eq!(e, *b.get(x, y));
        }
    }

    #[test]
    fn test_erosion_modifies_land() {
        let params = ErosionParams::default();
        let original = test_field();
        let mut eroded = original.clone();

        let stats = erode(&mut eroded, 5_000, 123, &params);

        assert!(stats.particles_traced > 0);
        assert!(stats.total_eroded > 0.0);
        let changed = original
            .iter()
            .filter(|&(x, y, &e)| e != *eroded.get(x, y))
            .count();
        assert!(changed > 0);
    }

    #[test]
    fn test_elevation_stays_in_range_after_erosion() {
        let params = ErosionParams::dramatic();
        let mut field = test_field();
        erode(&mut field, 20_000, 7, &params);
        for (_, _, &e) in field.iter() {
            assert!((-1.0..=1.0).contains(&e));
        }
    }

    #[test]
    fn test_all_water_field_is_untouched() {
        let params = ErosionParams::default();
        let mut field = Tilemap::new_with(32, 32, -0.8f32);
        let stats = erode(&mut field, 1_000, 1, &params);

        assert_eq!(stats.particles_traced, 0);
        for (_, _, &e) in field.iter() {
            assert_eq!(e, -0.8);
        }
    }
}
