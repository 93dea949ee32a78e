//! Erosion simulation parameters

/// Parameters for the particle-based hydraulic erosion pass
#[derive(Clone, Debug, PartialEq)]
pub struct ErosionParams {
    /// Number of particles to trace when the caller does not override it
    pub num_particles: usize,

    /// Momentum conservation factor (0.0-1.0); higher values keep particles
    /// moving in their current direction instead of following the gradient
    pub inertia: f32,

    /// Sediment carrying capacity multiplier
    pub capacity_factor: f32,

    /// Fraction of excess sediment dropped per deposition step (0.0-1.0)
    pub deposit_rate: f32,

    /// Fraction of the capacity deficit removed from terrain per step (0.0-1.0)
    pub erosion_rate: f32,

    /// Water lost per step (0.0-1.0); higher values shorten particle lifetimes
    pub evaporation: f32,

    /// Gravity factor in the velocity update
    pub gravity: f32,

    /// Slope floor used in the capacity model so flat terrain still transports
    pub min_slope: f32,

    /// Maximum steps per particle
    pub max_lifetime: usize,

    /// Initial water volume per particle
    pub initial_water: f32,

    /// Initial particle velocity
    pub initial_velocity: f32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            num_particles: 100_000,
            inertia: 0.05,
            capacity_factor: 4.0,
            deposit_rate: 0.3,
            erosion_rate: 0.3,
            evaporation: 0.01,
            gravity: 4.0,
            min_slope: 0.01,
            max_lifetime: 30,
            initial_water: 1.0,
            initial_velocity: 1.0,
        }
    }
}

impl ErosionParams {
    /// Stronger carving: deeper valleys from longer-lived, hungrier particles
    pub fn dramatic() -> Self {
        Self {
            erosion_rate: 0.5,
            capacity_factor: 8.0,
            max_lifetime: 50,
            ..Default::default()
        }
    }
}
