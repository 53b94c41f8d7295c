use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

/// Simulation parameters that control vehicle populations and sensing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Neural network layer dimensions. The input layer must match the
    /// sensor count (`2 * sensors_per_side`) and the output layer needs at
    /// least two neurons (steering and throttle).
    pub layer_sizes: Vec<usize>,
    /// Number of sensor rays per side of the heading; the fan casts twice
    /// this many rays across a field of view of pi radians.
    pub sensors_per_side: usize,
    /// Maximum sensor ray length. Rays that hit nothing report this value.
    pub sensor_range: f32,
    /// Spawn position on the track.
    pub start_position: Vec2,
    /// Spawn heading in radians (0 faces up).
    pub start_angle: f32,
    /// Number of vehicles per generation.
    pub n_vehicle: usize,
    /// Speed corresponding to full throttle output.
    pub max_speed: f32,
    /// Steering rate in radians per tick at full deflection.
    pub steer_rate: f32,
    /// Tick cap per generation; a generation ends early once every vehicle
    /// has crashed.
    pub generation_ticks: u64,
}
