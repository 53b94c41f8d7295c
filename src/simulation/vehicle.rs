//! Vehicle behavior, state, and lifecycle management.
//!
//! A vehicle owns its kinematic state and two networks: the active driving
//! genome and the read-only baseline it will be mutated against. Sensing
//! casts a fan of rays against the track boundary and feeds the distances to
//! the caller in a stable order.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::brain::{BrainError, NeuralNetwork};
use super::geometry::{Segment, Vec2};
use super::params::Params;
use super::track::{Track, TrackIndex};

/// Heading of a vehicle at rotation zero (screen coordinates, y down).
const FORWARD: Vec2 = Vec2::new(0.0, -1.0);

/// Half the hull width.
const HULL_HALF_WIDTH: f32 = 5.0;
/// Half the hull length along the heading.
const HULL_HALF_LENGTH: f32 = 10.0;

/// A simulated vehicle with a neural network brain.
///
/// Vehicles can:
/// - Advance along their heading at their current speed
/// - Sense the track boundary through a raycast distance fan
/// - Detect collisions between their hull and boundary segments
/// - Spawn a next-generation vehicle with a mutated brain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Position in 2-D space.
    pub position: Vec2,
    /// Heading in radians (0 faces up).
    pub angle: f32,
    /// Forward distance covered per tick.
    pub speed: f32,
    /// Active driving genome.
    pub brain: NeuralNetwork,
    /// Baseline the brain is measured against when reproducing. Owned by
    /// value and read-only once assigned; mutating the active brain never
    /// touches any other vehicle's baseline.
    pub parent_brain: NeuralNetwork,
    /// False once the vehicle has hit the boundary.
    pub alive: bool,
    /// Tick at which this vehicle was created.
    pub born_at_tick: u64,
    /// Tick at which this vehicle crashed, if it has.
    pub died_at_tick: Option<u64>,
    /// Last-known index of the boundary segment nearest to the vehicle.
    /// A search-acceleration hint for the sensing window, nothing more.
    pub nearest_boundary_index: usize,
    /// Oriented hull corners, derived from position and angle. Order:
    /// top-left, top-right, bottom-right, bottom-left.
    pub hull: [Vec2; 4],
}

impl Vehicle {
    /// Creates a vehicle that is its own mutation baseline (a founding
    /// generation member with no ancestor).
    pub fn new(brain: NeuralNetwork, position: Vec2, angle: f32, born_at_tick: u64) -> Self {
        let parent_brain = brain.clone();
        Self::with_parent(brain, parent_brain, position, angle, born_at_tick)
    }

    /// Creates a vehicle with an explicit mutation baseline.
    pub fn with_parent(
        brain: NeuralNetwork,
        parent_brain: NeuralNetwork,
        position: Vec2,
        angle: f32,
        born_at_tick: u64,
    ) -> Self {
        let mut vehicle = Self {
            position,
            angle,
            speed: 0.0,
            brain,
            parent_brain,
            alive: true,
            born_at_tick,
            died_at_tick: None,
            nearest_boundary_index: 0,
            hull: [Vec2::default(); 4],
        };
        vehicle.update_hull();
        vehicle
    }

    /// Moves the vehicle one tick along its heading and rederives the hull.
    pub fn advance(&mut self) {
        self.position = self.position + FORWARD.rotate(self.angle) * self.speed;
        self.update_hull();
    }

    fn update_hull(&mut self) {
        let corner = |x: f32, y: f32| Vec2::new(x, y).rotate(self.angle) + self.position;
        self.hull = [
            corner(-HULL_HALF_WIDTH, -HULL_HALF_LENGTH),
            corner(HULL_HALF_WIDTH, -HULL_HALF_LENGTH),
            corner(HULL_HALF_WIDTH, HULL_HALF_LENGTH),
            corner(-HULL_HALF_WIDTH, HULL_HALF_LENGTH),
        ];
    }

    /// The four hull edges as segments.
    pub fn hull_edges(&self) -> [Segment; 4] {
        let [tl, tr, br, bl] = self.hull;
        [
            Segment::new(tl, tr),
            Segment::new(tr, br),
            Segment::new(br, bl),
            Segment::new(bl, tl),
        ]
    }

    /// Whether any hull edge crosses any of the given boundary segments.
    ///
    /// Callers typically pass a pre-filtered slice such as the sensing
    /// window rather than the full boundary sequence.
    pub fn check_collision(&self, boundaries: &[Segment]) -> bool {
        let edges = self.hull_edges();
        boundaries
            .iter()
            .any(|boundary| edges.iter().any(|edge| edge.intersects(boundary)))
    }

    /// Casts the sensor fan against the track boundary and returns the
    /// distance readings.
    ///
    /// The fan spans a field of view of pi radians, symmetric around the
    /// heading, with `2 * sensors_per_side` evenly spaced rays of length
    /// `sensor_range`. Each ray is tested only against the boundary window
    /// around the segment nearest to the vehicle; the nearest index is
    /// recorded in `nearest_boundary_index`. A ray that hits nothing reads
    /// exactly `sensor_range`. The reading order is stable and must be fed
    /// to the same network in the same order every tick.
    pub fn sense(
        &mut self,
        track: &Track,
        params: &Params,
        index: Option<&TrackIndex>,
    ) -> Array1<f32> {
        let nearest = index
            .and_then(|ix| ix.nearest(self.position))
            .unwrap_or_else(|| track.nearest_segment_index(self.position));
        self.nearest_boundary_index = nearest;
        let window = track.window(nearest);

        let per_side = params.sensors_per_side as f32;
        let mut readings = Array1::from_elem(params.sensors_per_side * 2, params.sensor_range);

        for (ray_index, reading) in readings.iter_mut().enumerate() {
            let ray_angle =
                self.angle + PI * (ray_index as f32 + 0.5 - per_side) / per_side / 2.0;
            let ray = Segment::new(
                self.position,
                self.position + FORWARD.rotate(ray_angle) * params.sensor_range,
            );

            for boundary in window {
                if let Some(hit) = boundary.intersection(&ray) {
                    let distance = self.position.distance(hit);
                    if distance < *reading {
                        *reading = distance;
                    }
                }
            }
        }

        readings
    }

    /// Spawns a next-generation vehicle at the track start.
    ///
    /// The child's brain is this vehicle's brain mutated against its
    /// baseline, and the child's baseline becomes this vehicle's
    /// (pre-mutation) brain, so every generation's drift is measured against
    /// its immediate ancestor. `self` is left untouched.
    pub fn reproduce<R: Rng + ?Sized>(
        &self,
        params: &Params,
        current_tick: u64,
        new_start_angle: f32,
        rng: &mut R,
    ) -> Result<Vehicle, BrainError> {
        let child_brain = self.brain.clone_mutated(&self.parent_brain, rng)?;
        Ok(Vehicle::with_parent(
            child_brain,
            self.brain.clone(),
            params.start_position,
            new_start_angle,
            current_tick,
        ))
    }

    /// Marks the vehicle dead and records the crash tick.
    ///
    /// Idempotent: a vehicle that is already dead keeps its original crash
    /// tick.
    pub fn kill(&mut self, tick: u64) {
        if self.alive {
            self.alive = false;
            self.died_at_tick = Some(tick);
        }
    }
}
