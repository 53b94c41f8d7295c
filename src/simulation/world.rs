//! Population simulation and generation management.
//!
//! The world steps every live vehicle in parallel against the read-only
//! track, and turns generations over by breeding the best performer. Each
//! tick a vehicle senses the boundary, thinks, steers, advances, and is
//! collision-tested against its boundary window; vehicles never interact
//! with each other, so the only shared state is the immutable track.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::brain::{BrainError, NeuralNetwork};
use super::params::Params;
use super::track::{Track, TrackIndex};
use super::vehicle::Vehicle;

/// Network outputs consumed by the control mapping (steering, throttle).
const CONTROL_OUTPUTS: usize = 2;

/// Per-generation result summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation that just finished.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Vehicles still alive when the tick cap was reached.
    pub survivors: usize,
    /// Straight-line distance from the start reached by the best vehicle.
    pub best_distance: f32,
}

/// The main simulation state: a track and the current vehicle population.
#[derive(Debug, Serialize, Deserialize)]
pub struct World {
    /// The track being driven.
    pub track: Track,
    /// Current generation's vehicles.
    pub vehicles: Vec<Vehicle>,
    /// Total ticks elapsed across all generations.
    pub tick: u64,
    /// Generation counter.
    pub generation: u32,
    /// Spatial index over the track, rebuilt lazily (not serialized).
    #[serde(skip)]
    index: Option<TrackIndex>,
}

impl World {
    /// Creates a world with a founding population of random-brain vehicles.
    ///
    /// # Panics
    ///
    /// Panics if the network topology in `params` does not line up with the
    /// sensor fan (input layer) or the control mapping (output layer).
    pub fn new(track: Track, params: &Params) -> Self {
        assert_eq!(
            params.layer_sizes.first().copied(),
            Some(params.sensors_per_side * 2),
            "input layer must match the sensor count"
        );
        assert!(
            params.layer_sizes.last().is_some_and(|&n| n >= CONTROL_OUTPUTS),
            "output layer must cover steering and throttle"
        );

        let vehicles = (0..params.n_vehicle)
            .map(|_| {
                Vehicle::new(
                    NeuralNetwork::new(&params.layer_sizes),
                    params.start_position,
                    params.start_angle,
                    0,
                )
            })
            .collect();

        Self {
            track,
            vehicles,
            tick: 0,
            generation: 0,
            index: None,
        }
    }

    /// Advances the simulation by one tick with parallel vehicle updates.
    pub fn step(&mut self, params: &Params) {
        if self.index.is_none() {
            self.index = Some(
                self.track
                    .build_index()
                    .expect("failed to build track index"),
            );
        }

        self.tick += 1;
        let tick = self.tick;
        let track = &self.track;
        let index = self.index.as_ref();

        // parallel phase: vehicles only mutate themselves and read the
        // shared track, which stays immutable for the whole tick
        self.vehicles.par_iter_mut().for_each(|vehicle| {
            if !vehicle.alive {
                return;
            }

            let readings = vehicle.sense(track, params, index);
            vehicle
                .brain
                .set_input(&readings)
                .expect("sensor count must match the input layer");
            vehicle.brain.forward_propagate();

            let (steer_out, throttle_out) = {
                let outputs = vehicle.brain.output();
                (outputs[0], outputs[1])
            };

            // sigmoid outputs sit in (0, 1); recenter steering, scale both
            vehicle.angle += (steer_out - 0.5) * params.steer_rate;
            vehicle.speed = throttle_out * params.max_speed;
            vehicle.advance();

            let window = track.window(vehicle.nearest_boundary_index);
            if vehicle.check_collision(window) {
                vehicle.kill(tick);
            }
        });
    }

    /// Number of vehicles still alive.
    pub fn alive_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.alive).count()
    }

    /// Whether every vehicle has crashed.
    pub fn all_dead(&self) -> bool {
        self.vehicles.iter().all(|v| !v.alive)
    }

    /// The best-performing vehicle of the current generation.
    ///
    /// Fitness is straight-line distance from the start position; longer
    /// survival breaks ties.
    pub fn best_vehicle(&self, params: &Params) -> Option<&Vehicle> {
        self.vehicles.iter().max_by(|a, b| {
            let fa = a.position.distance(params.start_position);
            let fb = b.position.distance(params.start_position);
            fa.total_cmp(&fb)
                .then_with(|| self.lifespan(a).cmp(&self.lifespan(b)))
        })
    }

    fn lifespan(&self, vehicle: &Vehicle) -> u64 {
        vehicle
            .died_at_tick
            .unwrap_or(self.tick)
            .saturating_sub(vehicle.born_at_tick)
    }

    /// Replaces the population with mutated offspring of the best vehicle.
    ///
    /// An empty population is reseeded with fresh random brains instead.
    pub fn next_generation<R: Rng + ?Sized>(
        &mut self,
        params: &Params,
        rng: &mut R,
    ) -> Result<(), BrainError> {
        let next = match self.best_vehicle(params) {
            Some(best) => (0..params.n_vehicle)
                .map(|_| best.reproduce(params, self.tick, params.start_angle, rng))
                .collect::<Result<Vec<_>, _>>()?,
            None => (0..params.n_vehicle)
                .map(|_| {
                    Vehicle::new(
                        NeuralNetwork::new(&params.layer_sizes),
                        params.start_position,
                        params.start_angle,
                        self.tick,
                    )
                })
                .collect(),
        };

        self.vehicles = next;
        self.generation += 1;
        Ok(())
    }

    /// Runs one full generation and breeds the next.
    ///
    /// Steps until every vehicle has crashed or `generation_ticks` elapse,
    /// then turns the population over and reports what happened.
    pub fn run_generation<R: Rng + ?Sized>(
        &mut self,
        params: &Params,
        rng: &mut R,
    ) -> Result<GenerationSummary, BrainError> {
        let start_tick = self.tick;
        while !self.all_dead() && self.tick - start_tick < params.generation_ticks {
            self.step(params);
        }

        let summary = GenerationSummary {
            generation: self.generation,
            ticks: self.tick - start_tick,
            survivors: self.alive_count(),
            best_distance: self
                .best_vehicle(params)
                .map_or(0.0, |v| v.position.distance(params.start_position)),
        };

        self.next_generation(params, rng)?;
        Ok(summary)
    }

    /// Saves the world state to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a world state from a JSON file. The spatial index is rebuilt
    /// on the first step after loading.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let world = serde_json::from_str(&json)?;
        Ok(world)
    }
}
