//! # Autodrome - Evolutionary Driving Simulation
//!
//! A simulation of vehicles that learn to drive a closed track through a
//! genetic algorithm over small feedforward neural networks. Each vehicle
//! senses the track boundary with a fan of raycast distance sensors, feeds
//! the distances into its network, and steers from the network's output.
//! Generations are bred by cloning the best-performing network and mutating
//! its weights relative to its immediate ancestor.
//!
//! ## Features
//!
//! - Feedforward neural network brains (sigmoid activation, bias-in-row
//!   weight layout)
//! - Momentum-biased weight mutation measured against a parent baseline
//! - Raycast boundary sensing with a track-order windowed search
//! - Oriented rectangular hull collision testing
//! - Parallel per-tick vehicle updates with rayon
//! - Save/load simulation snapshots
//!
//! ## Core Modules
//!
//! - [`simulation::geometry`] - Vector and line-segment primitives
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::vehicle`] - Vehicle state, sensing, and reproduction
//! - [`simulation::track`] - Ordered track boundary and spatial index
//! - [`simulation::world`] - Population stepping and generation turnover

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network implementation for vehicle brains.
    pub mod brain;
    /// 2-D vector and segment geometry used for motion and sensing.
    pub mod geometry;
    /// Simulation parameters.
    pub mod params;
    /// Track boundary data with order-dependent windowed lookup.
    pub mod track;
    /// Vehicle behavior, state, and lifecycle.
    pub mod vehicle;
    /// Population simulation and generation management.
    pub mod world;
}
