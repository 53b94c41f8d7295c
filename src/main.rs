//! Headless evolution driver.
//!
//! Builds a ring track, evolves a vehicle population over a fixed number of
//! generations, prints a per-generation summary, and writes a timestamped
//! JSON snapshot of the final world state. An optional first argument
//! overrides the snapshot filename prefix.

use std::error::Error;
use std::f32::consts::TAU;

use autodrome::simulation::geometry::{Segment, Vec2};
use autodrome::simulation::params::Params;
use autodrome::simulation::track::Track;
use autodrome::simulation::world::World;

const GENERATIONS: u32 = 30;

/// Builds a circular corridor between two concentric walls.
///
/// Outer and inner wall pieces are interleaved so that consecutive segment
/// indices stay spatially adjacent along the track, which is what the
/// sensing window requires of the boundary order.
fn ring_track(center: Vec2, inner_radius: f32, outer_radius: f32, resolution: usize) -> Track {
    let point = |radius: f32, angle: f32| center + Vec2::new(angle.cos(), angle.sin()) * radius;

    let mut segments = Vec::with_capacity(resolution * 2);
    for i in 0..resolution {
        let a0 = i as f32 / resolution as f32 * TAU;
        let a1 = (i + 1) as f32 / resolution as f32 * TAU;
        segments.push(Segment::new(point(outer_radius, a0), point(outer_radius, a1)));
        segments.push(Segment::new(point(inner_radius, a0), point(inner_radius, a1)));
    }

    let start = center + Vec2::new((inner_radius + outer_radius) / 2.0, 0.0);
    Track::from_segments(segments, start)
}

fn main() -> Result<(), Box<dyn Error>> {
    let track = ring_track(Vec2::new(0.0, 0.0), 160.0, 240.0, 64);

    let sensors_per_side = 4;
    let params = Params {
        layer_sizes: vec![sensors_per_side * 2, 6, 2],
        sensors_per_side,
        sensor_range: 120.0,
        start_position: track.start_position,
        start_angle: 0.0,
        n_vehicle: 40,
        max_speed: 4.0,
        steer_rate: 0.3,
        generation_ticks: 2_000,
    };

    let mut world = World::new(track, &params);
    let mut rng = rand::rng();

    println!("autodrome - {} vehicles, {} boundary segments", params.n_vehicle, world.track.len());

    for _ in 0..GENERATIONS {
        let summary = world.run_generation(&params, &mut rng)?;
        println!(
            "Gen {:3} | ticks {:5} | survivors {:2}/{:2} | best distance {:7.1}",
            summary.generation, summary.ticks, summary.survivors, params.n_vehicle, summary.best_distance
        );
    }

    let prefix = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "autodrome_snapshot".to_string());
    let path = format!("{}_{}.json", prefix, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    world.save_to_file(&path)?;
    println!("Saved snapshot to {path}");

    Ok(())
}
