//! Entity spawn factories for setting up an encounter.

use glam::DVec3;
use hecs::World;

use deflector_body::flight;
use deflector_core::components::{Asteroid, AsteroidState, Interceptor, InterceptorState, Position};
use deflector_core::constants::{INTERCEPTOR_RING_ALTITUDE, PLANET_RADIUS};
use deflector_core::geo;
use deflector_core::types::EncounterScenario;

/// Spawn the incoming body, positioned at the head of its approach track.
///
/// Returns `None` without touching the world when the scenario is unusable
/// (missing or non-numeric orbital data): no body, nothing to render.
pub fn spawn_body(world: &mut World, scenario: &EncounterScenario) -> Option<hecs::Entity> {
    if !scenario.is_valid() {
        return None;
    }
    let scene_miss = geo::scene_miss_distance(scenario.miss_distance_km);
    let approach_speed = flight::approach_speed(scenario.velocity_kps);
    let descent_speed = flight::descent_speed(scenario.velocity_kps);
    let start = flight::approach_position(scene_miss, 0.0, approach_speed);

    Some(world.spawn((
        Asteroid,
        Position(start),
        AsteroidState::new(scene_miss, approach_speed, descent_speed, start),
    )))
}

/// Spawn the interceptor ring. Ids are 1-based, matching display callouts.
pub fn spawn_interceptors(world: &mut World, count: usize) {
    let ring = interceptor_ring(count, PLANET_RADIUS + INTERCEPTOR_RING_ALTITUDE);
    for (i, start) in ring.into_iter().enumerate() {
        world.spawn((
            Interceptor,
            Position(start),
            InterceptorState::new(i as u32 + 1, start),
        ));
    }
}

/// Evenly distributed points on a sphere of `radius` (Fibonacci sphere).
pub fn interceptor_ring(count: usize, radius: f64) -> Vec<DVec3> {
    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..count)
        .map(|i| {
            let y = if count > 1 {
                1.0 - (i as f64 / (count - 1) as f64) * 2.0
            } else {
                0.0
            };
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f64;
            DVec3::new(theta.cos() * r, y, theta.sin() * r) * radius
        })
        .collect()
}
