//! Motion system for the incoming body.
//!
//! Priority each tick: an externally imposed override velocity drives the
//! position exclusively (this is how a deflection takes effect); otherwise
//! the current mode's autonomous rule applies. The previous-tick position is
//! recorded here and nowhere else, so the implied-velocity derivation stays
//! deterministic.

use glam::DVec3;
use hecs::World;

use deflector_body::flight::{self, DescentPath};
use deflector_core::components::{AsteroidState, Position};
use deflector_core::constants::{APPROACH_CLOCK_RATE, DT};
use deflector_core::enums::BodyMode;

/// Advance the body by one tick. The mission clock ticks forward only while
/// the approach rule is actually driving the body.
pub fn run(world: &mut World, mission_clock: &mut f64) {
    for (_entity, (pos, state, descent)) in
        world.query_mut::<(&mut Position, &mut AsteroidState, Option<&mut DescentPath>)>()
    {
        if state.mode == BodyMode::Fragmented {
            state.prev_position = pos.0;
            state.velocity_estimate = DVec3::ZERO;
            continue;
        }

        let prev = pos.0;

        if let Some(vel) = state.override_velocity {
            state.guidance_enabled = false;
            pos.0 += vel * DT;
        } else if state.guidance_enabled {
            match state.mode {
                BodyMode::Approach => {
                    if !state.impacted {
                        *mission_clock += DT * APPROACH_CLOCK_RATE;
                    }
                    pos.0 = flight::approach_position(
                        state.scene_miss,
                        *mission_clock,
                        state.approach_speed,
                    );
                }
                BodyMode::Descent => {
                    if let Some(path) = descent {
                        pos.0 = path.advance(DT);
                    }
                }
                BodyMode::Fragmented => {}
            }
        }

        state.prev_position = prev;
        state.velocity_estimate = flight::implied_velocity(pos.0, prev, DT);
    }
}
