//! Interceptor system — staging, steering, stall recovery, hit reporting.
//!
//! An interceptor with no order performs no motion. Once its launch delay
//! runs out it steers toward its waypoint (while that is still meaningfully
//! far) or toward a lead point ahead of the body, with the heading turned by
//! at most the tuned turn rate per tick. Hits are reported upward; the
//! engine decides what they mean.

use glam::DVec3;
use hecs::World;

use deflector_core::components::{InterceptorState, Position};
use deflector_core::constants::*;
use deflector_core::enums::InterceptorPhase;

use crate::guidance;

/// Read-only view of the pursuit target for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetState {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// An interceptor closed within its hit radius this tick.
#[derive(Debug, Clone, Copy)]
pub struct HitReport {
    pub id: u32,
    /// Target position at the hit instant.
    pub body_position: DVec3,
    /// Interceptor position at the hit instant.
    pub interceptor_position: DVec3,
}

/// Run one guidance tick for every interceptor. A missing target means
/// every interceptor holds its state and performs no motion.
pub fn run(world: &mut World, target: Option<TargetState>, reports: &mut Vec<HitReport>) {
    for (_entity, (pos, state)) in world.query_mut::<(&mut Position, &mut InterceptorState)>() {
        let order = match state.order {
            Some(order) => order,
            None => continue,
        };

        match state.phase {
            InterceptorPhase::Idle | InterceptorPhase::Expended => continue,
            InterceptorPhase::Staged => {
                if state.staged_secs < order.delay_secs {
                    state.staged_secs += DT;
                    if state.staged_secs < order.delay_secs {
                        continue;
                    }
                }
                state.phase = InterceptorPhase::Pursuing;
            }
            InterceptorPhase::Pursuing => {}
        }

        let target = match target {
            Some(target) => target,
            None => continue,
        };

        // Aim selection: the waypoint while it is still meaningfully far,
        // then a lead point ahead of the body.
        let mut aim = None;
        if let Some(waypoint) = order.waypoint {
            if pos.0.distance(waypoint) > WAYPOINT_REACHED_DISTANCE {
                aim = Some(waypoint);
            }
        }
        let aim = aim.unwrap_or_else(|| {
            guidance::lead_point(pos.0, INTERCEPTOR_SPEED, target.position, target.velocity)
        });

        let range = pos.0.distance(target.position);
        let tuning = guidance::range_tuning(range);

        let desired = (aim - pos.0).normalize_or_zero();
        if desired.length_squared() > 0.0 {
            state.heading = guidance::turn_toward(state.heading, desired, tuning.turn_rate * DT);
        }

        pos.0 += state.heading * tuning.speed * DT;

        // Stall recovery: if the range stops improving for too long, force
        // the nose around and shove toward the ideal line, then give the
        // timer partial credit so corrections repeat quickly if needed.
        let range_now = pos.0.distance(target.position);
        if range_now < state.best_range - STALL_IMPROVE_EPSILON {
            state.best_range = range_now;
            state.stall_secs = 0.0;
        } else {
            state.stall_secs += DT;
            if state.stall_secs > STALL_TIMEOUT_SECS {
                let ideal = (target.position - pos.0).normalize_or_zero();
                if ideal.length_squared() > 0.0 {
                    state.heading = state.heading.lerp(ideal, STALL_HEADING_BLEND).try_normalize().unwrap_or(ideal);
                    pos.0 += ideal * STALL_SPEED_KICK * DT;
                }
                state.best_range = range_now;
                state.stall_secs = STALL_RETRY_SECS;
            }
        }

        if range_now <= tuning.hit_radius {
            state.phase = InterceptorPhase::Expended;
            reports.push(HitReport {
                id: state.id,
                body_position: target.position,
                interceptor_position: pos.0,
            });
        }
    }
}
