//! Motion rules for the incoming body's two powered modes.
//!
//! Approach: a straight flyby track parametrized by the mission clock, offset
//! sideways by the scene-mapped miss distance. Descent: a straight line from
//! wherever the body was when a target was designated down to that target.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use deflector_core::constants::{
    APPROACH_SPEED_PER_KPS, APPROACH_START_Z, DESCENT_MIN_SPEED, DESCENT_SPEED_PER_KPS,
    DIRECTION_EPSILON,
};

/// Scene units per mission-clock second for a given input velocity.
pub fn approach_speed(velocity_kps: f64) -> f64 {
    velocity_kps * APPROACH_SPEED_PER_KPS
}

/// Powered-descent speed, floored so slow bodies still arrive.
pub fn descent_speed(velocity_kps: f64) -> f64 {
    (velocity_kps * DESCENT_SPEED_PER_KPS).max(DESCENT_MIN_SPEED)
}

/// Position on the approach track at a given mission-clock value.
///
/// The track runs parallel to +Z and starts well behind the planet; the
/// lateral offset is the scene-mapped miss distance, so large real-world
/// misses stay visibly clear of the surface.
pub fn approach_position(scene_miss: f64, clock_secs: f64, speed: f64) -> DVec3 {
    DVec3::new(scene_miss, 0.0, APPROACH_START_Z + clock_secs * speed)
}

/// Velocity implied by consecutive tick positions.
pub fn implied_velocity(position: DVec3, prev_position: DVec3, dt: f64) -> DVec3 {
    if dt <= 0.0 {
        return DVec3::ZERO;
    }
    (position - prev_position) / dt
}

/// Straight-line powered descent from a fixed start to a surface target.
///
/// Attached to the body entity when a target is designated; replaced
/// wholesale if the target changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescentPath {
    start: DVec3,
    direction: DVec3,
    total_distance: f64,
    traveled: f64,
    speed: f64,
}

impl DescentPath {
    /// Build a path. `None` if start and target coincide — the body is
    /// already there and there is no direction to travel.
    pub fn new(start: DVec3, target: DVec3, speed: f64) -> Option<Self> {
        let offset = target - start;
        let total = offset.length();
        if total < DIRECTION_EPSILON {
            return None;
        }
        Some(Self {
            start,
            direction: offset / total,
            total_distance: total,
            traveled: 0.0,
            speed,
        })
    }

    /// Advance along the path and return the new position. Arc length clamps
    /// at the path end, so ticking past completion is a fixed point.
    pub fn advance(&mut self, dt: f64) -> DVec3 {
        self.traveled = (self.traveled + self.speed * dt).min(self.total_distance);
        self.position()
    }

    /// Current position along the path.
    pub fn position(&self) -> DVec3 {
        self.start + self.direction * self.traveled
    }

    pub fn is_complete(&self) -> bool {
        self.traveled >= self.total_distance
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}
