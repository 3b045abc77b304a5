//! Guidance laws for interceptors.
//!
//! Provides lead-point prediction, turn-rate-limited steering, and the
//! range-band tuning boosts applied close to a maneuvering target.

use glam::DVec3;

use deflector_core::constants::*;

/// Effective guidance parameters after range-band boosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeTuning {
    pub turn_rate: f64,
    pub speed: f64,
    pub hit_radius: f64,
}

/// Aim point ahead of a moving target.
///
/// Closing time is approximated as range over own speed, floored so a
/// point-blank target doesn't collapse the lead to zero. Applying only a
/// fraction of the full lead approximates intercept geometry without full
/// proportional-navigation math and avoids overshooting a turning target.
pub fn lead_point(own_pos: DVec3, own_speed: f64, target_pos: DVec3, target_vel: DVec3) -> DVec3 {
    let range = own_pos.distance(target_pos);
    let closing_secs = (range / (own_speed + DIRECTION_EPSILON)).max(MIN_CLOSING_TIME);
    target_pos + target_vel * (closing_secs * LEAD_FRACTION)
}

/// Turn `heading` toward `desired` by at most `max_angle` radians.
///
/// Constant-rate rotation in the plane of the two directions (slerp), never
/// an instantaneous snap. Always returns a unit vector. Degenerate inputs
/// fall back to whichever direction is usable; exactly opposed directions
/// rotate through a stable perpendicular.
pub fn turn_toward(heading: DVec3, desired: DVec3, max_angle: f64) -> DVec3 {
    let cur = heading.normalize_or_zero();
    let want = desired.normalize_or_zero();
    if want.length_squared() == 0.0 {
        return if cur.length_squared() == 0.0 { DVec3::X } else { cur };
    }
    if cur.length_squared() == 0.0 {
        return want;
    }

    let angle = cur.dot(want).clamp(-1.0, 1.0).acos();
    if angle <= max_angle {
        return want;
    }

    let sin_angle = angle.sin();
    if sin_angle < DIRECTION_EPSILON {
        // Opposed directions: no unique turn plane, pick a stable one.
        let perp = perpendicular(cur);
        return (cur * max_angle.cos() + perp * max_angle.sin()).normalize();
    }

    let step = max_angle.max(0.0);
    ((cur * (angle - step).sin() + want * step.sin()) / sin_angle).normalize()
}

/// Tuning boosts as an interceptor closes on the target: tighter turns,
/// a touch more speed, and a wider hit radius, so it stops orbiting a
/// maneuvering body at the last moment.
pub fn range_tuning(range: f64) -> RangeTuning {
    let base = RangeTuning {
        turn_rate: INTERCEPTOR_TURN_RATE,
        speed: INTERCEPTOR_SPEED,
        hit_radius: INTERCEPTOR_HIT_RADIUS,
    };
    if range < CLOSE_RANGE {
        RangeTuning {
            turn_rate: base.turn_rate * CLOSE_TURN_FACTOR,
            speed: base.speed * CLOSE_SPEED_FACTOR,
            hit_radius: base.hit_radius.max(CLOSE_HIT_RADIUS),
        }
    } else if range < MID_RANGE {
        RangeTuning {
            turn_rate: base.turn_rate * MID_TURN_FACTOR,
            speed: base.speed,
            hit_radius: base.hit_radius.max(MID_HIT_RADIUS),
        }
    } else {
        base
    }
}

/// Any unit vector perpendicular to `v`.
fn perpendicular(v: DVec3) -> DVec3 {
    let candidate = if v.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    v.cross(candidate).normalize()
}
