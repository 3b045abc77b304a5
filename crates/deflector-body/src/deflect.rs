//! Deflection physics: elastic reflection plus an outward impulse.

use glam::DVec3;

/// Compute the body's new velocity after an interceptor hit.
///
/// Reflects `velocity` about the hit `normal` and adds an impulse of `push`
/// along it, then clamps the radial component relative to the planet center
/// to non-inward: if the reflection alone would still carry the body inward,
/// the radial part is flipped outward while tangential motion is preserved.
/// A single hit therefore never leaves the body on a collision course.
pub fn deflect(position: DVec3, velocity: DVec3, normal: DVec3, push: f64) -> DVec3 {
    let n = normal.normalize_or_zero();
    let mut out = velocity - 2.0 * velocity.dot(n) * n + n * push;

    let radial = position.normalize_or_zero();
    if radial.length_squared() > 0.0 {
        let v_radial = out.dot(radial);
        if v_radial < 0.0 {
            let tangential = out - radial * v_radial;
            out = tangential + radial * v_radial.abs();
        }
    }
    out
}
