//! Geodetic frame utilities shared with the rendering side.
//!
//! The forward mapping puts the north pole on +Y and (lat 0°, lon −180°) on
//! +X. `surface_point` and `geodetic_at` are exact mutual inverses; any
//! component translating a surface click into a target must round-trip
//! through these two and nothing else.

use glam::DVec3;

use crate::constants::{MISS_LOG_SPAN, SCENE_MISS_MAX, SCENE_MISS_MIN};
use crate::types::GeoPoint;

/// Convert geodetic coordinates to a Cartesian point on a sphere of `radius`.
pub fn surface_point(geo: GeoPoint, radius: f64) -> DVec3 {
    let phi = (90.0 - geo.lat_deg).to_radians();
    let theta = (geo.lon_deg + 180.0).to_radians();
    DVec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Invert [`surface_point`]: geodetic coordinates under an arbitrary
/// non-zero point. The point need not lie on the surface; only its
/// direction matters.
pub fn geodetic_at(point: DVec3) -> GeoPoint {
    let r = point.length().max(f64::MIN_POSITIVE);
    let lat_deg = 90.0 - (point.y / r).clamp(-1.0, 1.0).acos().to_degrees();
    let mut lon_deg = point.z.atan2(point.x).to_degrees() - 180.0;
    if lon_deg < -180.0 {
        lon_deg += 360.0;
    }
    if lon_deg >= 180.0 {
        lon_deg -= 360.0;
    }
    GeoPoint { lat_deg, lon_deg }
}

/// Map a real-world miss distance (km) into the bounded scene range.
///
/// Logarithmic: eight decades of miss distance compress into
/// [`SCENE_MISS_MIN`, `SCENE_MISS_MAX`]. Monotone, clamped at both ends.
pub fn scene_miss_distance(miss_km: f64) -> f64 {
    let t = (miss_km.max(1.0).log10() / MISS_LOG_SPAN).clamp(0.0, 1.0);
    lerp(SCENE_MISS_MIN, SCENE_MISS_MAX, t)
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
