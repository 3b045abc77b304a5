//! Surface-contact system for the incoming body.
//!
//! Contact only counts while the body is moving toward the surface: the
//! radial component of its velocity estimate must be inward. A deflected
//! body receding through the contact shell is not an impact.

use glam::DVec3;
use hecs::World;

use deflector_core::components::{AsteroidState, Position};
use deflector_core::constants::CONTACT_RADIUS;

/// A confirmed surface contact.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceContact {
    /// Body position clamped onto the contact shell.
    pub point: DVec3,
    /// Outward surface normal at the contact point.
    pub normal: DVec3,
}

/// Check the body against the planet surface. On contact the position is
/// clamped onto the shell, the impacted flag latches, and the contact is
/// returned exactly once.
pub fn run(world: &mut World) -> Option<SurfaceContact> {
    let mut contact = None;

    for (_entity, (pos, state)) in world.query_mut::<(&mut Position, &mut AsteroidState)>() {
        if !state.is_live() {
            continue;
        }
        let radius = pos.0.length();
        if radius > CONTACT_RADIUS {
            continue;
        }
        let radial = pos.0.normalize_or_zero();
        if radial.length_squared() == 0.0 {
            continue;
        }
        if state.velocity_estimate.dot(radial) >= 0.0 {
            continue;
        }

        pos.0 = radial * CONTACT_RADIUS;
        state.impacted = true;
        state.override_velocity = None;
        contact = Some(SurfaceContact {
            point: pos.0,
            normal: radial,
        });
    }

    contact
}
