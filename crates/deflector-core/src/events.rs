//! Events emitted by the simulation for frontend feedback.
//!
//! Events ride the per-tick snapshot and fire exactly once each; effects
//! and audio on the rendering side key off them.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Facts established during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A surface target was designated.
    TargetDesignated { lat_deg: f64, lon_deg: f64 },
    /// Orders went out to the interceptor ring.
    OrdersIssued { count: u32 },
    /// An interceptor reached the body.
    InterceptorHit { id: u32, point: DVec3 },
    /// A hit changed the body's course.
    BodyDeflected { id: u32, normal: DVec3 },
    /// The body broke up; the debris field is live.
    BodyShattered { point: DVec3, normal: DVec3 },
    /// The body reached the planet surface.
    SurfaceImpact { point: DVec3, normal: DVec3 },
    /// All debris burned out; the encounter is resolved.
    DebrisSettled,
}
