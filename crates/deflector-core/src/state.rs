//! Scene snapshot — the complete visible state sent to the frontend each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{BodyMode, InterceptorPhase, RunPhase};
use crate::events::SimEvent;
use crate::types::SimTime;

/// Complete scene state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub time: SimTime,
    pub phase: RunPhase,
    /// The incoming body, absent before an encounter starts, after an
    /// invalid scenario, or once the body has fragmented.
    pub body: Option<BodyView>,
    pub interceptors: Vec<InterceptorView>,
    pub fragments: Vec<FragmentView>,
    /// Current designated target, if any.
    pub target: Option<TargetView>,
    /// Interceptors not yet credited with a hit.
    pub live_interceptors: u32,
    /// Latest advisory text, if any has arrived.
    pub advisory: Option<String>,
    /// Events established this tick.
    pub events: Vec<SimEvent>,
}

/// The incoming body as rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyView {
    pub position: DVec3,
    pub mode: BodyMode,
    pub impacted: bool,
    pub guidance_enabled: bool,
    /// Velocity derived from the previous tick's position (units/s).
    pub velocity_estimate: DVec3,
}

/// One interceptor as rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InterceptorView {
    pub id: u32,
    pub position: DVec3,
    /// Unit heading, for orienting the model.
    pub heading: DVec3,
    pub phase: InterceptorPhase,
}

/// One debris particle as rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FragmentView {
    pub position: DVec3,
    /// Euler rotation accumulated at fixed per-axis rates.
    pub rotation: DVec3,
    pub scale: f64,
}

/// The designated surface target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetView {
    pub lat_deg: f64,
    pub lon_deg: f64,
    /// Cartesian point on the planet surface.
    pub point: DVec3,
}
