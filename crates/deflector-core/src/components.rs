//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods beyond constructors.
//! Simulation logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{BodyMode, InterceptorPhase};

/// Marks the incoming body entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asteroid;

/// Marks an interceptor entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interceptor;

/// Position in the planet-centered scene frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// Mutable state of the incoming body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidState {
    pub mode: BodyMode,
    /// Autonomous approach/descent guidance enabled.
    pub guidance_enabled: bool,
    /// Set once, at first valid surface contact.
    pub impacted: bool,
    /// Externally imposed velocity. While set it exclusively drives motion;
    /// the mode rules are ignored.
    pub override_velocity: Option<DVec3>,
    /// Position at the end of the previous tick.
    pub prev_position: DVec3,
    /// (position − prev_position) / DT, refreshed after each motion update.
    pub velocity_estimate: DVec3,
    /// Scene-mapped closest-approach distance.
    pub scene_miss: f64,
    /// Scene units per mission-clock second on the approach track.
    pub approach_speed: f64,
    /// Scene units per second during powered descent.
    pub descent_speed: f64,
}

impl AsteroidState {
    pub fn new(scene_miss: f64, approach_speed: f64, descent_speed: f64, start: DVec3) -> Self {
        Self {
            mode: BodyMode::Approach,
            guidance_enabled: true,
            impacted: false,
            override_velocity: None,
            prev_position: start,
            velocity_estimate: DVec3::ZERO,
            scene_miss,
            approach_speed,
            descent_speed,
        }
    }

    /// Whether the core body still exists as a collidable object.
    pub fn is_live(&self) -> bool {
        !self.impacted && self.mode != BodyMode::Fragmented
    }
}

/// A per-interceptor directive issued by the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Optional intermediate aim point on the way to the body.
    pub waypoint: Option<DVec3>,
    /// Seconds the interceptor must wait before moving.
    pub delay_secs: f64,
}

/// Mutable state of one interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorState {
    pub id: u32,
    /// Ring position held until an order arrives.
    pub start: DVec3,
    /// Unit heading.
    pub heading: DVec3,
    pub phase: InterceptorPhase,
    pub order: Option<Order>,
    /// Seconds accumulated toward the order's launch delay.
    pub staged_secs: f64,
    /// Best range to the body seen so far (stall detection).
    pub best_range: f64,
    /// Seconds since the range last improved.
    pub stall_secs: f64,
}

impl InterceptorState {
    pub fn new(id: u32, start: DVec3) -> Self {
        Self {
            id,
            start,
            heading: DVec3::X,
            phase: InterceptorPhase::Idle,
            order: None,
            staged_secs: 0.0,
            best_range: f64::INFINITY,
            stall_secs: 0.0,
        }
    }
}
