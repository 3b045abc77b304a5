//! Commands sent from the frontend to the simulation.
//!
//! Player commands are validated and queued for processing at the next tick
//! boundary. Body commands are the imperative interface the orchestrator
//! (and scripted collaborators) use against the incoming body.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::OrderPolicy;
use crate::types::EncounterScenario;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Load an encounter: spawn the interceptor ring and, if the scenario is
    /// valid, the incoming body. An invalid scenario spawns no body.
    StartEncounter { scenario: EncounterScenario },

    /// Designate a surface target by geodetic coordinates.
    SelectTarget { lat_deg: f64, lon_deg: f64 },
    /// Designate a surface target from a Cartesian click point.
    SelectSurfacePoint { point: DVec3 },

    /// Scrub the approach timeline to an absolute mission-clock value.
    SetMissionClock { secs: f64 },
    /// Choose how target orders are distributed across the ring.
    SetOrderPolicy { policy: OrderPolicy },

    /// Set time scale for the external frame loop (clamped to 0–4).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}

/// Imperative commands against the incoming body.
///
/// All variants are no-ops without a live body; `Shatter` is idempotent, so
/// duplicate or late invocations cannot break up the body twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BodyCommand {
    /// Reflect the body's velocity estimate about `normal` and push it
    /// outward; autonomous guidance is disabled as a side effect.
    ApplyDeflection { point: DVec3, normal: DVec3 },
    /// Freeze the core body and hand all visible motion to the debris field.
    Shatter { point: DVec3, normal: DVec3 },
    /// Disable autonomous approach/descent guidance.
    CancelGuidance,
}
