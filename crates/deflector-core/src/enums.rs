//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Motion mode of the incoming body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyMode {
    /// Flyby track parametrized by the mission clock.
    #[default]
    Approach,
    /// Straight-line powered descent toward a designated surface point.
    Descent,
    /// Terminal: the core body is inert and hidden, only debris remains.
    Fragmented,
}

/// Interceptor lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterceptorPhase {
    /// No order; holds station and performs no motion.
    #[default]
    Idle,
    /// Order received, waiting out its launch delay.
    Staged,
    /// Launch delay elapsed; steering toward the aim point.
    Pursuing,
    /// Credited with a hit; inert from that instant on.
    Expended,
}

/// Top-level run phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// No encounter loaded.
    #[default]
    Standby,
    /// Ticking.
    Active,
    /// Frozen; commands still queue.
    Paused,
    /// Surface impact, or debris fully settled after a breakup.
    Concluded,
}

/// How target orders are distributed across the interceptor ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderPolicy {
    /// Everyone launches immediately and homes straight on the body.
    #[default]
    Direct,
    /// Interceptors stage along the body-to-target line with jittered
    /// waypoints and staggered launch delays.
    Corridor,
}
