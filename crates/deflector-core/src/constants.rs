//! Simulation constants and tuning parameters.
//!
//! Distances are scene units (planet radius = 2.0), times are seconds,
//! angles are radians unless a name says otherwise.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Scene geometry ---

/// Planet radius in scene units.
pub const PLANET_RADIUS: f64 = 2.0;

/// Radius of the incoming body.
pub const BODY_RADIUS: f64 = 0.3;

/// Center distance at which the body touches the surface.
pub const CONTACT_RADIUS: f64 = PLANET_RADIUS + BODY_RADIUS;

// --- Approach track ---

/// Clearance added to the closest representable flyby.
pub const MISS_MAPPING_SAFETY: f64 = 0.05;

/// Closest scene distance a miss can map to.
pub const SCENE_MISS_MIN: f64 = CONTACT_RADIUS + MISS_MAPPING_SAFETY;

/// Farthest scene distance a miss can map to.
pub const SCENE_MISS_MAX: f64 = 20.0;

/// Decades of real miss distance compressed into the scene range.
pub const MISS_LOG_SPAN: f64 = 8.0;

/// Z coordinate the approach track starts from.
pub const APPROACH_START_Z: f64 = -30.0;

/// Mission-clock seconds elapsed per wall-clock second while playing.
pub const APPROACH_CLOCK_RATE: f64 = 10.0;

/// Scene units per mission-clock second, per km/s of input velocity.
pub const APPROACH_SPEED_PER_KPS: f64 = 0.02;

// --- Powered descent ---

/// Scene units per second, per km/s of input velocity.
pub const DESCENT_SPEED_PER_KPS: f64 = 0.04;

/// Floor descent speed so slow bodies still make progress.
pub const DESCENT_MIN_SPEED: f64 = 0.8;

// --- Interceptors ---

/// Default number of interceptors in the ring.
pub const INTERCEPTOR_COUNT: usize = 18;

/// Ring altitude above the planet surface.
pub const INTERCEPTOR_RING_ALTITUDE: f64 = 0.25;

/// Cruise speed (scene units/s).
pub const INTERCEPTOR_SPEED: f64 = 2.5;

/// Base turn rate (rad/s).
pub const INTERCEPTOR_TURN_RATE: f64 = 3.5;

/// Base hit radius.
pub const INTERCEPTOR_HIT_RADIUS: f64 = 0.32;

/// A waypoint closer than this counts as reached.
pub const WAYPOINT_REACHED_DISTANCE: f64 = 0.8;

// --- Terminal-range boosts ---

/// Inside this range of the body: full boost band.
pub const CLOSE_RANGE: f64 = 1.2;
pub const CLOSE_TURN_FACTOR: f64 = 1.8;
pub const CLOSE_SPEED_FACTOR: f64 = 1.15;
pub const CLOSE_HIT_RADIUS: f64 = 0.45;

/// Inside this range of the body: partial boost band.
pub const MID_RANGE: f64 = 2.0;
pub const MID_TURN_FACTOR: f64 = 1.4;
pub const MID_HIT_RADIUS: f64 = 0.38;

// --- Lead prediction ---

/// Floor on the estimated closing time (seconds).
pub const MIN_CLOSING_TIME: f64 = 0.2;

/// Fraction of the full lead applied; full lead overshoots a turning target.
pub const LEAD_FRACTION: f64 = 0.9;

// --- Stall recovery ---

/// Seconds without range improvement before a forced correction.
pub const STALL_TIMEOUT_SECS: f64 = 1.8;

/// Heading blend factor applied by a forced correction.
pub const STALL_HEADING_BLEND: f64 = 0.6;

/// One-tick speed bonus applied by a forced correction (scene units/s).
pub const STALL_SPEED_KICK: f64 = 0.7;

/// Timer value after a forced correction; partial credit, not a full reset.
pub const STALL_RETRY_SECS: f64 = 0.3;

/// Minimum range improvement that counts as progress.
pub const STALL_IMPROVE_EPSILON: f64 = 1e-3;

// --- Deflection ---

/// Outward impulse magnitude added along the hit normal (scene units/s).
pub const DEFLECT_PUSH: f64 = 2.0;

// --- Fragments ---

/// Fragments spawned per shatter.
pub const FRAGMENT_COUNT: usize = 36;

/// Hard cap on the debris field size.
pub const FRAGMENT_CAPACITY: usize = 64;

/// Normal-direction ejection speed: min + uniform span.
pub const FRAGMENT_NORMAL_SPEED_MIN: f64 = 2.8;
pub const FRAGMENT_NORMAL_SPEED_SPAN: f64 = 2.4;

/// Magnitude of the isotropic spread component.
pub const FRAGMENT_SPREAD_SPEED: f64 = 0.8;

/// Fraction of the body's pre-shatter velocity inherited by debris.
pub const FRAGMENT_INHERIT_FACTOR: f64 = 0.7;

/// Fragment lifetime: min + uniform span (seconds).
pub const FRAGMENT_LIFE_MIN_SECS: f64 = 2.8;
pub const FRAGMENT_LIFE_SPAN_SECS: f64 = 2.2;

/// Exponential drag rate (1/s).
pub const FRAGMENT_DRAG: f64 = 0.9;

/// Constant outward drift keeping debris clear of the surface (units/s).
pub const FRAGMENT_OUTWARD_BIAS: f64 = 0.5;

/// Fixed per-axis spin rates (rad/s).
pub const FRAGMENT_SPIN: [f64; 3] = [2.0, 2.3, 1.7];

/// Scale model: base scale at the reference lifetime, clamped at a minimum.
pub const FRAGMENT_BASE_SCALE: f64 = 0.08;
pub const FRAGMENT_SCALE_LIFE_REF: f64 = 3.0;
pub const FRAGMENT_MIN_SCALE: f64 = 0.01;

/// Spawn scale: min + uniform span.
pub const FRAGMENT_SPAWN_SCALE_MIN: f64 = 0.05;
pub const FRAGMENT_SPAWN_SCALE_SPAN: f64 = 0.05;

// --- Corridor orders ---

/// Launch delay step between consecutive interceptors (seconds).
pub const ORDER_WAVE_DELAY_STEP: f64 = 0.06;

/// Waypoints occupy this slice of the body-to-target line.
pub const ORDER_CORRIDOR_START: f64 = 0.1;
pub const ORDER_CORRIDOR_SPAN: f64 = 0.8;

/// Half-width of the random lateral offset applied to each waypoint.
pub const ORDER_LATERAL_JITTER: f64 = 0.25;

// --- Numeric guards ---

/// Below this length a direction vector is treated as degenerate; headings
/// this close to an aim direction count as already aligned.
pub const DIRECTION_EPSILON: f64 = 1e-6;

// --- Time scale ---

/// Upper bound accepted for the external frame loop's time scale.
pub const MAX_TIME_SCALE: f64 = 4.0;
