//! Fundamental simulation types.

use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Geodetic surface coordinates in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Encounter parameters supplied by the orbital-data loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterScenario {
    /// Closest-approach distance in kilometers.
    pub miss_distance_km: f64,
    /// Relative velocity in km/s.
    pub velocity_kps: f64,
    /// Optional pre-designated surface target.
    pub target: Option<GeoPoint>,
}

impl EncounterScenario {
    pub fn new(miss_distance_km: f64, velocity_kps: f64) -> Self {
        Self {
            miss_distance_km,
            velocity_kps,
            target: None,
        }
    }

    /// Whether the scenario can drive a body at all.
    ///
    /// Missing or garbage orbital data arrives as NaN/zero; such a scenario
    /// spawns nothing rather than erroring.
    pub fn is_valid(&self) -> bool {
        self.miss_distance_km.is_finite()
            && self.miss_distance_km > 0.0
            && self.velocity_kps.is_finite()
            && self.velocity_kps > 0.0
    }
}
