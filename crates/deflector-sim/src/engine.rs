//! Simulation engine — the core of the encounter.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems in a fixed order, resolves interceptor hits, and
//! produces `SceneSnapshot`s. Completely headless (no window, no renderer),
//! enabling deterministic testing.
//!
//! The engine is also the mission orchestrator: it is the only component
//! with cross-entity knowledge. Interceptors report hits into a queue;
//! draining that queue once per tick is the single point where deflections
//! are applied, the live set shrinks, and the final hit triggers the
//! breakup exactly once.

use std::collections::{BTreeSet, VecDeque};

use glam::DVec3;
use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use deflector_body::deflect::deflect;
use deflector_body::flight::DescentPath;
use deflector_core::commands::{BodyCommand, PlayerCommand};
use deflector_core::components::{AsteroidState, InterceptorState, Order, Position};
use deflector_core::constants::*;
use deflector_core::enums::{BodyMode, InterceptorPhase, OrderPolicy, RunPhase};
use deflector_core::events::SimEvent;
use deflector_core::geo;
use deflector_core::state::{SceneSnapshot, TargetView};
use deflector_core::types::{EncounterScenario, GeoPoint, SimTime};

use crate::advisory::AdvisoryInbox;
use crate::fragments::FragmentField;
use crate::systems;
use crate::systems::interceptor::{HitReport, TargetState};
use crate::world_setup;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal), consumed by the frame loop.
    pub time_scale: f64,
    /// Size of the interceptor ring.
    pub interceptor_count: usize,
    /// How target orders are distributed across the ring.
    pub order_policy: OrderPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            interceptor_count: INTERCEPTOR_COUNT,
            order_policy: OrderPolicy::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all encounter state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: RunPhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    order_policy: OrderPolicy,
    interceptor_count: usize,

    command_queue: VecDeque<PlayerCommand>,
    hit_reports: Vec<HitReport>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,

    /// Interceptor ids not yet credited with a hit.
    live_set: BTreeSet<u32>,
    target: Option<TargetView>,
    mission_clock: f64,
    fragments: FragmentField,
    advisory: Option<String>,
    advisory_inbox: Option<AdvisoryInbox>,
}

/// One-tick view of the body entity, read before mutating anything.
struct BodyProbe {
    entity: hecs::Entity,
    position: DVec3,
    velocity: DVec3,
    descent_speed: f64,
    live: bool,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: RunPhase::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            order_policy: config.order_policy,
            interceptor_count: config.interceptor_count,
            command_queue: VecDeque::new(),
            hit_reports: Vec::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            live_set: BTreeSet::new(),
            target: None,
            mission_clock: 0.0,
            fragments: FragmentField::default(),
            advisory: None,
            advisory_inbox: None,
        }
    }

    /// Adopt an advisory inbox; its texts surface in subsequent snapshots.
    pub fn attach_advisory(&mut self, inbox: AdvisoryInbox) {
        self.advisory_inbox = Some(inbox);
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SceneSnapshot {
        self.poll_advisory();
        self.process_commands();

        if self.phase == RunPhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.target,
            self.live_set.len() as u32,
            &self.fragments,
            self.advisory.clone(),
            events,
        )
    }

    /// Apply an imperative command to the incoming body.
    ///
    /// No-op without a body; `Shatter` is idempotent, so duplicate or late
    /// invocations cannot break the body up twice.
    pub fn command_body(&mut self, command: BodyCommand) {
        let Some(probe) = self.body_probe() else {
            return;
        };
        match command {
            BodyCommand::ApplyDeflection { point: _, normal } => {
                if let Ok(mut state) = self.world.get::<&mut AsteroidState>(probe.entity) {
                    if !state.is_live() {
                        return;
                    }
                    let estimate = state.override_velocity.unwrap_or(state.velocity_estimate);
                    state.override_velocity =
                        Some(deflect(probe.position, estimate, normal, DEFLECT_PUSH));
                    state.guidance_enabled = false;
                }
            }
            BodyCommand::Shatter { point, normal } => {
                let inherited;
                {
                    let Ok(mut state) = self.world.get::<&mut AsteroidState>(probe.entity) else {
                        return;
                    };
                    if state.mode == BodyMode::Fragmented {
                        return;
                    }
                    inherited = state.override_velocity.unwrap_or(state.velocity_estimate);
                    state.mode = BodyMode::Fragmented;
                    state.override_velocity = None;
                    state.guidance_enabled = false;
                }
                self.fragments
                    .spawn(&mut self.rng, normal, point, inherited, FRAGMENT_COUNT);
                self.events.push(SimEvent::BodyShattered { point, normal });
            }
            BodyCommand::CancelGuidance => {
                if let Ok(mut state) = self.world.get::<&mut AsteroidState>(probe.entity) {
                    state.guidance_enabled = false;
                }
            }
        }
    }

    // --- Accessors ---

    /// Get the current run phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of interceptors not yet credited with a hit.
    pub fn live_interceptors(&self) -> u32 {
        self.live_set.len() as u32
    }

    /// The currently designated target, if any.
    pub fn target(&self) -> Option<TargetView> {
        self.target
    }

    /// Current mission-clock value driving the approach track.
    pub fn mission_clock(&self) -> f64 {
        self.mission_clock
    }

    /// The body's current motion mode, if a body exists.
    pub fn body_mode(&self) -> Option<BodyMode> {
        self.world
            .query::<&AsteroidState>()
            .iter()
            .next()
            .map(|(_, state)| state.mode)
    }

    /// Read-only access to the debris field.
    pub fn fragments(&self) -> &FragmentField {
        &self.fragments
    }

    /// Fabricate a hit report for each id at the body's current position,
    /// then resolve them in order (for orchestration tests).
    #[cfg(test)]
    pub fn inject_hits(&mut self, ids: &[u32]) {
        if let Some(probe) = self.body_probe() {
            for &id in ids {
                let interceptor_position = self
                    .interceptor_entity(id)
                    .and_then(|e| self.world.get::<&Position>(e).ok().map(|p| p.0))
                    .unwrap_or(probe.position - DVec3::Z * BODY_RADIUS);
                self.hit_reports.push(HitReport {
                    id,
                    body_position: probe.position,
                    interceptor_position,
                });
            }
        }
        self.resolve_hits();
    }

    // --- Command processing ---

    /// Drain newly arrived advisory text; the latest delivery wins.
    fn poll_advisory(&mut self) {
        if let Some(inbox) = &self.advisory_inbox {
            if let Some(text) = inbox.poll() {
                self.advisory = Some(text);
            }
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartEncounter { scenario } => self.start_encounter(scenario),
            PlayerCommand::SelectTarget { lat_deg, lon_deg } => {
                self.designate_target(GeoPoint::new(lat_deg, lon_deg));
            }
            PlayerCommand::SelectSurfacePoint { point } => {
                if point.length() > DIRECTION_EPSILON {
                    self.designate_target(geo::geodetic_at(point));
                }
            }
            PlayerCommand::SetMissionClock { secs } => {
                if secs.is_finite() {
                    self.mission_clock = secs.max(0.0);
                }
            }
            PlayerCommand::SetOrderPolicy { policy } => {
                self.order_policy = policy;
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
            }
            PlayerCommand::Pause => {
                if self.phase == RunPhase::Active {
                    self.phase = RunPhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == RunPhase::Paused {
                    self.phase = RunPhase::Active;
                }
            }
        }
    }

    /// Reset the world and spawn a fresh encounter. The interceptor ring is
    /// always placed; the body only if the scenario is usable.
    fn start_encounter(&mut self, scenario: EncounterScenario) {
        if !matches!(self.phase, RunPhase::Standby | RunPhase::Concluded) {
            return;
        }

        self.world.clear();
        self.live_set.clear();
        self.target = None;
        self.mission_clock = 0.0;
        self.fragments.reset();
        self.advisory = None;
        self.time = SimTime::default();

        world_setup::spawn_interceptors(&mut self.world, self.interceptor_count);
        for (_entity, state) in self.world.query_mut::<&InterceptorState>() {
            self.live_set.insert(state.id);
        }

        world_setup::spawn_body(&mut self.world, &scenario);
        self.phase = RunPhase::Active;

        if let Some(target) = scenario.target {
            self.designate_target(target);
        }
    }

    /// Designate a surface target: switch the body to powered descent and
    /// send the ring after it. Ignored without a live body (no encounter,
    /// invalid scenario, already impacted or shattered).
    fn designate_target(&mut self, geo_point: GeoPoint) {
        if !geo_point.lat_deg.is_finite() || !geo_point.lon_deg.is_finite() {
            return;
        }
        let Some(probe) = self.body_probe() else {
            return;
        };
        if !probe.live {
            return;
        }

        let point = geo::surface_point(geo_point, PLANET_RADIUS);

        if let Some(path) = DescentPath::new(probe.position, point, probe.descent_speed) {
            let _ = self.world.insert_one(probe.entity, path);
            if let Ok(mut state) = self.world.get::<&mut AsteroidState>(probe.entity) {
                state.mode = BodyMode::Descent;
                state.guidance_enabled = true;
            }
        }

        self.target = Some(TargetView {
            lat_deg: geo_point.lat_deg,
            lon_deg: geo_point.lon_deg,
            point,
        });
        self.events.push(SimEvent::TargetDesignated {
            lat_deg: geo_point.lat_deg,
            lon_deg: geo_point.lon_deg,
        });
        self.issue_orders(probe.position, point);
    }

    /// Construct an order for every interceptor that has not yet hit.
    fn issue_orders(&mut self, body_position: DVec3, target_point: DVec3) {
        let line = target_point - body_position;
        let line_len = line.length();
        let line_dir = if line_len > DIRECTION_EPSILON {
            line / line_len
        } else {
            DVec3::ZERO
        };

        let mut ranks: Vec<(u32, hecs::Entity, DVec3)> = self
            .world
            .query::<(&InterceptorState, &Position)>()
            .iter()
            .filter(|(_, (state, _))| state.phase != InterceptorPhase::Expended)
            .map(|(entity, (state, pos))| (state.id, entity, pos.0))
            .collect();
        ranks.sort_by_key(|(id, _, _)| *id);

        let count = ranks.len();
        for (slot, (_, entity, position)) in ranks.iter().enumerate() {
            let order = match self.order_policy {
                OrderPolicy::Direct => Order {
                    waypoint: None,
                    delay_secs: 0.0,
                },
                OrderPolicy::Corridor => {
                    let delay_secs = ORDER_WAVE_DELAY_STEP * slot as f64;
                    if line_dir.length_squared() == 0.0 {
                        Order {
                            waypoint: None,
                            delay_secs,
                        }
                    } else {
                        // Slot waypoints spread over the middle of the
                        // body-to-target line, with lateral jitter so the
                        // wave doesn't fly single-file.
                        let t = (slot + 1) as f64 / (count + 1) as f64;
                        let along = ORDER_CORRIDOR_START + ORDER_CORRIDOR_SPAN * t;
                        let mut waypoint = body_position + line_dir * (line_len * along);
                        let side = line_dir.cross(DVec3::Y).normalize_or_zero();
                        if side.length_squared() > 0.0 {
                            waypoint += side * ((self.rng.gen::<f64>() - 0.5) * ORDER_LATERAL_JITTER);
                        }
                        Order {
                            waypoint: Some(waypoint),
                            delay_secs,
                        }
                    }
                }
            };

            if let Ok(mut state) = self.world.get::<&mut InterceptorState>(*entity) {
                state.order = Some(order);
                state.phase = InterceptorPhase::Staged;
                state.staged_secs = 0.0;
                state.best_range = f64::INFINITY;
                state.stall_secs = 0.0;
                // Point the nose at the body up front; less initial arcing.
                let to_body = (body_position - *position).normalize_or_zero();
                if to_body.length_squared() > 0.0 {
                    state.heading = to_body;
                }
            }
        }

        self.events.push(SimEvent::OrdersIssued {
            count: count as u32,
        });
    }

    // --- Tick internals ---

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Interceptor guidance + hit detection
        let target_state = self.body_probe().and_then(|probe| {
            probe.live.then_some(TargetState {
                position: probe.position,
                velocity: probe.velocity,
            })
        });
        systems::interceptor::run(&mut self.world, target_state, &mut self.hit_reports);

        // 2. Resolve hits at a single drain point
        self.resolve_hits();

        // 3. Body motion (override priority, then mode rules)
        systems::body_motion::run(&mut self.world, &mut self.mission_clock);

        // 4. Surface collision
        if let Some(contact) = systems::collision::run(&mut self.world) {
            self.events.push(SimEvent::SurfaceImpact {
                point: contact.point,
                normal: contact.normal,
            });
            self.phase = RunPhase::Concluded;
        }

        // 5. Debris
        self.fragments.advance(DT);
        if self.fragments.is_settled() && self.phase == RunPhase::Active {
            self.events.push(SimEvent::DebrisSettled);
            self.phase = RunPhase::Concluded;
        }
    }

    /// Drain the hit queue: deflect per hit, shrink the live set, and on the
    /// final live hit break the body up and clear all targeting state.
    fn resolve_hits(&mut self) {
        if self.hit_reports.is_empty() {
            return;
        }
        let reports = std::mem::take(&mut self.hit_reports);

        for report in reports {
            // Late or duplicate reports: the id is no longer live — ignore.
            if !self.live_set.remove(&report.id) {
                continue;
            }

            let normal = self.hit_normal(&report);
            self.events.push(SimEvent::InterceptorHit {
                id: report.id,
                point: report.interceptor_position,
            });
            self.command_body(BodyCommand::ApplyDeflection {
                point: report.interceptor_position,
                normal,
            });
            self.events.push(SimEvent::BodyDeflected {
                id: report.id,
                normal,
            });

            if let Some(entity) = self.interceptor_entity(report.id) {
                self.despawn_buffer.push(entity);
            }

            if self.live_set.is_empty() {
                self.command_body(BodyCommand::Shatter {
                    point: report.interceptor_position,
                    normal,
                });
                self.clear_targeting();
            }
        }

        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }

    /// Deflection normal for a hit: from the interceptor into the body.
    /// Degenerate geometry falls back to the reverse of the body's motion,
    /// then to the outward radial — never a zero normal.
    fn hit_normal(&self, report: &HitReport) -> DVec3 {
        let offset = report.body_position - report.interceptor_position;
        if offset.length() > DIRECTION_EPSILON {
            return offset / offset.length();
        }
        if let Some(probe) = self.body_probe() {
            if let Some(n) = (-probe.velocity).try_normalize() {
                return n;
            }
            if let Some(n) = probe.position.try_normalize() {
                return n;
            }
        }
        DVec3::Y
    }

    /// Drop the selected site and any orders still pending.
    fn clear_targeting(&mut self) {
        self.target = None;
        for (_entity, state) in self.world.query_mut::<&mut InterceptorState>() {
            if state.phase != InterceptorPhase::Expended {
                state.order = None;
                state.phase = InterceptorPhase::Idle;
            }
        }
    }

    /// Read the body entity's state for this tick, if one exists.
    fn body_probe(&self) -> Option<BodyProbe> {
        self.world
            .query::<(&AsteroidState, &Position)>()
            .iter()
            .next()
            .map(|(entity, (state, pos))| BodyProbe {
                entity,
                position: pos.0,
                velocity: state.velocity_estimate,
                descent_speed: state.descent_speed,
                live: state.is_live(),
            })
    }

    /// Find an interceptor entity by id.
    fn interceptor_entity(&self, id: u32) -> Option<hecs::Entity> {
        self.world
            .query::<&InterceptorState>()
            .iter()
            .find(|(_, state)| state.id == id)
            .map(|(entity, _)| entity)
    }
}
