//! Snapshot system: queries the ECS world and builds a complete SceneSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use deflector_core::components::{AsteroidState, InterceptorState, Position};
use deflector_core::enums::{BodyMode, RunPhase};
use deflector_core::events::SimEvent;
use deflector_core::state::{BodyView, InterceptorView, SceneSnapshot, TargetView};
use deflector_core::types::SimTime;

use crate::fragments::FragmentField;

/// Build a complete SceneSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: RunPhase,
    target: Option<TargetView>,
    live_interceptors: u32,
    fragments: &FragmentField,
    advisory: Option<String>,
    events: Vec<SimEvent>,
) -> SceneSnapshot {
    SceneSnapshot {
        time: *time,
        phase,
        body: build_body(world),
        interceptors: build_interceptors(world),
        fragments: fragments.views(),
        target,
        live_interceptors,
        advisory,
        events,
    }
}

/// The body view; a fragmented body is not rendered — only debris remains.
fn build_body(world: &World) -> Option<BodyView> {
    world
        .query::<(&AsteroidState, &Position)>()
        .iter()
        .next()
        .and_then(|(_, (state, pos))| {
            if state.mode == BodyMode::Fragmented {
                return None;
            }
            Some(BodyView {
                position: pos.0,
                mode: state.mode,
                impacted: state.impacted,
                guidance_enabled: state.guidance_enabled,
                velocity_estimate: state.velocity_estimate,
            })
        })
}

fn build_interceptors(world: &World) -> Vec<InterceptorView> {
    let mut views: Vec<InterceptorView> = world
        .query::<(&InterceptorState, &Position)>()
        .iter()
        .map(|(_, (state, pos))| InterceptorView {
            id: state.id,
            position: pos.0,
            heading: state.heading,
            phase: state.phase,
        })
        .collect();

    views.sort_by_key(|v| v.id);
    views
}
