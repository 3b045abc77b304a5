//! Debris field spawned when the body shatters.
//!
//! A bounded slot array owned by the engine, not ECS entities — the same
//! split the engagement bookkeeping uses. Fragments past zero lifetime are
//! skipped, never compacted; slot order is irrelevant.

use glam::DVec3;
use rand::Rng;

use deflector_core::constants::*;
use deflector_core::state::FragmentView;

/// One debris particle.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Euler rotation accumulated at fixed per-axis rates.
    pub rotation: DVec3,
    /// Remaining lifetime in seconds; dead at or below zero.
    pub life_secs: f64,
    pub scale: f64,
}

/// The debris field. Empty until the body shatters; spawns at most once per
/// encounter.
#[derive(Debug, Default)]
pub struct FragmentField {
    fragments: Vec<Fragment>,
    spawned: bool,
}

impl FragmentField {
    /// Populate the field at the hit point. Every fragment gets a randomized
    /// ejection along the hit normal, a small isotropic spread, and a share
    /// of the body's pre-shatter velocity so debris inherits momentum.
    ///
    /// A second call is a no-op: the field spawns once per encounter.
    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        normal: DVec3,
        hit_point: DVec3,
        inherited_velocity: DVec3,
        count: usize,
    ) {
        if self.spawned {
            return;
        }
        self.spawned = true;

        let n = normal.normalize_or_zero();
        let count = count.min(FRAGMENT_CAPACITY);
        self.fragments.clear();
        self.fragments.reserve(count);

        for _ in 0..count {
            let ejection = FRAGMENT_NORMAL_SPEED_MIN + rng.gen_range(0.0..FRAGMENT_NORMAL_SPEED_SPAN);
            let velocity = n * ejection
                + random_unit(rng) * FRAGMENT_SPREAD_SPEED
                + inherited_velocity * FRAGMENT_INHERIT_FACTOR;
            self.fragments.push(Fragment {
                position: hit_point,
                velocity,
                rotation: DVec3::ZERO,
                life_secs: FRAGMENT_LIFE_MIN_SECS + rng.gen_range(0.0..FRAGMENT_LIFE_SPAN_SECS),
                scale: FRAGMENT_SPAWN_SCALE_MIN + rng.gen_range(0.0..FRAGMENT_SPAWN_SCALE_SPAN),
            });
        }
    }

    /// Advance all live fragments by one step: exponential drag, a constant
    /// outward drift that keeps debris from re-intersecting the planet,
    /// fixed-rate tumbling, and a scale tied to the remaining lifetime.
    pub fn advance(&mut self, dt: f64) {
        let drag = (-FRAGMENT_DRAG * dt).exp();
        let spin = DVec3::from_array(FRAGMENT_SPIN);
        for frag in &mut self.fragments {
            frag.life_secs -= dt;
            if frag.life_secs <= 0.0 {
                continue;
            }
            frag.velocity *= drag;
            let outward = frag.position.normalize_or_zero() * (FRAGMENT_OUTWARD_BIAS * dt);
            frag.position += outward + frag.velocity * dt;
            frag.rotation += spin * dt;
            frag.scale =
                (FRAGMENT_BASE_SCALE * (frag.life_secs / FRAGMENT_SCALE_LIFE_REF)).max(FRAGMENT_MIN_SCALE);
        }
    }

    /// Live fragments, in slot order.
    pub fn alive(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| f.life_secs > 0.0)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn has_spawned(&self) -> bool {
        self.spawned
    }

    /// The field spawned and every fragment has since burned out.
    pub fn is_settled(&self) -> bool {
        self.spawned && self.alive_count() == 0
    }

    /// Forget everything; ready for the next encounter.
    pub fn reset(&mut self) {
        self.fragments.clear();
        self.spawned = false;
    }

    /// Render views for the snapshot.
    pub fn views(&self) -> Vec<FragmentView> {
        self.alive()
            .map(|f| FragmentView {
                position: f.position,
                rotation: f.rotation,
                scale: f.scale,
            })
            .collect()
    }
}

/// Uniform random unit vector via rejection sampling.
fn random_unit<R: Rng>(rng: &mut R) -> DVec3 {
    loop {
        let v = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
