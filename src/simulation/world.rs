//! World driver: owns the bodies, the clock and the random stream.
//!
//! The world runs one engine frame per call to [`World::step`] and acts on
//! what the frame reports: it replicates bodies that are ready to spawn,
//! sprinkles new motes, and tops the organism population back up.

use super::body::{self, Body, BodyId};
use super::engine;
use super::error::Result;
use super::params::{Params, Settings};
use super::prng::Prng;
use super::stats::WorldStats;

/// What happened during one world step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    /// Bodies that died.
    pub died: Vec<BodyId>,
    /// Offspring created, as `(parent, child)`.
    pub born: Vec<(BodyId, BodyId)>,
    /// Motes added.
    pub motes_spawned: usize,
    /// Random organisms added.
    pub random_spawned: usize,
}

/// The main simulation state.
#[derive(Debug, Clone)]
pub struct World {
    /// All living bodies, organisms and motes.
    pub bodies: Vec<Body>,
    /// Timestamp of the last step in milliseconds.
    pub time: f64,
    /// Running tallies.
    pub stats: WorldStats,
    settings: Settings,
    prng: Prng,
    next_id: u64,
}

impl World {
    /// Creates a world with random organisms and motes from a base-36 seed.
    pub fn new(params: Params, seed: &str) -> Result<Self> {
        let prng = Prng::from_seed(seed)?;
        let settings = Settings::new(params);

        let mut world = Self {
            bodies: Vec::new(),
            time: 0.0,
            stats: WorldStats::default(),
            settings,
            prng,
            next_id: 0,
        };

        for _ in 0..world.settings.params.initial_bodies {
            let id = world.allocate_id();
            let body = body::random_body(id, &mut world.prng, &world.settings);
            world.bodies.push(body);
        }

        for _ in 0..world.settings.params.initial_motes {
            let id = world.allocate_id();
            let mote = body::spawn_mote(id, &mut world.prng, &world.settings);
            world.bodies.push(mote);
        }

        tracing::debug!(
            seed,
            bodies = world.bodies.len(),
            "world created"
        );

        Ok(world)
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the configuration. Takes effect from the next step.
    pub fn update_params(&mut self, params: Params) {
        self.settings = Settings::new(params);
    }

    /// Number of living organisms (motes excluded).
    pub fn organism_count(&self) -> usize {
        self.bodies.iter().filter(|body| !body.is_mote()).count()
    }

    /// Number of living motes.
    pub fn mote_count(&self) -> usize {
        self.bodies.iter().filter(|body| body.is_mote()).count()
    }

    /// Looks up a body by id.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    /// Advances the world to `now` (milliseconds).
    pub fn step(&mut self, now: f64) -> FrameSummary {
        let last = self.time;
        let dt = (now - last).max(0.0) / 1000.0;

        let bodies = std::mem::take(&mut self.bodies);
        let frame = engine::simulate_frame(bodies, last, now, &self.settings);
        self.bodies = frame.bodies;
        self.time = now.max(last);

        for id in &frame.died {
            tracing::debug!(id = id.0, time = self.time, "body died");
        }
        self.stats.deaths += frame.died.len() as u64;

        let born = self.reproduce(&frame.ready_to_spawn);
        let (motes_spawned, random_spawned) = self.spawn(dt);

        self.stats.record_population(self.organism_count());

        FrameSummary {
            died: frame.died,
            born,
            motes_spawned,
            random_spawned,
        }
    }

    /// Replicates every ready parent, halving its calories into the child.
    fn reproduce(&mut self, ready: &[BodyId]) -> Vec<(BodyId, BodyId)> {
        let mut born = Vec::with_capacity(ready.len());

        for &parent_id in ready {
            let Some(parent_idx) = self.bodies.iter().position(|body| body.id == parent_id) else {
                continue;
            };

            let id = self.allocate_id();
            let angle = self.prng.rand();
            let child = body::replicate_parent(
                id,
                &self.bodies[parent_idx],
                angle,
                &mut self.prng,
                &self.settings,
            );

            self.bodies[parent_idx].vitals.drain(child.vitals.calories);

            tracing::debug!(
                parent = parent_id.0,
                child = id.0,
                genome = %child.genome.to_hex(),
                "body spawned"
            );

            born.push((parent_id, id));
            self.bodies.push(child);
        }

        self.stats.births += born.len() as u64;
        born
    }

    /// Adds motes at the configured rate and random organisms when the
    /// population is below its floor.
    ///
    /// Rates are per second: the whole part of `rate * dt` is always spawned
    /// and the fractional part is spawned with that probability.
    fn spawn(&mut self, dt: f64) -> (usize, usize) {
        let params = &self.settings.params;
        let max_motes = params.max_motes;
        let min_bodies = params.min_bodies;
        let motes_due = params.motes_rate.max(0.0) * dt;

        let mut motes_to_spawn = motes_due.floor() as usize;
        if self.prng.chance(motes_due.fract()) {
            motes_to_spawn += 1;
        }
        let motes_to_spawn = motes_to_spawn.min(max_motes.saturating_sub(self.mote_count()));

        for _ in 0..motes_to_spawn {
            let id = self.allocate_id();
            let mote = body::spawn_mote(id, &mut self.prng, &self.settings);
            self.bodies.push(mote);
        }

        let random_to_spawn = min_bodies.saturating_sub(self.organism_count());
        for _ in 0..random_to_spawn {
            let id = self.allocate_id();
            let body = body::random_body(id, &mut self.prng, &self.settings);
            tracing::debug!(id = id.0, "random body added");
            self.bodies.push(body);
        }

        self.stats.motes_spawned += motes_to_spawn as u64;
        self.stats.random_spawns += random_to_spawn as u64;
        (motes_to_spawn, random_to_spawn)
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }
}
