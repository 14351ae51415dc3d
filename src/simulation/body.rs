//! Bodies, their spikes, and the factory functions that build them.
//!
//! A body is built from a genome: the genome is read for size, spikes and
//! hue, mass and radius follow from size, and spike geometry follows from
//! radius. Motes are the exception: they have no genome and exist only to
//! be eaten.

use std::f64::consts::PI;

use geo::Coord;

use super::genome::{self, Genome, SpikeCommand};
use super::geometric_utils::{self, asin, clamp_within, project};
use super::params::Settings;
use super::prng::Prng;
use super::vitals::Vitals;

/// Stable identifier for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// What kind of body this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Genome-built body that metabolizes and reproduces.
    Organism,
    /// Passive food particle.
    Mote,
}

/// Heading and speed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    /// Heading in turns, `[0, 1)`.
    pub angle: f64,
    /// Pixels per second, never negative.
    pub speed: f64,
}

impl Velocity {
    /// Creates a velocity, wrapping the angle and flooring speed at zero.
    pub fn new(angle: f64, speed: f64) -> Self {
        Self {
            angle: geometric_utils::normalize(angle),
            speed: speed.max(0.0),
        }
    }

    /// Velocity pointing along a component vector.
    pub fn from_components(v: Coord<f64>) -> Self {
        Self::new(geometric_utils::angle_of(v.x, v.y), v.x.hypot(v.y))
    }

    /// Component vector in pixels per second.
    pub fn components(&self) -> Coord<f64> {
        geometric_utils::direction(self.angle) * self.speed
    }
}

/// Spike points relative to the parent's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeGeometry {
    /// Point of the spike.
    pub tip: Coord<f64>,
    /// First base point, on the parent's rim.
    pub base_a: Coord<f64>,
    /// Second base point, on the parent's rim.
    pub base_b: Coord<f64>,
}

/// A spike that drains calories from rivals its tip touches.
#[derive(Debug, Clone, PartialEq)]
pub struct Spike {
    /// Direction in turns.
    pub angle: f64,
    /// Length beyond the parent's rim.
    pub length: f64,
    /// Calories per second drained from a victim.
    pub drain: f64,
    /// Offsets from the parent's centre, fixed at creation.
    pub offsets: SpikeGeometry,
    /// Absolute tip.
    pub tip: Coord<f64>,
    /// Absolute first base point.
    pub base_a: Coord<f64>,
    /// Absolute second base point.
    pub base_b: Coord<f64>,
    /// Timestamp (ms) until which the spike is inactive.
    pub deactivate_time: Option<f64>,
}

impl Spike {
    /// Re-seats the absolute points around a parent centre.
    pub fn move_spike(&mut self, center: Coord<f64>) {
        self.tip = center + self.offsets.tip;
        self.base_a = center + self.offsets.base_a;
        self.base_b = center + self.offsets.base_b;
    }

    /// Whether the spike can drain at `time` (ms).
    pub fn is_active(&self, time: f64) -> bool {
        self.deactivate_time.is_none_or(|until| time >= until)
    }
}

/// Builds a spike for a parent of the given radius.
///
/// The base points sit symmetrically on the rim, `asin(half_width / radius)`
/// turns either side of `angle`. Shorter spikes drain faster.
pub fn spawn_spike(radius: f64, angle: f64, length: f64, settings: &Settings) -> Spike {
    let params = &settings.params;
    let origin = Coord { x: 0.0, y: 0.0 };
    let spread = if radius > 0.0 {
        asin(params.spike_half_width / radius)
    } else {
        0.0
    };

    let offsets = SpikeGeometry {
        tip: floor_coord(project(origin, angle, length + radius)),
        base_a: floor_coord(project(origin, angle - spread, radius)),
        base_b: floor_coord(project(origin, angle + spread, radius)),
    };

    let drain = params.base_spike_drain * settings.temperature_adjustment
        / length.max(1.0).powf(params.drain_length_quotient);

    Spike {
        angle,
        length,
        drain,
        offsets,
        tip: offsets.tip,
        base_a: offsets.base_a,
        base_b: offsets.base_b,
        deactivate_time: None,
    }
}

fn floor_coord(c: Coord<f64>) -> Coord<f64> {
    Coord {
        x: c.x.floor(),
        y: c.y.floor(),
    }
}

/// Radius of a circle of the given area, never below the configured minimum.
pub fn radius_for_mass(mass: f64, settings: &Settings) -> f64 {
    (mass / PI).sqrt().floor().max(settings.params.min_radius)
}

/// A simulated circular body.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Unique identifier.
    pub id: BodyId,
    /// Organism or mote.
    pub kind: BodyKind,
    /// Genome the body was built from. Empty for motes.
    pub genome: Genome,
    /// Hue in turns.
    pub hue: f64,
    /// Centre position.
    pub pos: Coord<f64>,
    /// Area in pixels.
    pub mass: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Current heading and speed.
    pub velocity: Velocity,
    /// Calorie state.
    pub vitals: Vitals,
    /// Spikes, longest first.
    pub spikes: Vec<Spike>,
    /// Candidate position for the frame in progress.
    pub next_pos: Coord<f64>,
    /// Body this one collided with last frame.
    pub last_collided: Option<BodyId>,
}

impl Body {
    /// Builds an organism from a genome, placed at `pos`.
    ///
    /// Mass, radius, spikes, hue and vitals all come from the genome.
    pub fn from_genome(
        id: BodyId,
        genome: Genome,
        pos: Coord<f64>,
        velocity: Velocity,
        settings: &Settings,
    ) -> Self {
        let commands = genome::read_genome(&genome, settings);
        let mass = settings.min_mass + f64::from(commands.size);
        let radius = radius_for_mass(mass, settings);
        let spikes = build_spikes(radius, &commands.spikes, settings);
        let lengths: Vec<f64> = spikes.iter().map(|spike| spike.length).collect();
        let vitals = Vitals::new(mass, &lengths, settings);

        let mut body = Self {
            id,
            kind: BodyKind::Organism,
            genome,
            hue: commands.hue,
            pos,
            mass,
            radius,
            velocity,
            vitals,
            spikes,
            next_pos: pos,
            last_collided: None,
        };
        body.move_to(pos);
        body
    }

    /// Whether this body is a mote.
    pub fn is_mote(&self) -> bool {
        self.kind == BodyKind::Mote
    }

    /// Moves the body and re-seats its spikes.
    pub fn move_to(&mut self, pos: Coord<f64>) {
        self.pos = pos;
        self.next_pos = pos;
        for spike in &mut self.spikes {
            spike.move_spike(pos);
        }
    }
}

fn build_spikes(radius: f64, commands: &[SpikeCommand], settings: &Settings) -> Vec<Spike> {
    let mut spikes: Vec<Spike> = commands
        .iter()
        .map(|command| spawn_spike(radius, command.angle, f64::from(command.length), settings))
        .collect();
    spikes.sort_by(|a, b| b.length.total_cmp(&a.length));
    spikes
}

fn random_position(radius: f64, prng: &mut Prng, settings: &Settings) -> Coord<f64> {
    let params = &settings.params;
    let x = prng.rand_int(radius as i64, (params.width - radius) as i64) as f64;
    let y = prng.rand_int(radius as i64, (params.height - radius) as i64) as f64;
    Coord {
        x: clamp_within(x, radius, params.width),
        y: clamp_within(y, radius, params.height),
    }
}

/// Builds a body from a fresh random genome at a random position.
///
/// Speed is bounded by the configured kinetic energy per unit mass.
pub fn random_body(id: BodyId, prng: &mut Prng, settings: &Settings) -> Body {
    let genome = genome::create_genome(prng, settings);
    let origin = Coord { x: 0.0, y: 0.0 };
    let mut body = Body::from_genome(id, genome, origin, Velocity::default(), settings);

    let pos = random_position(body.radius, prng, settings);
    body.velocity = Velocity::new(prng.rand(), prng.rand() * settings.max_body_speed);
    body.move_to(pos);
    body
}

/// Builds an offspring of `parent`, launched along `angle`.
///
/// The child inherits the parent's hue, starts with half the parent's
/// calories (rounded down), and sits two child radii from the parent. The
/// parent is not modified; halving its calories is the caller's job.
pub fn replicate_parent(
    id: BodyId,
    parent: &Body,
    angle: f64,
    prng: &mut Prng,
    settings: &Settings,
) -> Body {
    let params = &settings.params;
    let genome = genome::replicate_genome(&parent.genome, prng, settings);
    let mut child = Body::from_genome(id, genome, parent.pos, Velocity::default(), settings);

    child.hue = parent.hue;
    child
        .vitals
        .set_calories((parent.vitals.calories / 2.0).floor());

    let bonus_budget = (2.0 * params.spawning_energy.max(0.0) / child.mass).sqrt();
    child.velocity = Velocity::new(angle, parent.velocity.speed + prng.rand() * bonus_budget);

    let offset = project(parent.pos, angle, child.radius * 2.0);
    let pos = Coord {
        x: clamp_within(offset.x, child.radius, params.width),
        y: clamp_within(offset.y, child.radius, params.height),
    };
    child.move_to(pos);
    child
}

/// Builds a mote at a random position with a random slow velocity.
pub fn spawn_mote(id: BodyId, prng: &mut Prng, settings: &Settings) -> Body {
    let params = &settings.params;
    let mass = settings.mote_mass;
    let radius = params.mote_radius;
    let pos = random_position(radius, prng, settings);
    let velocity = Velocity::new(prng.rand(), prng.rand() * params.mote_max_speed.max(0.0));

    Body {
        id,
        kind: BodyKind::Mote,
        genome: Genome::default(),
        hue: 0.0,
        pos,
        mass,
        radius,
        velocity,
        vitals: Vitals::mote(mass, settings),
        spikes: Vec::new(),
        next_pos: pos,
        last_collided: None,
    }
}
