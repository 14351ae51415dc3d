//! Per-frame physics, collision and metabolism.
//!
//! [`simulate_frame`] advances every body from one timestamp to the next:
//!
//! 1. integrate motion along each heading
//! 2. bounce off the arena walls
//! 3. push overlapping bodies apart
//! 4. resolve elastic collisions between newly touching pairs
//! 5. burn upkeep, then let spike tips drain the rivals they touch
//! 6. drop dead bodies and flag bodies ready to reproduce
//!
//! The engine never spawns anything itself; reproduction is left to the
//! caller through [`Frame::ready_to_spawn`].

use geo::Coord;
use rayon::prelude::*;

use super::body::{Body, BodyId, Velocity};
use super::events::{self, EventQueue, SimulationEvent};
use super::geometric_utils::{bounce_x, bounce_y, clamp_within, distance, dot};
use super::params::Settings;
use super::spatial::{self, SpatialIndex};

/// Separation passes per pair before giving up and leaving them overlapping.
pub const MAX_SEPARATION_PASSES: usize = 16;

/// Overlap small enough to count as separated.
const SEPARATION_TOLERANCE: f64 = 1e-9;

/// Result of one simulated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Living bodies after the frame. This is the authoritative set.
    pub bodies: Vec<Body>,
    /// Bodies removed because they died this frame.
    pub died: Vec<BodyId>,
    /// Living organisms at or above their spawn threshold.
    pub ready_to_spawn: Vec<BodyId>,
}

/// Advances all bodies from `last_time` to `now` (milliseconds).
///
/// A zero or negative interval moves nothing but still separates, collides
/// and drains.
pub fn simulate_frame(
    mut bodies: Vec<Body>,
    last_time: f64,
    now: f64,
    settings: &Settings,
) -> Frame {
    let dt = (now - last_time).max(0.0) / 1000.0;

    bodies
        .par_iter_mut()
        .for_each(|body| move_body(body, dt, settings));

    resolve_contacts(&mut bodies, settings);

    bodies.par_iter_mut().for_each(|body| {
        let pos = body.pos;
        body.move_to(pos);
        let upkeep = body.vitals.upkeep * dt;
        body.vitals.drain(upkeep);
    });

    let queue = detect_spike_hits(&bodies, now, dt);
    let hits = queue.len();
    let transferred =
        events::apply_events(&mut bodies, queue, now, settings.params.spike_cooldown.max(0.0));

    let died: Vec<BodyId> = bodies
        .iter()
        .filter(|body| body.vitals.is_dead())
        .map(|body| body.id)
        .collect();
    bodies.retain(|body| !body.vitals.is_dead());

    let ready_to_spawn: Vec<BodyId> = bodies
        .iter()
        .filter(|body| !body.is_mote() && body.vitals.can_spawn())
        .map(|body| body.id)
        .collect();

    tracing::trace!(
        bodies = bodies.len(),
        hits,
        transferred,
        died = died.len(),
        ready = ready_to_spawn.len(),
        "frame simulated"
    );

    Frame {
        bodies,
        died,
        ready_to_spawn,
    }
}

/// Projects a body along its velocity for `dt` seconds and bounces it off
/// the walls. Commits the result to `pos`.
pub fn move_body(body: &mut Body, dt: f64, settings: &Settings) {
    body.next_pos = body.pos + body.velocity.components() * dt;
    bounce_off_walls(body, settings);
    body.pos = body.next_pos;
}

/// Reflects the heading of a body whose candidate position leaves the arena
/// and clamps the candidate back inside. Speed is unchanged.
pub fn bounce_off_walls(body: &mut Body, settings: &Settings) {
    let (width, height) = (settings.params.width, settings.params.height);
    let radius = body.radius;
    let heading = body.velocity.components();
    let next = body.next_pos;

    let hits_left = next.x < radius && heading.x < 0.0;
    let hits_right = next.x > width - radius && heading.x > 0.0;
    if hits_left || hits_right {
        body.velocity.angle = bounce_x(body.velocity.angle);
    }

    let hits_top = next.y < radius && heading.y < 0.0;
    let hits_bottom = next.y > height - radius && heading.y > 0.0;
    if hits_top || hits_bottom {
        body.velocity.angle = bounce_y(body.velocity.angle);
    }

    body.next_pos = Coord {
        x: clamp_within(next.x, radius, width),
        y: clamp_within(next.y, radius, height),
    };
}

/// Separates and collides every overlapping pair, then records partners.
fn resolve_contacts(bodies: &mut [Body], settings: &Settings) {
    let pairs = spatial::overlapping_pairs(bodies);

    for &(i, j) in &pairs {
        let (a, b) = pair_mut(bodies, i, j);
        if !separate_bodies(a, b, settings) {
            tracing::trace!(a = a.id.0, b = b.id.0, "separation budget exhausted");
        }
    }

    let mut partners: Vec<Option<BodyId>> = vec![None; bodies.len()];
    for &(i, j) in &pairs {
        let (a, b) = pair_mut(bodies, i, j);
        let continuing = a.last_collided == Some(b.id) && b.last_collided == Some(a.id);
        if !continuing {
            collide_bodies(a, b);
        }
        partners[i] = Some(b.id);
        partners[j] = Some(a.id);
    }

    for (body, partner) in bodies.iter_mut().zip(partners) {
        body.last_collided = partner;
    }
}

/// Pushes two bodies apart along the line between their centres.
///
/// The correction is split by inverse mass and both bodies stay inside the
/// arena. Whatever a body pinned against a wall cannot take is handed to its
/// partner in the same pass. Returns `false` if they still overlap when a
/// pass makes no progress or after [`MAX_SEPARATION_PASSES`] passes, which
/// happens when the arena leaves no room for both.
pub fn separate_bodies(a: &mut Body, b: &mut Body, settings: &Settings) -> bool {
    let arena = (settings.params.width, settings.params.height);
    let total_mass = a.mass + b.mass;
    let share_a = if total_mass > 0.0 {
        b.mass / total_mass
    } else {
        0.5
    };

    for _ in 0..MAX_SEPARATION_PASSES {
        let before = overlap(a, b);
        if before <= SEPARATION_TOLERANCE {
            return true;
        }

        let normal = unit_normal(a.pos, b.pos, distance(a.pos, b.pos));
        nudge(a, normal * -(before * share_a), arena);
        nudge(b, normal * (before * (1.0 - share_a)), arena);

        let leftover = overlap(a, b);
        if leftover > SEPARATION_TOLERANCE {
            let normal = unit_normal(a.pos, b.pos, distance(a.pos, b.pos));
            nudge(b, normal * leftover, arena);
        }

        let leftover = overlap(a, b);
        if leftover > SEPARATION_TOLERANCE {
            let normal = unit_normal(a.pos, b.pos, distance(a.pos, b.pos));
            nudge(a, normal * -leftover, arena);
        }

        // both bodies are blocked
        if overlap(a, b) >= before - SEPARATION_TOLERANCE {
            break;
        }
    }

    overlap(a, b) <= SEPARATION_TOLERANCE
}

/// Depth by which two circles overlap; negative when apart.
fn overlap(a: &Body, b: &Body) -> f64 {
    a.radius + b.radius - distance(a.pos, b.pos)
}

/// Moves a body by `delta`, keeping it inside a `(width, height)` arena.
fn nudge(body: &mut Body, delta: Coord<f64>, (width, height): (f64, f64)) {
    let target = body.pos + delta;
    body.pos = Coord {
        x: clamp_within(target.x, body.radius, width),
        y: clamp_within(target.y, body.radius, height),
    };
}

/// Resolves a 2D elastic collision between two bodies by mass.
///
/// Velocity components along the line between centres are exchanged with
/// the two-body elastic formula; tangential components are kept. Bodies
/// already moving apart are left alone. Returns whether velocities changed.
pub fn collide_bodies(a: &mut Body, b: &mut Body) -> bool {
    let total_mass = a.mass + b.mass;
    if total_mass <= 0.0 {
        return false;
    }

    let normal = unit_normal(a.pos, b.pos, distance(a.pos, b.pos));
    let tangent = Coord {
        x: -normal.y,
        y: normal.x,
    };

    let (va, vb) = (a.velocity.components(), b.velocity.components());
    let (a_normal, a_tangent) = (dot(va, normal), dot(va, tangent));
    let (b_normal, b_tangent) = (dot(vb, normal), dot(vb, tangent));

    if a_normal - b_normal <= 0.0 {
        return false;
    }

    let a_after = (a_normal * (a.mass - b.mass) + 2.0 * b.mass * b_normal) / total_mass;
    let b_after = (b_normal * (b.mass - a.mass) + 2.0 * a.mass * a_normal) / total_mass;

    a.velocity = Velocity::from_components(normal * a_after + tangent * a_tangent);
    b.velocity = Velocity::from_components(normal * b_after + tangent * b_tangent);
    true
}

/// Queues a hit for every active spike whose tip lies inside a rival.
fn detect_spike_hits(bodies: &[Body], now: f64, dt: f64) -> EventQueue {
    let mut queue = EventQueue::new();
    let Ok(index) = SpatialIndex::build(bodies) else {
        return queue;
    };

    let hits: Vec<SimulationEvent> = bodies
        .par_iter()
        .enumerate()
        .filter(|(_, body)| !body.vitals.is_dead())
        .flat_map_iter(|(attacker, body)| {
            let mut hits = Vec::new();
            for (spike_idx, spike) in body.spikes.iter().enumerate() {
                if !spike.is_active(now) {
                    continue;
                }
                let victim = index
                    .query(spike.tip, index.max_radius())
                    .into_iter()
                    .find(|&victim| {
                        victim != attacker
                            && distance(spike.tip, bodies[victim].pos) < bodies[victim].radius
                    });
                if let Some(victim) = victim {
                    hits.push(SimulationEvent::SpikeHit {
                        attacker,
                        spike: spike_idx,
                        victim,
                        amount: spike.drain * dt,
                    });
                }
            }
            hits
        })
        .collect();

    for hit in hits {
        queue.push(hit);
    }
    queue
}

fn unit_normal(from: Coord<f64>, to: Coord<f64>, gap: f64) -> Coord<f64> {
    if gap > 0.0 {
        (to - from) / gap
    } else {
        Coord { x: 1.0, y: 0.0 }
    }
}

/// Mutable references to two distinct elements, `i < j`.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
