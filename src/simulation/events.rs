//! Event queue for spike contacts.
//!
//! Contacts are detected against a read-only view of the bodies, possibly in
//! parallel, then applied serially in detection order so every drain sees
//! the calories left by the ones before it.

use super::body::Body;

/// Events that modify body state during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A spike tip is inside a rival body.
    SpikeHit {
        /// Index of the body carrying the spike.
        attacker: usize,
        /// Index of the spike within the attacker.
        spike: usize,
        /// Index of the body being drained.
        victim: usize,
        /// Calories requested, before capping by the victim's reserve.
        amount: f64,
    },
}

/// Queue for collecting simulation events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

/// Applies all queued events to the bodies.
///
/// Each hit moves the calories actually drained from the victim to the
/// attacker and puts the spike on cooldown until `now + cooldown`. Returns
/// the total calories transferred.
pub fn apply_events(bodies: &mut [Body], mut queue: EventQueue, now: f64, cooldown: f64) -> f64 {
    if queue.is_empty() {
        return 0.0;
    }

    let mut transferred = 0.0;
    for event in queue.drain() {
        match event {
            SimulationEvent::SpikeHit {
                attacker,
                spike,
                victim,
                amount,
            } => {
                if attacker == victim || attacker >= bodies.len() || victim >= bodies.len() {
                    continue;
                }

                let drained = bodies[victim].vitals.drain(amount);
                bodies[attacker].vitals.feed(drained);
                if let Some(spike) = bodies[attacker].spikes.get_mut(spike) {
                    spike.deactivate_time = Some(now + cooldown);
                }
                transferred += drained;
            }
        }
    }

    transferred
}
