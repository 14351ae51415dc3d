//! # Bodies - Evolving Circles in a Box
//!
//! A simulation of circular bodies that drift, collide, feed on each other
//! with spikes, and reproduce through a mutating byte-string genome.
//!
//! ## Features
//!
//! - Byte-string genomes with control-byte delimited genes
//! - Phenotypes (size, spikes, hue) read from bit censuses
//! - Mutation pipeline over bytes, then over whole genes
//! - Calorie metabolism with economy-of-scale upkeep
//! - Elastic collisions, wall bounces and overlap separation
//! - Spike contact drains with per-spike cooldowns
//! - Fully reproducible runs from a base-36 seed
//!
//! ## Core Modules
//!
//! - [`simulation::genome`] - Genome encoding, reading and mutation
//! - [`simulation::vitals`] - Calorie bookkeeping
//! - [`simulation::body`] - Body factory and spikes
//! - [`simulation::engine`] - Per-frame physics and collisions
//! - [`simulation::world`] - Frame driver that handles spawning

/// Core simulation logic and data structures.
pub mod simulation {
    /// Bodies, spikes and the functions that build them.
    pub mod body;
    /// Hue conversion for genome colour channels.
    pub mod color;
    /// Per-frame motion, collision and metabolism.
    pub mod engine;
    /// Crate error type.
    pub mod error;
    /// Event queue for spike contacts.
    pub mod events;
    /// Byte-string genome codec and mutation.
    pub mod genome;
    /// Trigonometry in turns and other geometric helpers.
    pub mod geometric_utils;
    /// Simulation parameters and derived settings.
    pub mod params;
    /// Seeded deterministic random numbers.
    pub mod prng;
    /// KD-tree neighbour queries.
    pub mod spatial;
    /// Population and lifecycle statistics.
    pub mod stats;
    /// Calorie bookkeeping.
    pub mod vitals;
    /// World driver owning bodies, clock and randomness.
    pub mod world;
}
