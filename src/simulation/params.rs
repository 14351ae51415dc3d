//! Simulation parameters and the settings derived from them.
//!
//! [`Params`] is the raw, serializable configuration. [`Settings`] is an
//! immutable snapshot built from it that also carries every derived value.
//! Changing configuration means building a new [`Settings`].

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::genome::GeneType;

/// Upper bound applied to repeat probabilities so geometric repeats end.
pub const MAX_REPEAT_CHANCE: f64 = 0.95;

/// Simulation parameters that control body behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Arena width in pixels.
    pub width: f64,
    /// Arena height in pixels.
    pub height: f64,
    /// Smallest radius any organism can have.
    pub min_radius: f64,

    /// Mean number of genes in a fresh genome.
    pub average_gene_count: u32,
    /// Mean number of body bytes per gene in a fresh genome.
    pub average_gene_size: u32,
    /// Odds of a fresh gene controlling size.
    pub size_gene_odds: f64,
    /// Odds of a fresh gene growing a spike.
    pub spike_gene_odds: f64,
    /// Odds of a fresh gene adding red.
    pub red_gene_odds: f64,
    /// Odds of a fresh gene adding green.
    pub green_gene_odds: f64,
    /// Odds of a fresh gene adding blue.
    pub blue_gene_odds: f64,
    /// Set bits needed per pixel of area.
    pub bits_per_mass: f64,
    /// Set bits needed per pixel of spike length.
    pub bits_per_spike_length: f64,

    /// Scales every mutation probability.
    pub volatility: f64,
    /// Chance of each bit flipping.
    pub chance_mutate_bit: f64,
    /// Chance of each byte being dropped.
    pub chance_drop_byte: f64,
    /// Chance of each byte being repeated (re-rolled per copy).
    pub chance_repeat_byte: f64,
    /// Chance of each byte moving to a random position.
    pub chance_transpose_byte: f64,
    /// Chance of each gene being dropped.
    pub chance_drop_gene: f64,
    /// Chance of each gene being repeated (re-rolled per copy).
    pub chance_repeat_gene: f64,
    /// Chance of each gene moving to a random position.
    pub chance_transpose_gene: f64,

    /// Calories per unit mass below which a body dies.
    pub percent_dies_at: f64,
    /// Calories per unit mass at which a body reproduces.
    pub percent_spawns_at: f64,
    /// Upkeep calories per unit mass.
    pub upkeep_per_mass: f64,
    /// Upkeep calories per spike, before the count exponent.
    pub upkeep_per_spike: f64,
    /// Exponent applied to the spike upkeep.
    pub spike_count_exponent: f64,
    /// Economy-of-scale exponent: upkeep is scaled by `mass^-exponent`.
    pub mass_calorie_exponent: f64,
    /// Ambient temperature. Scales upkeep and spike drain linearly.
    pub temperature: f64,

    /// Half the width of a spike's base.
    pub spike_half_width: f64,
    /// Calories per second drained by a spike of length one.
    pub base_spike_drain: f64,
    /// Exponent dividing drain by spike length.
    pub drain_length_quotient: f64,
    /// Milliseconds a spike stays inactive after draining.
    pub spike_cooldown: f64,

    /// Largest kinetic energy per unit mass for a random body.
    pub max_energy_per_mass: f64,
    /// Kinetic energy budget for an offspring's launch.
    pub spawning_energy: f64,

    /// Radius of every mote.
    pub mote_radius: f64,
    /// Motes added per second.
    pub motes_rate: f64,
    /// Largest mote speed in pixels per second.
    pub mote_max_speed: f64,
    /// Hard cap on live motes.
    pub max_motes: usize,

    /// Random organisms created with a new world.
    pub initial_bodies: usize,
    /// Organism count below which random bodies are added.
    pub min_bodies: usize,
    /// Motes created with a new world.
    pub initial_motes: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            min_radius: 4.0,

            average_gene_count: 8,
            average_gene_size: 4,
            size_gene_odds: 0.3,
            spike_gene_odds: 0.25,
            red_gene_odds: 0.15,
            green_gene_odds: 0.15,
            blue_gene_odds: 0.15,
            bits_per_mass: 0.05,
            bits_per_spike_length: 1.0,

            volatility: 1.0,
            chance_mutate_bit: 0.002,
            chance_drop_byte: 0.005,
            chance_repeat_byte: 0.005,
            chance_transpose_byte: 0.002,
            chance_drop_gene: 0.02,
            chance_repeat_gene: 0.02,
            chance_transpose_gene: 0.02,

            percent_dies_at: 0.5,
            percent_spawns_at: 1.5,
            upkeep_per_mass: 0.1,
            upkeep_per_spike: 5.0,
            spike_count_exponent: 1.5,
            mass_calorie_exponent: 0.25,
            temperature: 1.0,

            spike_half_width: 2.0,
            base_spike_drain: 320.0,
            drain_length_quotient: 0.5,
            spike_cooldown: 100.0,

            max_energy_per_mass: 200.0,
            spawning_energy: 20_000.0,

            mote_radius: 3.0,
            motes_rate: 2.0,
            mote_max_speed: 10.0,
            max_motes: 300,

            initial_bodies: 40,
            min_bodies: 10,
            initial_motes: 50,
        }
    }
}

impl Params {
    /// Loads parameters from a JSON file. Missing fields take defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params = serde_json::from_str(&json)?;
        Ok(params)
    }

    /// Saves parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Cumulative probability entry for picking a gene's control byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneThreshold {
    /// Rolls below this value (and above the previous entry) pick `gene`.
    pub threshold: f64,
    /// Gene type selected.
    pub gene: GeneType,
}

/// Volatility-scaled mutation probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRates {
    /// Per bit.
    pub mutate_bit: f64,
    /// Per byte.
    pub drop_byte: f64,
    /// Per byte copy.
    pub repeat_byte: f64,
    /// Per byte.
    pub transpose_byte: f64,
    /// Per gene.
    pub drop_gene: f64,
    /// Per gene copy.
    pub repeat_gene: f64,
    /// Per gene.
    pub transpose_gene: f64,
}

impl MutationRates {
    fn scaled(params: &Params) -> Self {
        let rate = |chance: f64| (chance * params.volatility).clamp(0.0, 1.0);
        let repeat = |chance: f64| rate(chance).min(MAX_REPEAT_CHANCE);

        Self {
            mutate_bit: rate(params.chance_mutate_bit),
            drop_byte: rate(params.chance_drop_byte),
            repeat_byte: repeat(params.chance_repeat_byte),
            transpose_byte: rate(params.chance_transpose_byte),
            drop_gene: rate(params.chance_drop_gene),
            repeat_gene: repeat(params.chance_repeat_gene),
            transpose_gene: rate(params.chance_transpose_gene),
        }
    }
}

/// Immutable configuration snapshot handed to every simulation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Raw parameters this snapshot was built from.
    pub params: Params,
    /// Mass of an organism with no size genes.
    pub min_mass: f64,
    /// Largest gene count of a fresh genome.
    pub max_gene_count: u32,
    /// Largest gene body of a fresh genome.
    pub max_gene_size: u32,
    /// Cumulative control-byte odds, ascending.
    pub gene_thresholds: Vec<GeneThreshold>,
    /// Mutation probabilities after volatility.
    pub mutation: MutationRates,
    /// Multiplier for upkeep and drain, never negative.
    pub temperature_adjustment: f64,
    /// Top speed of a random organism.
    pub max_body_speed: f64,
    /// Mass of every mote.
    pub mote_mass: f64,
}

impl Settings {
    /// Derives a settings snapshot from raw parameters.
    pub fn new(params: Params) -> Self {
        let odds = [
            (GeneType::Size, params.size_gene_odds),
            (GeneType::Spike, params.spike_gene_odds),
            (GeneType::Red, params.red_gene_odds),
            (GeneType::Green, params.green_gene_odds),
            (GeneType::Blue, params.blue_gene_odds),
        ];

        let mut cumulative = 0.0;
        let gene_thresholds = odds
            .into_iter()
            .map(|(gene, chance)| {
                cumulative += chance.max(0.0);
                GeneThreshold {
                    threshold: cumulative,
                    gene,
                }
            })
            .collect();

        Self {
            min_mass: (PI * params.min_radius.powi(2)).floor(),
            max_gene_count: spread_max(params.average_gene_count),
            max_gene_size: spread_max(params.average_gene_size),
            gene_thresholds,
            mutation: MutationRates::scaled(&params),
            temperature_adjustment: params.temperature.max(0.0),
            max_body_speed: (2.0 * params.max_energy_per_mass.max(0.0)).sqrt(),
            mote_mass: (PI * params.mote_radius.powi(2)).floor(),
            params,
        }
    }

    /// Picks the gene type for a roll in `[0, 1)`.
    ///
    /// Falls back to the last entry when float rounding leaves the table
    /// total just under one.
    pub fn pick_gene(&self, roll: f64) -> GeneType {
        self.gene_thresholds
            .iter()
            .find(|entry| entry.threshold > roll)
            .or_else(|| self.gene_thresholds.last())
            .map_or(GeneType::Size, |entry| entry.gene)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

/// Largest value of a uniform `1..=max` draw whose mean is `average`.
fn spread_max(average: u32) -> u32 {
    average.saturating_mul(2).saturating_sub(1).max(1)
}
