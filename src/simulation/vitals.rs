//! Calorie bookkeeping for a single body.
//!
//! Vitals are updated in place. Every change to `calories` goes through a
//! method that recomputes `is_dead`, so the flag always equals
//! `calories < dies_at`.

use super::params::Settings;

/// Energy state owned by one body.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    /// Current energy, never negative.
    pub calories: f64,
    /// Calories burned per second.
    pub upkeep: f64,
    /// Calorie floor; below it the body is dead.
    pub dies_at: f64,
    /// Calorie ceiling; at or above it the body reproduces.
    pub spawns_at: f64,
    is_dead: bool,
}

impl Vitals {
    /// Starting vitals for an organism of the given mass and spikes.
    ///
    /// Upkeep is
    /// `floor((mass_cost + spike_cost) * mass^-exponent * temperature)`, so
    /// larger bodies pay less per unit of mass.
    pub fn new(mass: f64, spike_lengths: &[f64], settings: &Settings) -> Self {
        let params = &settings.params;

        let dies_at = (mass * params.percent_dies_at).floor();
        let spawns_at = (mass * params.percent_spawns_at).floor();
        let midpoint = (params.percent_dies_at + params.percent_spawns_at) / 2.0;
        let calories = (mass * midpoint).floor().max(0.0);

        let mass_cost = mass * params.upkeep_per_mass;
        let spike_cost = (spike_lengths.len() as f64 * params.upkeep_per_spike)
            .powf(params.spike_count_exponent)
            + spike_lengths.iter().sum::<f64>();
        let mass_adjustment = mass.powf(-params.mass_calorie_exponent);
        let upkeep =
            ((mass_cost + spike_cost) * mass_adjustment * settings.temperature_adjustment).floor();

        Self::from_parts(calories, upkeep.max(0.0), dies_at, spawns_at)
    }

    /// Vitals for a mote: no upkeep and no reproduction.
    pub fn mote(mass: f64, settings: &Settings) -> Self {
        let params = &settings.params;
        let midpoint = (params.percent_dies_at + params.percent_spawns_at) / 2.0;
        let calories = (mass * midpoint).floor().max(1.0);

        Self::from_parts(calories, 0.0, 1.0, f64::INFINITY)
    }

    /// Builds vitals from explicit values.
    pub fn from_parts(calories: f64, upkeep: f64, dies_at: f64, spawns_at: f64) -> Self {
        let calories = calories.max(0.0);
        Self {
            calories,
            upkeep,
            dies_at,
            spawns_at,
            is_dead: calories < dies_at,
        }
    }

    /// Whether calories have fallen below the death threshold.
    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Whether the body has enough calories to reproduce.
    pub fn can_spawn(&self) -> bool {
        !self.is_dead && self.calories >= self.spawns_at
    }

    /// Removes up to `amount` calories and returns how many were removed.
    ///
    /// Never leaves calories negative. Negative amounts drain nothing.
    pub fn drain(&mut self, amount: f64) -> f64 {
        let drained = amount.max(0.0).min(self.calories);
        self.set_calories(self.calories - drained);
        drained
    }

    /// Adds calories, typically ones drained from a victim.
    pub fn feed(&mut self, amount: f64) {
        self.set_calories(self.calories + amount.max(0.0));
    }

    /// Replaces the calorie count.
    pub fn set_calories(&mut self, calories: f64) {
        self.calories = calories.max(0.0);
        self.is_dead = self.calories < self.dies_at;
    }
}
