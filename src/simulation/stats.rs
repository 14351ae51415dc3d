use std::collections::VecDeque;

/// Running tallies kept by the world driver.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldStats {
    /// Offspring created by reproduction.
    pub births: u64,
    /// Bodies removed after dying, motes included.
    pub deaths: u64,
    /// Motes added after the world was created.
    pub motes_spawned: u64,
    /// Random organisms added to keep the population up.
    pub random_spawns: u64,
    /// Recent organism counts, oldest first
    pub population_history: VecDeque<usize>,
    /// Maximum number of recent counts to keep
    pub max_history: usize,
}

impl Default for WorldStats {
    fn default() -> Self {
        Self {
            births: 0,
            deaths: 0,
            motes_spawned: 0,
            random_spawns: 0,
            population_history: VecDeque::new(),
            max_history: 600, // ten seconds of frames at 60 fps
        }
    }
}

impl WorldStats {
    /// Record the organism count at the end of a frame
    pub fn record_population(&mut self, organisms: usize) {
        self.population_history.push_back(organisms);
        if self.population_history.len() > self.max_history {
            self.population_history.pop_front();
        }
    }

    /// Average organism count over the recorded history
    pub fn avg_population(&self) -> f64 {
        if self.population_history.is_empty() {
            0.0
        } else {
            self.population_history.iter().sum::<usize>() as f64
                / self.population_history.len() as f64
        }
    }

    /// Largest organism count in the recorded history
    pub fn peak_population(&self) -> usize {
        self.population_history.iter().copied().max().unwrap_or(0)
    }
}
