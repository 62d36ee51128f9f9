//! Persisted player progress
//!
//! The simulation never touches storage. The host serializes `Progress`
//! wherever it likes (localStorage in a browser, a file natively) and
//! hands it back next session.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::sim::config::Difficulty;
use crate::sim::state::{SimPhase, SimulationState};

/// Purchased upgrade tiers for one ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpgradeLevels {
    pub damage: u32,
    pub fire_rate: u32,
    pub health: u32,
    pub speed: u32,
}

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub score: u64,
    pub money: u64,
    pub experience: u64,
    pub current_level: u32,
    pub completed_levels: BTreeSet<u32>,
    /// Base health carried between levels of a campaign run
    pub base_health: f32,
    pub current_ship: String,
    pub owned_ships: BTreeSet<String>,
    /// Remaining hull per ship, keyed by ship id
    pub ship_health: BTreeMap<String, f32>,
    /// Upgrade tiers keyed by ship id
    pub upgrades: BTreeMap<String, UpgradeLevels>,
    pub difficulty: Difficulty,
    pub achievements: BTreeSet<String>,
}

impl Default for Progress {
    fn default() -> Self {
        let starter = "ship1".to_string();
        Self {
            score: 0,
            money: 0,
            experience: 0,
            current_level: 1,
            completed_levels: BTreeSet::new(),
            base_health: 100.0,
            current_ship: starter.clone(),
            owned_ships: BTreeSet::from([starter]),
            ship_health: BTreeMap::new(),
            upgrades: BTreeMap::new(),
            difficulty: Difficulty::default(),
            achievements: BTreeSet::new(),
        }
    }
}

impl Progress {
    /// Fold a finished run's earnings in. Currency is kept even on a loss;
    /// the level only unlocks on a clear.
    pub fn bank_run(&mut self, state: &SimulationState) {
        self.score += state.score;
        self.money += state.money;
        self.experience += state.experience;
        if state.phase == SimPhase::LevelCleared {
            self.completed_levels.insert(state.level_number);
            self.current_level = self.current_level.max(state.level_number + 1);
            // Damage carries forward within a campaign run
            self.base_health = state.base.health;
            self.ship_health
                .insert(self.current_ship.clone(), state.player.health);
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::{LevelConfig, ShipStats};

    #[test]
    fn test_json_round_trip() {
        let mut progress = Progress::default();
        progress.money = 420;
        progress.completed_levels.insert(1);
        progress.upgrades.insert(
            "ship1".to_string(),
            UpgradeLevels { damage: 2, fire_rate: 1, health: 0, speed: 3 },
        );
        progress.achievements.insert("first_blood".to_string());

        let json = progress.to_json().unwrap();
        assert_eq!(Progress::from_json(&json).unwrap(), progress);
    }

    #[test]
    fn test_bank_run_keeps_currency_on_loss() {
        let level = LevelConfig::campaign().remove(0);
        let mut state =
            SimulationState::new(1, level, Difficulty::Normal, ShipStats::default(), 3);
        state.score = 50;
        state.money = 25;
        state.phase = SimPhase::GameOver(crate::sim::state::GameOverReason::BaseDestroyed);

        let mut progress = Progress::default();
        progress.bank_run(&state);
        assert_eq!(progress.money, 25);
        assert!(progress.completed_levels.is_empty());
        assert_eq!(progress.current_level, 1);
    }

    #[test]
    fn test_bank_run_unlocks_next_level_on_clear() {
        let level = LevelConfig::campaign().remove(0);
        let mut state =
            SimulationState::new(1, level, Difficulty::Normal, ShipStats::default(), 3);
        state.phase = SimPhase::LevelCleared;

        let mut progress = Progress::default();
        progress.bank_run(&state);
        assert!(progress.completed_levels.contains(&1));
        assert_eq!(progress.current_level, 2);
    }
}
