//! The full combat state and the outcome events it reports to the host
//!
//! `SimulationState` owns every entity and timer. It is built once per level
//! from boundary configs and a seed; everything that happens afterwards is a
//! pure function of the tick inputs, so replaying the same inputs with the
//! same seed reproduces the run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::sim::config::{Difficulty, DifficultyConfig, LevelConfig, ShipStats};
use crate::sim::enemy::{AbilityKind, Enemy, MonsterAbility};
use crate::sim::entity::{Base, Explosion, Player, PowerUp, Projectile};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    BaseDestroyed,
    PlayerDestroyed,
}

/// Which stage of the level the simulation is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Open wave combat against the spawner
    Wave,
    BossFight,
    /// Terminal: the level is won
    LevelCleared,
    /// Terminal: the run is lost
    GameOver(GameOverReason),
}

impl SimPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SimPhase::LevelCleared | SimPhase::GameOver(_))
    }
}

/// Currency granted for one kill, already difficulty-scaled and rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillReward {
    pub score: u64,
    pub money: u64,
    pub experience: u64,
}

/// Things the host may want to react to (sound, UI, screen shake).
/// Drained by `SimulationState::take_events` after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    EnemyKilled { reward: KillReward },
    BaseDamaged { remaining: f32 },
    PlayerDamaged { remaining: f32 },
    PowerUpCollected,
    BombDetonated,
    BossArrived,
    BossPhaseTwo,
    BossDefeated,
    LevelCleared,
    GameOver { reason: GameOverReason },
}

/// A timed stat override that must restore the exact original on expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatOverride {
    pub timer: f32,
    pub original: f32,
}

/// Drone companion window, restoring the pre-boost shot count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneBoost {
    pub timer: f32,
    pub original: u32,
}

/// Live timed effects from power-ups and ship abilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActiveEffects {
    /// Fire-rate power-up, holds the pre-boost fire interval
    pub fire_rate: Option<StatOverride>,
    /// Slow power-up window
    pub slow: Option<f32>,
    /// Dash ability, holds the pre-dash move speed
    pub dash: Option<StatOverride>,
    /// Time-warp ability window
    pub time_warp: Option<f32>,
    /// Drone companion, holds the pre-drone projectile count
    pub drone: Option<DroneBoost>,
}

impl ActiveEffects {
    /// Combined multiplier on enemy descent speed
    pub fn enemy_speed_factor(&self) -> f32 {
        let mut f = 1.0;
        if self.slow.is_some() {
            f *= consts::SLOW_FACTOR;
        }
        if self.time_warp.is_some() {
            f *= 0.3;
        }
        f
    }
}

pub struct SimulationState {
    pub level_number: u32,
    pub level: LevelConfig,
    pub difficulty: DifficultyConfig,
    /// Live stats; timed effects mutate these and restore the originals
    pub stats: ShipStats,
    pub phase: SimPhase,
    pub player: Player,
    pub base: Base,
    /// The boss is a singleton, kept out of the wave list
    pub boss: Option<Enemy>,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub effects: ActiveEffects,
    pub score: u64,
    pub money: u64,
    pub experience: u64,
    pub spawn_timer: f32,
    pub fire_cooldown: f32,
    pub ability_cooldown: f32,
    /// Bomb pickups held, waiting for a placement input
    pub bombs_held: u32,
    pub rng: Pcg32,
    pub next_id: u32,
    events: Vec<Outcome>,
}

impl SimulationState {
    /// `level_number` is 1-based; it scales boss health and pickup payouts.
    pub fn new(
        level_number: u32,
        level: LevelConfig,
        difficulty: Difficulty,
        stats: ShipStats,
        seed: u64,
    ) -> Self {
        let w = consts::PLAYFIELD_WIDTH;
        let h = consts::PLAYFIELD_HEIGHT;
        let difficulty = difficulty.config();
        let spawn_timer = level.spawn_interval * difficulty.spawn_interval_scale;
        Self {
            level_number,
            player: Player::new(w, h, stats.move_speed, stats.max_health),
            base: Base::new(w, h),
            difficulty,
            level,
            stats,
            phase: SimPhase::Wave,
            boss: None,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            effects: ActiveEffects::default(),
            score: 0,
            money: 0,
            experience: 0,
            spawn_timer,
            fire_cooldown: 0.0,
            ability_cooldown: 0.0,
            bombs_held: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            events: Vec::new(),
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: Outcome) {
        self.events.push(event);
    }

    /// Hand the tick's outcome events to the host
    pub fn take_events(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.events)
    }

    /// Seconds between wave spawns for this level and difficulty
    pub fn spawn_interval(&self) -> f32 {
        self.level.spawn_interval * self.difficulty.spawn_interval_scale
    }

    /// Roll one wave enemy at the top of the playfield
    pub fn spawn_wave_enemy(&mut self) {
        let id = self.next_entity_id();
        let x = self
            .rng
            .random_range(0.0..consts::PLAYFIELD_WIDTH - consts::ENEMY_SIZE);
        let speed = (consts::ENEMY_BASE_SPEED_MIN
            + self.rng.random::<f32>() * consts::ENEMY_BASE_SPEED_SPAN)
            * self.level.enemy_speed_multiplier
            * self.difficulty.enemy_speed;
        let health = consts::ENEMY_BASE_HEALTH
            * self.level.enemy_health_multiplier
            * self.difficulty.enemy_health;
        let sprite = if self.level.enemy_sprites.is_empty() {
            "monster1".to_string()
        } else {
            let i = self.rng.random_range(0..self.level.enemy_sprites.len());
            self.level.enemy_sprites[i].clone()
        };
        let mut enemy = Enemy::basic(id, x, speed, health, sprite);
        if self.rng.random_bool(consts::ELITE_CHANCE) {
            let kind = AbilityKind::ALL[self.rng.random_range(0..AbilityKind::ALL.len())];
            enemy.ability = Some(MonsterAbility::new(kind));
        }
        self.enemies.push(enemy);
    }

    /// Rewards for one wave kill, scaled by the difficulty rates
    pub fn kill_reward(&self) -> KillReward {
        KillReward {
            score: (consts::KILL_SCORE * self.difficulty.score_rate).round() as u64,
            money: (consts::KILL_MONEY * self.difficulty.money_rate).round() as u64,
            experience: (consts::KILL_EXP * self.difficulty.exp_rate).round() as u64,
        }
    }

    pub fn grant(&mut self, reward: KillReward) {
        self.score += reward.score;
        self.money += reward.money;
        self.experience += reward.experience;
        self.push_event(Outcome::EnemyKilled { reward });
    }

    pub fn add_explosion(&mut self, pos: Vec2, radius: f32) {
        self.explosions.push(Explosion::new(pos, radius));
    }

    /// Maybe drop a pickup where an enemy died
    pub fn roll_power_up_drop(&mut self, center: Vec2) {
        use crate::sim::entity::PowerUpKind::*;
        if !self.rng.random_bool(consts::POWERUP_DROP_CHANCE) {
            return;
        }
        let kinds = [Shield, FireRate, Money, Heal, Bomb, SlowEnemies];
        let kind = kinds[self.rng.random_range(0..kinds.len())];
        self.power_ups.push(PowerUp::new(center, kind));
    }

    /// The wave quota is met once the score reaches the level target
    pub fn quota_met(&self) -> bool {
        self.score >= self.level.score_to_clear
    }
}
