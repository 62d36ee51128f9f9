//! Boundary configuration types
//!
//! The simulation consumes these; it never computes them. Level/difficulty
//! tables live with the host (a default campaign ships here for convenience),
//! and ship stats arrive pre-resolved from the shop/upgrade layer.

use serde::{Deserialize, Serialize};

/// Difficulty setting selected by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                enemy_speed: 0.7,
                enemy_health: 0.8,
                spawn_interval_scale: 1.25,
                money_rate: 1.5,
                score_rate: 1.2,
                exp_rate: 0.8,
            },
            Difficulty::Normal => DifficultyConfig {
                enemy_speed: 0.9,
                enemy_health: 1.0,
                spawn_interval_scale: 1.0,
                money_rate: 1.0,
                score_rate: 1.0,
                exp_rate: 0.6,
            },
            Difficulty::Hard => DifficultyConfig {
                enemy_speed: 1.1,
                enemy_health: 1.2,
                spawn_interval_scale: 0.8,
                money_rate: 0.8,
                score_rate: 0.8,
                exp_rate: 0.4,
            },
        }
    }
}

/// Multiplicative scalars applied to spawn timing and rewards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub enemy_speed: f32,
    pub enemy_health: f32,
    /// Scales the level's spawn interval (larger = slower spawns)
    pub spawn_interval_scale: f32,
    pub money_rate: f32,
    pub score_rate: f32,
    pub exp_rate: f32,
}

/// Boss special attack repertoire (one per boss)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAttack {
    ChargeBeam,
    Barrage,
    SummonMinions,
    ScatterShot,
}

/// Per-level boss parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    /// Cosmetic hint for the host renderer
    pub sprite_id: String,
    pub health_multiplier: f32,
    pub speed_multiplier: f32,
    /// Seconds between normal ranged shots
    pub fire_interval: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub special_attack: SpecialAttack,
}

/// Per-level spawner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Seconds between basic-enemy spawns (before the difficulty divisor)
    pub spawn_interval: f32,
    pub enemy_speed_multiplier: f32,
    pub enemy_health_multiplier: f32,
    pub max_enemies_on_screen: usize,
    /// Score quota that ends the open wave
    pub score_to_clear: u64,
    /// Cosmetic sprite pool for basic enemies
    pub enemy_sprites: Vec<String>,
    /// Missing boss config degrades to an immediate level-clear
    pub boss: Option<BossConfig>,
}

impl LevelConfig {
    /// The built-in eight-level campaign
    pub fn campaign() -> Vec<LevelConfig> {
        let level = |spawn_interval: f32,
                     speed: f32,
                     health: f32,
                     cap: usize,
                     quota: u64,
                     sprites: &[&str],
                     boss: BossConfig| {
            LevelConfig {
                spawn_interval,
                enemy_speed_multiplier: speed,
                enemy_health_multiplier: health,
                max_enemies_on_screen: cap,
                score_to_clear: quota,
                enemy_sprites: sprites.iter().map(|s| s.to_string()).collect(),
                boss: Some(boss),
            }
        };
        let boss = |n: u32,
                    health_mult: f32,
                    speed_mult: f32,
                    fire_interval: f32,
                    proj_speed: f32,
                    proj_damage: f32,
                    special: SpecialAttack| {
            BossConfig {
                sprite_id: format!("boss{n}"),
                health_multiplier: health_mult,
                speed_multiplier: speed_mult,
                fire_interval,
                projectile_speed: proj_speed,
                projectile_damage: proj_damage,
                special_attack: special,
            }
        };

        vec![
            level(2.2, 1.0, 0.5, 10, 100, &["monster1"],
                boss(1, 1.0, 1.0, 2.0, 150.0, 10.0, SpecialAttack::ScatterShot)),
            level(2.1, 1.0, 1.1, 12, 200, &["monster1", "monster2"],
                boss(2, 2.0, 1.0, 1.8, 160.0, 12.0, SpecialAttack::SummonMinions)),
            level(2.0, 1.1, 1.1, 14, 300, &["monster1", "monster2", "monster3"],
                boss(3, 5.0, 1.1, 1.6, 170.0, 15.0, SpecialAttack::ChargeBeam)),
            level(1.9, 1.1, 1.2, 16, 450, &["monster2", "monster3", "monster4"],
                boss(4, 6.0, 1.1, 1.5, 180.0, 18.0, SpecialAttack::Barrage)),
            level(1.8, 1.2, 1.2, 18, 600, &["monster3", "monster4", "monster5"],
                boss(5, 10.0, 1.2, 1.4, 190.0, 20.0, SpecialAttack::SummonMinions)),
            level(1.7, 1.2, 1.3, 20, 750, &["monster4", "monster5", "monster6"],
                boss(6, 11.0, 1.2, 1.3, 200.0, 22.0, SpecialAttack::ScatterShot)),
            level(1.6, 1.3, 1.3, 22, 900, &["monster5", "monster6", "monster7"],
                boss(7, 13.0, 1.3, 1.2, 210.0, 25.0, SpecialAttack::Barrage)),
            level(1.5, 1.3, 1.4, 24, 1100, &["monster1", "monster3", "monster5", "monster7"],
                boss(8, 12.0, 1.3, 1.1, 220.0, 30.0, SpecialAttack::ChargeBeam)),
        ]
    }
}

/// Ship special ability, resolved by the shop/upgrade layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShipAbility {
    #[default]
    None,
    /// 2x speed and invincibility for 1.5s
    Dash,
    /// Stun all non-boss enemies for 2s
    EmpBlast,
    /// +2 projectiles for 5s
    DroneCompanion,
    /// Instantly restore 30 base health
    ShieldRecharge,
    /// Enemy speed multiplier x0.3 for 3s
    TimeWarp,
    /// Kill all basic enemies, 200 damage to the boss
    MegaBomb,
}

impl ShipAbility {
    pub fn cooldown(self) -> f32 {
        match self {
            ShipAbility::None => 0.0,
            ShipAbility::Dash => 5.0,
            ShipAbility::EmpBlast => 10.0,
            ShipAbility::DroneCompanion => 15.0,
            ShipAbility::ShieldRecharge => 20.0,
            ShipAbility::TimeWarp => 18.0,
            ShipAbility::MegaBomb => 25.0,
        }
    }

    /// Active window for timed abilities (instant abilities return 0)
    pub fn duration(self) -> f32 {
        match self {
            ShipAbility::Dash => 1.5,
            ShipAbility::EmpBlast => 2.0,
            ShipAbility::DroneCompanion => 5.0,
            ShipAbility::TimeWarp => 3.0,
            _ => 0.0,
        }
    }
}

/// Resolved combat stats for the equipped ship (base stats + upgrade levels,
/// computed by the external shop layer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub damage: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    pub projectile_speed: f32,
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_count: u32,
    pub move_speed: f32,
    pub max_health: f32,
    pub ability: ShipAbility,
}

impl Default for ShipStats {
    /// The starter ship, no upgrades
    fn default() -> Self {
        Self {
            damage: 1.0,
            fire_interval: 0.2,
            projectile_speed: 400.0,
            projectile_width: 5.0,
            projectile_height: 10.0,
            projectile_count: 1,
            move_speed: 200.0,
            max_health: 100.0,
            ability: ShipAbility::None,
        }
    }
}
