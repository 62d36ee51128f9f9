//! Nova Strike - a base-defense arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: the combat simulation (entities, boss AI, collision, tick loop)
//! - `save`: persisted progress types the host round-trips through storage
//!
//! Rendering, menus, audio and storage are host concerns. The simulation is
//! fully computable from rectangles and numbers; sprite ids carried by
//! entities are cosmetic hints for the host and never affect gameplay.

pub mod save;
pub mod sim;

pub use save::Progress;
pub use sim::{SimulationState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Suggested fixed timestep for hosts (the sim itself is delta-driven)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (logical pixels)
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;

    /// Base (the structure being defended) footprint
    pub const BASE_WIDTH: f32 = 480.0;
    pub const BASE_HEIGHT: f32 = 180.0;
    pub const BASE_MAX_HEALTH: f32 = 100.0;
    /// Damage to the base when an enemy reaches it
    pub const BASE_HIT_DAMAGE: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 60.0;
    pub const INVINCIBILITY_DURATION: f32 = 1.5;

    /// Basic enemy defaults
    pub const ENEMY_SIZE: f32 = 80.0;
    pub const ENEMY_BASE_SPEED_MIN: f32 = 80.0;
    pub const ENEMY_BASE_SPEED_SPAN: f32 = 40.0;
    pub const ENEMY_BASE_HEALTH: f32 = 3.0;
    /// Contact damage to the player from a basic enemy
    pub const ENEMY_CONTACT_DAMAGE: f32 = 20.0;
    /// Chance a basic enemy spawns with an elite ability
    pub const ELITE_CHANCE: f64 = 0.2;

    /// Per-kill base rewards, scaled by the difficulty rate multipliers
    pub const KILL_SCORE: f32 = 10.0;
    pub const KILL_MONEY: f32 = 5.0;
    pub const KILL_EXP: f32 = 10.0;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 40.0;
    pub const POWERUP_FALL_SPEED: f32 = 100.0;
    pub const POWERUP_DROP_CHANCE: f64 = 0.3;
    pub const POWERUP_DURATION: f32 = 5.0;
    pub const SLOW_FACTOR: f32 = 0.5;

    /// Player-placed bomb detonation
    pub const BOMB_RADIUS: f32 = 250.0;
    pub const BOMB_BOSS_DAMAGE: f32 = 200.0;
}
