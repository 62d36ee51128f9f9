//! The combat simulation
//!
//! Everything here is deterministic: build a `SimulationState` from a level
//! config, a difficulty, ship stats and a seed, then call [`tick`] with
//! sampled inputs at whatever rate the host runs. The host reads entity
//! rectangles for drawing and drains [`Outcome`] events for sound and UI.

pub mod boss;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod state;
pub mod tick;

pub use boss::{BossCore, BossMotion, SpecialState};
pub use collision::Rect;
pub use config::{
    BossConfig, Difficulty, DifficultyConfig, LevelConfig, ShipAbility, ShipStats, SpecialAttack,
};
pub use enemy::{AbilityKind, Enemy, MonsterAbility};
pub use entity::{
    Base, Beam, BeamPhase, Explosion, OwnerKind, Player, PowerUp, PowerUpKind, Projectile,
};
pub use state::{
    ActiveEffects, GameOverReason, KillReward, Outcome, SimPhase, SimulationState,
};
pub use tick::{TickInput, tick};
