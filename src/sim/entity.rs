//! Core combat entities: projectiles, power-ups, explosions, player, base
//!
//! Entities are plain serializable structs with an `active` flag. The tick
//! loop flips the flag instead of removing mid-iteration and sweeps inactive
//! entities afterwards with `retain`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::sim::collision::Rect;

/// Who fired a projectile (decides which collision pass consumes it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerKind {
    Player,
    Enemy,
    Boss,
}

/// Beam lifecycle sub-phases. Damage applies only while `Firing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamPhase {
    Charging,
    Firing,
    Fading,
}

/// Extra state for a charge-beam projectile. The beam tracks its owning boss
/// by entity id; the tick loop repositions it under the boss each frame and
/// kills it when the boss dies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub owner_id: u32,
    pub phase: BeamPhase,
    pub phase_timer: f32,
}

pub const BEAM_CHARGE_TIME: f32 = 0.4;
pub const BEAM_FIRE_TIME: f32 = 1.0;
pub const BEAM_FADE_TIME: f32 = 0.3;

impl Beam {
    pub fn new(owner_id: u32) -> Self {
        Self {
            owner_id,
            phase: BeamPhase::Charging,
            phase_timer: BEAM_CHARGE_TIME,
        }
    }

    /// Advance the sub-phase clock. Returns false once the fade runs out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.phase_timer -= dt;
        if self.phase_timer > 0.0 {
            return true;
        }
        match self.phase {
            BeamPhase::Charging => {
                self.phase = BeamPhase::Firing;
                self.phase_timer = BEAM_FIRE_TIME;
                true
            }
            BeamPhase::Firing => {
                self.phase = BeamPhase::Fading;
                self.phase_timer = BEAM_FADE_TIME;
                true
            }
            BeamPhase::Fading => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub rect: Rect,
    pub vel: Vec2,
    pub damage: f32,
    pub owner: OwnerKind,
    /// Some for self-expiring projectiles (unused by straight shots)
    pub lifetime: Option<f32>,
    /// Some for charge beams; beams are not consumed on hit
    pub beam: Option<Beam>,
    pub active: bool,
}

impl Projectile {
    /// A straight-up player shot
    pub fn player_shot(rect: Rect, speed: f32, damage: f32) -> Self {
        Self {
            rect,
            vel: Vec2::new(0.0, -speed),
            damage,
            owner: OwnerKind::Player,
            lifetime: None,
            beam: None,
            active: true,
        }
    }

    /// A hostile shot with an arbitrary velocity
    pub fn hostile(rect: Rect, vel: Vec2, damage: f32, owner: OwnerKind) -> Self {
        Self {
            rect,
            vel,
            damage,
            owner,
            lifetime: None,
            beam: None,
            active: true,
        }
    }

    /// The charge-beam special. Zero velocity; the boss block repositions it.
    pub fn beam(rect: Rect, damage: f32, owner_id: u32) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            damage,
            owner: OwnerKind::Boss,
            lifetime: None,
            beam: Some(Beam::new(owner_id)),
            active: true,
        }
    }

    /// Whether a player overlap should hurt right now
    pub fn deals_damage(&self) -> bool {
        match self.beam {
            None => true,
            Some(beam) => beam.phase == BeamPhase::Firing,
        }
    }

    /// Move, expire, and cull against the playfield bounds
    pub fn update(&mut self, dt: f32, field_w: f32, field_h: f32) {
        if let Some(beam) = &mut self.beam {
            if !beam.update(dt) {
                self.active = false;
            }
            return;
        }
        self.rect.x += self.vel.x * dt;
        self.rect.y += self.vel.y * dt;
        if let Some(life) = &mut self.lifetime {
            *life -= dt;
            if *life <= 0.0 {
                self.active = false;
            }
        }
        if self.rect.off_playfield(field_w, field_h) {
            self.active = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    FireRate,
    Money,
    Heal,
    Bomb,
    SlowEnemies,
}

/// A falling pickup dropped by a killed enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub active: bool,
}

impl PowerUp {
    pub fn new(center: Vec2, kind: PowerUpKind) -> Self {
        let s = consts::POWERUP_SIZE;
        Self {
            rect: Rect::new(center.x - s / 2.0, center.y - s / 2.0, s, s),
            kind,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32, field_h: f32) {
        self.rect.y += consts::POWERUP_FALL_SPEED * dt;
        if self.rect.y > field_h {
            self.active = false;
        }
    }
}

/// Cosmetic blast marker. Purely visual; damage is applied at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub active: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, max_radius: f32) -> Self {
        Self {
            pos,
            radius: 0.0,
            max_radius,
            elapsed: 0.0,
            duration: 0.4,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
        } else {
            self.radius = self.max_radius * (self.elapsed / self.duration);
        }
    }
}

/// The player ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub invincibility_timer: f32,
}

impl Player {
    pub fn new(field_w: f32, field_h: f32, speed: f32, max_health: f32) -> Self {
        let s = consts::PLAYER_SIZE;
        Self {
            rect: Rect::new(
                field_w / 2.0 - s / 2.0,
                field_h - consts::BASE_HEIGHT - s - 10.0,
                s,
                s,
            ),
            speed,
            health: max_health,
            max_health,
            invincibility_timer: 0.0,
        }
    }

    pub fn invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }

    /// Apply directional input, clamped to the playfield above the base
    pub fn step(&mut self, dir: Vec2, dt: f32, field_w: f32, field_h: f32) {
        self.rect.x += dir.x * self.speed * dt;
        self.rect.y += dir.y * self.speed * dt;
        self.rect.x = self.rect.x.clamp(0.0, field_w - self.rect.w);
        let floor = field_h - consts::BASE_HEIGHT - self.rect.h;
        self.rect.y = self.rect.y.clamp(0.0, floor);
    }

    /// External displacement (gravity wells), same clamping as `step`
    pub fn translate_clamped(&mut self, delta: Vec2, field_w: f32, field_h: f32) {
        self.rect.x = (self.rect.x + delta.x).clamp(0.0, field_w - self.rect.w);
        let floor = field_h - consts::BASE_HEIGHT - self.rect.h;
        self.rect.y = (self.rect.y + delta.y).clamp(0.0, floor);
    }

    /// Damage unless shielded; starts the grace window on a real hit
    pub fn hit(&mut self, damage: f32) -> bool {
        if self.invincible() {
            return false;
        }
        self.health -= damage;
        self.invincibility_timer = consts::INVINCIBILITY_DURATION;
        true
    }
}

/// The structure being defended at the bottom of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub rect: Rect,
    pub health: f32,
    pub max_health: f32,
}

impl Base {
    pub fn new(field_w: f32, field_h: f32) -> Self {
        Self {
            rect: Rect::new(
                field_w / 2.0 - consts::BASE_WIDTH / 2.0,
                field_h - consts::BASE_HEIGHT,
                consts::BASE_WIDTH,
                consts::BASE_HEIGHT,
            ),
            health: consts::BASE_MAX_HEALTH,
            max_health: consts::BASE_MAX_HEALTH,
        }
    }
}
