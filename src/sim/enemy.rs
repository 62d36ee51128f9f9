//! Enemies: basic descenders, elite ability carriers, boss minions
//!
//! One in five basic spawns is an elite carrying a single special ability.
//! Abilities run a small timer machine: ready -> active window -> cooldown
//! (the recharge is 1.5x the base cooldown, so an elite's opener comes
//! faster than its follow-ups).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::sim::boss::BossCore;
use crate::sim::collision::{Rect, within_radius};
use crate::sim::entity::{OwnerKind, PowerUp, PowerUpKind, Projectile};

/// Elite special abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Drags the player toward the enemy while in range
    GravityWell,
    /// Telegraphed charge, then one aimed shot at the player
    PlasmaBurst,
    /// Jumps to a random x when badly hurt
    PanicTeleport,
    /// Lays a playfield-wide hazard line for a moment
    HazardSweep,
    /// Releases a small fast drone
    DroneSpawn,
    /// Halves incoming damage for a window
    ShieldWindow,
    /// Splits off a half-health copy of itself, once
    EchoSpawn,
    /// Sheds a live bomb pickup, once
    HazardDrop,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 8] = [
        AbilityKind::GravityWell,
        AbilityKind::PlasmaBurst,
        AbilityKind::PanicTeleport,
        AbilityKind::HazardSweep,
        AbilityKind::DroneSpawn,
        AbilityKind::ShieldWindow,
        AbilityKind::EchoSpawn,
        AbilityKind::HazardDrop,
    ];

    fn cooldown(self) -> f32 {
        match self {
            AbilityKind::GravityWell => 6.0,
            AbilityKind::PlasmaBurst => 4.0,
            AbilityKind::PanicTeleport => 3.0,
            AbilityKind::HazardSweep => 7.0,
            AbilityKind::DroneSpawn => 8.0,
            AbilityKind::ShieldWindow => 6.0,
            AbilityKind::EchoSpawn => 1.0,
            AbilityKind::HazardDrop => 5.0,
        }
    }

    /// Active window; zero means the ability fires instantly on activation
    fn duration(self) -> f32 {
        match self {
            AbilityKind::GravityWell => 2.5,
            AbilityKind::PlasmaBurst => 0.8,
            AbilityKind::ShieldWindow => 2.0,
            AbilityKind::HazardSweep => 1.5,
            _ => 0.0,
        }
    }

    /// EchoSpawn and HazardDrop never repeat on the same enemy
    fn once_per_lifetime(self) -> bool {
        matches!(self, AbilityKind::EchoSpawn | AbilityKind::HazardDrop)
    }
}

const GRAVITY_WELL_RANGE: f32 = 300.0;
const GRAVITY_WELL_STRENGTH: f32 = 24000.0;
const GRAVITY_WELL_MIN_DIST: f32 = 40.0;
const PLASMA_DAMAGE: f32 = 15.0;
const PLASMA_SPEED: f32 = 260.0;
const TELEPORT_HEALTH_FRACTION: f32 = 0.3;
const SWEEP_DAMAGE: f32 = 10.0;
const SWEEP_THICKNESS: f32 = 6.0;
const SWEEP_DRIFT: f32 = 40.0;
const DRONE_SIZE: f32 = 40.0;
const DRONE_SPEED: f32 = 140.0;
const DRONE_HEALTH: f32 = 1.0;
const MINION_SIZE: f32 = 60.0;
const MINION_SPEED: f32 = 120.0;
const MINION_HEALTH: f32 = 2.0;
const SMALL_CONTACT_DAMAGE: f32 = 10.0;
const ECHO_OFFSET_X: f32 = 90.0;
const ECHO_HEALTH_FRACTION: f32 = 0.5;

/// Timer machine driving one elite ability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterAbility {
    pub kind: AbilityKind,
    pub cooldown_remaining: f32,
    pub active: bool,
    pub timer: f32,
    /// One-shot guard within the current active window
    pub fired: bool,
    /// Permanent guard for once-per-lifetime abilities
    pub spent: bool,
}

impl MonsterAbility {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown_remaining: kind.cooldown(),
            active: false,
            timer: 0.0,
            fired: false,
            spent: false,
        }
    }
}

/// Outputs of one enemy's ability step, merged into the world by the tick loop
#[derive(Debug, Default)]
pub struct EliteOutput {
    pub projectiles: Vec<Projectile>,
    pub spawned: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Displacement velocity applied to the player this tick
    pub player_pull: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub stun_timer: f32,
    /// Damage to the player on overlap
    pub contact_damage: f32,
    /// Cosmetic hint for the host renderer
    pub sprite_id: String,
    pub boss: Option<BossCore>,
    pub ability: Option<MonsterAbility>,
    /// Id of the enemy this one split from, if any
    pub echo_of: Option<u32>,
    pub active: bool,
}

impl Enemy {
    pub fn basic(id: u32, x: f32, speed: f32, health: f32, sprite_id: String) -> Self {
        let s = consts::ENEMY_SIZE;
        Self {
            id,
            rect: Rect::new(x, -s, s, s),
            speed,
            health,
            max_health: health,
            stun_timer: 0.0,
            contact_damage: consts::ENEMY_CONTACT_DAMAGE,
            sprite_id,
            boss: None,
            ability: None,
            echo_of: None,
            active: true,
        }
    }

    pub fn drone(id: u32, center: Vec2) -> Self {
        Self {
            id,
            rect: Rect::new(
                center.x - DRONE_SIZE / 2.0,
                center.y - DRONE_SIZE / 2.0,
                DRONE_SIZE,
                DRONE_SIZE,
            ),
            speed: DRONE_SPEED,
            health: DRONE_HEALTH,
            max_health: DRONE_HEALTH,
            stun_timer: 0.0,
            contact_damage: SMALL_CONTACT_DAMAGE,
            sprite_id: "drone".to_string(),
            boss: None,
            ability: None,
            echo_of: None,
            active: true,
        }
    }

    /// Boss-summoned minion
    pub fn minion(id: u32, center: Vec2) -> Self {
        Self {
            id,
            rect: Rect::new(
                center.x - MINION_SIZE / 2.0,
                center.y - MINION_SIZE / 2.0,
                MINION_SIZE,
                MINION_SIZE,
            ),
            speed: MINION_SPEED,
            health: MINION_HEALTH,
            max_health: MINION_HEALTH,
            stun_timer: 0.0,
            contact_damage: SMALL_CONTACT_DAMAGE,
            sprite_id: "minion".to_string(),
            boss: None,
            ability: None,
            echo_of: None,
            active: true,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn stunned(&self) -> bool {
        self.stun_timer > 0.0
    }

    /// Incoming damage, attenuated while a shield window is up
    pub fn take_damage(&mut self, damage: f32) {
        let mut damage = damage;
        if let Some(ability) = &self.ability
            && ability.kind == AbilityKind::ShieldWindow
            && ability.active
        {
            damage *= 0.5;
        }
        self.health -= damage;
    }

    /// Straight descent, frozen while stunned
    pub fn step_descent(&mut self, dt: f32, slow_factor: f32) {
        if self.stunned() {
            self.stun_timer -= dt;
            return;
        }
        self.rect.y += self.speed * slow_factor * dt;
    }

    /// Drive the elite ability machine for one tick
    pub fn step_ability<R: rand::Rng>(
        &mut self,
        dt: f32,
        player_rect: &Rect,
        field_w: f32,
        rng: &mut R,
        next_id: &mut u32,
    ) -> EliteOutput {
        let mut out = EliteOutput::default();
        let Some(mut ability) = self.ability else {
            return out;
        };

        if ability.active {
            ability.timer -= dt;
            self.drive_active(&mut ability, player_rect, &mut out);
            if ability.timer <= 0.0 {
                ability.active = false;
                ability.fired = false;
                ability.cooldown_remaining = ability.kind.cooldown() * 1.5;
            }
        } else if ability.cooldown_remaining > 0.0 {
            ability.cooldown_remaining -= dt;
        } else if !ability.spent && self.should_trigger(ability.kind) {
            ability.active = true;
            ability.timer = ability.kind.duration();
            ability.fired = false;
            if ability.kind.once_per_lifetime() {
                ability.spent = true;
            }
            self.fire_instant(&mut ability, field_w, rng, next_id, &mut out);
            if ability.timer <= 0.0 {
                ability.active = false;
                ability.cooldown_remaining = ability.kind.cooldown() * 1.5;
            }
        }

        self.ability = Some(ability);
        out
    }

    fn should_trigger(&self, kind: AbilityKind) -> bool {
        match kind {
            AbilityKind::PanicTeleport => {
                self.health < self.max_health * TELEPORT_HEALTH_FRACTION
            }
            AbilityKind::EchoSpawn => self.health < self.max_health * ECHO_HEALTH_FRACTION,
            _ => true,
        }
    }

    /// Effects of zero-duration abilities, applied at activation
    fn fire_instant<R: rand::Rng>(
        &mut self,
        ability: &mut MonsterAbility,
        field_w: f32,
        rng: &mut R,
        next_id: &mut u32,
        out: &mut EliteOutput,
    ) {
        match ability.kind {
            AbilityKind::PanicTeleport => {
                self.rect.x = rng.random_range(0.0..field_w - self.rect.w);
            }
            AbilityKind::DroneSpawn => {
                let id = *next_id;
                *next_id += 1;
                out.spawned.push(Enemy::drone(id, self.rect.center()));
            }
            AbilityKind::EchoSpawn => {
                let id = *next_id;
                *next_id += 1;
                let mut echo = self.clone();
                echo.id = id;
                echo.rect.x = (echo.rect.x + ECHO_OFFSET_X).min(field_w - echo.rect.w);
                echo.health = self.max_health * ECHO_HEALTH_FRACTION;
                echo.max_health = echo.health;
                echo.echo_of = Some(self.id);
                echo.ability = None;
                echo.active = true;
                out.spawned.push(echo);
            }
            AbilityKind::HazardDrop => {
                out.power_ups
                    .push(PowerUp::new(self.rect.center(), PowerUpKind::Bomb));
            }
            _ => {}
        }
    }

    /// Per-tick effects of windowed abilities
    fn drive_active(
        &mut self,
        ability: &mut MonsterAbility,
        player_rect: &Rect,
        out: &mut EliteOutput,
    ) {
        match ability.kind {
            AbilityKind::GravityWell => {
                let me = self.rect.center();
                let them = player_rect.center();
                if within_radius(me, them, GRAVITY_WELL_RANGE) {
                    let dist = me.distance(them).max(GRAVITY_WELL_MIN_DIST);
                    out.player_pull +=
                        (me - them).normalize_or_zero() * (GRAVITY_WELL_STRENGTH / dist);
                }
            }
            AbilityKind::PlasmaBurst => {
                // Charge telegraph runs the window down; the shot leaves at the end
                if !ability.fired && ability.timer <= 0.0 {
                    ability.fired = true;
                    let from = self.rect.center();
                    let aim = (player_rect.center() - from).normalize_or_zero();
                    out.projectiles.push(Projectile::hostile(
                        Rect::new(from.x - 7.0, from.y - 7.0, 14.0, 14.0),
                        aim * PLASMA_SPEED,
                        PLASMA_DAMAGE,
                        OwnerKind::Enemy,
                    ));
                }
            }
            AbilityKind::HazardSweep => {
                if !ability.fired {
                    ability.fired = true;
                    let y = self.rect.center().y;
                    let mut hazard = Projectile::hostile(
                        Rect::new(
                            0.0,
                            y - SWEEP_THICKNESS / 2.0,
                            crate::consts::PLAYFIELD_WIDTH,
                            SWEEP_THICKNESS,
                        ),
                        Vec2::new(0.0, SWEEP_DRIFT),
                        SWEEP_DAMAGE,
                        OwnerKind::Enemy,
                    );
                    hazard.lifetime = Some(ability.timer);
                    out.projectiles.push(hazard);
                }
            }
            AbilityKind::ShieldWindow => {} // passive, handled in take_damage
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn elite(kind: AbilityKind) -> Enemy {
        let mut e = Enemy::basic(1, 400.0, 100.0, 4.0, "monster1".to_string());
        e.ability = Some(MonsterAbility::new(kind));
        e
    }

    fn run_ability(e: &mut Enemy, seconds: f32) -> EliteOutput {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut next_id = 100;
        let player = Rect::new(600.0, 400.0, 60.0, 60.0);
        let dt = 1.0 / 60.0;
        let mut merged = EliteOutput::default();
        let mut t = 0.0;
        while t < seconds {
            let out = e.step_ability(dt, &player, 1280.0, &mut rng, &mut next_id);
            merged.projectiles.extend(out.projectiles);
            merged.spawned.extend(out.spawned);
            merged.power_ups.extend(out.power_ups);
            merged.player_pull += out.player_pull;
            t += dt;
        }
        merged
    }

    #[test]
    fn test_plasma_burst_fires_one_aimed_shot() {
        let mut e = elite(AbilityKind::PlasmaBurst);
        let out = run_ability(&mut e, 6.0);
        assert_eq!(out.projectiles.len(), 1);
        let p = &out.projectiles[0];
        assert_eq!(p.owner, OwnerKind::Enemy);
        assert!(p.vel.x > 0.0 && p.vel.y > 0.0); // aimed down-right at the player
    }

    #[test]
    fn test_echo_spawn_once_with_half_health() {
        let mut e = elite(AbilityKind::EchoSpawn);
        e.health = 1.0; // below half
        let out = run_ability(&mut e, 10.0);
        assert_eq!(out.spawned.len(), 1);
        let echo = &out.spawned[0];
        assert_eq!(echo.echo_of, Some(1));
        assert_eq!(echo.health, 2.0);
        assert!(echo.ability.is_none());
    }

    #[test]
    fn test_hazard_drop_once() {
        let mut e = elite(AbilityKind::HazardDrop);
        let out = run_ability(&mut e, 30.0);
        assert_eq!(out.power_ups.len(), 1);
        assert_eq!(out.power_ups[0].kind, PowerUpKind::Bomb);
    }

    #[test]
    fn test_shield_window_halves_damage_only_while_active() {
        let mut e = elite(AbilityKind::ShieldWindow);
        e.take_damage(2.0);
        assert_eq!(e.health, 2.0);
        let _ = run_ability(&mut e, AbilityKind::ShieldWindow.cooldown() + 0.1);
        assert!(e.ability.unwrap().active);
        e.take_damage(2.0);
        assert_eq!(e.health, 1.0);
    }

    #[test]
    fn test_panic_teleport_waits_for_low_health() {
        let mut e = elite(AbilityKind::PanicTeleport);
        let x_before = e.rect.x;
        let _ = run_ability(&mut e, 10.0);
        assert_eq!(e.rect.x, x_before);
        e.health = 1.0;
        let _ = run_ability(&mut e, 1.0);
        assert_ne!(e.rect.x, x_before);
    }

    #[test]
    fn test_stun_freezes_descent() {
        let mut e = Enemy::basic(1, 100.0, 100.0, 3.0, "monster1".to_string());
        e.stun_timer = 1.0;
        let y = e.rect.y;
        e.step_descent(0.5, 1.0);
        assert_eq!(e.rect.y, y);
        e.step_descent(0.6, 1.0);
        e.step_descent(0.5, 1.0);
        assert!(e.rect.y > y);
    }
}
