//! Boss AI: entry, roaming, dodging, phase two, rage, special attacks
//!
//! The boss is an `Enemy` carrying a `BossCore`. Movement, the rage clock
//! and the special-attack machine all run off plain countdown timers; the
//! tick loop merges the returned projectiles and minions into the world.

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::sim::collision::Rect;
use crate::sim::config::{BossConfig, DifficultyConfig, SpecialAttack};
use crate::sim::enemy::Enemy;
use crate::sim::entity::{OwnerKind, Projectile};

pub const BOSS_WIDTH: f32 = 220.0;
pub const BOSS_HEIGHT: f32 = 160.0;
const ENTRY_SPEED: f32 = 100.0;
const ENTRY_STOP_Y: f32 = 50.0;
const HORIZONTAL_SPEED_BASE: f32 = 100.0;
const CONTACT_DAMAGE: f32 = 20.0;

const RAGE_COOLDOWN: f32 = 15.0;
const RAGE_DURATION: f32 = 5.0;
const RAGE_INTERVAL_FACTOR: f32 = 0.33;
const PHASE_TWO_SPEED_FACTOR: f32 = 1.5;
const PHASE_TWO_INTERVAL_FACTOR: f32 = 0.75;

const DODGE_SPEED: f32 = 300.0;
const DODGE_DURATION: f32 = 0.3;
const DODGE_COOLDOWN: f32 = 2.0;
/// Downward reach of the threat scan below the boss
const DODGE_SCAN_DEPTH: f32 = 200.0;

/// Gap between specials, measured from the start of the previous charge
const SPECIAL_COOLDOWN: f32 = 10.0;
const SPECIAL_FIRST_DELAY: f32 = 5.0;
const BARRAGE_SHOTS: u32 = 5;
const BARRAGE_SHOT_GAP: f32 = 0.1;
const BARRAGE_SPEED_FACTOR: f32 = 1.5;
const SCATTER_SHOTS: u32 = 8;
const SCATTER_ARC_DEGREES: f32 = 90.0;
const SCATTER_DAMAGE_FACTOR: f32 = 0.8;
const MINION_COUNT: u32 = 3;
const BEAM_DAMAGE_FACTOR: f32 = 5.0;

/// Gross movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossMotion {
    /// Descending to the roaming line
    Entering,
    /// Bouncing between the playfield edges
    Roaming,
    /// Short burst away from the player's shots
    Dodging,
}

/// Special-attack sub-machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpecialState {
    Idle,
    /// Telegraph window before the attack lands
    Charging { timer: f32 },
    /// Barrage mid-volley
    Barraging { shots_left: u32, timer: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossCore {
    pub motion: BossMotion,
    pub phase: u8,
    pub entered_phase_two: bool,
    pub enraged: bool,
    pub rage_timer: f32,
    pub rage_cooldown: f32,
    pub base_fire_interval: f32,
    pub fire_timer: f32,
    pub horizontal_speed: f32,
    /// -1.0 or 1.0
    pub direction: f32,
    pub special: SpecialAttack,
    pub special_state: SpecialState,
    pub special_cooldown: f32,
    pub dodge_timer: f32,
    pub dodge_cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
}

impl BossCore {
    pub fn new(config: &BossConfig, diff: &DifficultyConfig) -> Self {
        Self {
            motion: BossMotion::Entering,
            phase: 1,
            entered_phase_two: false,
            enraged: false,
            rage_timer: 0.0,
            rage_cooldown: RAGE_COOLDOWN,
            base_fire_interval: config.fire_interval,
            fire_timer: config.fire_interval,
            horizontal_speed: HORIZONTAL_SPEED_BASE
                * config.speed_multiplier
                * diff.enemy_speed,
            direction: 1.0,
            special: config.special_attack,
            special_state: SpecialState::Idle,
            special_cooldown: SPECIAL_FIRST_DELAY,
            dodge_timer: 0.0,
            dodge_cooldown: 0.0,
            projectile_speed: config.projectile_speed,
            projectile_damage: config.projectile_damage,
        }
    }

    /// Current gap between normal shots, after phase and rage scaling
    pub fn current_fire_interval(&self) -> f32 {
        let mut interval = self.base_fire_interval;
        if self.entered_phase_two {
            interval *= PHASE_TWO_INTERVAL_FACTOR;
        }
        if self.enraged {
            interval *= RAGE_INTERVAL_FACTOR;
        }
        interval
    }

    fn telegraph_time(&self) -> f32 {
        match self.special {
            SpecialAttack::ChargeBeam => 1.5,
            SpecialAttack::Barrage => 1.0,
            SpecialAttack::SummonMinions => 0.5,
            SpecialAttack::ScatterShot => 1.2,
        }
    }
}

/// What one boss step hands back to the tick loop
#[derive(Debug, Default)]
pub struct BossOutput {
    pub projectiles: Vec<Projectile>,
    pub minions: Vec<Enemy>,
    /// Set once, the tick the boss crosses half health
    pub phase_two_started: bool,
}

/// Build the boss entity for a level. Health scales with the level number,
/// the per-boss multiplier, difficulty, and the player's damage stat so an
/// upgraded ship still gets a fight.
pub fn spawn_boss(
    id: u32,
    level_number: u32,
    config: &BossConfig,
    diff: &DifficultyConfig,
    ship_damage: f32,
    field_w: f32,
) -> Enemy {
    let health = (100.0 + 20.0 * level_number as f32)
        * config.health_multiplier
        * diff.enemy_health
        * (1.0 + ship_damage / 10.0);
    Enemy {
        id,
        rect: Rect::new(
            field_w / 2.0 - BOSS_WIDTH / 2.0,
            -BOSS_HEIGHT,
            BOSS_WIDTH,
            BOSS_HEIGHT,
        ),
        speed: 0.0,
        health,
        max_health: health,
        stun_timer: 0.0,
        contact_damage: CONTACT_DAMAGE,
        sprite_id: config.sprite_id.clone(),
        boss: Some(BossCore::new(config, diff)),
        ability: None,
        echo_of: None,
        active: true,
    }
}

/// One boss AI step. `player_projectiles` feeds the dodge threat scan;
/// `speed_factor` is the live slow/time-warp multiplier on movement.
pub fn update_boss(
    boss: &mut Enemy,
    dt: f32,
    field_w: f32,
    player_rect: &Rect,
    player_projectiles: &[Projectile],
    speed_factor: f32,
    next_id: &mut u32,
) -> BossOutput {
    let mut out = BossOutput::default();
    let Some(mut core) = boss.boss else {
        return out;
    };

    // Phase two flips exactly once, at half health
    if !core.entered_phase_two && boss.health <= boss.max_health / 2.0 {
        core.entered_phase_two = true;
        core.phase = 2;
        core.horizontal_speed *= PHASE_TWO_SPEED_FACTOR;
        out.phase_two_started = true;
        debug!("boss {} entered phase two", boss.id);
    }

    step_rage(&mut core, dt);
    step_motion(
        boss.id,
        &mut core,
        &mut boss.rect,
        dt,
        field_w,
        player_rect,
        player_projectiles,
        speed_factor,
    );

    if core.motion != BossMotion::Entering {
        step_normal_fire(&mut core, &boss.rect, dt, &mut out);
        step_special(&mut core, &boss.rect, dt, player_rect, next_id, boss.id, &mut out);
    }

    boss.boss = Some(core);
    out
}

fn step_rage(core: &mut BossCore, dt: f32) {
    if core.enraged {
        core.rage_timer -= dt;
        if core.rage_timer <= 0.0 {
            core.enraged = false;
            core.rage_cooldown = RAGE_COOLDOWN;
        }
    } else {
        core.rage_cooldown -= dt;
        if core.rage_cooldown <= 0.0 {
            core.enraged = true;
            core.rage_timer = RAGE_DURATION;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn step_motion(
    boss_id: u32,
    core: &mut BossCore,
    rect: &mut Rect,
    dt: f32,
    field_w: f32,
    player_rect: &Rect,
    player_projectiles: &[Projectile],
    speed_factor: f32,
) {
    match core.motion {
        BossMotion::Entering => {
            rect.y += ENTRY_SPEED * speed_factor * dt;
            if rect.y >= ENTRY_STOP_Y {
                rect.y = ENTRY_STOP_Y;
                core.motion = BossMotion::Roaming;
            }
            return;
        }
        BossMotion::Roaming => {
            core.dodge_cooldown -= dt;
            if core.dodge_cooldown <= 0.0 && threat_incoming(rect, player_projectiles) {
                core.motion = BossMotion::Dodging;
                core.dodge_timer = DODGE_DURATION;
                // Break away from the player's side
                core.direction = if rect.center().x > player_rect.center().x {
                    1.0
                } else {
                    -1.0
                };
                debug!("boss {boss_id} dodging");
            }
        }
        BossMotion::Dodging => {
            core.dodge_timer -= dt;
            if core.dodge_timer <= 0.0 {
                core.motion = BossMotion::Roaming;
                core.dodge_cooldown = DODGE_COOLDOWN;
            }
        }
    }

    // A charging boss holds position; the dodge timers above keep ticking
    if matches!(core.special_state, SpecialState::Charging { .. }) {
        return;
    }

    let speed = match core.motion {
        BossMotion::Dodging => core.horizontal_speed + DODGE_SPEED,
        _ => core.horizontal_speed,
    };
    rect.x += core.direction * speed * speed_factor * dt;
    if rect.x <= 0.0 {
        rect.x = 0.0;
        core.direction = 1.0;
    } else if rect.x + rect.w >= field_w {
        rect.x = field_w - rect.w;
        core.direction = -1.0;
    }
}

/// Any player shot inside the column under the boss, reaching a bit below it
fn threat_incoming(rect: &Rect, player_projectiles: &[Projectile]) -> bool {
    let zone = Rect::new(
        rect.x - rect.w,
        rect.y,
        rect.w * 3.0,
        rect.h + DODGE_SCAN_DEPTH,
    );
    player_projectiles
        .iter()
        .any(|p| p.active && p.rect.overlaps(&zone))
}

fn step_normal_fire(core: &mut BossCore, rect: &Rect, dt: f32, out: &mut BossOutput) {
    if core.special_state != SpecialState::Idle || core.motion == BossMotion::Dodging {
        return;
    }
    core.fire_timer -= dt;
    if core.fire_timer > 0.0 {
        return;
    }
    core.fire_timer = core.current_fire_interval();
    let c = rect.center();
    out.projectiles.push(Projectile::hostile(
        Rect::new(c.x - 5.0, rect.y + rect.h, 10.0, 20.0),
        Vec2::new(0.0, core.projectile_speed),
        core.projectile_damage,
        OwnerKind::Boss,
    ));
}

fn step_special(
    core: &mut BossCore,
    rect: &Rect,
    dt: f32,
    player_rect: &Rect,
    next_id: &mut u32,
    boss_id: u32,
    out: &mut BossOutput,
) {
    core.special_cooldown -= dt;
    match core.special_state {
        SpecialState::Idle => {
            if core.special_cooldown <= 0.0 {
                // The clock to the next special runs from the charge start
                core.special_cooldown = SPECIAL_COOLDOWN;
                core.special_state = SpecialState::Charging {
                    timer: core.telegraph_time(),
                };
            }
        }
        SpecialState::Charging { timer } => {
            let timer = timer - dt;
            if timer > 0.0 {
                core.special_state = SpecialState::Charging { timer };
                return;
            }
            debug!("boss {boss_id} unleashing {:?}", core.special);
            match core.special {
                SpecialAttack::ChargeBeam => {
                    out.projectiles.push(Projectile::beam(
                        beam_rect(rect),
                        core.projectile_damage * BEAM_DAMAGE_FACTOR,
                        boss_id,
                    ));
                    finish_special(core);
                }
                SpecialAttack::Barrage => {
                    core.special_state = SpecialState::Barraging {
                        shots_left: BARRAGE_SHOTS,
                        timer: 0.0,
                    };
                }
                SpecialAttack::SummonMinions => {
                    let c = rect.center();
                    for i in 0..MINION_COUNT {
                        let id = *next_id;
                        *next_id += 1;
                        let dx = (i as f32 - 1.0) * 90.0;
                        out.minions.push(Enemy::minion(
                            id,
                            Vec2::new(c.x + dx, rect.y + rect.h + 40.0),
                        ));
                    }
                    finish_special(core);
                }
                SpecialAttack::ScatterShot => {
                    let c = rect.center();
                    let arc = SCATTER_ARC_DEGREES.to_radians();
                    for i in 0..SCATTER_SHOTS {
                        let t = i as f32 / (SCATTER_SHOTS - 1) as f32;
                        let angle = -arc / 2.0 + t * arc;
                        let dir = Vec2::new(angle.sin(), angle.cos());
                        out.projectiles.push(Projectile::hostile(
                            Rect::new(c.x - 6.0, rect.y + rect.h, 12.0, 12.0),
                            dir * core.projectile_speed,
                            core.projectile_damage * SCATTER_DAMAGE_FACTOR,
                            OwnerKind::Boss,
                        ));
                    }
                    finish_special(core);
                }
            }
        }
        SpecialState::Barraging { shots_left, timer } => {
            let timer = timer - dt;
            if timer > 0.0 {
                core.special_state = SpecialState::Barraging { shots_left, timer };
                return;
            }
            let from = Vec2::new(rect.center().x, rect.y + rect.h);
            let aim = (player_rect.center() - from).normalize_or_zero();
            out.projectiles.push(Projectile::hostile(
                Rect::new(from.x - 4.0, from.y, 8.0, 16.0),
                aim * core.projectile_speed * BARRAGE_SPEED_FACTOR,
                core.projectile_damage,
                OwnerKind::Boss,
            ));
            if shots_left <= 1 {
                finish_special(core);
            } else {
                core.special_state = SpecialState::Barraging {
                    shots_left: shots_left - 1,
                    timer: BARRAGE_SHOT_GAP,
                };
            }
        }
    }
}

fn finish_special(core: &mut BossCore) {
    core.special_state = SpecialState::Idle;
}

/// The beam column under the boss, recomputed every tick so it follows
pub fn beam_rect(boss_rect: &Rect) -> Rect {
    Rect::new(
        boss_rect.x,
        boss_rect.y + boss_rect.h,
        boss_rect.w,
        consts::PLAYFIELD_HEIGHT - (boss_rect.y + boss_rect.h),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::Difficulty;

    fn test_config(special: SpecialAttack) -> BossConfig {
        BossConfig {
            sprite_id: "boss1".to_string(),
            health_multiplier: 1.0,
            speed_multiplier: 1.0,
            fire_interval: 2.0,
            projectile_speed: 150.0,
            projectile_damage: 10.0,
            special_attack: special,
        }
    }

    fn spawn(special: SpecialAttack) -> Enemy {
        spawn_boss(
            1,
            1,
            &test_config(special),
            &Difficulty::Normal.config(),
            1.0,
            1280.0,
        )
    }

    fn run(boss: &mut Enemy, seconds: f32) -> BossOutput {
        let player = Rect::new(600.0, 400.0, 60.0, 60.0);
        let dt = 1.0 / 60.0;
        let mut next_id = 100;
        let mut merged = BossOutput::default();
        let mut t = 0.0;
        while t < seconds {
            let out = update_boss(boss, dt, 1280.0, &player, &[], 1.0, &mut next_id);
            merged.projectiles.extend(out.projectiles);
            merged.minions.extend(out.minions);
            merged.phase_two_started |= out.phase_two_started;
            t += dt;
        }
        merged
    }

    #[test]
    fn test_boss_health_formula() {
        let boss = spawn(SpecialAttack::ScatterShot);
        // (100 + 20) * 1.0 * 1.0 * (1 + 1/10)
        assert!((boss.max_health - 132.0).abs() < 0.001);
    }

    #[test]
    fn test_entry_descends_then_roams() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        assert_eq!(boss.boss.unwrap().motion, BossMotion::Entering);
        let _ = run(&mut boss, 2.5);
        assert_eq!(boss.boss.unwrap().motion, BossMotion::Roaming);
        assert_eq!(boss.rect.y, ENTRY_STOP_Y);
    }

    #[test]
    fn test_no_fire_while_entering() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        let out = run(&mut boss, 0.5);
        assert!(out.projectiles.is_empty());
    }

    #[test]
    fn test_phase_two_triggers_once() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        let _ = run(&mut boss, 2.0);
        let speed_before = boss.boss.unwrap().horizontal_speed;

        boss.health = boss.max_health / 2.0;
        let out = run(&mut boss, 0.1);
        assert!(out.phase_two_started);
        let core = boss.boss.unwrap();
        assert_eq!(core.phase, 2);
        assert!((core.horizontal_speed - speed_before * 1.5).abs() < 0.001);

        // Neither dropping further nor recovering re-fires the transition
        boss.health = 1.0;
        let out = run(&mut boss, 0.5);
        assert!(!out.phase_two_started);
        boss.health = boss.max_health;
        let out = run(&mut boss, 0.5);
        assert!(!out.phase_two_started);
    }

    #[test]
    fn test_rage_speeds_up_fire() {
        let core = BossCore::new(
            &test_config(SpecialAttack::ScatterShot),
            &Difficulty::Normal.config(),
        );
        let mut raged = core;
        raged.enraged = true;
        assert!(raged.current_fire_interval() < core.current_fire_interval());
        let mut phase2 = core;
        phase2.entered_phase_two = true;
        assert!((phase2.current_fire_interval() - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_dodge_on_incoming_shot() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        let _ = run(&mut boss, 2.5); // finish entry
        let player = Rect::new(100.0, 400.0, 60.0, 60.0);
        let shot = Projectile::player_shot(
            Rect::new(boss.rect.center().x, boss.rect.y + boss.rect.h + 50.0, 5.0, 10.0),
            400.0,
            1.0,
        );
        let mut next_id = 100;
        let _ =
            update_boss(&mut boss, 1.0 / 60.0, 1280.0, &player, &[shot], 1.0, &mut next_id);
        let core = boss.boss.unwrap();
        assert_eq!(core.motion, BossMotion::Dodging);
        // Player is to the left, so the boss breaks right
        assert_eq!(core.direction, 1.0);
    }

    #[test]
    fn test_charge_roots_the_boss() {
        let mut boss = spawn(SpecialAttack::ChargeBeam);
        let _ = run(&mut boss, 2.5); // finish entry
        boss.boss.as_mut().unwrap().special_state = SpecialState::Charging { timer: 5.0 };
        let x_before = boss.rect.x;
        let _ = run(&mut boss, 0.5);
        assert_eq!(boss.rect.x, x_before);
    }

    #[test]
    fn test_no_fire_while_dodging() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        let _ = run(&mut boss, 2.5);
        let core = boss.boss.as_mut().unwrap();
        core.motion = BossMotion::Dodging;
        core.dodge_timer = 1.0;
        core.fire_timer = 0.01;
        let out = run(&mut boss, 0.5);
        assert!(out.projectiles.is_empty());
    }

    #[test]
    fn test_special_cooldown_rearms_at_charge_start() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        let _ = run(&mut boss, 8.0); // entry, first delay, into the telegraph
        let core = boss.boss.unwrap();
        assert!(matches!(core.special_state, SpecialState::Charging { .. }));
        assert!(core.special_cooldown > SPECIAL_COOLDOWN - 2.0);
    }

    #[test]
    fn test_barrage_fires_five_aimed_shots() {
        let mut boss = spawn(SpecialAttack::Barrage);
        let out = run(&mut boss, 10.0);
        let aimed: Vec<_> = out
            .projectiles
            .iter()
            .filter(|p| p.vel.x.abs() > 0.001)
            .collect();
        assert_eq!(aimed.len(), 5);
        for p in aimed {
            assert!(p.vel.length() > 150.0 * 1.4); // barrage speed boost
        }
    }

    #[test]
    fn test_scatter_fans_eight() {
        let mut boss = spawn(SpecialAttack::ScatterShot);
        let out = run(&mut boss, 10.0);
        let scatter: Vec<_> = out
            .projectiles
            .iter()
            .filter(|p| p.rect.w == 12.0)
            .collect();
        assert_eq!(scatter.len(), 8);
        // All head downward, spread across the arc
        assert!(scatter.iter().all(|p| p.vel.y > 0.0));
        assert!(scatter.first().unwrap().vel.x < 0.0);
        assert!(scatter.last().unwrap().vel.x > 0.0);
    }

    #[test]
    fn test_minions_summoned_in_threes() {
        let mut boss = spawn(SpecialAttack::SummonMinions);
        let out = run(&mut boss, 10.0);
        assert_eq!(out.minions.len(), 3);
        let ids: Vec<u32> = out.minions.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
    }

    #[test]
    fn test_charge_beam_spawned_under_boss() {
        let mut boss = spawn(SpecialAttack::ChargeBeam);
        let out = run(&mut boss, 10.0);
        let beams: Vec<_> = out.projectiles.iter().filter(|p| p.beam.is_some()).collect();
        assert_eq!(beams.len(), 1);
        let beam = beams[0];
        assert_eq!(beam.rect.w, BOSS_WIDTH);
        assert_eq!(beam.beam.unwrap().owner_id, 1);
        assert!(!beam.deals_damage()); // still charging at spawn
    }
}
