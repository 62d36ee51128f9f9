//! The per-tick update pipeline
//!
//! One `tick` advances the whole simulation by `dt` seconds in a fixed
//! order: effects, player, projectiles, spawner, enemies, boss, phase
//! transition, player damage, pickups. Collision rules are first-hit-wins:
//! a projectile dies on its first overlap, an enemy absorbs at most one
//! hit per tick, and a dead entity stops matching immediately, so rewards
//! and damage can never double-fire inside a tick.

use glam::Vec2;
use log::{debug, info};

use crate::consts;
use crate::sim::boss::{beam_rect, spawn_boss, update_boss};
use crate::sim::collision::{Rect, within_radius};
use crate::sim::config::ShipAbility;
use crate::sim::enemy::Enemy;
use crate::sim::entity::{PowerUpKind, Projectile};
use crate::sim::state::{
    DroneBoost, GameOverReason, Outcome, SimPhase, SimulationState, StatOverride,
};

/// Sampled controls for one tick. `ability` and `place_bomb` are edge
/// inputs: the host sends true only on the frame the key goes down.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub ability: bool,
    pub place_bomb: bool,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) {
    if state.phase.is_terminal() {
        return;
    }

    step_effects(state, dt);
    step_player(state, input, dt);
    step_projectiles(state, dt);
    step_cosmetics(state, dt);
    step_wave_spawner(state, dt);
    step_enemies(state, dt);
    step_boss(state, dt);
    step_phase_transition(state);
    step_player_damage(state, dt);
    step_power_ups(state, input);
}

/// Run down effect timers and restore the exact originals on expiry
fn step_effects(state: &mut SimulationState, dt: f32) {
    state.fire_cooldown -= dt;
    state.ability_cooldown = (state.ability_cooldown - dt).max(0.0);

    if let Some(boost) = &mut state.effects.fire_rate {
        boost.timer -= dt;
        if boost.timer <= 0.0 {
            state.stats.fire_interval = boost.original;
            state.effects.fire_rate = None;
        }
    }
    if let Some(dash) = &mut state.effects.dash {
        dash.timer -= dt;
        if dash.timer <= 0.0 {
            state.player.speed = dash.original;
            state.effects.dash = None;
        }
    }
    if let Some(drone) = &mut state.effects.drone {
        drone.timer -= dt;
        if drone.timer <= 0.0 {
            state.stats.projectile_count = drone.original;
            state.effects.drone = None;
        }
    }
    if let Some(timer) = &mut state.effects.slow {
        *timer -= dt;
        if *timer <= 0.0 {
            state.effects.slow = None;
        }
    }
    if let Some(timer) = &mut state.effects.time_warp {
        *timer -= dt;
        if *timer <= 0.0 {
            state.effects.time_warp = None;
        }
    }
}

fn step_player(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let w = consts::PLAYFIELD_WIDTH;
    let h = consts::PLAYFIELD_HEIGHT;
    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    state.player.step(dir, dt, w, h);

    if input.ability {
        try_activate_ability(state);
    }

    if input.fire && state.fire_cooldown <= 0.0 {
        state.fire_cooldown = state.stats.fire_interval;
        let count = state.stats.projectile_count.max(1);
        let pw = state.stats.projectile_width;
        let ph = state.stats.projectile_height;
        let center_x = state.player.rect.center().x;
        for i in 0..count {
            let offset = (i as f32 - (count as f32 - 1.0) / 2.0) * 16.0;
            state.player_projectiles.push(Projectile::player_shot(
                Rect::new(
                    center_x - pw / 2.0 + offset,
                    state.player.rect.y - ph,
                    pw,
                    ph,
                ),
                state.stats.projectile_speed,
                state.stats.damage,
            ));
        }
    }
}

fn try_activate_ability(state: &mut SimulationState) {
    let ability = state.stats.ability;
    if ability == ShipAbility::None || state.ability_cooldown > 0.0 {
        return;
    }
    state.ability_cooldown = ability.cooldown();
    debug!("ability {ability:?} activated");
    match ability {
        ShipAbility::None => {}
        ShipAbility::Dash => {
            if state.effects.dash.is_none() {
                state.effects.dash = Some(StatOverride {
                    timer: ability.duration(),
                    original: state.player.speed,
                });
                state.player.speed *= 2.0;
            }
            state.player.invincibility_timer =
                state.player.invincibility_timer.max(ability.duration());
        }
        ShipAbility::EmpBlast => {
            for enemy in &mut state.enemies {
                enemy.stun_timer = ability.duration();
            }
        }
        ShipAbility::DroneCompanion => match &mut state.effects.drone {
            Some(drone) => drone.timer = ability.duration(),
            None => {
                state.effects.drone = Some(DroneBoost {
                    timer: ability.duration(),
                    original: state.stats.projectile_count,
                });
                state.stats.projectile_count += 2;
            }
        },
        ShipAbility::ShieldRecharge => {
            state.base.health = (state.base.health + 30.0).min(state.base.max_health);
        }
        ShipAbility::TimeWarp => {
            state.effects.time_warp = Some(ability.duration());
        }
        ShipAbility::MegaBomb => mega_bomb(state),
    }
}

/// Kill the whole wave and punch the boss for a fixed chunk
fn mega_bomb(state: &mut SimulationState) {
    let reward = state.kill_reward();
    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut() {
        if !enemy.active {
            continue;
        }
        enemy.active = false;
        state.add_explosion(enemy.rect.center(), 60.0);
        state.grant(reward);
    }
    enemies.retain(|e| e.active);
    state.enemies = enemies;
    if let Some(boss) = &mut state.boss {
        boss.take_damage(consts::BOMB_BOSS_DAMAGE);
    }
    state.add_explosion(state.player.rect.center(), consts::BOMB_RADIUS);
    state.push_event(Outcome::BombDetonated);
}

fn step_projectiles(state: &mut SimulationState, dt: f32) {
    let w = consts::PLAYFIELD_WIDTH;
    let h = consts::PLAYFIELD_HEIGHT;
    for p in &mut state.player_projectiles {
        p.update(dt, w, h);
    }
    // Beams ride their owning boss and die with it
    let boss_pose = state.boss.as_ref().map(|b| (b.id, b.rect));
    for p in &mut state.enemy_projectiles {
        if let Some(beam) = &p.beam {
            match boss_pose {
                Some((id, rect)) if id == beam.owner_id => p.rect = beam_rect(&rect),
                _ => p.active = false,
            }
        }
        p.update(dt, w, h);
    }
    state.player_projectiles.retain(|p| p.active);
    state.enemy_projectiles.retain(|p| p.active);
}

fn step_cosmetics(state: &mut SimulationState, dt: f32) {
    let h = consts::PLAYFIELD_HEIGHT;
    for e in &mut state.explosions {
        e.update(dt);
    }
    for p in &mut state.power_ups {
        p.update(dt, h);
    }
    state.explosions.retain(|e| e.active);
    state.power_ups.retain(|p| p.active);
}

/// The wave spawner pauses while the screen is at capacity and stops for
/// good once the score quota is met
fn step_wave_spawner(state: &mut SimulationState, dt: f32) {
    if state.phase != SimPhase::Wave
        || state.quota_met()
        || state.enemies.len() >= state.level.max_enemies_on_screen
    {
        return;
    }
    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        state.spawn_timer = state.spawn_interval();
        state.spawn_wave_enemy();
    }
}

fn step_enemies(state: &mut SimulationState, dt: f32) {
    let w = consts::PLAYFIELD_WIDTH;
    let h = consts::PLAYFIELD_HEIGHT;
    let slow = state.effects.enemy_speed_factor();
    let reward = state.kill_reward();

    let mut enemies = std::mem::take(&mut state.enemies);
    let mut shots = std::mem::take(&mut state.player_projectiles);
    let mut spawned: Vec<Enemy> = Vec::new();
    let mut pull = Vec2::ZERO;

    for enemy in enemies.iter_mut() {
        if !enemy.active || state.phase.is_terminal() {
            continue;
        }
        enemy.step_descent(dt, slow);
        // Stun suppresses ability logic along with movement
        if !enemy.stunned() {
            let out = enemy.step_ability(
                dt,
                &state.player.rect,
                w,
                &mut state.rng,
                &mut state.next_id,
            );
            state.enemy_projectiles.extend(out.projectiles);
            state.power_ups.extend(out.power_ups);
            spawned.extend(out.spawned);
            pull += out.player_pull;
        }

        // Reaching the base costs a fixed chunk and spends the enemy
        if enemy.rect.overlaps(&state.base.rect) {
            enemy.active = false;
            state.add_explosion(enemy.rect.center(), 60.0);
            state.base.health -= consts::BASE_HIT_DAMAGE;
            state.push_event(Outcome::BaseDamaged {
                remaining: state.base.health.max(0.0),
            });
            if state.base.health <= 0.0 {
                game_over(state, GameOverReason::BaseDestroyed);
            }
            continue;
        }
        if enemy.rect.off_playfield(w, h) {
            enemy.active = false;
            continue;
        }

        // First projectile hit wins; a dead enemy stops matching
        for p in shots.iter_mut() {
            if !p.active || !p.rect.overlaps(&enemy.rect) {
                continue;
            }
            p.active = false;
            enemy.take_damage(p.damage);
            if enemy.health <= 0.0 {
                enemy.active = false;
                let center = enemy.rect.center();
                state.add_explosion(center, 50.0);
                state.grant(reward);
                state.roll_power_up_drop(center);
            }
            break;
        }
    }

    if pull != Vec2::ZERO {
        state.player.translate_clamped(pull * dt, w, h);
    }

    enemies.retain(|e| e.active);
    shots.retain(|p| p.active);
    state.enemies = enemies;
    state.player_projectiles = shots;
    let cap = state.level.max_enemies_on_screen;
    for enemy in spawned {
        if state.enemies.len() < cap {
            state.enemies.push(enemy);
        }
    }
}

fn step_boss(state: &mut SimulationState, dt: f32) {
    if state.phase != SimPhase::BossFight {
        return;
    }
    let Some(mut boss) = state.boss.take() else {
        return;
    };
    let w = consts::PLAYFIELD_WIDTH;

    let out = update_boss(
        &mut boss,
        dt,
        w,
        &state.player.rect,
        &state.player_projectiles,
        state.effects.enemy_speed_factor(),
        &mut state.next_id,
    );
    if out.phase_two_started {
        state.push_event(Outcome::BossPhaseTwo);
    }
    state.enemy_projectiles.extend(out.projectiles);
    let cap = state.level.max_enemies_on_screen;
    for minion in out.minions {
        if state.enemies.len() < cap {
            state.enemies.push(minion);
        }
    }

    for p in state.player_projectiles.iter_mut() {
        if !p.active || !p.rect.overlaps(&boss.rect) {
            continue;
        }
        p.active = false;
        boss.take_damage(p.damage);
        if boss.health <= 0.0 {
            break;
        }
    }

    if boss.health <= 0.0 {
        // Defeat pays nothing by itself; clearing the level is the prize
        state.add_explosion(boss.rect.center(), 150.0);
        for p in &mut state.enemy_projectiles {
            if let Some(beam) = &p.beam
                && beam.owner_id == boss.id
            {
                p.active = false;
            }
        }
        info!("boss {} defeated", boss.id);
        state.push_event(Outcome::BossDefeated);
        state.phase = SimPhase::LevelCleared;
        state.push_event(Outcome::LevelCleared);
        return;
    }

    if boss.rect.overlaps(&state.player.rect) {
        damage_player(state, boss.contact_damage);
    }
    // A boss grinding into the base ends the run outright
    if boss.rect.overlaps(&state.base.rect) {
        state.base.health = 0.0;
        state.push_event(Outcome::BaseDamaged { remaining: 0.0 });
        game_over(state, GameOverReason::BaseDestroyed);
    }

    state.boss = Some(boss);
}

/// Wave -> boss fight (or straight to cleared when the level has no boss)
fn step_phase_transition(state: &mut SimulationState) {
    if state.phase != SimPhase::Wave || !state.quota_met() || !state.enemies.is_empty() {
        return;
    }
    // Leftover hostiles and pickups don't carry into the boss arena
    state.enemy_projectiles.clear();
    state.power_ups.clear();
    match state.level.boss.clone() {
        Some(config) => {
            let id = state.next_entity_id();
            let boss = spawn_boss(
                id,
                state.level_number,
                &config,
                &state.difficulty,
                state.stats.damage,
                consts::PLAYFIELD_WIDTH,
            );
            info!("boss {} arriving with {} health", boss.id, boss.max_health);
            state.boss = Some(boss);
            state.phase = SimPhase::BossFight;
            state.push_event(Outcome::BossArrived);
        }
        None => {
            state.phase = SimPhase::LevelCleared;
            state.push_event(Outcome::LevelCleared);
        }
    }
}

fn step_player_damage(state: &mut SimulationState, dt: f32) {
    if state.phase.is_terminal() {
        return;
    }
    state.player.invincibility_timer = (state.player.invincibility_timer - dt).max(0.0);

    let mut hostiles = std::mem::take(&mut state.enemy_projectiles);
    for p in hostiles.iter_mut() {
        if state.phase.is_terminal() {
            break;
        }
        if !p.active
            || !p.deals_damage()
            || !p.rect.overlaps(&state.player.rect)
            || state.player.invincible()
        {
            continue;
        }
        // Beams persist through contact; ordinary shots are spent
        if p.beam.is_none() {
            p.active = false;
        }
        damage_player(state, p.damage);
    }
    hostiles.retain(|p| p.active);
    state.enemy_projectiles = hostiles;

    // Ramming resolves only outside the grace window; a shielded player
    // passes through enemies without clearing them
    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut() {
        if !enemy.active
            || state.player.invincible()
            || !enemy.rect.overlaps(&state.player.rect)
        {
            continue;
        }
        enemy.active = false;
        state.add_explosion(enemy.rect.center(), 50.0);
        damage_player(state, enemy.contact_damage);
    }
    enemies.retain(|e| e.active);
    state.enemies = enemies;
}

fn damage_player(state: &mut SimulationState, damage: f32) {
    if !state.player.hit(damage) {
        return;
    }
    state.push_event(Outcome::PlayerDamaged {
        remaining: state.player.health.max(0.0),
    });
    if state.player.health <= 0.0 {
        game_over(state, GameOverReason::PlayerDestroyed);
    }
}

fn game_over(state: &mut SimulationState, reason: GameOverReason) {
    if state.phase.is_terminal() {
        return;
    }
    info!("game over: {reason:?}");
    state.phase = SimPhase::GameOver(reason);
    state.push_event(Outcome::GameOver { reason });
}

fn step_power_ups(state: &mut SimulationState, input: &TickInput) {
    if state.phase.is_terminal() {
        return;
    }
    let mut pickups = std::mem::take(&mut state.power_ups);
    for pickup in pickups.iter_mut() {
        if !pickup.active || !pickup.rect.overlaps(&state.player.rect) {
            continue;
        }
        pickup.active = false;
        apply_power_up(state, pickup.kind);
        state.push_event(Outcome::PowerUpCollected);
    }
    pickups.retain(|p| p.active);
    state.power_ups = pickups;

    if input.place_bomb && state.bombs_held > 0 {
        state.bombs_held -= 1;
        detonate_bomb(state, state.player.rect.center());
    }
}

fn apply_power_up(state: &mut SimulationState, kind: PowerUpKind) {
    match kind {
        // Shares the damage grace timer; a fresh pickup rewrites it
        PowerUpKind::Shield => {
            state.player.invincibility_timer = consts::POWERUP_DURATION;
        }
        PowerUpKind::FireRate => match &mut state.effects.fire_rate {
            // Re-picking extends the window without compounding the boost
            Some(boost) => boost.timer = consts::POWERUP_DURATION,
            None => {
                state.effects.fire_rate = Some(StatOverride {
                    timer: consts::POWERUP_DURATION,
                    original: state.stats.fire_interval,
                });
                state.stats.fire_interval *= 0.5;
            }
        },
        PowerUpKind::Money => {
            state.money += (50.0 * state.level_number as f32 * state.difficulty.money_rate)
                .round() as u64;
        }
        PowerUpKind::Heal => {
            let amount = 20.0 + 5.0 * state.level_number as f32;
            state.base.health = (state.base.health + amount).min(state.base.max_health);
        }
        PowerUpKind::Bomb => state.bombs_held += 1,
        PowerUpKind::SlowEnemies => state.effects.slow = Some(consts::POWERUP_DURATION),
    }
}

/// A placed bomb clears everything basic in its radius and chips the boss
fn detonate_bomb(state: &mut SimulationState, center: Vec2) {
    let reward = state.kill_reward();
    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut() {
        if !enemy.active || !within_radius(center, enemy.rect.center(), consts::BOMB_RADIUS) {
            continue;
        }
        enemy.active = false;
        let c = enemy.rect.center();
        state.add_explosion(c, 60.0);
        state.grant(reward);
        state.roll_power_up_drop(c);
    }
    enemies.retain(|e| e.active);
    state.enemies = enemies;

    if let Some(boss) = &mut state.boss
        && within_radius(center, boss.rect.center(), consts::BOMB_RADIUS)
    {
        boss.take_damage(consts::BOMB_BOSS_DAMAGE);
    }
    state.add_explosion(center, consts::BOMB_RADIUS);
    state.push_event(Outcome::BombDetonated);
}
