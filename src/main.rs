//! Headless campaign runner
//!
//! Drives the simulation with a scripted pilot at the fixed timestep and
//! logs the outcome of each level. Useful for balance checks and for
//! watching a whole campaign run in the terminal without a renderer.

use log::info;

use nova_strike::consts;
use nova_strike::sim::{
    Difficulty, LevelConfig, Outcome, ShipStats, SimPhase, SimulationState, TickInput, tick,
};
use nova_strike::Progress;

/// Ten minutes of sim time per level before we call it a stalemate
const MAX_TICKS_PER_LEVEL: u32 = 600 * 120;

fn scripted_input(state: &SimulationState, i: u32) -> TickInput {
    TickInput {
        fire: true,
        // Sweep back and forth across the playfield
        left: i % 480 < 240,
        right: i % 480 >= 240,
        ability: i % 600 == 0,
        place_bomb: state.bombs_held > 0,
        ..Default::default()
    }
}

fn main() {
    env_logger::init();

    let mut progress = Progress::default();
    for (index, level) in LevelConfig::campaign().into_iter().enumerate() {
        let level_number = index as u32 + 1;
        let mut state = SimulationState::new(
            level_number,
            level,
            Difficulty::Normal,
            ShipStats::default(),
            0xC0FFEE + level_number as u64,
        );

        let mut ticks = 0;
        while !state.phase.is_terminal() && ticks < MAX_TICKS_PER_LEVEL {
            let input = scripted_input(&state, ticks);
            tick(&mut state, &input, consts::SIM_DT);
            for event in state.take_events() {
                match event {
                    Outcome::BossArrived => info!("level {level_number}: boss arrived"),
                    Outcome::BossPhaseTwo => info!("level {level_number}: boss phase two"),
                    Outcome::BossDefeated => info!("level {level_number}: boss down"),
                    Outcome::GameOver { reason } => {
                        info!("level {level_number}: lost ({reason:?})")
                    }
                    _ => {}
                }
            }
            ticks += 1;
        }

        info!(
            "level {level_number}: {:?} after {:.1}s, score {}, money {}",
            state.phase,
            ticks as f32 * consts::SIM_DT,
            state.score,
            state.money
        );
        progress.bank_run(&state);
        if state.phase != SimPhase::LevelCleared {
            break;
        }
    }

    info!(
        "campaign over: {} levels cleared, {} score, {} money, {} xp",
        progress.completed_levels.len(),
        progress.score,
        progress.money,
        progress.experience
    );
}
