use tracing::{debug, error, info, trace};

use crate::error::PlannerContractViolation;
use crate::infra::{Move, TurnObserver};
use crate::planners::Mode;
use crate::state::ArenaState;

/// Logs game events through `tracing`.
pub struct DefaultObserver;

impl TurnObserver for DefaultObserver {
    fn on_game_start(&mut self, state: &ArenaState, strategy: &str) {
        info!("Game started");
        info!("- arena size: {}x{}", state.width(), state.height());
        info!("- strategy: {}", strategy);
    }

    fn on_turn(&mut self, state: &ArenaState) {
        debug!(
            "tick: {}, pos: {}, gems: {}, enemies: {}, initiative: {}",
            state.tick(),
            state.agent(),
            state.gems().len(),
            state.enemies().len(),
            state.initiative(),
        );
        trace!("\n{}", state.draw_ascii_map());
    }

    fn on_mode_changed(&mut self, tick: u32, from: Mode, to: Mode) {
        info!("tick {}: mode {} -> {}", tick, from, to);
    }

    fn on_move_selected(&mut self, state: &ArenaState, strategy: &str, mode: Mode, mv: Move) {
        debug!(
            "tick {}: {} ({}, {}) -> {}",
            state.tick(),
            mv,
            mode,
            strategy,
            state.agent().step(mv)
        );
    }

    fn on_contract_violation(&mut self, violation: &PlannerContractViolation) {
        error!("Planner contract violation: {}", violation);
    }

    fn on_game_finished(&mut self, turns: u32, aborted: u32) {
        info!("Game finished after {} turns", turns);
        if aborted > 0 {
            info!("- aborted turns: {}", aborted);
        }
    }
}
