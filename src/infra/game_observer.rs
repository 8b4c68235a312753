use crate::error::PlannerContractViolation;
use crate::infra::Move;
use crate::planners::Mode;
use crate::state::ArenaState;

/// Trait for observing bot events during a game
pub trait TurnObserver {
    /// Called with the first decoded turn
    fn on_game_start(&mut self, state: &ArenaState, strategy: &str);

    /// Called for every decoded turn, before planning
    fn on_turn(&mut self, state: &ArenaState);

    /// Called when the controller switches between collecting and exploring
    fn on_mode_changed(&mut self, tick: u32, from: Mode, to: Mode);

    /// Called once a move has been chosen and checked
    fn on_move_selected(&mut self, state: &ArenaState, strategy: &str, mode: Mode, mv: Move);

    /// Called when a planner picks a move the agent cannot make
    fn on_contract_violation(&mut self, violation: &PlannerContractViolation);

    /// Called when the input stream ends
    fn on_game_finished(&mut self, turns: u32, aborted: u32);
}
