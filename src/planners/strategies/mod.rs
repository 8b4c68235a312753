mod advanced_greedy;
mod greedy_collector;
mod hidden_exploration;
mod oldest_floor_patrol;
mod tsm_collection;

pub use advanced_greedy::AdvancedGreedy;
pub use greedy_collector::GreedyCollector;
pub use hidden_exploration::HiddenExploration;
pub use oldest_floor_patrol::OldestFloorPatrol;
pub use tsm_collection::TsmCollection;

use crate::infra::Move;
use crate::planners::context::TurnContext;
use crate::planners::evaluators::CandidateMove;

/// A per-turn move policy.
///
/// Planners hold only their configuration; everything they know about the
/// arena comes from the [`TurnContext`] of the current turn.
pub trait Planner {
    /// Registry identifier.
    fn name(&self) -> &'static str;

    /// Legal candidates, best first.
    fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove>;

    fn plan(&self, ctx: &TurnContext) -> Move {
        self.rank(ctx).first().map_or(Move::Stay, |candidate| candidate.mv)
    }
}
