use tracing::debug;

use crate::config::BotConfig;
use crate::planners::context::TurnContext;
use crate::planners::evaluators::{
    CandidateMove, CompositeScorer, EnemyDanger, ExplorationValue, FrontierProximity,
};
use crate::planners::strategies::{OldestFloorPatrol, Planner};

/// Moves to reveal unknown cells.
///
/// Candidates are ranked by how many unknown cells they would reveal. Frontier
/// proximity only breaks ties: its weighted score stays below one unit of
/// exploration value. When no move leads toward an unknown cell, because the
/// arena is fully known or what remains is sealed off, the agent patrols the
/// floor it has not seen for longest instead.
pub struct HiddenExploration {
    explore: CompositeScorer,
    patrol: OldestFloorPatrol,
    danger: EnemyDanger,
}

impl HiddenExploration {
    pub fn new(config: &BotConfig) -> Self {
        let weights = config.weights;
        Self {
            explore: CompositeScorer::new()
                .with(ExplorationValue::new(config.exploration_radius), weights.exploration)
                .with(FrontierProximity, weights.exploration * 0.5)
                .with(EnemyDanger::new(config.threat_radius), weights.danger),
            patrol: OldestFloorPatrol::new(config),
            danger: EnemyDanger::new(config.threat_radius),
        }
    }
}

impl Planner for HiddenExploration {
    fn name(&self) -> &'static str {
        "hidden_exploration"
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(strategy = "HiddenExploration"))]
    fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove> {
        let frontier_reachable = ctx.frontier_distances().is_some_and(|field| {
            ctx.legal_moves()
                .iter()
                .any(|(_, cell)| field.get(*cell).is_finite())
        });
        if !frontier_reachable {
            debug!("No unknown cell within reach, patrolling");
            return self.patrol.rank(ctx);
        }
        let ranked = self.danger.prefer_safe(ctx, self.explore.rank(ctx));
        if let Some(best) = ranked.first() {
            debug!("Best: {}", best);
        }
        ranked
    }
}
