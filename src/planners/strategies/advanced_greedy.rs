use tracing::debug;

use crate::config::BotConfig;
use crate::planners::context::TurnContext;
use crate::planners::evaluators::{CandidateMove, CenterBias, CompositeScorer, EnemyDanger, GemProximity};
use crate::planners::strategies::Planner;

/// Greedy gem collection that keeps out of enemy reach.
///
/// Scores gem proximity plus enemy danger while a gem is reachable, and center
/// bias plus enemy danger otherwise. Cells within the threat radius of an enemy
/// are only chosen when every legal move, staying included, is threatened.
pub struct AdvancedGreedy {
    collect: CompositeScorer,
    search: CompositeScorer,
    danger: EnemyDanger,
}

impl AdvancedGreedy {
    pub fn new(config: &BotConfig) -> Self {
        let weights = config.weights;
        Self {
            collect: CompositeScorer::new()
                .with(GemProximity, weights.gem)
                .with(EnemyDanger::new(config.threat_radius), weights.danger),
            search: CompositeScorer::new()
                .with(CenterBias, weights.center)
                .with(EnemyDanger::new(config.threat_radius), weights.danger),
            danger: EnemyDanger::new(config.threat_radius),
        }
    }
}

impl Planner for AdvancedGreedy {
    fn name(&self) -> &'static str {
        "advanced_greedy"
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(strategy = "AdvancedGreedy"))]
    fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove> {
        let scorer = if ctx.has_reachable_gem() {
            &self.collect
        } else {
            &self.search
        };
        let ranked = self.danger.prefer_safe(ctx, scorer.rank(ctx));
        if let Some(best) = ranked.first() {
            if self.danger.is_threatened(ctx, best.cell) {
                debug!("Every move is within reach of an enemy");
            }
            debug!("Best: {}", best);
        }
        ranked
    }
}
