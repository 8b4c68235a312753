use tracing::debug;

use crate::planners::context::TurnContext;
use crate::planners::evaluators::{CandidateMove, CenterBias, CompositeScorer, GemProximity};
use crate::planners::strategies::Planner;

/// Steps toward the nearest reachable gem, or toward the center when there is none.
pub struct GreedyCollector {
    collect: CompositeScorer,
    fallback: CompositeScorer,
}

impl GreedyCollector {
    pub fn new() -> Self {
        Self {
            collect: CompositeScorer::new().with(GemProximity, 1.0),
            fallback: CompositeScorer::new().with(CenterBias, 1.0),
        }
    }
}

impl Default for GreedyCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner for GreedyCollector {
    fn name(&self) -> &'static str {
        "greedy"
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(strategy = "GreedyCollector"))]
    fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove> {
        let ranked = if ctx.has_reachable_gem() {
            self.collect.rank(ctx)
        } else {
            debug!("No reachable gem, moving toward center");
            self.fallback.rank(ctx)
        };
        if let Some(best) = ranked.first() {
            debug!("Best: {}", best);
        }
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Move, Pathfinder, Position};
    use crate::testing::parse_arena;

    #[test]
    fn test_moves_toward_gem() {
        let state = parse_arena(&[
            "A....", //
            ".....", //
            ".....", //
            ".....", //
            "....G",
        ]);
        let ctx = TurnContext::new(&state, Pathfinder::default());
        assert_eq!(GreedyCollector::new().plan(&ctx), Move::Down);
    }

    #[test]
    fn test_goes_around_walls() {
        let state = parse_arena(&[
            "A#G", //
            "...",
        ]);
        let ctx = TurnContext::new(&state, Pathfinder::default());
        assert_eq!(GreedyCollector::new().plan(&ctx), Move::Down);
    }

    #[test]
    fn test_center_fallback_without_gems() {
        let state = parse_arena(&[
            "A....", //
            ".....", //
            ".....",
        ]);
        let ctx = TurnContext::new(&state, Pathfinder::default());
        let ranked = GreedyCollector::new().rank(&ctx);
        assert_eq!(ranked[0].mv, Move::Down);
        assert_eq!(ranked[0].cell, Position::new(0, 1));
        assert_eq!(ranked.last().map(|c| c.mv), Some(Move::Stay));
    }

    #[test]
    fn test_stays_at_center_without_gems() {
        let state = parse_arena(&[
            "...", //
            ".A.", //
            "...",
        ]);
        let ctx = TurnContext::new(&state, Pathfinder::default());
        assert_eq!(GreedyCollector::new().plan(&ctx), Move::Stay);
    }
}
