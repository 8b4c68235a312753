use tracing::debug;

use crate::config::BotConfig;
use crate::infra::Position;
use crate::planners::context::TurnContext;
use crate::planners::evaluators::{
    CandidateMove, CenterBias, CompositeScorer, EnemyDanger, TargetProximity,
};
use crate::planners::strategies::Planner;

/// Longest tour planned ahead.
const MAX_TOUR_LEN: usize = 8;

/// Plans a nearest-first tour over the reachable gems and heads for its first stop.
///
/// A gem is only added to the tour when it can still be reached before its TTL
/// runs out, counting the steps spent on earlier stops.
pub struct TsmCollection {
    gem_weight: f64,
    danger_weight: f64,
    danger: EnemyDanger,
    search: CompositeScorer,
}

impl TsmCollection {
    pub fn new(config: &BotConfig) -> Self {
        let weights = config.weights;
        Self {
            gem_weight: weights.gem,
            danger_weight: weights.danger,
            danger: EnemyDanger::new(config.threat_radius),
            search: CompositeScorer::new()
                .with(CenterBias, weights.center)
                .with(EnemyDanger::new(config.threat_radius), weights.danger),
        }
    }

    /// Gem positions in visiting order.
    pub fn plan_tour(&self, ctx: &TurnContext) -> Vec<Position> {
        let mut remaining = ctx.reachable_gems().to_vec();
        let mut tour = Vec::new();
        let mut current = ctx.agent();
        let mut elapsed: i64 = 0;

        while !remaining.is_empty() && tour.len() < MAX_TOUR_LEN {
            let leg_field;
            let field = if tour.is_empty() {
                ctx.agent_distances()
            } else {
                leg_field = ctx.pathfinder().distance_field(current, ctx.grid());
                &leg_field
            };

            let next = remaining
                .iter()
                .enumerate()
                .filter_map(|(i, gem)| {
                    let arrival = elapsed + field.get(gem.position).get()? as i64;
                    let in_time = gem.ttl.is_none_or(|ttl| arrival <= ttl as i64);
                    in_time.then_some((arrival, i))
                })
                .min();

            let Some((arrival, i)) = next else {
                break;
            };
            let gem = remaining.remove(i);
            tour.push(gem.position);
            current = gem.position;
            elapsed = arrival;
        }

        tour
    }
}

impl Planner for TsmCollection {
    fn name(&self) -> &'static str {
        "tsm_collection"
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(strategy = "TsmCollection"))]
    fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove> {
        let tour = self.plan_tour(ctx);
        let ranked = match tour.first() {
            Some(&target) => {
                debug!("Tour: {:?}", tour);
                let field = ctx.pathfinder().distance_field(target, ctx.grid());
                CompositeScorer::new()
                    .with(TargetProximity::new(field), self.gem_weight)
                    .with(EnemyDanger::new(self.danger.threat_radius()), self.danger_weight)
                    .rank(ctx)
            }
            None => {
                debug!("No gem can be collected in time, moving toward center");
                self.search.rank(ctx)
            }
        };
        self.danger.prefer_safe(ctx, ranked)
    }
}
