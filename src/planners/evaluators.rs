use std::fmt;

use crate::infra::{DistanceField, Move, Position};
use crate::planners::context::TurnContext;

/// Scores a candidate destination cell. Higher is better.
pub trait Evaluator {
    fn name(&self) -> &'static str;

    fn score(&self, ctx: &TurnContext, cell: Position) -> f64;
}

/// `1 / (d + 1)` for the path distance to the nearest reachable gem, 0 without one.
pub struct GemProximity;

impl Evaluator for GemProximity {
    fn name(&self) -> &'static str {
        "gem_proximity"
    }

    fn score(&self, ctx: &TurnContext, cell: Position) -> f64 {
        ctx.gem_distances()
            .and_then(|field| field.get(cell).get())
            .map_or(0.0, proximity)
    }
}

/// Linear penalty inside `threat_radius` path steps of the nearest enemy.
pub struct EnemyDanger {
    threat_radius: u32,
}

impl EnemyDanger {
    pub fn new(threat_radius: u32) -> Self {
        Self { threat_radius }
    }

    pub fn threat_radius(&self) -> u32 {
        self.threat_radius
    }

    pub fn is_threatened(&self, ctx: &TurnContext, cell: Position) -> bool {
        self.enemy_steps(ctx, cell)
            .is_some_and(|steps| steps <= self.threat_radius)
    }

    /// Moves threatened candidates behind safe ones while at least one safe
    /// candidate exists. Relative order within each group is kept.
    pub fn prefer_safe(&self, ctx: &TurnContext, ranked: Vec<CandidateMove>) -> Vec<CandidateMove> {
        let (safe, threatened): (Vec<_>, Vec<_>) = ranked
            .into_iter()
            .partition(|candidate| !self.is_threatened(ctx, candidate.cell));
        if safe.is_empty() {
            return threatened;
        }
        safe.into_iter().chain(threatened).collect()
    }

    fn enemy_steps(&self, ctx: &TurnContext, cell: Position) -> Option<u32> {
        ctx.enemy_distances().and_then(|field| field.get(cell).get())
    }
}

impl Evaluator for EnemyDanger {
    fn name(&self) -> &'static str {
        "enemy_danger"
    }

    fn score(&self, ctx: &TurnContext, cell: Position) -> f64 {
        match self.enemy_steps(ctx, cell) {
            Some(steps) if steps <= self.threat_radius => {
                let span = self.threat_radius as f64 + 1.0;
                -(span - steps as f64) / span
            }
            _ => 0.0,
        }
    }
}

/// Negative path distance to the arena center, normalized by the diagonal.
/// Falls back to Manhattan distance when the center cannot be reached.
pub struct CenterBias;

impl Evaluator for CenterBias {
    fn name(&self) -> &'static str {
        "center_bias"
    }

    fn score(&self, ctx: &TurnContext, cell: Position) -> f64 {
        let steps = match ctx.center_distances().get(cell).get() {
            Some(steps) => steps as f64,
            None => cell.distance(&ctx.state().center()) as f64,
        };
        -steps / ctx.grid().diagonal()
    }
}

/// Number of unknown cells within `radius` of the candidate cell.
pub struct ExplorationValue {
    radius: u32,
}

impl ExplorationValue {
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }
}

impl Evaluator for ExplorationValue {
    fn name(&self) -> &'static str {
        "exploration_value"
    }

    fn score(&self, ctx: &TurnContext, cell: Position) -> f64 {
        ctx.grid()
            .unknown_within(cell, i32::try_from(self.radius).unwrap_or(i32::MAX)) as f64
    }
}

/// Proximity to the nearest unknown cell.
pub struct FrontierProximity;

impl Evaluator for FrontierProximity {
    fn name(&self) -> &'static str {
        "frontier_proximity"
    }

    fn score(&self, ctx: &TurnContext, cell: Position) -> f64 {
        ctx.frontier_distances()
            .and_then(|field| field.get(cell).get())
            .map_or(0.0, proximity)
    }
}

/// Proximity to a fixed target, given as a precomputed distance field.
pub struct TargetProximity {
    field: DistanceField,
}

impl TargetProximity {
    pub fn new(field: DistanceField) -> Self {
        Self { field }
    }
}

impl Evaluator for TargetProximity {
    fn name(&self) -> &'static str {
        "target_proximity"
    }

    fn score(&self, _ctx: &TurnContext, cell: Position) -> f64 {
        self.field.get(cell).get().map_or(0.0, proximity)
    }
}

fn proximity(steps: u32) -> f64 {
    1.0 / (steps as f64 + 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub evaluator: &'static str,
    pub raw: f64,
    pub weighted: f64,
}

/// A legal move with its composite score and the per-evaluator breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub mv: Move,
    pub cell: Position,
    pub score: f64,
    pub contributions: Vec<Contribution>,
}

impl CandidateMove {
    /// Raw score of the named evaluator, if it took part.
    pub fn raw(&self, evaluator: &str) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.evaluator == evaluator)
            .map(|c| c.raw)
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} = {:.4} [", self.mv, self.cell, self.score)?;
        for (i, c) in self.contributions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.4}", c.evaluator, c.weighted)?;
        }
        write!(f, "]")
    }
}

/// Weighted sum of evaluators.
#[derive(Default)]
pub struct CompositeScorer {
    parts: Vec<(Box<dyn Evaluator>, f64)>,
}

impl CompositeScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, evaluator: impl Evaluator + 'static, weight: f64) -> Self {
        self.parts.push((Box::new(evaluator), weight));
        self
    }

    pub fn score(&self, ctx: &TurnContext, mv: Move, cell: Position) -> CandidateMove {
        let contributions: Vec<Contribution> = self
            .parts
            .iter()
            .map(|(evaluator, weight)| {
                let raw = evaluator.score(ctx, cell);
                Contribution {
                    evaluator: evaluator.name(),
                    raw,
                    weighted: raw * weight,
                }
            })
            .collect();
        CandidateMove {
            mv,
            cell,
            score: contributions.iter().map(|c| c.weighted).sum(),
            contributions,
        }
    }

    /// Scores every legal move, best first. Ties keep move order, so `Stay`
    /// only wins when nothing scores higher.
    pub fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove> {
        let mut ranked: Vec<CandidateMove> = ctx
            .legal_moves()
            .into_iter()
            .map(|(mv, cell)| self.score(ctx, mv, cell))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
