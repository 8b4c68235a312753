mod context;
mod evaluators;
mod mode;
mod registry;
mod strategies;

pub use context::TurnContext;
pub use evaluators::{
    CandidateMove, CenterBias, CompositeScorer, Contribution, EnemyDanger, Evaluator,
    ExplorationValue, FrontierProximity, GemProximity, TargetProximity,
};
pub use mode::{Mode, ModeTracker, ModeTransition};
pub use registry::{
    BUILTIN_STRATEGIES, PlannerConstructor, StrategyDescriptor, StrategyRegistry,
    StrategyRegistryBuilder,
};
pub use strategies::{
    AdvancedGreedy, GreedyCollector, HiddenExploration, OldestFloorPatrol, Planner, TsmCollection,
};
