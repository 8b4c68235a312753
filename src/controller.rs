use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::BotConfig;
use crate::error::{PlannerContractViolation, UnknownStrategyError};
use crate::infra::{Move, Pathfinder, TurnObserver};
use crate::planners::{Mode, ModeTracker, Planner, StrategyRegistry, TurnContext};
use crate::state::ArenaState;

/// Picks one move per turn.
///
/// Planners are resolved once, when the controller is built. Each turn builds a
/// fresh [`TurnContext`], selects the planner for the current mode, and checks
/// the answer before it leaves the bot. An illegal answer becomes `Stay`.
pub struct BotController {
    collecting: Box<dyn Planner>,
    exploring: Option<Box<dyn Planner>>,
    pathfinder: Pathfinder,
    modes: ModeTracker,
    observer: Box<dyn TurnObserver>,
    turn_budget: Duration,
    turns: u32,
    aborted: u32,
}

impl BotController {
    pub fn new(
        config: &BotConfig,
        registry: &StrategyRegistry,
        observer: impl TurnObserver + 'static,
    ) -> Result<Self, UnknownStrategyError> {
        let collecting = registry.get(&config.strategy, config)?;
        let exploring = if config.adaptive {
            Some(registry.get(&config.exploring_strategy, config)?)
        } else {
            None
        };

        Ok(Self {
            collecting,
            exploring,
            pathfinder: config.pathfinder(),
            modes: ModeTracker::new(config.explore_hysteresis),
            observer: Box::new(observer),
            turn_budget: Duration::from_millis(config.turn_budget_ms),
            turns: 0,
            aborted: 0,
        })
    }

    pub fn mode(&self) -> Option<Mode> {
        self.modes.current()
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn decide(&mut self, state: &ArenaState) -> Move {
        let turn_start = Instant::now();
        if self.turns == 0 {
            self.observer.on_game_start(state, self.collecting.name());
        }
        self.turns += 1;
        self.observer.on_turn(state);

        let ctx = TurnContext::new(state, self.pathfinder);
        let transition = self.modes.update(ctx.has_reachable_gem());
        if let Some(from) = transition.changed_from {
            self.observer.on_mode_changed(state.tick(), from, transition.mode);
        }

        let planner = match (transition.mode, &self.exploring) {
            (Mode::Exploring, Some(exploring)) => exploring,
            _ => &self.collecting,
        };
        let strategy = planner.name();
        let mut mv = planner.plan(&ctx);

        let destination = state.agent().step(mv);
        if !ctx.grid().is_legal_destination(destination) {
            let reason = if state.in_bounds(&destination) {
                format!("{} is a wall", destination)
            } else {
                format!("{} is outside the arena", destination)
            };
            let violation = PlannerContractViolation {
                strategy: strategy.to_string(),
                attempted: mv,
                reason,
            };
            self.observer.on_contract_violation(&violation);
            mv = Move::Stay;
        }

        self.observer.on_move_selected(state, strategy, transition.mode, mv);

        let turn_duration = turn_start.elapsed();
        if turn_duration > self.turn_budget {
            warn!(
                "⚠️  Tick {} took {:.2}ms (budget {}ms)",
                state.tick(),
                turn_duration.as_secs_f64() * 1000.0,
                self.turn_budget.as_millis()
            );
        }
        mv
    }

    /// Records a turn that could not be decoded.
    pub fn abort_turn(&mut self) {
        self.aborted += 1;
    }

    pub fn finish(&mut self) {
        self.observer.on_game_finished(self.turns, self.aborted);
    }
}
