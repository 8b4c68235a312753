//! Strategy lookup by identifier.
//!
//! Built-in strategies are listed in [`BUILTIN_STRATEGIES`]. Additional ones are
//! added through [`StrategyRegistryBuilder::register`] before the registry is
//! built; a built registry never changes.

use std::collections::BTreeMap;

use crate::config::BotConfig;
use crate::error::{DuplicateStrategyError, UnknownStrategyError};
use crate::planners::strategies::{
    AdvancedGreedy, GreedyCollector, HiddenExploration, OldestFloorPatrol, Planner, TsmCollection,
};

pub type PlannerConstructor = fn(&BotConfig) -> Box<dyn Planner>;

#[derive(Debug, Clone, Copy)]
pub struct StrategyDescriptor {
    pub identifier: &'static str,
    pub constructor: PlannerConstructor,
}

pub static BUILTIN_STRATEGIES: &[StrategyDescriptor] = &[
    StrategyDescriptor {
        identifier: "greedy",
        constructor: make_greedy,
    },
    StrategyDescriptor {
        identifier: "advanced_greedy",
        constructor: make_advanced_greedy,
    },
    StrategyDescriptor {
        identifier: "tsm_collection",
        constructor: make_tsm_collection,
    },
    StrategyDescriptor {
        identifier: "hidden_exploration",
        constructor: make_hidden_exploration,
    },
    StrategyDescriptor {
        identifier: "oldest_floor_patrol",
        constructor: make_oldest_floor_patrol,
    },
];

fn make_greedy(_config: &BotConfig) -> Box<dyn Planner> {
    Box::new(GreedyCollector::new())
}

fn make_advanced_greedy(config: &BotConfig) -> Box<dyn Planner> {
    Box::new(AdvancedGreedy::new(config))
}

fn make_tsm_collection(config: &BotConfig) -> Box<dyn Planner> {
    Box::new(TsmCollection::new(config))
}

fn make_hidden_exploration(config: &BotConfig) -> Box<dyn Planner> {
    Box::new(HiddenExploration::new(config))
}

fn make_oldest_floor_patrol(config: &BotConfig) -> Box<dyn Planner> {
    Box::new(OldestFloorPatrol::new(config))
}

#[derive(Debug, Default)]
pub struct StrategyRegistryBuilder {
    descriptors: BTreeMap<&'static str, StrategyDescriptor>,
}

impl StrategyRegistryBuilder {
    /// Empty builder, without the built-in strategies.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin() -> Self {
        let mut builder = Self::new();
        for descriptor in BUILTIN_STRATEGIES {
            builder.descriptors.insert(descriptor.identifier, *descriptor);
        }
        builder
    }

    pub fn register(
        &mut self,
        identifier: &'static str,
        constructor: PlannerConstructor,
    ) -> Result<&mut Self, DuplicateStrategyError> {
        if self.descriptors.contains_key(identifier) {
            return Err(DuplicateStrategyError {
                identifier: identifier.to_string(),
            });
        }
        self.descriptors.insert(
            identifier,
            StrategyDescriptor {
                identifier,
                constructor,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> StrategyRegistry {
        StrategyRegistry {
            descriptors: self.descriptors,
        }
    }
}

#[derive(Debug)]
pub struct StrategyRegistry {
    descriptors: BTreeMap<&'static str, StrategyDescriptor>,
}

impl StrategyRegistry {
    pub fn builtin() -> Self {
        StrategyRegistryBuilder::with_builtin().build()
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.keys().copied()
    }

    pub fn descriptor(&self, identifier: &str) -> Result<&StrategyDescriptor, UnknownStrategyError> {
        self.descriptors
            .get(identifier)
            .ok_or_else(|| UnknownStrategyError {
                identifier: identifier.to_string(),
            })
    }

    /// Constructs the planner registered under `identifier`.
    pub fn get(
        &self,
        identifier: &str,
        config: &BotConfig,
    ) -> Result<Box<dyn Planner>, UnknownStrategyError> {
        let descriptor = self.descriptor(identifier)?;
        Ok((descriptor.constructor)(config))
    }
}
