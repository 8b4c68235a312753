use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Collecting,
    Exploring,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Collecting => write!(f, "COLLECTING"),
            Mode::Exploring => write!(f, "EXPLORING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub mode: Mode,
    /// Previous mode when this turn switched; `None` on the first turn too.
    pub changed_from: Option<Mode>,
}

impl ModeTransition {
    pub fn is_change(&self) -> bool {
        self.changed_from.is_some()
    }
}

/// Decides COLLECTING vs EXPLORING each turn.
///
/// Collecting wins as soon as a gem is reachable. Exploring starts after more
/// than `hysteresis` consecutive turns without one.
#[derive(Debug, Clone)]
pub struct ModeTracker {
    hysteresis: u32,
    last: Option<Mode>,
    gemless_turns: u32,
}

impl ModeTracker {
    pub fn new(hysteresis: u32) -> Self {
        Self {
            hysteresis,
            last: None,
            gemless_turns: 0,
        }
    }

    pub fn current(&self) -> Option<Mode> {
        self.last
    }

    pub fn update(&mut self, gem_reachable: bool) -> ModeTransition {
        let mode = if gem_reachable {
            self.gemless_turns = 0;
            Mode::Collecting
        } else {
            self.gemless_turns = self.gemless_turns.saturating_add(1);
            if self.gemless_turns > self.hysteresis || self.last != Some(Mode::Collecting) {
                Mode::Exploring
            } else {
                Mode::Collecting
            }
        };

        let changed_from = self.last.filter(|&last| last != mode);
        self.last = Some(mode);
        ModeTransition { mode, changed_from }
    }
}
