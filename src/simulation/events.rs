//! Outcomes returned by agent updates.
//!
//! Updates run against the tick-start snapshot and never touch other agents;
//! the ecosystem collects their outcomes and applies them serially afterwards.

use serde::{Deserialize, Serialize};

use super::agent::AgentId;

/// Why an agent died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeathCause {
    /// Lived past its maximum age.
    OldAge,
    /// Ran out of energy, or went too long without a meal.
    Starvation,
    /// Eaten by a predator.
    Eaten {
        /// The predator that ate the agent.
        predator: AgentId,
    },
}

/// State transition requested by one agent update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Nothing to apply.
    #[default]
    None,
    /// Spawn one child of the updating agent.
    Reproduce {
        /// Prey eaten in the meal that triggered reproduction, if any.
        consumed: Option<AgentId>,
    },
    /// The updating predator ate `prey`.
    Eat {
        /// The prey that was eaten.
        prey: AgentId,
    },
    /// Remove the updating agent.
    Die(DeathCause),
}

impl Outcome {
    /// The prey consumed by this outcome, if any.
    pub fn consumed_prey(&self) -> Option<AgentId> {
        match *self {
            Outcome::Eat { prey } => Some(prey),
            Outcome::Reproduce { consumed } => consumed,
            Outcome::None | Outcome::Die(_) => None,
        }
    }
}
