//! Lineage events recorded by the ecosystem.
//!
//! Births, deaths and feedings are appended to a bounded log which consumers
//! drain, for example to write them out as JSON lines.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::agent::{AgentId, Species};
use super::events::DeathCause;
use super::reproduction::MutationSummary;

/// A discrete, tick-stamped simulation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// An agent was born.
    Birth {
        /// Tick of the birth.
        tick: u64,
        /// Species of the newborn.
        species: Species,
        /// Id of the newborn.
        child_id: AgentId,
        /// Id of the parent; `None` for seeded agents.
        parent_id: Option<AgentId>,
        /// Generation of the newborn.
        generation: u32,
        /// Mutations relative to the parent.
        mutation: Option<MutationSummary>,
    },
    /// An agent died.
    Death {
        /// Tick of the death.
        tick: u64,
        /// Id of the agent.
        id: AgentId,
        /// Species of the agent.
        species: Species,
        /// Generation of the agent.
        generation: u32,
        /// Age in ticks.
        age_ticks: u64,
        /// Age in simulated seconds.
        age_seconds: f32,
        /// Why it died.
        cause: DeathCause,
        /// Energy left at death.
        energy: f32,
        /// Children spawned over its lifetime.
        children: u32,
        /// Lifetime meals, for predators.
        prey_eaten: Option<u32>,
    },
    /// A predator ate a prey.
    Feeding {
        /// Tick of the meal.
        tick: u64,
        /// Id of the predator.
        predator_id: AgentId,
        /// Generation of the predator.
        generation: u32,
        /// Id of the prey.
        prey_id: AgentId,
        /// Lifetime meals of the predator, including this one.
        prey_eaten: u32,
    },
}

impl SimulationEvent {
    /// Tick at which the event happened.
    pub fn tick(&self) -> u64 {
        match self {
            SimulationEvent::Birth { tick, .. }
            | SimulationEvent::Death { tick, .. }
            | SimulationEvent::Feeding { tick, .. } => *tick,
        }
    }

    /// Serializes the event as one line of JSON.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Bounded FIFO of events awaiting a consumer.
///
/// When full, the oldest event is discarded and counted in [`dropped`](Self::dropped).
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<SimulationEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(4096)
    }
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            dropped: 0,
        }
    }

    /// Appends an event, discarding the oldest one if the log is full.
    pub fn push(&mut self, event: SimulationEvent) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Removes and returns all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<SimulationEvent> {
        self.events.drain(..).collect()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
