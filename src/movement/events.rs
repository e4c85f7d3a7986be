/// Turn event journal
///
/// Records planning and playback events with their turn number and game time,
/// for diagnostics and for checking a played turn after the fact.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;

/// Events recorded while planning and playing back a turn
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum TurnEvent {
    /// Player started planning actions for a tank
    PlanningStarted {
        turn: u32,
        unit_id: u64, // Entity ID as u64 for serialization
        time: f64,
    },

    /// An action was appended to a tank's list
    ActionAppended {
        turn: u32,
        unit_id: u64,
        kind: ActionKind,
        time: f64,
    },

    /// The most recent action of a tank was dropped
    ActionRemoved {
        turn: u32,
        unit_id: u64,
        kind: ActionKind,
        time: f64,
    },

    /// Planning ended and playback started
    TurnCommitted {
        turn: u32,
        unit_count: usize,
        time: f64,
    },

    /// Playback moved past an action
    ActionFinished {
        turn: u32,
        unit_id: u64,
        action_index: usize,
        time: f64,
    },

    /// Every action of a tank has been played
    UnitFinished {
        turn: u32,
        unit_id: u64,
        time: f64,
    },

    /// Every tank has finished
    TurnFinished { turn: u32, time: f64 },
}

impl TurnEvent {
    /// Get the turn number for this event
    pub fn turn(&self) -> u32 {
        match self {
            TurnEvent::PlanningStarted { turn, .. }
            | TurnEvent::ActionAppended { turn, .. }
            | TurnEvent::ActionRemoved { turn, .. }
            | TurnEvent::TurnCommitted { turn, .. }
            | TurnEvent::ActionFinished { turn, .. }
            | TurnEvent::UnitFinished { turn, .. }
            | TurnEvent::TurnFinished { turn, .. } => *turn,
        }
    }

    /// Game time the event happened at, in seconds
    pub fn time(&self) -> f64 {
        match self {
            TurnEvent::PlanningStarted { time, .. }
            | TurnEvent::ActionAppended { time, .. }
            | TurnEvent::ActionRemoved { time, .. }
            | TurnEvent::TurnCommitted { time, .. }
            | TurnEvent::ActionFinished { time, .. }
            | TurnEvent::UnitFinished { time, .. }
            | TurnEvent::TurnFinished { time, .. } => *time,
        }
    }

    /// Unit the event is about, if it concerns a single unit
    pub fn unit_id(&self) -> Option<u64> {
        match self {
            TurnEvent::PlanningStarted { unit_id, .. }
            | TurnEvent::ActionAppended { unit_id, .. }
            | TurnEvent::ActionRemoved { unit_id, .. }
            | TurnEvent::ActionFinished { unit_id, .. }
            | TurnEvent::UnitFinished { unit_id, .. } => Some(*unit_id),
            TurnEvent::TurnCommitted { .. } | TurnEvent::TurnFinished { .. } => None,
        }
    }
}

/// In-memory journal of turn events
pub struct TurnEventRecorder {
    events: Vec<TurnEvent>,
    current_turn: u32,
}

impl TurnEventRecorder {
    pub fn new(current_turn: u32) -> Self {
        Self {
            events: Vec::new(),
            current_turn,
        }
    }

    /// Convert hecs::Entity to u64 for serialization
    pub fn entity_to_u64(entity: Entity) -> u64 {
        entity.to_bits().get()
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn record_planning_started(&mut self, unit: Entity, time: f64) {
        self.events.push(TurnEvent::PlanningStarted {
            turn: self.current_turn,
            unit_id: Self::entity_to_u64(unit),
            time,
        });
    }

    pub fn record_action_appended(&mut self, unit: Entity, kind: ActionKind, time: f64) {
        self.events.push(TurnEvent::ActionAppended {
            turn: self.current_turn,
            unit_id: Self::entity_to_u64(unit),
            kind,
            time,
        });
    }

    pub fn record_action_removed(&mut self, unit: Entity, kind: ActionKind, time: f64) {
        self.events.push(TurnEvent::ActionRemoved {
            turn: self.current_turn,
            unit_id: Self::entity_to_u64(unit),
            kind,
            time,
        });
    }

    pub fn record_turn_committed(&mut self, unit_count: usize, time: f64) {
        self.events.push(TurnEvent::TurnCommitted {
            turn: self.current_turn,
            unit_count,
            time,
        });
    }

    pub fn record_action_finished(&mut self, unit: Entity, action_index: usize, time: f64) {
        self.events.push(TurnEvent::ActionFinished {
            turn: self.current_turn,
            unit_id: Self::entity_to_u64(unit),
            action_index,
            time,
        });
    }

    pub fn record_unit_finished(&mut self, unit: Entity, time: f64) {
        self.events.push(TurnEvent::UnitFinished {
            turn: self.current_turn,
            unit_id: Self::entity_to_u64(unit),
            time,
        });
    }

    pub fn record_turn_finished(&mut self, time: f64) {
        self.events.push(TurnEvent::TurnFinished {
            turn: self.current_turn,
            time,
        });
    }

    /// Get all events for current turn
    pub fn get_turn_events(&self) -> Vec<&TurnEvent> {
        self.events
            .iter()
            .filter(|e| e.turn() == self.current_turn)
            .collect()
    }

    /// Get all events
    pub fn get_all_events(&self) -> &[TurnEvent] {
        &self.events
    }

    /// Advance to next turn
    pub fn next_turn(&mut self) {
        self.current_turn += 1;
    }

    /// Pretty JSON dump of every recorded event
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
