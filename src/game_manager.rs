/// Game Manager - Tracks scenario parameters and turn state
///
/// A turn is planned first and then played back; the turn counter advances once
/// playback has finished.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Turn phase - Planning or Playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Player is planning actions, nothing moves
    #[default]
    Planning,
    /// Committed actions are being played back
    Playback,
}

/// Game Manager - scenario and turn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameManager {
    /// Current turn phase
    #[serde(skip)]
    pub phase: TurnPhase,

    /// Current turn number
    pub current_turn: u32,

    /// Scenario name
    pub scenario_name: String,

    /// Playback start timestamp of the current turn
    #[serde(skip)]
    pub playback_start_time: f64,
}

impl Default for GameManager {
    fn default() -> Self {
        Self {
            phase: TurnPhase::Planning,
            current_turn: 1,
            scenario_name: "Skirmish".to_string(),
            playback_start_time: 0.0,
        }
    }
}

impl GameManager {
    /// Create a new game manager
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_planning(&self) -> bool {
        self.phase == TurnPhase::Planning
    }

    pub fn is_playing_back(&self) -> bool {
        self.phase == TurnPhase::Playback
    }

    /// Planning is over, the turn starts playing
    pub fn begin_playback(&mut self, current_time: f64) {
        self.phase = TurnPhase::Playback;
        self.playback_start_time = current_time;
        info!(turn = self.current_turn, "turn_playback_begins");
    }

    /// Playback finished, advance to the next turn's planning
    pub fn end_playback(&mut self, current_time: f64) {
        self.phase = TurnPhase::Planning;
        self.current_turn += 1;
        info!(
            turn = self.current_turn,
            scenario = %self.scenario_name,
            played = current_time - self.playback_start_time,
            "turn_planning_begins"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_cycle() {
        let mut manager = GameManager::new();
        assert!(manager.is_planning());
        assert_eq!(manager.current_turn, 1);

        manager.begin_playback(4.0);
        assert!(manager.is_playing_back());
        assert_eq!(manager.playback_start_time, 4.0);

        manager.end_playback(9.0);
        assert!(manager.is_planning());
        assert_eq!(manager.current_turn, 2);
    }
}
