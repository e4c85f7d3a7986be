/// Turn actions: what a tank does during one turn
///
/// Each action starts from the posture the previous one left the tank in and
/// knows how long it takes to play back.

pub mod action_list;
pub mod fire_action;
pub mod move_action;

pub use action_list::{Advance, TurnActionList};
pub use fire_action::FireAction;
pub use move_action::MoveAction;

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, MovementConfigData, TurretConfigData};
use crate::error::PathError;
use crate::movement::{NodePosture, Posture};
use crate::overlay::{OverlayCanvas, OverlayProjection};
use crate::scene::{AnimationPosture, SceneNodes};

/// Action type tag, for logging and the event journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Fire,
}

/// Parameters every action of a list is built with
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionRules {
    pub movement: MovementConfigData,
    pub turret: TurretConfigData,
}

impl ActionRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            movement: config.movement,
            turret: config.turret,
        }
    }
}

/// A single planned action
#[derive(Debug, Clone, PartialEq)]
pub enum TurnAction {
    Move(MoveAction),
    Fire(FireAction),
}

impl TurnAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            TurnAction::Move(_) => ActionKind::Move,
            TurnAction::Fire(_) => ActionKind::Fire,
        }
    }

    pub fn animation_length(&self) -> f32 {
        match self {
            TurnAction::Move(action) => action.animation_length(),
            TurnAction::Fire(action) => action.animation_length(),
        }
    }

    /// Fire actions are always valid
    pub fn is_valid(&self) -> bool {
        match self {
            TurnAction::Move(action) => action.is_valid(),
            TurnAction::Fire(_) => true,
        }
    }

    pub fn path_error(&self) -> Option<PathError> {
        match self {
            TurnAction::Move(action) => action.path_error(),
            TurnAction::Fire(_) => None,
        }
    }

    /// Posture the unit is left in once the action has played
    pub fn final_posture(&self) -> Posture {
        match self {
            TurnAction::Move(action) => action.final_posture(),
            TurnAction::Fire(action) => action.final_posture(),
        }
    }

    pub fn animated_posture(&self, tick: f32) -> Posture {
        match self {
            TurnAction::Move(action) => action.animated_posture(tick),
            TurnAction::Fire(action) => action.animated_posture(tick),
        }
    }

    /// Postures to apply this frame, `tick` seconds into the action
    pub fn animate(&mut self, tick: f32, nodes: &mut dyn SceneNodes) -> Vec<AnimationPosture> {
        match self {
            TurnAction::Move(action) => {
                vec![AnimationPosture::unit(NodePosture::Body(action.animated_posture(tick)))]
            }
            TurnAction::Fire(action) => action.animate(tick, nodes),
        }
    }

    /// Completion hook, run once when playback moves past the action
    pub fn finish(&mut self, nodes: &mut dyn SceneNodes) {
        match self {
            TurnAction::Move(_) => {}
            TurnAction::Fire(action) => action.finish(nodes),
        }
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        match self {
            TurnAction::Move(action) => action.draw_overlays(canvas, projection),
            TurnAction::Fire(action) => action.draw_overlays(canvas, projection),
        }
    }

    pub fn as_move(&self) -> Option<&MoveAction> {
        match self {
            TurnAction::Move(action) => Some(action),
            TurnAction::Fire(_) => None,
        }
    }

    pub fn as_move_mut(&mut self) -> Option<&mut MoveAction> {
        match self {
            TurnAction::Move(action) => Some(action),
            TurnAction::Fire(_) => None,
        }
    }
}
