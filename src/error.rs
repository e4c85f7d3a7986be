/// Error types for path solving, turn planning and game orchestration

use hecs::Entity;
use thiserror::Error;

/// Why no path chain connects two postures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("tangent lines are parallel; no single arc joins the postures")]
    ParallelTangents,
    #[error("tangent directions coincide; the turn is degenerate")]
    DegenerateTurn,
    #[error("target posture coincides with the start posture")]
    ZeroDistance,
}

/// Turn planning and playback precondition failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    #[error("the action list is empty")]
    EmptyActionList,
    #[error("the most recent action is not a move action")]
    HeadNotMove,
    #[error("action {index} of unit {unit:?} is not valid: {source}")]
    InvalidAction {
        unit: Entity,
        index: usize,
        #[source]
        source: PathError,
    },
    #[error("turn playback is already running")]
    AlreadyRunning,
    #[error("no unit has planned actions for this turn")]
    NothingToAnimate,
}

/// Game level failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("entity {0:?} is not a player tank")]
    NotATank(Entity),
    #[error("entity {0:?} has no position")]
    UnknownTarget(Entity),
    #[error("tank {0:?} has no turn actions planned")]
    NoTurnActions(Entity),
    #[error("planning is not allowed while the turn is being played back")]
    PlaybackInProgress,
    #[error("no tank is selected")]
    NothingSelected,
    #[error(transparent)]
    Turn(#[from] TurnError),
}
