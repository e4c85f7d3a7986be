//! Tank Tactics: turn planning and synchronized playback for a turn-based
//! tactical tank game.
//!
//! Players plan moves and shots for each tank; paths are solved as line, arc,
//! line chains with a fixed turn radius. Once the turn is committed every tank
//! plays its actions back from one shared start time.

pub mod actions;
pub mod config;
pub mod ecs; // ECS world holding tanks, ghosts and effects
pub mod error;
pub mod game;
pub mod game_manager;
pub mod movement; // Postures, path segments and the path solver
pub mod overlay;
pub mod scene;
pub mod turn_animator;

pub use actions::{ActionKind, ActionRules, Advance, FireAction, MoveAction, TurnAction, TurnActionList};
pub use config::GameConfig;
pub use error::{GameError, PathError, TurnError};
pub use game::{Game, PlanningInput};
pub use movement::{solve, NodePosture, PathChain, PathSegment, Posture, SmokePosture};
pub use scene::{AnimationPosture, AnimationTarget, NodeHandle, NodeKind, SceneNodes};
pub use turn_animator::{PlaybackEvent, TurnAnimator};
