/// Movement system for turn-based tactical gameplay
///
/// Postures, path segments and the line-arc-line path solver

pub mod angles;
pub mod events;
pub mod posture;
pub mod segments;
pub mod solver;

pub use angles::{angle_distance, clamp_angle, heading_angle, heading_direction, rotate_y};
pub use events::{TurnEvent, TurnEventRecorder};
pub use posture::{NodePosture, Posture, SmokePosture};
pub use segments::{ArcSegment, LineSegment, PathSegment};
pub use solver::{solve, PathChain};
