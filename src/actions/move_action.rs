use crate::config::MovementConfigData;
use crate::error::PathError;
use crate::movement::{angle_distance, clamp_angle, solve, PathChain, Posture};
use crate::overlay::{OverlayCanvas, OverlayProjection};

/// Drive from one posture to another along a solved path
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAction {
    from: Posture,
    to: Posture,
    path: Result<PathChain, PathError>,
    movement: MovementConfigData,
}

impl MoveAction {
    pub fn new(from: Posture, to: Posture, movement: MovementConfigData) -> Self {
        let path = solve(&from, &to, movement.turn_radius);
        Self {
            from,
            to,
            path,
            movement,
        }
    }

    /// Move the target waypoint, e.g. while the player drags the ghost tank
    pub fn update_target(&mut self, to: Posture) {
        self.to = to;
        self.path = solve(&self.from, &self.to, self.movement.turn_radius);
    }

    pub fn from(&self) -> Posture {
        self.from
    }

    pub fn final_posture(&self) -> Posture {
        self.to
    }

    pub fn is_valid(&self) -> bool {
        self.path.is_ok()
    }

    pub fn path(&self) -> Option<&PathChain> {
        self.path.as_ref().ok()
    }

    /// Why the current target cannot be reached, if it cannot
    pub fn path_error(&self) -> Option<PathError> {
        self.path.as_ref().err().copied()
    }

    /// Seconds needed to drive the path; zero for an invalid action
    pub fn animation_length(&self) -> f32 {
        match &self.path {
            Ok(path) => path.length() / self.movement.speed,
            Err(_) => 0.0,
        }
    }

    /// Posture `tick` seconds into the move
    pub fn animated_posture(&self, tick: f32) -> Posture {
        let length = self.animation_length();
        if tick <= 0.0 {
            return self.from;
        }
        if tick >= length {
            return self.to;
        }

        let Ok(path) = &self.path else {
            return self.to;
        };

        let body = path.posture_at(tick * self.movement.speed).unwrap_or(self.to);

        // turret turns evenly over the whole move, whatever the body is doing
        let turret_turn = angle_distance(self.from.turret_rotation, self.to.turret_rotation);
        let turret = clamp_angle(self.from.turret_rotation + turret_turn * (tick / length));

        body.with_turret(turret)
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        // nothing to draw while the target is unreachable
        if let Ok(path) = &self.path {
            path.draw_overlays(canvas, projection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn movement() -> MovementConfigData {
        MovementConfigData::default()
    }

    #[test]
    fn test_straight_ahead_duration() {
        let from = Posture::facing(Vec3::ZERO, PI);
        let to = Posture::facing(Vec3::new(0.0, 0.0, 10.0), PI);

        let action = MoveAction::new(from, to, movement());
        assert!(action.is_valid());
        assert_eq!(action.path().unwrap().segments().len(), 1);
        assert!((action.animation_length() - 1.0).abs() < 1e-5);

        let halfway = action.animated_posture(0.5);
        assert!(halfway.position.distance(Vec3::new(0.0, 0.0, 5.0)) < 1e-4);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let from = Posture::new(Vec3::new(1.0, 0.0, 2.0), 0.2, 0.1);
        let to = Posture::new(Vec3::new(30.0, 0.0, -25.0), -1.2, -0.4);

        let action = MoveAction::new(from, to, movement());
        assert!(action.is_valid());
        assert_eq!(action.animated_posture(0.0), from);
        assert_eq!(action.animated_posture(action.animation_length()), to);
        assert_eq!(action.animated_posture(action.animation_length() + 5.0), to);
    }

    #[test]
    fn test_turret_interpolates_over_whole_move() {
        let from = Posture::new(Vec3::ZERO, 0.0, 0.0);
        let to = Posture::new(Vec3::new(30.0, 0.0, -20.0), -FRAC_PI_2, 1.0);

        let action = MoveAction::new(from, to, movement());
        let mid = action.animated_posture(action.animation_length() / 2.0);
        assert!((mid.turret_rotation - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_turret_takes_shortest_way() {
        let from = Posture::new(Vec3::ZERO, PI, PI - 0.2);
        let to = Posture::new(Vec3::new(0.0, 0.0, 10.0), PI, -PI + 0.2);

        let action = MoveAction::new(from, to, movement());
        let mid = action.animated_posture(action.animation_length() / 2.0);
        assert!((mid.turret_rotation.abs() - PI).abs() < 1e-4, "got {}", mid.turret_rotation);
    }

    #[test]
    fn test_update_target_recomputes_path() {
        let start = Posture::facing(Vec3::ZERO, 0.0);
        let mut action = MoveAction::new(start, start, movement());
        assert!(!action.is_valid());
        assert_eq!(action.path_error(), Some(PathError::ZeroDistance));
        assert_eq!(action.animation_length(), 0.0);

        action.update_target(Posture::facing(Vec3::new(30.0, 0.0, -20.0), -FRAC_PI_2));
        assert!(action.is_valid());
        assert!(action.animation_length() > 0.0);

        action.update_target(Posture::facing(Vec3::new(5.0, 0.0, -20.0), 0.0));
        assert!(!action.is_valid());
        assert_eq!(action.path_error(), Some(PathError::ParallelTangents));
    }

    #[test]
    fn test_invalid_action_draws_nothing() {
        let start = Posture::facing(Vec3::ZERO, 0.0);
        let action = MoveAction::new(start, start, movement());
        let mut canvas = crate::overlay::RecordingCanvas::new();
        action.draw_overlays(&mut canvas, &OverlayProjection::default());
        assert!(canvas.commands.is_empty());
    }
}
