use glam::Vec3;
use tracing::debug;

use crate::config::TurretConfigData;
use crate::movement::{angle_distance, clamp_angle, heading_angle, rotate_y, NodePosture, Posture, SmokePosture};
use crate::overlay::{colors, draw_aim_mark, OverlayCanvas, OverlayProjection};
use crate::scene::{AnimationPosture, NodeHandle, NodeKind, SceneNodes};

/// Turn the turret onto a target, then fire
///
/// The target position is captured when the action is created. A unit that moves
/// afterwards is not tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct FireAction {
    shooting_posture: Posture,
    final_posture: Posture,
    target_position: Vec3,
    turret: TurretConfigData,
    smoke: Option<NodeHandle>,
}

impl FireAction {
    pub fn new(shooting_posture: Posture, target_position: Vec3, turret: TurretConfigData) -> Self {
        let aim = heading_angle(target_position - shooting_posture.position);
        let final_posture = shooting_posture.with_turret(clamp_angle(aim - shooting_posture.base_rotation));

        Self {
            shooting_posture,
            final_posture,
            target_position,
            turret,
            smoke: None,
        }
    }

    pub fn shooting_posture(&self) -> Posture {
        self.shooting_posture
    }

    /// Posture with the turret aimed at the target
    pub fn final_posture(&self) -> Posture {
        self.final_posture
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    fn turret_turn(&self) -> f32 {
        angle_distance(self.shooting_posture.turret_rotation, self.final_posture.turret_rotation)
    }

    /// Seconds spent turning the turret
    pub fn turn_length(&self) -> f32 {
        self.turret_turn().abs() / self.turret.rotation_speed
    }

    pub fn animation_length(&self) -> f32 {
        self.turn_length() + self.turret.firing_effect_duration
    }

    pub fn animated_posture(&self, tick: f32) -> Posture {
        let turn_length = self.turn_length();
        if tick <= 0.0 {
            return self.shooting_posture;
        }
        if tick >= turn_length {
            return self.final_posture;
        }

        let turret = self.shooting_posture.turret_rotation + self.turret_turn() * (tick / turn_length);
        self.shooting_posture.with_turret(turret)
    }

    /// Muzzle smoke during the firing phase, `None` while the turret is still turning
    pub fn smoke_posture(&self, tick: f32) -> Option<SmokePosture> {
        let turn_length = self.turn_length();
        if tick < turn_length {
            return None;
        }

        let size = if self.turret.firing_effect_duration > 0.0 {
            ((tick - turn_length) / self.turret.firing_effect_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let gun_rotation = self.final_posture.gun_rotation();
        Some(SmokePosture {
            position: self.final_posture.position + rotate_y(self.turret.muzzle_offset, gun_rotation),
            rotation: gun_rotation,
            size,
        })
    }

    /// Postures for this frame; spawns the smoke node the first time it is needed
    pub fn animate(&mut self, tick: f32, nodes: &mut dyn SceneNodes) -> Vec<AnimationPosture> {
        let mut postures = vec![AnimationPosture::unit(NodePosture::Body(self.animated_posture(tick)))];

        if let Some(smoke) = self.smoke_posture(tick) {
            let handle = match self.smoke {
                Some(handle) => handle,
                None => {
                    let handle = nodes.instantiate(NodeKind::BarrelSmoke);
                    debug!(smoke = ?handle, "barrel_smoke_spawned");
                    self.smoke = Some(handle);
                    handle
                }
            };
            postures.push(AnimationPosture::node(handle, NodePosture::Smoke(smoke)));
        }

        postures
    }

    /// Release the smoke node, if one was spawned
    pub fn finish(&mut self, nodes: &mut dyn SceneNodes) {
        if let Some(handle) = self.smoke.take() {
            debug!(smoke = ?handle, "barrel_smoke_released");
            nodes.destroy(handle);
        }
    }

    pub fn smoke_node(&self) -> Option<NodeHandle> {
        self.smoke
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        canvas.draw_line(
            projection.overlay_position(self.shooting_posture.position),
            projection.overlay_position(self.target_position),
            colors::BURLYWOOD,
            projection.path_width(),
        );
        draw_aim_mark(canvas, projection, self.target_position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::RecordingCanvas;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[derive(Default)]
    struct CountingNodes {
        spawned: Vec<NodeKind>,
        destroyed: Vec<NodeHandle>,
    }

    impl SceneNodes for CountingNodes {
        fn instantiate(&mut self, kind: NodeKind) -> NodeHandle {
            self.spawned.push(kind);
            NodeHandle::DANGLING
        }

        fn destroy(&mut self, handle: NodeHandle) {
            self.destroyed.push(handle);
        }

        fn apply_posture(&mut self, _handle: NodeHandle, _posture: &NodePosture) {}
    }

    fn turret() -> TurretConfigData {
        TurretConfigData::default()
    }

    #[test]
    fn test_aims_at_target() {
        let shooter = Posture::facing(Vec3::ZERO, 0.0);
        let action = FireAction::new(shooter, Vec3::new(10.0, 0.0, 0.0), turret());

        // +X is a quarter turn clockwise from -Z
        assert!((action.final_posture().turret_rotation + FRAC_PI_2).abs() < 1e-5);
        assert!((action.turn_length() - FRAC_PI_2 / 0.8).abs() < 1e-4);
        assert!((action.animation_length() - (FRAC_PI_2 / 0.8 + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_turret_relative_to_body() {
        let shooter = Posture::facing(Vec3::ZERO, FRAC_PI_2);
        let action = FireAction::new(shooter, Vec3::new(-10.0, 0.0, 0.0), turret());

        // body already faces the target
        assert!(action.final_posture().turret_rotation.abs() < 1e-5);
        assert!(action.turn_length() < 1e-4);
    }

    #[test]
    fn test_turret_turns_proportionally() {
        let shooter = Posture::facing(Vec3::ZERO, 0.0);
        let action = FireAction::new(shooter, Vec3::new(0.0, 0.0, 10.0), turret());
        let turn = action.turn_length();
        assert!((turn - PI / 0.8).abs() < 1e-4);

        let half = action.animated_posture(turn / 2.0);
        assert!((half.turret_rotation.abs() - FRAC_PI_2).abs() < 1e-4);
        assert_eq!(action.animated_posture(0.0), shooter);
        assert_eq!(action.animated_posture(turn + 0.5), action.final_posture());
        assert!(action.smoke_posture(turn / 2.0).is_none());
    }

    #[test]
    fn test_smoke_grows_at_muzzle() {
        let shooter = Posture::facing(Vec3::new(5.0, 0.0, 5.0), 0.0);
        let action = FireAction::new(shooter, Vec3::new(5.0, 0.0, -50.0), turret());
        assert!(action.turn_length() < 1e-5);

        let start = action.smoke_posture(0.0).unwrap();
        assert_eq!(start.size, 0.0);
        assert!(start.position.distance(Vec3::new(5.0, 1.6, 0.8)) < 1e-4);

        let middle = action.smoke_posture(0.5).unwrap();
        assert!((middle.size - 0.5).abs() < 1e-5);

        let end = action.smoke_posture(5.0).unwrap();
        assert_eq!(end.size, 1.0);
    }

    #[test]
    fn test_smoke_spawned_once_and_released_once() {
        let shooter = Posture::facing(Vec3::ZERO, 0.0);
        let mut action = FireAction::new(shooter, Vec3::new(10.0, 0.0, 0.0), turret());
        let mut nodes = CountingNodes::default();

        let turning = action.animate(0.5, &mut nodes);
        assert_eq!(turning.len(), 1);
        assert!(nodes.spawned.is_empty());

        let firing_tick = action.turn_length() + 0.2;
        assert_eq!(action.animate(firing_tick, &mut nodes).len(), 2);
        assert_eq!(action.animate(firing_tick + 0.1, &mut nodes).len(), 2);
        assert_eq!(nodes.spawned, vec![NodeKind::BarrelSmoke]);

        action.finish(&mut nodes);
        action.finish(&mut nodes);
        assert_eq!(nodes.destroyed.len(), 1);
        assert!(action.smoke_node().is_none());
    }

    #[test]
    fn test_fire_overlay() {
        let action = FireAction::new(Posture::default(), Vec3::new(20.0, 0.0, -20.0), turret());
        let mut canvas = RecordingCanvas::new();
        action.draw_overlays(&mut canvas, &OverlayProjection::default());

        // fire line plus aim mark
        assert_eq!(canvas.line_count(), 5);
        assert_eq!(canvas.arc_count(), 1);
    }
}
