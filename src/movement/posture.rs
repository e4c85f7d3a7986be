/// Postures: where a node is and which way it is facing
///
/// A `Posture` is what a tank looks like at one instant of a turn. `NodePosture`
/// tags the payload with the kind of node it is applied to.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::angles::{clamp_angle, heading_direction};

/// Tank posture: position plus body and turret rotation (radians, about +Y)
///
/// Turret rotation is relative to the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posture {
    pub position: Vec3,
    pub base_rotation: f32,
    pub turret_rotation: f32,
}

impl Posture {
    pub fn new(position: Vec3, base_rotation: f32, turret_rotation: f32) -> Self {
        Self {
            position,
            base_rotation: clamp_angle(base_rotation),
            turret_rotation: clamp_angle(turret_rotation),
        }
    }

    /// Body-only posture with the turret facing straight ahead
    pub fn facing(position: Vec3, base_rotation: f32) -> Self {
        Self::new(position, base_rotation, 0.0)
    }

    pub fn forward_direction(&self) -> Vec3 {
        heading_direction(self.base_rotation)
    }

    pub fn back_direction(&self) -> Vec3 {
        -self.forward_direction()
    }

    /// World-space heading of the gun
    pub fn gun_rotation(&self) -> f32 {
        clamp_angle(self.base_rotation + self.turret_rotation)
    }

    pub fn with_turret(mut self, turret_rotation: f32) -> Self {
        self.turret_rotation = clamp_angle(turret_rotation);
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Rotate the body, keeping the turret's body-relative angle
    pub fn rotated(mut self, angle: f32) -> Self {
        self.base_rotation = clamp_angle(self.base_rotation + angle);
        self
    }
}

impl Default for Posture {
    fn default() -> Self {
        Self::facing(Vec3::ZERO, 0.0)
    }
}

/// Muzzle smoke effect posture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmokePosture {
    pub position: Vec3,
    pub rotation: f32,
    /// Fraction of the maximum cloud size, 0.0..=1.0
    pub size: f32,
}

/// Posture payload for any animated node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodePosture {
    Body(Posture),
    Smoke(SmokePosture),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_directions() {
        let posture = Posture::facing(Vec3::ZERO, 0.0);
        assert!(posture.forward_direction().distance(Vec3::NEG_Z) < 1e-6);
        assert!(posture.back_direction().distance(Vec3::Z) < 1e-6);

        let turned = posture.rotated(FRAC_PI_2);
        assert!(turned.forward_direction().distance(Vec3::NEG_X) < 1e-6);
    }

    #[test]
    fn test_angles_are_clamped() {
        let posture = Posture::new(Vec3::ZERO, 3.0 * PI, -PI);
        assert!((posture.base_rotation - PI).abs() < 1e-5);
        assert!((posture.turret_rotation - PI).abs() < 1e-5);

        let rotated = posture.rotated(PI);
        assert!(rotated.base_rotation.abs() < 1e-5);
    }

    #[test]
    fn test_gun_rotation_combines_body_and_turret() {
        let posture = Posture::new(Vec3::ZERO, 2.0, 2.0);
        assert!((posture.gun_rotation() - clamp_angle(4.0)).abs() < 1e-6);
    }
}
