/// Core ECS components for battlefield entities
///
/// Positions are ground-plane world coordinates in meters. Headings and turret
/// angles are rotations about +Y in radians.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::movement::Posture;
use crate::scene::NodeKind;

/// World position component
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec3);

/// Body heading component (radians, 0 faces -Z)
#[derive(Debug, Clone, Copy)]
pub struct Heading(pub f32);

/// Turret component, rotation is relative to the body
#[derive(Debug, Clone, Copy, Default)]
pub struct Turret {
    pub rotation: f32,
}

/// Muzzle smoke effect component
#[derive(Debug, Clone, Copy, Default)]
pub struct SmokeCloud {
    /// Fraction of the maximum size, 0.0..=1.0
    pub size: f32,
    /// Cloud radius in meters
    pub radius: f32,
    /// Cloud height in meters
    pub height: f32,
}

impl SmokeCloud {
    /// Cloud dimensions for a size fraction; height is half the radius
    pub fn sized(size: f32, max_radius: f32) -> Self {
        let radius = max_radius * size;
        Self {
            size,
            radius,
            height: radius / 2.0,
        }
    }
}

/// Tag component for different entity types
pub type EntityType = NodeKind;

/// Vehicle component for named tanks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
}

/// Read a body posture back from components
pub fn posture_from(position: &Position, heading: &Heading, turret: Option<&Turret>) -> Posture {
    Posture::new(
        position.0,
        heading.0,
        turret.map(|turret| turret.rotation).unwrap_or(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke_cloud_dimensions() {
        let cloud = SmokeCloud::sized(0.5, 3.6);
        assert!((cloud.radius - 1.8).abs() < 1e-6);
        assert!((cloud.height - 0.9).abs() < 1e-6);

        let empty = SmokeCloud::sized(0.0, 3.6);
        assert_eq!(empty.radius, 0.0);
    }

    #[test]
    fn test_posture_from_components() {
        let posture = posture_from(
            &Position(Vec3::new(1.0, 0.0, 2.0)),
            &Heading(0.5),
            Some(&Turret { rotation: -0.25 }),
        );
        assert_eq!(posture, Posture::new(Vec3::new(1.0, 0.0, 2.0), 0.5, -0.25));

        let no_turret = posture_from(&Position(Vec3::ZERO), &Heading(0.5), None);
        assert_eq!(no_turret.turret_rotation, 0.0);
    }
}
