/// Planar angle helpers
///
/// Headings are rotations about +Y. Rotation 0 faces -Z and positive angles turn
/// counter-clockwise when seen from above, so every heading maps to a forward vector
/// via `rotate_y(Vec3::NEG_Z, angle)`.

use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Normalize an angle into (-PI, PI]
pub fn clamp_angle(angle: f32) -> f32 {
    let mut wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped -= TAU;
    }
    // rounding can land exactly on -PI
    if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Shortest signed rotation taking `from` onto `to`
pub fn angle_distance(from: f32, to: f32) -> f32 {
    clamp_angle(to - from)
}

/// Rotate a vector about the world up axis
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Heading (base rotation) of a unit whose forward axis points along `direction`
pub fn heading_angle(direction: Vec3) -> f32 {
    clamp_angle((-direction.x).atan2(-direction.z))
}

/// Forward unit vector for a heading
pub fn heading_direction(angle: f32) -> Vec3 {
    rotate_y(Vec3::NEG_Z, angle)
}
