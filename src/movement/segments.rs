/// Path segments: straight lines and fixed-radius arcs
///
/// A segment knows its own length and the posture of a tank that has travelled a
/// given distance along it. Turret rotation is left at zero; the owning move action
/// fills it in.

use glam::Vec3;

use super::angles::{clamp_angle, heading_angle, rotate_y};
use super::posture::Posture;
use crate::overlay::{colors, overlay_angle, OverlayCanvas, OverlayProjection, ARC_SPOKE_LENGTH};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Straight segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    start: Vec3,
    direction: Vec3,
    rotation: f32,
    length: f32,
}

impl LineSegment {
    pub fn new(from: Vec3, to: Vec3) -> Self {
        let movement = to - from;
        let direction = movement.normalize_or_zero();

        Self {
            start: from,
            direction,
            rotation: heading_angle(direction),
            length: movement.length(),
        }
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn start_position(&self) -> Vec3 {
        self.start
    }

    pub fn end_position(&self) -> Vec3 {
        self.start + self.direction * self.length
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn posture_at(&self, distance: f32) -> Posture {
        // overshooting the end stops at the end
        let distance = distance.clamp(0.0, self.length);
        Posture::facing(self.start + self.direction * distance, self.rotation)
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        canvas.draw_line(
            projection.overlay_position(self.start),
            projection.overlay_position(self.end_position()),
            colors::ORANGE,
            projection.path_width(),
        );
    }
}

/// Circular segment of fixed radius
///
/// `start_dir`/`end_dir` point from the path towards the arc center, so the tank
/// sits at `center - dir * radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    center: Vec3,
    radius: f32,
    start_dir: Vec3,
    end_dir: Vec3,
    clockwise: bool,
    angle_length: f32,
    length: f32,
}

impl ArcSegment {
    pub fn new(center: Vec3, radius: f32, start_dir: Vec3, end_dir: Vec3, clockwise: bool) -> Self {
        let angle_length = start_dir.angle_between(end_dir);

        Self {
            center,
            radius,
            start_dir,
            end_dir,
            clockwise,
            angle_length,
            length: radius * angle_length,
        }
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_clockwise(&self) -> bool {
        self.clockwise
    }

    /// Turned angle, radians
    pub fn angle_length(&self) -> f32 {
        self.angle_length
    }

    pub fn start_position(&self) -> Vec3 {
        self.center - self.start_dir * self.radius
    }

    pub fn end_position(&self) -> Vec3 {
        self.posture_at(self.length).position
    }

    pub fn posture_at(&self, distance: f32) -> Posture {
        let fraction = if self.length > f32::EPSILON {
            (distance / self.length).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut current_angle = fraction * self.angle_length;
        if self.clockwise {
            current_angle = -current_angle;
        }

        let current_dir = rotate_y(self.start_dir, current_angle);
        let position = self.center - current_dir * self.radius;

        // tangent is the inward direction turned a quarter towards the travel side
        let mut rotation = heading_angle(current_dir) - FRAC_PI_2;
        if self.clockwise {
            rotation += PI;
        }

        Posture::facing(position, clamp_angle(rotation))
    }

    /// Overlay start/end angles ordered for the renderer's sweep direction
    fn overlay_angles(&self) -> (f32, f32) {
        let mut start = overlay_angle(-self.start_dir);
        let mut end = overlay_angle(-self.end_dir);

        if self.clockwise && start > end {
            end += TAU;
        } else if !self.clockwise && end > start {
            start += TAU;
        }

        (start, end)
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        let center = projection.overlay_position(self.center);
        let (start_angle, end_angle) = self.overlay_angles();

        canvas.draw_arc(
            center,
            projection.meters_to_pixels(self.radius),
            start_angle,
            end_angle,
            projection.arc_point_count,
            colors::CRIMSON,
            projection.path_width(),
        );

        canvas.draw_line(
            center,
            projection.overlay_position(self.center - self.start_dir * ARC_SPOKE_LENGTH),
            colors::GREEN,
            1.0,
        );
        canvas.draw_line(
            center,
            projection.overlay_position(self.center - self.end_dir * ARC_SPOKE_LENGTH),
            colors::RED,
            1.0,
        );
    }
}

/// One piece of a path chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl PathSegment {
    pub fn length(&self) -> f32 {
        match self {
            PathSegment::Line(line) => line.length(),
            PathSegment::Arc(arc) => arc.length(),
        }
    }

    pub fn posture_at(&self, distance: f32) -> Posture {
        match self {
            PathSegment::Line(line) => line.posture_at(distance),
            PathSegment::Arc(arc) => arc.posture_at(distance),
        }
    }

    pub fn start_position(&self) -> Vec3 {
        match self {
            PathSegment::Line(line) => line.start_position(),
            PathSegment::Arc(arc) => arc.start_position(),
        }
    }

    pub fn end_position(&self) -> Vec3 {
        match self {
            PathSegment::Line(line) => line.end_position(),
            PathSegment::Arc(arc) => arc.end_position(),
        }
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        match self {
            PathSegment::Line(line) => line.draw_overlays(canvas, projection),
            PathSegment::Arc(arc) => arc.draw_overlays(canvas, projection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_posture_clamps_overshoot() {
        let line = LineSegment::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(line.length(), 10.0);

        let halfway = line.posture_at(5.0);
        assert!(halfway.position.distance(Vec3::new(0.0, 0.0, 5.0)) < 1e-5);
        // travelling +Z means heading PI
        assert!((halfway.base_rotation - PI).abs() < 1e-5);

        let past_end = line.posture_at(25.0);
        assert!(past_end.position.distance(Vec3::new(0.0, 0.0, 10.0)) < 1e-5);
    }

    #[test]
    fn test_clockwise_quarter_arc() {
        // right turn from heading -Z to heading +X around (12, 0, -8)
        let arc = ArcSegment::new(Vec3::new(12.0, 0.0, -8.0), 12.0, Vec3::X, Vec3::Z, true);

        assert!((arc.angle_length() - FRAC_PI_2).abs() < 1e-5);
        assert!((arc.length() - 12.0 * FRAC_PI_2).abs() < 1e-4);

        let start = arc.posture_at(0.0);
        assert!(start.position.distance(Vec3::new(0.0, 0.0, -8.0)) < 1e-4);
        assert!(start.base_rotation.abs() < 1e-4);

        let end = arc.posture_at(arc.length());
        assert!(end.position.distance(Vec3::new(12.0, 0.0, -20.0)) < 1e-3);
        assert!((end.base_rotation + FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_counter_clockwise_arc_stays_on_circle() {
        // left turn from heading -Z around (-12, 0, 0)
        let arc = ArcSegment::new(Vec3::new(-12.0, 0.0, 0.0), 12.0, Vec3::NEG_X, Vec3::Z, false);
        assert!(arc.start_position().distance(Vec3::ZERO) < 1e-5);

        for i in 0..=10 {
            let d = arc.length() * i as f32 / 10.0;
            let posture = arc.posture_at(d);
            let r = posture.position.distance(arc.center());
            assert!((r - 12.0).abs() < 1e-3, "radius {} at {}", r, d);
        }

        assert!(arc.start_position().distance(arc.posture_at(0.0).position) < 1e-5);
        let start = arc.posture_at(0.0);
        assert!(start.base_rotation.abs() < 1e-4, "got {}", start.base_rotation);
        let end = arc.posture_at(arc.length());
        assert!(end.position.distance(Vec3::new(-12.0, 0.0, -12.0)) < 1e-3);
        assert!((end.base_rotation - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_segment_overlays() {
        let mut canvas = crate::overlay::RecordingCanvas::new();
        let projection = OverlayProjection::default();

        PathSegment::Line(LineSegment::new(Vec3::ZERO, Vec3::X)).draw_overlays(&mut canvas, &projection);
        PathSegment::Arc(ArcSegment::new(Vec3::ZERO, 12.0, Vec3::X, Vec3::Z, true))
            .draw_overlays(&mut canvas, &projection);

        assert_eq!(canvas.arc_count(), 1);
        // one path line plus two arc spokes
        assert_eq!(canvas.line_count(), 3);
    }
}
