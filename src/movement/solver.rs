/// Path solver: line - arc - line chains between two postures
///
/// The tank leaves `from` along its forward axis, turns on a single arc of fixed
/// radius and arrives at `to` along `to`'s forward axis. The arc is tangent to both
/// axes, so its center lies on the bisector of the corner where the axes cross.

use glam::{Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;
use tracing::trace;

use super::angles::rotate_y;
use super::posture::Posture;
use super::segments::{ArcSegment, LineSegment, PathSegment};
use crate::error::PathError;
use crate::overlay::{OverlayCanvas, OverlayProjection};

/// Below this the two tangent lines count as parallel
const PARALLEL_EPSILON: f32 = 1e-5;
/// Below this sin(half angle) the corner is degenerate
const DEGENERATE_EPSILON: f32 = 1e-5;
/// Distance under which two positions are the same spot, in meters
const DISTANCE_EPSILON: f32 = 1e-4;
/// Allowed sideways drift, relative to distance, for a straight-ahead move
const COLLINEAR_EPSILON: f32 = 1e-3;

/// Continuous chain of path segments
#[derive(Debug, Clone, PartialEq)]
pub struct PathChain {
    segments: Vec<PathSegment>,
    length: f32,
}

impl PathChain {
    fn new(segments: Vec<PathSegment>) -> Self {
        let length = segments.iter().map(PathSegment::length).sum();
        Self { segments, length }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Total traversable length, in meters
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn is_straight(&self) -> bool {
        matches!(self.segments.as_slice(), [PathSegment::Line(_)])
    }

    pub fn start_position(&self) -> Option<Vec3> {
        self.segments.first().map(PathSegment::start_position)
    }

    pub fn end_position(&self) -> Option<Vec3> {
        self.segments.last().map(PathSegment::end_position)
    }

    /// Posture after travelling `distance` meters; clamps to the chain end
    pub fn posture_at(&self, distance: f32) -> Option<Posture> {
        let mut remaining = distance;

        for segment in &self.segments {
            if remaining < segment.length() {
                return Some(segment.posture_at(remaining));
            }
            remaining -= segment.length();
        }

        self.segments.last().map(|last| last.posture_at(last.length()))
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        for segment in &self.segments {
            segment.draw_overlays(canvas, projection);
        }
    }
}

fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Where the forward axis of `from` crosses the forward axis of `to`
///
/// Both axes are infinite lines. Returns `None` when they are parallel.
fn tangent_intersection(from: &Posture, to: &Posture) -> Option<Vec3> {
    let from_point = planar(from.position);
    let to_point = planar(to.position);
    let from_dir = planar(from.forward_direction());
    let to_dir = planar(to.forward_direction());

    let denominator = from_dir.perp_dot(to_dir);
    if denominator.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (to_point - from_point).perp_dot(to_dir) / denominator;
    let point = from_point + from_dir * t;

    Some(Vec3::new(point.x, from.position.y, point.y))
}

/// Parallel axes only connect when `to` is dead ahead with the same heading
fn straight_chain(from: &Posture, to: &Posture) -> Result<PathChain, PathError> {
    let offset = planar(to.position - from.position);
    let distance = offset.length();
    if distance < DISTANCE_EPSILON {
        return Err(PathError::ZeroDistance);
    }

    let forward = planar(from.forward_direction());
    let same_heading = from.forward_direction().dot(to.forward_direction()) > 0.0;
    let collinear = forward.perp_dot(offset).abs() <= COLLINEAR_EPSILON * distance;
    let ahead = forward.dot(offset) > 0.0;

    if same_heading && collinear && ahead {
        Ok(PathChain::new(vec![PathSegment::Line(LineSegment::new(
            from.position,
            to.position,
        ))]))
    } else {
        Err(PathError::ParallelTangents)
    }
}

/// Build the chain from `from` to `to` with the given turn radius
pub fn solve(from: &Posture, to: &Posture, turn_radius: f32) -> Result<PathChain, PathError> {
    let Some(intersection) = tangent_intersection(from, to) else {
        let result = straight_chain(from, to);
        if let Err(error) = &result {
            trace!(%error, "no_path");
        }
        return result;
    };

    let from_direction = from.back_direction();
    let to_direction = to.forward_direction();

    let half_angle = from_direction.angle_between(to_direction) / 2.0;
    let sin_half = half_angle.sin();
    if sin_half.abs() < DEGENERATE_EPSILON {
        trace!(error = %PathError::DegenerateTurn, "no_path");
        return Err(PathError::DegenerateTurn);
    }

    let displacement = turn_radius / sin_half;
    let clockwise = from_direction.cross(to_direction).y > 0.0;

    let (bisector_angle, start_dir, end_dir) = if clockwise {
        (
            -half_angle,
            rotate_y(from_direction, FRAC_PI_2),
            rotate_y(to_direction, -FRAC_PI_2),
        )
    } else {
        (
            half_angle,
            rotate_y(from_direction, -FRAC_PI_2),
            rotate_y(to_direction, FRAC_PI_2),
        )
    };

    let center = intersection + rotate_y(to_direction, bisector_angle) * displacement;
    let arc = ArcSegment::new(center, turn_radius, start_dir, end_dir, clockwise);

    let entry = LineSegment::new(from.position, arc.start_position());
    let exit = LineSegment::new(arc.end_position(), to.position);

    // a tangent point on top of an endpoint leaves a line with no usable heading
    let mut segments = Vec::with_capacity(3);
    if entry.length() >= DISTANCE_EPSILON {
        segments.push(PathSegment::Line(entry));
    }
    segments.push(PathSegment::Arc(arc));
    if exit.length() >= DISTANCE_EPSILON {
        segments.push(PathSegment::Line(exit));
    }

    Ok(PathChain::new(segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const RADIUS: f32 = 12.0;

    fn assert_continuous(chain: &PathChain) {
        for pair in chain.segments().windows(2) {
            let gap = pair[0].end_position().distance(pair[1].start_position());
            assert!(gap < 1e-3, "segments not continuous, gap {}", gap);
        }
    }

    #[test]
    fn test_right_turn_geometry() {
        let from = Posture::facing(Vec3::ZERO, 0.0);
        let to = Posture::facing(Vec3::new(30.0, 0.0, -20.0), -FRAC_PI_2);

        let chain = solve(&from, &to, RADIUS).expect("path");
        assert_eq!(chain.segments().len(), 3);
        assert_continuous(&chain);

        let PathSegment::Arc(arc) = chain.segments()[1] else {
            panic!("middle segment must be an arc");
        };
        assert!(arc.is_clockwise());
        assert!(arc.center().distance(Vec3::new(12.0, 0.0, -8.0)) < 1e-3);

        let expected = 8.0 + RADIUS * FRAC_PI_2 + 18.0;
        assert!((chain.length() - expected).abs() < 1e-3, "length {}", chain.length());
        assert!(chain.end_position().unwrap().distance(to.position) < 1e-4);
    }

    #[test]
    fn test_left_turn_geometry() {
        let from = Posture::facing(Vec3::ZERO, 0.0);
        let to = Posture::facing(Vec3::new(-40.0, 0.0, -12.0), FRAC_PI_2);

        let chain = solve(&from, &to, RADIUS).expect("path");
        assert_continuous(&chain);

        // the arc starts right at the tank, so there is no entry line
        assert_eq!(chain.segments().len(), 2);
        let PathSegment::Arc(arc) = chain.segments()[0] else {
            panic!("first segment must be an arc");
        };
        assert!(!arc.is_clockwise());
        assert!(arc.center().distance(Vec3::new(-12.0, 0.0, 0.0)) < 1e-3);
        assert!(!chain.is_straight());

        // leaves along the start heading, arrives along the target heading
        let first = chain.posture_at(0.0).unwrap();
        assert!(first.base_rotation.abs() < 1e-3);
        let turning = chain.posture_at(0.5).unwrap();
        assert!((turning.base_rotation - 0.5 / RADIUS).abs() < 1e-3);
        let last = chain.posture_at(chain.length() - 0.5).unwrap();
        assert!((last.base_rotation - FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_chains_are_continuous() {
        let from = Posture::facing(Vec3::new(3.0, 0.0, -2.0), 0.25);
        for step in 1..16 {
            let heading = step as f32 * PI / 8.0 - PI;
            let target = Vec3::new(25.0 * heading.cos(), 0.0, -30.0 + 10.0 * heading.sin());
            let to = Posture::facing(target, heading);

            if let Ok(chain) = solve(&from, &to, RADIUS) {
                assert_continuous(&chain);
                assert!(chain.start_position().unwrap().distance(from.position) < 1e-5);
                assert!(chain.end_position().unwrap().distance(to.position) < 1e-3);
            }
        }
    }

    #[test]
    fn test_straight_ahead_is_single_line() {
        let from = Posture::facing(Vec3::ZERO, PI);
        let to = Posture::facing(Vec3::new(0.0, 0.0, 10.0), PI);

        let chain = solve(&from, &to, RADIUS).expect("straight path");
        assert!(chain.is_straight());
        assert!((chain.length() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_offsets_have_no_path() {
        let from = Posture::facing(Vec3::ZERO, 0.0);

        let sideways = Posture::facing(Vec3::new(5.0, 0.0, -20.0), 0.0);
        assert_eq!(solve(&from, &sideways, RADIUS), Err(PathError::ParallelTangents));

        let behind = Posture::facing(Vec3::new(0.0, 0.0, 20.0), 0.0);
        assert_eq!(solve(&from, &behind, RADIUS), Err(PathError::ParallelTangents));

        let reversed = Posture::facing(Vec3::new(10.0, 0.0, -20.0), PI);
        assert_eq!(solve(&from, &reversed, RADIUS), Err(PathError::ParallelTangents));
    }

    #[test]
    fn test_corner_behind_start_reverses_entry() {
        // axes cross 3 m ahead, so the arc starts 9 m behind the tank
        let from = Posture::facing(Vec3::ZERO, 0.0);
        let to = Posture::facing(Vec3::new(20.0, 0.0, -3.0), -FRAC_PI_2);

        let chain = solve(&from, &to, RADIUS).expect("path");
        assert_eq!(chain.segments().len(), 3);
        assert_continuous(&chain);

        let PathSegment::Line(entry) = chain.segments()[0] else {
            panic!("first segment must be a line");
        };
        assert!(entry.end_position().distance(Vec3::new(0.0, 0.0, 9.0)) < 1e-3);
        let backing = chain.posture_at(1.0).unwrap();
        assert!((backing.base_rotation.abs() - PI).abs() < 1e-3);
    }

    #[test]
    fn test_nearly_reversed_heading_is_degenerate() {
        // axes still cross, but the corner is too sharp to fit an arc
        let from = Posture::facing(Vec3::ZERO, 0.0);
        let to = Posture::facing(Vec3::new(10.0, 0.0, -30.0), PI - 1.5e-5);
        assert_eq!(solve(&from, &to, RADIUS), Err(PathError::DegenerateTurn));
    }

    #[test]
    fn test_same_spot_has_no_path() {
        let from = Posture::facing(Vec3::new(1.0, 0.0, 1.0), 0.7);
        assert_eq!(solve(&from, &from, RADIUS), Err(PathError::ZeroDistance));
    }
}
