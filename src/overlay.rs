/// Ground overlay drawing
///
/// Planned paths, fire lines and aim marks are drawn onto a 2D overlay texture that
/// is stretched over the ground plane. The core only describes what to draw; the
/// renderer behind `OverlayCanvas` does the actual rasterizing.

use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;

use crate::config::OverlayConfigData;

/// RGBA color
pub type Color = Vec4;

pub mod colors {
    use super::Color;

    pub const ORANGE: Color = Color::new(1.0, 0.647, 0.0, 1.0);
    pub const CRIMSON: Color = Color::new(0.863, 0.078, 0.235, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const BURLYWOOD: Color = Color::new(0.871, 0.722, 0.529, 1.0);
}

/// Aim mark dimensions, in meters
const AIM_MARK_OUTER_RADIUS: f32 = 8.0;
const AIM_MARK_INNER_RADIUS: f32 = 5.0;
const AIM_MARK_LINE_WIDTH: f32 = 1.0;

/// Length of the arc center debug spokes, in meters
pub const ARC_SPOKE_LENGTH: f32 = 5.0;

/// Drawing surface implemented by the renderer
///
/// Angles passed to `draw_arc` are overlay angles: measured from +X towards +Y of
/// the overlay (which is world +Z).
pub trait OverlayCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    #[allow(clippy::too_many_arguments)]
    fn draw_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        point_count: u32,
        color: Color,
        width: f32,
    );
}

/// Maps world meters on the ground plane to overlay pixels
#[derive(Debug, Clone, Copy)]
pub struct OverlayProjection {
    /// Overlay texture edge length in pixels
    pub overlay_pixels: f32,
    /// Ground plane size in meters (X, Z), centered on the world origin
    pub ground_plane_size: Vec2,
    pub path_width_meters: f32,
    pub arc_point_count: u32,
}

impl OverlayProjection {
    pub fn from_config(config: &OverlayConfigData) -> Self {
        Self {
            overlay_pixels: config.overlay_pixels,
            ground_plane_size: Vec2::new(config.ground_plane_size[0], config.ground_plane_size[1]),
            path_width_meters: config.path_width,
            arc_point_count: config.arc_point_count,
        }
    }

    pub fn meters_to_pixels(&self, meters: f32) -> f32 {
        let pixels_per_meter = self.overlay_pixels / self.ground_plane_size.x;
        meters * pixels_per_meter
    }

    /// Project a world position onto the overlay (Y is dropped)
    pub fn overlay_position(&self, world: Vec3) -> Vec2 {
        let u = world.x / self.ground_plane_size.x + 0.5;
        let v = world.z / self.ground_plane_size.y + 0.5;
        Vec2::new(u * self.overlay_pixels, v * self.overlay_pixels)
    }

    pub fn path_width(&self) -> f32 {
        self.meters_to_pixels(self.path_width_meters)
    }
}

impl Default for OverlayProjection {
    fn default() -> Self {
        Self::from_config(&OverlayConfigData::default())
    }
}

/// Overlay angle of a horizontal world direction
pub fn overlay_angle(direction: Vec3) -> f32 {
    direction.z.atan2(direction.x)
}

/// Crosshair marker drawn where a fire action is aimed
pub fn draw_aim_mark(canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection, at: Vec3) {
    let center = projection.overlay_position(at);
    let outer = projection.meters_to_pixels(AIM_MARK_OUTER_RADIUS);
    let inner = projection.meters_to_pixels(AIM_MARK_INNER_RADIUS);
    let width = projection.meters_to_pixels(AIM_MARK_LINE_WIDTH);

    canvas.draw_arc(center, outer, 0.0, std::f32::consts::TAU, 32, colors::RED, width);

    for axis in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
        canvas.draw_line(center + axis * inner, center + axis * outer, colors::RED, width);
    }
}

/// Selection ring dimensions, in overlay pixels
const SELECTION_RADIUS_PIXELS: f32 = 128.0;
const SELECTION_WIDTH_PIXELS: f32 = 8.0;

/// Ring drawn around the tank being planned
pub fn draw_selection_mark(canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection, at: Vec3) {
    canvas.draw_arc(
        projection.overlay_position(at),
        SELECTION_RADIUS_PIXELS,
        0.0,
        std::f32::consts::TAU,
        32,
        colors::RED,
        SELECTION_WIDTH_PIXELS,
    );
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Arc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        point_count: u32,
        color: Color,
        width: f32,
    },
}

/// Canvas that keeps every draw call, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn arc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
            .count()
    }
}

impl OverlayCanvas for RecordingCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }

    fn draw_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        point_count: u32,
        color: Color,
        width: f32,
    ) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            point_count,
            color,
            width,
        });
    }
}
