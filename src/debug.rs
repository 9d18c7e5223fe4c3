//! Line-based visualization of tile colliders and the controller capsule.
//!
//! Nothing here affects simulation; callers supply a [`DebugDraw`] sink.

use glam::Vec2;

use crate::api::{DebugDraw, KinematicControllerApi, TileGridApi};
use crate::controller::CharacterController;

/// Segments per capsule end circle.
const CAP_SEGMENTS: usize = 12;
/// Drawn length of the ground normal.
const NORMAL_LEN: f32 = 60.0;

/// RGBA, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DebugColor(pub [u8; 4]);

impl DebugColor {
    pub const TILE: Self = Self([90, 160, 255, 255]);
    pub const CAPSULE: Self = Self([255, 220, 80, 255]);
    pub const GROUND_NORMAL: Self = Self([80, 255, 120, 255]);
    pub const AIRBORNE: Self = Self([255, 110, 90, 255]);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
}

/// Outline every non-empty cell of `grid` as a closed polyline.
pub fn draw_grid_colliders<G: TileGridApi, D: DebugDraw>(grid: &G, draw: &mut D, color: DebugColor) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get(x, y).is_empty() {
                continue;
            }
            let poly = grid.collider_polygon_world(x, y);
            if !poly.is_degenerate() {
                draw.draw_polyline(poly.vertices(), color, true);
            }
        }
    }
}

fn circle_points(center: Vec2, radius: f32) -> [Vec2; CAP_SEGMENTS] {
    std::array::from_fn(|i| {
        let a = i as f32 / CAP_SEGMENTS as f32 * std::f32::consts::TAU;
        center + Vec2::new(a.cos(), a.sin()) * radius
    })
}

impl CharacterController {
    /// Capsule core segment, both end circles and, when grounded, the ground normal.
    pub fn debug_draw<D: DebugDraw>(&self, draw: &mut D) {
        let cap = self.capsule();
        let (s0, s1) = cap.segment_endpoints();
        let color = if self.is_grounded() { DebugColor::CAPSULE } else { DebugColor::AIRBORNE };

        draw.draw_line(s0, s1, color);
        draw.draw_polyline(&circle_points(s0, cap.radius), color, true);
        draw.draw_polyline(&circle_points(s1, cap.radius), color, true);

        if self.is_grounded() {
            let foot = s1 + Vec2::new(0.0, cap.radius);
            draw.draw_line(foot, foot + self.ground_normal() * NORMAL_LEN, DebugColor::GROUND_NORMAL);
        }
    }
}
