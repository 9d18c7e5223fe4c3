use glam::Vec2;

use crate::debug::DebugColor;
use crate::types::*;

/// Read-only view of a tile grid, as consumed by the broadphase and controller.
pub trait TileGridApi {
    /// Width in cells.
    fn width(&self) -> i32;

    /// Height in cells.
    fn height(&self) -> i32;

    /// Edge length of one cell in world units.
    fn cell_size(&self) -> f32;

    /// Collider at cell `(x, y)`. Out-of-bounds cells are `Empty`.
    fn get(&self, x: i32, y: i32) -> ColliderType;

    /// Collider polygon of cell `(x, y)` translated to world space.
    fn collider_polygon_world(&self, x: i32, y: i32) -> CellPolygon {
        let cs = self.cell_size();
        self.get(x, y)
            .local_polygon(cs)
            .translated(Vec2::new(x as f32 * cs, y as f32 * cs))
    }
}

/// Narrowphase primitive tests.
pub trait NarrowphaseApi {
    /// SAT overlap between a vertical capsule and a convex polygon.
    /// Polygons with fewer than three vertices never collide.
    fn capsule_polygon(capsule: &Capsule, poly: &[Vec2]) -> Option<Contact>;
}

/// Line-drawing capability used only for visualization.
pub trait DebugDraw {
    fn draw_line(&mut self, a: Vec2, b: Vec2, color: DebugColor);

    /// Connected line strip through `points`; `closed` adds the last→first edge.
    fn draw_polyline(&mut self, points: &[Vec2], color: DebugColor, closed: bool);
}

/// Public contract of a kinematic actor driven at a fixed timestep.
pub trait KinematicControllerApi {
    fn position(&self) -> Vec2;

    fn velocity(&self) -> Vec2;

    fn is_grounded(&self) -> bool;

    /// Last ground normal (`(0,-1)` when nothing has been stood on yet).
    fn ground_normal(&self) -> Vec2;

    /// Capsule bounds in world space.
    fn bounds_aabb(&self) -> Aabb;

    /// Place the actor at `position`, clearing velocity, timers and ground state.
    fn teleport_to(&mut self, position: Vec2);

    /// Advance one fixed step.
    ///
    /// `move_axis` is clamped to [-1, 1]; `jump_pressed` must already be an edge
    /// (true only on the tick the button went down).
    fn tick<G: TileGridApi>(&mut self, dt: f32, move_axis: f32, jump_pressed: bool, grid: &G);
}
