use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Engine-wide tile edge length in world units (pixels).
pub const DEFAULT_CELL_SIZE: f32 = 64.0;

/// Upper bound on vertices any cell collider can produce.
pub const MAX_POLY_VERTS: usize = 4;

/// Vertical stadium: a segment of length `2 * (half_height - radius)` swept by `radius`.
///
/// `half_height` is measured from the center to the very top/bottom of the shape,
/// so total height is `2 * half_height`. A `half_height` smaller than `radius`
/// is not rejected; the segment simply collapses and the capsule acts as a circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Capsule {
    pub center: Vec2,
    pub radius: f32,
    pub half_height: f32,
}

impl Capsule {
    pub fn new(center: Vec2, radius: f32, half_height: f32) -> Self {
        Self {
            center,
            radius,
            half_height,
        }
    }

    /// Half length of the core segment, floored at zero.
    #[inline]
    pub fn segment_half(&self) -> f32 {
        (self.half_height - self.radius).max(0.0)
    }

    /// Top and bottom segment endpoints (y-down, so `.0` is the upper one).
    #[inline]
    pub fn segment_endpoints(&self) -> (Vec2, Vec2) {
        let half = self.segment_half();
        (
            Vec2::new(self.center.x, self.center.y - half),
            Vec2::new(self.center.x, self.center.y + half),
        )
    }

    /// Interval of the capsule projected onto a unit `axis`.
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let (a, b) = self.segment_endpoints();
        let da = a.dot(axis);
        let db = b.dot(axis);
        (da.min(db) - self.radius, da.max(db) + self.radius)
    }

    /// Bounds used by the broadphase: `center ± (radius, half_height)`.
    pub fn aabb(&self) -> Aabb {
        let half = Vec2::new(self.radius, self.half_height);
        Aabb {
            min: self.center - half,
            max: self.center + half,
        }
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Separation info for one overlapping pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the static geometry toward the capsule.
    pub normal: Vec2,
    /// Penetration depth (> 0 whenever a contact is reported).
    pub penetration: f32,
}

/// Collision shape stored in one grid cell.
///
/// "Up" slopes rise as X increases (walk right to climb), "Down" slopes mirror them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderType {
    #[default]
    Empty,
    Solid,
    Slope45Up,
    Slope45Down,
    /// Rises half a cell across the full width.
    SlopeHalfUp,
    SlopeHalfDown,
    /// Rises a full cell across half the width.
    SlopeSteepUp,
    SlopeSteepDown,
}

impl ColliderType {
    pub const ALL: [ColliderType; 8] = [
        ColliderType::Empty,
        ColliderType::Solid,
        ColliderType::Slope45Up,
        ColliderType::Slope45Down,
        ColliderType::SlopeHalfUp,
        ColliderType::SlopeHalfDown,
        ColliderType::SlopeSteepUp,
        ColliderType::SlopeSteepDown,
    ];

    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ColliderType::Empty)
    }

    /// Convex polygon in cell-local space `[0, cell]²` (y-down).
    pub fn local_polygon(self, cell: f32) -> CellPolygon {
        let t = cell;
        let h = cell * 0.5;
        let v = Vec2::new;
        match self {
            ColliderType::Empty => CellPolygon::EMPTY,
            ColliderType::Solid => CellPolygon::quad([v(0.0, 0.0), v(t, 0.0), v(t, t), v(0.0, t)]),
            // solid below the diagonal (0,T)->(T,0)
            ColliderType::Slope45Up => CellPolygon::tri([v(0.0, t), v(t, 0.0), v(t, t)]),
            // solid below the diagonal (0,0)->(T,T)
            ColliderType::Slope45Down => CellPolygon::tri([v(0.0, 0.0), v(0.0, t), v(t, t)]),
            ColliderType::SlopeHalfUp => CellPolygon::tri([v(0.0, t), v(t, h), v(t, t)]),
            ColliderType::SlopeHalfDown => CellPolygon::tri([v(0.0, h), v(0.0, t), v(t, t)]),
            ColliderType::SlopeSteepUp => CellPolygon::tri([v(h, t), v(t, 0.0), v(t, t)]),
            ColliderType::SlopeSteepDown => CellPolygon::tri([v(0.0, 0.0), v(0.0, t), v(h, t)]),
        }
    }
}

/// Fixed-capacity convex polygon; no heap allocation on the per-cell path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellPolygon {
    verts: [Vec2; MAX_POLY_VERTS],
    count: usize,
}

impl CellPolygon {
    pub const EMPTY: CellPolygon = CellPolygon {
        verts: [Vec2::ZERO; MAX_POLY_VERTS],
        count: 0,
    };

    pub fn tri(v: [Vec2; 3]) -> Self {
        Self {
            verts: [v[0], v[1], v[2], Vec2::ZERO],
            count: 3,
        }
    }

    pub fn quad(verts: [Vec2; 4]) -> Self {
        Self { verts, count: 4 }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.verts[..self.count]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fewer than three vertices: no area, never collides.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.count < 3
    }

    pub fn translated(mut self, offset: Vec2) -> Self {
        for v in &mut self.verts[..self.count] {
            *v += offset;
        }
        self
    }
}

/// Per-tick diagnostic counters for a controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Number of solver invocations (including speculative step-up solves).
    pub solves: usize,
    /// Solver iterations that found and resolved a contact.
    pub contacts: usize,
    pub step_up_attempts: usize,
    pub step_ups: usize,
    pub snaps: usize,
}
