//! Tile broadphase: the capsule's bounds select a rectangle of cells, and only
//! non-empty cells in it reach the narrowphase.

use tracing::trace;

use crate::api::{NarrowphaseApi, TileGridApi};
use crate::narrowphase::Narrowphase;
use crate::types::*;

/// Inclusive cell-index rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CellRange {
    /// Row-major iteration over every `(x, y)` in the range.
    pub fn iter(self) -> impl Iterator<Item = (i32, i32)> {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

/// Cells touched by `bounds`, by floor division with `cell_size`.
pub fn cell_range(bounds: Aabb, cell_size: f32) -> CellRange {
    let cs = cell_size.max(1e-5);
    CellRange {
        x0: (bounds.min.x / cs).floor() as i32,
        y0: (bounds.min.y / cs).floor() as i32,
        x1: (bounds.max.x / cs).floor() as i32,
        y1: (bounds.max.y / cs).floor() as i32,
    }
}

/// Every contact between `capsule` and the grid cells its bounds cover.
pub fn contacts<'a, G: TileGridApi>(capsule: &'a Capsule, grid: &'a G) -> impl Iterator<Item = Contact> + 'a {
    cell_range(capsule.aabb(), grid.cell_size())
        .iter()
        .filter(move |&(x, y)| !grid.get(x, y).is_empty())
        .filter_map(move |(x, y)| {
            let poly = grid.collider_polygon_world(x, y);
            if poly.is_degenerate() {
                return None;
            }
            Narrowphase::capsule_polygon(capsule, poly.vertices())
        })
}

/// Deepest contact in range. Ties keep the first found in row-major order.
pub fn find_best_contact<G: TileGridApi>(capsule: &Capsule, grid: &G) -> Option<Contact> {
    let best = contacts(capsule, grid).fold(None::<Contact>, |best, c| match best {
        Some(b) if c.penetration <= b.penetration => Some(b),
        _ => Some(c),
    });
    if let Some(c) = best {
        trace!(normal = ?c.normal, penetration = c.penetration, "best tile contact");
    }
    best
}
