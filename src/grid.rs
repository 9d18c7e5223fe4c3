use glam::Vec2;

use crate::api::TileGridApi;
use crate::error::{Error, Result};
use crate::types::*;

/// Dense row-major tile grid of collider types.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    cells: Vec<ColliderType>,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl TileGrid {
    /// All-empty grid using [`DEFAULT_CELL_SIZE`].
    pub fn new(width: i32, height: i32) -> Self {
        let mut g = Self {
            width: 0,
            height: 0,
            cell_size: DEFAULT_CELL_SIZE,
            cells: Vec::new(),
        };
        g.resize(width, height);
        g
    }

    /// All-empty grid with a custom cell size.
    pub fn with_cell_size(width: i32, height: i32, cell_size: f32) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::InvalidCellSize(cell_size));
        }
        let mut g = Self::new(width, height);
        g.cell_size = cell_size;
        Ok(g)
    }

    /// Wrap an existing row-major buffer.
    pub fn from_cells(width: i32, height: i32, cell_size: f32, cells: Vec<ColliderType>) -> Result<Self> {
        let mut g = Self::with_cell_size(0, 0, cell_size)?;
        let (w, h) = (width.max(0) as usize, height.max(0) as usize);
        if cells.len() != w * h {
            return Err(Error::CellCountMismatch {
                width: w,
                height: h,
                expected: w * h,
                actual: cells.len(),
            });
        }
        g.width = w as i32;
        g.height = h as i32;
        g.cells = cells;
        Ok(g)
    }

    /// Reallocate to `width x height`, clearing every cell to `Empty`.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.cells.clear();
        self.cells
            .resize(self.width as usize * self.height as usize, ColliderType::Empty);
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, ty: ColliderType) {
        if self.in_bounds(x, y) {
            let i = self.index(x, y);
            self.cells[i] = ty;
        }
    }

    /// Set every in-bounds cell of the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ty: ColliderType) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.set(x, y, ty);
            }
        }
    }

    /// World position of the cell's top-left corner.
    #[inline]
    pub fn cell_origin(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32 * self.cell_size, y as f32 * self.cell_size)
    }

    /// Cell containing world point `p` (floor division, may be out of bounds).
    #[inline]
    pub fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    pub fn cells(&self) -> &[ColliderType] {
        &self.cells
    }
}

impl TileGridApi for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn get(&self, x: i32, y: i32) -> ColliderType {
        if self.in_bounds(x, y) {
            self.cells[self.index(x, y)]
        } else {
            ColliderType::Empty
        }
    }

    fn collider_polygon_world(&self, x: i32, y: i32) -> CellPolygon {
        self.get(x, y)
            .local_polygon(self.cell_size)
            .translated(self.cell_origin(x, y))
    }
}
