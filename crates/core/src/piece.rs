//! Pieces module - shape matrices and the clockwise rotation transform
//!
//! A shape is a rectangular matrix using the grid's cell convention: `0` is empty and
//! every occupied cell of one piece carries the same color value. A piece is a shape
//! anchored at its top-left origin in grid coordinates.
//!
//! There is no rotation-state index: rotating replaces the shape matrix itself, and the
//! only kick is a push back from the right wall.

use crate::collision::collides;
use crate::grid::Grid;
use crate::types::{Cell, ShapeKind, EMPTY};

/// Rectangular cell matrix with at least one occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: usize,
    height: usize,
    /// Row-major cells (cy * width + cx)
    cells: Vec<Cell>,
}

impl Shape {
    /// Build a shape from explicit rows (top row first).
    ///
    /// Returns `None` for ragged input or a matrix without any occupied cell.
    pub fn from_rows(rows: &[&[Cell]]) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let cells: Vec<Cell> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        if cells.iter().all(|&c| c == EMPTY) {
            return None;
        }
        Some(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Catalog shape in spawn orientation, every occupied cell filled with `color`
    pub fn from_kind(kind: ShapeKind, color: Cell) -> Self {
        let mask = kind.mask();
        Self {
            width: mask[0].len(),
            height: mask.len(),
            cells: mask
                .iter()
                .flat_map(|row| row.iter().map(|&filled| if filled { color } else { EMPTY }))
                .collect(),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Occupied cells as (cx, cy, value)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != EMPTY)
            .map(move |(i, &value)| (i % self.width, i / self.width, value))
    }

    /// 90° clockwise rotation: an R x C matrix becomes C x R with
    /// `rotated[c][R - 1 - r] = shape[r][c]`.
    pub fn rotated_cw(&self) -> Self {
        let (rows, cols) = (self.height, self.width);
        let mut cells = vec![EMPTY; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                // New matrix has `rows` columns.
                cells[c * rows + (rows - 1 - r)] = self.cells[r * cols + c];
            }
        }
        Self {
            width: rows,
            height: cols,
            cells,
        }
    }
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: Shape,
    /// Grid column of the shape's left edge
    pub x: i32,
    /// Grid row of the shape's top edge
    pub y: i32,
}

impl Piece {
    pub fn new(shape: Shape, x: i32, y: i32) -> Self {
        Self { shape, x, y }
    }

    /// Occupied cells in grid coordinates as (gx, gy, value)
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.shape
            .occupied()
            .map(move |(cx, cy, value)| (self.x + cx as i32, self.y + cy as i32, value))
    }

    /// Color carried by the piece's occupied cells
    pub fn color(&self) -> Cell {
        self.shape.occupied().next().map_or(EMPTY, |(_, _, value)| value)
    }
}

/// Try to rotate a piece 90° clockwise.
///
/// After rotating, a shape that would stick out past the right wall is pushed left
/// until it fits (`x = columns - width`). The left wall and the vertical origin are
/// never adjusted. Returns the rotated piece, or `None` if it collides.
pub fn try_rotate(grid: &Grid, piece: &Piece) -> Option<Piece> {
    let shape = piece.shape.rotated_cw();
    let columns = grid.columns() as i32;
    let width = shape.width() as i32;

    let x = if piece.x + width > columns {
        columns - width
    } else {
        piece.x
    };

    let rotated = Piece::new(shape, x, piece.y);
    if collides(grid, &rotated, 0, 0) {
        return None;
    }
    Some(rotated)
}
