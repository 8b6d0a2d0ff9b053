//! Grid module - manages the locked cells of the playfield
//!
//! The grid is a `columns x rows` matrix where each cell is empty (`0`) or holds a
//! palette color. Uses a flat vector in row-major order for cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//!
//! Dimensions are fixed for the lifetime of a grid. Cells only change through
//! [`Grid::set`], piece locking, and line clearing.

use crate::error::GridError;
use crate::piece::Piece;
use crate::types::{Cell, EMPTY};

/// The locked cells of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: u16,
    rows: u16,
    /// Flat vector of cells, row-major order (y * columns + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            cells: vec![EMPTY; columns as usize * rows as usize],
        }
    }

    /// Build a grid from explicit rows (top row first).
    ///
    /// Returns `None` when there are no rows or the rows have different lengths.
    pub fn from_rows(rows: &[&[Cell]]) -> Option<Self> {
        let columns = rows.first()?.len();
        if columns == 0 || rows.iter().any(|row| row.len() != columns) {
            return None;
        }
        let columns = u16::try_from(columns).ok()?;
        let height = u16::try_from(rows.len()).ok()?;
        Some(Self {
            columns,
            rows: height,
            cells: rows.iter().flat_map(|row| row.iter().copied()).collect(),
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.columns as usize + x as usize)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> GridError {
        GridError::OutOfBounds {
            x,
            y,
            columns: self.columns,
            rows: self.rows,
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Whether (x, y) lies on the grid
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.columns as i32 && y >= 0 && y < self.rows as i32
    }

    /// Get cell at position (x, y)
    pub fn get(&self, x: i32, y: i32) -> Result<Cell, GridError> {
        self.index(x, y)
            .map(|idx| self.cells[idx])
            .ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Set cell at position (x, y)
    pub fn set(&mut self, x: i32, y: i32, value: Cell) -> Result<(), GridError> {
        let idx = self.index(x, y).ok_or_else(|| self.out_of_bounds(x, y))?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Check if position is on the grid and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.index(x, y), Some(idx) if self.cells[idx] != EMPTY)
    }

    /// Cells of row `y`, or an empty slice when `y` is off the grid
    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= self.rows as usize {
            return &[];
        }
        let width = self.columns as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Check if a row is completely filled (every cell nonzero)
    pub fn is_row_full(&self, y: usize) -> bool {
        let row = self.row(y);
        !row.is_empty() && row.iter().all(|&cell| cell != EMPTY)
    }

    /// Clear all full rows and return the row indices that were cleared (sorted top to bottom).
    ///
    /// Remaining rows keep their relative order and settle at the bottom; one empty
    /// row is inserted at the top for each row removed, so the row count never changes.
    /// Uses a two-pointer pass without temporary row buffers.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let mut cleared_rows = Vec::new();
        let width = self.columns as usize;
        let mut write_y = self.rows as usize;

        // Scan from bottom to top
        for read_y in (0..self.rows as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        // Clear the vacated rows at the top
        self.cells[..write_y * width].fill(EMPTY);

        cleared_rows.reverse();
        cleared_rows
    }

    /// Merge every occupied cell of `piece` into the grid.
    ///
    /// All target cells are checked first; nothing is written when any of them is
    /// off the grid.
    pub fn lock_piece(&mut self, piece: &Piece) -> Result<(), GridError> {
        if let Some((x, y, _)) = piece.cells().find(|&(x, y, _)| !self.in_bounds(x, y)) {
            return Err(self.out_of_bounds(x, y));
        }

        for (x, y, value) in piece.cells() {
            self.set(x, y, value)?;
        }

        Ok(())
    }

    /// Get a reference to the internal cells (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
