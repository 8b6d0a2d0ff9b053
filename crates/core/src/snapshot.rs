//! Read-only session snapshot for renderers

use serde::Serialize;

use crate::piece::Piece;
use crate::types::{Cell, SessionState, EMPTY};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSnapshot {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major shape cells
    pub cells: Vec<Cell>,
}

impl ActiveSnapshot {
    fn fill_from(&mut self, piece: &Piece) {
        self.x = piece.x;
        self.y = piece.y;
        self.width = piece.shape.width();
        self.height = piece.shape.height();
        self.cells.clear();
        self.cells.extend_from_slice(piece.shape.cells());
    }
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        let mut s = Self::default();
        s.fill_from(value);
        s
    }
}

/// Read-only view of a session, pulled once per frame by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub columns: u16,
    pub rows: u16,
    /// Locked cells, row-major
    pub grid: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i32>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    pub state: SessionState,
}

impl GameSnapshot {
    /// Locked cell at (x, y), empty when off the grid
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= self.columns as i32 || y >= self.rows as i32 {
            return EMPTY;
        }
        self.grid[y as usize * self.columns as usize + x as usize]
    }

    /// Replace the active piece in place, reusing its cell buffer
    pub(crate) fn set_active(&mut self, piece: Option<&Piece>) {
        match (piece, self.active.as_mut()) {
            (Some(piece), Some(active)) => active.fill_from(piece),
            (Some(piece), None) => self.active = Some(ActiveSnapshot::from(piece)),
            (None, _) => self.active = None,
        }
    }

    /// Locked cells with the active piece drawn on top; cells above row 0 are dropped
    pub fn composite(&self) -> Vec<Cell> {
        let mut out = self.grid.clone();
        if let Some(active) = &self.active {
            for (i, &value) in active.cells.iter().enumerate() {
                if value == EMPTY {
                    continue;
                }
                let x = active.x + (i % active.width) as i32;
                let y = active.y + (i / active.width) as i32;
                if x >= 0 && y >= 0 && x < self.columns as i32 && y < self.rows as i32 {
                    out[y as usize * self.columns as usize + x as usize] = value;
                }
            }
        }
        out
    }

    /// Whether commands currently affect the piece
    pub fn playable(&self) -> bool {
        self.state.is_playing()
    }
}
