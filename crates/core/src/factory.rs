//! Piece factory - draws a random shape and color and places it at the spawn origin

use log::debug;

use crate::piece::{Piece, Shape};
use crate::rng::RandomSource;
use crate::types::{Cell, ShapeKind};

/// Produces an endless stream of pieces from a shape catalog and a palette size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceFactory {
    catalog: Vec<ShapeKind>,
    palette_len: u8,
    spawn_x: i32,
}

impl PieceFactory {
    /// Factory for a board `columns` wide.
    ///
    /// Callers validate that `catalog` and the palette are non-empty (see
    /// [`EngineConfig::validate`](crate::config::EngineConfig::validate)).
    pub fn new(catalog: Vec<ShapeKind>, palette_len: u8, columns: u16) -> Self {
        Self {
            catalog,
            palette_len,
            spawn_x: Self::spawn_x(columns),
        }
    }

    /// Spawn column for a board `columns` wide: `floor(columns / 2) - 1`
    pub fn spawn_x(columns: u16) -> i32 {
        columns as i32 / 2 - 1
    }

    /// Draw a shape uniformly from the catalog, then a color uniformly from the
    /// palette, and place the piece at (`spawn_x`, 0). Never touches the grid.
    pub fn spawn<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Piece {
        let kind = self.catalog[rng.next_index(self.catalog.len())];
        let color = rng.next_index(self.palette_len as usize) as Cell + 1;
        debug!("spawning {} piece with color {}", kind.as_str(), color);
        self.spawn_kind(kind, color)
    }

    /// Place a specific shape and color at the spawn origin
    pub fn spawn_kind(&self, kind: ShapeKind, color: Cell) -> Piece {
        Piece::new(Shape::from_kind(kind, color), self.spawn_x, 0)
    }
}
