//! Collision resolver - tests a piece against the grid at a hypothetical offset
//!
//! Cells above the top edge (`gy < 0`) are only checked against the side walls, never
//! against occupied cells, so a freshly spawned piece may poke out above row 0.

use crate::grid::Grid;
use crate::piece::Piece;

/// Whether `piece`, shifted by (`dx`, `dy`), hits a wall, the floor, or a locked cell.
///
/// Pure function: calling it never changes the grid or the piece.
pub fn collides(grid: &Grid, piece: &Piece, dx: i32, dy: i32) -> bool {
    let columns = grid.columns() as i32;
    let rows = grid.rows() as i32;

    piece.cells().any(|(x, y, _)| {
        let gx = x + dx;
        let gy = y + dy;
        gx < 0 || gx >= columns || gy >= rows || (gy >= 0 && grid.is_occupied(gx, gy))
    })
}

/// How many rows `piece` can descend before one more row would collide.
pub fn drop_distance(grid: &Grid, piece: &Piece) -> i32 {
    let mut distance = 0;
    while !collides(grid, piece, 0, distance + 1) {
        distance += 1;
    }
    distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Shape;
    use crate::types::ShapeKind;

    fn square_at(x: i32, y: i32) -> Piece {
        Piece::new(Shape::from_kind(ShapeKind::O, 1), x, y)
    }

    #[test]
    fn test_side_walls_and_floor() {
        let grid = Grid::new(10, 20);

        assert!(!collides(&grid, &square_at(0, 0), 0, 0));
        assert!(collides(&grid, &square_at(0, 0), -1, 0));
        assert!(collides(&grid, &square_at(8, 0), 1, 0));
        assert!(!collides(&grid, &square_at(4, 18), 0, 0));
        assert!(collides(&grid, &square_at(4, 18), 0, 1));
    }

    #[test]
    fn test_cells_above_the_top_are_allowed() {
        let mut grid = Grid::new(10, 20);
        // Occupied cells cannot be reached from above the board.
        grid.set(4, 0, 2).unwrap();

        assert!(!collides(&grid, &square_at(4, -2), 0, 0));
        assert!(collides(&grid, &square_at(4, -1), 0, 0));
        // Walls still apply above the board.
        assert!(collides(&grid, &square_at(-1, -2), 0, 0));
    }

    #[test]
    fn test_occupied_cell_blocks() {
        let mut grid = Grid::new(10, 20);
        grid.set(5, 10, 3).unwrap();

        assert!(collides(&grid, &square_at(4, 9), 0, 0));
        assert!(collides(&grid, &square_at(4, 8), 0, 1));
        assert!(!collides(&grid, &square_at(4, 7), 0, 1));
    }

    #[test]
    fn test_drop_distance() {
        let mut grid = Grid::new(10, 20);
        assert_eq!(drop_distance(&grid, &square_at(4, 0)), 18);

        grid.set(4, 10, 1).unwrap();
        assert_eq!(drop_distance(&grid, &square_at(4, 0)), 8);
    }
}
