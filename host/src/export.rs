//! Binary grid export and move verification
//!
//! For a maze with W columns and H rows the grid is (2H + 1) x (2W + 1):
//! - 0 = wall
//! - 1 = passage (cell center or removed wall)
//! - 2 = passage on the solution path
//!
//! Cell `(x, y)` has its center at row `2y + 1`, column `2x + 1`.

use maze_core::{Coord, Direction, Grid, Path};

pub const WALL: u8 = 0;
pub const PASSAGE: u8 = 1;
pub const SOLUTION: u8 = 2;

fn center(c: Coord) -> (usize, usize) {
    (c.y * 2 + 1, c.x * 2 + 1)
}

/// Convert the wall state (and optionally a path) to a binary grid
pub fn to_binary_grid(grid: &Grid, path: Option<&Path>) -> Vec<Vec<u8>> {
    let rows = grid.height() * 2 + 1;
    let cols = grid.width() * 2 + 1;
    let mut out = vec![vec![WALL; cols]; rows];

    for cell in grid.cells() {
        let (gr, gc) = center(cell.coord());
        out[gr][gc] = PASSAGE;

        // each cell only owns its top and right walls
        if !cell.has_top_wall() && cell.y() > 0 {
            out[gr - 1][gc] = PASSAGE;
        }
        if !cell.has_right_wall() && cell.x() + 1 < grid.width() {
            out[gr][gc + 1] = PASSAGE;
        }
    }

    if let Some(path) = path {
        for pair in path.cells().windows(2) {
            let (ar, ac) = center(pair[0]);
            let (br, bc) = center(pair[1]);
            out[(ar + br) / 2][(ac + bc) / 2] = SOLUTION;
        }
        for &c in path.cells() {
            let (gr, gc) = center(c);
            out[gr][gc] = SOLUTION;
        }
    }

    out
}

/// Replay cell-level moves over a binary grid.
///
/// Each move crosses one wall slot and lands on the next cell center, so it
/// advances two grid units. Returns true only if every step stays on open
/// squares and the walk ends on `end`.
pub fn verify_moves(grid_data: &[Vec<u8>], start: Coord, end: Coord, moves: &[u8]) -> bool {
    let rows = grid_data.len();
    let cols = grid_data.first().map_or(0, Vec::len);
    let open = |r: usize, c: usize| r < rows && c < cols && grid_data[r][c] != WALL;

    let (mut row, mut col) = center(start);
    if !open(row, col) {
        return false;
    }

    for &code in moves {
        // invalid directions fail verification rather than defaulting to a valid move
        let Some(dir) = Direction::from_code(code) else {
            return false;
        };
        for _ in 0..2 {
            // wrapping_sub underflows to a value the bounds check rejects
            let (next_row, next_col) = match dir {
                Direction::North => (row.wrapping_sub(1), col),
                Direction::East => (row, col + 1),
                Direction::South => (row + 1, col),
                Direction::West => (row, col.wrapping_sub(1)),
            };
            if !open(next_row, next_col) {
                return false;
            }
            row = next_row;
            col = next_col;
        }
    }

    (row, col) == center(end)
}
