//! Error taxonomy shared by grid construction, carving and solving

use crate::grid::Coord;

/// Everything that can go wrong while building, carving or solving a maze
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// Grid construction requested with a zero (or overflowing) dimension
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Coordinate lookup outside `[0, width) x [0, height)`
    #[error("coordinate {coord} is outside the {width}x{height} grid")]
    OutOfRange {
        coord: Coord,
        width: usize,
        height: usize,
    },

    /// Wall query between two cells that do not share an edge
    #[error("cells {a} and {b} are not grid-adjacent")]
    NotAdjacent { a: Coord, b: Coord },

    /// Start and end markers requested on the same cell
    #[error("start and end cannot both be {0}")]
    EndpointsCoincide(Coord),

    /// Walls were edited after the open adjacency was derived (or it never was)
    #[error("open adjacency is missing or stale; derive it before solving")]
    StaleAdjacency,

    /// Carving ran out of frames before covering the grid.
    ///
    /// Only reachable when the neighbor graph is disconnected, which
    /// `Grid::build` never produces. Treat as a bug, not as a maze.
    #[error("carving stalled after visiting {visited} of {total} cells")]
    ConnectivityInvariantViolated { visited: usize, total: usize },

    /// The solver exhausted every branch without reaching the end cell
    #[error("no path between start and end")]
    NoPathFound,
}

impl MazeError {
    /// Whether the error signals a broken invariant rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self, MazeError::ConnectivityInvariantViolated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_only_connectivity_is_fatal() {
        assert!(MazeError::ConnectivityInvariantViolated { visited: 3, total: 4 }.is_fatal());
        assert!(!MazeError::NoPathFound.is_fatal());
        assert!(!MazeError::StaleAdjacency.is_fatal());
        assert!(!MazeError::InvalidDimensions { width: 0, height: 3 }.is_fatal());
    }

    #[test]
    fn test_messages_name_the_cells() {
        let err = MazeError::OutOfRange {
            coord: Coord::new(5, 1),
            width: 3,
            height: 3,
        };
        assert_eq!(err.to_string(), "coordinate (5, 1) is outside the 3x3 grid");
    }
}
