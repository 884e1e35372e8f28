//! Host side of the maze pipeline: seeding, endpoint selection, reporting
//!
//! The core crate never picks seeds or endpoints and never serializes
//! anything. This crate wires a seeded [`SimpleLcg`] through the carve →
//! derive → solve pipeline and packages the result as a JSON report.

pub mod export;

use std::fs;
use std::path::Path as FsPath;

use maze_core::{
    derive_open_adjacency, Carver, Coord, Event, Grid, MazeError, Path, SimpleLcg, Snapshot,
    SnapshotRecorder, Solver,
};
use serde::{Deserialize, Serialize};

pub use export::{to_binary_grid, verify_moves};

/// Default maze dimensions (cells, not including walls)
pub const DEFAULT_COLS: usize = 20;
pub const DEFAULT_ROWS: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid coordinate '{0}', expected X,Y")]
    BadCoordinate(String),
}

impl HostError {
    /// Whether the failure comes from a broken core invariant
    pub fn is_fatal(&self) -> bool {
        matches!(self, HostError::Maze(e) if e.is_fatal())
    }
}

/// Everything needed to reproduce a maze and its solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    /// LCG seed; drawn at random when absent
    pub seed: Option<u32>,
    /// Carving and solving start; random when absent
    pub start: Option<[usize; 2]>,
    /// Solving target; random (and distinct from start) when absent
    pub end: Option<[usize; 2]>,
    /// Keep a frame per mutation in the report
    pub record: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_COLS,
            height: DEFAULT_ROWS,
            seed: None,
            start: None,
            end: None,
            record: false,
        }
    }
}

impl MazeConfig {
    pub fn load(path: &FsPath) -> Result<Self, HostError> {
        let text = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Parse `"X,Y"` into a coordinate pair
pub fn parse_coord(s: &str) -> Result<[usize; 2], HostError> {
    let bad = || HostError::BadCoordinate(s.to_string());
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok([x, y])
}

/// Which pass produced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Carve,
    Solve,
}

/// Serializable view of a core mutation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameEvent {
    Visited { cell: [usize; 2] },
    Carved { from: [usize; 2], to: [usize; 2] },
    Advanced { from: [usize; 2], to: [usize; 2] },
    Retreated { cell: [usize; 2] },
}

impl From<Event> for FrameEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Visited(c) => FrameEvent::Visited { cell: pair(c) },
            Event::Carved { from, to } => FrameEvent::Carved {
                from: pair(from),
                to: pair(to),
            },
            Event::Advanced { from, to } => FrameEvent::Advanced {
                from: pair(from),
                to: pair(to),
            },
            Event::Retreated(c) => FrameEvent::Retreated { cell: pair(c) },
        }
    }
}

/// Summary of one recorded snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub phase: Phase,
    pub event: FrameEvent,
    pub missing_walls: usize,
    pub visited: usize,
    pub on_path: usize,
}

impl Frame {
    fn from_snapshot(phase: Phase, snapshot: &Snapshot) -> Self {
        Self {
            phase,
            event: snapshot.event.into(),
            missing_walls: snapshot.grid.missing_walls(),
            visited: snapshot.grid.visited_count(),
            on_path: snapshot.grid.cells().filter(|c| c.is_on_path()).count(),
        }
    }
}

/// Result of carving and solving one maze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeReport {
    pub width: usize,
    pub height: usize,
    pub seed: u32,
    pub start: [usize; 2],
    pub end: [usize; 2],

    /// Wall flags per cell, indexed `[y][x]`, y = 0 is the top row
    pub top_walls: Vec<Vec<bool>>,
    pub right_walls: Vec<Vec<bool>>,

    pub walls_removed: usize,
    pub carve_backtracks: usize,
    pub max_depth: usize,

    /// Solution cells from start to end
    pub path: Vec<[usize; 2]>,
    /// Directions: 0=NORTH, 1=EAST, 2=SOUTH, 3=WEST
    pub moves: Vec<u8>,

    /// Binary grid (0=wall, 1=passage, 2=solution)
    pub grid_data: Vec<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
}

impl MazeReport {
    /// Replay `moves` over `grid_data` from `start` to `end`
    pub fn verify(&self) -> bool {
        verify_moves(
            &self.grid_data,
            Coord::from((self.start[0], self.start[1])),
            Coord::from((self.end[0], self.end[1])),
            &self.moves,
        )
    }

    pub fn save(&self, path: &FsPath) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| HostError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &FsPath) -> Result<Self, HostError> {
        let text = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn pair(c: Coord) -> [usize; 2] {
    [c.x, c.y]
}

fn random_cell(grid: &Grid, rng: &mut SimpleLcg) -> Coord {
    Coord::new(
        rng.randint(0, grid.width() - 1),
        rng.randint(0, grid.height() - 1),
    )
}

/// Carve a maze from `config`, solve it, and build the report.
///
/// The same seed always produces the same report.
pub fn run(config: &MazeConfig) -> Result<MazeReport, HostError> {
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Generating {}x{} maze with seed {}",
        config.width,
        config.height,
        seed
    );

    let mut rng = SimpleLcg::new(seed);
    let mut grid = Grid::build(config.width, config.height)?;

    let start = match config.start {
        Some([x, y]) => grid.cell_at(x, y)?.coord(),
        None => random_cell(&grid, &mut rng),
    };

    let mut carve_recorder = config.record.then(SnapshotRecorder::new);
    let carver = Carver::new(&mut grid, start, &mut rng)?;
    let carved = match carve_recorder.as_mut() {
        Some(recorder) => carver.with_recorder(recorder).run(),
        None => carver.run(),
    };
    let stats = carved.inspect_err(|e| {
        if e.is_fatal() {
            tracing::error!("Maze generation broke its connectivity invariant: {}", e);
        }
    })?;

    let end = match config.end {
        Some([x, y]) => grid.cell_at(x, y)?.coord(),
        None => {
            let mut end = random_cell(&grid, &mut rng);
            while end == start && grid.len() > 1 {
                end = random_cell(&grid, &mut rng);
            }
            end
        }
    };
    if end == start {
        tracing::warn!("Start and end coincide at {}; solution is a single cell", start);
    } else {
        grid.mark_endpoints(start, end)?;
    }

    derive_open_adjacency(&mut grid);

    let mut solve_recorder = config.record.then(SnapshotRecorder::new);
    let solver = Solver::new(&mut grid, start, end, &mut rng)?;
    let path: Path = match solve_recorder.as_mut() {
        Some(recorder) => solver.with_recorder(recorder).run()?,
        None => solver.run()?,
    };

    tracing::info!(
        "Maze solved: {} walls removed, path of {} cells from {} to {}",
        stats.walls_removed,
        path.len(),
        start,
        end
    );

    let frames = match (carve_recorder, solve_recorder) {
        (Some(carve), Some(solve)) => Some(
            carve
                .frames()
                .iter()
                .map(|s| Frame::from_snapshot(Phase::Carve, s))
                .chain(solve.frames().iter().map(|s| Frame::from_snapshot(Phase::Solve, s)))
                .collect(),
        ),
        _ => None,
    };

    let rows = |f: fn(&maze_core::Cell) -> bool| -> Vec<Vec<bool>> {
        (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .filter_map(|x| grid.cell_at(x, y).ok().map(f))
                    .collect()
            })
            .collect()
    };

    Ok(MazeReport {
        width: grid.width(),
        height: grid.height(),
        seed,
        start: pair(start),
        end: pair(end),
        top_walls: rows(maze_core::Cell::has_top_wall),
        right_walls: rows(maze_core::Cell::has_right_wall),
        walls_removed: stats.walls_removed,
        carve_backtracks: stats.backtracks,
        max_depth: stats.max_depth,
        moves: path.moves()?,
        grid_data: to_binary_grid(&grid, Some(&path)),
        path: path.cells().iter().copied().map(pair).collect(),
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("3,4").unwrap(), [3, 4]);
        assert_eq!(parse_coord(" 0 , 12 ").unwrap(), [0, 12]);
        assert!(matches!(parse_coord("3"), Err(HostError::BadCoordinate(_))));
        assert!(matches!(parse_coord("a,1"), Err(HostError::BadCoordinate(_))));
        assert!(matches!(parse_coord("-1,1"), Err(HostError::BadCoordinate(_))));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: MazeConfig = serde_json::from_str(r#"{"width": 7, "seed": 5}"#).unwrap();
        assert_eq!(config.width, 7);
        assert_eq!(config.height, DEFAULT_ROWS);
        assert_eq!(config.seed, Some(5));
        assert!(!config.record);
    }

    #[test]
    fn test_frame_event_json_shape() {
        let event: FrameEvent = Event::Carved {
            from: Coord::new(0, 1),
            to: Coord::new(1, 1),
        }
        .into();
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "carved", "from": [0, 1], "to": [1, 1]})
        );
    }

    #[test]
    fn test_host_error_fatality() {
        let fatal: HostError = MazeError::ConnectivityInvariantViolated { visited: 1, total: 2 }.into();
        assert!(fatal.is_fatal());
        let plain: HostError = MazeError::NoPathFound.into();
        assert!(!plain.is_fatal());
        assert!(!HostError::BadCoordinate("x".into()).is_fatal());
    }
}
