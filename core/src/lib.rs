//! Perfect-maze carving and solving by randomized depth-first backtracking
//!
//! This crate owns the grid model, the sparse wall state, the carver that
//! turns a fully walled grid into a spanning tree, the open-adjacency pass
//! and the solver. Rendering, seeding and the process entry point live in
//! the host crate.
//!
//! Both traversals use explicit frame stacks, so grid size is bounded only
//! by memory. Nothing here touches global state: the random source and the
//! optional recorder are always passed in.
//!
//! The crate is no_std compatible (it needs `alloc`), with an optional
//! `std` feature for `std::error::Error` integration.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod adjacency;
pub mod error;
pub mod grid;
pub mod maze_gen;
pub mod rng;
pub mod snapshot;
pub mod solver;

// Re-export commonly used types for convenience
pub use adjacency::derive_open_adjacency;
pub use error::MazeError;
pub use grid::{Cell, Coord, Direction, Grid, EAST, NORTH, SOUTH, WEST};
pub use maze_gen::{CarveStats, CarveStep, Carver};
#[cfg(feature = "rand")]
pub use rng::RandSource;
pub use rng::{FirstCandidate, RandomSource, SimpleLcg};
pub use snapshot::{on_mutation, Event, OnMutation, Recorder, Snapshot, SnapshotRecorder};
pub use solver::{Path, SolveStep, Solver};

/// Build a fully walled `width x height` grid
pub fn build_grid(width: usize, height: usize) -> Result<Grid, MazeError> {
    Grid::build(width, height)
}

/// Carve `grid` into a perfect maze starting from `start`
pub fn generate<R: RandomSource>(
    grid: &mut Grid,
    start: Coord,
    rng: &mut R,
) -> Result<CarveStats, MazeError> {
    Carver::new(grid, start, rng)?.run()
}

/// [`generate`], reporting every visit to `recorder`
pub fn generate_recorded<R: RandomSource>(
    grid: &mut Grid,
    start: Coord,
    rng: &mut R,
    recorder: &mut dyn Recorder,
) -> Result<CarveStats, MazeError> {
    Carver::new(grid, start, rng)?
        .with_recorder(recorder)
        .run()
}

/// Find one path from `start` to `end` over the derived open adjacency
pub fn solve<R: RandomSource>(
    grid: &mut Grid,
    start: Coord,
    end: Coord,
    rng: &mut R,
) -> Result<Path, MazeError> {
    Solver::new(grid, start, end, rng)?.run()
}

/// [`solve`], reporting every path change to `recorder`
pub fn solve_recorded<R: RandomSource>(
    grid: &mut Grid,
    start: Coord,
    end: Coord,
    rng: &mut R,
    recorder: &mut dyn Recorder,
) -> Result<Path, MazeError> {
    Solver::new(grid, start, end, rng)?
        .with_recorder(recorder)
        .run()
}
