//! Randomized depth-first solver over the open adjacency
//!
//! The path is the explicit frame stack itself: advancing pushes a frame
//! and marks the cell tentatively on the path, a dead end pops the frame
//! and clears the mark. The first path that reaches `end` wins; it is not
//! necessarily the shortest one.

use alloc::vec;
use alloc::vec::Vec;

use tracing::{debug, trace, warn};

use crate::error::MazeError;
use crate::grid::{Coord, Direction, Grid};
use crate::rng::RandomSource;
use crate::snapshot::{Event, Recorder};

/// Ordered cells from start to end, each pair joined by a missing wall
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Coord>,
}

impl Path {
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Coord> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    /// Direction codes (0=NORTH, 1=EAST, 2=SOUTH, 3=WEST) walking the path
    ///
    /// Fails with [`MazeError::NotAdjacent`] on the first pair of cells that
    /// are not neighbors. Walls are not checked; see [`Path::verify`].
    pub fn moves(&self) -> Result<Vec<u8>, MazeError> {
        self.cells
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                Direction::between(a, b)
                    .map(Direction::code)
                    .ok_or(MazeError::NotAdjacent { a, b })
            })
            .collect()
    }

    /// Whether every consecutive pair is adjacent and unwalled in `grid`
    pub fn verify(&self, grid: &Grid) -> bool {
        if self.cells.is_empty() || !self.cells.iter().all(|&c| grid.contains(c)) {
            return false;
        }
        self.cells
            .windows(2)
            .all(|pair| matches!(grid.wall_between(pair[0], pair[1]), Ok(false)))
    }

    pub fn into_cells(self) -> Vec<Coord> {
        self.cells
    }
}

/// Outcome of a single solving step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStep {
    /// `to` was appended to the path
    Advanced { from: Coord, to: Coord },
    /// `from` was a dead end and left the path
    Backtracked(Coord),
    /// The top of the path is the end cell
    Reached,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: usize,
    tried: u8,
}

/// One solving pass between `start` and `end`.
///
/// Requires a freshly derived open adjacency. Resets every `visited` flag
/// and every on-path mark when created.
pub struct Solver<'a, R> {
    grid: &'a mut Grid,
    rng: R,
    recorder: Option<&'a mut dyn Recorder>,
    end: usize,
    stack: Vec<Frame>,
    visited: usize,
    backtracks: usize,
}

impl<'a, R: RandomSource> Solver<'a, R> {
    pub fn new(grid: &'a mut Grid, start: Coord, end: Coord, rng: R) -> Result<Self, MazeError> {
        let start = grid.index_of(start)?;
        let end = grid.index_of(end)?;
        if !grid.has_fresh_adjacency() {
            return Err(MazeError::StaleAdjacency);
        }

        grid.reset_visited();
        grid.clear_path_marks();
        let cell = grid.cell_mut(start);
        cell.visited = true;
        cell.on_path = true;

        debug!("Solving from {} to {}", grid.coord_of(start), grid.coord_of(end));
        Ok(Self {
            grid,
            rng,
            recorder: None,
            end,
            stack: vec![Frame {
                cell: start,
                tried: 0,
            }],
            visited: 1,
            backtracks: 0,
        })
    }

    pub fn with_recorder(mut self, recorder: &'a mut dyn Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Current tentative path length
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Cells visited so far in this pass
    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    fn emit(&mut self, event: Event) {
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.record(event, &*self.grid);
        }
    }

    /// Advance by one decision. `NoPathFound` once the path is exhausted.
    pub fn step(&mut self) -> Result<SolveStep, MazeError> {
        let Some(frame) = self.stack.last_mut() else {
            return Err(MazeError::NoPathFound);
        };
        if frame.cell == self.end {
            return Ok(SolveStep::Reached);
        }

        let cell = self.grid.cell_by_index(frame.cell);
        let mut candidates = [0usize; 4];
        let mut count = 0;
        for (slot, &n) in cell.open_neighbors.iter().enumerate() {
            if frame.tried & (1 << slot) == 0 && !self.grid.cell_by_index(n).visited {
                candidates[count] = slot;
                count += 1;
            }
        }

        let from = frame.cell;
        if count == 0 {
            self.stack.pop();
            self.backtracks += 1;
            self.grid.cell_mut(from).on_path = false;
            let coord = self.grid.coord_of(from);
            trace!("Dead end at {}", coord);
            self.emit(Event::Retreated(coord));
            return Ok(SolveStep::Backtracked(coord));
        }

        let pick = self.rng.choose_index(count);
        debug_assert!(pick < count, "random source returned {} for {} candidates", pick, count);
        let slot = candidates[pick.min(count - 1)];
        frame.tried |= 1 << slot;
        let next = cell.open_neighbors[slot];

        let cell = self.grid.cell_mut(next);
        cell.visited = true;
        cell.on_path = true;
        self.visited += 1;
        self.stack.push(Frame {
            cell: next,
            tried: 0,
        });

        let (from, to) = (self.grid.coord_of(from), self.grid.coord_of(next));
        trace!("Advanced {} -> {}", from, to);
        self.emit(Event::Advanced { from, to });
        Ok(SolveStep::Advanced { from, to })
    }

    /// Search until the end is reached or every branch is exhausted
    pub fn run(mut self) -> Result<Path, MazeError> {
        loop {
            match self.step() {
                Ok(SolveStep::Reached) => break,
                Ok(_) => {}
                Err(MazeError::NoPathFound) => {
                    warn!(
                        "No path to {} after visiting {} cells",
                        self.grid.coord_of(self.end),
                        self.visited
                    );
                    return Err(MazeError::NoPathFound);
                }
                Err(e) => return Err(e),
            }
        }

        let cells: Vec<Coord> = self
            .stack
            .iter()
            .map(|frame| self.grid.coord_of(frame.cell))
            .collect();
        debug!(
            "Solved: path of {} cells, {} visited, {} backtracks",
            cells.len(),
            self.visited,
            self.backtracks
        );
        Ok(Path { cells })
    }
}
