//! Maze generation using the Recursive Backtracker algorithm
//!
//! Algorithm: randomized depth-first carving with an explicit stack
//! 1. Mark the start cell visited and push it
//! 2. While fewer than `width * height` cells are visited:
//!    - Look at the top frame's unvisited, not-yet-tried grid neighbors
//!    - If there are some:
//!      * Choose one uniformly at random and remember it as tried
//!      * Remove the wall between the frame's cell and the neighbor
//!      * Mark the neighbor visited and push a fresh frame for it
//!    - Else: backtrack (pop the frame)
//! 3. An empty stack before full coverage means the neighbor graph is
//!    disconnected, reported as [`MazeError::ConnectivityInvariantViolated`]
//!
//! Exactly `cells - 1` walls are removed, so the passages form a spanning
//! tree: every cell is reachable and there are no cycles.

use alloc::vec;
use alloc::vec::Vec;

use tracing::{debug, error, trace};

use crate::error::MazeError;
use crate::grid::{Coord, Grid};
use crate::rng::RandomSource;
use crate::snapshot::{Event, Recorder};

/// Outcome of a single carving step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStep {
    /// The start cell was marked visited
    Visited(Coord),
    /// A wall was removed and `to` became the current cell
    Carved { from: Coord, to: Coord },
    /// `from` had nothing left to try and was popped
    Backtracked(Coord),
    /// Every cell is visited
    Complete,
}

/// Counters collected by a carving session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveStats {
    pub visited: usize,
    pub walls_removed: usize,
    pub backtracks: usize,
    pub max_depth: usize,
}

/// A cell on the carving stack and the neighbor slots already chosen from it
#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: usize,
    tried: u8,
}

/// One generation pass over a grid.
///
/// Owns the visited counter and the explicit frame stack; call
/// [`Carver::step`] to advance one decision at a time or [`Carver::run`]
/// to carve to completion. The grid is expected to be fully walled.
pub struct Carver<'a, R> {
    grid: &'a mut Grid,
    rng: R,
    recorder: Option<&'a mut dyn Recorder>,
    start: usize,
    stack: Vec<Frame>,
    stats: CarveStats,
    total: usize,
}

impl<'a, R: RandomSource> Carver<'a, R> {
    pub fn new(grid: &'a mut Grid, start: Coord, rng: R) -> Result<Self, MazeError> {
        let start = grid.index_of(start)?;
        let total = grid.len();
        Ok(Self {
            grid,
            rng,
            recorder: None,
            start,
            stack: Vec::new(),
            stats: CarveStats::default(),
            total,
        })
    }

    /// Attach an observer that is called after every visit
    pub fn with_recorder(mut self, recorder: &'a mut dyn Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn stats(&self) -> CarveStats {
        self.stats
    }

    /// Number of frames currently on the stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_complete(&self) -> bool {
        self.stats.visited == self.total
    }

    fn emit(&mut self, event: Event) {
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.record(event, &*self.grid);
        }
    }

    fn begin(&mut self) -> CarveStep {
        self.grid.reset_visited();
        self.grid.cell_mut(self.start).visited = true;
        self.stack = vec![Frame {
            cell: self.start,
            tried: 0,
        }];
        self.stats.visited = 1;
        self.stats.max_depth = 1;

        let coord = self.grid.coord_of(self.start);
        debug!(
            "Carving {}x{} grid from {}",
            self.grid.width(),
            self.grid.height(),
            coord
        );
        self.emit(Event::Visited(coord));
        CarveStep::Visited(coord)
    }

    /// Advance by one decision: visit the start, carve, or backtrack
    pub fn step(&mut self) -> Result<CarveStep, MazeError> {
        if self.stats.visited == 0 {
            return Ok(self.begin());
        }
        if self.is_complete() {
            return Ok(CarveStep::Complete);
        }

        let Some(frame) = self.stack.last_mut() else {
            error!(
                "Carving stalled: {} of {} cells visited",
                self.stats.visited, self.total
            );
            return Err(MazeError::ConnectivityInvariantViolated {
                visited: self.stats.visited,
                total: self.total,
            });
        };

        let cell = self.grid.cell_by_index(frame.cell);
        let mut candidates = [0usize; 4];
        let mut count = 0;
        for (slot, &n) in cell.neighbors.iter().enumerate() {
            if frame.tried & (1 << slot) == 0 && !self.grid.cell_by_index(n).visited {
                candidates[count] = slot;
                count += 1;
            }
        }

        let from = frame.cell;
        if count == 0 {
            self.stack.pop();
            self.stats.backtracks += 1;
            let coord = self.grid.coord_of(from);
            trace!("Backtracking from {}", coord);
            return Ok(CarveStep::Backtracked(coord));
        }

        let pick = self.rng.choose_index(count);
        debug_assert!(pick < count, "random source returned {} for {} candidates", pick, count);
        let slot = candidates[pick.min(count - 1)];
        frame.tried |= 1 << slot;
        let next = cell.neighbors[slot];

        self.grid.remove_wall(from, next)?;
        self.grid.cell_mut(next).visited = true;
        self.stats.visited += 1;
        self.stats.walls_removed += 1;
        self.stack.push(Frame {
            cell: next,
            tried: 0,
        });
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());

        let (from, to) = (self.grid.coord_of(from), self.grid.coord_of(next));
        trace!("Carved {} -> {}", from, to);
        self.emit(Event::Carved { from, to });
        Ok(CarveStep::Carved { from, to })
    }

    /// Carve until every cell is visited
    pub fn run(mut self) -> Result<CarveStats, MazeError> {
        while self.step()? != CarveStep::Complete {}

        debug!(
            "Carving complete: {} cells, {} walls removed, {} backtracks, max depth {}",
            self.stats.visited, self.stats.walls_removed, self.stats.backtracks, self.stats.max_depth
        );
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FirstCandidate, SimpleLcg};
    use crate::snapshot::SnapshotRecorder;
    use alloc::collections::VecDeque;

    /// Cells reachable from `from` through missing walls
    fn reachable(grid: &Grid, from: Coord) -> usize {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::new();
        seen[grid.index_of(from).unwrap()] = true;
        queue.push_back(from);
        let mut count = 0;
        while let Some(c) = queue.pop_front() {
            count += 1;
            for n in grid.neighbors(c).unwrap() {
                let i = grid.index_of(n).unwrap();
                if !seen[i] && !grid.wall_between(c, n).unwrap() {
                    seen[i] = true;
                    queue.push_back(n);
                }
            }
        }
        count
    }

    fn assert_perfect(grid: &Grid, start: Coord) {
        assert_eq!(grid.missing_walls(), grid.len() - 1);
        assert_eq!(reachable(grid, start), grid.len());
    }

    #[test]
    fn test_maze_generation() {
        let mut grid = Grid::build(5, 5).unwrap();
        let stats = Carver::new(&mut grid, Coord::new(0, 0), SimpleLcg::new(12345))
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(stats.visited, 25);
        assert_eq!(stats.walls_removed, 24);
        assert_perfect(&grid, Coord::new(0, 0));
        assert_eq!(grid.visited_count(), 25);
    }

    #[test]
    fn test_perfect_for_many_shapes() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (2, 2), (4, 9), (13, 6)] {
            for seed in [1, 42, 2918957128] {
                let mut grid = Grid::build(w, h).unwrap();
                let start = Coord::new(w / 2, h / 2);
                Carver::new(&mut grid, start, SimpleLcg::new(seed))
                    .unwrap()
                    .run()
                    .unwrap();
                assert_perfect(&grid, start);
                // border walls survive
                assert!(grid.cells().filter(|c| c.y() == 0).all(|c| c.has_top_wall()));
                assert!(grid.cells().filter(|c| c.x() == w - 1).all(|c| c.has_right_wall()));
            }
        }
    }

    #[test]
    fn test_single_cell_is_already_complete() {
        let mut grid = Grid::build(1, 1).unwrap();
        let mut carver = Carver::new(&mut grid, Coord::new(0, 0), FirstCandidate).unwrap();

        assert_eq!(carver.step().unwrap(), CarveStep::Visited(Coord::new(0, 0)));
        assert_eq!(carver.step().unwrap(), CarveStep::Complete);
        assert_eq!(carver.stats().walls_removed, 0);
        assert_eq!(grid.missing_walls(), 0);
    }

    #[test]
    fn test_first_candidate_3x3() {
        let mut grid = Grid::build(3, 3).unwrap();
        let stats = Carver::new(&mut grid, Coord::new(0, 0), FirstCandidate)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(stats.visited, 9);
        assert_eq!(stats.walls_removed, 8);
        assert_eq!(stats.backtracks, 0);
        assert_perfect(&grid, Coord::new(0, 0));

        // neighbor order is N, E, S, W: east along the top row first
        assert!(!grid.wall_between(Coord::new(0, 0), Coord::new(1, 0)).unwrap());
        assert!(!grid.wall_between(Coord::new(1, 0), Coord::new(2, 0)).unwrap());
        assert!(!grid.wall_between(Coord::new(2, 0), Coord::new(2, 1)).unwrap());
        assert!(grid.wall_between(Coord::new(0, 0), Coord::new(0, 1)).unwrap());
    }

    #[test]
    fn test_determinism() {
        let mut grid1 = Grid::build(10, 10).unwrap();
        let mut grid2 = Grid::build(10, 10).unwrap();

        generate_with(&mut grid1, 99999);
        generate_with(&mut grid2, 99999);
        assert_eq!(grid1, grid2);

        let mut first1 = Grid::build(6, 4).unwrap();
        let mut first2 = Grid::build(6, 4).unwrap();
        Carver::new(&mut first1, Coord::new(2, 1), FirstCandidate).unwrap().run().unwrap();
        Carver::new(&mut first2, Coord::new(2, 1), FirstCandidate).unwrap().run().unwrap();
        assert_eq!(first1, first2);
    }

    fn generate_with(grid: &mut Grid, seed: u32) {
        Carver::new(grid, Coord::new(0, 0), SimpleLcg::new(seed))
            .unwrap()
            .run()
            .unwrap();
    }

    #[test]
    fn test_different_seeds() {
        let mut grid1 = Grid::build(10, 10).unwrap();
        let mut grid2 = Grid::build(10, 10).unwrap();

        generate_with(&mut grid1, 11111);
        generate_with(&mut grid2, 22222);

        // Different seeds should (almost certainly) produce different mazes
        assert_ne!(grid1, grid2);
    }

    #[test]
    fn test_large_grid_has_no_recursion_limit() {
        let mut grid = Grid::build(400, 300).unwrap();
        let stats = Carver::new(&mut grid, Coord::new(0, 0), FirstCandidate)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(stats.visited, 120_000);
        assert!(stats.max_depth > 10_000);
        assert_perfect(&grid, Coord::new(0, 0));
    }

    #[test]
    fn test_step_budget_can_pause() {
        let mut grid = Grid::build(8, 8).unwrap();
        let mut reference = grid.clone();
        generate_with(&mut reference, 5);

        let mut carver = Carver::new(&mut grid, Coord::new(0, 0), SimpleLcg::new(5)).unwrap();
        for _ in 0..20 {
            carver.step().unwrap();
        }
        assert!(!carver.is_complete());
        assert!(carver.depth() > 0);
        carver.run().unwrap();

        assert_eq!(grid, reference);
    }

    #[test]
    fn test_recorder_sees_every_visit() {
        let mut grid = Grid::build(4, 3).unwrap();
        let mut recorder = SnapshotRecorder::new();
        let mut plain = grid.clone();

        Carver::new(&mut grid, Coord::new(1, 1), SimpleLcg::new(77))
            .unwrap()
            .with_recorder(&mut recorder)
            .run()
            .unwrap();
        Carver::new(&mut plain, Coord::new(1, 1), SimpleLcg::new(77))
            .unwrap()
            .run()
            .unwrap();

        // observing does not change the outcome
        assert_eq!(grid, plain);

        let frames = recorder.frames();
        assert_eq!(frames.len(), 12);
        assert_eq!(frames[0].event, Event::Visited(Coord::new(1, 1)));
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.grid.missing_walls(), i);
            assert_eq!(frame.grid.visited_count(), i + 1);
        }
        assert_eq!(frames.last().unwrap().grid, grid);
    }

    #[test]
    fn test_disconnected_graph_is_fatal() {
        let mut grid = Grid::build(3, 1).unwrap();
        // sever (2, 0) from the rest of the adjacency graph
        grid.cell_mut(1).neighbors.retain(|&n| n != 2);
        grid.cell_mut(2).neighbors.clear();

        let err = Carver::new(&mut grid, Coord::new(0, 0), FirstCandidate)
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(
            err,
            MazeError::ConnectivityInvariantViolated { visited: 2, total: 3 }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_start_out_of_range() {
        let mut grid = Grid::build(3, 3).unwrap();
        assert!(matches!(
            Carver::new(&mut grid, Coord::new(3, 0), FirstCandidate),
            Err(MazeError::OutOfRange { .. })
        ));
    }
}
