//! Optional instrumentation: observers that receive grid copies after each mutation
//!
//! Sessions only call a recorder when one is attached, so an unobserved run
//! never clones the grid.

use alloc::vec::Vec;

use crate::grid::{Coord, Grid};

/// What changed in the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A session marked its first cell visited
    Visited(Coord),
    /// The wall between `from` and `to` was removed and `to` visited
    Carved { from: Coord, to: Coord },
    /// The solver stepped from `from` to `to`, extending the path
    Advanced { from: Coord, to: Coord },
    /// The solver dropped a dead-end cell from the path
    Retreated(Coord),
}

/// Observer of grid mutations. Must not influence the session.
pub trait Recorder {
    fn record(&mut self, event: Event, grid: &Grid);
}

/// Independent copy of the grid taken right after `event`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub event: Event,
    pub grid: Grid,
}

/// Keeps every snapshot in order
#[derive(Clone, Debug, Default)]
pub struct SnapshotRecorder {
    frames: Vec<Snapshot>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Snapshot> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Recorder for SnapshotRecorder {
    fn record(&mut self, event: Event, grid: &Grid) {
        self.frames.push(Snapshot {
            event,
            grid: grid.clone(),
        });
    }
}

/// Recorder that hands each snapshot to a callback
pub struct OnMutation<F>(F);

/// Wrap `callback` so it receives a fresh [`Snapshot`] after every mutation
pub fn on_mutation<F: FnMut(Snapshot)>(callback: F) -> OnMutation<F> {
    OnMutation(callback)
}

impl<F: FnMut(Snapshot)> Recorder for OnMutation<F> {
    fn record(&mut self, event: Event, grid: &Grid) {
        (self.0)(Snapshot {
            event,
            grid: grid.clone(),
        });
    }
}
