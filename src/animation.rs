//! Paced, event-emitting driver for traversals.
//!
//! The scheduler pulls one event at a time out of a traversal, forwards it to
//! a `Renderer` and lets the renderer pause before pulling the next one. How
//! the pause happens (sleeping, pumping an event loop, nothing at all) is up
//! to the renderer.

use std::cell::Cell;
use std::time::Duration;

use derive_more::Display;
use hrsw::Stopwatch;

use crate::algorithms::Algorithm;
use crate::algorithms::traversal::TraversalEvent;
use crate::algorithms::traversal::TraversalSearch;
use crate::data_structures::frontier::Frontier;
use crate::problems::grid::Grid;
use crate::problems::grid::GridAction;
use crate::problems::grid::GridPath;
use crate::problems::grid::GridPosition;
use crate::stats::RunStats;
use crate::stats::RunStatus;

/// Event sink for everything a session does to its grid.
///
/// All methods do nothing by default, but `pause` sleeps on the current
/// thread.
pub trait Renderer {
    /// A new grid replaced the previous one.
    fn grid_generated(&mut self, _grid: &Grid) {}
    /// Visited cells and path overlays should be wiped.
    fn cleared(&mut self) {}
    fn run_started(&mut self, _algorithm: Algorithm) {}
    /// A cell other than start or end was taken out of the frontier.
    fn cell_visited(&mut self, _algorithm: Algorithm, _cell: GridPosition) {}
    /// The end was reached. Path playback follows.
    fn path_found(&mut self, _algorithm: Algorithm, _path: &GridPath) {}
    /// Next cell of the path playback, start first.
    fn path_step(&mut self, _algorithm: Algorithm, _cell: GridPosition) {}
    /// The frontier ran dry without reaching the end.
    fn no_path(&mut self, _algorithm: Algorithm) {}
    fn run_completed(&mut self, _algorithm: Algorithm, _stats: &RunStats, _status: RunStatus) {}

    /// Yields control for `delay` so intermediate state can be drawn.
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Renderer that draws nothing and never waits.
#[derive(Copy, Clone, Debug, Default)]
pub struct Headless;

impl Renderer for Headless {
    fn pause(&mut self, _delay: Duration) {}
}

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// The "something is running" flag guarding a session's entry points.
///
/// Entering while it's held fails instead of waiting, there's nobody else to
/// release it on a single thread.
#[derive(Debug, Default)]
pub struct RunLatch {
    busy: Cell<bool>,
}

impl RunLatch {
    #[must_use]
    pub fn try_enter(&self) -> Option<RunLatchGuard<'_>> {
        if self.busy.replace(true) {
            return None;
        }
        Some(RunLatchGuard { latch: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// Holds a `RunLatch` until dropped.
#[derive(Debug)]
pub struct RunLatchGuard<'l> {
    latch: &'l RunLatch,
}

impl Drop for RunLatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.set(false);
    }
}

/// Drives a single traversal, pacing it for a Renderer.
///
/// `Idle → Running → {Succeeded | Failed}`, and `settle` brings it back to
/// `Idle`.
#[derive(Debug)]
pub struct AnimationScheduler {
    step_delay: Duration,
    state: SchedulerState,
}

impl AnimationScheduler {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            step_delay,
            state: SchedulerState::Idle,
        }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }
    /// Path playback runs 1.5 times slower than the search.
    pub fn path_delay(&self) -> Duration {
        self.step_delay * 3 / 2
    }
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Returns to `Idle` once a run's results were handed over.
    pub fn settle(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Runs a traversal to completion.
    ///
    /// Pauses `step_delay` after every visited cell. When the end is reached
    /// the path is played back a cell at a time, pausing `path_delay` after
    /// each. The playback is not part of the elapsed time.
    pub fn drive<F, R>(
        &mut self,
        algorithm: Algorithm,
        mut search: TraversalSearch<'_, F, Grid, GridPosition, GridAction>,
        renderer: &mut R,
    ) -> (RunStats, RunStatus)
    where
        F: Frontier<GridPosition>,
        R: Renderer + ?Sized,
    {
        debug_assert_eq!(self.state, SchedulerState::Idle);
        self.state = SchedulerState::Running;

        let mut stopwatch = Stopwatch::new_started();
        let mut path = None;
        for event in search.by_ref() {
            match event {
                TraversalEvent::Visited(cell) => {
                    renderer.cell_visited(algorithm, cell);
                    renderer.pause(self.step_delay);
                }
                TraversalEvent::Found(p) => path = Some(p),
                TraversalEvent::Exhausted => {}
            }
        }
        stopwatch.stop();

        let mut stats = RunStats {
            elapsed: stopwatch.elapsed(),
            visited_count: search.expanded(),
            path_length: 0,
            peak_frontier: search.peak_frontier(),
        };

        match path {
            Some(path) if !path.is_empty() => {
                self.state = SchedulerState::Succeeded;
                stats.path_length = path.len();
                renderer.path_found(algorithm, &path);
                let delay = self.path_delay();
                for cell in &path.states {
                    renderer.path_step(algorithm, *cell);
                    renderer.pause(delay);
                }
                (stats, RunStatus::PathFound)
            }
            _ => {
                self.state = SchedulerState::Failed;
                renderer.no_path(algorithm);
                (stats, RunStatus::NoPath)
            }
        }
    }
}
