//! A maze and the results of racing algorithms over it.
//!
//! Everything a front end needs goes through `Session`. Its entry points take
//! `&self` so a `Renderer` holding the same session can poke at it while a run
//! is paused; such requests are turned away by the run latch.

use std::cell::Cell;
use std::cell::Ref;
use std::cell::RefCell;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::algorithms::Algorithm;
use crate::algorithms::traversal::BreadthFirstSearch;
use crate::algorithms::traversal::DepthFirstSearch;
use crate::animation::AnimationScheduler;
use crate::animation::Renderer;
use crate::animation::RunLatch;
use crate::animation::SchedulerState;
use crate::problems::grid::Grid;
use crate::problems::grid_generator::GenerateError;
use crate::problems::grid_generator::GridGenerator;
use crate::problems::grid_generator::GridLimits;
use crate::search::SearchMarks;
use crate::stats::RunStats;
use crate::stats::RunStatus;
use crate::stats::StatsBoard;

pub const DEFAULT_GRID_SIZE: usize = 15;
pub const DEFAULT_OBSTACLE_DENSITY: u8 = 30;
pub const DEFAULT_ANIMATION_SPEED: Duration = Duration::from_millis(50);
/// Breather between the two halves of `Session::run_both`.
pub const RUN_BOTH_PAUSE: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Rows and columns of generated grids.
    pub grid_size: usize,
    /// Chance of each cell being a wall, in percent.
    pub obstacle_density: u8,
    /// Pause after each visited cell. Path playback pauses 1.5 times longer.
    pub animation_speed: Duration,
    /// Seed for maze generation. Random when missing.
    pub seed: Option<u64>,
    pub limits: GridLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            obstacle_density: DEFAULT_OBSTACLE_DENSITY,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            seed: None,
            limits: GridLimits::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A run is already in progress")]
    RunInProgress,
    #[error("Failed to generate a maze: {0}")]
    Generate(#[from] GenerateError),
}

pub struct Session {
    config: RefCell<Config>,
    generator: GridGenerator,
    rng: RefCell<ChaCha8Rng>,

    /// Owned by the active run while there's one.
    grid: RefCell<Grid>,
    stats: RefCell<StatsBoard>,

    latch: RunLatch,
    scheduler_state: Cell<SchedulerState>,
}

impl Session {
    /// Creates a session with a freshly generated maze.
    pub fn new(config: Config) -> Result<Self, SessionError> {
        let mut rng = session_rng(&config);
        let generator = GridGenerator::new(config.limits);
        let grid = generator.generate(
            &mut rng,
            config.grid_size,
            config.grid_size,
            config.obstacle_density,
        )?;
        Ok(Self::assemble(config, generator, rng, grid))
    }

    /// Creates a session around an existing maze.
    pub fn with_grid(config: Config, grid: Grid) -> Self {
        let rng = session_rng(&config);
        let generator = GridGenerator::new(config.limits);
        Self::assemble(config, generator, rng, grid)
    }

    fn assemble(config: Config, generator: GridGenerator, rng: ChaCha8Rng, grid: Grid) -> Self {
        Self {
            config: RefCell::new(config),
            generator,
            rng: RefCell::new(rng),
            grid: RefCell::new(grid),
            stats: RefCell::new(StatsBoard::default()),
            latch: RunLatch::default(),
            scheduler_state: Cell::new(SchedulerState::Idle),
        }
    }

    pub fn config(&self) -> Config {
        self.config.borrow().clone()
    }
    /// Side of the next generated grid. Out of range values are refused when
    /// generating.
    pub fn set_grid_size(&self, size: usize) {
        self.config.borrow_mut().grid_size = size;
    }
    pub fn set_obstacle_density(&self, percent: u8) {
        self.config.borrow_mut().obstacle_density = percent;
    }
    /// Applies from the next run on.
    pub fn set_animation_speed(&self, speed: Duration) {
        self.config.borrow_mut().animation_speed = speed;
    }

    /// The current grid, unless a run holds it.
    pub fn grid(&self) -> Option<Ref<'_, Grid>> {
        self.grid.try_borrow().ok()
    }

    pub fn stats(&self, algorithm: Algorithm) -> RunStats {
        self.stats.borrow().stats(algorithm)
    }
    pub fn status(&self, algorithm: Algorithm) -> RunStatus {
        self.stats.borrow().status(algorithm)
    }
    pub fn board(&self) -> StatsBoard {
        self.stats.borrow().clone()
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler_state.get()
    }
    pub fn is_running(&self) -> bool {
        self.latch.is_busy()
    }

    /// Replaces the maze with a new random one and clears all statistics.
    pub fn generate<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), SessionError> {
        let Some(_guard) = self.latch.try_enter() else {
            return Err(rejected("generate"));
        };

        let config = self.config();
        let grid = self.generator.generate(
            &mut *self.rng.borrow_mut(),
            config.grid_size,
            config.grid_size,
            config.obstacle_density,
        )?;

        *self.grid.borrow_mut() = grid;
        self.stats.borrow_mut().reset();
        self.scheduler_state.set(SchedulerState::Idle);
        renderer.grid_generated(&self.grid.borrow());
        Ok(())
    }

    /// Clears every visited mark and parent, the drawn overlay and all
    /// statistics.
    pub fn reset<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), SessionError> {
        let Some(_guard) = self.latch.try_enter() else {
            return Err(rejected("reset"));
        };

        self.grid.borrow_mut().clear_marks();
        self.stats.borrow_mut().reset();
        self.scheduler_state.set(SchedulerState::Idle);
        renderer.cleared();
        Ok(())
    }

    /// Runs one algorithm over the current maze, recording its statistics.
    ///
    /// Only the grid is cleared beforehand. Results of other algorithms stay.
    pub fn run<R: Renderer + ?Sized>(
        &self,
        algorithm: Algorithm,
        renderer: &mut R,
    ) -> Result<RunStats, SessionError> {
        let Some(_guard) = self.latch.try_enter() else {
            return Err(rejected("run"));
        };

        Ok(self.run_latched(algorithm, renderer))
    }

    /// Runs breadth-first, then depth-first after a short pause, keeping both
    /// results.
    pub fn run_both<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
    ) -> Result<(RunStats, RunStats), SessionError> {
        let Some(_guard) = self.latch.try_enter() else {
            return Err(rejected("run both"));
        };

        let breadth_first = self.run_latched(Algorithm::BreadthFirst, renderer);
        renderer.pause(RUN_BOTH_PAUSE);
        let depth_first = self.run_latched(Algorithm::DepthFirst, renderer);
        Ok((breadth_first, depth_first))
    }

    fn run_latched<R: Renderer + ?Sized>(&self, algorithm: Algorithm, renderer: &mut R) -> RunStats {
        debug_assert!(self.latch.is_busy());
        let step_delay = self.config.borrow().animation_speed;

        let mut grid = self.grid.borrow_mut();
        grid.clear_marks();
        renderer.cleared();

        self.stats
            .borrow_mut()
            .set_status(algorithm, RunStatus::Running);
        renderer.run_started(algorithm);
        log::info!("{} started on {:?}", algorithm.name(), *grid);

        let (start, end) = (grid.start(), grid.end());
        let mut scheduler = AnimationScheduler::new(step_delay);
        self.scheduler_state.set(SchedulerState::Running);
        let (stats, status) = match algorithm {
            Algorithm::BreadthFirst => scheduler.drive(
                algorithm,
                BreadthFirstSearch::new(&mut *grid, start, end),
                renderer,
            ),
            Algorithm::DepthFirst => scheduler.drive(
                algorithm,
                DepthFirstSearch::new(&mut *grid, start, end),
                renderer,
            ),
        };
        self.scheduler_state.set(scheduler.state());
        drop(grid);

        log::info!(
            "{algorithm} finished: {status} (visited: {}, path: {}, peak frontier: {}, {}ms)",
            stats.visited_count,
            stats.path_length,
            stats.peak_frontier,
            stats.elapsed_ms(),
        );
        self.stats.borrow_mut().record(algorithm, stats, status);
        renderer.run_completed(algorithm, &stats, status);

        scheduler.settle();
        self.scheduler_state.set(scheduler.state());
        stats
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("state", &self.scheduler_state.get())
            .field("running", &self.latch.is_busy())
            .finish()
    }
}

fn session_rng(config: &Config) -> ChaCha8Rng {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("Seeding maze generation with {seed}");
    ChaCha8Rng::seed_from_u64(seed)
}

fn rejected(request: &str) -> SessionError {
    log::debug!("Ignoring {request} request, a run is in progress");
    SessionError::RunInProgress
}
