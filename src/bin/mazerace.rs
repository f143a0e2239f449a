/// Races breadth-first and depth-first search on random mazes in the terminal.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anstream::eprintln;
use anstream::print;
use anstream::println;
use clap::Parser;
use clap::ValueEnum;
use owo_colors::OwoColorize;

use mazerace::algorithms::Algorithm;
use mazerace::animation::Renderer;
use mazerace::problems::grid::Grid;
use mazerace::problems::grid::GridPath;
use mazerace::problems::grid::GridPosition;
use mazerace::session::Config;
use mazerace::session::Session;
use mazerace::session::SessionError;
use mazerace::stats::RunStats;
use mazerace::stats::RunStatus;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Race {
    Bfs,
    Dfs,
    Both,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = mazerace::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Rows and columns of the maze.
    #[arg(short, long, env = "MAZERACE_SIZE", default_value_t = 15)]
    pub size: usize,
    /// Chance of each cell being a wall, in percent.
    #[arg(short, long, env = "MAZERACE_DENSITY", default_value_t = 30)]
    pub density: u8,
    /// Milliseconds to wait after each visited cell.
    #[arg(long, env = "MAZERACE_SPEED", default_value_t = 50)]
    pub speed: u64,
    #[arg(long, env = "MAZERACE_SEED")]
    pub seed: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = Race::Both)]
    pub algorithm: Race,

    /// Only print the final maze and the results.
    #[arg(long)]
    pub no_animate: bool,

    /// Also write an org report of the race here.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum Overlay {
    #[default]
    None,
    Visited(Algorithm),
    Path,
}

/// Redraws the maze in place on every pause.
struct TerminalRenderer {
    animate: bool,
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
    start: GridPosition,
    end: GridPosition,
    overlay: Vec<Overlay>,
    caption: String,
}

impl TerminalRenderer {
    fn new(grid: &Grid, animate: bool) -> Self {
        let mut renderer = Self {
            animate,
            rows: 0,
            cols: 0,
            walls: Vec::new(),
            start: grid.start(),
            end: grid.end(),
            overlay: Vec::new(),
            caption: String::new(),
        };
        renderer.load(grid);
        renderer
    }

    fn load(&mut self, grid: &Grid) {
        (self.rows, self.cols) = grid.dimensions();
        self.walls = grid.cells().map(|(_, c)| c.is_wall).collect();
        self.start = grid.start();
        self.end = grid.end();
        self.overlay = vec![Overlay::None; self.walls.len()];
    }

    fn mark(&mut self, p: GridPosition, overlay: Overlay) {
        let i = p.row as usize * self.cols + p.col as usize;
        if let Some(o) = self.overlay.get_mut(i) {
            *o = overlay;
        }
    }

    fn draw(&self) {
        let mut frame = String::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = GridPosition::new(row as u32, col as u32);
                let i = row * self.cols + col;
                let glyph = if p == self.start {
                    "S ".black().on_green().to_string()
                } else if p == self.end {
                    "E ".black().on_red().to_string()
                } else if self.walls[i] {
                    "██".white().to_string()
                } else {
                    match self.overlay[i] {
                        Overlay::None => "· ".dimmed().to_string(),
                        Overlay::Visited(Algorithm::BreadthFirst) => "░░".blue().to_string(),
                        Overlay::Visited(Algorithm::DepthFirst) => "░░".magenta().to_string(),
                        Overlay::Path => "██".yellow().to_string(),
                    }
                };
                frame.push_str(&glyph);
            }
            frame.push('\n');
        }
        frame.push_str(&self.caption);
        frame.push('\n');

        if self.animate {
            // Cursor home and clear.
            print!("\x1b[H\x1b[2J");
        }
        print!("{frame}");
    }
}

impl Renderer for TerminalRenderer {
    fn grid_generated(&mut self, grid: &Grid) {
        self.load(grid);
    }
    fn cleared(&mut self) {
        self.overlay.fill(Overlay::None);
    }
    fn run_started(&mut self, algorithm: Algorithm) {
        self.caption = format!("{}: {}", algorithm.name(), RunStatus::Running);
    }
    fn cell_visited(&mut self, algorithm: Algorithm, cell: GridPosition) {
        self.mark(cell, Overlay::Visited(algorithm));
    }
    fn path_found(&mut self, algorithm: Algorithm, path: &GridPath) {
        self.caption = format!("{}: {} ({} cells)", algorithm.name(), RunStatus::PathFound, path.len());
    }
    fn path_step(&mut self, _algorithm: Algorithm, cell: GridPosition) {
        if cell != self.start && cell != self.end {
            self.mark(cell, Overlay::Path);
        }
    }
    fn no_path(&mut self, algorithm: Algorithm) {
        self.caption = format!("{}: {}", algorithm.name(), RunStatus::NoPath);
    }
    fn run_completed(&mut self, algorithm: Algorithm, stats: &RunStats, status: RunStatus) {
        if !self.animate {
            self.draw();
        }
        println!(
            "{} {} in {}ms, visited {}, path {}, peak frontier {} ({})",
            algorithm.bold(),
            status.cyan(),
            stats.elapsed_ms(),
            stats.visited_count,
            stats.path_length,
            stats.peak_frontier,
            stats.peak_frontier_bytes(),
        );
    }

    fn pause(&mut self, delay: Duration) {
        if self.animate {
            self.draw();
            std::thread::sleep(delay);
        }
    }
}

fn write_report<W: Write>(out: &mut BufWriter<W>, session: &Session) -> std::io::Result<()> {
    let config = session.config();
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", mazerace::build::PKG_VERSION)?;
    writeln!(out, ":GIT_BRANCH: {:?}", shadow_rs::branch())?;
    writeln!(out, ":BUILD_IS_DEBUG: {}", shadow_rs::is_debug())?;
    writeln!(out, ":END:")?;
    writeln!(out, "#+title: Maze race")?;
    writeln!(out)?;
    writeln!(out, "* Maze")?;
    writeln!(out, "- Size: {}", config.grid_size)?;
    writeln!(out, "- Density: {}%", config.obstacle_density)?;
    if let Some(seed) = config.seed {
        writeln!(out, "- Seed: {seed}")?;
    }
    if let Some(grid) = session.grid() {
        writeln!(out, "#+begin_example\n{grid}#+end_example")?;
    }
    writeln!(out, "* Results")?;
    session.board().write_comparison(&mut *out)?;
    Ok(())
}

fn race(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config {
        grid_size: args.size,
        obstacle_density: args.density,
        animation_speed: Duration::from_millis(args.speed),
        seed: args.seed,
        ..Default::default()
    };
    let session = Session::new(config)?;
    let mut renderer = match session.grid() {
        Some(grid) => TerminalRenderer::new(&grid, !args.no_animate),
        None => return Err(SessionError::RunInProgress.into()),
    };

    match args.algorithm {
        Race::Bfs => {
            session.run(Algorithm::BreadthFirst, &mut renderer)?;
        }
        Race::Dfs => {
            session.run(Algorithm::DepthFirst, &mut renderer)?;
        }
        Race::Both => {
            session.run_both(&mut renderer)?;
        }
    }

    println!();
    session.board().write_comparison(std::io::stdout().lock())?;

    if let Some(output) = &args.output {
        println!("Writing report to {:?}", output.yellow());
        let mut out = BufWriter::new(File::create(output)?);
        write_report(&mut out, &session)?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    args.color.write_global();
    if let Err(e) = mazerace::logging::init(mazerace::logging::verbosity_level(args.verbose)) {
        eprintln!("{} {e}", "Failed to set up logging:".yellow());
    }

    match race(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::ExitCode::FAILURE
        }
    }
}
