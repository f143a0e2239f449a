//! Per-algorithm run metrics.

use std::time::Duration;

use derive_more::Display;
use human_duration::human_duration;
use size::Size;
use thousands::Separable;

use crate::algorithms::Algorithm;
use crate::problems::grid::GridPosition;

/// Metrics of a single run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Wall-clock time from the first expansion to the end of the search,
    /// per-visit animation delays included.
    pub elapsed: Duration,
    /// States taken out of the frontier, start and end included.
    pub visited_count: usize,
    /// Cells on the path found, both ends included. 0 when there's none.
    pub path_length: usize,
    /// Largest size the frontier reached, a proxy for memory usage.
    pub peak_frontier: usize,
}

impl RunStats {
    /// Elapsed time, rounded to whole milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        (self.elapsed + Duration::from_micros(500)).as_millis()
    }

    /// Bytes needed to hold the frontier at its peak.
    pub fn peak_frontier_bytes(&self) -> Size {
        Size::from_bytes(self.peak_frontier * std::mem::size_of::<GridPosition>())
    }

    pub fn found_path(&self) -> bool {
        self.path_length > 0
    }
}

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum RunStatus {
    #[default]
    #[display("Ready")]
    Ready,
    #[display("Running...")]
    Running,
    #[display("Path Found!")]
    PathFound,
    #[display("No Path")]
    NoPath,
}

/// Results slot of one algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSlot {
    pub stats: RunStats,
    pub status: RunStatus,
}

/// Independent result slots for every algorithm.
///
/// Recording one algorithm never touches the others, so results of
/// consecutive runs stay side by side until `reset`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsBoard {
    breadth_first: StatsSlot,
    depth_first: StatsSlot,
}

impl StatsBoard {
    pub fn slot(&self, algorithm: Algorithm) -> &StatsSlot {
        match algorithm {
            Algorithm::BreadthFirst => &self.breadth_first,
            Algorithm::DepthFirst => &self.depth_first,
        }
    }
    fn slot_mut(&mut self, algorithm: Algorithm) -> &mut StatsSlot {
        match algorithm {
            Algorithm::BreadthFirst => &mut self.breadth_first,
            Algorithm::DepthFirst => &mut self.depth_first,
        }
    }

    pub fn stats(&self, algorithm: Algorithm) -> RunStats {
        self.slot(algorithm).stats
    }
    pub fn status(&self, algorithm: Algorithm) -> RunStatus {
        self.slot(algorithm).status
    }

    pub fn set_status(&mut self, algorithm: Algorithm, status: RunStatus) {
        self.slot_mut(algorithm).status = status;
    }

    pub fn record(&mut self, algorithm: Algorithm, stats: RunStats, status: RunStatus) {
        *self.slot_mut(algorithm) = StatsSlot { stats, status };
    }

    /// Clears every slot back to `Ready`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Writes a side by side table of every slot.
    pub fn write_comparison<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(
            out,
            "| {:10} | {:12} | {:>10} | {:>10} | {:>11} | {:>22} |",
            "Algorithm", "Status", "Time", "Visited", "Path length", "Memory"
        )?;
        for algorithm in Algorithm::ALL {
            let StatsSlot { stats, status } = self.slot(algorithm);
            let time = if stats.elapsed.is_zero() {
                "-".to_string()
            } else {
                human_duration(&stats.elapsed)
            };
            let memory = if stats.peak_frontier == 0 {
                "-".to_string()
            } else {
                format!(
                    "{} nodes ({})",
                    stats.peak_frontier.separate_with_commas(),
                    stats.peak_frontier_bytes()
                )
            };
            writeln!(
                out,
                "| {:10} | {:12} | {:>10} | {:>10} | {:>11} | {:>22} |",
                algorithm.to_string(),
                status.to_string(),
                time,
                stats.visited_count.separate_with_commas(),
                stats.path_length.separate_with_commas(),
                memory,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunStats {
        RunStats {
            elapsed: Duration::from_millis(120),
            visited_count: 1_234,
            path_length: 27,
            peak_frontier: 40,
        }
    }

    #[test]
    fn slots_are_independent() {
        let mut board = StatsBoard::default();
        board.record(Algorithm::BreadthFirst, sample(), RunStatus::PathFound);
        board.set_status(Algorithm::DepthFirst, RunStatus::Running);
        board.record(Algorithm::DepthFirst, RunStats::default(), RunStatus::NoPath);

        assert_eq!(board.stats(Algorithm::BreadthFirst), sample());
        assert_eq!(board.status(Algorithm::BreadthFirst), RunStatus::PathFound);
        assert_eq!(board.status(Algorithm::DepthFirst), RunStatus::NoPath);

        board.reset();
        assert_eq!(board, StatsBoard::default());
        assert_eq!(board.status(Algorithm::BreadthFirst), RunStatus::Ready);
    }

    #[test]
    fn elapsed_rounds_to_nearest_ms() {
        let mut stats = sample();
        stats.elapsed = Duration::from_micros(2_499);
        assert_eq!(stats.elapsed_ms(), 2);
        stats.elapsed = Duration::from_micros(2_500);
        assert_eq!(stats.elapsed_ms(), 3);
    }

    #[test]
    fn memory_estimate_scales_with_peak() {
        let stats = sample();
        assert_eq!(
            stats.peak_frontier_bytes(),
            Size::from_bytes(40 * std::mem::size_of::<GridPosition>())
        );
        assert!(stats.found_path());
        assert!(!RunStats::default().found_path());
    }

    #[test]
    fn comparison_table() {
        let mut board = StatsBoard::default();
        board.record(Algorithm::BreadthFirst, sample(), RunStatus::PathFound);

        let mut out = Vec::new();
        board.write_comparison(&mut out).unwrap();
        let table = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("BFS"));
        assert!(lines[1].contains("Path Found!"));
        assert!(lines[1].contains("1,234"));
        assert!(lines[1].contains("40 nodes"));
        assert!(lines[2].contains("DFS"));
        assert!(lines[2].contains("Ready"));
    }
}
