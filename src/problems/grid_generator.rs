//! Random maze generation.

use rand::Rng;
use thiserror::Error;

use crate::problems::grid::Coord;
use crate::problems::grid::Grid;
use crate::problems::grid::GridError;
use crate::problems::grid::GridPosition;

const RANDOM_STATE_MAX_TRIES: usize = 10_000;

pub const MIN_GRID_SIDE: usize = 5;
pub const MAX_GRID_SIDE: usize = 50;

/// Range of rows and columns a generated Grid may have.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLimits {
    pub min_side: usize,
    pub max_side: usize,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            min_side: MIN_GRID_SIDE,
            max_side: MAX_GRID_SIDE,
        }
    }
}

impl GridLimits {
    pub fn contains(&self, side: usize) -> bool {
        (self.min_side..=self.max_side).contains(&side)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Grid {rows}x{cols} is outside the supported sides {min_side}..={max_side}")]
    DimensionsOutOfRange {
        rows: usize,
        cols: usize,
        min_side: usize,
        max_side: usize,
    },
    #[error("Obstacle density {0}% is above 100%")]
    DensityOutOfRange(u8),
    #[error("No cell of a {rows}x{cols} grid is {min_distance} steps away from {start}")]
    UnsatisfiableSeparation {
        rows: usize,
        cols: usize,
        start: GridPosition,
        min_distance: usize,
    },
    #[error("No end at least {min_distance} steps away from {start} after {tries} tries")]
    SeparationTriesExhausted {
        start: GridPosition,
        min_distance: usize,
        tries: usize,
    },
    #[error("Generated an invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
}

/// Minimum Manhattan distance between start and end, `⌊(rows+cols)/3⌋`.
///
/// Never below 1, so start and end always differ.
pub fn min_separation(rows: usize, cols: usize) -> usize {
    ((rows + cols) / 3).max(1)
}

/// Builds random Grids.
///
/// Every cell turns into a wall independently. Start is drawn uniformly over
/// all cells and end is re-drawn until it's far enough from start. Both are
/// open afterwards, whatever the wall draw said.
#[derive(Copy, Clone, Debug, Default)]
pub struct GridGenerator {
    limits: GridLimits,
}

impl GridGenerator {
    pub fn new(limits: GridLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> GridLimits {
        self.limits
    }

    pub fn generate<R: Rng>(
        &self,
        r: &mut R,
        rows: usize,
        cols: usize,
        density_percent: u8,
    ) -> Result<Grid, GenerateError> {
        if !self.limits.contains(rows) || !self.limits.contains(cols) || rows * cols == 0 {
            return Err(GenerateError::DimensionsOutOfRange {
                rows,
                cols,
                min_side: self.limits.min_side,
                max_side: self.limits.max_side,
            });
        }
        if density_percent > 100 {
            return Err(GenerateError::DensityOutOfRange(density_percent));
        }
        debug_assert!(rows <= Coord::MAX as usize && cols <= Coord::MAX as usize);

        let p = f64::from(density_percent) / 100.0;
        let walls: Vec<bool> = (0..rows * cols).map(|_| r.random_bool(p)).collect();

        let start = random_position(r, rows, cols);
        let min_distance = min_separation(rows, cols);

        // The farthest cell from start is always one of the corners.
        let farthest = [(0, 0), (0, cols - 1), (rows - 1, 0), (rows - 1, cols - 1)]
            .into_iter()
            .map(|(row, col)| {
                start.manhattan_distance(&GridPosition::new_from_usize(row, col)) as usize
            })
            .max()
            .unwrap_or(0);
        if farthest < min_distance {
            return Err(GenerateError::UnsatisfiableSeparation {
                rows,
                cols,
                start,
                min_distance,
            });
        }

        let mut end = None;
        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let candidate = random_position(r, rows, cols);
            if start.manhattan_distance(&candidate) as usize >= min_distance {
                end = Some(candidate);
                break;
            }
        }
        let end = end.ok_or(GenerateError::SeparationTriesExhausted {
            start,
            min_distance,
            tries: RANDOM_STATE_MAX_TRIES,
        })?;

        let grid = Grid::new(rows, cols, &walls, start, end)?;
        log::debug!(
            "Generated {rows}x{cols} grid with {} walls ({density_percent}%), start {start}, end {end}",
            grid.wall_count()
        );
        Ok(grid)
    }
}

fn random_position<R: Rng>(r: &mut R, rows: usize, cols: usize) -> GridPosition {
    GridPosition::new_from_usize(r.random_range(0..rows), r.random_range(0..cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::search::SearchMarks;

    #[test]
    fn separation_bound() {
        assert_eq!(min_separation(5, 5), 3);
        assert_eq!(min_separation(15, 15), 10);
        assert_eq!(min_separation(50, 50), 33);
        assert_eq!(min_separation(1, 1), 1);
    }

    #[test]
    fn rejects_out_of_range_dimensions() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let generator = GridGenerator::default();

        assert_eq!(
            generator.generate(&mut rng, 4, 10, 20),
            Err(GenerateError::DimensionsOutOfRange {
                rows: 4,
                cols: 10,
                min_side: MIN_GRID_SIDE,
                max_side: MAX_GRID_SIDE,
            })
        );
        assert!(generator.generate(&mut rng, 10, 51, 20).is_err());
    }

    #[test]
    fn rejects_density_above_100() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            GridGenerator::default().generate(&mut rng, 10, 10, 101),
            Err(GenerateError::DensityOutOfRange(101))
        );
    }

    #[test]
    fn single_cell_grid_is_invalid_configuration() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let generator = GridGenerator::new(GridLimits {
            min_side: 1,
            max_side: 10,
        });

        assert_eq!(
            generator.generate(&mut rng, 1, 1, 0),
            Err(GenerateError::UnsatisfiableSeparation {
                rows: 1,
                cols: 1,
                start: GridPosition::new(0, 0),
                min_distance: 1,
            })
        );
    }

    #[test]
    fn full_density_leaves_only_endpoints_open() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = GridGenerator::default()
            .generate(&mut rng, 8, 8, 100)
            .unwrap();

        assert_eq!(grid.wall_count(), 8 * 8 - 2);
    }

    #[test]
    fn same_seed_same_grid() {
        let generator = GridGenerator::default();
        let a = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(42), 15, 15, 30)
            .unwrap();
        let b = generator
            .generate(&mut ChaCha8Rng::seed_from_u64(42), 15, 15, 30)
            .unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn generated_grids_hold_placement_invariants(
            seed in any::<u64>(),
            rows in MIN_GRID_SIDE..=MAX_GRID_SIDE,
            cols in MIN_GRID_SIDE..=MAX_GRID_SIDE,
            density in 0u8..=100,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = GridGenerator::default().generate(&mut rng, rows, cols, density).unwrap();

            let start = grid.start();
            let end = grid.end();
            prop_assert_eq!(grid.dimensions(), (rows, cols));
            prop_assert_ne!(start, end);
            prop_assert!(!grid.is_wall(&start));
            prop_assert!(!grid.is_wall(&end));
            prop_assert!(start.manhattan_distance(&end) as usize >= (rows + cols) / 3);

            prop_assert_eq!(grid.cells().filter(|(_, c)| c.is_start).count(), 1);
            prop_assert_eq!(grid.cells().filter(|(_, c)| c.is_end).count(), 1);
            prop_assert!(grid.is_clean());
            prop_assert!(!grid.is_visited(&start));
        }
    }
}
