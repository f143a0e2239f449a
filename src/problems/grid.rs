use derive_more::Display;
use thiserror::Error;

use crate::search::SearchMarks;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 60;

pub type Coord = u32;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({row},{col})")]
pub struct GridPosition {
    pub row: Coord,
    pub col: Coord,
}

impl GridPosition {
    pub const fn new(row: Coord, col: Coord) -> GridPosition {
        GridPosition { row, col }
    }
    pub(crate) fn new_from_usize(row: usize, col: usize) -> GridPosition {
        debug_assert!(row <= Coord::MAX as usize);
        debug_assert!(col <= Coord::MAX as usize);
        GridPosition {
            row: row as Coord,
            col: col as Coord,
        }
    }

    /// |row1 - row2| + |col1 - col2|
    #[inline(always)]
    pub fn manhattan_distance(&self, other: &GridPosition) -> Coord {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether both positions share a side.
    #[inline(always)]
    pub fn is_adjacent(&self, other: &GridPosition) -> bool {
        self.manhattan_distance(other) == 1
    }
}
impl State for GridPosition {}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum GridAction {
    #[display("↑")]
    Up = 0, // row--
    #[display("↓")]
    Down = 1, // row++
    #[display("←")]
    Left = 2, // col--
    #[display("→")]
    Right = 3, // col++
}
impl Action for GridAction {}

impl GridAction {
    /// Expansion order used by every traversal.
    pub const ALL: [GridAction; 4] = [
        GridAction::Up,
        GridAction::Down,
        GridAction::Left,
        GridAction::Right,
    ];
}

pub type GridPath = Path<GridPosition, GridAction>;

/// A single square of the Grid.
///
/// `is_wall`, `is_start` and `is_end` are the layout, fixed once the Grid is
/// built. `visited` and `parent` belong to the traversal running over it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_wall: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub visited: bool,
    pub parent: Option<GridPosition>,
}

impl Cell {
    fn wall() -> Cell {
        Cell {
            is_wall: true,
            ..Default::default()
        }
    }

    /// Whether the traversal marks are in their initial state.
    pub fn is_clean(&self) -> bool {
        !self.visited && self.parent.is_none()
    }

    fn symbol(&self) -> char {
        match (self.is_start, self.is_end, self.is_wall) {
            (true, _, _) => 'S',
            (_, true, _) => 'E',
            (_, _, true) => '#',
            _ => '.',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid has no cells")]
    EmptyGrid,
    #[error("Wall map has {found} cells, expected {expected}")]
    WrongCellCount { expected: usize, found: usize },
    #[error("{0} is outside the grid")]
    OutOfBounds(GridPosition),
    #[error("Start and end are both {0}")]
    StartIsEnd(GridPosition),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid character '{ch}' found at ({row},{col})")]
    InvalidCharacter { ch: char, row: usize, col: usize },
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Missing start 'S'")]
    MissingStart,
    #[error("Missing end 'E'")]
    MissingEnd,
    #[error("Found a second start at ({row},{col})")]
    DuplicateStart { row: usize, col: usize },
    #[error("Found a second end at ({row},{col})")]
    DuplicateEnd { row: usize, col: usize },
    #[error("Invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
}

/// A rectangular maze stored as a flat, row-major arena of Cells.
///
/// There's exactly one start and one end, they differ and neither is a wall.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: GridPosition,
    end: GridPosition,
}

impl Grid {
    /// Builds a Grid from its wall map (row-major), forcing `start` and `end`
    /// to be open.
    pub fn new(
        rows: usize,
        cols: usize,
        walls: &[bool],
        start: GridPosition,
        end: GridPosition,
    ) -> Result<Grid, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        if walls.len() != rows * cols {
            return Err(GridError::WrongCellCount {
                expected: rows * cols,
                found: walls.len(),
            });
        }
        let mut grid = Grid {
            rows,
            cols,
            cells: walls
                .iter()
                .map(|&is_wall| if is_wall { Cell::wall() } else { Cell::default() })
                .collect(),
            start,
            end,
        };
        for p in [start, end] {
            if !grid.in_bounds(&p) {
                return Err(GridError::OutOfBounds(p));
            }
        }
        if start == end {
            return Err(GridError::StartIsEnd(start));
        }

        let i = grid.index(&start);
        grid.cells[i].is_wall = false;
        grid.cells[i].is_start = true;
        let i = grid.index(&end);
        grid.cells[i].is_wall = false;
        grid.cells[i].is_end = true;

        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn start(&self) -> GridPosition {
        self.start
    }
    pub fn end(&self) -> GridPosition {
        self.end
    }

    #[inline(always)]
    pub fn in_bounds(&self, p: &GridPosition) -> bool {
        (p.row as usize) < self.rows && (p.col as usize) < self.cols
    }

    #[inline(always)]
    fn index(&self, p: &GridPosition) -> usize {
        debug_assert!(self.in_bounds(p));
        p.row as usize * self.cols + p.col as usize
    }

    pub fn cell(&self, p: &GridPosition) -> Option<&Cell> {
        self.in_bounds(p).then(|| &self.cells[self.index(p)])
    }

    #[inline(always)]
    pub fn is_wall(&self, p: &GridPosition) -> bool {
        self.cell(p).is_none_or(|c| c.is_wall)
    }

    /// Every position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| GridPosition::new_from_usize(row, col)))
    }

    /// Cells paired with their positions, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (GridPosition, &Cell)> + '_ {
        self.positions().zip(self.cells.iter())
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall).count()
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    /// Whether no traversal marks are left anywhere.
    pub fn is_clean(&self) -> bool {
        self.cells.iter().all(Cell::is_clean)
    }
}

impl Space<GridPosition, GridAction> for Grid {
    #[inline(always)]
    fn apply(&self, p: &GridPosition, a: &GridAction) -> Option<GridPosition> {
        #[rustfmt::skip]
        let (row, col) = match a {
            GridAction::Up    => (p.row.checked_sub(1)?, p.col                ),
            GridAction::Down  => (p.row.checked_add(1)?, p.col                ),
            GridAction::Left  => (p.row,                 p.col.checked_sub(1)?),
            GridAction::Right => (p.row,                 p.col.checked_add(1)?),
        };
        let s = GridPosition { row, col };

        self.valid(&s).then_some(s)
    }

    #[inline(always)]
    fn valid(&self, p: &GridPosition) -> bool {
        self.in_bounds(p) && !self.cells[self.index(p)].is_wall
    }

    /// Gets the open neighbours of a position, up, down, left and right.
    fn neighbours(&self, p: &GridPosition) -> Neighbours<GridPosition, GridAction> {
        GridAction::ALL
            .iter()
            .filter_map(|a| self.apply(p, a).map(|s| (s, *a)))
            .collect()
    }

    fn size(&self) -> usize {
        self.rows * self.cols
    }
}

impl SearchMarks<GridPosition> for Grid {
    #[inline(always)]
    fn is_visited(&self, p: &GridPosition) -> bool {
        self.cell(p).is_some_and(|c| c.visited)
    }

    #[inline(always)]
    fn mark_visited(&mut self, p: &GridPosition, parent: Option<GridPosition>) {
        let i = self.index(p);
        let cell = &mut self.cells[i];
        cell.visited = true;
        cell.parent = parent;
    }

    #[inline(always)]
    fn parent(&self, p: &GridPosition) -> Option<GridPosition> {
        self.cell(p).and_then(|c| c.parent)
    }

    fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
            cell.parent = None;
        }
    }
}

/// Reads a Grid from text, one line per row.
///
/// - `.` or ` `: open cell
/// - `#` or `█`: wall
/// - `S`: start
/// - `E`: end
impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.is_empty() || lines[0].is_empty() {
            return Err(GridParseError::EmptyInput);
        }

        let cols = lines[0].chars().count();
        let rows = lines.len();
        let mut walls = Vec::with_capacity(rows * cols);
        let mut start = None;
        let mut end = None;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridParseError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let is_wall = match ch {
                    ' ' | '.' => false,
                    '#' | '█' => true,
                    'S' => {
                        if start.is_some() {
                            return Err(GridParseError::DuplicateStart { row, col });
                        }
                        start = Some(GridPosition::new_from_usize(row, col));
                        false
                    }
                    'E' => {
                        if end.is_some() {
                            return Err(GridParseError::DuplicateEnd { row, col });
                        }
                        end = Some(GridPosition::new_from_usize(row, col));
                        false
                    }
                    ch => return Err(GridParseError::InvalidCharacter { ch, row, col }),
                };
                walls.push(is_wall);
            }
        }

        let start = start.ok_or(GridParseError::MissingStart)?;
        let end = end.ok_or(GridParseError::MissingEnd)?;
        Ok(Grid::new(rows, cols, &walls, start, end)?)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.cells.chunks(self.cols).take(MAX_ELEMENTS_DISPLAYED) {
            for cell in row.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Grid({}x{}, start: {}, end: {})",
            self.rows, self.cols, self.start, self.end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    fn pos(row: u32, col: u32) -> GridPosition {
        GridPosition::new(row, col)
    }

    #[test]
    fn parses_layout() {
        let grid = Grid::try_from(indoc! {"
            S.#
            .##
            ..E
        "})
        .unwrap();

        assert_eq!(grid.dimensions(), (3, 3));
        assert_eq!(grid.start(), pos(0, 0));
        assert_eq!(grid.end(), pos(2, 2));
        assert_eq!(grid.wall_count(), 3);
        assert!(grid.cell(&pos(0, 0)).unwrap().is_start);
        assert!(grid.cell(&pos(2, 2)).unwrap().is_end);
        assert!(grid.is_wall(&pos(1, 1)));
        assert!(grid.is_wall(&pos(3, 0)), "Out of bounds counts as a wall");
        assert!(grid.is_clean());
    }

    #[test]
    fn display_matches_parsed_text() {
        let text = indoc! {"
            S..#
            .#..
            ...E
        "};
        let grid = Grid::try_from(text).unwrap();
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Grid::try_from(""), Err(GridParseError::EmptyInput));
        assert_eq!(
            Grid::try_from("S.x\n..E"),
            Err(GridParseError::InvalidCharacter {
                ch: 'x',
                row: 0,
                col: 2
            })
        );
        assert_eq!(
            Grid::try_from("S..\n.E"),
            Err(GridParseError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(Grid::try_from("...\n..E"), Err(GridParseError::MissingStart));
        assert_eq!(Grid::try_from("S..\n..."), Err(GridParseError::MissingEnd));
        assert_eq!(
            Grid::try_from("S.S\n..E"),
            Err(GridParseError::DuplicateStart { row: 0, col: 2 })
        );
        assert_eq!(
            Grid::try_from("S.E\n..E"),
            Err(GridParseError::DuplicateEnd { row: 1, col: 2 })
        );
    }

    #[test]
    fn new_validates_endpoints() {
        let walls = vec![true; 4];
        assert_eq!(
            Grid::new(2, 2, &walls, pos(0, 0), pos(0, 0)),
            Err(GridError::StartIsEnd(pos(0, 0)))
        );
        assert_eq!(
            Grid::new(2, 2, &walls, pos(0, 0), pos(2, 0)),
            Err(GridError::OutOfBounds(pos(2, 0)))
        );
        assert_eq!(
            Grid::new(2, 2, &walls[..3], pos(0, 0), pos(1, 1)),
            Err(GridError::WrongCellCount {
                expected: 4,
                found: 3
            })
        );

        // Walls under the endpoints are cleared.
        let grid = Grid::new(2, 2, &walls, pos(0, 0), pos(1, 1)).unwrap();
        assert!(!grid.is_wall(&pos(0, 0)));
        assert!(!grid.is_wall(&pos(1, 1)));
        assert_eq!(grid.wall_count(), 2);
    }

    #[test]
    fn neighbours_are_up_down_left_right() {
        let grid = Grid::try_from(indoc! {"
            S..
            ...
            ..E
        "})
        .unwrap();

        let n: Vec<_> = grid.neighbours(&pos(1, 1)).into_iter().collect();
        assert_eq!(
            n,
            vec![
                (pos(0, 1), GridAction::Up),
                (pos(2, 1), GridAction::Down),
                (pos(1, 0), GridAction::Left),
                (pos(1, 2), GridAction::Right),
            ]
        );

        let corner: Vec<_> = grid.neighbours(&pos(0, 0)).into_iter().map(|(s, _)| s).collect();
        assert_eq!(corner, vec![pos(1, 0), pos(0, 1)]);
    }

    #[test]
    fn walls_are_not_neighbours() {
        let grid = Grid::try_from(indoc! {"
            S#.
            #..
            ..E
        "})
        .unwrap();

        assert!(grid.neighbours(&pos(0, 0)).is_empty());
        assert_eq!(grid.apply(&pos(0, 0), &GridAction::Right), None);
        assert_eq!(grid.apply(&pos(0, 0), &GridAction::Up), None);
        assert_eq!(grid.apply(&pos(1, 1), &GridAction::Up), None);
        assert_eq!(grid.apply(&pos(1, 1), &GridAction::Right), Some(pos(1, 2)));
    }

    #[test]
    fn clearing_marks_is_idempotent() {
        let mut grid = Grid::try_from(indoc! {"
            S..
            .#.
            ..E
        "})
        .unwrap();
        let pristine = grid.clone();

        grid.mark_visited(&pos(0, 0), None);
        grid.mark_visited(&pos(0, 1), Some(pos(0, 0)));
        assert_eq!(grid.visited_count(), 2);
        assert_eq!(grid.parent(&pos(0, 1)), Some(pos(0, 0)));

        grid.clear_marks();
        let once = grid.clone();
        grid.clear_marks();

        assert_eq!(grid, once);
        assert_eq!(grid, pristine);
        assert!(grid.is_clean());
    }

    #[test]
    fn valid_path_rejects_repeats_and_jumps() {
        let grid = Grid::try_from(indoc! {"
            S..
            ...
            ..E
        "})
        .unwrap();

        let mut path = GridPath::new_from_start(pos(0, 0));
        path.append((pos(0, 1), GridAction::Right));
        path.append((pos(1, 1), GridAction::Down));
        assert!(grid.valid_path(&path));

        let mut back = path.clone();
        back.append((pos(0, 1), GridAction::Up));
        assert!(!grid.valid_path(&back), "Revisits (0,1)");

        let mut jump = path.clone();
        jump.append((pos(2, 2), GridAction::Down));
        assert!(!grid.valid_path(&jump), "Action leads to (2,1)");

        assert!(grid.valid_path(&GridPath::empty()));
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(pos(0, 0).manhattan_distance(&pos(2, 2)), 4);
        assert_eq!(pos(4, 1).manhattan_distance(&pos(1, 3)), 5);
        assert!(pos(1, 1).is_adjacent(&pos(1, 2)));
        assert!(!pos(1, 1).is_adjacent(&pos(2, 2)));
    }
}
