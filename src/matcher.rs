//! Run detection.
//!
//! A run is a contiguous line of at least three tiles of one kind along a row or
//! a column. Every occupied cell is examined as an origin: the row through it is
//! measured first and, only if that is shorter than three, the column. Each origin
//! therefore yields at most one run, and all members of a run re-derive the same
//! cell list, which `find_runs` collapses into a single entry.
use std::collections::{BTreeSet, HashSet};

use crate::engine::{Board, TileKind};

/// Minimum number of aligned tiles that form a run.
pub const MIN_RUN_LENGTH: usize = 3;

/// Runs at least this long are special and expose bonus neighbours.
pub const SPECIAL_RUN_LENGTH: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A detected run of same-kind tiles.
///
/// Cells are ordered left to right for horizontal runs and bottom to top for
/// vertical ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Run {
    kind: TileKind,
    axis: Axis,
    cells: Vec<(i32, i32)>,
}

impl Run {
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_special(&self) -> bool {
        self.cells.len() >= SPECIAL_RUN_LENGTH
    }

    /// The on-board cells among the eight neighbours of the run's first member.
    ///
    /// Only special runs have bonus neighbours; shorter runs return an empty list.
    /// The list may include cells of the run itself and empty cells.
    pub fn bonus_neighbours(&self, board: &Board) -> Vec<(i32, i32)> {
        let Some(&(x, y)) = self.cells.first() else {
            return Vec::new();
        };
        if !self.is_special() {
            return Vec::new();
        }

        let mut neighbours = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && board.is_valid(x + dx, y + dy) {
                    neighbours.push((x + dx, y + dy));
                }
            }
        }
        neighbours
    }
}

// Number of consecutive `kind` tiles after (x, y) in direction (dx, dy).
fn count_links(board: &Board, x: i32, y: i32, dx: i32, dy: i32, kind: TileKind) -> i32 {
    let mut links = 0;
    while board.kind_at(x + dx * (links + 1), y + dy * (links + 1)) == Some(kind) {
        links += 1;
    }
    links
}

/// Finds the run passing through `(x, y)`, if any.
///
/// The horizontal extent is measured first; when it reaches three tiles that run is
/// returned and the column is not examined. Returns `None` for empty or invalid cells.
pub fn find_run_at(board: &Board, x: i32, y: i32) -> Option<Run> {
    let kind = board.kind_at(x, y)?;

    let right = count_links(board, x, y, 1, 0, kind);
    let left = count_links(board, x, y, -1, 0, kind);
    let horizontal = 1 + left + right;

    if horizontal as usize >= MIN_RUN_LENGTH {
        let leftmost = x - left;
        return Some(Run {
            kind,
            axis: Axis::Horizontal,
            cells: (0..horizontal).map(|i| (leftmost + i, y)).collect(),
        });
    }

    let up = count_links(board, x, y, 0, 1, kind);
    let down = count_links(board, x, y, 0, -1, kind);
    let vertical = 1 + down + up;

    if vertical as usize >= MIN_RUN_LENGTH {
        let lowest = y - down;
        return Some(Run {
            kind,
            axis: Axis::Vertical,
            cells: (0..vertical).map(|i| (x, lowest + i)).collect(),
        });
    }

    None
}

/// Finds every distinct run on the board.
///
/// Cells are scanned in row-major order (bottom row first, left to right) and runs
/// are returned in the order they are first discovered. Two detections are the same
/// run when they list the same cells in the same order.
///
/// # Examples
/// ```
/// use match3_engine::engine::TileCatalog;
/// use match3_engine::matcher::find_runs;
/// use match3_engine::utils::board_from_rows;
///
/// let board = board_from_rows(&["RRRRR"], &TileCatalog::standard()).unwrap();
/// let runs = find_runs(&board);
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].len(), 5);
/// ```
pub fn find_runs(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut seen: HashSet<Vec<(i32, i32)>> = HashSet::new();

    for y in 0..board.height() as i32 {
        for x in 0..board.width() as i32 {
            if let Some(run) = find_run_at(board, x, y) {
                if seen.insert(run.cells.clone()) {
                    runs.push(run);
                }
            }
        }
    }

    runs
}

/// Union of the members of `runs`, in coordinate order.
pub fn cells_to_clear(runs: &[Run]) -> BTreeSet<(i32, i32)> {
    runs.iter()
        .flat_map(|run| run.cells.iter().copied())
        .collect()
}
