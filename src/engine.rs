//! Core board model for the match-3 engine.
//!
//! This module defines the game's fundamental components:
//! - `TileKind` and `TileCatalog`: the immutable registry of collectible tile kinds.
//! - `Tile`: a cell occupant, carrying its kind, logical coordinates and a destroyed flag.
//! - `Cell`: one fixed slot of the grid with a stable row-major identifier.
//! - `Board`: the grid itself, with cell-level mutation, the swap rules and gravity.
//!
//! Coordinates are `(x, y)` with `x` growing to the right and `y = 0` being the
//! bottom row. Every coordinate-taking method accepts `i32` so that stale or
//! off-grid input can be passed straight through; invalid positions are rejected
//! quietly instead of panicking.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Character used for an empty cell in text boards.
pub const EMPTY_SYMBOL: char = '.';

/// Largest width or height a board may have.
pub const MAX_BOARD_SIDE: usize = 1024;

/// ANSI background colour used for empty cells.
const EMPTY_ANSI_COLOR: u8 = 40;

/// Identity of one kind of collectible tile.
///
/// A kind is an index into the `TileCatalog` it was created from. Two cells hold
/// "the same tile" exactly when their kinds compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileKind(u16);

impl TileKind {
    pub const fn new(index: u16) -> Self {
        TileKind(index)
    }

    pub const fn index(self) -> u16 {
        self.0
    }
}

/// Presentation data attached to a tile kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileInfo {
    pub name: String,
    /// Character used for this kind in text boards.
    pub symbol: char,
    /// ANSI background colour code used for terminal output.
    pub ansi_color: u8,
}

/// Immutable registry of the tile kinds a level may use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileCatalog {
    entries: Vec<TileInfo>,
}

impl TileCatalog {
    /// Builds a catalog from its entries. The position of an entry is its kind index.
    pub fn new(entries: Vec<TileInfo>) -> Self {
        TileCatalog { entries }
    }

    /// The five-colour catalog used by the bundled binaries and most tests.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::{TileCatalog, TileKind};
    /// let catalog = TileCatalog::standard();
    /// assert_eq!(catalog.len(), 5);
    /// assert_eq!(catalog.by_symbol('R'), Some(TileKind::new(0)));
    /// assert_eq!(catalog.symbol(TileKind::new(4)), 'P');
    /// ```
    pub fn standard() -> Self {
        let entry = |name: &str, symbol, ansi_color| TileInfo {
            name: name.to_string(),
            symbol,
            ansi_color,
        };
        TileCatalog::new(vec![
            entry("Red", 'R', 41),
            entry("Green", 'G', 42),
            entry("Blue", 'B', 44),
            entry("Yellow", 'Y', 43),
            entry("Purple", 'P', 45),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        usize::from(kind.index()) < self.entries.len()
    }

    pub fn info(&self, kind: TileKind) -> Option<&TileInfo> {
        self.entries.get(usize::from(kind.index()))
    }

    /// Iterates over every kind in catalog order.
    pub fn kinds(&self) -> impl Iterator<Item = TileKind> + '_ {
        (0..self.entries.len()).map(|i| TileKind(i as u16))
    }

    /// Looks up the first kind drawn with `symbol`.
    pub fn by_symbol(&self, symbol: char) -> Option<TileKind> {
        self.entries
            .iter()
            .position(|e| e.symbol == symbol)
            .map(|i| TileKind(i as u16))
    }

    /// Symbol for `kind`, or `'?'` for a kind this catalog does not know.
    pub fn symbol(&self, kind: TileKind) -> char {
        self.info(kind).map_or('?', |info| info.symbol)
    }

    fn ansi_color(&self, kind: Option<TileKind>) -> u8 {
        kind.and_then(|k| self.info(k))
            .map_or(EMPTY_ANSI_COLOR, |info| info.ansi_color)
    }
}

/// A tile occupying a cell.
///
/// The occupant remembers its own logical coordinates. Every board operation that
/// moves an occupant rewrites them, so once the operation returns they equal the
/// coordinates of the cell holding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    kind: TileKind,
    x: i32,
    y: i32,
    destroyed: bool,
}

impl Tile {
    pub fn new(kind: TileKind, x: i32, y: i32) -> Self {
        Tile {
            kind,
            x,
            y,
            destroyed: false,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn relocate(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

/// One slot of the grid. Cells are never created or removed after construction;
/// an empty cell simply has no occupant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    x: i32,
    y: i32,
    id: usize,
    tile: Option<Tile>,
}

impl Cell {
    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Row-major index of this cell, fixed at board construction.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    pub fn kind(&self) -> Option<TileKind> {
        self.tile.map(|t| t.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

/// A single gravity relocation inside one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fall {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

/// The game board: a fixed `width x height` grid of cells stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: (f32, f32),
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board where every cell is empty.
    ///
    /// The world geometry defaults to a cell size of `1.0` anchored at the origin;
    /// see [`Board::with_geometry`]. Each side is clamped to [`MAX_BOARD_SIDE`].
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::Board;
    /// let board = Board::new_empty(4, 3);
    /// assert_eq!(board.occupied_count(), 0);
    /// assert_eq!(board.cell_id(1, 2), Some(9));
    /// ```
    pub fn new_empty(width: usize, height: usize) -> Self {
        let width = width.min(MAX_BOARD_SIDE);
        let height = height.min(MAX_BOARD_SIDE);
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell {
                    x: x as i32,
                    y: y as i32,
                    id: y * width + x,
                    tile: None,
                });
            }
        }
        Board {
            width,
            height,
            cell_size: 1.0,
            origin: (0.0, 0.0),
            cells,
        }
    }

    /// Creates a board whose initial occupants come from `assign(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut assign: F) -> Self
    where
        F: FnMut(i32, i32) -> Option<TileKind>,
    {
        let mut board = Board::new_empty(width, height);
        for cell in &mut board.cells {
            cell.tile = assign(cell.x, cell.y).map(|kind| Tile::new(kind, cell.x, cell.y));
        }
        board
    }

    /// Creates a fully occupied board with kinds drawn from `catalog` using a seeded RNG.
    ///
    /// The same seed always yields the same board. Cells are filled bottom row first,
    /// left to right, and a kind is never chosen if it would complete a run of three
    /// with the two tiles already placed to its left or below it, so a generated board
    /// starts without matches whenever the catalog has at least three kinds.
    /// An empty catalog produces an empty board.
    pub fn random_with_seed(width: usize, height: usize, catalog: &TileCatalog, seed: u64) -> Self {
        let mut board = Board::new_empty(width, height);
        if catalog.is_empty() {
            return board;
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let all_kinds: Vec<TileKind> = catalog.kinds().collect();

        for y in 0..board.height as i32 {
            for x in 0..board.width as i32 {
                let candidates: Vec<TileKind> = all_kinds
                    .iter()
                    .copied()
                    .filter(|&kind| !board.completes_run(x, y, kind))
                    .collect();
                let pool = if candidates.is_empty() { &all_kinds } else { &candidates };
                let kind = pool[rng.gen_range(0..pool.len())];
                board.set_occupant(x, y, Some(kind));
            }
        }
        board
    }

    fn completes_run(&self, x: i32, y: i32, kind: TileKind) -> bool {
        let same = |dx: i32, dy: i32| self.kind_at(x + dx, y + dy) == Some(kind);
        (same(-1, 0) && same(-2, 0)) || (same(0, -1) && same(0, -2))
    }

    /// Replaces the world geometry used by [`Board::world_position`].
    pub fn with_geometry(mut self, cell_size: f32, origin: (f32, f32)) -> Self {
        self.cell_size = cell_size;
        self.origin = origin;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Returns `true` when `0 <= x < width` and `0 <= y < height`.
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_valid(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Returns the cell at `(x, y)`, or `None` for coordinates outside the board.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Returns the occupant of `(x, y)`, if the position is valid and occupied.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.get(x, y).and_then(Cell::tile)
    }

    /// Returns the kind at `(x, y)`; `None` for an empty cell or an invalid position.
    pub fn kind_at(&self, x: i32, y: i32) -> Option<TileKind> {
        self.get(x, y).and_then(Cell::kind)
    }

    /// Stable row-major identifier of the cell at `(x, y)`.
    pub fn cell_id(&self, x: i32, y: i32) -> Option<usize> {
        self.get(x, y).map(Cell::id)
    }

    /// Iterates over all cells in row-major order (bottom row first).
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Replaces the occupant of `(x, y)`.
    ///
    /// A new occupant is created at `(x, y)`; passing `None` empties the cell.
    /// Invalid coordinates are ignored.
    pub fn set_occupant(&mut self, x: i32, y: i32, kind: Option<TileKind>) {
        if let Some(i) = self.index(x, y) {
            self.cells[i].tile = kind.map(|k| Tile::new(k, x, y));
        }
    }

    /// Removes the occupant of `(x, y)` and returns it marked as destroyed.
    ///
    /// Returns `None` if the position is invalid or already empty.
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Option<Tile> {
        let i = self.index(x, y)?;
        let mut tile = self.cells[i].tile.take()?;
        tile.destroyed = true;
        Some(tile)
    }

    /// Number of cells currently holding a tile.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// World-space position of the cell at `(x, y)`: `origin + (x, y) * cell_size`.
    ///
    /// This is a pure transform and does not check that the cell exists.
    pub fn world_position(&self, x: i32, y: i32) -> (f32, f32) {
        (
            self.origin.0 + x as f32 * self.cell_size,
            self.origin.1 + y as f32 * self.cell_size,
        )
    }

    /// Grid coordinates containing the world-space point `(wx, wy)`.
    ///
    /// The result may lie outside the board; check it with [`Board::is_valid`].
    pub fn grid_position(&self, wx: f32, wy: f32) -> (i32, i32) {
        (
            ((wx - self.origin.0) / self.cell_size).floor() as i32,
            ((wy - self.origin.1) / self.cell_size).floor() as i32,
        )
    }

    /// Decides whether the occupants of two cells may be exchanged.
    ///
    /// The rules are checked in order:
    /// 1. Both positions must be on the board.
    /// 2. Two occupied cells holding the same kind cannot be swapped.
    /// 3. A tile cannot be pulled upward into an empty cell (`start_y < end_y` with
    ///    an empty destination); tiles only move down by falling.
    /// 4. A cell cannot be swapped with itself.
    ///
    /// The rule is purely structural: it does not check whether the swap would
    /// produce a match.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::{Board, TileKind};
    /// let red = TileKind::new(0);
    /// let mut board = Board::new_empty(2, 2);
    /// board.set_occupant(0, 0, Some(red));
    /// assert!(board.can_swap(0, 0, 1, 0)); // sideways into a void
    /// assert!(!board.can_swap(0, 0, 0, 1)); // upward into a void
    /// assert!(!board.can_swap(0, 0, 0, 0));
    /// ```
    pub fn can_swap(&self, start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> bool {
        if !self.is_valid(start_x, start_y) || !self.is_valid(end_x, end_y) {
            return false;
        }

        let start = self.kind_at(start_x, start_y);
        let end = self.kind_at(end_x, end_y);

        if let (Some(a), Some(b)) = (start, end) {
            if a == b {
                return false;
            }
        }
        if end.is_none() && start_y < end_y {
            return false;
        }

        start_x != end_x || start_y != end_y
    }

    /// Exchanges the occupants of two cells, rewriting their logical coordinates.
    ///
    /// Does nothing if either position is invalid or both name the same cell.
    /// The rules of [`Board::can_swap`] are not consulted, and applying the same swap
    /// twice restores the original board.
    pub fn swap(&mut self, start_x: i32, start_y: i32, end_x: i32, end_y: i32) {
        let (Some(a), Some(b)) = (self.index(start_x, start_y), self.index(end_x, end_y)) else {
            return;
        };
        if a == b {
            return;
        }

        let mut start_tile = self.cells[a].tile.take();
        let mut end_tile = self.cells[b].tile.take();

        if let Some(tile) = start_tile.as_mut() {
            tile.relocate(end_x, end_y);
        }
        if let Some(tile) = end_tile.as_mut() {
            tile.relocate(start_x, start_y);
        }

        self.cells[a].tile = end_tile;
        self.cells[b].tile = start_tile;
    }

    /// Applies gravity to every column.
    ///
    /// Columns are processed left to right and each column bottom to top. An
    /// occupied cell drops through every contiguous empty cell beneath it, stopping at
    /// the first occupied cell or the floor, so a single call fully compacts the board.
    /// The relative order of tiles within a column is preserved.
    ///
    /// # Returns
    /// One `Fall` per tile that moved, in processing order.
    pub fn settle(&mut self) -> Vec<Fall> {
        let mut falls = Vec::new();

        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                if self.kind_at(x, y).is_none() {
                    continue;
                }

                let mut target = y;
                while target > 0 && self.kind_at(x, target - 1).is_none() {
                    target -= 1;
                }

                if target != y {
                    self.move_tile(x, y, target);
                    falls.push(Fall {
                        from: (x, y),
                        to: (x, target),
                    });
                }
            }
        }

        falls
    }

    // Both rows must be valid; the destination must be empty.
    fn move_tile(&mut self, x: i32, from_y: i32, to_y: i32) {
        let from = from_y as usize * self.width + x as usize;
        let to = to_y as usize * self.width + x as usize;
        if let Some(mut tile) = self.cells[from].tile.take() {
            tile.relocate(x, to_y);
            self.cells[to].tile = Some(tile);
        }
    }

    /// Returns `true` when no column has an empty cell strictly below an occupied one.
    pub fn is_settled(&self) -> bool {
        (0..self.width as i32).all(|x| {
            let mut seen_empty = false;
            (0..self.height as i32).all(|y| {
                let empty = self.kind_at(x, y).is_none();
                if empty {
                    seen_empty = true;
                    true
                } else {
                    !seen_empty
                }
            })
        })
    }

    /// Renders the board as one string per row using catalog symbols, top row first.
    ///
    /// This is the inverse of [`crate::utils::board_from_rows`].
    pub fn to_rows(&self, catalog: &TileCatalog) -> Vec<String> {
        (0..self.height as i32)
            .rev()
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| self.kind_at(x, y).map_or(EMPTY_SYMBOL, |k| catalog.symbol(k)))
                    .collect()
            })
            .collect()
    }

    /// Generates a coloured terminal rendering of the board with an optional highlighted cell.
    ///
    /// The top row is printed first. Column numbers run along the top and row numbers
    /// down the left side, matching the `(x, y)` coordinates accepted by the board.
    pub fn to_string_with_highlight(
        &self,
        catalog: &TileCatalog,
        pos: Option<(i32, i32)>,
    ) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for x in 0..self.width {
            output.push_str(&format!("{:<2}", x));
        }
        output.push('\n');

        for y in (0..self.height as i32).rev() {
            output.push_str(&format!("{:<2}", y));

            for x in 0..self.width as i32 {
                let is_highlight = pos == Some((x, y));
                let color_code = catalog.ansi_color(self.kind_at(x, y));
                let content = if is_highlight { ".." } else { "  " };
                output.push_str(&format!("\x1b[1;{}m{}\x1b[m", color_code, content));
            }
            if y > 0 {
                output.push('\n');
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_rows;
    use proptest::prelude::*;

    const A: TileKind = TileKind::new(0);
    const B: TileKind = TileKind::new(1);

    fn board(rows: &[&str]) -> Board {
        board_from_rows(rows, &TileCatalog::standard()).unwrap()
    }

    fn rows(board: &Board) -> Vec<String> {
        board.to_rows(&TileCatalog::standard())
    }

    fn assert_coordinates_synced(board: &Board) {
        for cell in board.cells() {
            if let Some(tile) = cell.tile() {
                assert_eq!(tile.position(), (cell.x(), cell.y()));
            }
        }
    }

    #[test]
    fn test_new_empty_board() {
        let board = Board::new_empty(4, 3);
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert_eq!(board.cells().count(), 12);
        assert!(board.cells().all(Cell::is_empty));
    }

    #[test]
    fn test_new_empty_clamps_oversized_sides() {
        let board = Board::new_empty(usize::MAX, 3);
        assert_eq!(board.width(), MAX_BOARD_SIDE);
        assert_eq!(board.height(), 3);
        assert_eq!(board.cells().count(), MAX_BOARD_SIDE * 3);
        assert!(board.is_valid(MAX_BOARD_SIDE as i32 - 1, 2));
        assert!(!board.is_valid(MAX_BOARD_SIDE as i32, 0));
    }

    #[test]
    fn test_cell_ids_are_row_major() {
        let board = Board::new_empty(3, 2);
        assert_eq!(board.cell_id(0, 0), Some(0));
        assert_eq!(board.cell_id(2, 0), Some(2));
        assert_eq!(board.cell_id(0, 1), Some(3));
        assert_eq!(board.cell_id(2, 1), Some(5));
        assert_eq!(board.cell_id(3, 1), None);
    }

    #[test]
    fn test_get_out_of_range_returns_none() {
        let board = Board::new_empty(2, 2);
        assert!(board.get(-1, 0).is_none());
        assert!(board.get(0, 2).is_none());
        assert!(board.get(2, 0).is_none());
        assert!(board.get(1, 1).is_some());
    }

    #[test]
    fn test_set_occupant_keeps_coordinates() {
        let mut board = Board::new_empty(3, 3);
        board.set_occupant(2, 1, Some(A));
        let tile = board.tile(2, 1).unwrap();
        assert_eq!(tile.kind(), A);
        assert_eq!(tile.position(), (2, 1));

        board.set_occupant(2, 1, None);
        assert!(board.tile(2, 1).is_none());

        // Invalid coordinates are ignored.
        board.set_occupant(5, 5, Some(A));
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_clear_cell_marks_destroyed() {
        let mut board = board(&["RG"]);
        let removed = board.clear_cell(0, 0).unwrap();
        assert!(removed.is_destroyed());
        assert_eq!(removed.kind(), A);
        assert!(board.kind_at(0, 0).is_none());
        assert!(board.clear_cell(0, 0).is_none());
        assert!(board.clear_cell(9, 9).is_none());
    }

    #[test]
    fn test_world_position_and_back() {
        let board = Board::new_empty(4, 4).with_geometry(2.0, (10.0, -4.0));
        assert_eq!(board.world_position(0, 0), (10.0, -4.0));
        assert_eq!(board.world_position(3, 1), (16.0, -2.0));
        assert_eq!(board.grid_position(16.5, -1.0), (3, 1));
        assert_eq!(board.grid_position(9.0, -4.0), (-1, 0));
    }

    #[test]
    fn test_random_with_seed_determinism() {
        let catalog = TileCatalog::standard();
        let a = Board::random_with_seed(8, 8, &catalog, 514514);
        let b = Board::random_with_seed(8, 8, &catalog, 514514);
        assert_eq!(a, b);
        assert_eq!(a.occupied_count(), 64);
        assert_coordinates_synced(&a);
    }

    #[test]
    fn test_random_board_starts_without_runs() {
        let catalog = TileCatalog::standard();
        for seed in 0..20 {
            let board = Board::random_with_seed(7, 9, &catalog, seed);
            assert!(crate::matcher::find_runs(&board).is_empty(), "seed {}", seed);
        }
    }

    #[test]
    fn test_random_board_empty_catalog() {
        let board = Board::random_with_seed(3, 3, &TileCatalog::new(Vec::new()), 1);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_can_swap_same_cell_rejected() {
        let board = board(&["RG", "GR"]);
        for y in 0..2 {
            for x in 0..2 {
                assert!(!board.can_swap(x, y, x, y));
            }
        }
        let empty = Board::new_empty(2, 2);
        assert!(!empty.can_swap(1, 1, 1, 1));
    }

    #[test]
    fn test_can_swap_out_of_bounds_is_symmetric() {
        let board = board(&["RG"]);
        assert!(!board.can_swap(0, 0, -1, 0));
        assert!(!board.can_swap(-1, 0, 0, 0));
        assert!(!board.can_swap(1, 0, 2, 0));
        assert!(!board.can_swap(2, 0, 1, 0));
    }

    #[test]
    fn test_can_swap_identical_kinds_is_symmetric() {
        let board = board(&["RRG"]);
        assert!(!board.can_swap(0, 0, 1, 0));
        assert!(!board.can_swap(1, 0, 0, 0));
        assert!(board.can_swap(1, 0, 2, 0));
        assert!(board.can_swap(2, 0, 1, 0));
    }

    #[test]
    fn test_can_swap_void_above_is_asymmetric() {
        // (0,0) holds R, (0,1) is empty.
        let board = board(&[".", "R"]);
        assert!(!board.can_swap(0, 0, 0, 1), "tile must not be pulled up into a void");
        assert!(board.can_swap(0, 1, 0, 0), "the reverse direction is allowed");
    }

    #[test]
    fn test_can_swap_into_empty_cell_same_row() {
        // 2x2 board, (1,0) empty, (0,0) occupied.
        let board = board(&["GB", "R."]);
        assert!(board.can_swap(0, 0, 1, 0));
        assert!(board.can_swap(1, 0, 0, 0));
    }

    #[test]
    fn test_swap_exchanges_and_relocates() {
        let mut board = board(&["RG"]);
        board.swap(0, 0, 1, 0);
        assert_eq!(rows(&board), vec!["GR"]);
        assert_coordinates_synced(&board);
    }

    #[test]
    fn test_swap_with_empty_cell() {
        let mut board = board(&["R."]);
        board.swap(0, 0, 1, 0);
        assert_eq!(rows(&board), vec![".R"]);
        assert_eq!(board.tile(1, 0).unwrap().position(), (1, 0));
    }

    #[test]
    fn test_swap_invalid_or_same_is_noop() {
        let mut board = board(&["RG"]);
        let before = board.clone();
        board.swap(0, 0, 0, 0);
        board.swap(0, 0, 5, 0);
        board.swap(-1, 0, 1, 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_settle_single_column_scenario() {
        // Bottom to top: [R, empty, G, empty].
        let mut board = board(&[".", "G", ".", "R"]);
        let falls = board.settle();
        assert_eq!(rows(&board), vec![".", ".", "G", "R"]);
        assert_eq!(
            falls,
            vec![Fall {
                from: (0, 2),
                to: (0, 1)
            }]
        );
        assert_coordinates_synced(&board);
    }

    #[test]
    fn test_settle_drops_through_multiple_gaps_in_one_call() {
        let mut board = board(&["RGB", "...", "...", "Y.."]);
        board.settle();
        assert_eq!(rows(&board), vec!["...", "...", "R..", "YGB"]);
        assert!(board.is_settled());
    }

    #[test]
    fn test_settle_already_settled_column() {
        let mut board = board(&["..", "R.", "GB"]);
        let before = board.clone();
        assert!(board.settle().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_settle_empty_board() {
        let mut board = Board::new_empty(3, 3);
        assert!(board.settle().is_empty());
        assert!(board.is_settled());
    }

    #[test]
    fn test_is_settled_detects_floating_tile() {
        assert!(!board(&["R", "."]).is_settled());
        assert!(board(&[".", "R"]).is_settled());
    }

    #[test]
    fn test_to_string_with_highlight_formatting() {
        let board = board(&["R.", "GB"]);
        let output = board.to_string_with_highlight(&TileCatalog::standard(), Some((0, 1)));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  0 1 ");
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].contains("\x1b[1;41m..\x1b[m"));
        assert!(lines[1].contains("\x1b[1;40m  \x1b[m"));
        assert!(lines[2].starts_with("0 "));
        assert!(lines[2].contains("\x1b[1;42m  \x1b[m"));
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        (1usize..7, 1usize..7).prop_flat_map(|(w, h)| {
            proptest::collection::vec(proptest::option::of(0u16..3), w * h).prop_map(
                move |kinds| {
                    Board::from_fn(w, h, |x, y| {
                        kinds[y as usize * w + x as usize].map(TileKind::new)
                    })
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_settle_reaches_fixpoint(board in arb_board()) {
            let mut board = board;
            let before = board.occupied_count();
            board.settle();
            prop_assert!(board.is_settled());
            prop_assert_eq!(board.occupied_count(), before);
            prop_assert!(board.settle().is_empty());
            for cell in board.cells() {
                if let Some(tile) = cell.tile() {
                    prop_assert_eq!(tile.position(), (cell.x(), cell.y()));
                }
            }
        }

        #[test]
        fn prop_swap_twice_restores(board in arb_board(), sx in -1i32..7, sy in -1i32..7, ex in -1i32..7, ey in -1i32..7) {
            let mut swapped = board.clone();
            swapped.swap(sx, sy, ex, ey);
            swapped.swap(sx, sy, ex, ey);
            prop_assert_eq!(swapped, board);
        }

        #[test]
        fn prop_can_swap_never_accepts_same_cell(board in arb_board(), x in 0i32..7, y in 0i32..7) {
            prop_assert!(!board.can_swap(x, y, x, y));
        }
    }

    #[test]
    fn test_tile_kind_equality() {
        assert_eq!(A, TileKind::new(0));
        assert_ne!(A, B);
    }
}
