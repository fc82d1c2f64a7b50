//! Turn sequencing for a match-3 level.
//!
//! `Match3` owns the board for the lifetime of a level. It accepts swap commands
//! only while waiting for input, applies them, and then runs the cascade
//! (find runs, clear them, let tiles fall, repeat) to completion before returning.
//! Everything that changes on the board is reported as an `Event` queued for the
//! caller, who drains the queue between steps.
use tracing::{debug, info, instrument, warn};

use crate::config::EngineConfig;
use crate::engine::{Board, Fall, TileCatalog, TileKind, MAX_BOARD_SIDE};
use crate::error::SnapshotError;
use crate::level::Level;
use crate::matcher::{cells_to_clear, find_runs};
use crate::snapshot::BoardSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// No level has been loaded; swaps are rejected.
    Unloaded,
    WaitingForInput,
    /// Applying a swap and running the cascade.
    Resolving,
    /// The cascade has just finished.
    Idle,
}

/// Notifications produced by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A level finished loading; the board is available through `Match3::board`.
    LevelReady { width: usize, height: usize },
    /// A cell lost its occupant. `immediate` is set for cells emptied during level
    /// setup or teardown and cleared for cells matched during play.
    CellDestroyed {
        x: i32,
        y: i32,
        kind: Option<TileKind>,
        immediate: bool,
    },
    Swapped { start: (i32, i32), end: (i32, i32) },
    TilesFell { falls: Vec<Fall> },
    ActiveCountChanged { count: usize },
    /// The cascade triggered by a swap or a load has settled.
    CascadeFinished { cleared: usize },
    /// Every tile of the level has been cleared.
    LevelComplete,
}

/// Manages the state of a level being played.
///
/// # Examples
/// ```
/// use match3_engine::config::EngineConfig;
/// use match3_engine::controller::{Event, Match3, State};
/// use match3_engine::engine::TileCatalog;
/// use match3_engine::utils::level_from_rows;
///
/// let catalog = TileCatalog::standard();
/// let level = level_from_rows(&["GGR", "RRG"], &catalog).unwrap();
/// let mut game = Match3::new(catalog, EngineConfig::default());
/// game.load_fresh(&level);
/// assert_eq!(game.state(), State::WaitingForInput);
///
/// // Swapping the right column completes both rows.
/// assert!(game.try_swap(2, 0, 2, 1));
/// assert_eq!(game.active_count(), 0);
/// assert!(game.drain_events().contains(&Event::LevelComplete));
/// ```
#[derive(Clone, Debug)]
pub struct Match3 {
    catalog: TileCatalog,
    config: EngineConfig,
    board: Board,
    state: State,
    active_count: usize,
    events: Vec<Event>,
}

impl Match3 {
    pub fn new(catalog: TileCatalog, config: EngineConfig) -> Self {
        Match3 {
            catalog,
            config,
            board: Board::new_empty(0, 0),
            state: State::Unloaded,
            active_count: 0,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of occupied cells.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Whether a swap would currently be considered.
    pub fn is_ready(&self) -> bool {
        self.state == State::WaitingForInput
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(&self.board)
    }

    /// Builds a fresh board from a level description.
    ///
    /// Cells without an entry in the level, or whose kind is not in the catalog, are
    /// logged and start empty. Every cell that starts empty is reported with an
    /// immediate `CellDestroyed` event. Tiles are placed exactly where the level puts
    /// them; gravity only runs once something has been cleared. Dimensions beyond
    /// [`MAX_BOARD_SIDE`] are clamped.
    #[instrument(level = "debug", skip(self, level), fields(width = level.width, height = level.height))]
    pub fn load_fresh(&mut self, level: &Level) {
        let mut board = Board::new_empty(level.width, level.height)
            .with_geometry(self.config.cell_size, self.config.origin());
        if (board.width(), board.height()) != (level.width, level.height) {
            warn!(
                width = board.width(),
                height = board.height(),
                "level exceeds the maximum board size, clamping"
            );
        }

        let assignments = level.assignments();
        let mut empty_cells = Vec::new();
        for y in 0..board.height() as i32 {
            for x in 0..board.width() as i32 {
                match assignments.get(&(x, y)).copied() {
                    None => {
                        warn!(x, y, "no level data for cell, leaving it empty");
                        empty_cells.push((x, y));
                    }
                    Some(None) => empty_cells.push((x, y)),
                    Some(Some(kind)) if !self.catalog.contains(kind) => {
                        warn!(x, y, kind = kind.index(), "unknown tile kind in level data, leaving cell empty");
                        empty_cells.push((x, y));
                    }
                    Some(Some(kind)) => board.set_occupant(x, y, Some(kind)),
                }
            }
        }

        self.events.clear();
        for (x, y) in empty_cells {
            self.events.push(Event::CellDestroyed {
                x,
                y,
                kind: None,
                immediate: true,
            });
        }
        self.install(board);
    }

    /// Builds a fresh board from a per-cell assignment function.
    pub fn load_with<F>(&mut self, width: usize, height: usize, assign: F)
    where
        F: FnMut(i32, i32) -> Option<TileKind>,
    {
        let level = Level::from_fn(width, height, assign);
        self.load_fresh(&level);
    }

    /// Restores a previously saved board verbatim.
    ///
    /// On error the controller is left untouched so the caller can fall back to
    /// [`Match3::load_fresh`].
    #[instrument(level = "debug", skip(self, snapshot))]
    pub fn load_from_snapshot(&mut self, snapshot: &BoardSnapshot) -> Result<(), SnapshotError> {
        let board = snapshot
            .to_board(&self.catalog)
            .map_err(|e| {
                warn!(error = %e, "rejecting board snapshot");
                e
            })?
            .with_geometry(self.config.cell_size, self.config.origin());

        self.events.clear();
        self.install(board);
        Ok(())
    }

    fn install(&mut self, board: Board) {
        self.board = board;
        self.active_count = self.board.occupied_count();
        info!(
            width = self.board.width(),
            height = self.board.height(),
            active = self.active_count,
            "level ready"
        );

        self.events.push(Event::LevelReady {
            width: self.board.width(),
            height: self.board.height(),
        });
        self.events.push(Event::ActiveCountChanged {
            count: self.active_count,
        });

        if self.config.resolve_on_load {
            self.resolve();
        } else {
            self.state = State::WaitingForInput;
        }
    }

    /// Attempts to swap two cells and, if the swap is accepted, resolves the board.
    ///
    /// The swap is silently ignored (returning `false`) when the controller is not
    /// waiting for input or when `Board::can_swap` rejects it. An accepted swap is
    /// kept even if it produces no match. The board is settled before matching, so a
    /// tile swapped sideways over a gap drops first.
    #[instrument(level = "debug", skip(self))]
    pub fn try_swap(&mut self, start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> bool {
        if self.state != State::WaitingForInput {
            debug!(state = ?self.state, "swap ignored, not waiting for input");
            return false;
        }
        if !self.board.can_swap(start_x, start_y, end_x, end_y) {
            debug!("swap rejected");
            return false;
        }

        self.state = State::Resolving;
        self.board.swap(start_x, start_y, end_x, end_y);
        self.events.push(Event::Swapped {
            start: (start_x, start_y),
            end: (end_x, end_y),
        });
        self.settle();
        self.resolve();
        true
    }

    /// Empties every cell immediately and returns to the unloaded state.
    pub fn clear_level(&mut self) {
        let positions: Vec<(i32, i32)> = self.board.cells().map(|c| (c.x(), c.y())).collect();
        for (x, y) in positions {
            if let Some(tile) = self.board.clear_cell(x, y) {
                self.events.push(Event::CellDestroyed {
                    x,
                    y,
                    kind: Some(tile.kind()),
                    immediate: true,
                });
            }
        }
        self.active_count = 0;
        self.events.push(Event::ActiveCountChanged { count: 0 });
        self.state = State::Unloaded;
    }

    // Clears runs until none remain, settling after each pass.
    fn resolve(&mut self) {
        self.state = State::Resolving;

        let mut cleared = 0;
        let mut pass = 0;
        loop {
            let runs = find_runs(&self.board);
            if runs.is_empty() {
                break;
            }
            pass += 1;

            let mut targets = cells_to_clear(&runs);
            for run in runs.iter().filter(|r| r.is_special()) {
                let neighbours = run.bonus_neighbours(&self.board);
                if self.config.clear_bonus_neighbours {
                    targets.extend(neighbours);
                } else {
                    debug!(len = run.len(), neighbours = neighbours.len(), "special run, bonus not applied");
                }
            }

            for (x, y) in targets {
                if let Some(tile) = self.board.clear_cell(x, y) {
                    cleared += 1;
                    self.active_count = self.active_count.saturating_sub(1);
                    self.events.push(Event::CellDestroyed {
                        x,
                        y,
                        kind: Some(tile.kind()),
                        immediate: false,
                    });
                }
            }
            debug!(pass, runs = runs.len(), active = self.active_count, "cleared runs");
            self.events.push(Event::ActiveCountChanged {
                count: self.active_count,
            });

            self.settle();
        }

        self.state = State::Idle;
        self.events.push(Event::CascadeFinished { cleared });
        if cleared > 0 && self.active_count == 0 {
            info!("level complete");
            self.events.push(Event::LevelComplete);
        }
        self.state = State::WaitingForInput;
    }

    fn settle(&mut self) {
        let falls = self.board.settle();
        if !falls.is_empty() {
            self.events.push(Event::TilesFell { falls });
        }
    }
}
