//! # Match-3 Engine Library
//!
//! This library provides the board logic for a grid-based match-3 puzzle: tiles
//! are swapped, runs of three or more identical tiles are cleared, the tiles above
//! fall into the gaps and any new runs cascade until the board is stable.
//!
//! It is used by two binaries:
//! - `play`: Allows interactive gameplay via the command line, with a save file.
//! - `move_finder`: Takes a text board and lists every swap that produces a match.
//!
//! ## Modules
//! - `engine`: The board representation (`Board`, `Cell`, `Tile`), the tile catalog,
//!   the swap rules and gravity.
//! - `matcher`: Run detection (`find_runs`) and bonus neighbours for long runs.
//! - `controller`: The `Match3` state machine that sequences swaps and cascades and
//!   reports what happened as `Event`s.
//! - `level`: Level descriptions and level progress.
//! - `snapshot`: Saving and restoring a board in progress.
//! - `solver`: Enumerates productive swaps and picks the best one.
//! - `config`: Engine configuration loaded from TOML.
//! - `error`: Error types for parsing, loading and configuration.
//! - `utils`: Helpers for building boards and levels from text rows.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod level;
pub mod matcher;
pub mod snapshot;
pub mod solver;
pub mod utils;
