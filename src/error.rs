//! Structured error types for the engine.
//!
//! Coordinate problems are never errors: board operations silently reject
//! out-of-range positions. The types here cover data that comes from outside the
//! engine (snapshots, level files, text boards and configuration).

use std::path::PathBuf;

/// A persisted board snapshot could not be turned back into a board.
///
/// Callers are expected to fall back to building the level from scratch.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot describes an empty {width}x{height} board")]
    EmptyBoard { width: usize, height: usize },

    #[error("snapshot describes a {width}x{height} board, larger than the engine supports")]
    TooLarge { width: usize, height: usize },

    #[error("snapshot for a {width}x{height} board holds {positions} positions")]
    DimensionMismatch {
        width: usize,
        height: usize,
        positions: usize,
    },

    #[error("snapshot position {index} claims coordinates ({x}, {y})")]
    PositionMismatch { index: usize, x: i32, y: i32 },

    #[error("snapshot position {index} references unknown tile kind {kind}")]
    UnknownKind { index: usize, kind: u16 },
}

/// A level description is unusable.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("level is {width}x{height}, larger than the engine supports")]
    TooLarge { width: usize, height: usize },

    #[error("level cell ({x}, {y}) lies outside a {width}x{height} board")]
    CellOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("level cell ({x}, {y}) references unknown tile kind {kind}")]
    UnknownKind { x: i32, y: i32, kind: u16 },
}

/// A text board could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("board text has no rows")]
    NoRows,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized character '{symbol}' in row {row} col {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

/// Configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
