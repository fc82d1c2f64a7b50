//! Level descriptions and cross-session progress.
//!
//! A `Level` lists the initial occupant of each cell. It is plain data: the
//! controller turns it into a board, and the binaries read it from JSON files.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{TileCatalog, TileKind, MAX_BOARD_SIDE};
use crate::error::LevelError;

/// Initial assignment for one cell. `kind: None` means the cell starts empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCell {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub kind: Option<TileKind>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub cells: Vec<LevelCell>,
}

impl Level {
    /// A level with the given size and no cell entries.
    pub fn new(width: usize, height: usize) -> Self {
        Level {
            width,
            height,
            cells: Vec::new(),
        }
    }

    /// A level with one entry per cell, taken from `assign(x, y)`.
    ///
    /// Each side is clamped to [`MAX_BOARD_SIDE`].
    pub fn from_fn<F>(width: usize, height: usize, mut assign: F) -> Self
    where
        F: FnMut(i32, i32) -> Option<TileKind>,
    {
        let width = width.min(MAX_BOARD_SIDE);
        let height = height.min(MAX_BOARD_SIDE);
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(LevelCell {
                    x,
                    y,
                    kind: assign(x, y),
                });
            }
        }
        Level {
            width,
            height,
            cells,
        }
    }

    /// Looks up the entry for `(x, y)`.
    ///
    /// The outer `None` means the level has no entry for the cell at all; the first
    /// matching entry wins when there are duplicates.
    pub fn lookup(&self, x: i32, y: i32) -> Option<Option<TileKind>> {
        self.cells
            .iter()
            .find(|cell| cell.x == x && cell.y == y)
            .map(|cell| cell.kind)
    }

    /// Every entry keyed by its coordinates, keeping the first entry for duplicates.
    pub fn assignments(&self) -> HashMap<(i32, i32), Option<TileKind>> {
        let mut map = HashMap::with_capacity(self.cells.len());
        for cell in &self.cells {
            map.entry((cell.x, cell.y)).or_insert(cell.kind);
        }
        map
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads and parses a level file. The result is not validated.
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path).map_err(|e| LevelError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Checks the level against a catalog.
    ///
    /// Missing cells are allowed (they load as empty), but zero or oversized
    /// dimensions, entries outside the board and unknown kinds are rejected.
    pub fn validate(&self, catalog: &TileCatalog) -> Result<(), LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(LevelError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }
        for cell in &self.cells {
            let in_bounds = cell.x >= 0
                && cell.y >= 0
                && (cell.x as usize) < self.width
                && (cell.y as usize) < self.height;
            if !in_bounds {
                return Err(LevelError::CellOutOfBounds {
                    x: cell.x,
                    y: cell.y,
                    width: self.width,
                    height: self.height,
                });
            }
            if let Some(kind) = cell.kind {
                if !catalog.contains(kind) {
                    return Err(LevelError::UnknownKind {
                        x: cell.x,
                        y: cell.y,
                        kind: kind.index(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Lists the `.json` level files in `dir`, sorted by file name.
pub fn level_files(dir: &Path) -> Result<Vec<PathBuf>, LevelError> {
    let read_err = |e| LevelError::FileRead {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "found level files");
    Ok(files)
}

/// Which level the player has reached, persisted between sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current_level_index: usize,
}

impl Progress {
    /// Moves to the next level, wrapping back to the first after the last one.
    pub fn advance(&mut self, level_count: usize) {
        if self.current_level_index + 1 < level_count {
            self.current_level_index += 1;
        } else {
            self.current_level_index = 0;
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Reads saved progress, starting from the first level when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, LevelError> {
        if !path.exists() {
            debug!(path = %path.display(), "no saved progress, starting at the first level");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| LevelError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_json(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), LevelError> {
        std::fs::write(path, self.to_json()?).map_err(|e| LevelError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
