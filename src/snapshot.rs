//! Persisted board snapshots.
//!
//! A snapshot records every cell in row-major order together with its occupant's
//! kind and coordinates. The engine only produces and consumes the payload; where
//! it is stored is up to the caller.
use serde::{Deserialize, Serialize};

use crate::engine::{Board, TileCatalog, TileKind, MAX_BOARD_SIDE};
use crate::error::SnapshotError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPosition {
    pub kind: Option<TileKind>,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub positions: Vec<SnapshotPosition>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        BoardSnapshot {
            width: board.width(),
            height: board.height(),
            positions: board
                .cells()
                .map(|cell| SnapshotPosition {
                    kind: cell.kind(),
                    x: cell.x(),
                    y: cell.y(),
                })
                .collect(),
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.positions.iter().filter(|p| p.kind.is_some()).count()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks that the snapshot describes a well-formed board for `catalog`.
    pub fn validate(&self, catalog: &TileCatalog) -> Result<(), SnapshotError> {
        if self.width == 0 || self.height == 0 {
            return Err(SnapshotError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        let cell_count = self
            .width
            .checked_mul(self.height)
            .filter(|_| self.width <= MAX_BOARD_SIDE && self.height <= MAX_BOARD_SIDE)
            .ok_or(SnapshotError::TooLarge {
                width: self.width,
                height: self.height,
            })?;
        if self.positions.len() != cell_count {
            return Err(SnapshotError::DimensionMismatch {
                width: self.width,
                height: self.height,
                positions: self.positions.len(),
            });
        }

        for (index, position) in self.positions.iter().enumerate() {
            let expected = ((index % self.width) as i32, (index / self.width) as i32);
            if (position.x, position.y) != expected {
                return Err(SnapshotError::PositionMismatch {
                    index,
                    x: position.x,
                    y: position.y,
                });
            }
            if let Some(kind) = position.kind {
                if !catalog.contains(kind) {
                    return Err(SnapshotError::UnknownKind {
                        index,
                        kind: kind.index(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the board exactly as recorded.
    pub fn to_board(&self, catalog: &TileCatalog) -> Result<Board, SnapshotError> {
        self.validate(catalog)?;
        let width = self.width;
        Ok(Board::from_fn(self.width, self.height, |x, y| {
            self.positions[y as usize * width + x as usize].kind
        }))
    }
}
