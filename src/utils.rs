use crate::engine::{Board, TileCatalog, TileKind, EMPTY_SYMBOL};
use crate::error::ParseError;
use crate::level::Level;

// Parses rows (top row first) into a grid indexed as grid[row][col].
fn parse_rows(
    rows: &[&str],
    catalog: &TileCatalog,
) -> Result<Vec<Vec<Option<TileKind>>>, ParseError> {
    let width = match rows.first() {
        Some(first) if !first.is_empty() => first.chars().count(),
        _ => return Err(ParseError::NoRows),
    };

    let mut grid = Vec::with_capacity(rows.len());
    for (r, row_str) in rows.iter().enumerate() {
        let found = row_str.chars().count();
        if found != width {
            return Err(ParseError::RaggedRow {
                row: r,
                expected: width,
                found,
            });
        }

        let mut row = Vec::with_capacity(width);
        for (c, symbol) in row_str.chars().enumerate() {
            if symbol == EMPTY_SYMBOL {
                row.push(None);
                continue;
            }
            match catalog.by_symbol(symbol) {
                Some(kind) => row.push(Some(kind)),
                None => return Err(ParseError::UnknownSymbol { symbol, row: r, col: c }),
            }
        }
        grid.push(row);
    }
    Ok(grid)
}

/// Parses an array of string slices into a `Board`.
///
/// Each string is one row of the board, **top row first**, so the last string is
/// row `y = 0`. Every row must have the same number of characters, which becomes the
/// board width. Characters are catalog symbols, with `'.'` for an empty cell.
///
/// # Returns
/// * `Ok(Board)` with occupants placed at their `(x, y)` coordinates.
/// * `Err(ParseError)` if no rows are given, rows differ in length, or a character
///   is neither `'.'` nor a catalog symbol.
///
/// # Examples
/// ```
/// use match3_engine::engine::{TileCatalog, TileKind};
/// use match3_engine::utils::board_from_rows;
///
/// let catalog = TileCatalog::standard();
/// let board = board_from_rows(&["G.", "RB"], &catalog).unwrap();
/// assert_eq!(board.kind_at(0, 0), catalog.by_symbol('R'));
/// assert_eq!(board.kind_at(0, 1), catalog.by_symbol('G'));
/// assert_eq!(board.kind_at(1, 1), None);
///
/// assert!(board_from_rows(&["RXB"], &catalog).is_err());
/// ```
pub fn board_from_rows(rows: &[&str], catalog: &TileCatalog) -> Result<Board, ParseError> {
    let grid = parse_rows(rows, catalog)?;
    let height = grid.len();
    let width = grid[0].len();
    Ok(Board::from_fn(width, height, |x, y| {
        grid[height - 1 - y as usize][x as usize]
    }))
}

/// Parses rows (top row first) into a `Level` with an entry for every cell.
pub fn level_from_rows(rows: &[&str], catalog: &TileCatalog) -> Result<Level, ParseError> {
    let grid = parse_rows(rows, catalog)?;
    let height = grid.len();
    let width = grid[0].len();
    Ok(Level::from_fn(width, height, |x, y| {
        grid[height - 1 - y as usize][x as usize]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_rows_valid() {
        let catalog = TileCatalog::standard();
        let board = board_from_rows(&["RGYBP", ".....", "PBYGR"], &catalog).unwrap();
        assert_eq!(board.width(), 5);
        assert_eq!(board.height(), 3);
        assert_eq!(board.kind_at(0, 2), catalog.by_symbol('R'));
        assert_eq!(board.kind_at(4, 2), catalog.by_symbol('P'));
        assert_eq!(board.kind_at(0, 1), None);
        assert_eq!(board.kind_at(0, 0), catalog.by_symbol('P'));
        assert_eq!(board.to_rows(&catalog), vec!["RGYBP", ".....", "PBYGR"]);
    }

    #[test]
    fn test_board_from_rows_invalid_char() {
        let result = board_from_rows(&["RGYBX"], &TileCatalog::standard());
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnknownSymbol {
                symbol: 'X',
                row: 0,
                col: 4
            }
        );
    }

    #[test]
    fn test_board_from_rows_with_spaces() {
        let result = board_from_rows(&["R G"], &TileCatalog::standard());
        assert!(result.unwrap_err().to_string().contains("unrecognized character ' '"));
    }

    #[test]
    fn test_board_from_rows_ragged() {
        let result = board_from_rows(&["RGB", "RG"], &TileCatalog::standard());
        assert_eq!(
            result.unwrap_err(),
            ParseError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_board_from_rows_empty_input() {
        let rows: [&str; 0] = [];
        assert_eq!(
            board_from_rows(&rows, &TileCatalog::standard()).unwrap_err(),
            ParseError::NoRows
        );
        assert_eq!(
            board_from_rows(&[""], &TileCatalog::standard()).unwrap_err(),
            ParseError::NoRows
        );
    }

    #[test]
    fn test_level_from_rows_covers_every_cell() {
        let catalog = TileCatalog::standard();
        let level = level_from_rows(&["R.", "GB"], &catalog).unwrap();
        assert_eq!(level.width, 2);
        assert_eq!(level.height, 2);
        assert_eq!(level.cells.len(), 4);
        assert_eq!(level.lookup(0, 1), Some(catalog.by_symbol('R')));
        assert_eq!(level.lookup(1, 1), Some(None));
        assert_eq!(level.lookup(1, 0), Some(catalog.by_symbol('B')));
    }
}
