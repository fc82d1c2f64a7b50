use tracing::debug;

use crate::engine::Board;
use crate::matcher::{cells_to_clear, find_runs, Run};

/// A swap that would produce at least one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    /// Swap start, in the direction accepted by `Board::can_swap`.
    pub start: (i32, i32),
    pub end: (i32, i32),
    /// The runs present right after the swap, before anything is cleared.
    pub runs: Vec<Run>,
}

impl Move {
    /// Number of distinct cells the first clearing pass would remove.
    pub fn cleared_count(&self) -> usize {
        cells_to_clear(&self.runs).len()
    }
}

/// Enumerates every productive swap between horizontally or vertically adjacent cells.
///
/// Each cell is paired with its right and upper neighbour. A pair is legal when
/// `can_swap` accepts it in either direction; it is probed by swapping, collecting
/// the runs and swapping back. Moves come out in row-major order of their lower-left
/// cell, the rightward pairing before the upward one.
///
/// Like `Match3::try_swap`, the probe lets tiles fall before looking for runs, so a
/// tile swapped sideways over a gap is judged where it comes to rest.
pub fn find_moves(board: &Board) -> Vec<Move> {
    let mut scratch = board.clone();
    let mut moves = Vec::new();

    for y in 0..board.height() as i32 {
        for x in 0..board.width() as i32 {
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                let (start, end) = if scratch.can_swap(x, y, nx, ny) {
                    ((x, y), (nx, ny))
                } else if scratch.can_swap(nx, ny, x, y) {
                    ((nx, ny), (x, y))
                } else {
                    continue;
                };

                scratch.swap(start.0, start.1, end.0, end.1);
                let runs = runs_after_settling(&scratch);
                scratch.swap(start.0, start.1, end.0, end.1);

                if !runs.is_empty() {
                    moves.push(Move { start, end, runs });
                }
            }
        }
    }

    debug!(count = moves.len(), "enumerated productive moves");
    moves
}

fn runs_after_settling(board: &Board) -> Vec<Run> {
    if board.is_settled() {
        return find_runs(board);
    }
    let mut settled = board.clone();
    settled.settle();
    find_runs(&settled)
}

/// The move clearing the most cells; ties go to the earliest move in scan order.
pub fn best_move(board: &Board) -> Option<Move> {
    let mut best: Option<Move> = None;
    for candidate in find_moves(board) {
        let better = match &best {
            Some(current) => candidate.cleared_count() > current.cleared_count(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::controller::Match3;
    use crate::engine::TileCatalog;
    use crate::utils::board_from_rows;
    use proptest::prelude::*;

    fn board(rows: &[&str]) -> Board {
        board_from_rows(rows, &TileCatalog::standard()).unwrap()
    }

    #[test]
    fn test_find_moves_lists_productive_swaps() {
        let board = board(&["BGB", "GBR", "RRG"]);
        let moves = find_moves(&board);
        let pairs: Vec<_> = moves.iter().map(|m| (m.start, m.end)).collect();
        assert_eq!(pairs, vec![((2, 0), (2, 1)), ((1, 1), (1, 2))]);
        assert!(moves.iter().all(|m| m.cleared_count() == 3));
    }

    #[test]
    fn test_best_move_tie_goes_to_scan_order() {
        let board = board(&["BGB", "GBR", "RRG"]);
        let best = best_move(&board).unwrap();
        assert_eq!(best.start, (2, 0));
        assert_eq!(best.end, (2, 1));
    }

    #[test]
    fn test_best_move_prefers_larger_clear() {
        let board = board(&["..R..", "RRGRR"]);
        let best = best_move(&board).unwrap();
        assert_eq!((best.start, best.end), ((2, 0), (2, 1)));
        assert_eq!(best.cleared_count(), 5);
        assert_eq!(best.runs.len(), 1);
        assert_eq!(find_moves(&board).len(), 3);
    }

    #[test]
    fn test_no_moves_on_small_board() {
        let board = board(&["RG", "GR"]);
        assert!(find_moves(&board).is_empty());
        assert!(best_move(&board).is_none());
        assert!(best_move(&Board::new_empty(4, 4)).is_none());
    }

    #[test]
    fn test_vertical_pair_with_void_falls_back() {
        // Only the top-down direction is legal, and the lifted R drops straight back.
        let board = board(&[".RR", "RBG", "GBB"]);
        assert!(!board.can_swap(0, 1, 0, 2));
        assert!(board.can_swap(0, 2, 0, 1));
        assert!(find_moves(&board)
            .iter()
            .all(|m| m.start != (0, 2) && m.end != (0, 2)));
    }

    #[test]
    fn test_sideways_swap_over_gap_is_judged_after_falling() {
        let board = board(&[".G.", "GG."]);
        let moves = find_moves(&board);
        let fill = moves
            .iter()
            .find(|m| m.start == (1, 1) && m.end == (2, 1))
            .expect("G dropped into the gap completes the bottom row");
        assert_eq!(fill.runs[0].cells(), &[(0, 0), (1, 0), (2, 0)]);

        // The controller clears exactly what the move promised.
        let level = crate::utils::level_from_rows(&[".G.", "GG."], &TileCatalog::standard()).unwrap();
        let mut game = Match3::new(TileCatalog::standard(), EngineConfig::default());
        game.load_fresh(&level);
        assert!(game.try_swap(1, 1, 2, 1));
        assert_eq!(game.active_count(), 3 - fill.cleared_count());
    }

    fn arb_board() -> impl Strategy<Value = Board> {
        (1usize..6, 1usize..6).prop_flat_map(|(w, h)| {
            proptest::collection::vec(proptest::option::of(0u16..4), w * h).prop_map(
                move |kinds| {
                    Board::from_fn(w, h, |x, y| {
                        kinds[y as usize * w + x as usize].map(crate::engine::TileKind::new)
                    })
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_moves_are_legal_and_productive(board in arb_board()) {
            for m in find_moves(&board) {
                prop_assert!(board.can_swap(m.start.0, m.start.1, m.end.0, m.end.1));
                let mut swapped = board.clone();
                swapped.swap(m.start.0, m.start.1, m.end.0, m.end.1);
                swapped.settle();
                prop_assert_eq!(find_runs(&swapped), m.runs.clone());
                prop_assert!(m.cleared_count() >= 3);
            }
        }
    }
}
