use super::state::{Board, MergeMask, Move};

/// Any cell reaching this value wins the game.
pub const WIN_TILE: u32 = 2048;

/// Result of sliding/merging a board in one direction. No randomness.
#[derive(Clone, Debug)]
pub struct Shift {
    /// Board after merge and compaction.
    pub board: Board,
    /// Cells of `board` that hold a tile produced by a merge.
    pub merged: MergeMask,
    /// Sum of the values created by merges, to be added to the score.
    pub score_delta: u32,
    /// Whether the move altered the board at all.
    pub changed: bool,
}

/// Slide/merge tiles in the given direction.
///
/// Left/Right operate on rows directly; Up/Down transpose, reuse the row
/// algorithm and transpose back, so one line algorithm serves all four
/// directions. The merge mask is transposed back symmetrically.
pub fn shift(board: &Board, direction: Move) -> Shift {
    match direction {
        Move::Left | Move::Right => shift_rows(board, direction),
        Move::Up | Move::Down => shift_cols(board, direction),
    }
}

/// Count the number of zero cells.
pub fn count_empty(board: &Board) -> usize {
    board.cells().iter().filter(|&&v| v == 0).count()
}

/// True iff the board is full and no two orthogonally adjacent cells hold
/// equal values. A board with any empty cell is never game-over.
pub fn is_game_over(board: &Board) -> bool {
    if count_empty(board) > 0 {
        return false;
    }
    let n = board.size();
    for row in 0..n {
        for col in 0..n {
            let val = board.get(row, col);
            if col + 1 < n && board.get(row, col + 1) == val {
                return false;
            }
            if row + 1 < n && board.get(row + 1, col) == val {
                return false;
            }
        }
    }
    true
}

/// True iff any cell has reached [`WIN_TILE`]. Independent of game-over:
/// a won board may still have legal moves.
pub fn is_win(board: &Board) -> bool {
    board.cells().iter().any(|&v| v >= WIN_TILE)
}

fn shift_rows(board: &Board, direction: Move) -> Shift {
    let mut out = board.clone();
    let mut merged = MergeMask::new(board.size());
    let mut score_delta = 0;
    let mut changed = false;
    for row in 0..board.size() {
        let line = shift_line(out.row_mut(row), merged.row_mut(row), direction);
        score_delta += line.score_delta;
        changed |= line.changed;
    }
    Shift {
        board: out,
        merged,
        score_delta,
        changed,
    }
}

fn shift_cols(board: &Board, direction: Move) -> Shift {
    // Columns become rows under transposition: Up maps to Left, Down to
    // Right. Transposing twice restores the original orientation.
    let row_dir = match direction {
        Move::Up => Move::Left,
        Move::Down => Move::Right,
        _ => unreachable!("shift_cols only handles vertical moves"),
    };
    let shifted = shift_rows(&transpose(board), row_dir);
    Shift {
        board: transpose(&shifted.board),
        merged: transpose_mask(&shifted.merged),
        score_delta: shifted.score_delta,
        changed: shifted.changed,
    }
}

pub(crate) fn transpose(board: &Board) -> Board {
    let n = board.size();
    let mut out = Board::empty(n);
    for row in 0..n {
        for col in 0..n {
            out.set(col, row, board.get(row, col));
        }
    }
    out
}

fn transpose_mask(mask: &MergeMask) -> MergeMask {
    let n = mask.size();
    let mut out = MergeMask::new(n);
    for row in 0..n {
        for col in 0..n {
            out.set(col, row, mask.merged(row, col));
        }
    }
    out
}

struct LineShift {
    score_delta: u32,
    changed: bool,
}

/// Apply the merge-then-compact line algorithm in place.
///
/// `mask` receives the merge flags at each tile's final position. Rightward
/// lines reverse, run the leftward pass and reverse back.
fn shift_line(line: &mut [u32], mask: &mut [bool], direction: Move) -> LineShift {
    match direction {
        Move::Left => shift_line_left(line, mask),
        Move::Right => {
            line.reverse();
            let shifted = shift_line_left(line, mask);
            line.reverse();
            mask.reverse();
            shifted
        }
        _ => unreachable!("line algorithm is horizontal only"),
    }
}

fn shift_line_left(line: &mut [u32], mask: &mut [bool]) -> LineShift {
    let n = line.len();
    let before = line.to_vec();

    // Merge pass: each tile consults only the first subsequent non-zero
    // cell, match or not, so a tile merges at most once per move and a
    // freshly merged tile cannot merge again in the same pass.
    let mut score_delta = 0;
    for i in 0..n {
        if line[i] == 0 {
            continue;
        }
        for j in i + 1..n {
            if line[j] == 0 {
                continue;
            }
            if line[i] == line[j] {
                line[i] *= 2;
                line[j] = 0;
                mask[i] = true;
                score_delta += line[i];
            }
            break;
        }
    }
    let merged_stage = line.to_vec();

    // Compact pass: stable slide of non-zeros toward index 0; each merge
    // flag travels with its tile to the compacted position.
    let mut write = 0;
    for read in 0..n {
        if line[read] != 0 {
            let (val, flag) = (line[read], mask[read]);
            line[read] = 0;
            mask[read] = false;
            line[write] = val;
            mask[write] = flag;
            write += 1;
        }
    }

    // Either stage alone counts as a change (merge-only or slide-only).
    let changed = merged_stage != before || &line[..] != &merged_stage[..];
    LineShift {
        score_delta,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_line_left(input: &[u32]) -> (Vec<u32>, Vec<bool>, u32, bool) {
        let mut line = input.to_vec();
        let mut mask = vec![false; input.len()];
        let shifted = shift_line_left(&mut line, &mut mask);
        (line, mask, shifted.score_delta, shifted.changed)
    }

    #[test]
    fn it_shift_line_left() {
        assert_eq!(run_line_left(&[0, 0, 0, 0]).0, vec![0, 0, 0, 0]);
        assert_eq!(run_line_left(&[2, 4, 2, 4]).0, vec![2, 4, 2, 4]);
        assert_eq!(run_line_left(&[2, 2, 4, 4]).0, vec![4, 8, 0, 0]);
        assert_eq!(run_line_left(&[2, 0, 0, 2]).0, vec![4, 0, 0, 0]);
        assert_eq!(run_line_left(&[0, 0, 0, 2]).0, vec![2, 0, 0, 0]);
    }

    #[test]
    fn it_merges_each_tile_at_most_once() {
        let (line, mask, delta, changed) = run_line_left(&[2, 2, 2, 2]);
        assert_eq!(line, vec![4, 4, 0, 0]);
        assert_eq!(mask, vec![true, true, false, false]);
        assert_eq!(delta, 8);
        assert!(changed);

        // The merged 4 does not chain with the trailing 4.
        let (line, _, delta, _) = run_line_left(&[2, 2, 4, 0]);
        assert_eq!(line, vec![4, 4, 0, 0]);
        assert_eq!(delta, 4);
    }

    #[test]
    fn it_blocks_merges_across_unequal_neighbors() {
        // 2 sees the 4 first and stops scanning, even though another 2
        // sits beyond it.
        let (line, _, delta, changed) = run_line_left(&[2, 4, 2, 0]);
        assert_eq!(line, vec![2, 4, 2, 0]);
        assert_eq!(delta, 0);
        assert!(!changed);
    }

    #[test]
    fn it_flags_change_for_slide_only_and_merge_only() {
        // Slide only: no merge happens but tiles move.
        let (_, mask, delta, changed) = run_line_left(&[0, 2, 0, 4]);
        assert_eq!(delta, 0);
        assert!(changed);
        assert_eq!(mask, vec![false, false, false, false]);

        // Merge lands at index 0, already compacted: merge stage alone
        // must still count as a change.
        let (line, _, _, changed) = run_line_left(&[2, 2, 0, 0]);
        assert_eq!(line, vec![4, 0, 0, 0]);
        assert!(changed);
    }

    #[test]
    fn it_shift_right_mirrors_left() {
        let board = Board::from_rows(&[
            vec![2, 0, 0, 2],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let shifted = shift(&board, Move::Right);
        assert_eq!(shifted.board.row(0), &[0, 0, 0, 4]);
        assert!(shifted.merged.merged(0, 3));
        assert_eq!(shifted.score_delta, 4);
        assert!(shifted.changed);
    }

    #[test]
    fn it_shift_up_and_down_via_transpose() {
        let board = Board::from_rows(&[
            vec![2, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![2, 0, 0, 0],
        ]);
        let up = shift(&board, Move::Up);
        assert_eq!(up.board.get(0, 0), 4);
        assert_eq!(up.board.count_empty(), 15);
        assert!(up.merged.merged(0, 0));

        let down = shift(&board, Move::Down);
        assert_eq!(down.board.get(3, 0), 4);
        assert_eq!(down.board.count_empty(), 15);
        assert!(down.merged.merged(3, 0));
        assert_eq!(down.score_delta, 4);
    }

    #[test]
    fn it_reports_unchanged_for_blocked_moves() {
        let board = Board::from_rows(&[vec![2, 4], vec![8, 16]]);
        for direction in Move::ALL {
            let shifted = shift(&board, direction);
            assert!(!shifted.changed, "{:?} should be blocked", direction);
            assert_eq!(shifted.board, board);
            assert_eq!(shifted.score_delta, 0);
            assert!(shifted.merged.is_clear());
        }
    }

    #[test]
    fn it_conserves_tiles_across_a_slide_and_shrinks_on_merge() {
        let board = Board::from_rows(&[
            vec![0, 2, 0, 4],
            vec![0, 0, 8, 0],
            vec![0, 0, 0, 0],
            vec![2, 0, 0, 0],
        ]);
        let shifted = shift(&board, Move::Left);
        let tiles = |b: &Board| {
            let mut vals: Vec<u32> = b.cells().iter().copied().filter(|&v| v != 0).collect();
            vals.sort_unstable();
            vals
        };
        // Pure slide: multiset of tiles unchanged.
        assert_eq!(tiles(&board), tiles(&shifted.board));
        assert_eq!(shifted.score_delta, 0);

        let merging = Board::from_rows(&[vec![2, 2], vec![4, 8]]);
        let shifted = shift(&merging, Move::Left);
        // One merge: one fewer tile, sum raised only through the score.
        assert_eq!(tiles(&shifted.board), vec![4, 4, 8]);
        assert_eq!(shifted.score_delta, 4);
        let sum = |b: &Board| b.cells().iter().sum::<u32>();
        assert_eq!(sum(&merging), sum(&shifted.board));
    }

    #[test]
    fn it_detects_game_over() {
        // Full, no equal neighbors.
        assert!(is_game_over(&Board::from_rows(&[vec![2, 4], vec![4, 2]])));
        // Top row mergeable.
        assert!(!is_game_over(&Board::from_rows(&[vec![2, 2], vec![4, 8]])));
        // Any empty cell means moves remain.
        assert!(!is_game_over(&Board::from_rows(&[vec![2, 4], vec![8, 0]])));
        // Vertical pair.
        assert!(!is_game_over(&Board::from_rows(&[vec![2, 4], vec![2, 8]])));
    }

    #[test]
    fn it_detects_win_independently_of_game_over() {
        let won_open = Board::from_rows(&[vec![2048, 0], vec![0, 0]]);
        assert!(is_win(&won_open));
        assert!(!is_game_over(&won_open));

        let won_stuck = Board::from_rows(&[vec![2048, 4], vec![8, 2]]);
        assert!(is_win(&won_stuck));
        assert!(is_game_over(&won_stuck));

        assert!(is_win(&Board::from_rows(&[vec![4096, 0], vec![0, 0]])));
        assert!(!is_win(&Board::from_rows(&[vec![1024, 1024], vec![0, 0]])));
    }

    #[test]
    fn it_transposes_round_trip() {
        let board = Board::from_rows(&[vec![2, 4, 8], vec![0, 16, 0], vec![32, 0, 64]]);
        let t = transpose(&board);
        assert_eq!(t.get(0, 1), 0);
        assert_eq!(t.get(1, 0), 4);
        assert_eq!(transpose(&t), board);
    }

    #[test]
    fn it_handles_larger_grids() {
        let mut rows = vec![vec![0u32; 5]; 5];
        rows[2] = vec![2, 2, 0, 4, 4];
        let board = Board::from_rows(&rows);
        let shifted = shift(&board, Move::Left);
        assert_eq!(shifted.board.row(2), &[4, 8, 0, 0, 0]);
        assert_eq!(shifted.score_delta, 12);
        assert!(shifted.merged.merged(2, 0));
        assert!(shifted.merged.merged(2, 1));
    }
}
