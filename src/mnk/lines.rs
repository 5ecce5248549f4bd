//! Line analysis for M,N,K boards
//!
//! Lines are walked forward from a starting cell along a direction vector.
//! Directions are not symmetrised: a run is measured from its first cell, and
//! starting mid-run only ever yields a shorter count.

use super::{Board, Direction, Player};

/// Utility for analyzing lines of stones
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Length of the run of `player` stones starting at `index` and walking
    /// along `direction`. Zero if the start cell is not owned by `player`.
    pub fn run_length(board: &Board, index: usize, direction: Direction, player: Player) -> usize {
        Self::run_length_capped(board, index, direction, player, usize::MAX)
    }

    fn run_length_capped(
        board: &Board,
        index: usize,
        direction: Direction,
        player: Player,
        cap: usize,
    ) -> usize {
        let target = player.to_cell();
        let (row, col) = board.position(index);
        let (dr, dc) = direction.delta();
        let (mut r, mut c) = (row as isize, col as isize);
        let mut length = 0;

        while length < cap && board.at(r, c) == Some(target) {
            length += 1;
            r += dr;
            c += dc;
        }
        length
    }

    /// Check if `player` owns `win_length` consecutive cells in any of the
    /// given directions.
    pub fn has_line(
        board: &Board,
        player: Player,
        win_length: usize,
        directions: &[Direction],
    ) -> bool {
        let target = player.to_cell();
        board
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == target)
            .any(|(idx, _)| {
                directions.iter().any(|&direction| {
                    Self::run_length_capped(board, idx, direction, player, win_length)
                        >= win_length
                })
            })
    }

    /// Longest run of `player` stones over every owned cell and every given
    /// direction.
    pub fn longest_chain(board: &Board, player: Player, directions: &[Direction]) -> usize {
        let target = player.to_cell();
        board
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == target)
            .flat_map(|(idx, _)| {
                directions
                    .iter()
                    .map(move |&direction| Self::run_length(board, idx, direction, player))
            })
            .max()
            .unwrap_or(0)
    }

    /// Check if placing a `player` stone on the empty cell `index` would
    /// complete a line.
    pub fn completes_line(
        board: &Board,
        index: usize,
        player: Player,
        win_length: usize,
        directions: &[Direction],
    ) -> bool {
        if !board.is_empty_at(index) {
            return false;
        }
        let placed = board.with_cell(index, player.to_cell());
        Self::has_line(&placed, player, win_length, directions)
    }

    /// Positions where `player` would immediately complete a line
    pub fn winning_moves(
        board: &Board,
        player: Player,
        win_length: usize,
        directions: &[Direction],
    ) -> Vec<usize> {
        board
            .empty_positions()
            .into_iter()
            .filter(|&idx| Self::completes_line(board, idx, player, win_length, directions))
            .collect()
    }
}
