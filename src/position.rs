//! Ultimate tic-tac-toe position representation and move execution.
//!
//! This module provides the core game logic:
//! - Nine local sub-boards plus the meta board of sub-board outcomes
//! - The active sub-board constraint (where the next move must go)
//! - Recording of local wins on the meta board
//! - Global win detection, including the fallback when the board fills up
//!
//! Sub-boards are indexed `0..9` row-major over the super-grid. Inside a
//! sub-board, a cell `(i, j)` is column `i` and row `j`, and playing it sends
//! the opponent to sub-board `i + 3 * j`.

use std::fmt;

use crate::board::{Cell, Color, SubBoard};
use crate::constants::{CELLS, SIDE};

/// A move: sub-board index plus the local cell inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub sub_board: usize,
    pub i: usize,
    pub j: usize,
}

impl Move {
    pub fn new(sub_board: usize, i: usize, j: usize) -> Self {
        Self { sub_board, i, j }
    }

    /// The sub-board this move sends the opponent to.
    #[inline]
    pub fn target(&self) -> usize {
        self.i + self.j * SIDE
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.sub_board, self.i, self.j)
    }
}

/// Reason a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game already has a winner
    GameOver,
    /// Sub-board or cell index outside the grid
    OutOfRange,
    /// The mover is not the side to move
    NotYourTurn,
    /// The active constraint requires a different sub-board
    OutsideActive,
    /// Cell is not empty
    Occupied,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::GameOver => write!(f, "illegal move: game is over"),
            MoveError::OutOfRange => write!(f, "illegal move: coordinates out of range"),
            MoveError::NotYourTurn => write!(f, "illegal move: not your turn"),
            MoveError::OutsideActive => write!(f, "illegal move: outside the active sub-board"),
            MoveError::Occupied => write!(f, "illegal move: cell not empty"),
        }
    }
}

/// Meta board coordinates `(column, row)` of sub-board `k`.
#[inline]
pub fn meta_coords(k: usize) -> (usize, usize) {
    (k % SIDE, k / SIDE)
}

/// A full game position.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    /// The nine local sub-boards, row-major over the super-grid
    pub boards: [SubBoard; CELLS],
    /// Winner of each sub-board; empty means undecided
    pub meta: SubBoard,
    /// Sub-board the next move must be played in (`None` = free choice)
    pub active: Option<usize>,
    /// Side to move
    pub turn: Color,
    /// Game result once decided
    pub winner: Option<Color>,
    /// Number of committed moves
    pub moves: usize,
    /// Last committed move
    pub last: Option<Move>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Undo record for a simulated move.
#[derive(Debug)]
pub struct Simulated {
    mv: Move,
    active: Option<usize>,
}

impl Position {
    /// Empty position with the player to move.
    pub fn new() -> Self {
        Self::with_first_mover(Color::Player)
    }

    pub fn with_first_mover(turn: Color) -> Self {
        Position {
            boards: [SubBoard::new(); CELLS],
            meta: SubBoard::new(),
            active: None,
            turn,
            winner: None,
            moves: 0,
            last: None,
        }
    }

    pub fn cell_at(&self, k: usize, i: usize, j: usize) -> Cell {
        self.boards[k].at(i, j)
    }

    pub fn meta_cell_at(&self, row: usize, col: usize) -> Cell {
        self.meta.at(col, row)
    }

    /// Active constraint that follows a move to local cell `(i, j)`.
    fn next_active(&self, i: usize, j: usize) -> Option<usize> {
        let target = i + j * SIDE;
        if self.boards[target].full() { None } else { Some(target) }
    }

    /// Place `c` at `(i, j)` of sub-board `k` without checking turn or the
    /// active constraint.
    ///
    /// Records a completed local line on the meta board, re-evaluates the
    /// global result and moves the active constraint. Returns `false` without
    /// mutating anything if the cell is occupied.
    pub fn place_move(&mut self, k: usize, i: usize, j: usize, c: Color) -> bool {
        if !self.boards[k].set_chess(i, j, c) {
            return false;
        }
        if self.boards[k].has(3, c) > 0 {
            let (mi, mj) = meta_coords(k);
            // Already-decided sub-boards keep their first winner
            self.meta.set_chess(mi, mj, c);
        }
        self.active = self.next_active(i, j);
        self.moves += 1;
        self.last = Some(Move::new(k, i, j));
        if self.winner.is_none() && self.is_decided() {
            self.resolve_winner();
        }
        true
    }

    /// Play a fully checked move for `c` and hand the turn to the opponent.
    pub fn play(&mut self, k: usize, i: usize, j: usize, c: Color) -> Result<(), MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if k >= CELLS || i >= SIDE || j >= SIDE {
            return Err(MoveError::OutOfRange);
        }
        if c != self.turn {
            return Err(MoveError::NotYourTurn);
        }
        if self.active.is_some_and(|a| a != k) {
            return Err(MoveError::OutsideActive);
        }
        if !self.place_move(k, i, j, c) {
            return Err(MoveError::Occupied);
        }
        self.turn = c.opponent();
        Ok(())
    }

    /// Sub-boards the side to move may play in.
    pub fn candidate_boards(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELLS).filter(move |&k| self.active.is_none_or(|a| a == k))
    }

    /// Every legal move for the side to move, in search enumeration order.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.winner.is_some() {
            return Vec::new();
        }
        self.candidate_boards()
            .flat_map(|k| self.boards[k].empty_cells().map(move |(i, j)| Move::new(k, i, j)))
            .collect()
    }

    /// Apply a move for search purposes only.
    ///
    /// Only the local cell and the active constraint change; the meta board,
    /// winner and turn are untouched. Must be paired with [`Position::undo`].
    pub fn simulate(&mut self, mv: Move, c: Color) -> Option<Simulated> {
        if !self.boards[mv.sub_board].set_chess(mv.i, mv.j, c) {
            return None;
        }
        let saved = Simulated {
            mv,
            active: self.active,
        };
        self.active = self.next_active(mv.i, mv.j);
        Some(saved)
    }

    /// Roll back a move applied with [`Position::simulate`].
    pub fn undo(&mut self, sim: Simulated) {
        self.boards[sim.mv.sub_board].erase(sim.mv.i, sim.mv.j);
        self.active = sim.active;
    }

    /// True once the meta board has a line, is full, or every sub-board is full.
    fn is_decided(&self) -> bool {
        self.raw_winner().is_some()
            || self.meta.full()
            || self.boards.iter().all(SubBoard::full)
    }

    /// Winner by a completed line on the meta board. Computer is checked first.
    pub fn raw_winner(&self) -> Option<Color> {
        meta_line_winner(&self.meta)
    }

    /// Settle the game result and record it in `winner`.
    ///
    /// Without a meta line, every undecided sub-board goes to the side with
    /// more pieces in it (ties to the player), and the meta board is tested
    /// again. If that still has no line, the side owning more meta cells wins.
    fn resolve_winner(&mut self) {
        let winner = match self.raw_winner() {
            Some(c) => c,
            None => {
                for k in 0..CELLS {
                    let (mi, mj) = meta_coords(k);
                    let owner = majority_owner(&self.boards[k]);
                    self.meta.set_chess(mi, mj, owner);
                }
                meta_line_winner(&self.meta).unwrap_or_else(|| {
                    if self.meta.count(Color::Computer) > self.meta.count(Color::Player) {
                        Color::Computer
                    } else {
                        Color::Player
                    }
                })
            }
        };
        log::info!("game decided after {} moves: {winner} wins", self.moves);
        self.winner = Some(winner);
    }
}

/// Side with more pieces on `board`; ties go to the player.
fn majority_owner(board: &SubBoard) -> Color {
    if board.count(Color::Computer) > board.count(Color::Player) {
        Color::Computer
    } else {
        Color::Player
    }
}

fn meta_line_winner(meta: &SubBoard) -> Option<Color> {
    [Color::Computer, Color::Player]
        .into_iter()
        .find(|&c| meta.has(3, c) > 0)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for big_row in 0..SIDE {
            if big_row > 0 {
                writeln!(f, "------+-------+------")?;
            }
            for j in 0..SIDE {
                for big_col in 0..SIDE {
                    if big_col > 0 {
                        write!(f, "| ")?;
                    }
                    let k = big_col + big_row * SIDE;
                    for i in 0..SIDE {
                        write!(f, "{} ", self.boards[k].at(i, j).symbol())?;
                    }
                }
                writeln!(f)?;
            }
        }
        writeln!(f)?;
        write!(f, "meta:\n{}", self.meta)?;
        match self.active {
            Some(k) => writeln!(f, "active: {k}")?,
            None => writeln!(f, "active: any")?,
        }
        match self.winner {
            Some(c) => writeln!(f, "winner: {c}"),
            None => writeln!(f, "to move: {}", self.turn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A full sub-board without a line: computer 5, player 4.
    const DRAW: [[Color; 3]; 3] = [
        [Color::Computer, Color::Player, Color::Computer],
        [Color::Computer, Color::Player, Color::Player],
        [Color::Player, Color::Computer, Color::Computer],
    ];

    fn fill(pos: &mut Position, k: usize) {
        for j in 0..3 {
            for i in 0..3 {
                pos.boards[k].set_chess(i, j, DRAW[j][i]);
            }
        }
    }

    #[test]
    fn test_empty_position() {
        let pos = Position::new();
        assert_eq!(pos.active, None);
        assert_eq!(pos.turn, Color::Player);
        assert_eq!(pos.winner, None);
        assert_eq!(pos.legal_moves().len(), 81);
    }

    #[test]
    fn test_move_sets_active() {
        let mut pos = Position::new();
        assert!(pos.place_move(4, 2, 0, Color::Player));
        assert_eq!(pos.active, Some(2));
        assert_eq!(pos.last, Some(Move::new(4, 2, 0)));
    }

    #[test]
    fn test_move_into_full_board_frees_choice() {
        let mut pos = Position::new();
        fill(&mut pos, 2);
        assert!(pos.boards[2].full());
        assert!(pos.place_move(0, 2, 0, Color::Computer));
        assert_eq!(pos.active, None);
    }

    #[test]
    fn test_place_move_occupied() {
        let mut pos = Position::new();
        assert!(pos.place_move(0, 1, 1, Color::Player));
        let before = pos.clone();
        assert!(!pos.place_move(0, 1, 1, Color::Computer));
        assert_eq!(pos, before);
        assert_eq!(pos.boards[0].empty_count(), 8);
    }

    #[test]
    fn test_local_win_recorded_on_meta() {
        let mut pos = Position::new();
        pos.place_move(5, 0, 0, Color::Computer);
        pos.place_move(5, 1, 0, Color::Computer);
        assert_eq!(pos.meta_cell_at(1, 2), Cell::Empty);
        pos.place_move(5, 2, 0, Color::Computer);
        assert_eq!(pos.meta_cell_at(1, 2), Cell::Computer);

        // A later line by the other side does not overwrite it
        pos.place_move(5, 0, 2, Color::Player);
        pos.place_move(5, 1, 2, Color::Player);
        pos.place_move(5, 2, 2, Color::Player);
        assert_eq!(pos.meta_cell_at(1, 2), Cell::Computer);
    }

    #[test]
    fn test_play_checks() {
        let mut pos = Position::new();
        assert_eq!(pos.play(0, 0, 0, Color::Computer), Err(MoveError::NotYourTurn));
        assert_eq!(pos.play(9, 0, 0, Color::Player), Err(MoveError::OutOfRange));
        assert_eq!(pos.play(0, 3, 0, Color::Player), Err(MoveError::OutOfRange));
        assert_eq!(pos.play(0, 1, 0, Color::Player), Ok(()));
        assert_eq!(pos.turn, Color::Computer);
        assert_eq!(pos.active, Some(1));
        assert_eq!(pos.play(0, 0, 0, Color::Computer), Err(MoveError::OutsideActive));
        assert_eq!(pos.play(1, 1, 0, Color::Computer), Ok(()));
        assert_eq!(pos.active, Some(1));
        assert_eq!(pos.play(1, 1, 0, Color::Player), Err(MoveError::Occupied));
        assert_eq!(pos.turn, Color::Player);
    }

    #[test]
    fn test_simulate_and_undo() {
        let mut pos = Position::new();
        pos.place_move(3, 1, 1, Color::Player);
        let before = pos.clone();

        let sim = pos.simulate(Move::new(4, 0, 2), Color::Computer).expect("empty cell");
        assert_eq!(pos.cell_at(4, 0, 2), Cell::Computer);
        assert_eq!(pos.active, Some(6));
        pos.undo(sim);
        assert_eq!(pos, before);

        assert!(pos.simulate(Move::new(3, 1, 1), Color::Computer).is_none());
        assert_eq!(pos, before);
    }

    #[test]
    fn test_meta_line_wins() {
        let mut pos = Position::new();
        for k in [0, 4] {
            pos.meta.set_chess(k % 3, k / 3, Color::Computer);
        }
        pos.place_move(8, 0, 0, Color::Computer);
        pos.place_move(8, 1, 1, Color::Computer);
        assert_eq!(pos.winner, None);
        pos.place_move(8, 2, 2, Color::Computer);
        assert_eq!(pos.winner, Some(Color::Computer));
        assert_eq!(pos.play(0, 0, 0, Color::Player), Err(MoveError::GameOver));
        assert!(pos.legal_moves().is_empty());
    }

    #[test]
    fn test_fallback_by_majority() {
        // Meta: computer owns 0 and 8, player owns 1 and 3; nothing else decided
        let mut pos = Position::new();
        pos.meta.set_chess(0, 0, Color::Computer);
        pos.meta.set_chess(2, 2, Color::Computer);
        pos.meta.set_chess(1, 0, Color::Player);
        pos.meta.set_chess(0, 1, Color::Player);

        // Every sub-board drawn (computer 5, player 4) except the last cell of 8
        for k in 0..8 {
            fill(&mut pos, k);
        }
        for j in 0..3 {
            for i in 0..3 {
                if (i, j) != (2, 2) {
                    pos.boards[8].set_chess(i, j, DRAW[j][i]);
                }
            }
        }
        assert_eq!(pos.winner, None);
        assert!(pos.place_move(8, 2, 2, Color::Computer));

        // Undecided sub-boards 2, 4, 5, 6, 7 all go to the computer (5 vs 4),
        // giving it the 2-4-6 diagonal
        assert_eq!(pos.meta_cell_at(1, 1), Cell::Computer);
        assert_eq!(pos.meta_cell_at(0, 1), Cell::Player);
        assert_eq!(pos.winner, Some(Color::Computer));
    }

    #[test]
    fn test_majority_tie_goes_to_player() {
        let mut b = SubBoard::new();
        b.set_chess(0, 0, Color::Computer);
        b.set_chess(1, 0, Color::Player);
        assert_eq!(majority_owner(&b), Color::Player);
        b.set_chess(2, 2, Color::Computer);
        assert_eq!(majority_owner(&b), Color::Computer);
    }

    #[test]
    fn test_display_contains_pieces() {
        let mut pos = Position::new();
        pos.place_move(0, 0, 0, Color::Computer);
        pos.place_move(8, 2, 2, Color::Player);
        let s = pos.to_string();
        assert!(s.starts_with("X . . | "));
        assert!(s.contains("active: 8"));
        assert!(s.contains("to move: player"));
    }
}
