//! Game controller: the single owner of the live position.
//!
//! A turn cycles through [`Phase::PlayerMove`] and [`Phase::ComputerSearching`]
//! until the position has a winner ([`Phase::GameOver`]). Computer moves are
//! searched on a worker thread against a copy of the position; the worker
//! sends its choice back over a channel and the controller commits it when
//! polled. Player input is rejected while the worker is running.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::board::{Cell, Color};
use crate::config::{EngineConfig, Scoring};
use crate::position::{Move, Position};
use crate::search::{SearchResult, Searcher};

/// Where the game is in its turn cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the human player's move
    PlayerMove,
    /// Computer to move: either searching or about to be asked to
    ComputerSearching,
    /// The position has a winner
    GameOver,
}

/// A live game against the computer.
pub struct Game {
    pos: Position,
    phase: Phase,
    pacing: Duration,
    seed: Option<u64>,
    pending: Option<Receiver<SearchResult>>,
}

impl Game {
    /// New game with the player moving first.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_first_mover(config, Color::Player)
    }

    pub fn with_first_mover(config: &EngineConfig, first: Color) -> Self {
        Self {
            pos: Position::with_first_mover(first),
            phase: Self::phase_for(first),
            pacing: Duration::from_millis(config.pacing_ms),
            seed: config.seed,
            pending: None,
        }
    }

    fn phase_for(turn: Color) -> Phase {
        match turn {
            Color::Player => Phase::PlayerMove,
            Color::Computer => Phase::ComputerSearching,
        }
    }

    /// Start over with `first` to move. A running search is abandoned.
    pub fn reset(&mut self, first: Color) {
        self.pos = Position::with_first_mover(first);
        self.phase = Self::phase_for(first);
        self.pending = None;
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a worker is searching.
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_active_sub_board(&self) -> Option<usize> {
        self.pos.active
    }

    pub fn cell_at(&self, k: usize, i: usize, j: usize) -> Cell {
        self.pos.cell_at(k, i, j)
    }

    pub fn meta_cell_at(&self, row: usize, col: usize) -> Cell {
        self.pos.meta_cell_at(row, col)
    }

    pub fn turn_owner(&self) -> Color {
        self.pos.turn
    }

    pub fn winner(&self) -> Option<Color> {
        self.pos.winner
    }

    /// Apply a player move. Returns whether it was legal.
    pub fn attempt_move(&mut self, k: usize, i: usize, j: usize) -> bool {
        if self.phase != Phase::PlayerMove {
            return false;
        }
        match self.pos.play(k, i, j, Color::Player) {
            Ok(()) => {
                log::info!("player plays {}", Move::new(k, i, j));
                self.after_move();
                true
            }
            Err(e) => {
                log::debug!("rejected player move {k} {i} {j}: {e}");
                false
            }
        }
    }

    /// Start searching for the computer's move on a worker thread.
    ///
    /// Returns false if it is not the computer's turn or a search is
    /// already running.
    pub fn request_computer_move(&mut self, scoring: &Scoring, depth: i32) -> bool {
        if self.phase != Phase::ComputerSearching || self.pending.is_some() {
            return false;
        }
        let snapshot = self.pos.clone();
        let deadline = Instant::now() + self.pacing;
        let mut searcher = match self.seed {
            Some(seed) => Searcher::with_seed(*scoring, seed.wrapping_add(snapshot.moves as u64)),
            None => Searcher::new(*scoring),
        };
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = searcher.search(&snapshot, Color::Computer, depth);
            let now = Instant::now();
            if now < deadline {
                thread::sleep(deadline - now);
            }
            // The receiver is gone if the game was reset meanwhile
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
        true
    }

    /// Commit the computer's move if the worker has finished.
    pub fn poll_computer_move(&mut self) -> Option<Move> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.commit(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("search worker exited without a move");
                self.pending = None;
                None
            }
        }
    }

    /// Block until the worker finishes, then commit its move.
    pub fn wait_computer_move(&mut self) -> Option<Move> {
        let rx = self.pending.take()?;
        match rx.recv() {
            Ok(result) => self.commit(result),
            Err(_) => {
                log::warn!("search worker exited without a move");
                None
            }
        }
    }

    fn commit(&mut self, result: SearchResult) -> Option<Move> {
        let mv = result.mv?;
        match self.pos.play(mv.sub_board, mv.i, mv.j, Color::Computer) {
            Ok(()) => {
                log::info!("computer plays {mv} (score {})", result.score);
                self.after_move();
                Some(mv)
            }
            Err(e) => {
                log::warn!("computer move {mv} rejected: {e}");
                None
            }
        }
    }

    fn after_move(&mut self) {
        self.phase = match self.pos.winner {
            Some(_) => Phase::GameOver,
            None => Self::phase_for(self.pos.turn),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> EngineConfig {
        EngineConfig {
            search_depth: 2,
            pacing_ms: 0,
            seed: Some(7),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_player_moves_first() {
        let game = Game::new(&quick_config());
        assert_eq!(game.phase(), Phase::PlayerMove);
        assert_eq!(game.turn_owner(), Color::Player);
        assert_eq!(game.current_active_sub_board(), None);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_full_turn_cycle() {
        let config = quick_config();
        let mut game = Game::new(&config);

        // Not the computer's turn yet
        assert!(!game.request_computer_move(&config.scoring, config.search_depth));

        assert!(game.attempt_move(4, 2, 0));
        assert_eq!(game.cell_at(4, 2, 0), Cell::Player);
        assert_eq!(game.current_active_sub_board(), Some(2));
        assert_eq!(game.phase(), Phase::ComputerSearching);

        // Input is ignored until the computer has moved
        assert!(!game.attempt_move(2, 0, 0));

        assert!(game.request_computer_move(&config.scoring, config.search_depth));
        assert!(game.is_thinking());
        assert!(!game.request_computer_move(&config.scoring, config.search_depth));
        assert!(!game.attempt_move(2, 0, 0));

        let mv = game.wait_computer_move().expect("computer move");
        assert_eq!(mv.sub_board, 2);
        assert_eq!(game.cell_at(2, mv.i, mv.j), Cell::Computer);
        assert_eq!(game.phase(), Phase::PlayerMove);
        assert_eq!(game.turn_owner(), Color::Player);
        assert!(!game.is_thinking());
    }

    #[test]
    fn test_poll_eventually_commits() {
        let config = quick_config();
        let mut game = Game::with_first_mover(&config, Color::Computer);
        assert_eq!(game.phase(), Phase::ComputerSearching);
        assert!(game.request_computer_move(&config.scoring, 1));

        let start = Instant::now();
        let mv = loop {
            if let Some(mv) = game.poll_computer_move() {
                break mv;
            }
            assert!(start.elapsed() < Duration::from_secs(10), "worker never finished");
            thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(game.cell_at(mv.sub_board, mv.i, mv.j), Cell::Computer);
        assert_eq!(game.phase(), Phase::PlayerMove);
    }

    #[test]
    fn test_pacing_delay() {
        let config = EngineConfig {
            pacing_ms: 50,
            ..quick_config()
        };
        let mut game = Game::with_first_mover(&config, Color::Computer);
        let start = Instant::now();
        assert!(game.request_computer_move(&config.scoring, 1));
        assert!(game.wait_computer_move().is_some());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_illegal_player_move() {
        let mut game = Game::new(&quick_config());
        assert!(!game.attempt_move(9, 0, 0));
        assert!(game.attempt_move(0, 0, 0));
        let config = quick_config();
        game.request_computer_move(&config.scoring, 1);
        let mv = game.wait_computer_move().expect("computer move");
        // Occupied cell
        assert!(!game.attempt_move(mv.sub_board, mv.i, mv.j));
    }

    #[test]
    fn test_reset() {
        let config = quick_config();
        let mut game = Game::new(&config);
        game.attempt_move(0, 1, 1);
        game.request_computer_move(&config.scoring, 1);
        game.reset(Color::Player);
        assert!(!game.is_thinking());
        assert_eq!(game.position(), &Position::new());
        assert_eq!(game.phase(), Phase::PlayerMove);
    }

    #[test]
    fn test_game_over_stops_input() {
        let config = quick_config();
        let mut game = Game::new(&config);
        // Hand the player a nearly won meta board
        game.pos.meta.set_chess(0, 0, Color::Player);
        game.pos.meta.set_chess(1, 0, Color::Player);
        game.pos.boards[2].set_chess(0, 0, Color::Player);
        game.pos.boards[2].set_chess(1, 1, Color::Player);
        assert!(game.attempt_move(2, 2, 2));
        assert_eq!(game.winner(), Some(Color::Player));
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.meta_cell_at(0, 2), Cell::Player);
        assert!(!game.attempt_move(0, 2, 2));
        assert!(!game.request_computer_move(&config.scoring, 1));
    }
}
