//! uttt-engine: an ultimate tic-tac-toe engine.
//!
//! Nine 3x3 sub-boards sit on a 3x3 super-grid. The cell a move is played in
//! decides which sub-board the opponent must play in next. Winning a
//! sub-board claims its cell on the meta board, and a line on the meta board
//! wins the game.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, search parameters and default weights
//! - [`board`] - Cells, colors and the 3x3 line model
//! - [`position`] - Full game state, move legality and win detection
//! - [`eval`] - Heuristic move scoring
//! - [`search`] - Recursive best-move search
//! - [`config`] - Scoring weights and engine settings (TOML)
//! - [`game`] - Live game controller with a background search worker
//! - [`playout`] - Whole-game simulation
//! - [`protocol`] - Text command protocol for front ends
//!
//! ## Example
//!
//! ```
//! use uttt_engine::board::Color;
//! use uttt_engine::config::Scoring;
//! use uttt_engine::position::Position;
//! use uttt_engine::search::Searcher;
//!
//! // Player opens in the center of the center sub-board
//! let mut pos = Position::new();
//! pos.play(4, 1, 1, Color::Player).unwrap();
//!
//! // Find the computer's reply
//! let mut searcher = Searcher::new(Scoring::default());
//! let result = searcher.search(&pos, Color::Computer, 2);
//! let mv = result.mv.unwrap();
//! assert_eq!(mv.sub_board, 4);
//! println!("Best move: {mv} (score {})", result.score);
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod eval;
pub mod game;
pub mod playout;
pub mod position;
pub mod protocol;
pub mod search;
