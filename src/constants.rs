//! Constants for board geometry, search parameters, and default weights.
//!
//! The default scoring weights live here so that both the configuration
//! layer and the tests can refer to the same numbers.

// =============================================================================
// Board Geometry
// =============================================================================

/// Side length of a sub-board (and of the super-grid).
pub const SIDE: usize = 3;

/// Number of cells in a sub-board, and number of sub-boards on the board.
pub const CELLS: usize = SIDE * SIDE;

/// Line directions as (di, dj): horizontal, main diagonal, vertical, anti-diagonal.
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (1, 1), (0, 1), (-1, 1)];

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth (difficulty).
pub const DEFAULT_DEPTH: i32 = 4;

/// Largest accepted search depth.
pub const MAX_DEPTH: i32 = 8;

/// Score multiplier for moves inside a sub-board already decided at the meta level.
pub const DECIDED_DAMPING: f64 = 0.2;

/// A tied candidate replaces the incumbent when a roll in `0..TIE_ROLL`
/// lands below `TIE_REPLACE`.
pub const TIE_ROLL: u32 = 3;
pub const TIE_REPLACE: u32 = 2;

/// Minimum wall-clock time between a computer move request and its commit.
pub const DEFAULT_PACING_MS: u64 = 750;

// =============================================================================
// Default Local (Sub-board) Weights
// =============================================================================

pub const LOCAL_BASE_SCORE: i64 = 1;
pub const LOCAL_PAIR_BONUS: i64 = 3;
pub const LOCAL_PAIR_RATIO: f64 = 0.8;
pub const LOCAL_TRIPLE_BONUS: i64 = 12;
pub const LOCAL_TRIPLE_RATIO: f64 = 0.2;

// =============================================================================
// Default Meta-board Weights
// =============================================================================

pub const META_BASE_SCORE: i64 = 15;
pub const META_PAIR_BONUS: i64 = 45;
pub const META_PAIR_RATIO: f64 = 0.8;
pub const META_TRIPLE_BONUS: i64 = 2048;
pub const META_TRIPLE_RATIO: f64 = 0.2;

// =============================================================================
// Default Positional Weights (shared by both levels)
// =============================================================================

pub const CORNER_WEIGHT: f64 = 1.0;
pub const SIDE_WEIGHT: f64 = 0.95;
pub const CENTER_WEIGHT: f64 = 0.9;

/// Fraction of the opponent's best reply subtracted from a candidate's score.
pub const OPPONENT_WEIGHT: f64 = 0.9;

// =============================================================================
// Piece Symbols
// =============================================================================

pub const SYMBOL_COMPUTER: char = 'X';
pub const SYMBOL_PLAYER: char = 'O';
pub const SYMBOL_EMPTY: char = '.';
