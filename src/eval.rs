//! Heuristic move scoring.
//!
//! A move is scored in two layers:
//! - Local: a base score plus diminishing rewards for the new pairs and
//!   triples it creates in its sub-board.
//! - Meta: when the move wins its sub-board, the same kind of reward is
//!   computed on the meta board with the meta weights and added on top.
//!
//! Scores are integers; every multiplication by a float weight truncates
//! toward zero.

use crate::board::{Cell, Color, SubBoard};
use crate::config::ScoringConfig;
use crate::constants::DECIDED_DAMPING;
use crate::position::meta_coords;

/// Pair and triple counts of one color on a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternCounts {
    pub pairs: usize,
    pub triples: usize,
}

impl PatternCounts {
    pub fn of(board: &SubBoard, c: Color) -> Self {
        Self {
            pairs: board.has(2, c),
            triples: board.has(3, c),
        }
    }

    /// Patterns gained since `before`; losses count as zero.
    pub fn gained_since(&self, before: PatternCounts) -> PatternCounts {
        PatternCounts {
            pairs: self.pairs.saturating_sub(before.pairs),
            triples: self.triples.saturating_sub(before.triples),
        }
    }
}

/// Positional multiplier of a cell: center, side or corner.
pub fn position_weight(config: &ScoringConfig, i: usize, j: usize) -> f64 {
    match (i == 1, j == 1) {
        (true, true) => config.center_weight,
        (true, false) | (false, true) => config.side_weight,
        (false, false) => config.corner_weight,
    }
}

/// `sum(floor(base * ratio^k) for k in 0..count)`.
pub fn geometric_bonus(base: i64, count: usize, ratio: f64) -> i64 {
    let mut t = 1.0;
    let mut sum = 0;
    for _ in 0..count {
        sum += (base as f64 * t).floor() as i64;
        t *= ratio;
    }
    sum
}

/// Multiply a score by a float weight, truncating toward zero.
#[inline]
pub fn scale(score: i64, factor: f64) -> i64 {
    (score as f64 * factor) as i64
}

/// Reward for gaining `gained` patterns at one level.
fn pattern_bonus(config: &ScoringConfig, gained: PatternCounts) -> i64 {
    geometric_bonus(config.pair_bonus, gained.pairs, config.pair_ratio)
        + geometric_bonus(config.triple_bonus, gained.triples, config.triple_ratio)
}

/// Score for a move of `c` just placed in sub-board `k`.
///
/// `board` already contains the move; `local_before` and `meta_before` are the
/// pattern counts of `c` before it. The meta board itself is not modified.
/// The result excludes the opponent penalty and the local position weight,
/// both of which the search applies.
#[allow(clippy::too_many_arguments)]
pub fn move_score(
    local: &ScoringConfig,
    meta_config: &ScoringConfig,
    board: &SubBoard,
    meta: &SubBoard,
    k: usize,
    c: Color,
    local_before: PatternCounts,
    meta_before: PatternCounts,
) -> i64 {
    let (mi, mj) = meta_coords(k);
    let decided = meta.at(mi, mj) != Cell::Empty;
    let after = PatternCounts::of(board, c);

    let mut score = local.base_score;
    if after.triples > 0 && !decided {
        score += meta_score(meta_config, meta, mi, mj, c, meta_before);
    }
    if !decided {
        score += pattern_bonus(local, after.gained_since(local_before));
    }
    if decided {
        score = scale(score, DECIDED_DAMPING);
    }
    score
}

/// Value of winning the sub-board at meta cell `(mi, mj)` for `c`.
fn meta_score(
    config: &ScoringConfig,
    meta: &SubBoard,
    mi: usize,
    mj: usize,
    c: Color,
    before: PatternCounts,
) -> i64 {
    let mut simulated = *meta;
    if !simulated.set_chess(mi, mj, c) {
        return 0;
    }
    let gained = PatternCounts::of(&simulated, c).gained_since(before);
    let score = config.base_score + pattern_bonus(config, gained);
    scale(score, position_weight(config, mi, mj))
}
