//! Depth-bounded heuristic search for the next move.
//!
//! The search is two mutually recursive procedures:
//! - [`Searcher::best_move`] picks a sub-board (the active one, or any of the
//!   nine when the choice is free) and delegates to
//! - [`Searcher::best_cell`], which tries every empty cell, scores it with
//!   [`crate::eval`], and subtracts a fraction of the opponent's best reply
//!   searched one level shallower.
//!
//! Moves are applied to an exclusively-owned copy of the position and undone
//! before the next candidate is tried, so the caller's position is never
//! touched. Ties between equal scores are broken at random: a later candidate
//! replaces the incumbent two times out of three.

use std::time::Instant;

use crate::board::Color;
use crate::config::Scoring;
use crate::constants::{TIE_REPLACE, TIE_ROLL};
use crate::eval::{PatternCounts, move_score, position_weight, scale};
use crate::position::{Move, Position};

/// Outcome of a search: the chosen move (if any) and its score.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub mv: Option<Move>,
    pub score: i64,
}

impl SearchResult {
    fn none() -> Self {
        Self { mv: None, score: 0 }
    }
}

/// Running maximum with randomized tie-breaking.
#[derive(Debug)]
pub struct Incumbent<T> {
    best: Option<(i64, T)>,
}

impl<T> Default for Incumbent<T> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<T> Incumbent<T> {
    /// Offer a candidate. Returns true if it became the incumbent.
    pub fn offer(&mut self, score: i64, item: T, rng: &mut fastrand::Rng) -> bool {
        let replace = match &self.best {
            None => true,
            Some((best, _)) => {
                score > *best || (score == *best && rng.u32(0..TIE_ROLL) < TIE_REPLACE)
            }
        };
        if replace {
            self.best = Some((score, item));
        }
        replace
    }

    pub fn into_inner(self) -> Option<(i64, T)> {
        self.best
    }
}

/// Recursive move searcher.
pub struct Searcher {
    scoring: Scoring,
    rng: fastrand::Rng,
    /// Number of simulated moves in the current search
    pub nodes: u64,
}

impl Searcher {
    pub fn new(scoring: Scoring) -> Self {
        Self::with_rng(scoring, fastrand::Rng::new())
    }

    pub fn with_seed(scoring: Scoring, seed: u64) -> Self {
        Self::with_rng(scoring, fastrand::Rng::with_seed(seed))
    }

    pub fn with_rng(scoring: Scoring, rng: fastrand::Rng) -> Self {
        Self {
            scoring,
            rng,
            nodes: 0,
        }
    }

    /// Search `pos` for the best move of `color` at the given depth.
    ///
    /// Works on a private copy; `pos` is left exactly as it was.
    pub fn search(&mut self, pos: &Position, color: Color, depth: i32) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;
        let mut copy = pos.clone();
        let result = self.best_move(&mut copy, color, depth);
        log::debug!(
            "search depth={depth} color={color} nodes={} score={} move={:?} in {:?}",
            self.nodes,
            result.score,
            result.mv,
            start.elapsed()
        );
        result
    }

    /// Best move for `color` over the candidate sub-boards of `pos`.
    ///
    /// At depth 0 or below no move is chosen and the score is 0. A position
    /// without any empty candidate cell also scores 0.
    pub fn best_move(&mut self, pos: &mut Position, color: Color, depth: i32) -> SearchResult {
        if depth <= 0 {
            return SearchResult::none();
        }
        let boards: Vec<usize> = pos.candidate_boards().collect();
        let mut incumbent = Incumbent::default();
        for k in boards {
            if let Some((i, j, score)) = self.best_cell(pos, k, color, depth) {
                incumbent.offer(score, Move::new(k, i, j), &mut self.rng);
            }
        }
        match incumbent.into_inner() {
            Some((score, mv)) => SearchResult {
                mv: Some(mv),
                score,
            },
            None => SearchResult::none(),
        }
    }

    /// Best cell `(i, j, score)` for `color` in sub-board `k`, or `None` if
    /// the sub-board is full.
    pub fn best_cell(
        &mut self,
        pos: &mut Position,
        k: usize,
        color: Color,
        depth: i32,
    ) -> Option<(usize, usize, i64)> {
        let local = self.scoring.local;
        let meta = self.scoring.meta;
        let local_before = PatternCounts::of(&pos.boards[k], color);
        let meta_before = PatternCounts::of(&pos.meta, color);

        let cells: Vec<(usize, usize)> = pos.boards[k].empty_cells().collect();
        let mut incumbent = Incumbent::default();
        for (i, j) in cells {
            let Some(sim) = pos.simulate(Move::new(k, i, j), color) else {
                continue;
            };
            self.nodes += 1;

            let mut score = move_score(
                &local,
                &meta,
                &pos.boards[k],
                &pos.meta,
                k,
                color,
                local_before,
                meta_before,
            );
            let reply = self.best_move(pos, color.opponent(), depth - 1);
            score = (score as f64 - reply.score as f64 * local.opponent_weight) as i64;
            score = scale(score, position_weight(&local, i, j));

            pos.undo(sim);
            incumbent.offer(score, (i, j), &mut self.rng);
        }
        incumbent.into_inner().map(|(score, (i, j))| (i, j, score))
    }
}
