//! Complete game simulation.
//!
//! A playout plays a game from a position to its end. Each side is either a
//! uniformly random mover or the search engine at a fixed depth. Used by the
//! demo command and for checking that games always terminate.

use crate::board::Color;
use crate::position::{Move, Position};
use crate::search::Searcher;

/// How one side chooses its moves.
pub enum Mover {
    Random,
    Engine { searcher: Box<Searcher>, depth: i32 },
}

impl Mover {
    pub fn engine(searcher: Searcher, depth: i32) -> Self {
        Mover::Engine {
            searcher: Box::new(searcher),
            depth,
        }
    }

    fn choose(&mut self, pos: &Position, color: Color, rng: &mut fastrand::Rng) -> Option<Move> {
        match self {
            Mover::Random => random_move(pos, rng),
            Mover::Engine { searcher, depth } => searcher.search(pos, color, *depth).mv,
        }
    }
}

/// A uniformly random legal move for the side to move.
pub fn random_move(pos: &Position, rng: &mut fastrand::Rng) -> Option<Move> {
    let moves = pos.legal_moves();
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Result of a finished playout.
#[derive(Debug, Clone)]
pub struct Playout {
    pub winner: Option<Color>,
    pub moves: Vec<Move>,
}

/// Play `pos` to the end, `computer` and `player` choosing for their sides.
///
/// Stops early if a mover has nothing to offer.
pub fn play_out(
    pos: &mut Position,
    computer: &mut Mover,
    player: &mut Mover,
    rng: &mut fastrand::Rng,
) -> Playout {
    let mut moves = Vec::new();
    while pos.winner.is_none() {
        let color = pos.turn;
        let mover = match color {
            Color::Computer => &mut *computer,
            Color::Player => &mut *player,
        };
        let Some(mv) = mover.choose(pos, color, rng) else {
            break;
        };
        if let Err(e) = pos.play(mv.sub_board, mv.i, mv.j, color) {
            log::warn!("{color} chose illegal move {mv}: {e}");
            break;
        }
        moves.push(mv);
    }
    Playout {
        winner: pos.winner,
        moves,
    }
}
