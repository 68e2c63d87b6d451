//! A game of chess: the current [`Position`] together with the history of
//! standard moves that led to it. The history is needed for the repetition
//! rules.

use std::fmt;

use crate::chess::core::{Move, Player};
use crate::chess::position::Position;

/// The reason the game has ended.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    /// 75 moves (150 plies) without a capture or pawn move.
    SeventyFiveMoves,
    /// The same position occurred five times.
    FivefoldRepetition,
}

/// Final state of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    #[allow(missing_docs)]
    pub termination: Termination,
    /// [`None`] for draws.
    pub winner: Option<Player>,
}

impl fmt::Display for Outcome {
    /// Prints the result in PGN notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.winner {
            Some(Player::White) => "1-0",
            Some(Player::Black) => "0-1",
            None => "1/2-1/2",
        })
    }
}

/// Current position and the stack of standard moves played from the initial
/// position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    position: Position,
    /// Positions before each of the moves, in the same order.
    history: Vec<Position>,
    moves: Vec<Move>,
}

impl Game {
    /// Starts the game from the given position.
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            history: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// Starts the game from the standard starting position.
    #[must_use]
    pub fn starting() -> Self {
        Self::new(Position::starting())
    }

    /// Starts the game from a position in FEN (or EPD).
    ///
    /// # Errors
    ///
    /// Returns the parsing error of [`Position::try_from`].
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        Ok(Self::new(Position::try_from(fen)?))
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    pub(crate) fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// Standard moves played so far, oldest first.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.generate_moves()
    }

    /// Plays the move according to the standard rules and records it.
    pub fn push(&mut self, next_move: Move) {
        self.history.push(self.position.clone());
        self.moves.push(next_move);
        self.position.make_move(next_move);
    }

    /// Number of times the current position occurred in the game, including
    /// the current one.
    fn repetitions(&self) -> usize {
        1 + self
            .history
            .iter()
            .filter(|previous| previous.is_repetition_of(&self.position))
            .count()
    }

    /// Returns the outcome if the game is over under the automatic rules:
    /// checkmate, insufficient material on both sides, stalemate, the
    /// seventy-five-move rule or fivefold repetition (checked in this order).
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        let has_moves = !self.legal_moves().is_empty();
        let termination = if !has_moves && self.position.in_check() {
            return Some(Outcome {
                termination: Termination::Checkmate,
                winner: Some(self.position.side_to_move().opponent()),
            });
        } else if self.position.has_insufficient_material(Player::White)
            && self.position.has_insufficient_material(Player::Black)
        {
            Termination::InsufficientMaterial
        } else if !has_moves {
            Termination::Stalemate
        } else if self.position.halfmove_clock() >= 150 {
            Termination::SeventyFiveMoves
        } else if self.repetitions() >= 5 {
            Termination::FivefoldRepetition
        } else {
            return None;
        };
        Some(Outcome {
            termination,
            winner: None,
        })
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Result of the game in PGN notation: "1-0", "0-1", "1/2-1/2" or "*" if
    /// the game is still going.
    #[must_use]
    pub fn result(&self) -> String {
        self.outcome()
            .map_or_else(|| "*".to_string(), |outcome| outcome.to_string())
    }

    /// Returns true if the side to move can claim a draw by the fifty-move
    /// rule or threefold repetition.
    #[must_use]
    pub fn can_claim_draw(&self) -> bool {
        self.position.halfmove_clock() >= 100 || self.repetitions() >= 3
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::starting()
    }
}
