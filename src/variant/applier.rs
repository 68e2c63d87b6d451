use std::fmt;

use log::{debug, trace, warn};

use crate::chess::core::{Move, Piece, PieceKind, Player, Square};
use crate::chess::game::Game;
use crate::variant::error::MoveError;
use crate::variant::rules::{Rules, StandardRules};
use crate::variant::value::value;

/// How a successfully applied move changed the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was played according to the standard rules.
    Normal,
    /// A lower-value piece captured a higher-value one and both left the
    /// board.
    MutualDestruction,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::MutualDestruction => "mutual",
        })
    }
}

/// Piece taken by a capture and the square it is taken from.
struct Capture {
    attacker: PieceKind,
    victim: Piece,
    square: Square,
}

/// Applies moves under the mutual destruction rules: when a piece captures a
/// piece of strictly higher value, both pieces are removed from the board.
/// Every other move is delegated to the standard [`Rules`].
///
/// ```
/// use chessworth::chess::game::Game;
/// use chessworth::variant::{MoveApplier, MoveOutcome, Rules};
///
/// let applier: MoveApplier = MoveApplier::default();
/// let mut game = Game::starting();
/// for san in ["Nc3", "e6", "Ne4", "Qg5"] {
///     let next_move = applier.rules().parse_notation(&game, san).unwrap();
///     assert_eq!(applier.apply(&mut game, next_move), Ok(MoveOutcome::Normal));
/// }
/// let knight_takes_queen = applier.rules().parse_notation(&game, "Nxg5").unwrap();
/// assert_eq!(
///     applier.apply(&mut game, knight_takes_queen),
///     Ok(MoveOutcome::MutualDestruction)
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct MoveApplier<R: Rules = StandardRules> {
    rules: R,
}

impl<R: Rules> MoveApplier<R> {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(rules: R) -> Self {
        Self { rules }
    }

    /// Rules used for legality, classification and standard moves.
    #[must_use]
    pub const fn rules(&self) -> &R {
        &self.rules
    }

    /// Validates and plays the move.
    ///
    /// A capture where the capturing piece is worth strictly less than the
    /// captured one removes both pieces, passes the turn, resets the halfmove
    /// clock and the en passant square and advances the fullmove counter after
    /// Black's move. Castling rights and the move history stay as they are.
    /// A promoting pawn is valued as the promotion piece.
    ///
    /// Any other move is played through [`Rules::apply_standard`] after trying
    /// it on a snapshot of the game first.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] and leaves the game untouched if the move is
    /// illegal, the capture can not be resolved, a King would be captured or
    /// the move fails the check test on the snapshot.
    pub fn apply(&self, game: &mut Game, next_move: Move) -> Result<MoveOutcome, MoveError> {
        if !self.rules.legal_moves(game).contains(&next_move) {
            return Err(MoveError::IllegalMove { next_move });
        }
        if self.rules.is_capture(game, next_move) {
            let capture = self.resolve_capture(game, next_move)?;
            trace!(
                "{next_move}: {:?} ({}) takes {:?} ({}) on {}",
                capture.attacker,
                value(capture.attacker),
                capture.victim.kind,
                value(capture.victim.kind),
                capture.square
            );
            if value(capture.attacker) < value(capture.victim.kind) {
                self.destroy_both(game, next_move.from(), capture.square);
                debug!("{next_move}: mutual destruction");
                return Ok(MoveOutcome::MutualDestruction);
            }
        }
        self.apply_normal(game, next_move)
    }

    fn resolve_capture(&self, game: &Game, next_move: Move) -> Result<Capture, MoveError> {
        let Some(piece) = self.rules.piece_at(game, next_move.from()) else {
            warn!("{next_move} is a capture without a piece on the source square");
            return Err(MoveError::InvalidState {
                square: next_move.from(),
            });
        };
        let attacker = next_move.promotion().map_or(piece.kind, PieceKind::from);
        let opponent = self.rules.side_to_move(game).opponent();
        let (square, victim) = if self.rules.is_en_passant(game, next_move) {
            // The pawn that is taken en passant stands one rank closer to the
            // capturing side.
            let square = next_move
                .to()
                .shift(opponent.push_direction())
                .ok_or(MoveError::InvalidCapture {
                    square: next_move.to(),
                })?;
            (square, Some(Piece::new(opponent, PieceKind::Pawn)))
        } else {
            (next_move.to(), self.rules.piece_at(game, next_move.to()))
        };
        match victim {
            Some(victim) if victim.kind != PieceKind::King => Ok(Capture {
                attacker,
                victim,
                square,
            }),
            _ => {
                warn!("{next_move} captures {victim:?} on {square}");
                Err(MoveError::InvalidCapture { square })
            },
        }
    }

    fn destroy_both(&self, game: &mut Game, from: Square, captured: Square) {
        let next_player = self.rules.side_to_move(game).opponent();
        let position = game.position_mut();
        let _ = position.remove_piece(from);
        let _ = position.remove_piece(captured);
        position.set_side_to_move(next_player);
        position.reset_halfmove_clock();
        position.clear_en_passant_square();
        if next_player == Player::White {
            position.increment_fullmove_counter();
        }
    }

    fn apply_normal(&self, game: &mut Game, next_move: Move) -> Result<MoveOutcome, MoveError> {
        let mover = self.rules.side_to_move(game);
        {
            let mut snapshot = self.rules.snapshot(game);
            self.rules.apply_standard(&mut snapshot, next_move);
            // The side to move only matches the mover if the standard rules
            // did not pass the turn.
            if self.rules.is_check(&snapshot) && self.rules.side_to_move(&snapshot) == mover {
                debug!("{next_move}: rejected, {mover:?} is left in check");
                return Err(MoveError::SelfCheck);
            }
        }
        self.rules.apply_standard(game, next_move);
        debug!("{next_move}: normal");
        Ok(MoveOutcome::Normal)
    }
}
