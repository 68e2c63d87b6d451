use crate::chess::core::{Move, Square};

/// Reasons [`crate::variant::MoveApplier::apply`] rejects a move. The game is
/// left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The move is not legal under the standard rules.
    #[error("illegal move: {next_move}")]
    IllegalMove {
        #[allow(missing_docs)]
        next_move: Move,
    },

    /// A capture was reported but there is no piece on the source square.
    #[error("no capturing piece found at {square}")]
    InvalidState {
        /// Source square of the move.
        square: Square,
    },

    /// The captured square is empty or holds a King.
    #[error("invalid capture at {square}")]
    InvalidCapture {
        /// Square of the captured piece.
        square: Square,
    },

    /// The move leaves the side that made it in check.
    #[error("move leaves your king in check")]
    SelfCheck,
}
