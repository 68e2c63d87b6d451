use crate::chess::core::{Move, Piece, Player, Square};
use crate::chess::game::Game;

/// Standard chess rules the variant is built upon: legal moves, move
/// classification, standard move application and notation. The variant
/// applier consults it for everything except the mutual destruction itself.
pub trait Rules {
    /// Legal moves under the standard rules.
    fn legal_moves(&self, game: &Game) -> Vec<Move>;

    /// Returns true for captures, including en passant.
    fn is_capture(&self, game: &Game, next_move: Move) -> bool;

    #[allow(missing_docs)]
    fn is_en_passant(&self, game: &Game, next_move: Move) -> bool;

    #[allow(missing_docs)]
    fn piece_at(&self, game: &Game, square: Square) -> Option<Piece>;

    #[allow(missing_docs)]
    fn side_to_move(&self, game: &Game) -> Player;

    /// An independent copy of the game to try a move on.
    fn snapshot(&self, game: &Game) -> Game {
        game.clone()
    }

    /// Plays the move according to the standard rules, passes the turn and
    /// records the move in the history.
    fn apply_standard(&self, game: &mut Game, next_move: Move);

    /// Returns true if the side to move is in check.
    fn is_check(&self, game: &Game) -> bool;

    #[allow(missing_docs)]
    fn is_game_over(&self, game: &Game) -> bool;

    /// Result in PGN notation ("1-0", "0-1", "1/2-1/2" or "*").
    fn result(&self, game: &Game) -> String;

    /// Parses a move written in SAN.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed, illegal or ambiguous moves.
    fn parse_notation(&self, game: &Game, text: &str) -> anyhow::Result<Move>;

    /// Writes a legal move in SAN.
    fn format_notation(&self, game: &Game, next_move: Move) -> String;
}

/// [`Rules`] backed by [`crate::chess`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardRules;

impl Rules for StandardRules {
    fn legal_moves(&self, game: &Game) -> Vec<Move> {
        game.legal_moves()
    }

    fn is_capture(&self, game: &Game, next_move: Move) -> bool {
        game.position().is_capture(next_move)
    }

    fn is_en_passant(&self, game: &Game, next_move: Move) -> bool {
        game.position().is_en_passant(next_move)
    }

    fn piece_at(&self, game: &Game, square: Square) -> Option<Piece> {
        game.position().at(square)
    }

    fn side_to_move(&self, game: &Game) -> Player {
        game.position().side_to_move()
    }

    fn apply_standard(&self, game: &mut Game, next_move: Move) {
        game.push(next_move);
    }

    fn is_check(&self, game: &Game) -> bool {
        game.position().in_check()
    }

    fn is_game_over(&self, game: &Game) -> bool {
        game.is_game_over()
    }

    fn result(&self, game: &Game) -> String {
        game.result()
    }

    fn parse_notation(&self, game: &Game, text: &str) -> anyhow::Result<Move> {
        game.position().parse_san(text)
    }

    fn format_notation(&self, game: &Game, next_move: Move) -> String {
        game.position().san(next_move)
    }
}
