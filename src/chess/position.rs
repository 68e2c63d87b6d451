//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! The core of Move Generator and move making is also implemented here as a way
//! to produce ways of mutating [`Position`].
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::chess::attacks;
use crate::chess::bitboard::{Bitboard, Board, PieceSet};
use crate::chess::core::{
    CastleRights,
    File,
    Move,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
    BOARD_WIDTH,
};

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD support exists for compatibility with databases
/// which provide trimmed FEN lines (all FEN parts except Halfmove Clock and
/// Fullmove Counter).
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
}

/// Squares involved in castling to one side.
struct Castle {
    right: CastleRights,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    /// Squares that have to be empty.
    path: &'static [Square],
    /// Squares the king passes through, excluding the origin.
    king_walk: [Square; 2],
}

const CASTLES: [Castle; 4] = [
    Castle {
        right: CastleRights::WHITE_SHORT,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        path: &[Square::F1, Square::G1],
        king_walk: [Square::F1, Square::G1],
    },
    Castle {
        right: CastleRights::WHITE_LONG,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        path: &[Square::B1, Square::C1, Square::D1],
        king_walk: [Square::D1, Square::C1],
    },
    Castle {
        right: CastleRights::BLACK_SHORT,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        path: &[Square::F8, Square::G8],
        king_walk: [Square::F8, Square::G8],
    },
    Castle {
        right: CastleRights::BLACK_LONG,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        path: &[Square::B8, Square::C8, Square::D8],
        king_walk: [Square::D8, Square::C8],
    },
];

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use chessworth::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            ..Self::empty()
        }
    }

    // Creates an empty board to be filled by parser.
    const fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    pub(super) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn they(&self) -> Player {
        self.us().opponent()
    }

    pub(super) const fn pieces(&self, player: Player) -> &PieceSet {
        self.board.player_pieces(player)
    }

    fn occupancy(&self, player: Player) -> Bitboard {
        self.pieces(player).all()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The piece standing on the given square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn can capture en passant on. It is set after every
    /// double pawn push, regardless of whether a capture is possible.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Starts at 1 and is incremented after every Black move.
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter.get()
    }

    /// Returns true if the king of the side to move is attacked. A position
    /// without the king is never in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_king_attacked(self.us())
    }

    fn is_king_attacked(&self, player: Player) -> bool {
        self.pieces(player)
            .king
            .iter()
            .any(|king| attacks::is_attacked(&self.board, king, player.opponent()))
    }

    /// Returns true if the move captures a piece (including en passant).
    #[must_use]
    pub fn is_capture(&self, next_move: Move) -> bool {
        self.occupancy(self.they()).contains(next_move.to) || self.is_en_passant(next_move)
    }

    /// Returns true if the move is a pawn capturing en passant.
    #[must_use]
    pub fn is_en_passant(&self, next_move: Move) -> bool {
        self.en_passant_square == Some(next_move.to)
            && self.pieces(self.us()).pawns.contains(next_move.from)
            && next_move.from.file() != next_move.to.file()
            && !self.board.occupancy().contains(next_move.to)
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave our
    /// king in check).
    ///
    /// Candidate moves are generated per piece and each one is tried on a copy
    /// of the position. Castling is checked separately because it has its own
    /// attack conditions.
    #[must_use]
    pub fn generate_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(50);
        self.generate_pseudo_legal_moves(&mut moves);
        moves.retain(|candidate| self.keeps_king_safe(*candidate));
        self.generate_castles(&mut moves);
        moves
    }

    fn keeps_king_safe(&self, next_move: Move) -> bool {
        let mut next = self.clone();
        next.make_move(next_move);
        !next.is_king_attacked(self.us())
    }

    fn generate_pseudo_legal_moves(&self, moves: &mut Vec<Move>) {
        let ours = self.occupancy(self.us());
        let occupied = self.board.occupancy();
        for (kind, bitboard) in self.pieces(self.us()).iter() {
            for from in bitboard.iter() {
                let targets = match kind {
                    PieceKind::Pawn => {
                        self.generate_pawn_moves(from, moves);
                        continue;
                    },
                    PieceKind::King => attacks::king_attacks(from),
                    PieceKind::Queen => attacks::queen_attacks(from, occupied),
                    PieceKind::Rook => attacks::rook_attacks(from, occupied),
                    PieceKind::Bishop => attacks::bishop_attacks(from, occupied),
                    PieceKind::Knight => attacks::knight_attacks(from),
                } - ours;
                moves.extend(targets.iter().map(|to| Move::new(from, to, None)));
            }
        }
    }

    fn generate_pawn_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let occupied = self.board.occupancy();
        let mut add_pawn_move = |to: Square| {
            if to.rank() == Rank::backrank(self.they()) {
                moves.extend(
                    Promotion::ALL
                        .into_iter()
                        .map(|promotion| Move::new(from, to, Some(promotion))),
                );
            } else {
                moves.push(Move::new(from, to, None));
            }
        };
        let push_direction = self.us().push_direction();
        if let Some(to) = from.shift(push_direction) {
            if !occupied.contains(to) {
                add_pawn_move(to);
                // Double pawn pushes are never promoting.
                if from.rank() == Rank::pawns_starting(self.us()) {
                    if let Some(double) = to.shift(push_direction) {
                        if !occupied.contains(double) {
                            add_pawn_move(double);
                        }
                    }
                }
            }
        }
        let theirs = self.occupancy(self.they());
        for to in attacks::pawn_attacks(from, self.us()).iter() {
            if theirs.contains(to) || self.can_capture_en_passant_on(to) {
                add_pawn_move(to);
            }
        }
    }

    fn can_capture_en_passant_on(&self, to: Square) -> bool {
        self.en_passant_square == Some(to)
            && to
                .shift(self.they().push_direction())
                .is_some_and(|pushed| self.pieces(self.they()).pawns.contains(pushed))
    }

    fn generate_castles(&self, moves: &mut Vec<Move>) {
        if self.in_check() {
            return;
        }
        let ours = self.pieces(self.us());
        let occupied = self.board.occupancy();
        for castle in &CASTLES {
            if !self.castling.contains(castle.right)
                || !CastleRights::both(self.us()).contains(castle.right)
                || !ours.king.contains(castle.king_from)
                || !ours.rooks.contains(castle.rook_from)
                || castle.path.iter().any(|square| occupied.contains(*square))
                || castle
                    .king_walk
                    .iter()
                    .any(|square| attacks::is_attacked(&self.board, *square, self.they()))
            {
                continue;
            }
            moves.push(Move::new(castle.king_from, castle.king_to, None));
        }
    }

    /// Applies the move according to the standard rules: moves the piece,
    /// handles captures, en passant, promotion and castling, updates castling
    /// rights, en passant square and the move counters and passes the turn.
    ///
    /// The move is expected to be legal (e.g. coming from
    /// [`Position::generate_moves`]), an empty source square leaves the
    /// position untouched.
    pub fn make_move(&mut self, next_move: Move) {
        let (us, they) = (self.us(), self.they());
        let Move {
            from,
            to,
            promotion,
        } = next_move;
        let is_en_passant = self.is_en_passant(next_move);
        debug_assert!(self.board.at(from).is_some(), "no piece to move at {from}");
        let Some(piece) = self.board.remove(from) else {
            return;
        };
        let mut captured = self.board.remove(to);
        if is_en_passant {
            captured = to
                .shift(they.push_direction())
                .and_then(|pushed| self.board.remove(pushed));
        }
        if piece.kind == PieceKind::King
            && from.rank() == to.rank()
            && (from.file() as u8).abs_diff(to.file() as u8) == 2
        {
            let (rook_from, rook_to) = if to.file() == File::G {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            if let Some(rook) = self.board.remove(Square::new(rook_from, from.rank())) {
                self.board.put(Square::new(rook_to, from.rank()), rook);
            }
        }
        let placed = match promotion {
            Some(promotion) => Piece::new(us, promotion.into()),
            None => piece,
        };
        self.board.put(to, placed);

        if piece.kind == PieceKind::King {
            self.castling.remove(CastleRights::both(us));
        }
        self.castling.remove(CastleRights::for_rook_square(from));
        self.castling.remove(CastleRights::for_rook_square(to));

        self.en_passant_square =
            if piece.kind == PieceKind::Pawn && (from as u8).abs_diff(to as u8) == 2 * BOARD_WIDTH {
                from.shift(us.push_direction())
            } else {
                None
            };
        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Player::Black {
            self.increment_fullmove_counter();
        }
        self.side_to_move = they;
    }

    /// Takes the piece off the board without any other bookkeeping.
    pub(crate) fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.board.remove(square)
    }

    pub(crate) fn set_side_to_move(&mut self, player: Player) {
        self.side_to_move = player;
    }

    pub(crate) fn reset_halfmove_clock(&mut self) {
        self.halfmove_clock = 0;
    }

    pub(crate) fn clear_en_passant_square(&mut self) {
        self.en_passant_square = None;
    }

    pub(crate) fn increment_fullmove_counter(&mut self) {
        self.fullmove_counter = self.fullmove_counter.saturating_add(1);
    }

    /// Returns true if the player can not possibly deliver a checkmate with
    /// the remaining material.
    ///
    /// - Any pawn, rook or queen is sufficient.
    /// - A knight is insufficient if it is the only piece besides the king
    ///   and the opponent has nothing but the king and queens.
    /// - Bishops are insufficient if all bishops on the board stand on the
    ///   same square color and there are no knights or pawns.
    #[must_use]
    pub fn has_insufficient_material(&self, player: Player) -> bool {
        let ours = self.pieces(player);
        let theirs = self.pieces(player.opponent());
        if (ours.pawns | ours.rooks | ours.queens).has_any() {
            return false;
        }
        if ours.knights.has_any() {
            return ours.all().count() <= 2 && (theirs.all() - theirs.king - theirs.queens).is_empty();
        }
        if ours.bishops.has_any() {
            let bishops = ours.bishops | theirs.bishops;
            let same_color = (bishops & Bitboard::DARK_SQUARES).is_empty()
                || (bishops & Bitboard::LIGHT_SQUARES).is_empty();
            return same_color && (ours.knights | theirs.knights | theirs.pawns).is_empty();
        }
        true
    }

    /// Compares everything that identifies a position for the repetition
    /// rules: placement, side to move, castling rights and the en passant
    /// square if a capture en passant is actually possible.
    pub(super) fn is_repetition_of(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.legal_en_passant_square() == other.legal_en_passant_square()
    }

    fn legal_en_passant_square(&self) -> Option<Square> {
        let square = self.en_passant_square?;
        self.generate_moves()
            .into_iter()
            .any(|candidate| candidate.to == square && self.is_en_passant(candidate))
            .then_some(square)
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or describes an impossible
    /// position (see [`Position::validate`]).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut rank_id = BOARD_WIDTH;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file > BOARD_WIDTH {
                    bail!("file exceeded {BOARD_WIDTH}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='9' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                let square = Square::new(File::try_from(file)?, rank);
                result.board.put(square, piece);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        // Halfmove clock and fullmove counter are omitted in EPD.
        if let Some(value) = parts.next() {
            if !value.bytes().all(|c| c.is_ascii_digit()) {
                bail!("halfmove clock can not contain anything other than digits");
            }
            result.halfmove_clock = value.parse::<u16>().with_context(|| {
                format!("incorrect FEN: halfmove clock can not be parsed {value}")
            })?;
            let Some(value) = parts.next() else {
                bail!("incorrect FEN: missing fullmove counter");
            };
            if !value.bytes().all(|c| c.is_ascii_digit()) {
                bail!("fullmove counter clock can not contain anything other than digits");
            }
            result.fullmove_counter = value.parse::<NonZeroU16>().with_context(|| {
                format!("incorrect FEN: fullmove counter can not be parsed {value}")
            })?;
            if parts.next().is_some() {
                bail!("trailing symbols are not allowed in FEN");
            }
        }
        result.validate()?;
        Ok(result)
    }

    /// Checks the constraints every position has to satisfy:
    ///
    /// - Exactly one king per side.
    /// - At most 8 pawns per side.
    /// - No pawns on the back ranks.
    /// - En passant square is on the 6th (3rd for Black to move) rank, empty,
    ///   with the opponent's pawn that was just pushed right in front of it.
    ///
    /// Checks are not validated: after a mutual destruction the side that is
    /// not to move can be left in check.
    fn validate(&self) -> anyhow::Result<()> {
        for (player, name) in [(Player::White, "white"), (Player::Black, "black")] {
            let pieces = self.pieces(player);
            if pieces.king.count() != 1 {
                bail!("expected 1 {name} king, got {}", pieces.king.count());
            }
            if pieces.pawns.count() > 8 {
                bail!("expected <= 8 {name} pawns, got {}", pieces.pawns.count());
            }
        }
        let pawns = self.pieces(Player::White).pawns | self.pieces(Player::Black).pawns;
        if (pawns & (Bitboard::rank_mask(Rank::One) | Bitboard::rank_mask(Rank::Eight))).has_any()
        {
            bail!("pawns can not be placed on backranks");
        }
        if let Some(en_passant_square) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if en_passant_square.rank() != expected_rank {
                bail!(
                    "expected en passant square to be on rank {expected_rank}, got {}",
                    en_passant_square.rank()
                );
            }
            // A pawn that was just pushed by our opponent should be in front of
            // en_passant_square.
            let pushed_pawn = en_passant_square.shift(self.they().push_direction());
            if self.board.occupancy().contains(en_passant_square)
                || !pushed_pawn.is_some_and(|pawn| self.pieces(self.they()).pawns.contains(pawn))
            {
                bail!("en passant square is not beyond pushed pawn");
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and strips the optional "fen " or "epd " prefix before
    /// parsing it with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped.trim_start());
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {self}")
    }
}

/// [Perft] (performance test) counts the leaf nodes of the move tree of the
/// given depth. The numbers are well known for many positions and are used to
/// verify move generation and move making.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .into_iter()
        .map(|next_move| {
            let mut next = position.clone();
            next.make_move(next_move);
            perft(&next, depth - 1)
        })
        .sum()
}
