//! [`Bitboard`]-based representation for [`crate::chess::position::Position`].
//! Bitboard utilizes the fact that modern processors operate on 64 bit
//! integers, and the bit operations can be performed simultaneously. This
//! results in very efficient calculation of possible attack vectors. The
//! disadvantage is inefficiency of some operations like "get piece type on
//! given square" (efficiently handled by Square-centric board
//! implementations).
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::Write;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub};
use std::{fmt, mem};

use itertools::Itertools;

use crate::chess::core::{
    File, Piece, PieceKind, Player, Rank, Square, BOARD_WIDTH,
};

/// Represents a set of squares and provides common operations (e.g. AND, OR)
/// over these sets. Each bit corresponds to one of 64 squares of the chess
/// board.
///
/// Mirroring [`Square`] semantics, the least significant
/// bit corresponds to A1, and the most significant bit - to H8.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Squares of the same color as A1.
    pub const DARK_SQUARES: Self = Self::from_bits(0xAA55_AA55_AA55_AA55);
    /// Squares of the same color as H1.
    pub const LIGHT_SQUARES: Self = Self::from_bits(!0xAA55_AA55_AA55_AA55);

    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Constructs a bitboard representing the universal set, it contains all
    /// squares by setting all bits to binary one.
    #[must_use]
    pub const fn full() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[must_use]
    pub(super) fn from_squares(squares: &[Square]) -> Self {
        squares
            .iter()
            .fold(Self::empty(), |result, square| result | Self::from(*square))
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    #[must_use]
    pub(super) const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    #[must_use]
    pub(super) const fn has_any(self) -> bool {
        self.bits != 0
    }

    #[must_use]
    pub(super) const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub(super) fn extend(&mut self, square: Square) {
        self.bits |= 1u64 << square as u8;
    }

    pub(super) fn clear(&mut self, square: Square) {
        self.bits &= !(1u64 << square as u8);
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub(super) const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Returns a pre-calculated bitboard mask with 1s set for squares of the
    /// given rank.
    #[must_use]
    pub(super) const fn rank_mask(rank: Rank) -> Self {
        Self::from_bits(0xFF << (rank as u8 * BOARD_WIDTH))
    }
}

impl fmt::Debug for Bitboard {
    /// Prints the set as an 8x8 grid from Black's side of the board ('1' for
    /// set squares, '.' otherwise).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = Rank::iter()
            .rev()
            .map(|rank| {
                File::iter()
                    .map(|file| {
                        if self.contains(Square::new(file, rank)) {
                            '1'
                        } else {
                            '.'
                        }
                    })
                    .join(SQUARE_SEPARATOR)
            })
            .join(LINE_SEPARATOR);
        f.write_str(&grid)
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitor(rhs.bits))
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits.bitor_assign(rhs.bits);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitand(rhs.bits))
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// Relative complement of the given bitboard in the current one.
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns complement bitboard.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub(super) struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        // trailing_zeros() of a non-zero u64 is within 0..64.
        Some(unsafe { mem::transmute::<u8, Square>(next_index as u8) })
    }
}

/// Piece-centric representation of all material owned by one player. Uses
/// [Bitboard] to store a set of squares occupied by each piece. The main user
/// is [`crate::chess::position::Position`], [Bitboard] is not very useful on
/// its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(super) struct PieceSet {
    pub(super) king: Bitboard,
    pub(super) queens: Bitboard,
    pub(super) rooks: Bitboard,
    pub(super) bishops: Bitboard,
    pub(super) knights: Bitboard,
    pub(super) pawns: Bitboard,
}

impl PieceSet {
    pub(super) const fn empty() -> Self {
        Self {
            king: Bitboard::empty(),
            queens: Bitboard::empty(),
            rooks: Bitboard::empty(),
            bishops: Bitboard::empty(),
            knights: Bitboard::empty(),
            pawns: Bitboard::empty(),
        }
    }

    pub(super) fn all(self) -> Bitboard {
        self.king | self.queens | self.rooks | self.bishops | self.knights | self.pawns
    }

    pub(super) const fn bitboard_for(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queens,
            PieceKind::Rook => self.rooks,
            PieceKind::Bishop => self.bishops,
            PieceKind::Knight => self.knights,
            PieceKind::Pawn => self.pawns,
        }
    }

    pub(super) fn bitboard_for_mut(&mut self, kind: PieceKind) -> &mut Bitboard {
        match kind {
            PieceKind::King => &mut self.king,
            PieceKind::Queen => &mut self.queens,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Pawn => &mut self.pawns,
        }
    }

    pub(super) fn at(&self, square: Square) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.bitboard_for(*kind).contains(square))
    }

    /// Pairs of piece kind and the squares occupied by it.
    pub(super) fn iter(&self) -> impl Iterator<Item = (PieceKind, Bitboard)> + '_ {
        PieceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.bitboard_for(kind)))
    }
}

/// Piece-centric implementation of the chess board: the placement part of a
/// [`crate::chess::position::Position`]. At most one piece stands on each
/// square.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(super) white_pieces: PieceSet,
    pub(super) black_pieces: PieceSet,
}

impl Board {
    #[must_use]
    pub(super) fn starting() -> Self {
        let mut board = Self::empty();
        let backrank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(backrank) {
                board.put(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
                board.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Constructs an empty Board to be filled by the position builder.
    #[must_use]
    pub(super) const fn empty() -> Self {
        Self {
            white_pieces: PieceSet::empty(),
            black_pieces: PieceSet::empty(),
        }
    }

    #[must_use]
    pub(super) const fn player_pieces(&self, player: Player) -> &PieceSet {
        match player {
            Player::White => &self.white_pieces,
            Player::Black => &self.black_pieces,
        }
    }

    pub(super) fn player_pieces_mut(&mut self, player: Player) -> &mut PieceSet {
        match player {
            Player::White => &mut self.white_pieces,
            Player::Black => &mut self.black_pieces,
        }
    }

    /// All occupied squares.
    #[must_use]
    pub fn occupancy(&self) -> Bitboard {
        self.white_pieces.all() | self.black_pieces.all()
    }

    /// The piece standing on the given square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        for player in [Player::White, Player::Black] {
            if let Some(kind) = self.player_pieces(player).at(square) {
                return Some(Piece::new(player, kind));
            }
        }
        None
    }

    /// Takes the piece off the square and returns it.
    pub(super) fn remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.at(square)?;
        self.player_pieces_mut(piece.owner)
            .bitboard_for_mut(piece.kind)
            .clear(square);
        Some(piece)
    }

    /// Places a piece on an empty square.
    pub(super) fn put(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.at(square).is_none(), "{square} is occupied");
        self.player_pieces_mut(piece.owner)
            .bitboard_for_mut(piece.kind)
            .extend(square);
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0u8;
            for file in File::iter() {
                if let Some(piece) = self.at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_str(SQUARE_SEPARATOR)?;
                }
            }
            if rank != Rank::One {
                f.write_str(LINE_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
