//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;
use std::ops::Not;

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::chess::bitboard::Bitboard;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Represents any kind of a legal chess move. A move is the only way to mutate
/// [`crate::chess::position::Position`] through the standard rules. The move
/// representation has one-to-one correspondence with the UCI move
/// representation: castling is encoded as the two-square king move (e.g.
/// `e1g1`) and promotions carry the target piece kind (e.g. `e7e8q`).
///
/// For a move to be serialized in Standard Algebraic Notation (SAN), it also
/// requires the [`crate::chess::position::Position`] it will be applied in,
/// see [`crate::chess::san`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub(super) from: Square,
    pub(super) to: Square,
    pub(super) promotion: Option<Promotion>,
}

impl Move {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// The square the moving piece leaves.
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    /// The square the moving piece lands on.
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn promotion(self) -> Option<Promotion> {
        self.promotion
    }

    /// Parses a move in [UCI format], e.g. `g1f3` or `b7b8q`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not 4 or 5 characters long or if the
    /// squares or the promotion piece can not be parsed.
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    pub fn from_uci(input: &str) -> anyhow::Result<Self> {
        if !input.is_ascii() || !(4..=5).contains(&input.len()) {
            bail!("UCI move should be 4 or 5 ASCII characters long, got '{input}'");
        }
        let from = Square::try_from(&input[0..2])
            .with_context(|| format!("parsing source square of '{input}'"))?;
        let to = Square::try_from(&input[2..4])
            .with_context(|| format!("parsing destination square of '{input}'"))?;
        let promotion = match input[4..].chars().next() {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        Ok(Self::new(from, to, promotion))
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use chessworth::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use chessworth::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// All 64 squares from A1 to H8.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_SIZE).map(|index| unsafe { mem::transmute::<u8, Self>(index) })
    }

    /// Moves the square by given number of files and ranks. Returns [`None`]
    /// if the result would land outside of the board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = (self.file() as u8).checked_add_signed(file_delta)?;
        let rank = (self.rank() as u8).checked_add_signed(rank_delta)?;
        Some(Self::new(File::try_from(file).ok()?, Rank::try_from(rank).ok()?))
    }

    /// Moves the square one step in the given direction.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        self.offset(file_delta, rank_delta)
    }

    /// Returns true for dark squares (A1 is dark).
    #[must_use]
    pub fn is_dark(self) -> bool {
        Bitboard::DARK_SQUARES.contains(self)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Files from A to H.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_WIDTH).map(|column| unsafe { mem::transmute::<u8, Self>(column) })
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// Ranks from One to Eight.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_WIDTH).map(|row| unsafe { mem::transmute::<u8, Self>(row) })
    }

    /// The rank pieces of the player start on.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank pawns of the player start on.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the pawns of this player advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Every piece kind, most valuable first.
    pub const ALL: [Self; 6] = [
        Self::King,
        Self::Queen,
        Self::Rook,
        Self::Bishop,
        Self::Knight,
        Self::Pawn,
    ];

    /// Lowercase FEN symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match Self::ALL.into_iter().find(|kind| kind.symbol() == symbol) {
            Some(kind) => Ok(kind),
            None => bail!("piece kind should be within \"kqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        match PieceKind::try_from(symbol.to_ascii_lowercase()) {
            Ok(kind) => Ok(Self { owner, kind }),
            Err(_) => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Piece {
    /// White pieces are printed as uppercase symbols, Black pieces are
    /// lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self.owner {
            Player::White => self.kind.symbol().to_ascii_uppercase(),
            Player::Black => self.kind.symbol(),
        })
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured, player loses ability to castle its corresponding
    /// side.
    ///
    /// The full rules are:
    ///
    /// - The king and the castling rook must not have previously moved.
    /// - No square from the king's initial square to its final square may be under
    ///   attack by an enemy piece.
    /// - All the squares between the king's initial and final squares
    ///   (including the final square), and all the squares between the castling
    ///   rook's initial and final squares (including the final square), must be
    ///   vacant except for the king and castling rook.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// Both castling rights of the given player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }

    /// The right that is lost when a piece leaves or arrives at the given
    /// square (i.e. the rook corners).
    #[must_use]
    pub const fn for_rook_square(square: Square) -> Self {
        match square {
            Square::A1 => Self::WHITE_LONG,
            Square::H1 => Self::WHITE_SHORT,
            Square::A8 => Self::BLACK_LONG,
            Square::H8 => Self::BLACK_SHORT,
            _ => Self::empty(),
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format. The user
    /// is responsible for providing valid input cleaned up from the actual FEN
    /// chunk.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if given pattern does not match
    ///
    /// [`CastleRights`] := `-` | (K)? (Q)? (k)? (q)?
    ///
    /// At least one of the letters has to be present and the order is fixed.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let order = [
            ('K', Self::WHITE_SHORT),
            ('Q', Self::WHITE_LONG),
            ('k', Self::BLACK_SHORT),
            ('q', Self::BLACK_LONG),
        ];
        let mut result = Self::empty();
        let mut remaining = order.iter();
        for symbol in input.chars() {
            match remaining.find(|(candidate, _)| *candidate == symbol) {
                Some((_, right)) => result |= *right,
                None => bail!("unknown castle rights: {input}"),
            }
        }
        if result.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Every promotion option, strongest first.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    /// Accepts both lowercase (UCI) and uppercase (SAN) symbols.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    pub(super) const DIAGONALS: [Self; 4] =
        [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];
    pub(super) const ORTHOGONALS: [Self; 4] = [Self::Up, Self::Right, Self::Left, Self::Down];

    /// (file, rank) step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn opposite(self) -> Self {
        match self {
            Self::UpLeft => Self::DownRight,
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::DownLeft => Self::UpRight,
            Self::Down => Self::Up,
            Self::DownRight => Self::UpLeft,
        }
    }
}

#[cfg(test)]
mod test {
    use std::mem::{size_of, size_of_val};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rank() {
        assert_eq!(
            ('1'..='9')
                .filter_map(|ch| Rank::try_from(ch).ok())
                .collect::<Vec<Rank>>(),
            Rank::iter().collect::<Vec<_>>()
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| Rank::try_from(idx).ok())
                .collect::<Vec<Rank>>(),
            vec![
                Rank::One,
                Rank::Two,
                Rank::Three,
                Rank::Four,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '9'")]
    fn rank_from_incorrect_char() {
        let _ = Rank::try_from('9').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '0'")]
    fn rank_from_incorrect_char_zero() {
        let _ = Rank::try_from('0').unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within 0..BOARD_WIDTH, got 8")]
    fn rank_from_incorrect_index() {
        let _ = Rank::try_from(BOARD_WIDTH).unwrap();
    }

    #[test]
    fn file() {
        assert_eq!(
            ('a'..='i')
                .filter_map(|ch| File::try_from(ch).ok())
                .collect::<Vec<File>>(),
            vec![
                File::A,
                File::B,
                File::C,
                File::D,
                File::E,
                File::F,
                File::G,
                File::H,
            ]
        );
        assert_eq!(
            (0..=BOARD_WIDTH)
                .filter_map(|idx| File::try_from(idx).ok())
                .collect::<Vec<File>>(),
            File::iter().collect::<Vec<_>>()
        );
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn file_from_incorrect_char() {
        let _ = File::try_from('i').unwrap();
    }

    #[test]
    fn square() {
        let squares: Vec<_> = [
            0u8,
            BOARD_SIZE - 1,
            BOARD_WIDTH - 1,
            BOARD_WIDTH,
            BOARD_WIDTH * 2 + 5,
            BOARD_SIZE,
        ]
        .iter()
        .filter_map(|square| Square::try_from(*square).ok())
        .collect();
        assert_eq!(
            squares,
            vec![Square::A1, Square::H8, Square::H1, Square::A2, Square::F3]
        );
        let squares: Vec<_> = [
            (File::B, Rank::Three),
            (File::F, Rank::Five),
            (File::H, Rank::Eight),
            (File::E, Rank::Four),
        ]
        .iter()
        .map(|(file, rank)| Square::new(*file, *rank))
        .collect();
        assert_eq!(
            squares,
            vec![Square::B3, Square::F5, Square::H8, Square::E4]
        );
        assert_eq!(Square::iter().count(), BOARD_SIZE as usize);
        assert_eq!(Square::iter().last(), Some(Square::H8));
    }

    #[test]
    fn square_parsing() {
        assert_eq!(Square::try_from("e4").unwrap(), Square::E4);
        assert_eq!(Square::try_from("h8").unwrap(), Square::H8);
        assert_eq!(Square::E4.to_string(), "e4");
        assert!(Square::try_from("e9").is_err());
        assert!(Square::try_from("i1").is_err());
        assert!(Square::try_from("e").is_err());
        assert!(Square::try_from("e44").is_err());
    }

    #[test]
    #[should_panic(expected = "square index should be in 0..BOARD_SIZE, got 64")]
    fn square_from_incorrect_index() {
        let _ = Square::try_from(BOARD_SIZE).unwrap();
    }

    #[test]
    fn primitive_size() {
        assert_eq!(size_of::<Square>(), 1);
        // Primitives will have small size thanks to the niche optimizations:
        // https://rust-lang.github.io/unsafe-code-guidelines/layout/enums.html#layout-of-a-data-carrying-enums-without-a-repr-annotation
        assert_eq!(size_of::<PieceKind>(), size_of::<Option<PieceKind>>());
        let square_to_pieces: [Option<PieceKind>; BOARD_SIZE as usize] =
            [None; BOARD_SIZE as usize];
        assert_eq!(size_of_val(&square_to_pieces), BOARD_SIZE as usize);
    }

    #[test]
    fn within_board_shift() {
        let square = Square::E4;
        assert_eq!(square.shift(Direction::Left), Some(Square::D4));
        assert_eq!(square.shift(Direction::Up), Some(Square::E5));
        assert_eq!(square.shift(Direction::UpRight), Some(Square::F5));
        assert_eq!(square.shift(Direction::UpLeft), Some(Square::D5));
        assert_eq!(square.shift(Direction::Right), Some(Square::F4));
        assert_eq!(square.shift(Direction::Down), Some(Square::E3));
        assert_eq!(square.shift(Direction::DownRight), Some(Square::F3));
        assert_eq!(square.shift(Direction::DownLeft), Some(Square::D3));
    }

    #[test]
    fn border_squares_shift() {
        let square = Square::D1;
        assert_eq!(square.shift(Direction::Left), Some(Square::C1));
        assert_eq!(square.shift(Direction::Up), Some(Square::D2));
        assert_eq!(square.shift(Direction::UpLeft), Some(Square::C2));
        assert_eq!(square.shift(Direction::UpRight), Some(Square::E2));
        for direction in [Direction::Down, Direction::DownRight, Direction::DownLeft] {
            assert_eq!(square.shift(direction), None);
        }

        let square = Square::A2;
        assert_eq!(square.shift(Direction::Up), Some(Square::A3));
        assert_eq!(square.shift(Direction::UpRight), Some(Square::B3));
        assert_eq!(square.shift(Direction::Down), Some(Square::A1));
        assert_eq!(square.shift(Direction::DownRight), Some(Square::B1));
        for direction in [Direction::Left, Direction::UpLeft, Direction::DownLeft] {
            assert_eq!(square.shift(direction), None);
        }

        let square = Square::H8;
        for direction in [
            Direction::Up,
            Direction::UpRight,
            Direction::UpLeft,
            Direction::DownRight,
            Direction::Right,
        ] {
            assert_eq!(square.shift(direction), None);
        }
        assert_eq!(square.shift(Direction::DownLeft), Some(Square::G7));
        assert_eq!(square.offset(-2, -1), Some(Square::F7));
        assert_eq!(square.offset(1, -2), None);
    }

    #[test]
    fn opposite_direction_returns() {
        for direction in Direction::DIAGONALS
            .into_iter()
            .chain(Direction::ORTHOGONALS)
        {
            assert_eq!(
                Square::E4
                    .shift(direction)
                    .and_then(|square| square.shift(direction.opposite())),
                Some(Square::E4)
            );
        }
    }

    #[test]
    fn pieces() {
        let piece = Piece::try_from('N').unwrap();
        assert_eq!(piece, Piece::new(Player::White, PieceKind::Knight));
        assert_eq!(piece.to_string(), "N");
        assert_eq!(Piece::try_from('q').unwrap().to_string(), "q");
        assert!(Piece::try_from('x').is_err());
        assert_eq!(!Player::White, Player::Black);
    }

    #[test]
    fn castle_rights() {
        assert_eq!(CastleRights::try_from("KQkq").unwrap(), CastleRights::ALL);
        assert_eq!(
            CastleRights::try_from("Kq").unwrap(),
            CastleRights::WHITE_SHORT | CastleRights::BLACK_LONG
        );
        assert_eq!(CastleRights::try_from("-").unwrap(), CastleRights::empty());
        assert!(CastleRights::try_from("qK").is_err());
        assert!(CastleRights::try_from("KK").is_err());
        assert!(CastleRights::try_from("").is_err());
        assert_eq!(CastleRights::BLACK_BOTH.to_string(), "kq");
        assert_eq!(CastleRights::empty().to_string(), "-");
    }

    #[test]
    fn uci_moves() {
        let next_move = Move::from_uci("e7e8q").unwrap();
        assert_eq!(next_move.from(), Square::E7);
        assert_eq!(next_move.to(), Square::E8);
        assert_eq!(next_move.promotion(), Some(Promotion::Queen));
        assert_eq!(next_move.to_string(), "e7e8q");
        assert_eq!(Move::from_uci("g1f3").unwrap().to_string(), "g1f3");
        assert!(Move::from_uci("g1").is_err());
        assert!(Move::from_uci("e7e8x").is_err());
        assert!(Move::from_uci("z1f3").is_err());
    }
}
