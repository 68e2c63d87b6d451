use std::fmt;

use crate::chess::core::PieceKind;

/// Material value of a piece. The King is worth more than any other piece, so
/// it is never the lower-value side of a capture.
///
/// ```
/// use chessworth::chess::core::PieceKind;
/// use chessworth::variant::{value, Value};
///
/// assert!(value(PieceKind::Knight) < value(PieceKind::Queen));
/// assert_eq!(value(PieceKind::Knight), value(PieceKind::Bishop));
/// assert!(Value::Finite(u8::MAX) < value(PieceKind::King));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Value in pawns.
    Finite(u8),
    /// The King.
    Infinite,
}

/// Value of each piece kind: Pawn is 1, Knight and Bishop are 3, Rook is 5,
/// Queen is 9 and the King is [`Value::Infinite`].
#[must_use]
pub const fn value(kind: PieceKind) -> Value {
    match kind {
        PieceKind::Pawn => Value::Finite(1),
        PieceKind::Knight | PieceKind::Bishop => Value::Finite(3),
        PieceKind::Rook => Value::Finite(5),
        PieceKind::Queen => Value::Finite(9),
        PieceKind::King => Value::Infinite,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(pawns) => write!(f, "{pawns}"),
            Self::Infinite => f.write_str("∞"),
        }
    }
}
