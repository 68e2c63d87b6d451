//! Mappings of occupied squares to the attacked squares for each piece. The
//! mappings for knights, kings and pawns are pre-calculated at compile time,
//! sliding pieces walk the rays until they hit a blocker.

use crate::chess::bitboard::{Bitboard, Board};
use crate::chess::core::{Direction, Player, Square, BOARD_SIZE, BOARD_WIDTH};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];
const WHITE_PAWN_DELTAS: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_DELTAS: [(i8, i8); 2] = [(-1, -1), (1, -1)];

/// Builds a table of squares reachable from each square with a single jump by
/// one of the given (file, rank) deltas.
const fn leaper_attacks(deltas: &[(i8, i8)]) -> [u64; BOARD_SIZE as usize] {
    let mut table = [0u64; BOARD_SIZE as usize];
    let width = BOARD_WIDTH as i8;
    let mut square = 0;
    while square < BOARD_SIZE as usize {
        let file = (square % BOARD_WIDTH as usize) as i8;
        let rank = (square / BOARD_WIDTH as usize) as i8;
        let mut i = 0;
        while i < deltas.len() {
            let (file_delta, rank_delta) = deltas[i];
            let (target_file, target_rank) = (file + file_delta, rank + rank_delta);
            if target_file >= 0 && target_file < width && target_rank >= 0 && target_rank < width
            {
                table[square] |= 1u64 << (target_rank * width + target_file);
            }
            i += 1;
        }
        square += 1;
    }
    table
}

const KNIGHT_ATTACKS: [u64; BOARD_SIZE as usize] = leaper_attacks(&KNIGHT_DELTAS);
const KING_ATTACKS: [u64; BOARD_SIZE as usize] = leaper_attacks(&KING_DELTAS);
const WHITE_PAWN_ATTACKS: [u64; BOARD_SIZE as usize] = leaper_attacks(&WHITE_PAWN_DELTAS);
const BLACK_PAWN_ATTACKS: [u64; BOARD_SIZE as usize] = leaper_attacks(&BLACK_PAWN_DELTAS);

pub(super) const fn knight_attacks(square: Square) -> Bitboard {
    Bitboard::from_bits(KNIGHT_ATTACKS[square as usize])
}

pub(super) const fn king_attacks(square: Square) -> Bitboard {
    Bitboard::from_bits(KING_ATTACKS[square as usize])
}

/// Squares a pawn of the given player standing on `square` attacks.
pub(super) const fn pawn_attacks(square: Square, player: Player) -> Bitboard {
    match player {
        Player::White => Bitboard::from_bits(WHITE_PAWN_ATTACKS[square as usize]),
        Player::Black => Bitboard::from_bits(BLACK_PAWN_ATTACKS[square as usize]),
    }
}

fn ray_attacks(square: Square, occupancy: Bitboard, directions: &[Direction]) -> Bitboard {
    let mut result = Bitboard::empty();
    for &direction in directions {
        let mut current = square;
        while let Some(next) = current.shift(direction) {
            result.extend(next);
            if occupancy.contains(next) {
                break;
            }
            current = next;
        }
    }
    result
}

pub(super) fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ray_attacks(square, occupancy, &Direction::DIAGONALS)
}

pub(super) fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ray_attacks(square, occupancy, &Direction::ORTHOGONALS)
}

pub(super) fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

/// Pieces of `attacker` that attack the given square.
pub(super) fn attackers(board: &Board, square: Square, attacker: Player) -> Bitboard {
    let pieces = board.player_pieces(attacker);
    let occupancy = board.occupancy();
    // A pawn of the attacker hits the square iff a defender's pawn on the
    // square would hit the attacker's pawn.
    (knight_attacks(square) & pieces.knights)
        | (king_attacks(square) & pieces.king)
        | (pawn_attacks(square, attacker.opponent()) & pieces.pawns)
        | (bishop_attacks(square, occupancy) & (pieces.bishops | pieces.queens))
        | (rook_attacks(square, occupancy) & (pieces.rooks | pieces.queens))
}

pub(super) fn is_attacked(board: &Board, square: Square, attacker: Player) -> bool {
    attackers(board, square, attacker).has_any()
}
