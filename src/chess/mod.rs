//! Implementation of the standard chess rules: board representation, legal
//! move generation, move making, FEN and SAN. The variant rules are layered
//! on top of it in [`crate::variant`].

mod attacks;
pub mod bitboard;
pub mod core;
pub mod game;
pub mod position;
pub mod san;
