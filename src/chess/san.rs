//! [Standard Algebraic Notation] (SAN) for moves in a given [`Position`].
//!
//! [Standard Algebraic Notation]: https://en.wikipedia.org/wiki/Algebraic_notation_(chess)

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::chess::core::{File, Move, PieceKind, Promotion, Rank, Square};
use crate::chess::position::Position;

const SHORT_CASTLE: &str = "O-O";
const LONG_CASTLE: &str = "O-O-O";

impl Position {
    /// Serializes a legal move in SAN, e.g. `Nbd7`, `exd5`, `e8=Q+` or
    /// `O-O-O#`.
    ///
    /// A move that has no piece on its source square is printed in UCI
    /// notation.
    #[must_use]
    pub fn san(&self, next_move: Move) -> String {
        let Some(piece) = self.at(next_move.from) else {
            return next_move.to_string();
        };
        let mut result = String::new();
        if self.is_castle(next_move) {
            result.push_str(if next_move.to.file() == File::G {
                SHORT_CASTLE
            } else {
                LONG_CASTLE
            });
        } else if piece.kind == PieceKind::Pawn {
            if self.is_capture(next_move) {
                result.push_str(&next_move.from.file().to_string());
                result.push('x');
            }
            result.push_str(&next_move.to.to_string());
            if let Some(promotion) = next_move.promotion {
                result.push('=');
                result.push(PieceKind::from(promotion).symbol().to_ascii_uppercase());
            }
        } else {
            result.push(piece.kind.symbol().to_ascii_uppercase());
            result.push_str(&self.disambiguation(next_move, piece.kind));
            if self.is_capture(next_move) {
                result.push('x');
            }
            result.push_str(&next_move.to.to_string());
        }
        let mut next = self.clone();
        next.make_move(next_move);
        if next.in_check() {
            result.push(if next.generate_moves().is_empty() {
                '#'
            } else {
                '+'
            });
        }
        result
    }

    fn is_castle(&self, next_move: Move) -> bool {
        self.pieces(self.us()).king.contains(next_move.from)
            && next_move.from.rank() == next_move.to.rank()
            && (next_move.from.file() as u8).abs_diff(next_move.to.file() as u8) == 2
    }

    /// The shortest prefix (file, rank or the full square) of the source square
    /// that tells the move apart from the moves of other pieces of the same
    /// kind landing on the same square.
    fn disambiguation(&self, next_move: Move, kind: PieceKind) -> String {
        let others = self
            .generate_moves()
            .into_iter()
            .filter(|other| {
                other.to == next_move.to
                    && other.from != next_move.from
                    && self.at(other.from).map(|piece| piece.kind) == Some(kind)
            })
            .collect_vec();
        if others.is_empty() {
            String::new()
        } else if others
            .iter()
            .all(|other| other.from.file() != next_move.from.file())
        {
            next_move.from.file().to_string()
        } else if others
            .iter()
            .all(|other| other.from.rank() != next_move.from.rank())
        {
            next_move.from.rank().to_string()
        } else {
            next_move.from.to_string()
        }
    }

    /// Parses a move in SAN and finds the matching legal move. Accepts check
    /// and annotation suffixes (`+`, `#`, `!`, `?`), castling with zeros
    /// (`0-0`) and promotions without `=` (`e8Q`).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed, does not match any legal
    /// move or matches more than one.
    pub fn parse_san(&self, input: &str) -> anyhow::Result<Move> {
        let san = input.trim().trim_end_matches(['+', '#', '!', '?']);
        if san.is_empty() || !san.is_ascii() {
            bail!("invalid san: '{input}'");
        }
        let legal_moves = self.generate_moves();
        if matches!(san, "O-O" | "0-0" | "O-O-O" | "0-0-0") {
            let target = if san.len() == SHORT_CASTLE.len() {
                File::G
            } else {
                File::C
            };
            return legal_moves
                .into_iter()
                .find(|candidate| self.is_castle(*candidate) && candidate.to.file() == target)
                .with_context(|| format!("illegal san: '{input}' in {self}"));
        }
        let (kind, rest) = match san.chars().next() {
            Some(symbol @ ('N' | 'B' | 'R' | 'Q' | 'K')) => {
                (PieceKind::try_from(symbol.to_ascii_lowercase())?, &san[1..])
            },
            _ => (PieceKind::Pawn, san),
        };
        let (rest, promotion) = split_promotion(rest, input)?;
        if rest.len() < 2 {
            bail!("invalid san: '{input}'");
        }
        let (prefix, destination) = rest.split_at(rest.len() - 2);
        let destination =
            Square::try_from(destination).with_context(|| format!("invalid san: '{input}'"))?;
        let prefix = prefix.strip_suffix('x').unwrap_or(prefix);
        let mut from_file = None;
        let mut from_rank = None;
        for symbol in prefix.chars() {
            match symbol {
                'a'..='h' if from_file.is_none() && from_rank.is_none() => {
                    from_file = Some(File::try_from(symbol)?);
                },
                '1'..='8' if from_rank.is_none() => from_rank = Some(Rank::try_from(symbol)?),
                _ => bail!("invalid san: '{input}'"),
            }
        }
        let candidates = legal_moves
            .into_iter()
            .filter(|candidate| {
                candidate.to == destination
                    && candidate.promotion == promotion
                    && !self.is_castle(*candidate)
                    && self.at(candidate.from).map(|piece| piece.kind) == Some(kind)
                    && from_file.map_or(true, |file| candidate.from.file() == file)
                    && from_rank.map_or(true, |rank| candidate.from.rank() == rank)
            })
            .collect_vec();
        match candidates.as_slice() {
            [] => bail!("illegal san: '{input}' in {self}"),
            [next_move] => Ok(*next_move),
            _ => bail!("ambiguous san: '{input}' in {self}"),
        }
    }
}

/// Splits the trailing promotion piece (`=Q` or `Q`) off a SAN body.
fn split_promotion<'a>(san: &'a str, input: &str) -> anyhow::Result<(&'a str, Option<Promotion>)> {
    let Some(last) = san.chars().last() else {
        return Ok((san, None));
    };
    if !matches!(last, 'Q' | 'R' | 'B' | 'N') {
        return Ok((san, None));
    }
    let body = &san[..san.len() - 1];
    let body = body.strip_suffix('=').unwrap_or(body);
    if body.is_empty() {
        bail!("invalid san: '{input}'");
    }
    Ok((body, Some(Promotion::try_from(last)?)))
}
