//! Mutual destruction rules on top of [`crate::chess`].
//!
//! When a piece captures a piece of strictly higher [`value`], both pieces are
//! removed from the board. All other moves, including captures of equal or
//! lower value pieces, follow the standard rules exposed through [`Rules`].

mod applier;
mod error;
mod rules;
mod value;

pub use applier::{MoveApplier, MoveOutcome};
pub use error::MoveError;
pub use rules::{Rules, StandardRules};
pub use value::{value, Value};
