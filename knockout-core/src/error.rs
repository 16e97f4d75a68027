/// Error type for bracket construction and mutation.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BracketError {
    /// Single elimination needs a full power-of-two field; odd sizes would
    /// leave entrants without an opponent.
    #[error("invalid bracket size {0}: must be a power of two, at least 2")]
    InvalidSize(u32),

    /// The (round, match) coordinates point outside the bracket.
    #[error("no match at round {round}, match {index}")]
    NoSuchMatch { round: usize, index: usize },

    /// Entrant names must be non-empty and may not collide with the
    /// reserved "TBD" sentinel.
    #[error("invalid entrant name {0:?}: must be non-empty and not \"TBD\"")]
    InvalidName(String),

    /// Slot designators are "p1" or "p2" (or bare "1" / "2").
    #[error("invalid slot {0:?}: expected \"p1\" or \"p2\"")]
    InvalidSlot(String),
}
