/// knockout-core: Pure single-elimination bracket engine.
///
/// Generate a bracket, record winners and cascade resets. No IO, no HTTP,
/// no filesystem; callers bring their own storage and presentation.
///
/// Matches are addressed by (round, match) coordinates, both 0-based.
/// Match `i` of a round feeds the winner into match `i / 2` of the next
/// round (even indices land in p1, odd in p2), and the last round's winner
/// becomes the champion.
///
/// # Quick start
///
/// ```rust
/// use knockout_core::{Advance, Bracket, Slot};
///
/// let mut bracket = Bracket::generate(4)?;
///
/// bracket.record_winner(0, 0, Slot::P1)?; // "Player 1" advances
/// bracket.record_winner(0, 1, Slot::P2)?; // "Player 4" advances
/// let advance = bracket.record_winner(1, 0, Slot::P1)?;
///
/// assert_eq!(advance, Advance::Champion { name: "Player 1".to_string() });
/// assert_eq!(bracket.champion.as_deref(), Some("Player 1"));
///
/// // Undo the final; the title goes with it.
/// bracket.reset_match(1, 0)?;
/// assert_eq!(bracket.champion, None);
/// # Ok::<(), knockout_core::BracketError>(())
/// ```

pub mod bracket;
pub mod constants;
pub mod engine;
pub mod error;
pub mod rounds;

// Re-export primary public API at crate root.
pub use bracket::{Bracket, Match, Round, Slot};
pub use engine::{Advance, ResetReport};
pub use error::BracketError;
pub use rounds::round_name;
