/// Wire sentinel for an undetermined entrant or champion.
///
/// The stored bracket format predates this crate: every empty slot is the
/// literal string "TBD" rather than a null, and the champion field starts
/// out as "TBD" too. In memory those are `None`; the sentinel only exists
/// at the serialization boundary so old rows keep decoding and new rows
/// stay readable by anything still consuming the legacy format.
pub const TBD: &str = "TBD";

/// Smallest bracket that can be generated: a single final.
pub const MIN_BRACKET_SIZE: u32 = 2;

/// Brackets at or above this size label early rounds "Round 1", "Round 2", ...
/// below the Quarter-Finals. Smaller brackets collapse every early round
/// into "Quarter-Finals" since they never have more than one of them.
pub const NAMED_ROUNDS_MIN_SIZE: u32 = 16;

/// Prefix for the auto-filled first-round entrant names ("Player 1", ...).
/// Numbering is 1-based and follows match order, two entrants per match.
pub const PLAYER_PLACEHOLDER_PREFIX: &str = "Player ";
