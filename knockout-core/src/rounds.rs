/// Display names for bracket rounds.
use crate::constants::NAMED_ROUNDS_MIN_SIZE;

/// Name a round for display.
///
/// Counted from the end: the last round is the "Final", the one before it
/// the "Semi-Finals". Brackets of 16 or more also get "Quarter-Finals"
/// and number everything earlier ("Round 1", ...). Smaller brackets call
/// every earlier round "Quarter-Finals", because they have at most one.
pub fn round_name(round_index: usize, total_rounds: usize, bracket_size: u32) -> String {
    let remaining = total_rounds.saturating_sub(round_index);
    if bracket_size >= NAMED_ROUNDS_MIN_SIZE {
        match remaining {
            1 => "Final".to_string(),
            2 => "Semi-Finals".to_string(),
            3 => "Quarter-Finals".to_string(),
            _ => format!("Round {}", round_index + 1),
        }
    } else {
        match remaining {
            1 => "Final".to_string(),
            2 => "Semi-Finals".to_string(),
            _ => "Quarter-Finals".to_string(),
        }
    }
}
