/// Bracket value types and the legacy wire format.
///
/// An undetermined entrant is `None` in memory. On the wire it is the
/// literal string "TBD" and a recorded winner is the slot tag "p1" / "p2",
/// so rows written by older clients keep decoding unchanged.
use std::fmt;
use std::str::FromStr;

use crate::error::BracketError;

/// One of the two player positions of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Slot {
    P1,
    P2,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::P1 => f.write_str("p1"),
            Slot::P2 => f.write_str("p2"),
        }
    }
}

impl FromStr for Slot {
    type Err = BracketError;

    /// Accepts "p1" / "p2" in any case, or bare "1" / "2".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p1" | "1" => Ok(Slot::P1),
            "p2" | "2" => Ok(Slot::P2),
            other => Err(BracketError::InvalidSlot(other.to_string())),
        }
    }
}

/// A single matchup between two (possibly still unknown) entrants.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    /// Top entrant. `None` until the feeding match is decided.
    #[cfg_attr(feature = "serde", serde(with = "wire_name", default))]
    pub p1: Option<String>,
    /// Bottom entrant.
    #[cfg_attr(feature = "serde", serde(with = "wire_name", default))]
    pub p2: Option<String>,
    /// Which slot won, if decided. Only ever names a slot that holds a
    /// concrete entrant.
    pub winner: Option<Slot>,
}

impl Match {
    /// A match with both entrants still unknown.
    pub fn undecided() -> Match {
        Match {
            p1: None,
            p2: None,
            winner: None,
        }
    }

    /// The entrant name in a slot, if known.
    pub fn slot(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::P1 => self.p1.as_deref(),
            Slot::P2 => self.p2.as_deref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::P1 => &mut self.p1,
            Slot::P2 => &mut self.p2,
        }
    }

    /// Both entrant names, or `None` while either side is still unknown.
    pub fn entrants(&self) -> Option<(&str, &str)> {
        match (self.p1.as_deref(), self.p2.as_deref()) {
            (Some(p1), Some(p2)) => Some((p1, p2)),
            _ => None,
        }
    }

    /// The winning entrant's name, if the match is decided.
    pub fn winner_name(&self) -> Option<&str> {
        self.winner.and_then(|slot| self.slot(slot))
    }
}

/// One round of the bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round {
    pub matches: Vec<Match>,
}

/// A full single-elimination bracket.
///
/// Round `i` of a size-`n` bracket holds `n / 2^(i+1)` matches; the last
/// round is the final. `champion` is set exactly when the final is decided
/// and always equals the final winner's name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bracket {
    pub rounds: Vec<Round>,
    #[cfg_attr(feature = "serde", serde(with = "wire_name", default))]
    pub champion: Option<String>,
}

impl Bracket {
    /// Number of first-round entrants.
    pub fn size(&self) -> u32 {
        self.rounds.first().map_or(0, |r| r.matches.len() * 2) as u32
    }

    /// Number of rounds, final included.
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Look up a match by (round, index) coordinates.
    pub fn match_at(&self, round: usize, index: usize) -> Result<&Match, BracketError> {
        self.rounds
            .get(round)
            .and_then(|r| r.matches.get(index))
            .ok_or(BracketError::NoSuchMatch { round, index })
    }

    pub(crate) fn match_at_mut(
        &mut self,
        round: usize,
        index: usize,
    ) -> Result<&mut Match, BracketError> {
        self.rounds
            .get_mut(round)
            .and_then(|r| r.matches.get_mut(index))
            .ok_or(BracketError::NoSuchMatch { round, index })
    }
}

/// (De)serialization of entrant names against the legacy "TBD" sentinel.
#[cfg(feature = "serde")]
mod wire_name {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::constants::TBD;

    pub fn serialize<S: Serializer>(
        name: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match name {
            Some(n) => n.serialize(serializer),
            None => TBD.serialize(serializer),
        }
    }

    /// "TBD", the empty string and null all decode as undetermined.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| s != TBD && !s.is_empty()))
    }
}
