/// Bracket state machine: generation, winner advancement and cascading resets.
///
/// Pure and synchronous. The caller loads a bracket, applies an operation,
/// inspects the returned report and stores the result; nothing here touches
/// IO. Coordinates are (round, match) pairs, both 0-based.
use crate::bracket::{Bracket, Match, Round, Slot};
use crate::constants::{MIN_BRACKET_SIZE, PLAYER_PLACEHOLDER_PREFIX, TBD};
use crate::error::BracketError;

/// What `record_winner` did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Advance {
    /// One or both entrants are still unknown; nothing was recorded.
    Undecided,
    /// The winner's name was copied into `slot` of match `index` in `round`.
    NextRound {
        round: usize,
        index: usize,
        slot: Slot,
        name: String,
    },
    /// The final was decided and the champion crowned.
    Champion { name: String },
}

/// What a reset invalidated, for presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetReport {
    /// Match results cleared, the reset match included.
    pub winners_cleared: usize,
    /// Later-round entrant slots restored to undetermined.
    pub slots_cleared: usize,
    /// Whether the champion was vacated.
    pub champion_cleared: bool,
}

/// Which next-round slot a match feeds: match `i` sends its winner to
/// match `i / 2`, even indices into p1 and odd into p2.
fn next_match_slot(index: usize) -> (usize, Slot) {
    let slot = if index % 2 == 0 { Slot::P1 } else { Slot::P2 };
    (index / 2, slot)
}

impl Bracket {
    /// Build an empty bracket for `size` entrants.
    ///
    /// `size` must be a power of two, at least 2. The first round is
    /// pre-filled with placeholder names ("Player 1", "Player 2", ...);
    /// every later slot stays undetermined until advancement fills it.
    pub fn generate(size: u32) -> Result<Bracket, BracketError> {
        if size < MIN_BRACKET_SIZE || !size.is_power_of_two() {
            return Err(BracketError::InvalidSize(size));
        }

        let total_rounds = size.trailing_zeros() as usize;
        let mut rounds = Vec::with_capacity(total_rounds);
        let mut matches_in_round = (size / 2) as usize;

        for round in 0..total_rounds {
            let mut matches = Vec::with_capacity(matches_in_round);
            for index in 0..matches_in_round {
                if round == 0 {
                    matches.push(Match {
                        p1: Some(format!("{}{}", PLAYER_PLACEHOLDER_PREFIX, index * 2 + 1)),
                        p2: Some(format!("{}{}", PLAYER_PLACEHOLDER_PREFIX, index * 2 + 2)),
                        winner: None,
                    });
                } else {
                    matches.push(Match::undecided());
                }
            }
            rounds.push(Round { matches });
            matches_in_round /= 2;
        }

        Ok(Bracket {
            rounds,
            champion: None,
        })
    }

    /// Record `slot` as the winner of the match at (round, index) and
    /// advance the name one round forward.
    ///
    /// While either entrant is still unknown there is nothing to win;
    /// the call reports `Advance::Undecided` and changes nothing. Choosing
    /// the other slot of an already-decided match first resets that match
    /// (cascading, see `reset_match`) so the superseded name cannot survive
    /// anywhere downstream. Re-recording the same winner is idempotent.
    pub fn record_winner(
        &mut self,
        round: usize,
        index: usize,
        slot: Slot,
    ) -> Result<Advance, BracketError> {
        let last_round = self.total_rounds().saturating_sub(1);
        let m = self.match_at(round, index)?;

        let Some((p1, p2)) = m.entrants() else {
            return Ok(Advance::Undecided);
        };
        let name = match slot {
            Slot::P1 => p1.to_string(),
            Slot::P2 => p2.to_string(),
        };

        if let Some(prev) = m.winner {
            if prev != slot {
                self.reset_match(round, index)?;
            }
        }

        self.match_at_mut(round, index)?.winner = Some(slot);

        if round == last_round {
            self.champion = Some(name.clone());
            return Ok(Advance::Champion { name });
        }

        let (next_index, next_slot) = next_match_slot(index);
        *self.match_at_mut(round + 1, next_index)?.slot_mut(next_slot) = Some(name.clone());
        Ok(Advance::NextRound {
            round: round + 1,
            index: next_index,
            slot: next_slot,
            name,
        })
    }

    /// Clear the result of the match at (round, index) and invalidate
    /// everything that followed from it.
    ///
    /// The winner's name is withdrawn from the next-round slot it was
    /// advanced into, and if that later match had a result of its own the
    /// reset recurses through it first, up to and including vacating the
    /// champion. A downstream slot that no longer holds this winner's name
    /// stops the cascade: that branch has been re-decided independently and
    /// no longer depends on this match. Resetting an undecided match is a
    /// no-op, so the call is idempotent.
    pub fn reset_match(
        &mut self,
        round: usize,
        index: usize,
    ) -> Result<ResetReport, BracketError> {
        self.match_at(round, index)?;
        let mut report = ResetReport::default();
        self.clear_result(round, index, &mut report);
        Ok(report)
    }

    /// Recursive body of `reset_match`. Coordinates are in range: the
    /// public entry validated them and the recursion only follows the
    /// advancement edge to the next round.
    fn clear_result(&mut self, round: usize, index: usize, report: &mut ResetReport) {
        let last_round = self.rounds.len() - 1;
        let m = &self.rounds[round].matches[index];
        if m.winner.is_none() {
            return;
        }

        match m.winner_name().map(str::to_owned) {
            Some(name) if round == last_round => {
                if self.champion.as_deref() == Some(name.as_str()) {
                    self.champion = None;
                    report.champion_cleared = true;
                }
            }
            Some(name) => {
                let (next_index, next_slot) = next_match_slot(index);
                let next = &self.rounds[round + 1].matches[next_index];
                if next.slot(next_slot) == Some(name.as_str()) {
                    if next.winner.is_some() {
                        self.clear_result(round + 1, next_index, report);
                    }
                    *self.rounds[round + 1].matches[next_index].slot_mut(next_slot) = None;
                    report.slots_cleared += 1;
                }
            }
            // Winner flagged on an empty slot. Malformed input; just drop
            // the flag.
            None => {}
        }

        self.rounds[round].matches[index].winner = None;
        report.winners_cleared += 1;
    }

    /// Replace the entrant name in one slot.
    ///
    /// This relabels the slot and nothing else: no advancement, no cascade.
    /// A copy of the old name already advanced to a later round stays there
    /// until the match that produced it is reset. Names are trimmed and must
    /// be non-empty and distinct from the "TBD" sentinel.
    pub fn set_entrant(
        &mut self,
        round: usize,
        index: usize,
        slot: Slot,
        name: &str,
    ) -> Result<(), BracketError> {
        let name = name.trim();
        if name.is_empty() || name == TBD {
            return Err(BracketError::InvalidName(name.to_string()));
        }
        *self.match_at_mut(round, index)?.slot_mut(slot) = Some(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        for size in [2u32, 4, 8, 16, 32] {
            let bracket = Bracket::generate(size).unwrap();
            assert_eq!(bracket.size(), size);
            assert_eq!(bracket.total_rounds(), size.trailing_zeros() as usize);

            let mut expected = (size / 2) as usize;
            for round in &bracket.rounds {
                assert_eq!(round.matches.len(), expected);
                expected /= 2;
            }
            assert_eq!(bracket.champion, None);
        }
    }

    #[test]
    fn test_generate_first_round_placeholders() {
        let bracket = Bracket::generate(8).unwrap();
        let names: Vec<_> = bracket.rounds[0]
            .matches
            .iter()
            .flat_map(|m| [m.p1.as_deref().unwrap(), m.p2.as_deref().unwrap()])
            .collect();
        assert_eq!(
            names,
            vec![
                "Player 1", "Player 2", "Player 3", "Player 4", "Player 5", "Player 6",
                "Player 7", "Player 8",
            ]
        );
        // Later rounds are fully undetermined.
        for round in &bracket.rounds[1..] {
            for m in &round.matches {
                assert_eq!(*m, Match::undecided());
            }
        }
    }

    #[test]
    fn test_generate_rejects_bad_sizes() {
        for size in [0u32, 1, 3, 6, 12, 100] {
            assert_eq!(
                Bracket::generate(size),
                Err(BracketError::InvalidSize(size))
            );
        }
    }

    #[test]
    fn test_record_winner_advances() {
        let mut bracket = Bracket::generate(4).unwrap();
        let advance = bracket.record_winner(0, 1, Slot::P2).unwrap();
        assert_eq!(
            advance,
            Advance::NextRound {
                round: 1,
                index: 0,
                slot: Slot::P2,
                name: "Player 4".to_string(),
            }
        );
        assert_eq!(bracket.rounds[0].matches[1].winner, Some(Slot::P2));
        assert_eq!(bracket.rounds[1].matches[0].p2.as_deref(), Some("Player 4"));
        // The sibling slot is untouched.
        assert_eq!(bracket.rounds[1].matches[0].p1, None);
    }

    #[test]
    fn test_record_winner_even_and_odd_feeds() {
        let mut bracket = Bracket::generate(8).unwrap();
        bracket.record_winner(0, 2, Slot::P1).unwrap(); // match 2 → match 1, p1
        bracket.record_winner(0, 3, Slot::P1).unwrap(); // match 3 → match 1, p2
        let next = bracket.match_at(1, 1).unwrap();
        assert_eq!(next.p1.as_deref(), Some("Player 5"));
        assert_eq!(next.p2.as_deref(), Some("Player 7"));
    }

    #[test]
    fn test_record_winner_undecided_is_noop() {
        let mut bracket = Bracket::generate(4).unwrap();
        let before = bracket.clone();
        let advance = bracket.record_winner(1, 0, Slot::P1).unwrap();
        assert_eq!(advance, Advance::Undecided);
        assert_eq!(bracket, before);
    }

    #[test]
    fn test_record_winner_final_crowns_champion() {
        let mut bracket = Bracket::generate(2).unwrap();
        let advance = bracket.record_winner(0, 0, Slot::P2).unwrap();
        assert_eq!(
            advance,
            Advance::Champion {
                name: "Player 2".to_string(),
            }
        );
        assert_eq!(bracket.champion.as_deref(), Some("Player 2"));
    }

    #[test]
    fn test_record_winner_out_of_range() {
        let mut bracket = Bracket::generate(4).unwrap();
        assert_eq!(
            bracket.record_winner(2, 0, Slot::P1),
            Err(BracketError::NoSuchMatch { round: 2, index: 0 })
        );
        assert_eq!(
            bracket.record_winner(0, 2, Slot::P1),
            Err(BracketError::NoSuchMatch { round: 0, index: 2 })
        );
    }

    /// Play a size-4 bracket to completion: Player 1 beats Player 4.
    fn decided_bracket() -> Bracket {
        let mut bracket = Bracket::generate(4).unwrap();
        bracket.record_winner(0, 0, Slot::P1).unwrap();
        bracket.record_winner(0, 1, Slot::P2).unwrap();
        bracket.record_winner(1, 0, Slot::P1).unwrap();
        assert_eq!(bracket.champion.as_deref(), Some("Player 1"));
        bracket
    }

    #[test]
    fn test_record_same_winner_again_keeps_downstream() {
        let mut bracket = decided_bracket();
        let advance = bracket.record_winner(0, 0, Slot::P1).unwrap();
        assert!(matches!(advance, Advance::NextRound { .. }));
        // Player 1's later results survive an identical re-record.
        assert_eq!(bracket.rounds[1].matches[0].winner, Some(Slot::P1));
        assert_eq!(bracket.champion.as_deref(), Some("Player 1"));
    }

    #[test]
    fn test_record_other_winner_cascades_first() {
        let mut bracket = decided_bracket();
        // Re-deciding the first semi for Player 2 must tear down Player 1's
        // final result before advancing Player 2.
        let advance = bracket.record_winner(0, 0, Slot::P2).unwrap();
        assert_eq!(
            advance,
            Advance::NextRound {
                round: 1,
                index: 0,
                slot: Slot::P1,
                name: "Player 2".to_string(),
            }
        );
        let final_match = bracket.match_at(1, 0).unwrap();
        assert_eq!(final_match.p1.as_deref(), Some("Player 2"));
        assert_eq!(final_match.p2.as_deref(), Some("Player 4"));
        assert_eq!(final_match.winner, None);
        assert_eq!(bracket.champion, None);
    }

    #[test]
    fn test_reset_round_trip() {
        let mut bracket = Bracket::generate(8).unwrap();
        bracket.record_winner(0, 0, Slot::P1).unwrap();
        let before = bracket.clone();

        bracket.record_winner(0, 1, Slot::P2).unwrap();
        let report = bracket.reset_match(0, 1).unwrap();

        assert_eq!(bracket, before);
        assert_eq!(
            report,
            ResetReport {
                winners_cleared: 1,
                slots_cleared: 1,
                champion_cleared: false,
            }
        );
    }

    #[test]
    fn test_reset_cascades_to_champion() {
        let mut bracket = decided_bracket();
        // Player 1 won the whole thing through (0,0); resetting that match
        // unwinds the final and the title.
        let report = bracket.reset_match(0, 0).unwrap();
        assert_eq!(
            report,
            ResetReport {
                winners_cleared: 2,
                slots_cleared: 1,
                champion_cleared: true,
            }
        );
        assert_eq!(bracket.rounds[0].matches[0].winner, None);
        let final_match = bracket.match_at(1, 0).unwrap();
        assert_eq!(final_match.p1, None);
        assert_eq!(final_match.p2.as_deref(), Some("Player 4"));
        assert_eq!(final_match.winner, None);
        assert_eq!(bracket.champion, None);
        // The other semi is not on the cascade path.
        assert_eq!(bracket.rounds[0].matches[1].winner, Some(Slot::P2));
    }

    #[test]
    fn test_reset_stops_at_overwritten_slot() {
        let mut bracket = Bracket::generate(4).unwrap();
        bracket.record_winner(0, 0, Slot::P1).unwrap();
        bracket.set_entrant(1, 0, Slot::P1, "Ringer").unwrap();

        let report = bracket.reset_match(0, 0).unwrap();
        assert_eq!(
            report,
            ResetReport {
                winners_cleared: 1,
                slots_cleared: 0,
                champion_cleared: false,
            }
        );
        assert_eq!(bracket.rounds[0].matches[0].winner, None);
        // The renamed slot no longer traces back to this match.
        assert_eq!(bracket.rounds[1].matches[0].p1.as_deref(), Some("Ringer"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut bracket = decided_bracket();
        bracket.reset_match(1, 0).unwrap();
        let after_first = bracket.clone();

        let report = bracket.reset_match(1, 0).unwrap();
        assert_eq!(bracket, after_first);
        assert_eq!(report, ResetReport::default());
    }

    #[test]
    fn test_reset_undecided_is_noop() {
        let mut bracket = Bracket::generate(4).unwrap();
        let before = bracket.clone();
        let report = bracket.reset_match(0, 0).unwrap();
        assert_eq!(bracket, before);
        assert_eq!(report, ResetReport::default());
    }

    #[test]
    fn test_reset_out_of_range() {
        let mut bracket = Bracket::generate(4).unwrap();
        assert_eq!(
            bracket.reset_match(0, 9),
            Err(BracketError::NoSuchMatch { round: 0, index: 9 })
        );
    }

    #[test]
    fn test_reset_deep_cascade() {
        let mut bracket = Bracket::generate(8).unwrap();
        bracket.record_winner(0, 0, Slot::P1).unwrap(); // Player 1
        bracket.record_winner(0, 1, Slot::P1).unwrap(); // Player 3
        bracket.record_winner(0, 2, Slot::P2).unwrap(); // Player 6
        bracket.record_winner(0, 3, Slot::P1).unwrap(); // Player 7
        bracket.record_winner(1, 0, Slot::P1).unwrap(); // Player 1
        bracket.record_winner(1, 1, Slot::P2).unwrap(); // Player 7
        bracket.record_winner(2, 0, Slot::P1).unwrap();
        assert_eq!(bracket.champion.as_deref(), Some("Player 1"));

        // Player 1 won three rounds through (0,0); resetting it unwinds
        // the semi and the final too.
        let report = bracket.reset_match(0, 0).unwrap();
        assert_eq!(report.winners_cleared, 3);
        assert_eq!(report.slots_cleared, 2);
        assert!(report.champion_cleared);
        assert_eq!(bracket.champion, None);
        assert_eq!(bracket.rounds[1].matches[0].winner, None);
        assert_eq!(bracket.rounds[2].matches[0].p1, None);
        // Branches that never depended on Player 1 keep their results.
        assert_eq!(bracket.rounds[1].matches[1].winner, Some(Slot::P2));
        assert_eq!(bracket.rounds[2].matches[0].p2.as_deref(), Some("Player 7"));
    }

    #[test]
    fn test_set_entrant_relabels_without_cascade() {
        let mut bracket = decided_bracket();
        bracket.set_entrant(0, 0, Slot::P1, "Ada").unwrap();
        // Relabeling does not rewrite history: the old name is still the
        // finalist and the champion.
        assert_eq!(bracket.rounds[0].matches[0].p1.as_deref(), Some("Ada"));
        assert_eq!(bracket.rounds[1].matches[0].p1.as_deref(), Some("Player 1"));
        assert_eq!(bracket.champion.as_deref(), Some("Player 1"));
    }

    #[test]
    fn test_set_entrant_trims_and_validates() {
        let mut bracket = Bracket::generate(2).unwrap();
        bracket.set_entrant(0, 0, Slot::P2, "  Grace  ").unwrap();
        assert_eq!(bracket.rounds[0].matches[0].p2.as_deref(), Some("Grace"));

        assert_eq!(
            bracket.set_entrant(0, 0, Slot::P1, "   "),
            Err(BracketError::InvalidName("".to_string()))
        );
        assert_eq!(
            bracket.set_entrant(0, 0, Slot::P1, "TBD"),
            Err(BracketError::InvalidName("TBD".to_string()))
        );
        assert_eq!(
            bracket.set_entrant(5, 0, Slot::P1, "Ada"),
            Err(BracketError::NoSuchMatch { round: 5, index: 0 })
        );
    }
}
