/// Output formatting: terminal bracket view, past-winners table, JSON.
use knockout_core::constants::TBD;
use knockout_core::{Bracket, Match, Slot, round_name};
use serde::Serialize;

use crate::store::ArchivedTournament;

const BAR_WIDTH: usize = 48;

/// `── Title ───...` section header padded to a fixed width.
fn section_bar(title: &str) -> String {
    let head = format!("── {title} ");
    let fill = BAR_WIDTH.saturating_sub(head.chars().count());
    format!("{head}{}", "─".repeat(fill))
}

/// One entrant cell: the name (or the TBD placeholder) plus a winner mark.
fn entrant_cell(m: &Match, slot: Slot) -> String {
    let name = m.slot(slot).unwrap_or(TBD);
    if m.winner == Some(slot) {
        format!("{name} ✓")
    } else {
        name.to_string()
    }
}

/// Print the whole bracket, one section per round.
pub fn print_bracket(name: &str, bracket: &Bracket) {
    let size = bracket.size();
    let total = bracket.total_rounds();
    println!("Tournament \"{name}\" ({size} players)");

    // Pad the left column to the widest cell so the "|" separators line up.
    let width = bracket
        .rounds
        .iter()
        .flat_map(|r| &r.matches)
        .map(|m| entrant_cell(m, Slot::P1).chars().count())
        .max()
        .unwrap_or(TBD.len());

    for (i, round) in bracket.rounds.iter().enumerate() {
        println!();
        println!("{}", section_bar(&round_name(i, total, size)));
        for (j, m) in round.matches.iter().enumerate() {
            let line = format!(
                "{:>2} | {:<width$} | {}",
                j,
                entrant_cell(m, Slot::P1),
                entrant_cell(m, Slot::P2),
            );
            println!("{}", line.trim_end());
        }
    }

    println!();
    println!("Champion: {}", bracket.champion.as_deref().unwrap_or(TBD));
}

/// Print the bracket as the stored wire-format JSON document.
pub fn print_bracket_json(bracket: &Bracket) {
    println!("{}", serde_json::to_string_pretty(bracket).unwrap());
}

/// Print archived tournaments as a name/champion table.
pub fn print_past(rows: &[ArchivedTournament]) {
    if rows.is_empty() {
        println!("No archived tournaments.");
        return;
    }

    let name_width = rows.iter().map(|t| t.name.chars().count()).max().unwrap_or(4).max(4);
    println!("{:<name_width$} | Champion", "Name");
    println!("{}-|---------", "-".repeat(name_width));
    for t in rows {
        println!(
            "{:<name_width$} | {}",
            t.name,
            t.data.champion.as_deref().unwrap_or(TBD),
        );
    }
    println!("\n{} archived tournament(s)", rows.len());
}

#[derive(Serialize)]
struct JsonPastEntry<'a> {
    name: &'a str,
    champion: Option<&'a str>,
}

/// Print archived tournaments as JSON.
pub fn print_past_json(rows: &[ArchivedTournament]) {
    let entries: Vec<JsonPastEntry> = rows
        .iter()
        .map(|t| JsonPastEntry {
            name: &t.name,
            champion: t.data.champion.as_deref(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries).unwrap());
}
