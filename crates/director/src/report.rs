//! Text reports: pairing sheets and standings tables.

use std::collections::HashMap;

use swiss_core::{
    ByeType, Pairing, Player, PlayerId, RoundPairings, StandingsRow, Tiebreak, Violation,
};

/// Render one round's pairing sheet.
pub fn pairing_sheet(result: &RoundPairings, players: &[Player]) -> String {
    let names: HashMap<PlayerId, &str> =
        players.iter().map(|p| (p.id, p.name.as_str())).collect();
    let name = |id: Option<PlayerId>| -> String {
        id.and_then(|id| names.get(&id).copied())
            .unwrap_or("?")
            .to_string()
    };

    let mut report = String::new();
    report.push_str(&format!("=== Round {} Pairings ===\n\n", result.round));
    report.push_str(&format!(
        "{:>5}  {:<12} {:<20} {:<20}\n",
        "Board", "Section", "White", "Black"
    ));
    report.push_str(&"-".repeat(62));
    report.push('\n');

    for pairing in &result.pairings {
        let black = match pairing.bye {
            None => name(pairing.black),
            Some(kind) => bye_label(kind).to_string(),
        };
        report.push_str(&format!(
            "{:>5}  {:<12} {:<20} {:<20}\n",
            pairing.board,
            pairing.section,
            name(pairing.white),
            black
        ));
    }

    if !result.violations.is_empty() {
        report.push_str("\nConstraint relaxations (director review):\n");
        for violation in &result.violations {
            report.push_str(&format!("  - {}\n", describe(violation, &names)));
        }
    }

    report
}

/// Render a ranked standings table, one block per section.
pub fn standings_table(rows: &[StandingsRow], tiebreaks: &[Tiebreak]) -> String {
    let mut report = String::new();
    let mut current_section: Option<&str> = None;

    for row in rows {
        if current_section != Some(row.section.as_str()) {
            current_section = Some(row.section.as_str());
            report.push_str(&format!("\n=== {} ===\n", row.section));
            report.push_str(&format!(
                "{:>4}  {:<20} {:>6} {:>6}",
                "Rank", "Name", "Rating", "Score"
            ));
            for criterion in tiebreaks {
                report.push_str(&format!(" {:>8}", label(*criterion)));
            }
            report.push('\n');
            report.push_str(&"-".repeat(40 + 9 * tiebreaks.len()));
            report.push('\n');
        }
        report.push_str(&format!(
            "{:>4}  {:<20} {:>6} {:>6.1}",
            row.rank, row.name, row.rating, row.points
        ));
        for criterion in tiebreaks {
            report.push_str(&format!(" {:>8.1}", row.tiebreaks.get(*criterion)));
        }
        report.push('\n');
    }

    report
}

fn bye_label(kind: ByeType) -> &'static str {
    match kind {
        ByeType::HalfPoint => "(half-point bye)",
        ByeType::FullPoint => "(full-point bye)",
        ByeType::Inactive => "(inactive)",
    }
}

fn label(criterion: Tiebreak) -> &'static str {
    match criterion {
        Tiebreak::Cumulative => "Cum",
        Tiebreak::Buchholz => "Buch",
        Tiebreak::MedianBuchholz => "M-Buch",
        Tiebreak::SonnebornBerger => "S-B",
        Tiebreak::PerformanceRating => "Perf",
        Tiebreak::Rating => "Rating",
    }
}

fn describe(violation: &Violation, names: &HashMap<PlayerId, &str>) -> String {
    let name = |id: PlayerId| names.get(&id).copied().unwrap_or("?").to_string();
    match violation {
        Violation::AcceptedRematch {
            white,
            black,
            last_met,
        } => format!(
            "rematch accepted: {} vs {} (previously met in round {})",
            name(*white),
            name(*black),
            last_met
        ),
        Violation::ColorImbalance { player, balance } => format!(
            "color imbalance: {} now at balance {:+}",
            name(*player),
            balance
        ),
        Violation::Unpaired { player } => {
            format!("could not pair: {}", name(*player))
        }
    }
}
