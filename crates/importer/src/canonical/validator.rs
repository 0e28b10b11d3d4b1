use super::models::{FORMAT_VERSION, TableData, TournamentFile};
use crate::name_mapper::{canonical_name, is_alias};
use crate::{ImporterError, Result};
use std::collections::{BTreeSet, HashSet};
use storage::dto::round::TABLE_SIZE;
use tracing::warn;

pub struct TournamentValidator;

impl TournamentValidator {
    pub fn validate(tournament: &TournamentFile) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if tournament.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                tournament.format_version, FORMAT_VERSION
            ));
        }

        let roster: HashSet<&str> = tournament
            .players
            .iter()
            .map(|name| canonical_name(name))
            .collect();

        let mut aliases = BTreeSet::new();
        let mut unlisted = BTreeSet::new();
        let mut round_numbers = HashSet::new();

        for round in &tournament.rounds {
            let label = format!("Round {}", round.number);

            if round.number < 1 {
                report.errors.push(format!(
                    "{} has invalid number. Round numbers must be >= 1",
                    label
                ));
            }
            if !round_numbers.insert(round.number) {
                report.errors.push(format!("Duplicate round: {}", round.number));
            }

            if round.bye.is_none() {
                report.warnings.push(format!("{} has no resting player", label));
            }
            if round.tables.is_empty() {
                report.warnings.push(format!("{} has no tables", label));
            }

            let mut seated_this_round = HashSet::new();
            let mut table_numbers = HashSet::new();

            for table in &round.tables {
                let table_label = format!("{}, table {}", label, table.table_no);

                if !(1..=2).contains(&table.table_no) {
                    report.errors.push(format!(
                        "{}: invalid table number. Must be 1 or 2",
                        table_label
                    ));
                }
                if !table_numbers.insert(table.table_no) {
                    report.errors.push(format!("{} appears twice", table_label));
                }

                Self::validate_table(table, &table_label, &mut report);

                for name in &table.players {
                    let canonical = canonical_name(name);
                    if !seated_this_round.insert(canonical) {
                        report.errors.push(format!(
                            "{}: '{}' is seated twice in the round",
                            table_label, canonical
                        ));
                    }
                }
            }

            if let Some(bye) = &round.bye {
                let bye = canonical_name(bye);
                if seated_this_round.contains(bye) {
                    report.errors.push(format!(
                        "{}: '{}' cannot both rest and play",
                        label, bye
                    ));
                }
            }

            let referenced = round
                .bye
                .iter()
                .chain(round.tables.iter().flat_map(|t| t.players.iter()));
            for name in referenced {
                if is_alias(name) {
                    aliases.insert(name.trim().to_string());
                }
                if !roster.is_empty() && !roster.contains(canonical_name(name)) {
                    unlisted.insert(canonical_name(name).to_string());
                }
            }
        }

        for alias in aliases {
            report.warnings.push(format!(
                "'{}' will be imported as '{}'",
                alias,
                canonical_name(&alias)
            ));
        }
        for name in unlisted {
            report.warnings.push(format!(
                "'{}' is not in the player list and will be created",
                name
            ));
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    fn validate_table(table: &TableData, label: &str, report: &mut ValidationReport) {
        if table.players.len() != TABLE_SIZE {
            report.errors.push(format!(
                "{}: expected {} players, found {}",
                label,
                TABLE_SIZE,
                table.players.len()
            ));
        }

        let seated: HashSet<&str> = table.players.iter().map(|n| canonical_name(n)).collect();
        if seated.len() != table.players.len() {
            report
                .errors
                .push(format!("{}: a player is listed twice", label));
        }

        let placements = [
            ("winner", &table.winner),
            ("second", &table.second),
            ("third", &table.third),
            ("save", &table.save),
        ];
        for (role, name) in placements {
            let Some(name) = name else {
                continue;
            };
            if !seated.contains(canonical_name(name)) {
                report.errors.push(format!(
                    "{}: {} '{}' is not seated at the table",
                    label, role, name
                ));
            }
        }

        if !table.has_result() {
            if table.second.is_some() || table.third.is_some() {
                report
                    .errors
                    .push(format!("{}: second or third given without a winner", label));
            } else {
                report.warnings.push(format!("{} has no result yet", label));
            }
        }

        let podium: Vec<&str> = [&table.winner, &table.second, &table.third]
            .into_iter()
            .flatten()
            .map(|n| canonical_name(n))
            .collect();
        let distinct: HashSet<&str> = podium.iter().copied().collect();
        if distinct.len() != podium.len() {
            report.errors.push(format!(
                "{}: winner, second and third must be different players",
                label
            ));
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::models::RoundData;

    fn table(table_no: i64, players: [&str; 4]) -> TableData {
        TableData {
            table_no,
            players: players.iter().map(|p| p.to_string()).collect(),
            winner: None,
            second: None,
            third: None,
            banned_card: None,
            save: None,
        }
    }

    fn tournament(rounds: Vec<RoundData>) -> TournamentFile {
        TournamentFile {
            format_version: FORMAT_VERSION.to_string(),
            players: ["Borux", "Negro", "Gueta", "Teran", "Mauro", "Gordor", "Xephi", "Omar", "Richard"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            rounds,
        }
    }

    fn errors_of(tournament: &TournamentFile) -> String {
        match TournamentValidator::validate(tournament) {
            Err(ImporterError::ValidationError(message)) => message,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_round_with_warnings() {
        let mut first = table(1, ["Negro", "Mauro", "Xephy", "Omar"]);
        first.winner = Some("Negro".to_string());
        first.second = Some("Omar".to_string());
        let second = table(2, ["Richard", "Gueta", "Teran", "Borux"]);

        let report = TournamentValidator::validate(&tournament(vec![RoundData {
            number: 1,
            bye: Some("Goldor".to_string()),
            tables: vec![first, second],
        }]))
        .unwrap();

        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("no result yet")));
        assert!(report.warnings.iter().any(|w| w == "'Goldor' will be imported as 'Gordor'"));
        assert!(report.warnings.iter().any(|w| w == "'Xephy' will be imported as 'Xephi'"));
    }

    #[test]
    fn test_resting_player_cannot_play() {
        let message = errors_of(&tournament(vec![RoundData {
            number: 1,
            bye: Some("Xephy".to_string()),
            tables: vec![table(1, ["Negro", "Mauro", "Xephi", "Omar"])],
        }]));
        assert!(message.contains("'Xephi' cannot both rest and play"));
    }

    #[test]
    fn test_table_shape_errors() {
        let mut short = table(1, ["Negro", "Mauro", "Xephi", "Omar"]);
        short.players.pop();
        short.winner = Some("Borux".to_string());

        let mut repeated = table(1, ["Gueta", "Teran", "Borux", "Richard"]);
        repeated.second = Some("Teran".to_string());

        let message = errors_of(&tournament(vec![RoundData {
            number: 0,
            bye: None,
            tables: vec![short, repeated],
        }]));
        assert!(message.contains("expected 4 players, found 3"));
        assert!(message.contains("winner 'Borux' is not seated"));
        assert!(message.contains("appears twice"));
        assert!(message.contains("second or third given without a winner"));
        assert!(message.contains("Round numbers must be >= 1"));
    }

    #[test]
    fn test_duplicate_podium_rejected() {
        let mut podium = table(2, ["Gueta", "Teran", "Borux", "Richard"]);
        podium.winner = Some("Gueta".to_string());
        podium.second = Some("Gueta".to_string());

        let message = errors_of(&tournament(vec![RoundData {
            number: 3,
            bye: Some("Omar".to_string()),
            tables: vec![podium],
        }]));
        assert!(message.contains("must be different players"));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut file = tournament(Vec::new());
        file.format_version = "2.0.0".to_string();
        assert!(errors_of(&file).contains("Unsupported format version"));
    }
}
