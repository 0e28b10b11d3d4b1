use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::dto::standings::{ParticipationRow, StandingRow, StandingsResponse, Verdict};
use crate::models::Position;
use crate::services::scoring::{MAX_POINTS_PER_TABLE, SAVE_BONUS, points_for_position};

/// Number of players that qualify out of the round robin.
pub const QUALIFYING_SPOTS: usize = 4;

/// Everything the standings are derived from, as read from the store.
#[derive(Debug, Clone, Default)]
pub struct TournamentSnapshot {
    /// Active players only.
    pub players: Vec<PlayerEntry>,
    pub rounds: Vec<RoundEntry>,
    pub tables: Vec<TableEntry>,
}

#[derive(Debug, Clone)]
pub struct PlayerEntry {
    pub player_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct RoundEntry {
    pub number: i64,
    pub bye_player_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct TableEntry {
    pub table_id: Uuid,
    pub round_number: i64,
    pub table_no: i64,
    pub sweep: bool,
    pub save_player_id: Option<Uuid>,
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub player_id: Uuid,
    pub position: Option<Position>,
}

impl TableEntry {
    /// A table counts as played once it has a winner, even if second and
    /// third are still pending.
    pub fn is_played(&self) -> bool {
        self.sweep
            || self
                .results
                .iter()
                .any(|r| r.position == Some(Position::First))
    }
}

#[derive(Debug, Clone, Default)]
struct Tally {
    points: i64,
    wins: i64,
    seconds: i64,
    thirds: i64,
    saves: i64,
    rests: i64,
    rounds_played: BTreeSet<i64>,
}

/// Per-player totals plus the point range still reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBounds {
    pub player_id: Uuid,
    pub name: String,
    pub points: i64,
    pub wins: i64,
    pub seconds: i64,
    pub thirds: i64,
    pub saves: i64,
    pub played: i64,
    pub rests: i64,
    pub planned_to_play: i64,
    pub remaining: i64,
    pub lower_bound: i64,
    pub upper_bound: i64,
}

impl PlayerBounds {
    fn medal_key(&self) -> (i64, i64, i64, i64) {
        (self.points, self.wins, self.seconds, self.thirds)
    }
}

/// Fold the snapshot into per-player bounds, in the snapshot's player order.
///
/// Results and bonuses belonging to players missing from `snapshot.players`
/// (inactive players) are ignored.
pub fn compute_bounds(snapshot: &TournamentSnapshot) -> (Vec<PlayerBounds>, i64) {
    let index: HashMap<Uuid, usize> = snapshot
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.player_id, i))
        .collect();
    let mut tallies = vec![Tally::default(); snapshot.players.len()];
    let mut all_rounds = BTreeSet::new();

    for round in &snapshot.rounds {
        all_rounds.insert(round.number);
        if let Some(i) = round.bye_player_id.and_then(|id| index.get(&id)) {
            tallies[*i].rests += 1;
        }
    }

    for table in &snapshot.tables {
        all_rounds.insert(table.round_number);

        if let Some(i) = table.save_player_id.and_then(|id| index.get(&id)) {
            tallies[*i].points += SAVE_BONUS;
            tallies[*i].saves += 1;
        }

        let played = table.is_played();
        for result in &table.results {
            let Some(&i) = index.get(&result.player_id) else {
                continue;
            };
            let tally = &mut tallies[i];
            tally.points += points_for_position(result.position, table.sweep);
            match result.position {
                Some(Position::First) => tally.wins += 1,
                Some(Position::Second) => tally.seconds += 1,
                Some(Position::Third) => tally.thirds += 1,
                None => {}
            }
            if played {
                tally.rounds_played.insert(table.round_number);
            }
        }
    }

    let total_rounds = all_rounds.len() as i64;

    let bounds = snapshot
        .players
        .iter()
        .zip(tallies)
        .map(|(player, tally)| {
            let played = tally.rounds_played.len() as i64;
            let planned_to_play = (total_rounds - tally.rests).max(0);
            let remaining = (planned_to_play - played).max(0);
            PlayerBounds {
                player_id: player.player_id,
                name: player.name.clone(),
                points: tally.points,
                wins: tally.wins,
                seconds: tally.seconds,
                thirds: tally.thirds,
                saves: tally.saves,
                played,
                rests: tally.rests,
                planned_to_play,
                remaining,
                lower_bound: tally.points,
                upper_bound: tally.points + MAX_POINTS_PER_TABLE * remaining,
            }
        })
        .collect();

    (bounds, total_rounds)
}

fn fourth_best(mut values: Vec<i64>) -> Option<i64> {
    values.sort_unstable_by_key(|v| Reverse(*v));
    values.get(QUALIFYING_SPOTS - 1).copied()
}

/// Clinched/eliminated verdict for every `(lower, upper)` pair against the
/// rest of the field. Fields too small to have a fourth-best rival get no
/// verdicts at all.
pub fn assign_verdicts(ranges: &[(i64, i64)]) -> Vec<Option<Verdict>> {
    ranges
        .iter()
        .enumerate()
        .map(|(me, &(lower, upper))| {
            let rivals = || {
                ranges
                    .iter()
                    .enumerate()
                    .filter(move |(other, _)| *other != me)
                    .map(|(_, range)| *range)
            };
            let rival_upper = fourth_best(rivals().map(|(_, u)| u).collect())?;
            let rival_lower = fourth_best(rivals().map(|(l, _)| l).collect())?;

            if lower > rival_upper {
                Some(Verdict::Classified)
            } else if upper < rival_lower {
                Some(Verdict::Eliminated)
            } else {
                None
            }
        })
        .collect()
}

/// Derive the full standings table from a snapshot of the store.
pub fn compute_standings(snapshot: &TournamentSnapshot) -> StandingsResponse {
    let (bounds, total_rounds) = compute_bounds(snapshot);

    let ranges: Vec<(i64, i64)> = bounds
        .iter()
        .map(|b| (b.lower_bound, b.upper_bound))
        .collect();
    let verdicts = assign_verdicts(&ranges);

    let mut ordered: Vec<(&PlayerBounds, Option<Verdict>)> =
        bounds.iter().zip(verdicts).collect();
    ordered.sort_by(|a, b| a.0.name.cmp(&b.0.name));
    ordered.sort_by_key(|(b, _)| Reverse(b.medal_key()));

    let mut standings = Vec::with_capacity(ordered.len());
    let mut previous_key = None;
    let mut rank = 0;
    for (row_number, (player, verdict)) in ordered.into_iter().enumerate() {
        let key = player.medal_key();
        if previous_key != Some(key) {
            rank = row_number as u32 + 1;
            previous_key = Some(key);
        }
        standings.push(StandingRow {
            rank,
            player_id: player.player_id,
            name: player.name.clone(),
            points: player.points,
            wins: player.wins,
            seconds: player.seconds,
            thirds: player.thirds,
            saves: player.saves,
            verdict,
        });
    }

    let mut participation: Vec<ParticipationRow> = bounds
        .into_iter()
        .map(|b| ParticipationRow {
            player_id: b.player_id,
            name: b.name,
            played: b.played,
            remaining: b.remaining,
            rests: b.rests,
            planned_to_play: b.planned_to_play,
            min_points: b.lower_bound,
            max_points: b.upper_bound,
        })
        .collect();
    participation.sort_by(|a, b| a.name.cmp(&b.name));

    StandingsResponse {
        standings,
        participation,
        total_rounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 9] = [
        "Borux", "Negro", "Gueta", "Teran", "Mauro", "Gordor", "Xephi", "Omar", "Richard",
    ];

    fn players(names: &[&str]) -> Vec<PlayerEntry> {
        names
            .iter()
            .map(|name| PlayerEntry {
                player_id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .collect()
    }

    fn id_of(snapshot: &TournamentSnapshot, name: &str) -> Uuid {
        snapshot
            .players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.player_id)
            .unwrap()
    }

    fn table(
        snapshot: &TournamentSnapshot,
        round_number: i64,
        table_no: i64,
        sweep: bool,
        seats: &[(&str, Option<Position>)],
    ) -> TableEntry {
        TableEntry {
            table_id: Uuid::new_v4(),
            round_number,
            table_no,
            sweep,
            save_player_id: None,
            results: seats
                .iter()
                .map(|(name, position)| ResultEntry {
                    player_id: id_of(snapshot, name),
                    position: *position,
                })
                .collect(),
        }
    }

    fn bounds_of<'a>(bounds: &'a [PlayerBounds], name: &str) -> &'a PlayerBounds {
        bounds.iter().find(|b| b.name == name).unwrap()
    }

    fn nine_player_snapshot() -> TournamentSnapshot {
        TournamentSnapshot {
            players: players(&NAMES),
            ..Default::default()
        }
    }

    #[test]
    fn test_regular_table_points_and_participation() {
        let mut snapshot = nine_player_snapshot();
        let t = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Borux", Some(Position::First)),
                ("Negro", Some(Position::Second)),
                ("Gueta", Some(Position::Third)),
                ("Teran", None),
            ],
        );
        snapshot.tables.push(t);

        let (bounds, total_rounds) = compute_bounds(&snapshot);
        assert_eq!(total_rounds, 1);
        assert_eq!(bounds_of(&bounds, "Borux").points, 3);
        assert_eq!(bounds_of(&bounds, "Negro").points, 2);
        assert_eq!(bounds_of(&bounds, "Gueta").points, 1);
        assert_eq!(bounds_of(&bounds, "Teran").points, 0);
        for name in ["Borux", "Negro", "Gueta", "Teran"] {
            assert_eq!(bounds_of(&bounds, name).played, 1, "{name}");
            assert_eq!(bounds_of(&bounds, name).remaining, 0, "{name}");
        }
        assert_eq!(bounds_of(&bounds, "Mauro").played, 0);
        assert_eq!(bounds_of(&bounds, "Mauro").remaining, 1);
    }

    #[test]
    fn test_sweep_with_only_winner_counts_as_played() {
        let mut snapshot = nine_player_snapshot();
        let t = table(
            &snapshot,
            1,
            2,
            true,
            &[
                ("Omar", Some(Position::First)),
                ("Xephi", None),
                ("Mauro", None),
                ("Gordor", None),
            ],
        );
        snapshot.tables.push(t);

        let (bounds, _) = compute_bounds(&snapshot);
        assert_eq!(bounds_of(&bounds, "Omar").points, 3);
        assert_eq!(bounds_of(&bounds, "Omar").wins, 1);
        for name in ["Xephi", "Mauro", "Gordor"] {
            assert_eq!(bounds_of(&bounds, name).points, 0);
            assert_eq!(bounds_of(&bounds, name).played, 1);
        }
    }

    #[test]
    fn test_sweep_flag_without_positions_still_played() {
        let mut snapshot = nine_player_snapshot();
        let t = table(
            &snapshot,
            3,
            1,
            true,
            &[("Omar", None), ("Xephi", None), ("Mauro", None), ("Gordor", None)],
        );
        snapshot.tables.push(t);

        let (bounds, _) = compute_bounds(&snapshot);
        assert_eq!(bounds_of(&bounds, "Omar").played, 1);
        assert_eq!(bounds_of(&bounds, "Omar").points, 0);
    }

    #[test]
    fn test_unresolved_table_is_not_played() {
        let mut snapshot = nine_player_snapshot();
        let t = table(
            &snapshot,
            2,
            1,
            false,
            &[
                ("Negro", None),
                ("Xephi", None),
                ("Richard", Some(Position::Second)),
                ("Gueta", None),
            ],
        );
        snapshot.tables.push(t);

        let (bounds, _) = compute_bounds(&snapshot);
        let richard = bounds_of(&bounds, "Richard");
        assert_eq!(richard.points, 2);
        assert_eq!(richard.played, 0);
        assert_eq!(richard.remaining, 1);
    }

    #[test]
    fn test_bye_increments_rests_and_reduces_plan() {
        let mut snapshot = nine_player_snapshot();
        let bye = id_of(&snapshot, "Gordor");
        snapshot.rounds.push(RoundEntry {
            number: 1,
            bye_player_id: Some(bye),
        });
        snapshot.rounds.push(RoundEntry {
            number: 2,
            bye_player_id: None,
        });

        let (bounds, total_rounds) = compute_bounds(&snapshot);
        assert_eq!(total_rounds, 2);
        let gordor = bounds_of(&bounds, "Gordor");
        assert_eq!(gordor.rests, 1);
        assert_eq!(gordor.planned_to_play, 1);
        assert_eq!(bounds_of(&bounds, "Omar").planned_to_play, 2);
    }

    #[test]
    fn test_rounds_are_union_of_records_and_tables() {
        let mut snapshot = nine_player_snapshot();
        snapshot.rounds.push(RoundEntry {
            number: 1,
            bye_player_id: None,
        });
        snapshot.rounds.push(RoundEntry {
            number: 5,
            bye_player_id: None,
        });
        let t1 = table(&snapshot, 1, 1, false, &[("Omar", None)]);
        let t2 = table(&snapshot, 7, 1, false, &[("Omar", None)]);
        snapshot.tables.extend([t1, t2]);

        let (_, total_rounds) = compute_bounds(&snapshot);
        assert_eq!(total_rounds, 3);
    }

    #[test]
    fn test_save_bonus_is_independent_of_finish() {
        let mut snapshot = nine_player_snapshot();
        let mut t = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Borux", Some(Position::First)),
                ("Negro", None),
                ("Gueta", None),
                ("Teran", None),
            ],
        );
        t.save_player_id = Some(id_of(&snapshot, "Teran"));
        snapshot.tables.push(t);

        let (bounds, _) = compute_bounds(&snapshot);
        let teran = bounds_of(&bounds, "Teran");
        assert_eq!(teran.points, 1);
        assert_eq!(teran.saves, 1);
    }

    #[test]
    fn test_inactive_players_results_are_ignored() {
        let mut snapshot = nine_player_snapshot();
        let ghost = Uuid::new_v4();
        let mut t = table(&snapshot, 1, 1, false, &[("Borux", Some(Position::Second))]);
        t.results.push(ResultEntry {
            player_id: ghost,
            position: Some(Position::First),
        });
        t.save_player_id = Some(ghost);
        snapshot.tables.push(t);
        snapshot.rounds.push(RoundEntry {
            number: 1,
            bye_player_id: Some(ghost),
        });

        let response = compute_standings(&snapshot);
        assert_eq!(response.standings.len(), 9);
        assert!(response.standings.iter().all(|r| r.player_id != ghost));
        let borux = response.standings.iter().find(|r| r.name == "Borux").unwrap();
        assert_eq!(borux.points, 2);
    }

    #[test]
    fn test_upper_bound_is_four_per_remaining_table() {
        let mut snapshot = nine_player_snapshot();
        for number in 1..=3 {
            snapshot.rounds.push(RoundEntry {
                number,
                bye_player_id: None,
            });
        }
        let (bounds, _) = compute_bounds(&snapshot);
        for b in &bounds {
            assert_eq!(b.remaining, 3);
            assert_eq!(b.upper_bound, b.lower_bound + 12);
        }
    }

    #[test]
    fn test_bounds_are_ordered() {
        let mut snapshot = nine_player_snapshot();
        let t = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Borux", Some(Position::First)),
                ("Negro", Some(Position::Second)),
            ],
        );
        snapshot.tables.push(t);
        snapshot.rounds.push(RoundEntry {
            number: 2,
            bye_player_id: Some(id_of(&snapshot, "Omar")),
        });

        let (bounds, _) = compute_bounds(&snapshot);
        for b in &bounds {
            assert!(b.lower_bound <= b.points);
            assert!(b.points <= b.upper_bound);
            if b.played <= b.planned_to_play {
                assert_eq!(b.played + b.remaining, b.planned_to_play);
            } else {
                assert_eq!(b.remaining, 0);
            }
        }
    }

    #[test]
    fn test_remaining_clamped_when_played_exceeds_plan() {
        let mut snapshot = nine_player_snapshot();
        let omar = id_of(&snapshot, "Omar");
        snapshot.rounds.push(RoundEntry {
            number: 1,
            bye_player_id: Some(omar),
        });
        // Seated despite being the bye: the editor normally prevents this.
        let t = table(&snapshot, 1, 1, false, &[("Omar", Some(Position::First))]);
        snapshot.tables.push(t);

        let (bounds, _) = compute_bounds(&snapshot);
        let b = bounds_of(&bounds, "Omar");
        assert_eq!(b.planned_to_play, 0);
        assert_eq!(b.played, 1);
        assert_eq!(b.remaining, 0);
    }

    #[test]
    fn test_fourth_best_rival_classifies_leader() {
        let verdicts = assign_verdicts(&[(10, 10), (9, 9), (8, 8), (7, 7), (6, 6)]);
        assert_eq!(verdicts[0], Some(Verdict::Classified));
        assert_eq!(verdicts[4], Some(Verdict::Eliminated));
        assert_eq!(verdicts[1], Some(Verdict::Classified));
    }

    #[test]
    fn test_open_field_has_no_verdicts() {
        let verdicts = assign_verdicts(&[(0, 12), (0, 12), (0, 12), (0, 12), (0, 12), (0, 12)]);
        assert!(verdicts.iter().all(Option::is_none));
    }

    #[test]
    fn test_small_field_skips_verdicts() {
        let verdicts = assign_verdicts(&[(30, 30), (0, 0), (0, 0), (0, 0)]);
        assert_eq!(verdicts, vec![None; 4]);
        assert!(assign_verdicts(&[]).is_empty());
    }

    #[test]
    fn test_verdicts_are_exclusive() {
        let ranges = [(12, 14), (11, 15), (5, 9), (4, 4), (3, 11), (0, 2), (7, 7)];
        let verdicts = assign_verdicts(&ranges);
        for (i, verdict) in verdicts.iter().enumerate() {
            let (lower, upper) = ranges[i];
            let mut rival_upper: Vec<i64> = Vec::new();
            let mut rival_lower: Vec<i64> = Vec::new();
            for (j, (l, u)) in ranges.iter().enumerate() {
                if i != j {
                    rival_upper.push(*u);
                    rival_lower.push(*l);
                }
            }
            let classified = lower > fourth_best(rival_upper).unwrap();
            let eliminated = upper < fourth_best(rival_lower).unwrap();
            assert!(!(classified && eliminated));
            match verdict {
                Some(Verdict::Classified) => assert!(classified),
                Some(Verdict::Eliminated) => assert!(eliminated),
                None => assert!(!classified && !eliminated),
            }
        }
    }

    #[test]
    fn test_ties_share_rank_and_skip_next() {
        let mut snapshot = TournamentSnapshot {
            players: players(&["Cara", "Abel", "Bea", "Dario", "Eva"]),
            ..Default::default()
        };
        let t1 = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Cara", Some(Position::First)),
                ("Dario", Some(Position::Third)),
            ],
        );
        let t2 = table(
            &snapshot,
            1,
            2,
            false,
            &[
                ("Abel", Some(Position::First)),
                ("Bea", Some(Position::Second)),
            ],
        );
        snapshot.tables.extend([t1, t2]);

        let response = compute_standings(&snapshot);
        let ranks: Vec<(u32, &str)> = response
            .standings
            .iter()
            .map(|r| (r.rank, r.name.as_str()))
            .collect();
        assert_eq!(
            ranks,
            vec![(1, "Abel"), (1, "Cara"), (3, "Bea"), (4, "Dario"), (5, "Eva")]
        );
    }

    #[test]
    fn test_medal_count_breaks_point_ties() {
        let mut snapshot = TournamentSnapshot {
            players: players(&["Ana", "Beto", "Ciro", "Dani", "Eli"]),
            ..Default::default()
        };
        // Ana: 2 + 1 = 3 points, no wins. Beto: one win = 3 points.
        let t1 = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Beto", Some(Position::First)),
                ("Ana", Some(Position::Second)),
            ],
        );
        let t2 = table(
            &snapshot,
            2,
            1,
            false,
            &[
                ("Ciro", Some(Position::First)),
                ("Dani", Some(Position::Second)),
                ("Ana", Some(Position::Third)),
            ],
        );
        snapshot.tables.extend([t1, t2]);

        let response = compute_standings(&snapshot);
        let order: Vec<&str> = response.standings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["Beto", "Ciro", "Ana", "Dani", "Eli"]);
        assert_eq!(response.standings[0].rank, 1);
        assert_eq!(response.standings[1].rank, 1);
        assert_eq!(response.standings[2].rank, 3);
    }

    #[test]
    fn test_participation_sorted_by_name() {
        let snapshot = nine_player_snapshot();
        let response = compute_standings(&snapshot);
        let names: Vec<&str> = response
            .participation
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(response.total_rounds, 0);
    }

    #[test]
    fn test_compute_standings_is_idempotent() {
        let mut snapshot = nine_player_snapshot();
        let bye = id_of(&snapshot, "Richard");
        snapshot.rounds.push(RoundEntry {
            number: 1,
            bye_player_id: Some(bye),
        });
        let t = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Negro", Some(Position::First)),
                ("Omar", Some(Position::Second)),
                ("Mauro", None),
                ("Xephi", None),
            ],
        );
        snapshot.tables.push(t);

        assert_eq!(compute_standings(&snapshot), compute_standings(&snapshot));
    }

    #[test]
    fn test_five_player_scenario_classifies_leader() {
        let mut snapshot = TournamentSnapshot {
            players: players(&["Lead", "R9", "R8", "R7", "R6"]),
            ..Default::default()
        };
        // One round, fully played: each bound collapses onto current points.
        let mut t = table(
            &snapshot,
            1,
            1,
            false,
            &[
                ("Lead", Some(Position::First)),
                ("R9", Some(Position::Second)),
                ("R8", Some(Position::Third)),
                ("R7", None),
                ("R6", None),
            ],
        );
        t.save_player_id = Some(id_of(&snapshot, "Lead"));
        snapshot.tables.push(t);

        let response = compute_standings(&snapshot);
        let lead = &response.standings[0];
        assert_eq!(lead.name, "Lead");
        assert_eq!(lead.points, 4);
        assert_eq!(lead.verdict, Some(Verdict::Classified));
        assert!(response.participation.iter().all(|p| p.remaining == 0));
    }
}
