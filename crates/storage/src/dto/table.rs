use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{GameTable, Position, TableResult};

/// Request payload for recording the outcome of a table
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTableResultRequest {
    #[validate(length(max = 255))]
    pub banned_card: Option<String>,

    #[serde(default)]
    pub sweep: bool,

    pub save_player_id: Option<Uuid>,

    pub winner_id: Option<Uuid>,

    pub second_id: Option<Uuid>,

    pub third_id: Option<Uuid>,
}

/// A validated table outcome, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutcome {
    pub banned_card: Option<String>,
    pub sweep: bool,
    pub save_player_id: Option<Uuid>,
    pub placements: Vec<(Uuid, Position)>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutcomeError {
    #[error("A winner seated at the table must be chosen")]
    MissingWinner,

    #[error("The {0} must be seated at the table")]
    NotSeated(&'static str),

    #[error("Winner, second and third must be different players")]
    DuplicatePlacement,
}

impl UpdateTableResultRequest {
    /// Check the outcome against the players seated at the table.
    ///
    /// On a sweep second and third are dropped: only the winner places.
    pub fn to_outcome(&self, seated: &[Uuid]) -> Result<TableOutcome, OutcomeError> {
        let winner = self
            .winner_id
            .filter(|id| seated.contains(id))
            .ok_or(OutcomeError::MissingWinner)?;

        let mut placements = vec![(winner, Position::First)];

        if !self.sweep {
            for (player, position, role) in [
                (self.second_id, Position::Second, "second"),
                (self.third_id, Position::Third, "third"),
            ] {
                let Some(player) = player else {
                    continue;
                };
                if !seated.contains(&player) {
                    return Err(OutcomeError::NotSeated(role));
                }
                if placements.iter().any(|(placed, _)| *placed == player) {
                    return Err(OutcomeError::DuplicatePlacement);
                }
                placements.push((player, position));
            }
        }

        if let Some(save) = self.save_player_id {
            if !seated.contains(&save) {
                return Err(OutcomeError::NotSeated("save player"));
            }
        }

        let banned_card = self
            .banned_card
            .as_deref()
            .map(str::trim)
            .filter(|card| !card.is_empty())
            .map(String::from);

        Ok(TableOutcome {
            banned_card,
            sweep: self.sweep,
            save_player_id: self.save_player_id,
            placements,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultView {
    pub player_id: Uuid,
    pub position: Option<Position>,
}

/// Response containing a table and its seated players
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableResponse {
    pub table_id: Uuid,
    pub round_number: i64,
    pub table_no: i64,
    pub banned_card: Option<String>,
    pub sweep: bool,
    pub save_player_id: Option<Uuid>,
    pub results: Vec<ResultView>,
}

impl TableResponse {
    pub fn new(table: GameTable, results: Vec<TableResult>) -> Self {
        Self {
            table_id: table.table_id,
            round_number: table.round_number,
            table_no: table.table_no,
            banned_card: table.banned_card,
            sweep: table.sweep,
            save_player_id: table.save_player_id,
            results: results
                .into_iter()
                .map(|r| ResultView {
                    player_id: r.player_id,
                    position: r.finish(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated() -> Vec<Uuid> {
        (0..4).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_full_podium() {
        let seats = seated();
        let req = UpdateTableResultRequest {
            banned_card: Some("  Conduit of Worlds ".to_string()),
            winner_id: Some(seats[0]),
            second_id: Some(seats[1]),
            third_id: Some(seats[2]),
            save_player_id: Some(seats[3]),
            ..Default::default()
        };
        let outcome = req.to_outcome(&seats).unwrap();
        assert_eq!(outcome.banned_card.as_deref(), Some("Conduit of Worlds"));
        assert_eq!(
            outcome.placements,
            vec![
                (seats[0], Position::First),
                (seats[1], Position::Second),
                (seats[2], Position::Third),
            ]
        );
        assert_eq!(outcome.save_player_id, Some(seats[3]));
    }

    #[test]
    fn test_sweep_drops_second_and_third() {
        let seats = seated();
        let req = UpdateTableResultRequest {
            sweep: true,
            winner_id: Some(seats[0]),
            second_id: Some(seats[1]),
            third_id: Some(seats[0]),
            ..Default::default()
        };
        let outcome = req.to_outcome(&seats).unwrap();
        assert_eq!(outcome.placements, vec![(seats[0], Position::First)]);
        assert!(outcome.sweep);
    }

    #[test]
    fn test_winner_required_and_seated() {
        let seats = seated();
        let req = UpdateTableResultRequest::default();
        assert_eq!(req.to_outcome(&seats), Err(OutcomeError::MissingWinner));

        let req = UpdateTableResultRequest {
            winner_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(req.to_outcome(&seats), Err(OutcomeError::MissingWinner));
    }

    #[test]
    fn test_duplicate_placement_rejected() {
        let seats = seated();
        let req = UpdateTableResultRequest {
            winner_id: Some(seats[0]),
            second_id: Some(seats[1]),
            third_id: Some(seats[1]),
            ..Default::default()
        };
        assert_eq!(
            req.to_outcome(&seats),
            Err(OutcomeError::DuplicatePlacement)
        );
    }

    #[test]
    fn test_outsiders_rejected() {
        let seats = seated();
        let req = UpdateTableResultRequest {
            winner_id: Some(seats[0]),
            third_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(req.to_outcome(&seats), Err(OutcomeError::NotSeated("third")));

        let req = UpdateTableResultRequest {
            winner_id: Some(seats[0]),
            save_player_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert_eq!(
            req.to_outcome(&seats),
            Err(OutcomeError::NotSeated("save player"))
        );
    }

    #[test]
    fn test_blank_banned_card_is_none() {
        let seats = seated();
        let req = UpdateTableResultRequest {
            banned_card: Some("   ".to_string()),
            winner_id: Some(seats[2]),
            ..Default::default()
        };
        assert_eq!(req.to_outcome(&seats).unwrap().banned_card, None);
    }
}
