use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Position;

/// Players seated at each table of a round.
pub const TABLE_SIZE: usize = 4;

/// Where a player sits in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Table1,
    Table2,
    Bye,
    Unassigned,
}

/// Request payload assigning every active player to a slot of the round
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RoundAssignmentRequest {
    pub assignments: HashMap<Uuid, Slot>,
}

/// A validated 4 + 4 + 1 split of the active roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPartition {
    pub table1: Vec<Uuid>,
    pub table2: Vec<Uuid>,
    pub bye: Uuid,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("Player {0} is not an active player")]
    UnknownPlayer(Uuid),

    #[error("Only one player can rest per round")]
    MultipleByes,

    #[error("Exactly one player must be left out of the tables to rest, found {0}")]
    ByeNotDetermined(usize),

    #[error("Table {table_no} must have exactly 4 players, got {actual}")]
    TableSize { table_no: i64, actual: usize },

    #[error("Every active player must be placed exactly once ({placed} of {expected} placed)")]
    Incomplete { placed: usize, expected: usize },
}

impl RoundAssignmentRequest {
    /// Check the assignment is a total, conflict-free partition of `active`.
    ///
    /// Players missing from the map count as unassigned. When no bye is given
    /// and exactly one player is left over, that player rests.
    pub fn to_partition(&self, active: &[Uuid]) -> Result<RoundPartition, AssignmentError> {
        let roster: BTreeSet<Uuid> = active.iter().copied().collect();
        let mut table1 = Vec::new();
        let mut table2 = Vec::new();
        let mut bye = None;

        for (player_id, slot) in &self.assignments {
            if !roster.contains(player_id) {
                return Err(AssignmentError::UnknownPlayer(*player_id));
            }
            match slot {
                Slot::Table1 => table1.push(*player_id),
                Slot::Table2 => table2.push(*player_id),
                Slot::Bye if bye.is_some() => return Err(AssignmentError::MultipleByes),
                Slot::Bye => bye = Some(*player_id),
                Slot::Unassigned => {}
            }
        }

        let bye = match bye {
            Some(bye) => bye,
            None => {
                let leftover: Vec<Uuid> = roster
                    .iter()
                    .filter(|id| !table1.contains(id) && !table2.contains(id))
                    .copied()
                    .collect();
                match leftover.as_slice() {
                    [only] => *only,
                    _ => return Err(AssignmentError::ByeNotDetermined(leftover.len())),
                }
            }
        };

        for (table_no, seats) in [(1, &table1), (2, &table2)] {
            if seats.len() != TABLE_SIZE {
                return Err(AssignmentError::TableSize {
                    table_no,
                    actual: seats.len(),
                });
            }
        }

        let placed = table1.len() + table2.len() + 1;
        if placed != roster.len() {
            return Err(AssignmentError::Incomplete {
                placed,
                expected: roster.len(),
            });
        }

        table1.sort();
        table2.sort();

        Ok(RoundPartition {
            table1,
            table2,
            bye,
        })
    }
}

/// Request payload for changing a round's resting player
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetByeRequest {
    pub bye_player_id: Option<Uuid>,
}

/// Current composition of a round
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundAssignmentResponse {
    pub round_number: i64,
    pub table1: Vec<Uuid>,
    pub table2: Vec<Uuid>,
    pub bye_player_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedRoundResponse {
    pub number: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerRef {
    pub player_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantView {
    pub player_id: Uuid,
    pub name: String,
    pub position: Option<Position>,
}

/// One table as shown in the rounds overview
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableOverview {
    pub table_id: Uuid,
    pub table_no: i64,
    /// Podium first, unplaced players last.
    pub participants: Vec<ParticipantView>,
    pub winner: Option<String>,
    pub second: Option<String>,
    pub third: Option<String>,
    pub banned_card: Option<String>,
    pub sweep: bool,
    pub save: Option<String>,
    /// Has a winner (or is a sweep) and counts toward participation.
    pub played: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundOverview {
    pub number: i64,
    pub bye: Option<PlayerRef>,
    pub tables: Vec<TableOverview>,
}
