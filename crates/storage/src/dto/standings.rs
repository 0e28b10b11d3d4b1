use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Projection of a player's top-4 prospects given the remaining tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Top-4 finish is guaranteed.
    Classified,
    /// Top-4 finish is out of reach.
    Eliminated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StandingRow {
    pub rank: u32,
    pub player_id: Uuid,
    pub name: String,
    pub points: i64,
    pub wins: i64,
    pub seconds: i64,
    pub thirds: i64,
    pub saves: i64,
    pub verdict: Option<Verdict>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ParticipationRow {
    pub player_id: Uuid,
    pub name: String,
    pub played: i64,
    pub remaining: i64,
    pub rests: i64,
    pub planned_to_play: i64,
    /// Points already secured.
    pub min_points: i64,
    /// Best reachable total if every remaining table is a sweep win with save.
    pub max_points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StandingsResponse {
    pub standings: Vec<StandingRow>,
    pub participation: Vec<ParticipationRow>,
    pub total_rounds: i64,
}
