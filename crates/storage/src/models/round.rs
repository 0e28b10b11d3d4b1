use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-round record. Only carries the designated bye for now; tables
/// reference rounds by number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Round {
    pub number: i64,
    pub bye_player_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}
