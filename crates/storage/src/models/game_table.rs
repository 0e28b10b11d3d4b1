use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Position;

/// One table (game) of a round.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GameTable {
    pub table_id: Uuid,
    pub round_number: i64,
    pub table_no: i64,
    pub banned_card: Option<String>,
    /// Only the winner scores when set.
    pub sweep: bool,
    /// Player awarded the flat +1 save bonus.
    pub save_player_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

/// A seated player's finish at a table. Owned by its [`GameTable`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TableResult {
    pub table_id: Uuid,
    pub player_id: Uuid,
    pub position: Option<i64>,
}

impl TableResult {
    pub fn finish(&self) -> Option<Position> {
        Position::from_db(self.position)
    }
}
