use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request payload for registering a new player
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be between 1 and 64 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

impl CreatePlayerRequest {
    /// Name as it will be stored.
    pub fn normalized_name(&self) -> &str {
        self.name.trim()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerResponse {
    pub player_id: Uuid,
    pub name: String,
    pub active: bool,
}

/// Player row for the admin roster, including inactive players.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerAdminEntry {
    pub player_id: Uuid,
    pub name: String,
    pub active: bool,
    /// Number of tables the player has been seated at.
    pub results_count: i64,
}

fn validate_not_blank(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        return Err(validator::ValidationError::new("blank_name"));
    }
    Ok(())
}

impl From<crate::models::Player> for PlayerResponse {
    fn from(player: crate::models::Player) -> Self {
        Self {
            player_id: player.player_id,
            name: player.name,
            active: player.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let req = CreatePlayerRequest {
            name: "   ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_name_is_trimmed() {
        let req = CreatePlayerRequest {
            name: "  Omar ".to_string(),
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.normalized_name(), "Omar");
    }
}
