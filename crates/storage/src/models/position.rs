use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Recorded finish at a table. Anything outside the podium is stored as NULL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    First,
    Second,
    Third,
}

impl Position {
    pub fn from_db(value: Option<i64>) -> Option<Self> {
        match value {
            Some(1) => Some(Self::First),
            Some(2) => Some(Self::Second),
            Some(3) => Some(Self::Third),
            _ => None,
        }
    }

    pub fn as_db(self) -> i64 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_db_maps_podium() {
        assert_eq!(Position::from_db(Some(1)), Some(Position::First));
        assert_eq!(Position::from_db(Some(2)), Some(Position::Second));
        assert_eq!(Position::from_db(Some(3)), Some(Position::Third));
    }

    #[test]
    fn test_from_db_outside_podium_is_none() {
        assert_eq!(Position::from_db(None), None);
        assert_eq!(Position::from_db(Some(4)), None);
        assert_eq!(Position::from_db(Some(0)), None);
    }

    #[test]
    fn test_as_db_matches_from_db() {
        for p in [Position::First, Position::Second, Position::Third] {
            assert_eq!(Position::from_db(Some(p.as_db())), Some(p));
        }
    }
}
