use crate::models::Position;

/// Points for a finish. On a sweep only the winner scores.
pub fn points_for_position(position: Option<Position>, sweep: bool) -> i64 {
    match (position, sweep) {
        (None, _) => 0,
        (Some(Position::First), _) => 3,
        (Some(_), true) => 0,
        (Some(Position::Second), false) => 2,
        (Some(Position::Third), false) => 1,
    }
}

/// Flat bonus for the table's designated save player, independent of finish.
pub const SAVE_BONUS: i64 = 1;

/// Richest outcome a single table can give one player: a sweep win plus the
/// save bonus.
pub const MAX_POINTS_PER_TABLE: i64 = 3 + SAVE_BONUS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_only_winner_scores() {
        assert_eq!(points_for_position(Some(Position::First), true), 3);
        assert_eq!(points_for_position(Some(Position::Second), true), 0);
        assert_eq!(points_for_position(Some(Position::Third), true), 0);
        assert_eq!(points_for_position(None, true), 0);
    }

    #[test]
    fn test_regular_table_podium() {
        assert_eq!(points_for_position(Some(Position::First), false), 3);
        assert_eq!(points_for_position(Some(Position::Second), false), 2);
        assert_eq!(points_for_position(Some(Position::Third), false), 1);
        assert_eq!(points_for_position(None, false), 0);
    }

    #[test]
    fn test_max_points_per_table() {
        let best = points_for_position(Some(Position::First), true) + SAVE_BONUS;
        assert_eq!(MAX_POINTS_PER_TABLE, best);
    }
}
