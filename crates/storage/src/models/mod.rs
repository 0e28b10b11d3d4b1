pub mod game_table;
pub mod player;
pub mod position;
pub mod round;

pub use game_table::{GameTable, TableResult};
pub use player::Player;
pub use position::Position;
pub use round::Round;
