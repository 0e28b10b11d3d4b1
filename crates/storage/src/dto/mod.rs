pub mod player;
pub mod round;
pub mod standings;
pub mod table;
