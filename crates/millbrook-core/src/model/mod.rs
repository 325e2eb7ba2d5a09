pub mod course;
pub mod junk;
pub mod money;
pub mod player;
pub mod score;
pub mod team;
