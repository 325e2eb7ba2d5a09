pub mod export;
pub mod game;
pub mod ghost;
pub mod handicap;
pub mod model;
pub mod settle;
