//! Core chess data types and parsing shared by the insights pipeline.

pub mod country;
pub mod game_data;
pub mod opening;
pub mod pgn;
