//! Monthly Chess.com insights: opponent countries, outcomes and openings.

pub mod analysis;
pub mod charts;
pub mod clients;
pub mod config;
pub mod error;
pub mod filter;
pub mod openings;
pub mod opponents;
pub mod outcomes;
pub mod prompt;
pub mod report;
