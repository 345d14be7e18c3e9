//! Core types for Chess960 opening analysis.
//!
//! This crate provides the pieces shared by the analysis stages:
//! - [`PositionRecord`], [`BestMoveRecord`], [`TopMovesRecord`] - the
//!   records persisted between stages
//! - FEN field access and starting-position synthesis ([`fen`])
//! - Roster-text ingestion ([`roster`])

pub mod fen;
pub mod records;
pub mod roster;

pub use fen::{FenError, FenField, STARTPOS};
pub use records::{BestMoveRecord, PositionRecord, TopMovesRecord};
pub use roster::{parse_roster, Roster};
