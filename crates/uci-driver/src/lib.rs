//! Synchronous driver for UCI analysis engines.
//!
//! This crate spawns an external engine (Stockfish) as a subprocess,
//! runs the UCI handshake, and turns its streaming, human-oriented
//! output into typed search results for Chess960 opening analysis.
//!
//! # Overview
//!
//! - [`Score`] - Centipawn or forced-mate evaluation
//! - [`EngineEvent`] - One classified line of engine output
//! - [`VariationTable`] - Longest-variation tracking across a search
//! - [`EngineConfig`] - Engine path and search/option tunables
//! - [`EngineSession`] - The subprocess and its request/response loop
//!
//! # Example
//!
//! ```ignore
//! use uci_driver::{EngineConfig, EngineSession};
//!
//! let mut session = EngineSession::spawn(EngineConfig::default())?;
//! let top = session.evaluate_top(fen, 2)?;
//! println!("{} ({:.2}) over {} ({:.2})",
//!     top.moves[0], top.scores[0], top.moves[1], top.scores[1]);
//! session.quit()?;
//! ```

pub mod config;
pub mod response;
pub mod score;
pub mod session;
pub mod variation;

pub use config::EngineConfig;
pub use response::{EngineEvent, SearchInfo};
pub use score::{Score, MATE_SENTINEL_PAWNS};
pub use session::{BestMove, DeepBestMove, EngineError, EngineSession, RankedMoves};
pub use variation::VariationTable;
