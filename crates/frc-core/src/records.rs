//! Position and evaluation records.
//!
//! These are the types the analysis stages persist between runs. The
//! JSON field names are camelCase to stay compatible with the record
//! files already on disk.

use serde::{Deserialize, Serialize};

/// One Chess960 starting position, numbered by its roster index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    /// Position number from the source roster (1-960 for the
    /// canonical set).
    pub position_number: i64,
    /// The full starting FEN.
    pub fen: String,
}

/// A position together with the engine's single best move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMoveRecord {
    #[serde(flatten)]
    pub position: PositionRecord,
    /// Best move in UCI notation.
    pub best_move: String,
    /// Evaluation in pawn units; mates appear as the signed 999 sentinel.
    pub eval: f64,
    /// Principal variation for the best move. Empty unless the record
    /// came from a deepened search.
    #[serde(default)]
    pub line: Vec<String>,
}

/// A position together with the engine's ranked candidate moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMovesRecord {
    #[serde(flatten)]
    pub position: PositionRecord,
    /// Candidate moves, best first.
    pub top_moves: Vec<String>,
    /// Evaluations in pawn units, parallel to `top_moves`.
    pub evals: Vec<f64>,
}

impl PositionRecord {
    /// Creates a new position record.
    #[must_use]
    pub fn new(position_number: i64, fen: impl Into<String>) -> Self {
        Self {
            position_number,
            fen: fen.into(),
        }
    }
}
