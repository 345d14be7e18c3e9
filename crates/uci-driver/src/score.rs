//! Engine evaluation scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pawn-unit magnitude substituted for a mate score when ranking moves.
///
/// Large enough to sort above any centipawn evaluation Stockfish
/// reports, small enough to stay readable in record files.
pub const MATE_SENTINEL_PAWNS: f64 = 999.0;

/// An evaluation reported by the engine, from the point of view of the
/// side to move.
///
/// Exactly one of the two encodings applies to a given line: a
/// centipawn score for ordinary positions, or a signed mate distance
/// when the search proves a forced mate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Score in centipawns.
    Cp(i32),
    /// Forced mate in the given number of moves; negative means the
    /// side to move is getting mated.
    Mate(i32),
}

impl Score {
    /// Parse the two tokens following `score` on an info line.
    ///
    /// Returns `None` for an unknown kind, a non-numeric value, or
    /// `mate 0`, which never describes a searchable position.
    pub fn from_uci(kind: &str, value: &str) -> Option<Self> {
        match kind {
            "cp" => value.parse().ok().map(Score::Cp),
            "mate" => match value.parse().ok()? {
                0 => None,
                n => Some(Score::Mate(n)),
            },
            _ => None,
        }
    }

    /// Convert to fractional pawn units for ranking and record output.
    ///
    /// Centipawns divide by 100 exactly; mate scores collapse to the
    /// signed sentinel so they outrank every centipawn value. Match on
    /// the variant instead where the mate distance matters.
    #[must_use]
    pub fn pawns(self) -> f64 {
        match self {
            Score::Cp(cp) => f64::from(cp) / 100.0,
            Score::Mate(n) if n > 0 => MATE_SENTINEL_PAWNS,
            Score::Mate(_) => -MATE_SENTINEL_PAWNS,
        }
    }

    /// True when this score is a forced mate.
    #[must_use]
    pub fn is_mate(self) -> bool {
        matches!(self, Score::Mate(_))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cp(cp) => write!(f, "{:.2}", f64::from(*cp) / 100.0),
            Score::Mate(n) => write!(f, "#{}", n),
        }
    }
}
