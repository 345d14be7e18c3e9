//! FEN field access and Chess960 starting-position synthesis.

use thiserror::Error;

/// The standard chess starting position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when working with FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("missing FEN field: {0:?}")]
    MissingField(FenField),

    #[error("invalid back rank '{0}': expected 8 uppercase piece letters")]
    InvalidBackRank(String),
}

/// The six whitespace-separated fields of a FEN string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenField {
    PiecePlacement,
    SideToMove,
    Castling,
    EnPassantTarget,
    HalfmoveClock,
    FullmoveCounter,
}

impl FenField {
    fn index(self) -> usize {
        match self {
            FenField::PiecePlacement => 0,
            FenField::SideToMove => 1,
            FenField::Castling => 2,
            FenField::EnPassantTarget => 3,
            FenField::HalfmoveClock => 4,
            FenField::FullmoveCounter => 5,
        }
    }
}

/// Extract one field of a FEN string.
///
/// A missing field is an error, never an empty string.
pub fn field(fen: &str, field: FenField) -> Result<&str, FenError> {
    fen.split_whitespace()
        .nth(field.index())
        .ok_or(FenError::MissingField(field))
}

/// White's back rank of the placement field: the 8-character layout
/// string the opening statistics are keyed on.
pub fn home_rank(fen: &str) -> Result<&str, FenError> {
    let placement = field(fen, FenField::PiecePlacement)?;
    Ok(placement.rsplit('/').next().unwrap_or(placement))
}

/// Synthesize a full Chess960 starting FEN from an 8-letter back rank.
///
/// The rank is embedded lowercased on black's side and uppercased on
/// white's, between the fixed pawn ranks, the empty middle, and the
/// standard first-move fields.
pub fn startpos_from_back_rank(rank: &str) -> Result<String, FenError> {
    if rank.len() != 8 || !rank.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(FenError::InvalidBackRank(rank.to_string()));
    }
    let lower = rank.to_ascii_lowercase();
    Ok(format!(
        "{}/pppppppp/8/8/8/8/PPPPPPPP/{} w KQkq - 0 1",
        lower, rank
    ))
}
