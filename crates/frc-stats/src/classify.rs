//! Classification of first moves against their home-rank layout.

use thiserror::Error;

/// Errors that can occur when classifying a move.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("move '{0}' is not in coordinate notation")]
    MalformedMove(String),

    #[error("file '{0}' is out of range a-h")]
    BadFile(char),

    #[error("layout '{0}' must be 8 piece letters")]
    MalformedLayout(String),
}

/// What kind of opening move was played, judged from its squares alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// A piece moved off the home rank; in a starting position that is
    /// always a knight.
    BackRank,
    /// A pawn advanced one square.
    PawnSingle,
    /// A pawn advanced two squares.
    PawnDouble,
}

/// Classification of one opening move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveClass {
    /// What kind of move it was.
    pub kind: MoveKind,
    /// Distance of the starting file from the center files: 0 for d/e
    /// out to 3 for a/h.
    pub center_distance: u8,
    /// The slice of the layout around the starting file: the corner
    /// pair for edge files, otherwise the triplet centered on the file.
    pub neighborhood: String,
    /// The starting file letter.
    pub file: char,
    /// The layout piece standing on the starting file.
    pub backing_piece: char,
}

/// Classify a move in coordinate notation (`c2c4`) against the layout
/// string of the position's home rank (`RNKQBBNR`).
pub fn classify(mv: &str, layout: &str) -> Result<MoveClass, ClassifyError> {
    let bytes = mv.as_bytes();
    if bytes.len() < 4 {
        return Err(ClassifyError::MalformedMove(mv.to_string()));
    }
    if layout.len() != 8 || !layout.is_ascii() {
        return Err(ClassifyError::MalformedLayout(layout.to_string()));
    }

    let file = bytes[0] as char;
    let file_index = match file {
        'a'..='h' => (bytes[0] - b'a') as usize,
        _ => return Err(ClassifyError::BadFile(file)),
    };
    let start_rank = bytes[1] as char;
    let end_rank = bytes[3] as char;

    let kind = if start_rank == '1' {
        MoveKind::BackRank
    } else if end_rank == '3' {
        MoveKind::PawnSingle
    } else {
        MoveKind::PawnDouble
    };

    let center_distance = match file {
        'd' | 'e' => 0,
        'c' | 'f' => 1,
        'b' | 'g' => 2,
        _ => 3,
    };

    let (start, end) = neighborhood_bounds(file_index);

    Ok(MoveClass {
        kind,
        center_distance,
        neighborhood: layout[start..end].to_string(),
        file,
        backing_piece: layout.as_bytes()[file_index] as char,
    })
}

/// The layout slice around a file: the corner pair at the edges, a
/// centered triplet everywhere else.
fn neighborhood_bounds(file_index: usize) -> (usize, usize) {
    match file_index {
        0 => (0, 2),
        7 => (6, 8),
        i => (i - 1, i + 2),
    }
}
