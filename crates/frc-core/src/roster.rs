//! Roster-text ingestion.
//!
//! Source rosters are free-form text: position numbers followed by one
//! or more 8-letter back-rank layouts, with headings, punctuation, and
//! editorial fragments scattered in between. Parsing never fails; the
//! caller decides what to do about tokens it doesn't recognize.

use crate::fen;
use crate::records::PositionRecord;

/// Characters stripped from token edges before interpretation.
const PUNCTUATION: &[char] = &[
    '&', '(', ')', ',', '-', '.', '/', ';', '?', '[', ']', '^',
];

/// Result of parsing a roster text.
#[derive(Debug, Default, PartialEq)]
pub struct Roster {
    /// Position records, in source order.
    pub positions: Vec<PositionRecord>,
    /// Tokens that were neither numbers nor back ranks, verbatim.
    pub unrecognized: Vec<String>,
}

/// Parse roster text into position records.
///
/// A number token sets the current position number; each back-rank
/// token yields a record under that number; everything else lands in
/// [`Roster::unrecognized`].
pub fn parse_roster(text: &str) -> Roster {
    let mut roster = Roster::default();
    let mut current_number: i64 = 0;

    for raw in text.split_whitespace() {
        let token = raw.trim_matches(PUNCTUATION);
        if token.is_empty() {
            continue;
        }
        if let Ok(number) = token.parse::<i64>() {
            current_number = number;
            continue;
        }
        match fen::startpos_from_back_rank(token) {
            Ok(start) => roster
                .positions
                .push(PositionRecord::new(current_number, start)),
            Err(_) => roster.unrecognized.push(raw.to_string()),
        }
    }

    roster
}
