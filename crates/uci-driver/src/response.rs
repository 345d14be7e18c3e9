//! Classification of raw engine output lines.
//!
//! The engine's stdout is a stream of newline-delimited, human-oriented
//! text with no framing: search progress, option listings, board
//! diagrams, and the handful of lines the driver actually acts on.
//! [`EngineEvent::classify`] maps each raw line to a tagged event in a
//! single pass over its whitespace tokens; nothing is compiled or
//! cached per call.

use crate::score::Score;

/// One parsed `info` line that carried a score.
///
/// Fields the engine did not report stay `None`; they are never
/// defaulted. A scored line may still have an empty variation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// 1-based rank of this line when the engine searches in
    /// multi-variation mode.
    pub multipv: Option<u32>,
    /// The evaluation carried by the line.
    pub score: Score,
    /// Principal variation: every token after the `pv` marker, in order.
    pub pv: Vec<String>,
}

/// A single line of engine output, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// `uciok` handshake acknowledgement.
    UciOk,
    /// An `info` line carrying a score.
    Info(SearchInfo),
    /// `bestmove <move> ...`, the terminal event of a search.
    BestMove(String),
    /// The `Fen:` line of a board report, payload verbatim.
    Fen(String),
    /// Anything else. Engines emit plenty of diagnostics; these are
    /// skipped, never treated as errors.
    Unknown,
}

impl EngineEvent {
    /// Classify one raw output line.
    pub fn classify(line: &str) -> EngineEvent {
        let line = line.trim();

        if line == "uciok" {
            return EngineEvent::UciOk;
        }
        if let Some(rest) = line.strip_prefix("bestmove ") {
            if let Some(mv) = rest.split_whitespace().next() {
                return EngineEvent::BestMove(mv.to_string());
            }
            return EngineEvent::Unknown;
        }
        if let Some(rest) = line.strip_prefix("Fen:") {
            return EngineEvent::Fen(rest.trim().to_string());
        }
        if line == "info" || line.starts_with("info ") {
            if let Some(info) = parse_info(line) {
                return EngineEvent::Info(info);
            }
        }
        EngineEvent::Unknown
    }
}

/// Walk the tokens of an `info` line.
///
/// The first syntactically valid `score cp <n>` or `score mate <n>`
/// pair wins; later score tokens are ignored. Everything after the
/// first standalone `pv` marker is variation, even tokens that look
/// like keywords. A line without a valid score yields `None`.
fn parse_info(line: &str) -> Option<SearchInfo> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let mut depth: Option<u32> = None;
    let mut multipv: Option<u32> = None;
    let mut score: Option<Score> = None;
    let mut pv: Vec<String> = Vec::new();
    let mut in_pv = false;

    let mut i = 0;
    while i < parts.len() {
        if in_pv {
            pv.push(parts[i].to_string());
            i += 1;
            continue;
        }
        match parts[i] {
            "depth" => {
                if i + 1 < parts.len() {
                    depth = parts[i + 1].parse().ok();
                    i += 1;
                }
            }
            "multipv" => {
                if i + 1 < parts.len() {
                    multipv = parts[i + 1].parse().ok();
                    i += 1;
                }
            }
            "score" => {
                if score.is_none() && i + 2 < parts.len() {
                    if let Some(parsed) = Score::from_uci(parts[i + 1], parts[i + 2]) {
                        score = Some(parsed);
                        i += 2;
                    }
                }
            }
            "pv" => {
                in_pv = true;
            }
            _ => {}
        }
        i += 1;
    }

    Some(SearchInfo {
        depth,
        multipv,
        score: score?,
        pv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_uciok() {
        assert_eq!(EngineEvent::classify("uciok"), EngineEvent::UciOk);
        assert_eq!(EngineEvent::classify("  uciok  "), EngineEvent::UciOk);
        assert_eq!(EngineEvent::classify("uciok trailing"), EngineEvent::Unknown);
    }

    #[test]
    fn test_classify_bestmove() {
        assert_eq!(
            EngineEvent::classify("bestmove e2e4 ponder e7e5"),
            EngineEvent::BestMove("e2e4".to_string())
        );
        assert_eq!(
            EngineEvent::classify("bestmove (none)"),
            EngineEvent::BestMove("(none)".to_string())
        );
    }

    #[test]
    fn test_classify_fen_report() {
        let line = "Fen: bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w KQkq - 0 1";
        assert_eq!(
            EngineEvent::classify(line),
            EngineEvent::Fen("bbqnnrkr/pppppppp/8/8/8/8/PPPPPPPP/BBQNNRKR w KQkq - 0 1".to_string())
        );
    }

    #[test]
    fn test_classify_info_centipawns() {
        let line = "info depth 15 seldepth 21 multipv 1 score cp 35 nodes 50000 pv e2e4 e7e5";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => {
                assert_eq!(info.depth, Some(15));
                assert_eq!(info.multipv, Some(1));
                assert_eq!(info.score, Score::Cp(35));
                assert_eq!(info.pv, vec!["e2e4", "e7e5"]);
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_info_mate() {
        let line = "info depth 12 score mate -3 pv d8h4";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => {
                assert_eq!(info.score, Score::Mate(-3));
                assert_eq!(info.pv, vec!["d8h4"]);
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_info_without_score_is_unknown() {
        assert_eq!(
            EngineEvent::classify("info depth 5 currmove e2e4 currmovenumber 1"),
            EngineEvent::Unknown
        );
        assert_eq!(
            EngineEvent::classify("info string NNUE evaluation using nn-ad9b42354671.nnue"),
            EngineEvent::Unknown
        );
    }

    #[test]
    fn test_classify_info_mate_zero_is_unknown() {
        assert_eq!(
            EngineEvent::classify("info depth 1 score mate 0"),
            EngineEvent::Unknown
        );
    }

    #[test]
    fn test_classify_other_lines_are_unknown() {
        assert_eq!(EngineEvent::classify("readyok"), EngineEvent::Unknown);
        assert_eq!(EngineEvent::classify(""), EngineEvent::Unknown);
        assert_eq!(
            EngineEvent::classify("option name Hash type spin default 16 min 1 max 33554432"),
            EngineEvent::Unknown
        );
        assert_eq!(EngineEvent::classify("bestmove"), EngineEvent::Unknown);
    }

    #[test]
    fn test_first_valid_score_wins() {
        let line = "info depth 9 score cp 40 score cp -700 pv a2a3";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => assert_eq!(info.score, Score::Cp(40)),
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_score_pair_does_not_block_later_one() {
        let line = "info depth 9 score wdl 900 score cp 25 pv a2a3";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => assert_eq!(info.score, Score::Cp(25)),
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_pv_runs_to_end_of_line() {
        let line = "info depth 8 score cp 10 pv e2e4 depth e7e5 score g1f3";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => {
                assert_eq!(info.pv, vec!["e2e4", "depth", "e7e5", "score", "g1f3"]);
                assert_eq!(info.depth, Some(8));
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let line = "info score cp 20";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => {
                assert_eq!(info.depth, None);
                assert_eq!(info.multipv, None);
                assert!(info.pv.is_empty());
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }

    #[test]
    fn test_score_bound_markers_are_tolerated() {
        let line = "info depth 11 score cp 13 lowerbound nodes 300 pv c2c4";
        match EngineEvent::classify(line) {
            EngineEvent::Info(info) => {
                assert_eq!(info.score, Score::Cp(13));
                assert_eq!(info.pv, vec!["c2c4"]);
            }
            other => panic!("Expected Info, got {:?}", other),
        }
    }
}
