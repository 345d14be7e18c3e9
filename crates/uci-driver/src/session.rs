//! Engine process ownership and the search session state machine.
//!
//! One [`EngineSession`] owns one engine subprocess for its whole life:
//! spawn and UCI handshake, strictly request/response searches over the
//! stdin/stdout pipes, and shutdown. The response scans are written as
//! folds over a line iterator so the protocol logic is testable against
//! plain transcripts without a process.

use crate::config::EngineConfig;
use crate::response::{EngineEvent, SearchInfo};
use crate::score::Score;
use crate::variation::VariationTable;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur while driving an engine subprocess.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine executable was not found at the configured path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Failed to spawn the engine process.
    #[error("Failed to spawn engine: {0}")]
    Spawn(#[source] std::io::Error),
    /// Reading from or writing to the engine failed.
    #[error("Engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Output ended before the `uciok` handshake acknowledgement.
    #[error("Engine closed before completing the UCI handshake")]
    HandshakeFailed,
    /// Output ended before a `bestmove` terminated the search.
    #[error("Engine closed before reporting a best move")]
    NoBestMove,
    /// Output ended before a `Fen:` board report arrived.
    #[error("Engine closed before reporting the resulting position")]
    NoPositionReport,
    /// A response scan kept consuming lines past the configured deadline.
    #[error("Engine response exceeded the {0:?} deadline")]
    Timeout(Duration),
    /// The engine did not exit cleanly on `quit`.
    #[error("Engine shutdown failed: {0}")]
    Shutdown(std::io::Error),
}

/// Outcome of a single-best search.
#[derive(Debug, Clone)]
pub struct BestMove {
    /// The move the engine settled on, in UCI notation.
    pub mv: String,
    /// The last score reported at the configured depth ceiling, if the
    /// search got that far within its time budget.
    pub score: Option<Score>,
}

/// Outcome of a ranked multi-move search.
///
/// The two vectors are parallel and rank-ordered, best first.
#[derive(Debug, Clone)]
pub struct RankedMoves {
    /// The engine's candidate moves.
    pub moves: Vec<String>,
    /// Scores in pawn units, mates collapsed to the sentinel.
    pub scores: Vec<f64>,
}

/// Outcome of a deepened single-best search.
#[derive(Debug, Clone)]
pub struct DeepBestMove {
    /// The move the engine settled on.
    pub mv: String,
    /// The most recent score seen at any depth. The terminal `bestmove`
    /// line carries no score of its own, so this is reconstructed from
    /// the search history.
    pub score: Option<Score>,
    /// The longest principal variation recorded for the best move;
    /// empty when the engine never reported one for it.
    pub line: Vec<String>,
}

/// A running engine subprocess driven over the UCI protocol.
///
/// Every operation takes `&mut self`: a session is strictly
/// request/response and never has two commands in flight. For parallel
/// workloads, spawn independent sessions.
///
/// # Example
///
/// ```no_run
/// use uci_driver::{EngineConfig, EngineSession};
///
/// let config = EngineConfig {
///     engine_path: "/usr/bin/stockfish".to_string(),
///     ..EngineConfig::default()
/// };
/// let mut session = EngineSession::spawn(config)?;
/// let result = session.evaluate("rnkqbbnr/pppppppp/8/8/8/8/PPPPPPPP/RNKQBBNR w KQkq - 0 1")?;
/// println!("best move: {}", result.mv);
/// session.quit()?;
/// # Ok::<(), uci_driver::EngineError>(())
/// ```
pub struct EngineSession {
    /// The engine process handle.
    process: Child,
    /// Writer for sending commands to the engine.
    stdin: ChildStdin,
    /// Buffered reader for the engine's stdout.
    stdout: BufReader<ChildStdout>,
    /// The engine's name as reported during the handshake.
    name: String,
    config: EngineConfig,
    /// Set once shutdown has run, on any path.
    finished: bool,
}

impl EngineSession {
    /// Spawn the engine, run the UCI handshake, and apply the
    /// configured options.
    ///
    /// The returned session is ready for searches. On any error no
    /// session value exists; a process that got as far as spawning is
    /// cleaned up internally.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if an explicit path doesn't exist
    /// - [`EngineError::Spawn`] if the process cannot be started
    /// - [`EngineError::HandshakeFailed`] if output ends before `uciok`
    /// - [`EngineError::Timeout`] if the handshake outlasts the deadline
    pub fn spawn(config: EngineConfig) -> Result<Self, EngineError> {
        // A bare command name resolves through PATH at spawn time; only
        // an explicit path can be checked up front.
        if config.engine_path.contains('/') && !Path::new(&config.engine_path).exists() {
            return Err(EngineError::NotFound(config.engine_path.clone()));
        }

        let mut process = Command::new(&config.engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(EngineError::Spawn)?;

        let stdin = process.stdin.take().ok_or(EngineError::HandshakeFailed)?;
        let stdout = process.stdout.take().ok_or(EngineError::HandshakeFailed)?;
        let stdout = BufReader::new(stdout);

        let mut session = Self {
            process,
            stdin,
            stdout,
            name: String::new(),
            config,
            finished: false,
        };

        session.handshake()?;
        session.apply_options()?;

        Ok(session)
    }

    /// The engine's name as reported during the handshake.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Search the position and return the best move, with the score
    /// the engine reported at the configured depth ceiling.
    ///
    /// When the time budget cuts the search short of the ceiling no
    /// score is returned; the move is still valid.
    pub fn evaluate(&mut self, fen: &str) -> Result<BestMove, EngineError> {
        self.go(fen)?;
        let deadline = self.config.deadline();
        scan_single(
            response_lines(&mut self.stdout, deadline),
            self.config.depth,
        )
    }

    /// Search the position with the engine ranking its `fan_out` best
    /// moves.
    ///
    /// Sets the engine's `MultiPV` option and leaves it set; a session
    /// that mixes ranked and single searches should be split into one
    /// session per mode. A fan-out of zero is treated as one.
    pub fn evaluate_top(&mut self, fen: &str, fan_out: u32) -> Result<RankedMoves, EngineError> {
        let fan_out = fan_out.max(1);
        self.send(&format!("setoption name MultiPV value {}", fan_out))?;
        self.go(fen)?;
        let deadline = self.config.deadline();
        scan_ranked(response_lines(&mut self.stdout, deadline), fan_out)
    }

    /// Search the position keeping the whole variation history, and
    /// return the best move together with its longest recorded line.
    pub fn evaluate_deep(&mut self, fen: &str) -> Result<DeepBestMove, EngineError> {
        self.go(fen)?;
        let deadline = self.config.deadline();
        scan_deep(response_lines(&mut self.stdout, deadline))
    }

    /// Ask the engine for the FEN of `fen` after playing `mv`.
    ///
    /// Uses the engine's board display; no move generation happens on
    /// this side of the pipe.
    pub fn fen_after_move(&mut self, fen: &str, mv: &str) -> Result<String, EngineError> {
        self.send(&format!("position fen {} moves {}", fen, mv))?;
        self.send("d")?;
        let deadline = self.config.deadline();
        scan_fen(response_lines(&mut self.stdout, deadline))
    }

    /// Send `quit` and wait for the engine to exit.
    ///
    /// Shutdown runs once per session; later calls and [`Drop`] are
    /// no-ops. A failed send is ignored because the engine may already
    /// have exited.
    pub fn quit(&mut self) -> Result<(), EngineError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let _ = self.send("quit");
        self.process.wait().map_err(EngineError::Shutdown)?;
        Ok(())
    }

    /// Send one command line to the engine.
    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Send the position and start the search with the configured bounds.
    fn go(&mut self, fen: &str) -> Result<(), EngineError> {
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!(
            "go depth {} movetime {}",
            self.config.depth, self.config.movetime_ms
        ))
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        let deadline = self.config.deadline();
        self.name = scan_handshake(response_lines(&mut self.stdout, deadline))?;
        Ok(())
    }

    fn apply_options(&mut self) -> Result<(), EngineError> {
        if self.config.chess960 {
            self.send("setoption name UCI_Chess960 value true")?;
        }
        self.send(&format!(
            "setoption name Threads value {}",
            self.config.threads
        ))?;
        self.send(&format!("setoption name Hash value {}", self.config.hash_mb))
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Abandoned session: try quit, then make sure the process dies
        // and gets reaped.
        let _ = self.send("quit");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Iterate the engine's output line by line, enforcing the scan
/// deadline between reads.
///
/// Yields `None` at stream EOF; each scan maps that to the typed error
/// naming the response it was waiting for. The deadline catches an
/// engine that keeps talking without reaching its terminal event; one
/// that goes silent blocks on the OS read instead.
fn response_lines(
    stdout: &mut BufReader<ChildStdout>,
    deadline: Duration,
) -> impl Iterator<Item = Result<String, EngineError>> + '_ {
    let start = Instant::now();
    std::iter::from_fn(move || {
        if start.elapsed() > deadline {
            return Some(Err(EngineError::Timeout(deadline)));
        }
        let mut line = String::new();
        match stdout.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line.trim().to_string())),
            Err(e) => Some(Err(EngineError::Io(e))),
        }
    })
}

/// Scan handshake output until `uciok`, capturing the engine name.
fn scan_handshake(
    lines: impl Iterator<Item = Result<String, EngineError>>,
) -> Result<String, EngineError> {
    let mut name = String::new();
    for line in lines {
        let line = line?;
        if let Some(rest) = line.strip_prefix("id name ") {
            name = rest.to_string();
        }
        if let EngineEvent::UciOk = EngineEvent::classify(&line) {
            return Ok(name);
        }
    }
    Err(EngineError::HandshakeFailed)
}

/// Scan a single-best search: keep the most recent score reported at
/// the target depth, stop at `bestmove`.
fn scan_single(
    lines: impl Iterator<Item = Result<String, EngineError>>,
    target_depth: u32,
) -> Result<BestMove, EngineError> {
    let mut score: Option<Score> = None;
    for line in lines {
        let line = line?;
        match EngineEvent::classify(&line) {
            EngineEvent::Info(info) => {
                if info.depth == Some(target_depth) {
                    score = Some(info.score);
                }
            }
            EngineEvent::BestMove(mv) => return Ok(BestMove { mv, score }),
            _ => {}
        }
    }
    Err(EngineError::NoBestMove)
}

/// Scan a ranked search: every ranked info line updates its slot, and
/// the `bestmove` line fills the first slot if no ranked line did.
fn scan_ranked(
    lines: impl Iterator<Item = Result<String, EngineError>>,
    fan_out: u32,
) -> Result<RankedMoves, EngineError> {
    let mut moves = vec![String::new(); fan_out as usize];
    let mut scores = vec![0.0; fan_out as usize];

    for line in lines {
        let line = line?;
        match EngineEvent::classify(&line) {
            EngineEvent::Info(info) => {
                let slot = match ranked_slot(&info, fan_out) {
                    Some(slot) => slot,
                    None => continue,
                };
                scores[slot] = info.score.pawns();
                if let Some(first) = info.pv.first() {
                    moves[slot] = first.clone();
                }
            }
            EngineEvent::BestMove(mv) => {
                if moves[0].is_empty() {
                    moves[0] = mv;
                }
                return Ok(RankedMoves { moves, scores });
            }
            _ => {}
        }
    }
    Err(EngineError::NoBestMove)
}

/// The 0-based slot for a ranked info line, if its rank is in range.
fn ranked_slot(info: &SearchInfo, fan_out: u32) -> Option<usize> {
    match info.multipv {
        Some(rank) if rank >= 1 && rank <= fan_out => Some(rank as usize - 1),
        _ => None,
    }
}

/// Scan a deepened search: every variation feeds the table, the most
/// recent score at any depth wins, and the best move's line comes out
/// of the table at the end.
fn scan_deep(
    lines: impl Iterator<Item = Result<String, EngineError>>,
) -> Result<DeepBestMove, EngineError> {
    let mut table = VariationTable::new();
    let mut score: Option<Score> = None;

    for line in lines {
        let line = line?;
        match EngineEvent::classify(&line) {
            EngineEvent::Info(info) => {
                score = Some(info.score);
                table.observe(&info.pv);
            }
            EngineEvent::BestMove(mv) => {
                let line = table.best_for(&mv).map(|pv| pv.to_vec()).unwrap_or_default();
                return Ok(DeepBestMove { mv, score, line });
            }
            _ => {}
        }
    }
    Err(EngineError::NoBestMove)
}

/// Scan display output for the `Fen:` board report.
fn scan_fen(
    lines: impl Iterator<Item = Result<String, EngineError>>,
) -> Result<String, EngineError> {
    for line in lines {
        let line = line?;
        if let EngineEvent::Fen(fen) = EngineEvent::classify(&line) {
            return Ok(fen);
        }
    }
    Err(EngineError::NoPositionReport)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(lines: &[&str]) -> impl Iterator<Item = Result<String, EngineError>> {
        lines
            .iter()
            .map(|line| Ok(line.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_scan_handshake_captures_name() {
        let lines = transcript(&[
            "Stockfish 16 by the Stockfish developers (see AUTHORS file)",
            "id name Stockfish 16",
            "id author the Stockfish developers (see AUTHORS file)",
            "option name Threads type spin default 1 min 1 max 1024",
            "uciok",
        ]);
        assert_eq!(scan_handshake(lines).unwrap(), "Stockfish 16");
    }

    #[test]
    fn test_scan_handshake_eof_fails() {
        let lines = transcript(&["id name Stockfish 16"]);
        match scan_handshake(lines) {
            Err(EngineError::HandshakeFailed) => {}
            other => panic!("Expected HandshakeFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_single_keeps_target_depth_score() {
        let lines = transcript(&[
            "info depth 19 score cp 94 pv e2e4",
            "info depth 20 score cp 137 pv e2e4 e7e5",
            "bestmove e2e4 ponder e7e5",
        ]);
        let result = scan_single(lines, 20).unwrap();
        assert_eq!(result.mv, "e2e4");
        assert_eq!(result.score, Some(Score::Cp(137)));
        assert_eq!(result.score.unwrap().pawns(), 1.37);
    }

    #[test]
    fn test_scan_single_last_target_depth_score_wins() {
        let lines = transcript(&[
            "info depth 20 score cp 10 pv d2d4",
            "info depth 20 score cp 25 pv e2e4",
            "bestmove e2e4",
        ]);
        let result = scan_single(lines, 20).unwrap();
        assert_eq!(result.score, Some(Score::Cp(25)));
    }

    #[test]
    fn test_scan_single_no_target_depth_means_no_score() {
        let lines = transcript(&[
            "info depth 8 score cp 30 pv c2c4",
            "bestmove c2c4",
        ]);
        let result = scan_single(lines, 20).unwrap();
        assert_eq!(result.mv, "c2c4");
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_scan_single_eof_is_no_best_move() {
        let lines = transcript(&["info depth 20 score cp 5 pv a2a4"]);
        match scan_single(lines, 20) {
            Err(EngineError::NoBestMove) => {}
            other => panic!("Expected NoBestMove, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_ranked_fan_out_two() {
        let lines = transcript(&[
            "info depth 10 multipv 1 score cp 35 pv e2e4 e7e5",
            "info depth 10 multipv 2 score cp 12 pv d2d4 d7d5",
            "info depth 11 multipv 1 score cp 40 pv e2e4 c7c5",
            "info depth 11 multipv 2 score cp 8 pv d2d4 g8f6",
            "bestmove e2e4 ponder c7c5",
        ]);
        let result = scan_ranked(lines, 2).unwrap();
        assert_eq!(result.moves, vec!["e2e4", "d2d4"]);
        assert_eq!(result.scores, vec![0.40, 0.08]);
        assert!(result.moves.iter().all(|mv| !mv.is_empty()));
    }

    #[test]
    fn test_scan_ranked_bestmove_fills_empty_first_slot() {
        let lines = transcript(&[
            "info depth 9 multipv 2 score cp -20 pv h7h5 a2a3",
            "bestmove a2a3",
        ]);
        let result = scan_ranked(lines, 2).unwrap();
        assert_eq!(result.moves, vec!["a2a3", "h7h5"]);
        assert_eq!(result.scores, vec![0.0, -0.20]);
    }

    #[test]
    fn test_scan_ranked_ignores_ranks_beyond_fan_out() {
        let lines = transcript(&[
            "info depth 10 multipv 1 score cp 15 pv e2e4",
            "info depth 10 multipv 3 score cp -90 pv h2h4",
            "bestmove e2e4",
        ]);
        let result = scan_ranked(lines, 2).unwrap();
        assert_eq!(result.moves[0], "e2e4");
        assert_eq!(result.moves[1], "");
        assert_eq!(result.scores[1], 0.0);
    }

    #[test]
    fn test_scan_ranked_mate_collapses_to_sentinel() {
        let lines = transcript(&[
            "info depth 12 multipv 1 score mate 2 pv d1h5 g7g6 h5f7",
            "info depth 12 multipv 2 score mate -3 pv f2f3",
            "bestmove d1h5",
        ]);
        let result = scan_ranked(lines, 2).unwrap();
        assert_eq!(result.scores, vec![999.0, -999.0]);
    }

    #[test]
    fn test_scan_ranked_eof_is_no_best_move() {
        let lines = transcript(&["info depth 10 multipv 1 score cp 15 pv e2e4"]);
        match scan_ranked(lines, 2) {
            Err(EngineError::NoBestMove) => {}
            other => panic!("Expected NoBestMove, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_deep_reconstructs_score_and_line() {
        // The final info line before bestmove carries no score; the
        // result still reports the last score seen overall.
        let lines = transcript(&[
            "info depth 18 score cp 31 pv g1f3 g8f6",
            "info depth 20 score cp 52 pv g1f3 g8f6 c2c4",
            "info depth 20 currmove g1f3 currmovenumber 1",
            "bestmove g1f3",
        ]);
        let result = scan_deep(lines).unwrap();
        assert_eq!(result.mv, "g1f3");
        assert_eq!(result.score, Some(Score::Cp(52)));
        assert_eq!(result.line, vec!["g1f3", "g8f6", "c2c4"]);
    }

    #[test]
    fn test_scan_deep_shorter_replay_keeps_longest_line() {
        let lines = transcript(&[
            "info depth 20 score cp 52 pv g1f3 g8f6 c2c4",
            "info depth 21 score cp 48 pv g1f3 d7d5",
            "bestmove g1f3",
        ]);
        let result = scan_deep(lines).unwrap();
        assert_eq!(result.line, vec!["g1f3", "g8f6", "c2c4"]);
        assert_eq!(result.score, Some(Score::Cp(48)));
    }

    #[test]
    fn test_scan_deep_unseen_best_move_has_empty_line() {
        let lines = transcript(&[
            "info depth 15 score cp 22 pv e2e4 e7e5",
            "bestmove b1c3",
        ]);
        let result = scan_deep(lines).unwrap();
        assert_eq!(result.mv, "b1c3");
        assert!(result.line.is_empty());
        assert_eq!(result.score, Some(Score::Cp(22)));
    }

    #[test]
    fn test_scan_deep_keeps_mate_fidelity() {
        let lines = transcript(&[
            "info depth 14 score mate -4 pv e8d8",
            "bestmove e8d8",
        ]);
        let result = scan_deep(lines).unwrap();
        assert_eq!(result.score, Some(Score::Mate(-4)));
    }

    #[test]
    fn test_scan_deep_eof_is_no_best_move() {
        let lines = transcript(&["info depth 15 score cp 22 pv e2e4"]);
        match scan_deep(lines) {
            Err(EngineError::NoBestMove) => {}
            other => panic!("Expected NoBestMove, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_fen_returns_report() {
        let lines = transcript(&[
            " +---+---+---+---+---+---+---+---+",
            " | r | n | k | q | b | b | n | r |",
            "Fen: rnkqbbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNKQBBNR b KQkq - 0 1",
            "Checkers:",
        ]);
        assert_eq!(
            scan_fen(lines).unwrap(),
            "rnkqbbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNKQBBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_scan_fen_missing_report_fails() {
        let lines = transcript(&[" +---+---+---+---+---+---+---+---+", "Checkers:"]);
        match scan_fen(lines) {
            Err(EngineError::NoPositionReport) => {}
            other => panic!("Expected NoPositionReport, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_propagates_stream_errors() {
        let lines = vec![
            Ok("info depth 20 score cp 5 pv a2a4".to_string()),
            Err(EngineError::Timeout(Duration::from_millis(250))),
        ]
        .into_iter();
        match scan_single(lines, 20) {
            Err(EngineError::Timeout(d)) => assert_eq!(d, Duration::from_millis(250)),
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_spawn_engine_not_found() {
        let config = EngineConfig {
            engine_path: "/nonexistent/path/to/stockfish".to_string(),
            ..EngineConfig::default()
        };
        match EngineSession::spawn(config) {
            Err(EngineError::NotFound(path)) => {
                assert_eq!(path, "/nonexistent/path/to/stockfish");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_engine_error_display() {
        let not_found = EngineError::NotFound("/path/to/engine".to_string());
        assert!(not_found.to_string().contains("/path/to/engine"));

        let no_best_move = EngineError::NoBestMove;
        assert_eq!(
            no_best_move.to_string(),
            "Engine closed before reporting a best move"
        );

        let timeout = EngineError::Timeout(Duration::from_secs(120));
        assert!(timeout.to_string().contains("deadline"));
    }
}
