//! FRC opening analyzer - evaluates Chess960 starting positions.
//!
//! The analysis pipeline is a set of subcommands wired together through
//! JSON record files: a roster of starting positions is ingested once,
//! the engine stages enrich it with evaluations, and the report stage
//! aggregates the evaluated moves into opening statistics.

mod config;
mod report;
mod store;

use clap::{Parser, Subcommand};
use config::AnalyzerConfig;
use frc_core::{parse_roster, BestMoveRecord, PositionRecord, TopMovesRecord};
use report::Report;
use std::path::{Path, PathBuf};
use uci_driver::EngineSession;

/// FRC opening analyzer - evaluates Chess960 starting positions.
#[derive(Parser)]
#[command(name = "frc-analyzer")]
#[command(about = "Evaluates Chess960 starting positions with a UCI engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a position roster into a record file
    Ingest {
        /// Roster text file listing position numbers and back ranks
        roster: PathBuf,
        /// Output record file (defaults to positions.json in the data directory)
        out: Option<PathBuf>,
    },
    /// Evaluate the best move for every position
    Best {
        /// Position record file (defaults to positions.json in the data directory)
        positions: Option<PathBuf>,
        /// Output record file (defaults to best.json in the data directory)
        out: Option<PathBuf>,
    },
    /// Rank the top candidate moves for every position
    Top {
        /// Position record file (defaults to positions.json in the data directory)
        positions: Option<PathBuf>,
        /// Output record file (defaults to top.json in the data directory)
        out: Option<PathBuf>,
        /// How many candidate moves to rank
        #[arg(long)]
        fan_out: Option<u32>,
    },
    /// Evaluate every position, keeping the principal variation
    Deep {
        /// Position record file (defaults to positions.json in the data directory)
        positions: Option<PathBuf>,
        /// Output record file (defaults to deep.json in the data directory)
        out: Option<PathBuf>,
    },
    /// Print the position reached after one move
    After {
        /// Starting position FEN
        fen: String,
        /// Move in UCI notation
        mv: String,
    },
    /// Aggregate move statistics from an evaluated record file
    Report {
        /// Evaluated record file (defaults to best.json in the data directory)
        records: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = AnalyzerConfig::load()?;

    std::fs::create_dir_all(&config.data_dir).ok();

    match cli.command {
        Commands::Ingest { roster, out } => {
            let out = out.unwrap_or_else(|| config.data_dir.join("positions.json"));
            run_ingest(&roster, &out)
        }
        Commands::Best { positions, out } => {
            let positions = positions.unwrap_or_else(|| config.data_dir.join("positions.json"));
            let out = out.unwrap_or_else(|| config.data_dir.join("best.json"));
            run_best(&config, &positions, &out)
        }
        Commands::Top {
            positions,
            out,
            fan_out,
        } => {
            let positions = positions.unwrap_or_else(|| config.data_dir.join("positions.json"));
            let out = out.unwrap_or_else(|| config.data_dir.join("top.json"));
            run_top(&config, &positions, &out, fan_out.unwrap_or(config.fan_out))
        }
        Commands::Deep { positions, out } => {
            let positions = positions.unwrap_or_else(|| config.data_dir.join("positions.json"));
            let out = out.unwrap_or_else(|| config.data_dir.join("deep.json"));
            run_deep(&config, &positions, &out)
        }
        Commands::After { fen, mv } => run_after(&config, &fen, &mv),
        Commands::Report { records } => {
            let records = records.unwrap_or_else(|| config.data_dir.join("best.json"));
            run_report(&records)
        }
    }
}

fn run_ingest(roster: &Path, out: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(roster)?;
    let parsed = parse_roster(&text);

    for token in &parsed.unrecognized {
        tracing::warn!("Unrecognized roster token: {}", token);
    }
    tracing::info!(
        "Parsed {} positions from {}",
        parsed.positions.len(),
        roster.display()
    );

    store::save_records(out, &parsed.positions)?;
    tracing::info!("Wrote {} records to {}", parsed.positions.len(), out.display());
    Ok(())
}

fn run_best(config: &AnalyzerConfig, positions: &Path, out: &Path) -> anyhow::Result<()> {
    let records: Vec<PositionRecord> = store::load_records(positions)?;
    tracing::info!("Evaluating best move for {} positions", records.len());

    let mut session = EngineSession::spawn(config.engine.clone())?;
    tracing::info!("Engine: {}", session.name());

    let mut results = Vec::with_capacity(records.len());
    for record in records {
        match session.evaluate(&record.fen) {
            Ok(best) => {
                if best.mv == "(none)" {
                    tracing::warn!(
                        "Position {} has no legal moves, skipping",
                        record.position_number
                    );
                    continue;
                }
                let eval = best.score.map(|s| s.pawns()).unwrap_or(0.0);
                tracing::info!("Position {}: {} ({:.2})", record.position_number, best.mv, eval);
                results.push(BestMoveRecord {
                    position: record,
                    best_move: best.mv,
                    eval,
                    line: Vec::new(),
                });
            }
            Err(e) => {
                tracing::error!(
                    "Position {} failed: {}, restarting engine",
                    record.position_number,
                    e
                );
                session = EngineSession::spawn(config.engine.clone())?;
            }
        }
    }

    session.quit()?;
    store::save_records(out, &results)?;
    tracing::info!("Wrote {} records to {}", results.len(), out.display());
    Ok(())
}

fn run_top(
    config: &AnalyzerConfig,
    positions: &Path,
    out: &Path,
    fan_out: u32,
) -> anyhow::Result<()> {
    let records: Vec<PositionRecord> = store::load_records(positions)?;
    tracing::info!(
        "Ranking top {} moves for {} positions",
        fan_out,
        records.len()
    );

    let mut session = EngineSession::spawn(config.engine.clone())?;
    tracing::info!("Engine: {}", session.name());

    let mut results = Vec::with_capacity(records.len());
    for record in records {
        match session.evaluate_top(&record.fen, fan_out) {
            Ok(ranked) => {
                if ranked.moves.first().map(String::as_str) == Some("(none)") {
                    tracing::warn!(
                        "Position {} has no legal moves, skipping",
                        record.position_number
                    );
                    continue;
                }
                tracing::info!(
                    "Position {}: {}",
                    record.position_number,
                    ranked.moves.join(" ")
                );
                results.push(TopMovesRecord {
                    position: record,
                    top_moves: ranked.moves,
                    evals: ranked.scores,
                });
            }
            Err(e) => {
                tracing::error!(
                    "Position {} failed: {}, restarting engine",
                    record.position_number,
                    e
                );
                session = EngineSession::spawn(config.engine.clone())?;
            }
        }
    }

    session.quit()?;
    store::save_records(out, &results)?;
    tracing::info!("Wrote {} records to {}", results.len(), out.display());
    Ok(())
}

fn run_deep(config: &AnalyzerConfig, positions: &Path, out: &Path) -> anyhow::Result<()> {
    let records: Vec<PositionRecord> = store::load_records(positions)?;
    tracing::info!("Deep-evaluating {} positions", records.len());

    let mut session = EngineSession::spawn(config.engine.clone())?;
    tracing::info!("Engine: {}", session.name());

    let mut results = Vec::with_capacity(records.len());
    for record in records {
        match session.evaluate_deep(&record.fen) {
            Ok(best) => {
                if best.mv == "(none)" {
                    tracing::warn!(
                        "Position {} has no legal moves, skipping",
                        record.position_number
                    );
                    continue;
                }
                let eval = best.score.map(|s| s.pawns()).unwrap_or(0.0);
                tracing::info!(
                    "Position {}: {} ({:.2}, {} plies)",
                    record.position_number,
                    best.mv,
                    eval,
                    best.line.len()
                );
                results.push(BestMoveRecord {
                    position: record,
                    best_move: best.mv,
                    eval,
                    line: best.line,
                });
            }
            Err(e) => {
                tracing::error!(
                    "Position {} failed: {}, restarting engine",
                    record.position_number,
                    e
                );
                session = EngineSession::spawn(config.engine.clone())?;
            }
        }
    }

    session.quit()?;
    store::save_records(out, &results)?;
    tracing::info!("Wrote {} records to {}", results.len(), out.display());
    Ok(())
}

fn run_after(config: &AnalyzerConfig, fen: &str, mv: &str) -> anyhow::Result<()> {
    let mut session = EngineSession::spawn(config.engine.clone())?;
    let resulting = session.fen_after_move(fen, mv)?;
    session.quit()?;

    println!("{}", resulting);
    Ok(())
}

fn run_report(records: &Path) -> anyhow::Result<()> {
    let loaded: Vec<BestMoveRecord> = store::load_records(records)?;

    let mut report = Report::new();
    for record in &loaded {
        report.add(record);
    }
    if report.skipped() > 0 {
        tracing::warn!("{} records could not be classified", report.skipped());
    }

    println!(
        "Opening move report, {}",
        chrono::Utc::now().to_rfc3339()
    );
    println!();
    print!("{}", report);
    Ok(())
}
