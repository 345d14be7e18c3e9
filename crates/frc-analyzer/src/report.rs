//! Aggregated statistics over an evaluated record file.
//!
//! Every best move is classified against the back rank it was played
//! from, then counted into the two tally views. Records that cannot be
//! classified are counted as skipped rather than failing the report.

use frc_core::fen;
use frc_core::BestMoveRecord;
use frc_stats::{classify, CenterFileTally, EdgeTally};
use std::fmt;

/// Tallies built from one pass over a record file.
#[derive(Debug, Default)]
pub struct Report {
    edges: EdgeTally,
    center_files: CenterFileTally,
    classified: usize,
    skipped: usize,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one record into the tallies.
    pub fn add(&mut self, record: &BestMoveRecord) {
        let class = fen::home_rank(&record.position.fen)
            .ok()
            .and_then(|layout| classify(&record.best_move, layout).ok());
        match class {
            Some(class) => {
                self.edges.record(&class);
                self.center_files.record(&class);
                self.classified += 1;
            }
            None => self.skipped += 1,
        }
    }

    /// How many records were classified into the tallies.
    #[must_use]
    pub fn classified(&self) -> usize {
        self.classified
    }

    /// How many records could not be classified.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} moves classified, {} skipped",
            self.classified, self.skipped
        )?;
        writeln!(f)?;
        writeln!(f, "Neighborhoods by board region")?;
        write!(f, "{}", self.edges)?;
        writeln!(f)?;
        writeln!(f, "Neighborhoods by center file")?;
        write!(f, "{}", self.center_files)
    }
}
