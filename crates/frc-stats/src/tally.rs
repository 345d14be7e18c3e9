//! Frequency tallies over classified opening moves.

use crate::classify::MoveClass;
use std::collections::HashMap;
use std::fmt;

const CENTER_FILES: [char; 6] = ['b', 'c', 'd', 'e', 'f', 'g'];

/// Neighborhood counts, loosely grouped into edge and center moves.
#[derive(Debug, Default)]
pub struct EdgeTally {
    left_edge: HashMap<String, usize>,
    center: HashMap<String, usize>,
    right_edge: HashMap<String, usize>,
}

impl EdgeTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified move.
    pub fn record(&mut self, class: &MoveClass) {
        let bucket = match class.file {
            'a' => &mut self.left_edge,
            'h' => &mut self.right_edge,
            _ => &mut self.center,
        };
        *bucket.entry(class.neighborhood.clone()).or_insert(0) += 1;
    }

    /// Neighborhood counts for a-file moves, most frequent first.
    #[must_use]
    pub fn left_edge(&self) -> Vec<(String, usize)> {
        sorted_counts(&self.left_edge)
    }

    /// Neighborhood counts for b-g file moves, most frequent first.
    #[must_use]
    pub fn center(&self) -> Vec<(String, usize)> {
        sorted_counts(&self.center)
    }

    /// Neighborhood counts for h-file moves, most frequent first.
    #[must_use]
    pub fn right_edge(&self) -> Vec<(String, usize)> {
        sorted_counts(&self.right_edge)
    }
}

impl fmt::Display for EdgeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "left edge (a-file)")?;
        write_counts(f, &self.left_edge)?;
        writeln!(f, "center (b-g files)")?;
        write_counts(f, &self.center)?;
        writeln!(f, "right edge (h-file)")?;
        write_counts(f, &self.right_edge)
    }
}

/// Neighborhood counts kept separately for each non-edge file.
#[derive(Debug, Default)]
pub struct CenterFileTally {
    counts: [HashMap<String, usize>; 6],
}

impl CenterFileTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified move; edge-file moves are not kept here.
    pub fn record(&mut self, class: &MoveClass) {
        let index = match class.file {
            'b'..='g' => (class.file as u8 - b'b') as usize,
            _ => return,
        };
        *self.counts[index]
            .entry(class.neighborhood.clone())
            .or_insert(0) += 1;
    }

    /// Neighborhood counts for one center file, most frequent first.
    /// Edge files yield an empty list.
    #[must_use]
    pub fn for_file(&self, file: char) -> Vec<(String, usize)> {
        match file {
            'b'..='g' => sorted_counts(&self.counts[(file as u8 - b'b') as usize]),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for CenterFileTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, file) in CENTER_FILES.iter().enumerate() {
            writeln!(f, "{}", file)?;
            write_counts(f, &self.counts[index])?;
        }
        Ok(())
    }
}

/// Descending-count view of a tally map; ties sort by key so output
/// stays stable across runs.
fn sorted_counts(map: &HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut pairs: Vec<(String, usize)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

fn write_counts(f: &mut fmt::Formatter<'_>, map: &HashMap<String, usize>) -> fmt::Result {
    for (key, count) in sorted_counts(map) {
        writeln!(f, "  {} {}", key, count)?;
    }
    Ok(())
}
