//! Longest-variation tracking across a deepening search.

use std::collections::HashMap;

/// Table of the longest principal variation seen for each leading move.
///
/// A deepening search re-reports the same leading move with longer
/// continuations, but re-searches can also emit shorter lines after a
/// longer one has already been seen. The table only ever grows a
/// stored line; one table serves exactly one search.
#[derive(Debug, Default)]
pub struct VariationTable {
    lines: HashMap<String, Vec<String>>,
}

impl VariationTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: HashMap::new(),
        }
    }

    /// Record a variation under its leading move.
    ///
    /// Keeps the longer of the stored and offered line; an empty
    /// variation is a no-op.
    pub fn observe(&mut self, pv: &[String]) {
        let first = match pv.first() {
            Some(mv) => mv,
            None => return,
        };
        match self.lines.get(first) {
            Some(existing) if existing.len() >= pv.len() => {}
            _ => {
                self.lines.insert(first.clone(), pv.to_vec());
            }
        }
    }

    /// The longest variation recorded for the given leading move.
    #[must_use]
    pub fn best_for(&self, mv: &str) -> Option<&[String]> {
        self.lines.get(mv).map(Vec::as_slice)
    }

    /// Number of distinct leading moves recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
