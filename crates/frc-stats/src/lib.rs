//! Classification and frequency statistics for Chess960 opening moves.
//!
//! A first move is classified against the back-rank layout it was played
//! from: what kind of move it is, how far from the center, and which pieces
//! stood behind and beside the moved pawn or piece. Tallies aggregate those
//! classifications across many starting positions.

pub mod classify;
pub mod tally;

pub use classify::{classify, ClassifyError, MoveClass, MoveKind};
pub use tally::{CenterFileTally, EdgeTally};
