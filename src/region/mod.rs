//! Genomic ranges and the canonical interval set used to track regions of
//! interest while streaming along a contig.

mod interval_set;
mod range;

pub use interval_set::IntervalSet;
pub use range::{Pos, PosRange};
