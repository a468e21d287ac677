//! Boundary detection and page grouping

mod boundary;
mod marker;

pub use boundary::BoundarySplitter;
pub use marker::MarkerDetector;
