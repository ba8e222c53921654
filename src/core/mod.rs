//! Core domain types

pub mod records;
pub mod sample;

pub use records::{Coordinate, Extraction, VectorTable};
pub use sample::{Label, Sample};
