//! # Command Implementations
//!
//! Each submodule handles one CLI command (extract, reduce, run).

pub mod extract;
pub mod reduce;
pub mod run;
