//! # User Interface
//!
//! Colored, timestamped terminal output.

pub mod log;

pub use log::{debug, error, header, info, path_link, success, summary, warn, Log};
