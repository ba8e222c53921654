//! # embedmap
//!
//! Turns a labeled image collection into a 3-D point cloud: images are
//! embedded with a pretrained convolutional backbone, written to a vector
//! store, and projected onto their top three principal components.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use error::{ErrorKind, PipelineError, Result};
