//! # Feature Extraction Models
//!
//! Batched embedding extractors over preprocessed image tensors.

pub mod extractor;

pub use extractor::{global_average_pool, FeatureExtractor, OnnxExtractor};
