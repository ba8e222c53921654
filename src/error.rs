//! Error types for the extraction and reduction pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Coarse error classes reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Bad or missing input data.
	Input,
	/// A requested count exceeds what is available.
	Range,
	/// An output destination could not be written.
	Io,
}

/// Errors that can occur while extracting or reducing embeddings.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// A sample image could not be decoded into RGB pixels.
	#[error("image format error: {0}")]
	ImageFormat(String),

	/// Input data is malformed or unreadable.
	#[error("input error: {0}")]
	Input(String),

	/// The vector store file does not exist.
	#[error("vector store not found: {} (run `embedmap extract` first)", .0.display())]
	MissingVectorStore(PathBuf),

	/// More samples were requested than the source holds.
	#[error("requested {requested} samples but the source only has {available}")]
	Range { requested: usize, available: usize },

	/// Not enough feature dimensions for the requested components.
	#[error("cannot extract {components} components from {dimensions} feature dimensions")]
	Dimensionality { components: usize, dimensions: usize },

	/// Reading or writing a file failed.
	#[error("I/O error at {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The feature extractor failed or returned an unexpected shape.
	#[error("model error: {0}")]
	Model(String),
}

impl PipelineError {
	pub fn input(message: impl Into<String>) -> Self {
		Self::Input(message.into())
	}

	pub fn model(message: impl Into<String>) -> Self {
		Self::Model(message.into())
	}

	pub fn io(path: &Path, source: std::io::Error) -> Self {
		Self::Io {
			path: path.to_path_buf(),
			source,
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::ImageFormat(_)
			| Self::Input(_)
			| Self::MissingVectorStore(_)
			| Self::Dimensionality { .. }
			| Self::Model(_) => ErrorKind::Input,
			Self::Range { .. } => ErrorKind::Range,
			Self::Io { .. } => ErrorKind::Io,
		}
	}
}
