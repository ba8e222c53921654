//! Row-aligned embedding and coordinate tables

use ndarray::{Array2, ArrayView1};

use super::Label;

/// Labels and embeddings for the first N samples of a source.
///
/// Row `i` of `embeddings` and `labels[i]` both belong to source index `i`.
#[derive(Debug, Clone)]
pub struct Extraction {
	pub labels: Vec<Label>,
	pub embeddings: Array2<f32>,
}

impl Extraction {
	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn dimensions(&self) -> usize {
		self.embeddings.ncols()
	}

	pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
		self.embeddings.row(index)
	}
}

/// Vector store contents loaded for reduction.
#[derive(Debug, Clone)]
pub struct VectorTable {
	pub labels: Vec<Label>,
	pub vectors: Array2<f64>,
	/// Row limit the caller asked for.
	pub requested: usize,
}

impl VectorTable {
	pub fn rows(&self) -> usize {
		self.labels.len()
	}

	pub fn dimensions(&self) -> usize {
		self.vectors.ncols()
	}

	/// True when the file held fewer rows than requested.
	pub fn was_clamped(&self) -> bool {
		self.rows() < self.requested
	}
}

/// One row of the coordinate file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
	pub id: usize,
	pub label: Label,
	pub x: f64,
	pub y: f64,
	pub z: f64,
}
