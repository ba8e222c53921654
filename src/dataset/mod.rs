//! # Sample Sources
//!
//! Index-addressable, deterministically ordered datasets of labeled images.

pub mod folder;
pub mod stl10;

pub use folder::ImageFolderSource;
pub use stl10::{Stl10Source, Stl10Split};

use crate::core::Sample;
use crate::error::{PipelineError, Result};

/// A finite sequence of labeled images with random access.
///
/// `get(i)` must return the same sample every time it is called with the
/// same index. Implementations never reorder.
pub trait SampleSource {
	fn len(&self) -> usize;

	fn get(&self, index: usize) -> Result<Sample>;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Samples held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	samples: Vec<Sample>,
}

impl MemorySource {
	pub fn new(samples: Vec<Sample>) -> Self {
		Self { samples }
	}
}

impl SampleSource for MemorySource {
	fn len(&self) -> usize {
		self.samples.len()
	}

	fn get(&self, index: usize) -> Result<Sample> {
		self.samples.get(index).cloned().ok_or(PipelineError::Range {
			requested: index + 1,
			available: self.samples.len(),
		})
	}
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
	fn len(&self) -> usize {
		(**self).len()
	}

	fn get(&self, index: usize) -> Result<Sample> {
		(**self).get(index)
	}
}
