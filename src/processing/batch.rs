//! Batched, order-preserving embedding extraction

use ndarray::{Array2, Array3, ArrayView3, Axis};
use rayon::prelude::*;
use std::time::Instant;

use crate::core::{Extraction, Label, Sample};
use crate::dataset::SampleSource;
use crate::error::{PipelineError, Result};
use crate::models::FeatureExtractor;
use crate::processing::Preprocessor;
use crate::ui;

/// Drives a sample source through preprocessing and extraction in fixed-size groups.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
	batch_size: usize,
}

impl BatchRunner {
	pub fn new(batch_size: usize) -> Result<Self> {
		if batch_size == 0 {
			return Err(PipelineError::input("batch size must be at least 1"));
		}
		Ok(Self { batch_size })
	}

	pub fn batch_size(&self) -> usize {
		self.batch_size
	}

	/// Embed the first `count` samples of `source`, in source order.
	///
	/// Batches run strictly one after another; only preprocessing inside a
	/// batch is parallel and its results are collected in input order.
	pub fn run<S, E>(
		&self,
		source: &S,
		preprocessor: &Preprocessor,
		extractor: &mut E,
		count: usize,
	) -> Result<Extraction>
	where
		S: SampleSource + ?Sized,
		E: FeatureExtractor + ?Sized,
	{
		if count == 0 {
			return Err(PipelineError::input("sample count must be at least 1"));
		}
		if count > source.len() {
			return Err(PipelineError::Range {
				requested: count,
				available: source.len(),
			});
		}

		let total_batches = count.div_ceil(self.batch_size);
		ui::info(&format!(
			"Extracting {} samples in {} batches of {}",
			count, total_batches, self.batch_size
		));

		let mut labels: Vec<Label> = Vec::with_capacity(count);
		let mut values: Vec<f32> = Vec::new();
		let mut dimensions: Option<usize> = None;

		for (batch_index, start) in (0..count).step_by(self.batch_size).enumerate() {
			let end = (start + self.batch_size).min(count);
			let batch_start = Instant::now();

			let samples = (start..end)
				.map(|i| source.get(i))
				.collect::<Result<Vec<Sample>>>()?;

			let tensors = samples
				.par_iter()
				.map(|s| preprocessor.apply(&s.image))
				.collect::<Result<Vec<Array3<f32>>>>()?;

			let views: Vec<ArrayView3<'_, f32>> = tensors.iter().map(|t| t.view()).collect();
			let batch = ndarray::stack(Axis(0), &views)
				.map_err(|e| PipelineError::input(format!("cannot stack batch: {}", e)))?;

			let embeddings = extractor.extract(batch.view())?;

			if embeddings.nrows() != samples.len() {
				return Err(PipelineError::model(format!(
					"extractor returned {} vectors for a batch of {}",
					embeddings.nrows(),
					samples.len()
				)));
			}
			let dim = embeddings.ncols();
			match dimensions {
				None => {
					values.reserve(count * dim);
					dimensions = Some(dim);
				}
				Some(d) if d != dim => {
					return Err(PipelineError::model(format!(
						"embedding dimension changed from {} to {} at batch {}",
						d, dim, batch_index
					)));
				}
				Some(_) => {}
			}

			values.extend(embeddings.iter().copied());
			labels.extend(samples.iter().map(|s| s.label));

			ui::debug(&format!(
				"Batch {}/{} (rows {}..{}) in {}ms",
				batch_index + 1,
				total_batches,
				start,
				end,
				batch_start.elapsed().as_millis()
			));
		}

		let dim = dimensions.unwrap_or(0);
		let embeddings = Array2::from_shape_vec((labels.len(), dim), values)
			.map_err(|e| PipelineError::model(e.to_string()))?;

		Ok(Extraction { labels, embeddings })
	}
}
