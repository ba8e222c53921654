//! The two pipeline stages, each ending in a persisted file.
//!
//! Stage (a) embeds samples and writes the vector store; stage (b) loads the
//! vector store, runs PCA and writes the coordinate file. Stage (b) never
//! starts from in-memory state, only from a fully written vector store.

use std::fs;
use std::path::Path;

use crate::config::PCA_COMPONENTS;
use crate::core::{Coordinate, Extraction};
use crate::dataset::SampleSource;
use crate::error::Result;
use crate::models::FeatureExtractor;
use crate::processing::{BatchRunner, Pca, Preprocessor};
use crate::storage::{self, ReductionReport};

/// Embed the first `count` samples and persist them to `output`.
pub fn extract_to_file<S, E>(
	source: &S,
	preprocessor: &Preprocessor,
	extractor: &mut E,
	count: usize,
	batch_size: usize,
	output: &Path,
) -> Result<Extraction>
where
	S: SampleSource + ?Sized,
	E: FeatureExtractor + ?Sized,
{
	let runner = BatchRunner::new(batch_size)?;
	let extraction = runner.run(source, preprocessor, extractor, count)?;
	storage::vectors::write(output, &extraction)?;
	Ok(extraction)
}

/// What a reduction run produced.
#[derive(Debug)]
pub struct ReduceOutcome {
	pub pca: Pca,
	pub coords: Vec<Coordinate>,
	pub requested_rows: usize,
	pub dimensions: usize,
}

impl ReduceOutcome {
	pub fn rows(&self) -> usize {
		self.coords.len()
	}

	pub fn was_clamped(&self) -> bool {
		self.rows() < self.requested_rows
	}
}

/// Project up to `limit` vector store rows to 3-D and write the coordinate file.
///
/// Nothing is written when the vector store is missing or invalid. With a
/// report path, both files are fully rendered before either is published, so
/// a failed report never leaves a fresh coordinate file behind.
pub fn reduce_file(input: &Path, output: &Path, limit: usize, report: Option<&Path>) -> Result<ReduceOutcome> {
	let table = storage::vectors::load(input, limit)?;
	let (pca, projected) = Pca::fit_transform(table.vectors.view(), PCA_COMPONENTS)?;
	let coords = storage::coords::build(&table.labels, projected.view())?;

	let staged_coords = storage::coords::stage(output, &coords)?;
	let staged_report = match report {
		Some(report_path) => Some(ReductionReport::new(&pca, limit, coords.len()).stage(report_path)?),
		None => None,
	};

	let published_report = match staged_report {
		Some(staged) => {
			let path = staged.path().to_path_buf();
			staged.commit()?;
			Some(path)
		}
		None => None,
	};
	if let Err(e) = staged_coords.commit() {
		if let Some(path) = published_report {
			let _ = fs::remove_file(path);
		}
		return Err(e);
	}

	Ok(ReduceOutcome {
		pca,
		coords,
		requested_rows: limit,
		dimensions: table.dimensions(),
	})
}
