//! Reduction summary written alongside the coordinate file

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::processing::Pca;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Explained variance and row accounting for one reduction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionReport {
	pub version: String,
	pub timestamp: String,
	pub requested_rows: usize,
	pub rows: usize,
	pub clamped: bool,
	pub dimensions: usize,
	pub explained_variance: Vec<f64>,
	pub explained_variance_ratio: Vec<f64>,
}

impl ReductionReport {
	pub fn new(pca: &Pca, requested_rows: usize, rows: usize) -> Self {
		Self {
			version: VERSION.to_string(),
			timestamp: chrono::Local::now().to_rfc3339(),
			requested_rows,
			rows,
			clamped: rows < requested_rows,
			dimensions: pca.mean().len(),
			explained_variance: pca.explained_variance().to_vec(),
			explained_variance_ratio: pca.explained_variance_ratio().to_vec(),
		}
	}

	/// Fraction of total variance kept by the projection.
	pub fn retained_variance(&self) -> f64 {
		self.explained_variance_ratio.iter().sum()
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		self.stage(path)?.commit()
	}

	pub(crate) fn stage(&self, path: &Path) -> Result<super::Staged> {
		let json = serde_json::to_string_pretty(self)
			.map_err(|e| PipelineError::input(format!("cannot serialize report: {}", e)))?;
		super::stage(path, |w| {
			w.write_all(json.as_bytes())?;
			w.write_all(b"\n")
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;

	#[test]
	fn saves_round_trippable_json() {
		let data = array![[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, -2.0, 0.0]];
		let pca = Pca::fit(data.view(), 3).unwrap();
		let report = ReductionReport::new(&pca, 10, 4);
		assert!(report.clamped);
		assert!((report.retained_variance() - 1.0).abs() < 1e-9);

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("report.json");
		report.save(&path).unwrap();

		let loaded: ReductionReport =
			serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
		assert_eq!(loaded.rows, 4);
		assert_eq!(loaded.dimensions, 3);
		assert_eq!(loaded.explained_variance_ratio.len(), 3);
	}
}
