//! Vector store: one `label,v_0,...,v_{D-1}` row per sample, no header

use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::VECTOR_PRECISION;
use crate::core::{Extraction, Label, VectorTable};
use crate::error::{PipelineError, Result};
use crate::ui;

/// Write every extracted row, label first, all values with 8 decimals.
pub fn write(path: &Path, extraction: &Extraction) -> Result<()> {
	if extraction.labels.len() != extraction.embeddings.nrows() {
		return Err(PipelineError::input(format!(
			"{} labels for {} embeddings",
			extraction.labels.len(),
			extraction.embeddings.nrows()
		)));
	}

	super::write_atomic(path, |w| {
		for (label, row) in extraction.labels.iter().zip(extraction.embeddings.rows()) {
			write!(w, "{:.*}", VECTOR_PRECISION, *label as f64)?;
			for v in row.iter() {
				write!(w, ",{:.*}", VECTOR_PRECISION, v)?;
			}
			writeln!(w)?;
		}
		Ok(())
	})
}

/// Load at most `limit` rows, clamping to what the file holds.
pub fn load(path: &Path, limit: usize) -> Result<VectorTable> {
	if limit == 0 {
		return Err(PipelineError::input("row limit must be at least 1"));
	}
	if !path.is_file() {
		return Err(PipelineError::MissingVectorStore(path.to_path_buf()));
	}

	let file = File::open(path)
		.map_err(|e| PipelineError::input(format!("cannot open {}: {}", path.display(), e)))?;

	let mut labels: Vec<Label> = Vec::new();
	let mut values: Vec<f64> = Vec::new();
	let mut width: Option<usize> = None;

	for (index, line) in BufReader::new(file).lines().enumerate() {
		if labels.len() == limit {
			break;
		}

		let line_no = index + 1;
		let line = line.map_err(|e| {
			PipelineError::input(format!("{}:{}: {}", path.display(), line_no, e))
		})?;
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		let fields = line
			.split(',')
			.map(|f| parse_field(f, path, line_no))
			.collect::<Result<Vec<f64>>>()?;

		if fields.len() < 2 {
			return Err(PipelineError::input(format!(
				"{}:{}: expected a label and at least one value",
				path.display(),
				line_no
			)));
		}
		match width {
			None => width = Some(fields.len()),
			Some(w) if w != fields.len() => {
				return Err(PipelineError::input(format!(
					"{}:{}: expected {} fields, found {}",
					path.display(),
					line_no,
					w,
					fields.len()
				)));
			}
			Some(_) => {}
		}

		labels.push(parse_label(fields[0], path, line_no)?);
		values.extend_from_slice(&fields[1..]);
	}

	let Some(width) = width else {
		return Err(PipelineError::input(format!("{} has no rows", path.display())));
	};

	let rows = labels.len();
	let vectors = Array2::from_shape_vec((rows, width - 1), values)
		.map_err(|e| PipelineError::input(e.to_string()))?;

	let table = VectorTable {
		labels,
		vectors,
		requested: limit,
	};

	if table.was_clamped() {
		ui::warn(&format!(
			"Requested {} rows but {} only has {}; using {}",
			limit,
			path.display(),
			rows,
			rows
		));
	}

	Ok(table)
}

fn parse_field(field: &str, path: &Path, line_no: usize) -> Result<f64> {
	let field = field.trim();
	match field.parse::<f64>() {
		Ok(v) if v.is_finite() => Ok(v),
		_ => Err(PipelineError::input(format!(
			"{}:{}: invalid number '{}'",
			path.display(),
			line_no,
			field
		))),
	}
}

fn parse_label(value: f64, path: &Path, line_no: usize) -> Result<Label> {
	if value < 0.0 || value.fract() != 0.0 || value > Label::MAX as f64 {
		return Err(PipelineError::input(format!(
			"{}:{}: label {} is not a non-negative integer",
			path.display(),
			line_no,
			value
		)));
	}
	Ok(value as Label)
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;
	use std::fs;

	fn sample() -> Extraction {
		Extraction {
			labels: vec![3, 0],
			embeddings: array![[0.5f32, -1.25, 2.0], [0.0, 1.0 / 3.0, 1e-9]],
		}
	}

	#[test]
	fn writes_fixed_precision_rows() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("data/vectors.csv");
		write(&path, &sample()).unwrap();

		let text = fs::read_to_string(&path).unwrap();
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0], "3.00000000,0.50000000,-1.25000000,2.00000000");
		assert_eq!(lines[1], "0.00000000,0.00000000,0.33333334,0.00000000");
	}

	#[test]
	fn load_reads_back_rows_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.csv");
		write(&path, &sample()).unwrap();

		let table = load(&path, 10).unwrap();
		assert_eq!(table.rows(), 2);
		assert_eq!(table.dimensions(), 3);
		assert_eq!(table.labels, vec![3, 0]);
		assert_eq!(table.vectors[[0, 1]], -1.25);
		assert!(table.was_clamped());
	}

	#[test]
	fn load_stops_at_limit() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.csv");
		fs::write(&path, "1,1,1\n2,2,2\n3,3,3\n").unwrap();

		let table = load(&path, 2).unwrap();
		assert_eq!(table.labels, vec![1, 2]);
		assert!(!table.was_clamped());
	}

	#[test]
	fn skips_blank_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.csv");
		fs::write(&path, "1,1,1\n\n2,2,2\n").unwrap();
		assert_eq!(load(&path, 5).unwrap().rows(), 2);
	}

	#[test]
	fn missing_file_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let err = load(&dir.path().join("nope.csv"), 5).unwrap_err();
		assert!(matches!(err, PipelineError::MissingVectorStore(_)));
	}

	#[test]
	fn malformed_rows_are_input_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vectors.csv");

		for body in ["1,2,3\n1,2\n", "1,abc,3\n", "1.5,2,3\n", "-1,2,3\n", "7\n", "", "1,nan,2\n"] {
			fs::write(&path, body).unwrap();
			let err = load(&path, 10).unwrap_err();
			assert!(matches!(err, PipelineError::Input(_)), "{:?} -> {:?}", body, err);
		}
	}

	#[test]
	fn mismatched_lengths_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let bad = Extraction {
			labels: vec![1],
			embeddings: Array2::zeros((2, 3)),
		};
		assert!(write(&dir.path().join("v.csv"), &bad).is_err());
	}
}
