//! Coordinate file: `id,label,x,y,z` header plus one row per point

use ndarray::ArrayView2;
use std::path::Path;

use crate::config::{COORDS_HEADER, COORD_PRECISION};
use crate::core::{Coordinate, Label};
use crate::error::{PipelineError, Result};

/// Pair each projected row with its label; `id` is the row index.
pub fn build(labels: &[Label], projected: ArrayView2<'_, f64>) -> Result<Vec<Coordinate>> {
	if projected.ncols() != 3 {
		return Err(PipelineError::input(format!(
			"expected 3 projected columns, got {}",
			projected.ncols()
		)));
	}
	if labels.len() != projected.nrows() {
		return Err(PipelineError::input(format!(
			"{} labels for {} projected rows",
			labels.len(),
			projected.nrows()
		)));
	}

	Ok(labels
		.iter()
		.zip(projected.rows())
		.enumerate()
		.map(|(id, (&label, p))| Coordinate {
			id,
			label,
			x: p[0],
			y: p[1],
			z: p[2],
		})
		.collect())
}

pub fn write(path: &Path, coords: &[Coordinate]) -> Result<()> {
	stage(path, coords)?.commit()
}

/// Render the coordinate file next to `path` without publishing it yet.
pub(crate) fn stage(path: &Path, coords: &[Coordinate]) -> Result<super::Staged> {
	super::stage(path, |w| {
		writeln!(w, "{}", COORDS_HEADER)?;
		for c in coords {
			writeln!(
				w,
				"{},{},{:.p$},{:.p$},{:.p$}",
				c.id,
				c.label,
				c.x,
				c.y,
				c.z,
				p = COORD_PRECISION
			)?;
		}
		Ok(())
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;
	use std::fs;

	#[test]
	fn ids_follow_row_order() {
		let projected = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
		let coords = build(&[5, 5, 1], projected.view()).unwrap();
		let ids: Vec<usize> = coords.iter().map(|c| c.id).collect();
		assert_eq!(ids, vec![0, 1, 2]);
		assert_eq!(coords[2].label, 1);
		assert_eq!(coords[1].y, 5.0);
	}

	#[test]
	fn writes_header_and_four_decimals() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("out/3d.csv");
		let projected = array![[0.123456, -2.0, 10.00006], [0.0, 1.0 / 3.0, -0.5]];
		let coords = build(&[2, 9], projected.view()).unwrap();
		write(&path, &coords).unwrap();

		let text = fs::read_to_string(&path).unwrap();
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines[0], "id,label,x,y,z");
		assert_eq!(lines[1], "0,2,0.1235,-2.0000,10.0001");
		assert_eq!(lines[2], "1,9,0.0000,0.3333,-0.5000");
		assert_eq!(lines.len(), 3);
	}

	#[test]
	fn rejects_wrong_width() {
		let projected = array![[1.0, 2.0]];
		assert!(build(&[0], projected.view()).is_err());
	}
}
