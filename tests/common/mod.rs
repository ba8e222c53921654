// Shared fixtures for integration tests
#![allow(dead_code)]

use embedmap::core::{Label, Sample};
use embedmap::dataset::MemorySource;
use embedmap::models::FeatureExtractor;
use embedmap::processing::Preprocessor;
use embedmap::Result;
use image::{DynamicImage, Rgb, RgbImage};
use ndarray::{Array2, ArrayView4, Axis};
use std::fs;
use std::path::Path;

/// Solid-color images whose red channel equals the sample index.
pub fn indexed_source(n: usize) -> MemorySource {
	assert!(n <= 256);
	MemorySource::new(
		(0..n)
			.map(|i| {
				let img = RgbImage::from_pixel(5, 7, Rgb([i as u8, 255 - i as u8, 40]));
				Sample::new(DynamicImage::ImageRgb8(img), (i % 10) as Label)
			})
			.collect(),
	)
}

/// Keeps pixel values as-is so the extractor can read the index back.
pub fn passthrough() -> Preprocessor {
	Preprocessor::new(4, 4, [0.0; 3], [1.0; 3]).unwrap()
}

/// Deterministic stand-in for a CNN: recovers the index from the red channel
/// and expands it into a 6-dimensional vector.
pub struct IndexEcho {
	pub calls: usize,
}

impl IndexEcho {
	pub const DIMS: usize = 6;

	pub fn new() -> Self {
		Self { calls: 0 }
	}
}

impl FeatureExtractor for IndexEcho {
	fn extract(&mut self, batch: ArrayView4<'_, f32>) -> Result<Array2<f32>> {
		self.calls += 1;
		let means = batch
			.mean_axis(Axis(3))
			.unwrap()
			.mean_axis(Axis(2))
			.unwrap()
			* 255.0;

		let rows = means.nrows();
		Ok(Array2::from_shape_fn((rows, Self::DIMS), |(r, c)| {
			let index = means[[r, 0]].round();
			let green = means[[r, 1]].round();
			match c {
				0 => index,
				1 => green,
				2 => (index * 0.37).sin(),
				3 => (index * index) / 100.0,
				4 => (index * 1.3).cos() * 2.0,
				_ => 1.0,
			}
		}))
	}
}

pub fn write_lines(path: &Path, lines: &[String]) {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(path, lines.join("\n") + "\n").unwrap();
}

/// Parse a coordinate file into (id, label, [x, y, z]) rows, checking the header.
pub fn read_coords(path: &Path) -> Vec<(usize, u32, [f64; 3])> {
	let text = fs::read_to_string(path).unwrap();
	let mut lines = text.lines();
	assert_eq!(lines.next(), Some("id,label,x,y,z"));
	lines
		.map(|line| {
			let f: Vec<&str> = line.split(',').collect();
			assert_eq!(f.len(), 5, "bad row {:?}", line);
			(
				f[0].parse().unwrap(),
				f[1].parse().unwrap(),
				[f[2].parse().unwrap(), f[3].parse().unwrap(), f[4].parse().unwrap()],
			)
		})
		.collect()
}
