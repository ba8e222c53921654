//! STL-10 binary reader
//!
//! Reads the `stl10_binary` layout: `<split>_X.bin` holds 96x96 RGB images as
//! raw bytes, channel-major and column-major inside each channel;
//! `<split>_y.bin` holds one label byte (1..=10) per image.

use clap::ValueEnum;
use image::{DynamicImage, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SampleSource;
use crate::core::{Label, Sample};
use crate::error::{PipelineError, Result};

const SIDE: usize = 96;
const PLANE: usize = SIDE * SIDE;
const IMAGE_BYTES: usize = 3 * PLANE;
const BINARY_DIR: &str = "stl10_binary";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Stl10Split {
	#[default]
	Train,
	Test,
}

impl Stl10Split {
	fn prefix(self) -> &'static str {
		match self {
			Stl10Split::Train => "train",
			Stl10Split::Test => "test",
		}
	}
}

pub struct Stl10Source {
	images: Mutex<File>,
	images_path: PathBuf,
	labels: Vec<Label>,
}

impl Stl10Source {
	/// Open a split from `root` or `root/stl10_binary`.
	pub fn open(root: &Path, split: Stl10Split) -> Result<Self> {
		let nested = root.join(BINARY_DIR);
		let dir = if nested.is_dir() { nested } else { root.to_path_buf() };

		let images_path = dir.join(format!("{}_X.bin", split.prefix()));
		let labels_path = dir.join(format!("{}_y.bin", split.prefix()));

		let images = File::open(&images_path).map_err(|e| {
			PipelineError::input(format!("cannot open {}: {}", images_path.display(), e))
		})?;
		let size = images
			.metadata()
			.map_err(|e| PipelineError::io(&images_path, e))?
			.len() as usize;

		if size % IMAGE_BYTES != 0 {
			return Err(PipelineError::input(format!(
				"{} is {} bytes, not a multiple of {}",
				images_path.display(),
				size,
				IMAGE_BYTES
			)));
		}

		let raw_labels = fs::read(&labels_path).map_err(|e| {
			PipelineError::input(format!("cannot read {}: {}", labels_path.display(), e))
		})?;

		let count = size / IMAGE_BYTES;
		if raw_labels.len() != count {
			return Err(PipelineError::input(format!(
				"{} has {} labels for {} images",
				labels_path.display(),
				raw_labels.len(),
				count
			)));
		}

		let labels = raw_labels
			.iter()
			.enumerate()
			.map(|(i, &b)| {
				b.checked_sub(1).map(Label::from).ok_or_else(|| {
					PipelineError::input(format!("label 0 at index {} in {}", i, labels_path.display()))
				})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(Self {
			images: Mutex::new(images),
			images_path,
			labels,
		})
	}

	fn read_raw(&self, index: usize) -> Result<Vec<u8>> {
		let mut file = self
			.images
			.lock()
			.map_err(|_| PipelineError::input("image file lock poisoned"))?;

		let mut buf = vec![0u8; IMAGE_BYTES];
		file.seek(SeekFrom::Start((index * IMAGE_BYTES) as u64))
			.and_then(|_| file.read_exact(&mut buf))
			.map_err(|e| PipelineError::input(format!("{}: {}", self.images_path.display(), e)))?;
		Ok(buf)
	}
}

/// Rebuild a row-major RGB image from the column-major planes.
fn decode(raw: &[u8]) -> RgbImage {
	RgbImage::from_fn(SIDE as u32, SIDE as u32, |x, y| {
		let offset = x as usize * SIDE + y as usize;
		Rgb([raw[offset], raw[PLANE + offset], raw[2 * PLANE + offset]])
	})
}

impl SampleSource for Stl10Source {
	fn len(&self) -> usize {
		self.labels.len()
	}

	fn get(&self, index: usize) -> Result<Sample> {
		let label = *self.labels.get(index).ok_or(PipelineError::Range {
			requested: index + 1,
			available: self.labels.len(),
		})?;

		let raw = self.read_raw(index)?;
		Ok(Sample::new(DynamicImage::ImageRgb8(decode(&raw)), label))
	}
}
