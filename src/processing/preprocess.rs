//! Image to tensor preprocessing

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array3;

use crate::config::{CHANNEL_MEAN, CHANNEL_STD, CROP_SIZE, RESIZE_SIZE};
use crate::error::{PipelineError, Result};

/// Resize, center-crop and normalize an image into a `[3, crop, crop]` tensor.
#[derive(Debug, Clone)]
pub struct Preprocessor {
	resize: u32,
	crop: u32,
	mean: [f32; 3],
	std: [f32; 3],
}

impl Default for Preprocessor {
	fn default() -> Self {
		Self {
			resize: RESIZE_SIZE,
			crop: CROP_SIZE,
			mean: CHANNEL_MEAN,
			std: CHANNEL_STD,
		}
	}
}

impl Preprocessor {
	pub fn new(resize: u32, crop: u32, mean: [f32; 3], std: [f32; 3]) -> Result<Self> {
		if crop == 0 || resize < crop {
			return Err(PipelineError::input(format!(
				"invalid preprocessing sizes: resize {} must be >= crop {} > 0",
				resize, crop
			)));
		}
		if std.iter().any(|s| *s <= 0.0) {
			return Err(PipelineError::input("channel std must be positive"));
		}
		Ok(Self { resize, crop, mean, std })
	}

	pub fn crop_size(&self) -> usize {
		self.crop as usize
	}

	pub fn apply(&self, image: &DynamicImage) -> Result<Array3<f32>> {
		let (width, height) = (image.width(), image.height());
		if width == 0 || height == 0 {
			return Err(PipelineError::ImageFormat(format!("empty image ({}x{})", width, height)));
		}
		if !matches!(image.color().channel_count(), 1..=4) {
			return Err(PipelineError::ImageFormat(format!(
				"unsupported color type {:?}",
				image.color()
			)));
		}

		let (new_w, new_h) = shorter_side_to(width, height, self.resize);
		let resized = image.resize_exact(new_w, new_h, FilterType::Triangle);

		let left = center_offset(new_w, self.crop);
		let top = center_offset(new_h, self.crop);
		let rgb = resized.crop_imm(left, top, self.crop, self.crop).to_rgb8();

		let size = self.crop as usize;
		let mut tensor = Array3::<f32>::zeros((3, size, size));
		for (x, y, px) in rgb.enumerate_pixels() {
			for c in 0..3 {
				let scaled = px[c] as f32 / 255.0;
				tensor[[c, y as usize, x as usize]] = (scaled - self.mean[c]) / self.std[c];
			}
		}

		Ok(tensor)
	}
}

/// Scale so the shorter side equals `target`, keeping the aspect ratio.
fn shorter_side_to(width: u32, height: u32, target: u32) -> (u32, u32) {
	let scale = |long: u32, short: u32| ((long as u64 * target as u64) / short as u64).max(1) as u32;
	if width <= height {
		(target, scale(height, width))
	} else {
		(scale(width, height), target)
	}
}

fn center_offset(side: u32, crop: u32) -> u32 {
	(side.saturating_sub(crop) as f64 / 2.0).round_ties_even() as u32
}
