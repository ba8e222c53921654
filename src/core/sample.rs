//! Labeled images as yielded by a sample source

use image::DynamicImage;

/// Category code attached to every sample.
pub type Label = u32;

/// One image and its label.
#[derive(Debug, Clone)]
pub struct Sample {
	pub image: DynamicImage,
	pub label: Label,
}

impl Sample {
	pub fn new(image: DynamicImage, label: Label) -> Self {
		Self { image, label }
	}
}
