//! Class-per-directory image datasets

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::SampleSource;
use crate::config::IMAGE_EXTENSIONS;
use crate::core::{Label, Sample};
use crate::error::{PipelineError, Result};
use crate::ui;

/// Images laid out as `root/<class>/**/<image>`.
///
/// Class directories are sorted by name and numbered from 0. Files inside a
/// class are sorted by path, so the sample order only depends on the tree.
pub struct ImageFolderSource {
	classes: Vec<String>,
	items: Vec<(PathBuf, Label)>,
}

impl ImageFolderSource {
	pub fn open(root: &Path) -> Result<Self> {
		let entries = fs::read_dir(root).map_err(|e| {
			PipelineError::input(format!("cannot read dataset directory {}: {}", root.display(), e))
		})?;

		let mut class_dirs: Vec<PathBuf> = entries
			.filter_map(|e| e.ok())
			.map(|e| e.path())
			.filter(|p| p.is_dir())
			.collect();
		class_dirs.sort();

		if class_dirs.is_empty() {
			return Err(PipelineError::input(format!(
				"no class directories found in {}",
				root.display()
			)));
		}

		let mut classes = Vec::with_capacity(class_dirs.len());
		let mut items = Vec::new();

		for (label, dir) in class_dirs.iter().enumerate() {
			let name = dir
				.file_name()
				.map(|n| n.to_string_lossy().into_owned())
				.unwrap_or_default();

			let mut files: Vec<PathBuf> = WalkDir::new(dir)
				.follow_links(true)
				.into_iter()
				.filter_map(|e| e.ok())
				.filter(|e| e.file_type().is_file() && is_image(e.path()))
				.map(|e| e.into_path())
				.collect();
			files.sort();

			ui::debug(&format!("Class {} '{}': {} images", label, name, files.len()));

			let label = label as Label;
			items.extend(files.into_iter().map(|p| (p, label)));
			classes.push(name);
		}

		Ok(Self { classes, items })
	}

	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	pub fn path(&self, index: usize) -> Option<&Path> {
		self.items.get(index).map(|(p, _)| p.as_path())
	}
}

impl SampleSource for ImageFolderSource {
	fn len(&self) -> usize {
		self.items.len()
	}

	fn get(&self, index: usize) -> Result<Sample> {
		let (path, label) = self.items.get(index).ok_or(PipelineError::Range {
			requested: index + 1,
			available: self.items.len(),
		})?;

		let image = image::open(path).map_err(|e| {
			PipelineError::ImageFormat(format!("{}: {}", path.display(), e))
		})?;

		Ok(Sample::new(image, *label))
	}
}

fn is_image(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
