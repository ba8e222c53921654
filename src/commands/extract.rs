//! Extract command - embed dataset images

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::{DatasetFormat, ExtractArgs, ModelArgs, Provider, SourceArgs};
use crate::config::{self, ExtractSection, DEFAULT_BATCH_SIZE, DEFAULT_EXTRACT_LIMIT, VECTORS_FILE};
use crate::dataset::{ImageFolderSource, SampleSource, Stl10Source, Stl10Split};
use crate::models::OnnxExtractor;
use crate::pipeline;
use crate::processing::Preprocessor;
use crate::ui;

/// Fully resolved extraction options.
#[derive(Debug, Clone)]
pub struct ExtractSettings {
	pub dataset: PathBuf,
	pub format: DatasetFormat,
	pub split: Stl10Split,
	pub model: PathBuf,
	pub input_name: String,
	pub output_name: String,
	pub limit: usize,
	pub batch_size: usize,
	pub output: PathBuf,
	pub provider: Provider,
}

impl ExtractSettings {
	/// Flags win over the config file, the config file over built-in defaults.
	pub fn resolve(
		source: &SourceArgs,
		model: &ModelArgs,
		limit: Option<usize>,
		batch_size: Option<usize>,
		output: Option<&Path>,
		file: &ExtractSection,
		provider: Provider,
	) -> Result<Self> {
		let dataset = source
			.dataset
			.clone()
			.or_else(|| file.dataset.clone())
			.context("No dataset given. Pass --dataset or set extract.dataset in the config file")?;

		let explicit_model = model.model.as_deref().or(file.model.as_deref());
		let model_path = config::feature_model_path(explicit_model).with_context(|| {
			format!(
				"Feature model not found. Pass --model, set {} or place {} in models/ next to the executable",
				config::MODELS_DIR_ENV,
				config::FEATURE_MODEL
			)
		})?;

		Ok(Self {
			dataset,
			format: source.format,
			split: source.split,
			model: model_path,
			input_name: model.input_name.clone(),
			output_name: model.output_name.clone(),
			limit: limit.or(file.limit).unwrap_or(DEFAULT_EXTRACT_LIMIT),
			batch_size: batch_size.or(file.batch_size).unwrap_or(DEFAULT_BATCH_SIZE),
			output: output
				.map(Path::to_path_buf)
				.or_else(|| file.output.clone())
				.unwrap_or_else(|| PathBuf::from(VECTORS_FILE)),
			provider,
		})
	}

	pub fn from_args(args: &ExtractArgs, file: &ExtractSection, provider: Provider) -> Result<Self> {
		Self::resolve(
			&args.source,
			&args.model,
			args.limit,
			args.batch_size,
			args.output.as_deref(),
			file,
			provider,
		)
	}
}

pub fn open_source(format: DatasetFormat, root: &Path, split: Stl10Split) -> Result<Box<dyn SampleSource>> {
	let source: Box<dyn SampleSource> = match format {
		DatasetFormat::Folder => {
			let folder = ImageFolderSource::open(root)?;
			ui::debug(&format!("Classes: {}", folder.classes().join(", ")));
			Box::new(folder)
		}
		DatasetFormat::Stl10 => Box::new(Stl10Source::open(root, split)?),
	};
	Ok(source)
}

pub fn run(settings: &ExtractSettings) -> Result<()> {
	let start = Instant::now();

	ui::info(&format!("Loading dataset: {}", settings.dataset.display()));
	let source = open_source(settings.format, &settings.dataset, settings.split)
		.context("Failed to open dataset")?;
	ui::success(&format!("Dataset ready ({} samples)", source.len()));

	ui::info("Loading feature model...");
	let load_start = Instant::now();
	let mut extractor = OnnxExtractor::with_names(
		&settings.model,
		settings.provider,
		&settings.input_name,
		&settings.output_name,
	)?;
	ui::success(&format!("Model ready in {:.2}s", load_start.elapsed().as_secs_f32()));

	let extraction = pipeline::extract_to_file(
		&source,
		&Preprocessor::default(),
		&mut extractor,
		settings.limit,
		settings.batch_size,
		&settings.output,
	)
	.context("Feature extraction failed")?;

	ui::success(&format!(
		"Saved {} feature vectors to {}",
		extraction.len(),
		ui::path_link(&settings.output)
	));
	ui::summary(extraction.len(), extraction.dimensions(), start.elapsed().as_secs_f32());

	Ok(())
}
