//! Reduce command - project embeddings to 3-D

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::ReduceArgs;
use crate::config::{ReduceSection, COORDS_FILE, DEFAULT_REDUCE_LIMIT, VECTORS_FILE};
use crate::pipeline;
use crate::ui;

/// Fully resolved reduction options.
#[derive(Debug, Clone)]
pub struct ReduceSettings {
	pub input: PathBuf,
	pub output: PathBuf,
	pub limit: usize,
	pub report: Option<PathBuf>,
}

impl ReduceSettings {
	pub fn resolve(
		input: Option<&Path>,
		output: Option<&Path>,
		limit: Option<usize>,
		report: Option<&Path>,
		file: &ReduceSection,
	) -> Self {
		Self {
			input: input
				.map(Path::to_path_buf)
				.or_else(|| file.input.clone())
				.unwrap_or_else(|| PathBuf::from(VECTORS_FILE)),
			output: output
				.map(Path::to_path_buf)
				.or_else(|| file.output.clone())
				.unwrap_or_else(|| PathBuf::from(COORDS_FILE)),
			limit: limit.or(file.limit).unwrap_or(DEFAULT_REDUCE_LIMIT),
			report: report.map(Path::to_path_buf).or_else(|| file.report.clone()),
		}
	}

	pub fn from_args(args: &ReduceArgs, file: &ReduceSection) -> Self {
		Self::resolve(
			args.input.as_deref(),
			args.output.as_deref(),
			args.limit,
			args.report.as_deref(),
			file,
		)
	}
}

pub fn run(settings: &ReduceSettings) -> Result<()> {
	let start = Instant::now();

	ui::info(&format!("Loading vectors from {}", settings.input.display()));

	let outcome = pipeline::reduce_file(
		&settings.input,
		&settings.output,
		settings.limit,
		settings.report.as_deref(),
	)
	.context("Reduction failed")?;

	ui::info(&format!(
		"Reduced {} vectors from {}D to 3D",
		outcome.rows(),
		outcome.dimensions
	));

	let ratios = outcome.pca.explained_variance_ratio();
	ui::debug(&format!(
		"Explained variance: {}",
		ratios
			.iter()
			.map(|r| format!("{:.2}%", r * 100.0))
			.collect::<Vec<_>>()
			.join(", ")
	));
	ui::info(&format!("Variance retained: {:.2}%", ratios.sum() * 100.0));

	ui::success(&format!(
		"Saved {} 3D coordinates to {}",
		outcome.rows(),
		ui::path_link(&settings.output)
	));
	if let Some(report) = &settings.report {
		ui::success(&format!("Report written to {}", ui::path_link(report)));
	}

	ui::summary(outcome.rows(), outcome.dimensions, start.elapsed().as_secs_f32());
	Ok(())
}
