//! Run command - extract, then reduce

use anyhow::Result;

use crate::cli::{Provider, RunArgs};
use crate::config::FileConfig;
use crate::ui;

use super::extract::ExtractSettings;
use super::reduce::ReduceSettings;

pub fn run(args: &RunArgs, file: &FileConfig, provider: Provider) -> Result<()> {
	let extract = ExtractSettings::resolve(
		&args.source,
		&args.model,
		args.limit,
		args.batch_size,
		args.vectors.as_deref(),
		&file.extract,
		provider,
	)?;

	// The reducer always reads the file the extractor just wrote.
	let reduce = ReduceSettings::resolve(
		Some(extract.output.as_path()),
		args.coords.as_deref(),
		args.reduce_limit,
		args.report.as_deref(),
		&file.reduce,
	);

	ui::header("Extract");
	super::extract::run(&extract)?;

	ui::header("Reduce");
	super::reduce::run(&reduce)
}
