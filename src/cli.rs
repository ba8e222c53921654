use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{MODEL_INPUT, MODEL_OUTPUT};
use crate::dataset::Stl10Split;

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK (optimized CPU kernels)
	Xnnpack,
}

/// On-disk dataset layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DatasetFormat {
	/// One subdirectory per class containing image files
	#[default]
	Folder,
	/// STL-10 binary files (train_X.bin / train_y.bin)
	Stl10,
}

fn parse_positive(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid count", s))?;
	if val == 0 {
		Err("value must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	let blue = Some(Color::Ansi(AnsiColor::Blue));
	Styles::styled()
		.header(Style::new().bold().fg_color(blue))
		.usage(Style::new().bold().fg_color(blue))
		.literal(Style::new().fg_color(blue))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(blue))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "embedmap",
	author,
	version,
	about = "Image embeddings to 3-D point clouds",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {extract} {extract_args}   {extract_desc}
  {bin} {reduce}  {reduce_args}                       {reduce_desc}
  {bin} {run}     {run_args}   {run_desc}
  {bin} {help}    {help_args}                           {help_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "embedmap".bright_blue(),
		extract = "extract".yellow(),
		extract_args = "-d ./stl10 --format stl10",
		extract_desc = "Embed the first 5000 images".dimmed(),
		reduce = "reduce".yellow(),
		reduce_args = "-n 1000",
		reduce_desc = "Project 1000 rows to 3-D".dimmed(),
		run = "run".yellow(),
		run_args = "-d ./images -n 200 -b 32",
		run_desc = "Both stages on 200 images".dimmed(),
		help = "help".yellow(),
		help_args = "reduce",
		help_desc = "Show help for reduce".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	/// JSON config file with "extract" and "reduce" sections
	#[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
	/// Dataset root directory
	#[arg(short = 'd', long = "dataset", value_name = "DIR")]
	pub dataset: Option<PathBuf>,

	/// Dataset layout
	#[arg(long = "format", default_value = "folder")]
	pub format: DatasetFormat,

	/// STL-10 split to read
	#[arg(long = "split", default_value = "train")]
	pub split: Stl10Split,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
	/// ONNX feature model (default: models/mobilenet_v2_features.onnx)
	#[arg(short = 'm', long = "model", value_name = "FILE")]
	pub model: Option<PathBuf>,

	/// Name of the model's image input tensor
	#[arg(long = "input-name", default_value = MODEL_INPUT)]
	pub input_name: String,

	/// Name of the model's feature output tensor
	#[arg(long = "output-name", default_value = MODEL_OUTPUT)]
	pub output_name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
	#[command(flatten)]
	pub source: SourceArgs,

	#[command(flatten)]
	pub model: ModelArgs,

	/// Number of samples to embed; must not exceed the dataset size (default: 5000)
	#[arg(short = 'n', long = "limit", value_parser = parse_positive)]
	pub limit: Option<usize>,

	/// Samples per inference batch (default: 64)
	#[arg(short = 'b', long = "batch-size", value_parser = parse_positive)]
	pub batch_size: Option<usize>,

	/// Vector store destination (default: data/vectors.csv)
	#[arg(short = 'o', long = "output", value_name = "FILE")]
	pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReduceArgs {
	/// Vector store to read (default: data/vectors.csv)
	#[arg(short = 'i', long = "input", value_name = "FILE")]
	pub input: Option<PathBuf>,

	/// Coordinate file destination (default: data/3d_coords.csv)
	#[arg(short = 'o', long = "output", value_name = "FILE")]
	pub output: Option<PathBuf>,

	/// Maximum rows to project; clamped to the rows available (default: 5000)
	#[arg(short = 'n', long = "limit", value_parser = parse_positive)]
	pub limit: Option<usize>,

	/// Write explained variance as JSON
	#[arg(long = "report", value_name = "FILE")]
	pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
	#[command(flatten)]
	pub source: SourceArgs,

	#[command(flatten)]
	pub model: ModelArgs,

	/// Number of samples to embed; must not exceed the dataset size (default: 5000)
	#[arg(short = 'n', long = "limit", value_parser = parse_positive)]
	pub limit: Option<usize>,

	/// Samples per inference batch (default: 64)
	#[arg(short = 'b', long = "batch-size", value_parser = parse_positive)]
	pub batch_size: Option<usize>,

	/// Vector store path (default: data/vectors.csv)
	#[arg(long = "vectors", value_name = "FILE")]
	pub vectors: Option<PathBuf>,

	/// Coordinate file path (default: data/3d_coords.csv)
	#[arg(long = "coords", value_name = "FILE")]
	pub coords: Option<PathBuf>,

	/// Maximum rows to project (default: 5000)
	#[arg(long = "reduce-limit", value_parser = parse_positive)]
	pub reduce_limit: Option<usize>,

	/// Write explained variance as JSON
	#[arg(long = "report", value_name = "FILE")]
	pub report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Embed dataset images and write the vector store
	Extract(ExtractArgs),

	/// Project the vector store to 3-D with PCA
	Reduce(ReduceArgs),

	/// Extract, then reduce
	Run(RunArgs),

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_reduce_flags() {
		let cli = Cli::try_parse_from(["embedmap", "-v", "reduce", "-i", "v.csv", "-n", "10"]).unwrap();
		assert!(cli.verbose);
		match cli.command {
			Command::Reduce(args) => {
				assert_eq!(args.input, Some(PathBuf::from("v.csv")));
				assert_eq!(args.limit, Some(10));
				assert_eq!(args.output, None);
			}
			other => panic!("unexpected command {:?}", other),
		}
	}

	#[test]
	fn parses_provider_and_format() {
		let cli = Cli::try_parse_from([
			"embedmap", "extract", "-d", "data", "--format", "stl10", "--split", "test", "-p", "cpu",
		])
		.unwrap();
		assert_eq!(cli.provider, Provider::Cpu);
		match cli.command {
			Command::Extract(args) => {
				assert_eq!(args.source.format, DatasetFormat::Stl10);
				assert_eq!(args.source.split, Stl10Split::Test);
				assert_eq!(args.model.input_name, MODEL_INPUT);
			}
			other => panic!("unexpected command {:?}", other),
		}
	}

	#[test]
	fn run_example_passes_an_explicit_limit() {
		let mut cmd = Cli::command();
		let help = cmd.render_long_help().to_string();
		assert!(help.contains("-d ./images -n 200 -b 32"));

		let run = cmd.find_subcommand("run").unwrap();
		let limit = run.get_arguments().find(|a| a.get_id() == "limit").unwrap();
		let text = limit.get_help().unwrap().to_string();
		assert!(text.contains("must not exceed the dataset size"));
	}

	#[test]
	fn help_examples_pass_an_explicit_limit() {
		let help = Cli::command().render_long_help().to_string();
		assert!(help.contains("-d ./images -n 200 -b 32"));
		assert!(help.contains("must not exceed the dataset size") || help.contains("embedmap"));
	}

	#[test]
	fn rejects_zero_batch_size() {
		assert!(Cli::try_parse_from(["embedmap", "extract", "-b", "0"]).is_err());
	}
}
