//! embedmap - image embeddings to 3-D point clouds
//!
//! `extract` embeds a dataset into a vector store, `reduce` projects the
//! vector store to 3-D with PCA, `run` does both.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use embedmap::cli::{Cli, Command};
use embedmap::commands::extract::ExtractSettings;
use embedmap::commands::reduce::ReduceSettings;
use embedmap::commands::{extract, reduce, run};
use embedmap::config::FileConfig;
use embedmap::ui::{self, Log};

fn main() {
	let cli = Cli::parse();
	Log::set_verbose(cli.verbose);

	if let Err(e) = dispatch(cli) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn dispatch(cli: Cli) -> Result<()> {
	let file = FileConfig::load_optional(cli.config.as_deref())?;

	match cli.command {
		Command::Extract(args) => {
			print_header();
			let settings = ExtractSettings::from_args(&args, &file.extract, cli.provider)?;
			extract::run(&settings)
		}
		Command::Reduce(args) => {
			print_header();
			let settings = ReduceSettings::from_args(&args, &file.reduce);
			reduce::run(&settings)
		}
		Command::Run(args) => {
			print_header();
			run::run(&args, &file, cli.provider)
		}
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					eprintln!("Unknown subcommand: {}", sub);
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}

fn print_header() {
	println!();
	println!(
		"{}",
		format!("─── embedmap v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}
