//! Unified logging system

use chrono::Local;
use colored::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

fn stamp() -> ColoredString {
	Local::now().format("%H:%M:%S").to_string().dimmed()
}

pub fn info(msg: &str) {
	println!("[{}] {} {}", stamp(), "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("[{}] {} {}", stamp(), "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	println!("[{}] {} {}", stamp(), "⚠".bright_yellow().bold(), msg.bright_white());
}

/// Errors go to stderr so piped stdout stays clean.
pub fn error(msg: &str) {
	eprintln!("[{}] {} {}", stamp(), "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("[{}] {} {}", stamp(), "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!();
	println!("{}", format!("─── {} ───", text).bright_blue().bold());
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &Path) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, path.display())
}

/// Prints a stage summary with row counts and timing.
pub fn summary(rows: usize, dimensions: usize, duration_secs: f32) {
	header("Summary");
	println!("  {} {}", "Rows:".bright_blue(), rows);
	println!("  {} {}", "Dimensions:".bright_blue(), dimensions);
	println!("  {} {:.2}s", "Duration:".bright_blue(), duration_secs);
	if rows > 0 {
		let avg_ms = (duration_secs * 1000.0) / rows as f32;
		println!("  {} {:.1}ms/row", "Average:".bright_blue(), avg_ms);
	}
	println!();
}
