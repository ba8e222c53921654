// Command-line behavior of the embedmap binary

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use common::write_lines;

fn embedmap(args: &[&str], cwd: &Path) -> Output {
	Command::new(env!("CARGO_BIN_EXE_embedmap"))
		.args(args)
		.current_dir(cwd)
		.env_remove("EMBEDMAP_MODELS_DIR")
		.output()
		.expect("Failed to run embedmap")
}

#[test]
fn test_version_display() {
	let dir = tempfile::tempdir().unwrap();
	let output = embedmap(&["--version"], dir.path());
	assert!(output.status.success(), "Version command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("embedmap"), "Expected 'embedmap' in version output");
}

#[test]
fn test_help_display() {
	let dir = tempfile::tempdir().unwrap();
	let output = embedmap(&["--help"], dir.path());
	assert!(output.status.success(), "Help command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(
		stdout.contains("extract") && stdout.contains("reduce") && stdout.contains("run"),
		"Expected subcommands in help output"
	);
}

#[test]
fn test_reduce_missing_input_fails() {
	let dir = tempfile::tempdir().unwrap();
	let output = embedmap(&["reduce", "-i", "absent.csv", "-o", "coords.csv"], dir.path());

	assert!(!output.status.success(), "Reduce should fail without a vector store");
	assert_eq!(output.status.code(), Some(1));

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("vector store not found"), "stderr: {}", stderr);
	assert!(!dir.path().join("coords.csv").exists());
}

#[test]
fn test_reduce_writes_coordinates() {
	let dir = tempfile::tempdir().unwrap();
	let lines: Vec<String> = (0..12)
		.map(|i| {
			let i = i as f64;
			format!("{},{:.8},{:.8},{:.8},{:.8}", i as u32 % 3, i, (i * 0.5).sin(), i * i / 10.0, (i * 0.9).cos())
		})
		.collect();
	write_lines(&dir.path().join("data/vectors.csv"), &lines);

	let output = embedmap(&["reduce", "-n", "500", "--report", "data/report.json"], dir.path());
	assert!(
		output.status.success(),
		"Reduce failed: {}",
		String::from_utf8_lossy(&output.stderr)
	);

	let rows = common::read_coords(&dir.path().join("data/3d_coords.csv"));
	assert_eq!(rows.len(), 12);
	assert!(dir.path().join("data/report.json").exists());
}

#[test]
fn test_config_file_sets_paths() {
	let dir = tempfile::tempdir().unwrap();
	let lines: Vec<String> = (0..6)
		.map(|i| format!("{},{}.0,{}.5,{}.25,1.0", i, i, i * 2, i * i))
		.collect();
	write_lines(&dir.path().join("in/v.csv"), &lines);
	fs::write(
		dir.path().join("cfg.json"),
		r#"{ "reduce": { "input": "in/v.csv", "output": "out/c.csv", "limit": 4 } }"#,
	)
	.unwrap();

	let output = embedmap(&["-c", "cfg.json", "reduce"], dir.path());
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

	let rows = common::read_coords(&dir.path().join("out/c.csv"));
	assert_eq!(rows.len(), 4);
}

#[test]
fn test_extract_missing_model_fails() {
	let dir = tempfile::tempdir().unwrap();
	let img = dir.path().join("dataset/cat/a.png");
	fs::create_dir_all(img.parent().unwrap()).unwrap();
	image::RgbImage::new(8, 8).save(&img).unwrap();

	let output = embedmap(
		&["extract", "-d", "dataset", "-m", "missing.onnx", "-n", "1"],
		dir.path(),
	);
	assert_eq!(output.status.code(), Some(1));
	assert!(!dir.path().join("data/vectors.csv").exists());
}
