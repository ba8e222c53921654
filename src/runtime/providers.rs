//! Execution provider selection

use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::ui;

pub use crate::cli::Provider;

/// Build an inference session on the requested device.
///
/// Unavailable providers fall back to CPU; the chosen provider never changes
/// the model graph, only where it runs.
pub fn create_session(model_path: &Path, provider: Provider) -> Result<Session> {
	if !model_path.exists() {
		return Err(PipelineError::input(format!(
			"model file does not exist: {}",
			model_path.display()
		)));
	}

	let mut builder = Session::builder().map_err(model_error)?;

	match provider {
		Provider::Auto => register_best(&mut builder),
		Provider::Cpu => ui::info("Using CPU execution provider (forced)"),
		Provider::Cuda => {
			if !try_cuda(&mut builder) {
				ui::error("CUDA requested but unavailable, falling back to CPU");
			}
		}
		Provider::Tensorrt => {
			if !try_tensorrt(&mut builder) {
				ui::error("TensorRT requested but unavailable, falling back to CPU");
			}
		}
		Provider::Coreml => {
			#[cfg(target_os = "macos")]
			if !try_coreml(&mut builder) {
				ui::error("CoreML requested but unavailable, falling back to CPU");
			}
			#[cfg(not(target_os = "macos"))]
			ui::error("CoreML only available on macOS, falling back to CPU");
		}
		Provider::Xnnpack => {
			if !try_xnnpack(&mut builder) {
				ui::error("XNNPACK requested but unavailable, falling back to CPU");
			}
		}
	}

	let session = builder
		.with_optimization_level(GraphOptimizationLevel::Level3)
		.map_err(model_error)?
		.with_intra_threads(4)
		.map_err(model_error)?
		.commit_from_file(model_path)
		.map_err(|e| PipelineError::model(format!("failed to load {}: {}", model_path.display(), e)))?;

	Ok(session)
}

fn model_error(e: impl std::fmt::Display) -> PipelineError {
	PipelineError::model(e.to_string())
}

fn register_best(builder: &mut SessionBuilder) {
	if try_tensorrt(builder) {
		return;
	}
	if try_cuda(builder) {
		return;
	}

	#[cfg(target_os = "macos")]
	if try_coreml(builder) {
		return;
	}

	if try_xnnpack(builder) {
		return;
	}

	ui::info("Using CPU execution provider");
}

macro_rules! try_provider {
	($builder:expr, $provider_type:ty, $name:expr) => {{
		use ort::ep::ExecutionProvider;

		ui::debug(&format!("Trying provider: {}", $name));

		let provider = <$provider_type>::default();
		if !provider.is_available().unwrap_or(false) {
			ui::debug(&format!("{} not available", $name));
			return false;
		}

		match provider.register($builder) {
			Ok(_) => {
				ui::success(&format!("Using {} execution provider", $name));
				true
			}
			Err(e) => {
				ui::debug(&format!("{} registration failed: {}", $name, e));
				false
			}
		}
	}};
}

fn try_cuda(builder: &mut SessionBuilder) -> bool {
	use ort::ep::CUDA;
	try_provider!(builder, CUDA, "CUDA")
}

#[cfg(target_os = "macos")]
fn try_coreml(builder: &mut SessionBuilder) -> bool {
	use ort::ep::CoreML;
	try_provider!(builder, CoreML, "CoreML")
}

fn try_tensorrt(builder: &mut SessionBuilder) -> bool {
	use ort::ep::TensorRT;
	try_provider!(builder, TensorRT, "TensorRT")
}

fn try_xnnpack(builder: &mut SessionBuilder) -> bool {
	use ort::ep::XNNPACK;
	try_provider!(builder, XNNPACK, "XNNPACK")
}
