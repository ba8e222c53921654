//! Application configuration and constants

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// === Model Files ===
pub const FEATURE_MODEL: &str = "mobilenet_v2_features.onnx";
pub const MODEL_INPUT: &str = "input";
pub const MODEL_OUTPUT: &str = "features";
pub const MODELS_DIR_ENV: &str = "EMBEDMAP_MODELS_DIR";

// === Preprocessing ===
pub const RESIZE_SIZE: u32 = 256;
pub const CROP_SIZE: u32 = 224;
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

// === Pipeline Defaults ===
pub const DEFAULT_BATCH_SIZE: usize = 64;
pub const DEFAULT_EXTRACT_LIMIT: usize = 5000;
pub const DEFAULT_REDUCE_LIMIT: usize = 5000;
pub const PCA_COMPONENTS: usize = 3;

// === Output Files ===
pub const VECTORS_FILE: &str = "data/vectors.csv";
pub const COORDS_FILE: &str = "data/3d_coords.csv";
pub const VECTOR_PRECISION: usize = 8;
pub const COORD_PRECISION: usize = 4;
pub const COORDS_HEADER: &str = "id,label,x,y,z";

// === Datasets ===
pub const IMAGE_EXTENSIONS: &[&str] = &[
	"jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif",
];

/// Values loaded from an optional JSON config file.
///
/// Every field is optional; command-line flags take precedence and the
/// constants above fill whatever is left.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
	pub extract: ExtractSection,
	pub reduce: ReduceSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractSection {
	pub dataset: Option<PathBuf>,
	pub model: Option<PathBuf>,
	pub limit: Option<usize>,
	pub batch_size: Option<usize>,
	pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReduceSection {
	pub input: Option<PathBuf>,
	pub output: Option<PathBuf>,
	pub limit: Option<usize>,
	pub report: Option<PathBuf>,
}

impl FileConfig {
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		serde_json::from_str(&text)
			.with_context(|| format!("Invalid config file: {}", path.display()))
	}

	pub fn load_optional(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(p) => Self::load(p),
			None => Ok(Self::default()),
		}
	}
}

/// Get models directory (EMBEDMAP_MODELS_DIR env var, or `models/` next to the executable)
pub fn models_dir() -> Option<PathBuf> {
	if let Ok(env_path) = std::env::var(MODELS_DIR_ENV) {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using {}: {}", MODELS_DIR_ENV, env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models");
			if models.is_dir() {
				crate::ui::debug(&format!("Found models at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}

/// Resolve the feature model path, preferring an explicit path.
pub fn feature_model_path(explicit: Option<&Path>) -> Option<PathBuf> {
	if let Some(custom) = explicit {
		return Some(custom.to_path_buf());
	}
	models_dir().map(|d| d.join(FEATURE_MODEL))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_partial_config() {
		let cfg: FileConfig =
			serde_json::from_str(r#"{ "extract": { "batch_size": 16 }, "reduce": { "limit": 100 } }"#)
				.unwrap();
		assert_eq!(cfg.extract.batch_size, Some(16));
		assert_eq!(cfg.extract.limit, None);
		assert_eq!(cfg.reduce.limit, Some(100));
	}

	#[test]
	fn rejects_unknown_keys() {
		let err = serde_json::from_str::<FileConfig>(r#"{ "extract": { "batchsize": 16 } }"#);
		assert!(err.is_err());
	}

	#[test]
	fn explicit_model_path_wins() {
		let p = feature_model_path(Some(Path::new("/tmp/m.onnx")));
		assert_eq!(p, Some(PathBuf::from("/tmp/m.onnx")));
	}
}
