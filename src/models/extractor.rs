//! Convolutional feature extractor for batched embeddings

use ndarray::{Array2, ArrayView4, Axis};
use ort::session::Session;
use std::path::Path;

use crate::config::{MODEL_INPUT, MODEL_OUTPUT};
use crate::error::{PipelineError, Result};
use crate::runtime::{self, Provider};

/// Maps a `[B, 3, H, W]` batch to `[B, D]`, one row per input in input order.
///
/// Implementations must be deterministic for fixed weights and device.
pub trait FeatureExtractor {
    fn extract(&mut self, batch: ArrayView4<'_, f32>) -> Result<Array2<f32>>;
}

impl<E: FeatureExtractor + ?Sized> FeatureExtractor for Box<E> {
    fn extract(&mut self, batch: ArrayView4<'_, f32>) -> Result<Array2<f32>> {
        (**self).extract(batch)
    }
}

/// ONNX export of a backbone's feature layers, run in inference mode.
pub struct OnnxExtractor {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxExtractor {
    pub fn load(model_path: &Path, provider: Provider) -> Result<Self> {
        Self::with_names(model_path, provider, MODEL_INPUT, MODEL_OUTPUT)
    }

    pub fn with_names(
        model_path: &Path,
        provider: Provider,
        input_name: &str,
        output_name: &str,
    ) -> Result<Self> {
        let session = runtime::create_session(model_path, provider)?;
        Ok(Self {
            session,
            input_name: input_name.to_string(),
            output_name: output_name.to_string(),
        })
    }
}

impl FeatureExtractor for OnnxExtractor {
    fn extract(&mut self, batch: ArrayView4<'_, f32>) -> Result<Array2<f32>> {
        let shape: Vec<usize> = batch.shape().to_vec();
        let data: Vec<f32> = batch.iter().copied().collect();
        let input = ort::value::Value::from_array((shape, data)).map_err(model_error)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(model_error)?;

        let features = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| PipelineError::model(format!("no output named '{}'", self.output_name)))?;

        let (shape, data) = features.try_extract_tensor::<f32>().map_err(model_error)?;
        let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

        global_average_pool(&dims, data)
    }
}

fn model_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::model(e.to_string())
}

/// Collapse `[B, D, h, w]` feature maps to `[B, D]` by averaging each map.
///
/// `[B, D]` and `[B, D, 1, 1]` outputs pass through unchanged.
pub fn global_average_pool(dims: &[usize], data: &[f32]) -> Result<Array2<f32>> {
    let expected: usize = dims.iter().product();
    if data.len() != expected {
        return Err(PipelineError::model(format!(
            "output holds {} values but shape {:?} needs {}",
            data.len(),
            dims,
            expected
        )));
    }

    match *dims {
        [batch, channels] => Array2::from_shape_vec((batch, channels), data.to_vec())
            .map_err(model_error),
        [batch, channels, h, w] if h * w > 0 => {
            let maps = ndarray::ArrayView3::from_shape((batch, channels, h * w), data)
                .map_err(model_error)?;
            let pooled = maps.sum_axis(Axis(2)) / (h * w) as f32;
            Ok(pooled)
        }
        _ => Err(PipelineError::model(format!("unexpected feature shape {:?}", dims))),
    }
}
