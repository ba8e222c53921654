//! Principal component analysis for 3-D projection

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{PipelineError, Result};

/// Mean vector and top-k principal directions of a data matrix.
///
/// Components are stored as rows, ordered by descending explained variance.
/// Each component is sign-normalized so its largest-magnitude entry is
/// positive, which makes the output stable for a given input.
#[derive(Debug, Clone)]
pub struct Pca {
	mean: Array1<f64>,
	components: Array2<f64>,
	explained_variance: Array1<f64>,
	explained_variance_ratio: Array1<f64>,
}

impl Pca {
	/// Fit on an `M x D` matrix.
	pub fn fit(data: ArrayView2<'_, f64>, n_components: usize) -> Result<Self> {
		let (rows, dims) = data.dim();

		if n_components == 0 {
			return Err(PipelineError::input("number of components must be at least 1"));
		}
		if rows == 0 {
			return Err(PipelineError::input("no rows to reduce"));
		}
		if dims < n_components {
			return Err(PipelineError::Dimensionality {
				components: n_components,
				dimensions: dims,
			});
		}
		if data.iter().any(|v| !v.is_finite()) {
			return Err(PipelineError::input("data contains NaN or infinite values"));
		}

		let mean = data
			.mean_axis(Axis(0))
			.ok_or_else(|| PipelineError::input("no rows to reduce"))?;
		let centered = &data - &mean;

		let denom = rows.saturating_sub(1).max(1) as f64;
		let covariance = centered.t().dot(&centered) / denom;
		ensure_finite(covariance.iter(), "covariance")?;

		let matrix = DMatrix::from_iterator(dims, dims, covariance.iter().cloned());
		let eigen = SymmetricEigen::new(matrix);
		ensure_finite(eigen.eigenvalues.iter(), "eigenvalues")?;
		ensure_finite(eigen.eigenvectors.iter(), "eigenvectors")?;

		let mut order: Vec<usize> = (0..dims).collect();
		order.sort_by(|&a, &b| {
			eigen.eigenvalues[b]
				.partial_cmp(&eigen.eigenvalues[a])
				.unwrap_or(std::cmp::Ordering::Equal)
		});

		let total: f64 = eigen.eigenvalues.iter().map(|v| v.max(0.0)).sum();

		let mut components = Array2::<f64>::zeros((n_components, dims));
		let mut explained_variance = Array1::<f64>::zeros(n_components);

		for (k, &idx) in order.iter().take(n_components).enumerate() {
			let column = eigen.eigenvectors.column(idx);
			let pivot = column
				.iter()
				.copied()
				.fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
			let sign = if pivot < 0.0 { -1.0 } else { 1.0 };

			for (j, v) in column.iter().enumerate() {
				components[[k, j]] = v * sign;
			}
			explained_variance[k] = eigen.eigenvalues[idx].max(0.0);
		}

		let explained_variance_ratio = if total > 0.0 {
			&explained_variance / total
		} else {
			Array1::zeros(n_components)
		};

		Ok(Self {
			mean,
			components,
			explained_variance,
			explained_variance_ratio,
		})
	}

	/// Project rows onto the fitted components.
	pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
		if data.ncols() != self.mean.len() {
			return Err(PipelineError::input(format!(
				"expected {} columns, got {}",
				self.mean.len(),
				data.ncols()
			)));
		}
		let centered = &data - &self.mean;
		let projected = centered.dot(&self.components.t());
		ensure_finite(projected.iter(), "projection")?;
		Ok(projected)
	}

	pub fn fit_transform(data: ArrayView2<'_, f64>, n_components: usize) -> Result<(Self, Array2<f64>)> {
		let pca = Self::fit(data, n_components)?;
		let projected = pca.transform(data)?;
		Ok((pca, projected))
	}

	pub fn mean(&self) -> &Array1<f64> {
		&self.mean
	}

	pub fn components(&self) -> &Array2<f64> {
		&self.components
	}

	pub fn explained_variance(&self) -> &Array1<f64> {
		&self.explained_variance
	}

	pub fn explained_variance_ratio(&self) -> &Array1<f64> {
		&self.explained_variance_ratio
	}
}

/// Finite input can still overflow once squared or summed.
fn ensure_finite<'a>(values: impl IntoIterator<Item = &'a f64>, what: &str) -> Result<()> {
	if values.into_iter().all(|v| v.is_finite()) {
		Ok(())
	} else {
		Err(PipelineError::input(format!("{} overflowed; vector values are too large", what)))
	}
}
