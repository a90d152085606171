//! Trait abstractions at the boundary between the feature matrix and the model.

use crate::core::error::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt::Debug;

/// Generic numeric regression estimator.
///
/// The dataset builder only needs `fit` and `predict`; any implementation
/// satisfying this contract can stand behind [`crate::pipeline::ModelPipeline`].
pub trait Regressor: Send + Sync + Debug {
    /// Fit the estimator on rows of `features` against `targets`.
    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()>;

    /// Predict one value per row of `features`.
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Whether `fit` has been called successfully.
    fn is_fitted(&self) -> bool;

    /// Short estimator name for logging.
    fn name(&self) -> &'static str;
}
