//! Least-squares gradient boosting.
//!
//! Each iteration fits a depth-limited [`RegressionTree`] to the current
//! residuals and adds its predictions scaled by the learning rate.

use crate::config::ModelConfig;
use crate::core::error::{RatingError, Result};
use crate::core::traits::Regressor;
use crate::tree::RegressionTree;
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Gradient boosted regression trees with squared loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    num_iterations: usize,
    learning_rate: f64,
    max_depth: usize,
    min_data_in_leaf: usize,
    init_score: f64,
    trees: Vec<RegressionTree>,
    num_features: Option<usize>,
}

impl GradientBoostingRegressor {
    /// Create an unfitted regressor from the model parameters
    pub fn new(config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(GradientBoostingRegressor {
            num_iterations: config.num_iterations,
            learning_rate: config.learning_rate,
            max_depth: config.max_depth,
            min_data_in_leaf: config.min_data_in_leaf,
            init_score: 0.0,
            trees: Vec::new(),
            num_features: None,
        })
    }

    /// Fitted trees, in boosting order
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Constant the boosting starts from: the mean training target
    pub fn init_score(&self) -> f64 {
        self.init_score
    }

    /// Summed split gain per feature over all trees
    pub fn feature_importance(&self) -> Option<Array1<f64>> {
        let num_features = self.num_features?;
        Some(
            self.trees
                .iter()
                .fold(Array1::zeros(num_features), |acc, tree| acc + tree.feature_importance()),
        )
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()> {
        if features.nrows() != targets.len() {
            return Err(RatingError::dimension_mismatch(
                format!("{} targets", features.nrows()),
                targets.len().to_string(),
            ));
        }
        if targets.is_empty() {
            return Err(RatingError::training("Cannot fit on an empty training set"));
        }

        self.init_score = targets.sum() / targets.len() as f64;
        self.trees.clear();
        self.num_features = Some(features.ncols());

        let mut scores = Array1::from_elem(targets.len(), self.init_score);
        let mut residuals = vec![0.0; targets.len()];
        for iteration in 0..self.num_iterations {
            for (r, (&t, &s)) in residuals.iter_mut().zip(targets.iter().zip(scores.iter())) {
                *r = t - s;
            }

            let tree = RegressionTree::fit(features, &residuals, self.max_depth, self.min_data_in_leaf)?;
            let update = tree.predict(features)?;
            Zip::from(&mut scores)
                .and(&update)
                .for_each(|s, &u| *s += self.learning_rate * u);
            self.trees.push(tree);

            if (iteration + 1) % 10 == 0 || iteration + 1 == self.num_iterations {
                let mse = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
                log::debug!("Iteration {}: training RMSE before update {:.6}", iteration + 1, mse.sqrt());
            }
        }

        log::info!(
            "Fitted {} trees on {} rows x {} features",
            self.trees.len(),
            features.nrows(),
            features.ncols()
        );
        Ok(())
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let num_features = self
            .num_features
            .ok_or_else(|| RatingError::prediction("Regressor is not fitted"))?;
        if features.ncols() != num_features {
            return Err(RatingError::dimension_mismatch(
                format!("{} features", num_features),
                features.ncols().to_string(),
            ));
        }

        let mut scores = Array1::from_elem(features.nrows(), self.init_score);
        for tree in &self.trees {
            scores.scaled_add(self.learning_rate, &tree.predict(features)?);
        }
        Ok(scores)
    }

    fn is_fitted(&self) -> bool {
        self.num_features.is_some()
    }

    fn name(&self) -> &'static str {
        "gradient_boosting"
    }
}
