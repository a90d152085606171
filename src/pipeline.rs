//! Feature selection followed by regression.

use crate::boosting::GradientBoostingRegressor;
use crate::config::ModelConfig;
use crate::core::error::{RatingError, Result};
use crate::core::traits::Regressor;
use crate::dataset::FeatureMatrix;
use crate::selection::SelectKBest;
use ndarray::Array1;

/// Unfitted selector plus regressor.
#[derive(Debug)]
pub struct ModelPipeline {
    selector: SelectKBest,
    regressor: Box<dyn Regressor>,
}

impl ModelPipeline {
    /// Pipeline with the boosted tree regressor
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Ok(Self::with_regressor(
            SelectKBest::new(config.select_k)?,
            Box::new(GradientBoostingRegressor::new(config)?),
        ))
    }

    /// Pipeline with any regressor
    pub fn with_regressor(selector: SelectKBest, regressor: Box<dyn Regressor>) -> Self {
        ModelPipeline { selector, regressor }
    }

    /// Fit the selector, then the regressor on the selected columns
    pub fn fit(mut self, features: &FeatureMatrix, targets: &Array1<f64>) -> Result<FittedPipeline> {
        self.selector.fit(features.values(), targets.view())?;
        let selected = features.select(self.selector.selected_indices()?)?;

        log::info!(
            "Fitting {} on {} selected features",
            self.regressor.name(),
            selected.num_features()
        );
        self.regressor.fit(selected.values(), targets.view())?;

        Ok(FittedPipeline {
            columns: features.columns().to_vec(),
            selected_columns: selected.columns().to_vec(),
            selector: self.selector,
            regressor: self.regressor,
        })
    }
}

/// Selector and regressor fitted on a training feature matrix.
#[derive(Debug)]
pub struct FittedPipeline {
    columns: Vec<String>,
    selected_columns: Vec<String>,
    selector: SelectKBest,
    regressor: Box<dyn Regressor>,
}

impl FittedPipeline {
    /// Predict one value per row; the columns must match the training columns
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Array1<f64>> {
        if features.columns() != self.columns.as_slice() {
            return Err(RatingError::dimension_mismatch(
                format!("columns {:?}", self.columns),
                format!("{:?}", features.columns()),
            ));
        }
        let selected = self.selector.transform(features.values())?;
        self.regressor.predict(selected.view())
    }

    /// Columns seen at fit time
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns kept by the selector
    pub fn selected_columns(&self) -> &[String] {
        &self.selected_columns
    }

    /// Fitted selector
    pub fn selector(&self) -> &SelectKBest {
        &self.selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use ndarray::{array, Array2};

    fn matrix(columns: &[&str], values: Array2<f64>) -> FeatureMatrix {
        FeatureMatrix::new(columns.iter().map(|c| c.to_string()).collect(), values).unwrap()
    }

    #[test]
    fn test_pipeline_selects_then_predicts() {
        let config = ConfigBuilder::new()
            .select_k(1)
            .num_iterations(20)
            .min_data_in_leaf(1)
            .build()
            .unwrap();
        let train = matrix(
            &["noise", "signal"],
            array![[3.0, 1.0], [1.0, 2.0], [2.0, 3.0], [3.0, 4.0], [1.0, 5.0], [2.0, 6.0]],
        );
        let targets = array![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];

        let fitted = ModelPipeline::new(&config.model)
            .unwrap()
            .fit(&train, &targets)
            .unwrap();
        assert_eq!(fitted.selected_columns(), ["signal"]);

        let predictions = fitted.predict(&train).unwrap();
        assert_eq!(predictions.len(), 6);
        assert!(predictions[5] > predictions[0]);
    }

    #[test]
    fn test_predict_rejects_other_columns() {
        let config = ConfigBuilder::new().min_data_in_leaf(1).num_iterations(2).build().unwrap();
        let train = matrix(&["a", "b"], array![[1.0, 2.0], [2.0, 1.0], [3.0, 0.0]]);
        let fitted = ModelPipeline::new(&config.model)
            .unwrap()
            .fit(&train, &array![1.0, 2.0, 3.0])
            .unwrap();

        let reordered = matrix(&["b", "a"], array![[2.0, 1.0]]);
        let err = fitted.predict(&reordered).unwrap_err();
        assert_eq!(err.category(), "dimension_mismatch");
    }
}
