//! Univariate feature selection.
//!
//! [`SelectKBest`] scores every column by the F statistic of its linear
//! correlation with the target and keeps the `k` best columns.

use crate::core::constants::EPSILON;
use crate::core::error::{RatingError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// F statistic of a univariate linear regression of `y` on `x`.
///
/// `F = r² / (1 − r²) · (n − 2)`. Constant columns score 0; perfectly
/// correlated columns score infinity.
pub fn f_regression_score(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    if n < 3 || n != y.len() {
        return 0.0;
    }

    let mean_x = x.sum() / n as f64;
    let mean_y = y.sum() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx < EPSILON || syy < EPSILON {
        return 0.0;
    }

    let r2 = (sxy * sxy / (sxx * syy)).min(1.0);
    if 1.0 - r2 < EPSILON {
        return f64::INFINITY;
    }
    r2 / (1.0 - r2) * (n - 2) as f64
}

/// Keeps the `k` columns with the highest F statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectKBest {
    k: usize,
    scores: Option<Vec<f64>>,
    selected: Option<Vec<usize>>,
}

impl SelectKBest {
    /// Create an unfitted selector
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(RatingError::invalid_parameter("k", "0", "must be at least 1"));
        }
        Ok(SelectKBest {
            k,
            scores: None,
            selected: None,
        })
    }

    /// Score every column and pick the best `k`.
    ///
    /// Ties keep the earlier column; the selected columns stay in their
    /// original order. A `k` above the column count keeps every column.
    pub fn fit(&mut self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()> {
        if features.nrows() != targets.len() {
            return Err(RatingError::dimension_mismatch(
                format!("{} target values", features.nrows()),
                targets.len().to_string(),
            ));
        }

        let scores: Vec<f64> = (0..features.ncols())
            .into_par_iter()
            .map(|col| f_regression_score(features.column(col), targets))
            .collect();

        let mut ranked: Vec<usize> = (0..scores.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        let mut selected: Vec<usize> = ranked.into_iter().take(self.k).collect();
        selected.sort_unstable();

        log::info!(
            "Selected {} of {} features (k = {})",
            selected.len(),
            scores.len(),
            self.k
        );

        self.scores = Some(scores);
        self.selected = Some(selected);
        Ok(())
    }

    /// Keep the selected columns of `features`
    pub fn transform(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let selected = self.selected_indices()?;
        let num_scored = self.scores.as_ref().map_or(0, Vec::len);
        if features.ncols() != num_scored {
            return Err(RatingError::dimension_mismatch(
                format!("{} columns", num_scored),
                features.ncols().to_string(),
            ));
        }
        Ok(features.select(Axis(1), selected))
    }

    /// Indices of the selected columns, ascending
    pub fn selected_indices(&self) -> Result<&[usize]> {
        self.selected
            .as_deref()
            .ok_or_else(|| RatingError::prediction("Feature selector is not fitted"))
    }

    /// F statistic of every column, once fitted
    pub fn scores(&self) -> Option<Array1<f64>> {
        self.scores.as_ref().map(|s| Array1::from_vec(s.clone()))
    }

    /// Number of columns to keep
    pub fn k(&self) -> usize {
        self.k
    }
}
