//! Regression metrics for reporting how well the model fits.

use crate::core::constants::EPSILON;
use crate::core::error::{RatingError, Result};
use ndarray::ArrayView1;

fn check_lengths(predictions: &ArrayView1<'_, f64>, targets: &ArrayView1<'_, f64>) -> Result<()> {
    if predictions.len() != targets.len() {
        return Err(RatingError::dimension_mismatch(
            format!("{} predictions", targets.len()),
            predictions.len().to_string(),
        ));
    }
    if targets.is_empty() {
        return Err(RatingError::invalid_parameter(
            "targets",
            "[]",
            "metrics need at least one value",
        ));
    }
    Ok(())
}

/// Calculate Mean Squared Error.
pub fn mean_squared_error(predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<f64> {
    check_lengths(&predictions, &targets)?;
    let sum = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&pred, &target)| (pred - target).powi(2))
        .sum::<f64>();
    Ok(sum / predictions.len() as f64)
}

/// Calculate Root Mean Squared Error.
pub fn rmse(predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<f64> {
    mean_squared_error(predictions, targets).map(f64::sqrt)
}

/// Calculate Mean Absolute Error.
pub fn mae(predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<f64> {
    check_lengths(&predictions, &targets)?;
    let sum = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&pred, &target)| (pred - target).abs())
        .sum::<f64>();
    Ok(sum / predictions.len() as f64)
}

/// Calculate R-squared (coefficient of determination).
///
/// Constant targets give 0.
pub fn r_squared(predictions: ArrayView1<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<f64> {
    check_lengths(&predictions, &targets)?;
    let target_mean = targets.sum() / targets.len() as f64;

    let ss_res = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&pred, &target)| (target - pred).powi(2))
        .sum::<f64>();
    let ss_tot = targets
        .iter()
        .map(|&target| (target - target_mean).powi(2))
        .sum::<f64>();

    if ss_tot.abs() < EPSILON {
        Ok(0.0)
    } else {
        Ok(1.0 - ss_res / ss_tot)
    }
}
