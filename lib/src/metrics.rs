//! Evaluation metrics for the held-out split.

use crate::error::EstateError;
use serde::{Deserialize, Serialize};

fn check_lengths(n_true: usize, n_pred: usize) -> Result<(), EstateError> {
    if n_true != n_pred {
        return Err(EstateError::InvalidParameter(format!(
            "{} true values but {} predictions",
            n_true, n_pred
        )));
    }
    if n_true == 0 {
        return Err(EstateError::EmptyData(
            "cannot score an empty evaluation set".to_string(),
        ));
    }
    Ok(())
}

/// Metrics for evaluating regression models.
pub struct Metrics;

impl Metrics {
    /// Mean Squared Error: `mean((y_true - y_pred)^2)`.
    pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, EstateError> {
        check_lengths(y_true.len(), y_pred.len())?;
        let sum_sq: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        Ok(sum_sq / y_true.len() as f64)
    }

    /// Root Mean Squared Error, in the units of the target.
    pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, EstateError> {
        Ok(Self::mse(y_true, y_pred)?.sqrt())
    }

    /// Mean Absolute Error: `mean(|y_true - y_pred|)`.
    pub fn mae(y_true: &[f64], y_pred: &[f64]) -> Result<f64, EstateError> {
        check_lengths(y_true.len(), y_pred.len())?;
        let sum_abs: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
        Ok(sum_abs / y_true.len() as f64)
    }

    /// Coefficient of determination, `1 - SS_res / SS_tot`.
    ///
    /// Negative when the model is worse than predicting the mean. A constant
    /// target scores 1.0 for a perfect fit and 0.0 otherwise.
    pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> Result<f64, EstateError> {
        check_lengths(y_true.len(), y_pred.len())?;
        let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|t| (t - mean_true).powi(2)).sum();

        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }

    pub fn calculate_all(y_true: &[f64], y_pred: &[f64]) -> Result<RegressionMetrics, EstateError> {
        let mse = Self::mse(y_true, y_pred)?;
        Ok(RegressionMetrics {
            mse,
            rmse: mse.sqrt(),
            mae: Self::mae(y_true, y_pred)?,
            r_squared: Self::r_squared(y_true, y_pred)?,
        })
    }

    /// Fraction of predictions equal to the truth.
    pub fn accuracy<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> Result<f64, EstateError> {
        check_lengths(y_true.len(), y_pred.len())?;
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        Ok(correct as f64 / y_true.len() as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
}
