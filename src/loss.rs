//! Loss reporting.

use crate::{Matrix, Result};

/// Mean squared error between a prediction and its target.
///
/// Sums the squared cellwise differences and divides by the full cell count
/// (`rows * cols`). Reporting only; [`Network::train`] derives its update
/// from the raw error and never calls this.
///
/// Shape contract: `predicted.shape() == target.shape()`.
///
/// [`Network::train`]: crate::Network::train
pub fn mse(predicted: &Matrix, target: &Matrix) -> Result<f64> {
    let mut diff = predicted.sub(target)?;
    diff.square();
    Ok(diff.sum() / (predicted.rows() * predicted.cols()) as f64)
}
