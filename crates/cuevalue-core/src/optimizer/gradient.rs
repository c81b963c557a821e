//! Forward-difference gradients

use cuevalue_common::Result;

use super::Bounds;

/// One-sided finite-difference gradient of `f` at `x`, where `fx = f(x)`.
///
/// The step for component `i` is `step · max(|x_i|, 1)`. A component that
/// would step past its upper bound is differenced backwards instead, so the
/// shifted point stays inside the box.
pub fn forward_difference<F>(f: F, x: &[f64], fx: f64, bounds: &Bounds, step: f64) -> Result<Vec<f64>>
where
    F: Fn(&Vec<f64>) -> Result<f64>,
{
    let mut shifted = x.to_vec();
    let mut gradient = Vec::with_capacity(x.len());

    for i in 0..x.len() {
        let mut h = step * x[i].abs().max(1.0);
        if x[i] + h > bounds.upper(i) {
            h = -h;
        }
        shifted[i] = x[i] + h;
        let f_shifted = f(&shifted)?;
        shifted[i] = x[i];
        gradient.push((f_shifted - fx) / h);
    }

    Ok(gradient)
}
