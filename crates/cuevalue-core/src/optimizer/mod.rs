//! Bounded local search over phenotype strategies
//!
//! The solver is reached only through [`BoundedSolver`]: a problem in
//! argmin's [`CostFunction`] form, per-component box bounds, a start point,
//! and an iteration cap go in; the best point found comes out. Any other
//! box-constrained minimiser can stand in for the bundled [`ProjectedLbfgs`].

pub mod gradient;
pub mod lbfgsb;
pub mod strategy;

use argmin::core::CostFunction;
use cuevalue_common::{CueValueError, Result, Termination};

pub use self::lbfgsb::ProjectedLbfgs;
pub use self::strategy::{StrategyOptimizer, StrategyOutcome};

/// Per-component box constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Same `[lower, upper]` interval for each of `dimension` components
    pub fn uniform(dimension: usize, lower: f64, upper: f64) -> Self {
        Self {
            lower: vec![lower; dimension],
            upper: vec![upper; dimension],
        }
    }

    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        debug_assert_eq!(lower.len(), upper.len());
        Self { lower, upper }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    #[inline]
    pub fn lower(&self, i: usize) -> f64 {
        self.lower[i]
    }

    #[inline]
    pub fn upper(&self, i: usize) -> f64 {
        self.upper[i]
    }

    /// Reject intervals that are inverted or contain NaN
    pub fn check(&self) -> Result<()> {
        if self.lower.len() != self.upper.len() {
            return Err(CueValueError::DimensionMismatch {
                what: "upper bounds",
                expected: self.lower.len(),
                actual: self.upper.len(),
            });
        }
        for (i, (&lower, &upper)) in self.lower.iter().zip(&self.upper).enumerate() {
            if !(lower <= upper) {
                return Err(CueValueError::Config(format!(
                    "bounds for component {} are invalid: [{}, {}]",
                    i, lower, upper
                )));
            }
        }
        Ok(())
    }

    /// Clamp every component into its interval. Call [`Bounds::check`] first.
    pub fn project(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .enumerate()
            .map(|(i, &v)| v.clamp(self.lower[i], self.upper[i]))
            .collect()
    }

    /// Max-norm of `P(x − g) − x`, zero exactly at a bound-constrained stationary point
    pub fn projected_gradient_norm(&self, x: &[f64], gradient: &[f64]) -> f64 {
        x.iter()
            .zip(gradient)
            .enumerate()
            .map(|(i, (&xi, &gi))| ((xi - gi).clamp(self.lower[i], self.upper[i]) - xi).abs())
            .fold(0.0, f64::max)
    }
}

/// Best point found by a bounded solver
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    /// Lowest-cost iterate
    pub point: Vec<f64>,
    /// Cost at `point`
    pub cost: f64,
    /// Completed iterations
    pub iterations: u64,
    /// Objective evaluations, including those spent on numeric gradients
    pub evaluations: u64,
    pub termination: Termination,
}

/// Box-constrained minimiser.
///
/// Implementations must return their best iterate when they run out of
/// iterations or fail to make progress; only errors raised by the problem
/// itself are propagated.
pub trait BoundedSolver {
    fn minimize<O>(
        &self,
        problem: &O,
        bounds: &Bounds,
        start: &[f64],
        max_iters: u64,
    ) -> Result<OptimizationOutcome>
    where
        O: CostFunction<Param = Vec<f64>, Output = f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project() {
        let bounds = Bounds::uniform(3, 0.0, 1.0);
        assert_eq!(bounds.project(&[-0.5, 0.25, 1.5]), vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_projected_gradient_at_active_bounds() {
        let bounds = Bounds::uniform(2, 0.0, 1.0);
        // Gradient pushes both components out of the box: stationary
        assert_eq!(bounds.projected_gradient_norm(&[0.0, 1.0], &[3.0, -2.0]), 0.0);
        // Interior point keeps the full gradient
        assert!((bounds.projected_gradient_norm(&[0.5, 0.5], &[0.1, -0.2]) - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_check_rejects_inverted_and_nan_intervals() {
        assert!(Bounds::uniform(2, 0.0, 1.0).check().is_ok());
        assert!(Bounds::uniform(1, 0.5, 0.5).check().is_ok());
        assert!(matches!(
            Bounds::new(vec![0.0, 0.9], vec![1.0, 0.1]).check(),
            Err(CueValueError::Config(msg)) if msg.contains("component 1")
        ));
        assert!(Bounds::uniform(1, 0.0, f64::NAN).check().is_err());
    }
}
