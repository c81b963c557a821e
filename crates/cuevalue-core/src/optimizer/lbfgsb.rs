//! Projected limited-memory BFGS for box-constrained minimisation
//!
//! Each iteration:
//!
//! 1. forward-difference gradient at the current point
//! 2. quasi-Newton direction from the two-loop recursion over the last
//!    `memory` curvature pairs
//! 3. components blocked by an active bound are dropped from the direction;
//!    if what remains is not a descent direction the history is discarded
//!    and steepest descent is used instead
//! 4. Armijo backtracking along the projected path `P(x + α·d)`
//!
//! The loop stops on a small projected gradient, a small relative cost
//! reduction from a steepest-descent step, a failed line search, a
//! non-finite cost, or the iteration cap. A small reduction from a
//! quasi-Newton step only clears the history.
//! In every case the lowest-cost iterate seen is returned.

use std::cell::Cell;
use std::collections::VecDeque;

use argmin::core::CostFunction;
use cuevalue_common::{CueValueError, Result, Termination};
use tracing::{debug, trace};

use super::gradient::forward_difference;
use super::{BoundedSolver, Bounds, OptimizationOutcome};
use crate::OptimizerConfig;

/// Step and gradient change of one accepted iteration
#[derive(Debug, Clone)]
struct CurvaturePair {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// Box-constrained L-BFGS with numeric gradients
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLbfgs {
    memory: usize,
    gradient_step: f64,
    projected_gradient_tolerance: f64,
    relative_reduction_tolerance: f64,
    armijo: f64,
    max_line_search_steps: usize,
}

impl ProjectedLbfgs {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            memory: config.memory,
            gradient_step: config.gradient_step,
            projected_gradient_tolerance: config.projected_gradient_tolerance,
            relative_reduction_tolerance: config.relative_reduction_tolerance,
            armijo: config.armijo,
            max_line_search_steps: config.max_line_search_steps,
        }
    }
}

impl Default for ProjectedLbfgs {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `−H·g` for the inverse-Hessian approximation `H` held in `history`
fn two_loop(gradient: &[f64], history: &VecDeque<CurvaturePair>) -> Vec<f64> {
    let mut q = gradient.to_vec();
    let mut alphas = Vec::with_capacity(history.len());

    for pair in history.iter().rev() {
        let alpha = pair.rho * dot(&pair.s, &q);
        for (qi, yi) in q.iter_mut().zip(&pair.y) {
            *qi -= alpha * yi;
        }
        alphas.push(alpha);
    }

    if let Some(latest) = history.back() {
        let gamma = dot(&latest.s, &latest.y) / dot(&latest.y, &latest.y);
        for qi in q.iter_mut() {
            *qi *= gamma;
        }
    }

    for (pair, alpha) in history.iter().zip(alphas.iter().rev()) {
        let beta = pair.rho * dot(&pair.y, &q);
        for (qi, si) in q.iter_mut().zip(&pair.s) {
            *qi += si * (alpha - beta);
        }
    }

    q.into_iter().map(|v| -v).collect()
}

/// Zero out components that would push through an active bound
fn restrict_to_free(direction: &mut [f64], x: &[f64], bounds: &Bounds) {
    for (i, d) in direction.iter_mut().enumerate() {
        let blocked_below = x[i] <= bounds.lower(i) && *d < 0.0;
        let blocked_above = x[i] >= bounds.upper(i) && *d > 0.0;
        if blocked_below || blocked_above {
            *d = 0.0;
        }
    }
}

impl BoundedSolver for ProjectedLbfgs {
    fn minimize<O>(
        &self,
        problem: &O,
        bounds: &Bounds,
        start: &[f64],
        max_iters: u64,
    ) -> Result<OptimizationOutcome>
    where
        O: CostFunction<Param = Vec<f64>, Output = f64>,
    {
        if start.len() != bounds.len() {
            return Err(CueValueError::DimensionMismatch {
                what: "solver start point",
                expected: bounds.len(),
                actual: start.len(),
            });
        }
        bounds.check()?;

        let evaluations = Cell::new(0u64);
        let eval = |x: &Vec<f64>| -> Result<f64> {
            evaluations.set(evaluations.get() + 1);
            problem
                .cost(x)
                .map_err(|e| CueValueError::Solver(e.to_string()))
        };

        let mut x = bounds.project(start);
        let mut fx = eval(&x)?;
        let mut best_x = x.clone();
        let mut best_cost = fx;

        if x.is_empty() {
            return Ok(OptimizationOutcome {
                point: x,
                cost: fx,
                iterations: 0,
                evaluations: evaluations.get(),
                termination: Termination::ProjectedGradient,
            });
        }

        let mut gradient = if fx.is_finite() {
            forward_difference(&eval, &x, fx, bounds, self.gradient_step)?
        } else {
            vec![f64::NAN; x.len()]
        };
        let mut history: VecDeque<CurvaturePair> = VecDeque::with_capacity(self.memory);
        let mut termination = Termination::MaxIterations;
        let mut iterations = 0u64;

        while iterations < max_iters {
            if !fx.is_finite() || gradient.iter().any(|g| !g.is_finite()) {
                termination = Termination::NonFinite;
                break;
            }
            if bounds.projected_gradient_norm(&x, &gradient) <= self.projected_gradient_tolerance {
                termination = Termination::ProjectedGradient;
                break;
            }

            let mut direction = two_loop(&gradient, &history);
            restrict_to_free(&mut direction, &x, bounds);
            let mut slope = dot(&gradient, &direction);
            let mut used_curvature = !history.is_empty();
            if !(slope < 0.0) {
                trace!(iteration = iterations, "discarding curvature history");
                history.clear();
                direction = gradient.iter().map(|g| -g).collect();
                restrict_to_free(&mut direction, &x, bounds);
                slope = dot(&gradient, &direction);
                used_curvature = false;
                if !(slope < 0.0) {
                    termination = Termination::NoDescentDirection;
                    break;
                }
            }

            // Without curvature information the first trial step has unit length
            let mut alpha = if history.is_empty() {
                (1.0 / dot(&direction, &direction).sqrt()).min(1.0)
            } else {
                1.0
            };

            let mut accepted = None;
            for _ in 0..self.max_line_search_steps {
                let stepped: Vec<f64> = x
                    .iter()
                    .zip(&direction)
                    .map(|(xi, di)| xi + alpha * di)
                    .collect();
                let trial = bounds.project(&stepped);
                let predicted: f64 = x
                    .iter()
                    .zip(&trial)
                    .zip(&gradient)
                    .map(|((xi, ti), gi)| gi * (ti - xi))
                    .sum();
                let f_trial = eval(&trial)?;
                if f_trial.is_finite() && f_trial <= fx + self.armijo * predicted.min(0.0) {
                    accepted = Some((trial, f_trial));
                    break;
                }
                alpha *= 0.5;
            }

            let Some((x_next, f_next)) = accepted else {
                termination = Termination::LineSearchFailed;
                break;
            };
            let g_next = forward_difference(&eval, &x_next, f_next, bounds, self.gradient_step)?;

            let s: Vec<f64> = x_next.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = g_next.iter().zip(&gradient).map(|(a, b)| a - b).collect();
            let sy = dot(&s, &y);
            if self.memory > 0 && sy > f64::EPSILON * dot(&y, &y) {
                if history.len() == self.memory {
                    history.pop_front();
                }
                history.push_back(CurvaturePair { s, y, rho: 1.0 / sy });
            }

            let reduction = (fx - f_next) / fx.abs().max(f_next.abs()).max(1.0);
            x = x_next;
            fx = f_next;
            gradient = g_next;
            iterations += 1;

            if fx < best_cost {
                best_cost = fx;
                best_x = x.clone();
            }
            trace!(iteration = iterations, cost = fx, step = alpha, "accepted step");

            if reduction <= self.relative_reduction_tolerance {
                if used_curvature {
                    // Stale curvature can stall on a kink; retry from steepest descent
                    history.clear();
                    continue;
                }
                termination = Termination::RelativeReduction;
                break;
            }
        }

        debug!(
            iterations = iterations,
            evaluations = evaluations.get(),
            cost = best_cost,
            %termination,
            "solver finished"
        );

        Ok(OptimizationOutcome {
            point: best_x,
            cost: best_cost,
            iterations,
            evaluations: evaluations.get(),
            termination,
        })
    }
}
