//! Sweep and estimate reports

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use cuevalue_common::{CueBenefitResult, LogBase, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scenario::Scenario;
use crate::sweep::SweepPoint;

/// Aggregate figures over a sweep (nats)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Largest finite benefit on the grid
    pub max_benefit: f64,
    /// Grid probability where `max_benefit` occurs (first on ties)
    pub argmax_p: f64,
    /// Mean of the finite benefits
    pub mean_benefit: f64,
    /// Points whose benefit was not finite
    pub non_finite: usize,
}

impl SweepSummary {
    /// `None` when no point has a finite benefit
    pub fn from_points(points: &[SweepPoint]) -> Option<Self> {
        let finite: Vec<&SweepPoint> = points.iter().filter(|p| p.benefit.is_finite()).collect();
        let best = finite
            .iter()
            .copied()
            .reduce(|best, p| if p.benefit > best.benefit { p } else { best })?;
        let mean_benefit = finite.iter().map(|p| p.benefit).sum::<f64>() / finite.len() as f64;

        Some(Self {
            max_benefit: best.benefit,
            argmax_p: best.p,
            mean_benefit,
            non_finite: points.len() - finite.len(),
        })
    }
}

/// Complete output of one two-state sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub scenario: String,
    pub description: String,
    pub computed_at: DateTime<Utc>,
    /// Payoff matrix the sweep was run on
    pub payoff: Vec<Vec<f64>>,
    pub points: Vec<SweepPoint>,
    pub summary: Option<SweepSummary>,
}

impl SweepReport {
    pub fn new(scenario: &Scenario, points: Vec<SweepPoint>) -> Self {
        let summary = SweepSummary::from_points(&points);
        Self {
            scenario: scenario.name.clone(),
            description: scenario.description.clone(),
            computed_at: Utc::now(),
            payoff: scenario.payoff.to_rows(),
            points,
            summary,
        }
    }

    /// Serialise to `path` as JSON
    pub fn write_json(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        std::fs::write(path, json)?;
        info!(path = %path.display(), points = self.points.len(), "wrote sweep report");
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Fixed-width table of every grid point, growth figures in `base`
    pub fn render_table(&self, base: LogBase) -> String {
        let unit = base.label();
        let mut out = String::new();
        let _ = writeln!(out, "scenario: {} ({})", self.scenario, self.computed_at.to_rfc3339());
        let _ = writeln!(
            out,
            "{:>8}  {:>12}  {:>12}  {:>12}  strategy",
            "p",
            format!("benefit/{unit}"),
            format!("uncued/{unit}"),
            format!("cued/{unit}"),
        );
        for point in &self.points {
            let _ = writeln!(
                out,
                "{:>8.3}  {:>12.6}  {:>12.6}  {:>12.6}  {}",
                point.p,
                base.convert_nats(point.benefit),
                base.convert_nats(point.uncued_growth),
                base.convert_nats(point.cued_growth),
                format_strategy(&point.strategy),
            );
        }
        if let Some(summary) = &self.summary {
            let _ = writeln!(
                out,
                "max benefit {:.6} {unit} at p = {:.3}, mean {:.6} {unit}",
                base.convert_nats(summary.max_benefit),
                summary.argmax_p,
                base.convert_nats(summary.mean_benefit),
            );
        }
        out
    }
}

/// Human-readable summary of a single estimation
pub fn render_estimate(scenario: &Scenario, result: &CueBenefitResult, base: LogBase) -> String {
    let unit = base.label();
    let mut out = String::new();
    let _ = writeln!(out, "scenario:      {}", scenario.name);
    if !scenario.description.is_empty() {
        let _ = writeln!(out, "               {}", scenario.description);
    }
    let _ = writeln!(out, "environment:   {}", format_strategy(scenario.environment.probabilities()));
    let _ = writeln!(out, "strategy:      {}", format_strategy(result.strategy.probabilities()));
    let _ = writeln!(out, "uncued growth: {:.6} {unit}", result.uncued_growth_in(base));
    let _ = writeln!(out, "cued growth:   {:.6} {unit}", result.cued_growth_in(base));
    let _ = writeln!(out, "cue benefit:   {:.6} {unit}", result.benefit_in(base));
    let _ = writeln!(
        out,
        "solver:        {} after {} iterations (raw sum {:.6})",
        result.termination, result.iterations, result.raw_sum
    );
    out
}

fn format_strategy(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{:.4}", v)).collect();
    format!("[{}]", parts.join(", "))
}
