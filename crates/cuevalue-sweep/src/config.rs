//! Sweep harness configuration

use std::path::PathBuf;

use anyhow::Result;
use cuevalue_common::{CueValueError, LogBase};
use cuevalue_core::OptimizerConfig;
use serde::{Deserialize, Serialize};

/// Sweep harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Probability grid for two-state sweeps
    pub grid: GridSettings,
    /// Report output settings
    pub output: OutputSettings,
    /// Worker threads for parallel sweeps (rayon's global pool when unset)
    pub jobs: Option<usize>,
    /// Strategy optimizer settings
    pub optimizer: OptimizerConfig,
}

impl SweepConfig {
    /// Load configuration from `.env` and `CUEVALUE_*` environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Override fields from a variable lookup. Unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());

        // Grid settings
        if let Some(v) = parsed("CUEVALUE_GRID_START") {
            self.grid.start = v;
        }
        if let Some(v) = parsed("CUEVALUE_GRID_END") {
            self.grid.end = v;
        }
        if let Some(v) = parsed("CUEVALUE_GRID_MIN_PROBABILITY") {
            self.grid.min_probability = v;
        }
        if let Some(v) = lookup("CUEVALUE_GRID_POINTS").and_then(|v| v.trim().parse().ok()) {
            self.grid.points = v;
        }

        if let Some(v) = lookup("CUEVALUE_JOBS").and_then(|v| v.trim().parse().ok()) {
            self.jobs = Some(v);
        }

        // Output settings
        if let Some(path) = lookup("CUEVALUE_OUTPUT") {
            self.output.path = Some(PathBuf::from(path));
        }
        if let Some(v) = lookup("CUEVALUE_OUTPUT_PRETTY").and_then(|v| v.trim().parse().ok()) {
            self.output.pretty = v;
        }
        if let Some(base) = lookup("CUEVALUE_LOG_BASE") {
            match base.trim().to_ascii_lowercase().as_str() {
                "bits" => self.output.log_base = LogBase::Bits,
                "nats" => self.output.log_base = LogBase::Nats,
                _ => {}
            }
        }

        // Optimizer settings
        if let Some(v) = lookup("CUEVALUE_MAX_ITERS").and_then(|v| v.trim().parse().ok()) {
            self.optimizer.max_iters = v;
        }
        if let Some(v) = parsed("CUEVALUE_PENALTY_WEIGHT") {
            self.optimizer.penalty_weight = v;
        }
        if let Some(v) = lookup("CUEVALUE_REFINE").and_then(|v| v.trim().parse().ok()) {
            self.optimizer.refine = v;
        }
    }

    /// Reject settings no sweep can run with
    pub fn validate(&self) -> cuevalue_common::Result<()> {
        let grid = &self.grid;
        if grid.points == 0 {
            return Err(CueValueError::Config("grid needs at least one point".into()));
        }
        for (name, value) in [
            ("start", grid.start),
            ("end", grid.end),
            ("min_probability", grid.min_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CueValueError::Config(format!(
                    "grid {} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if grid.start > grid.end {
            return Err(CueValueError::Config(format!(
                "grid start {} exceeds end {}",
                grid.start, grid.end
            )));
        }
        if self.jobs == Some(0) {
            return Err(CueValueError::Config("jobs must be positive".into()));
        }
        if self.optimizer.lower_bound > self.optimizer.upper_bound {
            return Err(CueValueError::Config(
                "optimizer lower bound exceeds upper bound".into(),
            ));
        }
        Ok(())
    }
}

/// Two-state probability grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// First grid probability before flooring
    pub start: f64,
    /// Last grid probability
    pub end: f64,
    /// Number of evenly spaced points, ends included
    pub points: usize,
    /// Grid probabilities below this are raised to it
    pub min_probability: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        // {0.001, 0.05, 0.10, …, 1.0}
        Self {
            start: 0.0,
            end: 1.0,
            points: 21,
            min_probability: 0.001,
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    /// JSON report destination; reports are only printed when unset
    pub path: Option<PathBuf>,
    /// Pretty-print the JSON report
    pub pretty: bool,
    /// Unit for printed growth figures
    pub log_base: LogBase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = SweepConfig::default();
        assert_eq!(cfg.grid.points, 21);
        assert_eq!(cfg.optimizer.max_iters, 100);
        assert_eq!(cfg.output.log_base, LogBase::Nats);
        assert!(cfg.jobs.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = SweepConfig::default();
        cfg.apply_env(lookup(&[
            ("CUEVALUE_GRID_POINTS", "11"),
            ("CUEVALUE_GRID_END", "0.5"),
            ("CUEVALUE_JOBS", "2"),
            ("CUEVALUE_LOG_BASE", "Bits"),
            ("CUEVALUE_OUTPUT", "/tmp/report.json"),
            ("CUEVALUE_OUTPUT_PRETTY", "true"),
            ("CUEVALUE_MAX_ITERS", "50"),
            ("CUEVALUE_PENALTY_WEIGHT", "2.5"),
            ("CUEVALUE_REFINE", "false"),
        ]));

        assert_eq!(cfg.grid.points, 11);
        assert_eq!(cfg.grid.end, 0.5);
        assert_eq!(cfg.jobs, Some(2));
        assert_eq!(cfg.output.log_base, LogBase::Bits);
        assert_eq!(cfg.output.path, Some(PathBuf::from("/tmp/report.json")));
        assert!(cfg.output.pretty);
        assert_eq!(cfg.optimizer.max_iters, 50);
        assert_eq!(cfg.optimizer.penalty_weight, 2.5);
        assert!(!cfg.optimizer.refine);
    }

    #[test]
    fn test_unparseable_values_ignored() {
        let mut cfg = SweepConfig::default();
        cfg.apply_env(lookup(&[
            ("CUEVALUE_GRID_POINTS", "many"),
            ("CUEVALUE_LOG_BASE", "decibels"),
        ]));
        assert_eq!(cfg.grid.points, 21);
        assert_eq!(cfg.output.log_base, LogBase::Nats);
    }

    #[test]
    fn test_validate_rejects_bad_grid() {
        let mut cfg = SweepConfig::default();
        cfg.grid.points = 0;
        assert!(matches!(cfg.validate(), Err(CueValueError::Config(_))));

        let mut cfg = SweepConfig::default();
        cfg.grid.start = 0.8;
        cfg.grid.end = 0.2;
        assert!(cfg.validate().is_err());

        let mut cfg = SweepConfig::default();
        cfg.grid.end = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = SweepConfig::default();
        cfg.jobs = Some(0);
        assert!(cfg.validate().is_err());
    }
}
