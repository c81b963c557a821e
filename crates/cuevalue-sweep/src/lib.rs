//! # Cuevalue Sweep
//!
//! Calling harness around the cue-benefit estimator: built-in and
//! file-based scenarios, parallel two-state probability sweeps, and
//! JSON/text reports. The `cuevalue` binary wires these to a CLI.

pub mod config;
pub mod report;
pub mod scenario;
pub mod sweep;

pub use config::{GridSettings, OutputSettings, SweepConfig};
pub use report::{render_estimate, SweepReport, SweepSummary};
pub use scenario::{Preset, Scenario};
pub use sweep::{run_sweep, two_state_grid, SweepPoint};

/// Harness version
pub const SWEEP_VERSION: &str = env!("CARGO_PKG_VERSION");
