//! Scenarios: a payoff matrix paired with an environment distribution
//!
//! Built-in presets cover the classic bet-hedging cases. Custom scenarios
//! are read from JSON files of the form
//!
//! ```json
//! {
//!   "name": "symmetric",
//!   "description": "optional",
//!   "payoff": [[5, 1], [2, 2]],
//!   "environment": [0.5, 0.5]
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use cuevalue_common::{CueValueError, EnvironmentDistribution, PayoffMatrix, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One estimation input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Rows = phenotypes, columns = environments
    pub payoff: PayoffMatrix,
    pub environment: EnvironmentDistribution,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        payoff: PayoffMatrix,
        environment: EnvironmentDistribution,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            payoff,
            environment,
        }
    }

    /// Read and validate a scenario file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CueValueError::Io(format!("{}: {}", path.display(), e)))?;
        let scenario: Scenario = serde_json::from_str(&raw)?;
        scenario.validate()?;
        debug!(
            name = %scenario.name,
            phenotypes = scenario.payoff.phenotypes(),
            environments = scenario.payoff.environments(),
            "loaded scenario file"
        );
        Ok(scenario)
    }

    /// Write the scenario as pretty JSON
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Strict checks for inputs from outside the program: finite non-negative
    /// payoffs, a proper distribution, and matching widths
    pub fn validate(&self) -> Result<()> {
        self.payoff.validate()?;
        self.environment.validate()?;
        if self.environment.len() != self.payoff.environments() {
            return Err(CueValueError::DimensionMismatch {
                what: "scenario environment",
                expected: self.payoff.environments(),
                actual: self.environment.len(),
            });
        }
        Ok(())
    }

    /// Number of environmental states
    pub fn environments(&self) -> usize {
        self.payoff.environments()
    }
}

/// Built-in scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Moderate-risk phenotype against a safe one, even odds
    Symmetric,
    /// Rare huge payoff against a safe phenotype
    Gamble,
    /// Each phenotype lethal outside its environments
    LethalProportional,
    /// Early vs. late emergence collapsed to a single decision
    EmergenceTiming,
    /// One phenotype best everywhere
    Dominant,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Symmetric,
        Preset::Gamble,
        Preset::LethalProportional,
        Preset::EmergenceTiming,
        Preset::Dominant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Symmetric => "symmetric",
            Preset::Gamble => "gamble",
            Preset::LethalProportional => "lethal-proportional",
            Preset::EmergenceTiming => "emergence-timing",
            Preset::Dominant => "dominant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Symmetric => "risky phenotype pays 5 or 1, safe phenotype pays 2",
            Preset::Gamble => "phenotype 0 pays 100 in a 10% environment and nothing otherwise",
            Preset::LethalProportional => {
                "phenotype 0 survives environments 0 and 1, phenotype 1 only environment 2"
            }
            Preset::EmergenceTiming => {
                "early vs. late emergence against mild vs. harsh winters, collapsed to 2x2"
            }
            Preset::Dominant => "phenotype 0 pays at least as much in every environment",
        }
    }

    pub fn scenario(self) -> Result<Scenario> {
        let (rows, environment) = match self {
            Preset::Symmetric => (vec![vec![5.0, 1.0], vec![2.0, 2.0]], vec![0.5, 0.5]),
            Preset::Gamble => (vec![vec![100.0, 0.0], vec![1.0, 1.0]], vec![0.1, 0.9]),
            Preset::LethalProportional => (
                vec![vec![1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
                vec![0.1, 0.2, 0.7],
            ),
            Preset::EmergenceTiming => (vec![vec![1.8, 0.2], vec![0.9, 1.1]], vec![0.6, 0.4]),
            Preset::Dominant => (vec![vec![3.0, 2.0], vec![1.0, 1.5]], vec![0.4, 0.6]),
        };

        Ok(Scenario {
            name: self.name().to_string(),
            description: self.description().to_string(),
            payoff: PayoffMatrix::from_rows(rows)?,
            environment: EnvironmentDistribution::new(environment),
        })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CueValueError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| CueValueError::Config(format!("unknown preset: {}", s)))
    }
}
