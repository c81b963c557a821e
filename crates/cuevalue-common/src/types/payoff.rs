//! PayoffMatrix - reproductive payoff of each phenotype in each environment
//!
//! Rows are phenotypes, columns are environmental states. Entry `(p, e)` is
//! the multiplicative payoff of adopting phenotype `p` when environment `e`
//! occurs. The matrix is read-only input to every computation.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{CueValueError, PayoffError, Result};

/// Dense phenotype × environment payoff matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PayoffMatrix {
    values: Array2<f64>,
}

impl PayoffMatrix {
    /// Build from row-major nested vectors, one inner vector per phenotype.
    ///
    /// Only the shape is checked here; entries are taken as given.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let phenotypes = rows.len();
        let environments = rows.first().map(Vec::len).unwrap_or(0);
        if phenotypes == 0 || environments == 0 {
            return Err(PayoffError::Empty.into());
        }

        let mut data = Vec::with_capacity(phenotypes * environments);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != environments {
                return Err(PayoffError::RaggedRows {
                    row,
                    expected: environments,
                    actual: values.len(),
                }
                .into());
            }
            data.extend(values);
        }

        let values = Array2::from_shape_vec((phenotypes, environments), data)
            .map_err(|e| CueValueError::Internal(format!("payoff shape: {}", e)))?;
        Ok(Self { values })
    }

    /// Wrap an existing array (rows = phenotypes)
    pub fn from_array(values: Array2<f64>) -> Result<Self> {
        if values.nrows() == 0 || values.ncols() == 0 {
            return Err(PayoffError::Empty.into());
        }
        Ok(Self { values })
    }

    /// Number of phenotypes (rows)
    #[inline]
    pub fn phenotypes(&self) -> usize {
        self.values.nrows()
    }

    /// Number of environmental states (columns)
    #[inline]
    pub fn environments(&self) -> usize {
        self.values.ncols()
    }

    #[inline]
    pub fn get(&self, phenotype: usize, environment: usize) -> f64 {
        self.values[[phenotype, environment]]
    }

    /// Payoffs of every phenotype in one environment
    pub fn column(&self, environment: usize) -> ArrayView1<'_, f64> {
        self.values.column(environment)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }

    /// Copy of this matrix with column `e` multiplied by `factors[e]`
    pub fn scale_columns(&self, factors: &[f64]) -> Result<Self> {
        if factors.len() != self.environments() {
            return Err(CueValueError::DimensionMismatch {
                what: "column scale factors",
                expected: self.environments(),
                actual: factors.len(),
            });
        }
        let mut values = self.values.clone();
        for (mut column, &factor) in values.columns_mut().into_iter().zip(factors) {
            column.mapv_inplace(|v| v * factor);
        }
        Ok(Self { values })
    }

    /// Same matrix with `value` written at `(phenotype, environment)`
    pub fn with_entry(&self, phenotype: usize, environment: usize, value: f64) -> Self {
        let mut values = self.values.clone();
        values[[phenotype, environment]] = value;
        Self { values }
    }

    /// Reject non-finite or negative payoffs
    pub fn validate(&self) -> std::result::Result<(), PayoffError> {
        for ((phenotype, environment), &value) in self.values.indexed_iter() {
            if !value.is_finite() {
                return Err(PayoffError::NonFinite {
                    phenotype,
                    environment,
                    value,
                });
            }
            if value < 0.0 {
                return Err(PayoffError::Negative {
                    phenotype,
                    environment,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Row-major copy, one inner vector per phenotype
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for PayoffMatrix {
    type Error = CueValueError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<PayoffMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PayoffMatrix) -> Self {
        matrix.to_rows()
    }
}
