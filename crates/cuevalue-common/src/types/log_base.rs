//! LogBase - reporting unit for log-growth rates

use serde::{Deserialize, Serialize};

/// Unit of a log-growth figure.
///
/// All arithmetic happens in nats; bits are a presentation conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBase {
    /// Natural logarithm
    #[default]
    Nats,
    /// Base-2 logarithm
    Bits,
}

impl LogBase {
    /// Convert a value measured in nats into this unit
    #[inline]
    pub fn convert_nats(self, nats: f64) -> f64 {
        match self {
            LogBase::Nats => nats,
            LogBase::Bits => nats / std::f64::consts::LN_2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogBase::Nats => "nats",
            LogBase::Bits => "bits",
        }
    }
}

impl std::fmt::Display for LogBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
