//! Soft simplex constraint for the strategy objective
pub mod objective;

pub use self::objective::{
    penalized_growth_rate, simplex_penalty, PenalizedGrowth, RenormalizedGrowth,
};
