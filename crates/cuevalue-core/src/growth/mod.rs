//! Growth-rate evaluation
pub mod evaluator;

pub use self::evaluator::{best_phenotypes, check_shapes, cued_growth_rate, uncued_growth_rate};
