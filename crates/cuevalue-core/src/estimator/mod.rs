//! Cue-benefit estimation
pub mod cue_benefit;

pub use self::cue_benefit::{cue_benefit, CueBenefitEstimator};
