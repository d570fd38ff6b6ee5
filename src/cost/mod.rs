//! Cost model.
//!
//! Twelve violation categories, each with its own weight. The evaluator
//! reports unweighted magnitudes through [`CostBreakdown`]; the candidate
//! cost is their weighted sum. Lower is better and 0 means no violation.

mod evaluator;
mod weights;

pub use evaluator::{CostBreakdown, CostEvaluator};
pub use weights::{CostConfig, CostWeights, ViolationCategory};
