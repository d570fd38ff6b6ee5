//! Optimization driver.
//!
//! The generational loop shared by every search strategy. Strategies plug
//! in through [`SearchStrategy`]; everything around the operator (repair,
//! evaluation, ranking, elitism, progress reporting, cancellation) lives
//! here.
//!
//! # Key Types
//!
//! - [`SolverConfig`]: population, budget, elitism and nested cost/repair
//!   settings
//! - [`Solver`]: executes the loop for a strategy
//! - [`SolveResult`]: best candidate, cost breakdown and history
//! - [`StrategyKind`] / [`solve`]: pick a built-in strategy by value
//! - [`compare_strategies`]: repeated runs with summary statistics

mod compare;
mod config;
mod runner;
mod types;

pub use compare::{compare_strategies, StrategySummary};
pub use config::{SolverConfig, MIN_POPULATION};
pub use runner::{solve, solve_with_cancel, GenerationReport, SolveResult, Solver, StrategyKind};
pub use types::{GenerationContext, SearchStrategy};
