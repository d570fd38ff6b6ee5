//! Generational loop execution.
//!
//! [`Solver`] orchestrates a complete run:
//! initialize → evaluate → rank → (elites → strategy → repair → evaluate →
//! rank → restore elites → observe) × generations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::config::SolverConfig;
use super::types::{GenerationContext, SearchStrategy};
use crate::bbo::{BboConfig, BboStrategy};
use crate::candidate::{rank_population, Candidate};
use crate::cost::{CostBreakdown, CostEvaluator};
use crate::domain::DomainSnapshot;
use crate::error::{ConfigError, TimetableError};
use crate::gwo::{GwoConfig, GwoStrategy};
use crate::init::Initializer;
use crate::random::{create_rng, for_each_seeded};
use crate::repair::Repairer;
use crate::sampler::Sampler;

/// Result of a solver run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best candidate seen during the run.
    pub best: Candidate,

    /// Same as `best.cost`.
    pub best_cost: f64,

    /// Unweighted per-category magnitudes of `best`.
    pub breakdown: CostBreakdown,

    /// Generations actually executed.
    pub generations: usize,

    /// Whether the run stopped on the cancellation flag.
    pub cancelled: bool,

    /// Best cost after initialization, then after each generation.
    /// Non-increasing.
    pub cost_history: Vec<f64>,

    /// Seed the run used; replaying it reproduces the run.
    pub seed: u64,

    /// Name of the strategy that produced the result.
    pub strategy: &'static str,
}

/// Progress data point handed to the observer once per generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    /// 1-based generation number.
    pub generation: usize,
    /// Best cost seen so far.
    pub best_cost: f64,
    /// Best cost within the current population.
    pub population_best: f64,
    /// Worst cost within the current population.
    pub population_worst: f64,
}

/// Executes the generational loop for any [`SearchStrategy`].
///
/// # Usage
///
/// ```ignore
/// let snapshot = DomainSnapshot::new(input)?;
/// let config = SolverConfig::default().with_seed(42);
/// let result = Solver::run(&snapshot, &config, &mut BboStrategy::default())?;
/// println!("best cost: {}", result.best_cost);
/// ```
pub struct Solver;

impl Solver {
    /// Runs the full generation budget.
    pub fn run<S: SearchStrategy>(
        snapshot: &DomainSnapshot,
        config: &SolverConfig,
        strategy: &mut S,
    ) -> Result<SolveResult, TimetableError> {
        Self::run_with_observer(snapshot, config, strategy, None, |_| {})
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is checked at the start of each generation; once set, the
    /// run returns the best candidate found so far.
    pub fn run_with_cancel<S: SearchStrategy>(
        snapshot: &DomainSnapshot,
        config: &SolverConfig,
        strategy: &mut S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SolveResult, TimetableError> {
        Self::run_with_observer(snapshot, config, strategy, cancel, |_| {})
    }

    /// Runs with a cancellation token and a per-generation observer.
    pub fn run_with_observer<S, F>(
        snapshot: &DomainSnapshot,
        config: &SolverConfig,
        strategy: &mut S,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> Result<SolveResult, TimetableError>
    where
        S: SearchStrategy,
        F: FnMut(&GenerationReport),
    {
        config.validate()?;
        strategy.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let parallel = config.parallel;

        let sampler = Sampler::new(snapshot, config.place_usage_cap);
        let repairer = Repairer::new(sampler, config.repair);
        let evaluator = CostEvaluator::new(snapshot, config.cost.clone(), config.place_usage_cap);

        info!(
            "{}: {} course(s), population {}, {} generation(s), seed {}",
            strategy.name(),
            snapshot.schedulable().len(),
            config.population_size,
            config.max_generations,
            seed
        );

        // 1. Initialize and evaluate
        let mut population = Initializer::new(sampler, repairer).populate(
            config.population_size,
            &mut rng,
            parallel,
        );
        evaluate_population(&evaluator, &mut population, parallel);
        rank_population(&mut population);
        strategy.prepare(&population);

        let mut best = population[0].clone();
        let mut cost_history = Vec::with_capacity(config.max_generations + 1);
        cost_history.push(best.cost);
        let mut cancelled = false;
        let mut generations = 0;

        // 2. Generational loop
        for generation in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let elites: Vec<Candidate> = population[..config.elite_count].to_vec();

            let ctx = GenerationContext {
                sampler,
                generation,
                max_generations: config.max_generations,
                parallel,
            };
            population = strategy.propose_next_generation(&ctx, population, &mut rng);

            for_each_seeded(&mut population, &mut rng, parallel, |candidate, r| {
                repairer.repair(candidate, r);
                evaluator.score(candidate);
            });
            rank_population(&mut population);

            // Elites replace the worst candidates
            let keep = elites.len().min(population.len());
            let tail = population.len() - keep;
            for (slot, elite) in population[tail..].iter_mut().zip(elites) {
                *slot = elite;
            }
            rank_population(&mut population);

            strategy.observe(&population);

            if population[0].cost < best.cost {
                best = population[0].clone();
            }
            cost_history.push(best.cost);
            generations = generation + 1;

            let report = GenerationReport {
                generation: generations,
                best_cost: best.cost,
                population_best: population[0].cost,
                population_worst: population[population.len() - 1].cost,
            };
            debug!(
                "{} generation {}: best {:.2}, population {:.2}..{:.2}",
                strategy.name(),
                report.generation,
                report.best_cost,
                report.population_best,
                report.population_worst
            );
            observer(&report);
        }

        let breakdown = evaluator.breakdown(&best);
        info!(
            "{}: finished after {} generation(s){}, best cost {:.2}",
            strategy.name(),
            generations,
            if cancelled { " (cancelled)" } else { "" },
            best.cost
        );

        Ok(SolveResult {
            best_cost: best.cost,
            best,
            breakdown,
            generations,
            cancelled,
            cost_history,
            seed,
            strategy: strategy.name(),
        })
    }
}

/// Evaluates every candidate in the population.
fn evaluate_population(
    evaluator: &CostEvaluator<'_>,
    population: &mut [Candidate],
    parallel: bool,
) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            population.par_iter_mut().for_each(|c| evaluator.score(c));
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for c in population.iter_mut() {
        evaluator.score(c);
    }
}

// ============================================================================
// Strategy selection
// ============================================================================

/// Which strategy to run, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyKind {
    Bbo(BboConfig),
    Gwo(GwoConfig),
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Bbo(BboConfig::default())
    }
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Bbo(_) => "bbo",
            StrategyKind::Gwo(_) => "gwo",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyKind::Bbo(c) => c.validate(),
            StrategyKind::Gwo(c) => c.validate(),
        }
    }
}

/// Runs one strategy for the full budget.
///
/// ```
/// use u_timetable::domain::{Course, DomainInput, DomainSnapshot, Gender, Place, Teacher, TimeSlot};
/// use u_timetable::driver::{solve, SolverConfig, StrategyKind};
///
/// let input = DomainInput {
///     places: vec![Place::new("R1", 40)],
///     teachers: vec![Teacher::new("T1", Gender::None).with_courses(["C1", "C2"])],
///     courses: vec![Course::new("C1", 2), Course::new("C2", 2)],
///     time_slots: vec![TimeSlot::hm(1, (8, 0), (10, 0)), TimeSlot::hm(2, (10, 0), (12, 0))],
///     days: vec!["Mon".into(), "Tue".into()],
///     constraints: vec![],
/// };
/// let snapshot = DomainSnapshot::new(input).unwrap();
/// let config = SolverConfig::fast().with_max_generations(10).with_seed(1);
/// let result = solve(&snapshot, &config, StrategyKind::default()).unwrap();
/// assert_eq!(result.best.len(), 2);
/// ```
pub fn solve(
    snapshot: &DomainSnapshot,
    config: &SolverConfig,
    kind: StrategyKind,
) -> Result<SolveResult, TimetableError> {
    solve_with_cancel(snapshot, config, kind, None)
}

/// [`solve`] with a cancellation token.
pub fn solve_with_cancel(
    snapshot: &DomainSnapshot,
    config: &SolverConfig,
    kind: StrategyKind,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<SolveResult, TimetableError> {
    match kind {
        StrategyKind::Bbo(c) => {
            Solver::run_with_cancel(snapshot, config, &mut BboStrategy::new(c), cancel)
        }
        StrategyKind::Gwo(c) => {
            Solver::run_with_cancel(snapshot, config, &mut GwoStrategy::new(c), cancel)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
