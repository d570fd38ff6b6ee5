//! BBO generation step.

use rand::Rng;

use super::config::BboConfig;
use crate::candidate::{Assignment, Candidate};
use crate::driver::{GenerationContext, SearchStrategy};
use crate::error::ConfigError;
use crate::random::for_each_seeded;
use crate::sampler::PlaceUsage;

/// Migration/mutation search strategy.
///
/// Per generation, on a population ranked best-first:
///
/// 1. species count = `P - rank`, so the best candidate has `P`
/// 2. `λ = I·(1 − s/P)` and `μ = E·(s/P)`
/// 3. migration with the normalized `λ` as per-feature probability and
///    `μ`-roulette donor selection, donors read from the population as it
///    was before migration
/// 4. mutation of the worse half
#[derive(Debug, Clone, Default)]
pub struct BboStrategy {
    config: BboConfig,
}

impl BboStrategy {
    pub fn new(config: BboConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BboConfig {
        &self.config
    }
}

impl SearchStrategy for BboStrategy {
    fn name(&self) -> &'static str {
        "bbo"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    fn propose_next_generation<R: Rng>(
        &mut self,
        ctx: &GenerationContext<'_>,
        mut population: Vec<Candidate>,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let size = population.len();
        if size == 0 {
            return population;
        }

        for (rank, candidate) in population.iter_mut().enumerate() {
            candidate.species_count = size - rank;
        }
        let (lambda, mu) = migration_rates(&population, &self.config);
        let scales = normalized_immigration(&lambda, &self.config);

        // ---- Migration ----
        let donors: Vec<Vec<Assignment>> =
            population.iter().map(|c| c.assignments.clone()).collect();
        let pmodify = self.config.pmodify;
        let mut jobs: Vec<(&mut Candidate, f64)> =
            population.iter_mut().zip(scales.iter().copied()).collect();
        for_each_seeded(&mut jobs, rng, ctx.parallel, |(candidate, scale), r| {
            if r.random_range(0.0..1.0) >= pmodify {
                return;
            }
            for (feature, assignment) in candidate.assignments.iter_mut().enumerate() {
                if r.random_range(0.0..1.0) < *scale {
                    let donor = select_donor(&mu, r);
                    *assignment = donors[donor][feature];
                }
            }
        });

        // ---- Mutation ----
        // Costs are untouched by migration, so the rank order still holds.
        let pmutate = self.config.pmutate;
        let sampler = ctx.sampler;
        let place_count = ctx.snapshot().places().len();
        for_each_seeded(&mut population[size / 2..], rng, ctx.parallel, |candidate, r| {
            let mut usage = PlaceUsage::of(candidate, place_count);
            for assignment in candidate.assignments.iter_mut() {
                if r.random_range(0.0..1.0) < pmutate {
                    sampler.redraw(assignment, &mut usage, r);
                }
            }
        });

        population
    }
}

/// Immigration (`λ`) and emigration (`μ`) rates from species counts.
pub(crate) fn migration_rates(
    population: &[Candidate],
    config: &BboConfig,
) -> (Vec<f64>, Vec<f64>) {
    let size = population.len() as f64;
    population
        .iter()
        .map(|c| {
            let share = c.species_count as f64 / size;
            (
                config.immigration_max * (1.0 - share),
                config.emigration_max * share,
            )
        })
        .unzip()
}

/// Maps `λ` linearly onto `[lambda_lower, lambda_upper]`.
///
/// All-equal rates map to `lambda_upper`.
pub(crate) fn normalized_immigration(lambda: &[f64], config: &BboConfig) -> Vec<f64> {
    let min = lambda.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lambda.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span <= f64::EPSILON {
        return vec![config.lambda_upper; lambda.len()];
    }
    let range = config.lambda_upper - config.lambda_lower;
    lambda
        .iter()
        .map(|&l| config.lambda_lower + range * (l - min) / span)
        .collect()
}

/// Roulette over `μ`: the first index whose cumulative weight reaches the
/// draw, the last index if rounding leaves the draw unreached, uniform if
/// every weight is 0.
pub(crate) fn select_donor<R: Rng>(mu: &[f64], rng: &mut R) -> usize {
    let total: f64 = mu.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..mu.len());
    }

    let threshold = rng.random_range(0.0..1.0) * total;
    let mut cumulative = 0.0;
    for (i, &m) in mu.iter().enumerate() {
        cumulative += m;
        if threshold <= cumulative {
            return i;
        }
    }
    mu.len() - 1
}
