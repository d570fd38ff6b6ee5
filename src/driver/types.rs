//! The contract between the generational loop and a search strategy.

use rand::Rng;

use crate::candidate::Candidate;
use crate::domain::DomainSnapshot;
use crate::error::ConfigError;
use crate::sampler::Sampler;

/// Read-only state handed to a strategy each generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Shared draws (teacher, usage-weighted place, slot, day).
    pub sampler: Sampler<'a>,
    /// 0-based index of the generation being produced.
    pub generation: usize,
    pub max_generations: usize,
    /// Whether per-candidate work may run on rayon.
    pub parallel: bool,
}

impl<'a> GenerationContext<'a> {
    pub fn snapshot(&self) -> &'a DomainSnapshot {
        self.sampler.snapshot()
    }
}

/// A search strategy.
///
/// The driver owns the population and everything around the operator:
/// repair, evaluation, ranking and elitism. A strategy only turns the
/// current ranked population into the next, unrepaired and unevaluated.
///
/// # Call order
///
/// 1. [`prepare`](Self::prepare) once, with the evaluated and ranked initial
///    population.
/// 2. Per generation: [`propose_next_generation`](Self::propose_next_generation),
///    then, after the driver has repaired, evaluated, ranked and restored
///    elites, [`observe`](Self::observe).
///
/// # Thread Safety
///
/// Strategies must be `Send + Sync`; per-candidate work inside
/// `propose_next_generation` typically runs through
/// [`for_each_seeded`](crate::random::for_each_seeded).
pub trait SearchStrategy: Send + Sync {
    /// Short identifier used in logs and comparisons.
    fn name(&self) -> &'static str;

    /// Checks the strategy's own parameters before a run.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Called once before the first generation.
    fn prepare(&mut self, _population: &[Candidate]) {}

    /// Produces the next population from the current one.
    ///
    /// `population` is ranked ascending by cost. The returned population
    /// must keep its size and the position order of every candidate.
    fn propose_next_generation<R: Rng>(
        &mut self,
        ctx: &GenerationContext<'_>,
        population: Vec<Candidate>,
        rng: &mut R,
    ) -> Vec<Candidate>;

    /// Called with the ranked, evaluated population at the end of each
    /// generation.
    fn observe(&mut self, _population: &[Candidate]) {}
}
