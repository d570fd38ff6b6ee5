//! GWO generation step.

use rand::Rng;

use super::config::GwoConfig;
use crate::candidate::{Assignment, Candidate};
use crate::driver::{GenerationContext, SearchStrategy};
use crate::error::ConfigError;
use crate::random::for_each_seeded;
use crate::sampler::{PlaceUsage, Sampler};

/// Number of leaders (alpha, beta, delta).
const LEADERS: usize = 3;

/// Leader-following search strategy.
///
/// Slots and days are treated as 1-based positions on a line. For each
/// leader `L` and fresh uniforms `r1, r2`:
///
/// ```text
/// A = 2a·r1 − a
/// C = 2·r2
/// X = L − A·|C·L − x|
/// ```
///
/// The new value is the mean of the three `X`, rounded and clamped into
/// range. Leaders are distinct and only ever improve: after each
/// generation the k-th leader is replaced by the k-th best distinct
/// candidate when that one is strictly better and not already another
/// leader.
#[derive(Debug, Clone, Default)]
pub struct GwoStrategy {
    config: GwoConfig,
    leaders: Vec<Candidate>,
}

impl GwoStrategy {
    pub fn new(config: GwoConfig) -> Self {
        Self {
            config,
            leaders: Vec::new(),
        }
    }

    pub fn config(&self) -> &GwoConfig {
        &self.config
    }

    /// Current alpha, beta and delta (empty before `prepare`).
    pub fn leaders(&self) -> &[Candidate] {
        &self.leaders
    }

    /// Three best distinct candidates of a ranked population. Candidates
    /// with the same assignments as an earlier pick are skipped; the last
    /// pick repeats when fewer than three distinct ones exist.
    fn pick_leaders(population: &[Candidate]) -> Vec<Candidate> {
        let mut leaders: Vec<Candidate> = Vec::with_capacity(LEADERS);
        for candidate in population {
            if leaders.len() == LEADERS {
                break;
            }
            if !leaders.iter().any(|l| l.assignments == candidate.assignments) {
                leaders.push(candidate.clone());
            }
        }
        if let Some(last) = leaders.last().cloned() {
            leaders.resize(LEADERS, last);
        }
        leaders
    }
}

impl SearchStrategy for GwoStrategy {
    fn name(&self) -> &'static str {
        "gwo"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    fn prepare(&mut self, population: &[Candidate]) {
        self.leaders = Self::pick_leaders(population);
    }

    fn propose_next_generation<R: Rng>(
        &mut self,
        ctx: &GenerationContext<'_>,
        mut population: Vec<Candidate>,
        rng: &mut R,
    ) -> Vec<Candidate> {
        if self.leaders.is_empty() {
            self.leaders = Self::pick_leaders(&population);
        }
        if self.leaders.is_empty() {
            return population;
        }

        let a = self.config.a_at(ctx.generation);
        let redraw = self.config.redraw_probability;
        let leaders = &self.leaders;
        let sampler = ctx.sampler;
        let slots = ctx.snapshot().slot_count();
        let days = ctx.snapshot().day_count();
        let place_count = ctx.snapshot().places().len();

        for_each_seeded(&mut population, rng, ctx.parallel, |candidate, r| {
            let mut usage = PlaceUsage::of(candidate, place_count);
            for pos in 0..candidate.assignments.len() {
                let current = candidate.assignments[pos];
                let leader_slots = leaders.iter().map(|l| l.assignments[pos].slot);
                let slot = pull(leader_slots, current.slot, slots, a, r);
                let leader_days = leaders.iter().map(|l| l.assignments[pos].day);
                let day = pull(leader_days, current.day, days, a, r);

                let assignment = &mut candidate.assignments[pos];
                assignment.slot = slot;
                assignment.day = day;
                if r.random_range(0.0..1.0) < redraw {
                    redraw_resource(&sampler, assignment, &mut usage, r);
                }
            }
        });

        population
    }

    fn observe(&mut self, population: &[Candidate]) {
        let challengers = Self::pick_leaders(population);
        for (k, challenger) in challengers.into_iter().enumerate() {
            let Some(leader) = self.leaders.get(k) else {
                break;
            };
            let duplicate = challenger.assignments != leader.assignments
                && self
                    .leaders
                    .iter()
                    .any(|l| l.assignments == challenger.assignments);
            if challenger.cost < leader.cost && !duplicate {
                self.leaders[k] = challenger;
            }
        }
    }
}

/// Moves a 0-based index toward the leaders' values and returns the new
/// 0-based index in `0..len`.
fn pull<R: Rng>(
    leader_values: impl Iterator<Item = usize>,
    current: usize,
    len: usize,
    a: f64,
    rng: &mut R,
) -> usize {
    let x = (current + 1) as f64;
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in leader_values {
        let l = (value + 1) as f64;
        let big_a = 2.0 * a * rng.random_range(0.0..1.0) - a;
        let c = 2.0 * rng.random_range(0.0..1.0);
        sum += l - big_a * (c * l - x).abs();
        count += 1;
    }
    let mean = (sum / count as f64).round();
    if count == 0 || !mean.is_finite() {
        return current;
    }
    (mean.clamp(1.0, len as f64) as usize) - 1
}

fn redraw_resource<R: Rng>(
    sampler: &Sampler<'_>,
    assignment: &mut Assignment,
    usage: &mut PlaceUsage,
    rng: &mut R,
) {
    if rng.random_range(0.0..1.0) < 0.5 {
        assignment.teacher = sampler.draw_teacher(assignment.course, rng);
    } else {
        let place = sampler.draw_place(assignment.course, usage, rng);
        usage.transfer(assignment.place, place);
        assignment.place = place;
    }
}
