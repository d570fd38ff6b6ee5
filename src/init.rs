//! Population initialization.

use rand::Rng;

use crate::candidate::Candidate;
use crate::random::generate_seeded;
use crate::repair::Repairer;
use crate::sampler::{PlaceUsage, Sampler};

/// Builds random, repaired candidates.
#[derive(Debug, Clone, Copy)]
pub struct Initializer<'a> {
    sampler: Sampler<'a>,
    repairer: Repairer<'a>,
}

impl<'a> Initializer<'a> {
    pub fn new(sampler: Sampler<'a>, repairer: Repairer<'a>) -> Self {
        Self { sampler, repairer }
    }

    /// One candidate: fresh usage, one draw per schedulable course in
    /// position order, then one repair pass. The result is unevaluated.
    pub fn candidate<R: Rng>(&self, rng: &mut R) -> Candidate {
        let snapshot = self.sampler.snapshot();
        let mut usage = PlaceUsage::empty(snapshot.places().len());
        let assignments = snapshot
            .schedulable()
            .iter()
            .map(|&course| self.sampler.assign(course, &mut usage, rng))
            .collect();
        let mut candidate = Candidate::new(assignments);
        self.repairer.repair(&mut candidate, rng);
        candidate
    }

    /// `size` candidates, each built from its own child RNG.
    pub fn populate<R: Rng>(&self, size: usize, rng: &mut R, parallel: bool) -> Vec<Candidate> {
        generate_seeded(size, rng, parallel, |r| self.candidate(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::random::create_rng;
    use crate::repair::RepairConfig;

    #[test]
    fn test_population_shape() {
        let snap = fixtures::constrained();
        let sampler = Sampler::new(&snap, 5);
        let init = Initializer::new(sampler, Repairer::new(sampler, RepairConfig::default()));
        let pop = init.populate(12, &mut create_rng(42), false);

        assert_eq!(pop.len(), 12);
        for cand in &pop {
            assert_eq!(cand.len(), snap.schedulable().len());
            assert!(cand.cost.is_infinite());
            for (pos, a) in cand.assignments.iter().enumerate() {
                assert_eq!(a.course, snap.schedulable()[pos]);
                assert!(snap.eligible_teachers(a.course).contains(&a.teacher));
                assert!(snap.eligible_places(a.course).contains(&a.place));
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let snap = fixtures::constrained();
        let sampler = Sampler::new(&snap, 5);
        let init = Initializer::new(sampler, Repairer::new(sampler, RepairConfig::default()));
        let a = init.populate(16, &mut create_rng(9), true);
        let b = init.populate(16, &mut create_rng(9), false);
        assert_eq!(a, b);
    }
}
