//! Random draws shared by initialization, repair and both strategies.
//!
//! - teacher: uniform over the course's eligible teachers
//! - place: roulette over eligible places, weighted against current usage
//! - slot, day: uniform
//!
//! All draws assume the course is schedulable (non-empty eligible sets),
//! which [`DomainSnapshot`] guarantees for every candidate position.

use rand::Rng;

use crate::candidate::{Assignment, Candidate};
use crate::domain::DomainSnapshot;

/// Usage level above which the weight decay becomes steeper.
const STEEP_DECAY_THRESHOLD: usize = 10;

/// Number of assignments per place within one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceUsage {
    counts: Vec<usize>,
}

impl PlaceUsage {
    /// All places unused.
    pub fn empty(place_count: usize) -> Self {
        Self {
            counts: vec![0; place_count],
        }
    }

    /// Usage as it stands in `candidate`.
    pub fn of(candidate: &Candidate, place_count: usize) -> Self {
        Self {
            counts: candidate.place_usage(place_count),
        }
    }

    pub fn get(&self, place: usize) -> usize {
        self.counts[place]
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn add(&mut self, place: usize) {
        self.counts[place] += 1;
    }

    /// Moves one unit of usage from `from` to `to`.
    pub fn transfer(&mut self, from: usize, to: usize) {
        self.counts[from] = self.counts[from].saturating_sub(1);
        self.counts[to] += 1;
    }
}

/// Draws assignment components for a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    snapshot: &'a DomainSnapshot,
    usage_cap: usize,
}

impl<'a> Sampler<'a> {
    /// `usage_cap` is the usage at which a place stops being drawn while
    /// alternatives remain.
    pub fn new(snapshot: &'a DomainSnapshot, usage_cap: usize) -> Self {
        Self {
            snapshot,
            usage_cap,
        }
    }

    pub fn snapshot(&self) -> &'a DomainSnapshot {
        self.snapshot
    }

    pub fn usage_cap(&self) -> usize {
        self.usage_cap
    }

    /// Uniform eligible teacher.
    ///
    /// # Panics
    /// Panics if the course has no eligible teacher.
    pub fn draw_teacher<R: Rng>(&self, course: usize, rng: &mut R) -> usize {
        let eligible = self.snapshot.eligible_teachers(course);
        eligible[rng.random_range(0..eligible.len())]
    }

    /// Eligible place, favouring lightly used ones.
    ///
    /// A place at or above the cap gets weight 0; otherwise the weight is
    /// `1 / (1 + 10u)`, or `1 / (1 + 20u)` once any place has reached a
    /// usage of 10. When every weight is 0 the draw falls back to a uniform
    /// choice among places under the cap, then among all eligible places.
    ///
    /// # Panics
    /// Panics if the course has no eligible place.
    pub fn draw_place<R: Rng>(&self, course: usize, usage: &PlaceUsage, rng: &mut R) -> usize {
        self.draw_place_from(self.snapshot.eligible_places(course), usage, rng)
    }

    /// [`draw_place`](Self::draw_place) restricted to eligible places other
    /// than `current`. Returns `current` when it is the only eligible place.
    pub fn draw_other_place<R: Rng>(
        &self,
        course: usize,
        current: usize,
        usage: &PlaceUsage,
        rng: &mut R,
    ) -> usize {
        let others: Vec<usize> = self
            .snapshot
            .eligible_places(course)
            .iter()
            .copied()
            .filter(|&p| p != current)
            .collect();
        if others.is_empty() {
            return current;
        }
        self.draw_place_from(&others, usage, rng)
    }

    fn draw_place_from<R: Rng>(
        &self,
        eligible: &[usize],
        usage: &PlaceUsage,
        rng: &mut R,
    ) -> usize {
        let slope = if usage.max() < STEEP_DECAY_THRESHOLD {
            10.0
        } else {
            20.0
        };

        let weights: Vec<f64> = eligible
            .iter()
            .map(|&p| {
                let u = usage.get(p);
                if u >= self.usage_cap {
                    0.0
                } else {
                    1.0 / (1.0 + u as f64 * slope)
                }
            })
            .collect();
        let total: f64 = weights.iter().sum();

        if total <= 0.0 {
            let under_cap: Vec<usize> = eligible
                .iter()
                .copied()
                .filter(|&p| usage.get(p) < self.usage_cap)
                .collect();
            let pool = if under_cap.is_empty() {
                eligible
            } else {
                &under_cap
            };
            return pool[rng.random_range(0..pool.len())];
        }

        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for (&p, &w) in eligible.iter().zip(&weights) {
            cumulative += w;
            if cumulative > threshold {
                return p;
            }
        }

        // floating-point fallback: last place with non-zero weight
        eligible
            .iter()
            .zip(&weights)
            .rev()
            .find(|&(_, &w)| w > 0.0)
            .map(|(&p, _)| p)
            .unwrap_or(eligible[eligible.len() - 1])
    }

    pub fn draw_slot<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.snapshot.slot_count())
    }

    pub fn draw_day<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.snapshot.day_count())
    }

    /// A fresh assignment for `course`; records the place in `usage`.
    pub fn assign<R: Rng>(&self, course: usize, usage: &mut PlaceUsage, rng: &mut R) -> Assignment {
        let teacher = self.draw_teacher(course, rng);
        let place = self.draw_place(course, usage, rng);
        usage.add(place);
        Assignment {
            course,
            teacher,
            place,
            slot: self.draw_slot(rng),
            day: self.draw_day(rng),
        }
    }

    /// Redraws every component of an existing assignment.
    pub fn redraw<R: Rng>(&self, assignment: &mut Assignment, usage: &mut PlaceUsage, rng: &mut R) {
        assignment.teacher = self.draw_teacher(assignment.course, rng);
        let place = self.draw_place(assignment.course, usage, rng);
        usage.transfer(assignment.place, place);
        assignment.place = place;
        assignment.slot = self.draw_slot(rng);
        assignment.day = self.draw_day(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::random::create_rng;

    #[test]
    fn test_place_draw_prefers_unused() {
        let snap = fixtures::scenario();
        let sampler = Sampler::new(&snap, 5);
        let course = snap.course_by_code("C2").unwrap();
        let mut usage = PlaceUsage::empty(snap.places().len());
        for _ in 0..4 {
            usage.add(0);
        }

        let mut rng = create_rng(42);
        let mut counts = [0u32; 2];
        for _ in 0..2000 {
            counts[sampler.draw_place(course, &usage, &mut rng)] += 1;
        }
        // weight 1/41 vs 1
        assert!(counts[1] > counts[0] * 10, "counts: {counts:?}");
    }

    #[test]
    fn test_place_at_cap_is_skipped() {
        let snap = fixtures::scenario();
        let sampler = Sampler::new(&snap, 3);
        let course = snap.course_by_code("C2").unwrap();
        let mut usage = PlaceUsage::empty(snap.places().len());
        for _ in 0..3 {
            usage.add(1);
        }
        let mut rng = create_rng(1);
        for _ in 0..200 {
            assert_eq!(sampler.draw_place(course, &usage, &mut rng), 0);
        }
    }

    #[test]
    fn test_all_places_at_cap_still_draws() {
        let snap = fixtures::scenario();
        let sampler = Sampler::new(&snap, 1);
        let course = snap.course_by_code("C3").unwrap();
        let mut usage = PlaceUsage::empty(snap.places().len());
        usage.add(0);
        usage.add(1);
        let mut rng = create_rng(9);
        let drawn = sampler.draw_place(course, &usage, &mut rng);
        assert!(snap.eligible_places(course).contains(&drawn));
    }

    #[test]
    fn test_other_place_excludes_current() {
        let snap = fixtures::scenario();
        let sampler = Sampler::new(&snap, 5);
        let course = snap.course_by_code("C2").unwrap();
        let mut usage = PlaceUsage::empty(snap.places().len());
        for _ in 0..4 {
            usage.add(1);
        }
        let mut rng = create_rng(13);
        for _ in 0..200 {
            assert_eq!(sampler.draw_other_place(course, 0, &usage, &mut rng), 1);
        }

        let mut input = fixtures::scenario_input();
        input.places.truncate(1);
        let single = DomainSnapshot::new(input).unwrap();
        let sampler = Sampler::new(&single, 5);
        let usage = PlaceUsage::empty(1);
        assert_eq!(sampler.draw_other_place(course, 0, &usage, &mut rng), 0);
    }

    #[test]
    fn test_assign_stays_in_eligible_sets() {
        let snap = fixtures::scenario();
        let sampler = Sampler::new(&snap, 5);
        let mut usage = PlaceUsage::empty(snap.places().len());
        let mut rng = create_rng(5);
        for _ in 0..100 {
            for &course in snap.schedulable() {
                let a = sampler.assign(course, &mut usage, &mut rng);
                assert!(snap.eligible_teachers(course).contains(&a.teacher));
                assert!(snap.eligible_places(course).contains(&a.place));
                assert!(a.slot < snap.slot_count());
                assert!(a.day < snap.day_count());
            }
        }
    }

    #[test]
    fn test_redraw_keeps_usage_consistent() {
        let snap = fixtures::scenario();
        let sampler = Sampler::new(&snap, 5);
        let mut cand = fixtures::random_candidate(&snap, 11);
        let mut usage = PlaceUsage::of(&cand, snap.places().len());
        let mut rng = create_rng(3);
        for a in cand.assignments.iter_mut() {
            sampler.redraw(a, &mut usage, &mut rng);
        }
        assert_eq!(usage, PlaceUsage::of(&cand, snap.places().len()));
    }
}
