//! Cost evaluation.
//!
//! Evaluation is a pure function of the candidate and the snapshot: no
//! caching, no hidden state, so the same candidate always yields the same
//! cost.

use std::collections::HashMap;

use chrono::Days;
use serde::Serialize;

use super::weights::{CostConfig, CostWeights, ViolationCategory};
use crate::candidate::{Assignment, Candidate};
use crate::domain::{DomainSnapshot, Gender, ResolvedConstraint};

/// Average multiple above which a place counts as overused.
const OVERUSE_FACTOR: f64 = 1.5;

/// Unweighted magnitude per violation category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    magnitudes: [f64; ViolationCategory::COUNT],
}

impl CostBreakdown {
    pub fn get(&self, category: ViolationCategory) -> f64 {
        self.magnitudes[category.index()]
    }

    fn add(&mut self, category: ViolationCategory, amount: f64) {
        self.magnitudes[category.index()] += amount;
    }

    /// Weighted contribution of one category.
    pub fn weighted(&self, category: ViolationCategory, weights: &CostWeights) -> f64 {
        self.get(category) * weights.get(category)
    }

    /// Weighted sum over all categories.
    pub fn total(&self, weights: &CostWeights) -> f64 {
        ViolationCategory::ALL
            .iter()
            .map(|&c| self.weighted(c, weights))
            .sum()
    }

    /// Categories with a non-zero magnitude.
    pub fn violated(&self) -> impl Iterator<Item = (ViolationCategory, f64)> + '_ {
        ViolationCategory::ALL
            .into_iter()
            .map(|c| (c, self.get(c)))
            .filter(|&(_, m)| m > 0.0)
    }
}

/// Scores candidates against a snapshot.
#[derive(Debug, Clone)]
pub struct CostEvaluator<'a> {
    snapshot: &'a DomainSnapshot,
    config: CostConfig,
    usage_cap: usize,
}

impl<'a> CostEvaluator<'a> {
    /// `usage_cap` is the absolute per-place usage above which the overuse
    /// term applies regardless of the average.
    pub fn new(snapshot: &'a DomainSnapshot, config: CostConfig, usage_cap: usize) -> Self {
        Self {
            snapshot,
            config,
            usage_cap,
        }
    }

    pub fn weights(&self) -> &CostWeights {
        &self.config.weights
    }

    /// Weighted total cost.
    pub fn evaluate(&self, candidate: &Candidate) -> f64 {
        self.breakdown(candidate).total(&self.config.weights)
    }

    /// Evaluates and stores the cost on the candidate.
    pub fn score(&self, candidate: &mut Candidate) {
        candidate.cost = self.evaluate(candidate);
    }

    /// Per-category magnitudes before weighting.
    pub fn breakdown(&self, candidate: &Candidate) -> CostBreakdown {
        let mut b = CostBreakdown::default();
        let a = candidate.assignments.as_slice();

        let teachers = self.snapshot.teachers().len();
        let places = self.snapshot.places().len();

        b.add(
            ViolationCategory::TeacherConflict,
            self.double_bookings(a, |x| x.teacher, teachers),
        );
        b.add(
            ViolationCategory::PlaceConflict,
            self.double_bookings(a, |x| x.place, places),
        );
        b.add(ViolationCategory::Workload, self.workload(a));
        b.add(ViolationCategory::Capacity, self.capacity(a));
        b.add(ViolationCategory::Prerequisite, self.prerequisites(candidate));
        b.add(ViolationCategory::Corequisite, self.corequisites(candidate));
        b.add(ViolationCategory::Maintenance, self.maintenance(a));
        b.add(ViolationCategory::Concurrent, self.concurrency(candidate));
        b.add(ViolationCategory::TeacherGap, self.teacher_gaps(a));

        let usage: Vec<usize> = candidate
            .place_usage(places)
            .into_iter()
            .filter(|&u| u > 0)
            .collect();
        b.add(ViolationCategory::PlaceImbalance, imbalance(&usage));
        b.add(ViolationCategory::PlaceOveruse, self.overuse(&usage));
        b.add(ViolationCategory::GenderMismatch, self.gender(a));
        b
    }

    /// Occurrences beyond the first per (resource, day, slot).
    fn double_bookings(
        &self,
        a: &[Assignment],
        key: impl Fn(&Assignment) -> usize,
        resources: usize,
    ) -> f64 {
        let slots = self.snapshot.slot_count();
        let cells = slots * self.snapshot.day_count();
        let mut seen = vec![0u32; resources * cells];
        let mut extra = 0u32;
        for x in a {
            let cell = key(x) * cells + x.day * slots + x.slot;
            if seen[cell] > 0 {
                extra += 1;
            }
            seen[cell] += 1;
        }
        extra as f64
    }

    /// One violation per assigned teacher whose unit total is out of bounds.
    fn workload(&self, a: &[Assignment]) -> f64 {
        let mut units: Vec<Option<u64>> = vec![None; self.snapshot.teachers().len()];
        for x in a {
            let entry = units[x.teacher].get_or_insert(0);
            *entry += u64::from(self.snapshot.course(x.course).units);
        }
        units
            .iter()
            .enumerate()
            .filter_map(|(t, u)| u.map(|u| (self.snapshot.teacher(t), u)))
            .filter(|(t, u)| *u < u64::from(t.min_units) || *u > u64::from(t.max_units))
            .count() as f64
    }

    fn capacity(&self, a: &[Assignment]) -> f64 {
        a.iter()
            .filter(|x| {
                let place = self.snapshot.place(x.place);
                place.capacity < self.snapshot.course(x.course).expected_students
            })
            .count() as f64
    }

    /// Finds the assignment at a candidate position, tolerating candidates
    /// that are not in position order.
    fn at_position<'c>(&self, candidate: &'c Candidate, position: usize) -> Option<&'c Assignment> {
        let course = *self.snapshot.schedulable().get(position)?;
        match candidate.assignments.get(position) {
            Some(x) if x.course == course => Some(x),
            _ => candidate.assignments.iter().find(|x| x.course == course),
        }
    }

    fn prerequisites(&self, candidate: &Candidate) -> f64 {
        let mut violations = 0u32;
        for x in &candidate.assignments {
            for pre in &self.snapshot.profile(x.course).prerequisites {
                let earlier = pre
                    .and_then(|p| self.at_position(candidate, p))
                    .is_some_and(|p| p.time() < x.time());
                if !earlier {
                    violations += 1;
                }
            }
        }
        violations as f64
    }

    fn corequisites(&self, candidate: &Candidate) -> f64 {
        let mut violations = 0u32;
        for x in &candidate.assignments {
            for co in &self.snapshot.profile(x.course).corequisites {
                let adjacent = co
                    .and_then(|p| self.at_position(candidate, p))
                    .is_some_and(|c| c.day == x.day && c.slot.abs_diff(x.slot) <= 1);
                if !adjacent {
                    violations += 1;
                }
            }
        }
        violations as f64
    }

    fn maintenance(&self, a: &[Assignment]) -> f64 {
        let mut violations = 0u32;
        for constraint in self.snapshot.constraints() {
            let ResolvedConstraint::PlaceMaintenance {
                place: Some(place),
                start,
                end,
            } = constraint
            else {
                continue;
            };
            for x in a.iter().filter(|x| x.place == *place) {
                let date = self.config.term_start.checked_add_days(Days::new(x.day as u64));
                if date.is_some_and(|d| *start <= d && d <= *end) {
                    violations += 1;
                }
            }
        }
        violations as f64
    }

    fn concurrency(&self, candidate: &Candidate) -> f64 {
        let mut excess = 0usize;
        for constraint in self.snapshot.constraints() {
            let ResolvedConstraint::ConcurrentCourses {
                positions,
                max_concurrent,
            } = constraint
            else {
                continue;
            };
            let mut groups: HashMap<(usize, usize), usize> = HashMap::new();
            for &p in positions {
                if let Some(x) = self.at_position(candidate, p) {
                    *groups.entry(x.time()).or_default() += 1;
                }
            }
            excess += groups
                .values()
                .map(|&n| n.saturating_sub(*max_concurrent))
                .sum::<usize>();
        }
        excess as f64
    }

    fn teacher_gaps(&self, a: &[Assignment]) -> f64 {
        let mut violations = 0u32;
        for constraint in self.snapshot.constraints() {
            let ResolvedConstraint::SameTeacherGap {
                teacher: Some(teacher),
                min_hours,
            } = constraint
            else {
                continue;
            };
            let own: Vec<&Assignment> = a.iter().filter(|x| x.teacher == *teacher).collect();
            for (i, x) in own.iter().enumerate() {
                for y in &own[i + 1..] {
                    if x.day != y.day {
                        continue;
                    }
                    let gap = self
                        .snapshot
                        .slot(x.slot)
                        .start
                        .signed_duration_since(self.snapshot.slot(y.slot).start);
                    let hours = gap.num_seconds().abs() as f64 / 3600.0;
                    if hours < *min_hours {
                        violations += 1;
                    }
                }
            }
        }
        violations as f64
    }

    /// Places above 1.5x the average usage or above the cap contribute
    /// their excess over the average.
    fn overuse(&self, usage: &[usize]) -> f64 {
        if usage.is_empty() {
            return 0.0;
        }
        let avg = usage.iter().sum::<usize>() as f64 / usage.len() as f64;
        usage
            .iter()
            .map(|&u| u as f64)
            .filter(|&u| u > avg * OVERUSE_FACTOR || u > self.usage_cap as f64)
            .map(|u| u - avg)
            .sum()
    }

    fn gender(&self, a: &[Assignment]) -> f64 {
        let mut violations = 0u32;
        let mut shared: HashMap<(usize, usize, usize), (bool, bool)> = HashMap::new();
        for x in a {
            let required = self.snapshot.course(x.course).gender;
            if !required.is_restricted() {
                continue;
            }
            let place = self.snapshot.place(x.place).gender;
            if place.is_restricted() && place != required {
                violations += 1;
            }
            if self.snapshot.teacher(x.teacher).gender != required {
                violations += 1;
            }
            let seen = shared.entry((x.day, x.slot, x.place)).or_default();
            match required {
                Gender::A => seen.0 = true,
                Gender::B => seen.1 = true,
                Gender::None => {}
            }
        }
        violations += shared.values().filter(|&&(has_a, has_b)| has_a && has_b).count() as u32;
        violations as f64
    }
}

/// Spread between the most and least used places.
fn imbalance(usage: &[usize]) -> f64 {
    match (usage.iter().max(), usage.iter().min()) {
        (Some(max), Some(min)) => (max - min) as f64,
        _ => 0.0,
    }
}
