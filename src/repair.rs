//! Feasibility repair.
//!
//! Two steps, in order:
//!
//! 1. **Gender**: a teacher whose gender differs from the course
//!    requirement is redrawn among eligible teachers of that gender; a
//!    place whose restriction conflicts is redrawn with the usage-weighted
//!    draw.
//! 2. **Double-bookings**: a teacher pass, then a place pass. Each pass
//!    groups assignments by (resource, day, slot) and relocates every
//!    occurrence after the first to a (slot, day) free for both its
//!    teacher and its place, moving it to another eligible place when its
//!    own place has no free pair.
//!
//! Repair never fails. A conflict it cannot resolve stays in the candidate
//! and is priced by the evaluator.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::candidate::{Assignment, Candidate};
use crate::error::ConfigError;
use crate::sampler::{PlaceUsage, Sampler};

/// Repair parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// (slot, day) pairs tried per relocation.
    pub relocation_attempts: usize,
    /// Place redraws after a relocation fails.
    pub place_retries: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            relocation_attempts: 50,
            place_retries: 2,
        }
    }
}

impl RepairConfig {
    pub fn with_relocation_attempts(mut self, n: usize) -> Self {
        self.relocation_attempts = n;
        self
    }

    pub fn with_place_retries(mut self, n: usize) -> Self {
        self.place_retries = n;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relocation_attempts == 0 {
            return Err(ConfigError::ZeroRelocationAttempts);
        }
        Ok(())
    }
}

/// What one repair call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Teacher or place redraws made for gender reasons.
    pub gender_fixes: usize,
    /// Assignments moved to another (slot, day).
    pub relocations: usize,
    /// Occurrences that could not be relocated.
    pub unresolved: usize,
}

#[derive(Clone, Copy)]
enum Resource {
    Teacher,
    Place,
}

/// Occupancy counts per (teacher, day, slot) and (place, day, slot).
struct Occupancy {
    teachers: Vec<u32>,
    places: Vec<u32>,
    slots: usize,
    cells: usize,
}

impl Occupancy {
    fn new(
        candidate: &Candidate,
        teachers: usize,
        places: usize,
        slots: usize,
        days: usize,
    ) -> Self {
        let cells = slots * days;
        let mut occupancy = Self {
            teachers: vec![0; teachers * cells],
            places: vec![0; places * cells],
            slots,
            cells,
        };
        for a in &candidate.assignments {
            occupancy.insert(a);
        }
        occupancy
    }

    fn cell(&self, day: usize, slot: usize) -> usize {
        day * self.slots + slot
    }

    fn insert(&mut self, a: &Assignment) {
        let cell = self.cell(a.day, a.slot);
        self.teachers[a.teacher * self.cells + cell] += 1;
        self.places[a.place * self.cells + cell] += 1;
    }

    fn remove(&mut self, a: &Assignment) {
        let cell = self.cell(a.day, a.slot);
        let t = &mut self.teachers[a.teacher * self.cells + cell];
        *t = t.saturating_sub(1);
        let p = &mut self.places[a.place * self.cells + cell];
        *p = p.saturating_sub(1);
    }

    fn is_free(&self, teacher: usize, place: usize, day: usize, slot: usize) -> bool {
        let cell = self.cell(day, slot);
        self.teachers[teacher * self.cells + cell] == 0
            && self.places[place * self.cells + cell] == 0
    }
}

/// Applies the repair steps to candidates of one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Repairer<'a> {
    sampler: Sampler<'a>,
    config: RepairConfig,
}

impl<'a> Repairer<'a> {
    pub fn new(sampler: Sampler<'a>, config: RepairConfig) -> Self {
        Self { sampler, config }
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Repairs `candidate` in place. The stored cost is left untouched;
    /// callers re-evaluate afterwards.
    pub fn repair<R: Rng>(&self, candidate: &mut Candidate, rng: &mut R) -> RepairStats {
        let snapshot = self.sampler.snapshot();
        let mut usage = PlaceUsage::of(candidate, snapshot.places().len());
        let mut stats = RepairStats::default();

        for a in candidate.assignments.iter_mut() {
            stats.gender_fixes += self.fix_gender(a, &mut usage, rng);
        }

        let mut occupancy = Occupancy::new(
            candidate,
            snapshot.teachers().len(),
            snapshot.places().len(),
            snapshot.slot_count(),
            snapshot.day_count(),
        );
        for resource in [Resource::Teacher, Resource::Place] {
            for index in duplicate_occurrences(candidate, resource) {
                if self.relocate(candidate, index, &mut occupancy, &mut usage, rng) {
                    stats.relocations += 1;
                } else {
                    stats.unresolved += 1;
                }
            }
        }
        stats
    }

    fn fix_gender<R: Rng>(&self, a: &mut Assignment, usage: &mut PlaceUsage, rng: &mut R) -> usize {
        let snapshot = self.sampler.snapshot();
        let required = snapshot.course(a.course).gender;
        if !required.is_restricted() {
            return 0;
        }

        let mut fixes = 0;
        if snapshot.teacher(a.teacher).gender != required {
            let suitable: Vec<usize> = snapshot
                .eligible_teachers(a.course)
                .iter()
                .copied()
                .filter(|&t| snapshot.teacher(t).gender == required)
                .collect();
            if !suitable.is_empty() {
                a.teacher = suitable[rng.random_range(0..suitable.len())];
                fixes += 1;
            }
        }
        if !required.compatible_with(snapshot.place(a.place).gender)
            && !snapshot.eligible_places(a.course).is_empty()
        {
            let place = self.sampler.draw_place(a.course, usage, rng);
            usage.transfer(a.place, place);
            a.place = place;
            fixes += 1;
        }
        fixes
    }

    /// Moves the assignment at `index` to a free (slot, day), switching to a
    /// different eligible place between rounds. Restores the original
    /// assignment on failure.
    fn relocate<R: Rng>(
        &self,
        candidate: &mut Candidate,
        index: usize,
        occupancy: &mut Occupancy,
        usage: &mut PlaceUsage,
        rng: &mut R,
    ) -> bool {
        let snapshot = self.sampler.snapshot();
        let original = candidate.assignments[index];
        occupancy.remove(&original);

        let mut pairs: Vec<(usize, usize)> = (0..snapshot.slot_count())
            .flat_map(|s| (0..snapshot.day_count()).map(move |d| (s, d)))
            .collect();
        let mut current = original;

        for round in 0..=self.config.place_retries {
            if round > 0 {
                let place = self
                    .sampler
                    .draw_other_place(current.course, current.place, usage, rng);
                usage.transfer(current.place, place);
                current.place = place;
            }
            pairs.shuffle(rng);
            let free = pairs
                .iter()
                .take(self.config.relocation_attempts)
                .find(|&&(s, d)| occupancy.is_free(current.teacher, current.place, d, s));
            if let Some(&(slot, day)) = free {
                current.slot = slot;
                current.day = day;
                occupancy.insert(&current);
                candidate.assignments[index] = current;
                return true;
            }
        }

        usage.transfer(current.place, original.place);
        occupancy.insert(&original);
        false
    }
}

/// Indices of every occurrence after the first in each (resource, day,
/// slot) group, in candidate order.
fn duplicate_occurrences(candidate: &Candidate, resource: Resource) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    candidate
        .assignments
        .iter()
        .enumerate()
        .filter(|(_, a)| {
            let key = match resource {
                Resource::Teacher => a.teacher,
                Resource::Place => a.place,
            };
            !seen.insert((key, a.day, a.slot))
        })
        .map(|(i, _)| i)
        .collect()
}
