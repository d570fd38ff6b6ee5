//! Timetable representation.
//!
//! A [`Candidate`] holds one [`Assignment`] per schedulable course, stored at
//! the course's position in [`DomainSnapshot::schedulable`]. Positions are
//! the same in every candidate of a run, which is what lets migration copy
//! "the same feature" between candidates.
//!
//! Assignments are plain `Copy` values, so cloning a candidate is always a
//! deep copy.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::DomainSnapshot;
use crate::error::TimetableError;

/// One course's resolved (teacher, place, slot, day).
///
/// All fields are indices into the snapshot. `slot` and `day` are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub course: usize,
    pub teacher: usize,
    pub place: usize,
    pub slot: usize,
    pub day: usize,
}

impl Assignment {
    /// `(day, slot)` key.
    #[inline]
    pub fn time(&self) -> (usize, usize) {
        (self.day, self.slot)
    }
}

/// Code-based form of an [`Assignment`], for persisters and report writers.
///
/// `day` is 1-based, `slot_id` is the [`TimeSlot`](crate::domain::TimeSlot)
/// id rather than its index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub course_code: String,
    pub teacher_code: String,
    pub place_code: String,
    pub slot_id: u32,
    pub day: usize,
}

/// A complete proposed timetable.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub assignments: Vec<Assignment>,
    /// Weighted violation cost; `f64::INFINITY` until evaluated.
    pub cost: f64,
    /// Rank-derived value used by the migration strategy.
    pub species_count: usize,
}

impl Candidate {
    /// Creates an unevaluated candidate.
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments,
            cost: f64::INFINITY,
            species_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of assignments per place index.
    pub fn place_usage(&self, place_count: usize) -> Vec<usize> {
        let mut usage = vec![0; place_count];
        for a in &self.assignments {
            usage[a.place] += 1;
        }
        usage
    }

    /// Exports the assignments as code-based records.
    pub fn to_records(&self, snapshot: &DomainSnapshot) -> Vec<AssignmentRecord> {
        self.assignments
            .iter()
            .map(|a| AssignmentRecord {
                course_code: snapshot.course(a.course).code.clone(),
                teacher_code: snapshot.teacher(a.teacher).code.clone(),
                place_code: snapshot.place(a.place).code.clone(),
                slot_id: snapshot.slot(a.slot).id,
                day: a.day + 1,
            })
            .collect()
    }

    /// Rebuilds a candidate from records, in any order.
    ///
    /// Every schedulable course must appear exactly once. The result is
    /// unevaluated.
    pub fn from_records(
        snapshot: &DomainSnapshot,
        records: &[AssignmentRecord],
    ) -> Result<Self, TimetableError> {
        let mut slots: Vec<Option<Assignment>> = vec![None; snapshot.schedulable().len()];

        for r in records {
            let course = snapshot
                .course_by_code(&r.course_code)
                .ok_or_else(|| unknown("course", &r.course_code))?;
            let position = snapshot
                .position_of(course)
                .ok_or_else(|| TimetableError::NotSchedulable(r.course_code.clone()))?;
            let teacher = snapshot
                .teacher_by_code(&r.teacher_code)
                .ok_or_else(|| unknown("teacher", &r.teacher_code))?;
            let place = snapshot
                .place_by_code(&r.place_code)
                .ok_or_else(|| unknown("place", &r.place_code))?;
            let slot = snapshot
                .slot_by_id(r.slot_id)
                .ok_or_else(|| unknown("time slot", &r.slot_id.to_string()))?;
            if r.day == 0 || r.day > snapshot.day_count() {
                return Err(TimetableError::DayOutOfRange {
                    day: r.day,
                    days: snapshot.day_count(),
                });
            }

            let entry = &mut slots[position];
            if entry.is_some() {
                return Err(TimetableError::RepeatedCourse(r.course_code.clone()));
            }
            *entry = Some(Assignment {
                course,
                teacher,
                place,
                slot,
                day: r.day - 1,
            });
        }

        let assignments = slots
            .into_iter()
            .enumerate()
            .map(|(pos, a)| {
                a.ok_or_else(|| {
                    let code = &snapshot.course(snapshot.schedulable()[pos]).code;
                    TimetableError::MissingCourse(code.clone())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(assignments))
    }
}

fn unknown(kind: &'static str, code: &str) -> TimetableError {
    TimetableError::UnknownCode {
        kind,
        code: code.to_string(),
    }
}

/// Ascending cost order; NaN compares equal.
pub fn by_cost(a: &Candidate, b: &Candidate) -> Ordering {
    a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal)
}

/// Sorts a population best-first.
pub fn rank_population(population: &mut [Candidate]) {
    population.sort_by(by_cost);
}
