//! Structured schedule summary.
//!
//! [`ScheduleReport`] is the data a report writer needs: rows in calendar
//! order, per-category violations, per-teacher and per-place load, and the
//! explicit double-booking groups. Formatting is left to the writer.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::Serialize;

use crate::candidate::{Assignment, Candidate};
use crate::cost::{CostEvaluator, ViolationCategory};
use crate::domain::{DomainSnapshot, Gender};

/// One scheduled course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    /// 1-based day index.
    pub day: usize,
    pub day_label: String,
    pub slot_id: u32,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub course_code: String,
    pub course_name: String,
    pub teacher_code: String,
    pub teacher_name: String,
    pub place_code: String,
    pub place_name: String,
    pub place_capacity: u32,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationLine {
    pub category: ViolationCategory,
    pub label: &'static str,
    /// Unweighted magnitude.
    pub magnitude: f64,
    /// Contribution to the total cost.
    pub weighted: f64,
}

/// Number of assignments of one teacher or place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Load {
    pub code: String,
    pub name: String,
    pub count: usize,
}

/// Courses sharing one teacher or place at the same (day, slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictGroup {
    pub resource_code: String,
    /// 1-based day index.
    pub day: usize,
    pub slot_id: u32,
    pub course_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub total_cost: f64,
    /// Sorted by day, then slot start time.
    pub rows: Vec<ScheduleRow>,
    /// Only the categories with a non-zero magnitude, in category order.
    pub violations: Vec<ViolationLine>,
    /// Most loaded first; ties by code.
    pub teacher_loads: Vec<Load>,
    pub place_loads: Vec<Load>,
    pub teacher_conflicts: Vec<ConflictGroup>,
    pub place_conflicts: Vec<ConflictGroup>,
    /// Codes of non-fixed courses that could not be scheduled at all.
    pub unschedulable: Vec<String>,
}

impl ScheduleReport {
    pub fn build(
        snapshot: &DomainSnapshot,
        candidate: &Candidate,
        evaluator: &CostEvaluator<'_>,
    ) -> Self {
        let breakdown = evaluator.breakdown(candidate);
        let weights = evaluator.weights();

        let mut rows: Vec<ScheduleRow> = candidate
            .assignments
            .iter()
            .map(|a| row(snapshot, a))
            .collect();
        rows.sort_by(|x, y| (x.day, x.start).cmp(&(y.day, y.start)));

        let violations = breakdown
            .violated()
            .map(|(category, magnitude)| ViolationLine {
                category,
                label: category.label(),
                magnitude,
                weighted: breakdown.weighted(category, weights),
            })
            .collect();

        let teacher_loads = loads(candidate, |a| a.teacher, |t| {
            let teacher = snapshot.teacher(t);
            (teacher.code.clone(), teacher.name.clone())
        });
        let place_loads = loads(candidate, |a| a.place, |p| {
            let place = snapshot.place(p);
            (place.code.clone(), place.name.clone())
        });

        Self {
            total_cost: breakdown.total(weights),
            rows,
            violations,
            teacher_loads,
            place_loads,
            teacher_conflicts: conflicts(snapshot, candidate, |a| a.teacher, |t| {
                snapshot.teacher(t).code.clone()
            }),
            place_conflicts: conflicts(snapshot, candidate, |a| a.place, |p| {
                snapshot.place(p).code.clone()
            }),
            unschedulable: snapshot
                .unschedulable()
                .iter()
                .map(|&c| snapshot.course(c).code.clone())
                .collect(),
        }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.teacher_conflicts.is_empty() || !self.place_conflicts.is_empty()
    }
}

fn row(snapshot: &DomainSnapshot, a: &Assignment) -> ScheduleRow {
    let course = snapshot.course(a.course);
    let teacher = snapshot.teacher(a.teacher);
    let place = snapshot.place(a.place);
    let slot = snapshot.slot(a.slot);
    ScheduleRow {
        day: a.day + 1,
        day_label: snapshot.days()[a.day].clone(),
        slot_id: slot.id,
        start: slot.start,
        end: slot.end,
        course_code: course.code.clone(),
        course_name: course.name.clone(),
        teacher_code: teacher.code.clone(),
        teacher_name: teacher.name.clone(),
        place_code: place.code.clone(),
        place_name: place.name.clone(),
        place_capacity: place.capacity,
        gender: course.gender,
    }
}

fn loads(
    candidate: &Candidate,
    key: impl Fn(&Assignment) -> usize,
    describe: impl Fn(usize) -> (String, String),
) -> Vec<Load> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for a in &candidate.assignments {
        *counts.entry(key(a)).or_default() += 1;
    }
    let mut loads: Vec<Load> = counts
        .into_iter()
        .map(|(index, count)| {
            let (code, name) = describe(index);
            Load { code, name, count }
        })
        .collect();
    loads.sort_by(|x, y| y.count.cmp(&x.count).then_with(|| x.code.cmp(&y.code)));
    loads
}

fn conflicts(
    snapshot: &DomainSnapshot,
    candidate: &Candidate,
    key: impl Fn(&Assignment) -> usize,
    code: impl Fn(usize) -> String,
) -> Vec<ConflictGroup> {
    let mut groups: BTreeMap<(usize, usize, usize), Vec<String>> = BTreeMap::new();
    for a in &candidate.assignments {
        groups
            .entry((key(a), a.day, a.slot))
            .or_default()
            .push(snapshot.course(a.course).code.clone());
    }
    let mut out: Vec<ConflictGroup> = groups
        .into_iter()
        .filter(|(_, courses)| courses.len() > 1)
        .map(|((resource, day, slot), course_codes)| ConflictGroup {
            resource_code: code(resource),
            day: day + 1,
            slot_id: snapshot.slot(slot).id,
            course_codes,
        })
        .collect();
    out.sort_by(|x, y| {
        (&x.resource_code, x.day, x.slot_id).cmp(&(&y.resource_code, y.day, y.slot_id))
    });
    out
}
