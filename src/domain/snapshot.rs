//! Immutable, index-resolved view of a [`DomainInput`].

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::{debug, warn};

use super::entities::{Constraint, Course, DomainInput, Place, PlaceRequirement, Teacher, TimeSlot};
use crate::error::TimetableError;

/// Per-course data derived once when the snapshot is built.
#[derive(Debug, Clone, Default)]
pub struct CourseProfile {
    /// Teacher indices, ascending.
    pub eligible_teachers: Vec<usize>,
    /// Place indices, ascending.
    pub eligible_places: Vec<usize>,
    /// Candidate positions of prerequisites; `None` if the code is unknown
    /// or the course is not schedulable.
    pub prerequisites: Vec<Option<usize>>,
    /// Candidate positions of corequisites, same rules as prerequisites.
    pub corequisites: Vec<Option<usize>>,
}

/// A [`Constraint`] with its references resolved to indices.
///
/// References are not validated: an unknown code resolves to `None` (or is
/// dropped from a course list) and simply never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedConstraint {
    PlaceMaintenance {
        place: Option<usize>,
        start: NaiveDate,
        end: NaiveDate,
    },
    ConcurrentCourses {
        /// Candidate positions of the listed, schedulable courses.
        positions: Vec<usize>,
        max_concurrent: usize,
    },
    SameTeacherGap {
        teacher: Option<usize>,
        min_hours: f64,
    },
}

/// Read-only problem data for one run.
///
/// Built once with [`DomainSnapshot::new`] and shared by every component.
/// Teachers, places, courses and slots are addressed by their position in
/// the input lists; candidate assignments store those indices.
#[derive(Debug, Clone)]
pub struct DomainSnapshot {
    places: Vec<Place>,
    teachers: Vec<Teacher>,
    courses: Vec<Course>,
    slots: Vec<TimeSlot>,
    days: Vec<String>,
    place_index: HashMap<String, usize>,
    teacher_index: HashMap<String, usize>,
    course_index: HashMap<String, usize>,
    slot_index: HashMap<u32, usize>,
    profiles: Vec<CourseProfile>,
    schedulable: Vec<usize>,
    positions: Vec<Option<usize>>,
    unschedulable: Vec<usize>,
    constraints: Vec<ResolvedConstraint>,
}

impl DomainSnapshot {
    /// Builds the snapshot and precomputes eligibility.
    ///
    /// Non-fixed courses with no eligible teacher or place are logged and
    /// left out of the schedulable list; they are not an error.
    pub fn new(input: DomainInput) -> Result<Self, TimetableError> {
        let DomainInput {
            places,
            teachers,
            courses,
            time_slots: slots,
            days,
            constraints,
        } = input;

        if slots.is_empty() {
            return Err(TimetableError::NoTimeSlots);
        }
        if days.is_empty() {
            return Err(TimetableError::NoDays);
        }

        let place_index = index_codes("place", places.iter().map(|p| p.code.as_str()))?;
        let teacher_index = index_codes("teacher", teachers.iter().map(|t| t.code.as_str()))?;
        let course_index = index_codes("course", courses.iter().map(|c| c.code.as_str()))?;
        let mut slot_index = HashMap::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            if slot_index.insert(slot.id, i).is_some() {
                return Err(TimetableError::DuplicateSlot(slot.id));
            }
        }

        // Eligibility
        let mut profiles = vec![CourseProfile::default(); courses.len()];
        let mut candidates = Vec::new();
        let mut unschedulable = Vec::new();
        for (ci, course) in courses.iter().enumerate() {
            if course.fixed {
                continue;
            }
            let profile = &mut profiles[ci];
            profile.eligible_teachers = eligible_teachers(course, &teachers, &teacher_index);
            profile.eligible_places = eligible_places(course, &places);

            if profile.eligible_teachers.is_empty() {
                warn!("course `{}` has no eligible teacher; it will not be scheduled", course.code);
            }
            if profile.eligible_places.is_empty() {
                warn!("course `{}` has no eligible place; it will not be scheduled", course.code);
            }
            if profile.eligible_teachers.is_empty() || profile.eligible_places.is_empty() {
                unschedulable.push(ci);
            } else {
                if profile.eligible_places.len() <= 2 {
                    debug!(
                        "course `{}` has only {} eligible place(s)",
                        course.code,
                        profile.eligible_places.len()
                    );
                }
                candidates.push(ci);
            }
        }

        // Hardest to place first; the sort is stable so input order breaks ties.
        candidates.sort_by_key(|&ci| profiles[ci].eligible_places.len());
        let schedulable = candidates;
        let mut positions = vec![None; courses.len()];
        for (pos, &ci) in schedulable.iter().enumerate() {
            positions[ci] = Some(pos);
        }

        let position_of_code =
            |code: &String| course_index.get(code).and_then(|&ci| positions[ci]);
        for &ci in &schedulable {
            let course = &courses[ci];
            let profile = &mut profiles[ci];
            profile.prerequisites = course.prerequisites.iter().map(position_of_code).collect();
            profile.corequisites = course.corequisites.iter().map(position_of_code).collect();
        }

        let constraints = constraints
            .into_iter()
            .map(|c| match c {
                Constraint::PlaceMaintenance {
                    place_code,
                    start_date,
                    end_date,
                } => ResolvedConstraint::PlaceMaintenance {
                    place: place_index.get(&place_code).copied(),
                    start: start_date,
                    end: end_date,
                },
                Constraint::ConcurrentCourses {
                    course_codes,
                    max_concurrent,
                } => {
                    let mut positions: Vec<usize> =
                        course_codes.iter().filter_map(position_of_code).collect();
                    positions.sort_unstable();
                    positions.dedup();
                    ResolvedConstraint::ConcurrentCourses {
                        positions,
                        max_concurrent,
                    }
                }
                Constraint::SameTeacherGap {
                    teacher_code,
                    min_hours_between,
                } => ResolvedConstraint::SameTeacherGap {
                    teacher: teacher_index.get(&teacher_code).copied(),
                    min_hours: min_hours_between,
                },
            })
            .collect();

        let fixed = courses.iter().filter(|c| c.fixed).count();
        debug!(
            "snapshot: {} schedulable, {} unschedulable, {} fixed course(s); {} teachers, {} places, {} slots x {} days",
            schedulable.len(),
            unschedulable.len(),
            fixed,
            teachers.len(),
            places.len(),
            slots.len(),
            days.len()
        );

        Ok(Self {
            places,
            teachers,
            courses,
            slots,
            days,
            place_index,
            teacher_index,
            course_index,
            slot_index,
            profiles,
            schedulable,
            positions,
            unschedulable,
            constraints,
        })
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn place(&self, index: usize) -> &Place {
        &self.places[index]
    }

    pub fn teacher(&self, index: usize) -> &Teacher {
        &self.teachers[index]
    }

    pub fn course(&self, index: usize) -> &Course {
        &self.courses[index]
    }

    pub fn slot(&self, index: usize) -> &TimeSlot {
        &self.slots[index]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn place_by_code(&self, code: &str) -> Option<usize> {
        self.place_index.get(code).copied()
    }

    pub fn teacher_by_code(&self, code: &str) -> Option<usize> {
        self.teacher_index.get(code).copied()
    }

    pub fn course_by_code(&self, code: &str) -> Option<usize> {
        self.course_index.get(code).copied()
    }

    pub fn slot_by_id(&self, id: u32) -> Option<usize> {
        self.slot_index.get(&id).copied()
    }

    /// Course indices in candidate position order.
    pub fn schedulable(&self) -> &[usize] {
        &self.schedulable
    }

    /// Non-fixed courses left out for lack of an eligible teacher or place.
    pub fn unschedulable(&self) -> &[usize] {
        &self.unschedulable
    }

    /// Candidate position of a course, if it is schedulable.
    pub fn position_of(&self, course: usize) -> Option<usize> {
        self.positions.get(course).copied().flatten()
    }

    pub fn profile(&self, course: usize) -> &CourseProfile {
        &self.profiles[course]
    }

    pub fn eligible_teachers(&self, course: usize) -> &[usize] {
        &self.profiles[course].eligible_teachers
    }

    pub fn eligible_places(&self, course: usize) -> &[usize] {
        &self.profiles[course].eligible_places
    }

    pub fn constraints(&self) -> &[ResolvedConstraint] {
        &self.constraints
    }
}

fn index_codes<'a>(
    kind: &'static str,
    codes: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>, TimetableError> {
    let mut index = HashMap::new();
    for (i, code) in codes.enumerate() {
        if index.insert(code.to_string(), i).is_some() {
            return Err(TimetableError::DuplicateCode {
                kind,
                code: code.to_string(),
            });
        }
    }
    Ok(index)
}

/// Teachers listed by the course or listing the course, whose gender
/// satisfies the course requirement.
fn eligible_teachers(
    course: &Course,
    teachers: &[Teacher],
    teacher_index: &HashMap<String, usize>,
) -> Vec<usize> {
    let mut set: HashSet<usize> = course
        .teachers
        .iter()
        .filter_map(|code| teacher_index.get(code).copied())
        .collect();
    set.extend(
        teachers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.courses.iter().any(|c| *c == course.code))
            .map(|(i, _)| i),
    );

    let mut eligible: Vec<usize> = set
        .into_iter()
        .filter(|&i| !course.gender.is_restricted() || teachers[i].gender == course.gender)
        .collect();
    eligible.sort_unstable();
    eligible
}

fn eligible_places(course: &Course, places: &[Place]) -> Vec<usize> {
    places
        .iter()
        .enumerate()
        .filter(|(_, p)| match &course.place {
            PlaceRequirement::Any => true,
            PlaceRequirement::Type(kind) => p.kind == *kind,
            PlaceRequirement::Places(codes) => codes.iter().any(|c| *c == p.code),
        })
        .filter(|(_, p)| p.available && course.gender.compatible_with(p.gender))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, Place, TimeSlot};

    fn base_input() -> DomainInput {
        DomainInput {
            places: vec![
                Place::new("R1", 40).with_kind("theory"),
                Place::new("R2", 20).with_kind("theory").with_gender(Gender::B),
                Place::new("GYM", 60).with_kind("hall"),
                Place::new("OLD", 60).with_kind("theory").with_available(false),
            ],
            teachers: vec![
                Teacher::new("TA", Gender::B).with_courses(["C1", "C2"]),
                Teacher::new("TB", Gender::A).with_courses(["C2", "C3"]),
            ],
            courses: vec![
                Course::new("C1", 3)
                    .with_gender(Gender::B)
                    .with_place(PlaceRequirement::Type("theory".into())),
                Course::new("C2", 2).with_place(PlaceRequirement::Type("hall".into())),
                Course::new("C3", 2)
                    .with_gender(Gender::A)
                    .with_place(PlaceRequirement::Places(vec!["R1".into(), "R2".into()]))
                    .with_prerequisites(["C2", "NOPE"]),
            ],
            time_slots: vec![TimeSlot::hm(1, (8, 0), (10, 0)), TimeSlot::hm(2, (10, 0), (12, 0))],
            days: vec!["Sat".into(), "Sun".into()],
            constraints: vec![],
        }
    }

    #[test]
    fn test_eligible_teachers_respect_gender() {
        let snap = DomainSnapshot::new(base_input()).unwrap();
        let c1 = snap.course_by_code("C1").unwrap();
        let c2 = snap.course_by_code("C2").unwrap();
        // C1 requires B: only TA
        assert_eq!(snap.eligible_teachers(c1), &[0]);
        // C2 is open: both
        assert_eq!(snap.eligible_teachers(c2), &[0, 1]);
    }

    #[test]
    fn test_course_side_teacher_list_counts() {
        let mut input = base_input();
        input.courses[1].teachers = vec!["TB".into()];
        input.teachers[1].courses.clear();
        let snap = DomainSnapshot::new(input).unwrap();
        assert_eq!(snap.eligible_teachers(snap.course_by_code("C2").unwrap()), &[0, 1]);
    }

    #[test]
    fn test_eligible_places_filters() {
        let snap = DomainSnapshot::new(base_input()).unwrap();
        // C1: theory, gender B -> R1 (open) and R2 (B); OLD unavailable
        assert_eq!(snap.eligible_places(snap.course_by_code("C1").unwrap()), &[0, 1]);
        // C2: hall
        assert_eq!(snap.eligible_places(snap.course_by_code("C2").unwrap()), &[2]);
        // C3: explicit list, gender A excludes R2
        assert_eq!(snap.eligible_places(snap.course_by_code("C3").unwrap()), &[0]);
    }

    #[test]
    fn test_schedulable_order_hardest_first() {
        let snap = DomainSnapshot::new(base_input()).unwrap();
        let codes: Vec<&str> = snap
            .schedulable()
            .iter()
            .map(|&c| snap.course(c).code.as_str())
            .collect();
        assert_eq!(codes, vec!["C2", "C3", "C1"]);
        assert_eq!(snap.position_of(snap.course_by_code("C1").unwrap()), Some(2));
    }

    #[test]
    fn test_unschedulable_and_fixed_are_excluded() {
        let mut input = base_input();
        input.courses.push(Course::new("ORPHAN", 1));
        input.courses.push(Course::new("FIX", 1).with_fixed(true).with_teachers(["TA"]));
        let snap = DomainSnapshot::new(input).unwrap();

        assert_eq!(snap.schedulable().len(), 3);
        let orphan = snap.course_by_code("ORPHAN").unwrap();
        assert_eq!(snap.unschedulable(), &[orphan]);
        assert_eq!(snap.position_of(snap.course_by_code("FIX").unwrap()), None);
    }

    #[test]
    fn test_unknown_prerequisite_resolves_to_none() {
        let snap = DomainSnapshot::new(base_input()).unwrap();
        let c3 = snap.course_by_code("C3").unwrap();
        let c2_pos = snap.position_of(snap.course_by_code("C2").unwrap());
        assert_eq!(snap.profile(c3).prerequisites, vec![c2_pos, None]);
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let mut input = base_input();
        input.places.push(Place::new("R1", 10));
        assert_eq!(
            DomainSnapshot::new(input).unwrap_err(),
            TimetableError::DuplicateCode {
                kind: "place",
                code: "R1".into()
            }
        );

        let mut input = base_input();
        input.time_slots.push(TimeSlot::hm(2, (14, 0), (16, 0)));
        assert_eq!(
            DomainSnapshot::new(input).unwrap_err(),
            TimetableError::DuplicateSlot(2)
        );
    }

    #[test]
    fn test_empty_calendar_rejected() {
        let mut input = base_input();
        input.days.clear();
        assert_eq!(DomainSnapshot::new(input).unwrap_err(), TimetableError::NoDays);
    }

    #[test]
    fn test_constraints_resolved() {
        let mut input = base_input();
        input.constraints = vec![
            Constraint::ConcurrentCourses {
                course_codes: vec!["C1".into(), "GHOST".into(), "C1".into()],
                max_concurrent: 1,
            },
            Constraint::SameTeacherGap {
                teacher_code: "NOBODY".into(),
                min_hours_between: 2.0,
            },
        ];
        let snap = DomainSnapshot::new(input).unwrap();
        assert_eq!(
            snap.constraints()[0],
            ResolvedConstraint::ConcurrentCourses {
                positions: vec![2],
                max_concurrent: 1
            }
        );
        assert_eq!(
            snap.constraints()[1],
            ResolvedConstraint::SameTeacherGap {
                teacher: None,
                min_hours: 2.0
            }
        );
    }
}
