//! Shared test scenarios.

use crate::candidate::{Assignment, Candidate};
use crate::domain::{
    Constraint, Course, DomainInput, DomainSnapshot, Gender, Place, PlaceRequirement, Teacher,
    TimeSlot,
};
use crate::random::create_rng;
use crate::sampler::{PlaceUsage, Sampler};

/// Three courses, two teachers, two rooms, four slots, five days.
///
/// C1 requires gender B and only TA qualifies. R2 is restricted to B and
/// seats 20.
pub fn scenario_input() -> DomainInput {
    DomainInput {
        places: vec![
            Place::new("R1", 40).with_kind("theory"),
            Place::new("R2", 20).with_kind("theory").with_gender(Gender::B),
        ],
        teachers: vec![
            Teacher::new("TA", Gender::B).with_courses(["C1", "C2"]),
            Teacher::new("TB", Gender::A).with_courses(["C2", "C3"]),
        ],
        courses: vec![
            Course::new("C1", 3).with_gender(Gender::B),
            Course::new("C2", 2),
            Course::new("C3", 2),
        ],
        time_slots: vec![
            TimeSlot::hm(1, (8, 0), (10, 0)),
            TimeSlot::hm(2, (10, 0), (12, 0)),
            TimeSlot::hm(3, (13, 0), (15, 0)),
            TimeSlot::hm(4, (15, 0), (17, 0)),
        ],
        days: ["Sat", "Sun", "Mon", "Tue", "Wed"]
            .into_iter()
            .map(String::from)
            .collect(),
        constraints: vec![],
    }
}

pub fn scenario() -> DomainSnapshot {
    DomainSnapshot::new(scenario_input()).unwrap()
}

/// A larger instance exercising every constraint kind.
pub fn constrained_input() -> DomainInput {
    let places = vec![
        Place::new("R1", 40),
        Place::new("R2", 25).with_gender(Gender::B),
        Place::new("R3", 60),
        Place::new("LAB", 20).with_kind("lab"),
    ];

    let teachers = vec![
        Teacher::new("TA", Gender::B)
            .with_courses(["C1", "C2", "C5"])
            .with_units(2, 8),
        Teacher::new("TB", Gender::A)
            .with_courses(["C2", "C3", "C4"])
            .with_units(2, 8),
        Teacher::new("TC", Gender::A)
            .with_courses(["C4", "C5", "C6"])
            .with_units(0, 6),
    ];

    let courses = vec![
        Course::new("C1", 3).with_gender(Gender::B),
        Course::new("C2", 2).with_prerequisites(["C1"]),
        Course::new("C3", 2).with_students(45),
        Course::new("C4", 1)
            .with_place(PlaceRequirement::Type("lab".into()))
            .with_students(15)
            .with_corequisites(["C3"]),
        Course::new("C5", 2),
        Course::new("C6", 3).with_prerequisites(["C4", "GONE"]),
    ];

    DomainInput {
        places,
        teachers,
        courses,
        time_slots: vec![
            TimeSlot::hm(1, (8, 0), (9, 30)),
            TimeSlot::hm(2, (9, 30), (11, 0)),
            TimeSlot::hm(3, (11, 0), (12, 30)),
            TimeSlot::hm(4, (14, 0), (15, 30)),
        ],
        days: ["Sat", "Sun", "Mon", "Tue", "Wed"]
            .into_iter()
            .map(String::from)
            .collect(),
        constraints: vec![
            Constraint::PlaceMaintenance {
                place_code: "R3".into(),
                start_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
            },
            Constraint::ConcurrentCourses {
                course_codes: vec!["C2".into(), "C3".into(), "C5".into()],
                max_concurrent: 1,
            },
            Constraint::SameTeacherGap {
                teacher_code: "TA".into(),
                min_hours_between: 3.0,
            },
        ],
    }
}

pub fn constrained() -> DomainSnapshot {
    DomainSnapshot::new(constrained_input()).unwrap()
}

/// Deterministic candidate: first eligible teacher and place, course `i`
/// at day `i % days` and slot `i % slots`.
pub fn spread_candidate(snapshot: &DomainSnapshot) -> Candidate {
    let assignments = snapshot
        .schedulable()
        .iter()
        .enumerate()
        .map(|(i, &course)| Assignment {
            course,
            teacher: snapshot.eligible_teachers(course)[0],
            place: snapshot.eligible_places(course)[0],
            slot: i % snapshot.slot_count(),
            day: i % snapshot.day_count(),
        })
        .collect();
    Candidate::new(assignments)
}

/// Unrepaired random candidate.
pub fn random_candidate(snapshot: &DomainSnapshot, seed: u64) -> Candidate {
    let mut rng = create_rng(seed);
    let sampler = Sampler::new(snapshot, 5);
    let mut usage = PlaceUsage::empty(snapshot.places().len());
    let assignments = snapshot
        .schedulable()
        .iter()
        .map(|&course| sampler.assign(course, &mut usage, &mut rng))
        .collect();
    Candidate::new(assignments)
}
