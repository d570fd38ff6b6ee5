//! Typed input records.
//!
//! These are what an external loader produces. All of them deserialize
//! with serde; the concrete document format is the loader's business.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Gender requirement of a course, restriction of a place, or gender of a
/// teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// No requirement / unrestricted.
    #[default]
    None,
    A,
    B,
}

impl Gender {
    /// Whether a requirement is actually set.
    pub fn is_restricted(self) -> bool {
        self != Gender::None
    }

    /// Two requirements are compatible when either is unrestricted or
    /// both are equal.
    pub fn compatible_with(self, other: Gender) -> bool {
        self == Gender::None || other == Gender::None || self == other
    }
}

/// Where a course may be held.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum PlaceRequirement {
    /// Any available place.
    #[default]
    Any,
    /// Places of the given type.
    Type(String),
    /// An explicit list of place codes.
    Places(Vec<String>),
}

fn default_enrollment() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

/// A course to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub units: u32,
    #[serde(default = "default_enrollment")]
    pub expected_students: u32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub place: PlaceRequirement,
    /// Teacher codes the course lists as eligible.
    #[serde(default)]
    pub teachers: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub corequisites: Vec<String>,
    /// Fixed courses are not optimized and never appear in a candidate.
    #[serde(default)]
    pub fixed: bool,
}

impl Course {
    /// Creates a course with defaults for everything but code and units.
    pub fn new(code: impl Into<String>, units: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            units,
            expected_students: default_enrollment(),
            gender: Gender::None,
            place: PlaceRequirement::Any,
            teachers: Vec::new(),
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
            fixed: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_students(mut self, n: u32) -> Self {
        self.expected_students = n;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_place(mut self, place: PlaceRequirement) -> Self {
        self.place = place;
        self
    }

    pub fn with_teachers<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teachers = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prerequisites<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_corequisites<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.corequisites = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }
}

/// A teacher and their load bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub min_units: u32,
    #[serde(default = "max_units_default")]
    pub max_units: u32,
    /// Course codes this teacher may teach.
    #[serde(default)]
    pub courses: Vec<String>,
}

fn max_units_default() -> u32 {
    u32::MAX
}

impl Teacher {
    pub fn new(code: impl Into<String>, gender: Gender) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            gender,
            min_units: 0,
            max_units: max_units_default(),
            courses: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_units(mut self, min: u32, max: u32) -> Self {
        self.min_units = min;
        self.max_units = max;
        self
    }

    pub fn with_courses<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses = codes.into_iter().map(Into::into).collect();
        self
    }
}

/// A room or hall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub capacity: u32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl Place {
    pub fn new(code: impl Into<String>, capacity: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            kind: String::new(),
            capacity,
            gender: Gender::None,
            available: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

/// A teaching period within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: u32,
    #[serde(with = "clock")]
    pub start: NaiveTime,
    #[serde(with = "clock")]
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(id: u32, start: NaiveTime, end: NaiveTime) -> Self {
        Self { id, start, end }
    }

    /// Builds a slot from `(hour, minute)` pairs.
    ///
    /// # Panics
    /// Panics if either pair is not a valid time of day.
    pub fn hm(id: u32, start: (u32, u32), end: (u32, u32)) -> Self {
        let at = |(h, m): (u32, u32)| {
            NaiveTime::from_hms_opt(h, m, 0).expect("valid time of day")
        };
        Self::new(id, at(start), at(end))
    }
}

/// Additional scheduling rules, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// The place cannot be used between the two dates (inclusive).
    PlaceMaintenance {
        place_code: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// At most `max_concurrent` of the listed courses may share a
    /// (day, slot).
    ConcurrentCourses {
        course_codes: Vec<String>,
        max_concurrent: usize,
    },
    /// Same-day classes of the teacher must start at least
    /// `min_hours_between` hours apart.
    #[serde(rename = "same_teacher_courses")]
    SameTeacherGap {
        teacher_code: String,
        min_hours_between: f64,
    },
}

/// Everything the optimizer needs to know about the problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainInput {
    pub places: Vec<Place>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub time_slots: Vec<TimeSlot>,
    /// Day labels, in week order.
    pub days: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

/// `HH:MM` / `HH:MM:SS` times of day.
mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_compatibility() {
        assert!(Gender::None.compatible_with(Gender::A));
        assert!(Gender::B.compatible_with(Gender::None));
        assert!(Gender::A.compatible_with(Gender::A));
        assert!(!Gender::A.compatible_with(Gender::B));
    }

    #[test]
    fn test_domain_input_from_json() {
        let json = r#"{
            "places": [{"code": "R1", "type": "theory", "capacity": 40, "gender": "b"}],
            "teachers": [{"code": "T1", "gender": "a", "min_units": 2, "max_units": 12, "courses": ["C1"]}],
            "courses": [{"code": "C1", "units": 3, "place": {"kind": "type", "value": "theory"}}],
            "time_slots": [{"id": 1, "start": "08:00", "end": "09:30"}],
            "days": ["Sat", "Sun"],
            "constraints": [
                {"type": "place_maintenance", "place_code": "R1", "start_date": "2024-04-02", "end_date": "2024-04-03"},
                {"type": "concurrent_courses", "course_codes": ["C1"], "max_concurrent": 1},
                {"type": "same_teacher_courses", "teacher_code": "T1", "min_hours_between": 2.0}
            ]
        }"#;
        let input: DomainInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.places[0].gender, Gender::B);
        assert!(input.places[0].available);
        assert_eq!(input.courses[0].expected_students, 30);
        assert_eq!(input.courses[0].place, PlaceRequirement::Type("theory".into()));
        assert_eq!(input.time_slots[0].start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(input.constraints.len(), 3);
        assert!(matches!(
            input.constraints[2],
            Constraint::SameTeacherGap { min_hours_between, .. } if min_hours_between == 2.0
        ));
    }

    #[test]
    fn test_slot_accepts_seconds() {
        let slot: TimeSlot =
            serde_json::from_str(r#"{"id": 4, "start": "13:15:00", "end": "14:45"}"#).unwrap();
        assert_eq!(slot, TimeSlot::hm(4, (13, 15), (14, 45)));
    }
}
