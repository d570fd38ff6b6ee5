//! Violation categories and their weights.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, ConfigError};

/// The twelve independently weighted cost terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    TeacherConflict,
    PlaceConflict,
    Workload,
    Capacity,
    Prerequisite,
    Corequisite,
    Maintenance,
    Concurrent,
    TeacherGap,
    PlaceImbalance,
    PlaceOveruse,
    GenderMismatch,
}

impl ViolationCategory {
    pub const COUNT: usize = 12;

    pub const ALL: [ViolationCategory; Self::COUNT] = [
        Self::TeacherConflict,
        Self::PlaceConflict,
        Self::Workload,
        Self::Capacity,
        Self::Prerequisite,
        Self::Corequisite,
        Self::Maintenance,
        Self::Concurrent,
        Self::TeacherGap,
        Self::PlaceImbalance,
        Self::PlaceOveruse,
        Self::GenderMismatch,
    ];

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short human-readable description.
    pub fn label(self) -> &'static str {
        match self {
            Self::TeacherConflict => "teacher double-booking",
            Self::PlaceConflict => "place double-booking",
            Self::Workload => "teacher workload out of bounds",
            Self::Capacity => "place capacity below enrollment",
            Self::Prerequisite => "prerequisite not scheduled earlier",
            Self::Corequisite => "corequisite not adjacent",
            Self::Maintenance => "place under maintenance",
            Self::Concurrent => "too many concurrent courses",
            Self::TeacherGap => "teacher gap too short",
            Self::PlaceImbalance => "unbalanced place usage",
            Self::PlaceOveruse => "place overused",
            Self::GenderMismatch => "gender mismatch",
        }
    }
}

/// Weight per violation category.
///
/// Defaults keep hard conflicts (double-booking) an order of magnitude
/// above the soft terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub teacher_conflict: f64,
    pub place_conflict: f64,
    pub workload: f64,
    pub capacity: f64,
    pub prerequisite: f64,
    pub corequisite: f64,
    pub maintenance: f64,
    pub concurrent: f64,
    pub teacher_gap: f64,
    pub place_imbalance: f64,
    pub place_overuse: f64,
    pub gender_mismatch: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            teacher_conflict: 500.0,
            place_conflict: 500.0,
            workload: 50.0,
            capacity: 30.0,
            prerequisite: 100.0,
            corequisite: 60.0,
            maintenance: 100.0,
            concurrent: 80.0,
            teacher_gap: 40.0,
            place_imbalance: 200.0,
            place_overuse: 300.0,
            gender_mismatch: 80.0,
        }
    }
}

impl CostWeights {
    pub fn get(&self, category: ViolationCategory) -> f64 {
        match category {
            ViolationCategory::TeacherConflict => self.teacher_conflict,
            ViolationCategory::PlaceConflict => self.place_conflict,
            ViolationCategory::Workload => self.workload,
            ViolationCategory::Capacity => self.capacity,
            ViolationCategory::Prerequisite => self.prerequisite,
            ViolationCategory::Corequisite => self.corequisite,
            ViolationCategory::Maintenance => self.maintenance,
            ViolationCategory::Concurrent => self.concurrent,
            ViolationCategory::TeacherGap => self.teacher_gap,
            ViolationCategory::PlaceImbalance => self.place_imbalance,
            ViolationCategory::PlaceOveruse => self.place_overuse,
            ViolationCategory::GenderMismatch => self.gender_mismatch,
        }
    }

    fn slot_mut(&mut self, category: ViolationCategory) -> &mut f64 {
        match category {
            ViolationCategory::TeacherConflict => &mut self.teacher_conflict,
            ViolationCategory::PlaceConflict => &mut self.place_conflict,
            ViolationCategory::Workload => &mut self.workload,
            ViolationCategory::Capacity => &mut self.capacity,
            ViolationCategory::Prerequisite => &mut self.prerequisite,
            ViolationCategory::Corequisite => &mut self.corequisite,
            ViolationCategory::Maintenance => &mut self.maintenance,
            ViolationCategory::Concurrent => &mut self.concurrent,
            ViolationCategory::TeacherGap => &mut self.teacher_gap,
            ViolationCategory::PlaceImbalance => &mut self.place_imbalance,
            ViolationCategory::PlaceOveruse => &mut self.place_overuse,
            ViolationCategory::GenderMismatch => &mut self.gender_mismatch,
        }
    }

    /// Sets one category's weight.
    pub fn with(mut self, category: ViolationCategory, weight: f64) -> Self {
        *self.slot_mut(category) = weight;
        self
    }

    /// All weights must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in ViolationCategory::ALL {
            check_non_negative(category.label(), self.get(category))?;
        }
        Ok(())
    }
}

/// Cost-model run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub weights: CostWeights,
    /// Calendar date of day 1, used to map days onto maintenance ranges.
    pub term_start: NaiveDate,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            term_start: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default(),
        }
    }
}

impl CostConfig {
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_term_start(mut self, date: NaiveDate) -> Self {
        self.term_start = date;
        self
    }
}
