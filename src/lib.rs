//! Population-based course timetabling.
//!
//! Assigns a teacher, place, day and time slot to every schedulable course
//! and minimizes a weighted sum of constraint violations. Two search
//! strategies share one representation, one cost model and one repair
//! layer:
//!
//! - **BBO**: biogeography-style migration between candidates plus
//!   mutation of the worse half.
//! - **GWO**: leader-following swarm update of slots and days toward the
//!   three best candidates.
//!
//! # Architecture
//!
//! Leaf-first:
//!
//! - [`domain`]: input records and the immutable [`DomainSnapshot`] with
//!   precomputed eligibility
//! - [`candidate`]: [`Assignment`], [`Candidate`] and the code-based
//!   [`AssignmentRecord`] export form
//! - [`sampler`]: shared random draws (uniform teacher, usage-weighted place)
//! - [`cost`]: twelve weighted violation categories
//! - [`repair`]: gender fixes and double-booking relocation
//! - [`init`]: population construction
//! - [`bbo`], [`gwo`]: the strategies, behind [`driver::SearchStrategy`]
//! - [`driver`]: the generational loop, elitism, cancellation and
//!   strategy comparison
//! - [`report`]: structured summary of a finished schedule
//!
//! Per-candidate work runs on rayon when the `parallel` feature is enabled
//! (the default). Every candidate gets its own RNG seeded from the master
//! stream, so a seeded run gives the same result either way.
//!
//! # Example
//!
//! ```
//! use u_timetable::domain::{Course, DomainInput, DomainSnapshot, Gender, Place, Teacher, TimeSlot};
//! use u_timetable::driver::{solve, SolverConfig, StrategyKind};
//! use u_timetable::gwo::GwoConfig;
//!
//! let input = DomainInput {
//!     places: vec![Place::new("R1", 40), Place::new("R2", 30)],
//!     teachers: vec![
//!         Teacher::new("T1", Gender::A).with_courses(["C1", "C2"]),
//!         Teacher::new("T2", Gender::B).with_courses(["C2", "C3"]),
//!     ],
//!     courses: vec![Course::new("C1", 3), Course::new("C2", 2), Course::new("C3", 2)],
//!     time_slots: vec![TimeSlot::hm(1, (8, 0), (10, 0)), TimeSlot::hm(2, (10, 0), (12, 0))],
//!     days: vec!["Mon".into(), "Tue".into(), "Wed".into()],
//!     constraints: vec![],
//! };
//! let snapshot = DomainSnapshot::new(input).unwrap();
//! let config = SolverConfig::fast().with_max_generations(20).with_seed(7);
//! let result = solve(&snapshot, &config, StrategyKind::Gwo(GwoConfig::default())).unwrap();
//!
//! for record in result.best.to_records(&snapshot) {
//!     assert!(record.day >= 1 && record.day <= 3);
//! }
//! ```

pub mod bbo;
pub mod candidate;
pub mod cost;
pub mod domain;
pub mod driver;
pub mod error;
pub mod gwo;
pub mod init;
pub mod random;
pub mod repair;
pub mod report;
pub mod sampler;

#[cfg(test)]
pub(crate) mod fixtures;

pub use candidate::{Assignment, AssignmentRecord, Candidate};
pub use domain::DomainSnapshot;
pub use error::{ConfigError, TimetableError};
