//! Problem data.
//!
//! - [`entities`](self): serde input records (`Course`, `Teacher`, `Place`,
//!   `TimeSlot`, `Constraint`, `DomainInput`)
//! - [`DomainSnapshot`]: the immutable, index-resolved view every other
//!   component reads, with eligible teacher/place sets precomputed

mod entities;
mod snapshot;

pub use entities::{
    Constraint, Course, DomainInput, Gender, Place, PlaceRequirement, Teacher, TimeSlot,
};
pub use snapshot::{CourseProfile, DomainSnapshot, ResolvedConstraint};
