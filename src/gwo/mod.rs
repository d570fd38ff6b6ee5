//! Grey-wolf style leader-following swarm.
//!
//! The three best candidates found so far (alpha, beta, delta) pull every
//! candidate's slot and day toward them, with an exploration coefficient
//! that decays each generation. Teacher and place are occasionally
//! redrawn, since they have no meaningful numeric ordering.
//!
//! # References
//!
//! - Mirjalili, Mirjalili & Lewis (2014), "Grey Wolf Optimizer"

mod config;
mod strategy;

pub use config::GwoConfig;
pub use strategy::GwoStrategy;
