//! Biogeography-based migration/mutation.
//!
//! Each candidate is a habitat whose features are its assignments. Good
//! habitats (low cost, high species count) emigrate features; poor ones
//! immigrate them. A mutation step then perturbs the worse half.
//!
//! # Key Types
//!
//! - [`BboConfig`]: migration/mutation rates and bounds
//! - [`BboStrategy`]: the [`SearchStrategy`](crate::driver::SearchStrategy)
//!   implementation
//!
//! # References
//!
//! - Simon (2008), "Biogeography-Based Optimization"

mod config;
mod strategy;

pub use config::BboConfig;
pub use strategy::BboStrategy;
