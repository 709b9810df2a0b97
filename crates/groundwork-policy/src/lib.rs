//! Groundwork policy engine
//!
//! Evaluates named, independent rules against resource descriptors and
//! aggregates every violation instead of stopping at the first. The
//! orchestration engine feeds each resource through a [`PolicyPack`] before
//! applying it and decides, per violation, whether to halt (mandatory) or
//! warn (advisory).
//!
//! The aggregator itself is a stateless fold over
//! `(descriptor, policies) -> violations`; anything that needs the network
//! or the filesystem belongs inside a predicate, not here.

pub mod aws;
pub mod error;
pub mod policy;
pub mod violation;

// Re-exports
pub use error::{PolicyError, Result};
pub use policy::{EnforcementLevel, Policy, PolicyPack, ResourceFilter};
pub use violation::{Violation, ViolationKind, ViolationReporter};
