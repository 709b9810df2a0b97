//! Groundwork resource core
//!
//! This crate defines the contract between an external orchestration engine
//! and the adapters that wrap imperative side effects as managed resources.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             orchestration engine                 │
//! │     (diff / apply / record persistence)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             groundwork-resource                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Lifecycle Abstraction              │   │
//! │  │  trait ResourceProvider { ... }           │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │    kubectl    │ │   calendar    │
//! │   provider    │ │   provider    │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! The engine hands every provider a fully resolved property bag, invokes
//! the four lifecycle verbs, and owns persistence of the returned
//! [`LifecycleRecord`]s. Nothing in this crate touches the network or the
//! filesystem.

pub mod descriptor;
pub mod error;
pub mod lifecycle;

// Re-exports
pub use descriptor::{PropertyBag, ResourceDescriptor, optional_str, require_str};
pub use error::{ResourceError, Result};
pub use lifecycle::{
    CheckOutcome, FieldError, LifecycleRecord, ResourceProvider, validate_required,
};
