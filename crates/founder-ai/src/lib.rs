//! Adaptive interview engine for founder onboarding.
//!
//! The [`interview`] module owns the domain: question catalogs, branching
//! visibility, answer validation, session state, and the service/router pair
//! that exposes interviews over HTTP. [`config`] and [`telemetry`] carry the
//! process-level plumbing shared with the api binary.

pub mod config;
pub mod error;
pub mod interview;
pub mod telemetry;
