//! Stateless derivations over a catalog and an answer history.
//!
//! Nothing in here caches: visibility, options, and signals are recomputed
//! from the history on every call, which is what keeps back-navigation
//! consistent for free.

mod options;
mod signals;
mod visibility;

pub use options::resolve_options;
pub use signals::accumulated_signals;
pub use visibility::visible_questions;
