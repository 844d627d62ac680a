//! The practice-session lifecycle engine.
//!
//! Owns the start -> upload -> analyze -> complete state machine, the
//! per-user serialization that backs the single-active-session rule, and
//! the degraded-analysis fallback.

pub mod locks;
pub mod session;

pub use locks::UserLocks;
pub use session::{SessionEngine, UploadOutcome};
