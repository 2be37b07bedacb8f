//! Builder API for session construction.
//!
//! A session normally starts from the initial state; the builder lets a
//! shell start from a seeded value or a mid-entry state instead, rejecting
//! starting points that break the operand invariants.

pub mod error;
pub mod session;

pub use error::BuildError;
pub use session::SessionBuilder;
