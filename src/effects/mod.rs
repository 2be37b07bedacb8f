//! Effectful calculator shell using Stillwater 0.11.0.
//!
//! This module provides the "imperative shell" around the pure core:
//! a session that owns the calculator state, the calculation history and
//! the pending solver query.
//!
//! # Key Concepts
//!
//! - **Session**: Dispatches actions through the pure reducer and applies
//!   the outcome
//! - **Environment**: Supplies the clock and id generator used when a
//!   calculation is recorded
//! - **Effects**: `dispatch()` returns a `BoxedEffect`; run it against an
//!   environment, then `apply()` the result
//!
//! Following Stillwater 0.11.0 conventions, effects are built with the
//! free-standing constructors `pure()`, `fail()` and `from_fn()`.

mod env;
mod session;

pub use env::{Environment, FixedEnv, SystemEnv};
pub use session::{Dispatched, Session, SessionError};
