//! Core calculator types and logic.
//!
//! This module contains the pure functional core of the calculator:
//! - The `CalculatorState` record and the `Action` sum type
//! - Guard predicates that express action preconditions
//! - The total `transition` reducer and the `evaluate` function
//! - Immutable calculation history
//!
//! All logic in this module is pure (no side effects), following
//! the "pure core, imperative shell" philosophy.

mod action;
mod evaluate;
mod format;
mod guard;
mod history;
mod operation;
mod state;
mod transition;

pub use action::{is_digit_key, Action};
pub use evaluate::evaluate;
pub use format::{format_number, format_operand, parse_operand};
pub use guard::Guard;
pub use history::{History, HistoryItem};
pub use operation::Operation;
pub use state::{CalculatorState, StateViolation};
pub use transition::{replay, transition};
