//! Keycalc: a keypad calculator built as a pure state machine
//!
//! Keycalc follows Stillwater's "pure core, imperative shell" philosophy.
//! The calculator itself is a total, side-effect-free reducer over a small
//! state record, while history stamping and the natural-language solver
//! live in an effectful shell around it.
//!
//! # Core Concepts
//!
//! - **State**: `CalculatorState`, replaced wholesale on every action
//! - **Actions**: one enum variant per keypad action, applied by `transition`
//! - **Evaluation**: `evaluate` folds a (previous, operation, current) triple
//! - **History**: immutable log of completed calculations
//!
//! # Example
//!
//! ```rust
//! use keycalc::core::{replay, Action, CalculatorState, Operation};
//!
//! let state = replay(
//!     &CalculatorState::initial(),
//!     &[
//!         Action::AddDigit('2'),
//!         Action::ChooseOperation(Operation::Add),
//!         Action::AddDigit('3'),
//!         Action::ChooseOperation(Operation::Multiply),
//!         Action::AddDigit('4'),
//!         Action::Evaluate,
//!     ],
//! );
//!
//! // Left-to-right, no operator precedence
//! assert_eq!(state.current_operand, "20");
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
pub mod keymap;
pub mod solver;

// Re-export commonly used types
pub use self::core::{evaluate, transition, Action, CalculatorState, History, HistoryItem, Operation};
pub use effects::{Session, SessionError};
