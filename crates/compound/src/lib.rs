//! # Compound Growth Simulator
//!
//! Projects an account balance over a number of compounding periods, with an
//! optional fixed addition or withdrawal at the end of every period. Used by the
//! journal to show what a steady per-period return would compound into.
//!
//! The simulation is pure and infallible; `CalculatorInput::validate` is offered
//! separately for callers accepting input from users.

pub mod error;
pub mod input;
pub mod simulator;

pub use error::CalculatorError;
pub use input::{currency_symbol, CalculatorInput, ContributionType, ReturnPeriod};
pub use simulator::{calendar_offset, simulate, CalculatorResult, TrajectoryPoint};
