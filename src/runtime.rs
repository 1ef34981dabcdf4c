//! Runtime for executing interview turns
//!
//! Drives the pure state machine: runs a transition, executes the effects
//! it returns and feeds generated events back in until the turn settles.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{InterviewRuntime, TurnOutcome};
pub use traits::*;
