//! Interview state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the session is data, events go in, a new session and effects come out.

mod effect;
pub mod event;
pub mod state;
pub mod transcript;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{InterviewContext, QuestionKey, Session, SessionStatus, Step};
pub use transcript::{Role, Transcript, TranscriptEntry};
pub use transition::{start, transition, TransitionError, TransitionResult};
