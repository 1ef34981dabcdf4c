//! Effects produced by state transitions

use super::transcript::TranscriptEntry;
use crate::recommendation::TripDetails;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a message to the caller
    AppendTranscript { entry: TranscriptEntry },

    /// Ask the recommendation client; the runtime answers with
    /// `Event::RecommendationReady`
    RequestRecommendation { details: TripDetails },
}

impl Effect {
    pub fn user(content: impl Into<String>) -> Self {
        Effect::AppendTranscript {
            entry: TranscriptEntry::user(content),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Effect::AppendTranscript {
            entry: TranscriptEntry::assistant(content),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Effect::AppendTranscript {
            entry: TranscriptEntry::error(content),
        }
    }
}
