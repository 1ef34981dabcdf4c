//! Events that drive the interview

use crate::recommendation::RecommendationError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Text typed by the user
    UserUtterance { text: String },

    /// Outcome of the recommendation request issued when leaving step 5
    RecommendationReady {
        outcome: Result<String, RecommendationError>,
    },
}

impl Event {
    pub fn utterance(text: impl Into<String>) -> Self {
        Event::UserUtterance { text: text.into() }
    }
}
