//! Interview session state types

use crate::config::InterviewConfig;
use crate::feedback::{FeedbackClassifier, KeywordClassifier};
use crate::validation::{AnswerValidator, NonBlankAnswers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Steps and question keys
// ============================================================================

/// Position in the fixed interview sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    TripType,
    Destination,
    GroupSize,
    TravelDates,
    DepartureCity,
    /// Auto-transition: the summary is built here, no user input consumed
    Summary,
    Feedback,
    HumanAgentOffer,
    Terminal,
}

/// A stored step ordinal outside 1..=9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid interview step {0} (expected 1..=9)")]
pub struct InvalidStep(pub u8);

impl Step {
    pub const ALL: [Step; 9] = [
        Step::TripType,
        Step::Destination,
        Step::GroupSize,
        Step::TravelDates,
        Step::DepartureCity,
        Step::Summary,
        Step::Feedback,
        Step::HumanAgentOffer,
        Step::Terminal,
    ];

    /// 1-based ordinal
    pub fn ordinal(self) -> u8 {
        match self {
            Step::TripType => 1,
            Step::Destination => 2,
            Step::GroupSize => 3,
            Step::TravelDates => 4,
            Step::DepartureCity => 5,
            Step::Summary => 6,
            Step::Feedback => 7,
            Step::HumanAgentOffer => 8,
            Step::Terminal => 9,
        }
    }

    /// Following step; the terminal step is its own successor
    pub fn next(self) -> Step {
        match self {
            Step::TripType => Step::Destination,
            Step::Destination => Step::GroupSize,
            Step::GroupSize => Step::TravelDates,
            Step::TravelDates => Step::DepartureCity,
            Step::DepartureCity => Step::Summary,
            Step::Summary => Step::Feedback,
            Step::Feedback => Step::HumanAgentOffer,
            Step::HumanAgentOffer | Step::Terminal => Step::Terminal,
        }
    }

    /// Key under which this step stores the user's answer
    pub fn question_key(self) -> Option<QuestionKey> {
        match self {
            Step::TripType => Some(QuestionKey::TripType),
            Step::Destination => Some(QuestionKey::Destination),
            Step::GroupSize => Some(QuestionKey::GroupSize),
            Step::TravelDates => Some(QuestionKey::TravelDates),
            Step::DepartureCity => Some(QuestionKey::DepartureCity),
            Step::Feedback => Some(QuestionKey::Feedback),
            Step::HumanAgentOffer => Some(QuestionKey::HumanAgentRequest),
            Step::Summary | Step::Terminal => None,
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::ALL
            .into_iter()
            .find(|step| step.ordinal() == value)
            .ok_or(InvalidStep(value))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.ordinal()
    }
}

/// Identifier of a stored answer.
///
/// Declaration order matches step order, so ordered maps keyed by it
/// iterate in interview order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKey {
    TripType,
    Destination,
    GroupSize,
    TravelDates,
    DepartureCity,
    Feedback,
    HumanAgentRequest,
}

impl QuestionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKey::TripType => "trip_type",
            QuestionKey::Destination => "destination",
            QuestionKey::GroupSize => "group_size",
            QuestionKey::TravelDates => "travel_dates",
            QuestionKey::DepartureCity => "departure_city",
            QuestionKey::Feedback => "feedback",
            QuestionKey::HumanAgentRequest => "human_agent_request",
        }
    }
}

// ============================================================================
// Answers
// ============================================================================

/// Raw answers collected so far, iterated in step order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<QuestionKey, String>);

impl Answers {
    pub fn get(&self, key: QuestionKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn insert(&mut self, key: QuestionKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }
}

#[cfg(test)]
impl Answers {
    pub fn contains(&self, key: QuestionKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionKey, &str)> {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

// ============================================================================
// Session
// ============================================================================

/// Per-conversation interview state.
///
/// Owned by the caller between turns; the state machine takes it by
/// reference and hands back a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Log correlation only
    pub id: String,
    pub step: Step,
    pub answers: Answers,
    pub error_count: u32,
    pub active: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// How a session stands from the caller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    /// Ended after exhausting the retry budget
    GaveUp,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            step: Step::TripType,
            answers: Answers::default(),
            error_count: 0,
            active: true,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// A finished session is replaced by a fresh one on the next utterance
    pub fn is_finished(&self) -> bool {
        self.completed || !self.active || self.step == Step::Terminal
    }

    pub fn status(&self) -> SessionStatus {
        if self.completed {
            SessionStatus::Completed
        } else if self.active {
            SessionStatus::InProgress
        } else {
            SessionStatus::GaveUp
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Context
// ============================================================================

/// Immutable collaborators of the state machine, shared by all sessions
#[derive(Clone)]
pub struct InterviewContext {
    pub config: Arc<InterviewConfig>,
    pub classifier: Arc<dyn FeedbackClassifier>,
    pub validator: Arc<dyn AnswerValidator>,
}

impl InterviewContext {
    pub fn new(config: InterviewConfig) -> Self {
        let classifier = Arc::new(KeywordClassifier::new(config.feedback.clone()));
        Self {
            config: Arc::new(config),
            classifier,
            validator: Arc::new(NonBlankAnswers),
        }
    }

    /// Replace the feedback classifier
    #[allow(dead_code)] // Extension point for a model-backed classifier
    pub fn with_classifier(mut self, classifier: Arc<dyn FeedbackClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the answer validator
    #[allow(dead_code)] // Extension point for stricter answer rules
    pub fn with_validator(mut self, validator: Arc<dyn AnswerValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Whether the utterance asks to abandon the current session
    pub fn is_restart_request(&self, utterance: &str) -> bool {
        let lowered = utterance.to_lowercase();
        self.config
            .restart_phrases
            .iter()
            .any(|phrase| !phrase.is_empty() && lowered.contains(&phrase.to_lowercase()))
    }

    /// Whether the utterance contains an affirmative token.
    ///
    /// Single-word tokens must match a whole word; multi-word tokens match
    /// as substrings.
    pub fn is_affirmative(&self, utterance: &str) -> bool {
        let lowered = utterance.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.config.affirmative_tokens.iter().any(|token| {
            let token = token.to_lowercase();
            if token.contains(char::is_whitespace) {
                lowered.contains(&token)
            } else {
                words.contains(&token.as_str())
            }
        })
    }
}
