//! Pure state transition function
//!
//! Given the same session, context and event, always produces the same new
//! session and effects. The only I/O the interview needs (the
//! recommendation request) is returned as an effect for the runtime.

use super::state::{InterviewContext, QuestionKey, Session, Step};
use super::{Effect, Event};
use crate::feedback::Sentiment;
use crate::recommendation::RecommendationError;
use crate::summary::{build_summary, trip_details};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Event/state combinations with no transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Recommendation arrived at step {step}, expected step 6")]
    UnexpectedRecommendation { step: u8 },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Open a new interview: greet and ask the trip-type question.
///
/// The returned session takes the next utterance as the trip-type answer.
pub fn start(ctx: &InterviewContext) -> TransitionResult {
    let prompts = &ctx.config.prompts;
    let session = Session::new();
    tracing::info!(session_id = %session.id, "Interview started");
    TransitionResult::new(session)
        .with_effect(Effect::assistant(prompts.greeting.clone()))
        .with_effect(Effect::assistant(prompts.trip_type.clone()))
}

/// Pure transition function
pub fn transition(
    session: &Session,
    ctx: &InterviewContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::UserUtterance { text } => handle_utterance(session, ctx, text),
        Event::RecommendationReady { outcome } => handle_recommendation(session, ctx, &outcome),
    }
}

fn handle_utterance(
    session: &Session,
    ctx: &InterviewContext,
    text: String,
) -> Result<TransitionResult, TransitionError> {
    // Reset rule runs before anything else
    let restart = ctx.is_restart_request(&text);
    if restart || session.is_finished() {
        let fresh = Session::new();
        tracing::info!(
            previous = %session.id,
            session_id = %fresh.id,
            restart,
            "Starting a fresh session"
        );
        return Ok(restart_interview(fresh, ctx, text));
    }

    match session.step {
        Step::TripType
        | Step::Destination
        | Step::GroupSize
        | Step::TravelDates
        | Step::DepartureCity => answer_question(session, ctx, text),
        Step::Summary => Ok(resume_summary(session, ctx, text)),
        Step::Feedback => Ok(handle_feedback(session, ctx, text)),
        Step::HumanAgentOffer => Ok(close(session, ctx, text)),
        Step::Terminal => Err(TransitionError::InvalidTransition(
            "utterance on a terminal session".to_string(),
        )),
    }
}

/// The utterance that triggered a reset is not an answer; re-ask from step 1
fn restart_interview(fresh: Session, ctx: &InterviewContext, text: String) -> TransitionResult {
    let prompts = &ctx.config.prompts;
    TransitionResult::new(fresh)
        .with_effect(Effect::user(text))
        .with_effect(Effect::assistant(prompts.restart_notice.clone()))
        .with_effect(Effect::assistant(prompts.trip_type.clone()))
}

// ============================================================
// Steps 1-5
// ============================================================

fn answer_question(
    session: &Session,
    ctx: &InterviewContext,
    text: String,
) -> Result<TransitionResult, TransitionError> {
    let step = session.step;
    let Some(key) = step.question_key() else {
        return Err(TransitionError::InvalidTransition(format!(
            "step {} stores no answer",
            step.ordinal()
        )));
    };

    if let Err(reason) = ctx.validator.validate(key, &text) {
        return Ok(reject_answer(session, ctx, key, text, &reason));
    }

    let mut next = session.clone();
    next.answers.insert(key, text.clone());
    next.step = step.next();
    next.error_count = 0;
    tracing::debug!(session_id = %next.id, key = key.as_str(), step = next.step.ordinal(), "Answer stored");

    let follow_up = if next.step == Step::Summary {
        let config = &ctx.config;
        Effect::RequestRecommendation {
            details: trip_details(&next.answers, &config.trip_types, &config.prompts.summary),
        }
    } else {
        Effect::assistant(question_for(ctx, next.step)?)
    };

    Ok(TransitionResult::new(next)
        .with_effect(Effect::user(text))
        .with_effect(follow_up))
}

/// Invalid answer: re-ask, or give up once the retry budget is spent
fn reject_answer(
    session: &Session,
    ctx: &InterviewContext,
    key: QuestionKey,
    text: String,
    reason: &str,
) -> TransitionResult {
    let prompts = &ctx.config.prompts;
    let max_errors = ctx.config.max_errors;
    let mut next = session.clone();

    if session.error_count >= max_errors {
        next.error_count = max_errors;
        next.active = false;
        tracing::warn!(
            session_id = %next.id,
            key = key.as_str(),
            max_errors,
            "Retry budget exhausted, ending session"
        );
        TransitionResult::new(next)
            .with_effect(Effect::user(text))
            .with_effect(Effect::error(prompts.max_errors_apology.clone()))
    } else {
        next.error_count += 1;
        tracing::info!(
            session_id = %next.id,
            key = key.as_str(),
            reason,
            error_count = next.error_count,
            "Answer rejected"
        );
        TransitionResult::new(next)
            .with_effect(Effect::user(text))
            .with_effect(Effect::assistant(prompts.retry(key)))
    }
}

// ============================================================
// Step 6
// ============================================================

/// The summary of a stored session was never delivered; ask again.
/// The utterance is recorded but not interpreted.
fn resume_summary(session: &Session, ctx: &InterviewContext, text: String) -> TransitionResult {
    let config = &ctx.config;
    tracing::info!(session_id = %session.id, "Resuming interrupted summary");
    TransitionResult::new(session.clone())
        .with_effect(Effect::user(text))
        .with_effect(Effect::RequestRecommendation {
            details: trip_details(&session.answers, &config.trip_types, &config.prompts.summary),
        })
}

fn handle_recommendation(
    session: &Session,
    ctx: &InterviewContext,
    outcome: &Result<String, RecommendationError>,
) -> Result<TransitionResult, TransitionError> {
    if session.step != Step::Summary || !session.active {
        return Err(TransitionError::UnexpectedRecommendation {
            step: session.step.ordinal(),
        });
    }

    let config = &ctx.config;
    let summary = build_summary(
        &session.answers,
        &config.trip_types,
        &config.prompts.summary,
        outcome,
    );

    let mut next = session.clone();
    next.step = Step::Feedback;
    next.error_count = 0;

    Ok(TransitionResult::new(next)
        .with_effect(Effect::assistant(summary))
        .with_effect(Effect::assistant(config.prompts.feedback_request.clone())))
}

// ============================================================
// Steps 7-8
// ============================================================

fn handle_feedback(session: &Session, ctx: &InterviewContext, text: String) -> TransitionResult {
    let prompts = &ctx.config.prompts;
    let sentiment = ctx.classifier.classify(&text);

    let mut next = session.clone();
    next.answers.insert(QuestionKey::Feedback, text.clone());

    let reply = match sentiment {
        Sentiment::Positive => {
            next.step = Step::HumanAgentOffer;
            next.error_count = 0;
            prompts.human_agent_offer.clone()
        }
        Sentiment::Negative => prompts.negative_feedback.clone(),
        Sentiment::Neutral => prompts.neutral_feedback.clone(),
    };
    tracing::info!(session_id = %next.id, ?sentiment, step = next.step.ordinal(), "Feedback received");

    TransitionResult::new(next)
        .with_effect(Effect::user(text))
        .with_effect(Effect::assistant(reply))
}

fn close(session: &Session, ctx: &InterviewContext, text: String) -> TransitionResult {
    let prompts = &ctx.config.prompts;
    let wants_agent = ctx.is_affirmative(&text);

    let mut next = session.clone();
    next.answers.insert(QuestionKey::HumanAgentRequest, text.clone());
    next.step = Step::Terminal;
    next.error_count = 0;
    next.active = false;
    next.completed = true;
    tracing::info!(session_id = %next.id, wants_agent, "Session completed");

    let closing = if wants_agent {
        prompts.closing_handoff.clone()
    } else {
        prompts.closing_thanks.clone()
    };

    TransitionResult::new(next)
        .with_effect(Effect::user(text))
        .with_effect(Effect::assistant(closing))
}

fn question_for(ctx: &InterviewContext, step: Step) -> Result<String, TransitionError> {
    ctx.config
        .prompts
        .question(step)
        .map(str::to_string)
        .ok_or_else(|| {
            TransitionError::InvalidTransition(format!("step {} has no question", step.ordinal()))
        })
}
