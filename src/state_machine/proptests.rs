//! Property-based tests for the interview state machine
//!
//! These tests verify key invariants hold across arbitrary conversations.

use super::state::*;
use super::transition::*;
use super::*;
use crate::config::InterviewConfig;
use crate::recommendation::RecommendationError;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> InterviewContext {
    InterviewContext::new(InterviewConfig::english())
}

#[derive(Debug, Clone)]
enum Input {
    /// Single lower-case word, never a restart phrase
    Answer(String),
    Blank,
    Recommendation(Result<String, RecommendationError>),
}

impl Input {
    fn into_event(self) -> Event {
        match self {
            Input::Answer(text) => Event::utterance(text),
            Input::Blank => Event::utterance("  "),
            Input::Recommendation(outcome) => Event::RecommendationReady { outcome },
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_outcome() -> impl Strategy<Value = Result<String, RecommendationError>> {
    prop_oneof![
        "[a-zA-Z ]{0,40}".prop_map(Ok),
        Just(Err(RecommendationError::Timeout)),
        (400u16..600).prop_map(|status| Err(RecommendationError::Http { status })),
    ]
}

fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        6 => "[a-z]{1,12}".prop_map(Input::Answer),
        2 => Just(Input::Blank),
        1 => arb_outcome().prop_map(Input::Recommendation),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    proptest::sample::select(Step::ALL.to_vec())
}

/// Feed `inputs`, answering every recommendation request immediately
fn drive(ctx: &InterviewContext, inputs: Vec<Input>) -> Vec<(Session, Session)> {
    let mut session = Session::new();
    let mut pairs = Vec::new();
    for input in inputs {
        let Ok(result) = transition(&session, ctx, input.into_event()) else {
            continue;
        };
        pairs.push((session.clone(), result.session.clone()));
        session = result.session;
    }
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Within one session the step never moves backwards
    #[test]
    fn prop_step_is_monotonic(inputs in proptest::collection::vec(arb_input(), 0..40)) {
        let ctx = test_context();
        for (before, after) in drive(&ctx, inputs) {
            if before.id == after.id {
                prop_assert!(after.step >= before.step, "{:?} -> {:?}", before.step, after.step);
            }
        }
    }

    // A transition stores at most one new answer and never rewrites old ones
    #[test]
    fn prop_at_most_one_new_answer(inputs in proptest::collection::vec(arb_input(), 0..40)) {
        let ctx = test_context();
        for (before, after) in drive(&ctx, inputs) {
            if before.id != after.id {
                prop_assert!(after.answers.is_empty());
                continue;
            }
            prop_assert!(after.answers.len() <= before.answers.len() + 1);
            for (key, value) in before.answers.iter() {
                if key != QuestionKey::Feedback {
                    prop_assert_eq!(after.answers.get(key), Some(value));
                }
            }
        }
    }

    // The error counter never exceeds the configured maximum
    #[test]
    fn prop_error_count_bounded(inputs in proptest::collection::vec(arb_input(), 0..60)) {
        let ctx = test_context();
        for (_, after) in drive(&ctx, inputs) {
            prop_assert!(after.error_count <= ctx.config.max_errors);
        }
    }

    // Answers are only recorded for questions that were asked
    #[test]
    fn prop_answers_match_step(inputs in proptest::collection::vec(arb_input(), 0..40)) {
        let ctx = test_context();
        for (_, after) in drive(&ctx, inputs) {
            let interview_answers = after
                .answers
                .iter()
                .filter(|(key, _)| !matches!(key, QuestionKey::Feedback | QuestionKey::HumanAgentRequest))
                .count();
            let expected = usize::from(after.step.ordinal().min(6) - 1);
            prop_assert_eq!(interview_answers, expected, "step {:?}", after.step);
        }
    }

    // Every utterance is echoed as the first effect
    #[test]
    fn prop_utterance_echoed_first(step in arb_step(), text in "[a-z]{1,12}") {
        let mut session = Session::new();
        session.step = step;
        session.completed = step == Step::Terminal;
        session.active = step != Step::Terminal;

        let result = transition(&session, &test_context(), Event::utterance(text.clone()));
        let result = result.expect("utterances are accepted at every step");
        prop_assert_eq!(result.effects.first(), Some(&Effect::user(text)));
    }

    // Any utterance after a finished session starts a fresh interview
    #[test]
    fn prop_finished_session_resets(
        completed in any::<bool>(),
        step in arb_step(),
        error_count in 0u32..4,
        text in "[a-z]{1,12}"
    ) {
        let mut session = Session::new();
        session.step = step;
        session.completed = completed;
        session.active = false;
        session.error_count = error_count;
        session.answers.insert(QuestionKey::TripType, "1");

        let result = transition(&session, &test_context(), Event::utterance(text)).unwrap();
        prop_assert_ne!(&result.session.id, &session.id);
        prop_assert_eq!(result.session.step, Step::TripType);
        prop_assert!(result.session.answers.is_empty());
        prop_assert_eq!(result.session.error_count, 0);
        prop_assert!(result.session.active);
        prop_assert!(!result.session.completed);
    }

    // Recommendations are only accepted while the summary is pending
    #[test]
    fn prop_recommendation_only_at_summary(step in arb_step(), outcome in arb_outcome()) {
        let mut session = Session::new();
        session.step = step;

        let result = transition(&session, &test_context(), Event::RecommendationReady { outcome });
        if step == Step::Summary {
            prop_assert_eq!(result.unwrap().session.step, Step::Feedback);
        } else {
            prop_assert!(result.is_err());
        }
    }
}
