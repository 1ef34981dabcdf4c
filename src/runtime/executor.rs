//! Interview runtime executor

use super::traits::RecommendationClient;
use crate::recommendation::fetch_recommendation;
use crate::state_machine::{
    start, transition, Effect, Event, InterviewContext, Session, SessionStatus, Transcript,
    TranscriptEntry,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::Instrument;

/// Result of one turn: the session to store and the entries to show
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session: Session,
    pub entries: Vec<TranscriptEntry>,
}

impl TurnOutcome {
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }
}

/// Turn processor shared by all sessions.
///
/// Holds no per-session state: the caller passes the session in and stores
/// the one handed back, so turns on different sessions can run in parallel.
#[derive(Clone)]
pub struct InterviewRuntime {
    context: InterviewContext,
    client: Arc<dyn RecommendationClient>,
}

impl InterviewRuntime {
    pub fn new(context: InterviewContext, client: Arc<dyn RecommendationClient>) -> Self {
        Self { context, client }
    }

    pub fn context(&self) -> &InterviewContext {
        &self.context
    }

    /// Open a new session with the greeting and the first question
    pub fn start(&self) -> TurnOutcome {
        let result = start(&self.context);
        let entries = result
            .effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::AppendTranscript { entry } => Some(entry),
                Effect::RequestRecommendation { .. } => None,
            })
            .collect();
        TurnOutcome {
            session: result.session,
            entries,
        }
    }

    /// Process one utterance against `session`
    pub async fn process_turn(&self, session: Session, utterance: &str) -> TurnOutcome {
        let span = tracing::info_span!(
            "turn",
            session_id = %session.id,
            step = session.step.ordinal()
        );
        self.run_turn(session, utterance).instrument(span).await
    }

    async fn run_turn(&self, mut session: Session, utterance: &str) -> TurnOutcome {
        let mut transcript = Transcript::default();

        // Process events in a loop to handle chained effects
        let mut events_to_process = vec![Event::utterance(utterance)];

        while let Some(current_event) = events_to_process.pop() {
            // Pure state transition
            let result = match transition(&session, &self.context, current_event) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!(error = %e, "Transition rejected");
                    transcript.push(TranscriptEntry::error(e.to_string()));
                    break;
                }
            };

            if result.session.step != session.step {
                tracing::info!(
                    session_id = %result.session.id,
                    from = session.step.ordinal(),
                    to = result.session.step.ordinal(),
                    "Step changed"
                );
            }
            session = result.session;

            // Execute effects and collect generated events
            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect, &mut transcript).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        session.updated_at = Utc::now();
        TurnOutcome {
            session,
            entries: transcript.into_entries(),
        }
    }

    async fn execute_effect(&self, effect: Effect, transcript: &mut Transcript) -> Option<Event> {
        match effect {
            Effect::AppendTranscript { entry } => {
                transcript.push(entry);
                None
            }
            Effect::RequestRecommendation { details } => {
                let limit = self.context.config.recommendation_timeout();
                let outcome = fetch_recommendation(self.client.as_ref(), &details, limit).await;
                Some(Event::RecommendationReady { outcome })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterviewConfig;
    use crate::recommendation::RecommendationError;
    use crate::runtime::testing::{DelayedRecommendationClient, MockRecommendationClient};
    use crate::state_machine::{QuestionKey, Role, Step};
    use std::time::Duration;

    fn runtime_with(client: Arc<dyn RecommendationClient>, config: InterviewConfig) -> InterviewRuntime {
        InterviewRuntime::new(InterviewContext::new(config), client)
    }

    /// Run `utterances` in order, starting from a fresh session
    async fn converse(runtime: &InterviewRuntime, utterances: &[&str]) -> Vec<TurnOutcome> {
        let mut session = runtime.start().session;
        let mut outcomes = Vec::new();
        for utterance in utterances {
            let outcome = runtime.process_turn(session, utterance).await;
            session = outcome.session.clone();
            outcomes.push(outcome);
        }
        outcomes
    }

    fn texts(outcome: &TurnOutcome, role: Role) -> Vec<&str> {
        outcome
            .entries
            .iter()
            .filter(|e| e.role == role)
            .map(|e| e.content.as_str())
            .collect()
    }

    const TRIP: [&str; 5] = [
        "independent trip (1)",
        "Paris",
        "2",
        "10-15 June",
        "Berlin",
    ];

    #[test]
    fn test_start_greets_then_asks_trip_type() {
        let runtime = runtime_with(Arc::new(MockRecommendationClient::new()), InterviewConfig::english());
        let prompts = &runtime.context().config.prompts;

        let opened = runtime.start();
        assert_eq!(opened.status(), SessionStatus::InProgress);
        assert_eq!(opened.session.step, Step::TripType);
        assert_eq!(
            opened.entries,
            vec![
                TranscriptEntry::assistant(prompts.greeting.as_str()),
                TranscriptEntry::assistant(prompts.trip_type.as_str()),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_reply_after_start_is_stored_as_trip_type() {
        let client = Arc::new(MockRecommendationClient::new());
        let runtime = runtime_with(client, InterviewConfig::english());

        let outcomes = converse(&runtime, &TRIP[..1]).await;
        let first = &outcomes[0];
        assert_eq!(first.session.step, Step::Destination);
        assert_eq!(
            first.session.answers.get(QuestionKey::TripType),
            Some("independent trip (1)")
        );
        assert_eq!(
            texts(first, Role::Assistant),
            vec![runtime.context().config.prompts.destination.as_str()]
        );
    }

    #[tokio::test]
    async fn test_full_interview_reaches_feedback_in_one_turn() {
        let client = Arc::new(MockRecommendationClient::new());
        client.queue_text("Take the night train to Paris.");
        let runtime = runtime_with(client.clone(), InterviewConfig::english());

        let outcomes = converse(&runtime, &TRIP).await;
        let last = outcomes.last().unwrap();

        assert_eq!(last.session.step, Step::Feedback);
        assert_eq!(last.session.answers.len(), 5);
        assert_eq!(texts(last, Role::User), vec!["Berlin"]);

        let assistant = texts(last, Role::Assistant);
        assert_eq!(assistant.len(), 2);
        let summary = assistant[0];
        for expected in [
            "• Trip type: independent trip",
            "• Destination: Paris",
            "• Number of travellers: 2",
            "• Travel dates: 10-15 June",
            "• Departure city: Berlin",
            "Take the night train to Paris.",
        ] {
            assert!(summary.contains(expected), "missing {expected:?} in {summary}");
        }
        assert_eq!(assistant[1], runtime.context().config.prompts.feedback_request);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].destination, "Paris");
        assert_eq!(requests[0].trip_type, "independent trip");
    }

    #[tokio::test]
    async fn test_each_turn_echoes_user_first() {
        let client = Arc::new(MockRecommendationClient::new());
        let runtime = runtime_with(client, InterviewConfig::english());
        for (outcome, utterance) in converse(&runtime, &TRIP).await.iter().zip(TRIP) {
            assert_eq!(outcome.entries[0], TranscriptEntry::user(utterance));
        }
    }

    #[tokio::test]
    async fn test_negative_feedback_keeps_step_and_error_count() {
        let client = Arc::new(MockRecommendationClient::new());
        let runtime = runtime_with(client, InterviewConfig::english());
        let mut utterances = TRIP.to_vec();
        utterances.push("not very good, doesn't suit me");

        let outcomes = converse(&runtime, &utterances).await;
        let last = outcomes.last().unwrap();
        assert_eq!(last.session.step, Step::Feedback);
        assert_eq!(last.session.error_count, 0);
        assert_eq!(
            texts(last, Role::Assistant),
            vec![runtime.context().config.prompts.negative_feedback.as_str()]
        );
    }

    #[tokio::test]
    async fn test_positive_feedback_then_yes_completes() {
        let client = Arc::new(MockRecommendationClient::new());
        let runtime = runtime_with(client, InterviewConfig::english());
        let mut utterances = TRIP.to_vec();
        utterances.extend(["great, thanks!", "yes"]);

        let outcomes = converse(&runtime, &utterances).await;
        let prompts = &runtime.context().config.prompts;

        let offer = &outcomes[outcomes.len() - 2];
        assert_eq!(offer.session.step, Step::HumanAgentOffer);
        assert_eq!(texts(offer, Role::Assistant), vec![prompts.human_agent_offer.as_str()]);

        let done = outcomes.last().unwrap();
        assert_eq!(done.status(), SessionStatus::Completed);
        assert!(!done.session.active);
        assert_eq!(done.session.answers.get(QuestionKey::HumanAgentRequest), Some("yes"));
        assert_eq!(texts(done, Role::Assistant), vec![prompts.closing_handoff.as_str()]);
    }

    #[tokio::test]
    async fn test_recommendation_timeout_still_renders_summary() {
        let client = Arc::new(DelayedRecommendationClient::new(Duration::from_secs(30), "late"));
        let mut config = InterviewConfig::english();
        config.recommendation_timeout_secs = 1;
        let runtime = runtime_with(client, config);

        let outcomes = converse(&runtime, &TRIP).await;
        let last = outcomes.last().unwrap();

        assert_eq!(last.session.step, Step::Feedback);
        assert!(texts(last, Role::Error).is_empty());
        let summary = texts(last, Role::Assistant)[0];
        assert!(summary.contains("• Destination: Paris"));
        assert!(summary.contains("timed out"), "{summary}");
        assert!(!summary.contains("late"));
    }

    #[tokio::test]
    async fn test_http_failure_rendered_inline() {
        let client = Arc::new(MockRecommendationClient::new());
        client.queue_error(RecommendationError::Http { status: 502 });
        let runtime = runtime_with(client, InterviewConfig::english());

        let outcomes = converse(&runtime, &TRIP).await;
        let summary = texts(outcomes.last().unwrap(), Role::Assistant)[0];
        assert!(summary.contains("HTTP 502"), "{summary}");
    }

    #[tokio::test]
    async fn test_interrupted_summary_resumes_on_next_turn() {
        let client = Arc::new(MockRecommendationClient::new());
        client.queue_text("Stay in Montmartre.");
        let runtime = runtime_with(client, InterviewConfig::english());

        // Stored mid-recommendation, e.g. the process died during the call
        let mut session = Session::new();
        for (key, value) in [
            (QuestionKey::TripType, "2"),
            (QuestionKey::Destination, "Paris"),
            (QuestionKey::GroupSize, "3"),
            (QuestionKey::TravelDates, "May"),
            (QuestionKey::DepartureCity, "Lyon"),
        ] {
            session.answers.insert(key, value);
        }
        session.step = Step::Summary;

        let outcome = runtime.process_turn(session, "are you there?").await;
        assert_eq!(outcome.session.step, Step::Feedback);
        assert_eq!(outcome.entries[0], TranscriptEntry::user("are you there?"));
        let assistant = texts(&outcome, Role::Assistant);
        assert!(assistant[0].contains("Stay in Montmartre."));
        assert!(assistant[0].contains("organized tourism"));
    }

    #[tokio::test]
    async fn test_gave_up_session_reports_error_entry() {
        let client = Arc::new(MockRecommendationClient::new());
        let mut config = InterviewConfig::english();
        config.max_errors = 1;
        let runtime = runtime_with(client, config);

        let outcomes = converse(&runtime, &["", " "]).await;
        let last = outcomes.last().unwrap();
        assert_eq!(last.status(), SessionStatus::GaveUp);
        assert_eq!(
            texts(last, Role::Error),
            vec![runtime.context().config.prompts.max_errors_apology.as_str()]
        );

        // Next utterance starts over
        let fresh = runtime.process_turn(last.session.clone(), "hello again").await;
        assert_eq!(fresh.status(), SessionStatus::InProgress);
        assert_eq!(fresh.session.step, Step::TripType);
        assert_ne!(fresh.session.id, last.session.id);
    }

    #[tokio::test]
    async fn test_parallel_sessions_do_not_interfere() {
        let client = Arc::new(DelayedRecommendationClient::new(Duration::from_millis(50), "Enjoy"));
        let runtime = Arc::new(runtime_with(client, InterviewConfig::english()));

        let destinations = ["Paris", "Rome", "Oslo", "Lima"];
        let tasks = destinations.into_iter().map(|destination| {
            let runtime = Arc::clone(&runtime);
            async move {
                let utterances = ["1", destination, "2", "July", "Berlin"];
                let outcomes = converse(&runtime, &utterances).await;
                (destination, outcomes)
            }
        });

        for (destination, outcomes) in futures::future::join_all(tasks).await {
            let last = outcomes.last().unwrap();
            assert_eq!(last.session.answers.get(QuestionKey::Destination), Some(destination));
            let summary = texts(last, Role::Assistant)[0];
            assert!(summary.contains(&format!("Enjoy ({destination})")), "{summary}");
        }
    }
}
