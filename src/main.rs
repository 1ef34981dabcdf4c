//! Travel agent - guided trip-planning interview
//!
//! A console driver around an interview state machine that collects five
//! trip attributes, asks a completion service for recommendations and
//! gathers feedback.

mod config;
mod feedback;
mod llm;
mod prompts;
mod recommendation;
mod runtime;
mod state_machine;
mod summary;
mod validation;

use config::AppConfig;
use recommendation::LlmRecommendationClient;
use runtime::InterviewRuntime;
use state_machine::{InterviewContext, Role, SessionStatus, TranscriptEntry};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_agent=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        locale = ?config.locale,
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        max_errors = config.interview.max_errors,
        timeout_secs = config.interview.recommendation_timeout_secs,
        "Configuration loaded"
    );

    let service = config.llm.build_service();
    if service.is_none() {
        tracing::warn!("No API key configured. Set LLM_API_KEY or PERPLEXITY_API_KEY.");
    }
    let client = LlmRecommendationClient::new(
        service,
        config.interview.recommendation.clone(),
        config.llm.max_tokens,
    );

    let runtime = InterviewRuntime::new(InterviewContext::new(config.interview), Arc::new(client));

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"=== Travel Agent ===\n(type \"quit\" to leave)\n")
        .await?;

    let opened = runtime.start();
    for entry in &opened.entries {
        if let Some(text) = render(entry) {
            stdout.write_all(text.as_bytes()).await?;
        }
    }
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = opened.session;

    while let Some(line) = lines.next_line().await? {
        if EXIT_COMMANDS.contains(&line.trim().to_lowercase().as_str()) {
            break;
        }

        let outcome = runtime.process_turn(session, &line).await;
        if outcome.status() != SessionStatus::InProgress {
            tracing::info!(session_id = %outcome.session.id, status = ?outcome.status(), "Session ended");
        }
        session = outcome.session;

        for entry in &outcome.entries {
            if let Some(text) = render(entry) {
                stdout.write_all(text.as_bytes()).await?;
            }
        }
        stdout.flush().await?;
    }

    tracing::info!(session_id = %session.id, status = ?session.status(), "Goodbye");
    Ok(())
}

/// Console rendering of a transcript entry; the user's own line is not echoed
fn render(entry: &TranscriptEntry) -> Option<String> {
    match entry.role {
        Role::User => None,
        Role::Assistant => Some(format!("\n{}\n\n", entry.content)),
        Role::Error => Some(format!("\n[!] {}\n\n", entry.content)),
    }
}
