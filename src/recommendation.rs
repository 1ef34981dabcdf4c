//! Travel recommendations from the completion service
//!
//! Builds a travel-consultant prompt from the five trip attributes and asks
//! the configured completion service for suggestions. The interview never
//! retries: one attempt per summary, bounded by the caller's timeout.

use crate::llm::{LlmError, LlmErrorKind, LlmMessage, LlmRequest, LlmService};
use crate::runtime::RecommendationClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;

/// Trip attributes, trip type already relabelled for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    pub trip_type: String,
    pub destination: String,
    pub group_size: String,
    pub travel_dates: String,
    pub departure_city: String,
}

/// Why no recommendation text could be obtained
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationError {
    #[error("timed out")]
    Timeout,
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    /// No credential configured, or the service gave nothing usable
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<LlmError> for RecommendationError {
    fn from(e: LlmError) -> Self {
        match (e.kind, e.status) {
            (LlmErrorKind::Timeout, _) => RecommendationError::Timeout,
            (_, Some(status)) => RecommendationError::Http { status },
            (LlmErrorKind::Network, None) => RecommendationError::Network(e.message),
            (_, None) => RecommendationError::Unavailable(e.message),
        }
    }
}

/// Prompt texts for the recommendation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPrompt {
    pub system: String,
    /// Appended after the trip attributes
    pub instructions: String,
    /// Heading placed above the source list
    pub sources_heading: String,
}

impl RecommendationPrompt {
    pub fn english() -> Self {
        Self {
            system: "You are an experienced travel consultant. Use current information \
                     from the web and be concrete: name tour operators, flights, \
                     accommodation and approximate prices."
                .to_string(),
            instructions: "Suggest the best options for this trip: how to get there from the \
                           departure city, where to stay, what it will roughly cost, and \
                           practical tips for the travel dates. Answer in English, \
                           in at most 250 words."
                .to_string(),
            sources_heading: "Sources:".to_string(),
        }
    }

    pub fn russian() -> Self {
        Self {
            system: "Вы опытный туристический консультант. Используйте актуальную информацию \
                     из интернета и отвечайте конкретно: туроператоры, перелёты, \
                     размещение и примерные цены."
                .to_string(),
            instructions: "Предложите лучшие варианты для этой поездки: как добраться из города \
                           отправления, где остановиться, сколько это примерно будет стоить \
                           и практические советы на эти даты. Отвечайте на русском языке, \
                           не более 250 слов."
                .to_string(),
            sources_heading: "Источники:".to_string(),
        }
    }
}

/// Recommendation client backed by an [`LlmService`]
pub struct LlmRecommendationClient {
    service: Option<Arc<dyn LlmService>>,
    prompt: RecommendationPrompt,
    max_tokens: u32,
}

impl LlmRecommendationClient {
    /// `service` is `None` when no credential is configured
    pub fn new(
        service: Option<Arc<dyn LlmService>>,
        prompt: RecommendationPrompt,
        max_tokens: u32,
    ) -> Self {
        Self {
            service,
            prompt,
            max_tokens,
        }
    }

    fn build_request(&self, details: &TripDetails) -> LlmRequest {
        let body = format!(
            "Trip type: {}\nDestination: {}\nTravellers: {}\nDates: {}\nDeparture city: {}\n\n{}",
            details.trip_type,
            details.destination,
            details.group_size,
            details.travel_dates,
            details.departure_city,
            self.prompt.instructions,
        );

        LlmRequest {
            system: Some(self.prompt.system.clone()),
            messages: vec![LlmMessage::user(body)],
            max_tokens: Some(self.max_tokens),
            temperature: Some(0.2),
        }
    }

    fn render(&self, text: &str, citations: &[String]) -> String {
        let mut out = text.trim().to_string();
        if !citations.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.prompt.sources_heading);
            for (i, url) in citations.iter().enumerate() {
                let _ = write!(out, "\n{}. {url}", i + 1);
            }
        }
        out
    }
}

#[async_trait]
impl RecommendationClient for LlmRecommendationClient {
    async fn fetch(&self, details: &TripDetails) -> Result<String, RecommendationError> {
        let Some(service) = &self.service else {
            return Err(RecommendationError::Unavailable(
                "no API key configured".to_string(),
            ));
        };

        let request = self.build_request(details);
        let response = service.complete(&request).await?;
        Ok(self.render(&response.text, &response.citations))
    }
}

/// Fetch a recommendation with the interview's timeout applied.
///
/// Exactly one attempt. Every failure comes back as a [`RecommendationError`].
pub async fn fetch_recommendation(
    client: &dyn RecommendationClient,
    details: &TripDetails,
    limit: Duration,
) -> Result<String, RecommendationError> {
    let start = Instant::now();
    let result = match timeout(limit, client.fetch(details)).await {
        Ok(result) => result,
        Err(_) => Err(RecommendationError::Timeout),
    };

    match &result {
        Ok(text) => tracing::info!(
            duration_ms = %start.elapsed().as_millis(),
            chars = text.len(),
            destination = %details.destination,
            "Recommendation received"
        ),
        Err(e) => tracing::warn!(
            duration_ms = %start.elapsed().as_millis(),
            error = %e,
            destination = %details.destination,
            "Recommendation unavailable"
        ),
    }

    result
}
