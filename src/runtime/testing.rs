//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a real completion service.

use super::traits::*;
use crate::recommendation::{RecommendationError, TripDetails};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Recommendation Client
// ============================================================================

/// Mock client that returns queued results
pub struct MockRecommendationClient {
    results: Mutex<VecDeque<Result<String, RecommendationError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<TripDetails>>,
}

impl MockRecommendationClient {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful recommendation
    pub fn queue_text(&self, text: impl Into<String>) {
        self.results.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: RecommendationError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<TripDetails> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationClient for MockRecommendationClient {
    async fn fetch(&self, details: &TripDetails) -> Result<String, RecommendationError> {
        self.requests.lock().unwrap().push(details.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RecommendationError::Unavailable("no mock result queued".to_string())))
    }
}

// ============================================================================
// Delayed Recommendation Client
// ============================================================================

/// Answers with a fixed text after a delay; used for timeout and
/// concurrency tests
pub struct DelayedRecommendationClient {
    delay: Duration,
    text: String,
}

impl DelayedRecommendationClient {
    pub fn new(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            text: text.into(),
        }
    }
}

#[async_trait]
impl RecommendationClient for DelayedRecommendationClient {
    async fn fetch(&self, details: &TripDetails) -> Result<String, RecommendationError> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("{} ({})", self.text, details.destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> TripDetails {
        TripDetails {
            trip_type: "business trip".to_string(),
            destination: "Oslo".to_string(),
            group_size: "1".to_string(),
            travel_dates: "March".to_string(),
            departure_city: "Riga".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_recommendation_client() {
        let mock = MockRecommendationClient::new();
        mock.queue_text("Take the ferry.");

        assert_eq!(mock.fetch(&details()).await.unwrap(), "Take the ferry.");

        // Second call should fail (nothing queued)
        let result = mock.fetch(&details()).await;
        assert!(matches!(result, Err(RecommendationError::Unavailable(_))));
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_delayed_client_mentions_destination() {
        let client = DelayedRecommendationClient::new(Duration::from_millis(1), "Enjoy");
        assert_eq!(client.fetch(&details()).await.unwrap(), "Enjoy (Oslo)");
    }
}
