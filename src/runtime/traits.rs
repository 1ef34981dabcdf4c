//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::recommendation::{RecommendationError, TripDetails};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for fetching travel recommendations
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// One attempt; the caller applies the timeout
    async fn fetch(&self, details: &TripDetails) -> Result<String, RecommendationError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: RecommendationClient + ?Sized> RecommendationClient for Arc<T> {
    async fn fetch(&self, details: &TripDetails) -> Result<String, RecommendationError> {
        (**self).fetch(details).await
    }
}
