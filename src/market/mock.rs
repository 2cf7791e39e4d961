//! Mock Manifold client for unit testing.
//!
//! This module provides a mock client that can be used in tests
//! without making real network requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ClientError;

use super::source::MarketSource;
use super::types::Market;

/// Configuration for mock client behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail market listing requests.
    pub fail_markets: bool,
    /// Error text used when failing.
    pub failure_reason: Option<String>,
    /// Ignore the requested limit and return every stored market.
    pub ignore_limit: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock Manifold client for testing.
#[derive(Debug, Clone, Default)]
pub struct MockManifoldClient {
    /// Mock configuration.
    config: MockConfig,
    /// Stored markets, returned in insertion order.
    markets: Arc<Mutex<Vec<Market>>>,
    /// Number of `fetch_markets` calls seen.
    calls: Arc<AtomicUsize>,
}

impl MockManifoldClient {
    /// Create a new mock client with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Mock that fails every fetch with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            fail_markets: true,
            failure_reason: Some(reason.into()),
            ..MockConfig::default()
        })
    }

    /// Add a mock market.
    pub fn add_market(&self, market: Market) {
        self.lock_markets().push(market);
    }

    /// Clear all mock data.
    pub fn clear(&self) {
        self.lock_markets().clear();
    }

    /// How many times `fetch_markets` was called.
    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock_markets(&self) -> std::sync::MutexGuard<'_, Vec<Market>> {
        self.markets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MarketSource for MockManifoldClient {
    async fn fetch_markets(&self, limit: u32) -> Result<Vec<Market>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail_markets {
            let reason = self
                .config
                .failure_reason
                .clone()
                .unwrap_or_else(|| "Mock markets failure".to_string());
            return Err(ClientError::Status {
                endpoint: "/markets".to_string(),
                status: 503,
                body: reason,
            });
        }

        let markets = self.lock_markets();
        let take = if self.config.ignore_limit {
            markets.len()
        } else {
            limit as usize
        };
        Ok(markets.iter().take(take).cloned().collect())
    }
}

/// Builder for market fixtures.
#[derive(Debug, Default)]
pub struct MockMarketBuilder {
    market: Market,
}

impl MockMarketBuilder {
    /// Start a market with the given question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            market: Market::with_question(question),
        }
    }

    /// Market without a question field.
    pub fn untitled() -> Self {
        Self::default()
    }

    /// Set the market ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.market.id = Some(id.into());
        self
    }

    /// Set the current probability.
    pub fn probability(mut self, probability: f64) -> Self {
        self.market.probability = Some(probability);
        self
    }

    /// Set the creator's username.
    pub fn creator(mut self, username: impl Into<String>) -> Self {
        self.market.creator_username = Some(username.into());
        self
    }

    /// Mark the market resolved.
    pub fn resolved(mut self) -> Self {
        self.market.is_resolved = Some(true);
        self
    }

    /// Build the market.
    pub fn build(self) -> Market {
        self.market
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_client_respects_limit() {
        let client = MockManifoldClient::new();
        client.add_market(MockMarketBuilder::new("first").id("m1").build());
        client.add_market(MockMarketBuilder::new("second").id("m2").build());

        let markets = client.fetch_markets(1).await.unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].id.as_deref(), Some("m1"));
        assert_eq!(client.fetch_count(), 1);
    }

    #[tokio::test]
    async fn mock_client_failure_modes() {
        let client = MockManifoldClient::failing("connection refused");

        let err = client.fetch_markets(1).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn mock_client_can_overreturn() {
        let client = MockManifoldClient::with_config(MockConfig {
            ignore_limit: true,
            ..Default::default()
        });
        client.add_market(MockMarketBuilder::new("a").build());
        client.add_market(MockMarketBuilder::new("b").build());

        assert_eq!(client.fetch_markets(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mock_client_simulates_latency() {
        let client = MockManifoldClient::with_config(MockConfig {
            latency_ms: 25,
            ..Default::default()
        });
        client.add_market(MockMarketBuilder::new("slow").build());

        let start = std::time::Instant::now();
        let markets = client.fetch_markets(1).await.unwrap();

        assert_eq!(markets.len(), 1);
        assert!(start.elapsed() >= std::time::Duration::from_millis(25));
    }

    #[test]
    fn mock_client_clear_empties_store() {
        let client = MockManifoldClient::new();
        client.add_market(MockMarketBuilder::untitled().build());
        client.clear();

        let markets = tokio_test::block_on(client.fetch_markets(10)).unwrap();
        assert!(markets.is_empty());
    }

    #[test]
    fn mock_market_builder() {
        let market = MockMarketBuilder::new("Will it rain?")
            .id("m1")
            .probability(0.3)
            .creator("bob")
            .resolved()
            .build();

        assert_eq!(market.question_or_unknown(), "Will it rain?");
        assert_eq!(market.probability, Some(0.3));
        assert_eq!(market.creator_username.as_deref(), Some("bob"));
        assert_eq!(market.is_resolved, Some(true));
    }
}
