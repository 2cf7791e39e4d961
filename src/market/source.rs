//! The market-listing capability the smoke test depends on.

use async_trait::async_trait;

use crate::error::ClientError;

use super::types::Market;

/// Anything that can list markets with an upper bound on the count.
///
/// The verification harness only ever talks to this trait, so a live
/// [`ManifoldClient`](super::ManifoldClient) and the in-memory
/// [`MockManifoldClient`](super::MockManifoldClient) are interchangeable.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch at most `limit` markets, in the order the source returns them.
    async fn fetch_markets(&self, limit: u32) -> Result<Vec<Market>, ClientError>;
}
