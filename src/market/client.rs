//! Manifold Markets REST client (read-only endpoints).

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::ClientError;
use crate::metrics::{self, LatencyTimer};

use super::source::MarketSource;
use super::types::{Bet, Market, Position, SearchFilter, User};

/// Maximum page size for `/markets` and `/bets`.
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Maximum page size for `/search-markets`.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Manifold Markets API client.
#[derive(Debug, Clone)]
pub struct ManifoldClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for the REST API, no trailing slash.
    base_url: String,
}

impl ManifoldClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        config.validate().map_err(ClientError::InvalidConfig)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(config.manifold_user_agent.clone())
            .pool_max_idle_per_host(config.manifold_http_pool_size)
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout_ms) = config.manifold_http_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let http = builder.build()?;

        debug!(base_url = %config.api_base(), "Created Manifold client");

        Ok(Self {
            http,
            base_url: config.api_base().to_string(),
        })
    }

    /// Create a client from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        let config = Config::load()?;
        Ok(Self::new(&config)?)
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List markets, newest first. `before` is a market ID to page from.
    #[instrument(skip(self))]
    pub async fn get_markets(
        &self,
        limit: u32,
        before: Option<&str>,
    ) -> Result<Vec<Market>, ClientError> {
        check_limit(limit, MAX_LIST_LIMIT)?;

        let mut query = vec![("limit", limit.to_string())];
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }

        let markets: Vec<Market> = self.get_json("/markets", "/markets", &query).await?;
        info!(count = markets.len(), "Fetched markets from Manifold");
        Ok(markets)
    }

    /// Get one market by ID.
    #[instrument(skip(self))]
    pub async fn get_market(&self, market_id: &str) -> Result<Market, ClientError> {
        let path = format!("/market/{}", market_id);
        let market: Market = self.get_json("/market", &path, &[]).await?;
        info!(question = %market.question_or_unknown(), "Fetched market");
        Ok(market)
    }

    /// Full-text market search.
    #[instrument(skip(self))]
    pub async fn search_markets(
        &self,
        term: &str,
        limit: u32,
        filter: SearchFilter,
    ) -> Result<Vec<Market>, ClientError> {
        check_limit(limit, MAX_SEARCH_LIMIT)?;

        let query = [
            ("term", term.to_string()),
            ("limit", limit.to_string()),
            ("filter", filter.to_string()),
        ];

        let markets: Vec<Market> = self
            .get_json("/search-markets", "/search-markets", &query)
            .await?;
        info!(count = markets.len(), term = %term, "Searched markets");
        Ok(markets)
    }

    /// Recent bets, optionally restricted to one user.
    #[instrument(skip(self))]
    pub async fn get_user_bets(
        &self,
        username: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Bet>, ClientError> {
        check_limit(limit, MAX_LIST_LIMIT)?;

        let mut query = vec![("limit", limit.to_string())];
        if let Some(username) = username {
            query.push(("username", username.to_string()));
        }

        let bets: Vec<Bet> = self.get_json("/bets", "/bets", &query).await?;
        info!(count = bets.len(), "Fetched bets");
        Ok(bets)
    }

    /// Recent bets on one market.
    #[instrument(skip(self))]
    pub async fn get_market_bets(
        &self,
        market_id: &str,
        limit: u32,
    ) -> Result<Vec<Bet>, ClientError> {
        check_limit(limit, MAX_LIST_LIMIT)?;

        let query = [
            ("limit", limit.to_string()),
            ("contractId", market_id.to_string()),
        ];

        let bets: Vec<Bet> = self.get_json("/bets", "/bets", &query).await?;
        info!(count = bets.len(), market_id = %market_id, "Fetched market bets");
        Ok(bets)
    }

    /// Look up a user by username.
    #[instrument(skip(self))]
    pub async fn get_user(&self, username: &str) -> Result<User, ClientError> {
        let path = format!("/user/{}", username);
        let user: User = self.get_json("/user", &path, &[]).await?;
        info!(username = %username, "Fetched user");
        Ok(user)
    }

    /// Current positions held by a user.
    #[instrument(skip(self))]
    pub async fn get_user_positions(&self, username: &str) -> Result<Vec<Position>, ClientError> {
        let path = format!("/user/{}/positions", username);
        let positions: Vec<Position> = self.get_json("/user/positions", &path, &[]).await?;
        info!(count = positions.len(), username = %username, "Fetched positions");
        Ok(positions)
    }

    /// GET `path` and decode the JSON body. `endpoint` is the metrics label.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let _timer = LatencyTimer::new(endpoint);
        metrics::inc_http_requests(endpoint);

        let result = self.send_get(&url, path, query).await;
        if let Err(e) = &result {
            metrics::inc_http_request_failures(endpoint);
            warn!(path = %path, error = %e, "Manifold request failed");
        }
        result
    }

    async fn send_get<T: DeserializeOwned>(
        &self,
        url: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        debug!(url = %url, "GET");

        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Parse(format!("{} response: {}", path, e)))
    }
}

#[async_trait]
impl MarketSource for ManifoldClient {
    async fn fetch_markets(&self, limit: u32) -> Result<Vec<Market>, ClientError> {
        self.get_markets(limit, None).await
    }
}

fn check_limit(limit: u32, max: u32) -> Result<(), ClientError> {
    if limit == 0 || limit > max {
        return Err(ClientError::InvalidLimit { limit, max });
    }
    Ok(())
}
