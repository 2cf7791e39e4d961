//! Market module for the Manifold Markets read API.
//!
//! This module handles:
//! - Market, bet, user and position record types
//! - The `MarketSource` capability the smoke test depends on
//! - Manifold REST client
//! - Mock client for testing

pub mod client;
pub mod mock;
pub mod source;
pub mod types;

pub use client::{ManifoldClient, MAX_LIST_LIMIT, MAX_SEARCH_LIMIT};
pub use mock::{MockConfig, MockManifoldClient, MockMarketBuilder};
pub use source::MarketSource;
pub use types::{Bet, Market, Position, SearchFilter, User, UNKNOWN_QUESTION};
