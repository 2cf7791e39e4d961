//! Manifold Markets read client and connectivity smoke test.
//!
//! The smoke test builds a client, asks the API for a single market and
//! reports pass/fail:
//!
//! ```text
//! Testing Manifold Markets client...
//! ✅ Successfully created client
//! ✅ Successfully fetched 1 market(s)
//!    Sample market: Will X happen by 2030?...
//! ✅ Basic client test passed!
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Record types, the `MarketSource` seam, REST and mock clients
//! - [`check`]: The verification harness
//! - [`metrics`]: Request latency and failure metrics

pub mod check;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;

pub use check::{run_basic_check, CheckOutcome, CheckReport};
pub use config::Config;
pub use error::{AppError, Result};
