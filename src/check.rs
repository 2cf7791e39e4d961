//! Single-shot connectivity check against a market source.
//!
//! The check constructs a source, asks it for at most [`SAMPLE_LIMIT`]
//! markets and reports the result as human-readable lines. Every error is
//! caught here and reduced to a [`CheckOutcome`]; nothing propagates out.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::io::Write;

use tracing::{debug, error, info, instrument};

use crate::error::CheckError;
use crate::market::{Market, MarketSource};

/// Number of markets requested by the check.
pub const SAMPLE_LIMIT: u32 = 1;

/// Maximum characters of the sample question that get printed.
pub const PREVIEW_CHARS: usize = 60;

/// What a passing check observed.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Number of markets the source returned.
    pub count: usize,
    /// Truncated question of the first market, if any.
    pub sample: Option<String>,
}

/// Result of one check run.
#[derive(Debug)]
pub enum CheckOutcome {
    /// Source was built and the fetch succeeded.
    Passed(CheckReport),
    /// Construction or fetch failed.
    Failed(CheckError),
}

impl CheckOutcome {
    /// Whether the check passed.
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Passed(_))
    }

    /// Process exit status: 0 on success, 1 on failure.
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `question`.
pub fn preview(question: &str) -> String {
    question.chars().take(PREVIEW_CHARS).collect()
}

/// Sample line printed for the first market.
pub fn sample_line(market: &Market) -> String {
    format!("   Sample market: {}...", preview(market.question_or_unknown()))
}

/// Messages of `err` and all of its sources, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

/// Run the basic client check.
///
/// `connect` builds the source; a failure there counts the same as a failed
/// fetch. Status lines go to `out`; a failed write is logged and does not
/// change the outcome.
#[instrument(skip_all)]
pub async fn run_basic_check<S, F, W>(connect: F, out: &mut W) -> CheckOutcome
where
    S: MarketSource,
    F: FnOnce() -> anyhow::Result<S>,
    W: Write,
{
    emit(out, "Testing Manifold Markets client...");

    let outcome = match connect() {
        Ok(source) => {
            emit(out, "✅ Successfully created client");
            fetch_sample(&source, out).await
        }
        Err(e) => CheckOutcome::Failed(CheckError::Connect(e.into())),
    };

    match &outcome {
        CheckOutcome::Passed(report) => {
            info!(count = report.count, "Basic client check passed");
            emit(out, "✅ Basic client test passed!");
        }
        CheckOutcome::Failed(err) => {
            let chain = error_chain(err);
            error!(error = %chain.join(": "), "Basic client check failed");
            report_failure(out, &chain);
            emit(out, "❌ Basic client test failed!");
        }
    }

    outcome
}

async fn fetch_sample<S: MarketSource, W: Write>(source: &S, out: &mut W) -> CheckOutcome {
    let markets = match source.fetch_markets(SAMPLE_LIMIT).await {
        Ok(markets) => markets,
        Err(e) => return CheckOutcome::Failed(CheckError::Fetch(e)),
    };

    if markets.len() > SAMPLE_LIMIT as usize {
        return CheckOutcome::Failed(CheckError::LimitExceeded {
            requested: SAMPLE_LIMIT,
            returned: markets.len(),
        });
    }

    emit(
        out,
        format_args!("✅ Successfully fetched {} market(s)", markets.len()),
    );

    let sample = markets.first().map(|market| {
        emit(out, sample_line(market));
        preview(market.question_or_unknown())
    });

    CheckOutcome::Passed(CheckReport {
        count: markets.len(),
        sample,
    })
}

fn report_failure<W: Write>(out: &mut W, chain: &[String]) {
    emit(out, format_args!("❌ Test failed: {}", chain.join(": ")));

    if chain.len() > 1 {
        emit(out, "Caused by:");
        for (i, cause) in chain.iter().skip(1).enumerate() {
            emit(out, format_args!("    {}: {}", i, cause));
        }
    }

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        emit(out, "Stack backtrace:");
        emit(out, backtrace);
    }
}

fn emit<W: Write>(out: &mut W, line: impl std::fmt::Display) {
    if let Err(e) = writeln!(out, "{}", line) {
        debug!(error = %e, "Failed to write check output");
    }
}
