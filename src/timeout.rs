//! Timeout utilities for network-bound probes.
//!
//! Every probe the extractor issues (TLS handshake, DNS query, WHOIS lookup)
//! is bounded by a per-probe time budget. HTTP probes carry their budget
//! inside the reqwest client instead. Nothing bounds total extraction
//! latency; the worst case is probe-count times the configured budget.

use crate::error::{PhishscanError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default per-probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout configuration for a single probe
#[derive(Debug, Clone)]
pub struct ProbeTimeout {
    /// Maximum duration for the probe
    pub duration: Duration,
    /// Probe name for logging and error reporting
    pub probe: &'static str,
}

impl ProbeTimeout {
    /// Create a new probe timeout
    pub fn new(duration: Duration, probe: &'static str) -> Self {
        Self { duration, probe }
    }
}

/// Execute an async probe with a timeout.
///
/// A timeout produces [`PhishscanError::Timeout`]; the caller maps it to the
/// owning feature's default score like any other probe failure.
pub async fn with_timeout<T, F>(config: ProbeTimeout, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        probe = config.probe,
        budget_ms = config.duration.as_millis() as u64,
        "starting probe"
    );

    match timeout(config.duration, future).await {
        Ok(result) => {
            debug!(probe = config.probe, "probe completed");
            result
        }
        Err(_) => {
            warn!(
                probe = config.probe,
                budget_ms = config.duration.as_millis() as u64,
                "probe timed out"
            );
            Err(PhishscanError::Timeout {
                probe: config.probe,
                millis: config.duration.as_millis() as u64,
            })
        }
    }
}
