//! Configuration for the extraction pipeline.
//!
//! Centralizes the probe knobs with sensible defaults. There is no overall
//! extraction deadline: each network-bound probe is bounded individually,
//! and a caller wanting a wall-clock budget must wrap the whole call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser-like user agent sent with page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Plain user agent for the search-engine indexing probe.
pub const SEARCH_USER_AGENT: &str = "Mozilla/5.0";

/// Master configuration for one extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Per-probe time budget in milliseconds.
    pub probe_timeout_ms: u64,
    /// User agent for the page fetch.
    pub user_agent: String,
    /// Search endpoint for the indexing probe; the authority is appended as
    /// a site-restricted query.
    pub search_endpoint: String,
    /// WHOIS referral root queried first for every registry lookup.
    pub whois_root: String,
    /// WHOIS TCP port.
    pub whois_port: u16,
    /// Upper bound on redirect hops walked by the redirect probe.
    pub max_redirect_hops: usize,
}

impl ExtractConfig {
    /// Configuration with the given per-probe timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            probe_timeout_ms: timeout.as_millis() as u64,
            ..Self::default()
        }
    }

    /// Per-probe budget as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            search_endpoint: "https://www.google.com/search".to_string(),
            whois_root: "whois.iana.org".to_string(),
            whois_port: 43,
            max_redirect_hops: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.whois_port, 43);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_with_timeout() {
        let config = ExtractConfig::with_timeout(Duration::from_millis(250));
        assert_eq!(config.probe_timeout_ms, 250);
        assert_eq!(config.max_redirect_hops, 10);
    }
}
