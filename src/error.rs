//! Error types for the phishscan URL feature extraction library.
//!
//! This module provides structured error handling using thiserror. Probe
//! errors never cross the extractor's public boundary: each one degrades to
//! the owning feature's documented default score. The only error a caller of
//! [`crate::extract`] sees is an unparseable input URL.

use thiserror::Error;

/// Main error type for phishscan operations.
#[derive(Debug, Error)]
pub enum PhishscanError {
    /// The input URL could not be parsed even after scheme normalization
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A network-bound probe exceeded its time budget
    #[error("Probe '{probe}' timed out after {millis}ms")]
    Timeout { probe: &'static str, millis: u64 },

    /// DNS resolution errors
    #[error("DNS error: {0}")]
    Dns(String),

    /// TLS handshake errors
    #[error("TLS error: {0}")]
    Tls(String),

    /// WHOIS transport errors (connect, query, read)
    #[error("WHOIS error: {0}")]
    Whois(String),

    /// HTTP transport errors (page fetch, redirect walk, search query)
    #[error("HTTP error: {0}")]
    Http(String),

    /// WHOIS answered but did not carry the field a feature needs
    #[error("Registry data missing: {0}")]
    MissingRegistryData(&'static str),

    /// Network I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for phishscan operations
pub type Result<T> = std::result::Result<T, PhishscanError>;

impl From<reqwest::Error> for PhishscanError {
    fn from(err: reqwest::Error) -> Self {
        PhishscanError::Http(err.to_string())
    }
}

impl From<hickory_resolver::error::ResolveError> for PhishscanError {
    fn from(err: hickory_resolver::error::ResolveError) -> Self {
        PhishscanError::Dns(err.to_string())
    }
}
