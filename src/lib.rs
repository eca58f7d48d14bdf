//! Phishscan: heuristic URL feature extraction for phishing detection.
//!
//! Given a raw URL, the extractor runs a fixed set of 30 heuristic checks
//! (lexical patterns, a live TLS handshake, DNS resolution, WHOIS registry
//! lookups, and parsed-HTML analysis of the fetched page) and reduces each
//! into a ternary score. The resulting [`FeatureVector`] always carries all
//! 30 features in the canonical column order expected by a downstream
//! classifier.

/// Core data types module
pub mod core;

/// Error types
pub mod error;

/// Extraction pipeline: lexical checks, content checks, network probes
pub mod extract;

/// Logging and tracing setup
pub mod logging;

/// Timeout utilities for network-bound probes
pub mod timeout;

pub use crate::core::feature::{Feature, FeatureVector};
pub use crate::core::score::TernaryScore;
pub use crate::core::target::UrlTarget;
pub use crate::error::{PhishscanError, Result};
pub use crate::extract::api::{extract, extract_batch, UrlFeatureExtractor};
pub use crate::extract::config::ExtractConfig;
