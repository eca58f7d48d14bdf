//! Network-bound probes: DNS resolution, TLS handshake, WHOIS registry
//! lookup, and HTTP fetches. Each probe returns a `Result` and is mapped to
//! a ternary score by the extractor; failures never abort an extraction.

pub mod dns;
pub mod http;
pub mod tls;
pub mod whois;
