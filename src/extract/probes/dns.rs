//! DNS A-record probe.

use crate::error::Result;
use crate::timeout::{with_timeout, ProbeTimeout};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

/// Resolve the host's A records using the system-independent default
/// resolver configuration. NXDOMAIN and transport errors both surface as
/// `Err`; the extractor scores either as phishing-leaning.
pub async fn resolve_a(host: &str, timeout: Duration) -> Result<Vec<Ipv4Addr>> {
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let lookup = with_timeout(ProbeTimeout::new(timeout, "dns"), async {
        Ok(resolver.ipv4_lookup(host.to_string()).await?)
    })
    .await?;

    let addrs: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
    debug!(host, records = addrs.len(), "A lookup complete");
    Ok(addrs)
}
