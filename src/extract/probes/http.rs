//! HTTP probes: page fetch, redirect-hop walk, search-engine indexing.

use crate::error::{PhishscanError, Result};
use crate::extract::config::{ExtractConfig, SEARCH_USER_AGENT};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Url;
use tracing::debug;

/// Marker the search engine embeds when a site-restricted query has no hits.
const NOT_INDEXED_MARKER: &str = "did not match any documents";

/// Build the client used for the page fetch and the search probe.
///
/// Certificate errors are tolerated on purpose: the page of a phishing site
/// with a broken certificate is still worth inspecting, and the TLS probe
/// judges the certificate separately.
pub fn page_client(config: &ExtractConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.probe_timeout())
        .danger_accept_invalid_certs(true)
        .redirect(Policy::limited(config.max_redirect_hops))
        .build()?)
}

/// Client that never follows redirects, for the hop-counting walk.
pub fn no_redirect_client(config: &ExtractConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.probe_timeout())
        .danger_accept_invalid_certs(true)
        .redirect(Policy::none())
        .build()?)
}

/// Fetch the page body with a browser-like user agent.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let body = response.text().await?;
    debug!(url, bytes = body.len(), "page fetched");
    Ok(body)
}

/// Walk redirects manually and count the hops taken to reach a
/// non-redirect response.
pub async fn count_redirect_hops(
    client: &reqwest::Client,
    url: &str,
    max_hops: usize,
) -> Result<usize> {
    let mut current = Url::parse(url).map_err(|e| PhishscanError::Http(e.to_string()))?;
    let mut hops = 0;

    loop {
        let response = client.get(current.clone()).send().await?;
        if !response.status().is_redirection() {
            return Ok(hops);
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| PhishscanError::Http("redirect without Location".to_string()))?;

        current = current
            .join(location)
            .map_err(|e| PhishscanError::Http(format!("bad Location {:?}: {}", location, e)))?;
        hops += 1;

        if hops >= max_hops {
            return Ok(hops);
        }
    }
}

/// Issue a site-restricted search query and report whether the engine knows
/// the host. An explicit no-results marker means unindexed; any other
/// response counts as indexed.
pub async fn search_indexed(
    client: &reqwest::Client,
    config: &ExtractConfig,
    authority: &str,
) -> Result<bool> {
    let url = Url::parse_with_params(
        &config.search_endpoint,
        &[("q", format!("site:{}", authority))],
    )
    .map_err(|e| PhishscanError::Http(e.to_string()))?;

    let body = client
        .get(url)
        .header(reqwest::header::USER_AGENT, SEARCH_USER_AGENT)
        .send()
        .await?
        .text()
        .await?;

    Ok(!body.contains(NOT_INDEXED_MARKER))
}
