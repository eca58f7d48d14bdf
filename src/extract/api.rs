//! The extractor: one instance per URL, all 30 features, never a thrown
//! probe error.
//!
//! Probes run sequentially within one extraction, each bounded by the
//! configured per-probe timeout. Every probe failure degrades to the owning
//! feature's documented default score, so the worst outcome of any internal
//! fault is a single flipped feature, never an aborted extraction. The only
//! fallible step from the caller's perspective is parsing the input URL.

use crate::core::feature::{Feature, FeatureVector, FeatureVectorBuilder};
use crate::core::score::TernaryScore;
use crate::core::target::UrlTarget;
use crate::error::{PhishscanError, Result};
use crate::extract::config::ExtractConfig;
use crate::extract::content::{self, PageSnapshot};
use crate::extract::lexical;
use crate::extract::probes::{dns, http, tls, whois};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

/// Registration shorter than a year is a throwaway domain.
const MIN_REGISTRATION_DAYS: i64 = 365;
/// Domains younger than six months lean phishing.
const MIN_DOMAIN_AGE_DAYS: i64 = 180;
/// Redirect-hop bands.
const REDIRECT_LEGITIMATE_MAX: usize = 1;
const REDIRECT_SUSPICIOUS_MAX: usize = 4;

/// Extract the feature vector for one URL with the given per-probe timeout.
///
/// Total and non-throwing apart from an unparseable URL. May perform real
/// outbound network I/O (TLS, DNS, WHOIS, HTTP); worst-case latency is
/// probe-count times the timeout, and callers must not retry automatically
/// on transient failure.
pub async fn extract(url: &str, timeout: Duration) -> Result<FeatureVector> {
    let extractor = UrlFeatureExtractor::new(url, ExtractConfig::with_timeout(timeout))?;
    Ok(extractor.run().await)
}

/// Extract feature vectors for a batch of URLs, one independent extractor
/// per URL, in parallel. Results come back in input order; a per-URL error
/// (an unparseable URL) does not affect its neighbors.
pub async fn extract_batch(urls: &[String], config: &ExtractConfig) -> Vec<Result<FeatureVector>> {
    let mut handles: Vec<tokio::task::JoinHandle<Result<FeatureVector>>> =
        Vec::with_capacity(urls.len());
    for url in urls {
        let url = url.clone();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            let extractor = UrlFeatureExtractor::new(&url, config)?;
            Ok(extractor.run().await)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(PhishscanError::Internal(format!("extraction task: {}", e))),
        });
    }
    results
}

/// One extraction: a normalized target, a per-probe budget, and the
/// write-once page snapshot shared by every content feature. Created per
/// URL and discarded afterwards; holds no cross-extraction state.
pub struct UrlFeatureExtractor {
    target: UrlTarget,
    config: ExtractConfig,
    page_client: reqwest::Client,
    hop_client: reqwest::Client,
    /// `None` until the fetch runs, and still `None` afterwards when the
    /// fetch failed; content features then fall back to their fail-open
    /// defaults.
    snapshot: Option<PageSnapshot>,
    /// Single per-extraction WHOIS cache shared by the three
    /// registry-dependent features. Outer `None` means not yet queried.
    whois_cache: Option<Option<whois::WhoisRecord>>,
}

impl UrlFeatureExtractor {
    pub fn new(url: &str, config: ExtractConfig) -> Result<Self> {
        let target = UrlTarget::parse(url)?;
        let page_client = http::page_client(&config)?;
        let hop_client = http::no_redirect_client(&config)?;
        Ok(Self {
            target,
            config,
            page_client,
            hop_client,
            snapshot: None,
            whois_cache: None,
        })
    }

    /// Run every feature check in canonical order and return the complete
    /// vector.
    pub async fn run(mut self) -> FeatureVector {
        info!(url = %self.target.raw(), "extracting features");
        let mut builder = FeatureVectorBuilder::new();

        // Address-bar lexical group: no network access.
        let raw = self.target.raw().to_string();
        let authority = self.target.authority().to_string();
        builder.set(Feature::HavingIpAddress, lexical::ip_literal(&authority));
        builder.set(Feature::UrlLength, lexical::url_length(&raw));
        builder.set(
            Feature::ShorteningService,
            lexical::shortening_service(&authority),
        );
        builder.set(Feature::HavingAtSymbol, lexical::at_symbol(&raw));
        builder.set(
            Feature::DoubleSlashRedirecting,
            lexical::double_slash_redirecting(&raw),
        );
        builder.set(Feature::PrefixSuffix, lexical::prefix_suffix(&authority));
        builder.set(Feature::HavingSubDomain, lexical::sub_domain(&authority));
        builder.set(Feature::Port, lexical::port(self.target.port()));
        builder.set(Feature::HttpsToken, lexical::https_token(&authority));

        // Network probes and the shared page snapshot.
        builder.set(Feature::SslFinalState, self.ssl_final_state().await);
        builder.set(
            Feature::DomainRegistrationLength,
            self.domain_registration_length().await,
        );

        self.fetch_snapshot().await;

        builder.set(
            Feature::Favicon,
            self.content_score(|s| content::favicon(s, &authority)),
        );
        builder.set(
            Feature::RequestUrl,
            self.content_score(|s| content::request_url(s, &authority)),
        );
        builder.set(
            Feature::UrlOfAnchor,
            self.content_score(|s| content::url_of_anchor(s, &authority)),
        );
        builder.set(
            Feature::LinksInTags,
            self.content_score(|s| content::links_in_tags(s, &authority)),
        );
        builder.set(Feature::Sfh, self.content_score(|s| content::sfh(s, &authority)));
        builder.set(
            Feature::SubmittingToEmail,
            self.content_score(content::submitting_to_email),
        );
        builder.set(Feature::AbnormalUrl, self.abnormal_url().await);
        builder.set(Feature::Redirect, self.redirect().await);
        builder.set(Feature::OnMouseover, self.content_score(content::on_mouseover));
        builder.set(Feature::RightClick, self.content_score(content::right_click));
        builder.set(Feature::PopupWindow, self.content_score(content::popup_window));
        builder.set(Feature::Iframe, self.content_score(content::iframe));
        builder.set(Feature::AgeOfDomain, self.age_of_domain().await);

        // Domain and traffic group.
        builder.set(Feature::DnsRecord, self.dns_record().await);
        builder.set(Feature::WebTraffic, Self::web_traffic());
        builder.set(Feature::PageRank, Self::page_rank());
        builder.set(Feature::GoogleIndex, self.google_index().await);
        builder.set(Feature::LinksPointingToPage, Self::links_pointing_to_page());
        builder.set(Feature::StatisticalReport, Self::statistical_report());

        match builder.build() {
            Ok(vector) => {
                info!(url = %raw, "extraction complete");
                vector
            }
            // run() writes every slot above; a miss is a programming error
            Err(feature) => unreachable!("feature {} not populated", feature),
        }
    }

    /// Fetch the page once and distill it. A fetch failure leaves the
    /// snapshot absent and is logged, not propagated.
    async fn fetch_snapshot(&mut self) {
        match http::fetch_page(&self.page_client, self.target.raw()).await {
            Ok(body) => self.snapshot = Some(PageSnapshot::parse(&body)),
            Err(e) => {
                debug!(url = %self.target.raw(), error = %e, "page fetch failed");
            }
        }
    }

    fn content_score<F>(&self, check: F) -> TernaryScore
    where
        F: FnOnce(&PageSnapshot) -> TernaryScore,
    {
        match &self.snapshot {
            Some(snapshot) => check(snapshot),
            // fail-open: no content means nothing suspicious was seen
            None => TernaryScore::Legitimate,
        }
    }

    /// WHOIS record, fetched at most once per extraction and shared by the
    /// three registry-dependent features.
    async fn whois(&mut self) -> Option<&whois::WhoisRecord> {
        if self.whois_cache.is_none() {
            let outcome = match whois::lookup(self.target.host(), &self.config).await {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(host = self.target.host(), error = %e, "WHOIS lookup failed");
                    None
                }
            };
            self.whois_cache = Some(outcome);
        }
        self.whois_cache.as_ref().and_then(|cached| cached.as_ref())
    }

    async fn ssl_final_state(&self) -> TernaryScore {
        if self.target.scheme() != "https" {
            return TernaryScore::Phishing;
        }
        match tls::peer_certificate_count(self.target.host(), self.config.probe_timeout()).await {
            Ok(0) => TernaryScore::Suspicious,
            Ok(_) => TernaryScore::Legitimate,
            Err(e) => {
                debug!(host = self.target.host(), error = %e, "TLS probe failed");
                TernaryScore::Phishing
            }
        }
    }

    async fn domain_registration_length(&mut self) -> TernaryScore {
        match self.whois().await.and_then(|r| r.registration_days()) {
            Some(days) if days >= MIN_REGISTRATION_DAYS => TernaryScore::Legitimate,
            _ => TernaryScore::Phishing,
        }
    }

    async fn abnormal_url(&mut self) -> TernaryScore {
        let url_lower = self.target.raw().to_lowercase();
        match self.whois().await.and_then(|r| r.domain_name.as_deref()) {
            Some(name) if url_lower.contains(name) => TernaryScore::Legitimate,
            _ => TernaryScore::Phishing,
        }
    }

    async fn age_of_domain(&mut self) -> TernaryScore {
        match self.whois().await.and_then(|r| r.age_days(Utc::now())) {
            Some(days) if days >= MIN_DOMAIN_AGE_DAYS => TernaryScore::Legitimate,
            _ => TernaryScore::Phishing,
        }
    }

    async fn redirect(&self) -> TernaryScore {
        match http::count_redirect_hops(
            &self.hop_client,
            self.target.raw(),
            self.config.max_redirect_hops,
        )
        .await
        {
            Ok(hops) if hops <= REDIRECT_LEGITIMATE_MAX => TernaryScore::Legitimate,
            Ok(hops) if hops <= REDIRECT_SUSPICIOUS_MAX => TernaryScore::Suspicious,
            Ok(_) => TernaryScore::Phishing,
            Err(e) => {
                debug!(url = %self.target.raw(), error = %e, "redirect walk failed");
                TernaryScore::Phishing
            }
        }
    }

    async fn dns_record(&self) -> TernaryScore {
        match dns::resolve_a(self.target.host(), self.config.probe_timeout()).await {
            Ok(addrs) if !addrs.is_empty() => TernaryScore::Legitimate,
            Ok(_) => TernaryScore::Phishing,
            Err(e) => {
                debug!(host = self.target.host(), error = %e, "DNS probe failed");
                TernaryScore::Phishing
            }
        }
    }

    async fn google_index(&self) -> TernaryScore {
        match http::search_indexed(&self.page_client, &self.config, self.target.authority()).await
        {
            Ok(true) => TernaryScore::Legitimate,
            Ok(false) => TernaryScore::Phishing,
            Err(e) => {
                debug!(authority = self.target.authority(), error = %e, "search probe failed");
                TernaryScore::Phishing
            }
        }
    }

    /// Not implemented: traffic-rank feeds (Alexa and successors) have no
    /// integration. Returns the neutral constant 0.
    fn web_traffic() -> TernaryScore {
        TernaryScore::Suspicious
    }

    /// Not implemented: PageRank is no longer published. Returns the
    /// neutral constant 0.
    fn page_rank() -> TernaryScore {
        TernaryScore::Suspicious
    }

    /// Not implemented: backlink counts need an SEO API. Returns the
    /// neutral constant 0.
    fn links_pointing_to_page() -> TernaryScore {
        TernaryScore::Suspicious
    }

    /// Not implemented: no threat-feed (PhishTank/APWG) integration.
    /// Returns the constant 1, legitimate unless reported.
    fn statistical_report() -> TernaryScore {
        TernaryScore::Legitimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(url: &str) -> UrlFeatureExtractor {
        UrlFeatureExtractor::new(url, ExtractConfig::with_timeout(Duration::from_millis(100)))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_unparseable_url() {
        let result = UrlFeatureExtractor::new("", ExtractConfig::default());
        assert!(matches!(result, Err(PhishscanError::InvalidUrl { .. })));
    }

    #[test]
    fn test_placeholders_are_constant() {
        assert_eq!(UrlFeatureExtractor::web_traffic(), TernaryScore::Suspicious);
        assert_eq!(UrlFeatureExtractor::page_rank(), TernaryScore::Suspicious);
        assert_eq!(
            UrlFeatureExtractor::links_pointing_to_page(),
            TernaryScore::Suspicious
        );
        assert_eq!(
            UrlFeatureExtractor::statistical_report(),
            TernaryScore::Legitimate
        );
    }

    #[tokio::test]
    async fn test_content_scores_fail_open_without_snapshot() {
        // every page-content feature defaults legitimate when the fetch
        // yielded no document
        let ex = extractor("http://example.com");
        assert!(ex.snapshot.is_none());
        let authority = ex.target.authority().to_string();
        assert_eq!(
            ex.content_score(|s| content::request_url(s, &authority)),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(|s| content::url_of_anchor(s, &authority)),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(|s| content::sfh(s, &authority)),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(content::submitting_to_email),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(content::on_mouseover),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(content::right_click),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(content::popup_window),
            TernaryScore::Legitimate
        );
        assert_eq!(
            ex.content_score(content::iframe),
            TernaryScore::Legitimate
        );
    }

    #[tokio::test]
    async fn test_non_https_scheme_is_phishing_without_network() {
        let ex = extractor("http://example.com");
        assert_eq!(ex.ssl_final_state().await, TernaryScore::Phishing);
    }
}
