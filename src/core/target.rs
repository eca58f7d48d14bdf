//! The normalized extraction target.
//!
//! A URL is normalized and parsed exactly once per extraction; every feature
//! check reads the same derived parts. Nothing re-parses mid-extraction,
//! even after the page body has been fetched.

use crate::error::{PhishscanError, Result};
use url::Url;

/// A URL prepared for feature extraction.
#[derive(Debug, Clone)]
pub struct UrlTarget {
    raw: String,
    url: Url,
    authority: String,
}

impl UrlTarget {
    /// Normalize and parse an input URL. Inputs without a scheme are
    /// prefixed with `http://` before parsing; this is the only mutation
    /// the input ever receives.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = if input.starts_with("http") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        let url = Url::parse(&raw).map_err(|e| PhishscanError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        let host = url
            .host_str()
            .ok_or_else(|| PhishscanError::InvalidUrl {
                url: input.to_string(),
                reason: "no host in URL".to_string(),
            })?
            .to_string();

        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        };

        Ok(Self { raw, url, authority })
    }

    /// The normalized URL string, as used for length and substring checks.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// URL scheme (`http`, `https`, ...).
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host without port.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// The authority (`host[:port]`) the lexical checks run against.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Explicit port, if one was written in the URL.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_normalization() {
        let target = UrlTarget::parse("example.com/login").unwrap();
        assert_eq!(target.raw(), "http://example.com/login");
        assert_eq!(target.scheme(), "http");

        let target = UrlTarget::parse("https://example.com").unwrap();
        assert_eq!(target.raw(), "https://example.com");
        assert_eq!(target.scheme(), "https");
    }

    #[test]
    fn test_authority_includes_port() {
        let target = UrlTarget::parse("http://example.com:8080/x").unwrap();
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.authority(), "example.com:8080");
        assert_eq!(target.port(), Some(8080));

        let target = UrlTarget::parse("http://example.com/x").unwrap();
        assert_eq!(target.authority(), "example.com");
        assert_eq!(target.port(), None);
    }

    #[test]
    fn test_default_port_is_elided() {
        // url treats :80 on http as the default port, not an explicit one
        let target = UrlTarget::parse("http://example.com:80/").unwrap();
        assert_eq!(target.port(), None);
    }

    #[test]
    fn test_unparseable_input() {
        assert!(matches!(
            UrlTarget::parse(""),
            Err(PhishscanError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_ip_host() {
        let target = UrlTarget::parse("http://192.168.1.1").unwrap();
        assert_eq!(target.host(), "192.168.1.1");
        assert_eq!(target.authority(), "192.168.1.1");
    }
}
