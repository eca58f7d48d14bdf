//! WHOIS registry probe.
//!
//! Speaks the port-43 protocol directly: the IANA root is queried first and
//! its `refer:` line, when present, points at the registry responsible for
//! the TLD. Registry responses are line-oriented key/value text with no
//! standard schema, so parsing accepts the handful of field spellings and
//! date formats the large registries actually emit. When a field repeats,
//! the first occurrence wins.

use crate::error::{PhishscanError, Result};
use crate::extract::config::ExtractConfig;
use crate::timeout::{with_timeout, ProbeTimeout};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_RESPONSE_BYTES: u64 = 64 * 1024;

/// Country-code suffixes where registration happens one label deeper, so the
/// registrable domain is the last three labels rather than the last two.
const SECOND_LEVEL_SUFFIXES: &[&str] = &[
    "ac.uk", "co.uk", "gov.uk", "me.uk", "net.uk", "org.uk", "ac.jp", "co.jp", "ne.jp", "or.jp",
    "com.au", "edu.au", "gov.au", "net.au", "org.au", "co.nz", "net.nz", "org.nz", "co.in",
    "net.in", "org.in", "co.za", "co.kr", "com.br", "net.br", "org.br", "com.cn", "net.cn",
    "org.cn", "com.mx", "com.ar", "com.tr", "com.sg", "com.hk", "com.tw",
];

/// Registry data for one domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhoisRecord {
    /// Registered domain name as reported by the registry.
    pub domain_name: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

impl WhoisRecord {
    /// Days between creation and expiration; `None` unless both are known.
    pub fn registration_days(&self) -> Option<i64> {
        Some((self.expires? - self.created?).num_days())
    }

    /// Days since creation, relative to `now`.
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        Some((now - self.created?).num_days())
    }
}

/// Look up the host's registry record, following one IANA referral.
pub async fn lookup(host: &str, config: &ExtractConfig) -> Result<WhoisRecord> {
    let domain = registrable_domain(host);
    let timeout = config.probe_timeout();

    let root_response =
        query_server(&config.whois_root, config.whois_port, domain, timeout).await?;

    let response = match referral(&root_response) {
        Some(server) => {
            debug!(domain, server = %server, "following WHOIS referral");
            query_server(&server, config.whois_port, domain, timeout).await?
        }
        None => root_response,
    };

    let record = parse_record(&response);
    if record == WhoisRecord::default() {
        return Err(PhishscanError::MissingRegistryData(
            "registry returned no usable fields",
        ));
    }
    Ok(record)
}

/// Reduce a host to the domain actually registered under its TLD. Registries
/// answer "No match" for subdomained queries, so the host is cut down to its
/// last two labels, or three under a known second-level suffix. IP literals
/// pass through untouched.
fn registrable_domain(host: &str) -> &str {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host;
    }
    let last_two = match trailing_labels(host, 2) {
        Some(suffix) => suffix,
        None => return host,
    };
    if SECOND_LEVEL_SUFFIXES.contains(&last_two.to_lowercase().as_str()) {
        trailing_labels(host, 3).unwrap_or(last_two)
    } else {
        last_two
    }
}

/// The last `count` dot-separated labels of `host`, or `None` when there are
/// fewer than that many.
fn trailing_labels(host: &str, count: usize) -> Option<&str> {
    let (dot, _) = host.rmatch_indices('.').nth(count - 1)?;
    Some(&host[dot + 1..])
}

async fn query_server(
    server: &str,
    port: u16,
    domain: &str,
    timeout: Duration,
) -> Result<String> {
    with_timeout(ProbeTimeout::new(timeout, "whois"), async {
        let mut stream = TcpStream::connect((server, port))
            .await
            .map_err(transport)?;
        stream.write_all(domain.as_bytes()).await.map_err(transport)?;
        stream.write_all(b"\r\n").await.map_err(transport)?;

        // registries are not reliably UTF-8
        let mut raw = Vec::new();
        stream
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut raw)
            .await
            .map_err(transport)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    })
    .await
}

fn transport(err: std::io::Error) -> PhishscanError {
    PhishscanError::Whois(err.to_string())
}

/// `refer:` line from an IANA root response.
fn referral(response: &str) -> Option<String> {
    for line in response.lines() {
        let (key, value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        if key.trim().eq_ignore_ascii_case("refer") {
            let server = value.trim();
            if !server.is_empty() {
                return Some(server.to_string());
            }
        }
    }
    None
}

/// Parse a registry response into a record. First occurrence of each field
/// wins, mirroring "take the first element when a list is returned".
pub(crate) fn parse_record(response: &str) -> WhoisRecord {
    let mut record = WhoisRecord::default();

    for line in response.lines() {
        let (key, value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "domain name" | "domain" if record.domain_name.is_none() => {
                record.domain_name = Some(value.to_lowercase());
            }
            "creation date" | "created" | "created on" | "registered on" | "registered"
                if record.created.is_none() =>
            {
                record.created = parse_date(value);
            }
            "registry expiry date" | "expiration date" | "expiry date" | "expires"
            | "expires on" | "paid-till"
                if record.expires.is_none() =>
            {
                record.expires = parse_date(value);
            }
            _ => {}
        }
    }

    record
}

/// Parse the date formats the large registries emit.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    // fall back to the leading date token, shedding timezone suffixes
    let token = value.split_whitespace().next()?;
    for format in ["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}
