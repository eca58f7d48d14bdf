//! Address-bar lexical checks: pure string and regex analysis of the URL
//! and its authority. No network access.

use crate::core::score::TernaryScore;
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

/// URL length below this is legitimate.
const LENGTH_LEGITIMATE_BELOW: usize = 54;
/// URL length above this is phishing-leaning; between the two, suspicious.
const LENGTH_PHISHING_ABOVE: usize = 75;

/// Known URL-shortener domains, matched as substrings of the authority.
const SHORTENING_SERVICES: &[&str] = &[
    "bit.ly",
    "goo.gl",
    "shorte.st",
    "go2l.ink",
    "x.co",
    "ow.ly",
    "t.co",
    "tinyurl",
    "tr.im",
    "is.gd",
    "cli.gs",
    "yfrog.com",
    "migre.me",
    "ff.im",
    "tiny.cc",
    "url4.eu",
    "twit.ac",
    "su.pr",
    "twurl.nl",
    "snipurl.com",
    "short.to",
    "BudURL.com",
    "ping.fm",
    "post.ly",
    "Just.as",
    "bkite.com",
    "snipr.com",
    "fic.kr",
    "loopt.us",
    "doiop.com",
    "short.ie",
    "kl.am",
    "wp.me",
    "rubyurl.com",
    "om.ly",
    "to.ly",
    "bit.do",
    "lnkd.in",
    "db.tt",
    "qr.ae",
    "adf.ly",
    "bitly.com",
    "cur.lv",
    "tinyurl.com",
    "ity.im",
    "q.gs",
    "po.st",
    "bc.vc",
    "twitthis.com",
    "u.to",
    "j.mp",
    "buzurl.com",
    "cutt.us",
    "u.bb",
    "yourls.org",
    "prettylinkpro.com",
    "scrnch.me",
    "filoops.info",
    "vzturl.com",
    "qr.net",
    "1url.com",
    "tweez.me",
    "v.gd",
    "link.zip.net",
];

static SHORTENER_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(SHORTENING_SERVICES).expect("static shortener patterns")
});

// Dotted-quad with each octet in 0-255; unanchored like the original check,
// so a host merely containing a quad still trips it.
static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(([01]?\d\d?|2[0-4]\d|25[0-5])\.){3}([01]?\d\d?|2[0-4]\d|25[0-5])")
        .expect("static ipv4 pattern")
});

static IPV6_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9a-fA-F]{1,4}:[0-9a-fA-F]{1,4}").expect("static ipv6 pattern"));

/// IP literal in place of a registered domain.
pub fn ip_literal(authority: &str) -> TernaryScore {
    if IPV4_RE.is_match(authority) || IPV6_RE.is_match(authority) {
        TernaryScore::Phishing
    } else {
        TernaryScore::Legitimate
    }
}

/// Long URLs hide the true destination.
pub fn url_length(url: &str) -> TernaryScore {
    let length = url.len();
    if length < LENGTH_LEGITIMATE_BELOW {
        TernaryScore::Legitimate
    } else if length <= LENGTH_PHISHING_ABOVE {
        TernaryScore::Suspicious
    } else {
        TernaryScore::Phishing
    }
}

/// Membership in the shortener denylist.
pub fn shortening_service(authority: &str) -> TernaryScore {
    if SHORTENER_MATCHER.is_match(authority) {
        TernaryScore::Phishing
    } else {
        TernaryScore::Legitimate
    }
}

/// `@` anywhere in the URL; everything before it is discarded by browsers.
pub fn at_symbol(url: &str) -> TernaryScore {
    if url.contains('@') {
        TernaryScore::Phishing
    } else {
        TernaryScore::Legitimate
    }
}

/// First `//` past the scheme separator (index 7) signals a redirect
/// embedded in the path.
pub fn double_slash_redirecting(url: &str) -> TernaryScore {
    match url.find("//") {
        Some(position) if position > 7 => TernaryScore::Phishing,
        _ => TernaryScore::Legitimate,
    }
}

/// Hyphenated authorities imitate brands (`secure-login-example.com`).
pub fn prefix_suffix(authority: &str) -> TernaryScore {
    if authority.contains('-') {
        TernaryScore::Phishing
    } else {
        TernaryScore::Legitimate
    }
}

/// Subdomain depth by dot count in the authority.
pub fn sub_domain(authority: &str) -> TernaryScore {
    match authority.matches('.').count() {
        1 => TernaryScore::Legitimate,
        2 => TernaryScore::Suspicious,
        _ => TernaryScore::Phishing,
    }
}

/// Literal `https` token inside the authority, spoofing the scheme.
pub fn https_token(authority: &str) -> TernaryScore {
    if authority.to_lowercase().contains("https") {
        TernaryScore::Phishing
    } else {
        TernaryScore::Legitimate
    }
}

/// Explicit non-standard port.
pub fn port(explicit_port: Option<u16>) -> TernaryScore {
    match explicit_port {
        Some(p) if p != 80 && p != 443 => TernaryScore::Phishing,
        _ => TernaryScore::Legitimate,
    }
}
