//! Page-content checks over one fetched HTML snapshot.
//!
//! The snapshot is parsed once, immediately after the fetch, and is fixed
//! for the remainder of the extraction: every content-dependent feature
//! reads the same distilled view of the document. When the fetch fails the
//! extractor holds no snapshot and each feature here falls back to its
//! fail-open default at the call site.

use crate::core::score::TernaryScore;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// External-object ratio thresholds (percent).
const OBJECT_SUSPICIOUS_FROM: f64 = 22.0;
const OBJECT_PHISHING_ABOVE: f64 = 61.0;
/// Unsafe-anchor ratio thresholds (percent).
const ANCHOR_SUSPICIOUS_FROM: f64 = 31.0;
const ANCHOR_PHISHING_ABOVE: f64 = 67.0;
/// External meta/script/link reference thresholds (percent).
const TAG_SUSPICIOUS_FROM: f64 = 17.0;
const TAG_PHISHING_ABOVE: f64 = 81.0;

/// Anchor hrefs that go nowhere; a page built out of them is a facade.
const PLACEHOLDER_HREFS: &[&str] = &[
    "#",
    "#content",
    "#skip",
    "javascript:void(0)",
    "javascript::void(0)",
];

/// Marker strings for right-click suppression.
const RIGHT_CLICK_MARKERS: &[&str] = &[
    "event.button==2",
    "event.button == 2",
    "contextmenu",
    "event.button==3",
    "event.button == 3",
];

static OBJECT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img, video, audio").expect("static selector"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));
static TAG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta, script, link").expect("static selector"));
static FORM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("form").expect("static selector"));
static ICON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel~=\"icon\"]").expect("static selector"));
static IFRAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("iframe").expect("static selector"));

/// Everything the content features need from one fetched page, distilled
/// from the parsed document in a single pass.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Raw body lowercased for marker substring scans.
    body_lower: String,
    /// `src` values of img/video/audio elements, document order.
    object_srcs: Vec<String>,
    /// `href` values of anchors, document order.
    anchor_hrefs: Vec<String>,
    /// `href`/`src`/`content` values of meta/script/link tags.
    tag_refs: Vec<String>,
    /// `action` values of forms, document order; missing action is kept as
    /// an empty string because it scores differently from no form at all.
    form_actions: Vec<String>,
    /// `href` values of icon links.
    icon_hrefs: Vec<String>,
    iframe_count: usize,
}

impl PageSnapshot {
    /// Distill a fetched body. Malformed HTML never fails: scraper parses
    /// what it can and the rest of the document is simply absent.
    pub fn parse(body: &str) -> Self {
        let document = Html::parse_document(body);

        let object_srcs = document
            .select(&OBJECT_SELECTOR)
            .filter_map(|el| el.value().attr("src"))
            .filter(|src| !src.is_empty())
            .map(str::to_string)
            .collect();

        let anchor_hrefs = document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|el| el.value().attr("href"))
            .map(str::to_string)
            .collect();

        let mut tag_refs = Vec::new();
        for el in document.select(&TAG_SELECTOR) {
            for attr in ["href", "src", "content"] {
                if let Some(value) = el.value().attr(attr) {
                    if !value.is_empty() {
                        tag_refs.push(value.to_string());
                    }
                }
            }
        }

        let form_actions = document
            .select(&FORM_SELECTOR)
            .map(|el| el.value().attr("action").unwrap_or_default().to_string())
            .collect();

        let icon_hrefs = document
            .select(&ICON_SELECTOR)
            .filter_map(|el| el.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect();

        let iframe_count = document.select(&IFRAME_SELECTOR).count();

        Self {
            body_lower: body.to_lowercase(),
            object_srcs,
            anchor_hrefs,
            tag_refs,
            form_actions,
            icon_hrefs,
            iframe_count,
        }
    }
}

fn is_off_host(reference: &str, authority: &str) -> bool {
    reference.starts_with("http") && !reference.contains(authority)
}

fn ratio_score(external: usize, total: usize, suspicious_from: f64, phishing_above: f64) -> TernaryScore {
    if total == 0 {
        return TernaryScore::Legitimate;
    }
    let percentage = external as f64 * 100.0 / total as f64;
    if percentage < suspicious_from {
        TernaryScore::Legitimate
    } else if percentage <= phishing_above {
        TernaryScore::Suspicious
    } else {
        TernaryScore::Phishing
    }
}

/// Fraction of image/video/audio sources loaded from another host.
pub fn request_url(snapshot: &PageSnapshot, authority: &str) -> TernaryScore {
    let total = snapshot.object_srcs.len();
    let external = snapshot
        .object_srcs
        .iter()
        .filter(|src| is_off_host(src.as_str(), authority))
        .count();
    ratio_score(external, total, OBJECT_SUSPICIOUS_FROM, OBJECT_PHISHING_ABOVE)
}

/// Fraction of anchors that are placeholders or point off-host.
pub fn url_of_anchor(snapshot: &PageSnapshot, authority: &str) -> TernaryScore {
    let total = snapshot.anchor_hrefs.len();
    let unsafe_count = snapshot
        .anchor_hrefs
        .iter()
        .filter(|href| {
            PLACEHOLDER_HREFS.contains(&href.as_str()) || is_off_host(href.as_str(), authority)
        })
        .count();
    ratio_score(
        unsafe_count,
        total,
        ANCHOR_SUSPICIOUS_FROM,
        ANCHOR_PHISHING_ABOVE,
    )
}

/// Fraction of absolute meta/script/link references pointing off-host.
/// Only absolute URLs count toward the total.
pub fn links_in_tags(snapshot: &PageSnapshot, authority: &str) -> TernaryScore {
    let absolute: Vec<&String> = snapshot
        .tag_refs
        .iter()
        .filter(|value| value.starts_with("http"))
        .collect();
    let external = absolute
        .iter()
        .filter(|value| !value.contains(authority))
        .count();
    ratio_score(external, absolute.len(), TAG_SUSPICIOUS_FROM, TAG_PHISHING_ABOVE)
}

/// Server form handler. The first form with an empty or `about:blank`
/// action, or an absolute off-host action, decides the score; there is no
/// aggregation across forms.
pub fn sfh(snapshot: &PageSnapshot, authority: &str) -> TernaryScore {
    for action in &snapshot.form_actions {
        if action.is_empty() || action == "about:blank" {
            return TernaryScore::Phishing;
        }
        if is_off_host(action, authority) {
            return TernaryScore::Suspicious;
        }
    }
    TernaryScore::Legitimate
}

/// Any form submitting to a mail handler.
pub fn submitting_to_email(snapshot: &PageSnapshot) -> TernaryScore {
    for action in &snapshot.form_actions {
        let action = action.to_lowercase();
        if action.contains("mailto:") || action.contains("mail(") {
            return TernaryScore::Phishing;
        }
    }
    TernaryScore::Legitimate
}

/// Favicon loaded from a foreign host.
pub fn favicon(snapshot: &PageSnapshot, authority: &str) -> TernaryScore {
    for href in &snapshot.icon_hrefs {
        if is_off_host(href, authority) {
            return TernaryScore::Phishing;
        }
    }
    TernaryScore::Legitimate
}

/// `onmouseover` handlers hiding the real link target.
pub fn on_mouseover(snapshot: &PageSnapshot) -> TernaryScore {
    marker_score(snapshot, &["onmouseover"])
}

/// Right-click suppression markers.
pub fn right_click(snapshot: &PageSnapshot) -> TernaryScore {
    marker_score(snapshot, RIGHT_CLICK_MARKERS)
}

/// Pop-up window markers.
pub fn popup_window(snapshot: &PageSnapshot) -> TernaryScore {
    marker_score(snapshot, &["window.open(", "popup"])
}

/// Presence of any iframe element.
pub fn iframe(snapshot: &PageSnapshot) -> TernaryScore {
    if snapshot.iframe_count > 0 {
        TernaryScore::Phishing
    } else {
        TernaryScore::Legitimate
    }
}

fn marker_score(snapshot: &PageSnapshot, markers: &[&str]) -> TernaryScore {
    for marker in markers {
        if snapshot.body_lower.contains(marker) {
            return TernaryScore::Phishing;
        }
    }
    TernaryScore::Legitimate
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "example.com";

    #[test]
    fn test_request_url_ratios() {
        let local = PageSnapshot::parse(
            r#"<html><body>
                <img src="/logo.png"><img src="http://example.com/a.png">
            </body></html>"#,
        );
        assert_eq!(request_url(&local, HOST), TernaryScore::Legitimate);

        let external = PageSnapshot::parse(
            r#"<html><body>
                <img src="http://cdn.evil.com/a.png">
                <img src="http://cdn.evil.com/b.png">
                <video src="http://cdn.evil.com/c.mp4"></video>
            </body></html>"#,
        );
        assert_eq!(request_url(&external, HOST), TernaryScore::Phishing);

        let none = PageSnapshot::parse("<html><body><p>plain</p></body></html>");
        assert_eq!(request_url(&none, HOST), TernaryScore::Legitimate);
    }

    #[test]
    fn test_url_of_anchor_placeholders() {
        // 2 of 3 unsafe -> 66.7%, inside the suspicious band
        let snapshot = PageSnapshot::parse(
            r##"<a href="#">x</a>
               <a href="javascript:void(0)">y</a>
               <a href="/about">z</a>"##,
        );
        assert_eq!(url_of_anchor(&snapshot, HOST), TernaryScore::Suspicious);

        let all_unsafe = PageSnapshot::parse(
            r##"<a href="#content">x</a><a href="http://evil.com/">y</a>"##,
        );
        assert_eq!(url_of_anchor(&all_unsafe, HOST), TernaryScore::Phishing);

        let no_anchors = PageSnapshot::parse("<p>nothing</p>");
        assert_eq!(url_of_anchor(&no_anchors, HOST), TernaryScore::Legitimate);
    }

    #[test]
    fn test_links_in_tags_counts_absolute_only() {
        // relative refs are invisible to this feature
        let snapshot = PageSnapshot::parse(
            r#"<head>
                <link rel="stylesheet" href="/style.css">
                <script src="http://example.com/app.js"></script>
                <script src="http://cdn.other.com/lib.js"></script>
            </head>"#,
        );
        // 1 external of 2 absolute -> 50%, suspicious band
        assert_eq!(links_in_tags(&snapshot, HOST), TernaryScore::Suspicious);
    }

    #[test]
    fn test_sfh_first_form_decides() {
        let empty_action = PageSnapshot::parse(r#"<form action=""></form>"#);
        assert_eq!(sfh(&empty_action, HOST), TernaryScore::Phishing);

        let blank = PageSnapshot::parse(r#"<form action="about:blank"></form>"#);
        assert_eq!(sfh(&blank, HOST), TernaryScore::Phishing);

        let off_host = PageSnapshot::parse(
            r#"<form action="http://collector.evil.com/post"></form>
               <form action=""></form>"#,
        );
        assert_eq!(sfh(&off_host, HOST), TernaryScore::Suspicious);

        let local = PageSnapshot::parse(r#"<form action="/login"></form>"#);
        assert_eq!(sfh(&local, HOST), TernaryScore::Legitimate);

        let no_forms = PageSnapshot::parse("<p>no forms</p>");
        assert_eq!(sfh(&no_forms, HOST), TernaryScore::Legitimate);
    }

    #[test]
    fn test_submitting_to_email() {
        let mailto = PageSnapshot::parse(r#"<form action="MAILTO:x@y.com"></form>"#);
        assert_eq!(submitting_to_email(&mailto), TernaryScore::Phishing);

        let server_side = PageSnapshot::parse(r#"<form action="/send"></form>"#);
        assert_eq!(submitting_to_email(&server_side), TernaryScore::Legitimate);
    }

    #[test]
    fn test_favicon_origin() {
        let foreign = PageSnapshot::parse(
            r#"<link rel="icon" href="http://other.net/favicon.ico">"#,
        );
        assert_eq!(favicon(&foreign, HOST), TernaryScore::Phishing);

        let own = PageSnapshot::parse(
            r#"<link rel="shortcut icon" href="http://example.com/favicon.ico">"#,
        );
        assert_eq!(favicon(&own, HOST), TernaryScore::Legitimate);

        let relative = PageSnapshot::parse(r#"<link rel="icon" href="/favicon.ico">"#);
        assert_eq!(favicon(&relative, HOST), TernaryScore::Legitimate);
    }

    #[test]
    fn test_script_markers() {
        let snapshot = PageSnapshot::parse(
            r#"<body onMouseOver="swap()"><script>
                document.oncontextmenu = nope;
                window.open('http://x');
            </script></body>"#,
        );
        assert_eq!(on_mouseover(&snapshot), TernaryScore::Phishing);
        assert_eq!(right_click(&snapshot), TernaryScore::Phishing);
        assert_eq!(popup_window(&snapshot), TernaryScore::Phishing);

        let clean = PageSnapshot::parse("<body><p>hello</p></body>");
        assert_eq!(on_mouseover(&clean), TernaryScore::Legitimate);
        assert_eq!(right_click(&clean), TernaryScore::Legitimate);
        assert_eq!(popup_window(&clean), TernaryScore::Legitimate);
    }

    #[test]
    fn test_iframe_presence() {
        let framed = PageSnapshot::parse(r#"<iframe src="http://x.com"></iframe>"#);
        assert_eq!(iframe(&framed), TernaryScore::Phishing);

        let clean = PageSnapshot::parse("<p>no frames</p>");
        assert_eq!(iframe(&clean), TernaryScore::Legitimate);
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let snapshot = PageSnapshot::parse("<a href='#'><form><img src=");
        // scraper recovers what it can; scoring still works
        assert_eq!(url_of_anchor(&snapshot, HOST), TernaryScore::Phishing);
        assert_eq!(sfh(&snapshot, HOST), TernaryScore::Phishing);
    }
}
