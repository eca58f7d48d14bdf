//! The canonical 30-feature set and the fixed-order feature vector.
//!
//! The downstream classifier was trained on exactly these columns in exactly
//! this order. The key strings (misspellings included) are a hard external
//! contract inherited from the training data; reordering or renaming them
//! silently corrupts predictions.

use crate::core::score::TernaryScore;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// Number of features in the canonical vector.
pub const FEATURE_COUNT: usize = 30;

/// One of the 30 heuristic features, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Feature {
    HavingIpAddress = 0,
    UrlLength,
    ShorteningService,
    HavingAtSymbol,
    DoubleSlashRedirecting,
    PrefixSuffix,
    HavingSubDomain,
    SslFinalState,
    DomainRegistrationLength,
    Favicon,
    Port,
    HttpsToken,
    RequestUrl,
    UrlOfAnchor,
    LinksInTags,
    Sfh,
    SubmittingToEmail,
    AbnormalUrl,
    Redirect,
    OnMouseover,
    RightClick,
    PopupWindow,
    Iframe,
    AgeOfDomain,
    DnsRecord,
    WebTraffic,
    PageRank,
    GoogleIndex,
    LinksPointingToPage,
    StatisticalReport,
}

impl Feature {
    /// All features in canonical column order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::HavingIpAddress,
        Feature::UrlLength,
        Feature::ShorteningService,
        Feature::HavingAtSymbol,
        Feature::DoubleSlashRedirecting,
        Feature::PrefixSuffix,
        Feature::HavingSubDomain,
        Feature::SslFinalState,
        Feature::DomainRegistrationLength,
        Feature::Favicon,
        Feature::Port,
        Feature::HttpsToken,
        Feature::RequestUrl,
        Feature::UrlOfAnchor,
        Feature::LinksInTags,
        Feature::Sfh,
        Feature::SubmittingToEmail,
        Feature::AbnormalUrl,
        Feature::Redirect,
        Feature::OnMouseover,
        Feature::RightClick,
        Feature::PopupWindow,
        Feature::Iframe,
        Feature::AgeOfDomain,
        Feature::DnsRecord,
        Feature::WebTraffic,
        Feature::PageRank,
        Feature::GoogleIndex,
        Feature::LinksPointingToPage,
        Feature::StatisticalReport,
    ];

    /// The column name the model was trained on. Several names carry
    /// historical misspellings that must be preserved verbatim.
    pub fn key(self) -> &'static str {
        match self {
            Feature::HavingIpAddress => "having_IP_Address",
            Feature::UrlLength => "URL_Length",
            Feature::ShorteningService => "Shortining_Service",
            Feature::HavingAtSymbol => "having_At_Symbol",
            Feature::DoubleSlashRedirecting => "double_slash_redirecting",
            Feature::PrefixSuffix => "Prefix_Suffix",
            Feature::HavingSubDomain => "having_Sub_Domain",
            Feature::SslFinalState => "SSLfinal_State",
            Feature::DomainRegistrationLength => "Domain_registeration_length",
            Feature::Favicon => "Favicon",
            Feature::Port => "port",
            Feature::HttpsToken => "HTTPS_token",
            Feature::RequestUrl => "Request_URL",
            Feature::UrlOfAnchor => "URL_of_Anchor",
            Feature::LinksInTags => "Links_in_tags",
            Feature::Sfh => "SFH",
            Feature::SubmittingToEmail => "Submitting_to_email",
            Feature::AbnormalUrl => "Abnormal_URL",
            Feature::Redirect => "Redirect",
            Feature::OnMouseover => "on_mouseover",
            Feature::RightClick => "RightClick",
            Feature::PopupWindow => "popUpWidnow",
            Feature::Iframe => "Iframe",
            Feature::AgeOfDomain => "age_of_domain",
            Feature::DnsRecord => "DNSRecord",
            Feature::WebTraffic => "web_traffic",
            Feature::PageRank => "Page_Rank",
            Feature::GoogleIndex => "Google_Index",
            Feature::LinksPointingToPage => "Links_pointing_to_page",
            Feature::StatisticalReport => "Statistical_report",
        }
    }

    /// Canonical column index.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A complete extraction result: every feature present, canonical order.
///
/// Construction goes through [`FeatureVectorBuilder`], which statically
/// guarantees a slot for each of the 30 features; a partially-filled vector
/// cannot escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    scores: [TernaryScore; FEATURE_COUNT],
}

impl FeatureVector {
    /// Score for a single feature.
    pub fn get(&self, feature: Feature) -> TernaryScore {
        self.scores[feature.index()]
    }

    /// Iterate `(feature, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, TernaryScore)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.scores[f.index()]))
    }

    /// The model-side row: 30 values in {-1, 0, 1}, canonical order.
    pub fn encoded(&self) -> [i8; FEATURE_COUNT] {
        let mut row = [0i8; FEATURE_COUNT];
        for (i, score) in self.scores.iter().enumerate() {
            row[i] = score.as_i8();
        }
        row
    }
}

impl Index<Feature> for FeatureVector {
    type Output = TernaryScore;

    fn index(&self, feature: Feature) -> &TernaryScore {
        &self.scores[feature.index()]
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (feature, score) in self.iter() {
            map.serialize_entry(feature.key(), &score)?;
        }
        map.end()
    }
}

/// Write-once builder for [`FeatureVector`].
#[derive(Debug)]
pub struct FeatureVectorBuilder {
    scores: [Option<TernaryScore>; FEATURE_COUNT],
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self {
            scores: [None; FEATURE_COUNT],
        }
    }

    /// Record the score for one feature. Later writes to the same slot win;
    /// the extractor writes each slot exactly once.
    pub fn set(&mut self, feature: Feature, score: TernaryScore) {
        self.scores[feature.index()] = Some(score);
    }

    /// Finish the vector. Returns the first missing feature on incomplete
    /// input instead of a partial vector.
    pub fn build(self) -> std::result::Result<FeatureVector, Feature> {
        let mut scores = [TernaryScore::Suspicious; FEATURE_COUNT];
        for feature in Feature::ALL {
            match self.scores[feature.index()] {
                Some(score) => scores[feature.index()] = score,
                None => return Err(feature),
            }
        }
        Ok(FeatureVector { scores })
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder(score: TernaryScore) -> FeatureVectorBuilder {
        let mut b = FeatureVectorBuilder::new();
        for feature in Feature::ALL {
            b.set(feature, score);
        }
        b
    }

    #[test]
    fn test_canonical_order_is_stable() {
        let expected = [
            "having_IP_Address",
            "URL_Length",
            "Shortining_Service",
            "having_At_Symbol",
            "double_slash_redirecting",
            "Prefix_Suffix",
            "having_Sub_Domain",
            "SSLfinal_State",
            "Domain_registeration_length",
            "Favicon",
            "port",
            "HTTPS_token",
            "Request_URL",
            "URL_of_Anchor",
            "Links_in_tags",
            "SFH",
            "Submitting_to_email",
            "Abnormal_URL",
            "Redirect",
            "on_mouseover",
            "RightClick",
            "popUpWidnow",
            "Iframe",
            "age_of_domain",
            "DNSRecord",
            "web_traffic",
            "Page_Rank",
            "Google_Index",
            "Links_pointing_to_page",
            "Statistical_report",
        ];
        assert_eq!(Feature::ALL.len(), FEATURE_COUNT);
        for (feature, key) in Feature::ALL.iter().zip(expected.iter()) {
            assert_eq!(feature.key(), *key);
        }
    }

    #[test]
    fn test_indices_match_positions() {
        for (pos, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), pos);
        }
    }

    #[test]
    fn test_builder_rejects_incomplete() {
        let mut b = FeatureVectorBuilder::new();
        b.set(Feature::UrlLength, TernaryScore::Legitimate);
        assert_eq!(b.build().unwrap_err(), Feature::HavingIpAddress);
    }

    #[test]
    fn test_builder_complete() {
        let vector = full_builder(TernaryScore::Legitimate).build().unwrap();
        assert_eq!(vector.get(Feature::StatisticalReport), TernaryScore::Legitimate);
        assert_eq!(vector.encoded(), [1i8; FEATURE_COUNT]);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let mut b = full_builder(TernaryScore::Suspicious);
        b.set(Feature::HavingIpAddress, TernaryScore::Phishing);
        let vector = b.build().unwrap();

        let json = serde_json::to_string(&vector).unwrap();
        assert!(json.starts_with("{\"having_IP_Address\":-1,\"URL_Length\":0"));
        assert!(json.ends_with("\"Statistical_report\":0}"));
    }
}
