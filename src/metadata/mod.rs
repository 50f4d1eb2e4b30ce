//! Metadata inference: derive structured track metadata from file paths and
//! from embedded tag data, and reconcile either form into one canonical
//! record.
//!
//! Two independent pipelines converge on one builder:
//! path → [`patterns::from_path`], tags → [`tags::from_file`], and either
//! result → [`canonical::full_from_attrs`].

pub mod artists;
pub mod canonical;
pub mod patterns;
pub mod tags;

pub use canonical::{TrackAttrs, full_from_attrs};
pub use patterns::{FieldMap, PatternSet, add_pattern, from_path};
pub use tags::{RawTagBag, from_file, normalize, read_raw_tags};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compilation marker: an album assembled from multiple primary artists
/// (`va`), or a film/game score (`ost`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaType {
    Va,
    Ost,
}

impl VaType {
    /// Parse a compilation tag. Anything other than "va"/"ost" is not a
    /// recognized tag and yields None.
    pub fn parse(s: &str) -> Option<VaType> {
        match s {
            "va" => Some(VaType::Va),
            "ost" => Some(VaType::Ost),
            _ => None,
        }
    }
}

impl fmt::Display for VaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VaType::Va => "va",
            VaType::Ost => "ost",
        })
    }
}

/// Minimal metadata record produced by either extraction pipeline, prior to
/// canonicalization. All fields are raw strings — numeric interpretation
/// happens in the canonical builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMetadata {
    pub artist: String,
    pub album: String,
    pub track: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation: Option<VaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_num: Option<String>,
}

/// Artist credit on a canonical record. Multi-artist credits are common
/// enough that consumers must branch on shape, so the two cases are an
/// explicit sum type rather than a one-element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtistCredit {
    Single(String),
    Multiple(Vec<String>),
}

/// Fully normalized output record: typed numeric fields, resolved artist
/// shape, title decorations stripped into their own lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullMetadata {
    pub original_path: String,
    pub artist: ArtistCredit,
    pub album: String,
    pub track: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub va_type: Option<VaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_artists: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_va_type_parse() {
        assert_eq!(VaType::parse("va"), Some(VaType::Va));
        assert_eq!(VaType::parse("ost"), Some(VaType::Ost));
        assert_eq!(VaType::parse("compilation"), None);
        assert_eq!(VaType::parse(""), None);
    }

    #[test]
    fn test_artist_credit_json_shape() {
        let single = ArtistCredit::Single("artist".to_string());
        assert_eq!(serde_json::to_value(&single).unwrap(), serde_json::json!("artist"));

        let multiple = ArtistCredit::Multiple(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_value(&multiple).unwrap(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_full_metadata_json_omits_absent_fields() {
        let md = FullMetadata {
            original_path: "x/01 - t.mp3".to_string(),
            artist: ArtistCredit::Single("a".to_string()),
            album: "b".to_string(),
            track: 1,
            title: "t".to_string(),
            year: None,
            va_type: None,
            more_artists: None,
            variations: None,
            disk: None,
        };
        let value = serde_json::to_value(&md).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("originalPath").unwrap(), "x/01 - t.mp3");
        assert!(!obj.contains_key("year"));
        assert!(!obj.contains_key("vaType"));
        assert!(!obj.contains_key("moreArtists"));
        assert!(!obj.contains_key("variations"));
        assert!(!obj.contains_key("disk"));
    }
}
