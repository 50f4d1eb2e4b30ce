use serde::{Deserialize, Serialize};

use super::artists::{pull_artists, pull_variations, split_artists};
use super::{ArtistCredit, FullMetadata, SimpleMetadata, VaType};

/// Loosely-populated attribute bag accepted by the canonical builder. Either
/// pipeline's [`SimpleMetadata`] converts into it; callers with richer
/// sources (an album credit, an explicit featured-artist list) fill the
/// extra fields themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackAttrs {
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    /// Free-form compilation marker; only "va" and "ost" are recognized,
    /// anything else is silently ignored.
    pub compilation: Option<String>,
    pub more_artists: Option<Vec<String>>,
    pub disc_num: Option<String>,
}

impl From<SimpleMetadata> for TrackAttrs {
    fn from(md: SimpleMetadata) -> Self {
        TrackAttrs {
            artist: Some(md.artist),
            album: Some(md.album),
            track: Some(md.track),
            title: Some(md.title),
            year: md.year,
            compilation: md.compilation.map(|c| c.to_string()),
            disc_num: md.disc_num,
            ..Default::default()
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Build the canonical record for one file. Requires an artist (or album
/// artist), album, track and title; anything less yields None. The track
/// string must parse as an integer — values above 99 are the packed
/// `disk * 100 + track` convention and are decomposed.
pub fn full_from_attrs(original_path: &str, attrs: &TrackAttrs) -> Option<FullMetadata> {
    let the_artist = present(&attrs.album_artist).or_else(|| present(&attrs.artist))?;
    let album = present(&attrs.album)?;
    let raw_track = present(&attrs.track)?;
    let raw_title = present(&attrs.title)?;

    let names = split_artists(the_artist);
    let artist = if names.len() > 1 {
        ArtistCredit::Multiple(names)
    } else {
        ArtistCredit::Single(the_artist.to_string())
    };

    let packed: u32 = raw_track.parse().ok()?;
    let (track, disk) = if packed > 99 {
        (packed % 100, Some(packed / 100))
    } else {
        (packed, present(&attrs.disc_num).and_then(|d| d.parse().ok()))
    };

    let (title, mut more_artists) = pull_artists(raw_title);
    let (title, variations) = pull_variations(&title);

    // A literal artist differing from the album credit is a featured
    // contributor relative to the album's primary artist.
    if let (Some(artist), Some(album_artist)) =
        (attrs.artist.as_deref(), attrs.album_artist.as_deref())
    {
        if artist != album_artist {
            more_artists.push(artist.to_string());
        }
    }
    if let Some(extra) = &attrs.more_artists {
        more_artists.extend(extra.iter().cloned());
    }

    Some(FullMetadata {
        original_path: original_path.to_string(),
        artist,
        album: album.to_string(),
        track,
        title,
        year: present(&attrs.year).and_then(|y| y.parse().ok()),
        va_type: attrs.compilation.as_deref().and_then(VaType::parse),
        more_artists: (!more_artists.is_empty()).then_some(more_artists),
        variations: (!variations.is_empty()).then_some(variations),
        disk,
    })
}
