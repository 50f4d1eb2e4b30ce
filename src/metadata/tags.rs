use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic;
use std::path::Path;

use super::{SimpleMetadata, VaType};

/// Nested position field the way tag containers store it (track 3 of 12).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub no: Option<u32>,
    pub of: Option<u32>,
}

/// Raw key/value bag as emitted by the tag-reading collaborator. Everything
/// is optional: a file with no readable tags yields the default bag, which
/// [`normalize`] maps to an absent result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTagBag {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub year: Option<i32>,
    pub track: Position,
    pub disk: Position,
}

/// Read raw tags from an audio file. Returns the empty bag on failure —
/// unreadable files are an expected, common case.
pub fn read_raw_tags(path: &Path) -> RawTagBag {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("Could not read tags from {}: {}", path.display(), e);
            return RawTagBag::default();
        }
    };

    // Try primary tag, then fall back
    let tag = match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        Some(t) => t,
        None => return RawTagBag::default(),
    };

    RawTagBag {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        album_artist: tag.get_string(&ItemKey::AlbumArtist).map(|s| s.to_string()),
        year: tag.year().map(|y| y as i32),
        track: Position { no: tag.track(), of: tag.track_total() },
        disk: Position { no: tag.disk(), of: tag.disk_total() },
    }
}

/// Detect a compilation marker at the head of a ` / `-separated artist
/// string. A "various artists" head drops out of the credit (the remaining
/// segments become the effective artist) and tags the record `va`; a
/// "soundtrack" head does the same with `ost`.
fn check_va(raw: &str) -> (String, Option<VaType>) {
    let parts: Vec<&str> = raw.split(" / ").collect();
    let head = parts[0].to_lowercase();
    if head.starts_with("various artists") {
        (parts[1..].join(" / "), Some(VaType::Va))
    } else if head.starts_with("soundtrack") {
        (parts[1..].join(" / "), Some(VaType::Ost))
    } else {
        (raw.to_string(), None)
    }
}

fn required(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// Derive a [`SimpleMetadata`] from a raw tag bag. Title, album, artist and
/// a track number are required; a bag missing any of them yields None, never
/// an error — incomplete tags are the dominant case, not a fault.
pub fn normalize(bag: &RawTagBag) -> Option<SimpleMetadata> {
    let title = required(bag.title.as_deref())?;
    let album = required(bag.album.as_deref())?;
    let raw_artist = required(bag.artist.as_deref())?;
    let track_no = bag.track.no?;

    // Some taggers double-encode the performer as "X / X"; collapse exactly
    // that shape. Three or more distinct segments pass through untouched.
    let halves: Vec<&str> = raw_artist.split(" / ").collect();
    let artist = if halves.len() == 2 && halves[0].trim() == halves[1].trim() {
        halves[0].trim().to_string()
    } else {
        raw_artist.to_string()
    };

    let (artist, artist_tag) = check_va(&artist);
    let album_tag = required(bag.album_artist.as_deref()).and_then(|credit| check_va(credit).1);

    Some(SimpleMetadata {
        artist,
        album: album.to_string(),
        track: track_no.to_string(),
        title: title.to_string(),
        year: bag.year.map(|y| y.to_string()),
        compilation: artist_tag.or(album_tag),
        disc_num: bag.disk.no.map(|d| d.to_string()),
    })
}

/// Read and normalize the tags of one audio file. The blocking collaborator
/// read runs on the runtime's blocking pool; a panic inside it propagates to
/// the caller unchanged.
pub async fn from_file(path: impl AsRef<Path>) -> Option<SimpleMetadata> {
    let path = path.as_ref().to_path_buf();
    let bag = match tokio::task::spawn_blocking(move || read_raw_tags(&path)).await {
        Ok(bag) => bag,
        Err(e) => panic::resume_unwind(e.into_panic()),
    };
    normalize(&bag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_bag() -> RawTagBag {
        RawTagBag {
            title: Some("Silence".to_string()),
            artist: Some("The Artist".to_string()),
            album: Some("No Album".to_string()),
            album_artist: None,
            year: Some(2003),
            track: Position { no: Some(1), of: Some(12) },
            disk: Position { no: None, of: None },
        }
    }

    #[test]
    fn test_normalize_full_bag() {
        let md = normalize(&full_bag()).unwrap();
        assert_eq!(md.artist, "The Artist");
        assert_eq!(md.album, "No Album");
        assert_eq!(md.track, "1");
        assert_eq!(md.title, "Silence");
        assert_eq!(md.year.as_deref(), Some("2003"));
        assert_eq!(md.compilation, None);
        assert_eq!(md.disc_num, None);
    }

    #[test]
    fn test_normalize_missing_track_number() {
        let mut bag = full_bag();
        bag.track.no = None;
        assert_eq!(normalize(&bag), None);
    }

    #[test]
    fn test_normalize_missing_required_strings() {
        let cases: [fn(&mut RawTagBag); 4] = [
            |b| b.title = None,
            |b| b.artist = None,
            |b| b.album = None,
            |b| b.title = Some("   ".to_string()),
        ];
        for strip in cases {
            let mut bag = full_bag();
            strip(&mut bag);
            assert_eq!(normalize(&bag), None);
        }
    }

    #[test]
    fn test_normalize_empty_bag_is_absent() {
        // The collaborator's failure shape.
        assert_eq!(normalize(&RawTagBag::default()), None);
    }

    #[test]
    fn test_normalize_trims_strings() {
        let mut bag = full_bag();
        bag.title = Some("  Silence  ".to_string());
        bag.artist = Some(" The Artist ".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.title, "Silence");
        assert_eq!(md.artist, "The Artist");
    }

    #[test]
    fn test_normalize_collapses_doubled_artist() {
        let mut bag = full_bag();
        bag.artist = Some("The Artist / The Artist".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.artist, "The Artist");
    }

    #[test]
    fn test_normalize_keeps_distinct_artist_segments() {
        let mut bag = full_bag();
        bag.artist = Some("Artist A / Artist B".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.artist, "Artist A / Artist B");
    }

    #[test]
    fn test_normalize_various_artists_head() {
        let mut bag = full_bag();
        bag.artist = Some("Various Artists / Artist A / Artist B".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.artist, "Artist A / Artist B");
        assert_eq!(md.compilation, Some(VaType::Va));
    }

    #[test]
    fn test_normalize_soundtrack_head() {
        let mut bag = full_bag();
        bag.artist = Some("Soundtrack / Artist A".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.artist, "Artist A");
        assert_eq!(md.compilation, Some(VaType::Ost));
    }

    #[test]
    fn test_normalize_album_artist_fallback() {
        // The album credit supplies the tag only when the artist check
        // yields nothing; the artist string itself is untouched.
        let mut bag = full_bag();
        bag.album_artist = Some("Various Artists".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.artist, "The Artist");
        assert_eq!(md.compilation, Some(VaType::Va));
    }

    #[test]
    fn test_normalize_artist_check_takes_precedence() {
        let mut bag = full_bag();
        bag.artist = Some("Soundtrack / Artist A".to_string());
        bag.album_artist = Some("Various Artists".to_string());
        let md = normalize(&bag).unwrap();
        assert_eq!(md.compilation, Some(VaType::Ost));
    }

    #[test]
    fn test_normalize_year_and_disk_stringified() {
        let mut bag = full_bag();
        bag.disk.no = Some(2);
        let md = normalize(&bag).unwrap();
        assert_eq!(md.year.as_deref(), Some("2003"));
        assert_eq!(md.disc_num.as_deref(), Some("2"));
    }

    #[test]
    fn test_read_raw_tags_unreadable_file() {
        let bag = read_raw_tags(Path::new("/nonexistent/file.mp3"));
        assert_eq!(bag, RawTagBag::default());
    }

    #[tokio::test]
    async fn test_from_file_unreadable_is_absent() {
        assert_eq!(from_file("/nonexistent/file.mp3").await, None);
    }
}
