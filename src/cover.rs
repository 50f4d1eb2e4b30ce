//! Embedded cover-art extraction.

use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded cover image bytes plus their declared mime type.
#[derive(Debug, Clone)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime: Option<String>,
}

/// Read the front cover (or, failing that, the first embedded picture) from
/// an audio file. None when the file is unreadable or carries no art.
pub fn read_from_file(path: &Path) -> Option<CoverArt> {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("Could not read pictures from {}: {}", path.display(), e);
            return None;
        }
    };
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag())?;
    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())?;
    Some(CoverArt {
        data: picture.data().to_vec(),
        mime: picture.mime_type().map(|m| m.as_str().to_string()),
    })
}

fn mime_suffix(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        _ => None,
    }
}

/// Extract the cover to `<output_stem><suffix>`, with the suffix derived
/// from the picture's mime type. Ok(None) when the file has no embedded art.
pub fn to_file(audio: &Path, output_stem: &str) -> io::Result<Option<PathBuf>> {
    let art = match read_from_file(audio) {
        Some(art) => art,
        None => return Ok(None),
    };
    let suffix = art.mime.as_deref().and_then(mime_suffix).unwrap_or("");
    let output = PathBuf::from(format!("{output_stem}{suffix}"));
    std::fs::write(&output, &art.data)?;
    Ok(Some(output))
}
