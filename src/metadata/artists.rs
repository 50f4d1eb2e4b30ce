use regex::Regex;
use std::sync::LazyLock;

// Bracketed featured-artist annotation: a lead-in token, a space, then the
// names. "featuring" must come after "feat-" so the dashed form wins.
static MORE_ARTISTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(?:w-|feat-|with|featuring) ([^\]]*)\]").unwrap());

// Any remaining bracketed run, e.g. "[Live]" or "[Remix]".
static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Split a delimiter-joined artist credit into individual names.
///
/// Credits written as "A, B & C" use ", " between all but the last pair, so
/// the commas are first rewritten to " & " and the result split on that. A
/// credit with commas but no " & " is NOT split — a lone comma is not
/// treated as a separator.
pub fn split_artists(raw: &str) -> Vec<String> {
    if raw.contains(" & ") {
        raw.split(", ")
            .collect::<Vec<_>>()
            .join(" & ")
            .split(" & ")
            .map(|name| name.trim().to_string())
            .collect()
    } else {
        vec![raw.trim().to_string()]
    }
}

fn collapse_spaces(s: &str) -> String {
    SPACE_RUN_RE.replace_all(s, " ").trim().to_string()
}

/// Pull a "[w- Someone & Somebody else]" annotation out of a title and
/// return the cleaned title plus the featured artists. Titles without an
/// annotation come back space-collapsed with an empty artist list.
pub fn pull_artists(title: &str) -> (String, Vec<String>) {
    match MORE_ARTISTS_RE.captures(title) {
        None => (collapse_spaces(title), Vec::new()),
        Some(caps) => {
            let artists = split_artists(caps.get(1).map_or("", |m| m.as_str()));
            let mut cleaned = title.to_string();
            cleaned.replace_range(caps.get(0).map_or(0..0, |m| m.range()), "");
            (collapse_spaces(&cleaned), artists)
        }
    }
}

/// Strip every remaining "[...]" run from a title, collecting the inner
/// contents in encounter order. Runs after [`pull_artists`] so featured-
/// artist brackets are not double-captured as variations.
pub fn pull_variations(title: &str) -> (String, Vec<String>) {
    let mut cleaned = title.to_string();
    let mut variations = Vec::new();
    while let Some(caps) = BRACKETED_RE.captures(&cleaned) {
        variations.push(caps.get(1).map_or("", |m| m.as_str()).to_string());
        let range = caps.get(0).map_or(0..0, |m| m.range());
        cleaned.replace_range(range, "");
        cleaned = collapse_spaces(&cleaned);
    }
    (collapse_spaces(&cleaned), variations)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === split_artists ===

    #[test]
    fn test_split_single_artist() {
        assert_eq!(split_artists("solo artist"), vec!["solo artist"]);
    }

    #[test]
    fn test_split_two_artists() {
        assert_eq!(split_artists("artist 1 & artist 2"), vec!["artist 1", "artist 2"]);
    }

    #[test]
    fn test_split_comma_and_ampersand_list() {
        assert_eq!(
            split_artists("artist 1, artist 2, artist 3 & artist 4"),
            vec!["artist 1", "artist 2", "artist 3", "artist 4"],
        );
    }

    #[test]
    fn test_split_commas_without_ampersand_not_split() {
        // Deliberate policy: commas alone are not a separator.
        assert_eq!(split_artists("artist 1, artist 2"), vec!["artist 1, artist 2"]);
    }

    #[test]
    fn test_split_trims_names() {
        assert_eq!(split_artists("  solo artist  "), vec!["solo artist"]);
    }

    // === pull_artists ===

    #[test]
    fn test_pull_artists_absent() {
        let (title, artists) = pull_artists("just a title");
        assert_eq!(title, "just a title");
        assert!(artists.is_empty());
    }

    #[test]
    fn test_pull_artists_w_dash() {
        let (title, artists) = pull_artists("Silence [w- Other Artist]");
        assert_eq!(title, "Silence");
        assert_eq!(artists, vec!["Other Artist"]);
    }

    #[test]
    fn test_pull_artists_feat_dash_multiple() {
        let (title, artists) = pull_artists("title [feat- Other Artist 1 & Other Artist 2]");
        assert_eq!(title, "title");
        assert_eq!(artists, vec!["Other Artist 1", "Other Artist 2"]);
    }

    #[test]
    fn test_pull_artists_featuring_comma_list() {
        let (title, artists) =
            pull_artists("title [featuring Other Artist 1, Other Artist 2 & Other Artist 3]");
        assert_eq!(title, "title");
        assert_eq!(artists, vec!["Other Artist 1", "Other Artist 2", "Other Artist 3"]);
    }

    #[test]
    fn test_pull_artists_case_insensitive() {
        let (title, artists) = pull_artists("title [With Other Artist]");
        assert_eq!(title, "title");
        assert_eq!(artists, vec!["Other Artist"]);
    }

    #[test]
    fn test_pull_artists_mid_title_collapses_spaces() {
        let (title, artists) = pull_artists("title [w- X] reprise");
        assert_eq!(title, "title reprise");
        assert_eq!(artists, vec!["X"]);
    }

    #[test]
    fn test_pull_artists_leaves_other_brackets() {
        let (title, artists) = pull_artists("title [feat- X] [Live]");
        assert_eq!(title, "title [Live]");
        assert_eq!(artists, vec!["X"]);
    }

    // === pull_variations ===

    #[test]
    fn test_pull_variations_none() {
        let (title, variations) = pull_variations("plain title");
        assert_eq!(title, "plain title");
        assert!(variations.is_empty());
    }

    #[test]
    fn test_pull_variations_single() {
        let (title, variations) = pull_variations("title [Live]");
        assert_eq!(title, "title");
        assert_eq!(variations, vec!["Live"]);
    }

    #[test]
    fn test_pull_variations_multiple_in_order() {
        let (title, variations) = pull_variations("title [Live] [1987 Remaster]");
        assert_eq!(title, "title");
        assert_eq!(variations, vec!["Live", "1987 Remaster"]);
    }

    #[test]
    fn test_pull_variations_mid_title() {
        let (title, variations) = pull_variations("title [Acoustic] reprise");
        assert_eq!(title, "title reprise");
        assert_eq!(variations, vec!["Acoustic"]);
    }

    #[test]
    fn test_artists_then_variations_pipeline() {
        let (title, artists) = pull_artists("title [feat- X] [Live]");
        let (title, variations) = pull_variations(&title);
        assert_eq!(title, "title");
        assert_eq!(artists, vec!["X"]);
        assert_eq!(variations, vec!["Live"]);
    }
}
