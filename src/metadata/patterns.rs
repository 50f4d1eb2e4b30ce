use regex::Regex;
use std::sync::{LazyLock, RwLock};

use super::{SimpleMetadata, VaType};

/// Capture-group indices (1-based) for each field a pattern extracts.
/// Fields left at None are simply absent from the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMap {
    pub artist: Option<usize>,
    pub album: Option<usize>,
    pub year: Option<usize>,
    pub track: Option<usize>,
    pub title: Option<usize>,
}

/// A single extraction rule: a regex over the extension-stripped path, the
/// mapping from fields to its capture groups, and an optional compilation
/// tag applied whenever the rule matches.
#[derive(Debug, Clone)]
struct PathPattern {
    rgx: Regex,
    fields: FieldMap,
    compilation: Option<VaType>,
}

impl PathPattern {
    fn extract(&self, stem: &str) -> Option<SimpleMetadata> {
        let caps = self.rgx.captures(stem)?;
        let group =
            |idx: Option<usize>| idx.and_then(|i| caps.get(i)).map(|m| m.as_str().to_string());
        Some(SimpleMetadata {
            artist: group(self.fields.artist).unwrap_or_default(),
            album: group(self.fields.album).unwrap_or_default(),
            track: group(self.fields.track).unwrap_or_default(),
            title: group(self.fields.title).unwrap_or_default(),
            year: group(self.fields.year),
            compilation: self.compilation,
            disc_num: None,
        })
    }
}

/// Ordered list of path patterns. Order encodes priority: the first pattern
/// whose regex matches the extension-stripped path wins, so compilation
/// patterns precede the generic fallbacks, and year-capturing variants
/// precede their year-less twins. Patterns are expected to anchor themselves;
/// an unanchored or overly-broad pattern is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<PathPattern>,
}

impl PatternSet {
    pub fn empty() -> Self {
        PatternSet { patterns: Vec::new() }
    }

    /// The six built-in patterns, in priority order: VA album (with and
    /// without year), soundtrack album (with and without year), then the
    /// generic "artist - album" layouts.
    pub fn built_in() -> Self {
        let year_track = r" - (\d+) - ([^/]+)/(\d+)(?: ?[-.])? ";
        let track = r" - ([^/]+)/(\d+)(?: ?[-.])? ";
        Self::empty()
            .with_pattern(
                Regex::new(&format!(
                    r"(?i)^(?:.*/)?va(?:rious artists)?{year_track}([^/]+) - ([^/]+)$"
                ))
                .unwrap(),
                FieldMap {
                    year: Some(1),
                    album: Some(2),
                    track: Some(3),
                    artist: Some(4),
                    title: Some(5),
                    ..Default::default()
                },
                Some(VaType::Va),
            )
            .with_pattern(
                Regex::new(&format!(
                    r"(?i)^(?:.*/)?va(?:rious artists)?{track}([^/]+) - ([^/]+)$"
                ))
                .unwrap(),
                FieldMap {
                    album: Some(1),
                    track: Some(2),
                    artist: Some(3),
                    title: Some(4),
                    ..Default::default()
                },
                Some(VaType::Va),
            )
            .with_pattern(
                Regex::new(&format!(
                    r"(?i)^(?:.*/)?(?:ost|soundtrack){year_track}([^/]+) - ([^/]+)$"
                ))
                .unwrap(),
                FieldMap {
                    year: Some(1),
                    album: Some(2),
                    track: Some(3),
                    artist: Some(4),
                    title: Some(5),
                    ..Default::default()
                },
                Some(VaType::Ost),
            )
            .with_pattern(
                Regex::new(&format!(
                    r"(?i)^(?:.*/)?(?:ost|soundtrack){track}([^/]+) - ([^/]+)$"
                ))
                .unwrap(),
                FieldMap {
                    album: Some(1),
                    track: Some(2),
                    artist: Some(3),
                    title: Some(4),
                    ..Default::default()
                },
                Some(VaType::Ost),
            )
            .with_pattern(
                Regex::new(&format!(r"(?i)^(?:.*/)?([^/]+){year_track}([^/]+)$")).unwrap(),
                FieldMap {
                    artist: Some(1),
                    year: Some(2),
                    album: Some(3),
                    track: Some(4),
                    title: Some(5),
                },
                None,
            )
            .with_pattern(
                Regex::new(&format!(r"(?i)^(?:.*/)?([^/]+){track}([^/]+)$")).unwrap(),
                FieldMap {
                    artist: Some(1),
                    album: Some(2),
                    track: Some(3),
                    title: Some(4),
                    ..Default::default()
                },
                None,
            )
    }

    /// Append a pattern at the tail (lowest priority). No validation beyond
    /// the compilation the caller already did to get a `Regex`.
    pub fn add_pattern(&mut self, rgx: Regex, fields: FieldMap, compilation: Option<VaType>) {
        self.patterns.push(PathPattern { rgx, fields, compilation });
    }

    /// Builder form of [`add_pattern`](Self::add_pattern), for constructing
    /// isolated sets in tests and callers that don't want the shared default.
    pub fn with_pattern(
        mut self,
        rgx: Regex,
        fields: FieldMap,
        compilation: Option<VaType>,
    ) -> Self {
        self.add_pattern(rgx, fields, compilation);
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Try each pattern in order against the extension-stripped path and
    /// return the first match. None is the normal "unrecognized naming
    /// convention" outcome, not an error.
    pub fn match_path(&self, path: &str) -> Option<SimpleMetadata> {
        let pathname = path.replace('\\', "/");
        let stem = strip_extension(&pathname)?;
        self.patterns.iter().find_map(|p| p.extract(stem))
    }
}

/// Remove the file extension, failing when there isn't a real one: the final
/// component must have a dot with at least two characters after it, and a
/// leading-dot file has no extension at all.
fn strip_extension(path: &str) -> Option<&str> {
    let base = path.rfind('/').map_or(0, |i| i + 1);
    let dot = path[base..].rfind('.').map(|i| base + i)?;
    if dot == base || path.len() - dot - 1 < 2 {
        return None;
    }
    Some(&path[..dot])
}

static DEFAULT_PATTERNS: LazyLock<RwLock<PatternSet>> =
    LazyLock::new(|| RwLock::new(PatternSet::built_in()));

/// Match a path against the process-wide default registry.
pub fn from_path(path: &str) -> Option<SimpleMetadata> {
    DEFAULT_PATTERNS.read().unwrap().match_path(path)
}

/// Append a pattern to the process-wide default registry. It lands behind
/// every existing pattern and affects all subsequent matches.
pub fn add_pattern(rgx: Regex, fields: FieldMap, compilation: Option<VaType>) {
    DEFAULT_PATTERNS.write().unwrap().add_pattern(rgx, fields, compilation);
}
