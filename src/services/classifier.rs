use lazy_static::lazy_static;
use regex::Regex;

use crate::models::MediaKind;

lazy_static! {
    /// "Show Name S01 E02" (single spaces, ASCII digits right after the markers).
    /// No `(?i)`: Unicode case folding would also match `ſ` and `K`.
    static ref SERIES_STRUCTURED_PATTERN: Regex = Regex::new(r"(.*?) [Ss]([0-9]+) [Ee]([0-9]+)").unwrap();
    /// First bare " S<digits>" marker, used to cut the title when the structured pattern fails
    static ref SEASON_MARKER: Regex = Regex::new(r" [Ss][0-9]+").unwrap();
}

const MOVIE_PATH_MARKER: &str = "/movie/";
const SERIES_PATH_MARKER: &str = "/series/";

/// Series title derived from a directive name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesTitle {
    /// Name matched `<title> S<n> E<n>`
    Structured {
        title: String,
        season: u32,
        episode: u32,
    },
    /// Best-effort title; season and episode are decided by the caller
    Heuristic { title: String },
}

#[cfg(test)]
impl SeriesTitle {
    pub fn title(&self) -> &str {
        match self {
            SeriesTitle::Structured { title, .. } | SeriesTitle::Heuristic { title } => title,
        }
    }
}

/// Content classifier for playlist entries
pub struct ContentClassifier;

impl ContentClassifier {
    /// Classify a stream by literal markers in its URL.
    /// `/movie/` wins over `/series/`; anything else is a live channel.
    pub fn classify(url: &str) -> MediaKind {
        if url.contains(MOVIE_PATH_MARKER) {
            MediaKind::Movie
        } else if url.contains(SERIES_PATH_MARKER) {
            MediaKind::Series
        } else {
            MediaKind::Live
        }
    }

    /// Derive the series title (and season/episode when present) from an entry name
    pub fn extract_series_title(name: &str) -> SeriesTitle {
        if let Some(structured) = Self::structured_title(name) {
            return structured;
        }

        SeriesTitle::Heuristic {
            title: Self::heuristic_title(name),
        }
    }

    fn structured_title(name: &str) -> Option<SeriesTitle> {
        let caps = SERIES_STRUCTURED_PATTERN.captures(name)?;

        // Digit runs too long for u32 fall through to the heuristic
        let season = caps.get(2)?.as_str().parse().ok()?;
        let episode = caps.get(3)?.as_str().parse().ok()?;

        Some(SeriesTitle::Structured {
            title: caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            season,
            episode,
        })
    }

    fn heuristic_title(name: &str) -> String {
        let head = match SEASON_MARKER.find(name) {
            Some(m) => &name[..m.start()],
            None => name,
        };

        let title = head.trim();
        if title.is_empty() {
            name.to_string()
        } else {
            title.to_string()
        }
    }
}
