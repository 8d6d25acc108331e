use lazy_static::lazy_static;
use regex::Regex;
use sha1::{Digest, Sha1};
use std::collections::HashMap;

use crate::models::{Catalog, Channel, Episode, MediaKind, Movie, Series, UNKNOWN_GROUP};
use crate::services::classifier::{ContentClassifier, SeriesTitle};

const EXTINF_PREFIX: &str = "#EXTINF:";
const STREAM_SCHEMES: [&str; 2] = ["http://", "https://"];
const UNKNOWN_NAME: &str = "Unknown";

lazy_static! {
    /// `#EXTINF:<duration><attributes>,<name>`; the name is whatever follows the last comma
    static ref EXTINF_REGEX: Regex = Regex::new(r"^#EXTINF:[-0-9]+(.*),(.*)").unwrap();

    static ref TVG_ID_REGEX: Regex = Regex::new(r#"tvg-id="([^"]*)""#).unwrap();
    static ref TVG_LOGO_REGEX: Regex = Regex::new(r#"tvg-logo="([^"]*)""#).unwrap();
    static ref GROUP_TITLE_REGEX: Regex = Regex::new(r#"group-title="([^"]*)""#).unwrap();
}

/// Metadata from a directive line, waiting for its stream URL
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry {
    name: String,
    logo: Option<String>,
    group: String,
    tvg_id: Option<String>,
}

/// Generate SHA1 hash of URL for cache key
pub fn hash_url(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Look up a single `key="value"` attribute; empty values count as absent
fn extract_attr(attributes: &str, regex: &Regex) -> Option<String> {
    regex
        .captures(attributes)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse an EXTINF line
/// Format: #EXTINF:duration tvg-id="..." tvg-logo="..." group-title="...",Title
fn parse_extinf(line: &str) -> Option<PendingEntry> {
    let caps = EXTINF_REGEX.captures(line)?;
    let attributes = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

    Some(PendingEntry {
        name: if name.is_empty() {
            UNKNOWN_NAME.to_string()
        } else {
            name.to_string()
        },
        logo: extract_attr(attributes, &TVG_LOGO_REGEX),
        group: extract_attr(attributes, &GROUP_TITLE_REGEX)
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string()),
        tvg_id: extract_attr(attributes, &TVG_ID_REGEX),
    })
}

/// Stream line: lowercase `http://` or `https://` prefix, no further validation
fn is_stream_url(line: &str) -> bool {
    STREAM_SCHEMES.iter().any(|scheme| line.starts_with(*scheme))
}

/// Accumulates the three collections during a parse.
/// Series keep first-seen order; the index maps a series title to its slot.
#[derive(Default)]
struct CatalogBuilder {
    channels: Vec<Channel>,
    movies: Vec<Movie>,
    series: Vec<Series>,
    series_index: HashMap<String, usize>,
}

impl CatalogBuilder {
    fn push(&mut self, entry: PendingEntry, url: &str) {
        match ContentClassifier::classify(url) {
            MediaKind::Movie => self.movies.push(Movie {
                id: url.to_string(),
                name: entry.name,
                stream_url: url.to_string(),
                cover: entry.logo,
                group: entry.group,
            }),
            MediaKind::Series => self.push_episode(entry, url),
            MediaKind::Live => self.channels.push(Channel {
                id: entry.tvg_id.clone().unwrap_or_else(|| url.to_string()),
                name: entry.name,
                url: url.to_string(),
                logo: entry.logo,
                group: entry.group,
                tvg_id: entry.tvg_id,
            }),
        }
    }

    fn push_episode(&mut self, entry: PendingEntry, url: &str) {
        let (series_name, season_number, episode_number, episode_name) =
            match ContentClassifier::extract_series_title(&entry.name) {
                SeriesTitle::Structured {
                    title,
                    season,
                    episode,
                } => (title, season, episode, format!("Episode {}", episode)),
                SeriesTitle::Heuristic { title } => {
                    // Counts the first season in the list, whatever its number
                    let known = self
                        .series_index
                        .get(&title)
                        .and_then(|&idx| self.series[idx].seasons.first())
                        .map(|season| season.episodes.len())
                        .unwrap_or(0);
                    let episode = u32::try_from(known).unwrap_or(u32::MAX).saturating_add(1);
                    (title, 1, episode, entry.name.clone())
                }
            };

        // First-seen cover and group win for a given title
        let existing = self.series_index.get(&series_name).copied();
        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.series
                    .push(Series::new(&series_name, entry.logo.clone(), &entry.group));
                self.series_index
                    .insert(series_name.clone(), self.series.len() - 1);
                self.series.len() - 1
            }
        };

        self.series[idx].season_mut(season_number).push_episode(Episode {
            id: url.to_string(),
            name: episode_name,
            stream_url: url.to_string(),
            episode_number,
        });
    }

    fn finish(self) -> Catalog {
        Catalog {
            channels: self.channels,
            movies: self.movies,
            series: self.series,
        }
    }
}

/// Parse playlist text into a catalog.
///
/// Malformed and unrecognized lines are skipped; a document with no usable
/// entries yields an empty catalog rather than an error.
pub fn parse(document: &str) -> Catalog {
    let mut builder = CatalogBuilder::default();
    let mut pending: Option<PendingEntry> = None;

    for line in document.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(EXTINF_PREFIX) {
            // A directive that does not parse leaves the previous entry pending
            if let Some(entry) = parse_extinf(trimmed) {
                pending = Some(entry);
            }
            continue;
        }

        if !is_stream_url(trimmed) {
            continue;
        }

        if let Some(entry) = pending.take() {
            builder.push(entry, trimmed);
        }
    }

    let catalog = builder.finish();
    tracing::debug!(
        channels = catalog.channels.len(),
        movies = catalog.movies.len(),
        series = catalog.series.len(),
        "Playlist parsed"
    );
    catalog
}
