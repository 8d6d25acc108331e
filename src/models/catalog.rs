use serde::{Deserialize, Serialize};

/// Placeholder group for entries whose directive has no `group-title`
pub const UNKNOWN_GROUP: &str = "unknown";

/// Media type classification, decided from the stream URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Live,
    Movie,
    Series,
}

/// Live TV channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// `tvg-id` when present, otherwise the stream URL
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvg_id: Option<String>,
}

/// On-demand movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub stream_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub group: String,
}

/// Single episode of a season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub name: String,
    pub stream_url: String,
    pub episode_number: u32,
}

/// Season with episodes kept sorted by episode number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    pub season_number: u32,
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn new(series_name: &str, season_number: u32) -> Self {
        Self {
            id: format!("{}-S{}", series_name, season_number),
            name: format!("Saison {}", season_number),
            season_number,
            episodes: Vec::new(),
        }
    }

    /// Append an episode and restore episode-number order.
    /// `sort_by_key` is stable, so equal numbers keep insertion order.
    pub fn push_episode(&mut self, episode: Episode) {
        self.episodes.push(episode);
        self.episodes.sort_by_key(|e| e.episode_number);
    }
}

/// Series (grouped seasons)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Derived series title, also used as the merge key
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub group: String,
    pub seasons: Vec<Season>,
}

impl Series {
    pub fn new(name: &str, cover: Option<String>, group: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            cover,
            group: group.to_string(),
            seasons: Vec::new(),
        }
    }

    /// Find the season with `season_number`, creating it (and re-sorting the
    /// season list) when missing.
    pub fn season_mut(&mut self, season_number: u32) -> &mut Season {
        let existing = self
            .seasons
            .iter()
            .position(|s| s.season_number == season_number);
        let position = match existing {
            Some(pos) => pos,
            None => {
                self.seasons.push(Season::new(&self.name, season_number));
                self.seasons.sort_by_key(|s| s.season_number);
                self.seasons
                    .iter()
                    .position(|s| s.season_number == season_number)
                    .unwrap_or(self.seasons.len() - 1)
            }
        };
        &mut self.seasons[position]
    }

    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

/// Parser output: the three classified collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub channels: Vec<Channel>,
    pub movies: Vec<Movie>,
    pub series: Vec<Series>,
}

impl Catalog {
    /// True when the document produced no media at all
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.movies.is_empty() && self.series.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            channel_count: self.channels.len(),
            movie_count: self.movies.len(),
            series_count: self.series.len(),
            episode_count: self.series.iter().map(Series::episode_count).sum(),
        }
    }
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub channel_count: usize,
    pub movie_count: usize,
    pub series_count: usize,
    pub episode_count: usize,
}

/// Loaded catalog with the metadata of the load that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    /// SHA-1 of the playlist URL
    pub source_hash: String,
    pub loaded_at: i64,
    pub stats: CatalogStats,
    #[serde(flatten)]
    pub catalog: Catalog,
}

/// Display section: one group and its items in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section<T> {
    pub title: String,
    pub data: Vec<T>,
}

/// Sections response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionsResponse<T> {
    pub sections: Vec<Section<T>>,
    pub total: usize,
}
