use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

use crate::models::CatalogStats;

lazy_static! {
    /// Playlist loads by outcome (ok, transport_error, content_error)
    static ref PLAYLIST_LOADS: IntCounterVec = register_int_counter_vec!(
        "playlist_loads_total",
        "Playlist load attempts by outcome",
        &["outcome"]
    )
    .unwrap();

    /// Entries in the currently loaded catalog
    static ref CATALOG_ENTRIES: IntGaugeVec = register_int_gauge_vec!(
        "catalog_entries",
        "Entries in the loaded catalog by kind",
        &["kind"]
    )
    .unwrap();
}

pub fn record_load(outcome: &str) {
    PLAYLIST_LOADS.with_label_values(&[outcome]).inc();
}

pub fn set_catalog_entries(stats: &CatalogStats) {
    let counts = [
        ("channel", stats.channel_count),
        ("movie", stats.movie_count),
        ("series", stats.series_count),
        ("episode", stats.episode_count),
    ];
    for (kind, count) in counts {
        CATALOG_ENTRIES
            .with_label_values(&[kind])
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}
