pub mod classifier;
pub mod fetcher;
pub mod grouping;
pub mod library;
pub mod m3u_parser;
pub mod metrics;
pub mod profile_store;
