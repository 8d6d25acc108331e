use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Profiles
    pub profile_store_path: String,

    // Fetching
    pub fetch_timeout_ms: u64,
    pub max_retries: u32,
    pub max_playlist_size_mb: usize,

    // Misc
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),

            // Profiles
            profile_store_path: env::var("PROFILE_STORE_PATH")
                .unwrap_or_else(|_| ".profiles/profiles.json".to_string()),

            // Fetching
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "120000".to_string())
                .parse()
                .unwrap_or(120_000), // 2 minutes

            max_retries: env::var("MAX_RETRIES")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),

            max_playlist_size_mb: env::var("MAX_PLAYLIST_SIZE_MB")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .unwrap_or(200),

            // Misc - Use VLC user agent to avoid IPTV server blocks
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "VLC/3.0.20 LibVLC/3.0.20".to_string()),
        }
    }
}
