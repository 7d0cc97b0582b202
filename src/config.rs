use std::path::PathBuf;
use std::time::Duration;

use crate::resolver::catalog::ITUNES_SEARCH_URL;
use crate::resolver::transport::DEFAULT_TIMEOUT;
use crate::resolver::ResolverConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub playlist_path: PathBuf,
    pub artwork_dir: PathBuf,
    pub catalog_url: String,
    pub timeout: Duration,
    pub result_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playlist_path: PathBuf::from("data/playlist.txt"),
            artwork_dir: PathBuf::from("data/album_covers"),
            catalog_url: ITUNES_SEARCH_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            result_limit: ResolverConfig::default().result_limit,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read settings from the environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            playlist_path: lookup("PLAYLIST_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.playlist_path),
            artwork_dir: lookup("ARTWORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artwork_dir),
            catalog_url: lookup("CATALOG_SEARCH_URL").unwrap_or(defaults.catalog_url),
            timeout: lookup("CATALOG_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            result_limit: lookup("CATALOG_RESULT_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.result_limit),
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            result_limit: self.result_limit,
            ..ResolverConfig::default()
        }
    }
}
