use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::paths::default_watchlist_file_path;

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_JIKAN_URL: &str = "https://api.jikan.moe/v4/anime";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ATTEMPTS: usize = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub attempts: usize,
    pub retry_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            attempts: DEFAULT_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub watchlist_file: PathBuf,
    /// Missing key means the OMDb stage is skipped and counted as a failure.
    pub omdb_api_key: Option<String>,
    pub omdb_url: String,
    pub jikan_url: String,
    pub http: HttpSettings,
}

impl Config {
    pub fn from_env(file_override: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), file_override)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        file_override: Option<PathBuf>,
    ) -> Result<Self> {
        let watchlist_file = match file_override {
            Some(path) => path,
            None => match non_blank(lookup("WATCHLIST_FILE")) {
                Some(path) => PathBuf::from(path),
                None => default_watchlist_file_path()?,
            },
        };

        let mut http = HttpSettings::default();
        if let Some(secs) = parse_number::<u64>(&lookup, "WATCHLIST_HTTP_TIMEOUT_SECS") {
            http.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(attempts) = parse_number::<usize>(&lookup, "WATCHLIST_HTTP_ATTEMPTS") {
            http.attempts = attempts.max(1);
        }

        Ok(Self {
            watchlist_file,
            omdb_api_key: non_blank(lookup("OMDB_API_KEY")),
            omdb_url: DEFAULT_OMDB_URL.to_string(),
            jikan_url: DEFAULT_JIKAN_URL.to_string(),
            http,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = non_blank(lookup(key))?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
