//! Poster lookup: OMDb first, then Jikan for anime. Lookups never fail the
//! caller; problems are reported through [`PosterOutcome`] instead.

mod artwork;
mod jikan;
mod omdb;

use std::fmt;

use tracing::{debug, info, warn};

pub use self::artwork::{Artwork, fetch_artwork, fit_within};

use crate::config::Config;
use crate::entry::is_anime_category;
use crate::http::HttpClient;

/// Anything that can map a title and category to a poster URL.
pub trait PosterLookup {
    fn resolve(&self, title: &str, category: &str) -> PosterOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSource {
    Omdb,
    Jikan,
}

impl fmt::Display for PosterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Omdb => f.write_str("OMDb"),
            Self::Jikan => f.write_str("Jikan"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterOutcome {
    Found { url: String, source: PosterSource },
    /// Every consulted service answered, none had a poster.
    NotFound,
    /// At least one stage errored and no stage produced a poster.
    Failed { reasons: Vec<String> },
}

impl PosterOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Found { url, .. } => url,
            Self::NotFound | Self::Failed { .. } => "",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PosterResolver {
    http: HttpClient,
    omdb_api_key: Option<String>,
    omdb_url: String,
    jikan_url: String,
}

impl PosterResolver {
    pub fn new(http: HttpClient, config: &Config) -> Self {
        Self {
            http,
            omdb_api_key: config.omdb_api_key.clone(),
            omdb_url: config.omdb_url.clone(),
            jikan_url: config.jikan_url.clone(),
        }
    }
}

impl PosterLookup for PosterResolver {
    fn resolve(&self, title: &str, category: &str) -> PosterOutcome {
        let title = title.trim();
        if title.is_empty() {
            return PosterOutcome::NotFound;
        }

        let mut reasons = Vec::new();

        match omdb::lookup(
            &self.http,
            &self.omdb_url,
            self.omdb_api_key.as_deref(),
            title,
        ) {
            Ok(Some(url)) => {
                info!(title, %url, "poster found on OMDb");
                return PosterOutcome::Found {
                    url,
                    source: PosterSource::Omdb,
                };
            }
            Ok(None) => debug!(title, "OMDb has no poster"),
            Err(reason) => {
                warn!(title, reason = %reason, "OMDb lookup failed");
                reasons.push(format!("OMDb: {reason}"));
            }
        }

        if is_anime_category(category) {
            match jikan::lookup(&self.http, &self.jikan_url, title) {
                Ok(Some(url)) => {
                    info!(title, %url, "poster found on Jikan");
                    return PosterOutcome::Found {
                        url,
                        source: PosterSource::Jikan,
                    };
                }
                Ok(None) => debug!(title, "Jikan has no poster"),
                Err(reason) => {
                    warn!(title, reason = %reason, "Jikan lookup failed");
                    reasons.push(format!("Jikan: {reason}"));
                }
            }
        }

        if reasons.is_empty() {
            PosterOutcome::NotFound
        } else {
            PosterOutcome::Failed { reasons }
        }
    }
}
