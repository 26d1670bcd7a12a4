use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Categories offered by the form. Any other non-empty text is accepted too.
pub const CATEGORIES: [&str; 5] = ["Movie", "Anime", "TV Show", "Documentary", "Other"];

pub const MAX_RATING: u8 = 5;
pub const MAX_EPISODES: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    Watched,
    Watching,
    #[default]
    PlanToWatch,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Watched => "Watched",
            Self::Watching => "Watching",
            Self::PlanToWatch => "Plan to Watch",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Watched => Self::Watching,
            Self::Watching => Self::PlanToWatch,
            Self::PlanToWatch => Self::Watched,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Watched => Self::PlanToWatch,
            Self::Watching => Self::Watched,
            Self::PlanToWatch => Self::Watching,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "watched" => Ok(Self::Watched),
            "watching" => Ok(Self::Watching),
            "plan to watch" | "plan" | "planned" => Ok(Self::PlanToWatch),
            _ => Err(format!(
                "unknown status '{}' (expected Watched, Watching or Plan to Watch)",
                raw.trim()
            )),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// Files edited by hand may carry a status the form never offered; those read
// back as the default instead of failing the whole document.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let parsed = value.as_str().and_then(|raw| raw.parse().ok());
        Ok(parsed.unwrap_or_else(|| {
            if !value.is_null() {
                warn!(status = %value, "unrecognized status, reading as Plan to Watch");
            }
            Self::default()
        }))
    }
}

/// One watchlist record. Field names match the persisted JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: u8,
    #[serde(
        default,
        serialize_with = "serialize_episodes",
        deserialize_with = "deserialize_episodes"
    )]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub image: String,
}

impl Entry {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Trims text fields and keeps `episodes` only while the entry is being watched.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.category = self.category.trim().to_string();
        self.notes = self.notes.trim().to_string();
        self.image = self.image.trim().to_string();
        self.episodes = match self.status {
            Status::Watching => Some(self.episodes.unwrap_or(0).min(MAX_EPISODES)),
            Status::Watched | Status::PlanToWatch => None,
        };
        self
    }
}

pub fn is_anime_category(category: &str) -> bool {
    category.trim().eq_ignore_ascii_case("anime")
}

fn lenient_count(value: Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

// Anything that is not a usable count reads as 0; large values are clamped.
fn deserialize_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let unusable = !value.is_null() && !value.as_str().is_some_and(|s| s.trim().is_empty());
    match lenient_count(value.clone()) {
        Some(rating) => Ok(rating.min(u64::from(MAX_RATING)) as u8),
        None => {
            if unusable {
                warn!(rating = %value, "unusable rating, reading as 0");
            }
            Ok(0)
        }
    }
}

// Entries not being watched store an empty string rather than a number.
fn serialize_episodes<S: Serializer>(
    episodes: &Option<u32>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match episodes {
        Some(count) => serializer.serialize_u32(*count),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_episodes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_count(value).map(|count| count.min(u64::from(u32::MAX)) as u32))
}
