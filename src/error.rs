use std::io;
use std::path::PathBuf;

use crate::entry::MAX_RATING;

/// Failures a store operation reports back to the user.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Title and Category are required ({field} is empty).")]
    MissingField { field: &'static str },

    #[error("Rating must be between 0 and {max}, got {rating}.", max = MAX_RATING)]
    RatingOutOfRange { rating: u8 },

    #[error("Select an item first.")]
    NoSelection,

    #[error("No entry at row {}: the watchlist has {len} entries.", .position + 1)]
    PositionOutOfRange { position: usize, len: usize },

    #[error("failed to save watchlist")]
    Persist(#[from] StorageError),
}

impl StoreError {
    /// Validation and selection problems, as opposed to a failed write.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Persist(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode watchlist")]
    Encode(#[from] serde_json::Error),
}
