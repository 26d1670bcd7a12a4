use tracing::{info, warn};

use crate::entry::{Entry, MAX_RATING};
use crate::error::StoreError;
use crate::poster::{PosterLookup, PosterOutcome, PosterResolver};
use crate::storage::{JsonFile, LoadOutcome, Storage};

/// Result of a successful create or update.
#[derive(Debug, Clone)]
pub struct Saved {
    pub position: usize,
    pub poster: PosterOutcome,
}

/// The ordered collection plus the file it mirrors. Positions are the only
/// identity an entry has, so every mutation goes through here and is written
/// out before returning.
pub struct Watchlist<S = JsonFile, P = PosterResolver> {
    entries: Vec<Entry>,
    storage: S,
    posters: P,
}

impl<S: Storage, P: PosterLookup> Watchlist<S, P> {
    pub fn open(storage: S, posters: P) -> Self {
        let entries = match storage.load() {
            LoadOutcome::Loaded(entries) => {
                info!(count = entries.len(), "watchlist opened");
                entries
            }
            LoadOutcome::Missing => {
                info!("starting a new watchlist");
                Vec::new()
            }
            LoadOutcome::Corrupt { reason } => {
                warn!(reason = %reason, "discarding unreadable watchlist");
                Vec::new()
            }
        };
        Self {
            entries,
            storage,
            posters,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn select(&self, position: usize) -> Result<&Entry, StoreError> {
        self.entries
            .get(position)
            .ok_or(StoreError::PositionOutOfRange {
                position,
                len: self.entries.len(),
            })
    }

    pub fn resolve_poster(&self, title: &str, category: &str) -> PosterOutcome {
        self.posters.resolve(title, category)
    }

    fn save(&self) -> Result<(), StoreError> {
        self.storage.save(&self.entries)?;
        Ok(())
    }

    pub fn create(&mut self, draft: Entry) -> Result<Saved, StoreError> {
        let mut entry = validate(draft)?;
        let poster = self.resolve_poster(&entry.title, &entry.category);
        entry.image = poster.url().to_string();

        self.entries.push(entry);
        let position = self.entries.len() - 1;
        if let Err(err) = self.save() {
            self.entries.pop();
            return Err(err);
        }

        info!(position, title = %self.entries[position].title, "entry created");
        Ok(Saved { position, poster })
    }

    pub fn update(&mut self, position: Option<usize>, draft: Entry) -> Result<Saved, StoreError> {
        let position = self.checked_position(position)?;
        let mut entry = validate(draft)?;
        let poster = self.resolve_poster(&entry.title, &entry.category);
        entry.image = poster.url().to_string();

        let previous = std::mem::replace(&mut self.entries[position], entry);
        if let Err(err) = self.save() {
            self.entries[position] = previous;
            return Err(err);
        }

        info!(position, title = %self.entries[position].title, "entry updated");
        Ok(Saved { position, poster })
    }

    pub fn delete(&mut self, position: Option<usize>) -> Result<Entry, StoreError> {
        let position = self.checked_position(position)?;

        let removed = self.entries.remove(position);
        if let Err(err) = self.save() {
            self.entries.insert(position, removed);
            return Err(err);
        }

        info!(position, title = %removed.title, "entry deleted");
        Ok(removed)
    }

    fn checked_position(&self, position: Option<usize>) -> Result<usize, StoreError> {
        let position = position.ok_or(StoreError::NoSelection)?;
        if position >= self.entries.len() {
            return Err(StoreError::PositionOutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(position)
    }
}

fn validate(draft: Entry) -> Result<Entry, StoreError> {
    let entry = draft.normalized();
    if entry.title.is_empty() {
        return Err(StoreError::MissingField { field: "Title" });
    }
    if entry.category.is_empty() {
        return Err(StoreError::MissingField { field: "Category" });
    }
    if entry.rating > MAX_RATING {
        return Err(StoreError::RatingOutOfRange {
            rating: entry.rating,
        });
    }
    Ok(entry)
}
