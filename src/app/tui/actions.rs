use std::collections::HashMap;
use std::sync::mpsc;

use ratatui::widgets::TableState;

use crate::entry::Entry;
use crate::error::StoreError;
use crate::http::HttpClient;
use crate::poster::{Artwork, PosterLookup, fetch_artwork};
use crate::storage::Storage;
use crate::store::{Saved, Watchlist};

use super::form::{FormMode, FormState};
use super::{ArtworkFetchResult, ArtworkState};

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

/// Keeps the highlighted row inside the collection after it shrinks or grows.
pub(crate) fn clamp_selection(table_state: &mut TableState, len: usize) {
    if len == 0 {
        table_state.select(None);
        return;
    }
    match table_state.selected() {
        Some(selected) => table_state.select(Some(selected.min(len - 1))),
        None => table_state.select(Some(0)),
    }
}

pub(crate) fn submit_form<S: Storage, P: PosterLookup>(
    watchlist: &mut Watchlist<S, P>,
    form: &FormState,
) -> Result<Saved, StoreError> {
    let draft = form.to_draft();
    match form.mode {
        FormMode::Add => watchlist.create(draft),
        FormMode::Edit { position } => watchlist.update(Some(position), draft),
    }
}

pub(crate) fn delete_at<S: Storage, P: PosterLookup>(
    watchlist: &mut Watchlist<S, P>,
    table_state: &mut TableState,
    position: usize,
) -> String {
    match watchlist.delete(Some(position)) {
        Ok(_) => {
            clamp_selection(table_state, watchlist.len());
            status_info("Item removed.")
        }
        Err(err) => status_error(&format!("Delete failed: {err}")),
    }
}

pub(super) fn ensure_selected_artwork(
    entries: &[Entry],
    table_state: &TableState,
    artwork_by_url: &mut HashMap<String, ArtworkState>,
    tx: &mpsc::Sender<ArtworkFetchResult>,
    http: &HttpClient,
) {
    let Some(selected_idx) = table_state.selected() else {
        return;
    };
    let Some(entry) = entries.get(selected_idx) else {
        return;
    };
    let url = entry.image.trim();
    if url.is_empty() || artwork_by_url.contains_key(url) {
        return;
    }

    artwork_by_url.insert(url.to_string(), ArtworkState::Loading);
    let url = url.to_string();
    let http = http.clone();
    let tx = tx.clone();
    std::thread::spawn(move || {
        let artwork = fetch_artwork(&http, &url);
        let _ = tx.send(ArtworkFetchResult { url, artwork });
    });
}

/// Forgets failed downloads for every URL except `current`, so they are
/// fetched again once the selection comes back to them.
pub(crate) fn forget_failed_artwork(
    artwork_by_url: &mut HashMap<String, ArtworkState>,
    current: Option<&str>,
) {
    artwork_by_url.retain(|url, state| {
        let failed = matches!(state, ArtworkState::Ready(Artwork::Failed(_)));
        !failed || Some(url.as_str()) == current
    });
}

pub(super) fn drain_artwork_results(
    rx: &mpsc::Receiver<ArtworkFetchResult>,
    artwork_by_url: &mut HashMap<String, ArtworkState>,
) {
    while let Ok(result) = rx.try_recv() {
        artwork_by_url.insert(result.url, ArtworkState::Ready(result.artwork));
    }
}
