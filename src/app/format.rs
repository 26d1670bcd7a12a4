use crate::entry::{Entry, MAX_RATING};
use crate::poster::PosterOutcome;

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

pub(crate) fn rating_label(rating: u8) -> String {
    format!("{rating} / {MAX_RATING}")
}

pub(crate) fn episodes_label(entry: &Entry) -> String {
    entry
        .episodes
        .map(|count| count.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn notes_label(notes: &str) -> &str {
    if notes.trim().is_empty() { "-" } else { notes }
}

pub(crate) fn entry_details(entry: &Entry) -> String {
    format!(
        "Category: {}\nStatus: {}\nRating: {}\nEpisodes watched: {}\nNotes: {}",
        entry.category,
        entry.status,
        rating_label(entry.rating),
        episodes_label(entry),
        notes_label(&entry.notes),
    )
}

pub(crate) fn saved_message(title: &str, poster: &PosterOutcome) -> String {
    match poster {
        PosterOutcome::Found { source, .. } => {
            format!("'{title}' has been saved (poster from {source}).")
        }
        PosterOutcome::NotFound => format!("'{title}' has been saved. No poster found."),
        PosterOutcome::Failed { .. } => {
            format!("'{title}' has been saved. Poster lookup failed, no image stored.")
        }
    }
}

pub(crate) fn list_header() -> String {
    format!(
        "{:<4} {:<36} {:<12} {:<14} {:<6} {:<5}",
        "#", "TITLE", "CATEGORY", "STATUS", "RATING", "EPS"
    )
}

pub(crate) fn list_row(row: usize, entry: &Entry) -> String {
    format!(
        "{:<4} {:<36} {:<12} {:<14} {:<6} {:<5}",
        row,
        truncate(&entry.title, 36),
        truncate(&entry.category, 12),
        entry.status.label(),
        entry.rating,
        episodes_label(entry)
    )
}
