use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use image::{Rgb, RgbImage};
use ratatui::widgets::TableState;

use super::format::*;
use super::row_to_position;
use super::tui::{
    ArtworkState, FormField, FormMode, FormOutcome, FormState, artwork_lines, clamp_selection,
    delete_at, forget_failed_artwork, submit_form,
};
use crate::cli::EntryArgs;
use crate::entry::{Entry, Status};
use crate::error::StoreError;
use crate::poster::{Artwork, PosterLookup, PosterOutcome, PosterSource};
use crate::storage::JsonFile;
use crate::store::Watchlist;

struct FixedPoster(PosterOutcome);

impl PosterLookup for FixedPoster {
    fn resolve(&self, _title: &str, _category: &str) -> PosterOutcome {
        self.0.clone()
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(form: &mut FormState, text: &str) {
    for ch in text.chars() {
        assert_eq!(form.handle_key(key(KeyCode::Char(ch))), FormOutcome::Continue);
    }
}

fn temp_watchlist(
    dir: &tempfile::TempDir,
    titles: &[&str],
) -> Watchlist<JsonFile, FixedPoster> {
    let mut watchlist = Watchlist::open(
        JsonFile::new(dir.path().join("watchlist.json")),
        FixedPoster(PosterOutcome::NotFound),
    );
    for title in titles {
        watchlist
            .create(Entry::new(*title, "Movie"))
            .expect("seed entry");
    }
    watchlist
}

#[test]
fn rows_map_to_zero_based_positions() {
    assert_eq!(row_to_position(1), Some(0));
    assert_eq!(row_to_position(12), Some(11));
    assert_eq!(row_to_position(0), None);
}

#[test]
fn entry_args_only_override_given_fields() {
    let mut base = Entry::new("Frieren", "Anime");
    base.status = Status::Watching;
    base.episodes = Some(3);
    base.notes = "keep me".to_string();

    let args = EntryArgs {
        episodes: Some(4),
        rating: Some(5),
        ..EntryArgs::default()
    };
    let updated = args.apply_to(base);

    assert_eq!(updated.title, "Frieren");
    assert_eq!(updated.episodes, Some(4));
    assert_eq!(updated.rating, 5);
    assert_eq!(updated.notes, "keep me");
}

#[test]
fn blank_form_starts_as_plan_to_watch_without_episode_field() {
    let form = FormState::blank();
    assert_eq!(form.mode, FormMode::Add);
    assert_eq!(form.status, Status::PlanToWatch);
    assert!(!form.visible_fields().contains(&FormField::Episodes));
}

#[test]
fn typing_fills_the_focused_text_field() {
    let mut form = FormState::blank();
    type_text(&mut form, "Dune");
    form.handle_key(key(KeyCode::Tab));
    type_text(&mut form, "Movie");
    form.handle_key(key(KeyCode::Backspace));
    type_text(&mut form, "e");

    assert_eq!(form.title, "Dune");
    assert_eq!(form.category, "Movie");
}

#[test]
fn control_chords_are_not_typed() {
    let mut form = FormState::blank();
    form.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(form.title, "");
}

#[test]
fn episode_field_appears_only_while_watching() {
    let mut form = FormState::blank();
    form.focus = FormField::Status;

    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.status, Status::Watching);
    assert!(form.visible_fields().contains(&FormField::Episodes));

    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus, FormField::Episodes);
    type_text(&mut form, "12");
    assert_eq!(form.episodes, 12);
    assert_eq!(form.to_draft().episodes, Some(12));

    form.focus = FormField::Status;
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.status, Status::PlanToWatch);
    assert_eq!(form.to_draft().episodes, None);
}

#[test]
fn focus_wraps_and_skips_hidden_episode_field() {
    let mut form = FormState::blank();
    form.focus = FormField::Rating;
    form.handle_key(key(KeyCode::Down));
    assert_eq!(form.focus, FormField::Notes);
    form.handle_key(key(KeyCode::Down));
    assert_eq!(form.focus, FormField::Title);
    form.handle_key(key(KeyCode::BackTab));
    assert_eq!(form.focus, FormField::Notes);
}

#[test]
fn category_cycles_known_values_and_accepts_free_text() {
    let mut form = FormState::blank();
    form.focus = FormField::Category;

    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.category, "Movie");
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.category, "Anime");
    form.handle_key(key(KeyCode::Left));
    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.category, "Other");

    form.category.clear();
    type_text(&mut form, "Podcast");
    assert_eq!(form.category, "Podcast");
}

#[test]
fn rating_stays_within_bounds() {
    let mut form = FormState::blank();
    form.focus = FormField::Rating;
    for _ in 0..8 {
        form.handle_key(key(KeyCode::Right));
    }
    assert_eq!(form.rating, 5);
    type_text(&mut form, "9");
    assert_eq!(form.rating, 5);
    type_text(&mut form, "2");
    assert_eq!(form.rating, 2);
    form.handle_key(key(KeyCode::Left));
    form.handle_key(key(KeyCode::Left));
    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.rating, 0);
}

#[test]
fn enter_submits_and_escape_cancels() {
    let mut form = FormState::blank();
    assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Submit);
    assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Cancel);
}

#[test]
fn edit_form_is_prefilled_from_the_selected_entry() {
    let mut entry = Entry::new("Frieren", "Anime");
    entry.status = Status::Watching;
    entry.rating = 4;
    entry.episodes = Some(9);
    entry.notes = "slow burn".to_string();

    let form = FormState::edit(2, &entry);
    assert_eq!(form.mode, FormMode::Edit { position: 2 });
    let draft = form.to_draft();
    assert_eq!(draft.title, "Frieren");
    assert_eq!(draft.episodes, Some(9));
    assert_eq!(draft.notes, "slow burn");
    assert_eq!(draft.image, "");
}

#[test]
fn submitting_an_add_form_appends_and_persists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut watchlist = temp_watchlist(&dir, &["Heat"]);

    let mut form = FormState::blank();
    type_text(&mut form, "  Arrival ");
    form.category = "Movie".to_string();
    let saved = submit_form(&mut watchlist, &form).expect("submit should succeed");

    assert_eq!(saved.position, 1);
    assert_eq!(watchlist.entries()[1].title, "Arrival");
    let reopened = Watchlist::open(
        JsonFile::new(dir.path().join("watchlist.json")),
        FixedPoster(PosterOutcome::NotFound),
    );
    assert_eq!(reopened.entries(), watchlist.entries());
}

#[test]
fn submitting_an_edit_form_replaces_that_position() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut watchlist = temp_watchlist(&dir, &["Heat", "Dune", "Alien"]);

    let mut form = FormState::edit(1, watchlist.select(1).expect("exists"));
    form.title = "Dune: Part Two".to_string();
    form.rating = 5;
    submit_form(&mut watchlist, &form).expect("submit should succeed");

    let titles: Vec<_> = watchlist.entries().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Heat", "Dune: Part Two", "Alien"]);
    assert_eq!(watchlist.entries()[1].rating, 5);
}

#[test]
fn submitting_without_category_reports_validation_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut watchlist = temp_watchlist(&dir, &["Heat"]);

    let mut form = FormState::blank();
    type_text(&mut form, "Dune");
    let err = submit_form(&mut watchlist, &form).expect_err("category missing");

    assert!(matches!(err, StoreError::MissingField { field: "Category" }));
    assert_eq!(err.to_string(), "Title and Category are required (Category is empty).");
    assert_eq!(watchlist.len(), 1);
}

#[test]
fn deleting_the_last_row_moves_selection_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut watchlist = temp_watchlist(&dir, &["Heat", "Dune", "Alien"]);
    let mut table_state = TableState::default();
    table_state.select(Some(2));

    let status = delete_at(&mut watchlist, &mut table_state, 2);

    assert_eq!(status, "INFO: Item removed.");
    assert_eq!(table_state.selected(), Some(1));
    assert_eq!(watchlist.len(), 2);
}

#[test]
fn deleting_a_missing_row_reports_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut watchlist = temp_watchlist(&dir, &["Heat"]);
    let mut table_state = TableState::default();

    let status = delete_at(&mut watchlist, &mut table_state, 4);

    assert!(status.starts_with("ERROR: Delete failed"), "status: {status}");
    assert_eq!(watchlist.len(), 1);
}

#[test]
fn clamp_selection_tracks_collection_size() {
    let mut table_state = TableState::default();
    clamp_selection(&mut table_state, 3);
    assert_eq!(table_state.selected(), Some(0));
    table_state.select(Some(7));
    clamp_selection(&mut table_state, 3);
    assert_eq!(table_state.selected(), Some(2));
    clamp_selection(&mut table_state, 0);
    assert_eq!(table_state.selected(), None);
}

#[test]
fn saved_message_mentions_poster_result() {
    let found = PosterOutcome::Found {
        url: "https://img.example/a.jpg".to_string(),
        source: PosterSource::Jikan,
    };
    assert_eq!(
        saved_message("Akira", &found),
        "'Akira' has been saved (poster from Jikan)."
    );
    assert_eq!(
        saved_message("Heat", &PosterOutcome::NotFound),
        "'Heat' has been saved. No poster found."
    );
    let failed = PosterOutcome::Failed {
        reasons: vec!["OMDb: timeout".to_string()],
    };
    assert!(saved_message("Heat", &failed).contains("Poster lookup failed"));
}

#[test]
fn entry_details_show_placeholders_for_empty_fields() {
    let mut entry = Entry::new("Heat", "Movie");
    entry.rating = 3;
    let details = entry_details(&entry);
    assert!(details.contains("Rating: 3 / 5"));
    assert!(details.contains("Episodes watched: -"));
    assert!(details.contains("Notes: -"));
}

#[test]
fn list_rows_truncate_long_titles() {
    let entry = Entry::new("A".repeat(80), "Documentary");
    let row = list_row(3, &entry);
    assert!(row.starts_with("3 "));
    assert!(row.contains(&format!("{}...", "A".repeat(33))));
    assert!(row.contains("Plan to Watch"));
}

#[test]
fn artwork_lines_pack_two_pixel_rows_per_line() {
    let image = RgbImage::from_pixel(150, 225, Rgb([10, 20, 30]));
    let lines = artwork_lines(&image, 20, 15);

    assert_eq!(lines.len(), 15);
    assert!(lines.iter().all(|line| line.spans.len() == 20));
}

#[test]
fn artwork_lines_are_empty_for_zero_sized_area() {
    let image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
    assert!(artwork_lines(&image, 0, 10).is_empty());
}

#[test]
fn failed_artwork_is_forgotten_once_the_selection_moves_on() {
    let mut artwork_by_url = HashMap::new();
    artwork_by_url.insert(
        "https://img.example/broken.jpg".to_string(),
        ArtworkState::Ready(Artwork::Failed("HTTP 503".to_string())),
    );
    artwork_by_url.insert(
        "https://img.example/current.jpg".to_string(),
        ArtworkState::Ready(Artwork::Failed("timeout".to_string())),
    );
    artwork_by_url.insert(
        "https://img.example/missing.jpg".to_string(),
        ArtworkState::Ready(Artwork::Missing),
    );
    artwork_by_url.insert("https://img.example/slow.jpg".to_string(), ArtworkState::Loading);

    forget_failed_artwork(&mut artwork_by_url, Some("https://img.example/current.jpg"));

    assert!(!artwork_by_url.contains_key("https://img.example/broken.jpg"));
    assert!(artwork_by_url.contains_key("https://img.example/current.jpg"));
    assert!(artwork_by_url.contains_key("https://img.example/missing.jpg"));
    assert!(artwork_by_url.contains_key("https://img.example/slow.jpg"));
}
