mod actions;
mod form;
mod render;
mod terminal;

use std::collections::HashMap;
use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;
use tracing::error;

use crate::http::HttpClient;
use crate::poster::{Artwork, PosterLookup};
use crate::storage::Storage;
use crate::store::Watchlist;

use super::format::saved_message;

#[cfg(test)]
pub(crate) use self::actions::clamp_selection;
pub(crate) use self::actions::{delete_at, forget_failed_artwork, submit_form};
use self::actions::{drain_artwork_results, ensure_selected_artwork, status_error, status_info};
pub(crate) use self::form::FormState;
#[cfg(test)]
pub(crate) use self::form::{FormField, FormMode, FormOutcome};
use self::render::draw_tui;
#[cfg(test)]
pub(crate) use self::render::artwork_lines;
use self::terminal::TerminalGuard;

#[derive(Debug, Clone)]
pub(super) struct PendingDelete {
    pub(super) position: usize,
    pub(super) title: String,
}

pub(super) enum View {
    Browse,
    Form(FormState),
    ConfirmDelete(PendingDelete),
}

#[derive(Debug)]
pub(super) struct ArtworkFetchResult {
    pub(super) url: String,
    pub(super) artwork: Artwork,
}

#[derive(Debug)]
pub(crate) enum ArtworkState {
    Loading,
    Ready(Artwork),
}

pub(crate) fn run_tui<S: Storage, P: PosterLookup>(
    watchlist: &mut Watchlist<S, P>,
    http: &HttpClient,
) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut table_state = TableState::default();
    table_state.select((!watchlist.is_empty()).then_some(0));
    let mut view = View::Browse;
    let mut artwork_by_url: HashMap<String, ArtworkState> = HashMap::new();
    let (artwork_tx, artwork_rx) = mpsc::channel::<ArtworkFetchResult>();
    let mut status = if watchlist.is_empty() {
        status_info("Watchlist is empty. Press `a` to add an entry.")
    } else {
        status_info("Ready.")
    };

    let mut artwork_selection = table_state.selected();

    loop {
        drain_artwork_results(&artwork_rx, &mut artwork_by_url);
        if table_state.selected() != artwork_selection {
            artwork_selection = table_state.selected();
            let current = artwork_selection
                .and_then(|idx| watchlist.entries().get(idx))
                .map(|entry| entry.image.trim());
            forget_failed_artwork(&mut artwork_by_url, current);
        }
        ensure_selected_artwork(
            watchlist.entries(),
            &table_state,
            &mut artwork_by_url,
            &artwork_tx,
            http,
        );
        terminal.draw(|frame| {
            draw_tui(
                frame,
                watchlist.entries(),
                &mut table_state,
                &view,
                &status,
                &artwork_by_url,
            )
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        view = match std::mem::replace(&mut view, View::Browse) {
            View::ConfirmDelete(dialog) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    status = delete_at(watchlist, &mut table_state, dialog.position);
                    View::Browse
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    status = status_info("Delete canceled.");
                    View::Browse
                }
                _ => View::ConfirmDelete(dialog),
            },
            View::Form(mut form) => match form.handle_key(key) {
                form::FormOutcome::Continue => View::Form(form),
                form::FormOutcome::Cancel => {
                    status = status_info("Canceled.");
                    View::Browse
                }
                form::FormOutcome::Submit => {
                    status = status_info(&format!(
                        "Saving '{}' and looking up a poster...",
                        form.title.trim()
                    ));
                    terminal.draw(|frame| {
                        draw_tui(
                            frame,
                            watchlist.entries(),
                            &mut table_state,
                            &View::Browse,
                            &status,
                            &artwork_by_url,
                        )
                    })?;

                    match submit_form(watchlist, &form) {
                        Ok(saved) => {
                            table_state.select(Some(saved.position));
                            let title = &watchlist.entries()[saved.position].title;
                            status = status_info(&saved_message(title, &saved.poster));
                            View::Browse
                        }
                        Err(err) => {
                            if !err.is_user_error() {
                                error!(error = ?err, "saving from the form failed");
                            }
                            status = status_error(&err.to_string());
                            View::Form(form)
                        }
                    }
                }
            },
            View::Browse => match handle_browse_key(watchlist, &mut table_state, key) {
                BrowseOutcome::Quit => break,
                BrowseOutcome::Open(next) => next,
                BrowseOutcome::Status(message) => {
                    status = message;
                    View::Browse
                }
                BrowseOutcome::Stay => View::Browse,
            },
        };
    }

    terminal.show_cursor()?;
    guard.leave()?;
    Ok(())
}

enum BrowseOutcome {
    Quit,
    Open(View),
    Status(String),
    Stay,
}

fn handle_browse_key<S: Storage, P: PosterLookup>(
    watchlist: &Watchlist<S, P>,
    table_state: &mut TableState,
    key: KeyEvent,
) -> BrowseOutcome {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => BrowseOutcome::Quit,
        KeyCode::Up => {
            if let Some(selected) = table_state.selected() {
                table_state.select(Some(selected.saturating_sub(1)));
            }
            BrowseOutcome::Stay
        }
        KeyCode::Down => {
            if let Some(selected) = table_state.selected()
                && !watchlist.is_empty()
            {
                let next = (selected + 1).min(watchlist.len().saturating_sub(1));
                table_state.select(Some(next));
            }
            BrowseOutcome::Stay
        }
        KeyCode::Char('a') => BrowseOutcome::Open(View::Form(FormState::blank())),
        KeyCode::Char('e') | KeyCode::Enter => {
            let Some(selected) = table_state.selected() else {
                return BrowseOutcome::Status(status_error("Select an item first."));
            };
            match watchlist.select(selected) {
                Ok(entry) => BrowseOutcome::Open(View::Form(FormState::edit(selected, entry))),
                Err(err) => BrowseOutcome::Status(status_error(&err.to_string())),
            }
        }
        KeyCode::Char('d') => {
            let Some(selected) = table_state.selected() else {
                return BrowseOutcome::Status(status_error("Select an item first."));
            };
            match watchlist.select(selected) {
                Ok(entry) => BrowseOutcome::Open(View::ConfirmDelete(PendingDelete {
                    position: selected,
                    title: entry.title.clone(),
                })),
                Err(err) => BrowseOutcome::Status(status_error(&err.to_string())),
            }
        }
        _ => BrowseOutcome::Stay,
    }
}
