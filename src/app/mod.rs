mod format;
mod tui;

#[cfg(test)]
mod tests;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{Cli, Command, EntryArgs};
use crate::config::Config;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::http::HttpClient;
use crate::poster::{PosterLookup, PosterOutcome, PosterResolver};
use crate::storage::{JsonFile, Storage};
use crate::store::Watchlist;

use self::format::{entry_details, list_header, list_row, saved_message};

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env(cli.file)?;
    if config.omdb_api_key.is_none() {
        warn!("OMDB_API_KEY is not set; only anime posters can be found");
    }

    let http = HttpClient::new(&config.http);
    let posters = PosterResolver::new(http.clone(), &config);
    let storage = JsonFile::new(&config.watchlist_file);
    info!(path = %storage.path().display(), "opening watchlist");
    let mut watchlist = Watchlist::open(storage, posters);

    match cli.command {
        Some(Command::List) => run_list(&watchlist),
        Some(Command::Show { row }) => run_show(&watchlist, row)?,
        Some(Command::Add(fields)) => run_add(&mut watchlist, fields)?,
        Some(Command::Edit { row, fields }) => run_edit(&mut watchlist, row, fields)?,
        Some(Command::Delete { row }) => run_delete(&mut watchlist, row)?,
        Some(Command::Poster { title, category }) => run_poster(&watchlist, &title, &category),
        Some(Command::Tui) | None => tui::run_tui(&mut watchlist, &http)?,
    }

    Ok(())
}

/// Rows are printed 1-based; row 0 never selects anything.
pub(crate) fn row_to_position(row: usize) -> Option<usize> {
    row.checked_sub(1)
}

fn run_list<S: Storage, P: PosterLookup>(watchlist: &Watchlist<S, P>) {
    if watchlist.is_empty() {
        println!("Watchlist is empty. Add something with `watchlist add`.");
        return;
    }

    println!("{}", list_header());
    for (position, entry) in watchlist.entries().iter().enumerate() {
        println!("{}", list_row(position + 1, entry));
    }
}

fn run_show<S: Storage, P: PosterLookup>(watchlist: &Watchlist<S, P>, row: usize) -> Result<()> {
    let position = row_to_position(row).ok_or(StoreError::NoSelection)?;
    let entry = watchlist.select(position)?;
    println!("{}", entry.title);
    println!("{}", entry_details(entry));
    if entry.image.is_empty() {
        println!("Poster: No image");
    } else {
        println!("Poster: {}", entry.image);
    }
    Ok(())
}

fn run_add<S: Storage, P: PosterLookup>(
    watchlist: &mut Watchlist<S, P>,
    fields: EntryArgs,
) -> Result<()> {
    let saved = watchlist.create(fields.apply_to(Entry::default()))?;
    let title = &watchlist.entries()[saved.position].title;
    println!("{}", saved_message(title, &saved.poster));
    Ok(())
}

fn run_edit<S: Storage, P: PosterLookup>(
    watchlist: &mut Watchlist<S, P>,
    row: usize,
    fields: EntryArgs,
) -> Result<()> {
    let position = row_to_position(row).ok_or(StoreError::NoSelection)?;
    let current = watchlist.select(position)?.clone();
    let saved = watchlist.update(Some(position), fields.apply_to(current))?;
    let title = &watchlist.entries()[saved.position].title;
    println!("{}", saved_message(title, &saved.poster));
    Ok(())
}

fn run_delete<S: Storage, P: PosterLookup>(
    watchlist: &mut Watchlist<S, P>,
    row: usize,
) -> Result<()> {
    let removed = watchlist.delete(row_to_position(row))?;
    println!("Item removed: {}", removed.title);
    Ok(())
}

fn run_poster<S: Storage, P: PosterLookup>(
    watchlist: &Watchlist<S, P>,
    title: &str,
    category: &str,
) {
    match watchlist.resolve_poster(title, category) {
        PosterOutcome::Found { url, source } => println!("{url} ({source})"),
        PosterOutcome::NotFound => println!("No poster found."),
        PosterOutcome::Failed { reasons } => {
            println!("Poster lookup failed:");
            for reason in reasons {
                println!("  {reason}");
            }
        }
    }
}
