use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::entry::{Entry, MAX_EPISODES, Status};

#[derive(Debug, Parser)]
#[command(
    name = "watchlist",
    version,
    about = "Track the movies, shows and anime you watch"
)]
pub struct Cli {
    /// Watchlist document to use instead of the default data file.
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every entry in watchlist order.
    List,
    /// Print one entry in full.
    Show { row: usize },
    /// Add an entry to the end of the watchlist.
    Add(EntryArgs),
    /// Replace an entry; omitted fields keep their current values.
    Edit {
        row: usize,
        #[command(flatten)]
        fields: EntryArgs,
    },
    /// Remove an entry.
    Delete { row: usize },
    /// Look up a poster URL without saving anything.
    Poster {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
    },
    /// Interactive form (default).
    Tui,
}

#[derive(Debug, Default, Args)]
pub struct EntryArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub rating: Option<u8>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_EPISODES)))]
    pub episodes: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl EntryArgs {
    /// Overlays the given fields on `base`, the way the form pre-fills from a selection.
    pub fn apply_to(self, mut base: Entry) -> Entry {
        if let Some(title) = self.title {
            base.title = title;
        }
        if let Some(category) = self.category {
            base.category = category;
        }
        if let Some(status) = self.status {
            base.status = status;
        }
        if let Some(rating) = self.rating {
            base.rating = rating;
        }
        if let Some(episodes) = self.episodes {
            base.episodes = Some(episodes);
        }
        if let Some(notes) = self.notes {
            base.notes = notes;
        }
        base
    }
}

fn parse_status(raw: &str) -> Result<Status, String> {
    raw.parse()
}
