use std::path::PathBuf;

use anyhow::{Context, Result};

fn app_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join("watchlist"))
}

pub fn default_watchlist_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("watchlist.json"))
}

pub fn log_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("watchlist.log"))
}
