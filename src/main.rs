mod app;
mod cli;
mod config;
mod entry;
mod error;
mod http;
mod logging;
mod paths;
mod poster;
mod storage;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    if let Err(err) = logging::init() {
        eprintln!("warning: logging disabled: {err:#}");
    }
    app::run(cli)
}
