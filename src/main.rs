mod app;
mod cli;
mod commands;
mod config;
mod form;
mod list;
mod model;
mod notify;
mod router;
mod schedule;
mod seed;
mod sink;
mod storage;
mod theme;
mod ui;
mod views;

use anyhow::Result;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "carepanel.log";

fn main() -> Result<()> {
    init_tracing();
    let args = cli::Cli::parse();
    let command = args.command.unwrap_or(cli::Command::Tui {
        tab: "dashboard".into(),
        no_persist: false,
    });
    match command {
        cli::Command::Tui { tab, no_persist } => commands::tui(args.config, tab, no_persist),
        cli::Command::List { view, search } => commands::list(args.config, view, search),
        cli::Command::Theme { toggle } => commands::theme(toggle),
    }
}

/// The terminal belongs to the dashboard, so logs go to a file under the
/// data directory. Without one, logging stays off.
fn init_tracing() {
    let Ok(dir) = storage::data_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env("CAREPANEL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("carepanel=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
