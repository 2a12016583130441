use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "carepanel",
    version,
    about = "Terminal admin dashboard for NDIS and allied-health practices"
)]
pub struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive dashboard
    Tui {
        /// Tab id to open first (dashboard, clients, invoices, ...)
        #[arg(long, default_value = "dashboard")]
        tab: String,
        /// Keep the theme preference in memory only
        #[arg(long)]
        no_persist: bool,
    },
    /// Print a seeded collection
    List {
        /// Which collection to print
        #[arg(value_enum)]
        view: ListTarget,
        /// Only show records matching this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the saved theme preference
    Theme {
        /// Flip between light and dark and save
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListTarget {
    Clients,
    Staff,
    Invoices,
    Incidents,
    Appointments,
    Messages,
    Storage,
    Tasks,
}
