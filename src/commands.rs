use crate::app::ShellBuilder;
use crate::cli::ListTarget;
use crate::config::{Config, CONFIG_FILE};
use crate::list::{aggregate, filter_records, format_megabytes, parse_size_label, Listable, Query};
use crate::model::{format_money, ClientDirectory};
use crate::seed;
use crate::storage::{
    config_dir, preferences_path, FileBackend, MemoryBackend, PreferenceBackend, PreferenceStore,
};
use crate::theme::ThemeContext;
use crate::ui;
use crate::views::invoices::totals;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

pub fn tui(config: Option<PathBuf>, tab: String, no_persist: bool) -> Result<()> {
    let config = load_config(config)?;
    let backend: Box<dyn PreferenceBackend> = if no_persist {
        Box::new(MemoryBackend::default())
    } else {
        Box::new(FileBackend::new(preferences_path()?))
    };
    let theme = ThemeContext::new(PreferenceStore::load(backend));
    let shell = ShellBuilder::new()
        .theme(theme)
        .config(config)
        .initial_tab(tab)
        .build()
        .context("building dashboard")?;
    ui::run(shell)
}

pub fn list(config: Option<PathBuf>, target: ListTarget, search: Option<String>) -> Result<()> {
    let config = load_config(config)?;
    let clients = ClientDirectory::new(seed::clients());
    for line in listing(target, search.as_deref().unwrap_or(""), &clients, &config) {
        println!("{}", line);
    }
    Ok(())
}

pub fn theme(toggle: bool) -> Result<()> {
    let path = preferences_path()?;
    let mut theme = ThemeContext::new(PreferenceStore::load(Box::new(FileBackend::new(&path))));
    if toggle {
        theme
            .toggle()
            .with_context(|| format!("saving theme preference to {}", path.display()))?;
        info!(dark_mode = theme.dark_mode(), "Theme toggled from the command line");
    }
    println!("Theme: {} ({})", theme.palette().name, theme.location());
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None => config_dir()?.join(CONFIG_FILE),
    };
    let config = Config::load(&path).with_context(|| format!("loading {}", path.display()))?;
    Ok(config)
}

/// Rows matching `search` plus a trailing summary line.
fn listing(
    target: ListTarget,
    search: &str,
    clients: &ClientDirectory,
    config: &Config,
) -> Vec<String> {
    match target {
        ListTarget::Clients => rows(clients.all(), search, clients, "clients", |c| {
            format!(
                "{}  {}  NDIS {}  {}  {}",
                c.id,
                c.name,
                c.ndis_number,
                c.funding_type.label(),
                c.assigned_professional
            )
        }),
        ListTarget::Staff => rows(&seed::staff(), search, clients, "staff", |s| {
            format!(
                "{}  {}  {}  {}  since {}",
                s.id,
                s.name,
                s.role.label(),
                s.employment_type.label(),
                s.start_date
            )
        }),
        ListTarget::Invoices => {
            let invoices = seed::invoices();
            let mut lines = rows(&invoices, search, clients, "invoices", |i| {
                format!(
                    "{}  {}  {}  {}  {}",
                    i.invoice_number,
                    clients.name_of(&i.client_id),
                    i.date,
                    format_money(i.amount),
                    i.status.label()
                )
            });
            let shown = filter_records(&invoices, &Query::search(search), clients);
            let sums = totals(shown.iter().copied());
            lines.push(format!(
                "paid {} • pending {} • overdue {} • total {}",
                format_money(sums.paid),
                format_money(sums.pending),
                format_money(sums.overdue),
                format_money(sums.total)
            ));
            lines
        }
        ListTarget::Incidents => rows(&seed::incidents(), search, clients, "incidents", |i| {
            format!(
                "{}  {}  {} {}  {}  {}",
                i.incident_number,
                clients.name_of(&i.client_id),
                i.date,
                i.time.format("%H:%M"),
                i.severity.label(),
                i.status.label()
            )
        }),
        ListTarget::Appointments => {
            let appointments = seed::appointments();
            rows(&appointments, search, clients, "appointments", |a| {
                format!(
                    "{} {}  {}  {}  {}  {} min",
                    a.date,
                    a.time.format("%H:%M"),
                    clients.name_of(&a.client_id),
                    a.service,
                    a.staff_name,
                    a.duration_minutes
                )
            })
        }
        ListTarget::Messages => rows(&seed::conversations(), search, clients, "conversations", |c| {
            format!(
                "{}  {}  ({} unread)  {}",
                clients.name_of(&c.client_id),
                c.timestamp.format("%Y-%m-%d %H:%M"),
                c.unread,
                c.last_message
            )
        }),
        ListTarget::Storage => {
            let files = seed::files();
            let mut lines = rows(&files, search, clients, "files", |f| {
                format!(
                    "{}  {}  {}  {}  {}",
                    f.name,
                    clients.name_of(&f.client_id),
                    f.size_label,
                    f.category.label(),
                    f.upload_date
                )
            });
            let used: f64 = aggregate(&files, |_| true, |f| parse_size_label(&f.size_label));
            lines.push(format!("{} used of {}", format_megabytes(used), config.storage_limit));
            lines
        }
        ListTarget::Tasks => {
            let tasks = seed::tasks();
            let needle = search.to_lowercase();
            let shown: Vec<_> = tasks
                .iter()
                .filter(|t| {
                    t.patient_room.to_lowercase().contains(&needle)
                        || t.description.to_lowercase().contains(&needle)
                })
                .collect();
            let mut lines: Vec<String> = shown
                .iter()
                .map(|t| {
                    format!(
                        "[{}] {}  room {}  {}  {}",
                        if t.completed { "x" } else { " " },
                        t.due_time.format("%H:%M"),
                        t.patient_room,
                        t.priority.label(),
                        t.description
                    )
                })
                .collect();
            lines.push(format!("{} of {} tasks", shown.len(), tasks.len()));
            lines
        }
    }
}

fn rows<E: Listable>(
    items: &[E],
    search: &str,
    clients: &ClientDirectory,
    noun: &str,
    line: impl Fn(&E) -> String,
) -> Vec<String> {
    let shown = filter_records(items, &Query::search(search), clients);
    let mut lines: Vec<String> = shown.iter().map(|item| line(item)).collect();
    lines.push(format!("{} of {} {}", shown.len(), items.len(), noun));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(target: ListTarget, search: &str) -> Vec<String> {
        let clients = ClientDirectory::new(seed::clients());
        listing(target, search, &clients, &Config::default())
    }

    #[test]
    fn invoice_listing_joins_client_names_and_totals_matches() {
        let out = lines(ListTarget::Invoices, "john");
        assert_eq!(out.len(), 4);
        assert!(out[0].starts_with("INV-2024-001  John Doe"));
        assert_eq!(out[2], "2 of 3 invoices");
        assert_eq!(
            out[3],
            "paid $150.00 • pending $0.00 • overdue $300.00 • total $450.00"
        );
    }

    #[test]
    fn storage_listing_reports_usage() {
        let out = lines(ListTarget::Storage, "");
        assert_eq!(out.last().map(String::as_str), Some("17.3 MB used of 10 GB"));
        assert!(out.contains(&"4 of 4 files".to_string()));
    }

    #[test]
    fn task_listing_filters_by_room() {
        let out = lines(ListTarget::Tasks, "204");
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("[x] 12:00  room 204"));
        assert_eq!(out[1], "1 of 3 tasks");
    }

    #[test]
    fn unmatched_search_still_summarises() {
        let out = lines(ListTarget::Clients, "nobody");
        assert_eq!(out, vec!["0 of 3 clients".to_string()]);
    }
}
