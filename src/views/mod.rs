//! One module per tab. Every view owns its list state and at most one
//! modal; shared collections are lent in through `ViewContext`.

pub mod appointments;
pub mod chat;
pub mod clients;
pub mod dashboard;
pub mod incidents;
pub mod invoices;
pub mod messages;
pub mod sbar;
pub mod settings;
pub mod staff;
pub mod storage;
pub mod tasks;

use crate::config::Config;
use crate::form::{Field, FieldKind, Form};
use crate::list::{Category, Query};
use crate::model::{ChatMessage, ClientDirectory, TaskList};
use crate::notify::NotificationChannel;
use crate::router::Tab;
use crate::theme::ThemePalette;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use std::time::Instant;

/// Mutable state a view may touch while handling input.
pub struct ViewContext<'a> {
    pub notifier: &'a mut NotificationChannel,
    pub clients: &'a mut ClientDirectory,
    pub tasks: &'a mut TaskList,
    pub chat: &'a mut Vec<ChatMessage>,
    pub config: &'a Config,
    pub now: Instant,
    pub today: NaiveDate,
}

/// Read-only state for drawing.
pub struct DrawContext<'a> {
    pub palette: &'static ThemePalette,
    pub dark_mode: bool,
    pub clients: &'a ClientDirectory,
    pub tasks: &'a TaskList,
    pub chat: &'a [ChatMessage],
    pub config: &'a Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    None,
    Navigate(Tab),
    ToggleTheme,
}

pub trait View {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest;

    /// Fires deferred work that has come due.
    fn tick(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// True while the view wants every key, e.g. a modal or a text box.
    fn captures_input(&self) -> bool {
        false
    }

    fn help(&self) -> &'static str;

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>);
}

#[derive(Debug)]
pub enum ActiveView {
    Dashboard(dashboard::DashboardView),
    Clients(clients::ClientsView),
    Staff(staff::StaffView),
    Invoices(invoices::InvoicesView),
    Incidents(incidents::IncidentsView),
    Appointments(appointments::AppointmentsView),
    Messages(messages::MessagesView),
    Storage(storage::StorageView),
    Tasks(tasks::TasksView),
    Chat(chat::ChatView),
    Sbar(sbar::SbarView),
    Settings(settings::SettingsView),
}

impl ActiveView {
    /// A fresh view with its seeded collection and empty query.
    pub fn mount(tab: Tab) -> Self {
        match tab {
            Tab::Dashboard => ActiveView::Dashboard(dashboard::DashboardView::new()),
            Tab::Clients => ActiveView::Clients(clients::ClientsView::default()),
            Tab::Staff => ActiveView::Staff(staff::StaffView::new()),
            Tab::Invoices => ActiveView::Invoices(invoices::InvoicesView::new()),
            Tab::Incidents => ActiveView::Incidents(incidents::IncidentsView::new()),
            Tab::Appointments => ActiveView::Appointments(appointments::AppointmentsView::new()),
            Tab::Messages => ActiveView::Messages(messages::MessagesView::new()),
            Tab::Storage => ActiveView::Storage(storage::StorageView::new()),
            Tab::Tasks => ActiveView::Tasks(tasks::TasksView::default()),
            Tab::Chat => ActiveView::Chat(chat::ChatView::default()),
            Tab::Sbar => ActiveView::Sbar(sbar::SbarView::new()),
            Tab::Settings => ActiveView::Settings(settings::SettingsView::default()),
        }
    }

    fn inner(&self) -> &dyn View {
        match self {
            ActiveView::Dashboard(v) => v,
            ActiveView::Clients(v) => v,
            ActiveView::Staff(v) => v,
            ActiveView::Invoices(v) => v,
            ActiveView::Incidents(v) => v,
            ActiveView::Appointments(v) => v,
            ActiveView::Messages(v) => v,
            ActiveView::Storage(v) => v,
            ActiveView::Tasks(v) => v,
            ActiveView::Chat(v) => v,
            ActiveView::Sbar(v) => v,
            ActiveView::Settings(v) => v,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn View {
        match self {
            ActiveView::Dashboard(v) => v,
            ActiveView::Clients(v) => v,
            ActiveView::Staff(v) => v,
            ActiveView::Invoices(v) => v,
            ActiveView::Incidents(v) => v,
            ActiveView::Appointments(v) => v,
            ActiveView::Messages(v) => v,
            ActiveView::Storage(v) => v,
            ActiveView::Tasks(v) => v,
            ActiveView::Chat(v) => v,
            ActiveView::Sbar(v) => v,
            ActiveView::Settings(v) => v,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        self.inner_mut().handle_key(key, ctx)
    }

    pub fn tick(&mut self, ctx: &mut ViewContext<'_>) {
        self.inner_mut().tick(ctx)
    }

    pub fn captures_input(&self) -> bool {
        self.inner().captures_input()
    }

    pub fn help(&self) -> &'static str {
        self.inner().help()
    }

    pub fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        self.inner().draw(f, area, ctx)
    }
}

/// Row selection plus the search box state for a filtered list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListCursor {
    pub selected: usize,
    pub searching: bool,
}

impl ListCursor {
    /// Handles `/` search editing, `f` filter cycling and row movement.
    /// Returns false for keys the caller should interpret.
    pub fn handle<C: Category>(&mut self, key: KeyEvent, query: &mut Query<C>, len: usize) -> bool {
        if self.searching {
            match key.code {
                KeyCode::Char(c) => query.term.push(c),
                KeyCode::Backspace => {
                    query.term.pop();
                }
                KeyCode::Enter => self.searching = false,
                KeyCode::Esc => {
                    query.term.clear();
                    self.searching = false;
                }
                _ => {}
            }
            self.selected = 0;
            return true;
        }
        match key.code {
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('f') if !C::ALL.is_empty() => {
                query.cycle_category();
                self.selected = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            _ => return false,
        }
        true
    }

    pub fn clamped(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.selected.min(len - 1))
    }
}

pub fn panel<'a>(title: impl Into<String>, palette: &ThemePalette) -> Block<'a> {
    Block::default()
        .title(Span::styled(title.into(), palette.title()))
        .borders(Borders::ALL)
        .border_style(palette.border())
        .style(palette.base())
}

pub fn search_line<C: Category>(
    query: &Query<C>,
    cursor: &ListCursor,
    palette: &ThemePalette,
) -> Line<'static> {
    let term = if cursor.searching {
        format!("{}▌", query.term)
    } else if query.term.is_empty() {
        "press / to search".to_string()
    } else {
        query.term.clone()
    };
    let mut spans = vec![
        Span::styled("Search: ", palette.muted()),
        Span::styled(term, Style::default().fg(palette.text)),
    ];
    if !C::ALL.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("Filter: ", palette.muted()));
        spans.push(Span::styled(query.category.label(), palette.accent(palette.info)));
    }
    Line::from(spans)
}

/// Splits a view into a header strip and the body below it.
pub fn header_and_body(area: Rect, header_height: u16) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(3)])
        .split(area);
    (rows[0], rows[1])
}

pub fn stat_line(
    label: &str,
    value: String,
    color: ratatui::style::Color,
    palette: &ThemePalette,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), palette.muted()),
        Span::styled(value, palette.accent(color)),
    ])
}

fn field_line(field: &Field, active: bool, palette: &ThemePalette) -> Line<'static> {
    let label_style = palette.muted();
    let value_style = if active {
        palette.accent(palette.info)
    } else {
        Style::default().fg(palette.text)
    };
    let marker = if active { "› " } else { "  " };
    let hint = match field.kind {
        FieldKind::Text(_) => "",
        FieldKind::Choice { .. } => "  ←→",
        FieldKind::Toggle(_) => "  space",
    };
    Line::from(vec![
        Span::styled(format!("{}{}: ", marker, field.label), label_style),
        Span::styled(field.display(active), value_style),
        Span::styled(hint, palette.muted()),
    ])
}

pub fn draw_form(f: &mut Frame<'_>, form: &Form, palette: &ThemePalette, banner: Option<&str>) {
    let area = centered_rect(70, 70, f.size());
    let mut lines = Vec::new();
    if let Some(text) = banner {
        lines.push(Line::from(Span::styled(
            text.to_string(),
            palette.accent(palette.error),
        )));
        lines.push(Line::from(""));
    }
    for (idx, field) in form.fields().iter().enumerate() {
        lines.push(field_line(field, idx == form.focus(), palette));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter save • Esc cancel • Tab/↑↓ move • ←→/Space change",
        palette.muted(),
    )));
    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(form.title, palette.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.primary))
                .style(palette.base()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

pub fn draw_confirm(f: &mut Frame<'_>, question: &str, palette: &ThemePalette) {
    let area = centered_rect(50, 30, f.size());
    let body = vec![
        Line::from(Span::styled(
            question.to_string(),
            palette.accent(palette.error),
        )),
        Line::from(""),
        Line::from("Press y to confirm, n or Esc to cancel"),
    ];
    let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
        Block::default()
            .title(Span::styled("Confirm Delete", palette.accent(palette.error)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.error))
            .style(palette.base()),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(&".".repeat(max - keep));
    out
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::model::ChatMessage;
    use crate::seed;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Shell-owned state for driving a single view in isolation.
    pub struct Harness {
        pub notifier: NotificationChannel,
        pub clients: ClientDirectory,
        pub tasks: TaskList,
        pub chat: Vec<ChatMessage>,
        pub config: Config,
        pub now: Instant,
        pub today: NaiveDate,
    }

    impl Harness {
        pub fn new() -> Self {
            Harness {
                notifier: NotificationChannel::default(),
                clients: ClientDirectory::new(seed::clients()),
                tasks: TaskList::new(seed::tasks()),
                chat: seed::chat_history(),
                config: Config::default(),
                now: Instant::now(),
                today: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            }
        }

        pub fn ctx(&mut self) -> ViewContext<'_> {
            ViewContext {
                notifier: &mut self.notifier,
                clients: &mut self.clients,
                tasks: &mut self.tasks,
                chat: &mut self.chat,
                config: &self.config,
                now: self.now,
                today: self.today,
            }
        }

        pub fn press(&mut self, view: &mut dyn View, code: KeyCode) -> ViewRequest {
            view.handle_key(key(code), &mut self.ctx())
        }

        pub fn type_text(&mut self, view: &mut dyn View, text: &str) {
            for c in text.chars() {
                self.press(view, KeyCode::Char(c));
            }
        }

        pub fn toast(&self) -> Option<&str> {
            self.notifier.current(self.now).map(|n| n.message.as_str())
        }

        /// Renders the view into an off-screen buffer.
        pub fn render(&self, view: &dyn View) -> String {
            use ratatui::backend::TestBackend;
            use ratatui::Terminal;

            let ctx = DrawContext {
                palette: crate::theme::resolve_theme(false),
                dark_mode: false,
                clients: &self.clients,
                tasks: &self.tasks,
                chat: &self.chat,
                config: &self.config,
            };
            let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
            terminal
                .draw(|f| view.draw(f, f.size(), &ctx))
                .unwrap();
            let buffer = terminal.backend().buffer().clone();
            let mut text = String::new();
            for y in 0..buffer.area.height {
                for x in 0..buffer.area.width {
                    text.push_str(buffer.get(x, y).symbol());
                }
                text.push('\n');
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::key;
    use super::*;
    use crate::list::NoCategory;
    use crate::model::Severity;

    #[test]
    fn search_box_edits_and_clears_the_term() {
        let mut cursor = ListCursor::default();
        let mut query: Query<NoCategory> = Query::default();
        assert!(cursor.handle(key(KeyCode::Char('/')), &mut query, 3));
        assert!(cursor.searching);
        for c in "jo".chars() {
            cursor.handle(key(KeyCode::Char(c)), &mut query, 3);
        }
        assert_eq!(query.term, "jo");
        cursor.handle(key(KeyCode::Enter), &mut query, 3);
        assert!(!cursor.searching);
        assert_eq!(query.term, "jo");

        cursor.handle(key(KeyCode::Char('/')), &mut query, 3);
        cursor.handle(key(KeyCode::Esc), &mut query, 3);
        assert!(query.term.is_empty());
    }

    #[test]
    fn filter_key_only_applies_to_categorised_lists() {
        let mut cursor = ListCursor::default();
        let mut plain: Query<NoCategory> = Query::default();
        assert!(!cursor.handle(key(KeyCode::Char('f')), &mut plain, 3));

        let mut by_severity: Query<Severity> = Query::default();
        assert!(cursor.handle(key(KeyCode::Char('f')), &mut by_severity, 3));
        assert_eq!(by_severity.category.label(), "high");
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut cursor = ListCursor::default();
        let mut query: Query<NoCategory> = Query::default();
        for _ in 0..5 {
            cursor.handle(key(KeyCode::Down), &mut query, 2);
        }
        assert_eq!(cursor.selected, 1);
        assert_eq!(cursor.clamped(0), None);
        assert_eq!(cursor.clamped(1), Some(0));
    }

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer sentence", 8), "a lon...");
        assert_eq!(truncate_text("abc", 0), "");
    }

    #[test]
    fn every_tab_mounts_its_own_view() {
        for tab in Tab::ALL {
            let view = ActiveView::mount(*tab);
            assert!(!view.help().is_empty(), "{:?}", tab);
        }
    }
}
