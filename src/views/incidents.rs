use super::invoices::client_choices;
use super::{
    draw_form, header_and_body, panel, search_line, stat_line, DrawContext, ListCursor, View,
    ViewContext, ViewRequest,
};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::list::{aggregate, ListController};
use crate::model::{generate_id, ClientDirectory, Incident, IncidentStatus, Severity};
use crate::seed;
use chrono::{Datelike, NaiveDate, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub const SUBMITTED: &str = "Incident report submitted successfully!";
pub const HIGH_SEVERITY_WARNING: &str =
    "High severity incidents require immediate notification to NDIS Commission within 24 hours";

#[derive(Debug)]
pub struct IncidentsView {
    pub list: ListController<Incident>,
    cursor: ListCursor,
    modal: Modal,
}

/// Banner only; submission is never blocked on it.
pub fn shows_high_severity_warning(form: &Form) -> bool {
    form.choice_value("severity") == Severity::High.label()
}

fn incident_form(clients: &ClientDirectory) -> Form {
    let mut form = Form::new(
        "Report New Incident",
        vec![
            Field::choice("client", "Client", client_choices(clients)),
            Field::text("date", "Date (YYYY-MM-DD)"),
            Field::text("time", "Time (HH:MM)"),
            Field::choice(
                "severity",
                "Severity",
                Severity::ALL
                    .iter()
                    .map(|s| ChoiceOption::plain(s.label()))
                    .collect(),
            ),
            Field::text("description", "Description"),
            Field::text("actions", "Actions Taken"),
        ],
    );
    form.select("severity", 2);
    form
}

fn build_incident(
    form: &Form,
    clients: &ClientDirectory,
    incident_number: String,
    reporter: &str,
    today: NaiveDate,
) -> Result<Incident, FormError> {
    let client = clients.require(form.choice_value("client"))?;
    Ok(Incident {
        id: generate_id(),
        incident_number,
        client_id: client.id.clone(),
        description: form.text("description").to_string(),
        date: form.date("date", today)?,
        time: form.time("time", NaiveTime::MIN)?,
        severity: Severity::ALL
            .get(form.choice_index("severity"))
            .copied()
            .unwrap_or(Severity::Low),
        status: IncidentStatus::Pending,
        reporter: reporter.to_string(),
        actions_taken: form.text("actions").to_string(),
    })
}

fn severity_color(severity: Severity, ctx: &DrawContext<'_>) -> Color {
    match severity {
        Severity::High => ctx.palette.error,
        Severity::Moderate => ctx.palette.warning,
        Severity::Low => ctx.palette.info,
    }
}

impl IncidentsView {
    pub fn new() -> Self {
        IncidentsView {
            list: ListController::new(seed::incidents()),
            cursor: ListCursor::default(),
            modal: Modal::Closed,
        }
    }

    pub fn shows_high_severity_warning(&self) -> bool {
        self.modal.form().is_some_and(shows_high_severity_warning)
    }

    /// Counts over every incident, ignoring search and filter.
    pub fn counters(&self) -> (usize, usize, usize) {
        let items = self.list.items();
        let high: usize = aggregate(items, |i| i.severity == Severity::High, |_| 1);
        let moderate: usize = aggregate(items, |i| i.severity == Severity::Moderate, |_| 1);
        let pending: usize = aggregate(items, |i| i.status == IncidentStatus::Pending, |_| 1);
        (high, moderate, pending)
    }

    fn submit(&mut self, ctx: &mut ViewContext<'_>) {
        let today = ctx.today;
        let number = format!("INC-{}-{:03}", today.year(), self.list.len() + 1);
        let clients: &ClientDirectory = ctx.clients;
        let reporter = ctx.config.current_user.as_str();
        self.modal
            .submit(&mut self.list, ctx.notifier, ctx.now, SUBMITTED, |form: &Form| {
                build_incident(form, clients, number, reporter, today)
            });
    }
}

impl View for IncidentsView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if let Some(form) = self.modal.form_mut() {
            match form.handle_key(key) {
                FormInput::Submit => self.submit(ctx),
                FormInput::Cancel => self.modal.cancel(),
                FormInput::Editing => {}
            }
            return ViewRequest::None;
        }
        let len = self.list.filtered(ctx.clients).len();
        if self.cursor.handle(key, &mut self.list.query, len) {
            return ViewRequest::None;
        }
        if key.code == KeyCode::Char('n') {
            self.modal.open(incident_form(ctx.clients));
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open() || self.cursor.searching
    }

    fn help(&self) -> &'static str {
        "/ search • f severity filter • ↑↓ select • n report incident"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 6);
        let visible = self.list.filtered(ctx.clients);
        let (high, moderate, pending) = self.counters();

        let header_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(header);
        f.render_widget(
            Paragraph::new(vec![
                search_line(&self.list.query, &self.cursor, palette),
                Line::from(Span::styled(
                    format!("{} of {} incidents", visible.len(), self.list.len()),
                    palette.muted(),
                )),
            ])
            .block(panel("Incident Reports", palette)),
            header_cols[0],
        );
        f.render_widget(
            Paragraph::new(vec![
                stat_line("High Severity", high.to_string(), palette.error, palette),
                stat_line("Moderate", moderate.to_string(), palette.warning, palette),
                stat_line("Pending Review", pending.to_string(), palette.info, palette),
            ])
            .block(panel("Overview", palette)),
            header_cols[1],
        );

        let items: Vec<ListItem> = visible
            .iter()
            .map(|incident| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(incident.incident_number.clone(), palette.title()),
                        Span::raw("  "),
                        Span::raw(ctx.clients.name_of(&incident.client_id).to_string()),
                        Span::raw("  "),
                        Span::styled(
                            incident.severity.label(),
                            palette.accent(severity_color(incident.severity, ctx)),
                        ),
                        Span::raw("  "),
                        Span::styled(incident.status.label(), palette.muted()),
                    ]),
                    Line::from(Span::raw(format!("   {}", incident.description))),
                    Line::from(Span::styled(
                        format!(
                            "   {} {} • reported by {} • {}",
                            incident.date.format("%Y-%m-%d"),
                            incident.time.format("%H:%M"),
                            incident.reporter,
                            incident.actions_taken
                        ),
                        palette.muted(),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default().with_selected(self.cursor.clamped(items.len()));
        let list = List::new(items)
            .block(panel("Reports", palette))
            .highlight_style(palette.selected());
        f.render_stateful_widget(list, body, &mut state);

        if let Some(form) = self.modal.form() {
            let banner = self
                .shows_high_severity_warning()
                .then_some(HIGH_SEVERITY_WARNING);
            draw_form(f, form, palette, banner);
        }
    }
}
