use super::{panel, DrawContext, View, ViewContext, ViewRequest};
use crate::model::{Appointment, ClientDirectory};
use crate::router::Tab;
use crate::seed;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: usize,
}

/// Overview tiles and feeds. Staff, invoice, incident and appointment
/// figures come from the seed data; clients and tasks are live.
#[derive(Debug)]
pub struct DashboardView {
    staff: usize,
    invoices: usize,
    incidents: usize,
    upcoming: Vec<Appointment>,
    activity: Vec<(&'static str, &'static str)>,
}

impl DashboardView {
    pub fn new() -> Self {
        let mut upcoming = seed::appointments();
        upcoming.sort_by_key(|a| (a.date, a.time));
        DashboardView {
            staff: seed::staff().len(),
            invoices: seed::invoices().len(),
            incidents: seed::incidents().len(),
            upcoming,
            activity: seed::recent_activity(),
        }
    }

    pub fn stats(&self, clients: &ClientDirectory, pending_tasks: usize) -> [Stat; 5] {
        [
            Stat {
                label: "Clients",
                value: clients.len(),
            },
            Stat {
                label: "Staff",
                value: self.staff,
            },
            Stat {
                label: "Invoices",
                value: self.invoices,
            },
            Stat {
                label: "Incidents",
                value: self.incidents,
            },
            Stat {
                label: "Pending Tasks",
                value: pending_tasks,
            },
        ]
    }
}

impl View for DashboardView {
    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut ViewContext<'_>) -> ViewRequest {
        match key.code {
            KeyCode::Char('a') => ViewRequest::Navigate(Tab::Appointments),
            KeyCode::Char('t') => ViewRequest::Navigate(Tab::Tasks),
            _ => ViewRequest::None,
        }
    }

    fn help(&self) -> &'static str {
        "a appointments • t tasks"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(6)])
            .split(area);

        let stats = self.stats(ctx.clients, ctx.tasks.pending_count());
        let colors: [Color; 5] = [
            palette.primary,
            palette.success,
            palette.warning,
            palette.error,
            palette.info,
        ];
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 5])
            .split(rows[0]);
        for ((stat, color), area) in stats.iter().zip(colors).zip(tiles.iter()) {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    stat.value.to_string(),
                    palette.accent(color),
                )))
                .block(panel(stat.label, palette)),
                *area,
            );
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let upcoming: Vec<ListItem> = self
            .upcoming
            .iter()
            .map(|appt| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("{} {} ", appt.date.format("%d %b"), appt.time.format("%H:%M")),
                            palette.accent(palette.info),
                        ),
                        Span::styled(
                            ctx.clients.name_of(&appt.client_id).to_string(),
                            palette.title(),
                        ),
                    ]),
                    Line::from(Span::styled(format!("   {}", appt.service), palette.muted())),
                ])
            })
            .collect();
        f.render_widget(
            List::new(upcoming).block(panel("Upcoming Appointments", palette)),
            cols[0],
        );

        let activity: Vec<ListItem> = self
            .activity
            .iter()
            .map(|(text, when)| {
                ListItem::new(vec![
                    Line::from(Span::raw(*text)),
                    Line::from(Span::styled(format!("   {}", when), palette.muted())),
                ])
            })
            .collect();
        f.render_widget(
            List::new(activity).block(panel("Recent Activity", palette)),
            cols[1],
        );
    }
}
