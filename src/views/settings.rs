use super::{header_and_body, panel, DrawContext, View, ViewContext, ViewRequest};
use crate::router::Tab;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Theme,
    Link(Tab, &'static str),
}

pub const ROWS: &[SettingsRow] = &[
    SettingsRow::Theme,
    SettingsRow::Link(Tab::Invoices, "Billing and invoice history"),
    SettingsRow::Link(Tab::Appointments, "Appointment calendar"),
    SettingsRow::Link(Tab::Messages, "Secure client messaging"),
    SettingsRow::Link(Tab::Storage, "Documents and media"),
    SettingsRow::Link(Tab::Incidents, "Incident reporting"),
    SettingsRow::Link(Tab::Tasks, "Shift to-do list"),
    SettingsRow::Link(Tab::Chat, "Clinical assistant"),
    SettingsRow::Link(Tab::Sbar, "SBAR handover notes"),
];

#[derive(Debug, Default)]
pub struct SettingsView {
    selected: usize,
}

impl View for SettingsView {
    fn handle_key(&mut self, key: KeyEvent, _ctx: &mut ViewContext<'_>) -> ViewRequest {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(ROWS.len() - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return match ROWS.get(self.selected) {
                    Some(SettingsRow::Theme) => ViewRequest::ToggleTheme,
                    Some(SettingsRow::Link(tab, _)) => ViewRequest::Navigate(*tab),
                    None => ViewRequest::None,
                };
            }
            _ => {}
        }
        ViewRequest::None
    }

    fn help(&self) -> &'static str {
        "↑↓ select • Enter open / toggle"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 4);
        f.render_widget(
            Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("Signed in as ", palette.muted()),
                    Span::styled(ctx.config.current_user.clone(), palette.title()),
                ]),
                Line::from(Span::styled(
                    format!("Theme: {}", ctx.palette.name),
                    palette.muted(),
                )),
            ])
            .block(panel("Settings", palette)),
            header,
        );

        let items: Vec<ListItem> = ROWS
            .iter()
            .map(|row| match row {
                SettingsRow::Theme => ListItem::new(Line::from(vec![
                    Span::styled("Dark mode  ", palette.title()),
                    Span::styled(
                        if ctx.dark_mode { "[on]" } else { "[off]" },
                        palette.accent(palette.info),
                    ),
                ])),
                SettingsRow::Link(tab, description) => ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<14}", tab.label()), palette.title()),
                    Span::styled(*description, palette.muted()),
                    Span::styled("  ›", palette.muted()),
                ])),
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(self.selected));
        let list = List::new(items)
            .block(panel("Preferences & Features", palette))
            .highlight_style(palette.selected());
        f.render_stateful_widget(list, body, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    #[test]
    fn first_row_toggles_theme() {
        let mut h = Harness::new();
        let mut view = SettingsView::default();
        assert_eq!(h.press(&mut view, KeyCode::Enter), ViewRequest::ToggleTheme);
    }

    #[test]
    fn links_navigate() {
        let mut h = Harness::new();
        let mut view = SettingsView::default();
        h.press(&mut view, KeyCode::Down);
        assert_eq!(
            h.press(&mut view, KeyCode::Enter),
            ViewRequest::Navigate(Tab::Invoices)
        );
        for _ in 0..20 {
            h.press(&mut view, KeyCode::Down);
        }
        assert_eq!(
            h.press(&mut view, KeyCode::Enter),
            ViewRequest::Navigate(Tab::Sbar)
        );
        assert!(h.render(&view).contains("Dark mode"));
    }
}
