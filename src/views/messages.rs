use super::{
    header_and_body, panel, search_line, truncate_text, DrawContext, ListCursor, View, ViewContext,
    ViewRequest,
};
use crate::form::FieldValue;
use crate::list::ListController;
use crate::model::{generate_id, Conversation, Message, Sender};
use crate::seed;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use std::collections::HashMap;
use tracing::debug;

pub const SENT: &str = "Message sent securely!";

#[derive(Debug)]
pub struct MessagesView {
    pub list: ListController<Conversation>,
    threads: HashMap<String, Vec<Message>>,
    cursor: ListCursor,
    open: Option<String>,
    compose: FieldValue,
}

impl MessagesView {
    pub fn new() -> Self {
        MessagesView {
            list: ListController::new(seed::conversations()),
            threads: seed::messages(),
            cursor: ListCursor::default(),
            open: None,
            compose: FieldValue::default(),
        }
    }

    pub fn thread(&self, conversation_id: &str) -> &[Message] {
        self.threads
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn open_conversation(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Opening a thread marks it read.
    fn open_selected(&mut self, ctx: &ViewContext<'_>) {
        let visible = self.list.filtered(ctx.clients);
        let Some(id) = self
            .cursor
            .clamped(visible.len())
            .map(|idx| visible[idx].id.clone())
        else {
            return;
        };
        if let Some(conv) = self.list.items_mut().iter_mut().find(|c| c.id == id) {
            conv.unread = 0;
        }
        debug!(conversation = %id, "Opened conversation");
        self.open = Some(id);
        self.compose.clear();
    }

    fn send(&mut self, ctx: &mut ViewContext<'_>) {
        let Some(id) = self.open.clone() else {
            return;
        };
        if self.compose.is_blank() {
            return;
        }
        let text = self.compose.take().trim().to_string();
        let timestamp = Local::now().naive_local();
        self.threads.entry(id.clone()).or_default().push(Message {
            id: generate_id(),
            sender: Sender::Staff,
            text: text.clone(),
            timestamp,
        });
        if let Some(conv) = self.list.items_mut().iter_mut().find(|c| c.id == id) {
            conv.last_message = text;
            conv.timestamp = timestamp;
        }
        ctx.notifier.success(SENT, ctx.now);
    }
}

impl View for MessagesView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if self.open.is_some() {
            match key.code {
                KeyCode::Esc => self.open = None,
                KeyCode::Enter => self.send(ctx),
                _ => {
                    self.compose.handle_key(key);
                }
            }
            return ViewRequest::None;
        }
        let len = self.list.filtered(ctx.clients).len();
        if self.cursor.handle(key, &mut self.list.query, len) {
            return ViewRequest::None;
        }
        if key.code == KeyCode::Enter {
            self.open_selected(ctx);
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.open.is_some() || self.cursor.searching
    }

    fn help(&self) -> &'static str {
        if self.open.is_some() {
            "type a message • Enter send • Esc back to conversations"
        } else {
            "/ search • ↑↓ select • Enter open conversation"
        }
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let (header, body) = header_and_body(cols[0], 3);
        f.render_widget(
            Paragraph::new(search_line(&self.list.query, &self.cursor, palette))
                .block(panel("Secure Messages", palette)),
            header,
        );
        let visible = self.list.filtered(ctx.clients);
        let width = body.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = visible
            .iter()
            .map(|conv| {
                let mut title = vec![Span::styled(
                    ctx.clients.name_of(&conv.client_id).to_string(),
                    palette.title(),
                )];
                if conv.encrypted {
                    title.push(Span::styled("  🔒", palette.muted()));
                }
                if conv.unread > 0 {
                    title.push(Span::styled(
                        format!("  ({} new)", conv.unread),
                        palette.accent(palette.info),
                    ));
                }
                ListItem::new(vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        truncate_text(&conv.last_message, width),
                        palette.muted(),
                    )),
                    Line::from(Span::styled(
                        conv.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                        palette.muted(),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default().with_selected(self.cursor.clamped(items.len()));
        let list = List::new(items)
            .block(panel("Conversations", palette))
            .highlight_style(palette.selected());
        f.render_stateful_widget(list, body, &mut state);

        let Some(open) = self.open_conversation() else {
            f.render_widget(
                Paragraph::new("Select a conversation and press Enter")
                    .style(palette.muted())
                    .block(panel("Thread", palette)),
                cols[1],
            );
            return;
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(cols[1]);
        let client_name = self
            .list
            .items()
            .iter()
            .find(|c| c.id == open)
            .map(|c| ctx.clients.name_of(&c.client_id))
            .unwrap_or_default();
        let lines: Vec<Line> = self
            .thread(open)
            .iter()
            .map(|msg| {
                let (who, style) = match msg.sender {
                    Sender::Client => (client_name, palette.accent(palette.secondary)),
                    Sender::Staff => ("You", palette.accent(palette.primary)),
                };
                Line::from(vec![
                    Span::styled(format!("{} ", msg.timestamp.format("%H:%M")), palette.muted()),
                    Span::styled(format!("{}: ", who), style),
                    Span::raw(msg.text.clone()),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(panel(format!("{} • end-to-end encrypted", client_name), palette)),
            rows[0],
        );
        f.render_widget(
            Paragraph::new(self.compose.with_caret()).block(panel("Message", palette)),
            rows[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    #[test]
    fn opening_a_thread_zeroes_unread() {
        let mut h = Harness::new();
        let mut view = MessagesView::new();
        assert_eq!(view.list.items()[0].unread, 2);
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(view.open_conversation(), Some("v1"));
        assert_eq!(view.list.items()[0].unread, 0);
        assert!(view.captures_input());
        assert!(h.render(&view).contains("Will do! See you next week."));
    }

    #[test]
    fn sending_appends_and_updates_preview() {
        let mut h = Harness::new();
        let mut view = MessagesView::new();
        h.press(&mut view, KeyCode::Down);
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(view.open_conversation(), Some("v2"));
        h.type_text(&mut view, "How about Friday?");
        h.press(&mut view, KeyCode::Enter);

        let thread = view.thread("v2");
        assert_eq!(thread.len(), 3);
        assert_eq!(thread[2].sender, Sender::Staff);
        assert_eq!(view.list.items()[1].last_message, "How about Friday?");
        assert_eq!(h.toast(), Some(SENT));
    }

    #[test]
    fn blank_message_is_ignored() {
        let mut h = Harness::new();
        let mut view = MessagesView::new();
        h.press(&mut view, KeyCode::Enter);
        h.type_text(&mut view, "   ");
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(view.thread("v1").len(), 3);
        assert!(h.toast().is_none());
        h.press(&mut view, KeyCode::Esc);
        assert!(!view.captures_input());
    }

    #[test]
    fn search_by_client_name() {
        let mut h = Harness::new();
        let mut view = MessagesView::new();
        h.press(&mut view, KeyCode::Char('/'));
        h.type_text(&mut view, "robert");
        h.press(&mut view, KeyCode::Enter);
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(view.open_conversation(), Some("v3"));
    }
}
