use super::{panel, DrawContext, View, ViewContext, ViewRequest};
use crate::form::FieldValue;
use crate::model::{generate_id, ChatMessage, ChatSender};
use crate::schedule::{drain_due, Deferred};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

const DOSAGE_REPLY: &str = "⚠️ Standard adult dosage for Ibuprofen is 200-400mg every 4-6 hours. Max 3200mg/day. Please verify patient renal function.";
const IV_REPLY: &str = "For standard saline IV, typical maintenance rates are 75-125 mL/hr depending on weight. Check orders for specific additives.";
const THANKS_REPLY: &str = "You're welcome! Keep up the great work.";
const CLARIFY_REPLY: &str = "I can help you look that up. Could you clarify the patient's age?";

/// Scripted answer chosen by keyword, checked in order.
pub fn reply_for(question: &str) -> &'static str {
    let lower = question.to_lowercase();
    if lower.contains("dose") || lower.contains("mg") {
        DOSAGE_REPLY
    } else if lower.contains("iv") || lower.contains("rate") {
        IV_REPLY
    } else if lower.contains("thank") {
        THANKS_REPLY
    } else {
        CLARIFY_REPLY
    }
}

/// History lives in the shell; replies still waiting are owned here and
/// vanish with the view.
#[derive(Debug, Default)]
pub struct ChatView {
    input: FieldValue,
    composing: bool,
    pending: Vec<Deferred<String>>,
}

impl ChatView {
    pub fn is_waiting(&self) -> bool {
        !self.pending.is_empty()
    }

    fn send(&mut self, ctx: &mut ViewContext<'_>) {
        if self.input.is_blank() {
            return;
        }
        let text = self.input.take().trim().to_string();
        let reply = reply_for(&text);
        ctx.chat.push(ChatMessage {
            id: generate_id(),
            sender: ChatSender::User,
            text,
        });
        self.pending
            .push(Deferred::after(ctx.config.chat_reply_delay(), ctx.now, reply.to_string()));
    }
}

impl View for ChatView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if !self.composing {
            if matches!(key.code, KeyCode::Char('i') | KeyCode::Enter) {
                self.composing = true;
            }
            return ViewRequest::None;
        }
        match key.code {
            KeyCode::Esc => self.composing = false,
            KeyCode::Enter => self.send(ctx),
            _ => {
                self.input.handle_key(key);
            }
        }
        ViewRequest::None
    }

    fn tick(&mut self, ctx: &mut ViewContext<'_>) {
        for text in drain_due(&mut self.pending, ctx.now) {
            debug!("Assistant replied");
            ctx.chat.push(ChatMessage {
                id: generate_id(),
                sender: ChatSender::Assistant,
                text,
            });
        }
    }

    fn captures_input(&self) -> bool {
        self.composing
    }

    fn help(&self) -> &'static str {
        if self.composing {
            "type a question • Enter send • Esc stop typing"
        } else {
            "i / Enter start typing"
        }
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let mut lines: Vec<Line> = Vec::new();
        for msg in ctx.chat {
            let (who, style) = match msg.sender {
                ChatSender::User => ("You", palette.accent(palette.primary)),
                ChatSender::Assistant => ("AI", palette.accent(palette.info)),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", who), style),
                Span::raw(msg.text.clone()),
            ]));
            lines.push(Line::from(""));
        }
        if self.is_waiting() {
            lines.push(Line::from(Span::styled("AI is typing...", palette.muted())));
        }
        let height = rows[0].height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(height) as u16;
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .scroll((scroll, 0))
                .block(panel("Ask AI • Clinical Assistant", palette)),
            rows[0],
        );

        let input = if self.composing {
            self.input.with_caret()
        } else if self.input.is_blank() {
            "Ask about protocols, dosages, or IV rates...".to_string()
        } else {
            self.input.as_str().to_string()
        };
        f.render_widget(Paragraph::new(input).block(panel("Question", palette)), rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;
    use std::time::Duration;

    #[test]
    fn keyword_replies() {
        assert_eq!(reply_for("What DOSE of ibuprofen?"), DOSAGE_REPLY);
        assert_eq!(reply_for("400mg ok?"), DOSAGE_REPLY);
        assert_eq!(reply_for("IV drip"), IV_REPLY);
        assert_eq!(reply_for("thanks!"), THANKS_REPLY);
        assert_eq!(reply_for("hello"), CLARIFY_REPLY);
    }

    #[test]
    fn reply_arrives_after_the_delay() {
        let mut h = Harness::new();
        let mut view = ChatView::default();
        let start = h.chat.len();
        h.press(&mut view, KeyCode::Enter);
        h.type_text(&mut view, "iv rate for saline?");
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(h.chat.len(), start + 1);
        assert!(view.is_waiting());

        h.now += Duration::from_millis(999);
        view.tick(&mut h.ctx());
        assert_eq!(h.chat.len(), start + 1);

        h.now += Duration::from_millis(1);
        view.tick(&mut h.ctx());
        assert_eq!(h.chat.len(), start + 2);
        assert_eq!(h.chat.last().unwrap().text, IV_REPLY);
        assert_eq!(h.chat.last().unwrap().sender, ChatSender::Assistant);
    }

    #[test]
    fn dropping_the_view_cancels_the_reply() {
        let mut h = Harness::new();
        let mut view = ChatView::default();
        let start = h.chat.len();
        h.press(&mut view, KeyCode::Char('i'));
        h.type_text(&mut view, "thank you");
        h.press(&mut view, KeyCode::Enter);
        drop(view);

        let mut fresh = ChatView::default();
        h.now += Duration::from_secs(5);
        fresh.tick(&mut h.ctx());
        assert_eq!(h.chat.len(), start + 1);
    }

    #[test]
    fn blank_question_is_ignored() {
        let mut h = Harness::new();
        let mut view = ChatView::default();
        let start = h.chat.len();
        h.press(&mut view, KeyCode::Enter);
        h.type_text(&mut view, "  ");
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(h.chat.len(), start);
        assert!(!view.is_waiting());
        h.press(&mut view, KeyCode::Esc);
        assert!(!view.captures_input());
    }
}
