use super::{panel, DrawContext, View, ViewContext, ViewRequest};
use crate::form::{Field, Form, FormInput};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

pub const GENERATED: &str = "SBAR generated";
pub const INCOMPLETE: &str = "Please fill in all fields";

const SECTIONS: [(&str, &str); 4] = [
    ("situation", "Situation"),
    ("background", "Background"),
    ("assessment", "Assessment"),
    ("recommendation", "Recommendation"),
];

fn sbar_form() -> Form {
    Form::new(
        "Smart SBAR",
        SECTIONS
            .iter()
            .map(|&(key, label)| Field::text(key, label))
            .collect(),
    )
}

/// Handover note. Generating freezes the four sections into a report until
/// cleared.
#[derive(Debug)]
pub struct SbarView {
    form: Form,
    editing: bool,
    report: Option<Vec<(&'static str, String)>>,
}

impl SbarView {
    pub fn new() -> Self {
        SbarView {
            form: sbar_form(),
            editing: false,
            report: None,
        }
    }

    #[cfg(test)]
    pub fn report(&self) -> Option<&[(&'static str, String)]> {
        self.report.as_deref()
    }

    fn generate(&mut self, ctx: &mut ViewContext<'_>) {
        let complete = SECTIONS.iter().all(|(key, _)| !self.form.text(key).is_empty());
        if !complete {
            ctx.notifier.failure(INCOMPLETE, ctx.now);
            return;
        }
        self.report = Some(
            SECTIONS
                .iter()
                .map(|&(key, label)| (label, self.form.text(key).to_string()))
                .collect(),
        );
        self.editing = false;
        ctx.notifier.success(GENERATED, ctx.now);
    }

    fn clear(&mut self) {
        self.form = sbar_form();
        self.report = None;
        self.editing = false;
    }
}

impl View for SbarView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if self.editing {
            match self.form.handle_key(key) {
                FormInput::Submit => self.generate(ctx),
                FormInput::Cancel => self.editing = false,
                FormInput::Editing => {}
            }
            return ViewRequest::None;
        }
        match key.code {
            KeyCode::Char('i') | KeyCode::Enter if self.report.is_none() => self.editing = true,
            KeyCode::Char('g') if self.report.is_none() => self.generate(ctx),
            KeyCode::Char('c') => self.clear(),
            _ => {}
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn help(&self) -> &'static str {
        if self.editing {
            "type • Tab next section • Enter generate • Esc stop editing"
        } else {
            "i / Enter edit • g generate • c clear"
        }
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let mut lines = Vec::new();
        match &self.report {
            Some(sections) => {
                lines.push(Line::from(Span::styled(
                    "SBAR Report",
                    palette.accent(palette.success),
                )));
                lines.push(Line::from(""));
                for (label, text) in sections {
                    lines.push(Line::from(Span::styled(label.to_uppercase(), palette.title())));
                    lines.push(Line::from(text.clone()));
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled("c to clear", palette.muted())));
            }
            None => {
                for (idx, field) in self.form.fields().iter().enumerate() {
                    let active = self.editing && idx == self.form.focus();
                    let style = if active {
                        palette.accent(palette.info)
                    } else {
                        palette.title()
                    };
                    lines.push(Line::from(Span::styled(field.label.to_uppercase(), style)));
                    lines.push(Line::from(field.display(active)));
                    lines.push(Line::from(""));
                }
            }
        }
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(panel("Smart SBAR", palette)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    fn fill(h: &mut Harness, view: &mut SbarView, sections: &[&str]) {
        h.press(view, KeyCode::Char('i'));
        for (idx, text) in sections.iter().enumerate() {
            if idx > 0 {
                h.press(view, KeyCode::Tab);
            }
            h.type_text(view, text);
        }
    }

    #[test]
    fn incomplete_form_is_rejected() {
        let mut h = Harness::new();
        let mut view = SbarView::new();
        fill(&mut h, &mut view, &["Bed 4 chest pain", "Post-op day 2", ""]);
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(h.toast(), Some(INCOMPLETE));
        assert!(view.report().is_none());
        assert!(view.captures_input());
    }

    #[test]
    fn complete_form_generates_then_clears() {
        let mut h = Harness::new();
        let mut view = SbarView::new();
        fill(&mut h, &mut view, &["Bed 4 chest pain", "Post-op day 2", "BP 90/60", "Review now"]);
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(h.toast(), Some(GENERATED));
        let report = view.report().unwrap();
        assert_eq!(report[0], ("Situation", "Bed 4 chest pain".to_string()));
        assert_eq!(report[3].1, "Review now");
        assert!(h.render(&view).contains("SBAR Report"));

        h.press(&mut view, KeyCode::Char('c'));
        assert!(view.report().is_none());
        assert!(!h.render(&view).contains("Bed 4"));
    }
}
