use super::{
    draw_form, header_and_body, panel, search_line, DrawContext, ListCursor, View, ViewContext,
    ViewRequest,
};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::list::ListController;
use crate::model::{generate_id, EmploymentType, StaffMember, StaffRole};
use crate::seed;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use tracing::debug;

pub const ADDED: &str = "Staff member added successfully!";

#[derive(Debug)]
pub struct StaffView {
    pub list: ListController<StaffMember>,
    cursor: ListCursor,
    modal: Modal,
}

impl StaffView {
    pub fn new() -> Self {
        StaffView {
            list: ListController::new(seed::staff()),
            cursor: ListCursor::default(),
            modal: Modal::Closed,
        }
    }
}

fn staff_form() -> Form {
    Form::new(
        "Add New Staff Member",
        vec![
            Field::text("name", "Full Name"),
            Field::choice(
                "role",
                "Role",
                StaffRole::ALL
                    .iter()
                    .map(|r| ChoiceOption::plain(r.label()))
                    .collect(),
            ),
            Field::text("email", "Email"),
            Field::text("phone", "Phone"),
            Field::choice(
                "employment",
                "Employment Type",
                EmploymentType::ALL
                    .iter()
                    .map(|e| ChoiceOption::plain(e.label()))
                    .collect(),
            ),
            Field::text("start", "Start Date (YYYY-MM-DD)"),
        ],
    )
}

fn build_staff(form: &Form, today: NaiveDate) -> Result<StaffMember, FormError> {
    Ok(StaffMember {
        id: generate_id(),
        name: form.text("name").to_string(),
        role: StaffRole::ALL
            .get(form.choice_index("role"))
            .copied()
            .unwrap_or(StaffRole::Therapist),
        email: form.text("email").to_string(),
        phone: form.text("phone").to_string(),
        employment_type: EmploymentType::ALL
            .get(form.choice_index("employment"))
            .copied()
            .unwrap_or(EmploymentType::FullTime),
        start_date: form.date("start", today)?,
        is_active: true,
    })
}

impl View for StaffView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if let Some(form) = self.modal.form_mut() {
            match form.handle_key(key) {
                FormInput::Submit => {
                    let today = ctx.today;
                    self.modal
                        .submit(&mut self.list, ctx.notifier, ctx.now, ADDED, |form: &Form| {
                            build_staff(form, today)
                        });
                }
                FormInput::Cancel => self.modal.cancel(),
                FormInput::Editing => {}
            }
            return ViewRequest::None;
        }
        let len = self.list.filtered(ctx.clients).len();
        if self.cursor.handle(key, &mut self.list.query, len) {
            return ViewRequest::None;
        }
        match key.code {
            KeyCode::Char('n') => self.modal.open(staff_form()),
            KeyCode::Char('e') | KeyCode::Char('d') => debug!("Staff edit/delete is disabled"),
            _ => {}
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open() || self.cursor.searching
    }

    fn help(&self) -> &'static str {
        "/ search • ↑↓ select • n add staff • e/d disabled"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 3);
        let visible = self.list.filtered(ctx.clients);
        let title = format!("Staff Management ({} of {})", visible.len(), self.list.len());
        f.render_widget(
            Paragraph::new(search_line(&self.list.query, &self.cursor, palette))
                .block(panel(title, palette)),
            header,
        );

        let items: Vec<ListItem> = visible
            .iter()
            .map(|member| {
                let status = if member.is_active {
                    Span::styled("active", palette.accent(palette.success))
                } else {
                    Span::styled("inactive", palette.muted())
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(member.name.clone(), palette.title()),
                        Span::raw("  "),
                        Span::styled(member.role.label(), palette.accent(palette.info)),
                        Span::raw("  "),
                        status,
                        Span::raw("  "),
                        Span::styled("[edit] [delete]", palette.muted()),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "   {} • {} • {} • since {}",
                            member.employment_type.label(),
                            member.email,
                            member.phone,
                            member.start_date.format("%Y-%m-%d")
                        ),
                        palette.muted(),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default().with_selected(self.cursor.clamped(items.len()));
        let list = List::new(items)
            .block(panel("Team", palette))
            .highlight_style(palette.selected());
        f.render_stateful_widget(list, body, &mut state);

        if let Some(form) = self.modal.form() {
            draw_form(f, form, palette, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::Harness;

    #[test]
    fn new_staff_is_active_and_starts_today_by_default() {
        let mut h = Harness::new();
        let mut view = StaffView::new();
        let before = view.list.len();
        h.press(&mut view, KeyCode::Char('n'));
        h.type_text(&mut view, "Liam Chen");
        h.press(&mut view, KeyCode::Tab);
        h.press(&mut view, KeyCode::Left);
        h.press(&mut view, KeyCode::Enter);

        assert_eq!(view.list.len(), before + 1);
        let added = view.list.items().last().unwrap();
        assert!(added.is_active);
        assert_eq!(added.role, StaffRole::Other);
        assert_eq!(added.start_date, h.today);
        assert_eq!(h.toast(), Some(ADDED));
    }

    #[test]
    fn search_matches_role_labels() {
        let mut h = Harness::new();
        let mut view = StaffView::new();
        view.list.query.term = "physio".into();
        let hits = view.list.filtered(&h.clients);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].role, StaffRole::Physiotherapist);
        assert!(!h.render(&view).is_empty());
        h.press(&mut view, KeyCode::Char('d'));
        assert_eq!(view.list.len(), seed::staff().len());
    }
}
