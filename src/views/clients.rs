use super::{
    draw_form, header_and_body, panel, search_line, DrawContext, ListCursor, View, ViewContext,
    ViewRequest,
};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::list::{filter_records, NoCategory, Query};
use crate::model::{generate_id, Client, FundingType};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use tracing::debug;

pub const ADDED: &str = "Client added successfully!";

/// Client records live in the shell's directory so every other view can
/// join against them; only the query and modal reset on remount.
#[derive(Debug, Default)]
pub struct ClientsView {
    pub query: Query<NoCategory>,
    cursor: ListCursor,
    modal: Modal,
}

fn client_form() -> Form {
    Form::new(
        "Add New Client",
        vec![
            Field::text("name", "Full Name"),
            Field::text("dob", "Date of Birth (YYYY-MM-DD)"),
            Field::text("ndis", "NDIS Number"),
            Field::choice(
                "funding",
                "Funding Type",
                FundingType::ALL
                    .iter()
                    .map(|f| ChoiceOption::plain(f.label()))
                    .collect(),
            ),
            Field::text("phone", "Phone"),
            Field::text("email", "Email"),
            Field::text("professional", "Assigned Professional"),
        ],
    )
}

fn build_client(form: &Form, today: chrono::NaiveDate) -> Result<Client, FormError> {
    let funding = FundingType::ALL
        .get(form.choice_index("funding"))
        .copied()
        .unwrap_or(FundingType::Ndis);
    Ok(Client {
        id: generate_id(),
        name: form.text("name").to_string(),
        date_of_birth: form.date("dob", today)?,
        ndis_number: form.text("ndis").to_string(),
        funding_type: funding,
        phone: form.text("phone").to_string(),
        email: form.text("email").to_string(),
        assigned_professional: form.text("professional").to_string(),
    })
}

impl ClientsView {
    fn submit(&mut self, ctx: &mut ViewContext<'_>) {
        let today = ctx.today;
        self.modal
            .submit(ctx.clients, ctx.notifier, ctx.now, ADDED, |form: &Form| {
                build_client(form, today)
            });
    }
}

impl View for ClientsView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if let Some(form) = self.modal.form_mut() {
            match form.handle_key(key) {
                FormInput::Submit => self.submit(ctx),
                FormInput::Cancel => self.modal.cancel(),
                FormInput::Editing => {}
            }
            return ViewRequest::None;
        }
        let len = filter_records(ctx.clients.all(), &self.query, ctx.clients).len();
        if self.cursor.handle(key, &mut self.query, len) {
            return ViewRequest::None;
        }
        match key.code {
            KeyCode::Char('n') => self.modal.open(client_form()),
            KeyCode::Char('e') | KeyCode::Char('d') => {
                debug!("Client edit/delete is disabled");
            }
            _ => {}
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open() || self.cursor.searching
    }

    fn help(&self) -> &'static str {
        "/ search • ↑↓ select • n add client • e/d disabled"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 3);
        let visible = filter_records(ctx.clients.all(), &self.query, ctx.clients);
        let title = format!("Clients ({} of {})", visible.len(), ctx.clients.len());
        f.render_widget(
            Paragraph::new(search_line(&self.query, &self.cursor, palette))
                .block(panel(title, palette)),
            header,
        );

        let items: Vec<ListItem> = visible
            .iter()
            .map(|client| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(client.name.clone(), palette.title()),
                        Span::raw("  "),
                        Span::styled(client.funding_type.label(), palette.accent(palette.info)),
                        Span::raw("  "),
                        Span::styled("[edit] [delete]", palette.muted()),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "   {} • born {} • {} • {} • {}",
                            client.ndis_number,
                            client.date_of_birth.format("%Y-%m-%d"),
                            client.phone,
                            client.email,
                            client.assigned_professional
                        ),
                        palette.muted(),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default().with_selected(self.cursor.clamped(items.len()));
        let list = List::new(items)
            .block(panel("Client Records", palette))
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
    fn add_client_through_the_modal() {
        let mut h = Harness::new();
        let mut view = ClientsView::default();
        let before = h.clients.len();

        h.press(&mut view, KeyCode::Char('n'));
        assert!(view.captures_input());
        h.type_text(&mut view, "Ava Brown");
        h.press(&mut view, KeyCode::Tab);
        h.type_text(&mut view, "2001-04-09");
        h.press(&mut view, KeyCode::Tab);
        h.press(&mut view, KeyCode::Tab);
        h.press(&mut view, KeyCode::Right);
        h.press(&mut view, KeyCode::Enter);

        assert!(!view.captures_input());
        assert_eq!(h.clients.len(), before + 1);
        let added = h.clients.all().last().unwrap();
        assert_eq!(added.name, "Ava Brown");
        assert_eq!(added.funding_type, FundingType::Private);
        assert_eq!(h.toast(), Some(ADDED));
    }

    #[test]
    fn cancel_leaves_directory_alone() {
        let mut h = Harness::new();
        let mut view = ClientsView::default();
        let before = h.clients.len();
        h.press(&mut view, KeyCode::Char('n'));
        h.type_text(&mut view, "Nobody");
        h.press(&mut view, KeyCode::Esc);
        assert_eq!(h.clients.len(), before);
        assert!(h.toast().is_none());
    }

    #[test]
    fn bad_birth_date_keeps_modal_open() {
        let mut h = Harness::new();
        let mut view = ClientsView::default();
        let before = h.clients.len();
        h.press(&mut view, KeyCode::Char('n'));
        h.press(&mut view, KeyCode::Tab);
        h.type_text(&mut view, "09/04/2001");
        h.press(&mut view, KeyCode::Enter);
        assert!(view.captures_input());
        assert_eq!(h.clients.len(), before);
        assert!(h.toast().unwrap().starts_with("Could not save: "));
    }

    #[test]
    fn edit_and_delete_do_nothing() {
        let mut h = Harness::new();
        let mut view = ClientsView::default();
        let before = h.clients.all().to_vec();
        h.press(&mut view, KeyCode::Char('e'));
        h.press(&mut view, KeyCode::Char('d'));
        assert_eq!(h.clients.all(), before.as_slice());
        assert!(!view.captures_input());
    }

    #[test]
    fn search_narrows_rendered_cards() {
        let mut h = Harness::new();
        let mut view = ClientsView::default();
        h.press(&mut view, KeyCode::Char('/'));
        h.type_text(&mut view, "ndis789");
        h.press(&mut view, KeyCode::Enter);
        let screen = h.render(&view);
        assert!(screen.contains("Jane Smith"));
        assert!(!screen.contains("John Doe"));
        assert!(screen.contains("Clients (1 of 3)"));
    }
}
