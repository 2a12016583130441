use super::{
    draw_form, header_and_body, panel, search_line, stat_line, DrawContext, ListCursor, View,
    ViewContext, ViewRequest,
};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::list::{aggregate, ListController};
use crate::model::{format_money, generate_id, ClientDirectory, Invoice, InvoiceStatus};
use crate::seed;
use chrono::{Datelike, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub const CREATED: &str = "Invoice created successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvoiceTotals {
    pub paid: i64,
    pub pending: i64,
    pub overdue: i64,
    pub total: i64,
}

pub fn totals<'a>(invoices: impl IntoIterator<Item = &'a Invoice> + Clone) -> InvoiceTotals {
    let by_status = |status: InvoiceStatus| -> i64 {
        aggregate(invoices.clone(), |i: &Invoice| i.status == status, |i| i.amount)
    };
    InvoiceTotals {
        paid: by_status(InvoiceStatus::Paid),
        pending: by_status(InvoiceStatus::Pending),
        overdue: by_status(InvoiceStatus::Overdue),
        total: aggregate(invoices.clone(), |_| true, |i| i.amount),
    }
}

pub fn client_choices(clients: &ClientDirectory) -> Vec<ChoiceOption> {
    clients
        .all()
        .iter()
        .map(|c| ChoiceOption::new(c.id.clone(), c.name.clone()))
        .collect()
}

#[derive(Debug)]
pub struct InvoicesView {
    pub list: ListController<Invoice>,
    cursor: ListCursor,
    modal: Modal,
}

impl InvoicesView {
    pub fn new() -> Self {
        InvoicesView {
            list: ListController::new(seed::invoices()),
            cursor: ListCursor::default(),
            modal: Modal::Closed,
        }
    }

    fn submit(&mut self, ctx: &mut ViewContext<'_>) {
        let today = ctx.today;
        let number = format!("INV-{}-{:03}", today.year(), self.list.len() + 1);
        let clients: &ClientDirectory = ctx.clients;
        self.modal
            .submit(&mut self.list, ctx.notifier, ctx.now, CREATED, |form: &Form| {
                build_invoice(form, clients, number, today)
            });
    }
}

fn invoice_form(clients: &ClientDirectory) -> Form {
    Form::new(
        "Create New Invoice",
        vec![
            Field::choice("client", "Client", client_choices(clients)),
            Field::text("description", "Service Description"),
            Field::text("date", "Date (YYYY-MM-DD)"),
            Field::text("amount", "Amount ($)"),
            Field::choice(
                "status",
                "Status",
                InvoiceStatus::ALL
                    .iter()
                    .map(|s| ChoiceOption::plain(s.label()))
                    .collect(),
            ),
            Field::text("due", "Due Date (optional)"),
            Field::text("notes", "Notes (optional)"),
        ],
    )
}

fn build_invoice(
    form: &Form,
    clients: &ClientDirectory,
    invoice_number: String,
    today: NaiveDate,
) -> Result<Invoice, FormError> {
    let client = clients.require(form.choice_value("client"))?;
    let status = InvoiceStatus::ALL
        .get(form.choice_index("status"))
        .copied()
        .unwrap_or(InvoiceStatus::Pending);
    Ok(Invoice {
        id: generate_id(),
        invoice_number,
        client_id: client.id.clone(),
        description: form.text("description").to_string(),
        date: form.date("date", today)?,
        amount: form.cents("amount")?,
        status,
        paid_date: (status == InvoiceStatus::Paid).then_some(today),
        due_date: form.optional_date("due")?,
        notes: form.optional_text("notes"),
    })
}

fn status_color(status: InvoiceStatus, ctx: &DrawContext<'_>) -> Color {
    match status {
        InvoiceStatus::Paid => ctx.palette.success,
        InvoiceStatus::Pending => ctx.palette.warning,
        InvoiceStatus::Overdue => ctx.palette.error,
    }
}

impl View for InvoicesView {
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
            self.modal.open(invoice_form(ctx.clients));
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open() || self.cursor.searching
    }

    fn help(&self) -> &'static str {
        "/ search • f status filter • ↑↓ select • n new invoice"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 6);
        let visible = self.list.filtered(ctx.clients);
        let sums = totals(visible.iter().copied());

        let header_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(header);
        f.render_widget(
            Paragraph::new(vec![
                search_line(&self.list.query, &self.cursor, palette),
                Line::from(Span::styled(
                    format!("{} of {} invoices", visible.len(), self.list.len()),
                    palette.muted(),
                )),
            ])
            .block(panel("Invoices & Billing", palette)),
            header_cols[0],
        );
        f.render_widget(
            Paragraph::new(vec![
                stat_line("Paid", format_money(sums.paid), palette.success, palette),
                stat_line("Pending", format_money(sums.pending), palette.warning, palette),
                stat_line("Total", format_money(sums.total), palette.primary, palette),
            ])
            .block(panel("Summary", palette)),
            header_cols[1],
        );

        let items: Vec<ListItem> = visible
            .iter()
            .map(|invoice| {
                let mut detail = format!(
                    "   {} • {}",
                    invoice.description,
                    invoice.date.format("%Y-%m-%d")
                );
                if let Some(paid) = invoice.paid_date {
                    detail.push_str(&format!(" • paid {}", paid.format("%Y-%m-%d")));
                } else if let Some(due) = invoice.due_date {
                    detail.push_str(&format!(" • due {}", due.format("%Y-%m-%d")));
                }
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(invoice.invoice_number.clone(), palette.title()),
                        Span::raw("  "),
                        Span::raw(ctx.clients.name_of(&invoice.client_id).to_string()),
                        Span::raw("  "),
                        Span::styled(format_money(invoice.amount), palette.accent(palette.primary)),
                        Span::raw("  "),
                        Span::styled(
                            invoice.status.label(),
                            palette.accent(status_color(invoice.status, ctx)),
                        ),
                    ]),
                    Line::from(Span::styled(detail, palette.muted())),
                ])
            })
            .collect();
        let mut state = ListState::default().with_selected(self.cursor.clamped(items.len()));
        let list = List::new(items)
            .block(panel("Invoices", palette))
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
    use crate::list::Filter;
    use crate::views::testing::Harness;

    #[test]
    fn summary_covers_the_filtered_set() {
        let h = Harness::new();
        let mut view = InvoicesView::new();
        let all = totals(view.list.items());
        assert_eq!((all.paid, all.pending, all.total), (15000, 20000, 65000));

        view.list.query.category = Filter::Only(InvoiceStatus::Overdue);
        let visible = view.list.filtered(&h.clients);
        let narrowed = totals(visible.iter().copied());
        assert_eq!((narrowed.paid, narrowed.overdue, narrowed.total), (0, 30000, 30000));
        assert!(h.render(&view).contains("$300.00"));
    }

    #[test]
    fn created_invoice_gets_a_sequential_number() {
        let mut h = Harness::new();
        let mut view = InvoicesView::new();
        h.press(&mut view, KeyCode::Char('n'));
        h.press(&mut view, KeyCode::Right);
        h.press(&mut view, KeyCode::Tab);
        h.type_text(&mut view, "Speech therapy");
        h.press(&mut view, KeyCode::Tab);
        h.press(&mut view, KeyCode::Tab);
        h.type_text(&mut view, "$95.50");
        h.press(&mut view, KeyCode::Tab);
        h.press(&mut view, KeyCode::Enter);

        assert_eq!(h.toast(), Some(CREATED));
        let added = view.list.items().last().unwrap();
        assert_eq!(added.invoice_number, "INV-2024-004");
        assert_eq!(added.client_id, "c2");
        assert_eq!(added.amount, 9550);
        assert_eq!(added.status, InvoiceStatus::Paid);
        assert_eq!(added.paid_date, Some(h.today));
        assert_eq!(added.date, h.today);
        assert_eq!(added.notes, None);
    }

    #[test]
    fn bad_amount_is_reported_and_nothing_is_added() {
        let mut h = Harness::new();
        let mut view = InvoicesView::new();
        h.press(&mut view, KeyCode::Char('n'));
        for _ in 0..3 {
            h.press(&mut view, KeyCode::Tab);
        }
        h.type_text(&mut view, "lots");
        h.press(&mut view, KeyCode::Enter);
        assert!(view.captures_input());
        assert_eq!(view.list.len(), 3);
        assert_eq!(h.toast(), Some("Could not save: amount: invalid number: lots"));
    }

    #[test]
    fn oversized_amount_is_rejected_without_crashing() {
        let mut h = Harness::new();
        let mut view = InvoicesView::new();
        h.press(&mut view, KeyCode::Char('n'));
        for _ in 0..3 {
            h.press(&mut view, KeyCode::Tab);
        }
        h.type_text(&mut view, "99999999999999999");
        h.press(&mut view, KeyCode::Enter);
        assert!(view.captures_input());
        assert_eq!(view.list.len(), 3);
        assert_eq!(
            h.toast(),
            Some("Could not save: amount: invalid number: 99999999999999999")
        );
    }

    #[test]
    fn negative_amount_keeps_its_cents() {
        let mut h = Harness::new();
        let mut view = InvoicesView::new();
        h.press(&mut view, KeyCode::Char('n'));
        for _ in 0..3 {
            h.press(&mut view, KeyCode::Tab);
        }
        h.type_text(&mut view, "-5.50");
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(h.toast(), Some(CREATED));
        assert_eq!(view.list.items().last().unwrap().amount, -550);
    }

    #[test]
    fn no_clients_means_no_invoice() {
        let mut h = Harness::new();
        h.clients = ClientDirectory::default();
        let mut view = InvoicesView::new();
        h.press(&mut view, KeyCode::Char('n'));
        h.press(&mut view, KeyCode::Enter);
        assert_eq!(view.list.len(), 3);
        assert_eq!(h.toast(), Some("Could not save: no clients on record"));
    }
}
