use super::invoices::client_choices;
use super::{
    draw_form, header_and_body, panel, search_line, DrawContext, ListCursor, View, ViewContext,
    ViewRequest,
};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::list::{group_by_date, ListController};
use crate::model::{
    generate_id, Appointment, AppointmentKind, AppointmentStatus, ClientDirectory, Reminder,
};
use crate::seed;
use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;
use std::collections::BTreeSet;

pub const SCHEDULED: &str = "Appointment scheduled successfully!";

#[derive(Debug)]
pub struct AppointmentsView {
    pub list: ListController<Appointment>,
    cursor: ListCursor,
    modal: Modal,
}

fn appointment_form(clients: &ClientDirectory, staff_name: &str) -> Form {
    Form::new(
        "Schedule New Appointment",
        vec![
            Field::choice("client", "Client", client_choices(clients)),
            Field::text_with("staff", "Staff Member", staff_name),
            Field::text("service", "Service Type"),
            Field::text("date", "Date (YYYY-MM-DD)"),
            Field::text("time", "Time (HH:MM)"),
            Field::text_with("duration", "Duration (minutes)", "60"),
            Field::choice(
                "kind",
                "Appointment Type",
                AppointmentKind::ALL
                    .iter()
                    .map(|k| ChoiceOption::plain(k.label()))
                    .collect(),
            ),
            Field::text("location", "Location"),
            Field::toggle("email", "Email reminder", true),
            Field::toggle("sms", "SMS reminder", true),
        ],
    )
}

fn build_appointment(
    form: &Form,
    clients: &ClientDirectory,
    today: NaiveDate,
) -> Result<Appointment, FormError> {
    let client = clients.require(form.choice_value("client"))?;
    let mut reminders = BTreeSet::new();
    if form.toggled("email") {
        reminders.insert(Reminder::Email);
    }
    if form.toggled("sms") {
        reminders.insert(Reminder::Sms);
    }
    Ok(Appointment {
        id: generate_id(),
        client_id: client.id.clone(),
        staff_name: form.text("staff").to_string(),
        service: form.text("service").to_string(),
        date: form.date("date", today)?,
        time: form.time("time", NaiveTime::MIN)?,
        duration_minutes: form.number("duration")?,
        kind: AppointmentKind::ALL
            .get(form.choice_index("kind"))
            .copied()
            .unwrap_or(AppointmentKind::InPerson),
        location: form.text("location").to_string(),
        status: AppointmentStatus::Pending,
        reminders,
    })
}

fn reminder_label(reminders: &BTreeSet<Reminder>) -> String {
    if reminders.is_empty() {
        return "no reminders".into();
    }
    let names: Vec<&str> = reminders
        .iter()
        .map(|r| match r {
            Reminder::Email => "email",
            Reminder::Sms => "sms",
        })
        .collect();
    format!("reminders: {}", names.join(", "))
}

impl AppointmentsView {
    pub fn new() -> Self {
        AppointmentsView {
            list: ListController::new(seed::appointments()),
            cursor: ListCursor::default(),
            modal: Modal::Closed,
        }
    }

    fn submit(&mut self, ctx: &mut ViewContext<'_>) {
        let today = ctx.today;
        let clients: &ClientDirectory = ctx.clients;
        self.modal
            .submit(&mut self.list, ctx.notifier, ctx.now, SCHEDULED, |form: &Form| {
                build_appointment(form, clients, today)
            });
    }
}

impl View for AppointmentsView {
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
            let form = appointment_form(ctx.clients, &ctx.config.current_user);
            self.modal.open(form);
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open() || self.cursor.searching
    }

    fn help(&self) -> &'static str {
        "/ search • n schedule appointment"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 3);
        let visible = self.list.filtered(ctx.clients);
        let title = format!("Appointments ({} of {})", visible.len(), self.list.len());
        f.render_widget(
            Paragraph::new(search_line(&self.list.query, &self.cursor, palette))
                .block(panel(title, palette)),
            header,
        );

        let mut items: Vec<ListItem> = Vec::new();
        for (date, group) in group_by_date(&visible) {
            items.push(ListItem::new(Line::from(Span::styled(
                date.format("%A, %d %B %Y").to_string(),
                palette.accent(palette.info),
            ))));
            for appt in group {
                let status_color = match appt.status {
                    AppointmentStatus::Confirmed => palette.success,
                    AppointmentStatus::Pending => palette.warning,
                    AppointmentStatus::Cancelled => palette.error,
                };
                items.push(ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("  {} ", appt.time.format("%H:%M")), palette.title()),
                        Span::raw(ctx.clients.name_of(&appt.client_id).to_string()),
                        Span::raw(" • "),
                        Span::raw(appt.service.clone()),
                        Span::raw("  "),
                        Span::styled(appt.status.label(), palette.accent(status_color)),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "        {} • {} min • {} • {} • {}",
                            appt.staff_name,
                            appt.duration_minutes,
                            appt.kind.label(),
                            appt.location,
                            reminder_label(&appt.reminders)
                        ),
                        palette.muted(),
                    )),
                ]));
            }
        }
        f.render_widget(List::new(items).block(panel("Schedule", palette)), body);

        if let Some(form) = self.modal.form() {
            draw_form(f, form, palette, None);
        }
    }
}
