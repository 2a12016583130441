//! "Add record" dialogs: field bindings, key handling and the
//! closed/open/submit lifecycle.

use crate::model::ModelError;
use crate::notify::NotificationChannel;
use crate::sink::RecordSink;
use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::{debug, info};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("{field}: invalid date (use YYYY-MM-DD): {value}")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field}: invalid time (use HH:MM): {value}")]
    InvalidTime { field: &'static str, value: String },
    #[error("{field}: invalid number: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Editable text with a byte cursor kept on char boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    pub fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Empties the field and hands back what was typed.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.value.drain(idx..self.cursor);
            self.cursor = idx;
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert(self.cursor, '▌');
        text
    }

    /// Applies an editing key. Returns false for keys it does not consume.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c)
            }
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        ChoiceOption {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn plain(label: &str) -> Self {
        ChoiceOption::new(label, label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text(FieldValue),
    Choice {
        options: Vec<ChoiceOption>,
        selected: usize,
    },
    Toggle(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Field {
            key,
            label,
            kind: FieldKind::Text(FieldValue::default()),
        }
    }

    pub fn text_with(key: &'static str, label: &'static str, value: &str) -> Self {
        Field {
            key,
            label,
            kind: FieldKind::Text(FieldValue::new(value)),
        }
    }

    pub fn choice(key: &'static str, label: &'static str, options: Vec<ChoiceOption>) -> Self {
        Field {
            key,
            label,
            kind: FieldKind::Choice {
                options,
                selected: 0,
            },
        }
    }

    pub fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Field {
            key,
            label,
            kind: FieldKind::Toggle(on),
        }
    }

    pub fn display(&self, active: bool) -> String {
        match &self.kind {
            FieldKind::Text(value) if active => value.with_caret(),
            FieldKind::Text(value) => value.as_str().to_string(),
            FieldKind::Choice { options, selected } => options
                .get(*selected)
                .map(|o| format!("< {} >", o.label))
                .unwrap_or_else(|| "(none)".into()),
            FieldKind::Toggle(on) => if *on { "[x]" } else { "[ ]" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Editing,
    Submit,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Form {
    pub title: &'static str,
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    pub fn new(title: &'static str, fields: Vec<Field>) -> Self {
        Form {
            title,
            fields,
            focus: 0,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// Text content, trimmed. Empty for unknown keys.
    pub fn text(&self, key: &str) -> &str {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Text(value)) => value.as_str().trim(),
            _ => "",
        }
    }

    pub fn optional_text(&self, key: &str) -> Option<String> {
        let text = self.text(key);
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn choice_value(&self, key: &str) -> &str {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Choice { options, selected }) => {
                options.get(*selected).map(|o| o.value.as_str()).unwrap_or("")
            }
            _ => "",
        }
    }

    pub fn choice_index(&self, key: &str) -> usize {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Choice { selected, .. }) => *selected,
            _ => 0,
        }
    }

    pub fn toggled(&self, key: &str) -> bool {
        matches!(
            self.field(key).map(|f| &f.kind),
            Some(FieldKind::Toggle(true))
        )
    }

    #[cfg(test)]
    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(field) = self.field_mut(key) {
            field.kind = FieldKind::Text(FieldValue::new(value));
        }
    }

    pub fn select(&mut self, key: &str, index: usize) {
        if let Some(Field {
            kind: FieldKind::Choice { options, selected },
            ..
        }) = self.field_mut(key)
        {
            if index < options.len() {
                *selected = index;
            }
        }
    }

    /// Blank means `default`; anything else must be YYYY-MM-DD.
    pub fn date(
        &self,
        key: &'static str,
        default: NaiveDate,
    ) -> Result<NaiveDate, FormError> {
        Ok(self.optional_date(key)?.unwrap_or(default))
    }

    pub fn optional_date(&self, key: &'static str) -> Result<Option<NaiveDate>, FormError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FormError::InvalidDate {
                field: key,
                value: raw.to_string(),
            })
    }

    pub fn time(&self, key: &'static str, default: NaiveTime) -> Result<NaiveTime, FormError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(default);
        }
        NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| FormError::InvalidTime {
            field: key,
            value: raw.to_string(),
        })
    }

    /// Blank means zero.
    pub fn number<T>(&self, key: &'static str) -> Result<T, FormError>
    where
        T: std::str::FromStr + Default,
    {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(T::default());
        }
        raw.parse().map_err(|_| FormError::InvalidNumber {
            field: key,
            value: raw.to_string(),
        })
    }

    /// Dollar text such as "150", "$150.5" or "1,200.00" into cents.
    pub fn cents(&self, key: &'static str) -> Result<i64, FormError> {
        let raw = self.text(key);
        let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
        if cleaned.is_empty() {
            return Ok(0);
        }
        let invalid = || FormError::InvalidNumber {
            field: key,
            value: raw.to_string(),
        };
        let (negative, unsigned) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let (whole, frac) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };
        let digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 2
            || !digits(whole)
            || !digits(frac)
        {
            return Err(invalid());
        }
        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        let magnitude = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(if negative { -magnitude } else { magnitude })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Esc => return FormInput::Cancel,
            KeyCode::Enter => return FormInput::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                return FormInput::Editing;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_field();
                return FormInput::Editing;
            }
            _ => {}
        }
        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormInput::Editing;
        };
        match &mut field.kind {
            FieldKind::Text(value) => {
                value.handle_key(key);
            }
            FieldKind::Choice { options, selected } => match key.code {
                KeyCode::Right | KeyCode::Char(' ') if !options.is_empty() => {
                    *selected = (*selected + 1) % options.len();
                }
                KeyCode::Left if !options.is_empty() => {
                    *selected = (*selected + options.len() - 1) % options.len();
                }
                _ => {}
            },
            FieldKind::Toggle(on) => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                    *on = !*on;
                }
            }
        }
        FormInput::Editing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Committed,
    Rejected,
    NotOpen,
}

/// Closed until an add/create/upload/schedule/report action opens it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Modal<F = Form> {
    #[default]
    Closed,
    Open(F),
}

impl<F> Modal<F> {
    pub fn open(&mut self, form: F) {
        self.set(Modal::Open(form));
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("Modal cancelled");
        }
        self.set(Modal::Closed);
    }

    fn set(&mut self, next: Modal<F>) {
        *self = next;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            Modal::Open(form) => Some(form),
            Modal::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self {
            Modal::Open(form) => Some(form),
            Modal::Closed => None,
        }
    }

    /// Builds a record from the open form and commits it. Success notifies
    /// `success` and closes; a build or commit failure notifies the reason
    /// and leaves the form open.
    pub fn submit<E, S, B>(
        &mut self,
        sink: &mut S,
        notifier: &mut NotificationChannel,
        now: Instant,
        success: &str,
        build: B,
    ) -> SubmitOutcome
    where
        S: RecordSink<E>,
        B: FnOnce(&F) -> Result<E, FormError>,
    {
        let Some(form) = self.form() else {
            return SubmitOutcome::NotOpen;
        };
        let committed = build(form)
            .map_err(|err| err.to_string())
            .and_then(|record| sink.commit(record).map_err(|err| err.to_string()));
        match committed {
            Ok(()) => {
                info!(message = success, "Record committed");
                notifier.success(success, now);
                self.set(Modal::Closed);
                SubmitOutcome::Committed
            }
            Err(reason) => {
                info!(%reason, "Record rejected");
                notifier.failure(format!("Could not save: {}", reason), now);
                SubmitOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkError;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    struct Rejecting;

    impl RecordSink<String> for Rejecting {
        fn commit(&mut self, _record: String) -> Result<(), SinkError> {
            Err(SinkError::Rejected("disk full".into()))
        }
    }

    impl RecordSink<String> for Vec<String> {
        fn commit(&mut self, record: String) -> Result<(), SinkError> {
            self.push(record);
            Ok(())
        }
    }

    fn sample_form() -> Form {
        Form::new(
            "Sample",
            vec![
                Field::text("name", "Name"),
                Field::choice(
                    "kind",
                    "Kind",
                    vec![ChoiceOption::plain("a"), ChoiceOption::plain("b")],
                ),
                Field::toggle("sms", "SMS", true),
                Field::text("date", "Date"),
            ],
        )
    }

    #[test]
    fn field_value_edits_multibyte_text() {
        let mut field = FieldValue::new("né");
        field.backspace();
        assert_eq!(field.as_str(), "n");
        field.move_left();
        field.insert_char('å');
        assert_eq!(field.as_str(), "ån");
        assert_eq!(field.with_caret(), "å▌n");
        assert_eq!(field.take(), "ån");
        assert!(field.is_blank());
    }

    #[test]
    fn keys_route_to_the_focused_field() {
        let mut form = sample_form();
        for c in "Ann".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(form.handle_key(key(KeyCode::Tab)), FormInput::Editing);
        form.handle_key(key(KeyCode::Right));
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(form.text("name"), "Ann");
        assert_eq!(form.choice_value("kind"), "b");
        assert!(!form.toggled("sms"));
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormInput::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormInput::Cancel);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = sample_form();
        form.prev_field();
        assert_eq!(form.focus(), 3);
        form.next_field();
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn typed_fields_parse_or_default() {
        let mut form = sample_form();
        let today = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
        assert_eq!(form.date("date", today), Ok(today));
        form.set_text("date", "2024-12-01");
        assert_eq!(
            form.date("date", today),
            Ok(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
        );
        form.set_text("date", "01/12/2024");
        assert!(matches!(
            form.date("date", today),
            Err(FormError::InvalidDate { field: "date", .. })
        ));
    }

    #[test]
    fn cents_parse_dollar_text() {
        let mut form = sample_form();
        let cases = [
            ("", 0),
            ("150", 15000),
            ("$150.5", 15050),
            ("1,200.00", 120000),
            (".75", 75),
        ];
        for (text, expected) in cases {
            form.set_text("name", text);
            assert_eq!(form.cents("name"), Ok(expected), "{text}");
        }
        for bad in ["12.345", "abc", "1.x", "-", "--5", "5-"] {
            form.set_text("name", bad);
            assert!(form.cents("name").is_err(), "{bad}");
        }
    }

    #[test]
    fn negative_amounts_carry_the_sign_through_the_cents() {
        let mut form = sample_form();
        let cases = [("-5.50", -550), ("-0.50", -50), ("-$12", -1200), ("-.5", -50)];
        for (text, expected) in cases {
            form.set_text("name", text);
            assert_eq!(form.cents("name"), Ok(expected), "{text}");
        }
    }

    #[test]
    fn oversized_amount_is_an_invalid_number() {
        let mut form = sample_form();
        for huge in ["99999999999999999", "-99999999999999999", "92233720368547758.08"] {
            form.set_text("name", huge);
            assert!(
                matches!(
                    form.cents("name"),
                    Err(FormError::InvalidNumber { field: "name", .. })
                ),
                "{huge}"
            );
        }
        form.set_text("name", "92233720368547758.07");
        assert_eq!(form.cents("name"), Ok(i64::MAX));
    }

    #[test]
    fn open_submit_closes_and_appends_one() {
        let mut modal = Modal::Closed;
        let mut sink: Vec<String> = Vec::new();
        let mut notifier = NotificationChannel::default();
        let now = Instant::now();

        modal.open(sample_form());
        assert!(modal.is_open());
        let outcome = modal.submit(&mut sink, &mut notifier, now, "Added!", |f: &Form| {
            Ok(f.text("name").to_string())
        });
        assert_eq!(outcome, SubmitOutcome::Committed);
        assert!(!modal.is_open());
        assert_eq!(sink.len(), 1);
        assert_eq!(notifier.current(now).map(|n| n.message.as_str()), Some("Added!"));
    }

    #[test]
    fn open_cancel_leaves_collection_alone() {
        let mut modal = Modal::Closed;
        let sink: Vec<String> = Vec::new();
        modal.open(sample_form());
        modal.cancel();
        assert_eq!(modal, Modal::Closed);
        assert!(sink.is_empty());
    }

    #[test]
    fn failures_keep_the_form_open_with_a_distinct_message() {
        let now = Instant::now();
        let mut notifier = NotificationChannel::default();
        let mut modal = Modal::Closed;
        modal.open(sample_form());

        let outcome = modal.submit(&mut Rejecting, &mut notifier, now, "Added!", |_: &Form| {
            Ok("x".to_string())
        });
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(modal.is_open());
        let shown = notifier.current(now).unwrap();
        assert_eq!(shown.message, "Could not save: disk full");
        assert_eq!(shown.tone, crate::notify::Tone::Failure);

        let mut sink: Vec<String> = Vec::new();
        let outcome = modal.submit(&mut sink, &mut notifier, now, "Added!", |f: &Form| {
            f.number::<u32>("name").map(|n| n.to_string())
        });
        assert_eq!(outcome, SubmitOutcome::Committed);

        modal.open(sample_form());
        if let Some(form) = modal.form_mut() {
            form.set_text("date", "nope");
        }
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let outcome = modal.submit(&mut sink, &mut notifier, now, "Added!", |f: &Form| {
            f.date("date", today).map(|d| d.to_string())
        });
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn submitting_a_closed_modal_does_nothing() {
        let mut modal: Modal = Modal::Closed;
        let mut sink: Vec<String> = Vec::new();
        let mut notifier = NotificationChannel::default();
        let outcome = modal.submit(&mut sink, &mut notifier, Instant::now(), "x", |_: &Form| {
            Ok(String::new())
        });
        assert_eq!(outcome, SubmitOutcome::NotOpen);
        assert!(!notifier.is_showing());
    }
}
