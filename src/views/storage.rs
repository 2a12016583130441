use super::invoices::client_choices;
use super::{
    draw_confirm, draw_form, header_and_body, panel, search_line, stat_line, DrawContext,
    ListCursor, View, ViewContext, ViewRequest,
};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::list::{aggregate, format_megabytes, parse_size_label, ListController};
use crate::model::{generate_id, ClientDirectory, FileCategory, FileKind, StoredFile};
use crate::seed;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use tracing::info;

pub const UPLOADED: &str = "File uploaded successfully!";
pub const DOWNLOADING: &str = "Downloading file...";
pub const DELETED: &str = "File deleted";

#[derive(Debug)]
pub struct StorageView {
    pub list: ListController<StoredFile>,
    cursor: ListCursor,
    modal: Modal,
    confirm_delete: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageSummary {
    pub files: usize,
    pub used: String,
}

fn upload_form(clients: &ClientDirectory) -> Form {
    Form::new(
        "Upload File",
        vec![
            Field::text("name", "File Name"),
            Field::choice("client", "Client", client_choices(clients)),
            Field::choice(
                "kind",
                "File Type",
                FileKind::ALL
                    .iter()
                    .map(|k| ChoiceOption::plain(k.label()))
                    .collect(),
            ),
            Field::choice(
                "category",
                "Category",
                FileCategory::ALL
                    .iter()
                    .map(|c| ChoiceOption::plain(c.label()))
                    .collect(),
            ),
            Field::text("size", "Size (e.g. 2.4 MB)"),
        ],
    )
}

fn build_file(
    form: &Form,
    clients: &ClientDirectory,
    uploaded_by: &str,
    today: NaiveDate,
) -> Result<StoredFile, FormError> {
    let client = clients.require(form.choice_value("client"))?;
    let size = form.text("size");
    Ok(StoredFile {
        id: generate_id(),
        name: form.text("name").to_string(),
        client_id: client.id.clone(),
        kind: FileKind::ALL
            .get(form.choice_index("kind"))
            .copied()
            .unwrap_or(FileKind::Other),
        size_label: if size.is_empty() { "0 KB".into() } else { size.to_string() },
        uploaded_by: uploaded_by.to_string(),
        upload_date: today,
        category: FileCategory::ALL
            .get(form.choice_index("category"))
            .copied()
            .unwrap_or(FileCategory::Other),
    })
}

impl StorageView {
    pub fn new() -> Self {
        StorageView {
            list: ListController::new(seed::files()),
            cursor: ListCursor::default(),
            modal: Modal::Closed,
            confirm_delete: None,
        }
    }

    /// Totals over every stored file, ignoring search and filter.
    pub fn summary(&self) -> StorageSummary {
        let kilobytes: f64 =
            aggregate(self.list.items(), |_| true, |f| parse_size_label(&f.size_label));
        StorageSummary {
            files: self.list.len(),
            used: format_megabytes(kilobytes),
        }
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.confirm_delete.as_deref()
    }

    fn selected_id(&self, ctx: &ViewContext<'_>) -> Option<String> {
        let visible = self.list.filtered(ctx.clients);
        self.cursor
            .clamped(visible.len())
            .map(|idx| visible[idx].id.clone())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_delete.take() {
                    if let Some(file) = self.list.remove_where(|f| f.id == id) {
                        info!(file = %file.name, "File deleted");
                        ctx.notifier.success(DELETED, ctx.now);
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.confirm_delete = None,
            _ => {}
        }
    }

    fn submit(&mut self, ctx: &mut ViewContext<'_>) {
        let today = ctx.today;
        let clients: &ClientDirectory = ctx.clients;
        let uploaded_by = ctx.config.current_user.as_str();
        self.modal
            .submit(&mut self.list, ctx.notifier, ctx.now, UPLOADED, |form: &Form| {
                build_file(form, clients, uploaded_by, today)
            });
    }
}

impl View for StorageView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if self.confirm_delete.is_some() {
            self.handle_confirm_key(key, ctx);
            return ViewRequest::None;
        }
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
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('u') => self.modal.open(upload_form(ctx.clients)),
            KeyCode::Char('d') | KeyCode::Enter => {
                if self.selected_id(ctx).is_some() {
                    ctx.notifier.info(DOWNLOADING, ctx.now);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                self.confirm_delete = self.selected_id(ctx);
            }
            _ => {}
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open() || self.cursor.searching || self.confirm_delete.is_some()
    }

    fn help(&self) -> &'static str {
        "/ search • f category • ↑↓ select • d download • x delete • n upload"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 6);
        let visible = self.list.filtered(ctx.clients);
        let summary = self.summary();

        let header_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(header);
        f.render_widget(
            Paragraph::new(vec![
                search_line(&self.list.query, &self.cursor, palette),
                Line::from(Span::styled(
                    format!("{} of {} files", visible.len(), self.list.len()),
                    palette.muted(),
                )),
            ])
            .block(panel("File Storage", palette)),
            header_cols[0],
        );
        f.render_widget(
            Paragraph::new(vec![
                stat_line("Total Files", summary.files.to_string(), palette.primary, palette),
                stat_line("Storage Used", summary.used.clone(), palette.info, palette),
                stat_line("Limit", ctx.config.storage_limit.clone(), palette.secondary, palette),
            ])
            .block(panel("Usage", palette)),
            header_cols[1],
        );

        let items: Vec<ListItem> = visible
            .iter()
            .map(|file| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(file.name.clone(), palette.title()),
                        Span::raw("  "),
                        Span::styled(file.category.label(), palette.accent(palette.info)),
                        Span::raw("  "),
                        Span::styled(file.size_label.clone(), palette.muted()),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "   {} • {} • uploaded by {} on {}",
                            ctx.clients.name_of(&file.client_id),
                            file.kind.label(),
                            file.uploaded_by,
                            file.upload_date.format("%Y-%m-%d")
                        ),
                        palette.muted(),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default().with_selected(self.cursor.clamped(items.len()));
        let list = List::new(items)
            .block(panel("Files", palette))
            .highlight_style(palette.selected());
        f.render_stateful_widget(list, body, &mut state);

        if let Some(form) = self.modal.form() {
            draw_form(f, form, palette, None);
        }
        if let Some(id) = self.pending_delete() {
            let name = self
                .list
                .items()
                .iter()
                .find(|file| file.id == id)
                .map(|file| file.name.as_str())
                .unwrap_or(id);
            draw_confirm(f, &format!("Delete \"{}\"?", name), palette);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::Filter;
    use crate::views::testing::Harness;

    #[test]
    fn summary_counts_every_file() {
        let h = Harness::new();
        let mut view = StorageView::new();
        view.list.query.category = Filter::Only(FileCategory::Videos);
        assert_eq!(view.list.filtered(&h.clients).len(), 1);
        assert_eq!(
            view.summary(),
            StorageSummary {
                files: 4,
                used: "17.3 MB".into()
            }
        );
        let screen = h.render(&view);
        assert!(screen.contains("17.3 MB"));
        assert!(screen.contains("10 GB"));
    }

    #[test]
    fn download_only_notifies() {
        let mut h = Harness::new();
        let mut view = StorageView::new();
        h.press(&mut view, KeyCode::Char('d'));
        assert_eq!(h.toast(), Some(DOWNLOADING));
        assert_eq!(
            h.notifier.current(h.now).map(|n| n.tone),
            Some(crate::notify::Tone::Info)
        );
        assert_eq!(view.list.len(), 4);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut h = Harness::new();
        let mut view = StorageView::new();
        h.press(&mut view, KeyCode::Down);
        h.press(&mut view, KeyCode::Char('x'));
        assert_eq!(view.pending_delete(), Some("f2"));
        assert!(h.render(&view).contains("Therapy_Plan_Jane_Smith.pdf"));
        h.press(&mut view, KeyCode::Char('n'));
        assert_eq!(view.list.len(), 4);
        assert!(view.pending_delete().is_none());

        h.press(&mut view, KeyCode::Char('x'));
        h.press(&mut view, KeyCode::Char('y'));
        assert_eq!(view.list.len(), 3);
        assert!(view.list.items().iter().all(|f| f.id != "f2"));
        assert_eq!(h.toast(), Some(DELETED));
    }

    #[test]
    fn upload_records_uploader_and_date() {
        let mut h = Harness::new();
        let mut view = StorageView::new();
        h.press(&mut view, KeyCode::Char('n'));
        h.type_text(&mut view, "Scan.png");
        for _ in 0..4 {
            h.press(&mut view, KeyCode::Tab);
        }
        h.type_text(&mut view, "1 GB");
        h.press(&mut view, KeyCode::Enter);

        assert_eq!(h.toast(), Some(UPLOADED));
        let added = view.list.items().last().unwrap();
        assert_eq!(added.uploaded_by, "Dr. Sarah Smith");
        assert_eq!(added.upload_date, h.today);
        assert_eq!(view.summary().files, 5);
    }
}
