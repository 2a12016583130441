use super::{draw_form, header_and_body, panel, DrawContext, View, ViewContext, ViewRequest};
use crate::form::{ChoiceOption, Field, Form, FormError, FormInput, Modal};
use crate::model::{generate_id, Priority, Task};
use chrono::NaiveTime;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub const ADDED: &str = "Task added";

/// Shift to-do list. The tasks themselves belong to the shell.
#[derive(Debug, Default)]
pub struct TasksView {
    selected: usize,
    modal: Modal,
}

fn task_form() -> Form {
    let mut form = Form::new(
        "Add Task",
        vec![
            Field::text("room", "Patient / Room"),
            Field::text("description", "Task"),
            Field::choice(
                "priority",
                "Priority",
                Priority::ALL
                    .iter()
                    .map(|p| ChoiceOption::plain(p.label()))
                    .collect(),
            ),
            Field::text("due", "Due (HH:MM)"),
        ],
    );
    form.select("priority", 2);
    form
}

fn build_task(form: &Form, default_due: NaiveTime) -> Result<Task, FormError> {
    Ok(Task {
        id: generate_id(),
        patient_room: form.text("room").to_string(),
        description: form.text("description").to_string(),
        priority: Priority::ALL
            .get(form.choice_index("priority"))
            .copied()
            .unwrap_or(Priority::Routine),
        completed: false,
        due_time: form.time("due", default_due)?,
    })
}

impl TasksView {
    fn selected_id(&self, ctx: &ViewContext<'_>) -> Option<String> {
        if ctx.tasks.is_empty() {
            return None;
        }
        let all = ctx.tasks.all();
        all.get(self.selected.min(all.len() - 1)).map(|t| t.id.clone())
    }

    fn submit(&mut self, ctx: &mut ViewContext<'_>) {
        let ready = self
            .modal
            .form()
            .is_some_and(|f| !f.text("room").is_empty() && !f.text("description").is_empty());
        if !ready {
            return;
        }
        let default_due = chrono::Local::now().time();
        self.modal
            .submit(ctx.tasks, ctx.notifier, ctx.now, ADDED, |form: &Form| {
                build_task(form, default_due)
            });
    }
}

impl View for TasksView {
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if let Some(form) = self.modal.form_mut() {
            match form.handle_key(key) {
                FormInput::Submit => self.submit(ctx),
                FormInput::Cancel => self.modal.cancel(),
                FormInput::Editing => {}
            }
            return ViewRequest::None;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let len = ctx.tasks.all().len();
                self.selected = (self.selected + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Char('n') => self.modal.open(task_form()),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id(ctx) {
                    ctx.tasks.toggle(&id);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_id(ctx) {
                    ctx.tasks.remove(&id);
                }
            }
            _ => {}
        }
        ViewRequest::None
    }

    fn captures_input(&self) -> bool {
        self.modal.is_open()
    }

    fn help(&self) -> &'static str {
        "↑↓ select • Space toggle done • x remove • n add task"
    }

    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &DrawContext<'_>) {
        let palette = ctx.palette;
        let (header, body) = header_and_body(area, 3);
        let pending = ctx.tasks.pending_count();
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Pending: ", palette.muted()),
                Span::styled(pending.to_string(), palette.accent(palette.warning)),
                Span::styled(
                    format!("   Done: {}", ctx.tasks.all().len() - pending),
                    palette.muted(),
                ),
            ]))
            .block(panel("Shift Tasks", palette)),
            header,
        );

        let items: Vec<ListItem> = ctx
            .tasks
            .all()
            .iter()
            .map(|task| {
                let check = if task.completed { "[x]" } else { "[ ]" };
                let priority_color = match task.priority {
                    Priority::Stat => palette.error,
                    Priority::Urgent => palette.warning,
                    Priority::Routine => palette.info,
                };
                let text_style = if task.completed {
                    palette.muted()
                } else {
                    ratatui::style::Style::default().fg(palette.text)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", check), text_style),
                    Span::styled(
                        format!("{:<8}", task.priority.label()),
                        palette.accent(priority_color),
                    ),
                    Span::styled(format!("Rm {} ", task.patient_room), palette.title()),
                    Span::styled(task.description.clone(), text_style),
                    Span::styled(
                        format!("  due {}", task.due_time.format("%H:%M")),
                        palette.muted(),
                    ),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(if items.is_empty() {
            None
        } else {
            Some(self.selected.min(items.len() - 1))
        });
        let list = List::new(items)
            .block(panel("To Do", palette))
            .highlight_style(palette.selected());
        f.render_stateful_widget(list, body, &mut state);

        if let Some(form) = self.modal.form() {
            draw_form(f, form, palette, None);
        }
    }
}
