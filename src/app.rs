//! The shell: owns the router, the toast, the theme and every collection
//! that outlives a tab switch, and routes keys between them.

use crate::config::Config;
use crate::model::{ChatMessage, ClientDirectory, TaskList};
use crate::notify::NotificationChannel;
use crate::router::{Router, Tab};
use crate::seed;
use crate::theme::ThemeContext;
use crate::views::{ActiveView, DrawContext, ViewContext, ViewRequest};
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::{info, warn};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ShellError {
    #[error("theme context must be provided before building the shell")]
    ThemeNotInitialized,
}

pub struct Shell {
    router: Router,
    notifier: NotificationChannel,
    theme: ThemeContext,
    clients: ClientDirectory,
    tasks: TaskList,
    chat: Vec<ChatMessage>,
    config: Config,
}

#[derive(Default)]
pub struct ShellBuilder {
    theme: Option<ThemeContext>,
    config: Option<Config>,
    initial_tab: Option<String>,
}

impl ShellBuilder {
    pub fn new() -> Self {
        ShellBuilder::default()
    }

    pub fn theme(mut self, theme: ThemeContext) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn initial_tab(mut self, id: impl Into<String>) -> Self {
        self.initial_tab = Some(id.into());
        self
    }

    pub fn build(self) -> Result<Shell, ShellError> {
        let theme = self.theme.ok_or(ShellError::ThemeNotInitialized)?;
        let config = self.config.unwrap_or_default();
        let router = match self.initial_tab.as_deref() {
            Some(id) => {
                let mut router = Router::default();
                router.select_id(id);
                router
            }
            None => Router::new(Tab::Dashboard),
        };
        Ok(Shell {
            router,
            notifier: NotificationChannel::new(config.notification_timeout()),
            theme,
            clients: ClientDirectory::new(seed::clients()),
            tasks: TaskList::new(seed::tasks()),
            chat: seed::chat_history(),
            config,
        })
    }
}

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Shell {
    pub fn tab(&self) -> Option<Tab> {
        self.router.tab()
    }

    pub fn view(&self) -> Option<&ActiveView> {
        self.router.view()
    }

    pub fn notifier(&self) -> &NotificationChannel {
        &self.notifier
    }

    #[cfg(test)]
    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    #[cfg(test)]
    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn select(&mut self, tab: Tab) {
        self.router.select(tab);
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Runs `f` against the mounted view with the shell's state lent out.
    fn with_view<R>(
        &mut self,
        now: Instant,
        f: impl FnOnce(&mut ActiveView, &mut ViewContext<'_>) -> R,
    ) -> Option<R> {
        let view = self.router.view_mut()?;
        let mut ctx = ViewContext {
            notifier: &mut self.notifier,
            clients: &mut self.clients,
            tasks: &mut self.tasks,
            chat: &mut self.chat,
            config: &self.config,
            now,
            today: Self::today(),
        };
        Some(f(view, &mut ctx))
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        let captured = self.view().is_some_and(ActiveView::captures_input);
        if !captured {
            match key.code {
                KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Char('T') => {
                    self.toggle_theme(now);
                    return Flow::Continue;
                }
                KeyCode::Tab => {
                    let next = self.tab().map(|t| t.next()).unwrap_or(Tab::Dashboard);
                    self.select(next);
                    return Flow::Continue;
                }
                KeyCode::BackTab => {
                    let prev = self.tab().map(|t| t.prev()).unwrap_or(Tab::Dashboard);
                    self.select(prev);
                    return Flow::Continue;
                }
                KeyCode::Esc if self.notifier.is_showing() => {
                    self.notifier.dismiss();
                    return Flow::Continue;
                }
                KeyCode::Char(c) => {
                    if let Some(tab) = Tab::from_hotkey(c) {
                        self.select(tab);
                        return Flow::Continue;
                    }
                }
                _ => {}
            }
        }
        let request = self
            .with_view(now, |view, ctx| view.handle_key(key, ctx))
            .unwrap_or(ViewRequest::None);
        self.apply(request, now);
        Flow::Continue
    }

    fn apply(&mut self, request: ViewRequest, now: Instant) {
        match request {
            ViewRequest::None => {}
            ViewRequest::Navigate(tab) => self.select(tab),
            ViewRequest::ToggleTheme => self.toggle_theme(now),
        }
    }

    pub fn toggle_theme(&mut self, now: Instant) {
        match self.theme.toggle() {
            Ok(dark) => {
                let mode = if dark { "dark" } else { "light" };
                self.notifier.info(format!("Switched to {} mode", mode), now);
            }
            Err(err) => {
                warn!(
                    error = %err,
                    location = %self.theme.location(),
                    "Theme preference not saved"
                );
                self.notifier
                    .failure(format!("Could not save theme preference: {}", err), now);
            }
        }
    }

    /// Expires the toast and lets the mounted view fire due work.
    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
        let before = self.chat.len();
        self.with_view(now, |view, ctx| view.tick(ctx));
        if self.chat.len() != before {
            info!(messages = self.chat.len(), "Chat history updated");
        }
    }

    pub fn draw_context(&self) -> DrawContext<'_> {
        DrawContext {
            palette: self.theme.palette(),
            dark_mode: self.theme.dark_mode(),
            clients: &self.clients,
            tasks: &self.tasks,
            chat: &self.chat,
            config: &self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::Filter;
    use crate::model::InvoiceStatus;
    use crate::storage::{MemoryBackend, PreferenceStore};
    use crate::views::testing::key;
    use std::time::Duration;

    fn shell() -> Shell {
        let theme = ThemeContext::new(PreferenceStore::load(Box::new(MemoryBackend::default())));
        ShellBuilder::new().theme(theme).build().unwrap()
    }

    fn press(shell: &mut Shell, code: KeyCode, now: Instant) -> Flow {
        shell.handle_key(key(code), now)
    }

    fn type_text(shell: &mut Shell, text: &str, now: Instant) {
        for c in text.chars() {
            press(shell, KeyCode::Char(c), now);
        }
    }

    #[test]
    fn building_without_theme_is_a_configuration_error() {
        let result = ShellBuilder::new().config(Config::default()).build();
        assert!(matches!(result, Err(ShellError::ThemeNotInitialized)));
    }

    #[test]
    fn unknown_initial_tab_mounts_nothing() {
        let theme = ThemeContext::new(PreferenceStore::load(Box::new(MemoryBackend::default())));
        let shell = ShellBuilder::new()
            .theme(theme)
            .initial_tab("billing")
            .build()
            .unwrap();
        assert!(shell.tab().is_none());
        assert!(shell.view().is_none());
    }

    #[test]
    fn hotkeys_switch_tabs() {
        let now = Instant::now();
        let mut shell = shell();
        assert_eq!(shell.tab(), Some(Tab::Dashboard));
        press(&mut shell, KeyCode::Char('4'), now);
        assert_eq!(shell.tab(), Some(Tab::Invoices));
        press(&mut shell, KeyCode::Tab, now);
        assert_eq!(shell.tab(), Some(Tab::Incidents));
        press(&mut shell, KeyCode::BackTab, now);
        assert_eq!(shell.tab(), Some(Tab::Invoices));
        assert_eq!(press(&mut shell, KeyCode::Char('q'), now), Flow::Quit);
    }

    #[test]
    fn switching_tabs_resets_search_and_filter() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('4'), now);
        press(&mut shell, KeyCode::Char('f'), now);
        press(&mut shell, KeyCode::Char('/'), now);
        type_text(&mut shell, "john", now);
        press(&mut shell, KeyCode::Enter, now);
        match shell.view() {
            Some(ActiveView::Invoices(v)) => {
                assert_eq!(v.list.query.term, "john");
                assert_eq!(v.list.query.category, Filter::Only(InvoiceStatus::Paid));
            }
            other => panic!("unexpected view {:?}", other.is_some()),
        }

        press(&mut shell, KeyCode::Char('2'), now);
        press(&mut shell, KeyCode::Char('4'), now);
        match shell.view() {
            Some(ActiveView::Invoices(v)) => {
                assert!(v.list.query.term.is_empty());
                assert_eq!(v.list.query.category, Filter::All);
            }
            other => panic!("unexpected view {:?}", other.is_some()),
        }
    }

    #[test]
    fn per_view_records_reset_but_clients_persist() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('2'), now);
        press(&mut shell, KeyCode::Char('n'), now);
        type_text(&mut shell, "Mia Lee", now);
        press(&mut shell, KeyCode::Enter, now);
        assert_eq!(shell.draw_context().clients.len(), 4);

        press(&mut shell, KeyCode::Char('8'), now);
        press(&mut shell, KeyCode::Char('x'), now);
        press(&mut shell, KeyCode::Char('y'), now);
        press(&mut shell, KeyCode::Char('1'), now);
        press(&mut shell, KeyCode::Char('8'), now);
        match shell.view() {
            Some(ActiveView::Storage(v)) => assert_eq!(v.list.len(), 4),
            other => panic!("unexpected view {:?}", other.is_some()),
        }
        assert_eq!(shell.draw_context().clients.len(), 4);
    }

    #[test]
    fn typing_in_a_modal_does_not_trigger_hotkeys() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('9'), now);
        press(&mut shell, KeyCode::Char('n'), now);
        type_text(&mut shell, "q1T", now);
        assert_eq!(shell.tab(), Some(Tab::Tasks));
        assert!(shell.view().is_some_and(ActiveView::captures_input));
        assert_eq!(shell.theme().palette().name, "light");
    }

    #[test]
    fn toast_expires_on_tick() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('8'), now);
        press(&mut shell, KeyCode::Char('d'), now);
        assert!(shell.notifier().is_showing());
        shell.tick(now + Duration::from_millis(2999));
        assert!(shell.notifier().is_showing());
        shell.tick(now + Duration::from_millis(3000));
        assert!(!shell.notifier().is_showing());
    }

    #[test]
    fn esc_dismisses_the_toast() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('T'), now);
        assert!(shell.notifier().is_showing());
        press(&mut shell, KeyCode::Esc, now);
        assert!(!shell.notifier().is_showing());
    }

    #[test]
    fn theme_toggle_from_settings_and_hotkey() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('0'), now);
        press(&mut shell, KeyCode::Enter, now);
        assert!(shell.theme().dark_mode());
        assert_eq!(shell.theme().palette().name, "dark");
        press(&mut shell, KeyCode::Char('T'), now);
        assert!(!shell.theme().dark_mode());
    }

    #[test]
    fn failed_theme_save_notifies_failure() {
        let now = Instant::now();
        let theme = ThemeContext::new(PreferenceStore::load(Box::new(MemoryBackend::failing())));
        let mut shell = ShellBuilder::new().theme(theme).build().unwrap();
        press(&mut shell, KeyCode::Char('T'), now);
        let toast = shell.notifier().current(now).unwrap();
        assert_eq!(toast.tone, crate::notify::Tone::Failure);
        assert!(shell.theme().dark_mode());
    }

    #[test]
    fn settings_links_navigate() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('0'), now);
        for _ in 0..7 {
            press(&mut shell, KeyCode::Down, now);
        }
        press(&mut shell, KeyCode::Enter, now);
        assert_eq!(shell.tab(), Some(Tab::Chat));
    }

    #[test]
    fn chat_reply_fires_on_tick_and_is_dropped_when_leaving() {
        let now = Instant::now();
        let mut shell = shell();
        let start = shell.chat().len();

        shell.select(Tab::Chat);
        press(&mut shell, KeyCode::Enter, now);
        type_text(&mut shell, "max dose?", now);
        press(&mut shell, KeyCode::Enter, now);
        shell.tick(now + Duration::from_millis(1000));
        assert_eq!(shell.chat().len(), start + 2);

        type_text(&mut shell, "thanks", now);
        press(&mut shell, KeyCode::Enter, now);
        press(&mut shell, KeyCode::Esc, now);
        press(&mut shell, KeyCode::Char('1'), now);
        shell.tick(now + Duration::from_secs(10));
        assert_eq!(shell.chat().len(), start + 3);
    }

    #[test]
    fn tasks_are_shared_with_the_dashboard() {
        let now = Instant::now();
        let mut shell = shell();
        let pending = shell.tasks().pending_count();
        press(&mut shell, KeyCode::Char('9'), now);
        press(&mut shell, KeyCode::Char(' '), now);
        press(&mut shell, KeyCode::Char('1'), now);
        assert_eq!(shell.tasks().pending_count(), pending - 1);
    }

    #[test]
    fn ctrl_c_quits_even_inside_a_modal() {
        let now = Instant::now();
        let mut shell = shell();
        press(&mut shell, KeyCode::Char('2'), now);
        press(&mut shell, KeyCode::Char('n'), now);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(shell.handle_key(ctrl_c, now), Flow::Quit);
    }
}
