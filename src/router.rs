use crate::views::ActiveView;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Clients,
    Staff,
    Invoices,
    Incidents,
    Appointments,
    Messages,
    Storage,
    Tasks,
    Chat,
    Sbar,
    Settings,
}

impl Tab {
    pub const ALL: &'static [Tab] = &[
        Tab::Dashboard,
        Tab::Clients,
        Tab::Staff,
        Tab::Invoices,
        Tab::Incidents,
        Tab::Appointments,
        Tab::Messages,
        Tab::Storage,
        Tab::Tasks,
        Tab::Chat,
        Tab::Sbar,
        Tab::Settings,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Clients => "clients",
            Tab::Staff => "staff",
            Tab::Invoices => "invoices",
            Tab::Incidents => "incidents",
            Tab::Appointments => "appointments",
            Tab::Messages => "messages",
            Tab::Storage => "storage",
            Tab::Tasks => "tasks",
            Tab::Chat => "chat",
            Tab::Sbar => "sbar",
            Tab::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Clients => "Clients",
            Tab::Staff => "Staff",
            Tab::Invoices => "Invoices",
            Tab::Incidents => "Incidents",
            Tab::Appointments => "Appointments",
            Tab::Messages => "Messages",
            Tab::Storage => "Storage",
            Tab::Tasks => "Tasks",
            Tab::Chat => "Ask AI",
            Tab::Sbar => "SBAR",
            Tab::Settings => "Settings",
        }
    }

    pub fn from_id(id: &str) -> Option<Tab> {
        Tab::ALL.iter().copied().find(|t| t.id() == id)
    }

    /// Chat and SBAR have no digit; they are reached from Settings or by
    /// cycling.
    pub fn hotkey(&self) -> Option<char> {
        match self {
            Tab::Dashboard => Some('1'),
            Tab::Clients => Some('2'),
            Tab::Staff => Some('3'),
            Tab::Invoices => Some('4'),
            Tab::Incidents => Some('5'),
            Tab::Appointments => Some('6'),
            Tab::Messages => Some('7'),
            Tab::Storage => Some('8'),
            Tab::Tasks => Some('9'),
            Tab::Settings => Some('0'),
            Tab::Chat | Tab::Sbar => None,
        }
    }

    pub fn from_hotkey(c: char) -> Option<Tab> {
        Tab::ALL.iter().copied().find(|t| t.hotkey() == Some(c))
    }

    pub fn next(&self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Exactly one mounted view, or none after an unknown id.
#[derive(Debug, Default)]
pub struct Router {
    active: Option<(Tab, ActiveView)>,
}

impl Router {
    pub fn new(tab: Tab) -> Self {
        let mut router = Router::default();
        router.select(tab);
        router
    }

    /// Mounts a fresh view even when `tab` is already active.
    pub fn select(&mut self, tab: Tab) {
        info!(tab = tab.id(), "Switching tab");
        self.active = Some((tab, ActiveView::mount(tab)));
    }

    pub fn select_id(&mut self, id: &str) -> Option<Tab> {
        match Tab::from_id(id) {
            Some(tab) => {
                self.select(tab);
                Some(tab)
            }
            None => {
                warn!(tab = id, "Unknown tab");
                self.active = None;
                None
            }
        }
    }

    pub fn tab(&self) -> Option<Tab> {
        self.active.as_ref().map(|(tab, _)| *tab)
    }

    pub fn view(&self) -> Option<&ActiveView> {
        self.active.as_ref().map(|(_, view)| view)
    }

    pub fn view_mut(&mut self) -> Option<&mut ActiveView> {
        self.active.as_mut().map(|(_, view)| view)
    }
}
