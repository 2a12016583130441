//! Light and dark palettes plus the context that keeps the active one in
//! step with the persisted preference.

use crate::storage::{PreferenceError, PreferenceStore};
use ratatui::style::{Color, Modifier, Style};
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub background: Color,
    pub paper: Color,
    pub text: Color,
    pub text_muted: Color,
    pub divider: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

pub static LIGHT: ThemePalette = ThemePalette {
    name: "light",
    primary: Color::Rgb(15, 23, 42),
    secondary: Color::Rgb(100, 116, 139),
    success: Color::Rgb(22, 163, 74),
    warning: Color::Rgb(217, 119, 6),
    error: Color::Rgb(220, 38, 38),
    info: Color::Rgb(2, 132, 199),
    background: Color::Rgb(248, 250, 252),
    paper: Color::Rgb(255, 255, 255),
    text: Color::Rgb(15, 23, 42),
    text_muted: Color::Rgb(100, 116, 139),
    divider: Color::Rgb(226, 232, 240),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(15, 23, 42),
};

pub static DARK: ThemePalette = ThemePalette {
    name: "dark",
    primary: Color::Rgb(248, 250, 252),
    secondary: Color::Rgb(148, 163, 184),
    success: Color::Rgb(34, 197, 94),
    warning: Color::Rgb(245, 158, 11),
    error: Color::Rgb(239, 68, 68),
    info: Color::Rgb(14, 165, 233),
    background: Color::Rgb(15, 23, 42),
    paper: Color::Rgb(30, 41, 59),
    text: Color::Rgb(248, 250, 252),
    text_muted: Color::Rgb(148, 163, 184),
    divider: Color::Rgb(51, 65, 85),
    highlight_fg: Color::Rgb(15, 23, 42),
    highlight_bg: Color::Rgb(248, 250, 252),
};

pub fn resolve_theme(dark_mode: bool) -> &'static ThemePalette {
    if dark_mode {
        &DARK
    } else {
        &LIGHT
    }
}

impl ThemePalette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.paper)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.divider)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

/// Preference store plus the palette it currently selects. Handed to the
/// shell at construction; nothing looks it up globally.
pub struct ThemeContext {
    preferences: PreferenceStore,
    palette: &'static ThemePalette,
}

impl ThemeContext {
    pub fn new(preferences: PreferenceStore) -> Self {
        let palette = resolve_theme(preferences.dark_mode());
        ThemeContext {
            preferences,
            palette,
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    pub fn palette(&self) -> &'static ThemePalette {
        self.palette
    }

    pub fn location(&self) -> String {
        self.preferences.location()
    }

    /// The palette follows the in-memory flag even when saving fails.
    pub fn toggle(&mut self) -> Result<bool, PreferenceError> {
        let result = self.preferences.toggle();
        let dark_mode = self.preferences.dark_mode();
        if self.palette.name != resolve_theme(dark_mode).name {
            self.palette = resolve_theme(dark_mode);
            info!(theme = self.palette.name, "Theme switched");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn resolves_exactly_two_static_palettes() {
        assert!(std::ptr::eq(resolve_theme(false), &LIGHT));
        assert!(std::ptr::eq(resolve_theme(true), &DARK));
        assert!(std::ptr::eq(resolve_theme(true), resolve_theme(true)));
        assert_ne!(LIGHT, DARK);
    }

    #[test]
    fn context_tracks_toggles() {
        let store = PreferenceStore::load(Box::new(MemoryBackend::default()));
        let mut theme = ThemeContext::new(store);
        assert_eq!(theme.palette().name, "light");
        assert!(theme.toggle().unwrap());
        assert_eq!(theme.palette().name, "dark");
        assert!(!theme.toggle().unwrap());
        assert_eq!(theme.palette().name, "light");
    }

    #[test]
    fn palette_switches_even_when_save_fails() {
        let store = PreferenceStore::load(Box::new(MemoryBackend::failing()));
        let mut theme = ThemeContext::new(store);
        assert!(theme.toggle().is_err());
        assert!(theme.dark_mode());
        assert_eq!(theme.palette().name, "dark");
    }
}
