use crate::app::{Flow, Shell};
use crate::notify::Tone;
use crate::router::Tab;
use crate::theme::ThemePalette;
use crate::views::panel;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{stdout, Stdout};
use std::time::Instant;
use tracing::info;

pub fn run(mut shell: Shell) -> Result<()> {
    let mut terminal = setup_terminal()?;
    info!(tab = ?shell.tab(), "Dashboard started");
    let result = event_loop(&mut shell, &mut terminal);
    teardown_terminal(&mut terminal)?;
    info!("Dashboard closed");
    result
}

fn event_loop(shell: &mut Shell, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let tick_rate = shell.config().tick_rate();
    loop {
        terminal.draw(|f| draw(f, shell))?;
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if shell.handle_key(key, Instant::now()) == Flow::Quit {
                    break;
                }
            }
        }
        shell.tick(Instant::now());
    }
    Ok(())
}

pub fn draw(f: &mut Frame<'_>, shell: &Shell) {
    let ctx = shell.draw_context();
    let palette = ctx.palette;
    f.render_widget(Block::default().style(palette.base()), f.size());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(f.size());

    draw_header(f, layout[0], shell.tab(), palette);
    match shell.view() {
        Some(view) => view.draw(f, layout[1], &ctx),
        None => draw_unmounted(f, layout[1], palette),
    }
    draw_footer(f, layout[2], shell, palette);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, active: Option<Tab>, palette: &ThemePalette) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| match tab.hotkey() {
            Some(key) => Line::from(vec![
                Span::styled(key.to_string(), palette.accent(palette.info)),
                Span::raw(" "),
                Span::raw(tab.label()),
            ]),
            None => Line::from(tab.label()),
        })
        .collect();
    let selected = active
        .and_then(|tab| Tab::ALL.iter().position(|t| *t == tab))
        .unwrap_or(0);
    let mut tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(palette.border())
                .title(Span::styled("carepanel", palette.accent(palette.primary))),
        )
        .style(palette.muted())
        .divider(Span::styled("│", palette.border()));
    if active.is_some() {
        tabs = tabs.select(selected).highlight_style(palette.selected());
    }
    f.render_widget(tabs, area);
}

fn draw_unmounted(f: &mut Frame<'_>, area: Rect, palette: &ThemePalette) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Nothing to show for this tab. Press 1 for the dashboard.",
        palette.muted(),
    )))
    .alignment(Alignment::Center)
    .block(panel("", palette));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, shell: &Shell, palette: &ThemePalette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let help_bar = Paragraph::new(footer_help_line(shell, palette))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(palette.border()),
        );
    f.render_widget(help_bar, rows[0]);

    let status = match shell.notifier().current(Instant::now()) {
        Some(toast) => {
            let color = match toast.tone {
                Tone::Success => palette.success,
                Tone::Failure => palette.error,
                Tone::Info => palette.info,
            };
            Line::from(Span::styled(toast.message.clone(), palette.accent(color)))
        }
        None => Line::from(Span::styled(
            format!(
                "{} • {} pending tasks • {} theme",
                shell.config().current_user,
                shell.tasks().pending_count(),
                palette.name
            ),
            palette.muted(),
        )),
    };
    let status = Paragraph::new(status).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(palette.border()),
    );
    f.render_widget(status, rows[1]);
}

fn footer_help_line(shell: &Shell, palette: &ThemePalette) -> Line<'static> {
    let key = palette.accent(palette.info);
    let mut spans = Vec::new();
    match shell.view() {
        Some(view) if view.captures_input() => {
            spans.push(Span::raw(view.help()));
            spans.push(Span::raw("  "));
            spans.push(Span::styled("Ctrl+C", palette.accent(palette.error)));
            spans.push(Span::raw(" quit"));
        }
        view => {
            spans.extend([
                Span::styled("0-9", key),
                Span::raw(" tabs  "),
                Span::styled("Tab", key),
                Span::raw(" cycle  "),
                Span::styled("T", key),
                Span::raw(" theme  "),
            ]);
            if let Some(view) = view {
                spans.push(Span::raw(view.help()));
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled("q", palette.accent(palette.error)));
            spans.push(Span::raw(" quit"));
        }
    }
    Line::from(spans)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ShellBuilder;
    use crate::storage::{MemoryBackend, PreferenceStore};
    use crate::theme::ThemeContext;
    use crate::views::testing::key;
    use crossterm::event::KeyCode;
    use ratatui::backend::TestBackend;

    fn shell(tab: &str) -> Shell {
        let theme = ThemeContext::new(PreferenceStore::load(Box::new(MemoryBackend::default())));
        ShellBuilder::new()
            .theme(theme)
            .initial_tab(tab)
            .build()
            .unwrap()
    }

    fn screen(shell: &Shell) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| draw(f, shell)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn every_tab_renders() {
        for tab in Tab::ALL {
            let shell = shell(tab.id());
            let screen = screen(&shell);
            assert!(screen.contains("carepanel"), "{}", tab.id());
            assert!(screen.contains("Dashboard"), "{}", tab.id());
        }
    }

    #[test]
    fn unknown_tab_leaves_an_empty_pane() {
        let shell = shell("billing");
        assert!(screen(&shell).contains("Nothing to show for this tab"));
    }

    #[test]
    fn toast_replaces_the_status_line() {
        let mut shell = shell("dashboard");
        assert!(screen(&shell).contains("pending tasks"));
        shell.handle_key(key(KeyCode::Char('T')), Instant::now());
        let screen = screen(&shell);
        assert!(screen.contains("Switched to dark mode"));
        assert!(!screen.contains("pending tasks"));
    }

    #[test]
    fn modal_help_replaces_global_keys() {
        let mut shell = shell("clients");
        shell.handle_key(key(KeyCode::Char('n')), Instant::now());
        let screen = screen(&shell);
        assert!(screen.contains("Ctrl+C"));
        assert!(!screen.contains("0-9"));
    }
}
