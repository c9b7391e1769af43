//! Interactive TUI (Terminal User Interface) for Querysmith.
//!
//! Provides a query builder with:
//! - The part list, with preset parts marked as locked
//! - Inline editing of part values with a live preview
//! - An operator picker filtered by category
//! - Preset cycling, theme and language toggles
//! - A natural-language prompt that runs generation in the background

use crate::app::App;
use crate::commands::generate::failure_message;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use querysmith_core::{Config, OperatorCategory, PartKind, RawPart, Theme};
use querysmith_generator::{GeneratorClient, GeneratorError};
use ratatui::{prelude::*, widgets::*};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// What keystrokes currently act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Navigating the part list
    Normal,
    /// Typing into the selected part
    Editing,
    /// Choosing an operator to append
    PickOperator,
    /// Typing a description for generation
    Prompt,
}

/// Result of a background generation request.
type Generation = Result<Vec<RawPart>, GeneratorError>;

/// An outstanding generation request.
struct Pending {
    prompt: String,
    rx: Receiver<Generation>,
}

/// TUI application state.
struct TuiApp {
    /// The main application
    app: App,

    mode: Mode,

    /// Selected part index
    selected: usize,

    /// Category filter in the operator picker (None = all)
    category: Option<OperatorCategory>,

    /// Selected operator in the picker
    operator_selected: usize,

    /// Generation prompt being typed
    prompt: String,

    /// The in-flight generation request, if any
    pending: Option<Pending>,

    /// Dismissible generation error
    error: Option<String>,

    /// Status message
    status_message: Option<String>,

    /// Animation counter for the progress indicator
    tick: usize,

    /// Whether we should quit
    should_quit: bool,
}

impl TuiApp {
    fn new(app: App) -> Self {
        let selected = app.composer.len().saturating_sub(1);
        TuiApp {
            app,
            mode: Mode::Normal,
            selected,
            category: None,
            operator_selected: 0,
            prompt: String::new(),
            pending: None,
            error: None,
            status_message: None,
            tick: 0,
            should_quit: false,
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.app.composer.len().saturating_sub(1));
    }

    fn select_last(&mut self) {
        self.selected = self.app.composer.len().saturating_sub(1);
    }

    /// Move selection up.
    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down.
    fn select_next(&mut self) {
        if self.selected + 1 < self.app.composer.len() {
            self.selected += 1;
        }
    }

    // === Part editing ===

    /// Start editing the selected part if its value can change.
    fn begin_edit(&mut self) {
        let editable = self
            .app
            .composer
            .parts()
            .get(self.selected)
            .is_some_and(|p| p.is_value_editable());

        if editable {
            self.mode = Mode::Editing;
            self.status_message = None;
        } else {
            self.status_message = Some(self.app.strings().locked.to_string());
        }
    }

    /// Apply a change to the selected part's value.
    fn edit_selected(&mut self, change: impl FnOnce(&mut String)) {
        let Some(part) = self.app.composer.parts().get(self.selected) else {
            return;
        };
        let id = part.id.clone();
        let mut value = part.value.clone();
        change(&mut value);
        self.app.composer.update_value(&id, value);
        self.app.save();
    }

    fn append_text(&mut self) {
        self.app.add_text(None);
        self.select_last();
        self.mode = Mode::Editing;
    }

    fn remove_selected(&mut self) {
        let Some(part) = self.app.composer.parts().get(self.selected) else {
            return;
        };
        let target = part.id.as_str().to_string();
        if let Err(e) = self.app.remove(&target) {
            self.status_message = Some(e.to_string());
        }
        self.clamp_selection();
    }

    // === Operator picker ===

    fn visible_operators(&self) -> Vec<Arc<querysmith_core::Operator>> {
        self.app
            .catalog
            .in_category(self.category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Step the category filter through "all" and each category.
    fn cycle_category(&mut self, forward: bool) {
        let all = &OperatorCategory::ALL;
        let pos = self
            .category
            .and_then(|c| all.iter().position(|x| *x == c));

        self.category = match (pos, forward) {
            (None, true) => all.first().copied(),
            (None, false) => all.last().copied(),
            (Some(i), true) => all.get(i + 1).copied(),
            (Some(0), false) => None,
            (Some(i), false) => all.get(i - 1).copied(),
        };
        self.operator_selected = 0;
    }

    fn pick_operator(&mut self) {
        let operators = self.visible_operators();
        let Some(op) = operators.get(self.operator_selected) else {
            return;
        };

        if let Err(e) = self.app.add_operator(&op.id, None) {
            self.status_message = Some(e.to_string());
            return;
        }

        self.select_last();
        // A fresh value-taking operator waits for its argument; one that
        // tagged existing text or needs no value returns to the list
        let needs_value = self
            .app
            .composer
            .parts()
            .last()
            .is_some_and(|p| p.is_value_editable() && p.value.is_empty() && !p.is_text());
        self.mode = if needs_value {
            Mode::Editing
        } else {
            Mode::Normal
        };
    }

    // === Generation ===

    fn begin_prompt(&mut self) {
        if self.pending.is_some() {
            self.status_message = Some(self.app.strings().busy_generating.to_string());
            return;
        }
        self.mode = Mode::Prompt;
    }

    /// Send the prompt to the generation service on a worker thread.
    fn submit_prompt(&mut self) {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return;
        }
        if self.pending.is_some() {
            self.status_message = Some(self.app.strings().busy_generating.to_string());
            return;
        }

        let client = match GeneratorClient::from_config(&self.app.config.generator) {
            Ok(client) => client,
            Err(e) => {
                self.error = Some(e.to_string());
                self.mode = Mode::Normal;
                return;
            }
        };

        let (tx, rx) = bounded(1);
        let catalog = self.app.catalog.clone();
        let worker_prompt = prompt.clone();
        thread::spawn(move || {
            let result = client.generate(&worker_prompt, &catalog);
            let _ = tx.send(result);
        });

        debug!("Generation started");
        self.pending = Some(Pending { prompt, rx });
        self.error = None;
        self.mode = Mode::Normal;
    }

    /// Collect a finished generation, if there is one.
    fn poll_generation(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };

        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("Generation worker exited without a result");
                self.pending = None;
                self.error = Some(self.app.strings().ai_error_body.to_string());
                return;
            }
        };

        let Some(pending) = self.pending.take() else {
            return;
        };
        match outcome {
            Ok(raw) => {
                self.app.import_generated(&raw, &pending.prompt);
                self.prompt.clear();
                self.select_last();
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                self.error = Some(failure_message(&self.app, &e).to_string());
            }
        }
    }

    // === Preferences and actions ===

    fn cycle_preset(&mut self) {
        self.app.cycle_preset();
        self.select_last();
    }

    fn reset(&mut self) {
        self.app.reset();
        self.selected = 0;
    }

    fn toggle_theme(&mut self) {
        let theme = self.app.prefs.theme.toggled();
        self.app.set_theme(theme);
    }

    fn toggle_language(&mut self) {
        let language = self.app.prefs.language.toggled();
        self.app.set_language(language);
        self.clamp_selection();
    }

    /// Open the current query in the browser.
    fn open_search(&mut self) {
        let Some(url) = self.app.url() else {
            return;
        };
        if let Err(e) = open::that(&url) {
            self.status_message = Some(format!("Could not open browser: {}", e));
        }
    }

    // === Input ===

    fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Normal => self.on_key_normal(code),
            Mode::Editing => match code {
                KeyCode::Enter | KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Backspace => self.edit_selected(|v| {
                    v.pop();
                }),
                KeyCode::Char(c) => self.edit_selected(|v| v.push(c)),
                _ => {}
            },
            Mode::PickOperator => match code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Left => self.cycle_category(false),
                KeyCode::Right | KeyCode::Tab => self.cycle_category(true),
                KeyCode::Up => self.operator_selected = self.operator_selected.saturating_sub(1),
                KeyCode::Down => {
                    if self.operator_selected + 1 < self.visible_operators().len() {
                        self.operator_selected += 1;
                    }
                }
                KeyCode::Enter => self.pick_operator(),
                _ => {}
            },
            Mode::Prompt => match code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Enter => self.submit_prompt(),
                KeyCode::Backspace => {
                    self.prompt.pop();
                }
                KeyCode::Char(c) => self.prompt.push(c),
                _ => {}
            },
        }
    }

    fn on_key_normal(&mut self, code: KeyCode) {
        if self.error.is_some() {
            // Any key dismisses the error banner
            self.error = None;
            return;
        }
        self.status_message = None;

        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('a') => self.append_text(),
            KeyCode::Char('o') => {
                self.mode = Mode::PickOperator;
                self.operator_selected = 0;
            }
            KeyCode::Delete | KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('p') => self.cycle_preset(),
            KeyCode::Char('g') => self.begin_prompt(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('l') => self.toggle_language(),
            KeyCode::Char('s') => self.open_search(),
            _ => {}
        }
    }
}

/// Run the TUI application.
pub fn run(config: Config) -> anyhow::Result<()> {
    let app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut tui_app = TuiApp::new(app);

    // Main loop
    let result = run_loop(&mut terminal, &mut tui_app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop.
fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut TuiApp) -> anyhow::Result<()> {
    loop {
        app.poll_generation();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code, key.modifiers);
                }
            }
        }

        app.tick = app.tick.wrapping_add(1);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

mod ui {
    use super::*;

    const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

    /// Colors for the current theme.
    struct Palette {
        accent: Color,
        locked: Color,
        muted: Color,
        highlight_bg: Color,
        highlight_fg: Color,
    }

    fn palette(theme: Theme) -> Palette {
        match theme {
            Theme::Light => Palette {
                accent: Color::Blue,
                locked: Color::Magenta,
                muted: Color::DarkGray,
                highlight_bg: Color::Blue,
                highlight_fg: Color::White,
            },
            Theme::Dark => Palette {
                accent: Color::Cyan,
                locked: Color::LightMagenta,
                muted: Color::Gray,
                highlight_bg: Color::Cyan,
                highlight_fg: Color::Black,
            },
        }
    }

    /// Draw the UI.
    pub fn draw(f: &mut Frame, app: &TuiApp) {
        let colors = palette(app.app.prefs.theme);

        let bottom_height = match app.mode {
            Mode::PickOperator => 12,
            Mode::Prompt => 3,
            _ => 0,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),             // Header
                Constraint::Min(6),                // Parts
                Constraint::Length(4),             // Preview
                Constraint::Length(bottom_height), // Picker or prompt
                Constraint::Length(2),             // Status bar
            ])
            .split(f.area());

        draw_header(f, app, &colors, chunks[0]);
        draw_parts(f, app, &colors, chunks[1]);
        draw_preview(f, app, &colors, chunks[2]);
        match app.mode {
            Mode::PickOperator => draw_picker(f, app, &colors, chunks[3]),
            Mode::Prompt => draw_prompt(f, app, &colors, chunks[3]),
            _ => {}
        }
        draw_status_bar(f, app, &colors, chunks[4]);

        if let Some(ref message) = app.error {
            draw_error(f, app, message);
        }
    }

    fn draw_header(f: &mut Frame, app: &TuiApp, colors: &Palette, area: Rect) {
        let strings = app.app.strings();
        let preset = app
            .app
            .composer
            .active_preset()
            .and_then(|id| app.app.presets.get(id))
            .map(|p| p.name.as_str())
            .unwrap_or(strings.standard_mode);

        let mut spans = vec![
            Span::styled(
                strings.app_title,
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(format!("{}: {}", strings.search_preset, preset)),
        ];
        if app.pending.is_some() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} {}", SPINNER[app.tick % SPINNER.len()], strings.generating),
                Style::default().fg(colors.accent),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_parts(f: &mut Frame, app: &TuiApp, colors: &Palette, area: Rect) {
        let strings = app.app.strings();
        let visible_height = area.height.saturating_sub(2) as usize;
        let scroll_offset = (app.selected + 1).saturating_sub(visible_height);

        let items: Vec<ListItem> = app
            .app
            .composer
            .parts()
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_height)
            .map(|(i, part)| {
                let editing = app.mode == Mode::Editing && i == app.selected;
                let value = if editing {
                    format!("{}_", part.value)
                } else if part.value.is_empty() && part.is_text() {
                    strings.enter_search_term.to_string()
                } else {
                    part.value.clone()
                };

                let label = match &part.kind {
                    PartKind::Text => String::new(),
                    PartKind::Operator(op) if op.takes_value => op.token.clone(),
                    PartKind::Operator(_) => String::new(),
                };

                let mut spans = vec![
                    Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(colors.muted)),
                    Span::styled(label, Style::default().fg(colors.accent)),
                    Span::raw(value),
                ];
                if part.locked {
                    spans.push(Span::styled(
                        format!("  [{}]", strings.locked),
                        Style::default().fg(colors.locked),
                    ));
                }

                let style = if i == app.selected {
                    Style::default()
                        .bg(colors.highlight_bg)
                        .fg(colors.highlight_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();

        let title = format!(" {} ({}) ", strings.query_builder, app.app.composer.len());
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(list, area);
    }

    fn draw_preview(f: &mut Frame, app: &TuiApp, colors: &Palette, area: Rect) {
        let strings = app.app.strings();
        let query = app.app.query();

        let lines = if query.is_empty() {
            vec![Line::styled(
                strings.query_placeholder,
                Style::default().fg(colors.muted),
            )]
        } else {
            vec![
                Line::styled(query, Style::default().add_modifier(Modifier::BOLD)),
                Line::styled(
                    app.app.url().unwrap_or_default(),
                    Style::default().fg(colors.muted),
                ),
            ]
        };

        let preview = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", strings.live_preview)),
            );
        f.render_widget(preview, area);
    }

    fn draw_picker(f: &mut Frame, app: &TuiApp, colors: &Palette, area: Rect) {
        let strings = app.app.strings();
        let category = app
            .category
            .map(|c| strings.category(c))
            .unwrap_or(strings.all_categories);

        let visible_height = area.height.saturating_sub(2) as usize;
        let scroll_offset = (app.operator_selected + 1).saturating_sub(visible_height);

        let items: Vec<ListItem> = app
            .visible_operators()
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_height)
            .map(|(i, op)| {
                let line = format!("{:<12} {}", op.token, op.description);
                let style = if i == app.operator_selected {
                    Style::default()
                        .bg(colors.highlight_bg)
                        .fg(colors.highlight_fg)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();

        let title = format!(" {} < {} > ", strings.operator_library, category);
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(list, area);
    }

    fn draw_prompt(f: &mut Frame, app: &TuiApp, colors: &Palette, area: Rect) {
        let strings = app.app.strings();

        let input = if app.prompt.is_empty() {
            Paragraph::new(strings.ai_prompt_placeholder).style(Style::default().fg(colors.muted))
        } else {
            Paragraph::new(app.prompt.as_str()).style(Style::default().fg(colors.accent))
        };
        let input = input.block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", strings.ai_assistant)),
        );
        f.render_widget(input, area);

        f.set_cursor_position(Position::new(
            area.x + app.prompt.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }

    fn draw_status_bar(f: &mut Frame, app: &TuiApp, colors: &Palette, area: Rect) {
        let status = if let Some(ref msg) = app.status_message {
            msg.clone()
        } else {
            match app.mode {
                Mode::Normal => format!(
                    "↑↓:Select Enter:Edit a:Text o:Operator d:Delete p:Preset g:AI s:{} r:{} t:Theme l:Lang q:Quit",
                    app.app.strings().search_action,
                    app.app.strings().reset,
                ),
                Mode::Editing => "Type to edit  Enter/Esc:Done".to_string(),
                Mode::PickOperator => "←→:Category ↑↓:Select Enter:Add Esc:Back".to_string(),
                Mode::Prompt => "Enter:Generate Esc:Cancel".to_string(),
            }
        };

        let status_bar = Paragraph::new(status).style(Style::default().fg(colors.muted));
        f.render_widget(status_bar, area);
    }

    /// Draw the generation error as a centered banner.
    fn draw_error(f: &mut Frame, app: &TuiApp, message: &str) {
        let area = f.area();
        let width = area.width.saturating_sub(8).min(72);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + area.height / 3,
            width,
            height: 5.min(area.height),
        };

        let banner = Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", app.app.strings().ai_error_title)),
            );
        f.render_widget(Clear, popup);
        f.render_widget(banner, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tui(dir: &TempDir) -> TuiApp {
        let mut config = Config::default();
        config.general.data_dir = Some(dir.path().to_path_buf());
        TuiApp::new(App::new(config).unwrap())
    }

    fn type_str(t: &mut TuiApp, s: &str) {
        for c in s.chars() {
            t.on_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_edit_updates_preview() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);

        t.on_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(t.mode, Mode::Editing);
        type_str(&mut t, "catz");
        t.on_key(KeyCode::Backspace, KeyModifiers::NONE);
        t.on_key(KeyCode::Char('s'), KeyModifiers::NONE);
        t.on_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(t.mode, Mode::Normal);
        assert_eq!(t.app.query(), "cats");
    }

    #[test]
    fn test_pick_value_operator_tags_text() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);
        t.app.add_text(Some("example.com"));

        t.on_key(KeyCode::Char('o'), KeyModifiers::NONE);
        assert_eq!(t.mode, Mode::PickOperator);
        let site = t
            .visible_operators()
            .iter()
            .position(|op| op.id == "site")
            .unwrap();
        t.operator_selected = site;
        t.on_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(t.mode, Mode::Normal);
        assert_eq!(t.app.query(), "site:example.com");
    }

    #[test]
    fn test_category_cycle_wraps_through_all() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);

        t.cycle_category(false);
        assert_eq!(t.category, Some(OperatorCategory::Advanced));
        t.cycle_category(true);
        assert_eq!(t.category, None);
        t.cycle_category(true);
        assert_eq!(t.category, Some(OperatorCategory::Basic));
        assert!(t
            .visible_operators()
            .iter()
            .all(|op| op.category == OperatorCategory::Basic));
    }

    #[test]
    fn test_locked_part_not_editable() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);
        t.on_key(KeyCode::Char('p'), KeyModifiers::NONE);
        assert!(t.app.composer.active_preset().is_some());

        t.selected = 0;
        t.on_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(t.mode, Mode::Normal);
        assert!(t.status_message.is_some());
    }

    #[test]
    fn test_error_banner_dismissed_by_key() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);
        t.error = Some("failed".to_string());

        t.on_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(t.error.is_none());
        assert!(!t.should_quit);
    }

    #[test]
    fn test_second_generation_rejected_while_pending() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);
        let (_tx, rx) = bounded(1);
        t.pending = Some(Pending {
            prompt: "first".to_string(),
            rx,
        });

        t.on_key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(t.mode, Mode::Normal);
        assert_eq!(
            t.status_message.as_deref(),
            Some(t.app.strings().busy_generating)
        );
    }

    #[test]
    fn test_finished_generation_imported() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);
        let (tx, rx) = bounded(1);
        t.pending = Some(Pending {
            prompt: "rust books".to_string(),
            rx,
        });

        tx.send(Ok(vec![RawPart::operator("intitle", "rust")]))
            .unwrap();
        t.poll_generation();

        assert!(t.pending.is_none());
        assert_eq!(t.app.query(), "intitle:rust");
    }

    #[test]
    fn test_failed_generation_keeps_query() {
        let dir = TempDir::new().unwrap();
        let mut t = tui(&dir);
        t.app.add_text(Some("cats"));
        let (tx, rx) = bounded(1);
        t.pending = Some(Pending {
            prompt: "dogs".to_string(),
            rx,
        });

        tx.send(Err(GeneratorError::Timeout {
            attempts: 4,
            timeout_ms: 30_000,
        }))
        .unwrap();
        t.poll_generation();

        assert_eq!(t.app.query(), "cats");
        assert_eq!(t.error.as_deref(), Some(t.app.strings().ai_timeout));
    }
}
