//! Interactive history browser
//!
//! Full-screen list of past sessions with a detail pane:
//! - Browse sessions, most recent first
//! - Filter by voice, request, or content
//! - Load a session into the workspace
//! - Clear the whole history

use crate::error::Result;
use crate::history::{preview_text, HistoryItem};
use crate::types::HistoryId;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

/// What the user chose when leaving the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseOutcome {
    /// Load the session with this id
    Load(HistoryId),
    /// Clear the history (confirmed with a second keypress)
    Clear,
    /// Leave without changes
    Quit,
}

/// Browser state
pub struct HistoryBrowser {
    items: Vec<HistoryItem>,
    selected: usize,
    list_state: ListState,
    filter: String,
    filtering: bool,
    filtered_indices: Vec<usize>,
    confirm_clear: bool,
    preview_chars: usize,
    outcome: Option<BrowseOutcome>,
    show_help: bool,
}

impl HistoryBrowser {
    pub fn new(items: Vec<HistoryItem>, preview_chars: usize) -> Self {
        let filtered_indices: Vec<usize> = (0..items.len()).collect();
        let mut ui = Self {
            items,
            selected: 0,
            list_state: ListState::default(),
            filter: String::new(),
            filtering: false,
            filtered_indices,
            confirm_clear: false,
            preview_chars,
            outcome: None,
            show_help: false,
        };
        ui.list_state.select(Some(0));
        ui
    }

    fn update_filter(&mut self) {
        let filter_lower = self.filter.to_lowercase();
        self.filtered_indices = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                filter_lower.is_empty()
                    || item.brand_voice.to_lowercase().contains(&filter_lower)
                    || item.content_request.to_lowercase().contains(&filter_lower)
                    || item.generated_content.to_lowercase().contains(&filter_lower)
            })
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    fn select_previous(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.selected = self.selected.saturating_sub(1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn select_next(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered_indices.len() - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    fn current(&self) -> Option<&HistoryItem> {
        self.filtered_indices
            .get(self.selected)
            .and_then(|&idx| self.items.get(idx))
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.outcome = Some(BrowseOutcome::Quit);
            return;
        }

        if self.filtering {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.filtering = false,
                KeyCode::Backspace => {
                    self.filter.pop();
                    self.update_filter();
                }
                KeyCode::Char(c) => {
                    self.filter.push(c);
                    self.update_filter();
                }
                _ => {}
            }
            return;
        }

        // Any key other than a second 'x' cancels a pending clear
        let pending_clear = std::mem::take(&mut self.confirm_clear);

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.outcome = Some(BrowseOutcome::Quit),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('/') => {
                self.filtering = true;
                self.filter.clear();
                self.update_filter();
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                if let Some(item) = self.current() {
                    self.outcome = Some(BrowseOutcome::Load(item.id));
                }
            }
            KeyCode::Char('x') => {
                if pending_clear {
                    self.outcome = Some(BrowseOutcome::Clear);
                } else {
                    self.confirm_clear = true;
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),      // Header
                Constraint::Percentage(45), // List
                Constraint::Min(6),         // Details or help
            ])
            .split(frame.area());

        // Header
        let title = if self.confirm_clear {
            "Press x again to clear ALL history, any other key to cancel".to_string()
        } else if self.filtering || !self.filter.is_empty() {
            format!(
                "History - Filter: {} ({} matches)",
                self.filter,
                self.filtered_indices.len()
            )
        } else {
            format!("History ({} sessions)  ? for help", self.items.len())
        };
        let header_style = if self.confirm_clear {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let header = Paragraph::new(title)
            .block(Block::default().borders(Borders::ALL))
            .style(header_style);
        frame.render_widget(header, chunks[0]);

        // Session list
        let preview_chars = self.preview_chars;
        let items: Vec<ListItem> = self
            .filtered_indices
            .iter()
            .map(|&idx| {
                let item = &self.items[idx];
                let line = Line::from(vec![
                    Span::styled(
                        format!("{} ", item.formatted_timestamp()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        preview_text(&item.content_request, preview_chars),
                        Style::default().fg(Color::White),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Sessions"))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        if self.show_help {
            let help_text = [
                "Keybindings:",
                "",
                "  ↑/k       - Move up",
                "  ↓/j       - Move down",
                "  Enter/l   - Load session into workspace",
                "  /         - Filter (Enter/Esc to finish)",
                "  x x       - Clear all history",
                "  ?/F1      - Toggle help",
                "  q/Esc     - Quit",
            ];
            let help = Paragraph::new(help_text.join("\n"))
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: false });
            frame.render_widget(help, chunks[2]);
        } else if let Some(item) = self.current() {
            let details = format!(
                "Id: {}\nVoice: {}\nRequest: {}\n\n{}",
                item.id, item.brand_voice, item.content_request, item.generated_content
            );
            let details_widget = Paragraph::new(details)
                .block(Block::default().borders(Borders::ALL).title("Details"))
                .style(Style::default().fg(Color::Green))
                .wrap(Wrap { trim: false });
            frame.render_widget(details_widget, chunks[2]);
        }
    }

    pub fn outcome(&self) -> BrowseOutcome {
        self.outcome.unwrap_or(BrowseOutcome::Quit)
    }
}

/// Run the browser and return what the user chose
pub fn run_history_browser(items: Vec<HistoryItem>, preview_chars: usize) -> Result<BrowseOutcome> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = HistoryBrowser::new(items, preview_chars);

    // Main event loop
    let result = (|| -> Result<()> {
        while ui.outcome.is_none() {
            terminal.draw(|f| ui.render(f))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    ui.handle_key(key);
                }
            }
        }
        Ok(())
    })();

    // Always restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(ui.outcome())
}
