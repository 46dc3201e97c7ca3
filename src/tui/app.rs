//! TUI Application - Main entry point and run loop

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use super::events::{handle_key_event, poll_event, Action};
use super::state::AppState;
use super::theme::{icons, EditorTheme};
use crate::binding::{extract_refs, resolve_path};
use crate::config::BinderyConfig;
use crate::editor::{EditorProps, Focus, PopupState};
use crate::index::suggest::preview;
use crate::index::TreeIndex;

/// Longest wait between redraws when no timer is pending
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Widest the suggestion popup gets
const POPUP_WIDTH: u16 = 56;

/// TUI Application
pub struct TuiApp {
    state: AppState,
    theme: EditorTheme,
}

impl TuiApp {
    pub fn new(props: EditorProps, config: &BinderyConfig, data_label: impl Into<String>) -> Self {
        Self {
            state: AppState::new(props, config, data_label),
            theme: EditorTheme::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run until quit; returns the last value emitted by the editor
    pub async fn run(mut self) -> anyhow::Result<String> {
        let mut terminal = self.setup_terminal()?;

        let result = self.main_loop(&mut terminal).await;

        // Restore even when the loop failed
        self.restore_terminal(&mut terminal)?;

        result.map(|()| self.state.committed_value())
    }

    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            // Wake up no later than the debounce deadline
            let timeout = self.poll_timeout(Instant::now());
            if let Some(key) = poll_event(timeout)? {
                self.handle_action(handle_key_event(key), Instant::now());
            }
            self.state.session.poll_timer(Instant::now());

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// How long the loop may block waiting for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.state.session.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_TICK),
            None => IDLE_TICK,
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => {
                self.state.session.unmount();
                self.state.should_quit = true;
            }
            Action::Edit(event) => {
                self.state.session.handle(event, now);
            }
            Action::None => {}
        }
    }

    /// Render the UI
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(6),    // Input | Explorer
                Constraint::Length(5), // Preview
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, main_chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);

        self.render_input(frame, content_chunks[0]);
        self.render_explorer(frame, content_chunks[1]);
        self.render_preview(frame, main_chunks[2]);
        self.render_footer(frame, main_chunks[3]);

        // Popup last so it draws over the panels
        self.render_popup(frame, content_chunks[0], area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let popup = self.state.session.popup().to_string();
        let header = Line::from(vec![
            Span::styled(format!("{} BINDERY", icons::BINDING), self.theme.header()),
            Span::raw("  │  "),
            Span::styled(&self.state.data_label, self.theme.accent()),
            Span::raw("  │  "),
            Span::styled(popup.clone(), self.theme.popup_state(&popup)),
            Span::raw("  │  "),
            Span::styled(
                format!("changes: {}", self.state.change_count()),
                self.theme.text(),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.header())
            .title(" BINDING EDITOR ");

        frame.render_widget(Paragraph::new(header).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.session.focus() == Focus::Input;
        let title = if self.state.session.is_multiline() {
            " VALUE (multiline) "
        } else {
            " VALUE "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(title);
        let inner = block.inner(area);

        frame.render_widget(Paragraph::new(self.input_lines()).block(block), area);

        if focused {
            let (col, row) = cursor_offset(self.state.session.value(), self.state.session.cursor());
            let x = inner.x.saturating_add(col).min(inner.right().saturating_sub(1));
            let y = inner.y.saturating_add(row).min(inner.bottom().saturating_sub(1));
            frame.set_cursor_position((x, y));
        }
    }

    /// Value split into lines, complete bindings highlighted
    fn input_lines(&self) -> Vec<Line<'_>> {
        if let Some(placeholder) = self.state.session.placeholder() {
            return vec![Line::from(Span::styled(placeholder, self.theme.dimmed()))];
        }

        let value = self.state.session.value();
        let data = self.state.sample_data();
        let mut segments: Vec<(&str, Style)> = Vec::new();
        let mut pos = 0;
        for binding in extract_refs(value) {
            if binding.span.start > pos {
                segments.push((&value[pos..binding.span.start], self.theme.text()));
            }
            let style = match data {
                Some(data) if resolve_path(data, &binding.path).is_none() => {
                    self.theme.unresolved()
                }
                _ => self.theme.binding(),
            };
            segments.push((&value[binding.span.clone()], style));
            pos = binding.span.end;
        }
        if pos < value.len() {
            segments.push((&value[pos..], self.theme.text()));
        }

        let mut lines: Vec<Vec<Span<'_>>> = vec![Vec::new()];
        for (text, style) in segments {
            for (i, part) in text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if part.is_empty() {
                    continue;
                }
                if let Some(line) = lines.last_mut() {
                    line.push(Span::styled(part, style));
                }
            }
        }
        lines.into_iter().map(Line::from).collect()
    }

    fn render_popup(&self, frame: &mut Frame, input: Rect, screen: Rect) {
        let PopupState::Open {
            suggestions,
            highlighted,
        } = self.state.session.popup()
        else {
            return;
        };

        let (col, row) = cursor_offset(self.state.session.value(), self.state.session.cursor());
        let height = (suggestions.len() as u16).saturating_add(2);
        let popup = Rect {
            x: input.x.saturating_add(1).saturating_add(col),
            y: input.y.saturating_add(2).saturating_add(row),
            width: POPUP_WIDTH,
            height,
        }
        .intersection(screen);
        if popup.width < 3 || popup.height < 3 {
            return;
        }

        let lines: Vec<Line<'_>> = suggestions
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let selected = i == *highlighted;
                let (path_style, value_style) = if selected {
                    (self.theme.selected(), self.theme.selected())
                } else {
                    (self.theme.binding(), self.theme.dimmed())
                };
                Line::from(vec![
                    Span::styled(format!(" {} ", item.path), path_style),
                    Span::styled(format!(" {}", item.preview_value), value_style),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.accent())
            .title(" suggestions ");

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn render_explorer(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.session.focus() == Focus::Explorer;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(" EXPLORER ");

        let Some(data) = self.state.sample_data() else {
            let empty = Line::from(Span::styled("  no sample data", self.theme.dimmed()));
            frame.render_widget(Paragraph::new(empty).block(block), area);
            return;
        };

        let index = TreeIndex::new(data);
        let active = self.state.session.explorer().active_row();
        let visible = area.height.saturating_sub(2) as usize;
        let skip = (active + 1).saturating_sub(visible);

        let lines: Vec<Line<'_>> = self
            .state
            .session
            .explorer_rows()
            .into_iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, row)| {
                let indent = "  ".repeat(row.node.depth + 1);
                let (icon, value) = if row.node.is_leaf() {
                    let value = index
                        .value_at(&row.node.path)
                        .map(|v| preview(v, 24))
                        .unwrap_or_default();
                    (icons::LEAF, value)
                } else if row.expanded {
                    (icons::EXPANDED, String::new())
                } else {
                    (icons::COLLAPSED, String::new())
                };
                let label_style = if focused && i == active {
                    self.theme.selected()
                } else {
                    self.theme.text()
                };
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled(format!("{} ", icon), self.theme.accent()),
                    Span::styled(row.node.label, label_style),
                    Span::styled(format!("  {}", value), self.theme.dimmed()),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(" PREVIEW ");
        let text = self.state.session.preview().into_owned();
        let paragraph = Paragraph::new(text)
            .style(self.theme.text())
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let keys: &[(&str, &str)] = match self.state.session.focus() {
            Focus::Input => &[
                ("[{{]", " bind  "),
                ("[↑↓]", " choose  "),
                ("[Enter]", " accept  "),
                ("[Esc]", " close  "),
                ("[Tab]", " explorer  "),
                ("[^C]", " quit"),
            ],
            Focus::Explorer => &[
                ("[↑↓]", " move  "),
                ("[←→]", " fold  "),
                ("[Enter]", " insert  "),
                ("[Tab]", " input  "),
                ("[^C]", " quit"),
            ],
        };
        let spans: Vec<Span<'_>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, self.theme.accent()),
                    Span::styled(*label, self.theme.dimmed()),
                ]
            })
            .collect();

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Column and row of a byte cursor inside a (possibly multiline) value
fn cursor_offset(value: &str, cursor: usize) -> (u16, u16) {
    let before = value.get(..cursor).unwrap_or(value);
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().unwrap_or("").chars().count();
    (
        u16::try_from(col).unwrap_or(u16::MAX),
        u16::try_from(row).unwrap_or(u16::MAX),
    )
}
