//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin editor surface:
//! - Event loop (keyboard, resize)
//! - MessageStore and Player for editing and playback
//! - DisplayState for rendering
//!
//! Keyboard input turns into store operations; everything on screen is
//! derived from the `StudioMessage`s those operations emit. The render
//! pass never reaches into the store except for the global defaults.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use studio_core::{
    builtins, export, export_project, ExportFormat, FileStorage, GlobalSettings, MessagePatch,
    MessageStore, NotifyLevel, Player, Sender, StudioConfig, StudioMessage,
};

use crate::display::DisplayState;
use crate::theme::{
    ACCENT_MAGENTA, DIM_GRAY, ERROR_RED, INFO_BLUE, RECEIVED_BLUE, SENT_GREEN, SUCCESS_GREEN,
    TYPING_DOTS, WARN_YELLOW,
};

/// Surface channel capacity
const CHANNEL_CAPACITY: usize = 256;

/// Step (ms) for the delay and duration keybindings
const TIMING_STEP_MS: u64 = 100;

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,

    /// The editable message sequence
    store: MessageStore,
    /// The playback sequencer
    player: Player,
    /// Display state derived from StudioMessages
    display: DisplayState,
    /// Receiving end of the surface channel
    rx: mpsc::Receiver<StudioMessage>,

    /// Text-edit buffer for the selected message (Some = editing)
    input: Option<String>,
    /// Which builtin template the next `t` press loads
    template_cursor: usize,
    /// Last frame time (for notice expiry)
    last_frame: Instant,
}

impl App {
    /// Create a new App instance
    ///
    /// Hydrates the store from the snapshot file and wires the store
    /// and player onto a shared surface channel.
    pub fn new(config: StudioConfig) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let storage = match &config.snapshot_path {
            Some(path) => FileStorage::new(path),
            None => FileStorage::at_default(),
        };
        let store = MessageStore::new(Box::new(storage))
            .with_notifier(tx.clone())
            .with_placeholder(config.placeholder);
        let player = Player::new(tx).with_typing_pause(config.typing_pause);

        let mut display = DisplayState::new();
        display.apply_message(StudioMessage::StoreChanged {
            messages: store.messages().to_vec(),
            selected: store.selected_id().cloned(),
        });

        Self {
            running: true,
            store,
            player,
            display,
            rx,
            input: None,
            template_cursor: 0,
            last_frame: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so the user sees the UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key);
                            }
                            Event::Resize(_, _) => {}
                            _ => {}
                        }
                    }
                }

                // Frame tick - playback events arrive between keys
                () = tokio::time::sleep(Duration::from_millis(50)) => {}
            }

            self.process_messages();
            self.update();
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Drain all pending messages from the surface channel
    fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.display.apply_message(msg);
        }
    }

    /// Advance display timers
    fn update(&mut self) {
        let now = Instant::now();
        self.display.update(now - self.last_frame);
        self.last_frame = now;
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.input.is_some() {
            self.handle_edit_key(key);
        } else {
            self.handle_normal_key(key);
        }
    }

    /// Keys while editing the selected message's text
    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input = None;
            }
            KeyCode::Enter => {
                if let (Some(text), Some(id)) =
                    (self.input.take(), self.store.selected_id().cloned())
                {
                    self.store.update(&id, MessagePatch::new().with_text(text));
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = &mut self.input {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = &mut self.input {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    /// Keys in normal (non-editing) mode
    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),

            // Sequence editing
            KeyCode::Char('a') => {
                self.store.create();
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.store.selected_id().cloned() {
                    self.store.delete(&id);
                }
            }
            KeyCode::Enter => {
                if let Some(message) = self.store.selected() {
                    self.input = Some(message.text.clone());
                }
            }

            // Selection movement
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),

            // Selected-message fields
            KeyCode::Char('s') => {
                if let Some(message) = self.store.selected() {
                    let (id, toggled) = (message.id.clone(), message.sender.toggled());
                    self.store
                        .update(&id, MessagePatch::new().with_sender(toggled));
                }
            }
            KeyCode::Char('n') => {
                if let Some(message) = self.store.selected() {
                    let (id, next) = (message.id.clone(), message.animation.next());
                    self.store.update(&id, MessagePatch::new().with_animation(next));
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_delay(TIMING_STEP_MS as i64),
            KeyCode::Char('-') => self.nudge_delay(-(TIMING_STEP_MS as i64)),
            KeyCode::Char(']') => self.nudge_duration(TIMING_STEP_MS as i64),
            KeyCode::Char('[') => self.nudge_duration(-(TIMING_STEP_MS as i64)),

            // Templates
            KeyCode::Char('t') => self.load_next_template(),

            // Playback
            KeyCode::Char('p') | KeyCode::Char(' ') => self.toggle_playback(),

            // Export
            KeyCode::Char('e') => self.export_json(),
            KeyCode::Char('w') => self.export_unavailable(ExportFormat::Png),
            KeyCode::Char('g') => self.export_unavailable(ExportFormat::Gif),
            KeyCode::Char('v') => self.export_unavailable(ExportFormat::Video),

            _ => {}
        }
    }

    /// Stop any playback and leave the event loop
    fn quit(&mut self) {
        self.player.stop();
        self.running = false;
    }

    /// Move the selection by `step` within the sequence
    ///
    /// With no current selection, any movement selects the first
    /// message.
    fn move_selection(&mut self, step: i64) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() - 1;
        let current = self
            .store
            .selected_id()
            .and_then(|id| self.store.messages().iter().position(|m| &m.id == id));
        let next = match current {
            Some(idx) => idx.saturating_add_signed(step as isize).min(last),
            None => 0,
        };
        let id = self.store.messages()[next].id.clone();
        self.store.select(Some(id));
    }

    /// Adjust the selected message's pre-display delay
    fn nudge_delay(&mut self, step_ms: i64) {
        if let Some(message) = self.store.selected() {
            let (id, delay) = (message.id.clone(), message.delay);
            let next = delay.saturating_add_signed(step_ms);
            self.store.update(&id, MessagePatch::new().with_delay(next));
        }
    }

    /// Adjust the selected message's animation duration
    fn nudge_duration(&mut self, step_ms: i64) {
        if let Some(message) = self.store.selected() {
            let (id, duration) = (message.id.clone(), message.duration);
            let next = duration.saturating_add_signed(step_ms);
            self.store
                .update(&id, MessagePatch::new().with_duration(next));
        }
    }

    /// Replace the sequence with the next builtin template
    fn load_next_template(&mut self) {
        let templates = builtins();
        if templates.is_empty() {
            return;
        }
        let template = &templates[self.template_cursor % templates.len()];
        self.template_cursor += 1;
        self.store.load_template(template);
        self.display
            .notify(NotifyLevel::Info, format!("loaded template: {}", template.name));
    }

    /// Start playback, or cancel the run in flight
    fn toggle_playback(&mut self) {
        if self.player.is_running() {
            self.player.stop();
            return;
        }
        if let Err(e) = self.player.start(self.store.messages().to_vec()) {
            self.display.notify(NotifyLevel::Warning, e.to_string());
        }
    }

    /// Export the project as a JSON snapshot next to the binary
    fn export_json(&mut self) {
        match export_project(&self.store) {
            Ok(artifact) => match std::fs::write(&artifact.file_name, &artifact.bytes) {
                Ok(()) => self
                    .display
                    .notify(NotifyLevel::Success, format!("saved {}", artifact.file_name)),
                Err(e) => {
                    tracing::warn!("Snapshot write error: {}", e);
                    self.display
                        .notify(NotifyLevel::Error, format!("export failed: {e}"));
                }
            },
            Err(e) => {
                tracing::warn!("Snapshot export error: {}", e);
                self.display
                    .notify(NotifyLevel::Error, format!("export failed: {e}"));
            }
        }
    }

    /// Surface the core's answer for formats this surface can't write
    fn export_unavailable(&mut self, format: ExportFormat) {
        if let Err(e) = export(&self.store, format, None) {
            self.display.notify(NotifyLevel::Warning, e.to_string());
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render one frame
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(rows[0]);

        self.draw_sequence(frame, columns[0]);
        self.draw_preview(frame, columns[1]);
        self.draw_inspector(frame, columns[2]);
        self.draw_status(frame, rows[1]);
    }

    /// Left pane: the ordered message sequence
    fn draw_sequence(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .display
            .messages
            .iter()
            .map(|message| {
                let color = match message.sender {
                    Sender::Own => SENT_GREEN,
                    Sender::Other => RECEIVED_BLUE,
                };
                let meta = format!(
                    " {} · {}ms · {}",
                    message.sender.label(),
                    message.delay,
                    message.animation.label()
                );
                ListItem::new(vec![
                    Line::from(Span::styled(message.text.clone(), Style::default().fg(color))),
                    Line::from(Span::styled(meta, Style::default().fg(DIM_GRAY))),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Sequence [a]dd [d]elete [t]emplate ")
                    .border_style(Style::default().fg(DIM_GRAY)),
            )
            .highlight_style(
                Style::default()
                    .fg(ACCENT_MAGENTA)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▌");

        let mut state = ListState::default();
        state.select(self.display.selected_index());
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Center pane: bubbles, either the full still frame or the
    /// playback transcript
    fn draw_preview(&self, frame: &mut Frame, area: Rect) {
        let (title, shown) = if self.display.playing {
            (" Preview ▶ ", &self.display.transcript)
        } else {
            (" Preview [p]lay ", &self.display.messages)
        };

        let inner_width = area.width.saturating_sub(4).max(8) as usize;
        let mut lines: Vec<Line> = Vec::new();
        for message in shown {
            lines.extend(bubble_lines(message, inner_width));
            lines.push(Line::default());
        }
        if self.display.typing {
            lines.push(Line::from(Span::styled(
                "• • •",
                Style::default().fg(TYPING_DOTS),
            )));
        }

        // Keep the newest bubbles in view during playback
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible) as u16;

        let preview = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(ACCENT_MAGENTA)),
            )
            .scroll((if self.display.playing { scroll } else { 0 }, 0));
        frame.render_widget(preview, area);
    }

    /// Right pane: selected-message fields and the global defaults
    fn draw_inspector(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        match self.display.selected_message() {
            Some(message) => {
                let text = match &self.input {
                    Some(buffer) => format!("{buffer}_"),
                    None => message.text.clone(),
                };
                lines.push(field("text", &text));
                lines.push(field("sender [s]", message.sender.label()));
                lines.push(field("delay [-/+]", &format!("{}ms", message.delay)));
                lines.push(field("duration [[/]]", &format!("{}ms", message.duration)));
                lines.push(field("animation [n]", message.animation.label()));
                lines.push(field("avatar", &message.avatar));
                lines.push(field("time", &message.timestamp));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "no message selected",
                    Style::default().fg(DIM_GRAY),
                )));
            }
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Defaults",
            Style::default().fg(ACCENT_MAGENTA),
        )));
        let settings: &GlobalSettings = self.store.settings();
        lines.push(field("type", settings.default_type.label()));
        lines.push(field("duration", &format!("{}ms", settings.default_duration)));
        lines.push(field("easing", &format!("{:?}", settings.default_easing)));
        lines.push(field("particles", toggle_label(settings.enable_particles)));
        lines.push(field("glow", toggle_label(settings.enable_glow)));
        lines.push(field("floating", toggle_label(settings.enable_floating)));

        let inspector = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Message [Enter] edit ")
                .border_style(Style::default().fg(DIM_GRAY)),
        );
        frame.render_widget(inspector, area);
    }

    /// Bottom line: notices and keybinding hints
    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.display.notice {
            Some(notice) => {
                let color = match notice.level {
                    NotifyLevel::Info => INFO_BLUE,
                    NotifyLevel::Warning => WARN_YELLOW,
                    NotifyLevel::Error => ERROR_RED,
                    NotifyLevel::Success => SUCCESS_GREEN,
                };
                Line::from(Span::styled(
                    format!(" {}", notice.text),
                    Style::default().fg(color),
                ))
            }
            None if self.input.is_some() => Line::from(Span::styled(
                " editing · Enter commit · Esc cancel",
                Style::default().fg(DIM_GRAY),
            )),
            None => Line::from(Span::styled(
                " a add · d delete · j/k select · p play · e export · q quit",
                Style::default().fg(DIM_GRAY),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// One labelled inspector row
fn field(name: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:>14}  "), Style::default().fg(DIM_GRAY)),
        Span::raw(value.to_string()),
    ])
}

fn toggle_label(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Wrap one message into aligned bubble lines
fn bubble_lines(message: &studio_core::Message, width: usize) -> Vec<Line<'static>> {
    let (color, alignment) = match message.sender {
        Sender::Own => (SENT_GREEN, Alignment::Right),
        Sender::Other => (RECEIVED_BLUE, Alignment::Left),
    };
    let bubble_width = (width * 2 / 3).max(8);

    let mut lines: Vec<Line> = textwrap::wrap(&message.text, bubble_width)
        .into_iter()
        .map(|row| {
            Line::from(Span::styled(
                format!(" {row} "),
                Style::default().fg(color).add_modifier(Modifier::REVERSED),
            ))
            .alignment(alignment)
        })
        .collect();

    lines.push(
        Line::from(Span::styled(
            format!("{} {}", message.avatar, message.timestamp),
            Style::default().fg(DIM_GRAY),
        ))
        .alignment(alignment),
    );
    lines
}
