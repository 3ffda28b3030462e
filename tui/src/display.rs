//! Display State Types
//!
//! The bridge between `StudioMessage`s and rendering. The TUI is a
//! thin client: it applies whatever the core says to this state and
//! draws from it, with no editing logic of its own.

use std::time::Duration;

use studio_core::{Message, MessageId, NotifyLevel, StudioMessage};

/// How long a notice stays on the status line
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// A transient status-line notification
#[derive(Clone, Debug)]
pub struct Notice {
    /// Severity, used for coloring
    pub level: NotifyLevel,
    /// Message content
    pub text: String,
    /// Remaining display time
    ttl: Duration,
}

/// Everything the TUI renders, derived from core messages
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Mirror of the store's ordered sequence
    pub messages: Vec<Message>,
    /// Mirror of the store's selection (may be stale; resolve via
    /// [`DisplayState::selected_message`])
    pub selected: Option<MessageId>,
    /// Messages emitted so far in the current playback run
    pub transcript: Vec<Message>,
    /// Whether the typing indicator is visible
    pub typing: bool,
    /// Whether a playback run is in flight
    pub playing: bool,
    /// Current status-line notice, if any
    pub notice: Option<Notice>,
}

impl DisplayState {
    /// Empty display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a message from the core
    pub fn apply_message(&mut self, msg: StudioMessage) {
        match msg {
            StudioMessage::StoreChanged { messages, selected } => {
                self.messages = messages;
                self.selected = selected;
            }
            StudioMessage::PlaybackStarted => {
                self.playing = true;
                self.typing = false;
                self.transcript.clear();
            }
            StudioMessage::TypingShown => self.typing = true,
            StudioMessage::TypingHidden => self.typing = false,
            StudioMessage::MessageEmitted { message } => self.transcript.push(message),
            StudioMessage::PlaybackEnded => {
                self.playing = false;
                self.typing = false;
            }
            StudioMessage::Notify { level, message } => {
                self.notice = Some(Notice {
                    level,
                    text: message,
                    ttl: NOTICE_TTL,
                });
            }
        }
    }

    /// Advance display timers (expires stale notices)
    pub fn update(&mut self, delta: Duration) {
        if let Some(notice) = &mut self.notice {
            notice.ttl = notice.ttl.saturating_sub(delta);
            if notice.ttl.is_zero() {
                self.notice = None;
            }
        }
    }

    /// The selected message, looked up defensively
    ///
    /// A stale selection id behaves as "no selection".
    pub fn selected_message(&self) -> Option<&Message> {
        let id = self.selected.as_ref()?;
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Index of the selected message in the sequence, if it resolves
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected.as_ref()?;
        self.messages.iter().position(|m| &m.id == id)
    }

    /// Raise a local notice (used for surface-side failures)
    pub fn notify(&mut self, level: NotifyLevel, text: impl Into<String>) {
        self.apply_message(StudioMessage::Notify {
            level,
            message: text.into(),
        });
    }
}
