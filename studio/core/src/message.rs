//! Message Data Model
//!
//! The message record is the unit of a composed conversation: one chat
//! bubble with its timing and presentation metadata. Sequence order is
//! carried by the store, not by the record itself - `timestamp` is a
//! display string only.
//!
//! # Design Philosophy
//!
//! Records are plain data. All editing goes through the store so that
//! persistence and change notification stay consistent; nothing here
//! validates beyond what the types themselves guarantee (`delay` is
//! non-negative by type, `duration` is clamped to at least 1ms).

use serde::{Deserialize, Serialize};

use crate::settings::GlobalSettings;

/// Minimum animation duration in milliseconds
///
/// `duration` gates nothing in the sequencer, but a zero duration makes
/// the appearance animation degenerate, so it is clamped on the way in.
pub const MIN_DURATION_MS: u64 = 1;

/// Message identifier
///
/// Opaque, unique within a process, never reused. Stable for the
/// record's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    ///
    /// Uses an atomic counter combined with a timestamp so ids stay
    /// unique across rapid creation and across hydrated snapshots.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(format!("msg_{timestamp}_{count}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of the conversation a message belongs to
///
/// Controls the presentation side and default styling. Serialized as
/// `"self"` / `"other"`; legacy snapshots used `"user"` for the
/// sending side, accepted as an alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sender {
    /// Sent by the composing side (rendered right-aligned)
    #[default]
    #[serde(rename = "self", alias = "user")]
    Own,
    /// Received from the other side (rendered left-aligned)
    #[serde(rename = "other")]
    Other,
}

impl Sender {
    /// Flip to the opposite side
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Own => Self::Other,
            Self::Other => Self::Own,
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Own => "Sent",
            Self::Other => "Received",
        }
    }
}

/// Appearance animation for a message bubble
///
/// These are presentation-style identifiers; surfaces translate them to
/// whatever their rendering system supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AnimationKind {
    /// Fade in from transparent
    #[default]
    Fade,
    /// Bounce into place
    Bounce,
    /// Slide in from the left edge
    SlideLeft,
    /// Slide in from the right edge
    SlideRight,
    /// Scale up from the center
    Pop,
    /// Digital glitch/flicker reveal
    Glitch,
    /// Character-by-character reveal
    Typewriter,
}

impl AnimationKind {
    /// All animation kinds, in cycle order for editor UIs
    pub const ALL: [AnimationKind; 7] = [
        Self::Fade,
        Self::Bounce,
        Self::SlideLeft,
        Self::SlideRight,
        Self::Pop,
        Self::Glitch,
        Self::Typewriter,
    ];

    /// The next kind in cycle order (wraps around)
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Bounce => "bounce",
            Self::SlideLeft => "slide left",
            Self::SlideRight => "slide right",
            Self::Pop => "pop",
            Self::Glitch => "glitch",
            Self::Typewriter => "typewriter",
        }
    }
}

/// One unit of simulated conversation content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,
    /// Bubble text content
    pub text: String,
    /// Which side this message belongs to
    pub sender: Sender,
    /// Milliseconds to wait before this message appears, relative to
    /// the previous emission (or playback start for the first message)
    pub delay: u64,
    /// Appearance animation time in milliseconds; affects how the
    /// bubble looks when it lands, never when the next one is due
    pub duration: u64,
    /// Display glyph shown next to the bubble
    pub avatar: String,
    /// Appearance animation style
    #[serde(default)]
    pub animation: AnimationKind,
    /// Free-text display time (e.g. "14:05"); not used for ordering
    pub timestamp: String,
}

impl Message {
    /// Create a message seeded from global settings
    ///
    /// `delay` is supplied by the store (it staggers by position);
    /// everything else comes from defaults.
    pub fn seeded(text: impl Into<String>, delay: u64, settings: &GlobalSettings) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender: Sender::Own,
            delay,
            duration: settings.default_duration.max(MIN_DURATION_MS),
            avatar: DEFAULT_AVATAR.to_string(),
            animation: settings.default_type,
            timestamp: local_clock(),
        }
    }

    /// Apply a field-level patch
    ///
    /// Only the fields present in the patch change. `duration` is
    /// clamped to the minimum.
    pub fn apply(&mut self, patch: MessagePatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(sender) = patch.sender {
            self.sender = sender;
        }
        if let Some(delay) = patch.delay {
            self.delay = delay;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration.max(MIN_DURATION_MS);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(animation) = patch.animation {
            self.animation = animation;
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
    }
}

/// Default avatar glyph for new messages
pub const DEFAULT_AVATAR: &str = "@";

/// Field-level mutation for [`Message::apply`]
///
/// `None` fields are left untouched. Built with the `with_*` methods so
/// call sites read like the edit they perform.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MessagePatch {
    /// New bubble text
    pub text: Option<String>,
    /// New sender side
    pub sender: Option<Sender>,
    /// New pre-appearance delay in milliseconds
    pub delay: Option<u64>,
    /// New animation duration in milliseconds
    pub duration: Option<u64>,
    /// New avatar glyph
    pub avatar: Option<String>,
    /// New animation style
    pub animation: Option<AnimationKind>,
    /// New display timestamp
    pub timestamp: Option<String>,
}

impl MessagePatch {
    /// Empty patch (applies nothing)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text field
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the sender field
    #[must_use]
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the delay field
    #[must_use]
    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the duration field
    #[must_use]
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the avatar field
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Set the animation field
    #[must_use]
    pub fn with_animation(mut self, animation: AnimationKind) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Set the display timestamp field
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// Current wall clock as a short local time string (e.g. "14:05")
pub fn local_clock() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_unique() {
        let id1 = MessageId::new();
        let id2 = MessageId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let settings = GlobalSettings::default();
        let mut msg = Message::seeded("hello", 200, &settings);
        let original_sender = msg.sender;
        let original_delay = msg.delay;

        msg.apply(MessagePatch::new().with_text("edited").with_duration(900));

        assert_eq!(msg.text, "edited");
        assert_eq!(msg.duration, 900);
        assert_eq!(msg.sender, original_sender);
        assert_eq!(msg.delay, original_delay);
    }

    #[test]
    fn test_duration_clamped_to_minimum() {
        let settings = GlobalSettings::default();
        let mut msg = Message::seeded("x", 0, &settings);
        msg.apply(MessagePatch::new().with_duration(0));
        assert_eq!(msg.duration, MIN_DURATION_MS);
    }

    #[test]
    fn test_sender_wire_names() {
        assert_eq!(serde_json::to_string(&Sender::Own).unwrap(), "\"self\"");
        assert_eq!(serde_json::to_string(&Sender::Other).unwrap(), "\"other\"");

        // Legacy snapshots wrote "user" for the sending side
        let legacy: Sender = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(legacy, Sender::Own);
    }

    #[test]
    fn test_animation_cycle_wraps() {
        let mut kind = AnimationKind::Fade;
        for _ in 0..AnimationKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, AnimationKind::Fade);
    }
}
