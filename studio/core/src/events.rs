//! Surface Protocol
//!
//! Messages sent from the editor core to rendering surfaces. These
//! represent everything a surface needs to mirror the store and play
//! back the composed conversation.
//!
//! # Design Philosophy
//!
//! Surfaces are pure renderers. The core never reaches into a UI; it
//! emits `StudioMessage`s over an mpsc channel and the surface draws
//! whatever it is told. This keeps the store and the sequencer fully
//! testable with nothing but a channel receiver on the other end.

use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageId};

/// Messages from the editor core to a rendering surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum StudioMessage {
    // ============================================
    // Store Notifications
    // ============================================
    /// The message sequence or selection changed
    ///
    /// Carries a full snapshot of the ordered sequence; surfaces
    /// re-render the list rather than diffing.
    StoreChanged {
        /// The ordered message sequence
        messages: Vec<Message>,
        /// Currently selected message, if any
        selected: Option<MessageId>,
    },

    // ============================================
    // Playback Events
    // ============================================
    /// A playback run started
    PlaybackStarted,

    /// Show the typing indicator (no message payload)
    TypingShown,

    /// Hide the typing indicator
    TypingHidden,

    /// A message is due on screen
    ///
    /// Carries the full record; the surface uses `duration` and the
    /// animation style for the bubble's appearance. The sequencer does
    /// not wait for the animation to finish.
    MessageEmitted {
        /// The message to present
        message: Message,
    },

    /// The playback run is over (exhausted or cancelled)
    PlaybackEnded,

    // ============================================
    // System Messages
    // ============================================
    /// User-facing notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studio_message_round_trips() {
        let msg = StudioMessage::Notify {
            level: NotifyLevel::Warning,
            message: "add at least one message".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: StudioMessage = serde_json::from_str(&json).unwrap();
        match back {
            StudioMessage::Notify { level, message } => {
                assert_eq!(level, NotifyLevel::Warning);
                assert_eq!(message, "add at least one message");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
