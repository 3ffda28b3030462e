//! Playback Sequencer
//!
//! Replays the store's sequence as a timed presentation, exactly once
//! per invocation. For each message the sequencer shows the typing
//! indicator, pauses, waits out the message's own delay, then emits it
//! to the surface. `duration` never gates sequencing - it rides along
//! on the emission for the surface's appearance animation.
//!
//! # Cancellation
//!
//! Cooperative, not preemptive: `stop()` raises a flag that the
//! playback task polls before each typing pause and after each delay
//! sleep. A cancellation raised during the final delay wait suppresses
//! that message's emission. There is no pause state - a cancelled run
//! is abandoned, and the next `start()` begins again from the first
//! message. `PlaybackEnded` is emitted on every run exit, cancelled or
//! not, so surfaces can always reset their play controls.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::events::StudioMessage;
use crate::message::Message;

/// Typing-simulation pause before each non-initial message (ms)
///
/// A cosmetic constant, deliberately not per-message: it sells the
/// "other side is typing" illusion and is independent of `delay`.
pub const TYPING_PAUSE_MS: u64 = 500;

/// Sequencer states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No run in flight
    Idle,
    /// A run is emitting messages
    Running,
    /// Cancellation requested, run winding down
    Stopping,
}

/// User-visible playback preconditions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// Starting with an empty sequence
    #[error("add at least one message before playing")]
    NoMessages,
    /// Starting while a run is already in flight
    #[error("playback is already running")]
    AlreadyPlaying,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_STOPPING: u8 = 2;

/// State shared between the `Player` handle and its playback task
struct Shared {
    state: AtomicU8,
    cancel: AtomicBool,
}

impl Shared {
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: u8) {
        self.state.store(state, Ordering::SeqCst);
    }
}

/// Drives timed playback of a message sequence
///
/// Holds the surface channel; each `start()` spawns one playback task
/// that owns a snapshot of the sequence, so store edits made
/// mid-playback affect the next run, not the current one.
pub struct Player {
    shared: Arc<Shared>,
    tx: mpsc::Sender<StudioMessage>,
    typing_pause: Duration,
}

impl Player {
    /// Create a player emitting on the given surface channel
    pub fn new(tx: mpsc::Sender<StudioMessage>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(STATE_IDLE),
                cancel: AtomicBool::new(false),
            }),
            tx,
            typing_pause: Duration::from_millis(TYPING_PAUSE_MS),
        }
    }

    /// Override the typing-simulation pause (tests, demos)
    #[must_use]
    pub fn with_typing_pause(mut self, pause: Duration) -> Self {
        self.typing_pause = pause;
        self
    }

    /// Current sequencer state
    pub fn state(&self) -> PlayerState {
        match self.shared.state.load(Ordering::SeqCst) {
            STATE_RUNNING => PlayerState::Running,
            STATE_STOPPING => PlayerState::Stopping,
            _ => PlayerState::Idle,
        }
    }

    /// Whether a run is in flight (running or winding down)
    pub fn is_running(&self) -> bool {
        self.state() != PlayerState::Idle
    }

    /// Start one playback run over a snapshot of the sequence
    ///
    /// Rejected (state unchanged) if the sequence is empty or a run is
    /// already in flight; callers surface the error as a notice, not a
    /// crash.
    pub fn start(&mut self, messages: Vec<Message>) -> Result<(), PlaybackError> {
        if self.is_running() {
            return Err(PlaybackError::AlreadyPlaying);
        }
        if messages.is_empty() {
            return Err(PlaybackError::NoMessages);
        }

        self.shared.cancel.store(false, Ordering::SeqCst);
        self.shared.set_state(STATE_RUNNING);

        let shared = Arc::clone(&self.shared);
        let tx = self.tx.clone();
        let typing_pause = self.typing_pause;
        tokio::spawn(async move {
            run(shared, tx, messages, typing_pause).await;
        });

        Ok(())
    }

    /// Request cancellation of the current run
    ///
    /// No-op when idle. The run may let one in-flight sleep complete
    /// before it observes the flag.
    ///
    /// The Running-to-Stopping transition is a compare-exchange: a stop
    /// that races the run's natural completion loses the exchange and
    /// stays a no-op, rather than stranding the player in Stopping with
    /// no task left to return it to Idle.
    pub fn stop(&mut self) {
        if self
            .shared
            .state
            .compare_exchange(
                STATE_RUNNING,
                STATE_STOPPING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
        {
            self.shared.cancel.store(true, Ordering::SeqCst);
            tracing::debug!("Playback cancellation requested");
        }
    }
}

/// One playback run: the single suspendable linear pass
async fn run(
    shared: Arc<Shared>,
    tx: mpsc::Sender<StudioMessage>,
    messages: Vec<Message>,
    typing_pause: Duration,
) {
    tracing::debug!(messages = messages.len(), "Playback run started");
    let _ = tx.send(StudioMessage::PlaybackStarted).await;

    // Initial composing indicator, visible through the first delay
    let _ = tx.send(StudioMessage::TypingShown).await;

    let mut cancelled = false;
    for (i, message) in messages.into_iter().enumerate() {
        if shared.cancelled() {
            cancelled = true;
            break;
        }

        if i > 0 {
            let _ = tx.send(StudioMessage::TypingShown).await;
            sleep(typing_pause).await;
            if shared.cancelled() {
                cancelled = true;
                break;
            }
            let _ = tx.send(StudioMessage::TypingHidden).await;
        }

        sleep(Duration::from_millis(message.delay)).await;
        if shared.cancelled() {
            // A cancel raised during the delay wait suppresses this
            // message's emission.
            cancelled = true;
            break;
        }

        if i == 0 {
            let _ = tx.send(StudioMessage::TypingHidden).await;
        }
        let _ = tx.send(StudioMessage::MessageEmitted { message }).await;
    }

    // An exhausted run clears any residual indicator; a cancelled run
    // stops cold but still reports the terminal event.
    if !cancelled {
        let _ = tx.send(StudioMessage::TypingHidden).await;
    }
    let _ = tx.send(StudioMessage::PlaybackEnded).await;

    shared.cancel.store(false, Ordering::SeqCst);
    shared.set_state(STATE_IDLE);
    tracing::debug!(cancelled, "Playback run ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GlobalSettings;

    fn sequence(delays: &[u64]) -> Vec<Message> {
        let settings = GlobalSettings::default();
        delays
            .iter()
            .map(|&delay| Message::seeded(format!("m{delay}"), delay, &settings))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_sequence_is_rejected_and_stays_idle() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut player = Player::new(tx);

        assert_eq!(player.start(Vec::new()), Err(PlaybackError::NoMessages));
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_is_rejected() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut player = Player::new(tx);

        player.start(sequence(&[10_000])).unwrap();
        assert_eq!(
            player.start(sequence(&[0])),
            Err(PlaybackError::AlreadyPlaying)
        );

        player.stop();
        // Drain to the terminal event so the task finishes
        while let Some(msg) = rx.recv().await {
            if matches!(msg, StudioMessage::PlaybackEnded) {
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_all_messages_then_ends() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut player = Player::new(tx);
        player.start(sequence(&[0, 500])).unwrap();

        let mut emitted = 0;
        loop {
            match rx.recv().await.unwrap() {
                StudioMessage::MessageEmitted { .. } => emitted += 1,
                StudioMessage::PlaybackEnded => break,
                _ => {}
            }
        }
        assert_eq!(emitted, 2);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_typing_pause_before_first_message() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut player = Player::new(tx);
        player.start(sequence(&[0])).unwrap();

        // First message: indicator shown, cleared, emitted - with no
        // second TypingShown in between.
        let mut kinds = Vec::new();
        loop {
            let msg = rx.recv().await.unwrap();
            let done = matches!(msg, StudioMessage::PlaybackEnded);
            kinds.push(msg);
            if done {
                break;
            }
        }
        let shown = kinds
            .iter()
            .filter(|m| matches!(m, StudioMessage::TypingShown))
            .count();
        assert_eq!(shown, 1);
    }
}
