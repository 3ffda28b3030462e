//! Integration tests for the playback sequencer
//!
//! These run under paused tokio time, so every timing assertion is
//! exact virtual time rather than a sleep-and-hope bound.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use studio_core::{
    Message, MessageStore, MemoryStorage, PlaybackError, Player, PlayerState, StudioMessage,
};

fn sequence(delays: &[u64]) -> Vec<Message> {
    let mut store = MessageStore::new(Box::new(MemoryStorage::new()));
    for &delay in delays {
        let id = store.create();
        store.update(&id, studio_core::MessagePatch::new().with_delay(delay));
    }
    store.messages().to_vec()
}

/// Drain events until `PlaybackEnded`, tagging each with its arrival
/// instant in virtual time.
async fn drain(rx: &mut mpsc::Receiver<StudioMessage>) -> Vec<(StudioMessage, Instant)> {
    let mut events = Vec::new();
    loop {
        let msg = rx.recv().await.expect("channel closed mid-run");
        let done = matches!(msg, StudioMessage::PlaybackEnded);
        events.push((msg, Instant::now()));
        if done {
            return events;
        }
    }
}

fn emissions(events: &[(StudioMessage, Instant)]) -> Vec<(String, Instant)> {
    events
        .iter()
        .filter_map(|(msg, at)| match msg {
            StudioMessage::MessageEmitted { message } => Some((message.text.clone(), *at)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Timing
// =============================================================================

/// Two messages with delays [0, 500]: the first lands immediately, the
/// second after the 500ms typing pause plus its own 500ms delay, and
/// exactly two emissions precede the terminal event.
#[tokio::test(start_paused = true)]
async fn test_two_message_timing() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);
    let start = Instant::now();

    player.start(sequence(&[0, 500])).unwrap();
    let events = drain(&mut rx).await;

    let emitted = emissions(&events);
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0].1.duration_since(start), Duration::ZERO);
    assert_eq!(
        emitted[1].1.duration_since(emitted[0].1),
        Duration::from_millis(500 + 500),
        "second emission waits the typing pause plus its own delay"
    );

    assert!(matches!(events.last().unwrap().0, StudioMessage::PlaybackEnded));
    assert_eq!(player.state(), PlayerState::Idle);
}

/// The very first message gets no typing pause: only its own delay
/// separates playback start from its emission.
#[tokio::test(start_paused = true)]
async fn test_first_message_waits_only_its_delay() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);
    let start = Instant::now();

    player.start(sequence(&[800])).unwrap();
    let events = drain(&mut rx).await;

    let emitted = emissions(&events);
    assert_eq!(emitted.len(), 1);
    assert_eq!(
        emitted[0].1.duration_since(start),
        Duration::from_millis(800)
    );
}

/// `duration` affects appearance only; it must not stretch the gap to
/// the following message.
#[tokio::test(start_paused = true)]
async fn test_duration_does_not_gate_sequencing() {
    let (tx, mut rx) = mpsc::channel(64);

    let mut store = MessageStore::new(Box::new(MemoryStorage::new()));
    let first = store.create();
    store.update(
        &first,
        studio_core::MessagePatch::new()
            .with_delay(0)
            .with_duration(60_000),
    );
    let second = store.create();
    store.update(&second, studio_core::MessagePatch::new().with_delay(100));

    let mut player = Player::new(tx);
    player.start(store.messages().to_vec()).unwrap();
    let events = drain(&mut rx).await;

    let emitted = emissions(&events);
    assert_eq!(
        emitted[1].1.duration_since(emitted[0].1),
        Duration::from_millis(500 + 100),
        "a one-minute animation duration must not delay the next message"
    );
}

// =============================================================================
// Preconditions and state machine
// =============================================================================

/// Starting with zero messages is a reported precondition failure, not
/// a crash, and the sequencer never leaves Idle.
#[tokio::test]
async fn test_empty_start_is_rejected() {
    let (tx, mut rx) = mpsc::channel(16);
    let mut player = Player::new(tx);

    assert_eq!(player.start(Vec::new()), Err(PlaybackError::NoMessages));
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(rx.try_recv().is_err(), "no events for a rejected start");
}

/// A finished run returns to Idle and a fresh start replays from the
/// first message.
#[tokio::test(start_paused = true)]
async fn test_restart_begins_from_the_first_message() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);
    let messages = sequence(&[0, 0, 0]);

    player.start(messages.clone()).unwrap();
    let first_run = drain(&mut rx).await;
    assert_eq!(emissions(&first_run).len(), 3);

    player.start(messages.clone()).unwrap();
    let second_run = drain(&mut rx).await;
    let emitted = emissions(&second_run);
    assert_eq!(emitted.len(), 3);
    assert_eq!(emitted[0].0, messages[0].text);
}

/// A stop that arrives after the run has already finished is a no-op:
/// the player must stay Idle and remain startable, never stuck in
/// Stopping with no task left to clear it.
#[tokio::test(start_paused = true)]
async fn test_stop_after_completion_never_wedges_the_player() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);

    player.start(sequence(&[0])).unwrap();
    drain(&mut rx).await;

    player.stop();
    assert_eq!(player.state(), PlayerState::Idle);
    assert!(!player.is_running());

    player.start(sequence(&[0])).unwrap();
    let events = drain(&mut rx).await;
    assert_eq!(emissions(&events).len(), 1);
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cancelling after the 2nd emission of a 5-message run yields exactly
/// two emissions, then the terminal event, never a 3rd message.
#[tokio::test(start_paused = true)]
async fn test_cancel_mid_run_stops_further_emission() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);

    player.start(sequence(&[0, 100, 100, 100, 100])).unwrap();

    let mut emitted = 0;
    let mut ended = false;
    while let Some(msg) = rx.recv().await {
        match msg {
            StudioMessage::MessageEmitted { .. } => {
                emitted += 1;
                if emitted == 2 {
                    player.stop();
                    assert_eq!(player.state(), PlayerState::Stopping);
                }
            }
            StudioMessage::PlaybackEnded => {
                ended = true;
                break;
            }
            _ => {}
        }
    }

    assert!(ended);
    assert_eq!(emitted, 2);
    assert_eq!(player.state(), PlayerState::Idle);
}

/// A cancellation raised during a message's delay wait suppresses that
/// message's emission entirely.
#[tokio::test(start_paused = true)]
async fn test_cancel_during_delay_suppresses_the_emission() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);

    player.start(sequence(&[60_000])).unwrap();

    // Let the run reach the delay sleep, then cancel while it waits.
    tokio::task::yield_now().await;
    player.stop();

    let events = drain(&mut rx).await;
    assert!(emissions(&events).is_empty());
}

/// Stop when idle is a no-op; a cancelled run can be restarted.
#[tokio::test(start_paused = true)]
async fn test_stop_idle_then_restart() {
    let (tx, mut rx) = mpsc::channel(64);
    let mut player = Player::new(tx);

    player.stop();
    assert_eq!(player.state(), PlayerState::Idle);

    player.start(sequence(&[10_000])).unwrap();
    player.stop();
    drain(&mut rx).await;

    player.start(sequence(&[0])).unwrap();
    let events = drain(&mut rx).await;
    assert_eq!(emissions(&events).len(), 1);
}
