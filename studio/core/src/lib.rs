//! Studio Core - Headless Editor Core for chatbubbles
//!
//! This crate provides the editing and playback logic for the chat
//! bubble composer, completely independent of any UI framework. It can
//! drive a TUI, a web surface, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                   Rendering Surface                    │
//! │        (list pane, preview pane, settings pane)        │
//! │                          │                             │
//! │                 store operations (down)                │
//! │                  StudioMessage (up)                    │
//! └──────────────────────────┼─────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼─────────────────────────────┐
//! │                     STUDIO CORE                        │
//! │  ┌────────────┐  ┌───────────┐  ┌───────────────────┐  │
//! │  │  Message   │  │  Playback │  │ Snapshot/Export   │  │
//! │  │   Store    │  │ Sequencer │  │  (persist, JSON,  │  │
//! │  │            │  │           │  │   image capture)  │  │
//! │  └────────────┘  └───────────┘  └───────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`MessageStore`]: the ordered sequence, selection, and defaults
//! - [`Player`]: replays the sequence as a timed presentation
//! - [`StudioMessage`]: everything a surface needs to render
//! - [`ProjectSnapshot`]: the persisted/exported representation
//!
//! # Quick Start
//!
//! ```ignore
//! use studio_core::{MessageStore, Player, MemoryStorage, StudioMessage};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let mut store = MessageStore::new(Box::new(MemoryStorage::new()))
//!         .with_notifier(tx.clone());
//!     store.create();
//!
//!     let mut player = Player::new(tx);
//!     player.start(store.messages().to_vec()).unwrap();
//!
//!     while let Some(msg) = rx.recv().await {
//!         match msg {
//!             StudioMessage::MessageEmitted { message } => { /* render */ }
//!             StudioMessage::PlaybackEnded => break,
//!             _ => {}
//!         }
//!     }
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any
//! other UI framework. Surfaces subscribe to the message channel and
//! render what they are told.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod events;
pub mod export;
pub mod message;
pub mod persist;
pub mod sequencer;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use config::StudioConfig;
pub use events::{NotifyLevel, StudioMessage};
pub use export::{
    export, export_image, export_project, ExportArtifact, ExportError, ExportFormat, ImageCapture,
    StillFrame,
};
pub use message::{AnimationKind, Message, MessageId, MessagePatch, Sender};
pub use persist::{default_snapshot_path, FileStorage, MemoryStorage, ProjectStorage, StorageError};
pub use sequencer::{PlaybackError, Player, PlayerState, TYPING_PAUSE_MS};
pub use settings::{Easing, GlobalSettings, SettingsPatch};
pub use snapshot::{ProjectSnapshot, SNAPSHOT_VERSION};
pub use store::{MessageStore, BASE_DELAY_MS, DELAY_SPACING_MS};
pub use template::{builtins, Template, TemplateMessage};
