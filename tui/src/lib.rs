//! chatbubbles TUI - Terminal editor surface
//!
//! A full-screen terminal editor for composing chat bubble
//! conversations: a message list pane, a live preview pane driven by
//! the core's playback sequencer, and a settings pane for the selected
//! message.
//!
//! # Architecture
//!
//! The TUI is a thin client over `studio-core`: keyboard input turns
//! into store operations, and everything on screen is derived from
//! `StudioMessage`s received over the surface channel.

pub mod app;
pub mod display;
pub mod theme;

pub use app::App;
