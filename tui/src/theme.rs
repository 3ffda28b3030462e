//! Theme and Colors
//!
//! The chatbubbles palette: warm bubble colors against a dim chrome,
//! tuned for both dark and light terminals.

use ratatui::style::Color;

// ============================================================================
// Bubble Colors
// ============================================================================

/// Sent bubbles (the composing side)
pub const SENT_GREEN: Color = Color::Rgb(130, 220, 130);

/// Received bubbles (the other side)
pub const RECEIVED_BLUE: Color = Color::Rgb(130, 180, 255);

/// Typing indicator dots
pub const TYPING_DOTS: Color = Color::Rgb(160, 160, 170);

// ============================================================================
// UI Chrome
// ============================================================================

/// Accent for titles and the selected list row
pub const ACCENT_MAGENTA: Color = Color::Magenta;

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning yellow
pub const WARN_YELLOW: Color = Color::Rgb(230, 200, 100);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Info blue
pub const INFO_BLUE: Color = Color::Rgb(120, 180, 230);
