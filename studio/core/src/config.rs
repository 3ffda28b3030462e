//! Studio Configuration
//!
//! Environment-driven knobs for a running editor session. Everything
//! has a sensible default; the env vars exist for demos and tests.

use std::path::PathBuf;
use std::time::Duration;

use crate::sequencer::TYPING_PAUSE_MS;
use crate::store::DEFAULT_PLACEHOLDER;

/// Configuration for an editor session
#[derive(Clone, Debug)]
pub struct StudioConfig {
    /// Typing-simulation pause between messages
    pub typing_pause: Duration,
    /// Override for the snapshot file location (None = XDG default)
    pub snapshot_path: Option<PathBuf>,
    /// Placeholder text for newly created messages
    pub placeholder: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            typing_pause: Duration::from_millis(TYPING_PAUSE_MS),
            snapshot_path: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl StudioConfig {
    /// Create configuration from environment variables
    ///
    /// - `CHATBUBBLES_TYPING_PAUSE_MS`: typing pause override
    /// - `CHATBUBBLES_SNAPSHOT_PATH`: snapshot file override
    /// - `CHATBUBBLES_PLACEHOLDER`: new-message placeholder text
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            typing_pause: std::env::var("CHATBUBBLES_TYPING_PAUSE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.typing_pause, Duration::from_millis),
            snapshot_path: std::env::var("CHATBUBBLES_SNAPSHOT_PATH")
                .ok()
                .map(PathBuf::from),
            placeholder: std::env::var("CHATBUBBLES_PLACEHOLDER")
                .unwrap_or(defaults.placeholder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.typing_pause, Duration::from_millis(500));
        assert!(config.snapshot_path.is_none());
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    }
}
