//! Project Snapshot
//!
//! The serialized representation of store state: version, optional
//! stamp, ordered messages, and global settings. One shape serves both
//! the persisted single-key snapshot and the exported project file
//! (the export path additionally stamps `timestamp`).
//!
//! # Versioning
//!
//! Current snapshots are version "2.0" wrapper objects. The first
//! release persisted a bare JSON array of messages with no wrapper and
//! no settings; those still load and are treated as
//! `{ messages: <array>, globalSettings: <defaults> }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::settings::GlobalSettings;

/// Snapshot format version written by this build
pub const SNAPSHOT_VERSION: &str = "2.0";

/// Serialized store state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Snapshot format version
    pub version: String,
    /// Stamp set at export time; absent on write-through persistence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// The ordered message sequence
    pub messages: Vec<Message>,
    /// Global editor defaults
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl ProjectSnapshot {
    /// Build a current-version snapshot from store state
    pub fn new(messages: Vec<Message>, global_settings: GlobalSettings) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            timestamp: None,
            messages,
            global_settings,
        }
    }

    /// Stamp with the current time (used by exports)
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot, accepting the legacy bare-array format
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let wire: SnapshotWire = serde_json::from_str(raw)?;
        Ok(match wire {
            SnapshotWire::Current(snapshot) => snapshot,
            SnapshotWire::Legacy(messages) => Self::new(messages, GlobalSettings::default()),
        })
    }
}

/// On-disk variants: current wrapper object or legacy bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotWire {
    Current(ProjectSnapshot),
    Legacy(Vec<Message>),
}
