//! Export Routines
//!
//! Two real export paths - the project JSON file and a still PNG of
//! the fully rendered conversation - plus explicit "not available"
//! errors for the formats the editor advertises but does not encode
//! (GIF, video). Unsupported formats must say so clearly; they never
//! fail silently and never crash.
//!
//! # The capture seam
//!
//! The core does not rasterize anything. For the PNG path it prepares
//! a [`StillFrame`] - every message visible, appearance animations
//! disabled - and hands it to an [`ImageCapture`] implementation
//! supplied by the embedding surface, the same way the original tool
//! delegated to an external screenshot library.

use chrono::Utc;
use thiserror::Error;

use crate::message::Message;
use crate::store::MessageStore;

/// Consumer-facing export formats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Still image of the rendered conversation
    Png,
    /// Animated GIF (not implemented)
    Gif,
    /// Video file (not implemented)
    Video,
    /// Project JSON, round-trips through the store
    Json,
}

impl ExportFormat {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG image",
            Self::Gif => "GIF animation",
            Self::Video => "video",
            Self::Json => "project JSON",
        }
    }
}

/// Errors from the export paths
#[derive(Debug, Error)]
pub enum ExportError {
    /// The format is advertised but has no encoder
    #[error("{} export is not available in this version; export as an image or project JSON instead", .0.label())]
    Unavailable(ExportFormat),

    /// The capture backend failed to produce an image
    #[error("image capture failed: {0}")]
    Capture(String),

    /// PNG export was requested with no capture backend attached
    #[error("image export needs a capture backend")]
    NoCaptureBackend,

    /// Snapshot serialization failed
    #[error("could not serialize project: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A finished export: suggested file name plus content bytes
///
/// Callers decide where the bytes land (download, file dialog, cwd).
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Suggested file name, epoch-stamped the way the original tool
    /// named its downloads
    pub file_name: String,
    /// File content
    pub bytes: Vec<u8>,
}

/// The conversation rendered for capture
///
/// All messages visible at once, appearance animations disabled - the
/// store's "screenshot mode".
#[derive(Clone, Debug)]
pub struct StillFrame {
    /// Every message of the sequence, in order
    pub messages: Vec<Message>,
    /// Always true; capture backends must not animate
    pub animations_disabled: bool,
}

impl StillFrame {
    /// Frame over the given messages
    pub fn of(messages: Vec<Message>) -> Self {
        Self {
            messages,
            animations_disabled: true,
        }
    }
}

/// External image-capture collaborator
///
/// Implemented by the embedding surface (or a test stub); receives the
/// still frame and returns encoded PNG bytes.
pub trait ImageCapture {
    /// Rasterize the frame to PNG bytes
    fn capture(&self, frame: &StillFrame) -> Result<Vec<u8>, ExportError>;
}

/// Export the store in the requested format
///
/// `capture` is only consulted for [`ExportFormat::Png`].
pub fn export(
    store: &MessageStore,
    format: ExportFormat,
    capture: Option<&dyn ImageCapture>,
) -> Result<ExportArtifact, ExportError> {
    match format {
        ExportFormat::Json => export_project(store),
        ExportFormat::Png => {
            let capture = capture.ok_or(ExportError::NoCaptureBackend)?;
            export_image(store, capture)
        }
        ExportFormat::Gif | ExportFormat::Video => {
            tracing::info!(format = format.label(), "Export format not available");
            Err(ExportError::Unavailable(format))
        }
    }
}

/// Export the project as a stamped JSON snapshot
pub fn export_project(store: &MessageStore) -> Result<ExportArtifact, ExportError> {
    let snapshot = store.snapshot().stamped();
    let json = snapshot.to_json()?;
    Ok(ExportArtifact {
        file_name: format!("chat-project-{}.json", epoch_ms()),
        bytes: json.into_bytes(),
    })
}

/// Export a still PNG of the fully rendered conversation
pub fn export_image(
    store: &MessageStore,
    capture: &dyn ImageCapture,
) -> Result<ExportArtifact, ExportError> {
    let frame = store.still_frame();
    let bytes = capture.capture(&frame)?;
    Ok(ExportArtifact {
        file_name: format!("chat-animation-{}.png", epoch_ms()),
        bytes,
    })
}

fn epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
