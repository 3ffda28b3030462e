//! Message Store
//!
//! Single source of truth for the composed conversation: the ordered
//! message sequence, the current selection, and the global defaults.
//!
//! # Design Philosophy
//!
//! This is a single-user editing tool, so "not found" is never an
//! error - a stale id means the user already deleted the thing, and
//! the right response is to do nothing. All mutation happens through
//! the operations here so that every change is followed by the same
//! two side effects: a write-through persist (best effort, logged and
//! swallowed on failure) and a `StoreChanged` notification to the
//! surface.

use tokio::sync::mpsc;

use crate::events::StudioMessage;
use crate::export::StillFrame;
use crate::message::{Message, MessageId, MessagePatch};
use crate::persist::ProjectStorage;
use crate::settings::{GlobalSettings, SettingsPatch};
use crate::snapshot::ProjectSnapshot;
use crate::template::Template;

/// Delay given to the first message added to an empty sequence (ms)
pub const BASE_DELAY_MS: u64 = 500;

/// Extra delay per existing message when appending (ms)
///
/// Staggers fresh messages so they do not land on top of the ones
/// already composed.
pub const DELAY_SPACING_MS: u64 = 250;

/// Placeholder text for freshly created messages
pub const DEFAULT_PLACEHOLDER: &str = "New message";

/// The authoritative collection of messages, selection, and defaults
pub struct MessageStore {
    messages: Vec<Message>,
    selected: Option<MessageId>,
    settings: GlobalSettings,
    storage: Box<dyn ProjectStorage>,
    notifier: Option<mpsc::Sender<StudioMessage>>,
    placeholder: String,
}

impl MessageStore {
    /// Create a store over the given storage, hydrating from the last
    /// saved snapshot if one loads
    ///
    /// A missing snapshot means a fresh empty project; a malformed or
    /// unreadable one is logged and the store degrades to empty state.
    pub fn new(storage: Box<dyn ProjectStorage>) -> Self {
        let mut store = Self {
            messages: Vec::new(),
            selected: None,
            settings: GlobalSettings::default(),
            storage,
            notifier: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        };

        match store.storage.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(messages = snapshot.messages.len(), "Hydrated project snapshot");
                store.messages = snapshot.messages;
                store.settings = snapshot.global_settings;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Could not load project snapshot, starting empty");
            }
        }

        store
    }

    /// Attach the surface notification channel
    #[must_use]
    pub fn with_notifier(mut self, tx: mpsc::Sender<StudioMessage>) -> Self {
        self.notifier = Some(tx);
        self
    }

    /// Override the placeholder text for new messages
    #[must_use]
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    // ============================================
    // Operations
    // ============================================

    /// Create a message at the end of the sequence and select it
    ///
    /// Seeded from global defaults; the delay staggers by position so
    /// fresh messages do not collide in time with existing ones.
    pub fn create(&mut self) -> MessageId {
        let delay = BASE_DELAY_MS + self.messages.len() as u64 * DELAY_SPACING_MS;
        let message = Message::seeded(self.placeholder.clone(), delay, &self.settings);
        let id = message.id.clone();
        self.messages.push(message);
        self.selected = Some(id.clone());
        self.committed();
        id
    }

    /// Remove the message with this id; no-op if absent
    ///
    /// Survivors keep their order. Deleting the selected message
    /// clears the selection.
    pub fn delete(&mut self, id: &MessageId) {
        let before = self.messages.len();
        self.messages.retain(|m| &m.id != id);
        if self.messages.len() == before {
            return;
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.committed();
    }

    /// Apply a field-level patch to the message with this id
    ///
    /// Silently does nothing for a stale id - a best-effort editing UI
    /// must not crash on references to deleted messages.
    pub fn update(&mut self, id: &MessageId, patch: MessagePatch) {
        let Some(message) = self.messages.iter_mut().find(|m| &m.id == id) else {
            return;
        };
        message.apply(patch);
        self.committed();
    }

    /// Set (or clear) the selection
    ///
    /// Existence is not validated; an id that never resolves simply
    /// behaves as no selection.
    pub fn select(&mut self, id: Option<MessageId>) {
        self.selected = id;
        self.notify_changed();
    }

    /// Replace the whole sequence with a template's messages
    ///
    /// Every instantiated message gets a fresh id and timestamp;
    /// template entries without an explicit animation take the current
    /// default. Clears the selection. Global settings are untouched.
    pub fn load_template(&mut self, template: &Template) {
        self.messages = template.instantiate(&self.settings);
        self.selected = None;
        self.committed();
        tracing::info!(template = %template.name, messages = self.messages.len(), "Loaded template");
    }

    /// Merge a partial update into the global defaults
    ///
    /// Seeds future messages only; existing ones are never rewritten.
    pub fn set_global_defaults(&mut self, patch: SettingsPatch) {
        self.settings.merge(patch);
        self.committed();
    }

    // ============================================
    // Accessors
    // ============================================

    /// The ordered message sequence
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The selected message, resolved defensively
    ///
    /// A stale selection id yields `None`, same as no selection.
    pub fn selected(&self) -> Option<&Message> {
        let id = self.selected.as_ref()?;
        self.messages.iter().find(|m| &m.id == id)
    }

    /// The raw selection id, which may be stale
    pub fn selected_id(&self) -> Option<&MessageId> {
        self.selected.as_ref()
    }

    /// Current global defaults
    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Number of messages in the sequence
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // ============================================
    // Serialization
    // ============================================

    /// Snapshot the current state (unstamped)
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::new(self.messages.clone(), self.settings.clone())
    }

    /// Replace store state from a snapshot, clearing the selection
    pub fn hydrate(&mut self, snapshot: ProjectSnapshot) {
        self.messages = snapshot.messages;
        self.settings = snapshot.global_settings;
        self.selected = None;
        self.committed();
    }

    /// All messages rendered visible with animations disabled
    ///
    /// The frame handed to image capture for PNG export.
    pub fn still_frame(&self) -> StillFrame {
        StillFrame::of(self.messages.clone())
    }

    // ============================================
    // Internals
    // ============================================

    /// Persist and notify after a mutation
    fn committed(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.storage.save(&snapshot) {
            tracing::warn!(error = %e, "Could not persist project snapshot");
        }
        self.notify_changed();
    }

    /// Best-effort surface notification
    fn notify_changed(&self) {
        let Some(tx) = &self.notifier else {
            return;
        };
        let update = StudioMessage::StoreChanged {
            messages: self.messages.clone(),
            selected: self.selected.clone(),
        };
        if let Err(e) = tx.try_send(update) {
            tracing::debug!(error = %e, "Dropped store notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{AnimationKind, Sender};
    use crate::persist::MemoryStorage;
    use crate::template;

    fn store() -> MessageStore {
        MessageStore::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_create_preserves_insertion_order_and_unique_ids() {
        let mut store = store();
        let ids: Vec<MessageId> = (0..5).map(|_| store.create()).collect();

        assert_eq!(store.len(), 5);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(&store.messages()[i].id, id);
        }
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_create_staggers_delay_by_position() {
        let mut store = store();
        store.create();
        store.create();
        store.create();

        let delays: Vec<u64> = store.messages().iter().map(|m| m.delay).collect();
        assert_eq!(
            delays,
            vec![
                BASE_DELAY_MS,
                BASE_DELAY_MS + DELAY_SPACING_MS,
                BASE_DELAY_MS + 2 * DELAY_SPACING_MS
            ]
        );
    }

    #[test]
    fn test_create_selects_the_new_message() {
        let mut store = store();
        let id = store.create();
        assert_eq!(store.selected().map(|m| m.id.clone()), Some(id));
    }

    #[test]
    fn test_delete_missing_id_is_a_noop() {
        let mut store = store();
        let kept = store.create();
        store.delete(&MessageId::new());

        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_id(), Some(&kept));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = store();
        let first = store.create();
        let second = store.create();

        // Deleting an unselected message keeps the selection
        store.delete(&first);
        assert_eq!(store.selected_id(), Some(&second));

        store.delete(&second);
        assert!(store.selected_id().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_missing_id_is_a_noop() {
        let mut store = store();
        let id = store.create();
        let text_before = store.messages()[0].text.clone();

        store.update(&MessageId::new(), MessagePatch::new().with_text("ghost edit"));
        assert_eq!(store.messages()[0].text, text_before);

        store.update(&id, MessagePatch::new().with_sender(Sender::Other));
        assert_eq!(store.messages()[0].sender, Sender::Other);
        assert_eq!(store.messages()[0].text, text_before);
    }

    #[test]
    fn test_stale_selection_resolves_to_none() {
        let mut store = store();
        store.create();
        store.select(Some(MessageId::new()));
        assert!(store.selected().is_none());
        assert!(store.selected_id().is_some());
    }

    #[test]
    fn test_load_template_assigns_fresh_ids_and_keeps_settings() {
        let mut store = store();
        let old_id = store.create();
        let settings_before = store.settings().clone();

        let template = template::product_demo();
        store.load_template(&template);

        assert_eq!(store.len(), template.messages.len());
        assert!(store.selected_id().is_none());
        assert_eq!(store.settings(), &settings_before);
        assert!(store.messages().iter().all(|m| m.id != old_id));
    }

    #[test]
    fn test_template_fills_missing_animation_from_default() {
        let mut store = store();
        store.set_global_defaults(SettingsPatch::new().with_default_type(AnimationKind::Glitch));

        let template = Template::named("bare").push(template::TemplateMessage::other("hey"));
        store.load_template(&template);

        assert_eq!(store.messages()[0].animation, AnimationKind::Glitch);
    }

    #[test]
    fn test_set_global_defaults_never_rewrites_existing_messages() {
        let mut store = store();
        store.create();
        let animation_before = store.messages()[0].animation;

        store.set_global_defaults(SettingsPatch::new().with_default_type(AnimationKind::Pop));
        assert_eq!(store.messages()[0].animation, animation_before);

        let id = store.create();
        let created = store.messages().iter().find(|m| m.id == id).unwrap();
        assert_eq!(created.animation, AnimationKind::Pop);
    }

    #[test]
    fn test_snapshot_hydrate_round_trip() {
        let mut store = store();
        store.create();
        store.create();
        let snapshot = store.snapshot();

        let mut other = MessageStore::new(Box::new(MemoryStorage::new()));
        other.hydrate(snapshot.clone());

        assert_eq!(other.snapshot(), snapshot);
        assert!(other.selected_id().is_none());
    }

    #[test]
    fn test_mutations_notify_the_surface() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut store = MessageStore::new(Box::new(MemoryStorage::new())).with_notifier(tx);

        store.create();
        match rx.try_recv().unwrap() {
            StudioMessage::StoreChanged { messages, selected } => {
                assert_eq!(messages.len(), 1);
                assert!(selected.is_some());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_persistence_failure_does_not_fail_the_mutation() {
        struct BrokenStorage;
        impl ProjectStorage for BrokenStorage {
            fn load(&self) -> Result<Option<ProjectSnapshot>, crate::persist::StorageError> {
                Ok(None)
            }
            fn save(
                &mut self,
                _snapshot: &ProjectSnapshot,
            ) -> Result<(), crate::persist::StorageError> {
                Err(crate::persist::StorageError::Io {
                    path: "/nowhere".into(),
                    source: std::io::Error::other("disk on fire"),
                })
            }
        }

        let mut store = MessageStore::new(Box::new(BrokenStorage));
        store.create();
        assert_eq!(store.len(), 1);
    }
}
