//! Conversation Templates
//!
//! Ready-made conversations the editor can load as a starting point.
//! A template carries no ids and no wall-clock timestamps; those are
//! assigned fresh each time it is instantiated, so loading the same
//! template twice never produces colliding ids.

use serde::{Deserialize, Serialize};

use crate::message::{local_clock, AnimationKind, Message, MessageId, Sender, MIN_DURATION_MS};
use crate::settings::GlobalSettings;

/// A named, reusable conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    /// Display name
    pub name: String,
    /// The conversation entries, in playback order
    pub messages: Vec<TemplateMessage>,
}

impl Template {
    /// An empty template with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Append an entry
    #[must_use]
    pub fn push(mut self, message: TemplateMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Materialize into store messages
    ///
    /// Fresh ids and timestamps every time; entries without an
    /// explicit animation take the current default type.
    pub fn instantiate(&self, settings: &GlobalSettings) -> Vec<Message> {
        self.messages
            .iter()
            .map(|entry| Message {
                id: MessageId::new(),
                text: entry.text.clone(),
                sender: entry.sender,
                delay: entry.delay,
                duration: entry.duration.max(MIN_DURATION_MS),
                avatar: entry.avatar.clone(),
                animation: entry.animation.unwrap_or(settings.default_type),
                timestamp: local_clock(),
            })
            .collect()
    }
}

/// One entry of a template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateMessage {
    /// Bubble text
    pub text: String,
    /// Conversation side
    pub sender: Sender,
    /// Pre-appearance delay (ms)
    pub delay: u64,
    /// Animation duration (ms)
    pub duration: u64,
    /// Avatar glyph
    pub avatar: String,
    /// Explicit animation; `None` takes the default type at load time
    pub animation: Option<AnimationKind>,
}

impl TemplateMessage {
    /// Entry on the sending side
    pub fn own(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Own,
            delay: 800,
            duration: 500,
            avatar: "@".to_string(),
            animation: None,
        }
    }

    /// Entry on the receiving side
    pub fn other(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Other,
            avatar: "*".to_string(),
            ..Self::own(text)
        }
    }

    /// Set the delay
    #[must_use]
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay = ms;
        self
    }

    /// Set an explicit animation
    #[must_use]
    pub fn with_animation(mut self, kind: AnimationKind) -> Self {
        self.animation = Some(kind);
        self
    }
}

/// All built-in templates, in menu order
pub fn builtins() -> Vec<Template> {
    vec![product_demo(), support_chat(), team_standup()]
}

/// A short marketing walkthrough of a fictional product
pub fn product_demo() -> Template {
    Template::named("Product demo")
        .push(TemplateMessage::other("Hey! Have you tried the new release?").with_delay(400))
        .push(TemplateMessage::own("Not yet, what's in it?"))
        .push(
            TemplateMessage::other("One-click export, finally.")
                .with_animation(AnimationKind::Pop),
        )
        .push(TemplateMessage::own("Okay, that I need. Installing now."))
        .push(
            TemplateMessage::other("You won't regret it \u{1f680}")
                .with_delay(1200)
                .with_animation(AnimationKind::Bounce),
        )
}

/// A customer support exchange
pub fn support_chat() -> Template {
    Template::named("Support chat")
        .push(TemplateMessage::own("Hi, my invoice shows the wrong plan.").with_delay(400))
        .push(TemplateMessage::other("Sorry about that! Checking your account."))
        .push(TemplateMessage::other("Fixed - the credit lands today.").with_delay(1500))
        .push(TemplateMessage::own("That was fast, thank you!"))
}

/// A three-line morning standup
pub fn team_standup() -> Template {
    Template::named("Team standup")
        .push(TemplateMessage::other("Morning! Yesterday: shipped the editor.").with_delay(400))
        .push(TemplateMessage::other("Today: playback polish. No blockers."))
        .push(TemplateMessage::own("Nice. I'll take review duty."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_assigns_fresh_ids_each_time() {
        let settings = GlobalSettings::default();
        let template = product_demo();

        let first = template.instantiate(&settings);
        let second = template.instantiate(&settings);

        assert_eq!(first.len(), template.messages.len());
        for (a, b) in first.iter().zip(&second) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn test_explicit_animation_survives_instantiation() {
        let settings = GlobalSettings::default();
        let messages = product_demo().instantiate(&settings);

        // Third entry pins Pop explicitly, others take the default
        assert_eq!(messages[2].animation, AnimationKind::Pop);
        assert_eq!(messages[0].animation, settings.default_type);
    }

    #[test]
    fn test_builtins_are_nonempty() {
        for template in builtins() {
            assert!(!template.messages.is_empty(), "{} is empty", template.name);
        }
    }
}
