//! Inbound event model and reply surfaces
//!
//! The gateway adapter translates platform payloads into these types; the
//! dispatcher and handlers never see platform-specific structs. Replies go
//! back through the [`Responder`] trait, which also tracks the response
//! state (deferred / replied) used to pick the error surface.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::Result;

/// Gateway lifecycle event names
///
/// These are the events lifecycle handlers may bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventName {
    /// Connection established, identity known
    Ready,
    /// A message was created in a channel the bot can see
    MessageCreate,
    /// Any interaction (command, component, modal) arrived
    InteractionCreate,
}

impl GatewayEventName {
    /// Parse from a manifest string like `"messageCreate"`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ready" | "clientReady" => Some(Self::Ready),
            "messageCreate" => Some(Self::MessageCreate),
            "interactionCreate" => Some(Self::InteractionCreate),
            _ => None,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::MessageCreate => "messageCreate",
            Self::InteractionCreate => "interactionCreate",
        }
    }
}

impl std::fmt::Display for GatewayEventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload forwarded to lifecycle handlers
#[derive(Debug, Clone)]
pub enum GatewayPayload {
    /// Connection is up
    Ready {
        /// Account user name the gateway authenticated as
        username: String,
    },
    /// A message arrived
    Message(MessageEvent),
    /// An interaction arrived (summary only; full routing happens in dispatch)
    Interaction {
        /// Interaction ID
        id: String,
        /// Command name or component custom ID
        key: String,
    },
}

/// An interaction-style inbound event (command, component or modal)
#[derive(Debug, Clone, Default)]
pub struct InteractionEvent {
    /// Platform interaction ID
    pub id: String,

    /// Routing key: command name for slash commands, custom ID otherwise
    pub key: String,

    /// Invoking user ID
    pub user_id: String,

    /// Whether the interaction originated in a server context
    pub guild: bool,

    /// Selected values (select menus)
    pub values: Vec<String>,

    /// Submitted fields keyed by input custom ID (modals)
    pub fields: HashMap<String, String>,
}

/// A plain message inbound event
#[derive(Debug, Clone, Default)]
pub struct MessageEvent {
    /// Platform message ID
    pub id: String,

    /// Channel the message was posted in
    pub channel_id: String,

    /// Author user ID
    pub author_id: String,

    /// Whether the author is a bot account
    pub author_is_bot: bool,

    /// Whether the message originated in a server context
    pub guild: bool,

    /// Raw message content
    pub content: String,
}

/// An inbound platform event, classified by kind
///
/// Only these kinds are routed; other platform interaction subtypes are
/// ignored upstream in the gateway adapter.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// Slash command invocation
    SlashCommand(InteractionEvent),
    /// Button click
    ButtonClick(InteractionEvent),
    /// Modal submission
    ModalSubmit(InteractionEvent),
    /// String select menu choice
    SelectMenu(InteractionEvent),
    /// Plain message
    Message(MessageEvent),
}

impl InboundEvent {
    /// The event's routing identifier (command name, custom ID or message ID)
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::SlashCommand(ev)
            | Self::ButtonClick(ev)
            | Self::ModalSubmit(ev)
            | Self::SelectMenu(ev) => &ev.key,
            Self::Message(msg) => &msg.id,
        }
    }
}

/// Sanitized outbound content
///
/// Carries fixed user-facing text only; raw handler errors never reach a
/// `Notice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text
    pub text: String,

    /// Whether the message should be visible to the invoking user only
    pub ephemeral: bool,
}

impl Notice {
    /// Create a plain visible notice
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: false,
        }
    }

    /// Create an ephemeral notice
    #[must_use]
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }

    /// The sanitized failure notice shown when a handler errors
    #[must_use]
    pub fn execution_error() -> Self {
        Self::ephemeral("An error occurred while handling this interaction.")
    }

    /// Notice shown when a server-only trigger is used outside a server
    #[must_use]
    pub fn guild_only() -> Self {
        Self::text("You can only use this command within a server.")
    }
}

/// Reply surface for an inbound event
///
/// Implementations wrap the platform connection for one originating event
/// and track its response state. For message surfaces `edit_reply` and
/// `follow_up` degrade to a plain reply and `defer` is a no-op.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Whether the event has been provisionally acknowledged without a
    /// final reply
    fn is_deferred(&self) -> bool;

    /// Whether the event has been fully replied to
    fn is_replied(&self) -> bool;

    /// Acknowledge the event, promising a reply later
    async fn defer(&self) -> Result<()>;

    /// Send a fresh reply
    async fn reply(&self, notice: Notice) -> Result<()>;

    /// Edit a previously sent acknowledgment or reply
    async fn edit_reply(&self, notice: Notice) -> Result<()>;

    /// Send a supplementary reply after the first one
    async fn follow_up(&self, notice: Notice) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_name_round_trip() {
        for name in [
            GatewayEventName::Ready,
            GatewayEventName::MessageCreate,
            GatewayEventName::InteractionCreate,
        ] {
            assert_eq!(GatewayEventName::parse(name.as_str()), Some(name));
        }
    }

    #[test]
    fn event_name_legacy_alias() {
        assert_eq!(
            GatewayEventName::parse("clientReady"),
            Some(GatewayEventName::Ready)
        );
    }

    #[test]
    fn unknown_event_name() {
        assert_eq!(GatewayEventName::parse("presenceUpdate"), None);
    }

    #[test]
    fn inbound_key_for_interactions() {
        let ev = InteractionEvent {
            key: "confirm_42".to_string(),
            ..Default::default()
        };
        assert_eq!(InboundEvent::ButtonClick(ev).key(), "confirm_42");
    }

    #[test]
    fn error_notice_is_ephemeral_and_sanitized() {
        let notice = Notice::execution_error();
        assert!(notice.ephemeral);
        assert!(!notice.text.contains("stack"));
    }
}
