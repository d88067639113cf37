//! Dispatcher — routes inbound events to exactly one handler
//!
//! Lookups are O(1) for literal keys; component identifiers fall back to an
//! ordered predicate scan. A failing handler is contained at this boundary:
//! it is logged with the originating event ID and answered with a sanitized
//! notice on the surface matching the event's response state. Nothing here
//! ever propagates an error into the event loop.

use crate::handlers::{InteractionCtx, MessageCtx};
use crate::interaction::{InboundEvent, InteractionEvent, MessageEvent, Notice, Responder};
use crate::registry::{ComponentTable, Registry};
use crate::Result;

/// Routes inbound events against a registry snapshot
#[derive(Debug, Clone)]
pub struct Dispatcher {
    prefix: String,
}

impl Dispatcher {
    /// Create a dispatcher with the configured text-command prefix
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The configured text-command prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Dispatch one inbound event
    ///
    /// Never returns an error: lookup misses are logged and dropped, and
    /// handler failures are converted into a sanitized reply.
    pub async fn dispatch(
        &self,
        registry: &Registry,
        event: &InboundEvent,
        responder: &dyn Responder,
    ) {
        match event {
            InboundEvent::SlashCommand(ev) => {
                let Some(command) = registry.command(&ev.key) else {
                    tracing::warn!(command = %ev.key, "no matching slash command");
                    return;
                };
                let outcome = command
                    .exec
                    .execute(InteractionCtx {
                        event: ev,
                        responder,
                    })
                    .await;
                self.contain(ev, outcome, responder).await;
            }
            InboundEvent::ButtonClick(ev) => {
                self.dispatch_component(registry.buttons(), "button", ev, responder)
                    .await;
            }
            InboundEvent::ModalSubmit(ev) => {
                self.dispatch_component(registry.modals(), "modal", ev, responder)
                    .await;
            }
            InboundEvent::SelectMenu(ev) => {
                self.dispatch_component(registry.menus(), "menu", ev, responder)
                    .await;
            }
            InboundEvent::Message(msg) => self.dispatch_message(registry, msg, responder).await,
        }
    }

    async fn dispatch_component(
        &self,
        table: &ComponentTable,
        kind: &'static str,
        ev: &InteractionEvent,
        responder: &dyn Responder,
    ) {
        let Some(handler) = table.resolve(&ev.key) else {
            tracing::warn!(kind, custom_id = %ev.key, "no matching component handler");
            return;
        };

        let outcome = handler
            .exec
            .execute(InteractionCtx {
                event: ev,
                responder,
            })
            .await;
        self.contain(ev, outcome, responder).await;
    }

    async fn dispatch_message(
        &self,
        registry: &Registry,
        msg: &MessageEvent,
        responder: &dyn Responder,
    ) {
        if msg.author_is_bot {
            return;
        }

        // Ordinary chat is not a lookup miss; only prefixed text is routed.
        let Some(name) = self.trigger_name(&msg.content) else {
            return;
        };

        let Some(trigger) = registry.trigger(&name) else {
            tracing::warn!(trigger = %name, "no matching message trigger");
            return;
        };

        if !msg.guild {
            if let Err(e) = responder.reply(Notice::guild_only()).await {
                tracing::error!(message = %msg.id, error = %e, "failed to send restriction notice");
            }
            return;
        }

        let outcome = trigger
            .exec
            .execute(MessageCtx {
                message: msg,
                responder,
            })
            .await;

        if let Err(e) = outcome {
            tracing::error!(
                trigger = %trigger.name,
                message = %msg.id,
                error = %e,
                "message trigger failed"
            );
            if let Err(e2) = responder.reply(Notice::execution_error()).await {
                tracing::error!(message = %msg.id, error = %e2, "failed to send error notice");
            }
        }
    }

    /// Extract the lower-cased trigger name from prefixed message content
    fn trigger_name(&self, content: &str) -> Option<String> {
        let lowered = content.to_lowercase();
        let rest = lowered.strip_prefix(&self.prefix.to_lowercase())?;
        let name = rest.split_whitespace().next()?;
        Some(name.to_string())
    }

    /// Contain a handler failure and answer on the state-appropriate surface
    async fn contain(
        &self,
        ev: &InteractionEvent,
        outcome: Result<()>,
        responder: &dyn Responder,
    ) {
        let Err(e) = outcome else {
            return;
        };

        tracing::error!(interaction = %ev.id, key = %ev.key, error = %e, "handler failed");

        let notice = Notice::execution_error();
        let sent = if responder.is_deferred() && !responder.is_replied() {
            responder.edit_reply(notice).await
        } else if responder.is_replied() {
            responder.follow_up(notice).await
        } else {
            responder.reply(notice).await
        };

        if let Err(e2) = sent {
            tracing::error!(interaction = %ev.id, error = %e2, "failed to send error notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_name_requires_prefix() {
        let dispatcher = Dispatcher::new("!");
        assert_eq!(dispatcher.trigger_name("!uptime now"), Some("uptime".to_string()));
        assert_eq!(dispatcher.trigger_name("uptime"), None);
    }

    #[test]
    fn trigger_name_is_case_insensitive() {
        let dispatcher = Dispatcher::new("!");
        assert_eq!(dispatcher.trigger_name("!UpTime"), Some("uptime".to_string()));
    }

    #[test]
    fn bare_prefix_has_no_trigger_name() {
        let dispatcher = Dispatcher::new("!");
        assert_eq!(dispatcher.trigger_name("!"), None);
        assert_eq!(dispatcher.trigger_name("!   "), None);
    }
}
