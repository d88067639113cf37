//! Discord gateway adapter using serenity

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serenity::Client;
use serenity::all::{
    ActionRowComponent, CommandInteraction, ComponentInteraction, ComponentInteractionDataKind,
    Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EditInteractionResponse, EventHandler, GatewayIntents,
    Interaction, Message, ModalInteraction, Ready,
};
use serenity::http::Http;

use crate::host::Host;
use crate::interaction::{
    GatewayEventName, GatewayPayload, InboundEvent, InteractionEvent, MessageEvent, Notice,
    Responder,
};
use crate::{Error, Result};

/// Discord gateway adapter
///
/// Connects the host to Discord: inbound gateway events are classified into
/// the crate's event model and dispatched; SIGINT/SIGTERM shut the shards
/// down cleanly.
pub struct DiscordGateway {
    token: SecretString,
    host: Arc<Host>,
}

impl DiscordGateway {
    /// Create a gateway adapter for the given bot token
    #[must_use]
    pub const fn new(token: SecretString, host: Arc<Host>) -> Self {
        Self { token, host }
    }

    /// Connect and run until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be built or the connection
    /// fails.
    pub async fn run(self) -> Result<()> {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = GatewayHandler {
            host: self.host.clone(),
        };

        let mut client = Client::builder(self.token.expose_secret(), intents)
            .event_handler(handler)
            .await
            .map_err(|e| Error::Channel(format!("Discord client error: {e}")))?;

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            wait_for_shutdown().await;
            shard_manager.shutdown_all().await;
        });

        client
            .start()
            .await
            .map_err(|e| Error::Channel(format!("Discord connection error: {e}")))
    }
}

/// Block until SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT, shutting down"),
        () = terminate => tracing::info!("SIGTERM, shutting down"),
    }
}

/// Serenity event handler bridging into the host
struct GatewayHandler {
    host: Arc<Host>,
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "gateway connected");
        self.host
            .emit(
                GatewayEventName::Ready,
                &GatewayPayload::Ready {
                    username: ready.user.name.clone(),
                },
            )
            .await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let event = MessageEvent {
            id: msg.id.to_string(),
            channel_id: msg.channel_id.to_string(),
            author_id: msg.author.id.to_string(),
            author_is_bot: msg.author.bot,
            guild: msg.guild_id.is_some(),
            content: msg.content.clone(),
        };

        self.host
            .emit(
                GatewayEventName::MessageCreate,
                &GatewayPayload::Message(event.clone()),
            )
            .await;

        let responder = MessageResponder::new(ctx.http.clone(), msg);
        self.host
            .dispatch(&InboundEvent::Message(event), &responder)
            .await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // Other interaction subtypes (autocomplete, ping) are not routed
        let Some((event, raw)) = classify(interaction) else {
            return;
        };

        if let InboundEvent::SlashCommand(ev)
        | InboundEvent::ButtonClick(ev)
        | InboundEvent::ModalSubmit(ev)
        | InboundEvent::SelectMenu(ev) = &event
        {
            self.host
                .emit(
                    GatewayEventName::InteractionCreate,
                    &GatewayPayload::Interaction {
                        id: ev.id.clone(),
                        key: ev.key.clone(),
                    },
                )
                .await;
        }

        let responder = InteractionResponder::new(ctx.http.clone(), raw);
        self.host.dispatch(&event, &responder).await;
    }
}

/// Classify a serenity interaction into the inbound event model
fn classify(interaction: Interaction) -> Option<(InboundEvent, AnyInteraction)> {
    match interaction {
        Interaction::Command(cmd) => {
            let event = InteractionEvent {
                id: cmd.id.to_string(),
                key: cmd.data.name.clone(),
                user_id: cmd.user.id.to_string(),
                guild: cmd.guild_id.is_some(),
                values: Vec::new(),
                fields: HashMap::new(),
            };
            Some((
                InboundEvent::SlashCommand(event),
                AnyInteraction::Command(cmd),
            ))
        }
        Interaction::Component(component) => {
            let event = InteractionEvent {
                id: component.id.to_string(),
                key: component.data.custom_id.clone(),
                user_id: component.user.id.to_string(),
                guild: component.guild_id.is_some(),
                values: Vec::new(),
                fields: HashMap::new(),
            };
            match &component.data.kind {
                ComponentInteractionDataKind::Button => Some((
                    InboundEvent::ButtonClick(event),
                    AnyInteraction::Component(component),
                )),
                ComponentInteractionDataKind::StringSelect { values } => {
                    let event = InteractionEvent {
                        values: values.clone(),
                        ..event
                    };
                    Some((
                        InboundEvent::SelectMenu(event),
                        AnyInteraction::Component(component),
                    ))
                }
                _ => None,
            }
        }
        Interaction::Modal(modal) => {
            let mut fields = HashMap::new();
            for row in &modal.data.components {
                for component in &row.components {
                    if let ActionRowComponent::InputText(input) = component {
                        if let Some(value) = &input.value {
                            fields.insert(input.custom_id.clone(), value.clone());
                        }
                    }
                }
            }

            let event = InteractionEvent {
                id: modal.id.to_string(),
                key: modal.data.custom_id.clone(),
                user_id: modal.user.id.to_string(),
                guild: modal.guild_id.is_some(),
                values: Vec::new(),
                fields,
            };
            Some((InboundEvent::ModalSubmit(event), AnyInteraction::Modal(modal)))
        }
        _ => None,
    }
}

/// The three repliable interaction shapes
enum AnyInteraction {
    Command(CommandInteraction),
    Component(ComponentInteraction),
    Modal(ModalInteraction),
}

/// Reply surface over a serenity interaction
///
/// Tracks response state locally: handlers reply through this surface, so
/// the deferred/replied flags stay accurate for the dispatcher's error
/// containment.
pub struct InteractionResponder {
    http: Arc<Http>,
    interaction: AnyInteraction,
    deferred: AtomicBool,
    replied: AtomicBool,
}

impl InteractionResponder {
    fn new(http: Arc<Http>, interaction: AnyInteraction) -> Self {
        Self {
            http,
            interaction,
            deferred: AtomicBool::new(false),
            replied: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    fn is_deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    fn is_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    async fn defer(&self) -> Result<()> {
        let response = CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new());
        match &self.interaction {
            AnyInteraction::Command(i) => i.create_response(&self.http, response).await,
            AnyInteraction::Component(i) => i.create_response(&self.http, response).await,
            AnyInteraction::Modal(i) => i.create_response(&self.http, response).await,
        }
        .map_err(|e| Error::Channel(format!("Discord defer error: {e}")))?;

        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn reply(&self, notice: Notice) -> Result<()> {
        let message = CreateInteractionResponseMessage::new()
            .content(notice.text)
            .ephemeral(notice.ephemeral);
        let response = CreateInteractionResponse::Message(message);

        match &self.interaction {
            AnyInteraction::Command(i) => i.create_response(&self.http, response).await,
            AnyInteraction::Component(i) => i.create_response(&self.http, response).await,
            AnyInteraction::Modal(i) => i.create_response(&self.http, response).await,
        }
        .map_err(|e| Error::Channel(format!("Discord reply error: {e}")))?;

        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit_reply(&self, notice: Notice) -> Result<()> {
        let edit = EditInteractionResponse::new().content(notice.text);

        match &self.interaction {
            AnyInteraction::Command(i) => i.edit_response(&self.http, edit).await,
            AnyInteraction::Component(i) => i.edit_response(&self.http, edit).await,
            AnyInteraction::Modal(i) => i.edit_response(&self.http, edit).await,
        }
        .map_err(|e| Error::Channel(format!("Discord edit error: {e}")))?;

        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, notice: Notice) -> Result<()> {
        let followup = CreateInteractionResponseFollowup::new()
            .content(notice.text)
            .ephemeral(notice.ephemeral);

        match &self.interaction {
            AnyInteraction::Command(i) => i.create_followup(&self.http, followup).await,
            AnyInteraction::Component(i) => i.create_followup(&self.http, followup).await,
            AnyInteraction::Modal(i) => i.create_followup(&self.http, followup).await,
        }
        .map_err(|e| Error::Channel(format!("Discord follow-up error: {e}")))?;

        Ok(())
    }
}

/// Reply surface over a plain message
///
/// Messages have no deferral or ephemerality; edits and follow-ups degrade
/// to another reply in the originating channel.
pub struct MessageResponder {
    http: Arc<Http>,
    message: Message,
    replied: AtomicBool,
}

impl MessageResponder {
    fn new(http: Arc<Http>, message: Message) -> Self {
        Self {
            http,
            message,
            replied: AtomicBool::new(false),
        }
    }

    async fn send(&self, notice: Notice) -> Result<()> {
        self.message
            .reply(&self.http, notice.text)
            .await
            .map_err(|e| Error::Channel(format!("Discord reply error: {e}")))?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Responder for MessageResponder {
    fn is_deferred(&self) -> bool {
        false
    }

    fn is_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    async fn defer(&self) -> Result<()> {
        Ok(())
    }

    async fn reply(&self, notice: Notice) -> Result<()> {
        self.send(notice).await
    }

    async fn edit_reply(&self, notice: Notice) -> Result<()> {
        self.send(notice).await
    }

    async fn follow_up(&self, notice: Notice) -> Result<()> {
        self.send(notice).await
    }
}
