//! Platform channel adapters
//!
//! Adapters translate platform payloads into the crate's inbound event
//! model and implement [`crate::interaction::Responder`] over the platform
//! connection. The dispatch core never touches platform types directly.

mod discord;

pub use discord::{DiscordGateway, InteractionResponder, MessageResponder};
