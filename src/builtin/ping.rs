//! Ping command — round-trip check with an uptime report

use std::time::Instant;

use async_trait::async_trait;

use crate::handlers::{CommandExec, InteractionCtx};
use crate::interaction::Notice;
use crate::util::format_uptime;
use crate::Result;

/// Replies with the process uptime
pub struct PingCommand {
    started: Instant,
}

impl PingCommand {
    /// Create a ping command anchored at the given start time
    #[must_use]
    pub const fn new(started: Instant) -> Self {
        Self { started }
    }
}

#[async_trait]
impl CommandExec for PingCommand {
    async fn execute(&self, cx: InteractionCtx<'_>) -> Result<()> {
        let uptime = format_uptime(self.started.elapsed());
        cx.responder
            .reply(Notice::text(format!("Pong! Uptime: {uptime}")))
            .await
    }
}
