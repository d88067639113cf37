//! Uptime message trigger

use std::time::Instant;

use async_trait::async_trait;

use crate::handlers::{MessageCtx, MessageExec};
use crate::interaction::Notice;
use crate::util::format_uptime;
use crate::Result;

/// Replies to `<prefix>uptime` with the process uptime
pub struct UptimeTrigger {
    started: Instant,
}

impl UptimeTrigger {
    /// Create an uptime trigger anchored at the given start time
    #[must_use]
    pub const fn new(started: Instant) -> Self {
        Self { started }
    }
}

#[async_trait]
impl MessageExec for UptimeTrigger {
    async fn execute(&self, cx: MessageCtx<'_>) -> Result<()> {
        let uptime = format_uptime(self.started.elapsed());
        cx.responder
            .reply(Notice::text(format!("Up for {uptime}")))
            .await
    }
}
