//! Ready event — logs the authenticated account

use async_trait::async_trait;

use crate::handlers::LifecycleExec;
use crate::interaction::GatewayPayload;
use crate::Result;

/// Logs the account name once the gateway connection is up
pub struct ReadyEvent;

#[async_trait]
impl LifecycleExec for ReadyEvent {
    async fn execute(&self, payload: &GatewayPayload) -> Result<()> {
        if let GatewayPayload::Ready { username } = payload {
            tracing::info!(user = %username, "client ready");
        }
        Ok(())
    }
}
