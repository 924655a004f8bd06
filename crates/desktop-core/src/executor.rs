use async_trait::async_trait;

use crate::action::ActionRequest;
use crate::envelope::ResultEnvelope;
use crate::schema::ToolSchema;

/// Entry point the agent loop calls for each computer-use tool invocation.
///
/// Implementations never fail: every outcome, including transport and
/// validation failures, is reported inside the returned envelope.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, request: &ActionRequest) -> ResultEnvelope;
    fn list_actions(&self) -> Vec<ToolSchema>;
}
