use super::args::OperationArgs;
use super::types::{ResponseEnvelope, ToolCallRequest};
use super::Operation;
use crate::error::{GatewayError, Result};
use crate::slack::SlackApi;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Routes tool calls to exactly one Slack operation and wraps the outcome.
///
/// `dispatch` never fails: validation errors, unknown tools and upstream
/// errors all come back as a [`ResponseEnvelope`] with an `error` payload.
#[derive(Clone)]
pub struct DispatchRouter {
    api: Arc<dyn SlackApi>,
}

impl DispatchRouter {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }

    pub async fn dispatch(&self, request: ToolCallRequest) -> ResponseEnvelope {
        info!(
            tool = %request.name,
            has_arguments = request.arguments.is_some(),
            "Received CallToolRequest"
        );

        match self.try_dispatch(&request).await {
            Ok(result) => ResponseEnvelope::success(&result),
            Err(e) => {
                error!(tool = %request.name, error = %e, "Error executing tool");
                ResponseEnvelope::failure(e)
            }
        }
    }

    async fn try_dispatch(&self, request: &ToolCallRequest) -> Result<Value> {
        let arguments = request
            .arguments
            .as_ref()
            .ok_or(GatewayError::MissingArguments)?;

        let operation = Operation::from_tool_name(&request.name)
            .ok_or_else(|| GatewayError::UnknownTool(request.name.clone()))?;

        let args = OperationArgs::parse(operation, arguments)?;
        debug!(tool = %operation, "Arguments validated, calling Slack");

        self.invoke(args).await
    }

    async fn invoke(&self, args: OperationArgs) -> Result<Value> {
        let api = self.api.as_ref();
        let result = match args {
            OperationArgs::ListChannels(a) => api.get_channels(a.limit, a.cursor).await,
            OperationArgs::PostMessage(a) => api.post_message(&a.channel_id, &a.text).await,
            OperationArgs::ReplyToThread(a) => {
                api.post_reply(&a.channel_id, &a.thread_ts, &a.text).await
            }
            OperationArgs::AddReaction(a) => {
                api.add_reaction(&a.channel_id, &a.timestamp, &a.reaction)
                    .await
            }
            OperationArgs::GetChannelHistory(a) => {
                api.get_channel_history(&a.channel_id, a.limit).await
            }
            OperationArgs::GetThreadReplies(a) => {
                api.get_thread_replies(&a.channel_id, &a.thread_ts).await
            }
            OperationArgs::GetUsers(a) => api.get_users(a.limit, a.cursor).await,
            OperationArgs::GetUserProfile(a) => api.get_user_profile(&a.user_id).await,
        }?;

        Ok(result)
    }
}
