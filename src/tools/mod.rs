//! Static catalog of the tools advertised to MCP clients.

use crate::dispatch::Operation;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Represents an advertised tool
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

const THREAD_TS_DESCRIPTION: &str = "The timestamp of the parent message in the format \
    '1234567890.123456'. Timestamps in the format without the period can be converted by \
    adding the period such that 6 numbers come after it.";

static CATALOG: Lazy<Vec<ToolDescriptor>> = Lazy::new(|| {
    vec![
        ToolDescriptor {
            name: Operation::ListChannels.tool_name(),
            description: "List public channels in the workspace with pagination",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of channels to return (default 100, max 200)",
                        "default": 100,
                    },
                    "cursor": {
                        "type": "string",
                        "description": "Pagination cursor for next page of results",
                    },
                },
            }),
        },
        ToolDescriptor {
            name: Operation::PostMessage.tool_name(),
            description: "Post a new message to a Slack channel",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "The ID of the channel to post to",
                    },
                    "text": {
                        "type": "string",
                        "description": "The message text to post",
                    },
                },
                "required": ["channel_id", "text"],
            }),
        },
        ToolDescriptor {
            name: Operation::ReplyToThread.tool_name(),
            description: "Reply to a specific message thread in Slack",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "The ID of the channel containing the thread",
                    },
                    "thread_ts": {
                        "type": "string",
                        "description": THREAD_TS_DESCRIPTION,
                    },
                    "text": {
                        "type": "string",
                        "description": "The reply text",
                    },
                },
                "required": ["channel_id", "thread_ts", "text"],
            }),
        },
        ToolDescriptor {
            name: Operation::AddReaction.tool_name(),
            description: "Add a reaction emoji to a message",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "The ID of the channel containing the message",
                    },
                    "timestamp": {
                        "type": "string",
                        "description": "The timestamp of the message to react to",
                    },
                    "reaction": {
                        "type": "string",
                        "description": "The name of the emoji reaction (without ::)",
                    },
                },
                "required": ["channel_id", "timestamp", "reaction"],
            }),
        },
        ToolDescriptor {
            name: Operation::GetChannelHistory.tool_name(),
            description: "Get recent messages from a channel",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "The ID of the channel",
                    },
                    "limit": {
                        "type": "number",
                        "description": "Number of messages to retrieve (default 10)",
                        "default": 10,
                    },
                },
                "required": ["channel_id"],
            }),
        },
        ToolDescriptor {
            name: Operation::GetThreadReplies.tool_name(),
            description: "Get all replies in a message thread",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channel_id": {
                        "type": "string",
                        "description": "The ID of the channel containing the thread",
                    },
                    "thread_ts": {
                        "type": "string",
                        "description": THREAD_TS_DESCRIPTION,
                    },
                },
                "required": ["channel_id", "thread_ts"],
            }),
        },
        ToolDescriptor {
            name: Operation::GetUsers.tool_name(),
            description: "Get a list of all users in the workspace with their basic profile information",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "cursor": {
                        "type": "string",
                        "description": "Pagination cursor for next page of results",
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of users to return (default 100, max 200)",
                        "default": 100,
                    },
                },
            }),
        },
        ToolDescriptor {
            name: Operation::GetUserProfile.tool_name(),
            description: "Get detailed profile information for a specific user",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The ID of the user",
                    },
                },
                "required": ["user_id"],
            }),
        },
    ]
});

/// The full catalog, in advertised order
pub fn catalog() -> &'static [ToolDescriptor] {
    &CATALOG
}
