use std::fmt;

/// Slack operations reachable through tool calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListChannels,
    PostMessage,
    ReplyToThread,
    AddReaction,
    GetChannelHistory,
    GetThreadReplies,
    GetUsers,
    GetUserProfile,
}

impl Operation {
    /// Every operation, in catalog order
    pub const ALL: [Operation; 8] = [
        Operation::ListChannels,
        Operation::PostMessage,
        Operation::ReplyToThread,
        Operation::AddReaction,
        Operation::GetChannelHistory,
        Operation::GetThreadReplies,
        Operation::GetUsers,
        Operation::GetUserProfile,
    ];

    /// Tool identifier clients use to invoke this operation
    pub const fn tool_name(self) -> &'static str {
        match self {
            Operation::ListChannels => "slack_list_channels",
            Operation::PostMessage => "slack_post_message",
            Operation::ReplyToThread => "slack_reply_to_thread",
            Operation::AddReaction => "slack_add_reaction",
            Operation::GetChannelHistory => "slack_get_channel_history",
            Operation::GetThreadReplies => "slack_get_thread_replies",
            Operation::GetUsers => "slack_get_users",
            Operation::GetUserProfile => "slack_get_user_profile",
        }
    }

    /// Exact-match lookup; no prefix or case folding
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tool_name() == name)
    }

    /// Fields that must be present (and non-empty) before the call is made
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Operation::ListChannels | Operation::GetUsers => &[],
            Operation::PostMessage => &["channel_id", "text"],
            Operation::ReplyToThread => &["channel_id", "thread_ts", "text"],
            Operation::AddReaction => &["channel_id", "timestamp", "reaction"],
            Operation::GetChannelHistory => &["channel_id"],
            Operation::GetThreadReplies => &["channel_id", "thread_ts"],
            Operation::GetUserProfile => &["user_id"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tool_name())
    }
}
