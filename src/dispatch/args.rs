use super::Operation;
use crate::error::{GatewayError, Result};
use serde_json::{Map, Value};

/// Untyped tool arguments as received from the client
pub type ArgumentBag = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct ListChannelsArgs {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostMessageArgs {
    pub channel_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyToThreadArgs {
    pub channel_id: String,
    pub thread_ts: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddReactionArgs {
    pub channel_id: String,
    pub timestamp: String,
    pub reaction: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetChannelHistoryArgs {
    pub channel_id: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetThreadRepliesArgs {
    pub channel_id: String,
    pub thread_ts: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetUsersArgs {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetUserProfileArgs {
    pub user_id: String,
}

/// Typed projection of an [`ArgumentBag`] for one operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationArgs {
    ListChannels(ListChannelsArgs),
    PostMessage(PostMessageArgs),
    ReplyToThread(ReplyToThreadArgs),
    AddReaction(AddReactionArgs),
    GetChannelHistory(GetChannelHistoryArgs),
    GetThreadReplies(GetThreadRepliesArgs),
    GetUsers(GetUsersArgs),
    GetUserProfile(GetUserProfileArgs),
}

impl OperationArgs {
    /// Check required fields for `operation`, then project the bag into its typed shape.
    ///
    /// Validation is presence-only. When anything is missing the error carries the
    /// operation's whole required set, not just the absent fields.
    pub fn parse(operation: Operation, arguments: &ArgumentBag) -> Result<Self> {
        let required = operation.required_fields();
        if required
            .iter()
            .any(|field| !is_present(arguments.get(*field)))
        {
            return Err(GatewayError::MissingRequiredFields(required.to_vec()));
        }

        let fields = Fields(arguments);
        let args = match operation {
            Operation::ListChannels => OperationArgs::ListChannels(ListChannelsArgs {
                limit: fields.limit("limit"),
                cursor: fields.optional_text("cursor"),
            }),
            Operation::PostMessage => OperationArgs::PostMessage(PostMessageArgs {
                channel_id: fields.text("channel_id")?,
                text: fields.text("text")?,
            }),
            Operation::ReplyToThread => OperationArgs::ReplyToThread(ReplyToThreadArgs {
                channel_id: fields.text("channel_id")?,
                thread_ts: fields.text("thread_ts")?,
                text: fields.text("text")?,
            }),
            Operation::AddReaction => OperationArgs::AddReaction(AddReactionArgs {
                channel_id: fields.text("channel_id")?,
                timestamp: fields.text("timestamp")?,
                reaction: fields.text("reaction")?,
            }),
            Operation::GetChannelHistory => {
                OperationArgs::GetChannelHistory(GetChannelHistoryArgs {
                    channel_id: fields.text("channel_id")?,
                    limit: fields.limit("limit"),
                })
            }
            Operation::GetThreadReplies => OperationArgs::GetThreadReplies(GetThreadRepliesArgs {
                channel_id: fields.text("channel_id")?,
                thread_ts: fields.text("thread_ts")?,
            }),
            Operation::GetUsers => OperationArgs::GetUsers(GetUsersArgs {
                limit: fields.limit("limit"),
                cursor: fields.optional_text("cursor"),
            }),
            Operation::GetUserProfile => OperationArgs::GetUserProfile(GetUserProfileArgs {
                user_id: fields.text("user_id")?,
            }),
        };

        Ok(args)
    }
}

/// Truthiness as tool clients expect it: absent, null, false, 0 and "" are all missing.
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

struct Fields<'a>(&'a ArgumentBag);

impl Fields<'_> {
    /// Required field, already known to be present
    fn text(&self, key: &'static str) -> Result<String> {
        self.0
            .get(key)
            .map(stringify)
            .ok_or_else(|| GatewayError::MissingRequiredFields(vec![key]))
    }

    fn optional_text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null | Value::Array(_) | Value::Object(_) => None,
            other => Some(stringify(other)),
        }
    }

    /// Numeric page size; non-numeric values are treated as absent
    fn limit(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
