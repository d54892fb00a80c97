use crate::slack::SlackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No arguments provided")]
    MissingArguments,

    #[error("{}", missing_fields_message(.0))]
    MissingRequiredFields(Vec<&'static str>),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    UpstreamOperationFailed(#[from] SlackError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("No active session")]
    NoActiveSession,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Render a required-field list the way clients have always seen it:
/// "argument: a", "arguments: a and b", "arguments: a, b, and c".
fn missing_fields_message(fields: &[&'static str]) -> String {
    match fields {
        [] => "Missing required arguments".to_string(),
        [only] => format!("Missing required argument: {}", only),
        [first, second] => format!("Missing required arguments: {} and {}", first, second),
        [rest @ .., last] => format!(
            "Missing required arguments: {}, and {}",
            rest.join(", "),
            last
        ),
    }
}

impl GatewayError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            GatewayError::MissingArguments => StatusCode::BAD_REQUEST,
            GatewayError::MissingRequiredFields(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnknownTool(_) => StatusCode::NOT_FOUND,
            GatewayError::UpstreamOperationFailed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::NoActiveSession => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Json(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Helper for errors that only carry a displayable cause
    pub fn invalid_request(err: impl std::fmt::Display) -> Self {
        GatewayError::InvalidRequest(err.to_string())
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
