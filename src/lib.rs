pub mod api;
pub mod config;
pub mod dispatch;
pub(crate) mod error;
pub mod mcp;
pub mod session;
pub mod slack;
pub mod tools;

pub use error::{GatewayError, Result};
