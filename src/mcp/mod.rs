pub mod bridge;

pub use bridge::{SlackBridge, SERVER_NAME};
