pub mod args;
pub mod operation;
pub mod router;
pub mod types;

pub use args::{ArgumentBag, OperationArgs};
pub use operation::Operation;
pub use router::DispatchRouter;
pub use types::{EnvelopeContent, ResponseEnvelope, ToolCallRequest};
