pub mod coordinator;
pub mod envelope;
pub mod service;

pub use coordinator::ChatCoordinator;
pub use envelope::{ChatOutcome, PromptDigest, Reply, SessionSummary, Strategy};
pub use service::{ChatService, ServiceReply};
