// Conversation loop: history, retry policy and the driver

pub mod driver;
pub mod history;
pub mod retry;

pub use driver::{ConversationDriver, PromptOutcome, DEFAULT_SYSTEM_INSTRUCTION};
pub use history::ConversationHistory;
pub use retry::RetryPolicy;
