// Conversation history for multi-turn interactions

use crate::providers::types::{Message, ModelContent};
use crate::tools::types::ToolResult;

/// Append-only message history shared by every prompt of a session
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user prompt to the conversation
    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Add a model reply (text and/or function calls)
    pub fn add_model_content(&mut self, content: ModelContent) {
        self.messages.push(Message::model(content));
    }

    /// Add the result of one dispatched function call
    pub fn add_tool_result(&mut self, result: ToolResult) {
        self.messages.push(Message::tool(result));
    }

    /// Messages in the order they were appended
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Number of user prompts accepted so far
    pub fn prompt_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, Message::User { .. }))
            .count()
    }
}
