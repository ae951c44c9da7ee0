// Provider-neutral conversation and request/response types
//
// The conversation history is stored in these types; each provider maps
// them onto its own wire format.

use crate::tools::types::{ToolCall, ToolDefinition, ToolResult};
use serde::{Deserialize, Serialize};

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Prompt typed by the user
    User { text: String },

    /// Reply content produced by the model
    Model { content: ModelContent },

    /// Result of one dispatched function call
    Tool { result: ToolResult },
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    pub fn model(content: ModelContent) -> Self {
        Self::Model { content }
    }

    pub fn tool(result: ToolResult) -> Self {
        Self::Tool { result }
    }
}

/// Content of a model reply: text fragments and/or function calls, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelContent {
    pub parts: Vec<ModelPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelPart {
    Text { text: String },
    FunctionCall {
        call: ToolCall,
        /// Opaque signature the model attaches to a call; must be echoed back
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought_signature: Option<String>,
    },
}

impl ModelPart {
    pub fn function_call(call: ToolCall) -> Self {
        Self::FunctionCall {
            call,
            thought_signature: None,
        }
    }
}

impl ModelContent {
    pub fn new(parts: Vec<ModelPart>) -> Self {
        Self { parts }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ModelPart::Text { text: text.into() }])
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All text fragments concatenated
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ModelPart::Text { text } => Some(text.as_str()),
                ModelPart::FunctionCall { .. } => None,
            })
            .collect()
    }

    /// Function calls in the order the model issued them
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ModelPart::FunctionCall { call, .. } => Some(call.clone()),
                ModelPart::Text { .. } => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ModelPart::FunctionCall { .. }))
    }
}

/// One round's request: full history plus the static tool set
#[derive(Debug, Clone, Copy)]
pub struct ProviderRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
    pub system_instruction: Option<&'a str>,
}

/// Reply from the remote model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    /// Alternative replies; only the first is used
    pub candidates: Vec<Candidate>,

    pub usage: Option<TokenUsage>,
}

impl ProviderResponse {
    pub fn primary_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Content of the primary candidate, if it has any
    pub fn primary_content(&self) -> Option<&ModelContent> {
        self.primary_candidate()
            .and_then(|candidate| candidate.content.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub content: Option<ModelContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub response_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joined_text_skips_calls() {
        let content = ModelContent::new(vec![
            ModelPart::Text {
                text: "I'll look. ".to_string(),
            },
            ModelPart::function_call(ToolCall::new("get_directory_info", json!({}))),
            ModelPart::Text {
                text: "Done.".to_string(),
            },
        ]);

        assert_eq!(content.joined_text(), "I'll look. Done.");
        assert!(content.has_tool_calls());
        assert_eq!(content.tool_calls()[0].name, "get_directory_info");
    }

    #[test]
    fn test_text_only_content() {
        let content = ModelContent::text("4");
        assert!(!content.has_tool_calls());
        assert!(content.tool_calls().is_empty());
        assert!(!content.is_empty());
    }

    #[test]
    fn test_primary_candidate_is_first() {
        let response = ProviderResponse {
            candidates: vec![
                Candidate {
                    content: Some(ModelContent::text("first")),
                    finish_reason: None,
                },
                Candidate {
                    content: Some(ModelContent::text("second")),
                    finish_reason: None,
                },
            ],
            usage: None,
        };
        assert_eq!(response.primary_content().unwrap().joined_text(), "first");
        assert!(ProviderResponse::default().primary_content().is_none());
    }

    #[test]
    fn test_message_serialization_is_tagged() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json, json!({"role": "user", "text": "hi"}));
    }
}
