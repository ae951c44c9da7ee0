// Gemini API provider implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::types::{
    Candidate, Message, ModelContent, ModelPart, ProviderRequest, ProviderResponse, TokenUsage,
};
use super::LlmProvider;
use crate::tools::types::{ToolCall, ToolDefinition};

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider
///
/// Implements the LlmProvider trait for the `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: sanitize_model(&model.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: &ProviderRequest<'_>) -> Result<ProviderResponse> {
        let body = GenerateContentRequest::from_request(request);

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let generate_response: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        tracing::debug!(
            candidates = generate_response.candidates.len(),
            "Received response"
        );

        Ok(generate_response.into_provider_response())
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Accept both "gemini-x" and "models/gemini-x"
fn sanitize_model(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}

// Wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

impl GenerateContentRequest {
    fn from_request(request: &ProviderRequest<'_>) -> Self {
        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![GeminiTool {
                function_declarations: request.tools.iter().map(FunctionDeclaration::from).collect(),
            }]
        };

        Self {
            system_instruction: request.system_instruction.map(|text| GeminiContent {
                role: None,
                parts: vec![Part::text(text)],
            }),
            contents: request.messages.iter().map(GeminiContent::from).collect(),
            tools,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl From<&Message> for GeminiContent {
    fn from(message: &Message) -> Self {
        match message {
            Message::User { text } => Self {
                role: Some("user".to_string()),
                parts: vec![Part::text(text)],
            },
            Message::Model { content } => Self {
                role: Some("model".to_string()),
                parts: content.parts.iter().map(Part::from).collect(),
            },
            Message::Tool { result } => Self {
                role: Some("user".to_string()),
                parts: vec![Part {
                    function_response: Some(FunctionResponse {
                        name: result.name.clone(),
                        response: result.response_payload(),
                    }),
                    ..Part::default()
                }],
            },
        }
    }
}

impl GeminiContent {
    fn into_model_content(self) -> ModelContent {
        let parts = self
            .parts
            .into_iter()
            .filter_map(|part| {
                if let Some(call) = part.function_call {
                    return Some(ModelPart::FunctionCall {
                        call: ToolCall::new(call.name, call.args),
                        thought_signature: part.thought_signature,
                    });
                }
                // Thought summaries are not part of the answer
                if part.thought.unwrap_or(false) {
                    return None;
                }
                part.text.map(|text| ModelPart::Text { text })
            })
            .collect();
        ModelContent::new(parts)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thought_signature: Option<String>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }
}

impl From<&ModelPart> for Part {
    fn from(part: &ModelPart) -> Self {
        match part {
            ModelPart::Text { text } => Part::text(text),
            ModelPart::FunctionCall {
                call,
                thought_signature,
            } => Self {
                function_call: Some(FunctionCall {
                    name: call.name.clone(),
                    args: call.args.clone(),
                }),
                thought_signature: thought_signature.clone(),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolDefinition> for FunctionDeclaration {
    fn from(definition: &ToolDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            // Schema is static metadata, passed through as-is
            parameters: serde_json::to_value(&definition.parameters).unwrap_or(Value::Null),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    fn into_provider_response(self) -> ProviderResponse {
        ProviderResponse {
            candidates: self
                .candidates
                .into_iter()
                .map(|candidate| Candidate {
                    content: candidate.content.map(GeminiContent::into_model_content),
                    finish_reason: candidate.finish_reason,
                })
                .collect(),
            usage: self.usage_metadata.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_token_count,
                response_tokens: usage.candidates_token_count,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::types::{ToolInputSchema, ToolResult};
    use serde_json::json;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key", "models/gemini-2.0-flash-001", "http://x/");
        assert!(provider.is_ok());
        let provider = provider.unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.0-flash-001");
        assert_eq!(
            provider.endpoint(),
            "http://x/models/gemini-2.0-flash-001:generateContent"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let messages = vec![
            Message::user("list files"),
            Message::model(ModelContent::new(vec![ModelPart::function_call(ToolCall::new(
                "get_directory_info",
                json!({"directory": "."}),
            ))])),
            Message::tool(ToolResult::success(
                "get_directory_info".to_string(),
                "- a: file_size=1 bytes, is_dir=false".to_string(),
            )),
        ];
        let tools = vec![ToolDefinition {
            name: "get_directory_info".to_string(),
            description: "Lists files".to_string(),
            parameters: ToolInputSchema::empty(),
        }];
        let request = ProviderRequest {
            messages: &messages,
            tools: &tools,
            system_instruction: Some("be brief"),
        };

        let json = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(json["contents"][0], json!({"role": "user", "parts": [{"text": "list files"}]}));
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(
            json["contents"][1]["parts"][0]["functionCall"],
            json!({"name": "get_directory_info", "args": {"directory": "."}})
        );
        assert_eq!(
            json["contents"][2]["parts"][0]["functionResponse"],
            json!({
                "name": "get_directory_info",
                "response": {"result": "- a: file_size=1 bytes, is_dir=false"}
            })
        );
        assert_eq!(
            json["tools"][0]["functionDeclarations"][0]["parameters"]["type"],
            "object"
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [
                            {"text": "thinking...", "thought": true},
                            {"text": "Let me check."},
                            {"functionCall": {"name": "get_file_content", "args": {"file_path": "main.py"}}}
                        ]
                    },
                    "finishReason": "STOP"
                },
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 7, "totalTokenCount": 19}
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = parsed.into_provider_response();

        let content = response.primary_content().unwrap();
        assert_eq!(content.joined_text(), "Let me check.");
        assert_eq!(content.tool_calls()[0].args["file_path"], "main.py");
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                prompt_tokens: 12,
                response_tokens: 7
            })
        );
    }

    #[test]
    fn test_thought_signature_is_echoed_back() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {"name": "get_directory_info", "args": {}},
                        "thoughtSignature": "c2lnLTE="
                    }]
                }
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let content = parsed
            .into_provider_response()
            .primary_content()
            .cloned()
            .unwrap();
        assert!(matches!(
            &content.parts[0],
            ModelPart::FunctionCall { thought_signature: Some(sig), .. } if sig == "c2lnLTE="
        ));

        let messages = vec![Message::model(content)];
        let request = ProviderRequest {
            messages: &messages,
            tools: &[],
            system_instruction: None,
        };
        let json = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(
            json["contents"][0]["parts"][0],
            json!({
                "functionCall": {"name": "get_directory_info", "args": {}},
                "thoughtSignature": "c2lnLTE="
            })
        );
    }

    #[test]
    fn test_response_without_content() {
        let raw = json!({"candidates": [{"finishReason": "SAFETY"}]});
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = parsed.into_provider_response();

        assert!(response.primary_candidate().is_some());
        assert!(response.primary_content().is_none());
        assert!(response.usage.is_none());
    }
}
