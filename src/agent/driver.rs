// Conversation driver - the tool-mediated conversation loop
//
// One round = one remote call plus dispatch of any function calls it
// requested. A prompt ends when the model answers without function calls or
// the round ceiling is hit.

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use super::history::ConversationHistory;
use super::retry::RetryPolicy;
use crate::config::DEFAULT_MAX_ITERATIONS;
use crate::providers::types::{ProviderRequest, ProviderResponse};
use crate::providers::LlmProvider;
use crate::tools::types::ToolDefinition;
use crate::tools::ToolExecutor;

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. You can perform the following operations:

- List files and directories
- Read file contents
- Execute scripts with optional arguments
- Write or overwrite files

All paths you provide should be relative to the working directory. You do not need to specify the working directory in your function calls as it is automatically injected for security reasons.";

/// How a prompt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The model replied without function calls; concatenated reply text
    Answer(String),

    /// The model was still requesting tools when the round ceiling was hit
    IterationLimit { rounds: usize },
}

/// Owns the session: history, tool dispatcher and remote model
pub struct ConversationDriver {
    provider: Box<dyn LlmProvider>,
    executor: ToolExecutor,
    history: ConversationHistory,
    tools: Vec<ToolDefinition>,
    retry: RetryPolicy,
    system_instruction: String,
    max_iterations: usize,
    iteration: usize,
    verbose: bool,
}

impl ConversationDriver {
    pub fn new(provider: Box<dyn LlmProvider>, executor: ToolExecutor) -> Self {
        let tools = executor.definitions();
        Self {
            provider,
            executor,
            history: ConversationHistory::new(),
            tools,
            retry: RetryPolicy::default(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            iteration: 0,
            verbose: false,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run one user prompt to completion.
    ///
    /// History is kept across calls; the round counter starts over. Errors
    /// only when the remote call keeps failing after every retry.
    #[instrument(
        skip(self, prompt),
        fields(provider = self.provider.name(), model = self.provider.model())
    )]
    pub async fn send_prompt(&mut self, prompt: &str) -> Result<PromptOutcome> {
        self.history.add_user_message(prompt);
        self.iteration = 0;

        while self.iteration < self.max_iterations {
            let response = self.generate_with_retry().await?;
            self.iteration += 1;

            if self.verbose {
                self.print_diagnostics(prompt, &response);
            }

            let content = response.primary_content().cloned().unwrap_or_default();
            let finished = !content.has_tool_calls();
            let calls = content.tool_calls();
            let text = content.joined_text();

            if !content.is_empty() {
                self.history.add_model_content(content);
            }

            if finished {
                let finish_reason = response
                    .primary_candidate()
                    .and_then(|c| c.finish_reason.as_deref());
                debug!(
                    rounds = self.iteration,
                    ?finish_reason,
                    "Model answered without function calls"
                );
                return Ok(PromptOutcome::Answer(text));
            }

            for result in self.executor.dispatch_all(&calls).await {
                self.history.add_tool_result(result);
            }
        }

        warn!(
            rounds = self.iteration,
            "Round limit reached while the model was still calling tools"
        );
        Ok(PromptOutcome::IterationLimit {
            rounds: self.iteration,
        })
    }

    /// One remote call, retried with backoff on failure
    async fn generate_with_retry(&self) -> Result<ProviderResponse> {
        let request = ProviderRequest {
            messages: self.history.messages(),
            tools: &self.tools,
            system_instruction: Some(&self.system_instruction),
        };

        let mut retries = 0;
        loop {
            match self.provider.generate(&request).await {
                Ok(response) => {
                    if retries > 0 {
                        info!(retries, "Remote call succeeded after retrying");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if !self.retry.should_retry(retries) {
                        return Err(e.context(format!(
                            "Remote call to {} failed after {} retries",
                            self.provider.name(),
                            retries
                        )));
                    }
                    retries += 1;
                    let backoff = self.retry.backoff(retries);
                    warn!(
                        retry = retries,
                        backoff_secs = backoff.as_secs(),
                        error = %e,
                        "Remote call failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    fn print_diagnostics(&self, prompt: &str, response: &ProviderResponse) {
        println!("User prompt: {}", prompt);
        if let Some(usage) = response.usage {
            println!("Prompt tokens: {}", usage.prompt_tokens);
            println!("Response tokens: {}", usage.response_tokens);
        }
        if let Some(candidate) = response.primary_candidate() {
            println!("{:?}", candidate.content);
            if let Some(reason) = &candidate.finish_reason {
                println!("Finish reason: {}", reason);
            }
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Rounds completed for the current prompt
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
