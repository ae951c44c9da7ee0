// Interactive prompt loop
//
// Runs the optional initial prompt, then keeps reading prompts until the
// user interrupts. The same driver serves every prompt.

use anyhow::Result;
use tracing::{debug, error};

use super::input::InputHandler;
use crate::agent::{ConversationDriver, PromptOutcome};
use crate::errors::wrap_error_with_suggestion;

const PROMPT: &str = "Prompt: ";

pub struct Repl {
    driver: ConversationDriver,
    input: InputHandler,
    verbose: bool,
}

impl Repl {
    pub fn new(driver: ConversationDriver, verbose: bool) -> Result<Self> {
        Ok(Self {
            driver,
            input: InputHandler::new()?,
            verbose,
        })
    }

    /// Run interactive REPL loop
    pub async fn run(mut self, initial_prompt: Option<String>) -> Result<()> {
        if let Some(prompt) = initial_prompt.filter(|p| !p.trim().is_empty()) {
            if self.verbose {
                println!("Initial prompt: {}", prompt);
            }
            self.process_prompt(&prompt).await;
        }

        loop {
            println!();
            match self.input.read_line(PROMPT)? {
                Some(line) if line.is_empty() => continue,
                Some(line) => self.process_prompt(&line).await,
                None => {
                    println!("Exiting.");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Failures are reported and the loop keeps going
    async fn process_prompt(&mut self, prompt: &str) {
        match self.driver.send_prompt(prompt).await {
            Ok(PromptOutcome::Answer(text)) => println!("{}", text),
            Ok(PromptOutcome::IterationLimit { rounds }) => {
                debug!(rounds, "Prompt stopped at the round limit");
            }
            Err(e) => {
                error!(error = %e, "Prompt failed");
                eprintln!(
                    "{}",
                    wrap_error_with_suggestion(
                        format!("{:#}", e),
                        "Check the network connection and GEMINI_API_KEY, then send the prompt again"
                    )
                );
            }
        }
    }
}
