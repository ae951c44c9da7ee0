// genagent - Gemini agent with sandboxed file tools
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use genagent::agent::{ConversationDriver, RetryPolicy};
use genagent::cli::Repl;
use genagent::config::{load_config, ConfigOverrides};
use genagent::providers::{GeminiProvider, LlmProvider};
use genagent::tools::{builtin_registry, Sandbox, ToolExecutor};

#[derive(Parser, Debug)]
#[command(name = "genagent")]
#[command(about = "Gemini Agent CLI", version)]
struct Args {
    /// Working directory for the agent; tools cannot reach outside it
    #[arg(short = 'w', long = "working-dir", alias = "working_dir")]
    working_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Model name (overrides GEMINI_AI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// The initial prompt for the agent
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let Some(working_dir) = args.working_dir else {
        println!("Please specify working directory with -w or --working-dir");
        std::process::exit(1);
    };

    init_tracing(args.verbose);

    let config = load_config(ConfigOverrides {
        working_dir,
        model: args.model,
        verbose: args.verbose,
    })?;

    if config.verbose {
        println!("Working directory: {}", config.working_dir.display());
    }

    let sandbox = Sandbox::new(&config.working_dir)
        .with_context(|| format!("Invalid working directory {}", config.working_dir.display()))?;
    let registry = builtin_registry(&sandbox, config.file_read_max_size, &config.script);
    let executor = ToolExecutor::new(registry, config.verbose);
    tracing::debug!(tools = ?executor.registry().tool_names(), "Registered tools");

    let provider = GeminiProvider::new(&config.api_key, &config.model, &config.base_url)?;
    if config.verbose {
        println!("Model: {}", provider.model());
    }
    let driver = ConversationDriver::new(Box::new(provider), executor)
        .with_max_iterations(config.max_iterations)
        .with_retry_policy(RetryPolicy::from_config(&config.retry))
        .with_verbose(config.verbose);

    let initial_prompt = Some(args.prompt.join(" ")).filter(|p| !p.trim().is_empty());
    Repl::new(driver, config.verbose)?.run(initial_prompt).await
}

/// Initialize tracing to stderr
///
/// Default: WARN, or DEBUG for this crate with --verbose. RUST_LOG wins over both.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,genagent=debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
