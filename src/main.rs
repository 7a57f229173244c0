use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use storeqa::{
    AiServiceClient, AiServiceClientBuilder, AiServiceError, AnswerClient, ConfigError,
    HandlerResponse, QuestionHandler, QuestionParams,
};
use tracing_subscriber::EnvFilter;

/// storeqa - ask questions about a store and get answers from the AI service
#[derive(Parser)]
#[command(name = "storeqa")]
#[command(about = "Forward store questions to the AI answer service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask a question about a store
    Ask(AskCommand),
    /// Check that the AI answer service is reachable
    Health(ServiceArgs),
}

/// Connection overrides shared by every command
#[derive(Args, Debug, Default)]
struct ServiceArgs {
    /// Base URL of the answer service (overrides STOREQA_AI_URL)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Request timeout in seconds (overrides STOREQA_AI_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

/// Ask a question
#[derive(Parser, Debug)]
struct AskCommand {
    /// Store the question is about
    #[arg(short, long, value_name = "STORE_ID")]
    store_id: Option<String>,

    /// The question to ask
    #[arg(value_name = "QUESTION")]
    question: Option<String>,

    #[command(flatten)]
    service: ServiceArgs,
}

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(cmd),
        Commands::Health(args) => handle_health(args),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs a service or internal error).
///
/// User errors are missing parameters and bad connection settings.
fn is_user_error(error: &anyhow::Error) -> bool {
    if error.to_string().contains("are required") {
        return true;
    }

    error.chain().any(|cause| {
        cause.is::<ConfigError>()
            || matches!(
                cause.downcast_ref::<AiServiceError>(),
                Some(AiServiceError::InvalidUrl(_) | AiServiceError::Config(_))
            )
    })
}

/// Handles the ask command by running the question through the handler.
fn handle_ask(cmd: &AskCommand) -> Result<()> {
    let client = build_client(&cmd.service)?;

    let params = QuestionParams {
        store_id: cmd.store_id.clone(),
        question: cmd.question.clone(),
    };

    let response = execute_ask(&params, Arc::new(client));
    println!("{}", render_body(&response)?);

    if !response.is_success() {
        let message = response.body["error"]
            .as_str()
            .unwrap_or("request rejected")
            .to_string();
        anyhow::bail!(message);
    }

    Ok(())
}

/// Executes the ask logic with a provided client.
///
/// Separated from `handle_ask` so tests can substitute a mock client.
fn execute_ask(params: &QuestionParams, client: Arc<dyn AnswerClient>) -> HandlerResponse {
    QuestionHandler::new(client).handle(params)
}

/// Handles the health command by probing the service.
fn handle_health(args: &ServiceArgs) -> Result<()> {
    let client = build_client(args)?;

    let status = client
        .health()
        .with_context(|| format!("AI service at {} is unreachable", client.base_url()))?;

    println!("AI service: {}", client.base_url());
    println!("Status: {}", status.get("status").and_then(|s| s.as_str()).unwrap_or("unknown"));

    Ok(())
}

/// Builds the answer client from command-line overrides plus the environment.
fn build_client(args: &ServiceArgs) -> Result<AiServiceClient> {
    client_builder(args)
        .build()
        .context("Failed to create AI service client")
}

/// Applies command-line overrides as builder settings.
///
/// Anything not given on the command line is resolved by the builder from
/// the environment.
fn client_builder(args: &ServiceArgs) -> AiServiceClientBuilder {
    let mut builder = AiServiceClientBuilder::new();
    if let Some(url) = &args.url {
        builder = builder.base_url(url.clone());
    }
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
}

fn render_body(response: &HandlerResponse) -> Result<String> {
    serde_json::to_string_pretty(&response.body).context("Failed to render response")
}
