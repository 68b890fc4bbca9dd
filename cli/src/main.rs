//! # chatloop CLI
//!
//! Command-line interface for chatloop - a tool-calling conversational agent.
//!
//! ## Usage
//!
//! - `chatloop "what's the weather in Shanghai?"` - Run one conversational turn
//! - `chatloop --system "You are terse." "question"` - Override the system prompt
//! - `chatloop tools` - Show the available tool catalog

use anyhow::Result;
use chatloop_core::{
    ChatClient, ChatMessage, ImageClient, OpenAiClient, Orchestrator, ToolRegistry,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod config;

use config::CliConfigLoader;

/// chatloop - a tool-calling conversational agent
#[derive(Parser)]
#[command(name = "chatloop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A tool-calling conversational agent")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature override
    #[arg(long)]
    temperature: Option<f32>,

    /// System prompt override
    #[arg(long)]
    system: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// The user message to answer
    prompt: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the available tool catalog
    Tools,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }
    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }
    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }
    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }
    if let Some(temperature) = cli.temperature {
        loader = loader.with_temperature_override(temperature);
    }
    if let Some(system) = &cli.system {
        loader = loader.with_system_prompt_override(system.clone());
    }

    loader
}

async fn run_prompt(prompt: String, loader: CliConfigLoader) -> Result<()> {
    let resolved = loader.load().await?;

    let client = Arc::new(OpenAiClient::new(&resolved.llm)?);
    let chat: Arc<dyn ChatClient> = client.clone();
    let image: Arc<dyn ImageClient> = client;
    let registry = ToolRegistry::with_builtins(&resolved.tools, chat.clone(), image);
    let orchestrator = Orchestrator::new(chat, registry, resolved.llm.params.clone());

    let mut messages = Vec::new();
    if let Some(system) = &resolved.system_prompt {
        messages.push(ChatMessage::system(system.clone()));
    }
    messages.push(ChatMessage::user(prompt));

    let answer = orchestrator.run_turn(&mut messages, None).await?;
    println!("{}", answer.text);
    if let Some(url) = answer.image_url {
        println!("[image] {url}");
    }
    Ok(())
}

async fn tools_command(loader: CliConfigLoader) -> Result<()> {
    let resolved = loader.load().await?;
    let client = Arc::new(OpenAiClient::new(&resolved.llm)?);
    let chat: Arc<dyn ChatClient> = client.clone();
    let image: Arc<dyn ImageClient> = client;
    let registry = ToolRegistry::with_builtins(&resolved.tools, chat, image);

    for spec in registry.specs() {
        println!("{}", spec.function.name);
        println!("  {}", spec.function.description.replace('\n', "\n  "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    chatloop_core::init_tracing_with_debug(cli.verbose);

    let loader = build_config_loader(&cli);

    match (cli.prompt, cli.command) {
        (Some(prompt), None) => run_prompt(prompt, loader).await,
        (Some(_), Some(_)) => {
            tracing::error!("Error: Cannot specify both a prompt and a subcommand");
            std::process::exit(1);
        }
        (None, Some(Commands::Tools)) => tools_command(loader).await,
        (None, None) => {
            eprintln!("Usage: chatloop [OPTIONS] <PROMPT>");
            std::process::exit(2);
        }
    }
}
