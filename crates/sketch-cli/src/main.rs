// ============================================================================
// sketchgen — run the sketch handler locally
// ============================================================================
// Usage:
//   sketchgen invoke --event event.json     Run the full pipeline on an event
//   sketchgen invoke --event -              Read the event from stdin
//   sketchgen styles                        List supported styles
//   sketchgen prompt --style anime          Show the prompt for a style
// ============================================================================

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use sketch_core::style::{build_prompt, is_known_style, STYLE_PROMPTS};
use sketch_core::{HandlerConfig, ResultPublisher, SketchHandler};

/// Sketch-to-image handler, locally
#[derive(Parser)]
#[command(name = "sketchgen", version, about = "Run the sketch-to-image handler locally")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one invocation event through the handler and print the response
    Invoke {
        /// Event JSON file, or `-` for stdin
        #[arg(long)]
        event: PathBuf,

        /// Print the decoded response body instead of the raw envelope
        #[arg(long)]
        body_only: bool,
    },

    /// List the supported styles and their prompt phrases
    Styles,

    /// Print the prompt that would be sent for a style
    Prompt {
        #[arg(long, default_value = "realistic")]
        style: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sketch_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Invoke { event, body_only } => cmd_invoke(&event, body_only).await,
        Commands::Styles => cmd_styles(),
        Commands::Prompt { style } => cmd_prompt(&style),
    }
}

fn read_event(path: &Path) -> Result<Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).context("event is not valid JSON")
}

async fn cmd_invoke(path: &Path, body_only: bool) -> Result<()> {
    let event = read_event(path)?;

    let config = HandlerConfig::from_env();
    let publisher = ResultPublisher::from_bucket(config.bucket_name.clone()).await;
    let handler = SketchHandler::with_gemini(config, publisher);

    let response = handler.handle(&event).await;

    if body_only {
        let body: Value = serde_json::from_str(&response.body)?;
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    if response.status_code != 200 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_styles() -> Result<()> {
    println!("{:<14}  {}", "STYLE", "PHRASE");
    println!("{}", "-".repeat(90));
    for (name, phrase) in STYLE_PROMPTS {
        println!("{:<14}  {}", name, phrase);
    }
    println!("\nUnknown styles fall back to a generic phrase.");
    Ok(())
}

fn cmd_prompt(style: &str) -> Result<()> {
    if !is_known_style(style) {
        eprintln!("Note: '{}' is not a known style, using the generic phrase", style);
    }
    println!("{}", build_prompt(style));
    Ok(())
}
