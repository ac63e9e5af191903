//! CLI binary for schedscan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints the extraction result as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use schedscan::{extract, ExtractionConfig, UploadedFile};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract a timetable photo (JSON to stdout)
  schedscan timetable.png

  # Extract a PDF, pretty-printed
  schedscan --pretty schedule.pdf

  # Use a specific model
  schedscan --provider openai --model gpt-4.1 timetable.jpg

  # Write result to a file
  schedscan timetable.png -o result.json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key

EXIT STATUS:
  The command exits 0 even when extraction fails; inspect the "events" and
  "warnings" fields of the printed result, the same way a server would.
"#;

/// Extract structured timetable data from images and PDFs using Vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "schedscan",
    version,
    about = "Extract structured timetable data from images and PDFs using Vision LLMs",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image or PDF file containing a timetable.
    input: PathBuf,

    /// Write the result JSON to this file instead of stdout.
    #[arg(short, long, env = "SCHEDSCAN_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, claude-sonnet-4-20250514).
    #[arg(long, env = "SCHEDSCAN_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    /// Auto-detected from API key env vars if not set.
    #[arg(long, env = "SCHEDSCAN_PROVIDER")]
    provider: Option<String>,

    /// Max LLM output tokens.
    #[arg(long, env = "SCHEDSCAN_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "SCHEDSCAN_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Per-call inference timeout in seconds.
    #[arg(long, env = "SCHEDSCAN_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Maximum image dimension in pixels after normalisation.
    #[arg(long, env = "SCHEDSCAN_MAX_PIXELS", default_value_t = 2048)]
    max_pixels: u32,

    /// Pretty-print the result JSON.
    #[arg(short, long)]
    pretty: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCHEDSCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, env = "SCHEDSCAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let file = UploadedFile::from_path(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;

    let mut builder = ExtractionConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .max_image_pixels(cli.max_pixels)
        .api_timeout_secs(cli.api_timeout);
    if let Some(model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    let config = builder.build()?;

    let result = extract(&file, &config).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match cli.output {
        Some(path) => std::fs::write(&path, &json)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
