use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "book2ru")]
#[command(about = "Translate text from stdin with an LLM, batch by batch, resumable on failure")]
#[command(version, disable_version_flag = true)]
#[command(override_usage = "book2ru [OPTIONS] < input.txt > output.txt")]
#[command(after_help = "Examples:\n  \
    book2ru < input.txt > output-ru.txt\n  \
    book2ru --model anthropic/claude-3-haiku --rate-limits 10 < input.txt > output.txt\n  \
    book2ru --start-batch 10 < input.txt >> output.txt   # Resume from batch 10")]
pub struct Args {
    /// LLM model identifier
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// OpenRouter API key (defaults to the OPENROUTER_KEY environment variable)
    #[arg(
        short = 'o',
        long = "openrouter-key",
        alias = "openrouter_key",
        value_name = "KEY"
    )]
    pub openrouter_key: Option<String>,

    /// Start translation from this batch number (1-based)
    #[arg(long, value_name = "N")]
    pub start_batch: Option<usize>,

    /// Maximum requests per minute
    #[arg(short = 'r', long = "rate-limits", value_name = "RPM")]
    pub rate_limits: Option<u32>,

    /// Chat-completions endpoint URL
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Config file to use instead of ./.book2ru.yml
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Join hard-wrapped lines into paragraphs before translating
    #[arg(long)]
    pub join_lines: bool,

    /// Suppress progress output on stderr
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print version and the model that would be used, then exit
    #[arg(short = 'V', long)]
    pub version: bool,
}
