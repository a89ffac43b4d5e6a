use anyhow::Result;
use std::io;
use std::path::PathBuf;

use crate::cli::Args;
use crate::config::{ConfigManager, ResolveOptions, TranslateConfig, resolve_config};
use crate::error::PipelineError;
use crate::input::{InputReader, join_wrapped_lines};
use crate::translation::{
    OpenRouterClient, RemoteTranslator, TokioSleeper, TranslationSummary, translate,
};

pub struct TranslateOptions {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub start_batch: Option<usize>,
    pub rate_limits: Option<u32>,
    pub endpoint: Option<String>,
    pub config: Option<PathBuf>,
    pub join_lines: bool,
}

impl From<Args> for TranslateOptions {
    fn from(args: Args) -> Self {
        Self {
            model: args.model,
            api_key: args.openrouter_key,
            start_batch: args.start_batch,
            rate_limits: args.rate_limits,
            endpoint: args.endpoint,
            config: args.config,
            join_lines: args.join_lines,
        }
    }
}

/// Reads stdin, translates it and streams the result to stdout.
pub async fn run_translate(options: TranslateOptions) -> Result<TranslationSummary> {
    let config = load_merged_config(&options)?;

    // Fail before blocking on stdin.
    if config.api_key.is_empty() {
        return Err(PipelineError::MissingApiKey.into());
    }

    let mut source_text = InputReader::read_stdin()?;
    if options.join_lines {
        source_text = join_wrapped_lines(&source_text);
    }

    let client = OpenRouterClient::from_config(&config)?;
    let translator = RemoteTranslator::new(client, TokioSleeper, &config);
    let mut stdout = io::stdout().lock();

    let summary = translate(
        &source_text,
        &config,
        &translator,
        &TokioSleeper,
        &mut stdout,
    )
    .await?;

    Ok(summary)
}

pub(crate) fn load_merged_config(options: &TranslateOptions) -> Result<TranslateConfig> {
    let mut manager = ConfigManager::new();
    if let Some(path) = &options.config {
        manager = manager.with_config_path(path);
    }

    let file_config = manager.load().map_err(PipelineError::ConfigFile)?;
    manager.load_env().map_err(PipelineError::ConfigFile)?;

    resolve_config(
        &ResolveOptions {
            model: options.model.clone(),
            api_key: options.api_key.clone(),
            start_batch: options.start_batch,
            rate_limits: options.rate_limits,
            endpoint: options.endpoint.clone(),
        },
        &file_config,
    )
}
