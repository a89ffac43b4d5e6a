//! Error taxonomy of the translation pipeline and its process exit codes.

use thiserror::Error;

/// Name of the environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

/// Failures that end a translation run.
///
/// Transient remote errors never show up here directly: they are retried by
/// the remote translator and only surface wrapped in [`PipelineError::BatchFailed`]
/// once every attempt is spent.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No API key provided. Set OPENROUTER_KEY environment variable or use -o flag")]
    MissingApiKey,

    #[error("Invalid start batch {requested}, must be between 1 and {total}")]
    InvalidStartBatch { requested: usize, total: usize },

    #[error("{0:#}")]
    ConfigFile(anyhow::Error),

    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error(
        "Failed to translate batch {batch}: {cause:#}\n\n\
         To resume from this batch, use: --start-batch {batch}"
    )]
    BatchFailed { batch: usize, cause: anyhow::Error },

    #[error("{context}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// The batch index to resume from, if this error came from a failed batch.
    pub const fn resume_batch(&self) -> Option<usize> {
        match self {
            Self::BatchFailed { batch, .. } => Some(*batch),
            _ => None,
        }
    }

    pub const fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::MissingApiKey
            | Self::InvalidStartBatch { .. }
            | Self::InvalidSetting { .. }
            | Self::ConfigFile(_) => exitcode::CONFIG,
            Self::BatchFailed { .. } => exitcode::UNAVAILABLE,
            Self::Io { .. } => exitcode::IOERR,
        }
    }
}

/// Maps any error reaching `main` to a process exit code.
pub fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    err.downcast_ref::<PipelineError>()
        .map_or(exitcode::SOFTWARE, PipelineError::exit_code)
}
