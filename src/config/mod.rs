//! Layered configuration: built-in defaults, `.book2ru.yml`, `.env`,
//! command-line flags, then `OPENROUTER_KEY` for the API key.

mod manager;

pub use manager::{
    CONFIG_FILE_NAME, ConfigFile, ConfigManager, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_RETRY_ATTEMPTS, ENV_FILE_NAME, ResolveOptions, TranslateConfig, resolve_config,
};
