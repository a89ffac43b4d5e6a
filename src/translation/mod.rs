//! Remote translation of batches and the driver that runs them in order.

mod client;
mod driver;
mod pacing;
mod prompt;
mod retry;

pub use client::{
    CompletionApi, HTTP_REFERER, OPENROUTER_ENDPOINT, OpenRouterClient, USER_AGENT, X_TITLE,
};
pub use driver::{TranslationSummary, translate, translate_paced};
pub use pacing::RequestPacer;
pub use prompt::{DEFAULT_PROMPT, build_user_message};
pub use retry::{BatchTranslator, RemoteTranslator, Sleeper, TokioSleeper, retry_backoff};
