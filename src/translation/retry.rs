//! Bounded retries with exponential backoff around a [`CompletionApi`].

use anyhow::{Context, Result};
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;

use super::client::CompletionApi;
use super::prompt::build_user_message;
use crate::config::TranslateConfig;

const FIRST_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Suspends the current task. Lets tests observe backoff and pacing without
/// waiting.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Backoff for a batch allowed `retry_attempts` attempts in total: waits of
/// 2s, 4s, 8s, ... between them, without jitter or an upper bound.
pub fn retry_backoff(retry_attempts: u32) -> ExponentialBuilder {
    let retries = usize::try_from(retry_attempts.saturating_sub(1)).unwrap_or(usize::MAX);
    ExponentialBuilder::default()
        .with_min_delay(FIRST_RETRY_DELAY)
        .with_factor(2.0)
        .without_max_delay()
        .with_max_times(retries)
}

/// Translates the text of one batch.
#[allow(async_fn_in_trait)]
pub trait BatchTranslator {
    async fn translate_batch(&self, text: &str) -> Result<String>;
}

/// [`BatchTranslator`] that sends the configured prompt plus the batch and
/// retries every failure until `retry_attempts` attempts are spent.
///
/// Status errors, undecodable bodies, transport errors and empty choice lists
/// are all treated alike.
pub struct RemoteTranslator<A, S> {
    api: A,
    sleeper: S,
    backoff: ExponentialBuilder,
    model: String,
    prompt: String,
    retry_attempts: u32,
}

impl<A: CompletionApi, S: Sleeper> RemoteTranslator<A, S> {
    pub fn new(api: A, sleeper: S, config: &TranslateConfig) -> Self {
        Self {
            api,
            sleeper,
            backoff: retry_backoff(config.retry_attempts),
            model: config.model.clone(),
            prompt: config.prompt.clone(),
            retry_attempts: config.retry_attempts,
        }
    }
}

impl<A, S> BatchTranslator for RemoteTranslator<A, S>
where
    A: CompletionApi,
    S: Sleeper + Clone + 'static,
{
    async fn translate_batch(&self, text: &str) -> Result<String> {
        let user_message = build_user_message(&self.prompt, text);
        let sleeper = self.sleeper.clone();
        let mut failed_attempts = 0u32;

        let attempt = || self.api.complete(&self.model, &user_message);

        attempt
            .retry(self.backoff)
            .sleep(move |delay: Duration| {
                let sleeper = sleeper.clone();
                async move { sleeper.sleep(delay).await }
            })
            .notify(|err: &anyhow::Error, _delay: Duration| {
                failed_attempts += 1;
                crate::warn!("# Retry attempt {failed_attempts} failed: {err:#}");
            })
            .await
            .with_context(|| format!("Failed after {} attempts", self.retry_attempts))
    }
}
