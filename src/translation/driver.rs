//! Sequential, resumable translation of a whole input.

use governor::clock::Clock;
use std::borrow::Cow;
use std::io::Write;

use super::pacing::RequestPacer;
use super::retry::{BatchTranslator, Sleeper};
use crate::VERSION;
use crate::batch::split_into_batches;
use crate::config::TranslateConfig;
use crate::error::PipelineError;
use crate::status;
use crate::ui::Spinner;

const PREVIEW_CHARS: usize = 100;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    pub total_batches: usize,
    pub translated_batches: usize,
    pub bytes_written: usize,
}

/// Translates `input` batch by batch, starting at `config.start_batch`, and
/// writes each translation to `output` as soon as it arrives.
///
/// Batches are processed strictly one after another. When a batch fails for
/// good the run stops; everything written so far stays written and the error
/// names the batch to pass as `--start-batch` next time.
///
/// # Errors
///
/// - [`PipelineError::MissingApiKey`] if `config.api_key` is empty.
/// - [`PipelineError::InvalidStartBatch`] if the start batch is outside
///   `1..=total`.
/// - [`PipelineError::BatchFailed`] once a batch has used up its attempts.
/// - [`PipelineError::Io`] if writing to `output` fails.
pub async fn translate<T, S, W>(
    input: &str,
    config: &TranslateConfig,
    translator: &T,
    sleeper: &S,
    output: &mut W,
) -> Result<TranslationSummary, PipelineError>
where
    T: BatchTranslator,
    S: Sleeper,
    W: Write,
{
    let pacer = RequestPacer::from_config(config);
    translate_paced(input, config, translator, sleeper, pacer.as_ref(), output).await
}

/// [`translate`] with an explicit request pacer; `None` sends batches back to
/// back regardless of `config.rate_limit`.
pub async fn translate_paced<T, S, W, C>(
    input: &str,
    config: &TranslateConfig,
    translator: &T,
    sleeper: &S,
    pacer: Option<&RequestPacer<C>>,
    output: &mut W,
) -> Result<TranslationSummary, PipelineError>
where
    T: BatchTranslator,
    S: Sleeper,
    W: Write,
    C: Clock,
{
    if config.api_key.is_empty() {
        return Err(PipelineError::MissingApiKey);
    }

    let verbose = config.metadata_footer;
    if verbose {
        status!(
            "# book2ru v{VERSION} - starting translation using {}",
            config.model
        );
    }

    let batches = split_into_batches(input, config.batch_limit_bytes);
    let total = batches.len();

    if verbose {
        status!("# Created {total} batches from {} bytes", input.len());
        if config.start_batch > 1 {
            status!("# Starting from batch {}", config.start_batch);
        }
    }

    let mut summary = TranslationSummary {
        total_batches: total,
        ..TranslationSummary::default()
    };

    if total == 0 {
        return Ok(summary);
    }

    if config.start_batch < 1 || config.start_batch > total {
        return Err(PipelineError::InvalidStartBatch {
            requested: config.start_batch,
            total,
        });
    }

    for (index, batch) in batches.iter().enumerate().skip(config.start_batch - 1) {
        let number = index + 1;

        if let Some(pacer) = pacer {
            pacer.until_ready(sleeper).await;
        }

        if verbose {
            status!(
                "# Processing batch {number}/{total} ({} bytes, {} lines)",
                batch.byte_size(),
                batch.line_count
            );
        }

        let spinner =
            verbose.then(|| Spinner::new(&format!("Translating batch {number}/{total}...")));
        let result = translator.translate_batch(batch.content).await;
        if let Some(spinner) = spinner {
            spinner.stop();
        }

        let translated = result.map_err(|cause| PipelineError::BatchFailed {
            batch: number,
            cause,
        })?;

        if verbose {
            status!("# API Response: {}", preview(&translated));
        }

        output
            .write_all(translated.as_bytes())
            .and_then(|()| output.flush())
            .map_err(|source| PipelineError::Io {
                context: "Failed to write to stdout",
                source,
            })?;

        summary.translated_batches += 1;
        summary.bytes_written += translated.len();
    }

    if verbose {
        status!(
            "# Translated by book2ru v{VERSION} using model {}",
            config.model
        );
    }

    Ok(summary)
}

/// First [`PREVIEW_CHARS`] characters of a response, marked when cut.
fn preview(content: &str) -> Cow<'_, str> {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => Cow::Owned(format!("{}...", &content[..end])),
        None => Cow::Borrowed(content),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use governor::clock::FakeRelativeClock;
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Echoes batches back upper-cased, failing on texts listed in `fail_on`.
    #[derive(Default)]
    struct RecordingTranslator {
        calls: Mutex<Vec<String>>,
        fail_on: Vec<&'static str>,
    }

    impl BatchTranslator for RecordingTranslator {
        async fn translate_batch(&self, text: &str) -> Result<String> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail_on.iter().any(|failing| *failing == text) {
                return Err(
                    anyhow!("no choices returned from API").context("Failed after 3 attempts")
                );
            }
            Ok(text.to_uppercase())
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    struct AdvancingSleeper {
        clock: FakeRelativeClock,
        delays: Mutex<Vec<Duration>>,
    }

    impl Sleeper for AdvancingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
            self.clock.advance(duration);
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config(batch_limit_bytes: usize, start_batch: usize) -> TranslateConfig {
        TranslateConfig {
            api_key: "key".to_string(),
            metadata_footer: false,
            batch_limit_bytes,
            start_batch,
            ..TranslateConfig::default()
        }
    }

    #[tokio::test]
    async fn test_translates_all_batches_in_order() {
        let translator = RecordingTranslator::default();
        let mut output = Vec::new();

        let summary = translate(
            "aa\nbb\ncc",
            &config(3, 1),
            &translator,
            &RecordingSleeper::default(),
            &mut output,
        )
        .await
        .unwrap();

        assert_eq!(*translator.calls.lock().unwrap(), vec!["aa\n", "bb\n", "cc"]);
        assert_eq!(String::from_utf8(output).unwrap(), "AA\nBB\nCC");
        assert_eq!(
            summary,
            TranslationSummary {
                total_batches: 3,
                translated_batches: 3,
                bytes_written: 8,
            }
        );
    }

    #[tokio::test]
    async fn test_resume_from_second_batch() {
        let translator = RecordingTranslator::default();
        let mut output = Vec::new();

        translate(
            "aa\nbb\ncc",
            &config(3, 2),
            &translator,
            &RecordingSleeper::default(),
            &mut output,
        )
        .await
        .unwrap();

        assert_eq!(*translator.calls.lock().unwrap(), vec!["bb\n", "cc"]);
        assert_eq!(String::from_utf8(output).unwrap(), "BB\nCC");
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let translator = RecordingTranslator::default();
        let mut output = Vec::new();

        let summary = translate(
            "",
            &config(3, 1),
            &translator,
            &RecordingSleeper::default(),
            &mut output,
        )
        .await
        .unwrap();

        assert!(translator.calls.lock().unwrap().is_empty());
        assert!(output.is_empty());
        assert_eq!(summary, TranslationSummary::default());
    }

    #[tokio::test]
    async fn test_missing_api_key_rejected_before_any_call() {
        let translator = RecordingTranslator::default();
        let mut config = config(3, 1);
        config.api_key = String::new();

        let err = translate(
            "hello",
            &config,
            &translator,
            &RecordingSleeper::default(),
            &mut Vec::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::MissingApiKey));
        assert!(err.to_string().contains("No API key provided"));
        assert!(translator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_batch_out_of_range() {
        for start_batch in [0, 4] {
            let translator = RecordingTranslator::default();

            let err = translate(
                "aa\nbb\ncc",
                &config(3, start_batch),
                &translator,
                &RecordingSleeper::default(),
                &mut Vec::new(),
            )
            .await
            .unwrap_err();

            assert_eq!(
                err.to_string(),
                format!("Invalid start batch {start_batch}, must be between 1 and 3")
            );
            assert!(translator.calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_failed_batch_stops_run_and_names_resume_point() {
        let translator = RecordingTranslator {
            fail_on: vec!["bb\n"],
            ..RecordingTranslator::default()
        };
        let mut output = Vec::new();

        let err = translate(
            "aa\nbb\ncc",
            &config(3, 1),
            &translator,
            &RecordingSleeper::default(),
            &mut output,
        )
        .await
        .unwrap_err();

        assert_eq!(err.resume_batch(), Some(2));
        assert!(err.to_string().contains("Failed after 3 attempts"));
        assert!(err.to_string().contains("--start-batch 2"));
        // Batch 3 is never attempted, batch 1 stays written.
        assert_eq!(*translator.calls.lock().unwrap(), vec!["aa\n", "bb\n"]);
        assert_eq!(String::from_utf8(output).unwrap(), "AA\n");
    }

    #[tokio::test]
    async fn test_write_failure_is_io_error() {
        let err = translate(
            "hello",
            &config(100, 1),
            &RecordingTranslator::default(),
            &RecordingSleeper::default(),
            &mut BrokenPipe,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[tokio::test]
    async fn test_rate_limit_paces_batches() {
        let mut config = config(3, 1);
        config.rate_limit = Some(60);
        let clock = FakeRelativeClock::default();
        let pacer = RequestPacer::with_clock(&config, clock.clone()).unwrap();
        let sleeper = AdvancingSleeper {
            clock,
            delays: Mutex::new(Vec::new()),
        };
        let translator = RecordingTranslator::default();
        let mut output = Vec::new();

        translate_paced(
            "aa\nbb\ncc",
            &config,
            &translator,
            &sleeper,
            Some(&pacer),
            &mut output,
        )
        .await
        .unwrap();

        // Nothing before the first batch, one minute share before each later one.
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_secs(1), Duration::from_secs(1)]
        );
        assert_eq!(String::from_utf8(output).unwrap(), "AA\nBB\nCC");
    }

    #[tokio::test]
    async fn test_resume_is_not_delayed_by_pacing() {
        let mut config = config(3, 3);
        config.rate_limit = Some(1);
        let clock = FakeRelativeClock::default();
        let pacer = RequestPacer::with_clock(&config, clock.clone()).unwrap();
        let sleeper = AdvancingSleeper {
            clock,
            delays: Mutex::new(Vec::new()),
        };

        translate_paced(
            "aa\nbb\ncc",
            &config,
            &RecordingTranslator::default(),
            &sleeper,
            Some(&pacer),
            &mut Vec::new(),
        )
        .await
        .unwrap();

        assert!(sleeper.delays.lock().unwrap().is_empty());
    }

    #[test]
    fn test_preview_truncates_long_responses() {
        let short = "привет";
        assert_eq!(preview(short), "привет");

        let long = "я".repeat(150);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }
}
