//! # book2ru - Batch Translation CLI
//!
//! `book2ru` reads a whole text from stdin, cuts it into line-aligned batches
//! of about 10 KB and translates them one by one through an OpenRouter
//! chat-completion endpoint, writing each translation to stdout as soon as it
//! arrives.
//!
//! A batch that keeps failing after its retries stops the run and reports
//! its number, so the translation can be resumed with `--start-batch`.
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENROUTER_KEY=sk-or-...
//! book2ru < book.txt > book-ru.txt
//!
//! # Resume after batch 12 failed
//! book2ru --start-batch 12 < book.txt >> book-ru.txt
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `.book2ru.yml` in the working directory:
//!
//! ```yaml
//! model: google/gemini-flash-1.5
//! prompt: "Translate this text to Russian. Only return the translated text, nothing else:"
//! metadata_footer: true
//! retry_attempts: 3
//! rate_limits: 20
//! ```

/// Line-preserving batching of the input.
pub mod batch;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file loading and resolution.
pub mod config;

/// Error taxonomy and exit codes.
pub mod error;

/// Input reading from stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr routing).
pub mod output;

/// Remote translation client and the batch driver.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;

/// Crate version, reported in diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
