use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

use crate::output;

// The spinner currently drawing on stderr, if any.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Runs `f` with the active spinner hidden, so that lines printed to stderr
/// from inside `f` do not interleave with the spinner frames.
pub fn suspend<R>(f: impl FnOnce() -> R) -> R {
    let active = ACTIVE.lock().ok().and_then(|slot| slot.clone());
    match active {
        Some(progress_bar) => progress_bar.suspend(f),
        None => f(),
    }
}

fn set_active(progress_bar: Option<ProgressBar>) {
    if let Ok(mut slot) = ACTIVE.lock() {
        *slot = progress_bar;
    }
}

/// A stderr spinner shown while a batch request is in flight.
///
/// Draws nothing when stderr is not a terminal or quiet mode is on, and
/// clears itself when dropped.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    /// Creates and starts a new spinner with the given message.
    #[allow(clippy::unwrap_used)]
    pub fn new(message: &str) -> Self {
        let target = if output::is_quiet() {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let progress_bar = ProgressBar::with_draw_target(None, target);
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
                .template("{spinner} {msg} {elapsed:.dim}")
                .unwrap(),
        );
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        set_active(Some(progress_bar.clone()));

        Self { progress_bar }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn stop(&self) {
        set_active(None);
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        set_active(None);
        self.progress_bar.finish_and_clear();
    }
}
