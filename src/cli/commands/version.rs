use anyhow::{Context, Result};
use std::io::Write;

use super::translate::{TranslateOptions, load_merged_config};
use crate::VERSION;

/// Prints the version and the model a translation run would use with the
/// same flags and config file.
pub fn run_version<W: Write>(options: &TranslateOptions, output: &mut W) -> Result<()> {
    let config = load_merged_config(options)?;

    writeln!(output, "book2ru v{VERSION}")
        .and_then(|()| writeln!(output, "Using model: {}", config.model))
        .context("Failed to write to stdout")
}
