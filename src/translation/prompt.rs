/// Instruction used when no prompt is configured.
pub const DEFAULT_PROMPT: &str =
    "Translate this text to Russian. Only return the translated text, nothing else:";

/// Builds the single user message sent for a batch: the prompt, a blank
/// line, then the batch text untouched.
pub fn build_user_message(prompt: &str, batch_text: &str) -> String {
    format!("{prompt}\n\n{batch_text}")
}
