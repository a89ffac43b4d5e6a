/// Joins hard-wrapped lines into paragraphs.
///
/// A lone `\n` becomes a space while blank-line paragraph breaks are kept,
/// runs of spaces collapse to one and surrounding whitespace is trimmed.
/// Meant for text extracted from PDFs, where every visual line ends in `\n`.
pub fn join_wrapped_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut joined = String::with_capacity(text.len());

    for (index, &ch) in chars.iter().enumerate() {
        let lone_newline = ch == '\n'
            && (index == 0 || chars[index - 1] != '\n')
            && chars.get(index + 1) != Some(&'\n');
        let ch = if lone_newline { ' ' } else { ch };

        if ch == ' ' && joined.ends_with(' ') {
            continue;
        }
        joined.push(ch);
    }

    joined.trim().to_string()
}
