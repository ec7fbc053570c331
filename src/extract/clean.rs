//! Full-text post-processing

/// True for C0/C1 control characters other than `\n`, `\r` and `\t`
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}') && !matches!(c, '\n' | '\r' | '\t')
}

/// Truncate to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
}

/// Normalize the concatenated page text for storage
///
/// Control characters are dropped, `\r\n` and lone `\r` become `\n`,
/// whitespace inside a line collapses to one space, any run of blank lines
/// becomes a single blank line, and the ends are trimmed. The result is then
/// cut to `max_chars` characters.
pub fn clean_full_text(raw: &str, max_chars: usize) -> String {
    let stripped: String = raw.chars().filter(|c| !is_stripped_control(*c)).collect();
    let normalized = stripped.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(normalized.len());
    let mut pending_blank = false;

    for line in normalized.split('\n') {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            if !out.is_empty() {
                pending_blank = true;
            }
            continue;
        };

        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        pending_blank = false;

        out.push_str(first);
        for word in words {
            out.push(' ');
            out.push_str(word);
        }
    }

    truncate_chars(&mut out, max_chars);
    out
}
