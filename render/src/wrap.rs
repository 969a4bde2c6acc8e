//! Word-wrapping helpers for help text.
//!
//! All wrapping is greedy over whitespace-separated words and fully
//! deterministic: the same input always yields the same lines. Explicit
//! newlines in the input are hard breaks.

/// Wraps `text` to at most `width` columns.
///
/// Words longer than `width` are emitted on their own line rather than
/// split. Empty input yields no lines.
///
/// # Examples
///
/// ```
/// use command_bind_render::wrap;
///
/// let lines = wrap("one two three", 8);
/// assert_eq!(lines, vec!["one two", "three"]);
///
/// assert!(wrap("", 8).is_empty());
/// ```
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.len() + 1 + word.len() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Lays out `tokens` after `prefix`, wrapping at `width` columns with
/// continuation lines indented to align under the first token.
///
/// # Examples
///
/// ```
/// use command_bind_render::wrap_tokens;
///
/// let tokens: Vec<String> = vec!["[-a]".into(), "[-b]".into()];
/// let lines = wrap_tokens("Usage: tool", &tokens, 80);
/// assert_eq!(lines, vec!["Usage: tool [-a] [-b]"]);
/// ```
pub fn wrap_tokens(prefix: &str, tokens: &[String], width: usize) -> Vec<String> {
    let indent = " ".repeat(prefix.len() + 1);
    let mut lines = Vec::new();
    let mut current = prefix.to_string();
    for token in tokens {
        if current.len() + 1 + token.len() <= width {
            current.push(' ');
            current.push_str(token);
        } else {
            lines.push(std::mem::take(&mut current));
            current = format!("{indent}{token}");
        }
    }
    lines.push(current);
    lines
}
