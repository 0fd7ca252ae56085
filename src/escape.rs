//! Character-level escaping for Telegram's MarkdownV2 dialect.
//!
//! Module-private on purpose: callers go through `renderer::render`, never
//! through these helpers, so a payload can only ever be escaped once.

/// The reserved characters Telegram requires to be backslash-escaped when
/// used literally outside recognized syntax.
pub(crate) const MARKDOWN_V2_RESERVED: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes every reserved character unconditionally (the RAW rule). The
/// backslash itself is escaped too, otherwise a literal backslash in the
/// input would swallow the escape of the character after it.
pub(crate) fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if ch == '\\' || MARKDOWN_V2_RESERVED.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes text placed inside a code or pre entity. Telegram only requires
/// `` ` `` and `\` to be escaped there.
pub(crate) fn escape_markdown_v2_code(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '`' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escapes a link destination for the `(...)` part of an inline link.
pub(crate) fn escape_markdown_v2_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for ch in url.chars() {
        if ch == ')' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Counts occurrences of `marker` that are not preceded by a backslash.
/// Test helper for asserting entity balance in rendered output.
#[cfg(test)]
pub(crate) fn count_unescaped(text: &str, marker: char) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for ch in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
        } else if ch == marker {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_every_reserved_character() {
        let input: String = MARKDOWN_V2_RESERVED.iter().collect();
        let escaped = escape_markdown_v2(&input);
        assert_eq!(escaped.len(), input.len() * 2);
        for pair in escaped.as_bytes().chunks(2) {
            assert_eq!(pair[0], b'\\');
        }
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(escape_markdown_v2("обычный текст"), "обычный текст");
    }

    #[test]
    fn literal_backslash_cannot_swallow_the_next_escape() {
        // "\." must not turn into "\\." (escaped backslash + bare dot).
        assert_eq!(escape_markdown_v2("\\."), "\\\\\\.");
    }

    #[test]
    fn code_escape_only_touches_backtick_and_backslash() {
        assert_eq!(escape_markdown_v2_code("a`b\\c_d"), "a\\`b\\\\c_d");
    }

    #[test]
    fn url_escape_keeps_closing_paren_literal() {
        assert_eq!(
            escape_markdown_v2_url("https://ex.com/a_(b)"),
            "https://ex.com/a_(b\\)"
        );
    }

    #[test]
    fn counting_skips_escaped_markers() {
        assert_eq!(count_unescaped("*a\\*b*", '*'), 2);
        assert_eq!(count_unescaped("\\`\\`", '`'), 0);
    }
}
