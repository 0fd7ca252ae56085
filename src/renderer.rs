//! The single entry point that turns caller text into Telegram-safe output.
//!
//! Every outgoing string passes through [`render`] exactly once. The
//! per-rule escaping lives in private modules so no caller can pre-escape a
//! payload and reintroduce the double-escaping defect this layer exists to
//! kill.

use crate::content::{ContentType, SafeText};
use crate::error::ConversionError;
use crate::escape;
use crate::markdownify;

/// Renders `text` into a string Telegram's MarkdownV2 parser accepts.
///
/// Deterministic and total: malformed input never produces an error, it
/// produces fully escaped literal text via the RAW fallback. Do not feed the
/// result back in; rendering is a one-shot transformation.
pub fn render(text: &str, content_type: ContentType) -> SafeText {
    if text.is_empty() {
        return SafeText(String::new());
    }

    let rendered = match content_type {
        ContentType::Raw => escape::escape_markdown_v2(text),
        ContentType::Formatted => {
            smart_escape(text).unwrap_or_else(|err| fall_back(text, content_type, err))
        }
        ContentType::Technical => {
            let mut span = String::with_capacity(text.len() + 2);
            span.push('`');
            span.push_str(&escape::escape_markdown_v2_code(text));
            span.push('`');
            span
        }
        ContentType::StandardMarkdown => markdownify::convert_markdown(text)
            .unwrap_or_else(|err| fall_back(text, content_type, err)),
        ContentType::Html => markdownify::convert_html(text)
            .unwrap_or_else(|err| fall_back(text, content_type, err)),
    };

    SafeText(rendered)
}

/// Smart escaping for text written with lightweight emphasis markers.
///
/// `**bold**` becomes `*bold*`; `*` and `_` stay unescaped so emphasis and
/// identifiers like `parse_mode` survive; every other reserved character is
/// escaped. Unbalanced `*` markers mean the emphasis cannot be trusted and
/// the whole payload is treated as literal text instead.
fn smart_escape(text: &str) -> Result<String, ConversionError> {
    let normalized = text.replace("**", "*");

    let marker_count = normalized.matches('*').count();
    if marker_count % 2 != 0 {
        return Err(ConversionError::UnbalancedMarker {
            marker: '*',
            count: marker_count,
        });
    }

    let mut escaped = String::with_capacity(normalized.len() * 2);
    for ch in normalized.chars() {
        // The backslash must be escaped here too, or a literal one would
        // swallow the escape of the character after it.
        if ch == '\\' || (ch != '*' && ch != '_' && escape::MARKDOWN_V2_RESERVED.contains(&ch)) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Ok(escaped)
}

/// RAW fallback for every conversion failure. Applied to the original text,
/// logged, and never surfaced to the caller.
fn fall_back(text: &str, content_type: ContentType, err: ConversionError) -> String {
    log::warn!(
        "{} conversion failed ({}), falling back to full escaping. Original text:\n{}",
        content_type,
        err,
        text
    );
    escape::escape_markdown_v2(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_escapes_every_reserved_character() {
        let rendered = render("a_b*c[d](e)~f`g>h#i+j-k=l|m{n}o.p!q", ContentType::Raw);
        for window in ["\\_", "\\*", "\\[", "\\]", "\\(", "\\)", "\\~", "\\`"] {
            assert!(rendered.as_str().contains(window), "missing {window}");
        }
    }

    #[test]
    fn raw_doubles_reserved_only_input() {
        let input = "_*[]()~`>#+-=|{}.!";
        let rendered = render(input, ContentType::Raw);
        assert_eq!(rendered.as_str().len(), input.len() * 2);
    }

    #[test]
    fn empty_input_is_a_noop_for_every_content_type() {
        for content_type in [
            ContentType::Raw,
            ContentType::Formatted,
            ContentType::Technical,
            ContentType::StandardMarkdown,
            ContentType::Html,
        ] {
            assert_eq!(render("", content_type).as_str(), "");
        }
    }

    #[test]
    fn formatted_keeps_identifiers_intact() {
        let rendered = render("Unsupported parse_mode", ContentType::Formatted);
        assert_eq!(rendered.as_str(), "Unsupported parse_mode");
    }

    #[test]
    fn formatted_converts_double_asterisk_bold() {
        let rendered = render("**bold**", ContentType::Formatted);
        assert_eq!(rendered.as_str(), "*bold*");
    }

    #[test]
    fn formatted_escapes_other_reserved_characters() {
        let rendered = render("**Итог**: готово.", ContentType::Formatted);
        assert_eq!(rendered.as_str(), "*Итог*: готово\\.");
    }

    #[test]
    fn formatted_escapes_literal_backslashes() {
        // "a\.b" must become "a\\\.b", not the invalid "a\\.b".
        let rendered = render("a\\.b", ContentType::Formatted);
        assert_eq!(rendered.as_str(), "a\\\\\\.b");
    }

    #[test]
    fn formatted_falls_back_on_unbalanced_emphasis() {
        let rendered = render("**bold *italic**", ContentType::Formatted);
        // The whole payload is literal text now, escaped like RAW.
        assert_eq!(rendered.as_str(), "\\*\\*bold \\*italic\\*\\*");
    }

    #[test]
    fn technical_wraps_in_a_single_code_span() {
        let rendered = render("get_user_details", ContentType::Technical);
        assert_eq!(rendered.as_str(), "`get_user_details`");
    }

    #[test]
    fn technical_embedded_backtick_cannot_break_the_span() {
        let rendered = render("a`b", ContentType::Technical);
        assert_eq!(rendered.as_str(), "`a\\`b`");
        assert_eq!(crate::escape::count_unescaped(rendered.as_str(), '`') % 2, 0);
    }

    #[test]
    fn raw_and_formatted_differ_on_identifier_underscores() {
        let text = "❌ Ошибка: Unsupported parse_mode";
        let raw = render(text, ContentType::Raw);
        let formatted = render(text, ContentType::Formatted);
        assert!(raw.as_str().contains("parse\\_mode"));
        assert!(formatted.as_str().contains("parse_mode"));
        assert!(!formatted.as_str().contains("parse\\_mode"));
    }

    #[test]
    fn rendering_twice_is_visibly_different() {
        // Idempotence is deliberately not provided; this guards against the
        // original double-escaping defect ever looking harmless again.
        let once = render("ставка: 1.5_x", ContentType::Raw);
        let twice = render(once.as_str(), ContentType::Raw);
        assert_ne!(once.as_str(), twice.as_str());
    }

    #[test]
    fn standard_markdown_is_converted_not_escaped() {
        let rendered = render("# Сводка\n\n**важно**", ContentType::StandardMarkdown);
        assert_eq!(rendered.as_str(), "*Сводка*\n\n*важно*");
    }

    #[test]
    fn standard_markdown_code_span_does_not_trip_the_fallback() {
        // An identifier with an odd number of underscores inside a code
        // span is valid MarkdownV2 and must not get fully escaped.
        let rendered = render("см. `parse_mode`", ContentType::StandardMarkdown);
        assert_eq!(rendered.as_str(), "см\\. `parse_mode`");
    }

    #[test]
    fn html_report_is_converted_end_to_end() {
        let rendered = render(
            "<h1>Отчет</h1>\n<b>успешно</b>, см. <code>summary_v2</code>",
            ContentType::Html,
        );
        assert_eq!(
            rendered.as_str(),
            "*Отчет*\n\n*успешно*, см\\. `summary_v2`"
        );
    }
}
