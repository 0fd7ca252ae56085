//! Conversion of ordinary Markdown (and a small HTML subset) into
//! Telegram's MarkdownV2 dialect.
//!
//! Literal text is escaped, recognized syntax is re-emitted as MarkdownV2
//! markers. Balance is enforced structurally: the writer tracks every
//! entity it opens, and anything left dangling when the event stream ends
//! is reported as a `ConversionError` so the renderer can fall back to
//! full escaping. Literal `_`/`*`/`` ` `` inside code spans or link URLs
//! are not markers and never count against balance.

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::error::ConversionError;
use crate::escape;

/// Converts standard Markdown to MarkdownV2, or reports why the result
/// cannot be trusted.
pub(crate) fn convert_markdown(text: &str) -> Result<String, ConversionError> {
    let converted = markdown_to_v2(text)?;
    if !text.trim().is_empty() && converted.trim().is_empty() {
        return Err(ConversionError::EmptyOutput);
    }
    Ok(converted)
}

/// Rewrites supported HTML tags into Markdown, then converts as Markdown.
pub(crate) fn convert_html(text: &str) -> Result<String, ConversionError> {
    convert_markdown(&html_to_markdown(text))
}

/// HTML tags with a direct Markdown equivalent. Anything not listed here
/// survives as literal text and gets escaped downstream.
static HTML_TO_MARKDOWN_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?s)<b>(.*?)</b>", "**${1}**"),
        (r"(?s)<strong>(.*?)</strong>", "**${1}**"),
        (r"(?s)<i>(.*?)</i>", "*${1}*"),
        (r"(?s)<em>(.*?)</em>", "*${1}*"),
        (r"(?s)<code>(.*?)</code>", "`${1}`"),
        (r"(?s)<pre>(.*?)</pre>", "```\n${1}\n```"),
        (r"(?s)<h1>(.*?)</h1>", "# ${1}"),
        (r"(?s)<h2>(.*?)</h2>", "## ${1}"),
        (r"(?s)<h3>(.*?)</h3>", "### ${1}"),
        (r#"(?s)<a href="([^"]*)">(.*?)</a>"#, "[${2}](${1})"),
    ]
    .iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
    .collect()
});

fn html_to_markdown(html: &str) -> String {
    let mut markdown = html.to_string();
    for (pattern, replacement) in HTML_TO_MARKDOWN_RULES.iter() {
        markdown = pattern.replace_all(&markdown, *replacement).into_owned();
    }
    markdown
}

fn markdown_to_v2(markdown: &str) -> Result<String, ConversionError> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut writer = V2Writer::default();
    for event in Parser::new_ext(markdown, options) {
        writer.handle(event);
    }
    writer.finish()
}

/// Accumulates MarkdownV2 output while walking the CommonMark event stream.
#[derive(Default)]
struct V2Writer {
    out: String,
    // One counter per open list; None marks a bulleted list.
    list_counters: Vec<Option<u64>>,
    link_targets: Vec<String>,
    // Markers of the inline spans currently open, innermost last.
    open_spans: Vec<char>,
    // First marker that was closed out of order, if any.
    mismatched: Option<char>,
    in_code_block: bool,
    quote_depth: usize,
}

impl V2Writer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.out.push_str(&escape::escape_markdown_v2_code(&text));
                } else {
                    self.out.push_str(&escape::escape_markdown_v2(&text));
                }
            }
            Event::Code(code) => {
                self.out.push('`');
                self.out.push_str(&escape::escape_markdown_v2_code(&code));
                self.out.push('`');
            }
            Event::SoftBreak | Event::HardBreak => {
                self.out.push('\n');
                self.quote_prefix();
            }
            Event::Rule => self.out.push_str("\n\\-\\-\\-\\-\n"),
            // Raw HTML has no MarkdownV2 counterpart; keep it as literal text.
            Event::Html(html) | Event::InlineHtml(html) => {
                self.out.push_str(&escape::escape_markdown_v2(&html));
            }
            Event::TaskListMarker(checked) => {
                self.out
                    .push_str(if checked { "\\[x\\] " } else { "\\[ \\] " });
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Strong => self.open_span('*'),
            Tag::Emphasis => self.open_span('_'),
            Tag::Strikethrough => self.open_span('~'),
            // Telegram has no heading syntax; headings become bold lines.
            Tag::Heading { .. } => self.open_span('*'),
            Tag::Paragraph => self.quote_prefix(),
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                self.out.push_str("```");
                if let Some(language) = fence_language(kind) {
                    self.out.push_str(&language);
                }
                self.out.push('\n');
            }
            Tag::Link { dest_url, .. } => {
                self.out.push('[');
                self.link_targets.push(dest_url.into_string());
            }
            Tag::List(start) => self.list_counters.push(start),
            Tag::Item => {
                self.break_line();
                match self.list_counters.last_mut() {
                    Some(Some(counter)) => {
                        self.out.push_str(&format!("{counter}\\. "));
                        *counter += 1;
                    }
                    _ => self.out.push_str("• "),
                }
            }
            Tag::BlockQuote(_) => self.quote_depth += 1,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Strong => self.close_span('*'),
            TagEnd::Emphasis => self.close_span('_'),
            TagEnd::Strikethrough => self.close_span('~'),
            TagEnd::Heading(_) => {
                self.close_span('*');
                self.out.push_str("\n\n");
            }
            TagEnd::Paragraph => self.out.push_str("\n\n"),
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.break_line();
                self.out.push_str("```\n\n");
            }
            TagEnd::Link => match self.link_targets.pop() {
                Some(target) => {
                    self.out.push_str("](");
                    self.out.push_str(&escape::escape_markdown_v2_url(&target));
                    self.out.push(')');
                }
                None => self.mismatched = Some('['),
            },
            TagEnd::List(_) => {
                self.list_counters.pop();
                self.out.push('\n');
            }
            TagEnd::BlockQuote(_) => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::TableCell => self.out.push(' '),
            TagEnd::TableHead | TagEnd::TableRow => self.break_line(),
            TagEnd::Table => self.out.push('\n'),
            _ => {}
        }
    }

    fn open_span(&mut self, marker: char) {
        self.open_spans.push(marker);
        self.out.push(marker);
    }

    fn close_span(&mut self, marker: char) {
        if self.open_spans.pop() == Some(marker) {
            self.out.push(marker);
        } else {
            self.mismatched = Some(marker);
        }
    }

    fn quote_prefix(&mut self) {
        if self.quote_depth > 0 {
            self.out.push_str("> ");
        }
    }

    fn break_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> Result<String, ConversionError> {
        if self.in_code_block {
            return Err(ConversionError::UnbalancedMarker {
                marker: '`',
                count: 1,
            });
        }
        if let Some(marker) = self.mismatched {
            return Err(ConversionError::UnbalancedMarker { marker, count: 1 });
        }
        if let Some(&marker) = self.open_spans.last() {
            return Err(ConversionError::UnbalancedMarker {
                marker,
                count: self.open_spans.len(),
            });
        }
        if !self.link_targets.is_empty() {
            return Err(ConversionError::UnbalancedMarker {
                marker: '[',
                count: self.link_targets.len(),
            });
        }
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        Ok(self.out)
    }
}

fn fence_language(kind: CodeBlockKind<'_>) -> Option<String> {
    let CodeBlockKind::Fenced(info) = kind else {
        return None;
    };
    let candidate = info.split_whitespace().next()?.trim();
    if candidate.is_empty() {
        return None;
    }
    candidate
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '+' | '#'))
        .then(|| candidate.to_ascii_lowercase())
}
