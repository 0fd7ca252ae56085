use std::fmt;

/// Caller-declared tag describing what kind of text a payload holds.
///
/// The tag decides which escaping/conversion rule the renderer applies.
/// It is chosen once, at the call site, before any transformation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Arbitrary untrusted text (error strings etc.). Every MarkdownV2
    /// reserved character gets escaped.
    Raw,
    /// AI output written with lightweight emphasis markers (`**bold**`,
    /// identifiers like `parse_mode`). Smart-escaped.
    Formatted,
    /// Identifier / method / variable names. Wrapped in one inline-code span.
    Technical,
    /// Ordinary Markdown (headings, lists, fences, links, tables).
    /// Converted to the MarkdownV2 dialect.
    StandardMarkdown,
    /// Pre-rendered HTML reports (`h1`-`h3`, `b`, `i`, `code`, `pre`,
    /// `a[href]`). Rewritten to Markdown first, then converted.
    Html,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Raw => "RAW",
            ContentType::Formatted => "FORMATTED",
            ContentType::Technical => "TECHNICAL",
            ContentType::StandardMarkdown => "STANDARD_MARKDOWN",
            ContentType::Html => "HTML",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string accepted by Telegram's MarkdownV2 parser.
///
/// The only way to obtain one is [`crate::renderer::render`]; there is no
/// public constructor. Feeding a `SafeText` back into the renderer is a
/// contract violation (it double-escapes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeText(pub(crate) String);

impl SafeText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SafeText> for String {
    fn from(text: SafeText) -> Self {
        text.0
    }
}

/// An immutable string together with its declared content type.
///
/// Produced by callers (error messages, AI summaries, diagnostics) and
/// consumed exactly once by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    text: String,
    content_type: ContentType,
}

impl TextPayload {
    pub fn new(text: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            text: text.into(),
            content_type,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn render(&self) -> SafeText {
        crate::renderer::render(&self.text, self.content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_names_are_stable() {
        assert_eq!(ContentType::Raw.as_str(), "RAW");
        assert_eq!(ContentType::StandardMarkdown.as_str(), "STANDARD_MARKDOWN");
        assert_eq!(ContentType::Html.to_string(), "HTML");
    }

    #[test]
    fn payload_renders_through_single_entry_point() {
        let payload = TextPayload::new("a.b", ContentType::Raw);
        assert_eq!(payload.render().as_str(), "a\\.b");
        assert_eq!(payload.text(), "a.b");
        assert_eq!(payload.content_type(), ContentType::Raw);
    }
}
