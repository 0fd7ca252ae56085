use thiserror::Error;

/// Internal failure raised while converting a payload to MarkdownV2.
///
/// Never crosses the crate boundary: the renderer recovers from every
/// variant by falling back to full escaping of the original text.
#[derive(Debug, Error)]
pub(crate) enum ConversionError {
    #[error("unbalanced '{marker}' markers ({count} unescaped occurrences)")]
    UnbalancedMarker { marker: char, count: usize },

    #[error("conversion produced empty output for non-empty input")]
    EmptyOutput,
}
