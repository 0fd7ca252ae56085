//! Splitting long messages to fit Telegram's per-message length cap.
//!
//! Splits on paragraph boundaries first, then sentence boundaries, and only
//! hard-cuts when a single sentence exceeds the limit. Lengths are counted
//! in characters, matching how Telegram counts them, and hard cuts never
//! land inside a UTF-8 code point.

/// Splits `text` into parts of at most `max_length` characters.
///
/// Text at or under the limit comes back as a single part; empty input
/// yields one empty part.
pub fn split_message(text: &str, max_length: usize) -> Vec<String> {
    if char_len(text) <= max_length {
        return vec![text.to_string()];
    }

    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        if joined_len(&current, paragraph, 2) <= max_length {
            join_into(&mut current, paragraph, "\n\n");
        } else {
            flush(&mut parts, &mut current);
            if char_len(paragraph) <= max_length {
                current.push_str(paragraph);
            } else {
                split_paragraph(paragraph, max_length, &mut parts, &mut current);
            }
        }
    }

    flush(&mut parts, &mut current);
    parts
}

/// Paragraph over the limit: retry on sentence boundaries.
fn split_paragraph(paragraph: &str, max_length: usize, parts: &mut Vec<String>, current: &mut String) {
    for sentence in paragraph.split(". ") {
        if joined_len(current, sentence, 2) <= max_length {
            join_into(current, sentence, ". ");
        } else {
            flush(parts, current);
            if char_len(sentence) <= max_length {
                current.push_str(sentence);
            } else {
                hard_split(sentence, max_length, parts, current);
            }
        }
    }
}

/// Sentence over the limit: cut at character boundaries, last chunk stays
/// in `current` so following text can still be appended.
fn hard_split(sentence: &str, max_length: usize, parts: &mut Vec<String>, current: &mut String) {
    let mut chunk = String::new();
    let mut chunk_chars = 0;
    for ch in sentence.chars() {
        if chunk_chars == max_length {
            parts.push(std::mem::take(&mut chunk));
            chunk_chars = 0;
        }
        chunk.push(ch);
        chunk_chars += 1;
    }
    *current = chunk;
}

fn join_into(current: &mut String, piece: &str, separator: &str) {
    if !current.is_empty() {
        current.push_str(separator);
    }
    current.push_str(piece);
}

fn joined_len(current: &str, piece: &str, separator_len: usize) -> usize {
    let sep = if current.is_empty() { 0 } else { separator_len };
    char_len(current) + sep + char_len(piece)
}

fn flush(parts: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        parts.push(std::mem::take(current));
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_part() {
        assert_eq!(split_message("привет", 4096), vec!["привет".to_string()]);
    }

    #[test]
    fn empty_text_is_a_single_empty_part() {
        assert_eq!(split_message("", 10), vec![String::new()]);
    }

    #[test]
    fn splits_on_paragraph_boundaries() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let parts = split_message(text, 10);
        assert_eq!(parts, vec!["aaaa\n\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn falls_back_to_sentence_boundaries() {
        let text = "один. два. три. четыре";
        let parts = split_message(text, 12);
        assert!(parts.len() > 1);
        for part in &parts {
            assert!(part.chars().count() <= 12, "part too long: {part:?}");
        }
    }

    #[test]
    fn hard_cuts_never_split_a_code_point() {
        let text = "ы".repeat(25);
        let parts = split_message(&text, 10);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].chars().count(), 10);
        assert_eq!(parts[2].chars().count(), 5);
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn every_part_respects_the_limit() {
        let text = "Первый абзац поменьше.\n\nВторой абзац существенно длиннее первого. \
                    В нем несколько предложений. И еще одно, для надежности.";
        for max in [20, 40, 80] {
            for part in split_message(text, max) {
                assert!(part.chars().count() <= max);
            }
        }
    }
}
