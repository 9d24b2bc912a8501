use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of three or more lowercase Latin letters. Boundaries are checked in
/// [`is_bounded`], since `\b` in `regex` also treats combining marks as word characters.
static LETTER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]{3,}").expect("letter run pattern is valid"));

pub const DEFAULT_STOP_WORDS: [&str; 15] = [
    "a", "an", "the", "is", "are", "was", "were", "in", "on", "at", "to", "for", "of", "with",
    "by",
];

/// Turns caption + OCR text into an ordered, deduplicated list of candidate tags.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: HashSet<String>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_STOP_WORDS)
    }

    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn normalize(&self, caption: &str, ocr_text: &str) -> Vec<String> {
        let text = format!("{} {}", caption, ocr_text).to_lowercase();

        let mut seen = HashSet::new();
        LETTER_RUN
            .find_iter(&text)
            .filter(|m| is_bounded(&text, m.start(), m.end()))
            .map(|m| m.as_str())
            .filter(|word| !self.stop_words.contains(*word))
            .filter(|word| seen.insert(*word))
            .map(str::to_string)
            .collect()
    }
}

/// Word characters are alphanumerics and `_`; a combining accent on its own is not one.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The run must not touch a word character on either side.
fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
