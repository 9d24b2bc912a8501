use serde::Deserialize;

use super::normalizer::DEFAULT_STOP_WORDS;

pub const NSFW_TAG: &str = "nsfw";
pub const DEFAULT_MAX_TAGS: usize = 15;
pub const DEFAULT_MIN_TAGS: usize = 3;
pub const DEFAULT_FILLER: [&str; 3] = ["gif", "animated", "image"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub max_tags: usize,
    pub min_tags: usize,
    pub filler: Vec<String>,
    pub stop_words: Vec<String>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            max_tags: DEFAULT_MAX_TAGS,
            min_tags: DEFAULT_MIN_TAGS,
            filler: DEFAULT_FILLER.iter().map(|t| t.to_string()).collect(),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Builds the final tag list from normalized tokens and the safety verdict.
#[derive(Debug, Clone)]
pub struct TagSynthesizer {
    max_tags: usize,
    min_tags: usize,
    filler: Vec<String>,
}

impl TagSynthesizer {
    pub fn new() -> Self {
        Self::with_config(&TagConfig::default())
    }

    pub fn with_config(config: &TagConfig) -> Self {
        Self {
            max_tags: config.max_tags,
            min_tags: config.min_tags,
            filler: config.filler.clone(),
        }
    }

    pub fn synthesize(&self, normalized: &[String], is_unsafe: bool) -> Vec<String> {
        let mut tags: Vec<String> = normalized.iter().take(self.max_tags).cloned().collect();

        // the safety tag is never dropped by the cap, so the list may hold max_tags + 1
        if is_unsafe && !tags.iter().any(|t| t == NSFW_TAG) {
            tags.insert(0, NSFW_TAG.to_string());
        }

        if tags.len() < self.min_tags {
            let missing = self.min_tags - tags.len();
            tags.extend(self.filler.iter().take(missing).cloned());
        }

        tags
    }
}

impl Default for TagSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("word{}", i)).collect()
    }

    #[test]
    fn test_safe_lists_within_bounds_unchanged() {
        let synthesizer = TagSynthesizer::new();
        for len in 3..=15 {
            let input = numbered(len);
            assert_eq!(synthesizer.synthesize(&input, false), input);
        }
    }

    #[test]
    fn test_truncates_to_max_tags() {
        let input = numbered(20);
        let tags = TagSynthesizer::new().synthesize(&input, false);
        assert_eq!(tags, input[..15].to_vec());
    }

    #[test]
    fn test_nsfw_inserted_first() {
        let input = tokens(&["cat", "sitting", "mat", "indoor"]);
        let tags = TagSynthesizer::new().synthesize(&input, true);

        assert_eq!(tags[0], "nsfw");
        assert_eq!(&tags[1..], &input[..]);
    }

    #[test]
    fn test_nsfw_not_clipped_after_truncation() {
        let input = numbered(20);
        let tags = TagSynthesizer::new().synthesize(&input, true);

        assert_eq!(tags.len(), 16);
        assert_eq!(tags[0], "nsfw");
        assert_eq!(&tags[1..], &input[..15]);
    }

    #[test]
    fn test_existing_nsfw_token_keeps_position() {
        let input = tokens(&["warning", "nsfw", "content"]);
        let tags = TagSynthesizer::new().synthesize(&input, true);
        assert_eq!(tags, input);
    }

    #[test]
    fn test_filler_tops_up_short_lists() {
        let synthesizer = TagSynthesizer::new();

        assert_eq!(
            synthesizer.synthesize(&[], false),
            tokens(&["gif", "animated", "image"])
        );
        assert_eq!(
            synthesizer.synthesize(&tokens(&["dance"]), false),
            tokens(&["dance", "gif", "animated"])
        );
        assert_eq!(
            synthesizer.synthesize(&tokens(&["dance", "party"]), false),
            tokens(&["dance", "party", "gif"])
        );
    }

    #[test]
    fn test_filler_counts_nsfw_tag() {
        let tags = TagSynthesizer::new().synthesize(&[], true);
        assert_eq!(tags, tokens(&["nsfw", "gif", "animated"]));
    }

    #[test]
    fn test_filler_appended_without_dedup() {
        let tags = TagSynthesizer::new().synthesize(&tokens(&["gif"]), false);
        assert_eq!(tags, tokens(&["gif", "gif", "animated"]));
    }

    #[test]
    fn test_short_filler_is_exhausted() {
        let synthesizer = TagSynthesizer::with_config(&TagConfig {
            min_tags: 5,
            filler: tokens(&["gif"]),
            ..Default::default()
        });
        assert_eq!(synthesizer.synthesize(&tokens(&["cat"]), false), tokens(&["cat", "gif"]));
    }
}
