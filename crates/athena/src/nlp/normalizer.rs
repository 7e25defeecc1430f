use once_cell::sync::Lazy;
use regex::Regex;

use super::lemma::lemmatize;

/// Word tokens: letters/digits, optionally joined by an apostrophe, colon or
/// dot so "what's", "7:30" and "2.5" survive as single tokens.
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’:.][\p{L}\p{N}]+)*").expect("valid token regex")
});

/// Split text into lower-cased word tokens, dropping punctuation.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str().replace('’', "'"))
        .collect()
}

/// Canonical form used by every matcher: lower-cased, tokenized, lemmatized
/// and joined with single spaces. Empty or punctuation-only input yields "".
pub fn normalize(text: &str) -> String {
    tokenize(text)
        .iter()
        .map(|token| lemmatize(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Token-boundary containment: `phrase` must appear as whole words.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if phrase.is_empty() || normalized.is_empty() {
        return false;
    }
    format!(" {normalized} ").contains(&format!(" {phrase} "))
}

/// A normalized utterance with a padded copy for repeated phrase lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    padded: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        Self::from_normalized(normalize(raw))
    }

    pub fn from_normalized(text: String) -> Self {
        let padded = format!(" {text} ");
        Self { text, padded }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        !phrase.is_empty() && self.padded.contains(&format!(" {phrase} "))
    }
}
