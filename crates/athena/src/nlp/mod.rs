//! Lexical normalization shared by every matching stage.
//!
//! Raw utterances are lower-cased, split into word tokens and reduced to a
//! base form before pattern matching or scoring sees them. Keywords, authored
//! phrases and lexicon synonyms go through the same pipeline so both sides of
//! every comparison agree on spelling.

pub mod lemma;
pub mod normalizer;

pub use lemma::lemmatize;
pub use normalizer::{contains_phrase, normalize, tokenize, NormalizedText};
