//! Lexical-semantic database access and the per-process synonym cache.
//!
//! The assistant only needs one question answered by a lexical database:
//! "which lemma names share a sense with this word?". [`LexicalDatabase`] is
//! that narrow seam; [`SynonymExpander`] sits in front of it, flattens and
//! normalizes the answer and remembers it for the lifetime of the process.

pub mod expander;
pub mod thesaurus;

use std::path::PathBuf;

pub use expander::{SynonymExpander, SynonymStats};
pub use thesaurus::{NullLexicon, StaticLexicon, UnavailableLexicon};

/// One sense grouping: the lemma names that share a meaning.
pub type Synset = Vec<String>;

/// Lexical database errors
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Lexical database unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read thesaurus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid thesaurus format: {0}")]
    Format(#[from] serde_json::Error),
}

pub type LexiconResult<T> = Result<T, LexiconError>;

/// External lexical database (WordNet-style synsets)
pub trait LexicalDatabase: Send + Sync {
    /// Every synset that `word` belongs to. Unknown words yield an empty list.
    fn synsets(&self, word: &str) -> LexiconResult<Vec<Synset>>;

    fn name(&self) -> &str {
        "lexicon"
    }
}
