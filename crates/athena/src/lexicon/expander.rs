use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::LexicalDatabase;
use crate::nlp::normalize;

pub type SynonymSet = Arc<BTreeSet<String>>;

/// Synonym lookups backed by a lexical database, cached for the process
/// lifetime. The cache is unbounded and never evicts; failed lookups are not
/// cached so a database that comes back later is picked up.
pub struct SynonymExpander {
    lexicon: Arc<dyn LexicalDatabase>,
    cache: Cache<String, SynonymSet>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    failures: Arc<AtomicU64>,
}

impl SynonymExpander {
    pub fn new(lexicon: Arc<dyn LexicalDatabase>) -> Self {
        Self {
            lexicon,
            cache: Cache::builder().build(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// All lemma forms across every synset of `word`, normalized and
    /// deduplicated. Never fails: an unavailable database yields an empty set.
    pub fn synonyms_of(&self, word: &str) -> SynonymSet {
        let key = normalize(word);
        if key.is_empty() {
            return SynonymSet::default();
        }

        if let Some(cached) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.lexicon.synsets(&key) {
            Ok(synsets) => {
                let set: BTreeSet<String> = synsets
                    .iter()
                    .flatten()
                    .map(|lemma| normalize(&lemma.replace('_', " ")))
                    .filter(|lemma| !lemma.is_empty())
                    .collect();
                debug!(word = %key, count = set.len(), "Expanded synonyms");
                let set = Arc::new(set);
                self.cache.insert(key, set.clone());
                set
            }
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    word = %key,
                    lexicon = self.lexicon.name(),
                    "Synonym lookup failed, continuing without synonyms: {}",
                    err
                );
                SynonymSet::default()
            }
        }
    }

    pub fn stats(&self) -> SynonymStats {
        self.cache.run_pending_tasks();
        SynonymStats {
            cached_words: self.cache.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for SynonymExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynonymExpander")
            .field("lexicon", &self.lexicon.name())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Synonym cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymStats {
    /// Number of words with a cached synonym set
    pub cached_words: u64,
    pub hits: u64,
    pub misses: u64,
    /// Lookups that failed because the database was unavailable
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::lexicon::{
        LexiconResult, NullLexicon, StaticLexicon, Synset, UnavailableLexicon,
    };

    /// Counts how often the database is actually consulted.
    struct CountingLexicon {
        inner: StaticLexicon,
        calls: AtomicUsize,
    }

    impl LexicalDatabase for CountingLexicon {
        fn synsets(&self, word: &str) -> LexiconResult<Vec<Synset>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.synsets(word)
        }
    }

    #[test]
    fn test_synonyms_are_flattened_and_normalized() {
        let expander = SynonymExpander::new(Arc::new(StaticLexicon::builtin()));
        let synonyms = expander.synonyms_of("increase");
        assert!(synonyms.contains("increase"));
        assert!(synonyms.contains("turn up"));
        assert!(synonyms.contains("boost"));
    }

    #[test]
    fn test_lookups_are_cached() {
        let lexicon = Arc::new(CountingLexicon {
            inner: StaticLexicon::builtin(),
            calls: AtomicUsize::new(0),
        });
        let expander = SynonymExpander::new(lexicon.clone());

        let first = expander.synonyms_of("volume");
        let second = expander.synonyms_of("Volume");

        assert_eq!(first, second);
        assert_eq!(lexicon.calls.load(Ordering::SeqCst), 1);
        let stats = expander.stats();
        assert_eq!(stats.cached_words, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_unavailable_database_yields_empty_set() {
        let expander = SynonymExpander::new(Arc::new(UnavailableLexicon::new("offline")));
        assert!(expander.synonyms_of("volume").is_empty());
        assert!(expander.synonyms_of("volume").is_empty());

        let stats = expander.stats();
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.cached_words, 0);
    }

    #[test]
    fn test_empty_word() {
        let expander = SynonymExpander::new(Arc::new(NullLexicon));
        assert!(expander.synonyms_of("  ").is_empty());
        assert_eq!(expander.stats().misses, 0);
    }
}
