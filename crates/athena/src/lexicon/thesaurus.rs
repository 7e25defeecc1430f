//! Lexical database implementations.

use std::{collections::HashMap, path::Path};

use tracing::info;

use super::{LexicalDatabase, LexiconError, LexiconResult, Synset};
use crate::nlp::normalize;

/// Built-in sense groupings for the command vocabulary, WordNet style: each
/// synset lists the headword itself alongside the lemmas sharing that sense.
/// Multi-word lemmas use underscores.
const BUILTIN_SYNSETS: &[(&str, &[&[&str]])] = &[
    // Volume
    (
        "volume",
        &[
            &["volume", "loudness", "intensity"],
            &["volume", "bulk", "mass"],
            &["book", "volume"],
        ],
    ),
    (
        "sound",
        &[&["sound", "audio"], &["sound", "noise"], &["sound", "auditory_sensation"]],
    ),
    ("loud", &[&["loud"], &["loud", "forte"], &["loud", "brassy", "garish"]]),
    ("quiet", &[&["quiet", "silence", "hush"], &["quiet", "tranquil", "placid"]]),
    (
        "increase",
        &[
            &["increase", "addition", "gain"],
            &["increase", "increment", "growth"],
            &["increase", "raise", "turn_up", "boost"],
        ],
    ),
    (
        "decrease",
        &[
            &["decrease", "reduction", "step-down"],
            &["decrease", "lessen", "minify"],
            &["decrease", "diminish", "turn_down"],
        ],
    ),
    ("mute", &[&["mute", "dumb", "silent"], &["mute", "dampen", "muffle", "deaden"]]),
    ("unmute", &[&["unmute"]]),
    ("percent", &[&["percent", "percentage", "per_centum"]]),
    // Time
    (
        "time",
        &[&["time", "clip"], &["time", "clock_time"], &["time", "meter", "metre"]],
    ),
    ("clock", &[&["clock"], &["clock", "time"]]),
    ("hour", &[&["hour", "hr", "60_minutes"], &["hour", "time_of_day"]]),
    ("minute", &[&["minute", "min"], &["minute", "moment", "second", "instant"]]),
    // Greetings
    (
        "hello",
        &[&["hello", "hullo", "hi", "howdy", "how-do-you-do"]],
    ),
    ("hi", &[&["hello", "hullo", "hi", "howdy", "how-do-you-do"]]),
    ("greeting", &[&["greeting", "salutation"]]),
    ("morning", &[&["morning", "morn", "morning_time", "forenoon"]]),
    ("afternoon", &[&["afternoon"]]),
    ("evening", &[&["evening", "eve", "even", "eventide"]]),
    // System control
    ("shutdown", &[&["shutdown", "closedown", "closing", "shutting_down"]]),
    ("restart", &[&["restart", "re-start", "resume"], &["restart", "reboot", "boot"]]),
    ("reboot", &[&["reboot", "restart", "boot"]]),
    ("power", &[&["power", "powerfulness"], &["power", "force"], &["ability", "power"]]),
    ("sleep", &[&["sleep", "slumber"], &["sleep", "kip", "sleep_in"], &["sleep", "rest"]]),
    ("hibernate", &[&["hibernate", "hole_up"], &["hibernate", "sleep", "suspend"]]),
    // Search
    ("search", &[&["search", "hunt", "hunting"], &["search", "look_for", "seek"]]),
    (
        "find",
        &[&["find", "discover", "detect", "notice"], &["find", "look_up", "search"]],
    ),
    ("look up", &[&["look_up", "search", "consult"]]),
    ("best", &[&["best", "topper"], &["best", "outdo", "top"]]),
    ("latest", &[&["latest", "up-to-date", "newest", "recent"]]),
    // Weather
    ("weather", &[&["weather", "weather_condition", "conditions", "atmospheric_condition"]]),
    ("temperature", &[&["temperature"], &["temperature", "heat"]]),
    ("forecast", &[&["forecast", "prognosis", "outlook"], &["forecast", "predict"]]),
    ("rain", &[&["rain", "rainfall", "pelting"], &["rain", "rain_down"]]),
    ("snow", &[&["snow", "snowfall"], &["snow", "bamboozle"]]),
    ("sunny", &[&["sunny", "sunlit", "sunshiny"], &["bright", "sunny"]]),
    // Reminders
    ("remind", &[&["remind", "prompt", "cue"], &["remind", "remember"]]),
    ("reminder", &[&["reminder", "admonisher", "monitor"], &["reminder", "memento", "souvenir"]]),
    ("alarm", &[&["alarm", "alert", "warning", "alarum"], &["alarm_clock", "alarm"]]),
    ("notification", &[&["notification", "notice", "presentment"]]),
    ("remember", &[&["remember", "retrieve", "recall", "think_back"], &["remember", "recollect"]]),
    // Dates
    ("date", &[&["date", "day_of_the_month"], &["date", "particular_date"]]),
    ("day", &[&["day", "twenty-four_hours", "solar_day"], &["day", "daytime", "daylight"]]),
    ("today", &[&["today", "nowadays", "now"]]),
    ("current", &[&["current", "stream"], &["current", "present", "now"]]),
];

/// Lexicon with no entries. Classification degrades to keyword-only scoring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLexicon;

impl LexicalDatabase for NullLexicon {
    fn synsets(&self, _word: &str) -> LexiconResult<Vec<Synset>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Lexicon that always reports itself unavailable.
#[derive(Debug, Clone)]
pub struct UnavailableLexicon {
    reason: String,
}

impl UnavailableLexicon {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LexicalDatabase for UnavailableLexicon {
    fn synsets(&self, _word: &str) -> LexiconResult<Vec<Synset>> {
        Err(LexiconError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// In-memory thesaurus keyed by normalized headword.
#[derive(Debug, Clone, Default)]
pub struct StaticLexicon {
    entries: HashMap<String, Vec<Synset>>,
}

impl StaticLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thesaurus covering the built-in command vocabulary.
    pub fn builtin() -> Self {
        let mut lexicon = Self::new();
        for (word, synsets) in BUILTIN_SYNSETS {
            for synset in synsets.iter() {
                lexicon.insert(word, synset.iter().map(|lemma| lemma.to_string()).collect());
            }
        }
        lexicon
    }

    /// Parse a JSON object mapping headwords to lists of synsets.
    ///
    /// ```json
    /// { "volume": [["volume", "loudness"], ["book", "volume"]] }
    /// ```
    pub fn from_json_str(json: &str) -> LexiconResult<Self> {
        let raw: HashMap<String, Vec<Synset>> = serde_json::from_str(json)?;
        let mut lexicon = Self::new();
        for (word, synsets) in raw {
            for synset in synsets {
                lexicon.insert(&word, synset);
            }
        }
        Ok(lexicon)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> LexiconResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_json_str(&json)?;
        info!(
            "Loaded thesaurus from {} ({} headwords)",
            path.display(),
            lexicon.len()
        );
        Ok(lexicon)
    }

    pub fn insert(&mut self, word: &str, synset: Synset) {
        let key = headword_key(word);
        if key.is_empty() {
            return;
        }
        self.entries.entry(key).or_default().push(synset);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LexicalDatabase for StaticLexicon {
    fn synsets(&self, word: &str) -> LexiconResult<Vec<Synset>> {
        Ok(self
            .entries
            .get(&headword_key(word))
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn headword_key(word: &str) -> String {
    normalize(&word.replace('_', " "))
}
