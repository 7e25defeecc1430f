//! Rule-based noun lemmatizer.
//!
//! Mirrors the behaviour of a dictionary "morphy" pass for the vocabulary a
//! desktop assistant hears: plural nouns fold to their singular, everything
//! else is returned unchanged. Verbs are not folded: patterns are written
//! against imperative forms ("set", "turn", "open").

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

static IRREGULAR_PLURALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("people", "person"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("goes", "go"),
        ("leaves", "leaf"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("halves", "half"),
    ])
});

/// Words ending in "s" that are already in base form.
static INVARIANT: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "this", "does", "always", "perhaps", "news", "series", "species", "whereas", "lens",
        "atlas", "canvas", "alias", "chaos", "christmas", "thanks", "maths", "physics",
        "afterwards", "towards", "sometimes", "whats", "lets",
    ])
});

/// Reduce a single lower-cased token to its base form.
pub fn lemmatize(token: &str) -> String {
    if token.len() <= 3 || !token.chars().all(|c| c.is_alphabetic()) {
        return token.to_string();
    }
    if let Some(base) = IRREGULAR_PLURALS.get(token) {
        return (*base).to_string();
    }
    if INVARIANT.contains(token) {
        return token.to_string();
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    match token.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => token.to_string(),
    }
}
