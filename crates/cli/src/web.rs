//! Web information provider backed by the DuckDuckGo instant answer API
//!
//! Queries are tidied and enhanced before the request, answers are cleaned
//! into speakable sentences and remembered in an in-process cache.

use std::time::Duration;

use athena::{WebConfig, WebInformationProvider};
use async_trait::async_trait;
use chrono::Datelike;
use moka::future::Cache;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const NOT_FOUND: &str =
    "I couldn't find specific information about that. Please try asking in a different way.";
pub const UNAVAILABLE: &str = "I'm having trouble searching for that information right now.";

const USER_AGENT: &str = concat!("athena/", env!("CARGO_PKG_VERSION"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static LINKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"http\S+|www\.\S+|\S+@\S+|\S+\.(com|org|net|edu|gov)\b|\\+\S+")
        .expect("valid link regex")
});

static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)cookies?\s+policy|privacy\s+policy|terms\s+of\s+service|accept\s+cookies|change\s+your\s+city|subscribe\s+to\s+our\s+newsletter|sign\s+up\s+for\s+our\s+newsletter|advertisement|we\s+serve\s+personalized\s+stories|based\s+on\s+the\s+selected\s+city|click\s+here|read\s+more",
    )
    .expect("valid boilerplate regex")
});

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}").expect("valid bracket regex"));

static UNSPEAKABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s.,!?]").expect("valid character regex"));

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));

static DEFINITION_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"what\s+(?:is|are)\s+|define\s+|tell\s+me\s+about\s+")
        .expect("valid definition regex")
});

const DEFINITION_PHRASES: &[&str] = &["what is", "what are", "define", "tell me about"];
const SKIPPED_OPENINGS: &[&str] = &["click", "subscribe", "sign up", "download"];
const PHONE_BRANDS: &[&str] = &["samsung", "iphone", "pixel", "oneplus", "xiaomi"];

/// Collapse whitespace, drop links, boilerplate, bracketed asides and
/// characters that do not read aloud, then keep only sentences long enough
/// to carry information.
pub fn clean_text(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = LINKS.replace_all(text.trim(), "");
    let text = BOILERPLATE.replace_all(&text, "");
    let text = BRACKETED.replace_all(&text, "");
    let text = UNSPEAKABLE.replace_all(&text, " ");

    SENTENCE_END
        .split(&text)
        .map(|sentence| WHITESPACE.replace_all(sentence.trim(), " ").into_owned())
        .filter(|sentence| sentence.chars().count() > 20)
        .filter(|sentence| !sentence.chars().all(|c| c.is_ascii_digit()))
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            !SKIPPED_OPENINGS
                .iter()
                .any(|opening| lowered.starts_with(opening))
        })
        .map(|sentence| capitalize(&sentence))
        .collect::<Vec<_>>()
        .join(". ")
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Add search hints for the kinds of question instant answers handle badly.
pub fn enhance_query(query: &str, year: i32) -> String {
    let lowered = query.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

    if mentions(&["latest", "newest", "recent"]) && lowered.contains("phone") {
        let brand = PHONE_BRANDS
            .iter()
            .find(|brand| lowered.contains(*brand))
            .copied()
            .unwrap_or_default();
        return format!("{brand} phone {year} release date specifications")
            .trim()
            .to_string();
    }
    if lowered.contains("cast") || (lowered.contains("who") && lowered.contains("play")) {
        return format!("{query} movie cast main actors");
    }
    if mentions(&["how old", "age of"]) {
        return format!("{query} age birth date wikipedia");
    }
    if mentions(&["president", "prime minister", "leader"]) {
        if mentions(&["current", "now"]) {
            return format!("{query} {year} current");
        }
        return format!("{query} history wikipedia");
    }
    query.to_string()
}

/// Strip punctuation, reduce definition questions to their topic and
/// enhance everything else.
pub fn prepare_query(query: &str, year: i32) -> String {
    let stripped = NON_WORD.replace_all(query, " ");
    let query = WHITESPACE.replace_all(stripped.trim(), " ").into_owned();
    let lowered = query.to_lowercase();

    if DEFINITION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        return DEFINITION_PREFIX.replace_all(&lowered, "").trim().to_string();
    }
    enhance_query(&query, year)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InstantAnswer {
    answer: serde_json::Value,
    abstract_text: String,
    definition: String,
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RelatedTopic {
    text: String,
}

impl InstantAnswer {
    /// Direct answer, then abstract, then definition, then the first related
    /// topic.
    fn best_text(self) -> Option<String> {
        let answer = self.answer.as_str().map(str::to_string).unwrap_or_default();
        let topic = self
            .related_topics
            .into_iter()
            .map(|topic| topic.text)
            .find(|text| !text.trim().is_empty())
            .unwrap_or_default();

        [answer, self.abstract_text, self.definition, topic]
            .into_iter()
            .find(|text| !text.trim().is_empty())
    }
}

pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
    cache: Cache<String, String>,
}

impl DuckDuckGoProvider {
    pub fn new(config: &WebConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            cache: Cache::builder().max_capacity(config.cache_capacity).build(),
        })
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>, reqwest::Error> {
        let answer: InstantAnswer = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(answer.best_text().map(|text| {
            let cleaned = clean_text(&text);
            if cleaned.is_empty() {
                text.trim().to_string()
            } else {
                cleaned
            }
        }))
    }
}

#[async_trait]
impl WebInformationProvider for DuckDuckGoProvider {
    async fn get_information(&self, query: &str) -> String {
        let prepared = prepare_query(query, chrono::Local::now().year());
        if prepared.is_empty() {
            return NOT_FOUND.to_string();
        }

        if let Some(cached) = self.cache.get(&prepared).await {
            debug!(query = %prepared, "Answer served from cache");
            return cached;
        }

        match self.fetch(&prepared).await {
            Ok(Some(answer)) => {
                self.cache.insert(prepared, answer.clone()).await;
                answer
            }
            Ok(None) => {
                debug!(query = %prepared, "No instant answer");
                NOT_FOUND.to_string()
            }
            Err(e) => {
                warn!(query = %prepared, "Web lookup failed: {}", e);
                UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_drops_noise() {
        let raw = "Rust is a multi-paradigm programming language (first released in 2015). \
                   See https://rust-lang.org now. Click here to read more about it! Too short. \
                   It emphasizes performance [1] and type safety.";
        assert_eq!(
            clean_text(raw),
            "Rust is a multi paradigm programming language. It emphasizes performance and type safety"
        );
    }

    #[test]
    fn test_clean_text_capitalizes_sentences() {
        assert_eq!(
            clean_text("paris is the capital of france."),
            "Paris is the capital of france"
        );
        assert_eq!(clean_text("subscribe now for all the latest updates"), "");
    }

    #[test]
    fn test_enhance_query_hints() {
        assert_eq!(
            enhance_query("what is the latest samsung phone", 2024),
            "samsung phone 2024 release date specifications"
        );
        assert_eq!(
            enhance_query("who plays batman", 2024),
            "who plays batman movie cast main actors"
        );
        assert_eq!(
            enhance_query("how old is the queen", 2024),
            "how old is the queen age birth date wikipedia"
        );
        assert_eq!(
            enhance_query("current president of france", 2024),
            "current president of france 2024 current"
        );
        assert_eq!(
            enhance_query("first president of france", 2024),
            "first president of france history wikipedia"
        );
        assert_eq!(enhance_query("rust tutorials", 2024), "rust tutorials");
    }

    #[test]
    fn test_prepare_query_reduces_definitions_to_topic() {
        assert_eq!(prepare_query("What is the capital of France?", 2024), "the capital of france");
        assert_eq!(prepare_query("tell me about octopuses", 2024), "octopuses");
        assert_eq!(prepare_query("  rust, tutorials!  ", 2024), "rust tutorials");
        assert_eq!(prepare_query("?!", 2024), "");
    }

    #[test]
    fn test_best_text_precedence() {
        let answer: InstantAnswer = serde_json::from_str(
            r#"{"Answer": "", "AbstractText": "", "Definition": "A definition.",
                "RelatedTopics": [{"Text": "A topic."}]}"#,
        )
        .unwrap();
        assert_eq!(answer.best_text().as_deref(), Some("A definition."));

        let grouped: InstantAnswer = serde_json::from_str(
            r#"{"RelatedTopics": [{"Name": "Group", "Topics": []}, {"Text": "Second topic."}]}"#,
        )
        .unwrap();
        assert_eq!(grouped.best_text().as_deref(), Some("Second topic."));

        let empty: InstantAnswer = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.best_text(), None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_unavailable() {
        let provider = DuckDuckGoProvider::new(&WebConfig {
            endpoint: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 2,
            cache_capacity: 8,
        })
        .unwrap();

        assert_eq!(provider.get_information("rust tutorials").await, UNAVAILABLE);
        assert_eq!(provider.get_information("!!").await, NOT_FOUND);
        assert_eq!(provider.cache.entry_count(), 0);
    }
}
