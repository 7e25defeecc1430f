//! Parameter extraction from raw utterances: numbers, durations, clock
//! times and app names, plus the spoken forms of durations and dates.

use chrono::{Datelike, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::tokenize;

const NUMBER_WORDS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
    ("hundred", 100),
];

fn number_word(word: &str) -> Option<u64> {
    NUMBER_WORDS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, value)| *value)
}

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digits regex"));

/// First integer in `text`: digits win over number words, and the earliest
/// occurrence of either kind wins.
pub fn extract_number(text: &str) -> Option<u64> {
    if let Some(found) = DIGITS_REGEX.find(text) {
        if let Ok(value) = found.as_str().parse() {
            return Some(value);
        }
    }
    tokenize(text).iter().find_map(|token| number_word(token))
}

fn quantity_regex(units: &str) -> Regex {
    let words: Vec<&str> = NUMBER_WORDS.iter().map(|(name, _)| *name).collect();
    Regex::new(&format!(
        r"(?i)\b(\d+|an?|{})\s*(?:{})\b",
        words.join("|"),
        units
    ))
    .expect("valid duration regex")
}

static HOURS_REGEX: Lazy<Regex> = Lazy::new(|| quantity_regex("hours?|hrs?"));
static MINUTES_REGEX: Lazy<Regex> = Lazy::new(|| quantity_regex("minutes?|mins?"));
static SECONDS_REGEX: Lazy<Regex> = Lazy::new(|| quantity_regex("seconds?|secs?"));

fn quantity(regex: &Regex, text: &str) -> Option<u64> {
    let captures = regex.captures(text)?;
    let amount = captures.get(1)?.as_str().to_lowercase();
    match amount.as_str() {
        "a" | "an" => Some(1),
        digits if digits.chars().all(|c| c.is_ascii_digit()) => digits.parse().ok(),
        word => number_word(word),
    }
}

/// Longest timer accepted: one week.
pub const MAX_DURATION_SECS: u64 = 7 * 24 * 3600;

/// Total seconds described by `text`. Hour, minute and second markers are
/// read independently and summed; a bare number without a unit counts as
/// minutes. Zero-length durations and anything longer than
/// [`MAX_DURATION_SECS`] are rejected.
pub fn parse_duration(text: &str) -> Option<u64> {
    let hours = quantity(&HOURS_REGEX, text);
    let minutes = quantity(&MINUTES_REGEX, text);
    let seconds = quantity(&SECONDS_REGEX, text);

    let total = if hours.is_none() && minutes.is_none() && seconds.is_none() {
        extract_number(text)?.checked_mul(60)?
    } else {
        hours
            .unwrap_or(0)
            .checked_mul(3600)?
            .checked_add(minutes.unwrap_or(0).checked_mul(60)?)?
            .checked_add(seconds.unwrap_or(0))?
    };

    (1..=MAX_DURATION_SECS).contains(&total).then_some(total)
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// "1 hour and 30 minutes" style rendering of a second count
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    if seconds > 0 {
        parts.push(plural(seconds, "second"));
    }

    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.join(" and ")
    }
}

static APP_FILLER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:please|for me|the application|the app|application|app)\b")
        .expect("valid app filler regex")
});

/// Strip politeness and filler words from a spoken application name.
pub fn clean_app_name(name: &str) -> String {
    let cleaned = APP_FILLER_REGEX.replace_all(name, " ");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string()
}

static HOUR_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\s*(AM|PM)$").expect("valid hour regex")
});

/// Parse "07:30", "7:30 AM", "7:30am" or "7 pm" into a wall-clock time.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let cleaned = text.trim().to_uppercase().replace('.', "");
    for format in ["%H:%M", "%I:%M %p", "%I:%M%p"] {
        if let Ok(time) = NaiveTime::parse_from_str(&cleaned, format) {
            return Some(time);
        }
    }

    let captures = HOUR_ONLY_REGEX.captures(&cleaned)?;
    let hour: u32 = captures[1].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (&captures[2], hour) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        (_, h) => h + 12,
    };
    NaiveTime::from_hms_opt(hour, 0, 0)
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// "Monday, January 1st, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}
