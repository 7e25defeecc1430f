//! Command router
//!
//! Turns a classification into replies. Categories with a dedicated handler
//! extract their parameters from the raw utterance; everything else goes
//! through keyword-driven default dispatch, and "none" falls back to an
//! information search.

pub mod params;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    collaborators::{AppControl, PowerAction, SystemPower, VolumeControl, WebInformationProvider},
    intent::{CategoryRegistry, ClassificationResult, CommandCategory, HandlerKind},
    nlp::tokenize,
    timekeeper::TimeKeeper,
};
use params::{clean_app_name, extract_number, format_long_date, parse_duration};

const VOLUME_STEP: i32 = 10;

const VOLUME_UP_WORDS: &[&str] = &["up", "increase", "raise", "louder", "higher", "boost"];
const VOLUME_DOWN_WORDS: &[&str] = &["down", "decrease", "lower", "quieter", "softer", "reduce"];

const GREETINGS: &[&str] = &[
    "Hello! How can I help you today?",
    "Hi there! What can I do for you?",
    "Hey! I'm here and ready to help.",
    "Greetings! What would you like me to do?",
];

pub const CLARIFY_REPEAT: &str = "I didn't catch that. Could you please repeat?";

const DATE_QUESTIONS: &[&str] = &["today's date", "what date", "the date"];
const DAY_QUESTIONS: &[&str] = &["what day", "which day", "the day", "what's today"];

static SEARCH_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:can|could) you\s+|please\s+)*(?:search (?:the web |online )?(?:for\s+)?|look up\s+|find(?: me)?\s+|google\s+|tell me about\s+)",
    )
    .expect("valid search prefix regex")
});

static DEFINITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:what|who)(?:\s+is|\s+are|\s+was|\s+were|'s)\b|\bdefine\b|\bmeaning of\b")
        .expect("valid definition regex")
});

static REMINDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:remind me to|remind me|remember to|don't let me forget to|don't let me forget|help me remember to|help me remember)\s+(.+)",
    )
    .expect("valid reminder regex")
});

/// Replies produced for one utterance, in speaking order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOutcome {
    pub category: String,
    pub replies: Vec<String>,
}

impl RouteOutcome {
    fn new(category: &str, replies: Vec<String>) -> Self {
        Self {
            category: category.to_string(),
            replies,
        }
    }

    fn single(category: &str, reply: impl Into<String>) -> Self {
        Self::new(category, vec![reply.into()])
    }
}

/// Everything the router dispatches to
#[derive(Clone)]
pub struct Collaborators {
    pub apps: Arc<dyn AppControl>,
    pub volume: Arc<dyn VolumeControl>,
    pub web: Arc<dyn WebInformationProvider>,
    pub timekeeper: Arc<dyn TimeKeeper>,
    pub power: Arc<dyn SystemPower>,
}

fn has_any(tokens: &[String], words: &[&str]) -> bool {
    tokens.iter().any(|token| words.contains(&token.as_str()))
}

pub struct CommandRouter {
    registry: Arc<CategoryRegistry>,
    collaborators: Collaborators,
    priority_categories: Vec<String>,
}

impl CommandRouter {
    pub fn new(
        registry: Arc<CategoryRegistry>,
        collaborators: Collaborators,
        priority_categories: Vec<String>,
    ) -> Self {
        Self {
            registry,
            collaborators,
            priority_categories,
        }
    }

    /// Unambiguous imperative categories (open/close an app) checked against
    /// the raw utterance before any classification.
    pub fn priority_match(&self, raw: &str) -> Option<ClassificationResult> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        self.priority_categories
            .iter()
            .filter_map(|id| self.registry.get(id))
            .find(|category| category.first_match(&lowered).is_some())
            .map(|category| ClassificationResult::exact(category.id()))
    }

    pub async fn route(&self, result: &ClassificationResult, raw: &str) -> RouteOutcome {
        let lowered = raw.trim().to_lowercase();
        if result.is_none() {
            return self.search_fallback(&lowered).await;
        }

        let Some(category) = self.registry.get(&result.category) else {
            warn!(category = %result.category, "Classified into unknown category");
            return self.search_fallback(&lowered).await;
        };

        debug!(category = %category.id(), handler = ?category.handler(), "Routing command");
        match category.handler() {
            Some(kind) => self.run_handler(kind, category, &lowered).await,
            None => self.default_dispatch(category.id(), &lowered).await,
        }
    }

    /// First capture of the category's matching pattern on the raw text, or
    /// the whole text when it only matched after normalization or scoring.
    fn parameter(category: &CommandCategory, lowered: &str) -> String {
        category
            .captures(lowered)
            .and_then(|captures| captures.into_iter().find(|c| !c.is_empty()))
            .unwrap_or_else(|| lowered.to_string())
    }

    async fn run_handler(
        &self,
        kind: HandlerKind,
        category: &CommandCategory,
        lowered: &str,
    ) -> RouteOutcome {
        let id = category.id();
        let keeper = &self.collaborators.timekeeper;
        match kind {
            HandlerKind::OpenApp => {
                let name = clean_app_name(&Self::parameter(category, lowered));
                if name.is_empty() {
                    return RouteOutcome::single(id, "Which application would you like me to open?");
                }
                RouteOutcome::single(id, self.collaborators.apps.open(&name).await)
            }
            HandlerKind::CloseApp => {
                let name = clean_app_name(&Self::parameter(category, lowered));
                if name.is_empty() {
                    return RouteOutcome::single(id, "Which application would you like me to close?");
                }
                RouteOutcome::single(id, self.collaborators.apps.close(&name).await)
            }
            HandlerKind::SetTimer => match parse_duration(&Self::parameter(category, lowered)) {
                Some(seconds) => RouteOutcome::single(id, keeper.set_timer(seconds)),
                None => RouteOutcome::single(id, "Please specify a valid duration"),
            },
            HandlerKind::SetAlarm => {
                let time = Self::parameter(category, lowered);
                RouteOutcome::single(id, keeper.set_alarm(&time))
            }
            HandlerKind::CancelTimers => RouteOutcome::single(id, keeper.cancel_timers()),
            HandlerKind::CancelAlarms => RouteOutcome::single(id, keeper.cancel_alarms()),
            HandlerKind::ListTimers => RouteOutcome::single(id, keeper.list_timers()),
            HandlerKind::ListAlarms => RouteOutcome::single(id, keeper.list_alarms()),
        }
    }

    async fn default_dispatch(&self, id: &str, lowered: &str) -> RouteOutcome {
        match id {
            "volume" => RouteOutcome::single(id, self.volume_command(lowered).await),
            "time" => RouteOutcome::single(
                id,
                format!("The current time is {}", Local::now().format("%I:%M %p")),
            ),
            "date" => RouteOutcome::single(id, date_reply(lowered, Local::now().date_naive())),
            "greeting" => {
                let reply = GREETINGS
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or("Hello!");
                RouteOutcome::single(id, reply)
            }
            "search" => RouteOutcome::new(id, self.search_command(lowered).await),
            "weather" => {
                let query = format!("current weather forecast {}", Local::now().format("%Y-%m-%d"));
                let info = self.collaborators.web.get_information(&query).await;
                RouteOutcome::new(id, vec!["Let me check the current weather".to_string(), info])
            }
            "reminder" => RouteOutcome::single(id, Self::reminder_reply(lowered)),
            "system_control" => RouteOutcome::single(id, self.system_command(lowered).await),
            _ => {
                debug!(category = id, "No default dispatch, searching instead");
                let mut outcome = self.search_fallback(lowered).await;
                outcome.category = id.to_string();
                outcome
            }
        }
    }

    async fn volume_command(&self, lowered: &str) -> String {
        let volume = &self.collaborators.volume;
        let tokens = tokenize(lowered);

        let (result, reply) = if let Some(level) = extract_number(lowered) {
            let level = level.min(100);
            (
                volume.set_volume(level as f32 / 100.0).await,
                format!("Setting volume to {level} percent"),
            )
        } else if has_any(&tokens, VOLUME_UP_WORDS) {
            (volume.change_volume(VOLUME_STEP).await, "Increasing volume".to_string())
        } else if has_any(&tokens, VOLUME_DOWN_WORDS) {
            (volume.change_volume(-VOLUME_STEP).await, "Decreasing volume".to_string())
        } else if has_any(&tokens, &["unmute"]) {
            (volume.unmute().await, "Unmuting audio".to_string())
        } else if has_any(&tokens, &["mute", "silence"]) {
            (volume.mute().await, "Muting audio".to_string())
        } else {
            return "Please specify a volume level or say louder or quieter".to_string();
        };

        match result {
            Ok(()) => reply,
            Err(err) => {
                warn!("Volume control failed: {}", err);
                "Sorry, I couldn't change the volume".to_string()
            }
        }
    }


    fn reminder_reply(lowered: &str) -> String {
        match REMINDER_REGEX.captures(lowered) {
            Some(captures) => {
                let task = captures[1].trim().trim_end_matches(&['.', '!', '?'][..]);
                format!("I'll remind you to {task}")
            }
            None => "What would you like me to remind you about?".to_string(),
        }
    }

    async fn system_command(&self, lowered: &str) -> String {
        let action = if lowered.contains("restart") || lowered.contains("reboot") {
            PowerAction::Restart
        } else if lowered.contains("sleep") || lowered.contains("hibernate") || lowered.contains("suspend") {
            PowerAction::Sleep
        } else if lowered.contains("shut")
            || lowered.contains("turn off")
            || lowered.contains("power off")
        {
            PowerAction::Shutdown
        } else {
            return "Please say shutdown, restart or sleep".to_string();
        };

        match self.collaborators.power.perform(action).await {
            Ok(()) => action.announcement().to_string(),
            Err(err) => {
                warn!(?action, "Power action failed: {}", err);
                format!("Sorry, I couldn't complete that: {err}")
            }
        }
    }

    async fn search_command(&self, lowered: &str) -> Vec<String> {
        let web = &self.collaborators.web;
        if DEFINITION_REGEX.is_match(lowered) {
            return vec![web.get_information(lowered).await];
        }

        let query = SEARCH_PREFIX_REGEX.replace(lowered, "").trim().to_string();
        if query.is_empty() {
            return vec!["What would you like me to search for?".to_string()];
        }
        vec![
            format!("Searching for information about {query}"),
            web.get_information(&query).await,
        ]
    }

    async fn search_fallback(&self, lowered: &str) -> RouteOutcome {
        if lowered.is_empty() {
            return RouteOutcome::single(crate::intent::NONE_CATEGORY, CLARIFY_REPEAT);
        }
        let info = self.collaborators.web.get_information(lowered).await;
        RouteOutcome::new(
            crate::intent::NONE_CATEGORY,
            vec!["Let me search for that information".to_string(), info],
        )
    }
}

/// Full date for date questions, the day name for day questions, and a
/// plain statement of the date otherwise.
pub fn date_reply(lowered: &str, today: NaiveDate) -> String {
    if DATE_QUESTIONS.iter().any(|phrase| lowered.contains(phrase)) {
        format!("Today is {}", format_long_date(today))
    } else if DAY_QUESTIONS.iter().any(|phrase| lowered.contains(phrase)) {
        format!("Today is {}", today.format("%A"))
    } else {
        format!("The current date is {}", format_long_date(today))
    }
}
