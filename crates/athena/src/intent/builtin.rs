//! Default command categories.
//!
//! Patterns run against normalized text (lower-cased, plural nouns folded),
//! so they are written against singular forms with an optional plural `s`.
//! Broad categories (greeting, search) are registered last so that more
//! specific commands win on the pattern pass.

use super::registry::{CategorySpec, HandlerKind, SynonymGroup};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn category(
    id: &str,
    patterns: &[&str],
    keywords: &[&str],
    synonyms: Vec<SynonymGroup>,
    handler: Option<HandlerKind>,
) -> CategorySpec {
    CategorySpec {
        id: id.to_string(),
        patterns: strings(patterns),
        excludes: Vec::new(),
        keywords: strings(keywords),
        synonyms,
        handler,
    }
}

pub fn default_specs() -> Vec<CategorySpec> {
    let mut open_app = category(
        "open_app",
        &[
            r"\b(?:open|launch|start|run)\s+(.+)",
            r"(?:can you )?\b(?:open|launch|start|run)\s+(.+)",
        ],
        &[],
        Vec::new(),
        Some(HandlerKind::OpenApp),
    );
    open_app.excludes = strings(&[r"\b(?:timers?|alarms?|reminders?)\b"]);

    let mut close_app = category(
        "close_app",
        &[
            r"\b(?:close|quit|exit|terminate|end)\s+(.+)",
            r"(?:can you )?\b(?:close|quit|exit|terminate|end)\s+(.+)",
        ],
        &[],
        Vec::new(),
        Some(HandlerKind::CloseApp),
    );
    close_app.excludes = strings(&[r"\b(?:timers?|alarms?|reminders?)\b"]);

    vec![
        category(
            "volume",
            &[
                r"\b(?:turn|set|make|adjust|change)\b.*\b(?:volume|sound)\b.*\b(?:up|down|to|higher|lower)\b",
                r"\b(?:increase|decrease|raise|lower)\b.*\b(?:volume|sound)\b",
                r"\b(?:louder|softer|quieter)\b",
                r"\b(?:volume|sound)\b.*\b(?:up|down|higher|lower)\b",
                r"\b(?:mute|unmute)\b",
                r"\bset\b.*\b(?:volume|sound)\b.*\bto\b.*(\d+)(?:\s*percent)?",
                r"\b(?:volume|sound)\b.*?(\d+)(?:\s*percent)?",
                r"\b(?:make|adjust)\b.*\b(?:volume|sound)\b.*(\d+)(?:\s*percent)?",
            ],
            &[
                "volume", "sound", "loud", "quiet", "increase", "decrease", "mute", "unmute",
                "percent",
            ],
            vec![
                SynonymGroup::new(
                    "up",
                    &["increase", "raise", "higher", "louder", "boost", "amplify"],
                ),
                SynonymGroup::new(
                    "down",
                    &["decrease", "lower", "quieter", "softer", "reduce", "diminish"],
                ),
                SynonymGroup::new("mute", &["silence", "quiet", "disable sound"]),
                SynonymGroup::new("unmute", &["enable sound", "restore sound"]),
            ],
            None,
        ),
        category(
            "time",
            &[
                r"^(?:what|tell|give)\b.*\b(?:time|clock)(?:\s+is\s+it)?$",
                r"^(?:current|present)\b.*\btime$",
                r"^(?:what time is it|got the time)$",
            ],
            &["time", "clock", "hour", "minute"],
            vec![SynonymGroup::new(
                "time",
                &["clock", "hour", "moment", "current time"],
            )],
            None,
        ),
        category(
            "date",
            &[
                r"what (?:is|'s) (?:today's )?(?:date|day)",
                r"what (?:date|day) is (?:it|today)",
                r"tell me (?:the )?(?:date|day)",
                r"what (?:is|'s) the (?:date|day)(?: today)?",
                r"current (?:date|day)",
            ],
            &["date", "day", "today", "current"],
            vec![
                SynonymGroup::new("date", &["day", "today"]),
                SynonymGroup::new("tell", &["show", "give", "what is"]),
            ],
            None,
        ),
        category(
            "weather",
            &[
                r"(?:what's|what is|how's)\b.*\b(?:weather|temperature|forecast)",
                r"(?:will it|is it going to)\b.*\b(?:rain|snow|be sunny)",
                r"\b(?:temperature|weather)\b.*\b(?:today|tomorrow|this week)",
            ],
            &["weather", "temperature", "forecast", "rain", "snow", "sunny"],
            vec![
                SynonymGroup::new("weather", &["temperature", "climate", "condition"]),
                SynonymGroup::new("forecast", &["prediction", "outlook", "weather report"]),
            ],
            None,
        ),
        category(
            "timer",
            &[
                r"\b(?:set|start|create)\s+(?:a\s+)?timer\s+(?:for\s+)?(.+)",
                r"\b(?:give|set)\s+me\s+(?:a\s+)?timer\s+(?:for\s+)?(.+)",
            ],
            &[],
            Vec::new(),
            Some(HandlerKind::SetTimer),
        ),
        category(
            "alarm",
            &[
                r"\b(?:set|create)\s+(?:an\s+)?alarm\s+(?:for\s+)?(.+)",
                r"\bwake\s+me\s+(?:up\s+)?(?:at\s+)?(.+)",
            ],
            &[],
            Vec::new(),
            Some(HandlerKind::SetAlarm),
        ),
        category(
            "cancel_timer",
            &[
                r"\b(?:cancel|stop|remove)\s+(?:the\s+)?timers?\b",
                r"\b(?:cancel|stop|remove)\s+(?:all\s+)?(?:the\s+)?timers?\b",
            ],
            &[],
            Vec::new(),
            Some(HandlerKind::CancelTimers),
        ),
        category(
            "cancel_alarm",
            &[
                r"\b(?:cancel|stop|remove)\s+(?:the\s+)?alarms?\b",
                r"\b(?:cancel|stop|remove)\s+(?:all\s+)?(?:the\s+)?alarms?\b",
            ],
            &[],
            Vec::new(),
            Some(HandlerKind::CancelAlarms),
        ),
        category(
            "list_timers",
            &[
                r"\b(?:list|show|what are)\s+(?:the\s+|my\s+)?(?:active\s+)?timers?\b",
                r"\b(?:how many|what)\s+timers?\s+(?:do i have|are running)",
            ],
            &[],
            Vec::new(),
            Some(HandlerKind::ListTimers),
        ),
        category(
            "list_alarms",
            &[
                r"\b(?:list|show|what are)\s+(?:the\s+|my\s+)?(?:active\s+)?alarms?\b",
                r"\b(?:how many|what)\s+alarms?\s+(?:do i have|are set)",
            ],
            &[],
            Vec::new(),
            Some(HandlerKind::ListAlarms),
        ),
        category(
            "reminder",
            &[
                r"\b(?:remind|remember|notification)\b.*\b(?:me|to)\s+([\w\s]+)",
                r"\b(?:set|create)\b.*\b(?:reminder|alarm)\b.*\b(?:for|to)\s+([\w\s]+)",
                r"(?:don't let me forget|help me remember)\s+([\w\s]+)",
            ],
            &["remind", "reminder", "alarm", "notification", "remember"],
            vec![
                SynonymGroup::new("remind", &["remember", "notify", "alert"]),
                SynonymGroup::new("reminder", &["notification", "alert", "alarm"]),
            ],
            None,
        ),
        category(
            "system_control",
            &[
                r"\b(?:shutdown|shut down|turn off|power off)\b.*\b(?:computer|system|pc)\b",
                r"\b(?:restart|reboot)\b.*\b(?:computer|system|pc)\b",
                r"\b(?:sleep|hibernate)\b.*\b(?:computer|system|pc)\b",
                r"\b(?:can you|could you|please)\b.*\b(?:shutdown|restart|reboot)\b.*\b(?:computer|system|pc)\b",
            ],
            &["shutdown", "restart", "reboot", "power", "sleep", "hibernate"],
            vec![
                SynonymGroup::new(
                    "shutdown",
                    &["turn off", "power off", "shut down", "switch off"],
                ),
                SynonymGroup::new("restart", &["reboot", "reset", "reload", "relaunch"]),
                SynonymGroup::new("sleep", &["hibernate", "suspend", "standby"]),
            ],
            None,
        ),
        open_app,
        close_app,
        category(
            "greeting",
            &[
                r"^(?:hello|hi|hey|greetings|good (?:morning|afternoon|evening))\b",
                r"\bhow (?:are|'re) you\b",
                r"\b(?:nice to meet you|pleased to meet you)\b",
            ],
            &["hello", "hi", "hey", "greetings", "morning", "afternoon", "evening"],
            vec![
                SynonymGroup::new(
                    "hello",
                    &["hi", "hey", "greetings", "good morning", "good afternoon", "good evening"],
                ),
                SynonymGroup::new("how are you", &["how you doing", "how's it going", "what's up"]),
            ],
            None,
        ),
        category(
            "search",
            &[
                r"\b(?:search|look up|find|google|tell me about)\b.*",
                r"\b(?:what|who|which|when|where|why|how)\b.*\b(?:is|are|was|were|will|do|does|did)\b.*",
                r"\b(?:latest|best|top|newest|recent)\b.*\b(?:movie|news|game|show|music|book)s?\b.*",
                r"\b(?:can you|could you|please)\b.*\b(?:search|look up|find|tell)\b.*",
            ],
            &["search", "look up", "find", "what is", "who is", "tell me", "best", "latest"],
            vec![
                SynonymGroup::new(
                    "search",
                    &["look up", "find", "google", "research", "investigate"],
                ),
                SynonymGroup::new("what is", &["tell me about", "explain", "describe"]),
                SynonymGroup::new("follow up", &["and its"]),
            ],
            None,
        ),
    ]
}
