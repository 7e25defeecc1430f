//! In-memory collaborators shared by the cross-module tests

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    collaborators::{
        AppControl, ControlResult, PowerAction, SpeechInput, SpeechOutput, SystemPower,
        VolumeControl, WebInformationProvider,
    },
    config::{AthenaConfig, ListenerConfig},
    intent::IntentClassifier,
    lexicon::{LexicalDatabase, NullLexicon},
    router::{Collaborators, CommandRouter},
    timekeeper::{TimeEvent, TokioTimeKeeper},
    Assistant,
};

#[derive(Debug, Clone, PartialEq)]
pub enum VolumeCall {
    Set(f32),
    Change(i32),
    Mute,
    Unmute,
}

#[derive(Default)]
pub struct RecordingVolume {
    pub calls: Mutex<Vec<VolumeCall>>,
}

impl RecordingVolume {
    pub fn calls(&self) -> Vec<VolumeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VolumeControl for RecordingVolume {
    async fn set_volume(&self, level: f32) -> ControlResult<()> {
        self.calls.lock().unwrap().push(VolumeCall::Set(level));
        Ok(())
    }

    async fn change_volume(&self, delta: i32) -> ControlResult<()> {
        self.calls.lock().unwrap().push(VolumeCall::Change(delta));
        Ok(())
    }

    async fn mute(&self) -> ControlResult<()> {
        self.calls.lock().unwrap().push(VolumeCall::Mute);
        Ok(())
    }

    async fn unmute(&self) -> ControlResult<()> {
        self.calls.lock().unwrap().push(VolumeCall::Unmute);
        Ok(())
    }
}

/// Knows a fixed set of installed applications
pub struct RecordingApps {
    installed: Vec<String>,
    pub opened: Mutex<Vec<String>>,
    pub closed: Mutex<Vec<String>>,
}

impl RecordingApps {
    pub fn new(installed: &[&str]) -> Self {
        Self {
            installed: installed.iter().map(|app| app.to_string()).collect(),
            opened: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AppControl for RecordingApps {
    async fn open(&self, name: &str) -> String {
        self.opened.lock().unwrap().push(name.to_string());
        if self.installed.iter().any(|app| app == name) {
            format!("Opening {name}")
        } else {
            format!("Sorry, I couldn't find an application called {name}")
        }
    }

    async fn close(&self, name: &str) -> String {
        self.closed.lock().unwrap().push(name.to_string());
        format!("Closing {name}")
    }
}

#[derive(Default)]
pub struct RecordingWeb {
    pub queries: Mutex<Vec<String>>,
}

impl RecordingWeb {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebInformationProvider for RecordingWeb {
    async fn get_information(&self, query: &str) -> String {
        self.queries.lock().unwrap().push(query.to_string());
        format!("Information about {query}")
    }
}

#[derive(Default)]
pub struct RecordingPower {
    pub actions: Mutex<Vec<PowerAction>>,
}

#[async_trait]
impl SystemPower for RecordingPower {
    async fn perform(&self, action: PowerAction) -> ControlResult<()> {
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

/// Plays back queued utterances, then stays silent for each listen timeout.
#[derive(Default)]
pub struct ScriptedSpeech {
    lines: Mutex<VecDeque<String>>,
}

impl ScriptedSpeech {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: Mutex::new(lines.iter().map(|line| line.to_string()).collect()),
        }
    }
}

#[async_trait]
impl SpeechInput for ScriptedSpeech {
    async fn listen_once(&self, timeout: Duration, _phrase_limit: Duration) -> Option<String> {
        let next = self.lines.lock().unwrap().pop_front();
        if next.is_none() {
            tokio::time::sleep(timeout).await;
        }
        next
    }
}

/// Never hears anything and ignores its timeout.
pub struct StuckSpeech;

#[async_trait]
impl SpeechInput for StuckSpeech {
    async fn listen_once(&self, _timeout: Duration, _phrase_limit: Duration) -> Option<String> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        None
    }
}

/// Hears nothing after `delay` and tracks how many listens overlap.
pub struct SlowSpeech {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowSpeech {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechInput for SlowSpeech {
    async fn listen_once(&self, _timeout: Duration, _phrase_limit: Duration) -> Option<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        None
    }
}

#[derive(Default)]
pub struct RecordingSpeech {
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    /// Poll until at least `count` phrases were spoken.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        for _ in 0..200 {
            if self.spoken.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.spoken()
    }
}

#[async_trait]
impl SpeechOutput for RecordingSpeech {
    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Built-in categories, no lexical database and recording collaborators.
/// Must be created inside a Tokio runtime.
pub struct Harness {
    pub classifier: IntentClassifier,
    pub router: CommandRouter,
    pub apps: Arc<RecordingApps>,
    pub volume: Arc<RecordingVolume>,
    pub web: Arc<RecordingWeb>,
    pub power: Arc<RecordingPower>,
    pub timekeeper: TokioTimeKeeper,
    pub events: mpsc::UnboundedReceiver<TimeEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_lexicon(Arc::new(NullLexicon))
    }

    pub fn with_lexicon(lexicon: Arc<dyn LexicalDatabase>) -> Self {
        let config = AthenaConfig::default();
        let apps = Arc::new(RecordingApps::new(&["spotify", "firefox"]));
        let volume = Arc::new(RecordingVolume::default());
        let web = Arc::new(RecordingWeb::default());
        let power = Arc::new(RecordingPower::default());
        let (timekeeper, events) = TokioTimeKeeper::new().unwrap();

        let classifier = crate::build_classifier(&config, lexicon).unwrap();
        let router = CommandRouter::new(
            classifier.registry().clone(),
            Collaborators {
                apps: apps.clone(),
                volume: volume.clone(),
                web: web.clone(),
                timekeeper: Arc::new(timekeeper.clone()),
                power: power.clone(),
            },
            config.classifier.priority_categories.clone(),
        );

        Self {
            classifier,
            router,
            apps,
            volume,
            web,
            power,
            timekeeper,
            events,
        }
    }

    /// Assistant over fresh recording collaborators
    pub fn assistant(
        input: Arc<dyn SpeechInput>,
        output: Arc<RecordingSpeech>,
        listener: ListenerConfig,
    ) -> (Arc<Assistant>, Harness) {
        let harness = Self::new();
        let config = AthenaConfig {
            listener,
            ..AthenaConfig::default()
        };
        let collaborators = Collaborators {
            apps: harness.apps.clone(),
            volume: harness.volume.clone(),
            web: harness.web.clone(),
            timekeeper: Arc::new(harness.timekeeper.clone()),
            power: harness.power.clone(),
        };
        let assistant = crate::initialize_assistant(
            &config,
            Arc::new(NullLexicon),
            collaborators,
            input,
            output,
        )
        .unwrap();
        (Arc::new(assistant), harness)
    }
}
