//! Assistant worker: listen, classify, route, speak.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    collaborators::{SpeechInput, SpeechOutput},
    config::ListenerConfig,
    intent::{ClassificationResult, ConversationContext, IntentClassifier},
    router::{CommandRouter, RouteOutcome},
    timekeeper::TimeEvent,
};

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Assistant is already listening")]
    AlreadyRunning,

    #[error("Previous listen worker is still shutting down")]
    StillStopping,
}

/// Result of asking the worker to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// The worker exited within the grace period
    Stopped,
    /// The worker was still busy (usually inside a listen call) when the
    /// grace period ran out; it exits on its own once that call returns
    TimedOut,
    NotRunning,
}

const WAKE_PROMPT: &str = "Yes? How can I help you?";

/// One run of the listen loop. `running` belongs to this run only, so a
/// worker left behind by a timed-out stop never picks up a later start.
struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct Assistant {
    classifier: IntentClassifier,
    router: CommandRouter,
    input: Arc<dyn SpeechInput>,
    output: Arc<dyn SpeechOutput>,
    listener: ListenerConfig,
    context: Mutex<ConversationContext>,
    listening: AtomicBool,
    worker: Mutex<Option<Worker>>,
}

impl Assistant {
    pub fn new(
        classifier: IntentClassifier,
        router: CommandRouter,
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        listener: ListenerConfig,
    ) -> Self {
        Self {
            classifier,
            router,
            input,
            output,
            listener,
            context: Mutex::new(ConversationContext::new()),
            listening: AtomicBool::new(false),
            worker: Mutex::new(None),
        }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub async fn context(&self) -> ConversationContext {
        self.context.lock().await.clone()
    }

    pub async fn reset_context(&self) {
        self.context.lock().await.reset();
        debug!("Conversation context reset");
    }

    /// Classify `text` (after the priority pre-pass) and update the context.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let mut context = self.context.lock().await;
        match self.router.priority_match(text) {
            Some(result) => {
                context.record(&result, self.classifier.config().acceptance_threshold);
                debug!(category = %result.category, "Priority category matched");
                result
            }
            None => self.classifier.classify(text, &mut context),
        }
    }

    /// Classify and route one command without speaking.
    pub async fn process_command(&self, text: &str) -> RouteOutcome {
        let result = self.classify(text).await;
        self.router.route(&result, text).await
    }

    /// Handle one recognized utterance and speak the replies. With wake-word
    /// gating enabled, utterances that do not contain the wake word are
    /// ignored and `None` is returned.
    pub async fn handle_utterance(&self, heard: &str) -> Option<RouteOutcome> {
        let command = if self.listener.require_wake_word {
            match strip_wake_word(heard, &self.listener.wake_word) {
                Some(rest) if rest.is_empty() => {
                    self.output.speak(WAKE_PROMPT).await;
                    return None;
                }
                Some(rest) => rest,
                None => {
                    debug!(heard, "Ignoring utterance without wake word");
                    return None;
                }
            }
        } else {
            heard.trim().to_string()
        };

        info!(command = %command, "Processing command");
        let outcome = self.process_command(&command).await;
        for reply in &outcome.replies {
            self.output.speak(reply).await;
        }
        Some(outcome)
    }

    /// Spawn the listen loop. Fails while a worker is running, and while a
    /// worker from a timed-out [`stop`](Self::stop) has not exited yet.
    pub async fn start(self: &Arc<Self>) -> Result<(), AssistantError> {
        let mut worker = self.worker.lock().await;
        if let Some(current) = worker.as_ref().filter(|w| !w.handle.is_finished()) {
            return Err(if current.running.load(Ordering::SeqCst) {
                AssistantError::AlreadyRunning
            } else {
                AssistantError::StillStopping
            });
        }

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let assistant = Arc::clone(self);
        let handle = tokio::spawn(async move { assistant.run_loop(&flag).await });
        *worker = Some(Worker { running, handle });
        self.listening.store(true, Ordering::SeqCst);
        info!("Assistant started listening");
        Ok(())
    }

    async fn run_loop(&self, running: &AtomicBool) {
        let timeout = Duration::from_secs(self.listener.listen_timeout_secs);
        let phrase_limit = Duration::from_secs(self.listener.phrase_limit_secs);

        while running.load(Ordering::SeqCst) {
            let heard = self.input.listen_once(timeout, phrase_limit).await;
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if let Some(text) = heard.filter(|text| !text.trim().is_empty()) {
                self.handle_utterance(&text).await;
            }
            tokio::task::yield_now().await;
        }
        debug!("Listen loop exited");
    }

    /// Signal the current worker and wait up to the grace period for it to
    /// exit. A worker that is still busy is left to finish alone; its handle
    /// is kept so `start` can tell when it is gone.
    pub async fn stop(&self) -> StopOutcome {
        let mut worker = self.worker.lock().await;
        let Some(current) = worker.as_mut() else {
            return StopOutcome::NotRunning;
        };
        if !current.running.swap(false, Ordering::SeqCst) {
            return StopOutcome::NotRunning;
        }
        self.listening.store(false, Ordering::SeqCst);

        let grace = Duration::from_millis(self.listener.stop_grace_ms);
        let exited = tokio::time::timeout(grace, &mut current.handle)
            .await
            .is_ok();
        if exited {
            *worker = None;
            info!("Assistant stopped");
            StopOutcome::Stopped
        } else {
            warn!(
                grace_ms = self.listener.stop_grace_ms,
                "Listen worker did not exit within the grace period"
            );
            StopOutcome::TimedOut
        }
    }

    /// Speak timer and alarm notifications as they arrive.
    pub fn spawn_event_announcer(
        self: &Arc<Self>,
        mut events: mpsc::UnboundedReceiver<TimeEvent>,
    ) -> JoinHandle<()> {
        let assistant = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                info!(?event, "Announcing time event");
                assistant.output.speak(&event.announcement()).await;
            }
        })
    }
}

/// Lower-cased text following the wake word, or `None` if the wake word is
/// absent.
pub fn strip_wake_word(heard: &str, wake_word: &str) -> Option<String> {
    let lowered = heard.to_lowercase();
    let wake_word = wake_word.trim().to_lowercase();
    if wake_word.is_empty() {
        return Some(heard.trim().to_string());
    }

    let start = lowered.find(&wake_word)?;
    let rest = &lowered[start + wake_word.len()..];
    Some(
        rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace())
            .trim()
            .to_string(),
    )
}
