//! Console speech: typed lines stand in for recognized speech and replies
//! are printed instead of synthesized.

use std::{sync::Arc, time::Duration};

use athena::{SpeechInput, SpeechOutput};
use async_trait::async_trait;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{debug, warn};

use crate::output::OutputHandler;

const PROMPT: &str = "you> ";
const EXIT_WORDS: &[&str] = &["exit", "quit", "goodbye athena"];

/// Reads lines on a dedicated thread and hands them to the listen loop
pub struct ConsoleInput {
    lines: Mutex<mpsc::UnboundedReceiver<String>>,
    closed: Arc<Notify>,
}

impl ConsoleInput {
    /// Start the reader thread. `closed` is notified on end of input,
    /// interrupt or an exit word.
    pub fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let closed = Arc::new(Notify::new());
        let notify = closed.clone();

        std::thread::Builder::new()
            .name("athena-console".to_string())
            .spawn(move || {
                read_lines(sender);
                notify.notify_one();
            })?;

        Ok(Self {
            lines: Mutex::new(receiver),
            closed,
        })
    }

    /// Resolves once the user is done typing
    pub async fn closed(&self) {
        self.closed.notified().await;
    }

    /// Input that never hears anything, for one-shot commands
    pub fn detached() -> Self {
        Self::from_channel(mpsc::unbounded_channel().1)
    }

    fn from_channel(lines: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            lines: Mutex::new(lines),
            closed: Arc::new(Notify::new()),
        }
    }
}

fn read_lines(sender: mpsc::UnboundedSender<String>) {
    let mut editor = match Editor::<(), DefaultHistory>::new() {
        Ok(editor) => editor,
        Err(e) => {
            warn!("Console unavailable: {}", e);
            return;
        }
    };

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
                    break;
                }
                let _ = editor.add_history_entry(input);
                if sender.send(input.to_string()).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                warn!("Input error: {}", e);
                break;
            }
        }
    }
    debug!("Console reader finished");
}

#[async_trait]
impl SpeechInput for ConsoleInput {
    async fn listen_once(&self, timeout: Duration, _phrase_limit: Duration) -> Option<String> {
        let mut lines = self.lines.lock().await;
        match tokio::time::timeout(timeout, lines.recv()).await {
            Ok(Some(line)) => Some(line),
            Ok(None) => {
                // Reader is gone; behave like silence.
                drop(lines);
                tokio::time::sleep(timeout).await;
                None
            }
            Err(_) => None,
        }
    }
}

/// Prints replies as they would be spoken
pub struct ConsoleOutput {
    output: OutputHandler,
}

impl ConsoleOutput {
    pub fn new(output: OutputHandler) -> Self {
        Self { output }
    }
}

#[async_trait]
impl SpeechOutput for ConsoleOutput {
    async fn speak(&self, text: &str) {
        self.output.print_reply(text);
    }
}
