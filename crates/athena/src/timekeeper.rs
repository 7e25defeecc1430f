//! Timers and alarms.
//!
//! Each timer or alarm is a task on the owning Tokio runtime that sleeps
//! until it is due, removes itself from the keeper and publishes a
//! [`TimeEvent`]. The assistant loop speaks those events.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use tokio::{
    runtime::Handle,
    sync::mpsc,
    task::JoinHandle,
    time::{sleep, Instant},
};
use tracing::{debug, info, warn};

use crate::router::params::{format_duration, parse_clock_time};

#[derive(Debug, thiserror::Error)]
pub enum TimeKeeperError {
    #[error("Timer keeper must be created inside a Tokio runtime")]
    NoRuntime,
}

/// Completion notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeEvent {
    TimerComplete { name: String },
    AlarmTriggered { name: String },
}

impl TimeEvent {
    /// What the assistant says when the event fires
    pub fn announcement(&self) -> String {
        match self {
            TimeEvent::TimerComplete { name } => format!("{name} is complete!"),
            TimeEvent::AlarmTriggered { name } => format!("Wake up! {name} is ringing!"),
        }
    }
}

/// Timer and alarm bookkeeping. Every method returns the reply to speak.
pub trait TimeKeeper: Send + Sync {
    fn set_timer(&self, duration_secs: u64) -> String;
    fn set_alarm(&self, time: &str) -> String;
    fn list_timers(&self) -> String;
    fn list_alarms(&self) -> String;
    fn cancel_timers(&self) -> String;
    fn cancel_alarms(&self) -> String;
}

struct TimerEntry {
    deadline: Instant,
    task: JoinHandle<()>,
}

struct AlarmEntry {
    at: NaiveTime,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct KeeperState {
    next_timer: u64,
    next_alarm: u64,
    timers: BTreeMap<u64, TimerEntry>,
    alarms: BTreeMap<u64, AlarmEntry>,
}

fn timer_name(id: u64) -> String {
    format!("Timer_{id}")
}

fn alarm_name(id: u64) -> String {
    format!("Alarm_{id}")
}

/// [`TimeKeeper`] backed by tasks on the runtime it was created in
#[derive(Clone)]
pub struct TokioTimeKeeper {
    handle: Handle,
    state: Arc<Mutex<KeeperState>>,
    events: mpsc::UnboundedSender<TimeEvent>,
}

impl TokioTimeKeeper {
    /// Keeper plus the receiving end of its completion events. Fails when
    /// called outside a Tokio runtime.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<TimeEvent>), TimeKeeperError> {
        let handle = Handle::try_current().map_err(|_| TimeKeeperError::NoRuntime)?;
        let (events, receiver) = mpsc::unbounded_channel();
        let keeper = Self {
            handle,
            state: Arc::new(Mutex::new(KeeperState::default())),
            events,
        };
        Ok((keeper, receiver))
    }

    fn state(&self) -> MutexGuard<'_, KeeperState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn_timer(&self, id: u64, delay: Duration) -> JoinHandle<()> {
        let state = self.state.clone();
        let events = self.events.clone();
        self.handle.spawn(async move {
            sleep(delay).await;
            state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .timers
                .remove(&id);
            let name = timer_name(id);
            info!(timer = %name, "Timer complete");
            let _ = events.send(TimeEvent::TimerComplete { name });
        })
    }

    fn spawn_alarm(&self, id: u64, delay: Duration) -> JoinHandle<()> {
        let state = self.state.clone();
        let events = self.events.clone();
        self.handle.spawn(async move {
            sleep(delay).await;
            state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .alarms
                .remove(&id);
            let name = alarm_name(id);
            info!(alarm = %name, "Alarm triggered");
            let _ = events.send(TimeEvent::AlarmTriggered { name });
        })
    }
}

impl TimeKeeper for TokioTimeKeeper {
    fn set_timer(&self, duration_secs: u64) -> String {
        if duration_secs == 0 {
            return "Please specify a valid duration".to_string();
        }

        let delay = Duration::from_secs(duration_secs);
        let Some(deadline) = Instant::now().checked_add(delay) else {
            warn!(seconds = duration_secs, "Timer duration out of range");
            return "Please specify a valid duration".to_string();
        };

        let mut state = self.state();
        state.next_timer += 1;
        let id = state.next_timer;
        let task = self.spawn_timer(id, delay);
        state.timers.insert(id, TimerEntry { deadline, task });

        debug!(timer = %timer_name(id), seconds = duration_secs, "Timer set");
        format!("Timer set for {}", format_duration(duration_secs))
    }

    fn set_alarm(&self, time: &str) -> String {
        let Some(at) = parse_clock_time(time) else {
            return "Please specify a valid time, like 7:30 AM".to_string();
        };

        let now = Local::now().naive_local();
        let mut target = now.date().and_time(at);
        if target <= now {
            target += chrono::Duration::days(1);
        }
        let delay = (target - now).to_std().unwrap_or_default();

        let mut state = self.state();
        state.next_alarm += 1;
        let id = state.next_alarm;
        let task = self.spawn_alarm(id, delay);
        state.alarms.insert(id, AlarmEntry { at, task });

        debug!(alarm = %alarm_name(id), delay_secs = delay.as_secs(), "Alarm set");
        format!("Alarm set for {}", at.format("%I:%M %p"))
    }

    fn list_timers(&self) -> String {
        let state = self.state();
        if state.timers.is_empty() {
            return "No active timers".to_string();
        }

        let now = Instant::now();
        let entries: Vec<String> = state
            .timers
            .iter()
            .map(|(id, entry)| {
                let remaining = entry.deadline.saturating_duration_since(now).as_secs();
                format!("{} ({} remaining)", timer_name(*id), format_duration(remaining))
            })
            .collect();
        format!("Active timers: {}", entries.join(", "))
    }

    fn list_alarms(&self) -> String {
        let state = self.state();
        if state.alarms.is_empty() {
            return "No active alarms".to_string();
        }

        let entries: Vec<String> = state
            .alarms
            .iter()
            .map(|(id, entry)| format!("{} ({})", alarm_name(*id), entry.at.format("%I:%M %p")))
            .collect();
        format!("Active alarms: {}", entries.join(", "))
    }

    fn cancel_timers(&self) -> String {
        let mut state = self.state();
        if state.timers.is_empty() {
            return "No active timers to cancel".to_string();
        }
        for (_, entry) in std::mem::take(&mut state.timers) {
            entry.task.abort();
        }
        info!("All timers cancelled");
        "All timers cancelled".to_string()
    }

    fn cancel_alarms(&self) -> String {
        let mut state = self.state();
        if state.alarms.is_empty() {
            return "No active alarms to cancel".to_string();
        }
        for (_, entry) in std::mem::take(&mut state.alarms) {
            entry.task.abort();
        }
        info!("All alarms cancelled");
        "All alarms cancelled".to_string()
    }
}
