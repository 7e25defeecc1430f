//! Tests for the assistant worker loop

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use crate::{
        assistant::{AssistantError, StopOutcome},
        config::ListenerConfig,
        test_support::{Harness, RecordingSpeech, ScriptedSpeech, SlowSpeech, StuckSpeech},
        timekeeper::TimeKeeper,
    };

    fn listener() -> ListenerConfig {
        ListenerConfig {
            stop_grace_ms: 5000,
            ..ListenerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_handle_utterance_speaks_replies() {
        let speech = Arc::new(RecordingSpeech::default());
        let (assistant, harness) =
            Harness::assistant(Arc::new(ScriptedSpeech::default()), speech.clone(), listener());

        let outcome = assistant
            .handle_utterance("set volume to 45 percent")
            .await
            .unwrap();
        assert_eq!(outcome.category, "volume");
        assert_eq!(speech.spoken(), vec!["Setting volume to 45 percent"]);
        assert_eq!(harness.volume.calls().len(), 1);
        assert!(assistant.context().await.is_previous("volume"));
    }

    #[tokio::test]
    async fn test_priority_match_updates_context() {
        let speech = Arc::new(RecordingSpeech::default());
        let (assistant, _harness) =
            Harness::assistant(Arc::new(ScriptedSpeech::default()), speech, listener());

        let result = assistant.classify("open spotify").await;
        assert_eq!(result.category, "open_app");
        assert!(assistant.context().await.is_previous("open_app"));

        assistant.reset_context().await;
        assert_eq!(assistant.context().await.previous(), None);
    }

    #[tokio::test]
    async fn test_wake_word_gating() {
        let speech = Arc::new(RecordingSpeech::default());
        let gated = ListenerConfig {
            require_wake_word: true,
            ..listener()
        };
        let (assistant, _harness) =
            Harness::assistant(Arc::new(ScriptedSpeech::default()), speech.clone(), gated);

        assert!(assistant.handle_utterance("what time is it").await.is_none());
        assert!(speech.spoken().is_empty());

        assert!(assistant.handle_utterance("Hey Athena").await.is_none());
        assert_eq!(speech.spoken().len(), 1);

        let outcome = assistant
            .handle_utterance("Hey Athena, what time is it")
            .await
            .unwrap();
        assert_eq!(outcome.category, "time");
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_loop_processes_until_stopped() {
        let speech = Arc::new(RecordingSpeech::default());
        let input = Arc::new(ScriptedSpeech::new(&["what time is it", "remind me to stretch"]));
        let (assistant, _harness) = Harness::assistant(input, speech.clone(), listener());

        assistant.start().await.unwrap();
        assert!(assistant.is_listening());
        assert!(matches!(
            assistant.start().await,
            Err(AssistantError::AlreadyRunning)
        ));

        let spoken = speech.wait_for(2).await;
        assert!(spoken[0].starts_with("The current time is "));
        assert_eq!(spoken[1], "I'll remind you to stretch");

        assert_eq!(assistant.stop().await, StopOutcome::Stopped);
        assert!(!assistant.is_listening());
        assert_eq!(assistant.stop().await, StopOutcome::NotRunning);
    }

    #[tokio::test]
    async fn test_stop_tolerates_busy_worker() {
        let speech = Arc::new(RecordingSpeech::default());
        let impatient = ListenerConfig {
            stop_grace_ms: 50,
            ..ListenerConfig::default()
        };
        let (assistant, _harness) = Harness::assistant(Arc::new(StuckSpeech), speech, impatient);

        assistant.start().await.unwrap();
        tokio::task::yield_now().await;
        assert_eq!(assistant.stop().await, StopOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_timed_out_stop_keeps_one_worker() {
        let speech = Arc::new(RecordingSpeech::default());
        let input = Arc::new(SlowSpeech::new(Duration::from_secs(2)));
        let impatient = ListenerConfig {
            stop_grace_ms: 100,
            ..ListenerConfig::default()
        };
        let (assistant, _harness) = Harness::assistant(input.clone(), speech, impatient);

        assistant.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(input.in_flight(), 1);

        assert_eq!(assistant.stop().await, StopOutcome::TimedOut);
        assert!(!assistant.is_listening());
        assert!(matches!(
            assistant.start().await,
            Err(AssistantError::StillStopping)
        ));

        // The old worker returns from its listen call and exits.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(input.in_flight(), 0);

        assistant.start().await.unwrap();
        assert!(assistant.is_listening());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(input.in_flight(), 1);
        assert_eq!(input.max_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_completion_is_announced() {
        let speech = Arc::new(RecordingSpeech::default());
        let (assistant, mut harness) =
            Harness::assistant(Arc::new(ScriptedSpeech::default()), speech.clone(), listener());

        let events = std::mem::replace(&mut harness.events, tokio::sync::mpsc::unbounded_channel().1);
        let announcer = assistant.spawn_event_announcer(events);

        harness.timekeeper.set_timer(3);
        let spoken = speech.wait_for(1).await;
        assert_eq!(spoken, vec!["Timer_1 is complete!"]);
        announcer.abort();
    }
}
