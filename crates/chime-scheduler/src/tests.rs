use super::export::{render_history, write_history};
use super::resolve::parse_time_token;
use super::*;
use chime_core::alarm::{AlarmId, AlarmState, Meridiem, TimeToken};
use chime_core::error::ChimeError;
use chime_core::notice::Notice;
use chime_core::traits::{AudioSink, Notifier};
use chrono::{DateTime, Local, TimeZone};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};

// --- Test collaborators ---

#[derive(Default)]
struct RecordingAudio {
    calls: Mutex<Vec<&'static str>>,
    fail: bool,
}

impl AudioSink for RecordingAudio {
    fn play(&self, looped: bool) -> Result<(), ChimeError> {
        assert!(looped, "alarm sound must loop");
        self.calls.lock().unwrap().push("play");
        if self.fail {
            return Err(ChimeError::Audio("no output device".into()));
        }
        Ok(())
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push("stop");
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn show_alarms(&self, _entries: &[String]) {}
}

struct Harness {
    scheduler: Scheduler,
    events: mpsc::Receiver<AlarmEvent>,
    controller: LifecycleController,
    audio: Arc<RecordingAudio>,
    notifier: Arc<RecordingNotifier>,
}

fn harness_with(audio: RecordingAudio) -> Harness {
    let (tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let audio = Arc::new(audio);
    let notifier = Arc::new(RecordingNotifier::default());
    Harness {
        scheduler: Scheduler::new(tx),
        events,
        controller: LifecycleController::new(audio.clone(), notifier.clone(), 5),
        audio,
        notifier,
    }
}

fn harness() -> Harness {
    harness_with(RecordingAudio::default())
}

/// A mid-June local time, clear of DST transitions.
fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 6, 15, h, m, s)
        .single()
        .unwrap()
}

fn token(s: &str) -> TimeToken {
    TimeToken::new(s)
}

impl Harness {
    /// Receive the next timer event and hand it to the lifecycle controller.
    async fn ring_next(&mut self) -> bool {
        let event = self.events.recv().await.unwrap();
        self.controller.handle_event(&mut self.scheduler, event)
    }

    fn state(&self, id: AlarmId) -> AlarmState {
        self.scheduler.registry().get(id).unwrap().state
    }

    fn audio_calls(&self) -> Vec<&'static str> {
        self.audio.calls.lock().unwrap().clone()
    }

    fn notices(&self) -> Vec<Notice> {
        self.notifier.notices.lock().unwrap().clone()
    }
}

// --- Scheduling ---

#[tokio::test(start_paused = true)]
async fn test_schedule_registers_alarm_and_history() {
    let mut h = harness();
    let alarm = h
        .scheduler
        .schedule_at("call mom", &token("7:30 PM"), local(19, 0, 0))
        .unwrap();

    assert_eq!(alarm.id, AlarmId(1));
    assert_eq!(alarm.state, AlarmState::Armed);
    assert_eq!(alarm.scheduled_time.meridiem(), Meridiem::Pm);
    assert_eq!(h.scheduler.entries(), vec!["call mom - 7:30 PM"]);
    assert_eq!(h.scheduler.history().lines(), vec!["call mom - 7:30 PM"]);
    assert_eq!(h.scheduler.armed_count(), 1);
    assert_eq!(h.scheduler.pending().unwrap().alarm, alarm.id);
    assert_eq!(
        h.scheduler.timer(alarm.id).unwrap().remaining(),
        Duration::from_secs(30 * 60)
    );
}

#[tokio::test(start_paused = true)]
async fn test_alarm_ids_are_monotonic() {
    let mut h = harness();
    let a = h
        .scheduler
        .schedule_at("a", &token("8 AM"), local(7, 0, 0))
        .unwrap();
    let b = h
        .scheduler
        .schedule_at("b", &token("9 AM"), local(7, 0, 0))
        .unwrap();
    assert!(b.id > a.id);
}

#[tokio::test(start_paused = true)]
async fn test_timer_fires_after_computed_delay() {
    let mut h = harness();
    let start = Instant::now();
    h.scheduler
        .schedule_at("stretch", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();

    let early = timeout(Duration::from_secs(59), h.events.recv()).await;
    assert!(early.is_err(), "alarm must not fire early");

    let event = h.events.recv().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_secs(60));
    match event {
        AlarmEvent::Expired { alarm, task, .. } => {
            assert_eq!(alarm, AlarmId(1));
            assert_eq!(task, "stretch");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_invalid_token_changes_nothing() {
    let mut h = harness();
    let result = h
        .scheduler
        .schedule_at("x", &token("13:00 PM"), local(10, 0, 0));

    assert!(matches!(result, Err(ChimeError::TimeFormat(_))));
    assert!(h.scheduler.registry().is_empty());
    assert!(h.scheduler.history().is_empty());
    assert_eq!(h.scheduler.armed_count(), 0);
    assert!(h.scheduler.pending().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_past_time_schedules_next_day() {
    let mut h = harness();
    let alarm = h
        .scheduler
        .schedule_at("run", &token("7 AM"), local(20, 0, 0))
        .unwrap();
    assert_eq!(
        h.scheduler.timer(alarm.id).unwrap().remaining(),
        Duration::from_secs(11 * 3600)
    );
}

#[tokio::test(start_paused = true)]
async fn test_current_minute_schedules_next_day() {
    let mut h = harness();
    let alarm = h
        .scheduler
        .schedule_at("now", &token("10:00 AM"), local(10, 0, 0))
        .unwrap();
    assert_eq!(
        h.scheduler.timer(alarm.id).unwrap().remaining(),
        Duration::from_secs(24 * 3600)
    );
}

#[tokio::test(start_paused = true)]
async fn test_new_alarm_overwrites_pending_but_keeps_prior_timer() {
    let mut h = harness();
    let a = h
        .scheduler
        .schedule_at("first", &token("10:05 AM"), local(10, 0, 0))
        .unwrap();
    let b = h
        .scheduler
        .schedule_at("second", &token("10:10 AM"), local(10, 0, 0))
        .unwrap();

    assert_eq!(h.scheduler.pending().unwrap().alarm, b.id);
    assert_eq!(h.scheduler.armed_count(), 2);

    assert!(h.ring_next().await);
    assert!(h.ring_next().await);
    assert_eq!(h.state(a.id), AlarmState::Firing);
    assert_eq!(h.state(b.id), AlarmState::Firing);
}

// --- Removal and cancellation ---

#[tokio::test(start_paused = true)]
async fn test_remove_nonexistent_index_is_noop() {
    let mut h = harness();
    h.scheduler
        .schedule_at("a", &token("9 PM"), local(10, 0, 0))
        .unwrap();

    assert!(h.scheduler.remove(5).is_none());
    assert_eq!(h.scheduler.registry().len(), 1);
    assert_eq!(h.scheduler.history().len(), 1);
    assert_eq!(h.scheduler.armed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remove_cancels_timer() {
    let mut h = harness();
    h.scheduler
        .schedule_at("a", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();

    let removed = h.scheduler.remove(0).unwrap();
    assert_eq!(removed.task, "a");
    assert_eq!(h.scheduler.armed_count(), 0);
    assert!(h.scheduler.pending().is_none());
    assert_eq!(h.scheduler.history().len(), 1);

    let fired = timeout(Duration::from_secs(3600), h.events.recv()).await;
    assert!(fired.is_err(), "removed alarm must not fire");
}

#[tokio::test(start_paused = true)]
async fn test_expiry_after_removal_is_ignored() {
    let mut h = harness();
    h.scheduler
        .schedule_at("a", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();

    // The timer has already sent its event when the alarm is removed.
    let event = h.events.recv().await.unwrap();
    h.scheduler.remove(0).unwrap();

    assert!(!h.controller.handle_event(&mut h.scheduler, event));
    assert!(!h.controller.is_firing());
    assert!(h.audio_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_history_never_shrinks() {
    let mut h = harness();
    let now = local(10, 0, 0);
    let mut lengths = Vec::new();

    for (task, time) in [("a", "11 AM"), ("b", "noon"), ("c", "1 PM")] {
        let _ = h.scheduler.schedule_at(task, &token(time), now);
        lengths.push(h.scheduler.history().len());
    }
    for index in [1, 0, 7, 0] {
        h.scheduler.remove(index);
        lengths.push(h.scheduler.history().len());
    }
    h.scheduler
        .schedule_at("d", &token("2 PM"), now)
        .unwrap();
    lengths.push(h.scheduler.history().len());

    assert!(lengths.windows(2).all(|w| w[0] <= w[1]), "{lengths:?}");
    // "noon" is not a valid token, so only a, c and d made it.
    assert_eq!(h.scheduler.history().lines(), vec!["a - 11 AM", "c - 1 PM", "d - 2 PM"]);
    assert_eq!(h.scheduler.entries(), vec!["d - 2 PM"]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_pending() {
    let mut h = harness();
    let a = h
        .scheduler
        .schedule_at("a", &token("11 AM"), local(10, 0, 0))
        .unwrap();
    let b = h
        .scheduler
        .schedule_at("b", &token("12 PM"), local(10, 0, 0))
        .unwrap();

    assert_eq!(h.scheduler.cancel_pending(), Some(b.id));
    assert_eq!(h.state(b.id), AlarmState::Stopped);
    assert_eq!(h.state(a.id), AlarmState::Armed);
    assert_eq!(h.scheduler.armed_count(), 1);
    // The slot only tracks the latest timer.
    assert_eq!(h.scheduler.cancel_pending(), None);
    assert_eq!(h.scheduler.entries().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_expiry_rejected() {
    let mut h = harness();
    let a = h
        .scheduler
        .schedule_at("a", &token("11 AM"), local(10, 0, 0))
        .unwrap();
    assert!(!h.scheduler.accept_expiry(a.id, TimerId(999)));
    assert!(!h.scheduler.accept_expiry(AlarmId(42), TimerId(1)));
    assert_eq!(h.state(a.id), AlarmState::Armed);
}

// --- Lifecycle ---

#[tokio::test(start_paused = true)]
async fn test_expiry_rings_then_stop() {
    let mut h = harness();
    let alarm = h
        .scheduler
        .schedule_at("call mom", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();

    assert!(h.ring_next().await);
    assert!(h.controller.is_firing());
    assert_eq!(h.state(alarm.id), AlarmState::Firing);
    assert_eq!(h.audio_calls(), vec!["play"]);
    assert_eq!(
        h.notices(),
        vec![Notice::Firing {
            task: "call mom".into()
        }]
    );

    assert_eq!(h.controller.stop(&mut h.scheduler), Some(alarm.id));
    assert_eq!(h.audio_calls(), vec!["play", "stop"]);
    assert_eq!(h.state(alarm.id), AlarmState::Stopped);
    assert!(!h.controller.is_firing());
    assert_eq!(h.notices().last(), Some(&Notice::Stopped));
    // Stopping does not remove the alarm.
    assert_eq!(h.scheduler.entries(), vec!["call mom - 10:01 AM"]);
    assert_eq!(h.scheduler.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_snooze_rearms_exactly_five_minutes_each_time() {
    let mut h = harness();
    let alarm = h
        .scheduler
        .schedule_at("take pills", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();
    assert!(h.ring_next().await);

    for ringing_for in [0u64, 42, 600] {
        // However long it rang, the snooze counts from the snooze action.
        tokio::time::sleep(Duration::from_secs(ringing_for)).await;
        let snoozed_at = Instant::now();
        let timer = h.controller.snooze(&mut h.scheduler).unwrap();

        assert_eq!(h.state(alarm.id), AlarmState::Snoozed);
        assert_eq!(h.scheduler.pending().unwrap().timer, timer);
        assert_eq!(
            h.scheduler.timer(alarm.id).unwrap().remaining(),
            Duration::from_secs(300)
        );

        let event = h.events.recv().await.unwrap();
        assert_eq!(snoozed_at.elapsed(), Duration::from_secs(300));
        match &event {
            AlarmEvent::Expired { task, .. } => assert_eq!(task, "take pills"),
        }
        assert!(h.controller.handle_event(&mut h.scheduler, event));
        assert_eq!(h.state(alarm.id), AlarmState::Firing);
    }

    let snoozes = h
        .notices()
        .iter()
        .filter(|n| matches!(n, Notice::Snoozed { minutes: 5 }))
        .count();
    assert_eq!(snoozes, 3);
    assert_eq!(h.scheduler.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_snooze_after_removal_keeps_task() {
    let mut h = harness();
    h.scheduler
        .schedule_at("water plants", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();
    assert!(h.ring_next().await);
    h.scheduler.remove(0).unwrap();

    h.controller.snooze(&mut h.scheduler).unwrap();
    assert!(h.ring_next().await);
    let ringing: Vec<_> = h.controller.ringing().map(|r| r.task.clone()).collect();
    assert_eq!(ringing, vec!["water plants"]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_and_snooze_without_ringing_warn() {
    let mut h = harness();
    assert!(h.controller.stop(&mut h.scheduler).is_none());
    assert!(h.controller.snooze(&mut h.scheduler).is_none());
    assert_eq!(h.scheduler.armed_count(), 0);
    assert_eq!(
        h.notices(),
        vec![
            Notice::Warning("No alarm is ringing.".into()),
            Notice::Warning("No alarm is ringing.".into()),
        ]
    );
    assert!(h.audio_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_alarms_queue() {
    let mut h = harness();
    let a = h
        .scheduler
        .schedule_at("a", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();
    let b = h
        .scheduler
        .schedule_at("b", &token("10:02 AM"), local(10, 0, 0))
        .unwrap();

    // "b" fires while "a" is still ringing.
    assert!(h.ring_next().await);
    assert!(h.ring_next().await);
    assert_eq!(h.audio_calls(), vec!["play"]);

    assert_eq!(h.controller.stop(&mut h.scheduler), Some(a.id));
    assert_eq!(h.audio_calls(), vec!["play", "stop", "play"]);
    assert_eq!(h.state(b.id), AlarmState::Firing);

    assert_eq!(h.controller.stop(&mut h.scheduler), Some(b.id));
    assert_eq!(h.audio_calls(), vec!["play", "stop", "play", "stop"]);
    assert!(!h.controller.is_firing());
}

#[tokio::test(start_paused = true)]
async fn test_audio_failure_is_reported_not_fatal() {
    let mut h = harness_with(RecordingAudio {
        fail: true,
        ..Default::default()
    });
    h.scheduler
        .schedule_at("a", &token("10:01 AM"), local(10, 0, 0))
        .unwrap();

    assert!(h.ring_next().await);
    assert!(h
        .notices()
        .iter()
        .any(|n| matches!(n, Notice::Error(msg) if msg.contains("no output device"))));
    assert!(h.controller.stop(&mut h.scheduler).is_some());
}

// --- Normalizer and resolver agree ---

#[test]
fn test_normalized_tokens_round_trip() {
    for hour in 1u8..=12 {
        for minute in 0u8..=59 {
            for meridiem in [Meridiem::Am, Meridiem::Pm] {
                let mut forms = vec![format!("{hour}:{minute:02} {meridiem}")];
                if minute == 0 {
                    forms.push(format!("{hour} {meridiem}"));
                }
                for form in forms {
                    let normalized = chime_parser::normalize(&form)
                        .unwrap_or_else(|| panic!("{form:?} did not normalize"));
                    let parsed = parse_time_token(&normalized).unwrap();
                    assert_eq!(
                        (parsed.hour(), parsed.minute(), parsed.meridiem()),
                        (hour, minute, meridiem),
                        "{form:?}"
                    );
                }
            }
        }
    }
}

// --- History export ---

#[tokio::test(start_paused = true)]
async fn test_write_history_file() {
    let mut h = harness();
    let now = local(10, 0, 0);
    h.scheduler.schedule_at("a", &token("7 AM"), now).unwrap();
    h.scheduler
        .schedule_at("b", &token("8:30 PM"), now)
        .unwrap();
    h.scheduler.remove(0);

    assert_eq!(render_history(h.scheduler.history()), "a - 7 AM\nb - 8:30 PM\n");

    let dir = std::env::temp_dir().join(format!("__chime_export_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("history.txt");

    let written = write_history(&path, h.scheduler.history()).unwrap();
    assert_eq!(written, 2);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "a - 7 AM\nb - 8:30 PM\n"
    );

    // Writing onto a directory fails without panicking.
    let err = write_history(&dir, h.scheduler.history()).unwrap_err();
    assert!(matches!(err, ChimeError::Persistence(_)));

    let _ = std::fs::remove_dir_all(&dir);
}
