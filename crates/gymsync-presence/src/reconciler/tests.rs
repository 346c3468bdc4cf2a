//! Reconciler behaviour against scripted sources and a recording sink.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::*;
use crate::activity::PresenceParty;
use crate::sink::SinkError;
use crate::source::SourceError;

#[derive(Default)]
struct ScriptedSource {
    replies: Mutex<VecDeque<Result<Option<Value>, SourceError>>>,
}

impl ScriptedSource {
    fn push(&self, reply: Result<Option<Value>, SourceError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn status(&self, activity: &str, paused: bool, time: i64) {
        self.push(Ok(Some(
            json!({"activity": activity, "paused": paused, "time": time}),
        )));
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self, _user_id: &str) -> Result<Option<Value>, SourceError> {
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SinkCall {
    Set(PresencePayload),
    Clear,
}

#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    fail_sets: Mutex<bool>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn clears(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SinkCall::Clear))
            .count()
    }
}

#[async_trait]
impl PresenceSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn set_activity(&self, payload: &PresencePayload) -> Result<(), SinkError> {
        if *self.fail_sets.lock().unwrap() {
            return Err(SinkError::Unavailable("discord closed".into()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Set(payload.clone()));
        Ok(())
    }

    async fn clear_activity(&self) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(SinkCall::Clear);
        Ok(())
    }
}

fn reconciler() -> (PresenceReconciler, Arc<ScriptedSource>, Arc<RecordingSink>) {
    let source = Arc::new(ScriptedSource::default());
    let sink = Arc::new(RecordingSink::default());
    let display = DisplaySettings {
        title: "GymSync".into(),
        button: Some(PresenceButton {
            label: "Check GymSync".into(),
            url: "https://github.com/TheusHen/GymSync".into(),
        }),
    };
    let reconciler = PresenceReconciler::new("u1", source.clone(), sink.clone(), display);
    (reconciler, source, sink)
}

fn published(outcome: TickOutcome) -> PresencePayload {
    match outcome {
        TickOutcome::Published(payload) => payload,
        other => panic!("expected a published presence, got {other:?}"),
    }
}

#[tokio::test]
async fn publishes_running_activity() {
    let (mut rec, source, sink) = reconciler();
    source.status("Morning Running", false, 30);

    let payload = published(rec.tick_at(1_000).await);
    assert_eq!(payload.state, "GymSync");
    assert_eq!(payload.details, "Morning Running");
    assert_eq!(payload.start_timestamp, Some(970));
    assert_eq!(payload.large_image_key, "running");
    assert_eq!(payload.button.as_ref().unwrap().label, "Check GymSync");
    assert_eq!(
        payload.party,
        Some(PresenceParty {
            id: "gymsync-party-u1".into(),
            size: 1,
            max: 1,
        })
    );

    assert!(rec.state().is_presence_shown);
    assert_eq!(sink.calls(), vec![SinkCall::Set(payload)]);
}

#[tokio::test]
async fn anchor_is_stable_across_polls_of_same_activity() {
    let (mut rec, source, _sink) = reconciler();
    source.status("running", false, 30);
    source.status("running", false, 31);

    let first = published(rec.tick_at(1_000).await);
    let anchor = rec.state().local_start_epoch;
    let second = published(rec.tick_at(1_001).await);

    assert_eq!(first.start_timestamp, second.start_timestamp);
    assert_eq!(rec.state().local_start_epoch, anchor);
}

#[tokio::test]
async fn changed_activity_recomputes_anchor() {
    let (mut rec, source, _sink) = reconciler();
    source.status("running", false, 30);
    source.status("cycling", false, 4);

    rec.tick_at(1_000).await;
    let payload = published(rec.tick_at(1_010).await);

    assert_eq!(payload.start_timestamp, Some(1_006));
    assert_eq!(rec.state().local_start_epoch, Some(1_006));
    assert_eq!(rec.state().last_activity_label.as_deref(), Some("cycling"));
    assert_eq!(payload.large_image_key, "cycling");
}

#[tokio::test]
async fn paused_activity_has_no_timer_but_keeps_anchor() {
    let (mut rec, source, _sink) = reconciler();
    source.status("gym", false, 60);
    source.status("gym", true, 65);
    source.status("gym", false, 65);

    rec.tick_at(1_000).await;
    let paused = published(rec.tick_at(1_100).await);
    assert_eq!(paused.details, "[⏸️ Paused] gym");
    assert_eq!(paused.start_timestamp, None);
    assert_eq!(rec.state().local_start_epoch, Some(940));

    let resumed = published(rec.tick_at(1_200).await);
    assert_eq!(resumed.details, "gym");
    assert_eq!(resumed.start_timestamp, Some(940));
}

#[tokio::test]
async fn not_found_after_shown_presence_clears_once() {
    let (mut rec, source, sink) = reconciler();
    source.status("running", false, 10);
    source.push(Ok(None));
    source.push(Ok(None));

    rec.tick_at(1_000).await;
    assert_eq!(rec.tick_at(1_001).await, TickOutcome::Cleared);
    assert_eq!(rec.tick_at(1_002).await, TickOutcome::Idle);

    assert_eq!(sink.clears(), 1);
    assert_eq!(rec.state(), &ClientPresenceState::default());
}

#[tokio::test]
async fn restart_after_clear_reanchors() {
    let (mut rec, source, _sink) = reconciler();
    source.status("running", false, 100);
    source.push(Ok(None));
    source.status("running", false, 0);

    rec.tick_at(1_000).await;
    rec.tick_at(1_050).await;
    let payload = published(rec.tick_at(2_000).await);
    assert_eq!(payload.start_timestamp, Some(2_000));
}

#[tokio::test]
async fn unusable_body_is_treated_as_absent() {
    let (mut rec, source, sink) = reconciler();
    source.status("running", false, 10);
    source.push(Ok(Some(json!({"activity": "running"}))));

    rec.tick_at(1_000).await;
    assert_eq!(rec.tick_at(1_001).await, TickOutcome::Cleared);
    assert_eq!(sink.clears(), 1);
    assert!(!rec.state().is_presence_shown);
}

#[tokio::test]
async fn transport_error_skips_tick_without_touching_state() {
    let (mut rec, source, sink) = reconciler();
    source.status("running", false, 10);
    source.push(Err(SourceError::Network("connection refused".into())));

    rec.tick_at(1_000).await;
    let before = rec.state().clone();
    let outcome = rec.tick_at(1_001).await;

    assert!(matches!(outcome, TickOutcome::Skipped(_)));
    assert_eq!(rec.state(), &before);
    assert_eq!(sink.clears(), 0);
    assert_eq!(sink.calls().len(), 1);
}

#[tokio::test]
async fn server_error_skips_tick() {
    let (mut rec, source, sink) = reconciler();
    source.push(Err(SourceError::Rejected {
        status: 500,
        message: "boom".into(),
    }));

    assert!(matches!(rec.tick_at(1_000).await, TickOutcome::Skipped(_)));
    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn sink_failure_leaves_presence_hidden() {
    let (mut rec, source, sink) = reconciler();
    *sink.fail_sets.lock().unwrap() = true;
    source.status("running", false, 10);
    source.status("running", false, 11);

    assert!(matches!(rec.tick_at(1_000).await, TickOutcome::Skipped(_)));
    assert_eq!(rec.state(), &ClientPresenceState::default());

    *sink.fail_sets.lock().unwrap() = false;
    let payload = published(rec.tick_at(1_001).await);
    assert_eq!(payload.start_timestamp, Some(990));
    assert!(rec.state().is_presence_shown);
}

#[tokio::test(start_paused = true)]
async fn run_loop_polls_and_clears_on_shutdown() {
    let (rec, source, sink) = reconciler();
    source.status("running", false, 5);
    source.status("running", false, 6);
    source.status("running", false, 7);

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(rec.run(Duration::from_secs(1), shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    shutdown.cancel();
    handle.await.unwrap();

    let calls = sink.calls();
    let sets = calls
        .iter()
        .filter(|c| matches!(c, SinkCall::Set(_)))
        .count();
    assert_eq!(sets, 3);
    assert_eq!(calls.last(), Some(&SinkCall::Clear));
}

#[tokio::test]
async fn shutdown_with_nothing_shown_does_not_clear() {
    let (rec, _source, sink) = reconciler();
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    rec.run(Duration::from_secs(1), shutdown).await;
    assert_eq!(sink.clears(), 0);
}

#[tokio::test]
async fn failed_publish_keeps_previous_anchor() {
    let (mut rec, source, sink) = reconciler();
    source.status("running", false, 30);
    source.status("cycling", false, 5);

    rec.tick_at(1_000).await;
    let before = rec.state().clone();

    *sink.fail_sets.lock().unwrap() = true;
    assert!(matches!(rec.tick_at(1_100).await, TickOutcome::Skipped(_)));
    assert_eq!(rec.state(), &before);
    assert_eq!(rec.state().last_activity_label.as_deref(), Some("running"));
}
