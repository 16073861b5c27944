use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use keyword_quiz::{
    error::DataSourceError,
    quiz::QuizQuestion,
    services::{QuizDataSource, StaticSource},
    session::{AnswerOutcome, SessionEvent, SessionHandle, SessionSettings},
    state::{SessionSnapshot, SessionState, TimerState},
};
use tokio::{
    sync::broadcast,
    time::{sleep, timeout},
};

struct FailingSource;

#[async_trait]
impl QuizDataSource for FailingSource {
    async fn fetch(&self) -> Result<QuizQuestion, DataSourceError> {
        Err(DataSourceError::EmptyQuestion)
    }
}

fn capitals() -> Arc<dyn QuizDataSource> {
    Arc::new(StaticSource::new(QuizQuestion::new(
        "European capitals",
        vec!["Paris".to_string(), "Rome".to_string()],
    )))
}

fn spawn(source: Arc<dyn QuizDataSource>) -> SessionHandle {
    SessionHandle::spawn(
        source,
        SessionSettings {
            duration_seconds: 5,
            tick_interval: Duration::from_secs(1),
        },
    )
}

async fn wait_until<F>(handle: &SessionHandle, predicate: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    let mut rx = handle.watch();
    let snapshot = timeout(Duration::from_secs(60), rx.wait_for(|s| predicate(s)))
        .await
        .expect("session did not reach the expected state")
        .expect("session runner stopped");
    snapshot.clone()
}

fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn ready(source: Arc<dyn QuizDataSource>) -> SessionHandle {
    let handle = spawn(source);
    let snapshot = handle.load().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Loading);
    wait_until(&handle, |s| s.state == SessionState::Active).await;
    handle
}

#[tokio::test(start_paused = true)]
async fn finding_all_answers_wins_before_expiry() {
    let handle = ready(capitals()).await;
    let mut events = handle.subscribe();

    handle.toggle_timer().await.unwrap();
    let (outcome, snapshot) = handle.submit_answer("paris").await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Matched("Paris".to_string()));
    assert_eq!(snapshot.state, SessionState::Active);
    assert_eq!(snapshot.progress_text, "01/02");

    let (_, snapshot) = handle.submit_answer(" ROME ").await.unwrap();
    assert_eq!(snapshot.state, SessionState::Won);
    assert_eq!(snapshot.timer, TimerState::Stopped);
    assert_eq!(snapshot.matched_answers, vec!["Paris", "Rome"]);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.snapshot().state, SessionState::Won);

    let events = drain(&mut events);
    assert!(events.iter().any(|e| matches!(e, SessionEvent::Won(_))));
    assert!(!events.iter().any(|e| matches!(e, SessionEvent::TimedOut(_))));
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_out_without_answers() {
    let handle = ready(capitals()).await;
    let mut events = handle.subscribe();

    let snapshot = handle.toggle_timer().await.unwrap();
    assert_eq!(snapshot.button_label, "Reset");
    assert_eq!(snapshot.timer_text, "00:05");

    let snapshot = wait_until(&handle, |s| s.state == SessionState::TimedOut).await;
    assert_eq!(snapshot.timer, TimerState::Expired);
    assert_eq!(snapshot.progress_text, "00/02");

    let events = drain(&mut events);
    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::TimerTick {
                remaining_seconds, ..
            } => Some(*remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1, 0]);
    match events.last() {
        Some(SessionEvent::TimedOut(modal)) => {
            assert_eq!(modal.message, "Sorry, time is up! You got 0 out of 2 answers.")
        }
        other => panic!("unexpected last event: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn stopping_the_timer_forfeits_progress_and_silences_the_clock() {
    let handle = ready(capitals()).await;

    handle.toggle_timer().await.unwrap();
    handle.submit_answer("paris").await.unwrap();
    let snapshot = handle.toggle_timer().await.unwrap();

    assert_eq!(snapshot.timer, TimerState::Stopped);
    assert_eq!(snapshot.progress_text, "00/02");
    assert_eq!(snapshot.button_label, "Start");

    sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.snapshot().state, SessionState::Active);
}

#[tokio::test(start_paused = true)]
async fn every_submission_reports_its_outcome() {
    let handle = ready(capitals()).await;
    handle.toggle_timer().await.unwrap();

    let (outcome, _) = handle.submit_answer("london").await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Ignored);

    let (outcome, _) = handle.submit_answer("rome").await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Matched("Rome".to_string()));

    let (outcome, snapshot) = handle.submit_answer("Rome").await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Ignored);
    assert_eq!(snapshot.progress_text, "01/02");
}

#[tokio::test(start_paused = true)]
async fn answers_before_the_timer_starts_are_not_counted() {
    let handle = ready(capitals()).await;
    let mut events = handle.subscribe();

    let (outcome, snapshot) = handle.submit_answer("paris").await.unwrap();

    assert_eq!(outcome, AnswerOutcome::TimerNotRunning);
    assert!(snapshot.matched_answers.is_empty());
    assert!(matches!(drain(&mut events).as_slice(), [SessionEvent::Hint(_)]));
}

#[tokio::test(start_paused = true)]
async fn reset_after_time_out_loads_again() {
    let handle = ready(capitals()).await;
    handle.toggle_timer().await.unwrap();
    wait_until(&handle, |s| s.state == SessionState::TimedOut).await;

    let snapshot = handle.reset().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Loading);

    let snapshot = wait_until(&handle, |s| s.state == SessionState::Active).await;
    assert_eq!(snapshot.timer, TimerState::Stopped);
    assert!(snapshot.matched_answers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_is_reported_and_recoverable_by_load() {
    let handle = spawn(Arc::new(FailingSource));
    let mut events = handle.subscribe();

    handle.load().await.unwrap();
    let snapshot = wait_until(&handle, |s| matches!(s.state, SessionState::Error(_))).await;
    assert_eq!(
        snapshot.state,
        SessionState::Error("quiz data has an empty question".to_string())
    );
    assert!(drain(&mut events)
        .iter()
        .any(|e| matches!(e, SessionEvent::Error(modal) if modal.title == "Ooops!")));

    assert!(handle.toggle_timer().await.is_err());
    let snapshot = handle.load().await.unwrap();
    assert_eq!(snapshot.state, SessionState::Loading);
}
