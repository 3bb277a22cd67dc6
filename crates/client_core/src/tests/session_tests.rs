use super::*;
use crate::{in_memory::InMemoryCounter, view::ValueDisplay};
use shared::{
    domain::{CounterValue, TxState},
    error::INVALID_NUMBER_MESSAGE,
};
use std::time::Duration;

fn session_over(counter: &InMemoryCounter) -> CounterSession {
    CounterSession::new(Arc::new(counter.clone()), ControllerConfig::default())
}

#[tokio::test(start_paused = true)]
async fn start_publishes_the_initial_value() {
    let counter = InMemoryCounter::new(12);
    let session = session_over(&counter);
    assert_eq!(session.reader().current(), CounterValue::Unknown);

    session.start().await;
    assert_eq!(session.reader().current(), CounterValue::Known(12));
    assert_eq!(session.view().value, ValueDisplay::Value(12));
}

#[tokio::test(start_paused = true)]
async fn failed_initial_read_stays_unknown_and_silent() {
    let counter = InMemoryCounter::new(12);
    counter.fail_reads(Some(RemoteCallError::rpc("connection refused"))).await;
    let session = session_over(&counter);

    session.start().await;
    assert_eq!(session.reader().current(), CounterValue::Unknown);
    assert_eq!(session.view().value, ValueDisplay::Loading);
    assert_eq!(session.controller().status().state(), TxState::Idle);
}

#[tokio::test(start_paused = true)]
async fn value_is_refreshed_before_success_is_visible() {
    let counter = InMemoryCounter::new(5).with_confirmation_latency(Duration::from_secs(2));
    let session = session_over(&counter);
    session.start().await;

    let mut status_rx = session.controller().subscribe();
    let value_rx = session.reader().subscribe();
    let watcher = tokio::spawn(async move {
        let mut value_at_success = None;
        status_rx
            .wait_for(|status| {
                if status.state() == TxState::Success {
                    value_at_success = Some(*value_rx.borrow());
                    true
                } else {
                    false
                }
            })
            .await
            .expect("controller alive");
        value_at_success
    });

    let outcome = session.add_number("4").await;
    assert_eq!(outcome, Submission::Succeeded);
    assert_eq!(
        watcher.await.expect("join"),
        Some(CounterValue::Known(9))
    );
    assert_eq!(session.controller().status().message(), "Added 4 successfully!");
}

#[tokio::test(start_paused = true)]
async fn non_numeric_input_never_reaches_the_service() {
    let counter = InMemoryCounter::new(1);
    let session = session_over(&counter);

    for input in ["abc", "", "  "] {
        let outcome = session.set_number(input).await;
        assert_eq!(outcome, Submission::Invalid(INVALID_NUMBER_MESSAGE.into()));
        let status = session.controller().status();
        assert_eq!(status.state(), TxState::Error);
        assert_eq!(status.message(), INVALID_NUMBER_MESSAGE);
    }

    assert!(counter.applied_operations().await.is_empty());
    assert_eq!(counter.value().await, 1);
}

#[tokio::test(start_paused = true)]
async fn each_action_applies_its_operation() {
    let counter = InMemoryCounter::new(2);
    let session = session_over(&counter);

    assert_eq!(session.mul_number("10").await, Submission::Succeeded);
    assert_eq!(session.increment().await, Submission::Succeeded);
    assert_eq!(session.set_number("1e3").await, Submission::Succeeded);
    assert_eq!(
        session.controller().status().message(),
        "Number set to 1e3 successfully!"
    );

    assert_eq!(
        counter.applied_operations().await,
        vec![
            CounterOperation::Multiply(10),
            CounterOperation::Increment,
            CounterOperation::Set(1000),
        ]
    );
    assert_eq!(session.reader().current(), CounterValue::Known(1000));
}

#[tokio::test(start_paused = true)]
async fn revert_reason_is_shown_to_the_user() {
    let counter = InMemoryCounter::new(crate::in_memory::MAX_COUNTER_VALUE);
    let session = session_over(&counter);

    let outcome = session.increment().await;
    assert_eq!(outcome, Submission::Failed("Panic due to OVERFLOW(17)".into()));
    assert_eq!(
        session.view().alert.map(|a| a.message).as_deref(),
        Some("Panic due to OVERFLOW(17)")
    );
}

#[tokio::test(start_paused = true)]
async fn fractional_input_fails_after_entering_pending() {
    let counter = InMemoryCounter::new(3);
    let session = session_over(&counter);
    let mut status_rx = session.controller().subscribe();

    let outcome = session.add_number("2.5").await;
    assert!(matches!(outcome, Submission::Failed(ref m) if m.starts_with("underflow")));
    assert!(status_rx.has_changed().expect("controller alive"));
    assert_eq!(status_rx.borrow_and_update().state(), TxState::Error);
    assert!(counter.applied_operations().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn read_failure_after_confirmation_keeps_success_and_old_value() {
    let counter = InMemoryCounter::new(7);
    let session = session_over(&counter);
    session.start().await;
    counter.fail_reads(Some(RemoteCallError::rpc("rate limited"))).await;

    assert_eq!(session.increment().await, Submission::Succeeded);
    assert_eq!(session.controller().status().state(), TxState::Success);
    assert_eq!(session.reader().current(), CounterValue::Known(7));
    assert_eq!(counter.value().await, 8);
}

#[tokio::test(start_paused = true)]
async fn rapid_double_dispatch_runs_once() {
    let counter = InMemoryCounter::new(0).with_confirmation_latency(Duration::from_secs(1));
    let session = session_over(&counter);

    let first = session.dispatch(OperationKind::Increment, "");
    let second = session.dispatch(OperationKind::Increment, "");

    assert_eq!(first.await.expect("join"), Submission::Succeeded);
    assert_eq!(second.await.expect("join"), Submission::Dropped);
    assert_eq!(counter.value().await, 1);
}

#[tokio::test(start_paused = true)]
async fn view_tracks_the_pending_control() {
    let counter = InMemoryCounter::new(0).with_confirmation_latency(Duration::from_secs(1));
    let session = session_over(&counter);

    let handle = session.dispatch(OperationKind::Multiply, "3");
    session
        .controller()
        .subscribe()
        .wait_for(|status| status.is_pending())
        .await
        .expect("controller alive");

    let view = session.view();
    assert!(view.input_disabled);
    let mul = view.control(OperationKind::Multiply).expect("multiply control");
    assert_eq!(mul.label, "Multiplying...");
    assert!(mul.disabled);
    assert!(!view.control(OperationKind::Set).expect("set control").disabled);

    handle.await.expect("join");
    assert!(!session.view().input_disabled);
}

#[tokio::test(start_paused = true)]
async fn overflowing_multiply_fails_and_display_matches_the_service() {
    let counter = InMemoryCounter::new(0);
    let session = session_over(&counter);

    assert_eq!(
        session.set_number("9000000000000000000").await,
        Submission::Succeeded
    );
    let outcome = session.mul_number("2").await;

    assert_eq!(outcome, Submission::Failed("Panic due to OVERFLOW(17)".into()));
    let remote = counter.value().await;
    assert_eq!(remote, 9_000_000_000_000_000_000);
    assert_eq!(
        session.reader().current(),
        CounterValue::Known(9_000_000_000_000_000_000)
    );
}
