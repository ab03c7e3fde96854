use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use social_battery::badge::types::StatusColor;
use social_battery::device::constants::{NfcTiming, PULSE_READ, PULSE_SIMULATED_TAP, PULSE_WRITE, SIMULATED_TAP_DELAY, WRITE_DEADLINE};
use social_battery::device::controller::NfcController;
use social_battery::device::mock::{MockHost, RecordingHaptics, WriteBehavior};
use social_battery::device::types::{ConnectionStatus, HostEvent, TagInfo, WriteOutcome};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

fn controller_with(host: Arc<MockHost>) -> (NfcController, Arc<RecordingHaptics>) {
    let haptics = Arc::new(RecordingHaptics::default());
    let controller = NfcController::new(host, haptics.clone(), CancellationToken::new());
    (controller, haptics)
}

async fn wait_for(controller: &NfcController, status: ConnectionStatus) {
    let mut receiver = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(10), receiver.wait_for(|current| *current == status))
        .await
        .unwrap_or_else(|_| panic!("status never became {}", status))
        .expect("status channel closed");
}

fn tag() -> HostEvent {
    HostEvent::Reading(TagInfo { uid: Some("04A1B2C3".to_string()) })
}

#[tokio::test(start_paused = true)]
async fn simulated_tap_connects_after_fixed_delay() {
    let (controller, haptics) = controller_with(Arc::new(MockHost::unavailable()));
    assert_eq!(controller.status(), ConnectionStatus::Idle);

    controller.simulate_tap();
    assert_eq!(controller.status(), ConnectionStatus::Scanning);

    sleep(Duration::from_millis(SIMULATED_TAP_DELAY - 1)).await;
    assert_eq!(controller.status(), ConnectionStatus::Scanning);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(controller.status(), ConnectionStatus::Connected);

    assert_eq!(haptics.patterns(), vec![PULSE_SIMULATED_TAP.to_vec(), PULSE_READ.to_vec()]);
}

#[tokio::test(start_paused = true)]
async fn simulated_tap_works_on_supported_hosts_too() {
    let host = Arc::new(MockHost::available());
    let (controller, _) = controller_with(host.clone());

    controller.simulate_tap();
    wait_for(&controller, ConnectionStatus::Connected).await;
    assert_eq!(host.scan_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn scan_on_unsupported_host_does_nothing() {
    let host = Arc::new(MockHost::unavailable());
    let (controller, haptics) = controller_with(host.clone());
    assert!(!controller.is_supported());

    controller.start_scan().await;
    sleep(Duration::from_secs(5)).await;

    assert_eq!(controller.status(), ConnectionStatus::Idle);
    assert_eq!(host.scan_calls(), 0);
    assert!(haptics.patterns().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reading_connects_with_pulse() {
    let host = Arc::new(MockHost::available());
    let (controller, haptics) = controller_with(host.clone());
    assert!(controller.is_supported());

    controller.start_scan().await;
    assert_eq!(controller.status(), ConnectionStatus::Scanning);
    assert_eq!(host.scan_calls(), 1);

    assert!(host.emit(tag()));
    wait_for(&controller, ConnectionStatus::Connected).await;
    assert_eq!(haptics.patterns(), vec![PULSE_READ.to_vec()]);
}

#[tokio::test(start_paused = true)]
async fn reading_error_is_terminal() {
    let host = Arc::new(MockHost::available());
    let (controller, _) = controller_with(host.clone());

    controller.start_scan().await;
    host.emit(HostEvent::ReadingError("tag moved away".to_string()));
    wait_for(&controller, ConnectionStatus::Error).await;

    // no automatic retry
    sleep(Duration::from_secs(60)).await;
    assert_eq!(controller.status(), ConnectionStatus::Error);
    assert_eq!(host.scan_calls(), 1);

    // the listener is gone after the first event
    assert!(!host.emit(tag()));
    assert_eq!(controller.status(), ConnectionStatus::Error);

    // a fresh scan starts over
    controller.start_scan().await;
    assert_eq!(controller.status(), ConnectionStatus::Scanning);
    host.emit(tag());
    wait_for(&controller, ConnectionStatus::Connected).await;
}

#[tokio::test(start_paused = true)]
async fn failing_to_start_scan_is_an_error() {
    let host = Arc::new(MockHost::available().with_scan_failure("permission denied"));
    let (controller, _) = controller_with(host);

    controller.start_scan().await;
    assert_eq!(controller.status(), ConnectionStatus::Error);
}

#[tokio::test(start_paused = true)]
async fn scan_ending_without_tag_is_an_error() {
    let host = Arc::new(MockHost::available());
    let (controller, _) = controller_with(host.clone());

    controller.start_scan().await;
    host.end_scan();
    wait_for(&controller, ConnectionStatus::Error).await;
}

#[rstest]
#[case(WriteBehavior::Succeed, WriteOutcome::Written)]
#[case(WriteBehavior::Fail, WriteOutcome::Failed("Tag rejected the command with status 6300".to_string()))]
#[case(WriteBehavior::Hang, WriteOutcome::Failed("Writing to the tag took too long".to_string()))]
#[tokio::test(start_paused = true)]
async fn write_always_resolves(#[case] behavior: WriteBehavior, #[case] expected: WriteOutcome) {
    let host = Arc::new(MockHost::available().with_write_behavior(behavior));
    let (controller, haptics) = controller_with(host.clone());

    controller.start_scan().await;
    host.emit(tag());
    wait_for(&controller, ConnectionStatus::Connected).await;

    let started = tokio::time::Instant::now();
    let outcome = controller.write_color(StatusColor::Yellow).await;

    assert_eq!(outcome, expected);
    assert_eq!(host.write_calls(), 1);
    // the timer wheel may round the deadline up by a tick
    assert!(started.elapsed() <= Duration::from_millis(WRITE_DEADLINE + 5));
    assert_eq!(haptics.patterns().last(), Some(&PULSE_WRITE.to_vec()));
}

#[tokio::test(start_paused = true)]
async fn write_sends_record_text() {
    let host = Arc::new(MockHost::available());
    let (controller, _) = controller_with(host.clone());

    controller.start_scan().await;
    for color in StatusColor::all() {
        assert_eq!(controller.write_color(color).await, WriteOutcome::Written);
    }

    assert_eq!(host.writes(), vec!["green", "yellow", "red"]);
}

#[tokio::test(start_paused = true)]
async fn write_without_scan_session_is_skipped() {
    let host = Arc::new(MockHost::available());
    let (controller, haptics) = controller_with(host.clone());

    controller.simulate_tap();
    wait_for(&controller, ConnectionStatus::Connected).await;

    assert_eq!(controller.write_color(StatusColor::Red).await, WriteOutcome::Skipped);
    assert_eq!(host.write_calls(), 0);
    // the pulse still plays
    assert_eq!(haptics.patterns().last(), Some(&PULSE_WRITE.to_vec()));
}

#[tokio::test(start_paused = true)]
async fn write_on_unsupported_host_is_skipped() {
    let host = Arc::new(MockHost::unavailable());
    let (controller, _) = controller_with(host.clone());

    assert_eq!(controller.write_color(StatusColor::Green).await, WriteOutcome::Skipped);
    assert_eq!(host.write_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_simulated_tap() {
    let (controller, haptics) = controller_with(Arc::new(MockHost::unavailable()));

    controller.simulate_tap();
    controller.reset_connection();
    assert_eq!(controller.status(), ConnectionStatus::Idle);

    sleep(Duration::from_millis(SIMULATED_TAP_DELAY * 2)).await;
    assert_eq!(controller.status(), ConnectionStatus::Idle);
    assert_eq!(haptics.patterns(), vec![PULSE_SIMULATED_TAP.to_vec()]);
}

#[tokio::test(start_paused = true)]
async fn reading_queued_before_reset_does_not_vibrate() {
    for _ in 0..32 {
        let host = Arc::new(MockHost::available());
        let (controller, haptics) = controller_with(host.clone());

        // the listener task has not run yet, so the reading and the reset are both pending for it
        controller.start_scan().await;
        assert!(host.emit(tag()));
        controller.reset_connection();
        sleep(Duration::from_millis(10)).await;

        assert_eq!(controller.status(), ConnectionStatus::Idle);
        assert!(haptics.patterns().is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reset_racing_a_tap_never_strands_scanning() {
    let timing = NfcTiming { simulated_tap_delay: Duration::from_millis(1), ..NfcTiming::default() };

    for round in 0..2000 {
        let controller = NfcController::with_timing(
            Arc::new(MockHost::unavailable()),
            Arc::new(RecordingHaptics::default()),
            CancellationToken::new(),
            timing,
        );

        let tapping = controller.clone();
        let resetting = controller.clone();
        let tap = tokio::spawn(async move { tapping.simulate_tap() });
        let reset = tokio::spawn(async move { resetting.reset_connection() });
        tap.await.expect("tap task panicked");
        reset.await.expect("reset task panicked");

        // whichever ran last decides: Idle after a reset, Connected after a tap
        let mut receiver = controller.subscribe();
        let settled = tokio::time::timeout(
            Duration::from_secs(2),
            receiver.wait_for(|status| *status != ConnectionStatus::Scanning),
        )
        .await
        .map(|result| result.is_ok())
        .unwrap_or(false);

        assert!(settled, "round {} stayed in scanning", round);
    }
}

#[tokio::test(start_paused = true)]
async fn reset_ends_scan_session() {
    let host = Arc::new(MockHost::available());
    let (controller, _) = controller_with(host.clone());

    controller.start_scan().await;
    host.emit(tag());
    wait_for(&controller, ConnectionStatus::Connected).await;

    controller.reset_connection();
    assert_eq!(controller.status(), ConnectionStatus::Idle);
    assert_eq!(controller.write_color(StatusColor::Red).await, WriteOutcome::Skipped);
    assert_eq!(host.write_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn reset_ignores_late_reading() {
    let host = Arc::new(MockHost::available());
    let (controller, _) = controller_with(host.clone());

    controller.start_scan().await;
    controller.reset_connection();
    host.emit(tag());
    sleep(Duration::from_secs(1)).await;

    assert_eq!(controller.status(), ConnectionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn app_cancel_stops_background_waits() {
    let app_cancel = CancellationToken::new();
    let controller = NfcController::new(
        Arc::new(MockHost::unavailable()),
        Arc::new(RecordingHaptics::default()),
        app_cancel.clone(),
    );

    controller.simulate_tap();
    app_cancel.cancel();
    sleep(Duration::from_millis(SIMULATED_TAP_DELAY * 2)).await;

    assert_eq!(controller.status(), ConnectionStatus::Scanning);
}
