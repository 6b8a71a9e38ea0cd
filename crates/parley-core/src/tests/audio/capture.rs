use crate::{
    CaptureGate, CaptureSession, CaptureState, SessionError,
    tests::support::FakeRecorder,
};

use std::{sync::atomic::Ordering, time::Duration};

use tokio::time::sleep;

/// WHAT: Duration counts whole seconds while recording
/// WHY: The recording badge must show 5 after five and a half seconds
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recording_for_five_and_a_half_seconds_when_stopped_then_duration_is_five() {
    // Given: A session recording through a working recorder
    let recorder = FakeRecorder::shared();
    let gate = CaptureGate::new();
    let mut session = CaptureSession::new(recorder.clone(), gate.clone());
    session.start().await.unwrap();

    // When: 5.5 seconds pass and the recording is stopped
    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(session.duration_secs(), 5);
    let captured = session.stop().await.unwrap();

    // Then: The clip is returned with duration 5 and everything is released
    assert_eq!(captured.duration_secs, 5);
    assert!(!captured.clip.is_empty());
    assert_eq!(session.state(), CaptureState::Idle);
    assert!(!session.is_ticking());
    assert_eq!(session.held_handles(), 0);
    assert_eq!(recorder.live(), 0);
    assert!(!gate.is_held());
}

/// WHAT: Duration stops advancing once the session stops
/// WHY: A stopped ticker must not keep mutating the displayed duration
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_stopped_session_when_time_passes_then_duration_observers_see_no_ticks() {
    // Given: A recording stopped after two seconds
    let mut session = CaptureSession::new(FakeRecorder::shared(), CaptureGate::new());
    let mut rx = session.subscribe_duration();
    session.start().await.unwrap();
    sleep(Duration::from_millis(2_500)).await;
    session.stop().await.unwrap();
    rx.borrow_and_update();

    // When: Several more seconds pass
    sleep(Duration::from_secs(3)).await;

    // Then: No further duration updates were published
    assert!(!rx.has_changed().unwrap());
    assert_eq!(*rx.borrow(), 0);
}

/// WHAT: Cancel exposes no clip and resets the duration
/// WHY: A cancelled voice message must leave nothing behind
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_cancelled_then_clip_discarded_and_duration_reset() {
    // Given: A session that has been recording for three seconds
    let recorder = FakeRecorder::shared();
    let gate = CaptureGate::new();
    let mut session = CaptureSession::new(recorder.clone(), gate.clone());
    session.start().await.unwrap();
    sleep(Duration::from_millis(3_500)).await;
    assert_eq!(session.duration_secs(), 3);

    // When: The recording is cancelled
    session.cancel().await;

    // Then: The partial clip is discarded and the session is idle at zero
    assert_eq!(recorder.discarded_count(), 1);
    assert_eq!(session.duration_secs(), 0);
    assert_eq!(session.state(), CaptureState::Idle);
    assert_eq!(recorder.live(), 0);
    assert!(!session.is_ticking());
    assert!(!gate.is_held());
}

/// WHAT: Cancel is idempotent on an idle session
/// WHY: Tear-down paths call cancel without checking state first
#[tokio::test(start_paused = true)]
async fn given_idle_session_when_cancel_called_repeatedly_then_stays_idle() {
    // Given: A session that never started
    let recorder = FakeRecorder::shared();
    let mut session = CaptureSession::new(recorder.clone(), CaptureGate::new());

    // When: Cancel is called three times
    for _ in 0..3 {
        session.cancel().await;
    }

    // Then: Nothing was touched
    assert_eq!(session.state(), CaptureState::Idle);
    assert_eq!(session.duration_secs(), 0);
    assert_eq!(recorder.discarded_count(), 0);
    assert_eq!(recorder.live(), 0);
}

/// WHAT: A refused device fails start with HardwareUnavailable
/// WHY: Permission denial must surface as an alert, not a stuck session
#[tokio::test(start_paused = true)]
async fn given_denied_microphone_when_starting_then_hardware_unavailable_and_idle() {
    // Given: A recorder that refuses the device
    let recorder = FakeRecorder::shared();
    recorder.deny_record.store(true, Ordering::SeqCst);
    let gate = CaptureGate::new();
    let mut session = CaptureSession::new(recorder.clone(), gate.clone());

    // When: Recording is started
    let result = session.start().await;

    // Then: The error is reported and nothing is held
    assert!(matches!(result, Err(SessionError::HardwareUnavailable { .. })));
    assert_eq!(session.state(), CaptureState::Idle);
    assert!(!session.is_ticking());
    assert!(!gate.is_held());

    // And: Time passing does not tick a duration
    sleep(Duration::from_secs(2)).await;
    assert_eq!(session.duration_secs(), 0);
}

/// WHAT: Finalization failure exposes no clip and releases everything
/// WHY: A broken file write must not leak the device or the ticker
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_failing_recorder_stop_when_stopping_then_finalize_failed_and_released() {
    // Given: A recording whose finalization will fail
    let recorder = FakeRecorder::shared();
    let gate = CaptureGate::new();
    let mut session = CaptureSession::new(recorder.clone(), gate.clone());
    session.start().await.unwrap();
    sleep(Duration::from_millis(1_500)).await;
    recorder.fail_stop.store(true, Ordering::SeqCst);

    // When: The recording is stopped
    let result = session.stop().await;

    // Then: CaptureFinalizeFailed is returned and the session is released
    assert!(matches!(result, Err(SessionError::CaptureFinalizeFailed { .. })));
    assert_eq!(session.state(), CaptureState::Idle);
    assert_eq!(session.duration_secs(), 0);
    assert!(!session.is_ticking());
    assert_eq!(recorder.live(), 0);
    assert!(!gate.is_held());
}

/// WHAT: An empty clip reference counts as a finalize failure
/// WHY: Sending a message that points nowhere is worse than an error
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recorder_returning_empty_clip_when_stopping_then_finalize_failed() {
    // Given: A recorder that finalizes into an empty reference
    let recorder = FakeRecorder::shared();
    recorder.empty_clip.store(true, Ordering::SeqCst);
    let mut session = CaptureSession::new(recorder.clone(), CaptureGate::new());
    session.start().await.unwrap();

    // When: The recording is stopped
    let result = session.stop().await;

    // Then: No clip is exposed
    assert!(matches!(result, Err(SessionError::CaptureFinalizeFailed { .. })));
    assert_eq!(session.state(), CaptureState::Idle);
}

/// WHAT: Cancel swallows recorder failures
/// WHY: Cancel always succeeds from the caller's point of view
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_failing_recorder_stop_when_cancelling_then_failure_swallowed() {
    // Given: A recording whose stop will fail
    let recorder = FakeRecorder::shared();
    let mut session = CaptureSession::new(recorder.clone(), CaptureGate::new());
    session.start().await.unwrap();
    recorder.fail_stop.store(true, Ordering::SeqCst);

    // When: The recording is cancelled
    session.cancel().await;

    // Then: The session is idle and the handle released
    assert_eq!(session.state(), CaptureState::Idle);
    assert_eq!(recorder.live(), 0);
    assert_eq!(recorder.discarded_count(), 0);
}

/// WHAT: Stop while idle is rejected
/// WHY: There is nothing to finalize and no clip must be invented
#[tokio::test(start_paused = true)]
async fn given_idle_session_when_stopping_then_invalid_state() {
    // Given: A session that never started
    let mut session = CaptureSession::new(FakeRecorder::shared(), CaptureGate::new());

    // When: Stop is called
    let result = session.stop().await;

    // Then: InvalidState names the operation and state
    assert!(matches!(
        result,
        Err(SessionError::InvalidState {
            operation: "stop",
            state: "idle",
            ..
        })
    ));
}

/// WHAT: Start while recording is ignored
/// WHY: A second handle would leak the first one's device
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recording_session_when_started_again_then_single_handle_kept() {
    // Given: A recording session two seconds in
    let recorder = FakeRecorder::shared();
    let mut session = CaptureSession::new(recorder.clone(), CaptureGate::new());
    session.start().await.unwrap();
    sleep(Duration::from_millis(2_500)).await;

    // When: Start is called again
    session.start().await.unwrap();

    // Then: One handle is held and the duration was not reset
    assert_eq!(recorder.live(), 1);
    assert_eq!(session.held_handles(), 1);
    assert_eq!(session.duration_secs(), 2);
    assert!(matches!(session.state(), CaptureState::Recording { .. }));
}

/// WHAT: Only one session may record through a shared gate
/// WHY: Two chats recording at once would fight over the microphone
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_two_sessions_sharing_gate_when_second_starts_then_refused_until_first_stops() {
    // Given: Two sessions built from the same gate, the first recording
    let recorder = FakeRecorder::shared();
    let gate = CaptureGate::new();
    let mut first = CaptureSession::new(recorder.clone(), gate.clone());
    let mut second = CaptureSession::new(recorder.clone(), gate.clone());
    first.start().await.unwrap();

    // When: The second session starts
    let refused = second.start().await;

    // Then: It is refused without touching the device
    assert!(matches!(refused, Err(SessionError::HardwareUnavailable { .. })));
    assert_eq!(second.state(), CaptureState::Idle);
    assert_eq!(recorder.live(), 1);

    // And: Once the first stops, the second can record
    first.stop().await.unwrap();
    second.start().await.unwrap();
    assert!(matches!(second.state(), CaptureState::Recording { .. }));
}

/// WHAT: Dropping a recording session releases the device, gate and ticker
/// WHY: Leaving the screen mid-recording must not leave the microphone on
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recording_session_when_dropped_then_everything_released() {
    // Given: A recording session with a duration observer
    let recorder = FakeRecorder::shared();
    let gate = CaptureGate::new();
    let mut session = CaptureSession::new(recorder.clone(), gate.clone());
    let rx = session.subscribe_duration();
    session.start().await.unwrap();
    sleep(Duration::from_millis(1_500)).await;

    // When: The session is dropped
    drop(session);
    sleep(Duration::from_secs(3)).await;

    // Then: Handle and gate are released and the duration never ticked again
    assert_eq!(recorder.live(), 0);
    assert!(!gate.is_held());
    assert_eq!(*rx.borrow(), 0);
}

/// WHAT: A stop abandoned mid-finalization leaves the session stopping
/// WHY: Cancel must still be able to release the gate afterwards
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_slow_finalization_when_stop_abandoned_then_cancel_releases_gate() {
    // Given: A recorder whose stop takes a second
    let recorder = FakeRecorder::shared();
    *recorder.stop_delay.lock().unwrap() = Some(Duration::from_secs(1));
    let gate = CaptureGate::new();
    let mut session = CaptureSession::new(recorder.clone(), gate.clone());
    session.start().await.unwrap();

    // When: The stop future is dropped before finalization completes
    let abandoned = tokio::time::timeout(Duration::from_millis(100), session.stop()).await;

    // Then: The session is stopping, holds no handle and no ticker
    assert!(abandoned.is_err());
    assert!(matches!(session.state(), CaptureState::Stopping { .. }));
    assert_eq!(session.held_handles(), 0);
    assert_eq!(recorder.live(), 0);
    assert!(!session.is_ticking());
    assert!(gate.is_held());

    // And: Cancel returns it to idle and frees the gate
    session.cancel().await;
    assert_eq!(session.state(), CaptureState::Idle);
    assert!(!gate.is_held());
}

/// WHAT: At most one handle is held and the ticker runs only while recording
/// WHY: Resource ownership must hold across any sequence of operations
#[tokio::test(start_paused = true)]
async fn given_mixed_operation_sequence_when_applied_then_resources_track_state() {
    // Given: A session and a fixed but irregular operation script
    let recorder = FakeRecorder::shared();
    let mut session = CaptureSession::new(recorder.clone(), CaptureGate::new());
    let script = [0u8, 0, 1, 1, 2, 0, 2, 2, 0, 1, 0, 0, 2, 1, 0, 2];

    for (step, op) in script.iter().enumerate() {
        // When: The next operation runs, failing finalization every third step
        recorder.fail_stop.store(step % 3 == 0, Ordering::SeqCst);
        match *op {
            0 => {
                let _ = session.start().await;
            }
            1 => {
                let _ = session.stop().await;
            }
            _ => session.cancel().await,
        }
        sleep(Duration::from_millis(700)).await;

        // Then: Ownership matches the state after every step
        let recording = matches!(session.state(), CaptureState::Recording { .. });
        assert!(session.held_handles() <= 1);
        assert_eq!(session.held_handles(), usize::from(recording));
        assert_eq!(recorder.live(), usize::from(recording));
        assert_eq!(session.is_ticking(), recording);
    }
}
