use crate::{
    Phase, PresentationQueue, PresentationRequest, PresentationTimings, SlotKind, Toast,
    presentation::TimerEvent,
};

use std::time::Duration;

use tokio::{sync::watch, time::sleep};

fn queue() -> PresentationQueue {
    PresentationQueue::new(PresentationTimings::default()).0
}

async fn advance(queue: &mut PresentationQueue, ms: u64) {
    sleep(Duration::from_millis(ms)).await;
    queue.pump();
}

/// WHAT: A toast enters, stays for its deadline, exits and clears
/// WHY: Confirmation banners must go away on their own
#[tokio::test(start_paused = true)]
async fn given_toast_when_deadline_passes_then_exits_and_clears() {
    // Given: A toast request
    let mut queue = queue();
    queue.apply(PresentationRequest::Toast(Toast::success("Sent")));
    assert_eq!(queue.toast_phase(), Phase::Entering);

    // When / Then: Entry completes after the enter animation
    advance(&mut queue, 310).await;
    assert_eq!(queue.toast_phase(), Phase::Visible);

    // When / Then: The deadline starts the exit animation
    advance(&mut queue, 2_700).await;
    assert_eq!(queue.toast_phase(), Phase::Exiting);

    // When / Then: The exit animation clears the payload
    advance(&mut queue, 310).await;
    assert_eq!(queue.toast_phase(), Phase::NotVisible);
    assert!(queue.toast().is_none());
    assert_eq!(queue.armed_timers(), 0);
}

/// WHAT: A newer toast is not dismissed by the older toast's deadline
/// WHY: Last write wins and each toast gets its full display time
#[tokio::test(start_paused = true)]
async fn given_toast_replaced_mid_display_when_old_deadline_passes_then_new_toast_stays() {
    // Given: Toast A shown at t=0 and toast B requested at t=1000ms
    let mut queue = queue();
    queue.apply(PresentationRequest::Toast(Toast::info("A")));
    advance(&mut queue, 1_000).await;
    queue.apply(PresentationRequest::Toast(Toast::info("B")));

    // When: A's deadline (t=3000ms) passes
    advance(&mut queue, 2_100).await;

    // Then: B is still visible with exactly one deadline armed
    assert_eq!(queue.toast().map(|t| t.text.as_str()), Some("B"));
    assert_eq!(queue.toast_phase(), Phase::Visible);
    assert!(queue.toast_deadline_armed());
    assert_eq!(queue.armed_timers(), 1);

    // When: B's own deadline (t=4000ms) passes
    advance(&mut queue, 1_000).await;

    // Then: B starts leaving
    assert_eq!(queue.toast_phase(), Phase::Exiting);
}

/// WHAT: A toast requested during exit re-enters instead of vanishing
/// WHY: The old exit animation must not clear the new payload
#[tokio::test(start_paused = true)]
async fn given_toast_exiting_when_new_toast_requested_then_new_toast_enters() {
    // Given: Toast A in its exit animation
    let mut queue = queue();
    queue.apply(PresentationRequest::Toast(Toast::info("A")));
    advance(&mut queue, 3_100).await;
    assert_eq!(queue.toast_phase(), Phase::Exiting);

    // When: Toast B is requested and A's exit would have completed
    queue.apply(PresentationRequest::Toast(Toast::error("B")));
    assert_eq!(queue.toast_phase(), Phase::Entering);
    advance(&mut queue, 250).await;

    // Then: B is still entering, then becomes visible
    assert_eq!(queue.toast_phase(), Phase::Entering);
    assert_eq!(queue.toast().map(|t| t.text.as_str()), Some("B"));
    advance(&mut queue, 100).await;
    assert_eq!(queue.toast_phase(), Phase::Visible);
}

/// WHAT: Replacing a toast mid-entry keeps the running entry animation
/// WHY: Rapid updates must not restart the fade-in
#[tokio::test(start_paused = true)]
async fn given_toast_entering_when_replaced_then_original_entry_completes() {
    // Given: Toast A entering for 100ms
    let mut queue = queue();
    queue.apply(PresentationRequest::Toast(Toast::info("A")));
    advance(&mut queue, 100).await;

    // When: Toast B replaces it
    queue.apply(PresentationRequest::Toast(Toast::info("B")));
    assert_eq!(queue.toast_phase(), Phase::Entering);
    advance(&mut queue, 250).await;

    // Then: The original 300ms entry finished and B is visible
    assert_eq!(queue.toast_phase(), Phase::Visible);
    assert_eq!(queue.toast().map(|t| t.text.as_str()), Some("B"));
    assert_eq!(queue.armed_timers(), 1);
}

/// WHAT: A callback carrying a stale epoch is ignored
/// WHY: Superseded timers must never act on a newer payload
#[tokio::test(start_paused = true)]
async fn given_visible_toast_when_stale_deadline_arrives_then_ignored() {
    // Given: A visible toast
    let mut queue = queue();
    queue.apply(PresentationRequest::Toast(Toast::info("A")));
    advance(&mut queue, 310).await;

    // When: A deadline event from an old generation is delivered
    queue.on_timer(TimerEvent::DeadlineExpired {
        slot: SlotKind::Toast,
        epoch: 0,
    });
    queue.on_timer(TimerEvent::AnimationFinished {
        slot: SlotKind::Toast,
        epoch: 0,
    });

    // Then: Nothing changes
    assert_eq!(queue.toast_phase(), Phase::Visible);
    assert!(queue.toast_deadline_armed());
}

/// WHAT: Early dismissal is idempotent
/// WHY: A double tap on the banner must not re-trigger the exit
#[tokio::test(start_paused = true)]
async fn given_visible_toast_when_dismissed_twice_then_single_exit() {
    // Given: A visible toast
    let mut queue = queue();
    queue.apply(PresentationRequest::Toast(Toast::info("A")));
    advance(&mut queue, 310).await;

    // When: It is dismissed twice
    queue.apply(PresentationRequest::DismissToast);
    queue.apply(PresentationRequest::DismissToast);

    // Then: It exits once and no deadline remains
    assert_eq!(queue.toast_phase(), Phase::Exiting);
    assert!(!queue.toast_deadline_armed());
    advance(&mut queue, 310).await;
    assert_eq!(queue.toast_phase(), Phase::NotVisible);

    // And: Dismissing nothing is a no-op
    queue.apply(PresentationRequest::DismissToast);
    assert_eq!(queue.toast_phase(), Phase::NotVisible);
}

/// WHAT: The running queue publishes snapshots to handles
/// WHY: Producers and the renderer only ever see the queue through a handle
#[tokio::test(start_paused = true)]
async fn given_running_queue_when_toast_requested_through_handle_then_snapshot_follows() {
    // Given: A queue running on its own task
    let (queue, handle) = PresentationQueue::new(PresentationTimings::default());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(queue.run(shutdown_rx));

    // When: A toast is requested and shown
    handle.request_toast(Toast::success("Copied"));
    sleep(Duration::from_millis(400)).await;

    // Then: The snapshot reports it as visible
    let snapshot = handle.snapshot();
    assert!(handle.is_toast_requested());
    assert_eq!(snapshot.toast_phase, Phase::Visible);
    assert_eq!(snapshot.toast.map(|t| t.text), Some("Copied".to_string()));

    // When: The queue shuts down
    let _ = shutdown_tx.send(true);
    let _ = task.await;

    // Then: Everything is cleared
    assert!(!handle.is_toast_requested());
    assert_eq!(handle.snapshot().toast_phase, Phase::NotVisible);
}
