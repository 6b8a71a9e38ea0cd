use crate::{
    ClipRef, PlaybackSession, PlaybackSettings, PlaybackState, SessionError,
    tests::support::{FakePlayer, PlayerProbe},
};

use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

use tokio::time::sleep;

fn session(total_secs: f64) -> (PlaybackSession<FakePlayer>, Arc<PlayerProbe>) {
    let (player, probe) = FakePlayer::new();
    let session = PlaybackSession::new(
        player,
        ClipRef::new("file:///clips/0.wav"),
        total_secs,
        PlaybackSettings::default(),
    );
    (session, probe)
}

/// WHAT: Position is sampled while playing and frozen once paused
/// WHY: The progress bar follows the player only while audio is audible
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_playing_session_when_paused_then_position_stops_updating() {
    // Given: A playing session whose player reports 1.25 s
    let (mut session, probe) = session(10.0);
    session.toggle().await.unwrap();
    assert_eq!(session.state(), PlaybackState::Playing);
    assert!(session.is_polling());
    probe.set_position(1.25);

    // When: Several poll intervals pass
    sleep(Duration::from_millis(350)).await;

    // Then: The sampled position follows the player
    assert!((session.position_secs() - 1.25).abs() < f64::EPSILON);
    assert!((session.progress() - 0.125).abs() < 1e-9);

    // When: Playback is paused and the player position moves on
    session.toggle().await.unwrap();
    probe.set_position(3.0);
    sleep(Duration::from_millis(500)).await;

    // Then: No poller is armed and the position is frozen
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(!session.is_polling());
    assert!(!probe.is_playing());
    assert!((session.position_secs() - 1.25).abs() < f64::EPSILON);
}

/// WHAT: A paused session never polls the player
/// WHY: Polling while silent wastes wakeups on every rendered message
#[tokio::test(start_paused = true)]
async fn given_paused_session_when_time_passes_then_player_not_polled() {
    // Given: A fresh paused session
    let (session, probe) = session(10.0);

    // When: A second passes
    sleep(Duration::from_secs(1)).await;

    // Then: The player was never asked for its position
    assert_eq!(probe.polls(), 0);
    assert!(!session.is_polling());
}

/// WHAT: Rate cycles 1.0 -> 1.5 -> 2.0 -> 1.0 and is applied immediately
/// WHY: The speed chip must change what the listener hears right away
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_default_rates_when_cycling_then_rates_wrap_and_reach_player() {
    // Given: A playing session at normal speed
    let (mut session, probe) = session(10.0);
    session.toggle().await.unwrap();
    assert!((session.rate() - 1.0).abs() < f32::EPSILON);

    // When / Then: Each cycle moves to the next rate on the player too
    for expected in [1.5f32, 2.0, 1.0, 1.5] {
        let rate = session.cycle_rate().unwrap();
        assert!((rate - expected).abs() < f32::EPSILON);
        assert!((session.rate() - expected).abs() < f32::EPSILON);
        assert!((probe.rate() - expected).abs() < f32::EPSILON);
    }
    assert_eq!(session.state(), PlaybackState::Playing);
}

/// WHAT: A rejected rate keeps the previous one
/// WHY: The chip must not show a speed the player is not using
#[tokio::test(start_paused = true)]
async fn given_player_rejecting_rate_when_cycling_then_previous_rate_kept() {
    // Given: A player that rejects rate changes
    let (mut session, probe) = session(10.0);
    probe.fail_rate.store(true, Ordering::SeqCst);

    // When: The rate is cycled
    let result = session.cycle_rate();

    // Then: PlaybackFailed and the rate is unchanged
    assert!(matches!(result, Err(SessionError::PlaybackFailed { .. })));
    assert!((session.rate() - 1.0).abs() < f32::EPSILON);
}

/// WHAT: A failed play leaves the session paused without a poller
/// WHY: The play button must not show "pause" for silent audio
#[tokio::test(start_paused = true)]
async fn given_player_rejecting_play_when_toggling_then_stays_paused() {
    // Given: A player that refuses to start
    let (mut session, probe) = session(10.0);
    probe.fail_play.store(true, Ordering::SeqCst);

    // When: Playback is toggled
    let result = session.toggle().await;

    // Then: The failure is reported and nothing runs
    assert!(matches!(result, Err(SessionError::PlaybackFailed { .. })));
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(!session.is_polling());
}

/// WHAT: Progress is 0 for a zero-length clip and clamped to 1
/// WHY: Division by zero must never reach the progress bar
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_degenerate_lengths_when_reading_progress_then_fraction_in_range() {
    // Given: A zero-length clip that reports a position anyway
    let (mut zero, zero_probe) = session(0.0);
    zero_probe.set_position(2.0);
    zero.toggle().await.unwrap();
    sleep(Duration::from_millis(150)).await;

    // Then: Progress is zero
    assert_eq!(zero.progress(), 0.0);

    // Given: A clip whose player runs past the recorded length
    let (mut over, over_probe) = session(2.0);
    over_probe.set_position(2.4);
    over.toggle().await.unwrap();
    sleep(Duration::from_millis(150)).await;

    // Then: Progress is clamped to one
    assert_eq!(over.progress(), 1.0);
}

/// WHAT: Refresh pauses a session whose player reached the end
/// WHY: The play button must flip back when the clip finishes
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_player_finished_on_its_own_when_refreshing_then_session_paused() {
    // Given: A playing session whose player then stops at the end
    let (mut session, probe) = session(4.0);
    session.toggle().await.unwrap();
    probe.set_position(4.0);
    sleep(Duration::from_millis(150)).await;
    probe.playing.store(false, Ordering::SeqCst);

    // When: The session reconciles with the player
    let changed = session.refresh();

    // Then: It is paused with no poller, and a second refresh is a no-op
    assert!(changed);
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(!session.is_polling());
    assert!(!session.refresh());
}

/// WHAT: Closing a playing session pauses the player
/// WHY: A message scrolled off screen must go quiet
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_playing_session_when_closed_then_player_paused_and_poller_stopped() {
    // Given: A playing session
    let (mut session, probe) = session(10.0);
    session.toggle().await.unwrap();

    // When: The session is closed
    session.close().await;

    // Then: The player is paused and nothing polls
    assert!(!probe.is_playing());
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(!session.is_polling());
}

/// WHAT: Dropping a playing session stops the poller
/// WHY: A torn-down view must not keep a timer alive
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_playing_session_when_dropped_then_no_further_polls() {
    // Given: A playing session that has polled a few times
    let (mut session, probe) = session(10.0);
    session.toggle().await.unwrap();
    sleep(Duration::from_millis(350)).await;
    assert!(probe.polls() >= 3);

    // When: The session is dropped
    drop(session);
    let polls = probe.polls();
    sleep(Duration::from_secs(1)).await;

    // Then: The player is not polled again
    assert_eq!(probe.polls(), polls);
}

/// WHAT: An empty rate set falls back to normal speed
/// WHY: Cycling must never index into an empty list
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_empty_rate_settings_when_cycling_then_stays_at_normal_speed() {
    // Given: Settings with no usable rates
    let (player, _probe) = FakePlayer::new();
    let mut session = PlaybackSession::new(
        player,
        ClipRef::new("file:///clips/1.wav"),
        3.0,
        PlaybackSettings {
            rates: vec![0.0, f32::NAN],
            ..PlaybackSettings::default()
        },
    );

    // When: The rate is cycled
    let rate = session.cycle_rate().unwrap();

    // Then: Normal speed is kept
    assert!((rate - 1.0).abs() < f32::EPSILON);
}

/// WHAT: A zero poll interval still samples the position
/// WHY: A misconfigured interval must not silently stop progress updates
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_zero_poll_interval_when_playing_then_position_still_sampled() {
    // Given: A session configured with a zero poll interval
    let (player, probe) = FakePlayer::new();
    let settings = PlaybackSettings {
        poll_interval: Duration::ZERO,
        ..PlaybackSettings::default()
    };
    let mut session =
        PlaybackSession::new(player, ClipRef::new("file:///clips/0.wav"), 10.0, settings);

    // When: Playback starts and the player moves to 4 s
    session.toggle().await.unwrap();
    probe.set_position(4.0);
    sleep(Duration::from_millis(50)).await;

    // Then: The poller is alive and the position follows the player
    assert!(session.is_polling());
    assert!(probe.polls() > 0);
    assert!((session.position_secs() - 4.0).abs() < f64::EPSILON);
}
