use crate::{
    CoreResult, MIN_TIMER_PERIOD, SessionError, TimerHandle,
    audio::{AudioPlayer, ClipRef, progress_fraction},
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Interval at which the position is sampled while playing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Rates a voice message cycles through, in order.
pub const DEFAULT_PLAYBACK_RATES: [f32; 3] = [1.0, 1.5, 2.0];

/// Tunables for a playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSettings {
    /// How often the position is sampled while playing.
    pub poll_interval: Duration,
    /// Ordered rate set; `cycle_rate` wraps around it.
    pub rates: Vec<f32>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            rates: DEFAULT_PLAYBACK_RATES.to_vec(),
        }
    }
}

/// Whether a clip is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not producing audio; no poller armed.
    Paused,
    /// Producing audio; the position poller is armed.
    Playing,
}

/// Plays one voice clip with play/pause, rate cycling and position sampling.
///
/// The position is sampled from the player only while `Playing`. Leaving
/// `Playing` drops the poller before returning, and dropping the session
/// drops it too.
pub struct PlaybackSession<P: AudioPlayer> {
    player: Arc<P>,
    clip: ClipRef,
    total_secs: f64,
    state: PlaybackState,
    position: Arc<watch::Sender<f64>>,
    rates: Vec<f32>,
    rate_index: usize,
    poll_interval: Duration,
    poller: Option<TimerHandle>,
}

impl<P: AudioPlayer> PlaybackSession<P> {
    /// Creates a paused session for `clip`, whose length is `total_secs`.
    ///
    /// An empty or invalid rate set falls back to normal speed only. A zero
    /// poll interval is raised to one millisecond.
    pub fn new(player: P, clip: ClipRef, total_secs: f64, settings: PlaybackSettings) -> Self {
        let mut rates: Vec<f32> = settings
            .rates
            .into_iter()
            .filter(|r| r.is_finite() && *r > 0.0)
            .collect();
        if rates.is_empty() {
            rates.push(1.0);
        }

        let (position, _) = watch::channel(0.0);

        Self {
            player: Arc::new(player),
            clip,
            total_secs,
            state: PlaybackState::Paused,
            position: Arc::new(position),
            rates,
            rate_index: 0,
            poll_interval: settings.poll_interval.max(MIN_TIMER_PERIOD),
            poller: None,
        }
    }

    /// Pauses if playing, otherwise starts playback and the poller.
    ///
    /// # Errors
    ///
    /// `PlaybackFailed` if the player rejects the request. A failed play
    /// leaves the session paused; a failed pause still leaves it paused with
    /// the poller stopped.
    #[instrument(skip(self), fields(clip = %self.clip))]
    pub async fn toggle(&mut self) -> CoreResult<()> {
        match self.state {
            PlaybackState::Paused => {
                self.player.play().await.map_err(|e| self.playback_failed(e))?;
                self.state = PlaybackState::Playing;
                self.start_polling();
                info!(rate = self.rate(), "Playback started");
            }
            PlaybackState::Playing => {
                self.stop_polling();
                self.state = PlaybackState::Paused;
                self.position.send_replace(self.player.current_position());
                self.player.pause().await.map_err(|e| self.playback_failed(e))?;
                info!(position_secs = self.position_secs(), "Playback paused");
            }
        }
        Ok(())
    }

    /// Advances to the next rate and applies it to the player immediately.
    ///
    /// # Errors
    ///
    /// `PlaybackFailed` if the player rejects the rate; the previous rate is
    /// kept.
    #[instrument(skip(self), fields(clip = %self.clip))]
    pub fn cycle_rate(&mut self) -> CoreResult<f32> {
        let next = (self.rate_index + 1) % self.rates.len();
        let rate = self.rates[next];

        self.player
            .set_playback_rate(rate)
            .map_err(|e| self.playback_failed(e))?;
        self.rate_index = next;

        debug!(rate, "Playback rate changed");

        Ok(rate)
    }

    /// Reconciles with a player that stopped on its own (clip ended).
    ///
    /// Returns `true` if the session moved to `Paused`.
    pub fn refresh(&mut self) -> bool {
        if self.state != PlaybackState::Playing || self.player.is_playing() {
            return false;
        }

        self.stop_polling();
        self.state = PlaybackState::Paused;
        self.position.send_replace(self.player.current_position());
        debug!(clip = %self.clip, "Playback finished");
        true
    }

    /// Stops polling and pauses the player. Pause failures are logged only.
    ///
    /// Used when the clip leaves the screen.
    pub async fn close(&mut self) {
        self.stop_polling();
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            if let Err(e) = self.player.pause().await {
                warn!(clip = %self.clip, error = ?e, "Pause on close failed, ignoring");
            }
        }
    }

    /// Clip this session plays.
    pub fn clip(&self) -> &ClipRef {
        &self.clip
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current playback rate.
    pub fn rate(&self) -> f32 {
        self.rates[self.rate_index]
    }

    /// Last sampled position in seconds.
    pub fn position_secs(&self) -> f64 {
        *self.position.borrow()
    }

    /// Subscribes to position samples.
    pub fn subscribe_position(&self) -> watch::Receiver<f64> {
        self.position.subscribe()
    }

    /// Length of the clip in seconds, as recorded.
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    /// Played fraction in `[0, 1]`, `0.0` for an unknown length.
    pub fn progress(&self) -> f64 {
        progress_fraction(self.position_secs(), self.total_secs)
    }

    /// True while the position poller is armed.
    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    fn start_polling(&mut self) {
        let player = Arc::clone(&self.player);
        let position = Arc::clone(&self.position);

        self.poller = Some(TimerHandle::every(
            "playback-position",
            self.poll_interval,
            move || {
                if player.is_playing() {
                    let secs = player.current_position();
                    if secs.is_finite() {
                        position.send_replace(secs);
                    }
                }
                true
            },
        ));
    }

    fn stop_polling(&mut self) {
        self.poller = None;
    }

    #[track_caller]
    fn playback_failed(&self, source: SessionError) -> SessionError {
        warn!(clip = %self.clip, error = ?source, "Player rejected request");
        match source {
            SessionError::PlaybackFailed { .. } => source,
            other => SessionError::PlaybackFailed {
                reason: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl<P: AudioPlayer> Drop for PlaybackSession<P> {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
