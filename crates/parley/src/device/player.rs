use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    },
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader};
use parley_core::{AudioOutput, AudioPlayer, ClipRef, CoreResult, SessionError};
use tracing::{debug, error, info, instrument};

/// Opens cpal output streams for recorded clips.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalOutput;

/// Plays one decoded clip through the default output device.
///
/// The stream runs for the player's whole lifetime and outputs silence while
/// paused; play/pause only flip `playing`. The read cursor advances by
/// `rate * source_rate / device_rate` frames per output frame.
pub struct CpalPlayer {
    // Held for its lifetime; dropping it stops the device.
    _stream: Mutex<Stream>,
    shared: Arc<PlayerShared>,
}

struct PlayerShared {
    frames: Vec<f32>,
    source_rate: u32,
    /// Fractional frame index, stored as `f64` bits.
    cursor: AtomicU64,
    /// Playback rate, stored as `f32` bits.
    rate: AtomicU32,
    playing: AtomicBool,
}

impl PlayerShared {
    fn cursor(&self) -> f64 {
        f64::from_bits(self.cursor.load(Ordering::Acquire))
    }

    fn set_cursor(&self, frames: f64) {
        self.cursor.store(frames.to_bits(), Ordering::Release);
    }

    fn rate(&self) -> f32 {
        f32::from_bits(self.rate.load(Ordering::Acquire))
    }

    fn at_end(&self) -> bool {
        self.cursor() >= self.frames.len() as f64
    }
}

impl AudioOutput for CpalOutput {
    type Player = CpalPlayer;

    #[instrument(skip(self))]
    async fn open(&self, clip: &ClipRef) -> CoreResult<CpalPlayer> {
        let (frames, source_rate) = load_clip(PathBuf::from(clip.as_str())).await?;
        let shared = Arc::new(PlayerShared {
            frames,
            source_rate,
            cursor: AtomicU64::new(0f64.to_bits()),
            rate: AtomicU32::new(1f32.to_bits()),
            playing: AtomicBool::new(false),
        });

        let stream = open_output_stream(Arc::clone(&shared))?;

        info!(
            clip = %clip,
            frames = shared.frames.len(),
            source_rate,
            "Player opened"
        );

        Ok(CpalPlayer {
            _stream: Mutex::new(stream),
            shared,
        })
    }
}

impl AudioPlayer for CpalPlayer {
    async fn play(&self) -> CoreResult<()> {
        if self.shared.at_end() {
            self.shared.set_cursor(0.0);
        }
        self.shared.playing.store(true, Ordering::Release);
        debug!("Playback resumed");
        Ok(())
    }

    async fn pause(&self) -> CoreResult<()> {
        self.shared.playing.store(false, Ordering::Release);
        debug!("Playback paused");
        Ok(())
    }

    fn current_position(&self) -> f64 {
        if self.shared.source_rate == 0 {
            return 0.0;
        }
        self.shared.cursor() / f64::from(self.shared.source_rate)
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Acquire)
    }

    #[track_caller]
    fn set_playback_rate(&self, rate: f32) -> CoreResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SessionError::PlaybackFailed {
                reason: format!("Unsupported playback rate: {}", rate),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.shared.rate.store(rate.to_bits(), Ordering::Release);
        Ok(())
    }
}

#[track_caller]
fn open_output_stream(shared: Arc<PlayerShared>) -> CoreResult<Stream> {
    let host = cpal::default_host();

    let device = host
        .default_output_device()
        .ok_or(SessionError::HardwareUnavailable {
            reason: "No audio output device found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let config = device
        .default_output_config()
        .map_err(|e| SessionError::HardwareUnavailable {
            reason: format!("Failed to get output config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let channels = usize::from(config.channels().max(1));
    let step = f64::from(shared.source_rate) / f64::from(config.sample_rate().max(1));

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = next_sample(&shared, step);
                    frame.fill(sample);
                }
            },
            |err| {
                error!("Output stream error: {}", err);
            },
            None,
        )
        .map_err(|e| SessionError::HardwareUnavailable {
            reason: format!("Failed to build output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    stream.play().map_err(|e| SessionError::HardwareUnavailable {
        reason: format!("Failed to start output stream: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(stream)
}

fn next_sample(shared: &PlayerShared, step: f64) -> f32 {
    if !shared.playing.load(Ordering::Acquire) {
        return 0.0;
    }

    let cursor = shared.cursor();
    let Some(&sample) = shared.frames.get(cursor as usize) else {
        shared.playing.store(false, Ordering::Release);
        return 0.0;
    };

    shared.set_cursor(cursor + step * f64::from(shared.rate()));
    sample
}

/// Decodes a clip on the blocking pool, off the async loop.
pub(crate) async fn load_clip(path: PathBuf) -> CoreResult<(Vec<f32>, u32)> {
    tokio::task::spawn_blocking(move || decode_mono(&path))
        .await
        .map_err(|e| SessionError::PlaybackFailed {
            reason: format!("Clip decoder task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?
}

/// Decodes a WAV clip and downmixes it to mono `f32` frames.
#[track_caller]
pub(crate) fn decode_mono(path: &Path) -> CoreResult<(Vec<f32>, u32)> {
    let playback_failed = |reason: String| SessionError::PlaybackFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    let mut reader = WavReader::open(path)
        .map_err(|e| playback_failed(format!("Failed to open clip {:?}: {}", path, e)))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| playback_failed(format!("Failed to decode clip: {}", e)))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| playback_failed(format!("Failed to decode clip: {}", e)))?
        }
    };

    let frames = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((frames, spec.sample_rate))
}
