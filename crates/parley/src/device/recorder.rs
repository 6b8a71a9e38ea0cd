use std::{
    collections::VecDeque,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use parley_core::{AudioRecorder, ClipRef, CoreResult, SessionError};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Maximum samples to buffer (5 minutes at 48kHz mono).
/// Prevents unbounded memory growth during long voice messages.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Records voice messages from a cpal input device into WAV clips.
///
/// The device is opened per recording, not at construction, so a missing
/// or denied microphone surfaces as `HardwareUnavailable` from `record`.
pub struct CpalRecorder {
    clip_dir: PathBuf,
    device_name: Option<String>,
}

/// Live input stream plus the buffer its callback writes into.
///
/// Dropping the handle drops the stream, which releases the device.
pub struct RecordingHandle {
    stream: Stream,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Signals the audio callback to stop writing before the buffer is read.
    shutdown: Arc<AtomicBool>,
    spec: WavSpec,
    clip_id: Uuid,
}

impl CpalRecorder {
    /// Creates a recorder that writes clips into `clip_dir`.
    pub fn new(clip_dir: PathBuf, device_name: Option<String>) -> Self {
        Self {
            clip_dir,
            device_name,
        }
    }

    #[track_caller]
    fn input_device(&self) -> CoreResult<Device> {
        let host = cpal::default_host();

        let device = match &self.device_name {
            Some(wanted) => host
                .input_devices()
                .map_err(|e| SessionError::HardwareUnavailable {
                    reason: format!("Failed to enumerate input devices: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?
                .find(|d| {
                    #[allow(deprecated)]
                    let name = d.name();
                    name.map(|n| &n == wanted).unwrap_or(false)
                }),
            None => host.default_input_device(),
        };

        device.ok_or(SessionError::HardwareUnavailable {
            reason: "No microphone found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn open_stream(&self) -> CoreResult<RecordingHandle> {
        let device = self.input_device()?;

        let config = device
            .default_input_config()
            .map_err(|e| SessionError::HardwareUnavailable {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let spec = WavSpec {
            channels: config.channels(),
            sample_rate: config.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let samples = Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES)));
        let shutdown = Arc::new(AtomicBool::new(false));
        let buffer = Arc::clone(&samples);
        let stopped = Arc::clone(&shutdown);

        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if stopped.load(Ordering::Acquire) {
                        return;
                    }
                    // A poisoned buffer still holds valid samples.
                    let mut buf = buffer.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend(data.iter().copied());
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                },
                |err| {
                    error!("Input stream error: {}", err);
                },
                None,
            )
            .map_err(|e| SessionError::HardwareUnavailable {
                reason: format!("Failed to build input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| SessionError::HardwareUnavailable {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(RecordingHandle {
            stream,
            samples,
            shutdown,
            spec,
            clip_id: Uuid::new_v4(),
        })
    }

    fn clip_path(&self, clip_id: Uuid) -> PathBuf {
        self.clip_dir.join(format!("{}.wav", clip_id))
    }
}

impl RecordingHandle {
    /// Stops the callback, collects the buffered samples and releases the
    /// stream.
    fn finish(self) -> Vec<f32> {
        self.shutdown.store(true, Ordering::Release);

        let samples: Vec<f32> = self
            .samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect();

        debug!(sample_count = samples.len(), "Captured audio samples");

        samples
    }
}

impl Drop for RecordingHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Err(e) = self.stream.pause() {
            debug!(error = %e, "Input stream pause on release failed");
        }
    }
}

impl AudioRecorder for CpalRecorder {
    type Handle = RecordingHandle;

    #[instrument(skip(self))]
    async fn record(&self) -> CoreResult<RecordingHandle> {
        let handle = self.open_stream()?;

        info!(
            clip_id = %handle.clip_id,
            sample_rate = handle.spec.sample_rate,
            channels = handle.spec.channels,
            "Audio capture started"
        );

        Ok(handle)
    }

    #[instrument(skip(self, handle))]
    async fn stop(&self, handle: RecordingHandle) -> CoreResult<ClipRef> {
        let spec = handle.spec;
        let path = self.clip_path(handle.clip_id);
        let samples = handle.finish();

        if samples.is_empty() {
            return Err(SessionError::CaptureFinalizeFailed {
                reason: "No audio captured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_wav(&target, spec, &samples))
            .await
            .map_err(|e| SessionError::CaptureFinalizeFailed {
                reason: format!("WAV writer task panicked: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        info!(path = ?path, "Audio capture stopped");

        Ok(ClipRef::new(path.to_string_lossy()))
    }

    fn discard(&self, clip: &ClipRef) {
        if let Err(e) = std::fs::remove_file(clip.as_str()) {
            warn!(clip = %clip, error = %e, "Failed to delete discarded clip");
        }
    }
}

#[track_caller]
pub(crate) fn write_wav(path: &Path, spec: WavSpec, samples: &[f32]) -> CoreResult<()> {
    let finalize_failed = |reason: String| SessionError::CaptureFinalizeFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| finalize_failed(format!("Failed to create clip directory: {}", e)))?;
    }

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| finalize_failed(format!("Failed to create WAV file: {}", e)))?;

    for &sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(pcm)
            .map_err(|e| finalize_failed(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| finalize_failed(format!("Failed to finalize WAV file: {}", e)))?;

    Ok(())
}
