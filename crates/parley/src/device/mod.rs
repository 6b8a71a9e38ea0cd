//! cpal-backed implementations of the core's hardware traits.

mod player;
mod recorder;

pub(crate) use {player::CpalOutput, recorder::CpalRecorder};

#[cfg(test)]
pub(crate) use {
    player::{decode_mono, load_clip},
    recorder::write_wav,
};
