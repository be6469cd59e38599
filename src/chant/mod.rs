//! Team chant playback and the bass-driven hero glow.

pub mod analyser;
pub mod decoder;
pub mod frames;
pub mod glow;
pub mod graph;
pub mod player;

use std::fmt;
use std::path::PathBuf;

pub use graph::CpalGraphSource;
pub use player::ChantPlayer;

/// Audio failures. None of these are fatal: the player logs them and the
/// page carries on without sound.
#[derive(Debug)]
pub enum ChantError {
    Io(std::io::Error, PathBuf),
    Decode(String),
    NoAudioTrack(PathBuf),
    NoOutputDevice,
    Stream(String),
    Closed,
}

impl fmt::Display for ChantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChantError::Io(e, path) => write!(f, "could not open {}: {e}", path.display()),
            ChantError::Decode(msg) => write!(f, "could not decode chant audio: {msg}"),
            ChantError::NoAudioTrack(path) => write!(f, "no audio track in {}", path.display()),
            ChantError::NoOutputDevice => write!(f, "no audio output device"),
            ChantError::Stream(msg) => write!(f, "audio stream error: {msg}"),
            ChantError::Closed => write!(f, "audio context is closed"),
        }
    }
}

impl std::error::Error for ChantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChantError::Io(e, _) => Some(e),
            _ => None,
        }
    }
}

impl From<symphonia::core::errors::Error> for ChantError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        ChantError::Decode(e.to_string())
    }
}
