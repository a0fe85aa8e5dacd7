use std::{error, fmt};

use crate::clip::clip_id::ClipId;

/// Errors surfaced by the engine. Load failures are fatal to the call;
/// platform problems after playback has started are logged and playback
/// continues best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundError {
    /// The file was missing, unreadable, or not a decodable format.
    DecodeFailure(String),
    DeviceNotFound,
    QueueBuildFailed(String),
    QueueStartFailed(String),
    QueueStopFailed(String),
    UnknownClip(ClipId),
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeFailure(msg) => write!(f, "failed to decode audio: {msg}"),
            Self::DeviceNotFound => write!(f, "no default audio output device"),
            Self::QueueBuildFailed(msg) => write!(f, "failed to build output queue: {msg}"),
            Self::QueueStartFailed(msg) => write!(f, "failed to start output queue: {msg}"),
            Self::QueueStopFailed(msg) => write!(f, "failed to stop output queue: {msg}"),
            Self::UnknownClip(id) => write!(f, "unknown clip id {id}"),
        }
    }
}

impl error::Error for SoundError {}
