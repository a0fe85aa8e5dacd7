use std::collections::HashMap;
use std::sync::Arc;

use crate::clip::Clip;
use crate::clip::clip_id::ClipId;

/// Holds a strong reference to every clip currently playing, so the backing
/// PCM buffer outlives the queue callbacks no matter what the caller does
/// with its own handle. Control thread only; `sweep` is meant to run once
/// per embedding-application tick.
#[derive(Debug, Default)]
pub struct PinRegistry {
    pinned: HashMap<ClipId, Arc<Clip>>,
}

impl PinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the clip under its id. Idempotent within a play session.
    pub fn pin(&mut self, clip: Arc<Clip>) {
        self.pinned.entry(clip.id().clone()).or_insert(clip);
    }

    /// Release every pin whose clip is no longer running. A running clip
    /// is never released.
    pub fn sweep(&mut self) {
        let before = self.pinned.len();
        self.pinned.retain(|_, clip| clip.is_running());
        let released = before - self.pinned.len();
        if released > 0 {
            log::debug!("released {released} playback pin(s)");
        }
    }

    pub fn is_pinned(&self, id: &ClipId) -> bool {
        self.pinned.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty()
    }
}
