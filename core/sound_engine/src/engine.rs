use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::clip::Clip;
use crate::clip::clip_id::ClipId;
use crate::error::SoundError;
use crate::output::AudioOutput;
use crate::output::cpal_out::CpalAudioOutput;
use crate::playback::PlaybackController;
use crate::registry::PinRegistry;

/// The embedding-facing surface: `load`/`play`/`stop` plus a periodic
/// `update` tick. Thin call-throughs into the playback controllers and
/// the pin registry; no logic of its own.
pub struct SoundEngine {
    output: Box<dyn AudioOutput>,
    sounds: HashMap<ClipId, PlaybackController>,
    registry: PinRegistry,
}

impl SoundEngine {
    pub fn new() -> Self {
        Self::with_output(Box::new(CpalAudioOutput::new()))
    }

    /// Build against any output implementation. Lets tests stand in for
    /// the platform queue.
    pub fn with_output(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            sounds: HashMap::new(),
            registry: PinRegistry::new(),
        }
    }

    /// Decode the whole file into memory and register it for playback.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<ClipId, SoundError> {
        let clip = Clip::from_file(path)?;
        let id = clip.id().clone();
        self.sounds
            .insert(id.clone(), PlaybackController::new(Arc::new(clip)));
        Ok(id)
    }

    /// Start (or restart) playback and pin the clip for the session.
    pub fn play(&mut self, id: &ClipId) -> Result<(), SoundError> {
        let controller = self
            .sounds
            .get_mut(id)
            .ok_or_else(|| SoundError::UnknownClip(id.clone()))?;
        controller.start(self.output.as_mut())?;
        self.registry.pin(Arc::clone(controller.clip()));
        Ok(())
    }

    pub fn stop(&mut self, id: &ClipId) -> Result<(), SoundError> {
        let controller = self
            .sounds
            .get_mut(id)
            .ok_or_else(|| SoundError::UnknownClip(id.clone()))?;
        controller.stop();
        Ok(())
    }

    /// Periodic tick: sync every controller with its queue status, then
    /// sweep the pin registry.
    pub fn update(&mut self) {
        for controller in self.sounds.values_mut() {
            controller.poll();
        }
        self.registry.sweep();
    }

    /// Tear the clip down: the queue is disposed synchronously and the
    /// engine's reference dropped. The pin registry releases its own
    /// reference on the next sweep.
    pub fn unload(&mut self, id: &ClipId) -> Result<(), SoundError> {
        let controller = self
            .sounds
            .remove(id)
            .ok_or_else(|| SoundError::UnknownClip(id.clone()))?;
        controller.teardown();
        Ok(())
    }

    pub fn is_playing(&self, id: &ClipId) -> bool {
        self.sounds.get(id).is_some_and(PlaybackController::is_active)
    }

    pub fn registry(&self) -> &PinRegistry {
        &self.registry
    }
}

impl Default for SoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SoundEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundEngine")
            .field("sounds", &self.sounds.len())
            .field("pinned", &self.registry.len())
            .finish_non_exhaustive()
    }
}
