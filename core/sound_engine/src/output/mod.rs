use crate::clip::ClipFormat;
use crate::error::SoundError;
use crate::playback::renderer::QueueRenderer;

pub mod cpal_out;

/// A live platform queue playing one clip's renderer.
///
/// Dropping a queue disposes it synchronously: the drop blocks until any
/// in-flight callback has completed and no further callbacks run.
pub trait OutputQueue {
    fn start(&mut self) -> Result<(), SoundError>;
    fn stop(&mut self) -> Result<(), SoundError>;
}

/// Seam to the platform audio facility.
pub trait AudioOutput {
    fn open_queue(
        &mut self,
        renderer: QueueRenderer,
        format: ClipFormat,
    ) -> Result<Box<dyn OutputQueue>, SoundError>;
}

#[cfg(test)]
pub use manual::ManualAudioOutput;
