use cpal::{
    OutputCallbackInfo, Sample,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};

use crate::clip::ClipFormat;
use crate::error::SoundError;
use crate::output::{AudioOutput, OutputQueue};
use crate::playback::renderer::QueueRenderer;

/// Default-device output backed by a cpal stream per queue.
#[derive(Debug, Default)]
pub struct CpalAudioOutput;

impl CpalAudioOutput {
    pub fn new() -> Self {
        Self
    }

    fn build_output_stream<T>(
        device: &cpal::Device,
        config: cpal::SupportedStreamConfig,
        mut renderer: QueueRenderer,
    ) -> Result<cpal::Stream, SoundError>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let error_cb = move |err| {
            log::warn!("output stream error: {err}");
        };

        let channels = usize::from(config.channels());
        let mut scratch: Vec<f32> = Vec::new();
        let data_cb = move |data: &mut [T], _: &OutputCallbackInfo| {
            let frame_count = data.len() / channels;
            scratch.resize(frame_count * 2, 0.0);
            renderer.render(&mut scratch);
            for (i, sample) in data.iter_mut().enumerate() {
                let frame = i / channels;
                let channel = (i % channels).min(1);
                *sample = scratch[frame * 2 + channel].to_sample::<T>();
            }
        };

        device
            .build_output_stream(&config.into(), data_cb, error_cb, None)
            .map_err(|e| SoundError::QueueBuildFailed(e.to_string()))
    }
}

impl AudioOutput for CpalAudioOutput {
    fn open_queue(
        &mut self,
        renderer: QueueRenderer,
        format: ClipFormat,
    ) -> Result<Box<dyn OutputQueue>, SoundError> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(SoundError::DeviceNotFound)?;

        let config = device
            .default_output_config()
            .map_err(|e| SoundError::QueueBuildFailed(e.to_string()))?;

        if config.sample_rate().0 != format.sample_rate {
            log::warn!(
                "device rate {} differs from clip rate {}; playing without resampling",
                config.sample_rate().0,
                format.sample_rate
            );
        }

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_output_stream::<f32>(&device, config, renderer)?
            }
            cpal::SampleFormat::I16 => {
                Self::build_output_stream::<i16>(&device, config, renderer)?
            }
            cpal::SampleFormat::U16 => {
                Self::build_output_stream::<u16>(&device, config, renderer)?
            }
            other => {
                return Err(SoundError::QueueBuildFailed(format!(
                    "unsupported sample format '{other}'"
                )));
            }
        };

        Ok(Box::new(CpalOutputQueue { stream }))
    }
}

/// One cpal stream; dropping it releases the stream and joins any
/// in-flight callback.
pub struct CpalOutputQueue {
    stream: cpal::Stream,
}

impl OutputQueue for CpalOutputQueue {
    fn start(&mut self) -> Result<(), SoundError> {
        self.stream
            .play()
            .map_err(|e| SoundError::QueueStartFailed(e.to_string()))
    }

    fn stop(&mut self) -> Result<(), SoundError> {
        self.stream
            .pause()
            .map_err(|e| SoundError::QueueStopFailed(e.to_string()))
    }
}
