pub mod clip_id;

use std::io::Read;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hound::WavReader;
use uuid::Uuid;

use crate::clip::clip_id::ClipId;
use crate::constants::DECODE_CHUNK_SAMPLES;
use crate::error::SoundError;
use crate::filler::{self, FillResult};

/// Sample layout of a loaded clip, fixed at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipFormat {
    pub sample_rate: u32,
    /// Channel count after normalization; always 2.
    pub channels: u16,
    pub bytes_per_frame: u16,
}

/// Mutable playback fields. Everything else on a clip is immutable after
/// load, so this is the only data that needs the per-clip lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayState {
    /// Next unread sample offset into the PCM buffer.
    pub cursor: usize,
    /// True between a successful start and a confirmed stop. Cleared by the
    /// terminal fill, never by the stop request itself.
    pub running: bool,
    /// Set by an explicit stop call; consumed by the next fill.
    pub stop_requested: bool,
}

/// `Clip` is an in-memory, stereo-normalized PCM buffer decoded from a
/// `.wav` file, plus the playback cursor the buffer filler advances.
///
/// Supports:
/// - Mono and Stereo files (mono is duplicated into both channels)
/// - 16-bit integer or 32-bit float samples (converted to `f32`)
///
/// Does NOT support:
/// - More than 2 channels
/// - Resampling (clips play at the device rate)
///
/// Decoding happens once, synchronously, at load time; playback never
/// touches the decoder.
#[derive(Debug)]
pub struct Clip {
    id: ClipId,
    name: String,
    format: ClipFormat,
    /// Interleaved stereo PCM; immutable after load.
    samples: Vec<f32>,
    state: Mutex<PlayState>,
}

impl Clip {
    fn from_reader<R: Read>(reader: WavReader<R>, name: &str) -> Result<Self, SoundError> {
        let spec = reader.spec();
        if spec.channels == 0 || spec.channels > 2 {
            return Err(SoundError::DecodeFailure(
                "only mono or stereo clips are supported".to_owned(),
            ));
        }

        let samples = Self::decode_pcm_samples(reader)?;
        log::info!(
            "loaded clip {name}: {} frames at {} Hz",
            samples.len() / 2,
            spec.sample_rate
        );

        Ok(Self {
            id: Uuid::new_v4().into(),
            name: name.to_owned(),
            format: ClipFormat {
                sample_rate: spec.sample_rate,
                channels: 2,
                bytes_per_frame: 2 * size_of::<f32>() as u16,
            },
            samples,
            state: Mutex::new(PlayState::default()),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SoundError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| "clip".to_owned(), |n| n.to_string_lossy().into_owned());
        let reader = WavReader::open(path)
            .map_err(|e| SoundError::DecodeFailure(format!("{}: {e}", path.display())))?;
        Self::from_reader(reader, &name)
    }

    pub fn from_stream<R: Read>(stream: R) -> Result<Self, SoundError> {
        let reader =
            WavReader::new(stream).map_err(|e| SoundError::DecodeFailure(e.to_string()))?;
        Self::from_reader(reader, "stream")
    }

    fn decode_pcm_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>, SoundError> {
        let spec = reader.spec();
        let raw = match spec.sample_format {
            hound::SampleFormat::Int => Self::collect_chunked(
                reader
                    .into_samples::<i16>()
                    .map(|s| s.map(|v| f32::from(v) / f32::from(i16::MAX))),
            )?,
            hound::SampleFormat::Float => Self::collect_chunked(reader.into_samples::<f32>())?,
        };
        Ok(Self::interleave_channels(raw, spec.channels))
    }

    /// Grow the buffer one fixed-size chunk at a time until the decoder
    /// yields nothing more.
    fn collect_chunked<I>(mut samples: I) -> Result<Vec<f32>, SoundError>
    where
        I: Iterator<Item = hound::Result<f32>>,
    {
        let mut buffer = Vec::new();
        loop {
            let chunk = samples
                .by_ref()
                .take(DECODE_CHUNK_SAMPLES)
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| SoundError::DecodeFailure(e.to_string()))?;
            if chunk.is_empty() {
                break;
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer)
    }

    /// Converts raw f32 samples into interleaved stereo frames.
    /// Mono is duplicated into both channels.
    fn interleave_channels(samples: Vec<f32>, channels: u16) -> Vec<f32> {
        match channels {
            1 => samples.into_iter().flat_map(|s| [s, s]).collect(),
            _ => {
                let mut samples = samples;
                samples.truncate(samples.len() & !1);
                samples
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PlayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &ClipId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> ClipFormat {
        self.format
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.format.channels)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn byte_len(&self) -> usize {
        self.samples.len() * size_of::<f32>()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.format.sample_rate)
    }

    /// Sample offset the next fill reads from.
    pub fn position(&self) -> usize {
        self.lock_state().cursor
    }

    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    pub fn stop_pending(&self) -> bool {
        self.lock_state().stop_requested
    }

    /// Rewind to the start without touching the run flags.
    pub fn reset(&self) {
        self.lock_state().cursor = 0;
    }

    /// Mark the clip running for a new play session.
    pub(crate) fn begin_playback(&self) {
        let mut state = self.lock_state();
        state.stop_requested = false;
        state.running = true;
    }

    /// Request a stop and rewind immediately so a restart replays from the
    /// beginning. The run flag clears when the terminal fill observes this,
    /// not here.
    pub fn request_stop(&self) {
        let mut state = self.lock_state();
        if state.running {
            state.stop_requested = true;
            state.cursor = 0;
        }
    }

    /// Teardown path: clear all playback state unconditionally.
    pub(crate) fn force_stopped(&self) {
        let mut state = self.lock_state();
        state.running = false;
        state.stop_requested = false;
        state.cursor = 0;
    }

    /// Copy the next chunk of PCM into `out`. See [`filler::fill_chunk`].
    pub fn fill(&self, out: &mut [f32]) -> FillResult {
        let mut state = self.lock_state();
        filler::fill_chunk(&self.samples, &mut state, out)
    }

    #[cfg(test)]
    pub fn from_raw_samples(samples: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().into(),
            name: "raw-samples.wav".to_owned(),
            format: ClipFormat {
                sample_rate: 44_100,
                channels: 2,
                bytes_per_frame: 8,
            },
            samples,
            state: Mutex::new(PlayState::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hound::{SampleFormat, WavSpec, WavWriter};

    use super::*;

    fn wav_spec(channels: u16) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    fn create_wav_buffer(spec: WavSpec, samples: &[i16]) -> Cursor<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut buffer, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        buffer.set_position(0);
        buffer
    }

    #[test]
    fn load_records_length_and_cursor_starts_at_zero() {
        let clip = Clip::from_stream(create_wav_buffer(wav_spec(2), &[1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(clip.position(), 0);
        assert_eq!(clip.frame_count(), 3);
        assert_eq!(clip.sample_count(), 6);
        assert_eq!(clip.byte_len(), 3 * usize::from(clip.format().bytes_per_frame));
        assert!(!clip.is_running());
    }

    #[test]
    fn format_is_fixed_at_load() {
        let clip = Clip::from_stream(create_wav_buffer(wav_spec(2), &[0; 4])).unwrap();
        assert_eq!(
            clip.format(),
            ClipFormat {
                sample_rate: 44_100,
                channels: 2,
                bytes_per_frame: 8,
            }
        );
    }

    #[test]
    fn mono_expands_to_stereo() {
        let clip = Clip::from_stream(create_wav_buffer(wav_spec(1), &[1000, -1000])).unwrap();
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.samples[0], clip.samples[1]); // L = R
        assert_eq!(clip.samples[2], clip.samples[3]);
    }

    #[test]
    fn too_many_channels_fail_to_decode() {
        let result = Clip::from_stream(create_wav_buffer(wav_spec(3), &[0; 6]));
        assert!(matches!(result, Err(SoundError::DecodeFailure(_))));
    }

    #[test]
    fn missing_file_is_a_decode_failure() {
        let result = Clip::from_file("./no-such-clip.wav");
        assert!(matches!(result, Err(SoundError::DecodeFailure(_))));
    }

    #[test]
    fn undecodable_file_is_a_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.wav");
        std::fs::write(&path, b"not really a wav file").unwrap();
        assert!(matches!(
            Clip::from_file(&path),
            Err(SoundError::DecodeFailure(_))
        ));
    }

    #[test]
    fn load_from_disk_reads_every_frame() {
        // 5000 stereo frames is 10000 samples, crossing a decode chunk boundary
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let mut writer = WavWriter::create(&path, wav_spec(2)).unwrap();
        for i in 0..5000_i16 {
            writer.write_sample(i).unwrap();
            writer.write_sample(-i).unwrap();
        }
        writer.finalize().unwrap();

        let clip = Clip::from_file(&path).unwrap();
        assert_eq!(clip.frame_count(), 5000);
        assert_eq!(clip.name(), "tone.wav");
    }

    #[test]
    fn stop_then_start_replays_from_the_first_sample() {
        let clip = Clip::from_raw_samples((0..12).map(|i| i as f32).collect());
        clip.begin_playback();
        let mut out = [0.0_f32; 4];
        clip.fill(&mut out);
        assert_eq!(clip.position(), 4);

        clip.request_stop();
        assert_eq!(clip.position(), 0);
        clip.begin_playback();
        let res = clip.fill(&mut out);
        assert_eq!(res.written, 4);
        assert_eq!(out, [0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn reset_rewinds_without_stopping() {
        let clip = Clip::from_raw_samples(vec![0.5; 16]);
        clip.begin_playback();
        let mut out = [0.0_f32; 8];
        clip.fill(&mut out);
        assert_eq!(clip.position(), 8);

        clip.reset();
        assert_eq!(clip.position(), 0);
        assert!(clip.is_running());
    }
}
