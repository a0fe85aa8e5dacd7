use crate::clip::PlayState;

/// Outcome of filling one output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillResult {
    /// Samples copied into the buffer; never more than its capacity.
    pub written: usize,
    /// True exactly on the terminal chunk of a play session.
    pub should_stop: bool,
}

/// Copy the next run of PCM out of `samples` into `out` and advance the
/// cursor.
///
/// The terminal chunk rewinds the cursor and clears the run flags, so the
/// next play session starts fresh from the beginning. An explicit stop is
/// immediate and delivers no samples; a natural end still delivers its
/// trailing samples in the same call that signals the stop. Calling again
/// after the terminal chunk, without an intervening start, is another
/// empty terminal chunk.
pub fn fill_chunk(samples: &[f32], state: &mut PlayState, out: &mut [f32]) -> FillResult {
    if !state.running || state.stop_requested {
        state.cursor = 0;
        state.stop_requested = false;
        state.running = false;
        return FillResult {
            written: 0,
            should_stop: true,
        };
    }

    let remaining = samples.len() - state.cursor;
    let written = remaining.min(out.len());
    out[..written].copy_from_slice(&samples[state.cursor..state.cursor + written]);
    state.cursor += written;

    if state.cursor == samples.len() {
        state.cursor = 0;
        state.running = false;
        return FillResult {
            written,
            should_stop: true,
        };
    }

    FillResult {
        written,
        should_stop: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    fn running_state() -> PlayState {
        PlayState {
            cursor: 0,
            running: true,
            stop_requested: false,
        }
    }

    #[test]
    fn never_writes_more_than_capacity() {
        let samples = ramp(10);
        let mut state = running_state();
        let mut out = [0.0_f32; 4];
        let res = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(res.written, 4);
        assert!(!res.should_stop);
        assert_eq!(state.cursor, 4);
    }

    #[test]
    fn sequential_fills_cover_all_samples_then_stop() {
        let samples = ramp(10);
        let mut state = running_state();
        let mut out = [0.0_f32; 4];

        let first = fill_chunk(&samples, &mut state, &mut out);
        let second = fill_chunk(&samples, &mut state, &mut out);
        assert!(!first.should_stop);
        assert!(!second.should_stop);

        // trailing chunk delivers its remaining samples and signals the stop
        let last = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(last.written, 2);
        assert!(last.should_stop);
        assert_eq!(out[..2], samples[8..]);
        assert_eq!(first.written + second.written + last.written, samples.len());

        // exhausted without a restart: terminal again, no samples
        let after = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(after.written, 0);
        assert!(after.should_stop);
    }

    #[test]
    fn exact_multiple_signals_stop_with_full_final_chunk() {
        let samples = ramp(8);
        let mut state = running_state();
        let mut out = [0.0_f32; 4];

        assert!(!fill_chunk(&samples, &mut state, &mut out).should_stop);
        let last = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(last.written, 4);
        assert!(last.should_stop);
        assert_eq!(out[..], samples[4..]);
    }

    #[test]
    fn explicit_stop_is_an_immediate_terminal_chunk() {
        let samples = ramp(8);
        let mut state = running_state();
        let mut out = [0.0_f32; 4];
        fill_chunk(&samples, &mut state, &mut out);

        state.stop_requested = true;
        let res = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(res.written, 0);
        assert!(res.should_stop);
        assert_eq!(state.cursor, 0);
        assert!(!state.running);
        assert!(!state.stop_requested);
    }

    #[test]
    fn terminal_chunk_rewinds_for_the_next_session() {
        let samples = ramp(4);
        let mut state = running_state();
        let mut out = [0.0_f32; 8];
        let res = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(res.written, 4);
        assert!(res.should_stop);
        assert_eq!(state.cursor, 0);

        // restart replays from the first sample
        state.running = true;
        let res = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(res.written, 4);
        assert_eq!(out[..4], samples[..]);
    }

    #[test]
    fn empty_buffer_is_terminal() {
        let samples: Vec<f32> = Vec::new();
        let mut state = running_state();
        let mut out = [0.0_f32; 4];
        let res = fill_chunk(&samples, &mut state, &mut out);
        assert_eq!(res.written, 0);
        assert!(res.should_stop);
        assert!(!state.running);
    }
}
