use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rtrb::Producer;

use crate::clip::Clip;

/// Notification from the callback domain back to the control thread. The
/// controller treats this as the single source of truth for "the queue has
/// stopped delivering audio".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Stopped,
}

/// The callback-domain half of playback: owns the primed buffers and a
/// strong reference to the clip, and fills whatever buffer the output
/// queue hands it.
pub struct QueueRenderer {
    clip: Arc<Clip>,
    /// Buffers pre-filled before the queue started; drained before any
    /// live fill happens.
    primed: VecDeque<Vec<f32>>,
    primed_pos: usize,
    status: Producer<QueueStatus>,
    /// Latched after a stop notification so an idle queue does not flood
    /// the status ring.
    notified: bool,
}

impl QueueRenderer {
    pub(crate) fn new(
        clip: Arc<Clip>,
        primed: VecDeque<Vec<f32>>,
        status: Producer<QueueStatus>,
    ) -> Self {
        Self {
            clip,
            primed,
            primed_pos: 0,
            status,
            notified: false,
        }
    }

    /// Fill `out` with the next stretch of audio, zero-padding whatever is
    /// left once the clip runs out. An explicit stop discards the primed
    /// data so silence takes effect immediately; a natural end lets every
    /// queued sample play out first.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.clip.stop_pending() {
            self.primed.clear();
            self.primed_pos = 0;
        }

        let mut written = 0;
        while written < out.len() {
            let Some(front) = self.primed.front() else {
                break;
            };
            let n = (front.len() - self.primed_pos).min(out.len() - written);
            out[written..written + n]
                .copy_from_slice(&front[self.primed_pos..self.primed_pos + n]);
            written += n;
            self.primed_pos += n;
            if self.primed_pos == front.len() {
                self.primed.pop_front();
                self.primed_pos = 0;
            }
        }

        if written < out.len() {
            let res = self.clip.fill(&mut out[written..]);
            written += res.written;
            if res.written > 0 {
                self.notified = false;
            }
            if res.should_stop && !self.notified {
                self.notified = true;
                if self.status.push(QueueStatus::Stopped).is_err() {
                    log::warn!(
                        "status ring full; dropped stop notification for clip {}",
                        self.clip.id()
                    );
                }
            }
        }

        for sample in &mut out[written..] {
            *sample = 0.0;
        }
    }
}

impl fmt::Debug for QueueRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueRenderer")
            .field("clip", self.clip.id())
            .field("primed", &self.primed.len())
            .finish_non_exhaustive()
    }
}
