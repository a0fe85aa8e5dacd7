use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rtrb::{Consumer, RingBuffer};

use crate::clip::Clip;
use crate::constants::{PRIME_BUFFER_COUNT, QUEUE_BUFFER_FRAMES, STATUS_RING_CAPACITY};
use crate::error::SoundError;
use crate::output::{AudioOutput, OutputQueue};
use crate::playback::renderer::{QueueRenderer, QueueStatus};

pub mod renderer;

/// Lifecycle of a clip's output queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Priming,
    Running,
    Stopping,
}

/// Drives one clip's output queue: primes the buffer pool, starts and
/// stops the queue, and keeps its state in sync with the queue's own
/// status notifications.
pub struct PlaybackController {
    clip: Arc<Clip>,
    queue: Option<Box<dyn OutputQueue>>,
    status: Option<Consumer<QueueStatus>>,
    state: QueueState,
}

impl PlaybackController {
    pub fn new(clip: Arc<Clip>) -> Self {
        Self {
            clip,
            queue: None,
            status: None,
            state: QueueState::Idle,
        }
    }

    pub fn clip(&self) -> &Arc<Clip> {
        &self.clip
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    /// True from a successful start until the queue's stop notification
    /// has been observed by `poll`.
    pub fn is_active(&self) -> bool {
        self.state != QueueState::Idle
    }

    /// Begin a play session: prime the buffer pool through the filler,
    /// open an output queue, and start it. A no-op while already running
    /// with no stop pending. If a previous session is still draining, its
    /// queue is disposed synchronously and a fresh session replays the
    /// clip from the beginning.
    pub fn start(&mut self, output: &mut dyn AudioOutput) -> Result<(), SoundError> {
        if self.queue.is_some() && self.clip.is_running() && !self.clip.stop_pending() {
            return Ok(());
        }

        if self.queue.take().is_some() {
            self.status = None;
            log::debug!(
                "clip {}: replacing a draining queue with a new session",
                self.clip.id()
            );
        }

        self.clip.begin_playback();
        self.state = QueueState::Priming;

        let (status_tx, status_rx) = RingBuffer::new(STATUS_RING_CAPACITY);
        let samples_per_buffer = QUEUE_BUFFER_FRAMES * usize::from(self.clip.format().channels);
        let mut primed = VecDeque::with_capacity(PRIME_BUFFER_COUNT);
        for _ in 0..PRIME_BUFFER_COUNT {
            let mut buffer = vec![0.0_f32; samples_per_buffer];
            let res = self.clip.fill(&mut buffer);
            buffer.truncate(res.written);
            if !buffer.is_empty() {
                primed.push_back(buffer);
            }
            if res.should_stop {
                break;
            }
        }

        let renderer = QueueRenderer::new(Arc::clone(&self.clip), primed, status_tx);
        let mut queue = match output.open_queue(renderer, self.clip.format()) {
            Ok(queue) => queue,
            Err(e) => {
                self.clip.force_stopped();
                self.state = QueueState::Idle;
                return Err(e);
            }
        };
        if let Err(e) = queue.start() {
            self.clip.force_stopped();
            self.state = QueueState::Idle;
            return Err(e);
        }

        self.queue = Some(queue);
        self.status = Some(status_rx);
        self.state = QueueState::Running;
        log::debug!("clip {} playback started", self.clip.id());
        Ok(())
    }

    /// Flag the stop and rewind; the queue transitions to stopped
    /// asynchronously, confirmed by its status notification.
    pub fn stop(&mut self) {
        if self.queue.is_none() {
            return;
        }
        self.clip.request_stop();
        self.state = QueueState::Stopping;
        log::debug!("clip {} stop requested", self.clip.id());
    }

    /// Drain status notifications and finalize a stopped session. The
    /// queue's own notification is what clears the session, never the
    /// stop request itself.
    pub fn poll(&mut self) {
        let Some(status) = self.status.as_mut() else {
            return;
        };
        let mut stopped = false;
        while let Ok(event) = status.pop() {
            match event {
                QueueStatus::Stopped => stopped = true,
            }
        }
        if !stopped {
            return;
        }
        if self.clip.is_running() {
            // stale notification from a session that was re-armed before
            // it finished draining
            return;
        }

        if let Some(mut queue) = self.queue.take() {
            if let Err(e) = queue.stop() {
                log::warn!("failed to stop drained queue for clip {}: {e}", self.clip.id());
            }
        }
        self.status = None;
        self.state = QueueState::Idle;
        log::debug!("clip {} playback finished", self.clip.id());
    }

    /// Dispose the queue synchronously and clear all playback state. No
    /// fill runs after this returns.
    pub fn teardown(mut self) {
        self.clip.request_stop();
        self.queue.take();
        self.status.take();
        self.clip.force_stopped();
        self.state = QueueState::Idle;
        log::debug!("clip {} torn down", self.clip.id());
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("clip", self.clip.id())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
