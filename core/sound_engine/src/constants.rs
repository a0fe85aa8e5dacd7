/// Decoded samples are pulled from the decoder this many values at a time;
/// the clip buffer grows one chunk per pull until the decoder yields nothing.
pub const DECODE_CHUNK_SAMPLES: usize = 8192;

/// Number of buffers pre-filled before the output queue starts.
pub const PRIME_BUFFER_COUNT: usize = 2;

/// Frames per primed buffer.
pub const QUEUE_BUFFER_FRAMES: usize = 1024;

/// Capacity of the queue-status notification ring.
pub const STATUS_RING_CAPACITY: usize = 8;
