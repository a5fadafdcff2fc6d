//! Sliding window (ring buffer) for the streaming LZ decoders.
//!
//! LZ10 and LZ11 back-references reach at most 4,096 bytes behind the
//! current output position, so decoders keep a circular history of what they
//! have written instead of buffering the whole output.

/// Window size shared by LZ10 and LZ11.
pub const LZ_WINDOW: usize = 0x1000;

/// A circular byte history with mask-based indexing.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    buffer: Vec<u8>,
    position: usize,
    size: usize,
    mask: usize,
}

impl SlidingWindow {
    /// Create a window of `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or not a power of two.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "window capacity must be a power of 2, got {}",
            capacity
        );
        Self {
            buffer: vec![0; capacity],
            position: 0,
            size: 0,
            mask: capacity - 1,
        }
    }

    /// Create the 4 KiB window used by LZ10 and LZ11.
    pub fn lz() -> Self {
        Self::new(LZ_WINDOW)
    }

    /// Bytes of history currently available (up to the capacity).
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Record one output byte.
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.position] = byte;
        self.position = (self.position + 1) & self.mask;
        if self.size < self.buffer.len() {
            self.size += 1;
        }
    }

    /// The byte written `distance` positions ago, or `None` when the
    /// distance is zero or exceeds the available history.
    ///
    /// Pattern runs (length greater than distance) fall out naturally:
    /// callers re-`push` each copied byte, so the read position replays what
    /// the copy itself produced.
    pub fn read_at_distance(&self, distance: usize) -> Option<u8> {
        if distance == 0 || distance > self.size {
            return None;
        }
        Some(self.buffer[(self.position.wrapping_sub(distance)) & self.mask])
    }
}
