//! Byte-to-line framing with idle timeout
//!
//! Accumulates received bytes into a fixed buffer until a line feed arrives.
//! Carriage returns are dropped, bytes past the buffer capacity are dropped,
//! and a partial line that stalls for longer than the configured timeout is
//! discarded so the next transmission starts clean.

/// Maximum bytes stored per line (one slot is reserved, as for a terminator)
pub const BUFFER_SIZE: usize = 128;

/// Default idle time after which a partial line is discarded
pub const LINE_TIMEOUT_MS: u64 = 5000;

/// Line framer over a fixed-size receive buffer
#[derive(Debug, Clone)]
pub struct LineFramer {
    buffer: [u8; BUFFER_SIZE],
    cursor: usize,
    last_activity_ms: u64,
    timeout_ms: u64,
}

impl LineFramer {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            buffer: [0u8; BUFFER_SIZE],
            cursor: 0,
            last_activity_ms: 0,
            timeout_ms,
        }
    }

    /// Number of bytes of the line currently being accumulated
    pub fn pending(&self) -> usize {
        self.cursor
    }

    /// Bytes of the line currently being accumulated
    pub fn pending_bytes(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms
    }

    /// Feed one received byte. Returns the complete line when `byte` ends one.
    ///
    /// Empty lines are never returned. The returned slice is valid until the
    /// next call that mutates the framer.
    pub fn feed(&mut self, byte: u8, now_ms: u64) -> Option<&[u8]> {
        self.last_activity_ms = now_ms;

        match byte {
            b'\n' => {
                if self.cursor == 0 {
                    return None;
                }
                let len = self.cursor;
                self.cursor = 0;
                log::debug!(
                    "Complete line ({} chars): {}",
                    len,
                    String::from_utf8_lossy(&self.buffer[..len])
                );
                Some(&self.buffer[..len])
            }
            b'\r' => None,
            _ => {
                if self.cursor < BUFFER_SIZE - 1 {
                    self.buffer[self.cursor] = byte;
                    self.cursor += 1;
                }
                None
            }
        }
    }

    /// Discard a stalled partial line
    ///
    /// Returns true if the buffer held data and the idle time since the last
    /// received byte exceeded the timeout.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.cursor > 0 && now_ms.saturating_sub(self.last_activity_ms) > self.timeout_ms {
            log::warn!(
                "Line timeout({}s), clearing buffer ({} chars)",
                self.timeout_ms / 1000,
                self.cursor
            );
            self.cursor = 0;
            self.last_activity_ms = now_ms;
            return true;
        }
        false
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new(LINE_TIMEOUT_MS)
    }
}
