//! Byte ports: fixed-size buffers the network touches only through
//! spike-timing codes.
//!
//! A port never hands the network a scalar byte. Reads leave the buffer as a
//! dual-pulse tick offset, writes arrive as a tick difference between two
//! sampling neurons. The port itself only knows about its byte array, a single
//! movable cursor and per-position access instrumentation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the network is allowed to do with a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortAccess {
    Read,
    Write,
    ReadWrite,
}

impl PortAccess {
    #[inline]
    pub fn allows_read(self) -> bool {
        matches!(self, PortAccess::Read | PortAccess::ReadWrite)
    }

    #[inline]
    pub fn allows_write(self) -> bool {
        matches!(self, PortAccess::Write | PortAccess::ReadWrite)
    }
}

/// The I/O behavior a role-bound neuron triggers when it fires.
///
/// Cursor movement that would leave the buffer simply does not happen; the
/// limit notifiers exist so the rest of the network can learn to observe that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortRole {
    /// Reads the byte under the cursor and emits it as a dual-pulse pair.
    CursorRead,
    /// Derives a byte from the sampling pair's spike timing and writes it.
    CursorWrite,
    /// Carries the dual-pulse pair out into the network. Passive target.
    CursorReadOutput,
    /// Sampled by `CursorWrite`; only its last-spike tick matters.
    CursorWriteInputA,
    /// Second half of the sampling pair.
    CursorWriteInputB,
    /// Advances the cursor one byte, saturating at the end.
    CursorIncrementer,
    /// Retreats the cursor one byte, saturating at zero.
    CursorDecrementer,
    /// Receives spikes when the cursor is driven; passive target.
    CursorMaxLimitNotifier,
    /// Receives spikes when the cursor is driven; passive target.
    CursorMinLimitNotifier,
}

/// A byte buffer with one movable cursor, bound to role neurons at network
/// construction time.
#[derive(Debug, Clone)]
pub struct BytePort {
    bytes: Vec<u8>,
    access: PortAccess,
    clear_on_clone: bool,

    cursor: usize,
    read_counts: Vec<u32>,
    write_counts: Vec<u32>,
    first_read_tick: Option<u64>,
    first_write_tick: Option<u64>,
    final_read_tick: Option<u64>,
}

/// Per-port numbers handed to the scoring side after a run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortReport {
    pub len: usize,
    pub bytes: Vec<u8>,
    pub read_coverage: f32,
    pub write_coverage: f32,
    pub first_read_tick: Option<u64>,
    pub first_write_tick: Option<u64>,
    pub final_read_tick: Option<u64>,
}

impl BytePort {
    /// An all-zero port of `size` bytes.
    pub fn new(size: usize, access: PortAccess, clear_on_clone: bool) -> Self {
        Self::from_bytes(vec![0; size], access, clear_on_clone)
    }

    /// A port preloaded with the UTF-8 bytes of `content`.
    pub fn from_text(content: &str, access: PortAccess, clear_on_clone: bool) -> Self {
        Self::from_bytes(content.as_bytes().to_vec(), access, clear_on_clone)
    }

    /// A port preloaded with `content`.
    pub fn from_bytes(content: Vec<u8>, access: PortAccess, clear_on_clone: bool) -> Self {
        let len = content.len();
        Self {
            bytes: content,
            access,
            clear_on_clone,
            cursor: 0,
            read_counts: vec![0; len],
            write_counts: vec![0; len],
            first_read_tick: None,
            first_write_tick: None,
            final_read_tick: None,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn access(&self) -> PortAccess {
        self.access
    }

    pub fn clear_on_clone(&self) -> bool {
        self.clear_on_clone
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn first_read_tick(&self) -> Option<u64> {
        self.first_read_tick
    }

    pub fn first_write_tick(&self) -> Option<u64> {
        self.first_write_tick
    }

    /// Tick at which every position had been read at least once.
    pub fn final_read_tick(&self) -> Option<u64> {
        self.final_read_tick
    }

    /// Zero the content. Instrumentation is left alone.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Advance the cursor. Returns false when already at the last position.
    pub fn increment_cursor(&mut self) -> bool {
        if self.cursor + 1 < self.bytes.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Retreat the cursor. Returns false when already at zero.
    pub fn decrement_cursor(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Read the byte under the cursor at tick `t`.
    ///
    /// On a write-only port this is a no-op returning `None`; the read counter
    /// is not touched.
    pub fn read_at_cursor(&mut self, t: u64) -> Option<u8> {
        if !self.access.allows_read() {
            return None;
        }

        self.read_counts[self.cursor] += 1;

        if self.first_read_tick.is_none() {
            self.first_read_tick = Some(t);
        }
        if self.final_read_tick.is_none() && self.read_counts.iter().all(|&c| c > 0) {
            self.final_read_tick = Some(t);
        }

        Some(self.bytes[self.cursor])
    }

    /// Write `value` under the cursor at tick `t`.
    ///
    /// On a read-only port this is a silent no-op; the write counter is not
    /// touched.
    pub fn write_at_cursor(&mut self, t: u64, value: u8) {
        if !self.access.allows_write() {
            return;
        }

        self.write_counts[self.cursor] += 1;

        if self.first_write_tick.is_none() {
            self.first_write_tick = Some(t);
        }

        self.bytes[self.cursor] = value;
    }

    /// Fraction of positions read at least once.
    pub fn read_coverage_ratio(&self) -> f32 {
        coverage(&self.read_counts)
    }

    /// Fraction of positions written at least once.
    pub fn write_coverage_ratio(&self) -> f32 {
        coverage(&self.write_counts)
    }

    pub fn report(&self) -> PortReport {
        PortReport {
            len: self.bytes.len(),
            bytes: self.bytes.clone(),
            read_coverage: self.read_coverage_ratio(),
            write_coverage: self.write_coverage_ratio(),
            first_read_tick: self.first_read_tick,
            first_write_tick: self.first_write_tick,
            final_read_tick: self.final_read_tick,
        }
    }

    /// Copy for a cloned network: same shape and access, fresh cursor and
    /// instrumentation. Content is zeroed when `clear_on_clone` is set,
    /// duplicated byte-for-byte otherwise.
    pub(crate) fn cloned_for_spawn(&self) -> BytePort {
        let bytes = if self.clear_on_clone {
            vec![0; self.bytes.len()]
        } else {
            self.bytes.clone()
        };
        BytePort::from_bytes(bytes, self.access, self.clear_on_clone)
    }
}

fn coverage(counts: &[u32]) -> f32 {
    if counts.is_empty() {
        return 1.0;
    }
    let touched = counts.iter().filter(|&&c| c > 0).count();
    touched as f32 / counts.len() as f32
}
