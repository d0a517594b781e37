//! Fixed-capacity, NUL-terminated byte buffer.
//!
//! A [`BoundedBuffer`] of capacity `C` holds at most `C - 1` payload bytes
//! followed by a single NUL terminator. Every write path checks the bound
//! before touching the storage, so the buffer can be handed to a C routine
//! that expects `char buf[C]` without risk of overrun.

use std::ffi::CStr;

use crate::error::DecodeError;

/// Capacity used when a registration does not declare one.
pub const DEFAULT_CAPACITY: usize = 100;

/// Largest capacity a registration may declare (64 KiB).
pub const MAX_CAPACITY: usize = 64 * 1024;

/// Call-scoped byte buffer with an explicit capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedBuffer {
    /// Payload followed by exactly one NUL.
    data: Vec<u8>,
    capacity: usize,
}

impl BoundedBuffer {
    /// Create an empty buffer. A capacity below 1 is raised to 1, the
    /// space needed for the terminator alone.
    ///
    /// Storage grows with the payload; the capacity is only a bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0],
            capacity: capacity.max(1),
        }
    }

    /// Build a buffer from a complete payload.
    ///
    /// The length check happens before any byte is copied.
    pub fn from_bytes(bytes: &[u8], capacity: usize) -> Result<Self, DecodeError> {
        let mut buf = Self::new(capacity);
        if bytes.len() > buf.max_len() {
            return Err(DecodeError::TooLong {
                len: bytes.len(),
                capacity: buf.capacity,
            });
        }
        if let Some(index) = bytes.iter().position(|&b| b == 0) {
            return Err(DecodeError::InteriorNul { index });
        }
        let mut data = Vec::with_capacity(bytes.len() + 1);
        data.extend_from_slice(bytes);
        data.push(0);
        buf.data = data;
        Ok(buf)
    }

    /// Append one byte, keeping the terminator in place.
    pub fn push(&mut self, byte: u8) -> Result<(), DecodeError> {
        if byte == 0 {
            return Err(DecodeError::InteriorNul { index: self.len() });
        }
        if self.len() >= self.max_len() {
            return Err(DecodeError::TooLong {
                len: self.len() + 1,
                capacity: self.capacity,
            });
        }
        let nul = self.data.len() - 1;
        self.data.insert(nul, byte);
        Ok(())
    }

    /// Reserve room for `additional` more payload bytes, never beyond the bound.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional.min(self.max_len() - self.len()));
    }

    /// Total capacity including the terminator.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest payload this buffer accepts.
    pub fn max_len(&self) -> usize {
        self.capacity - 1
    }

    /// Payload length, terminator excluded.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payload bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Payload bytes followed by the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// View as a C string.
    pub fn as_c_str(&self) -> &CStr {
        // Interior NULs are rejected on every write path.
        CStr::from_bytes_until_nul(&self.data).unwrap_or_default()
    }
}
