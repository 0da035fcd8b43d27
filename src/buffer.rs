//! Bounded scratch buffer.
//!
//! [`ScratchBuffer`] accumulates the bytes of the sentence being processed.
//! Every write is checked against the capacity, so a sentence that is too long
//! is reported as a [`BufferOverflow`] instead of writing past the end of the
//! storage.

use crate::storage::StaticStorageTypenum;
use core::fmt;
use generic_array::GenericArray;

/// Fixed-capacity byte buffer.
///
/// The capacity is given by the `typenum` type parameter `N`, and it is
/// usually taken from a [`StaticStorage`](crate::storage::StaticStorage)
/// implementation.
#[derive(Debug, Clone)]
pub struct ScratchBuffer<N: StaticStorageTypenum> {
    data: GenericArray<u8, N>,
    len: usize,
}

impl<N: StaticStorageTypenum> ScratchBuffer<N> {
    /// Constructs a new, empty buffer.
    pub fn new() -> ScratchBuffer<N> {
        ScratchBuffer {
            data: GenericArray::default(),
            len: 0,
        }
    }

    /// Returns the number of bytes that the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if no more bytes can be pushed.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends a byte.
    ///
    /// If the buffer is full, the buffer is left unmodified and an error is
    /// returned.
    pub fn push(&mut self, byte: u8) -> Result<(), BufferOverflow> {
        if self.is_full() {
            return Err(BufferOverflow {
                capacity: self.capacity(),
            });
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Removes all the bytes stored.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the bytes stored.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl<N: StaticStorageTypenum> Default for ScratchBuffer<N> {
    fn default() -> ScratchBuffer<N> {
        ScratchBuffer::new()
    }
}

/// Buffers are equal if they store the same bytes, regardless of what was
/// stored before the last [`clear`](ScratchBuffer::clear).
impl<N: StaticStorageTypenum> PartialEq for ScratchBuffer<N> {
    fn eq(&self, other: &ScratchBuffer<N>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<N: StaticStorageTypenum> Eq for ScratchBuffer<N> {}

/// Buffer overflow error.
///
/// This error is returned when a byte does not fit in a [`ScratchBuffer`].
/// When it is returned by
/// [`SentenceFilter::feed`](crate::SentenceFilter::feed), the sentence that
/// was being forwarded has been dropped.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BufferOverflow {
    /// Capacity of the buffer that overflowed.
    pub capacity: usize,
}

impl fmt::Display for BufferOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sentence exceeds scratch buffer capacity of {} bytes",
            self.capacity
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BufferOverflow {}
