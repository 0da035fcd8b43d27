//! Adapters for `std::io` streams.
//!
//! [`IoSource`] and [`IoSink`] wrap any [`Read`] and [`Write`] so that they
//! can be used as byte channels for the sentence filter. This is how serial
//! ports, files, and the standard streams are connected to it.

use crate::channel::{ByteSink, ByteSource};
use std::io::{ErrorKind, Read, Write};

/// Byte source reading from a [`Read`].
///
/// Reads one byte at a time, so the reader should usually be wrapped in a
/// [`BufReader`](std::io::BufReader). Reads that fail with
/// [`ErrorKind::Interrupted`] are retried. The end of the stream is reported
/// as an [`ErrorKind::UnexpectedEof`] error.
#[derive(Debug)]
pub struct IoSource<R> {
    read: R,
}

impl<R: Read> IoSource<R> {
    /// Creates a new source that reads from `read`.
    pub fn new(read: R) -> IoSource<R> {
        IoSource { read }
    }

    /// Consumes the source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.read
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    type Error = std::io::Error;

    fn read_byte(&mut self) -> std::io::Result<u8> {
        let mut byte = [0u8];
        loop {
            match self.read.read(&mut byte) {
                Ok(0) => return Err(ErrorKind::UnexpectedEof.into()),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Byte sink writing to a [`Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    write: W,
}

impl<W: Write> IoSink<W> {
    /// Creates a new sink that writes to `write`.
    pub fn new(write: W) -> IoSink<W> {
        IoSink { write }
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    type Error = std::io::Error;

    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        self.write.write_all(&[byte])
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.write.write_all(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.write.flush()
    }
}
