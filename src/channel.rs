//! Byte channels.
//!
//! The sentence filter does not talk to the hardware directly. It reads the
//! receiver output from a [`ByteSource`] and writes the forwarded sentences
//! to a [`ByteSink`]. Both calls are expected to block until the byte can be
//! transferred, as a polled UART does.
//!
//! Implementations are given for byte slices (as a source) and for `Vec<u8>`
//! (as a sink). The [`io`](crate::io) module, available with the `std`
//! feature, adapts `std::io` streams such as serial ports.

use core::fmt;

/// Blocking source of bytes.
pub trait ByteSource {
    /// Error returned when a byte cannot be read.
    type Error;

    /// Reads a single byte.
    ///
    /// This blocks until a byte is available.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Blocking sink of bytes.
pub trait ByteSink {
    /// Error returned when a byte cannot be written.
    type Error;

    /// Writes a single byte.
    ///
    /// This blocks until the channel can accept the byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Writes all the bytes of a slice in order.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Flushes any bytes held by the sink.
    ///
    /// The default implementation does nothing.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> Result<u8, T::Error> {
        (**self).read_byte()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    type Error = T::Error;

    fn write_byte(&mut self, byte: u8) -> Result<(), T::Error> {
        (**self).write_byte(byte)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), T::Error> {
        (**self).write_all(bytes)
    }

    fn flush(&mut self) -> Result<(), T::Error> {
        (**self).flush()
    }
}

/// Reading a byte slice consumes it from the front.
impl ByteSource for &[u8] {
    type Error = EndOfInput;

    fn read_byte(&mut self) -> Result<u8, EndOfInput> {
        let (&first, rest) = self.split_first().ok_or(EndOfInput {})?;
        *self = rest;
        Ok(first)
    }
}

#[cfg(any(feature = "std", test))]
impl ByteSink for Vec<u8> {
    type Error = core::convert::Infallible;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.push(byte);
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// End of input error.
///
/// This is returned by a byte slice source once all its bytes have been read.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct EndOfInput {}

impl fmt::Display for EndOfInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "end of input")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EndOfInput {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slice_source() {
        let mut source = &b"$GP"[..];
        assert_eq!(source.read_byte(), Ok(b'$'));
        assert_eq!(source.read_byte(), Ok(b'G'));
        assert_eq!(source.read_byte(), Ok(b'P'));
        assert_eq!(source.read_byte(), Err(EndOfInput {}));
        assert_eq!(source.read_byte(), Err(EndOfInput {}));
    }

    #[test]
    fn vec_sink() {
        let mut sink = Vec::new();
        sink.write_byte(b'G').unwrap();
        sink.write_all(b"PGGA\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink, b"GPGGA\n");
    }

    #[test]
    fn through_mut_ref() {
        fn copy<R: ByteSource, W: ByteSink>(mut source: R, mut sink: W) {
            while let Ok(b) = source.read_byte() {
                if sink.write_byte(b).is_err() {
                    break;
                }
            }
        }

        let mut source = &b"abc"[..];
        let mut sink = Vec::new();
        copy(&mut source, &mut sink);
        assert!(source.is_empty());
        assert_eq!(sink, b"abc");
    }
}
