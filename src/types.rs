//! Wire constants.
//!
//! An NMEA 0183 sentence as transmitted by a receiver looks like
//! `$GPGGA,064913.119,,,,,0,0,,,M,,M,,*48\r\n`. It starts with
//! [`START_MARKER`], continues with a type tag of [`TAG_BYTES`] bytes
//! (talker and sentence identifier, `GPGGA` in this case), and ends with
//! [`END_MARKER`].

/// Byte that starts every sentence (`$`).
pub const START_MARKER: u8 = b'$';

/// Byte that ends every sentence (line feed).
pub const END_MARKER: u8 = b'\n';

/// Length of the type tag that follows the start marker.
pub const TAG_BYTES: usize = 5;

/// Raw tag bytes.
pub type TagBytes = [u8; TAG_BYTES];
