//! # NMEA filter
//!
//! nmea-filter selects one type of NMEA 0183 sentence out of the output of a
//! GNSS receiver. A receiver typically transmits a burst of different
//! sentences every second over a serial port, such as
//!
//! ```text
//! $GPGGA,064913.119,,,,,0,0,,,M,,M,,*48
//! $GPGLL,,,,,064913.119,V,N*7A
//! $GPGSA,A,1,,,,,,,,,,,,,,,*1E
//! $GPRMC,064913.119,V,,,,,0.00,0.00,100180,,,N*45
//! ```
//!
//! and often only one of them is of interest. The [`SentenceFilter`] scans the
//! byte stream for sentences and forwards verbatim only those whose [`Tag`]
//! matches a target. The leading `$` is dropped, so the example above
//! filtered for `GPGGA` gives
//!
//! ```text
//! GPGGA,064913.119,,,,,0,0,,,M,,M,,*48
//! ```
//!
//! Checksums and sentence fields are not checked or parsed.
//!
//! The filter reads from a [`ByteSource`](channel::ByteSource) and writes to a
//! [`ByteSink`](channel::ByteSink). The sentence being forwarded is held in a
//! bounded scratch buffer whose size is chosen at compile time through the
//! [`StaticStorage`](storage::StaticStorage) trait. Sentences that do not fit
//! are dropped.
//!
//! This crate does not depend on `std` and can be used in small embedded
//! microcontrollers. An example of this is given in the
//! `nmea-filter-longan-nano` crate.
//!
//! ## Logging
//!
//! The nmea-filter crate uses the [log](https://docs.rs/log/latest/log/)
//! crate to log events related to the processing of the stream.
//!
//! ## Features
//!
//! When built with the default features, the crate does not require
//! `std`. Additionally, the crate supports the following features:
//! * `std`. This enables the [`io`] module, which adapts `std::io` streams to
//!    byte channels.
//! * `cli`. This builds the `nmea-filter` command line tool, which filters
//!    sentences from a serial port or the standard input.

#![warn(missing_docs)]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

pub mod buffer;
pub mod channel;
mod filter;
pub use filter::{FilterError, FilterStats, SentenceFilter, State};
#[cfg(feature = "std")]
pub mod io;
pub mod storage;
mod tag;
pub use tag::{Tag, TagError};
pub mod types;
