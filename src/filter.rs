use crate::buffer::{BufferOverflow, ScratchBuffer};
use crate::channel::{ByteSink, ByteSource};
use crate::storage::{self, StandardStorage, StaticStorage};
use crate::tag::Tag;
use crate::types::{END_MARKER, START_MARKER, TAG_BYTES};
use core::convert::Infallible;
use core::fmt;

/// Sentence filter.
///
/// This is the main struct of the crate. It scans a byte stream for NMEA
/// sentences and forwards only those whose tag equals a target [`Tag`]. A
/// forwarded sentence consists of its tag and body, up to and including the
/// line feed that ends it. The leading `$` is not forwarded.
///
/// Bytes can be pushed one at a time with [`SentenceFilter::feed`], or the
/// filter can drive a pair of byte channels with [`SentenceFilter::run`].
///
/// The type parameter `S` sets the size of the scratch buffer where the
/// sentence being forwarded is accumulated. A matching sentence that does not
/// fit in the buffer is dropped, and the filter goes back to searching for the
/// next `$`.
///
/// # Examples
///
/// ```
/// use nmea_filter::{SentenceFilter, Tag};
///
/// let mut filter: SentenceFilter = SentenceFilter::new(Tag::GPGGA);
/// let mut output = Vec::new();
/// for &b in b"$GPGGA,1,2*00\n$GPGLL,3\n$GPGGA,4\n" {
///     if let Ok(Some(sentence)) = filter.feed(b) {
///         output.extend_from_slice(sentence);
///     }
/// }
/// assert_eq!(output, b"GPGGA,1,2*00\nGPGGA,4\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceFilter<S: StaticStorage = StandardStorage> {
    target: Tag,
    state: State,
    buffer: ScratchBuffer<S::SentenceBytes>,
    stats: FilterStats,
}

/// State of a [`SentenceFilter`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum State {
    /// Discarding bytes until a start marker is found.
    #[default]
    SeekStart,
    /// Reading the tag that follows a start marker.
    ReadTag,
    /// Accumulating a matching sentence until the end marker.
    CopyMatched,
}

/// Sentence filter counters.
///
/// These are updated by [`SentenceFilter`] as it processes the stream and
/// can be obtained with [`SentenceFilter::stats`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct FilterStats {
    /// Number of start markers that began a frame.
    pub frames: u64,
    /// Number of matching sentences forwarded.
    pub forwarded: u64,
    /// Number of frames discarded because their tag did not match.
    pub rejected: u64,
    /// Number of matching sentences dropped because they did not fit in the
    /// scratch buffer.
    pub overflowed: u64,
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames = {}, forwarded = {}, rejected = {}, overflowed = {}",
            self.frames, self.forwarded, self.rejected, self.overflowed
        )
    }
}

impl<S: StaticStorage> SentenceFilter<S> {
    /// Constructs a new filter that forwards the sentences tagged `target`.
    ///
    /// # Panics
    ///
    /// Panics if the scratch buffer of `S` cannot hold a tag followed by an
    /// end marker. This never happens with the storage types defined in
    /// [`storage`](crate::storage).
    pub fn new(target: Tag) -> SentenceFilter<S> {
        assert!(storage::is_usable::<S>());
        SentenceFilter {
            target,
            state: State::default(),
            buffer: ScratchBuffer::new(),
            stats: FilterStats::default(),
        }
    }

    /// Returns the tag of the sentences that are forwarded.
    pub fn target(&self) -> Tag {
        self.target
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Abandons the current frame and goes back to searching for a start
    /// marker.
    ///
    /// The counters are kept.
    pub fn reset(&mut self) {
        log::trace!("reset in state {:?}", self.state);
        self.state = State::SeekStart;
        self.buffer.clear();
    }

    /// Feeds one byte from the stream into the filter.
    ///
    /// When the byte completes a matching sentence, the tag and body of the
    /// sentence (including the end marker) are returned. The returned slice
    /// is only valid until the next call.
    ///
    /// If a matching sentence outgrows the scratch buffer, an error is
    /// returned. The sentence is dropped and the filter starts searching for
    /// the next start marker.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, BufferOverflow> {
        match self.state {
            State::SeekStart => self.seek_start(byte),
            State::ReadTag => {
                // Tag bytes are never checked for markers
                self.append(byte)?;
                if self.buffer.len() == TAG_BYTES {
                    self.check_tag();
                }
            }
            State::CopyMatched => {
                self.append(byte)?;
                if byte == END_MARKER {
                    self.stats.forwarded += 1;
                    self.state = State::SeekStart;
                    log::trace!("forwarding sentence {:02x?}", self.buffer.as_slice());
                    return Ok(Some(self.buffer.as_slice()));
                }
            }
        }
        Ok(None)
    }

    fn seek_start(&mut self, byte: u8) {
        if byte == START_MARKER {
            log::trace!("start of frame");
            self.stats.frames += 1;
            self.buffer.clear();
            self.state = State::ReadTag;
        }
    }

    fn check_tag(&mut self) {
        let tag = self.buffer.as_slice();
        if self.target == *tag {
            log::trace!("matched tag {}", self.target);
            self.state = State::CopyMatched;
        } else {
            log::debug!("discarding frame with tag {}", tag.escape_ascii());
            self.stats.rejected += 1;
            // The rest of the frame is scanned for a new start marker
            self.state = State::SeekStart;
        }
    }

    fn append(&mut self, byte: u8) -> Result<(), BufferOverflow> {
        if let Err(e) = self.buffer.push(byte) {
            log::warn!("dropping sentence tagged {}: {}", self.target, e);
            self.stats.overflowed += 1;
            self.reset();
            // The byte that did not fit may start the next frame
            self.seek_start(byte);
            return Err(e);
        }
        Ok(())
    }

    /// Runs the filter on a pair of byte channels.
    ///
    /// This reads bytes from `source` and writes each matching sentence to
    /// `sink`, followed by a flush of the sink. Sentences dropped because of
    /// a buffer overflow are logged and counted, and do not stop the filter.
    ///
    /// This function only returns if one of the channels fails. The state of
    /// the filter is kept in that case, so calling this function again
    /// continues processing the stream where it was left.
    pub fn run<R, W>(
        &mut self,
        mut source: R,
        mut sink: W,
    ) -> Result<Infallible, FilterError<R::Error, W::Error>>
    where
        R: ByteSource,
        W: ByteSink,
    {
        loop {
            let byte = source.read_byte().map_err(FilterError::Read)?;
            // Overflows are already logged and counted by feed
            if let Ok(Some(sentence)) = self.feed(byte) {
                sink.write_all(sentence).map_err(FilterError::Write)?;
                sink.flush().map_err(FilterError::Write)?;
            }
        }
    }
}

impl<S: StaticStorage> Default for SentenceFilter<S> {
    fn default() -> SentenceFilter<S> {
        SentenceFilter::new(Tag::default())
    }
}

/// Sentence filter channel error.
///
/// This is returned by [`SentenceFilter::run`] when reading from the source or
/// writing to the sink fails.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FilterError<R, W> {
    /// Reading from the source failed.
    Read(R),
    /// Writing to the sink failed.
    Write(W),
}

impl<R: fmt::Display, W: fmt::Display> fmt::Display for FilterError<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Read(e) => write!(f, "could not read input: {}", e),
            FilterError::Write(e) => write!(f, "could not write output: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<R, W> std::error::Error for FilterError<R, W>
where
    R: std::error::Error + 'static,
    W: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Read(e) => Some(e),
            FilterError::Write(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::channel::EndOfInput;
    use crate::storage::{FullStorage, SmallStorage};
    use hex_literal::hex;

    fn filter_all<S: StaticStorage>(target: Tag, input: &[u8]) -> (Vec<u8>, FilterStats) {
        let mut filter = SentenceFilter::<S>::new(target);
        let mut output = Vec::new();
        let result = filter.run(input, &mut output);
        assert_eq!(result, Err(FilterError::Read(EndOfInput {})));
        (output, filter.stats())
    }

    fn filter_gga(input: &[u8]) -> Vec<u8> {
        filter_all::<StandardStorage>(Tag::GPGGA, input).0
    }

    #[test]
    fn forward_matching() {
        let (output, stats) = filter_all::<StandardStorage>(
            Tag::GPGGA,
            b"$GPGGA,1,2*00\n$GPGLL,3\n$GPGGA,4\n",
        );
        assert_eq!(output, b"GPGGA,1,2*00\nGPGGA,4\n");
        assert_eq!(
            stats,
            FilterStats {
                frames: 3,
                forwarded: 2,
                rejected: 1,
                overflowed: 0,
            }
        );
    }

    #[test]
    fn receiver_burst() {
        let input = b"$GPGGA,064913.119,,,,,0,0,,,M,,M,,*48\r\n\
                      $GPGLL,,,,,064913.119,V,N*7A\r\n\
                      $GPGSA,A,1,,,,,,,,,,,,,,,*1E\r\n\
                      $GPGSV,1,1,00*79\r\n\
                      $GPRMC,064913.119,V,,,,,0.00,0.00,100180,,,N*45\r\n\
                      $GPVTG,0.00,T,,M,0.00,N,0.00,K,N*32\r\n";
        assert_eq!(
            filter_gga(input),
            b"GPGGA,064913.119,,,,,0,0,,,M,,M,,*48\r\n"
        );
        let rmc = "GPRMC".parse().unwrap();
        let (output, _) = filter_all::<StandardStorage>(rmc, input);
        assert_eq!(
            output,
            b"GPRMC,064913.119,V,,,,,0.00,0.00,100180,,,N*45\r\n"
        );
    }

    #[test]
    fn only_non_matching() {
        let (output, stats) =
            filter_all::<StandardStorage>(Tag::GPGGA, b"$GPGLL,3\n$GPRMC,1\n$GPVTG,2\n");
        assert!(output.is_empty());
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.forwarded, 0);
    }

    #[test]
    fn empty_input() {
        assert!(filter_gga(b"").is_empty());
        assert!(filter_gga(b"no sentences here\n").is_empty());
    }

    #[test]
    fn empty_body() {
        assert_eq!(filter_gga(b"$GPGGA\n"), b"GPGGA\n");
    }

    #[test]
    fn garbage_before_start() {
        assert_eq!(filter_gga(b"GGA,9\n\x00\xff$GPGGA,1\n"), b"GPGGA,1\n");
    }

    #[test]
    fn start_inside_discarded_frame() {
        // The $ inside the GLL frame starts a new candidate frame
        assert_eq!(filter_gga(b"$GPGLL,1$GPGGA,2\n"), b"GPGGA,2\n");
    }

    #[test]
    fn tag_bytes_not_inspected() {
        // The second $ is taken as the first tag byte
        let (output, stats) = filter_all::<StandardStorage>(Tag::GPGGA, b"$$GPGGA,1\n");
        assert!(output.is_empty());
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.rejected, 1);
    }

    #[test]
    fn start_inside_matched_frame() {
        // Once the tag matches, bytes are copied verbatim up to the line feed
        assert_eq!(filter_gga(b"$GPGGA,1$GPGLL\n"), b"GPGGA,1$GPGLL\n");
    }

    #[test]
    fn binary_body() {
        let input = hex!("24 47 50 47 47 41 00 80 ff 24 0d 0a");
        assert_eq!(filter_gga(&input), hex!("47 50 47 47 41 00 80 ff 24 0d 0a"));
    }

    #[test]
    fn repeatable() {
        let input = b"$GPGSV,1,1,00*79\n$GPGGA,1,2*00\nxx$GPGGA,3\n$GPGLL,4\n";
        let first = filter_gga(input);
        let second = filter_gga(input);
        assert_eq!(first, b"GPGGA,1,2*00\nGPGGA,3\n");
        assert_eq!(first, second);
    }

    #[test]
    fn overflow_recovers() {
        let mut input = b"$GPGGA,".to_vec();
        input.extend(std::iter::repeat(b'9').take(100));
        input.extend_from_slice(b"\n$GPGGA,short\n");
        let (output, stats) = filter_all::<SmallStorage>(Tag::GPGGA, &input);
        assert_eq!(output, b"GPGGA,short\n");
        assert_eq!(stats.overflowed, 1);
        assert_eq!(stats.forwarded, 1);

        // The same sentence fits in a larger storage
        let (output, stats) = filter_all::<FullStorage>(Tag::GPGGA, &input);
        assert_eq!(output.len(), 6 + 100 + 1 + 12);
        assert_eq!(stats.overflowed, 0);
        assert_eq!(stats.forwarded, 2);
    }

    #[test]
    fn overflow_boundary() {
        let mut filter = SentenceFilter::<SmallStorage>::new(Tag::GPGGA);
        // Tag, body and line feed fill the 60 byte buffer exactly
        let mut sentence = b"$GPGGA,".to_vec();
        sentence.extend(std::iter::repeat(b'0').take(60 - 7));
        sentence.push(b'\n');
        let mut forwarded = None;
        for &b in &sentence {
            if let Some(s) = filter.feed(b).unwrap() {
                forwarded = Some(s.to_vec());
            }
        }
        assert_eq!(forwarded.as_deref(), Some(&sentence[1..]));

        // One more byte in the body leaves no room for the line feed
        for &b in &sentence[..sentence.len() - 1] {
            assert_eq!(filter.feed(b), Ok(None));
        }
        assert_eq!(filter.feed(b'0'), Ok(None));
        assert_eq!(filter.feed(b'\n'), Err(BufferOverflow { capacity: 60 }));
        assert_eq!(filter.state(), State::SeekStart);
        // The tail of the dropped sentence produces nothing
        for &b in b"00\n" {
            assert_eq!(filter.feed(b), Ok(None));
        }
        assert_eq!(filter.stats().overflowed, 1);
    }

    #[test]
    fn missing_end_marker() {
        // A frame that never ends is dropped once it fills the buffer
        let mut input = b"$GPGGA".to_vec();
        input.extend(std::iter::repeat(b',').take(300));
        input.extend_from_slice(b"$GPGGA,ok\n");
        let (output, stats) = filter_all::<StandardStorage>(Tag::GPGGA, &input);
        assert_eq!(output, b"GPGGA,ok\n");
        assert_eq!(stats.overflowed, 1);
    }

    #[test]
    fn overflow_on_start_marker() {
        // The line feed is missing and the next frame starts right where the
        // buffer is full
        let mut input = b"$GPGGA,".to_vec();
        input.extend(std::iter::repeat(b'0').take(54));
        input.extend_from_slice(b"$GPGGA,ok\n");
        let (output, stats) = filter_all::<SmallStorage>(Tag::GPGGA, &input);
        assert_eq!(output, b"GPGGA,ok\n");
        assert_eq!(
            stats,
            FilterStats {
                frames: 2,
                forwarded: 1,
                rejected: 0,
                overflowed: 1,
            }
        );
    }

    #[test]
    fn overflow_on_end_marker() {
        // The buffer is exactly full when the line feed arrives
        let mut input = b"$GPGGA,".to_vec();
        input.extend(std::iter::repeat(b'0').take(54));
        input.extend_from_slice(b"\n$GPGGA,ok\n");
        let (output, stats) = filter_all::<SmallStorage>(Tag::GPGGA, &input);
        assert_eq!(output, b"GPGGA,ok\n");
        assert_eq!(stats.overflowed, 1);
        assert_eq!(stats.forwarded, 1);
        assert_eq!(stats.frames, 2);
    }

    #[test]
    fn states() {
        let mut filter: SentenceFilter = SentenceFilter::default();
        assert_eq!(filter.target(), Tag::GPGGA);
        assert_eq!(filter.state(), State::SeekStart);
        filter.feed(b'x').unwrap();
        assert_eq!(filter.state(), State::SeekStart);
        filter.feed(b'$').unwrap();
        assert_eq!(filter.state(), State::ReadTag);
        for &b in b"GPGG" {
            filter.feed(b).unwrap();
            assert_eq!(filter.state(), State::ReadTag);
        }
        filter.feed(b'A').unwrap();
        assert_eq!(filter.state(), State::CopyMatched);
        filter.feed(b',').unwrap();
        assert_eq!(filter.state(), State::CopyMatched);
        assert_eq!(filter.feed(b'\n'), Ok(Some(&b"GPGGA,\n"[..])));
        assert_eq!(filter.state(), State::SeekStart);
    }

    #[test]
    fn reset() {
        let mut filter = SentenceFilter::<StandardStorage>::new(Tag::GPGGA);
        for &b in b"$GPGGA,1" {
            filter.feed(b).unwrap();
        }
        filter.reset();
        assert_eq!(filter.state(), State::SeekStart);
        for &b in b",2\n" {
            assert_eq!(filter.feed(b), Ok(None));
        }
        assert_eq!(filter.stats().frames, 1);
        assert_eq!(filter.stats().forwarded, 0);
    }

    #[test]
    fn resume_after_read_error() {
        let mut filter = SentenceFilter::<StandardStorage>::new(Tag::GPGGA);
        let mut output = Vec::new();
        let first = &b"$GPGLL,1\n$GPG"[..];
        let second = &b"GA,2\n"[..];
        assert_eq!(
            filter.run(first, &mut output),
            Err(FilterError::Read(EndOfInput {}))
        );
        assert_eq!(filter.state(), State::ReadTag);
        assert_eq!(
            filter.run(second, &mut output),
            Err(FilterError::Read(EndOfInput {}))
        );
        assert_eq!(output, b"GPGGA,2\n");
    }

    #[test]
    fn write_error() {
        struct Closed {}

        impl ByteSink for Closed {
            type Error = &'static str;

            fn write_byte(&mut self, _byte: u8) -> Result<(), &'static str> {
                Err("closed")
            }
        }

        let mut filter = SentenceFilter::<StandardStorage>::new(Tag::GPGGA);
        let result = filter.run(&b"$GPGLL,1\n$GPGGA,2\n$GPGGA,3\n"[..], Closed {});
        assert_eq!(result, Err(FilterError::Write("closed")));
        // The filter stopped right after the first matching sentence
        assert_eq!(filter.stats().forwarded, 1);
        assert_eq!(filter.state(), State::SeekStart);
    }

    #[test]
    fn error_message() {
        let err: FilterError<EndOfInput, EndOfInput> = FilterError::Read(EndOfInput {});
        assert_eq!(format!("{}", err), "could not read input: end of input");
    }
}
