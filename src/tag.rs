use crate::types::{TagBytes, END_MARKER, START_MARKER, TAG_BYTES};
use core::fmt;
use core::str::FromStr;

/// NMEA sentence type tag.
///
/// The tag is the fixed-length field that immediately follows the `$` of a
/// sentence, such as `GPGGA` or `GPRMC`. This struct guarantees at
/// construction that the tag has exactly [`TAG_BYTES`] bytes and that it
/// contains neither the start nor the end marker, since a tag containing them
/// could never be matched on the wire.
///
/// # Examples
///
/// A `Tag` is typically constructed from a string using its `FromStr`
/// implementation.
///
/// ```
/// use nmea_filter::Tag;
///
/// let tag: Tag = "GPRMC".parse().unwrap();
/// assert_eq!(tag.as_bytes(), b"GPRMC");
/// assert_eq!(format!("{}", tag), "GPRMC");
/// assert!("GPRM".parse::<Tag>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Tag(TagBytes);

impl Tag {
    /// Global positioning system fix data.
    ///
    /// This is the tag forwarded by default.
    pub const GPGGA: Tag = Tag(*b"GPGGA");

    /// Returns the bytes of the tag.
    pub fn as_bytes(&self) -> &TagBytes {
        &self.0
    }
}

impl Default for Tag {
    fn default() -> Tag {
        Tag::GPGGA
    }
}

impl TryFrom<TagBytes> for Tag {
    type Error = TagError;
    fn try_from(value: TagBytes) -> Result<Tag, TagError> {
        if value
            .iter()
            .any(|&b| b == START_MARKER || b == END_MARKER)
        {
            Err(TagError::ContainsMarker)
        } else {
            Ok(Tag(value))
        }
    }
}

impl TryFrom<&[u8]> for Tag {
    type Error = TagError;
    fn try_from(value: &[u8]) -> Result<Tag, TagError> {
        let bytes = TagBytes::try_from(value).map_err(|_| TagError::WrongLength)?;
        Tag::try_from(bytes)
    }
}

impl FromStr for Tag {
    type Err = TagError;
    fn from_str(s: &str) -> Result<Tag, TagError> {
        Tag::try_from(s.as_bytes())
    }
}

impl PartialEq<[u8]> for Tag {
    fn eq(&self, other: &[u8]) -> bool {
        self.0[..] == *other
    }
}

/// Formats the tag as ASCII text.
///
/// Bytes outside the printable ASCII range are escaped.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", b.escape_ascii())?;
        }
        Ok(())
    }
}

/// Tag construction error.
///
/// This represents the errors that can happen during the construction of a
/// [`Tag`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TagError {
    /// The value does not have exactly 5 bytes.
    WrongLength,
    /// The value contains a start or end marker.
    ContainsMarker,
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::WrongLength => write!(f, "tag must be exactly {} bytes long", TAG_BYTES),
            TagError::ContainsMarker => write!(f, "tag cannot contain '$' or line feed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TagError {}
