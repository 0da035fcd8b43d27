//! Scratch buffer storage definitions.
//!
//! The trait [`StaticStorage`] in this module is used to define the size of
//! the scratch buffer that is allocated by
//! [`SentenceFilter`](crate::SentenceFilter). The buffer holds the tag and
//! body of the sentence being forwarded, so its size bounds the longest
//! sentence that can be forwarded. Longer sentences are dropped.
//!
//! The NMEA 0183 standard limits sentences to 82 characters, including the
//! leading `$` and the trailing CR LF. Some receivers emit proprietary
//! sentences that go beyond this limit.
//!
//! A [`StaticStorage`] trait is used to define types that indicate the size of
//! the storage. In general, these types should be zero-sized. Three types are
//! provided: [`StandardStorage`], which fits any sentence that follows the
//! standard, [`SmallStorage`], which can be used in memory constrained
//! applications, and [`FullStorage`], which leaves room for long proprietary
//! sentences. Users can define additional storage sizes by implementing the
//! [`StaticStorage`] trait on their own types.

use crate::types::TAG_BYTES;
use generic_array::ArrayLength;

/// Auxiliary trait for generic array sizes.
///
/// This is a trait that has as supertraits all the traits required to use an
/// [`Unsigned`](typenum::marker_traits::Unsigned) type from `typenum` as an
/// array length for the scratch buffer. Its main purpose is to simplify trait
/// bounds. A blanket implementation is used to derive this trait for the
/// appropriate types.
pub trait StaticStorageTypenum:
    typenum::marker_traits::Unsigned
    + core::fmt::Debug
    + core::cmp::PartialEq
    + core::cmp::Eq
    + ArrayLength
{
}

/// Blanket implementation for [`StaticStorageTypenum`].
impl<T> StaticStorageTypenum for T where
    T: typenum::marker_traits::Unsigned
        + core::fmt::Debug
        + core::cmp::PartialEq
        + core::cmp::Eq
        + ArrayLength
{
}

/// Trait defining static storage sizes.
///
/// A type that implements this trait defines the size of the scratch buffer
/// used by the sentence filter. An unsigned integer from the `typenum` crate
/// should be used as `SentenceBytes`.
pub trait StaticStorage {
    /// Capacity of the scratch buffer in bytes.
    ///
    /// The buffer stores the tag, the body and the end marker of a sentence,
    /// but not its start marker. It must be larger than
    /// [`TAG_BYTES`](crate::types::TAG_BYTES), otherwise no sentence can ever
    /// be forwarded.
    type SentenceBytes: StaticStorageTypenum;
}

/// Returns the scratch buffer capacity of a storage type.
pub fn capacity<S: StaticStorage>() -> usize {
    <S::SentenceBytes as typenum::marker_traits::Unsigned>::USIZE
}

/// Returns `true` if a storage type can hold at least an empty sentence.
///
/// An empty sentence consists of the tag followed by the end marker.
pub fn is_usable<S: StaticStorage>() -> bool {
    capacity::<S>() > TAG_BYTES
}

/// Storage size for long proprietary sentences.
///
/// This is the largest storage size that it makes sense to have. It has room
/// for 256 bytes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct FullStorage {}

impl StaticStorage for FullStorage {
    type SentenceBytes = typenum::U256;
}

/// Storage size for standard NMEA 0183 sentences.
///
/// This has room for 82 bytes, which is enough for any sentence that complies
/// with the length limit of the standard.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct StandardStorage {}

impl StaticStorage for StandardStorage {
    type SentenceBytes = typenum::U82;
}

/// Storage size for 60 byte sentences.
///
/// This is an example of a reduced storage size that can be used in a
/// platform with constrained memory. A GGA sentence without a fix fits in it,
/// but a GGA sentence with a full position fix may not.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SmallStorage {}

impl StaticStorage for SmallStorage {
    type SentenceBytes = typenum::U60;
}
