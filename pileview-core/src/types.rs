use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Position on the reference sequence.
pub type RefPos = usize;

/// An immutable, indexable sequence of symbols over a finite alphabet.
///
/// Symbols are plain bytes; nucleotide letters are the usual case but nothing
/// in the core assumes a DNA alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn get(&self, pos: usize) -> Option<u8> {
        self.0.get(pos).copied()
    }

    /// Extract the subsequence over `range` as a [`Read`].
    ///
    /// Returns `None` when `range` does not lie fully inside the sequence.
    pub fn subsequence(&self, range: Range<usize>) -> Option<Read> {
        self.0.get(range).map(Read::new)
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Sequence {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// A short read: a contiguous subsequence sampled from some source sequence.
///
/// Provenance (the original offset in the source) is deliberately not kept;
/// the mapper has to rediscover the position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Read {
    bases: Vec<u8>,
}

impl Read {
    pub fn new(bases: impl Into<Vec<u8>>) -> Self {
        Self { bases: bases.into() }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }
}

impl From<&str> for Read {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bases))
    }
}

/// A read together with its mapping outcome.
///
/// Invariants:
/// - unmapped: `map_pos == None` and `mismatches` is empty;
/// - mapped: `map_pos + read.len() <= ref_len` for the reference it was mapped
///   against, and every mismatch offset is `< read.len()`, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedRead {
    pub read: Read,
    pub map_pos: Option<RefPos>,
    pub mismatches: Vec<usize>,
}

impl MappedRead {
    /// A read the mapper could not place anywhere on the reference.
    pub fn unmapped(read: Read) -> Self {
        Self {
            read,
            map_pos: None,
            mismatches: Vec::new(),
        }
    }

    pub fn mapped(read: Read, map_pos: RefPos, mismatches: Vec<usize>) -> Self {
        debug_assert!(mismatches.iter().all(|&m| m < read.len()));
        debug_assert!(mismatches.windows(2).all(|w| w[0] < w[1]));
        Self {
            read,
            map_pos: Some(map_pos),
            mismatches,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.map_pos.is_some()
    }

    /// The half-open reference span `[map_pos, map_pos + len)` this read
    /// covers, or `None` if unmapped.
    pub fn span(&self) -> Option<Range<RefPos>> {
        self.map_pos.map(|pos| pos..pos + self.read.len())
    }

    /// Offsets within the read that disagree with the reference, ascending.
    ///
    /// The renderer uses these to highlight mismatching letters.
    pub fn mismatch_offsets(&self) -> &[usize] {
        &self.mismatches
    }
}
