//! Dense positional identifiers for the ordered list view.
//!
//! A [`PositionalTag`] is a sequence of [`Position`]s, ordered
//! lexicographically. Between any two distinct tags another tag can always
//! be constructed (see [`List::between`](crate::List::between)), which is
//! what lets concurrent inserts land at stable places without index
//! shifting.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// An opaque site identifier used to break ties between replicas.
///
/// Appending a site id to a minted position makes concurrently minted
/// identifiers distinct with certainty instead of overwhelming probability,
/// at the cost of longer identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteId(String);

impl SiteId {
    /// Create a site id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The site id's textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        Self(String::from(id))
    }
}

impl From<String> for SiteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One coordinate of a positional tag: an integer plus an optional site id.
///
/// Positions compare by integer first, then by site id, with an absent site
/// ordering before any present one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// The integer coordinate.
    pub int: u64,
    /// Optional replica tiebreaker.
    pub site: Option<SiteId>,
}

impl Position {
    /// Create a position without a site tiebreaker.
    #[must_use]
    pub fn new(int: u64) -> Self {
        Self { int, site: None }
    }

    /// Create a position with a site tiebreaker.
    pub fn with_site(int: u64, site: impl Into<SiteId>) -> Self {
        Self {
            int,
            site: Some(site.into()),
        }
    }
}

/// A dense positional identifier (Logoot-style).
///
/// Tags order lexicographically over their positions; a tag that is a strict
/// prefix of another orders before it. Two distinct tags never compare
/// equal, so a sorted map keyed by `PositionalTag` is a total order over
/// list elements.
///
/// # Example
///
/// ```
/// use convergent::{Position, PositionalTag};
///
/// let a = PositionalTag::from(vec![Position::with_site(5, "s1")]);
/// let b = PositionalTag::from(vec![Position::with_site(6, "s2")]);
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionalTag(Vec<Position>);

/// Error decoding a canonical positional-tag encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended inside a position.
    Truncated,
    /// A byte where a position marker was expected did not match.
    BadMarker(u8),
    /// The site id bytes were not a valid encoding.
    BadSite,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "positional tag encoding is truncated"),
            Self::BadMarker(b) => write!(f, "expected position marker, found byte {b:#04x}"),
            Self::BadSite => write!(f, "malformed site id in positional tag encoding"),
        }
    }
}

const POSITION_MARKER: u8 = 0x01;
const SITE_ABSENT: u8 = 0x00;
const SITE_PRESENT: u8 = 0x01;

impl PositionalTag {
    /// The positions making up this tag.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    /// Number of positions (the tag's depth).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Canonical byte encoding.
    ///
    /// The encoding is order-preserving: comparing two encodings as plain
    /// byte strings gives the same result as comparing the decoded tags.
    /// Storage backends can therefore sort entries without decoding.
    ///
    /// Layout, per position: a `0x01` marker, the integer as 8 big-endian
    /// bytes, then either `0x00` (no site) or `0x01` followed by the site
    /// bytes with `0x00` escaped as `0x00 0xFF` and a `0x00 0x00`
    /// terminator.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() * 10);
        for pos in &self.0 {
            out.push(POSITION_MARKER);
            out.extend_from_slice(&pos.int.to_be_bytes());
            match &pos.site {
                None => out.push(SITE_ABSENT),
                Some(site) => {
                    out.push(SITE_PRESENT);
                    for &byte in site.as_str().as_bytes() {
                        out.push(byte);
                        if byte == 0x00 {
                            out.push(0xFF);
                        }
                    }
                    out.extend_from_slice(&[0x00, 0x00]);
                }
            }
        }
        out
    }

    /// Decode a canonical byte encoding produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut positions = Vec::new();
        let mut input = bytes;

        while !input.is_empty() {
            let (&marker, rest) = input.split_first().ok_or(DecodeError::Truncated)?;
            if marker != POSITION_MARKER {
                return Err(DecodeError::BadMarker(marker));
            }
            if rest.len() < 9 {
                return Err(DecodeError::Truncated);
            }
            let mut int_bytes = [0u8; 8];
            int_bytes.copy_from_slice(&rest[..8]);
            let int = u64::from_be_bytes(int_bytes);

            let site_flag = rest[8];
            input = &rest[9..];

            let site = match site_flag {
                SITE_ABSENT => None,
                SITE_PRESENT => {
                    let (site, rest) = decode_site(input)?;
                    input = rest;
                    Some(site)
                }
                other => return Err(DecodeError::BadMarker(other)),
            };

            positions.push(Position { int, site });
        }

        Ok(Self(positions))
    }
}

/// Read an escaped, `0x00 0x00`-terminated site id off the front of `input`.
fn decode_site(input: &[u8]) -> Result<(SiteId, &[u8]), DecodeError> {
    let mut raw = Vec::new();
    let mut i = 0;
    loop {
        match input.get(i) {
            None => return Err(DecodeError::Truncated),
            Some(0x00) => match input.get(i + 1) {
                None => return Err(DecodeError::Truncated),
                Some(0x00) => {
                    let site = String::from_utf8(raw).map_err(|_| DecodeError::BadSite)?;
                    return Ok((SiteId(site), &input[i + 2..]));
                }
                Some(0xFF) => {
                    raw.push(0x00);
                    i += 2;
                }
                Some(_) => return Err(DecodeError::BadSite),
            },
            Some(&byte) => {
                raw.push(byte);
                i += 1;
            }
        }
    }
}

impl From<Vec<Position>> for PositionalTag {
    fn from(positions: Vec<Position>) -> Self {
        Self(positions)
    }
}

impl FromIterator<Position> for PositionalTag {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}
