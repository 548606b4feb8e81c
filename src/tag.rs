use alloc::string::String;
use core::fmt;

/// An opaque identity tag supplied by the application.
///
/// Tags identify individual entries inside a view (a register write, a set
/// add, a list element). The library never mints identity tags — the host
/// stamps each operation with one, typically derived from a node id and a
/// local counter. The only requirements are equality and a total order that
/// is consistent across replicas; `Tag` compares lexicographically over its
/// bytes, which satisfies both.
///
/// # Example
///
/// ```
/// use convergent::Tag;
///
/// let a = Tag::from("node-1:0");
/// let b = Tag::from("node-2:0");
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(String);

impl Tag {
    /// Create a tag from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The tag's textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(id: &str) -> Self {
        Self(String::from(id))
    }
}

impl From<String> for Tag {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
