//! Dump envelope metadata.
//!
//! Hosts that persist or ship dumps can prefix them with a `(kind, version)`
//! envelope so a stored blob is self-describing and can be migrated when a
//! dump schema evolves.

/// Identifies a view type inside a dump envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ViewKind {
    /// Causal-tag register.
    Register = 1,
    /// Observed-remove set.
    Set = 2,
    /// Ordered list with positional tags.
    List = 3,
    /// Text buffer.
    Text = 4,
}

/// Trait for views whose dumps carry a schema version.
pub trait Versioned {
    /// Current schema version of this view's dump format.
    const CURRENT_VERSION: u8;

    /// The view kind identifier for the envelope.
    const VIEW_KIND: ViewKind;
}
